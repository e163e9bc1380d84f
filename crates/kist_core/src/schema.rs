//! Entity type definitions and the field registry.

use crate::error::{CoreError, CoreResult};
use crate::name::validate_name;
use kist_codec::FieldType;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// The definition of one field within an entity type.
///
/// A field definition is created once by [`EntityTypeDefn::add_field`] and
/// is immutable thereafter. The ID is a `u8`, which caps an entity type at
/// 255 fields; much smaller types are recommended in practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefn {
    /// Unique ID within the owning entity type; never zero, never reused.
    pub id: u8,
    /// Name of the field, unique within the owning entity type.
    pub name: String,
    /// Type of the data held in this field.
    pub ftype: FieldType,
}

/// Serialized image of an entity type definition for the system catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct EntityTypeSnapshot {
    pub id: u32,
    pub name: String,
    pub fields: Vec<FieldDefn>,
}

/// The schema of one kind of entity: a named, ordered-by-addition set of
/// field definitions.
///
/// Schema evolution is strictly additive. Fields can be added but never
/// removed or retyped, because persisted records reference fields by ID
/// and must stay decodable. IDs are assigned sequentially by the registry
/// in call order; callers must treat the field list as append-only
/// history, not a resortable set.
///
/// The field list is guarded by a read/write lock: lookups and snapshots
/// proceed concurrently, additions are exclusive, and no reader ever
/// observes a partially added field.
#[derive(Debug)]
pub struct EntityTypeDefn {
    id: u32,
    name: String,
    fields: RwLock<Vec<FieldDefn>>,
}

impl EntityTypeDefn {
    /// Creates an empty definition with the given catalog ID and name.
    pub(crate) fn new(id: u32, name: &str) -> CoreResult<Self> {
        validate_name(name)?;
        Ok(Self {
            id,
            name: name.to_owned(),
            fields: RwLock::new(Vec::new()),
        })
    }

    /// The catalog ID of this entity type.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The name of this entity type.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Defines a new field, assigning it the next sequential ID.
    ///
    /// The assigned ID is `existing-field-count + 1`, so IDs are exactly
    /// `1, 2, 3, …` in call order. The add is all-or-nothing: every
    /// validation runs before any mutation.
    ///
    /// # Errors
    ///
    /// `EmptyName`/`InvalidName` if the name fails the naming rule;
    /// `UnknownFieldType` if `ftype` is not a recognized type;
    /// `NameExists` if a field with this name is already defined;
    /// `TooManyFields` past the 255-field cap.
    pub fn add_field(&self, name: &str, ftype: FieldType) -> CoreResult<FieldDefn> {
        validate_name(name)?;
        if !ftype.is_valid() {
            return Err(CoreError::UnknownFieldType);
        }

        let mut fields = self.fields.write();
        if fields.iter().any(|f| f.name == name) {
            return Err(CoreError::name_exists(name));
        }
        if fields.len() >= usize::from(u8::MAX) {
            return Err(CoreError::TooManyFields {
                entity_type: self.name.clone(),
            });
        }

        let defn = FieldDefn {
            id: fields.len() as u8 + 1,
            name: name.to_owned(),
            ftype,
        };
        fields.push(defn.clone());
        Ok(defn)
    }

    /// Looks up a field definition by name.
    ///
    /// # Errors
    ///
    /// `NameUnknown` if no field with this name is defined.
    pub fn field(&self, name: &str) -> CoreResult<FieldDefn> {
        self.fields
            .read()
            .iter()
            .find(|f| f.name == name)
            .cloned()
            .ok_or_else(|| CoreError::name_unknown(name))
    }

    /// A snapshot of every field definition, in assignment order.
    ///
    /// The copy is safe to iterate while the registry keeps mutating.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldDefn> {
        self.fields.read().clone()
    }

    /// The number of defined fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    /// Answers whether no fields are defined yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.read().is_empty()
    }

    pub(crate) fn snapshot(&self) -> EntityTypeSnapshot {
        EntityTypeSnapshot {
            id: self.id,
            name: self.name.clone(),
            fields: self.fields(),
        }
    }

    pub(crate) fn from_snapshot(snapshot: EntityTypeSnapshot) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name,
            fields: RwLock::new(snapshot.fields),
        }
    }
}
