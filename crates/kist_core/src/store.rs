//! The storage facade.
//!
//! Owns the handle to the backing engine and the system catalog stored
//! inside it. The catalog lives in two always-present tables, namespace
//! definitions and entity-type definitions; one further table exists per
//! `(namespace, entity-type)` pair and holds that type's records.
//!
//! The engine has no nested buckets, so the catalog's logical
//! `_sys/nsdefs` and `_sys/etdefs` sub-buckets are flat tables named
//! `_sys:nsdefs` and `_sys:etdefs`, and data buckets are named
//! `<namespace>:<entity-type>`. `:` never passes the naming rule, so
//! these names cannot collide.

use crate::entity::EntityCodec;
use crate::error::{CoreError, CoreResult};
use crate::name::validate_name;
use crate::namespace::{Namespace, NamespaceSnapshot};
use crate::schema::{EntityTypeDefn, EntityTypeSnapshot};
use crate::table::Table;
use parking_lot::Mutex;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Database directory inside the base storage path.
const DB_DIR: &str = "db";

/// Database file name inside the database directory.
const DB_FILE: &str = "kist.redb";

/// Namespace definitions catalog table.
const NSDEFS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("_sys:nsdefs");

/// Entity type definitions catalog table.
const ETDEFS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("_sys:etdefs");

/// The process-wide handle slot: the opened store, or the rendered
/// initialization error that keeps being re-reported until a successful
/// `initialize` replaces it.
static INSTANCE: Mutex<Option<Result<Arc<Store>, String>>> = Mutex::new(None);

/// The storage facade.
///
/// One `Store` owns the engine handle for the whole process; obtain it
/// with [`Store::open`] for an explicitly passed handle, or through
/// [`instance`] for get-or-open singleton semantics.
#[derive(Debug)]
pub struct Store {
    /// Handle to the backing engine.
    db: Database,
    /// The validated base storage directory.
    base: PathBuf,
}

impl Store {
    /// Opens (or creates) the store under the given base directory.
    ///
    /// The directory must be a non-empty absolute path; it is created if
    /// missing, the engine's data file is opened at `<base>/db/kist.redb`,
    /// and the two catalog tables are created if absent.
    ///
    /// # Errors
    ///
    /// `PathEmpty`/`PathNotAbsolute` for an unusable base path; I/O and
    /// engine errors from directory or database creation.
    pub fn open(base: &Path) -> CoreResult<Self> {
        if base.as_os_str().is_empty() {
            return Err(CoreError::PathEmpty);
        }
        if !base.is_absolute() {
            return Err(CoreError::PathNotAbsolute {
                path: base.display().to_string(),
            });
        }

        let dir = base.join(DB_DIR);
        fs::create_dir_all(&dir)?;
        let db = Database::create(dir.join(DB_FILE))?;

        let txn = db.begin_write()?;
        {
            txn.open_table(NSDEFS_TABLE)?;
            txn.open_table(ETDEFS_TABLE)?;
        }
        txn.commit()?;

        debug!(base = %base.display(), "store opened");
        Ok(Self {
            db,
            base: base.to_path_buf(),
        })
    }

    /// The base storage directory this store was opened under.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    pub(crate) fn db(&self) -> &Database {
        &self.db
    }

    /// Creates and registers a namespace.
    ///
    /// # Errors
    ///
    /// `EmptyName`/`InvalidName` for a name that fails the naming rule;
    /// `NameExists` if the namespace is already defined.
    pub fn create_namespace(&self, name: &str) -> CoreResult<Namespace> {
        validate_name(name)?;

        let snapshot = NamespaceSnapshot {
            name: name.to_owned(),
            buckets: Vec::new(),
        };

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(NSDEFS_TABLE)?;
            if table.get(name)?.is_some() {
                return Err(CoreError::name_exists(name));
            }
            table.insert(name, to_catalog_bytes(&snapshot)?.as_slice())?;
        }
        txn.commit()?;

        debug!(namespace = name, "namespace created");
        Ok(Namespace::from_snapshot(snapshot))
    }

    /// Loads an existing namespace from the catalog.
    ///
    /// # Errors
    ///
    /// `NameUnknown` if no namespace with this name is defined.
    pub fn namespace(&self, name: &str) -> CoreResult<Namespace> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(NSDEFS_TABLE)?;
        let Some(guard) = table.get(name)? else {
            return Err(CoreError::name_unknown(name));
        };
        let snapshot: NamespaceSnapshot = from_catalog_bytes(guard.value())?;
        Ok(Namespace::from_snapshot(snapshot))
    }

    /// The names of all defined namespaces.
    pub fn namespaces(&self) -> CoreResult<Vec<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(NSDEFS_TABLE)?;
        let mut names = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            names.push(key.value().to_owned());
        }
        Ok(names)
    }

    /// Creates an entity type inside a namespace.
    ///
    /// Assigns the next catalog ID, persists the (empty) definition,
    /// creates the type's data bucket, and registers the bucket on the
    /// namespace — all in one transaction.
    ///
    /// # Errors
    ///
    /// `EmptyName`/`InvalidName` for a bad name; `NameExists` if the type
    /// is already defined in this namespace.
    pub fn create_entity_type(&self, ns: &Namespace, name: &str) -> CoreResult<EntityTypeDefn> {
        validate_name(name)?;
        let bucket = bucket_name(ns.name(), name);

        let id;
        let txn = self.db.begin_write()?;
        {
            let mut etdefs = txn.open_table(ETDEFS_TABLE)?;
            if etdefs.get(bucket.as_str())?.is_some() {
                return Err(CoreError::name_exists(name));
            }
            id = u32::try_from(etdefs.len()?).map_err(|_| {
                CoreError::catalog("entity type catalog overflowed u32")
            })? + 1;

            let snapshot = EntityTypeSnapshot {
                id,
                name: name.to_owned(),
                fields: Vec::new(),
            };
            etdefs.insert(bucket.as_str(), to_catalog_bytes(&snapshot)?.as_slice())?;

            // Create the data bucket.
            let data: TableDefinition<&[u8], &[u8]> = TableDefinition::new(&bucket);
            txn.open_table(data)?;

            // Register the bucket on the namespace definition.
            let mut nsdefs = txn.open_table(NSDEFS_TABLE)?;
            if nsdefs.get(ns.name())?.is_none() {
                return Err(CoreError::name_unknown(ns.name()));
            }
            let mut ns_snapshot = ns.snapshot();
            if !ns_snapshot.buckets.contains(&bucket) {
                ns_snapshot.buckets.push(bucket.clone());
            }
            nsdefs.insert(ns.name(), to_catalog_bytes(&ns_snapshot)?.as_slice())?;
        }
        txn.commit()?;
        ns.add_bucket(&bucket);

        debug!(namespace = ns.name(), entity_type = name, id, "entity type created");
        EntityTypeDefn::new(id, name)
    }

    /// Loads an entity type definition from the catalog.
    ///
    /// # Errors
    ///
    /// `NameUnknown` if the type is not defined in this namespace.
    pub fn entity_type(&self, ns: &Namespace, name: &str) -> CoreResult<EntityTypeDefn> {
        let bucket = bucket_name(ns.name(), name);
        let txn = self.db.begin_read()?;
        let table = txn.open_table(ETDEFS_TABLE)?;
        let Some(guard) = table.get(bucket.as_str())? else {
            return Err(CoreError::name_unknown(name));
        };
        let snapshot: EntityTypeSnapshot = from_catalog_bytes(guard.value())?;
        Ok(EntityTypeDefn::from_snapshot(snapshot))
    }

    /// Persists an evolved entity type definition back to the catalog.
    ///
    /// Call after adding fields; field IDs are assigned in memory by the
    /// registry, so re-persisting never renumbers published fields.
    ///
    /// # Errors
    ///
    /// `NameUnknown` if the type was never created in this namespace.
    pub fn sync_entity_type(&self, ns: &Namespace, defn: &EntityTypeDefn) -> CoreResult<()> {
        let bucket = bucket_name(ns.name(), defn.name());
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(ETDEFS_TABLE)?;
            if table.get(bucket.as_str())?.is_none() {
                return Err(CoreError::name_unknown(defn.name()));
            }
            table.insert(bucket.as_str(), to_catalog_bytes(&defn.snapshot())?.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Binds a table to the bucket for `(namespace, entity-type)`.
    ///
    /// # Errors
    ///
    /// `NameUnknown` if the bucket is not registered in the namespace.
    pub fn table<T: EntityCodec>(
        self: &Arc<Self>,
        ns: &Namespace,
        defn: &EntityTypeDefn,
    ) -> CoreResult<Table<T>> {
        let bucket = bucket_name(ns.name(), defn.name());
        if !ns.has_bucket(&bucket) {
            return Err(CoreError::name_unknown(&bucket));
        }
        Ok(Table::new(Arc::clone(self), bucket))
    }
}

/// The engine table name for a `(namespace, entity-type)` pair.
fn bucket_name(namespace: &str, entity_type: &str) -> String {
    format!("{namespace}:{entity_type}")
}

/// Answers the process-wide store, opening it on first call.
///
/// A failed first initialization is remembered: every later call answers
/// `InitFailed` with the original failure instead of retrying silently.
/// Use [`initialize`] to retry explicitly.
///
/// # Errors
///
/// The open error on first call; `InitFailed` re-reporting it afterwards.
pub fn instance(base: &Path) -> CoreResult<Arc<Store>> {
    let mut slot = INSTANCE.lock();
    match slot.as_ref() {
        Some(Ok(store)) => Ok(Arc::clone(store)),
        Some(Err(message)) => Err(CoreError::InitFailed {
            message: message.clone(),
        }),
        None => open_into(&mut slot, base),
    }
}

/// (Re)initializes the process-wide store under the given base directory.
///
/// Replaces whatever the slot holds — including a cached failure — with
/// the outcome of a fresh open.
///
/// # Errors
///
/// Whatever [`Store::open`] reports.
pub fn initialize(base: &Path) -> CoreResult<Arc<Store>> {
    let mut slot = INSTANCE.lock();
    open_into(&mut slot, base)
}

fn open_into(
    slot: &mut Option<Result<Arc<Store>, String>>,
    base: &Path,
) -> CoreResult<Arc<Store>> {
    match Store::open(base) {
        Ok(store) => {
            let store = Arc::new(store);
            *slot = Some(Ok(Arc::clone(&store)));
            Ok(store)
        }
        Err(err) => {
            *slot = Some(Err(err.to_string()));
            Err(err)
        }
    }
}

fn to_catalog_bytes<T: Serialize>(value: &T) -> CoreResult<Vec<u8>> {
    let mut bytes = Vec::new();
    ciborium::into_writer(value, &mut bytes).map_err(|e| CoreError::catalog(e.to_string()))?;
    Ok(bytes)
}

fn from_catalog_bytes<T: DeserializeOwned>(bytes: &[u8]) -> CoreResult<T> {
    ciborium::from_reader(bytes).map_err(|e: ciborium::de::Error<std::io::Error>| {
        CoreError::catalog(e.to_string())
    })
}
