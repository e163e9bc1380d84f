//! Per-entity-type table access.

use crate::entity::{EntityCodec, EntityKey};
use crate::error::CoreResult;
use crate::search::SearchOptions;
use crate::store::Store;
use kist_codec::{decode_record_fields, encode_record};
use redb::TableDefinition;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::trace;

/// Table-like access to one entity type's records inside a namespace.
///
/// A `Table<T>` is bound to the bucket identified by its
/// `(namespace, entity-type)` pair and handles record encoding and
/// decoding through `T`'s [`EntityCodec`] implementation. Every operation
/// runs inside one transaction of the backing engine, so a crash or a
/// concurrent writer never observes a partially written record.
///
/// # Example
///
/// ```rust,ignore
/// let orders: Table<Order> = store.table(&sales, &order_type)?;
/// orders.put(&Order { id: 1, amount: 9.5, memo: "hi".into() })?;
/// let found = orders.get(1)?;
/// ```
pub struct Table<T: EntityCodec> {
    /// Storage facade owning the engine handle.
    store: Arc<Store>,
    /// Engine table name, `<namespace>:<entity-type>`.
    bucket: String,
    /// Type marker.
    _marker: PhantomData<T>,
}

impl<T: EntityCodec> Table<T> {
    pub(crate) fn new(store: Arc<Store>, bucket: String) -> Self {
        Self {
            store,
            bucket,
            _marker: PhantomData,
        }
    }

    /// The bucket this table is bound to.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn definition(&self) -> TableDefinition<'_, &'static [u8], &'static [u8]> {
        TableDefinition::new(&self.bucket)
    }

    /// Looks up the entity with the given ID.
    ///
    /// Answers `None` if no record is stored under the ID.
    ///
    /// # Errors
    ///
    /// `ZeroIdentifier` for ID zero; codec errors if the stored record
    /// does not decode; engine errors.
    pub fn get(&self, id: u64) -> CoreResult<Option<T>> {
        let key = EntityKey::new(id)?;
        let key_bytes = key.to_bytes();

        let txn = self.store.db().begin_read()?;
        let table = txn.open_table(self.definition())?;
        let Some(guard) = table.get(key_bytes.as_slice())? else {
            return Ok(None);
        };

        let fields = decode_record_fields(guard.value(), &[])?;
        Ok(Some(T::from_fields(key, fields)?))
    }

    /// Creates or updates the given entity.
    ///
    /// An existing record under the same key is overwritten; the table
    /// keeps no history of prior versions.
    ///
    /// # Errors
    ///
    /// `ZeroIdentifier` if the entity's ID is zero; codec errors while
    /// serializing; engine errors.
    pub fn put(&self, entity: &T) -> CoreResult<()> {
        let key = entity.key()?;
        let record = encode_record(&entity.to_fields()?)?;
        let key_bytes = key.to_bytes();

        let txn = self.store.db().begin_write()?;
        {
            let mut table = txn.open_table(self.definition())?;
            table.insert(key_bytes.as_slice(), record.as_slice())?;
        }
        txn.commit()?;

        trace!(bucket = %self.bucket, key = key.id(), "put entity");
        Ok(())
    }

    /// Removes the entity with the given ID, if present.
    ///
    /// Deleting an absent ID is not an error.
    ///
    /// # Errors
    ///
    /// `ZeroIdentifier` for ID zero; engine errors.
    pub fn delete(&self, id: u64) -> CoreResult<()> {
        let key = EntityKey::new(id)?;
        let key_bytes = key.to_bytes();

        let txn = self.store.db().begin_write()?;
        let removed = {
            let mut table = txn.open_table(self.definition())?;
            let removed = table.remove(key_bytes.as_slice())?.is_some();
            removed
        };
        txn.commit()?;

        trace!(bucket = %self.bucket, key = id, removed, "delete entity");
        Ok(())
    }

    /// Scans the table in ascending key order, collecting matching keys.
    ///
    /// Iteration starts at `opts.start_at` — or, if that key is absent, at
    /// the first key greater than it — and visits records in the byte
    /// order of their 8-byte key encoding, i.e. numeric ascending ID
    /// order. Only the fields listed in `opts.fields` are decoded (an
    /// empty list decodes everything, the expensive path) before each
    /// `(key, entity)` pair is handed to the predicate; `opts.operator`
    /// tells the predicate which comparison it is expected to apply. Keys
    /// for which the predicate answers `true` are collected, and the scan
    /// stops once `opts.limit` matches are found (zero for unlimited).
    ///
    /// # Errors
    ///
    /// A record that fails to decode aborts the whole search: a malformed
    /// record is a storage or schema-compatibility bug that must not be
    /// masked by skipping it. Engine errors likewise abort.
    pub fn search<F>(&self, opts: &SearchOptions, mut predicate: F) -> CoreResult<Vec<u64>>
    where
        F: FnMut(u64, &T) -> bool,
    {
        let txn = self.store.db().begin_read()?;
        let table = txn.open_table(self.definition())?;

        let start = opts.start_at.to_be_bytes();
        let mut matches = Vec::new();

        for entry in table.range(start.as_slice()..)? {
            let (key_guard, value_guard) = entry?;
            let key = EntityKey::from_bytes(key_guard.value())?;
            let fields = decode_record_fields(value_guard.value(), &opts.fields)?;
            let entity = T::from_fields(key, fields)?;

            if predicate(key.id(), &entity) {
                matches.push(key.id());
                if opts.limit > 0 && matches.len() as u64 >= opts.limit {
                    break;
                }
            }
        }

        trace!(
            bucket = %self.bucket,
            start_at = opts.start_at,
            found = matches.len(),
            "search finished"
        );
        Ok(matches)
    }
}
