//! # kist core
//!
//! An embedded document store: a typed schema layer and binary record
//! codec over an ordered, transactional key-value engine.
//!
//! Applications define entity types inside namespaces, describe their
//! fields through the append-only schema registry, and read and write
//! records through per-type [`Table`]s. All durable state changes run
//! inside engine transactions; all in-memory schema structures are safe
//! for concurrent use.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kist_core::{Store, SearchOptions, CompOp, FieldType};
//! use std::sync::Arc;
//!
//! let store = Arc::new(Store::open(Path::new("/var/lib/myapp"))?);
//! let sales = store.create_namespace("sales")?;
//! let order_type = store.create_entity_type(&sales, "order")?;
//! order_type.add_field("amount", FieldType::Float64)?;
//! order_type.add_field("memo", FieldType::Text)?;
//! store.sync_entity_type(&sales, &order_type)?;
//!
//! let orders = store.table::<Order>(&sales, &order_type)?;
//! orders.put(&Order { id: 1, amount: 9.5, memo: "hi".into() })?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entity;
mod error;
mod name;
mod namespace;
mod schema;
mod search;
mod store;
mod table;

pub use entity::{Entity, EntityCodec, EntityKey};
pub use error::{CoreError, CoreResult};
pub use name::validate_name;
pub use namespace::Namespace;
pub use schema::{EntityTypeDefn, FieldDefn};
pub use search::{CompOp, SearchOptions};
pub use store::{initialize, instance, Store};
pub use table::Table;

// Codec types application code needs to implement `EntityCodec`.
pub use kist_codec::{Field, FieldType, FieldValue};
