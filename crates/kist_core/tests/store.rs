//! End-to-end tests over a real store in a temp directory.

use kist_core::{
    CompOp, CoreError, CoreResult, Entity, EntityCodec, EntityKey, Field, FieldType, FieldValue,
    SearchOptions, Store,
};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq)]
struct Order {
    id: u64,
    amount: f64,
    memo: String,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order #{} amount={} memo={:?}", self.id, self.amount, self.memo)
    }
}

impl Entity for Order {
    fn id(&self) -> u64 {
        self.id
    }

    fn type_name(&self) -> &str {
        "order"
    }
}

impl EntityCodec for Order {
    fn to_fields(&self) -> CoreResult<Vec<Field>> {
        Ok(vec![
            Field::new(1, FieldValue::Float64(self.amount))?,
            Field::new(2, FieldValue::Text(self.memo.clone()))?,
        ])
    }

    fn from_fields(key: EntityKey, fields: Vec<Field>) -> CoreResult<Self> {
        let mut order = Order {
            id: key.id(),
            amount: 0.0,
            memo: String::new(),
        };
        for field in fields {
            match (field.id(), field.into_value()) {
                (1, FieldValue::Float64(v)) => order.amount = v,
                (2, FieldValue::Text(v)) => order.memo = v,
                _ => {}
            }
        }
        Ok(order)
    }
}

fn order(id: u64, amount: f64, memo: &str) -> Order {
    Order {
        id,
        amount,
        memo: memo.into(),
    }
}

fn open_store() -> (TempDir, Arc<Store>) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(Store::open(dir.path()).unwrap());
    (dir, store)
}

/// Creates the `sales`/`order` schema and answers its table.
fn sales_orders(store: &Arc<Store>) -> kist_core::Table<Order> {
    let sales = store.create_namespace("sales").unwrap();
    let order_type = store.create_entity_type(&sales, "order").unwrap();
    order_type.add_field("amount", FieldType::Float64).unwrap();
    order_type.add_field("memo", FieldType::Text).unwrap();
    store.sync_entity_type(&sales, &order_type).unwrap();
    store.table(&sales, &order_type).unwrap()
}

#[test]
fn end_to_end_sales_order() {
    let (_dir, store) = open_store();
    let orders = sales_orders(&store);

    orders.put(&order(1, 9.5, "hi")).unwrap();

    let found = orders.get(1).unwrap().unwrap();
    assert_eq!(found.amount, 9.5);
    assert_eq!(found.memo, "hi");

    let opts = SearchOptions {
        operator: CompOp::Equals,
        fields: vec![1],
        ..SearchOptions::default()
    };
    let target = FieldValue::Float64(9.5);
    let matches = orders
        .search(&opts, |_, o| {
            opts.operator.matches(&FieldValue::Float64(o.amount), &target)
        })
        .unwrap();
    assert_eq!(matches, vec![1]);
}

#[test]
fn get_missing_is_none() {
    let (_dir, store) = open_store();
    let orders = sales_orders(&store);
    assert!(orders.get(99).unwrap().is_none());
}

#[test]
fn put_overwrites_without_history() {
    let (_dir, store) = open_store();
    let orders = sales_orders(&store);

    orders.put(&order(1, 1.0, "first")).unwrap();
    orders.put(&order(1, 2.0, "second")).unwrap();

    let found = orders.get(1).unwrap().unwrap();
    assert_eq!(found.amount, 2.0);
    assert_eq!(found.memo, "second");
}

#[test]
fn keys_iterate_in_ascending_id_order() {
    let (_dir, store) = open_store();
    let orders = sales_orders(&store);

    for id in [1u64, 5, 3] {
        orders.put(&order(id, id as f64, "x")).unwrap();
    }

    let all = orders
        .search(&SearchOptions::default(), |_, _| true)
        .unwrap();
    assert_eq!(all, vec![1, 3, 5]);
}

#[test]
fn limit_stops_the_scan_early() {
    let (_dir, store) = open_store();
    let orders = sales_orders(&store);

    for id in 1u64..=5 {
        orders.put(&order(id, 10.0, "x")).unwrap();
    }

    let opts = SearchOptions {
        limit: 2,
        ..SearchOptions::default()
    };
    let matches = orders.search(&opts, |_, _| true).unwrap();
    assert_eq!(matches, vec![1, 2]);
}

#[test]
fn start_at_lands_on_next_present_key() {
    let (_dir, store) = open_store();
    let orders = sales_orders(&store);

    for id in [2u64, 4, 8] {
        orders.put(&order(id, 0.0, "x")).unwrap();
    }

    // 3 is absent; iteration begins at the first key greater than it.
    let opts = SearchOptions {
        start_at: 3,
        ..SearchOptions::default()
    };
    let matches = orders.search(&opts, |_, _| true).unwrap();
    assert_eq!(matches, vec![4, 8]);
}

#[test]
fn limit_applies_after_start_at() {
    let (_dir, store) = open_store();
    let orders = sales_orders(&store);

    for id in 1u64..=5 {
        orders.put(&order(id, 10.0, "x")).unwrap();
    }

    let opts = SearchOptions {
        start_at: 2,
        limit: 2,
        ..SearchOptions::default()
    };
    let matches = orders.search(&opts, |_, _| true).unwrap();
    assert_eq!(matches, vec![2, 3]);
}

#[test]
fn selective_decode_leaves_other_fields_empty() {
    let (_dir, store) = open_store();
    let orders = sales_orders(&store);
    orders.put(&order(1, 9.5, "note")).unwrap();

    // Only field 1 (amount) is decoded; memo stays at its default.
    let opts = SearchOptions {
        fields: vec![1],
        ..SearchOptions::default()
    };
    let mut seen_memo = None;
    orders
        .search(&opts, |_, o| {
            seen_memo = Some(o.memo.clone());
            true
        })
        .unwrap();
    assert_eq!(seen_memo.as_deref(), Some(""));
}

#[test]
fn string_operator_search() {
    let (_dir, store) = open_store();
    let orders = sales_orders(&store);

    orders.put(&order(1, 1.0, "urgent: restock")).unwrap();
    orders.put(&order(2, 2.0, "ship friday")).unwrap();
    orders.put(&order(3, 3.0, "urgent: invoice")).unwrap();

    let opts = SearchOptions {
        operator: CompOp::Prefix,
        fields: vec![2],
        ..SearchOptions::default()
    };
    let target = FieldValue::Text("urgent".into());
    let matches = orders
        .search(&opts, |_, o| {
            opts.operator.matches(&FieldValue::Text(o.memo.clone()), &target)
        })
        .unwrap();
    assert_eq!(matches, vec![1, 3]);
}

#[test]
fn delete_is_idempotent() {
    let (_dir, store) = open_store();
    let orders = sales_orders(&store);

    orders.put(&order(1, 1.0, "x")).unwrap();
    orders.delete(1).unwrap();
    assert!(orders.get(1).unwrap().is_none());

    // Deleting an absent ID succeeds.
    orders.delete(1).unwrap();
    orders.delete(12345).unwrap();
}

#[test]
fn zero_ids_are_rejected() {
    let (_dir, store) = open_store();
    let orders = sales_orders(&store);

    assert!(matches!(orders.get(0), Err(CoreError::ZeroIdentifier)));
    assert!(matches!(orders.delete(0), Err(CoreError::ZeroIdentifier)));
    assert!(matches!(
        orders.put(&order(0, 1.0, "x")),
        Err(CoreError::ZeroIdentifier)
    ));
}

#[test]
fn duplicate_namespace_rejected() {
    let (_dir, store) = open_store();
    store.create_namespace("sales").unwrap();
    assert!(matches!(
        store.create_namespace("sales"),
        Err(CoreError::NameExists { .. })
    ));
}

#[test]
fn unknown_namespace_rejected() {
    let (_dir, store) = open_store();
    assert!(matches!(
        store.namespace("nowhere"),
        Err(CoreError::NameUnknown { .. })
    ));
}

#[test]
fn duplicate_entity_type_rejected() {
    let (_dir, store) = open_store();
    let sales = store.create_namespace("sales").unwrap();
    store.create_entity_type(&sales, "order").unwrap();
    assert!(matches!(
        store.create_entity_type(&sales, "order"),
        Err(CoreError::NameExists { .. })
    ));
}

#[test]
fn same_type_name_in_different_namespaces_is_isolated() {
    let (_dir, store) = open_store();

    let sales = store.create_namespace("sales").unwrap();
    let archive = store.create_namespace("archive").unwrap();
    let live_type = store.create_entity_type(&sales, "order").unwrap();
    let archived_type = store.create_entity_type(&archive, "order").unwrap();

    let live: kist_core::Table<Order> = store.table(&sales, &live_type).unwrap();
    let archived: kist_core::Table<Order> = store.table(&archive, &archived_type).unwrap();

    live.put(&order(1, 1.0, "live")).unwrap();
    assert!(archived.get(1).unwrap().is_none());
}

#[test]
fn catalog_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = Arc::new(Store::open(dir.path()).unwrap());
        let orders = sales_orders(&store);
        orders.put(&order(7, 3.25, "persisted")).unwrap();
    }

    let store = Arc::new(Store::open(dir.path()).unwrap());
    let sales = store.namespace("sales").unwrap();
    assert_eq!(sales.buckets(), vec!["sales:order".to_owned()]);

    let order_type = store.entity_type(&sales, "order").unwrap();
    assert_eq!(order_type.name(), "order");
    let fields = order_type.fields();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "amount");
    assert_eq!(fields[0].id, 1);
    assert_eq!(fields[1].name, "memo");
    assert_eq!(fields[1].id, 2);

    let orders: kist_core::Table<Order> = store.table(&sales, &order_type).unwrap();
    let found = orders.get(7).unwrap().unwrap();
    assert_eq!(found.memo, "persisted");
}

#[test]
fn records_written_by_a_wider_schema_still_decode() {
    // An Order with an extra field only newer code knows about.
    struct WideOrder(Order);

    impl fmt::Display for WideOrder {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fmt(f)
        }
    }

    impl Entity for WideOrder {
        fn id(&self) -> u64 {
            self.0.id
        }
        fn type_name(&self) -> &str {
            "order"
        }
    }

    impl EntityCodec for WideOrder {
        fn to_fields(&self) -> CoreResult<Vec<Field>> {
            let mut fields = self.0.to_fields()?;
            fields.push(Field::new(3, FieldValue::Bool(true))?);
            Ok(fields)
        }
        fn from_fields(key: EntityKey, fields: Vec<Field>) -> CoreResult<Self> {
            Ok(WideOrder(Order::from_fields(key, fields)?))
        }
    }

    let (_dir, store) = open_store();
    let sales = store.create_namespace("sales").unwrap();
    let order_type = store.create_entity_type(&sales, "order").unwrap();

    let wide: kist_core::Table<WideOrder> = store.table(&sales, &order_type).unwrap();
    wide.put(&WideOrder(order(1, 4.5, "new-writer"))).unwrap();

    // The old reader decodes the record, stepping over field 3.
    let narrow: kist_core::Table<Order> = store.table(&sales, &order_type).unwrap();
    let found = narrow.get(1).unwrap().unwrap();
    assert_eq!(found.amount, 4.5);
    assert_eq!(found.memo, "new-writer");
}

#[test]
fn open_rejects_bad_paths() {
    assert!(matches!(
        Store::open(Path::new("")),
        Err(CoreError::PathEmpty)
    ));
    assert!(matches!(
        Store::open(Path::new("relative/dir")),
        Err(CoreError::PathNotAbsolute { .. })
    ));
}

#[test]
fn singleton_caches_initialization_failure() {
    // First acquisition with a bad path fails with the root cause…
    let err = kist_core::instance(Path::new("not-absolute")).unwrap_err();
    assert!(matches!(err, CoreError::PathNotAbsolute { .. }));

    // …later callers get the remembered failure, not a silent retry.
    let err = kist_core::instance(Path::new("not-absolute")).unwrap_err();
    assert!(matches!(err, CoreError::InitFailed { .. }));

    // An explicit re-initialization with a usable path replaces the slot.
    let dir = TempDir::new().unwrap();
    let store = kist_core::initialize(dir.path()).unwrap();
    assert_eq!(store.base(), dir.path());

    // The singleton now answers the opened store, whatever path is given.
    let again = kist_core::instance(Path::new("ignored")).unwrap();
    assert!(Arc::ptr_eq(&store, &again));
}
