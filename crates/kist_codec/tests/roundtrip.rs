//! Property tests for record round-trips.

use kist_codec::{decode_record, decode_record_fields, encode_record, Field, FieldValue};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        any::<bool>().prop_map(FieldValue::Bool),
        any::<i8>().prop_map(FieldValue::Int8),
        any::<i16>().prop_map(FieldValue::Int16),
        any::<i32>().prop_map(FieldValue::Int32),
        any::<i64>().prop_map(FieldValue::Int64),
        any::<u8>().prop_map(FieldValue::Uint8),
        any::<u16>().prop_map(FieldValue::Uint16),
        any::<u32>().prop_map(FieldValue::Uint32),
        any::<u64>().prop_map(FieldValue::Uint64),
        proptest::num::f32::NORMAL.prop_map(FieldValue::Float32),
        proptest::num::f64::NORMAL.prop_map(FieldValue::Float64),
        "[a-z0-9 ]{1,64}".prop_map(FieldValue::Text),
        proptest::collection::vec(any::<u8>(), 1..128).prop_map(FieldValue::Bytes),
        proptest::collection::vec(any::<u8>(), 1..32).prop_map(FieldValue::Reference),
        proptest::collection::vec(any::<u8>(), 1..32).prop_map(FieldValue::Link),
        proptest::collection::vec(any::<u8>(), 1..32).prop_map(FieldValue::Collection),
    ]
}

fn record_strategy() -> impl Strategy<Value = Vec<Field>> {
    proptest::collection::btree_map(1u8..=255, value_strategy(), 0..12).prop_map(|map| {
        map.into_iter()
            .map(|(id, value)| Field::new(id, value).unwrap())
            .collect()
    })
}

proptest! {
    #[test]
    fn encode_decode_roundtrip(fields in record_strategy()) {
        let bytes = encode_record(&fields).unwrap();
        let decoded = decode_record(&bytes).unwrap();
        prop_assert_eq!(decoded, fields);
    }

    #[test]
    fn selective_decode_is_a_subset(fields in record_strategy()) {
        let bytes = encode_record(&fields).unwrap();
        let wanted: Vec<u8> = fields.iter().map(Field::id).step_by(2).collect();
        let decoded = decode_record_fields(&bytes, &wanted).unwrap();
        let expected: Vec<Field> = fields
            .iter()
            .filter(|f| wanted.contains(&f.id()))
            .cloned()
            .collect();
        prop_assert_eq!(decoded, expected);
    }
}
