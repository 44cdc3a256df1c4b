//! Shapes shared by the integration tests

use std::sync::{Arc, LazyLock};

use immutable_record::{Record, RecordType, Symbol, Value, attrs};

pub static ITEM: LazyLock<Arc<RecordType>> =
    LazyLock::new(|| RecordType::from_names(Some("Item"), &["foo", "bar"]));

/// Same attribute names as `ITEM`, but a different type.
pub static SIMILAR_ITEM: LazyLock<Arc<RecordType>> =
    LazyLock::new(|| RecordType::from_names(Some("SimilarItem"), &["foo", "bar"]));

pub fn item(foo: impl Into<Value>, bar: impl Into<Value>) -> Record {
    ITEM.construct(attrs! { foo: foo, bar: bar })
        .expect("valid Item")
}

pub fn int(attrs: &immutable_record::Attributes, name: &str) -> i64 {
    attrs
        .get(&Symbol::intern(name))
        .cloned()
        .map(i64::try_from)
        .expect("attribute present")
        .expect("integer attribute")
}
