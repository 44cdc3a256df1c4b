//! Immutable record types.
//!
//! A [`RecordType`] is an ordered list of attribute names fixed when it is
//! defined. A [`Record`] holds exactly one [`Value`] per attribute, is checked
//! when it is built and never changes afterwards. Records compare, hash and
//! print by their type and values.
//!
//! ```
//! use immutable_record::{RecordType, RecordError, Symbol, attrs};
//!
//! let item = RecordType::from_names(Some("Item"), &["foo", "bar"]);
//! let value = item.construct(attrs! { foo: 1, bar: 2 }).unwrap();
//! assert_eq!(value.to_string(), "Item[foo=1, bar=2]");
//!
//! assert_eq!(
//!     item.construct(attrs! { bar: 2 }),
//!     Err(RecordError::MissingAttributes(vec![Symbol::intern("foo")])),
//! );
//!
//! let changed = value.with_changes(attrs! { foo: 10 }).unwrap();
//! assert_eq!(changed, item.construct(attrs! { foo: 10, bar: 2 }).unwrap());
//! ```

extern crate self as immutable_record;

pub mod error;
pub mod pretty;
pub mod records;
pub mod symbols;
pub mod value;

pub use error::RecordError;
pub use immutable_record_macros::Record;
pub use pretty::DEFAULT_WIDTH;
pub use records::{Attributes, HasRecordType, Record, RecordType};
pub use symbols::Symbol;
pub use value::{Opaque, Value};
