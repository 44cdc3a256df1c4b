//! Record types and the immutable records built from them.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use indexmap::IndexMap;

use crate::{error::RecordError, pretty, symbols::Symbol, value::Value};

/// Attribute values keyed by name, in declaration (or insertion) order.
pub type Attributes = IndexMap<Symbol, Value>;

static NEXT_RECORD_TYPE_ID: AtomicU64 = AtomicU64::new(0);

/// Type declaration for a record.
///
/// Every call to [`RecordType::define`] produces a new type, even when the
/// attribute list matches an existing one. Records of different types never
/// compare equal.
#[derive(derive_more::Debug)]
pub struct RecordType {
    id: u64,
    name: Option<Arc<str>>,
    fields: Arc<[Symbol]>,
    /// First slot of each distinct name. Later duplicates alias to it.
    #[debug(skip)]
    slots: IndexMap<Symbol, usize>,
}

impl RecordType {
    /// Defines a new record type. Every attribute must be a symbol.
    pub fn define<I>(name: Option<&str>, attributes: I) -> Result<Arc<Self>, RecordError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let fields = attributes
            .into_iter()
            .map(|attr| match attr.into() {
                Value::Symbol(sym) => Ok(sym),
                other => Err(RecordError::InvalidAttributeName(other.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_fields(name, fields))
    }

    pub fn define_anonymous<I>(attributes: I) -> Result<Arc<Self>, RecordError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::define(None, attributes)
    }

    /// Defines a new record type from attribute names given as text.
    pub fn from_names(name: Option<&str>, names: &[&str]) -> Arc<Self> {
        Self::from_fields(name, names.iter().copied().map(Symbol::intern).collect())
    }

    fn from_fields(name: Option<&str>, fields: Vec<Symbol>) -> Arc<Self> {
        let mut slots = IndexMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            slots.entry(*field).or_insert(i);
        }
        let rtd = Arc::new(Self {
            id: NEXT_RECORD_TYPE_ID.fetch_add(1, Ordering::Relaxed),
            name: name.map(Arc::from),
            fields: Arc::from(fields),
            slots,
        });
        if rtd.has_aliased_attributes() {
            tracing::warn!(
                record_type = %rtd.display_name(),
                attributes = ?rtd.fields,
                "duplicate attribute names alias to their first slot"
            );
        }
        tracing::debug!(
            record_type = %rtd.display_name(),
            attributes = ?rtd.fields,
            "defined record type"
        );
        rtd
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The declared name, or a placeholder unique to this type if it has none.
    ///
    /// Placeholders start with `#<`. A declared name starting with `#<` or `"`
    /// is printed quoted, so it can never read as a placeholder or as another
    /// quoted name.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if name.starts_with("#<") || name.starts_with('"') => format!("{name:?}"),
            Some(name) => name.to_string(),
            None => format!("#<record-type:{}>", self.id),
        }
    }

    /// Attribute names exactly as declared, duplicates included.
    pub fn attributes(&self) -> &[Symbol] {
        &self.fields
    }

    pub fn index_of(&self, name: Symbol) -> Option<usize> {
        self.slots.get(&name).copied()
    }

    pub fn has_attribute(&self, name: Symbol) -> bool {
        self.slots.contains_key(&name)
    }

    pub fn has_aliased_attributes(&self) -> bool {
        self.slots.len() != self.fields.len()
    }

    pub fn construct<I, K, V>(self: &Arc<Self>, values: I) -> Result<Record, RecordError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Record::new(self.clone(), values)
    }

    /// Shorthand for [`RecordType::construct`].
    pub fn of<I, K, V>(self: &Arc<Self>, values: I) -> Result<Record, RecordError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        self.construct(values)
    }
}

impl PartialEq for RecordType {
    fn eq(&self, rhs: &Self) -> bool {
        self.id == rhs.id
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// An immutable instance of a [`RecordType`].
///
/// Cloning a `Record` shares its storage; [`Record::is`] tells the two apart
/// from a structural copy made with [`Record::duplicate`].
#[derive(Clone)]
pub struct Record {
    rtd: Arc<RecordType>,
    fields: Arc<[Value]>,
}

impl Record {
    /// Builds a record, checking first for missing and then for unknown
    /// attributes. Keys that are not symbols are always unknown.
    pub fn new<I, K, V>(rtd: Arc<RecordType>, values: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let values: IndexMap<Value, Value> = values
            .into_iter()
            .map(|(key, val)| (key.into(), val.into()))
            .collect();

        let missing = rtd
            .slots
            .keys()
            .filter(|name| !values.contains_key(&Value::Symbol(**name)))
            .copied()
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(RecordError::MissingAttributes(missing));
        }

        let unknown = values
            .keys()
            .filter(|key| !key.as_symbol().is_some_and(|name| rtd.has_attribute(name)))
            .cloned()
            .collect::<Vec<_>>();
        if !unknown.is_empty() {
            return Err(RecordError::UnknownAttributes(unknown));
        }

        let fields = rtd
            .fields
            .iter()
            .map(|name| {
                values
                    .get(&Value::Symbol(*name))
                    .cloned()
                    .ok_or_else(|| RecordError::MissingAttributes(vec![*name]))
            })
            .collect::<Result<Arc<[Value]>, _>>()?;

        tracing::trace!(record_type = %rtd.display_name(), "constructed record");

        Ok(Self { rtd, fields })
    }

    /// Builds a record from a Rust value. `into_values` must yield one value
    /// per declared attribute; aliased attributes take the value of their
    /// first slot, as in [`Record::new`].
    pub fn from_rust_type<T: HasRecordType>(t: T) -> Result<Self, RecordError> {
        let rtd = T::record_type();
        let values = t.into_values();
        if values.len() != rtd.fields.len() {
            return Err(RecordError::WrongNumberOfValues {
                expected: rtd.fields.len(),
                provided: values.len(),
            });
        }
        let fields = rtd
            .fields
            .iter()
            .map(|name| {
                rtd.index_of(*name)
                    .and_then(|i| values.get(i))
                    .cloned()
                    .ok_or_else(|| RecordError::MissingAttributes(vec![*name]))
            })
            .collect::<Result<Arc<[Value]>, _>>()?;
        Ok(Self { rtd, fields })
    }

    pub fn try_into_rust<T: HasRecordType>(&self) -> Result<T, RecordError> {
        let rtd = T::record_type();
        if rtd != self.rtd {
            return Err(RecordError::WrongRecordType {
                expected: rtd.display_name(),
                provided: self.rtd.display_name(),
            });
        }
        T::from_values(self.fields.to_vec())
    }

    pub fn rtd(&self) -> &Arc<RecordType> {
        &self.rtd
    }

    /// Reads an attribute by name. Unknown names are not interned.
    pub fn get(&self, name: &str) -> Result<&Value, RecordError> {
        Symbol::lookup(name)
            .and_then(|sym| self.slot(sym))
            .ok_or_else(|| RecordError::NoSuchAttribute(name.to_string()))
    }

    pub fn get_symbol(&self, name: Symbol) -> Result<&Value, RecordError> {
        self.slot(name)
            .ok_or_else(|| RecordError::NoSuchAttribute(name.to_string()))
    }

    fn slot(&self, name: Symbol) -> Option<&Value> {
        self.rtd.index_of(name).and_then(|i| self.fields.get(i))
    }

    /// Attribute values in declaration order.
    pub fn values(&self) -> &[Value] {
        &self.fields
    }

    pub fn attributes(&self) -> Attributes {
        self.rtd
            .fields
            .iter()
            .copied()
            .zip(self.fields.iter().cloned())
            .collect()
    }

    /// Whether both handles refer to the same instance.
    pub fn is(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }

    /// A new instance equal to this one.
    pub fn duplicate(&self) -> Result<Self, RecordError> {
        self.with_changes(Attributes::new())
    }

    pub fn with_changes<I, K, V>(&self, overrides: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        self.with_changes_by(overrides, |_| Attributes::new())
    }

    /// Copies this record with `overrides` applied, then with whatever
    /// `transform` returns applied on top. `transform` sees the named
    /// attributes after overriding. The result is validated like a fresh
    /// construction.
    pub fn with_changes_by<I, K, V, F, R, K2, V2>(
        &self,
        overrides: I,
        transform: F,
    ) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
        F: FnOnce(&Attributes) -> R,
        R: IntoIterator<Item = (K2, V2)>,
        K2: Into<Value>,
        V2: Into<Value>,
    {
        let mut merged: IndexMap<Value, Value> = self
            .rtd
            .fields
            .iter()
            .map(|name| Value::Symbol(*name))
            .zip(self.fields.iter().cloned())
            .collect();
        merged.extend(
            overrides
                .into_iter()
                .map(|(key, val)| (key.into(), val.into())),
        );

        let named: Attributes = merged
            .iter()
            .filter_map(|(key, val)| Some((key.as_symbol()?, val.clone())))
            .collect();
        merged.extend(
            transform(&named)
                .into_iter()
                .map(|(key, val)| (key.into(), val.into())),
        );

        Self::new(self.rtd.clone(), merged)
    }

    pub fn to_pretty_string(&self, width: usize) -> String {
        pretty::record(self, width)
    }
}

impl PartialEq for Record {
    fn eq(&self, rhs: &Self) -> bool {
        self.rtd == rhs.rtd && self.fields == rhs.fields
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rtd.hash(state);
        self.fields.hash(state);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.rtd.display_name())?;
        for (i, (name, value)) in self.rtd.fields.iter().zip(self.fields.iter()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A Rust type with a record type of its own. Usually derived with
/// `#[derive(Record)]`.
pub trait HasRecordType: Sized {
    fn record_type() -> Arc<RecordType>;

    /// Attribute values in the order the record type declares them.
    fn into_values(self) -> Vec<Value>;

    fn from_values(values: Vec<Value>) -> Result<Self, RecordError>;
}

/// Builds [`Attributes`] from `name: value` pairs.
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::records::Attributes::new()
    };
    ( $( $name:ident : $value:expr ),+ $(,)? ) => {{
        let mut attrs = $crate::records::Attributes::new();
        $(
            attrs.insert(
                $crate::symbols::Symbol::intern(stringify!($name)),
                ::core::convert::Into::<$crate::value::Value>::into($value),
            );
        )+
        attrs
    }};
}
