//! Interned symbols

use std::{
    fmt,
    sync::{Arc, LazyLock},
};

use indexmap::IndexSet;
use parking_lot::RwLock;

/// An interned name. Two symbols are equal iff they were interned from the
/// same text.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(pub(crate) u32);

static SYMTAB: LazyLock<RwLock<IndexSet<Arc<str>>>> =
    LazyLock::new(|| RwLock::new(IndexSet::new()));

impl Symbol {
    pub fn intern(s: &str) -> Self {
        if let Some(id) = SYMTAB.read().get_index_of(s) {
            return Self(id as u32);
        }
        // Another thread may have interned the same text between the read and
        // the write, so insert_full is used to pick up the existing index.
        let (id, _) = SYMTAB.write().insert_full(Arc::from(s));
        Self(id as u32)
    }

    pub fn to_str(self) -> Arc<str> {
        SYMTAB.read()[self.0 as usize].clone()
    }

    /// The symbol for `s` if it has been interned already. Never adds to the
    /// table.
    pub fn lookup(s: &str) -> Option<Self> {
        SYMTAB.read().get_index_of(s).map(|id| Self(id as u32))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::intern(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::intern(&s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl PartialEq<&'_ str> for Symbol {
    fn eq(&self, rhs: &&str) -> bool {
        self.to_str().as_ref() == *rhs
    }
}
