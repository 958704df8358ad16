//! Consumer-side string table.
//!
//! The engine forwards raw name identifiers and never resolves them; a
//! consumer that wants readable class, field or method names records the
//! `string_in_utf8` callbacks here and looks names up on demand.
//!
//! Lifecycle: one table per parse run. String records precede the records
//! that reference them in well-formed dumps, but a lookup miss is not an
//! error at this layer — the id is simply unknown.

use std::rc::Rc;

use crate::FastHashMap;

/// Map from HPROF string id to decoded UTF-8 text.
#[derive(Debug, Default, Clone)]
pub struct StringTable {
    strings: FastHashMap<u64, Rc<str>>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a string definition. A duplicate id keeps the latest text.
    pub fn insert(&mut self, id: u64, data: &str) {
        self.strings.insert(id, Rc::from(data));
    }

    /// Resolves an id to its text, if defined.
    pub fn get(&self, id: u64) -> Option<&str> {
        self.strings.get(&id).map(AsRef::as_ref)
    }

    /// Resolves an id, falling back to a hex rendering of the raw id.
    pub fn get_or_hex(&self, id: u64) -> String {
        match self.get(id) {
            Some(s) => s.to_owned(),
            None => format!("0x{id:x}"),
        }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
