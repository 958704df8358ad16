//! Class metadata registry.
//!
//! Class-dump sub-records can appear in the file *after* instance dumps that
//! reference them, so instance field layouts are only known once the whole
//! file has been read. Pass 1 fills this registry from every class dump;
//! pass 2 reads it to resolve packed instance bytes into typed values.
//!
//! Lifecycle: owned by one parse run, append/overwrite only, never pruned.

use log::warn;

use crate::record::InstanceField;
use crate::{Error, FastHashMap, Result};

/// The subset of a class dump needed to interpret instance records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLayout {
    /// 0 terminates the superclass chain.
    pub super_class_obj_id: u64,
    pub instance_size: u32,
    /// Declared instance fields, in declaration order.
    pub instance_fields: Vec<InstanceField>,
}

/// Map from class object id to its layout.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: FastHashMap<u64, ClassLayout>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or re-registers) a class layout.
    ///
    /// A second class dump for the same id replaces the first; unload/reload
    /// is not modelled beyond that.
    pub fn insert(&mut self, class_obj_id: u64, layout: ClassLayout) {
        if self.classes.insert(class_obj_id, layout).is_some() {
            warn!("class 0x{class_obj_id:x} redefined by a later class dump");
        }
    }

    /// Looks up a layout; a miss means the dump is internally inconsistent.
    pub fn get(&self, class_obj_id: u64) -> Result<&ClassLayout> {
        self.classes
            .get(&class_obj_id)
            .ok_or(Error::UnknownClass(class_obj_id))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed_value::FieldType;

    fn layout(super_id: u64, fields: &[(u64, FieldType)]) -> ClassLayout {
        ClassLayout {
            super_class_obj_id: super_id,
            instance_size: 0,
            instance_fields: fields
                .iter()
                .map(|&(name_id, field_type)| InstanceField {
                    name_id,
                    field_type,
                })
                .collect(),
        }
    }

    #[test]
    fn insert_and_get() {
        let mut reg = ClassRegistry::new();
        reg.insert(100, layout(0, &[(1, FieldType::Int)]));
        let l = reg.get(100).unwrap();
        assert_eq!(l.super_class_obj_id, 0);
        assert_eq!(l.instance_fields.len(), 1);
    }

    #[test]
    fn missing_class_is_fatal() {
        let reg = ClassRegistry::new();
        assert_eq!(reg.get(42).unwrap_err(), Error::UnknownClass(42));
    }

    #[test]
    fn later_dump_replaces_earlier() {
        let mut reg = ClassRegistry::new();
        reg.insert(100, layout(0, &[(1, FieldType::Int)]));
        reg.insert(100, layout(7, &[]));
        let l = reg.get(100).unwrap();
        assert_eq!(l.super_class_obj_id, 7);
        assert!(l.instance_fields.is_empty());
        assert_eq!(reg.len(), 1);
    }
}
