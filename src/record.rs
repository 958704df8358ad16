//! Structured record payloads handed to consumers.
//!
//! These mirror the wire layouts in hprof_b_spec one-to-one; name and class
//! identifiers are forwarded raw. Resolving them against the string table is
//! the consumer's business, never the engine's.

use crate::id::IdSize;
use crate::typed_value::{FieldType, Value};

/// The file header: format banner, identifier width, start timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Null-terminated format string, e.g. "JAVA PROFILE 1.0.2".
    pub format: String,
    /// Identifier width for the whole file.
    pub id_size: IdSize,
    /// Dump start time, milliseconds since the epoch.
    pub timestamp_ms: u64,
}

/// One entry of an allocation-sites record (tag 0x06).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocSite {
    /// 0 = not an array; otherwise the basic type tag of the array.
    pub array_indicator: u8,
    pub class_serial: u32,
    pub stack_trace_serial: u32,
    pub live_bytes: u32,
    pub live_instances: u32,
    pub bytes_allocated: u32,
    pub instances_allocated: u32,
}

/// One entry of a CPU-samples record (tag 0x0d).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuSample {
    pub sample_count: u32,
    pub stack_trace_serial: u32,
}

/// A constant-pool entry of a class dump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    pub pool_index: u16,
    pub value: Value,
}

/// A static field of a class dump: name id plus the value itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticField {
    pub name_id: u64,
    pub value: Value,
}

/// An instance field declaration: name id and type, but no value.
///
/// Werte von Instanzfeldern liegen gepackt in den Instance-Dump-Records,
/// nicht im Class Dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceField {
    pub name_id: u64,
    pub field_type: FieldType,
}

/// A decoded class-dump sub-record (tag 0x20).
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDump {
    pub class_obj_id: u64,
    pub stack_trace_serial: u32,
    /// 0 means the class has no superclass.
    pub super_class_obj_id: u64,
    pub class_loader_obj_id: u64,
    pub signers_obj_id: u64,
    pub protection_domain_obj_id: u64,
    pub reserved1: u64,
    pub reserved2: u64,
    /// Declared instance size in bytes (advisory; actual packed size is
    /// determined by the field list along the superclass chain).
    pub instance_size: u32,
    pub constants: Vec<Constant>,
    pub statics: Vec<StaticField>,
    pub instance_fields: Vec<InstanceField>,
}
