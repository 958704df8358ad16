//! Consumer protocol.
//!
//! The parser drives exactly one [`RecordHandler`] per run, invoking one
//! method per decoded record. Every method defaults to a no-op, so a
//! consumer implements only what it needs. No decoding logic belongs here.
//!
//! Slice arguments are always present — an empty slice, never an absent
//! one — so consumers need no missing-value checks.

use crate::record::{AllocSite, ClassDump, CpuSample, Header};
use crate::typed_value::{FieldType, Value};

/// Callback surface for one parse run.
///
/// Delivery is streaming: callbacks arrive while the file is still being
/// decoded, and a later decode error means no further callbacks (including
/// [`finished`](Self::finished)) will arrive.
///
/// Ordering guarantees:
/// - [`header`](Self::header) is first.
/// - [`heap_summary`](Self::heap_summary), [`heap_dump_end`](Self::heap_dump_end)
///   and [`instance_dump`](Self::instance_dump) arrive only after every
///   [`class_dump`](Self::class_dump) and [`load_class`](Self::load_class)
///   of the run (second traversal).
/// - [`finished`](Self::finished) is delivered exactly once, last.
#[allow(unused_variables)]
pub trait RecordHandler {
    // --- file header ---

    fn header(&mut self, header: &Header) {}

    // --- top-level records ---

    /// UTF-8 string definition (tag 0x01). `id` is referenced by later
    /// records as a name identifier.
    fn string_in_utf8(&mut self, id: u64, data: &str) {}

    fn load_class(
        &mut self,
        class_serial: u32,
        class_obj_id: u64,
        stack_trace_serial: u32,
        class_name_id: u64,
    ) {
    }

    fn unload_class(&mut self, class_serial: u32) {}

    fn stack_frame(
        &mut self,
        stack_frame_id: u64,
        method_name_id: u64,
        method_sig_id: u64,
        source_file_name_id: u64,
        class_serial: u32,
        location: i32,
    ) {
    }

    fn stack_trace(
        &mut self,
        stack_trace_serial: u32,
        thread_serial: u32,
        num_frames: u32,
        frame_ids: &[u64],
    ) {
    }

    fn alloc_sites(
        &mut self,
        flags: u16,
        cutoff_ratio: f32,
        live_bytes: u32,
        live_instances: u32,
        bytes_allocated: u64,
        instances_allocated: u64,
        sites: &[AllocSite],
    ) {
    }

    /// Heap summary (tag 0x07). Delivered during the second traversal only.
    fn heap_summary(
        &mut self,
        live_bytes: u32,
        live_instances: u32,
        bytes_allocated: u64,
        instances_allocated: u64,
    ) {
    }

    fn start_thread(
        &mut self,
        thread_serial: u32,
        thread_obj_id: u64,
        stack_trace_serial: u32,
        thread_name_id: u64,
        group_name_id: u64,
        parent_group_name_id: u64,
    ) {
    }

    fn end_thread(&mut self, thread_serial: u32) {}

    /// Begin of a monolithic heap dump (tag 0x0c).
    fn heap_dump(&mut self) {}

    /// Begin of one heap-dump segment (tag 0x1c).
    fn heap_dump_segment(&mut self) {}

    /// End of the heap dump (tag 0x2c, or implicitly after a monolithic
    /// 0x0c record). Delivered during the second traversal only.
    fn heap_dump_end(&mut self) {}

    fn cpu_samples(&mut self, total_samples: u32, samples: &[CpuSample]) {}

    fn control_settings(&mut self, flags: u32, stack_trace_depth: u16) {}

    // --- heap-dump sub-records: GC roots ---

    fn root_unknown(&mut self, obj_id: u64) {}

    fn root_jni_global(&mut self, obj_id: u64, jni_global_ref_id: u64) {}

    fn root_jni_local(&mut self, obj_id: u64, thread_serial: u32, frame_index: u32) {}

    fn root_java_frame(&mut self, obj_id: u64, thread_serial: u32, frame_index: u32) {}

    fn root_native_stack(&mut self, obj_id: u64, thread_serial: u32) {}

    fn root_sticky_class(&mut self, obj_id: u64) {}

    fn root_thread_block(&mut self, obj_id: u64, thread_serial: u32) {}

    fn root_monitor_used(&mut self, obj_id: u64) {}

    fn root_thread_object(&mut self, obj_id: u64, thread_serial: u32, stack_trace_serial: u32) {}

    // --- heap-dump sub-records: objects ---

    fn class_dump(&mut self, dump: &ClassDump) {}

    /// One object instance with its field values fully resolved against the
    /// class hierarchy, in subclass-to-root declaration order. Delivered
    /// during the second traversal only.
    fn instance_dump(
        &mut self,
        obj_id: u64,
        stack_trace_serial: u32,
        class_obj_id: u64,
        values: &[Value],
    ) {
    }

    fn obj_array_dump(
        &mut self,
        obj_id: u64,
        stack_trace_serial: u32,
        elem_class_obj_id: u64,
        elements: &[u64],
    ) {
    }

    fn prim_array_dump(
        &mut self,
        obj_id: u64,
        stack_trace_serial: u32,
        elem_type: FieldType,
        elements: &[Value],
    ) {
    }

    // --- end of run ---

    /// Delivered exactly once, after the second traversal completed.
    fn finished(&mut self) {}
}
