//! Human-readable record printer.

use crate::handler::RecordHandler;
use crate::record::{AllocSite, ClassDump, CpuSample, Header};
use crate::string_table::StringTable;
use crate::typed_value::{FieldType, Value};

/// Prints every record to stdout, resolving name ids via the string table.
#[derive(Default)]
pub struct PrintHandler {
    strings: StringTable,
}

impl PrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn name(&self, id: u64) -> String {
        self.strings.get_or_hex(id)
    }
}

/// Renders the stack-frame location field (hprof_b_spec line-number codes).
fn location_text(location: i32) -> String {
    match location {
        0 => "no line information available".to_owned(),
        -1 => "unknown location".to_owned(),
        -2 => "compiled method".to_owned(),
        -3 => "native method".to_owned(),
        line => format!("line number {line}"),
    }
}

impl RecordHandler for PrintHandler {
    fn header(&mut self, header: &Header) {
        println!("{}", header.format);
        println!("id size: {}", header.id_size.in_bytes());
        println!("start time: {} ms since epoch", header.timestamp_ms);
    }

    fn string_in_utf8(&mut self, id: u64, data: &str) {
        // Nur merken; aufgelöst wird bei den referenzierenden Records.
        self.strings.insert(id, data);
    }

    fn load_class(
        &mut self,
        class_serial: u32,
        class_obj_id: u64,
        stack_trace_serial: u32,
        class_name_id: u64,
    ) {
        println!("Load Class:");
        println!("    class serial num: {class_serial}");
        println!("    class object id: 0x{class_obj_id:x}");
        println!("    stack trace serial num: {stack_trace_serial}");
        println!("    class name: {}", self.name(class_name_id));
    }

    fn unload_class(&mut self, class_serial: u32) {
        println!("Unload Class:");
        println!("    class serial num: {class_serial}");
    }

    fn stack_frame(
        &mut self,
        stack_frame_id: u64,
        method_name_id: u64,
        method_sig_id: u64,
        source_file_name_id: u64,
        class_serial: u32,
        location: i32,
    ) {
        println!("Stack Frame:");
        println!("    stack frame id: 0x{stack_frame_id:x}");
        println!("    method name: {}", self.name(method_name_id));
        println!("    method signature: {}", self.name(method_sig_id));
        println!("    source file name: {}", self.name(source_file_name_id));
        println!("    class serial num: {class_serial}");
        println!("    location: {}", location_text(location));
    }

    fn stack_trace(
        &mut self,
        stack_trace_serial: u32,
        thread_serial: u32,
        num_frames: u32,
        frame_ids: &[u64],
    ) {
        println!("Stack Trace:");
        println!("    stack trace serial num: {stack_trace_serial}");
        println!("    thread serial num: {thread_serial}");
        println!("    num frames: {num_frames}");
        println!("    stack frame ids:");
        for id in frame_ids {
            println!("        0x{id:x}");
        }
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
        println!("Alloc Sites:");
        println!("    flags: 0x{flags:04x}");
        println!("    incremental: {}", flags & 0x1 != 0);
        println!("    sorted by allocation: {}", flags & 0x2 != 0);
        println!("    force GC: {}", flags & 0x4 != 0);
        println!("    cutoff ratio: {cutoff_ratio}");
        println!("    total live bytes: {live_bytes}");
        println!("    total live instances: {live_instances}");
        println!("    total bytes allocated: {bytes_allocated}");
        println!("    total instances allocated: {instances_allocated}");
        for (i, site) in sites.iter().enumerate() {
            println!("    alloc site {}:", i + 1);
            println!("        array indicator: {}", site.array_indicator);
            println!("        class serial num: {}", site.class_serial);
            println!("        stack trace serial num: {}", site.stack_trace_serial);
            println!("        live bytes: {}", site.live_bytes);
            println!("        live instances: {}", site.live_instances);
            println!("        bytes allocated: {}", site.bytes_allocated);
            println!("        instances allocated: {}", site.instances_allocated);
        }
    }

    fn heap_summary(
        &mut self,
        live_bytes: u32,
        live_instances: u32,
        bytes_allocated: u64,
        instances_allocated: u64,
    ) {
        println!("Heap Summary:");
        println!("    total live bytes: {live_bytes}");
        println!("    total live instances: {live_instances}");
        println!("    total bytes allocated: {bytes_allocated}");
        println!("    total instances allocated: {instances_allocated}");
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
        println!("Start Thread:");
        println!("    thread serial num: {thread_serial}");
        println!("    thread object id: 0x{thread_obj_id:x}");
        println!("    stack trace serial num: {stack_trace_serial}");
        println!("    thread name: {}", self.name(thread_name_id));
        println!("    group name: {}", self.name(group_name_id));
        println!("    parent group name: {}", self.name(parent_group_name_id));
    }

    fn end_thread(&mut self, thread_serial: u32) {
        println!("End Thread:");
        println!("    thread serial num: {thread_serial}");
    }

    fn heap_dump(&mut self) {
        println!("Heap Dump:");
    }

    fn heap_dump_segment(&mut self) {
        println!("Heap Dump Segment:");
    }

    fn heap_dump_end(&mut self) {
        println!("Heap Dump End");
    }

    fn cpu_samples(&mut self, total_samples: u32, samples: &[CpuSample]) {
        println!("CPU Samples:");
        println!("    total num samples: {total_samples}");
        for sample in samples {
            println!(
                "    {} samples at stack trace {}",
                sample.sample_count, sample.stack_trace_serial
            );
        }
    }

    fn control_settings(&mut self, flags: u32, stack_trace_depth: u16) {
        println!("Control Settings:");
        println!("    flags: 0x{flags:08x}");
        println!("    alloc traces on: {}", flags & 0x1 != 0);
        println!("    CPU sampling on: {}", flags & 0x2 != 0);
        println!("    stack trace depth: {stack_trace_depth}");
    }

    fn root_unknown(&mut self, obj_id: u64) {
        println!("Root Unknown: 0x{obj_id:x}");
    }

    fn root_jni_global(&mut self, obj_id: u64, jni_global_ref_id: u64) {
        println!("Root JNI Global: 0x{obj_id:x} (ref id 0x{jni_global_ref_id:x})");
    }

    fn root_jni_local(&mut self, obj_id: u64, thread_serial: u32, frame_index: u32) {
        println!("Root JNI Local: 0x{obj_id:x} (thread {thread_serial}, frame {frame_index})");
    }

    fn root_java_frame(&mut self, obj_id: u64, thread_serial: u32, frame_index: u32) {
        println!("Root Java Frame: 0x{obj_id:x} (thread {thread_serial}, frame {frame_index})");
    }

    fn root_native_stack(&mut self, obj_id: u64, thread_serial: u32) {
        println!("Root Native Stack: 0x{obj_id:x} (thread {thread_serial})");
    }

    fn root_sticky_class(&mut self, obj_id: u64) {
        println!("Root Sticky Class: 0x{obj_id:x}");
    }

    fn root_thread_block(&mut self, obj_id: u64, thread_serial: u32) {
        println!("Root Thread Block: 0x{obj_id:x} (thread {thread_serial})");
    }

    fn root_monitor_used(&mut self, obj_id: u64) {
        println!("Root Monitor Used: 0x{obj_id:x}");
    }

    fn root_thread_object(&mut self, obj_id: u64, thread_serial: u32, stack_trace_serial: u32) {
        println!(
            "Root Thread Object: 0x{obj_id:x} (thread {thread_serial}, stack trace {stack_trace_serial})"
        );
    }

    fn class_dump(&mut self, dump: &ClassDump) {
        println!("Class Dump:");
        println!("    class object id: 0x{:x}", dump.class_obj_id);
        println!("    stack trace serial num: {}", dump.stack_trace_serial);
        println!("    superclass object id: 0x{:x}", dump.super_class_obj_id);
        println!("    class loader object id: 0x{:x}", dump.class_loader_obj_id);
        println!("    signers object id: 0x{:x}", dump.signers_obj_id);
        println!(
            "    protection domain object id: 0x{:x}",
            dump.protection_domain_obj_id
        );
        println!("    instance size: {} bytes", dump.instance_size);
        for constant in &dump.constants {
            println!(
                "    constant pool entry {}: {} {}",
                constant.pool_index,
                constant.value.field_type(),
                constant.value
            );
        }
        for field in &dump.statics {
            println!(
                "    static field {}: {} {}",
                self.name(field.name_id),
                field.value.field_type(),
                field.value
            );
        }
        for field in &dump.instance_fields {
            println!(
                "    instance field {}: {}",
                self.name(field.name_id),
                field.field_type
            );
        }
    }

    fn instance_dump(
        &mut self,
        obj_id: u64,
        stack_trace_serial: u32,
        class_obj_id: u64,
        values: &[Value],
    ) {
        println!("Instance Dump:");
        println!("    object id: 0x{obj_id:x}");
        println!("    stack trace serial num: {stack_trace_serial}");
        println!("    class object id: 0x{class_obj_id:x}");
        for value in values {
            println!("    {} {}", value.field_type(), value);
        }
    }

    fn obj_array_dump(
        &mut self,
        obj_id: u64,
        stack_trace_serial: u32,
        elem_class_obj_id: u64,
        elements: &[u64],
    ) {
        println!("Object Array Dump:");
        println!("    object id: 0x{obj_id:x}");
        println!("    stack trace serial num: {stack_trace_serial}");
        println!("    element class object id: 0x{elem_class_obj_id:x}");
        println!("    length: {}", elements.len());
        for elem in elements {
            println!("    0x{elem:x}");
        }
    }

    fn prim_array_dump(
        &mut self,
        obj_id: u64,
        stack_trace_serial: u32,
        elem_type: FieldType,
        elements: &[Value],
    ) {
        println!("Primitive Array Dump:");
        println!("    object id: 0x{obj_id:x}");
        println!("    stack trace serial num: {stack_trace_serial}");
        println!("    element type: {elem_type}");
        println!("    length: {}", elements.len());
        for elem in elements {
            println!("    {elem}");
        }
    }

    fn finished(&mut self) {
        println!("Finished.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_codes() {
        assert_eq!(location_text(0), "no line information available");
        assert_eq!(location_text(-1), "unknown location");
        assert_eq!(location_text(-2), "compiled method");
        assert_eq!(location_text(-3), "native method");
        assert_eq!(location_text(42), "line number 42");
    }

    #[test]
    fn string_records_feed_the_table() {
        let mut h = PrintHandler::new();
        h.string_in_utf8(1, "Main");
        assert_eq!(h.name(1), "Main");
        assert_eq!(h.name(2), "0x2");
    }
}
