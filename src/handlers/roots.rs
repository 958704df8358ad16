//! GC-root census.

use crate::handler::RecordHandler;

/// Counts every GC root by kind and prints a summary at the end.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RootCounter {
    pub unknown: u64,
    pub jni_global: u64,
    pub jni_local: u64,
    pub java_frame: u64,
    pub native_stack: u64,
    pub sticky_class: u64,
    pub thread_block: u64,
    pub monitor_used: u64,
    pub thread_object: u64,
}

impl RootCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roots of all kinds combined.
    pub fn total(&self) -> u64 {
        self.unknown
            + self.jni_global
            + self.jni_local
            + self.java_frame
            + self.native_stack
            + self.sticky_class
            + self.thread_block
            + self.monitor_used
            + self.thread_object
    }
}

impl RecordHandler for RootCounter {
    fn root_unknown(&mut self, _obj_id: u64) {
        self.unknown += 1;
    }

    fn root_jni_global(&mut self, _obj_id: u64, _jni_global_ref_id: u64) {
        self.jni_global += 1;
    }

    fn root_jni_local(&mut self, _obj_id: u64, _thread_serial: u32, _frame_index: u32) {
        self.jni_local += 1;
    }

    fn root_java_frame(&mut self, _obj_id: u64, _thread_serial: u32, _frame_index: u32) {
        self.java_frame += 1;
    }

    fn root_native_stack(&mut self, _obj_id: u64, _thread_serial: u32) {
        self.native_stack += 1;
    }

    fn root_sticky_class(&mut self, _obj_id: u64) {
        self.sticky_class += 1;
    }

    fn root_thread_block(&mut self, _obj_id: u64, _thread_serial: u32) {
        self.thread_block += 1;
    }

    fn root_monitor_used(&mut self, _obj_id: u64) {
        self.monitor_used += 1;
    }

    fn root_thread_object(&mut self, _obj_id: u64, _thread_serial: u32, _stack_trace_serial: u32) {
        self.thread_object += 1;
    }

    fn finished(&mut self) {
        println!("GC roots:");
        println!("    unknown:        {}", self.unknown);
        println!("    JNI global:     {}", self.jni_global);
        println!("    JNI local:      {}", self.jni_local);
        println!("    Java frame:     {}", self.java_frame);
        println!("    native stack:   {}", self.native_stack);
        println!("    sticky class:   {}", self.sticky_class);
        println!("    thread block:   {}", self.thread_block);
        println!("    monitor used:   {}", self.monitor_used);
        println!("    thread object:  {}", self.thread_object);
        println!("    total:          {}", self.total());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_kind_separately() {
        let mut c = RootCounter::new();
        c.root_unknown(0x10);
        c.root_jni_global(0x11, 0x99);
        c.root_jni_global(0x12, 0x9a);
        c.root_thread_object(0x13, 1, 2);
        assert_eq!(c.unknown, 1);
        assert_eq!(c.jni_global, 2);
        assert_eq!(c.thread_object, 1);
        assert_eq!(c.total(), 4);
    }
}
