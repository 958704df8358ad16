//! Synthetic HPROF images for integration tests.

#![allow(dead_code)]

use rhprof::{FieldType, IdSize};

pub fn put_id(id_size: IdSize, id: u64, out: &mut Vec<u8>) {
    match id_size {
        IdSize::U4 => out.extend_from_slice(&(id as u32).to_be_bytes()),
        IdSize::U8 => out.extend_from_slice(&id.to_be_bytes()),
    }
}

/// Builds a well-formed dump record by record.
pub struct DumpBuilder {
    pub id_size: IdSize,
    bytes: Vec<u8>,
}

impl DumpBuilder {
    pub fn new(id_size: IdSize) -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"JAVA PROFILE 1.0.2\0");
        bytes.extend_from_slice(&(id_size.in_bytes() as u32).to_be_bytes());
        bytes.extend_from_slice(&1_700_000_000_000u64.to_be_bytes());
        Self { id_size, bytes }
    }

    pub fn record(&mut self, tag: u8, body: &[u8]) -> &mut Self {
        self.bytes.push(tag);
        self.bytes.extend_from_slice(&0u32.to_be_bytes());
        self.bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
        self.bytes.extend_from_slice(body);
        self
    }

    pub fn string(&mut self, id: u64, text: &str) -> &mut Self {
        let mut body = Vec::new();
        put_id(self.id_size, id, &mut body);
        body.extend_from_slice(text.as_bytes());
        self.record(0x01, &body)
    }

    pub fn load_class(&mut self, serial: u32, class_obj_id: u64, name_id: u64) -> &mut Self {
        let mut body = Vec::new();
        body.extend_from_slice(&serial.to_be_bytes());
        put_id(self.id_size, class_obj_id, &mut body);
        body.extend_from_slice(&0u32.to_be_bytes());
        put_id(self.id_size, name_id, &mut body);
        self.record(0x02, &body)
    }

    pub fn heap_dump_segment(&mut self, sub_records: &[u8]) -> &mut Self {
        self.record(0x1c, sub_records)
    }

    pub fn heap_dump_end(&mut self) -> &mut Self {
        self.record(0x2c, &[])
    }

    pub fn heap_summary(
        &mut self,
        live_bytes: u32,
        live_instances: u32,
        bytes_allocated: u64,
        instances_allocated: u64,
    ) -> &mut Self {
        let mut body = Vec::new();
        body.extend_from_slice(&live_bytes.to_be_bytes());
        body.extend_from_slice(&live_instances.to_be_bytes());
        body.extend_from_slice(&bytes_allocated.to_be_bytes());
        body.extend_from_slice(&instances_allocated.to_be_bytes());
        self.record(0x07, &body)
    }

    pub fn build(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// Class dump sub-record without constants or statics.
pub fn class_dump_sub(
    id_size: IdSize,
    class_obj_id: u64,
    super_class_obj_id: u64,
    instance_size: u32,
    fields: &[(u64, FieldType)],
) -> Vec<u8> {
    let mut b = vec![0x20];
    put_id(id_size, class_obj_id, &mut b);
    b.extend_from_slice(&0u32.to_be_bytes());
    put_id(id_size, super_class_obj_id, &mut b);
    for _ in 0..5 {
        put_id(id_size, 0, &mut b);
    }
    b.extend_from_slice(&instance_size.to_be_bytes());
    b.extend_from_slice(&0u16.to_be_bytes());
    b.extend_from_slice(&0u16.to_be_bytes());
    b.extend_from_slice(&(fields.len() as u16).to_be_bytes());
    for &(name_id, ty) in fields {
        put_id(id_size, name_id, &mut b);
        b.push(ty.tag());
    }
    b
}

pub fn instance_sub(id_size: IdSize, obj_id: u64, class_obj_id: u64, blob: &[u8]) -> Vec<u8> {
    let mut b = vec![0x21];
    put_id(id_size, obj_id, &mut b);
    b.extend_from_slice(&0u32.to_be_bytes());
    put_id(id_size, class_obj_id, &mut b);
    b.extend_from_slice(&(blob.len() as u32).to_be_bytes());
    b.extend_from_slice(blob);
    b
}

pub fn obj_array_sub(
    id_size: IdSize,
    obj_id: u64,
    elem_class_obj_id: u64,
    elements: &[u64],
) -> Vec<u8> {
    let mut b = vec![0x22];
    put_id(id_size, obj_id, &mut b);
    b.extend_from_slice(&0u32.to_be_bytes());
    b.extend_from_slice(&(elements.len() as u32).to_be_bytes());
    put_id(id_size, elem_class_obj_id, &mut b);
    for &e in elements {
        put_id(id_size, e, &mut b);
    }
    b
}

pub fn int_array_sub(id_size: IdSize, obj_id: u64, elements: &[i32]) -> Vec<u8> {
    let mut b = vec![0x23];
    put_id(id_size, obj_id, &mut b);
    b.extend_from_slice(&0u32.to_be_bytes());
    b.extend_from_slice(&(elements.len() as u32).to_be_bytes());
    b.push(FieldType::Int.tag());
    for e in elements {
        b.extend_from_slice(&e.to_be_bytes());
    }
    b
}

/// Simple roots, one sub-record each.
pub fn root_unknown_sub(id_size: IdSize, obj_id: u64) -> Vec<u8> {
    let mut b = vec![0xff];
    put_id(id_size, obj_id, &mut b);
    b
}

pub fn root_sticky_class_sub(id_size: IdSize, obj_id: u64) -> Vec<u8> {
    let mut b = vec![0x05];
    put_id(id_size, obj_id, &mut b);
    b
}

pub fn root_thread_object_sub(
    id_size: IdSize,
    obj_id: u64,
    thread_serial: u32,
    stack_trace_serial: u32,
) -> Vec<u8> {
    let mut b = vec![0x08];
    put_id(id_size, obj_id, &mut b);
    b.extend_from_slice(&thread_serial.to_be_bytes());
    b.extend_from_slice(&stack_trace_serial.to_be_bytes());
    b
}
