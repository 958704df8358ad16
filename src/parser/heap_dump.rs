//! Heap-dump segment decoding.
//!
//! Heap-dump and heap-dump-segment records contain a packed sequence of
//! sub-records with no per-record length field; the outer record's declared
//! length is a byte budget. Each sub-record's size follows from its own
//! shape (a class dump's from its inline counts, an instance dump's from
//! its declared blob length), so the loop accounts consumed bytes exactly
//! and treats any overrun of the budget as fatal.

use std::io::Read;

use crate::bytestream::ByteReader;
use crate::class_registry::{ClassLayout, ClassRegistry};
use crate::handler::RecordHandler;
use crate::id::IdSize;
use crate::record::{ClassDump, Constant, InstanceField, StaticField};
use crate::typed_value::{FieldType, Value};
use crate::{Error, Result};

use super::{capped_capacity, Parser, Pass};

// Heap-dump sub-record tags (hprof_b_spec).
const SUB_ROOT_UNKNOWN: u8 = 0xff;
const SUB_ROOT_JNI_GLOBAL: u8 = 0x01;
const SUB_ROOT_JNI_LOCAL: u8 = 0x02;
const SUB_ROOT_JAVA_FRAME: u8 = 0x03;
const SUB_ROOT_NATIVE_STACK: u8 = 0x04;
const SUB_ROOT_STICKY_CLASS: u8 = 0x05;
const SUB_ROOT_THREAD_BLOCK: u8 = 0x06;
const SUB_ROOT_MONITOR_USED: u8 = 0x07;
const SUB_ROOT_THREAD_OBJECT: u8 = 0x08;
const SUB_CLASS_DUMP: u8 = 0x20;
const SUB_INSTANCE_DUMP: u8 = 0x21;
const SUB_OBJ_ARRAY_DUMP: u8 = 0x22;
const SUB_PRIM_ARRAY_DUMP: u8 = 0x23;

/// Decodes sub-records until exactly `budget` bytes are consumed.
pub(super) fn parse_segment<H: RecordHandler, R: Read>(
    parser: &mut Parser<'_, H>,
    reader: &mut ByteReader<R>,
    budget: u64,
    id_size: IdSize,
    pass: Pass,
) -> Result<()> {
    let mut remaining = budget;
    while remaining > 0 {
        let start = reader.position();
        parse_sub_record(parser, reader, id_size, pass)?;
        let consumed = reader.position() - start;
        remaining = remaining
            .checked_sub(consumed)
            .ok_or(Error::SegmentOverrun {
                consumed: budget - remaining + consumed,
                budget,
            })?;
    }
    Ok(())
}

fn parse_sub_record<H: RecordHandler, R: Read>(
    parser: &mut Parser<'_, H>,
    reader: &mut ByteReader<R>,
    id_size: IdSize,
    pass: Pass,
) -> Result<()> {
    let tag = reader.read_u8()?;
    match tag {
        SUB_ROOT_UNKNOWN => {
            let obj_id = id_size.read_id(reader)?;
            if pass.is_first() {
                parser.handler.root_unknown(obj_id);
            }
        }

        SUB_ROOT_JNI_GLOBAL => {
            let obj_id = id_size.read_id(reader)?;
            let jni_global_ref_id = id_size.read_id(reader)?;
            if pass.is_first() {
                parser.handler.root_jni_global(obj_id, jni_global_ref_id);
            }
        }

        SUB_ROOT_JNI_LOCAL => {
            let obj_id = id_size.read_id(reader)?;
            let thread_serial = reader.read_u32()?;
            let frame_index = reader.read_u32()?;
            if pass.is_first() {
                parser
                    .handler
                    .root_jni_local(obj_id, thread_serial, frame_index);
            }
        }

        SUB_ROOT_JAVA_FRAME => {
            let obj_id = id_size.read_id(reader)?;
            let thread_serial = reader.read_u32()?;
            let frame_index = reader.read_u32()?;
            if pass.is_first() {
                parser
                    .handler
                    .root_java_frame(obj_id, thread_serial, frame_index);
            }
        }

        SUB_ROOT_NATIVE_STACK => {
            let obj_id = id_size.read_id(reader)?;
            let thread_serial = reader.read_u32()?;
            if pass.is_first() {
                parser.handler.root_native_stack(obj_id, thread_serial);
            }
        }

        SUB_ROOT_STICKY_CLASS => {
            let obj_id = id_size.read_id(reader)?;
            if pass.is_first() {
                parser.handler.root_sticky_class(obj_id);
            }
        }

        SUB_ROOT_THREAD_BLOCK => {
            let obj_id = id_size.read_id(reader)?;
            let thread_serial = reader.read_u32()?;
            if pass.is_first() {
                parser.handler.root_thread_block(obj_id, thread_serial);
            }
        }

        SUB_ROOT_MONITOR_USED => {
            let obj_id = id_size.read_id(reader)?;
            if pass.is_first() {
                parser.handler.root_monitor_used(obj_id);
            }
        }

        SUB_ROOT_THREAD_OBJECT => {
            let obj_id = id_size.read_id(reader)?;
            let thread_serial = reader.read_u32()?;
            let stack_trace_serial = reader.read_u32()?;
            if pass.is_first() {
                parser
                    .handler
                    .root_thread_object(obj_id, thread_serial, stack_trace_serial);
            }
        }

        SUB_CLASS_DUMP => parse_class_dump(parser, reader, id_size, pass)?,
        SUB_INSTANCE_DUMP => parse_instance_dump(parser, reader, id_size, pass)?,
        SUB_OBJ_ARRAY_DUMP => parse_obj_array_dump(parser, reader, id_size, pass)?,
        SUB_PRIM_ARRAY_DUMP => parse_prim_array_dump(parser, reader, id_size, pass)?,

        other => return Err(Error::UnknownSubRecordTag(other)),
    }
    Ok(())
}

/// Class dump (0x20): header ids, constant pool, statics, instance fields.
///
/// The registry write happens unconditionally in pass 1 — whether or not
/// the consumer cares about class dumps, later instance resolution needs
/// the layout.
fn parse_class_dump<H: RecordHandler, R: Read>(
    parser: &mut Parser<'_, H>,
    reader: &mut ByteReader<R>,
    id_size: IdSize,
    pass: Pass,
) -> Result<()> {
    let class_obj_id = id_size.read_id(reader)?;
    let stack_trace_serial = reader.read_u32()?;
    let super_class_obj_id = id_size.read_id(reader)?;
    let class_loader_obj_id = id_size.read_id(reader)?;
    let signers_obj_id = id_size.read_id(reader)?;
    let protection_domain_obj_id = id_size.read_id(reader)?;
    let reserved1 = id_size.read_id(reader)?;
    let reserved2 = id_size.read_id(reader)?;
    let instance_size = reader.read_u32()?;

    // Konstanten-Pool: (Index, getaggter Wert) je Eintrag.
    let constant_count = reader.read_u16()?;
    let mut constants = Vec::with_capacity(usize::from(constant_count));
    for _ in 0..constant_count {
        let pool_index = reader.read_u16()?;
        let ty = FieldType::from_tag(reader.read_u8()?)?;
        let value = Value::decode(reader, ty, id_size)?;
        constants.push(Constant { pool_index, value });
    }

    // Statische Felder: (Name-Id, getaggter Wert) je Eintrag.
    let static_count = reader.read_u16()?;
    let mut statics = Vec::with_capacity(usize::from(static_count));
    for _ in 0..static_count {
        let name_id = id_size.read_id(reader)?;
        let ty = FieldType::from_tag(reader.read_u8()?)?;
        let value = Value::decode(reader, ty, id_size)?;
        statics.push(StaticField { name_id, value });
    }

    // Instanzfelder: nur (Name-Id, Typ) — Werte stehen in Instance Dumps.
    let field_count = reader.read_u16()?;
    let mut instance_fields = Vec::with_capacity(usize::from(field_count));
    for _ in 0..field_count {
        let name_id = id_size.read_id(reader)?;
        let field_type = FieldType::from_tag(reader.read_u8()?)?;
        instance_fields.push(InstanceField {
            name_id,
            field_type,
        });
    }

    if pass.is_first() {
        parser.registry.insert(
            class_obj_id,
            ClassLayout {
                super_class_obj_id,
                instance_size,
                instance_fields: instance_fields.clone(),
            },
        );
        let dump = ClassDump {
            class_obj_id,
            stack_trace_serial,
            super_class_obj_id,
            class_loader_obj_id,
            signers_obj_id,
            protection_domain_obj_id,
            reserved1,
            reserved2,
            instance_size,
            constants,
            statics,
            instance_fields,
        };
        parser.handler.class_dump(&dump);
    }
    Ok(())
}

/// Instance dump (0x21): ids plus a raw blob of packed field values.
///
/// Pass 1 reads past the blob without interpreting it (its layout may not
/// be registered yet). Pass 2 resolves it against the complete registry.
fn parse_instance_dump<H: RecordHandler, R: Read>(
    parser: &mut Parser<'_, H>,
    reader: &mut ByteReader<R>,
    id_size: IdSize,
    pass: Pass,
) -> Result<()> {
    let obj_id = id_size.read_id(reader)?;
    let stack_trace_serial = reader.read_u32()?;
    let class_obj_id = id_size.read_id(reader)?;
    let blob_len = reader.read_u32()?;
    let blob = reader.read_exact_vec(blob_len as usize)?;

    if !pass.is_first() {
        let values = resolve_instance(&parser.registry, id_size, obj_id, class_obj_id, &blob)?;
        parser
            .handler
            .instance_dump(obj_id, stack_trace_serial, class_obj_id, &values);
    }
    Ok(())
}

/// Resolves a packed instance blob into typed field values.
///
/// The walk starts at the instance's own class and follows the superclass
/// chain (0 terminates), emitting each class's fields in declaration order
/// — subclass fields first, root-most class fields last. The values must
/// consume the blob exactly.
fn resolve_instance(
    registry: &ClassRegistry,
    id_size: IdSize,
    obj_id: u64,
    class_obj_id: u64,
    blob: &[u8],
) -> Result<Vec<Value>> {
    let declared = blob.len() as u32;
    let mut cursor = ByteReader::new(blob);
    let mut values = Vec::new();

    // Eine konsistente Kette besucht jede Klasse höchstens einmal; mehr
    // Schritte als registrierte Klassen heisst Zyklus.
    let mut remaining_links = registry.len();
    let mut next_class = class_obj_id;
    while next_class != 0 {
        if remaining_links == 0 {
            return Err(Error::ClassHierarchyCycle(class_obj_id));
        }
        remaining_links -= 1;
        let layout = registry.get(next_class)?;
        next_class = layout.super_class_obj_id;
        for field in &layout.instance_fields {
            let value =
                Value::decode(&mut cursor, field.field_type, id_size).map_err(|e| match e {
                    // Die Feldliste verlangt mehr Bytes als der Blob hat.
                    Error::UnexpectedEof => Error::InstanceDataMismatch {
                        object_id: obj_id,
                        declared,
                        consumed: cursor.position() as u32,
                    },
                    other => other,
                })?;
            values.push(value);
        }
    }

    let consumed = cursor.position() as u32;
    if consumed != declared {
        return Err(Error::InstanceDataMismatch {
            object_id: obj_id,
            declared,
            consumed,
        });
    }
    Ok(values)
}

/// Object array dump (0x22): element class id plus identifier elements.
fn parse_obj_array_dump<H: RecordHandler, R: Read>(
    parser: &mut Parser<'_, H>,
    reader: &mut ByteReader<R>,
    id_size: IdSize,
    pass: Pass,
) -> Result<()> {
    let obj_id = id_size.read_id(reader)?;
    let stack_trace_serial = reader.read_u32()?;
    let count = reader.read_u32()?;
    let elem_class_obj_id = id_size.read_id(reader)?;
    let mut elements = Vec::with_capacity(capped_capacity(count));
    for _ in 0..count {
        elements.push(id_size.read_id(reader)?);
    }
    if pass.is_first() {
        parser
            .handler
            .obj_array_dump(obj_id, stack_trace_serial, elem_class_obj_id, &elements);
    }
    Ok(())
}

/// Primitive array dump (0x23): one element type tag, then fixed-width
/// elements.
fn parse_prim_array_dump<H: RecordHandler, R: Read>(
    parser: &mut Parser<'_, H>,
    reader: &mut ByteReader<R>,
    id_size: IdSize,
    pass: Pass,
) -> Result<()> {
    let obj_id = id_size.read_id(reader)?;
    let stack_trace_serial = reader.read_u32()?;
    let count = reader.read_u32()?;
    let elem_type = FieldType::from_tag(reader.read_u8()?)?;
    let mut elements = Vec::with_capacity(capped_capacity(count));
    for _ in 0..count {
        elements.push(Value::decode(reader, elem_type, id_size)?);
    }
    if pass.is_first() {
        parser
            .handler
            .prim_array_dump(obj_id, stack_trace_serial, elem_type, &elements);
    }
    Ok(())
}
