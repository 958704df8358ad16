//! HPROF stream parser — framing and two-pass orchestration.
//!
//! The file layout (hprof_b_spec, big-endian throughout):
//!
//! ```text
//! header:
//!   [u1]*  null-terminated format string ("JAVA PROFILE 1.0.2")
//!   u4     identifier size (4 or 8)
//!   u8     start time, ms since the epoch
//! record:
//!   u1     tag
//!   u4     microseconds since the header timestamp (decoded, discarded)
//!   u4     body length (unsigned semantics; bodies can exceed 2^31)
//!   [u1]*  body
//! ```
//!
//! The file is traversed twice. Class-dump sub-records may appear after
//! instance dumps that need them, so pass 1 builds the class registry and
//! forwards everything except heap-summary/heap-dump-end; pass 2 repeats
//! the identical decode walk, resolves instance field values against the
//! now-complete registry, and forwards only instance-dump, heap-summary
//! and heap-dump-end. `finished` fires exactly once after pass 2.
//!
//! # Example
//!
//! ```no_run
//! use rhprof::handlers::RootCounter;
//!
//! let mut counter = RootCounter::default();
//! rhprof::parse(std::path::Path::new("heap.hprof"), &mut counter)?;
//! # Ok::<(), rhprof::Error>(())
//! ```

mod heap_dump;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use crate::bytestream::ByteReader;
use crate::class_registry::ClassRegistry;
use crate::handler::RecordHandler;
use crate::id::IdSize;
use crate::record::{AllocSite, CpuSample, Header};
use crate::{Error, Result};

// Top-level record tags (hprof_b_spec).
const TAG_STRING_IN_UTF8: u8 = 0x01;
const TAG_LOAD_CLASS: u8 = 0x02;
const TAG_UNLOAD_CLASS: u8 = 0x03;
const TAG_STACK_FRAME: u8 = 0x04;
const TAG_STACK_TRACE: u8 = 0x05;
const TAG_ALLOC_SITES: u8 = 0x06;
const TAG_HEAP_SUMMARY: u8 = 0x07;
const TAG_START_THREAD: u8 = 0x0a;
const TAG_END_THREAD: u8 = 0x0b;
const TAG_HEAP_DUMP: u8 = 0x0c;
const TAG_CPU_SAMPLES: u8 = 0x0d;
const TAG_CONTROL_SETTINGS: u8 = 0x0e;
const TAG_HEAP_DUMP_SEGMENT: u8 = 0x1c;
const TAG_HEAP_DUMP_END: u8 = 0x2c;

/// Upper bound for vector preallocation from count fields read off the
/// wire. A count is untrusted until that many elements actually decoded;
/// vectors grow past this on demand.
const PREALLOC_LIMIT: u32 = 64 * 1024;

#[inline]
fn capped_capacity(count: u32) -> usize {
    count.min(PREALLOC_LIMIT) as usize
}

/// Which of the two traversals is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    First,
    Second,
}

impl Pass {
    #[inline]
    fn is_first(self) -> bool {
        self == Pass::First
    }
}

/// Parses an HPROF file, delivering records to `handler`.
///
/// Opens the file twice to obtain two independent cursors over identical
/// content; the input must therefore be a re-readable file, not a pipe.
/// Any decode error aborts the run with no `finished` callback.
pub fn parse<H: RecordHandler>(path: &Path, handler: &mut H) -> Result<()> {
    let mut parser = Parser::new(handler);

    let first = BufReader::new(File::open(path)?);
    parser.run_pass(&mut ByteReader::new(first), Pass::First)?;

    let second = BufReader::new(File::open(path)?);
    parser.run_pass(&mut ByteReader::new(second), Pass::Second)?;

    parser.handler.finished();
    Ok(())
}

/// Parses an in-memory HPROF image.
///
/// Same semantics as [`parse`], with the second traversal re-reading the
/// slice instead of the file.
pub fn parse_bytes<H: RecordHandler>(data: &[u8], handler: &mut H) -> Result<()> {
    let mut parser = Parser::new(handler);
    parser.run_pass(&mut ByteReader::new(data), Pass::First)?;
    parser.run_pass(&mut ByteReader::new(data), Pass::Second)?;
    parser.handler.finished();
    Ok(())
}

/// State shared between the two traversals of one run.
struct Parser<'h, H> {
    handler: &'h mut H,
    registry: ClassRegistry,
}

impl<'h, H: RecordHandler> Parser<'h, H> {
    fn new(handler: &'h mut H) -> Self {
        Self {
            handler,
            registry: ClassRegistry::new(),
        }
    }

    /// One full traversal: header, then records until clean end of input.
    fn run_pass<R: Read>(&mut self, reader: &mut ByteReader<R>, pass: Pass) -> Result<()> {
        let header = self.read_header(reader)?;
        let id_size = header.id_size;
        if pass.is_first() {
            self.handler.header(&header);
        } else {
            debug!(
                "pass 2: resolving instances against {} classes",
                self.registry.len()
            );
        }

        // EOF ist nur an der Tag-Position einer neuen Record-Frame legal.
        while let Some(tag) = reader.try_read_u8()? {
            let _time_delta = reader.read_u32()?;
            let declared = u64::from(reader.read_u32()?);
            let body_start = reader.position();

            self.parse_record(reader, tag, declared, id_size, pass)?;

            let consumed = reader.position() - body_start;
            if consumed != declared {
                return Err(Error::RecordLengthMismatch {
                    tag,
                    declared,
                    consumed,
                });
            }
        }
        Ok(())
    }

    fn read_header<R: Read>(&mut self, reader: &mut ByteReader<R>) -> Result<Header> {
        let format = reader.read_null_terminated()?;
        let id_size = IdSize::from_raw(reader.read_u32()?)?;
        let timestamp_ms = reader.read_u64()?;
        Ok(Header {
            format,
            id_size,
            timestamp_ms,
        })
    }

    /// Decodes one top-level record body.
    ///
    /// The caller verifies afterwards that exactly `declared` bytes were
    /// consumed; decoding here never clamps or pads.
    fn parse_record<R: Read>(
        &mut self,
        reader: &mut ByteReader<R>,
        tag: u8,
        declared: u64,
        id_size: IdSize,
        pass: Pass,
    ) -> Result<()> {
        match tag {
            TAG_STRING_IN_UTF8 => {
                let id = id_size.read_id(reader)?;
                let text_len = declared
                    .checked_sub(id_size.in_bytes())
                    .ok_or(Error::RecordLengthMismatch {
                        tag,
                        declared,
                        consumed: id_size.in_bytes(),
                    })?;
                let bytes = reader.read_exact_vec(text_len as usize)?;
                if pass.is_first() {
                    let data = String::from_utf8_lossy(&bytes);
                    self.handler.string_in_utf8(id, &data);
                }
            }

            TAG_LOAD_CLASS => {
                let class_serial = reader.read_u32()?;
                let class_obj_id = id_size.read_id(reader)?;
                let stack_trace_serial = reader.read_u32()?;
                let class_name_id = id_size.read_id(reader)?;
                if pass.is_first() {
                    self.handler
                        .load_class(class_serial, class_obj_id, stack_trace_serial, class_name_id);
                }
            }

            TAG_UNLOAD_CLASS => {
                let class_serial = reader.read_u32()?;
                if pass.is_first() {
                    self.handler.unload_class(class_serial);
                }
            }

            TAG_STACK_FRAME => {
                let stack_frame_id = id_size.read_id(reader)?;
                let method_name_id = id_size.read_id(reader)?;
                let method_sig_id = id_size.read_id(reader)?;
                let source_file_name_id = id_size.read_id(reader)?;
                let class_serial = reader.read_u32()?;
                // Zeilennummer: >0 Zeile, 0 leer, -1 unbekannt, -2 compiled,
                // -3 native.
                let location = reader.read_i32()?;
                if pass.is_first() {
                    self.handler.stack_frame(
                        stack_frame_id,
                        method_name_id,
                        method_sig_id,
                        source_file_name_id,
                        class_serial,
                        location,
                    );
                }
            }

            TAG_STACK_TRACE => {
                let stack_trace_serial = reader.read_u32()?;
                let thread_serial = reader.read_u32()?;
                let num_frames = reader.read_u32()?;
                // Frame-Anzahl folgt aus der Body-Länge, nicht aus num_frames.
                let frame_count = declared.saturating_sub(12) / id_size.in_bytes();
                let mut frame_ids =
                    Vec::with_capacity(frame_count.min(u64::from(PREALLOC_LIMIT)) as usize);
                for _ in 0..frame_count {
                    frame_ids.push(id_size.read_id(reader)?);
                }
                if pass.is_first() {
                    self.handler
                        .stack_trace(stack_trace_serial, thread_serial, num_frames, &frame_ids);
                }
            }

            TAG_ALLOC_SITES => {
                let flags = reader.read_u16()?;
                let cutoff_ratio = reader.read_f32()?;
                let live_bytes = reader.read_u32()?;
                let live_instances = reader.read_u32()?;
                let bytes_allocated = reader.read_u64()?;
                let instances_allocated = reader.read_u64()?;
                let count = reader.read_u32()?;
                let mut sites = Vec::with_capacity(capped_capacity(count));
                for _ in 0..count {
                    sites.push(AllocSite {
                        array_indicator: reader.read_u8()?,
                        class_serial: reader.read_u32()?,
                        stack_trace_serial: reader.read_u32()?,
                        live_bytes: reader.read_u32()?,
                        live_instances: reader.read_u32()?,
                        bytes_allocated: reader.read_u32()?,
                        instances_allocated: reader.read_u32()?,
                    });
                }
                if pass.is_first() {
                    self.handler.alloc_sites(
                        flags,
                        cutoff_ratio,
                        live_bytes,
                        live_instances,
                        bytes_allocated,
                        instances_allocated,
                        &sites,
                    );
                }
            }

            TAG_HEAP_SUMMARY => {
                let live_bytes = reader.read_u32()?;
                let live_instances = reader.read_u32()?;
                let bytes_allocated = reader.read_u64()?;
                let instances_allocated = reader.read_u64()?;
                // Erst im zweiten Durchlauf sinnvoll: alle Klassen bekannt.
                if !pass.is_first() {
                    self.handler.heap_summary(
                        live_bytes,
                        live_instances,
                        bytes_allocated,
                        instances_allocated,
                    );
                }
            }

            TAG_START_THREAD => {
                let thread_serial = reader.read_u32()?;
                let thread_obj_id = id_size.read_id(reader)?;
                let stack_trace_serial = reader.read_u32()?;
                let thread_name_id = id_size.read_id(reader)?;
                let group_name_id = id_size.read_id(reader)?;
                let parent_group_name_id = id_size.read_id(reader)?;
                if pass.is_first() {
                    self.handler.start_thread(
                        thread_serial,
                        thread_obj_id,
                        stack_trace_serial,
                        thread_name_id,
                        group_name_id,
                        parent_group_name_id,
                    );
                }
            }

            TAG_END_THREAD => {
                let thread_serial = reader.read_u32()?;
                if pass.is_first() {
                    self.handler.end_thread(thread_serial);
                }
            }

            TAG_HEAP_DUMP => {
                if pass.is_first() {
                    self.handler.heap_dump();
                }
                heap_dump::parse_segment(self, reader, declared, id_size, pass)?;
                // Ein monolithischer Dump hat kein eigenes 0x2c-Record.
                if !pass.is_first() {
                    self.handler.heap_dump_end();
                }
            }

            TAG_HEAP_DUMP_SEGMENT => {
                if pass.is_first() {
                    self.handler.heap_dump_segment();
                }
                heap_dump::parse_segment(self, reader, declared, id_size, pass)?;
            }

            TAG_HEAP_DUMP_END => {
                if !pass.is_first() {
                    self.handler.heap_dump_end();
                }
            }

            TAG_CPU_SAMPLES => {
                let total_samples = reader.read_u32()?;
                let count = reader.read_u32()?;
                let mut samples = Vec::with_capacity(capped_capacity(count));
                for _ in 0..count {
                    samples.push(CpuSample {
                        sample_count: reader.read_u32()?,
                        stack_trace_serial: reader.read_u32()?,
                    });
                }
                if pass.is_first() {
                    self.handler.cpu_samples(total_samples, &samples);
                }
            }

            TAG_CONTROL_SETTINGS => {
                let flags = reader.read_u32()?;
                let stack_trace_depth = reader.read_u16()?;
                if pass.is_first() {
                    self.handler.control_settings(flags, stack_trace_depth);
                }
            }

            other => return Err(Error::UnknownRecordTag(other)),
        }
        Ok(())
    }
}
