//! rhprof – streaming parser for HPROF binary heap dumps.
//!
//! Decodes the record stream of an HPROF file (the format documented in
//! hprof_b_spec.h, as written by `jmap -dump` and `HotSpotDiagnosticMXBean`)
//! and delivers each record to a [`RecordHandler`]. The file is read twice:
//! class layouts are collected on the first traversal so that instance
//! field values — whose class dumps may appear later in the file than the
//! instances themselves — can be resolved on the second.
//!
//! # Example
//!
//! ```
//! use rhprof::{parse_bytes, RecordHandler};
//!
//! #[derive(Default)]
//! struct ClassCounter {
//!     classes: u32,
//! }
//!
//! impl RecordHandler for ClassCounter {
//!     fn load_class(&mut self, _: u32, _: u64, _: u32, _: u64) {
//!         self.classes += 1;
//!     }
//! }
//!
//! // Minimal dump: header only, no records.
//! let mut dump = Vec::new();
//! dump.extend_from_slice(b"JAVA PROFILE 1.0.2\0");
//! dump.extend_from_slice(&4u32.to_be_bytes());
//! dump.extend_from_slice(&0u64.to_be_bytes());
//!
//! let mut counter = ClassCounter::default();
//! parse_bytes(&dump, &mut counter).unwrap();
//! assert_eq!(counter.classes, 0);
//! ```

pub mod bytestream;
pub mod class_registry;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod id;
pub mod parser;
pub mod record;
pub mod string_table;
pub mod typed_value;

pub use error::{Error, Result};

/// HashMap with ahash (faster, not DoS-resistant — internal structures only).
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

// Public API: parsing
pub use parser::{parse, parse_bytes};

// Public API: consumer surface
pub use handler::RecordHandler;
pub use record::{AllocSite, ClassDump, Constant, CpuSample, Header, InstanceField, StaticField};
pub use typed_value::{FieldType, Value};

// Public API: per-run lookup structures
pub use class_registry::{ClassLayout, ClassRegistry};
pub use id::IdSize;
pub use string_table::StringTable;
