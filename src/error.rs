//! Central error types for the HPROF parser.
//!
//! Every structural problem in a dump is fatal: the binary format carries no
//! per-record resynchronisation point, so after the first bad byte the frame
//! boundaries are unrecoverable. None of these are warnings.

use core::fmt;

/// All error conditions the parser can surface.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error from the underlying file or stream.
    Io(String),
    /// The stream ended in the middle of a record.
    ///
    /// End-of-input is only legitimate where the next top-level record tag
    /// would start; anywhere else it means a truncated dump.
    UnexpectedEof,
    /// The header declares an identifier width other than 4 or 8 bytes.
    InvalidIdSize(u32),
    /// A top-level record tag outside the 14 known kinds (hprof_b_spec).
    ///
    /// The declared body length would in principle allow skipping, but
    /// unknown records are treated as fatal (see DESIGN.md).
    UnknownRecordTag(u8),
    /// A heap-dump sub-record tag outside the known kinds.
    ///
    /// Sub-records carry no length field, so there is no way to skip one.
    UnknownSubRecordTag(u8),
    /// A basic-type tag byte outside the nine known codes (2, 4..=11).
    UnknownFieldType(u8),
    /// Pass 2 needed the layout of a class no class-dump ever defined.
    UnknownClass(u64),
    /// A superclass chain revisits a class instead of reaching the 0
    /// terminator. Carries the class id the walk started from.
    ClassHierarchyCycle(u64),
    /// An instance-dump field walk did not consume exactly the raw blob.
    ///
    /// The class hierarchy in the registry and the packed bytes in the dump
    /// disagree about the total field width; the dump is inconsistent.
    InstanceDataMismatch {
        object_id: u64,
        declared: u32,
        consumed: u32,
    },
    /// A top-level record body decoded to a different size than its frame
    /// declared. Framing would desynchronise, so this is fatal.
    RecordLengthMismatch {
        tag: u8,
        declared: u64,
        consumed: u64,
    },
    /// A heap-dump sub-record ran past the enclosing segment's byte budget.
    SegmentOverrun { consumed: u64, budget: u64 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::UnexpectedEof => write!(f, "unexpected end of input inside a record"),
            Self::InvalidIdSize(size) => {
                write!(f, "invalid identifier size {size}, expected 4 or 8")
            }
            Self::UnknownRecordTag(tag) => {
                write!(f, "unknown top-level record tag 0x{tag:02x}")
            }
            Self::UnknownSubRecordTag(tag) => {
                write!(f, "unknown heap-dump sub-record tag 0x{tag:02x}")
            }
            Self::UnknownFieldType(tag) => write!(f, "unknown basic type tag {tag}"),
            Self::UnknownClass(id) => {
                write!(f, "instance references class 0x{id:x} with no class dump")
            }
            Self::ClassHierarchyCycle(id) => {
                write!(
                    f,
                    "superclass chain of class 0x{id:x} loops and never reaches 0"
                )
            }
            Self::InstanceDataMismatch {
                object_id,
                declared,
                consumed,
            } => write!(
                f,
                "instance 0x{object_id:x}: field values consumed {consumed} of {declared} packed bytes"
            ),
            Self::RecordLengthMismatch {
                tag,
                declared,
                consumed,
            } => write!(
                f,
                "record 0x{tag:02x}: declared {declared} body bytes, decoded {consumed}"
            ),
            Self::SegmentOverrun { consumed, budget } => write!(
                f,
                "heap-dump sub-record overran segment: consumed {consumed} of {budget} budget bytes"
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof
        } else {
            Self::Io(err.to_string())
        }
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Every variant must render a non-empty Display string naming the
    /// offending tag/location.

    #[test]
    fn unknown_record_tag_display() {
        let e = Error::UnknownRecordTag(0x99);
        let msg = e.to_string();
        assert!(msg.contains("0x99"), "{msg}");
        assert!(msg.contains("top-level"), "{msg}");
    }

    #[test]
    fn unknown_sub_record_tag_display() {
        let e = Error::UnknownSubRecordTag(0x42);
        let msg = e.to_string();
        assert!(msg.contains("0x42"), "{msg}");
        assert!(msg.contains("sub-record"), "{msg}");
    }

    #[test]
    fn unknown_field_type_display() {
        let e = Error::UnknownFieldType(3);
        let msg = e.to_string();
        assert!(msg.contains('3'), "{msg}");
        assert!(msg.contains("type"), "{msg}");
    }

    #[test]
    fn invalid_id_size_display() {
        let e = Error::InvalidIdSize(16);
        let msg = e.to_string();
        assert!(msg.contains("16"), "{msg}");
        assert!(msg.contains("4 or 8"), "{msg}");
    }

    #[test]
    fn unknown_class_display() {
        let e = Error::UnknownClass(0xcafe);
        let msg = e.to_string();
        assert!(msg.contains("cafe"), "{msg}");
        assert!(msg.contains("class"), "{msg}");
    }

    #[test]
    fn class_hierarchy_cycle_display() {
        let e = Error::ClassHierarchyCycle(0x64);
        let msg = e.to_string();
        assert!(msg.contains("0x64"), "{msg}");
        assert!(msg.contains("superclass"), "{msg}");
    }

    #[test]
    fn instance_data_mismatch_display() {
        let e = Error::InstanceDataMismatch {
            object_id: 0xbeef,
            declared: 12,
            consumed: 8,
        };
        let msg = e.to_string();
        assert!(msg.contains("beef"), "{msg}");
        assert!(msg.contains("12"), "{msg}");
        assert!(msg.contains('8'), "{msg}");
    }

    #[test]
    fn record_length_mismatch_display() {
        let e = Error::RecordLengthMismatch {
            tag: 0x02,
            declared: 20,
            consumed: 16,
        };
        let msg = e.to_string();
        assert!(msg.contains("0x02"), "{msg}");
        assert!(msg.contains("20"), "{msg}");
        assert!(msg.contains("16"), "{msg}");
    }

    #[test]
    fn segment_overrun_display() {
        let e = Error::SegmentOverrun {
            consumed: 40,
            budget: 32,
        };
        let msg = e.to_string();
        assert!(msg.contains("40"), "{msg}");
        assert!(msg.contains("32"), "{msg}");
    }

    #[test]
    fn io_error_from_unexpected_eof() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(Error::from(io), Error::UnexpectedEof);
    }

    #[test]
    fn io_error_from_other_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.hprof");
        let e = Error::from(io);
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("missing.hprof"), "{e}");
    }

    #[test]
    fn error_implements_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(Error::UnexpectedEof);
        assert!(!e.to_string().is_empty());
    }

    #[test]
    fn error_is_clone_and_eq() {
        let e1 = Error::UnknownRecordTag(0x99);
        let e2 = e1.clone();
        assert_eq!(e1, e2);
    }

    #[test]
    fn result_type_alias_works() {
        let ok: Result<u32> = Ok(7);
        assert_eq!(ok.unwrap(), 7);
        let err: Result<u32> = Err(Error::UnexpectedEof);
        assert!(err.is_err());
    }
}
