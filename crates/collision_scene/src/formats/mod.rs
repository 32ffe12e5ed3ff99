//! Binary collision file formats
//!
//! CSB (collision scene) and CTB (collision table) share one set of
//! primitives: an endian-aware reader/writer pair, zero-terminated string
//! tables and an optional zstd envelope. Every codec call takes a
//! [`FormatRevision`], which selects byte order and flag width.

pub mod attributes;
pub mod binary;
pub mod csb;
pub mod ctb;
pub mod envelope;
pub mod node_tree;

pub use attributes::{
    ColorSplashFlags, Game, OrigamiKingFlags, OrigamiKingMaterial, TtydFlags, TtydMaterial,
};
pub use csb::{
    CollisionObject, CsbFile, HeaderMarkers, Mesh, Model, ObjectShape, COMBINED_MODEL_NAME,
};
pub use ctb::{ChildMask, CtbFile, CtbNode};
pub use node_tree::{Node, NodeTree};

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for codec operations
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors raised while decoding or encoding collision files
#[derive(Error, Debug)]
pub enum FormatError {
    /// The data ended before a field could be read
    #[error("Unexpected end of data reading {section}.{field} at offset {offset}")]
    UnexpectedEof {
        /// Section being decoded
        section: &'static str,
        /// Field being read
        field: &'static str,
        /// Byte offset of the read
        offset: u64,
    },

    /// A name offset points past the end of its string table
    #[error("String offset {offset} in {section} is past the table length {table_len}")]
    StringOffsetOutOfRange {
        /// Section owning the table
        section: &'static str,
        /// Offending offset
        offset: u32,
        /// Table length in bytes
        table_len: usize,
    },

    /// A string table entry has no zero terminator
    #[error("String at offset {offset} in {section} is not zero-terminated")]
    MissingTerminator {
        /// Section owning the table
        section: &'static str,
        /// Offset of the entry
        offset: u32,
    },

    /// A string is not valid UTF-8
    #[error("Invalid UTF-8 string in {section} at offset {offset}")]
    InvalidUtf8 {
        /// Section owning the string
        section: &'static str,
        /// Offset of the string
        offset: u64,
    },

    /// An index refers past the end of the buffer it indexes
    #[error("{section}.{field}: index {index} out of range (limit {limit})")]
    IndexOutOfRange {
        /// Section being decoded or encoded
        section: &'static str,
        /// Field holding the index
        field: &'static str,
        /// Offending index
        index: u64,
        /// Number of addressable entries
        limit: u64,
    },

    /// A value does not fit the fixed width the format gives it
    #[error("Value exceeds fixed capacity for {field}: {value} > {capacity}")]
    CapacityExceeded {
        /// Field being written
        field: &'static str,
        /// Value that was too large
        value: u64,
        /// Largest value the field can hold
        capacity: u64,
    },

    /// Structurally valid data this codec cannot represent
    #[error("Unsupported layout in {section}: {reason}")]
    Unsupported {
        /// Section being decoded or encoded
        section: &'static str,
        /// What was unexpected
        reason: String,
    },

    /// The zstd envelope could not be compressed or decompressed
    #[error("Compression error: {0}")]
    Compression(#[source] std::io::Error),

    /// File IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Format revision, selecting byte order, flag width and compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormatRevision {
    /// Older revision: big-endian, 32-bit flags, never compressed
    Legacy,

    /// Newer revision: little-endian, 64-bit flags, zstd envelope on disk
    #[default]
    Current,
}

/// Which of the two collision files a path names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `.csb` collision scene
    Scene,

    /// `.ctb` collision table
    Table,
}

impl FileKind {
    /// File extension without the envelope suffix
    pub fn extension(self) -> &'static str {
        match self {
            Self::Scene => "csb",
            Self::Table => "ctb",
        }
    }
}

impl FormatRevision {
    /// Revision for a caller-supplied endianness flag
    pub fn from_big_endian(big_endian: bool) -> Self {
        if big_endian {
            Self::Legacy
        } else {
            Self::Current
        }
    }

    /// True for the big-endian revision
    pub fn is_big_endian(self) -> bool {
        self == Self::Legacy
    }

    /// True when collision flags are stored as `u64`
    pub fn has_wide_flags(self) -> bool {
        self == Self::Current
    }

    /// True when files of this revision carry the zstd envelope
    pub fn is_compressed(self) -> bool {
        self == Self::Current
    }

    /// Largest collision flag the revision can store
    pub fn max_flag(self) -> u64 {
        if self.has_wide_flags() {
            u64::MAX
        } else {
            u64::from(u32::MAX)
        }
    }

    /// On-disk file name: `<stem>.csb.zst`, `<stem>.ctb.zst`, or bare for the legacy revision
    pub fn file_name(self, stem: &str, kind: FileKind) -> String {
        if self.is_compressed() {
            format!("{stem}.{}.{}", kind.extension(), envelope::COMPRESSED_SUFFIX)
        } else {
            format!("{stem}.{}", kind.extension())
        }
    }

    /// Revision implied by a path: only the compressed suffix is conclusive
    pub fn from_path(path: &Path) -> Option<Self> {
        envelope::is_compressed_path(path).then_some(Self::Current)
    }
}

/// Convert an in-memory count to a fixed-width field
pub(crate) fn checked_width<T: TryFrom<usize>>(
    field: &'static str,
    value: usize,
    capacity: u64,
) -> FormatResult<T> {
    T::try_from(value).map_err(|_| FormatError::CapacityExceeded {
        field,
        value: value as u64,
        capacity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_per_revision() {
        assert_eq!(FormatRevision::Current.file_name("map", FileKind::Scene), "map.csb.zst");
        assert_eq!(FormatRevision::Current.file_name("map", FileKind::Table), "map.ctb.zst");
        assert_eq!(FormatRevision::Legacy.file_name("map", FileKind::Scene), "map.csb");
    }

    #[test]
    fn test_revision_from_path() {
        assert_eq!(
            FormatRevision::from_path(Path::new("dir/mri_05.csb.zst")),
            Some(FormatRevision::Current)
        );
        assert_eq!(FormatRevision::from_path(Path::new("mri_05.csb")), None);
    }

    #[test]
    fn test_flag_width() {
        assert_eq!(FormatRevision::Legacy.max_flag(), 0xFFFF_FFFF);
        assert!(FormatRevision::Current.has_wide_flags());
        assert!(FormatRevision::from_big_endian(true).is_big_endian());
    }

    #[test]
    fn test_checked_width() {
        let ok: u16 = checked_width("node_count", 10, u64::from(u16::MAX)).unwrap();
        assert_eq!(ok, 10);
        let err = checked_width::<u8>("child_count", 300, u64::from(u8::MAX)).unwrap_err();
        assert!(matches!(err, FormatError::CapacityExceeded { value: 300, capacity: 255, .. }));
    }
}
