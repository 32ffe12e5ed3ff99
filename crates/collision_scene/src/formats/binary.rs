//! Endian-aware binary reader and writer
//!
//! The reader tracks the section it is decoding so every failure can name
//! the field and byte offset that caused it.

use std::io::{self, Cursor};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};

use super::{FormatError, FormatResult, FormatRevision};
use crate::collision::BoundingBox;
use crate::foundation::math::Vec3;

/// Width in bytes of fixed model names
pub const FIXED_NAME_LEN: usize = 64;

/// String tables are padded to this alignment
pub const STRING_TABLE_ALIGNMENT: usize = 4;

/// Cursor over a decoded byte buffer
pub struct BinaryReader<'a> {
    cursor: Cursor<&'a [u8]>,
    revision: FormatRevision,
    section: &'static str,
}

impl<'a> BinaryReader<'a> {
    /// Create a reader over `data`
    pub fn new(data: &'a [u8], revision: FormatRevision) -> Self {
        Self {
            cursor: Cursor::new(data),
            revision,
            section: "header",
        }
    }

    /// Name the section subsequent errors are reported against
    pub fn set_section(&mut self, section: &'static str) {
        self.section = section;
    }

    /// Section currently being decoded
    pub fn section(&self) -> &'static str {
        self.section
    }

    /// Revision being decoded
    pub fn revision(&self) -> FormatRevision {
        self.revision
    }

    /// Current byte offset
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len();
        len.saturating_sub(self.cursor.position() as usize)
    }

    fn read_with<T>(
        &mut self,
        field: &'static str,
        read: impl FnOnce(&mut Cursor<&'a [u8]>, bool) -> io::Result<T>,
    ) -> FormatResult<T> {
        let offset = self.cursor.position();
        let big_endian = self.revision.is_big_endian();
        read(&mut self.cursor, big_endian).map_err(|_| FormatError::UnexpectedEof {
            section: self.section,
            field,
            offset,
        })
    }

    /// Read a single byte
    pub fn read_u8(&mut self, field: &'static str) -> FormatResult<u8> {
        self.read_with(field, |c, _| c.read_u8())
    }

    /// Read a `u16` in the revision's byte order
    pub fn read_u16(&mut self, field: &'static str) -> FormatResult<u16> {
        self.read_with(field, |c, big| {
            if big {
                c.read_u16::<BigEndian>()
            } else {
                c.read_u16::<LittleEndian>()
            }
        })
    }

    /// Read a `u32` in the revision's byte order
    pub fn read_u32(&mut self, field: &'static str) -> FormatResult<u32> {
        self.read_with(field, |c, big| {
            if big {
                c.read_u32::<BigEndian>()
            } else {
                c.read_u32::<LittleEndian>()
            }
        })
    }

    /// Read a `u64` in the revision's byte order
    pub fn read_u64(&mut self, field: &'static str) -> FormatResult<u64> {
        self.read_with(field, |c, big| {
            if big {
                c.read_u64::<BigEndian>()
            } else {
                c.read_u64::<LittleEndian>()
            }
        })
    }

    /// Read an `f32` in the revision's byte order
    pub fn read_f32(&mut self, field: &'static str) -> FormatResult<f32> {
        self.read_with(field, |c, big| {
            if big {
                c.read_f32::<BigEndian>()
            } else {
                c.read_f32::<LittleEndian>()
            }
        })
    }

    /// Read a collision flag: `u32` in the legacy revision, `u64` otherwise
    pub fn read_flag(&mut self, field: &'static str) -> FormatResult<u64> {
        if self.revision.has_wide_flags() {
            self.read_u64(field)
        } else {
            self.read_u32(field).map(u64::from)
        }
    }

    /// Read three consecutive floats
    pub fn read_vec3(&mut self, field: &'static str) -> FormatResult<Vec3> {
        Ok(Vec3::new(
            self.read_f32(field)?,
            self.read_f32(field)?,
            self.read_f32(field)?,
        ))
    }

    /// Read a min/max bounding box
    pub fn read_bounds(&mut self, field: &'static str) -> FormatResult<BoundingBox> {
        let min = self.read_vec3(field)?;
        let max = self.read_vec3(field)?;
        Ok(BoundingBox::new(min, max))
    }

    /// Read `count` values with `read`
    pub fn read_array<T>(
        &mut self,
        count: usize,
        mut read: impl FnMut(&mut Self) -> FormatResult<T>,
    ) -> FormatResult<Vec<T>> {
        // Counts come from the file; let a lying count fail on EOF instead of preallocating
        let mut values = Vec::new();
        for _ in 0..count {
            values.push(read(self)?);
        }
        Ok(values)
    }

    /// Borrow the next `len` bytes
    pub fn read_bytes(&mut self, len: usize, field: &'static str) -> FormatResult<&'a [u8]> {
        let offset = self.cursor.position();
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = offset as usize;
        let bytes = start
            .checked_add(len)
            .and_then(|end| data.get(start..end))
            .ok_or(FormatError::UnexpectedEof {
                section: self.section,
                field,
                offset,
            })?;
        self.cursor.set_position(offset + len as u64);
        Ok(bytes)
    }

    /// Skip `len` reserved bytes
    pub fn skip(&mut self, len: usize, field: &'static str) -> FormatResult<()> {
        self.read_bytes(len, field).map(|_| ())
    }

    /// Read a NUL-padded fixed-width UTF-8 string
    pub fn read_fixed_string(&mut self, len: usize, field: &'static str) -> FormatResult<String> {
        let offset = self.position();
        let bytes = self.read_bytes(len, field)?;
        let text = std::str::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8 {
            section: self.section,
            offset,
        })?;
        Ok(text.replace('\0', ""))
    }

    /// Read a `u32` length followed by that many bytes of string table
    pub fn read_string_table(&mut self, field: &'static str) -> FormatResult<StringTable<'a>> {
        let len = self.read_u32(field)? as usize;
        let base = self.position();
        let bytes = self.read_bytes(len, field)?;
        Ok(StringTable {
            bytes,
            base,
            section: self.section,
        })
    }
}

/// Zero-terminated UTF-8 strings addressed by byte offset
#[derive(Debug, Clone, Copy)]
pub struct StringTable<'a> {
    bytes: &'a [u8],
    base: u64,
    section: &'static str,
}

impl StringTable<'_> {
    /// Length of the table in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length table
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Resolve the string starting at `offset`
    pub fn get(&self, offset: u32) -> FormatResult<String> {
        let tail = self
            .bytes
            .get(offset as usize..)
            .filter(|tail| !tail.is_empty())
            .ok_or(FormatError::StringOffsetOutOfRange {
                section: self.section,
                offset,
                table_len: self.bytes.len(),
            })?;

        let end = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or(FormatError::MissingTerminator {
                section: self.section,
                offset,
            })?;

        std::str::from_utf8(&tail[..end])
            .map(str::to_owned)
            .map_err(|_| FormatError::InvalidUtf8 {
                section: self.section,
                offset: self.base + u64::from(offset),
            })
    }
}

/// Build a string table: each name zero-terminated, the whole padded to 4 bytes.
///
/// Returns the byte offset of every name alongside the table.
pub fn build_string_table<'s>(
    names: impl IntoIterator<Item = &'s str>,
) -> FormatResult<(Vec<u32>, Vec<u8>)> {
    let mut offsets = Vec::new();
    let mut table = Vec::new();
    for name in names {
        offsets.push(super::checked_width("string_table", table.len(), u64::from(u32::MAX))?);
        table.extend_from_slice(name.as_bytes());
        table.push(0);
    }
    let padded = table.len().next_multiple_of(STRING_TABLE_ALIGNMENT);
    table.resize(padded, 0);
    Ok((offsets, table))
}

/// Growable output buffer in the revision's byte order
pub struct BinaryWriter {
    buffer: Vec<u8>,
    revision: FormatRevision,
}

impl BinaryWriter {
    /// Create an empty writer
    pub fn new(revision: FormatRevision) -> Self {
        Self {
            buffer: Vec::new(),
            revision,
        }
    }

    /// Revision being encoded
    pub fn revision(&self) -> FormatRevision {
        self.revision
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True before anything has been written
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Finish and take the encoded bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    fn put<const N: usize>(&mut self, write: impl FnOnce(&mut [u8], bool)) {
        let mut bytes = [0u8; N];
        write(&mut bytes, self.revision.is_big_endian());
        self.buffer.extend_from_slice(&bytes);
    }

    /// Write a single byte
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Write a `u16`
    pub fn write_u16(&mut self, value: u16) {
        self.put::<2>(|b, big| {
            if big {
                BigEndian::write_u16(b, value);
            } else {
                LittleEndian::write_u16(b, value);
            }
        });
    }

    /// Write a `u32`
    pub fn write_u32(&mut self, value: u32) {
        self.put::<4>(|b, big| {
            if big {
                BigEndian::write_u32(b, value);
            } else {
                LittleEndian::write_u32(b, value);
            }
        });
    }

    /// Write a `u64`
    pub fn write_u64(&mut self, value: u64) {
        self.put::<8>(|b, big| {
            if big {
                BigEndian::write_u64(b, value);
            } else {
                LittleEndian::write_u64(b, value);
            }
        });
    }

    /// Write an `f32`
    pub fn write_f32(&mut self, value: f32) {
        self.put::<4>(|b, big| {
            if big {
                BigEndian::write_f32(b, value);
            } else {
                LittleEndian::write_f32(b, value);
            }
        });
    }

    /// Write a collision flag at the revision's width
    pub fn write_flag(&mut self, field: &'static str, value: u64) -> FormatResult<()> {
        if self.revision.has_wide_flags() {
            self.write_u64(value);
        } else {
            let narrow = u32::try_from(value).map_err(|_| FormatError::CapacityExceeded {
                field,
                value,
                capacity: self.revision.max_flag(),
            })?;
            self.write_u32(narrow);
        }
        Ok(())
    }

    /// Write three floats
    pub fn write_vec3(&mut self, value: &Vec3) {
        self.write_f32(value.x);
        self.write_f32(value.y);
        self.write_f32(value.z);
    }

    /// Write a min/max bounding box
    pub fn write_bounds(&mut self, bounds: &BoundingBox) {
        self.write_vec3(&bounds.min);
        self.write_vec3(&bounds.max);
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Write `len` zero bytes
    pub fn write_zeros(&mut self, len: usize) {
        self.buffer.resize(self.buffer.len() + len, 0);
    }

    /// Write a UTF-8 string NUL-padded to exactly `len` bytes
    pub fn write_fixed_string(
        &mut self,
        field: &'static str,
        value: &str,
        len: usize,
    ) -> FormatResult<()> {
        let bytes = value.as_bytes();
        if bytes.len() > len {
            return Err(FormatError::CapacityExceeded {
                field,
                value: bytes.len() as u64,
                capacity: len as u64,
            });
        }
        self.write_bytes(bytes);
        self.write_zeros(len - bytes.len());
        Ok(())
    }

    /// Write a string table with its `u32` length prefix, returning name offsets
    pub fn write_string_table<'s>(
        &mut self,
        names: impl IntoIterator<Item = &'s str>,
    ) -> FormatResult<Vec<u32>> {
        let (offsets, table) = build_string_table(names)?;
        self.write_u32(super::checked_width("string_table_length", table.len(), u64::from(u32::MAX))?);
        self.write_bytes(&table);
        Ok(offsets)
    }
}
