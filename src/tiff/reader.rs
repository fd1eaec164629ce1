//! TIFF file reader implementation
//!
//! Parses the header and IFD chain of TIFF/BigTIFF files and decodes tag
//! values. Byte order is handled through the [`ByteOrderHandler`] strategy
//! chosen from the header marker.

use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, SeekFrom};
use std::path::{Path, PathBuf};

use crate::errors::{GeoError, GeoResult};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::{self, SeekableReader};
use crate::tiff::constants::field_types;
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;
use crate::tiff::validation;
use crate::utils::{format_utils, ifd_utils, tag_utils};

/// Upper bound on IFDs followed in one chain
const MAX_IFDS: usize = 100;

/// Reader for TIFF and BigTIFF files
pub struct TiffReader {
    /// Byte order handler, set once the header has been read
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Path of the last file loaded through [`TiffReader::load`]
    current_file: Option<PathBuf>,
    /// Whether the current stream is BigTIFF
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    /// Creates a new TIFF reader
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            current_file: None,
            is_big_tiff: false,
        }
    }

    /// Opens a file for buffered, seekable reading
    pub fn open(path: &Path) -> GeoResult<BufReader<File>> {
        let file = File::open(path)?;
        Ok(BufReader::with_capacity(1024 * 1024, file))
    }

    /// Loads the TIFF structure of the file at `path`
    pub fn load(&mut self, path: &Path) -> GeoResult<TIFF> {
        info!("Loading TIFF file: {}", path.display());
        self.current_file = Some(path.to_path_buf());

        let mut reader = Self::open(path)?;
        self.read(&mut reader)
    }

    /// Reads the header and the IFD chain from a stream
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> GeoResult<TIFF> {
        reader.seek(SeekFrom::Start(0))?;

        let handler = format_utils::detect_byte_order(reader)?;
        let (is_big_tiff, _) = format_utils::detect_tiff_format(reader, handler.as_ref())?;
        let byte_order = handler.byte_order();

        self.is_big_tiff = is_big_tiff;
        self.byte_order_handler = Some(handler);

        let first_ifd_offset = ifd_utils::read_ifd_offset(reader, is_big_tiff, self.handler()?)?;
        debug!("First IFD offset: {}", first_ifd_offset);

        let file_size = seekable::stream_len(reader)?;
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        let mut tiff = TIFF::new(is_big_tiff, byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;

        if tiff.ifds.is_empty() {
            return Err(GeoError::InvalidHeader);
        }

        debug!("Read {} IFDs", tiff.ifds.len());
        Ok(tiff)
    }

    /// Follows the next-IFD pointers starting at `first_ifd_offset`
    ///
    /// A broken pointer after at least one good IFD ends the chain with a
    /// warning; the first IFD is the only one geoclip needs.
    fn read_ifd_chain(
        &self,
        reader: &mut dyn SeekableReader,
        first_ifd_offset: u64,
        file_size: u64,
    ) -> GeoResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 && ifds.len() < MAX_IFDS {
            let ifd = match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok(ifd) => ifd,
                Err(e) if !ifds.is_empty() => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
                Err(e) => return Err(e),
            };

            let next_ifd_offset = ifd_utils::read_ifd_offset(reader, self.is_big_tiff, self.handler()?)?;
            ifds.push(ifd);

            if next_ifd_offset != 0 && validation::validate_ifd_offset(next_ifd_offset, file_size).is_err() {
                warn!("Invalid next IFD offset: {}, stopping IFD chain", next_ifd_offset);
                break;
            }
            ifd_offset = next_ifd_offset;
        }

        Ok(ifds)
    }

    /// Reads one IFD; leaves the stream positioned at its next-IFD pointer
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> GeoResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;
        let handler = self.handler()?;

        let entry_count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };
        debug!("IFD #{} at {} has {} entries", number, offset, entry_count);

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader)?;
            ifd.add_entry(entry);
        }

        Ok(ifd)
    }

    /// Reads a single IFD entry, decoding inline scalar values
    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> GeoResult<IFDEntry> {
        let handler = self.handler()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let field_len = if self.is_big_tiff { 8 } else { 4 };
        let mut raw_value = [0u8; 8];
        reader.read_exact(&mut raw_value[..field_len])?;

        let shape = IFDEntry::new(tag, field_type, count, 0);
        let value_offset = if shape.is_value_inline(self.is_big_tiff) {
            match field_type {
                field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED | field_types::ASCII => {
                    raw_value[0] as u64
                }
                field_types::SHORT | field_types::SSHORT => handler.u16_from(&raw_value) as u64,
                field_types::LONG | field_types::SLONG | field_types::FLOAT => handler.u32_from(&raw_value) as u64,
                _ => handler.u64_from(&raw_value),
            }
        } else if self.is_big_tiff {
            handler.u64_from(&raw_value)
        } else {
            handler.u32_from(&raw_value) as u64
        };

        Ok(IFDEntry::with_raw_value(tag, field_type, count, value_offset, raw_value))
    }

    /// Returns the raw bytes of a tag's values, in file byte order
    pub fn read_tag_bytes(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> GeoResult<Vec<u8>> {
        let size = entry.data_size();
        if entry.is_value_inline(self.is_big_tiff) {
            return Ok(entry.raw_value[..size as usize].to_vec());
        }
        seekable::read_bytes_at(reader, entry.value_offset, size)
    }

    /// Reads an integer-typed tag as a vector of u64
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> GeoResult<Vec<u64>> {
        let entry = ifd.get_entry(tag).ok_or(GeoError::TagNotFound(tag))?;
        let handler = self.handler()?;
        let mut cursor = Cursor::new(self.read_tag_bytes(reader, entry)?);

        let mut values = Vec::with_capacity(entry.count as usize);
        for _ in 0..entry.count {
            let value = match entry.field_type {
                field_types::BYTE | field_types::UNDEFINED => {
                    let mut byte = [0u8; 1];
                    cursor.read_exact(&mut byte)?;
                    byte[0] as u64
                }
                field_types::SHORT => handler.read_u16(&mut cursor)? as u64,
                field_types::LONG => handler.read_u32(&mut cursor)? as u64,
                field_types::LONG8 | field_types::IFD8 => handler.read_u64(&mut cursor)?,
                other => return Err(GeoError::UnsupportedFieldType(other)),
            };
            values.push(value);
        }

        Ok(values)
    }

    /// Reads a SHORT tag as a vector of u16
    pub fn read_tag_u16s(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> GeoResult<Vec<u16>> {
        let entry = ifd.get_entry(tag).ok_or(GeoError::TagNotFound(tag))?;
        if entry.field_type != field_types::SHORT {
            return Err(GeoError::UnsupportedFieldType(entry.field_type));
        }

        let handler = self.handler()?;
        let bytes = self.read_tag_bytes(reader, entry)?;
        Ok(bytes.chunks_exact(2).map(|chunk| handler.u16_from(chunk)).collect())
    }

    /// Reads a DOUBLE tag as a vector of f64
    pub fn read_tag_f64s(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> GeoResult<Vec<f64>> {
        let entry = ifd.get_entry(tag).ok_or(GeoError::TagNotFound(tag))?;
        if entry.field_type != field_types::DOUBLE {
            return Err(GeoError::UnsupportedFieldType(entry.field_type));
        }

        let handler = self.handler()?;
        let bytes = self.read_tag_bytes(reader, entry)?;
        Ok(bytes.chunks_exact(8).map(|chunk| f64::from_bits(handler.u64_from(chunk))).collect())
    }

    /// Reads an ASCII tag, dropping the trailing NUL terminator(s)
    pub fn read_tag_ascii(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> GeoResult<String> {
        let entry = ifd.get_entry(tag).ok_or(GeoError::TagNotFound(tag))?;
        let mut bytes = self.read_tag_bytes(reader, entry)?;
        while bytes.last() == Some(&0) {
            bytes.pop();
        }

        String::from_utf8(bytes)
            .map_err(|e| GeoError::GenericError(format!("Invalid UTF-8 in tag {}: {}", tag, e)))
    }

    /// Byte order of the current stream
    pub fn byte_order(&self) -> GeoResult<ByteOrder> {
        Ok(self.handler()?.byte_order())
    }

    /// Gets the file path if the structure was loaded from a file
    pub fn get_file_path(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Returns whether the current stream is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    fn handler(&self) -> GeoResult<&dyn ByteOrderHandler> {
        self.byte_order_handler
            .as_deref()
            .ok_or_else(|| GeoError::GenericError("Byte order not yet determined".to_string()))
    }
}

/// One-line summary of an entry, including its field type name
pub fn describe_entry(entry: &IFDEntry) -> String {
    format!("{} [{}]", entry.description(), tag_utils::get_field_type_name(entry.field_type))
}
