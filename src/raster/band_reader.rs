//! Pixel data decoding for the first IFD of a TIFF
//!
//! Handles both strip and tile organisation. Every chunk is read,
//! decompressed, normalised to little-endian and un-predicted before it is
//! copied into the band buffer.

use log::{debug, info};

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::errors::{GeoError, GeoResult};
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::{self, SeekableReader};
use crate::raster::band::Band;
use crate::raster::data_type::DataType;
use crate::tiff::constants::{predictor, sample_format, tags};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::validation;

/// Chunk geometry: strips are tiles as wide as the image
struct ChunkLayout {
    chunk_width: usize,
    chunk_height: usize,
    chunks_across: usize,
    chunks_down: usize,
    offsets: Vec<u64>,
    byte_counts: Vec<u64>,
}

/// Reads one band from a parsed IFD
pub struct BandReader<'a> {
    tiff_reader: &'a TiffReader,
    ifd: &'a IFD,
}

impl<'a> BandReader<'a> {
    pub fn new(tiff_reader: &'a TiffReader, ifd: &'a IFD) -> Self {
        BandReader { tiff_reader, ifd }
    }

    /// Sample type declared by BitsPerSample and SampleFormat
    pub fn data_type(&self, reader: &mut dyn SeekableReader) -> GeoResult<DataType> {
        let bits = self.first_value(reader, tags::BITS_PER_SAMPLE)?.unwrap_or(1);
        let format = self
            .first_value(reader, tags::SAMPLE_FORMAT)?
            .unwrap_or(sample_format::UNSIGNED as u64);

        DataType::from_tags(bits as u16, format as u16)
    }

    /// Decodes the full band into memory
    ///
    /// Chunks are decoded one chunk row at a time; the band buffer only
    /// grows by rows that decoded.
    pub fn read_band(&self, reader: &mut dyn SeekableReader) -> GeoResult<Band> {
        let (width, height) = self.ifd.get_dimensions().ok_or(GeoError::MissingDimensions)?;
        let (width, height) = (width as usize, height as usize);
        if width == 0 || height == 0 {
            return Err(GeoError::InvalidLayout(format!("image is {}x{} pixels", width, height)));
        }

        let samples = self.ifd.get_samples_per_pixel();
        if samples != 1 {
            return Err(GeoError::UnsupportedBandCount(samples));
        }

        let data_type = self.data_type(reader)?;
        let compression = self.ifd.get_tag_value(tags::COMPRESSION).unwrap_or(1);
        let handler = CompressionFactory::create_handler(compression)?;
        let predictor = self.ifd.get_tag_value(tags::PREDICTOR).unwrap_or(predictor::NONE as u64);
        if predictor != predictor::NONE as u64 && predictor != predictor::HORIZONTAL_DIFFERENCING as u64 {
            return Err(GeoError::UnsupportedPredictor(predictor));
        }
        let byte_order = self.tiff_reader.byte_order()?;

        let size = data_type.size();
        let row_bytes = checked_size(&[width, size])?;
        let band_bytes = checked_size(&[row_bytes, height])?;

        let layout = self.chunk_layout(reader, width, height)?;
        let needed = checked_size(&[layout.chunks_across, layout.chunks_down])?;
        if layout.offsets.len() < needed {
            return Err(GeoError::InvalidLayout(format!(
                "{} chunk offsets listed, {} needed for a {}x{} image",
                layout.offsets.len(),
                needed,
                width,
                height
            )));
        }
        let file_size = seekable::stream_len(reader)?;
        validation::validate_chunks(&layout.offsets, &layout.byte_counts, file_size)?;

        info!(
            "Reading {}x{} {} band: {} {} chunk(s), {} compression",
            width,
            height,
            data_type,
            needed,
            if self.ifd.is_tiled() { "tile" } else { "strip" },
            handler.name()
        );

        let mut data = Vec::new();
        data.try_reserve_exact(band_bytes).map_err(|e| {
            GeoError::InvalidLayout(format!("cannot hold a {} byte band: {}", band_bytes, e))
        })?;

        for chunk_row in 0..layout.chunks_down {
            let first_row = chunk_row * layout.chunk_height;
            let copy_rows = layout.chunk_height.min(height - first_row);
            let rows_in_chunk = if self.ifd.is_tiled() { layout.chunk_height } else { copy_rows };

            let mut chunks = Vec::with_capacity(layout.chunks_across);
            for chunk_col in 0..layout.chunks_across {
                let index = chunk_row * layout.chunks_across + chunk_col;
                let byte_count = layout.byte_counts[index];
                if byte_count == 0 {
                    debug!("Chunk {} is sparse, leaving it zero", index);
                    chunks.push(None);
                    continue;
                }

                chunks.push(Some(self.read_chunk(
                    reader,
                    layout.offsets[index],
                    byte_count,
                    handler.as_ref(),
                    byte_order,
                    predictor,
                    layout.chunk_width,
                    rows_in_chunk,
                    size,
                )?));
            }

            for r in 0..copy_rows {
                for (chunk_col, chunk) in chunks.iter().enumerate() {
                    let first_col = chunk_col * layout.chunk_width;
                    let copy_bytes = layout.chunk_width.min(width - first_col) * size;
                    match chunk {
                        Some(chunk) => {
                            let src = r * layout.chunk_width * size;
                            data.extend_from_slice(&chunk[src..src + copy_bytes]);
                        }
                        None => data.resize(data.len() + copy_bytes, 0),
                    }
                }
            }
        }

        Band::new(height, width, data_type, data)
    }

    fn chunk_layout(&self, reader: &mut dyn SeekableReader, width: usize, height: usize) -> GeoResult<ChunkLayout> {
        if self.ifd.is_tiled() {
            let tile_width = self.ifd.get_tag_value(tags::TILE_WIDTH).unwrap_or(0) as usize;
            let tile_height = self.ifd.get_tag_value(tags::TILE_LENGTH).unwrap_or(0) as usize;
            if tile_width == 0 || tile_height == 0 {
                return Err(GeoError::InvalidLayout("tile dimensions must be positive".to_string()));
            }

            Ok(ChunkLayout {
                chunk_width: tile_width,
                chunk_height: tile_height,
                chunks_across: width.div_ceil(tile_width),
                chunks_down: height.div_ceil(tile_height),
                offsets: self.tiff_reader.read_tag_values(reader, self.ifd, tags::TILE_OFFSETS)?,
                byte_counts: self.tiff_reader.read_tag_values(reader, self.ifd, tags::TILE_BYTE_COUNTS)?,
            })
        } else {
            let rows_per_strip = self
                .ifd
                .get_tag_value(tags::ROWS_PER_STRIP)
                .map(|r| r as usize)
                .filter(|&r| r > 0)
                .unwrap_or(height)
                .min(height);

            Ok(ChunkLayout {
                chunk_width: width,
                chunk_height: rows_per_strip,
                chunks_across: 1,
                chunks_down: height.div_ceil(rows_per_strip),
                offsets: self.tiff_reader.read_tag_values(reader, self.ifd, tags::STRIP_OFFSETS)?,
                byte_counts: self.tiff_reader.read_tag_values(reader, self.ifd, tags::STRIP_BYTE_COUNTS)?,
            })
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn read_chunk(
        &self,
        reader: &mut dyn SeekableReader,
        offset: u64,
        byte_count: u64,
        handler: &dyn CompressionHandler,
        byte_order: ByteOrder,
        predictor: u64,
        chunk_width: usize,
        rows: usize,
        sample_size: usize,
    ) -> GeoResult<Vec<u8>> {
        let raw = seekable::read_bytes_at(reader, offset, byte_count)?;
        let mut chunk = handler.decompress(&raw)?;

        let expected = checked_size(&[chunk_width, rows, sample_size])?;
        if chunk.len() < expected {
            return Err(GeoError::GenericError(format!(
                "Chunk at offset {} decoded to {} bytes, expected {}",
                offset,
                chunk.len(),
                expected
            )));
        }
        chunk.truncate(expected);

        byte_order.normalize_to_little_endian(&mut chunk, sample_size);
        if predictor == predictor::HORIZONTAL_DIFFERENCING as u64 {
            undo_horizontal_predictor(&mut chunk, chunk_width, sample_size);
        }

        Ok(chunk)
    }

    fn first_value(&self, reader: &mut dyn SeekableReader, tag: u16) -> GeoResult<Option<u64>> {
        if !self.ifd.has_tag(tag) {
            return Ok(None);
        }
        let values = self.tiff_reader.read_tag_values(reader, self.ifd, tag)?;
        if values.windows(2).any(|pair| pair[0] != pair[1]) {
            return Err(GeoError::GenericError(format!("Tag {} differs between samples", tag)));
        }
        Ok(values.first().copied())
    }
}

/// Product of `factors`, or a layout error if it overflows `usize`
fn checked_size(factors: &[usize]) -> GeoResult<usize> {
    factors
        .iter()
        .try_fold(1usize, |acc, &f| acc.checked_mul(f))
        .ok_or_else(|| GeoError::InvalidLayout(format!("size {:?} overflows", factors)))
}

/// Reverses horizontal differencing on little-endian samples
///
/// Each sample was stored as the difference to its left neighbour, with
/// wrapping arithmetic at the sample's integer width.
fn undo_horizontal_predictor(data: &mut [u8], row_width: usize, sample_size: usize) {
    let row_bytes = row_width * sample_size;
    if row_bytes == 0 {
        return;
    }

    for row in data.chunks_exact_mut(row_bytes) {
        match sample_size {
            1 => {
                for i in 1..row.len() {
                    row[i] = row[i].wrapping_add(row[i - 1]);
                }
            }
            2 => {
                for i in (2..row.len()).step_by(2) {
                    let prev = u16::from_le_bytes([row[i - 2], row[i - 1]]);
                    let cur = u16::from_le_bytes([row[i], row[i + 1]]);
                    row[i..i + 2].copy_from_slice(&cur.wrapping_add(prev).to_le_bytes());
                }
            }
            4 => {
                for i in (4..row.len()).step_by(4) {
                    let prev = u32::from_le_bytes([row[i - 4], row[i - 3], row[i - 2], row[i - 1]]);
                    let cur = u32::from_le_bytes([row[i], row[i + 1], row[i + 2], row[i + 3]]);
                    row[i..i + 4].copy_from_slice(&cur.wrapping_add(prev).to_le_bytes());
                }
            }
            _ => {
                for i in (8..row.len()).step_by(8) {
                    let mut prev = [0u8; 8];
                    let mut cur = [0u8; 8];
                    prev.copy_from_slice(&row[i - 8..i]);
                    cur.copy_from_slice(&row[i..i + 8]);
                    let sum = u64::from_le_bytes(cur).wrapping_add(u64::from_le_bytes(prev));
                    row[i..i + 8].copy_from_slice(&sum.to_le_bytes());
                }
            }
        }
    }
}
