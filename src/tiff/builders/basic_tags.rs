//! Baseline tags for a single-band raster

use log::debug;

use crate::raster::data_type::DataType;
use crate::tiff::constants::{field_types, photometric, planar_config, tags};
use crate::tiff::ifd::{IFD, IFDEntry};
use super::ImageData;

pub struct BasicTagsBuilder;

impl BasicTagsBuilder {
    /// Dimensions, sample layout and compression of a one-sample-per-pixel image
    pub fn add_band_tags(ifd: &mut IFD, width: u32, height: u32, data_type: DataType, compression: u16) {
        debug!("Adding band tags for {}x{} {} image", width, height, data_type);

        ifd.add_entry(IFDEntry::new(tags::IMAGE_WIDTH, field_types::LONG, 1, width as u64));
        ifd.add_entry(IFDEntry::new(tags::IMAGE_LENGTH, field_types::LONG, 1, height as u64));
        ifd.add_entry(IFDEntry::new(
            tags::BITS_PER_SAMPLE,
            field_types::SHORT,
            1,
            data_type.bits_per_sample() as u64,
        ));
        ifd.add_entry(IFDEntry::new(tags::COMPRESSION, field_types::SHORT, 1, compression as u64));
        ifd.add_entry(IFDEntry::new(
            tags::PHOTOMETRIC_INTERPRETATION,
            field_types::SHORT,
            1,
            photometric::BLACK_IS_ZERO as u64,
        ));
        ifd.add_entry(IFDEntry::new(tags::SAMPLES_PER_PIXEL, field_types::SHORT, 1, 1));
        ifd.add_entry(IFDEntry::new(
            tags::PLANAR_CONFIGURATION,
            field_types::SHORT,
            1,
            planar_config::CHUNKY as u64,
        ));
        ifd.add_entry(IFDEntry::new(
            tags::SAMPLE_FORMAT,
            field_types::SHORT,
            1,
            data_type.sample_format() as u64,
        ));
    }

    /// Stores the whole image as one strip
    ///
    /// StripOffsets is a placeholder until the writer has laid out the file.
    /// BigTIFF output uses LONG8 so offsets past 4 GiB stay representable.
    pub fn setup_single_strip(
        ifd: &mut IFD,
        image_data: &mut ImageData,
        ifd_index: usize,
        strip_data: Vec<u8>,
        is_big_tiff: bool,
    ) {
        debug!("Setting up single strip: {} bytes", strip_data.len());
        let offset_type = if is_big_tiff { field_types::LONG8 } else { field_types::LONG };

        ifd.add_entry(IFDEntry::new(tags::STRIP_OFFSETS, offset_type, 1, 0));
        ifd.add_entry(IFDEntry::new(tags::STRIP_BYTE_COUNTS, offset_type, 1, strip_data.len() as u64));

        if let Some((_, height)) = ifd.get_dimensions() {
            ifd.add_entry(IFDEntry::new(tags::ROWS_PER_STRIP, field_types::LONG, 1, height));
        }

        image_data.insert(ifd_index, strip_data);
    }
}
