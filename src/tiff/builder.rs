//! Single-band GeoTIFF construction
//!
//! Collects tags and pixel data for one or more IFDs, then hands them to the
//! [`WriterBuilder`] which lays the file out.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use log::{debug, error};

use crate::errors::{GeoError, GeoResult};
use crate::raster::affine::Affine;
use crate::raster::data_type::DataType;
use crate::raster::spatial_ref::SpatialReference;
use crate::tiff::builders::basic_tags::BasicTagsBuilder;
use crate::tiff::builders::geo_tags::GeoTagsBuilder;
use crate::tiff::builders::writer::WriterBuilder;
use crate::tiff::builders::{ExternalData, ImageData};
use crate::tiff::constants::{field_types, tags};
use crate::tiff::ifd::{IFD, IFDEntry};

pub struct TiffBuilder {
    is_big_tiff: bool,
    pub ifds: Vec<IFD>,
    image_data: ImageData,
    external_data: ExternalData,
}

impl TiffBuilder {
    pub fn new(is_big_tiff: bool) -> Self {
        debug!("Creating TiffBuilder (is_big_tiff: {})", is_big_tiff);
        TiffBuilder {
            is_big_tiff,
            ifds: Vec::new(),
            image_data: ImageData::new(),
            external_data: ExternalData::new(),
        }
    }

    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Switches the output to BigTIFF, widening strip offsets to LONG8
    pub fn promote_to_big_tiff(&mut self) {
        self.is_big_tiff = true;
        for ifd in &mut self.ifds {
            let widened: Vec<IFDEntry> = ifd
                .entries
                .iter()
                .filter(|e| e.tag == tags::STRIP_OFFSETS || e.tag == tags::STRIP_BYTE_COUNTS)
                .map(|e| IFDEntry::new(e.tag, field_types::LONG8, e.count, e.value_offset))
                .collect();
            for entry in widened {
                ifd.add_entry(entry);
            }
        }
    }

    /// Adds an empty IFD and returns its index
    pub fn add_ifd(&mut self) -> usize {
        let index = self.ifds.len();
        self.ifds.push(IFD::new(index, 0));
        index
    }

    /// Baseline tags for a one-sample-per-pixel image
    pub fn add_band_tags(
        &mut self,
        ifd_index: usize,
        width: u32,
        height: u32,
        data_type: DataType,
        compression: u16,
    ) -> GeoResult<()> {
        let ifd = ifd_at(&mut self.ifds, ifd_index)?;
        BasicTagsBuilder::add_band_tags(ifd, width, height, data_type, compression);
        Ok(())
    }

    /// Stores already encoded pixel data as a single strip
    pub fn setup_single_strip(&mut self, ifd_index: usize, strip_data: Vec<u8>) -> GeoResult<()> {
        let is_big_tiff = self.is_big_tiff;
        let ifd = ifd_at(&mut self.ifds, ifd_index)?;
        BasicTagsBuilder::setup_single_strip(ifd, &mut self.image_data, ifd_index, strip_data, is_big_tiff);
        Ok(())
    }

    pub fn add_geotransform(&mut self, ifd_index: usize, transform: &Affine) -> GeoResult<()> {
        let ifd = ifd_at(&mut self.ifds, ifd_index)?;
        GeoTagsBuilder::add_geotransform(ifd, &mut self.external_data, ifd_index, transform);
        Ok(())
    }

    pub fn add_spatial_reference(&mut self, ifd_index: usize, srs: &SpatialReference) -> GeoResult<()> {
        let ifd = ifd_at(&mut self.ifds, ifd_index)?;
        GeoTagsBuilder::add_spatial_reference(ifd, &mut self.external_data, ifd_index, srs);
        Ok(())
    }

    pub fn add_nodata(&mut self, ifd_index: usize, nodata: &str) -> GeoResult<()> {
        let ifd = ifd_at(&mut self.ifds, ifd_index)?;
        GeoTagsBuilder::add_nodata(ifd, &mut self.external_data, ifd_index, nodata);
        Ok(())
    }

    /// Size the file would have, in bytes
    pub fn estimated_size(&self) -> u64 {
        WriterBuilder::estimated_size(&self.ifds, &self.image_data, &self.external_data, self.is_big_tiff)
    }

    /// Writes to any seekable sink
    pub fn write_to<W: Write + Seek>(&self, writer: &mut W) -> GeoResult<()> {
        WriterBuilder::write(writer, self.is_big_tiff, &self.ifds, &self.image_data, &self.external_data)
    }

    /// Creates (or truncates) `output_path` and writes the TIFF to it
    pub fn write(&self, output_path: &Path) -> GeoResult<()> {
        debug!("Writing TIFF to {}", output_path.display());
        let file = File::create(output_path)?;
        let mut writer = BufWriter::with_capacity(1024 * 1024, file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

fn ifd_at(ifds: &mut [IFD], ifd_index: usize) -> GeoResult<&mut IFD> {
    let count = ifds.len();
    ifds.get_mut(ifd_index).ok_or_else(|| {
        error!("Invalid IFD index {}, only have {} IFDs", ifd_index, count);
        GeoError::GenericError(format!("Invalid IFD index {}, only have {} IFDs", ifd_index, count))
    })
}
