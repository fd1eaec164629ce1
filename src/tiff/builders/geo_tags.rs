//! Georeferencing tags
//!
//! Writes the geotransform, the CRS payload and the GDAL no-data marker.

use log::{debug, warn};

use crate::raster::affine::Affine;
use crate::raster::spatial_ref::SpatialReference;
use crate::tiff::constants::{field_types, tags};
use crate::tiff::ifd::IFD;
use super::{add_data_tag, ExternalData};

pub struct GeoTagsBuilder;

impl GeoTagsBuilder {
    /// Writes the geotransform
    ///
    /// North-up transforms use ModelPixelScale + ModelTiepoint, which every
    /// reader understands; rotated ones need the full ModelTransformation.
    pub fn add_geotransform(ifd: &mut IFD, external_data: &mut ExternalData, ifd_index: usize, transform: &Affine) {
        if transform.is_rectilinear() {
            debug!("Writing pixel scale and tiepoint for origin ({}, {})", transform.c, transform.f);
            add_data_tag(
                ifd,
                external_data,
                ifd_index,
                tags::MODEL_PIXEL_SCALE_TAG,
                field_types::DOUBLE,
                3,
                doubles_to_bytes(&transform.to_pixel_scale()),
            );
            add_data_tag(
                ifd,
                external_data,
                ifd_index,
                tags::MODEL_TIEPOINT_TAG,
                field_types::DOUBLE,
                6,
                doubles_to_bytes(&transform.to_tiepoint()),
            );
        } else {
            debug!("Writing model transformation for rotated grid");
            add_data_tag(
                ifd,
                external_data,
                ifd_index,
                tags::MODEL_TRANSFORMATION_TAG,
                field_types::DOUBLE,
                16,
                doubles_to_bytes(&transform.to_model_transformation()),
            );
        }
    }

    /// Copies the CRS payload unchanged
    pub fn add_spatial_reference(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        ifd_index: usize,
        srs: &SpatialReference,
    ) {
        if srs.is_empty() {
            return;
        }

        let directory = srs.key_directory();
        let mut bytes = Vec::with_capacity(directory.len() * 2);
        for value in directory {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        add_data_tag(
            ifd,
            external_data,
            ifd_index,
            tags::GEO_KEY_DIRECTORY_TAG,
            field_types::SHORT,
            directory.len() as u64,
            bytes,
        );

        if !srs.double_params().is_empty() {
            add_data_tag(
                ifd,
                external_data,
                ifd_index,
                tags::GEO_DOUBLE_PARAMS_TAG,
                field_types::DOUBLE,
                srs.double_params().len() as u64,
                doubles_to_bytes(srs.double_params()),
            );
        }

        if let Some(ascii) = srs.ascii_params() {
            let bytes = ascii_bytes(ascii);
            add_data_tag(
                ifd,
                external_data,
                ifd_index,
                tags::GEO_ASCII_PARAMS_TAG,
                field_types::ASCII,
                bytes.len() as u64,
                bytes,
            );
        }
    }

    /// GDAL_NODATA as a NUL-terminated ASCII string
    pub fn add_nodata(ifd: &mut IFD, external_data: &mut ExternalData, ifd_index: usize, nodata: &str) {
        let trimmed = nodata.trim();
        if trimmed.is_empty() {
            warn!("Ignoring empty no-data value");
            return;
        }

        let bytes = ascii_bytes(trimmed);
        add_data_tag(
            ifd,
            external_data,
            ifd_index,
            tags::GDAL_NODATA,
            field_types::ASCII,
            bytes.len() as u64,
            bytes,
        );
    }
}

fn doubles_to_bytes(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn ascii_bytes(text: &str) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.push(0);
    bytes
}
