//! Georeferenced single-band rasters on disk
//!
//! [`GeoRaster::open`] reads band 1 of a GeoTIFF with its geotransform,
//! CRS tags and no-data marker; [`GeoRaster::write`] produces a GeoTIFF
//! that reads back to the same values.

use std::path::Path;

use log::{debug, warn};

use crate::compression::CompressionFactory;
use crate::errors::{GeoError, GeoResult};
use crate::io::seekable::SeekableReader;
use crate::raster::affine::Affine;
use crate::raster::band::Band;
use crate::raster::band_reader::BandReader;
use crate::raster::spatial_ref::SpatialReference;
use crate::tiff::constants::tags;
use crate::tiff::ifd::IFD;
use crate::tiff::{TiffBuilder, TiffReader};

/// Classic TIFF offsets are 32 bit
const CLASSIC_TIFF_LIMIT: u64 = u32::MAX as u64;

/// Options for writing a raster
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    /// Compression name: `none`, `deflate` or `zstd`
    pub compression: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            compression: "none".to_string(),
        }
    }
}

/// One band plus the metadata that places it on the earth
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRaster {
    pub band: Band,
    pub transform: Affine,
    pub spatial_ref: SpatialReference,
    pub nodata: Option<String>,
}

impl GeoRaster {
    pub fn new(band: Band, transform: Affine, spatial_ref: SpatialReference) -> Self {
        GeoRaster {
            band,
            transform,
            spatial_ref,
            nodata: None,
        }
    }

    /// Opens a GeoTIFF and reads its first band
    pub fn open(path: &Path) -> GeoResult<Self> {
        debug!("Opening raster {}", path.display());
        let mut reader = TiffReader::open(path)?;
        Self::read(&mut reader)
    }

    /// Reads a GeoTIFF from any seekable stream
    pub fn read(reader: &mut dyn SeekableReader) -> GeoResult<Self> {
        let mut tiff_reader = TiffReader::new();
        let tiff = tiff_reader.read(reader)?;
        Self::from_parts(&tiff_reader, tiff.ifds.first().ok_or(GeoError::InvalidHeader)?, reader)
    }

    fn from_parts(tiff_reader: &TiffReader, ifd: &IFD, reader: &mut dyn SeekableReader) -> GeoResult<Self> {
        let band = BandReader::new(tiff_reader, ifd).read_band(reader)?;
        let transform = read_transform(tiff_reader, ifd, reader)?;
        let spatial_ref = read_spatial_ref(tiff_reader, ifd, reader)?;

        let nodata = if ifd.has_tag(tags::GDAL_NODATA) {
            Some(tiff_reader.read_tag_ascii(reader, ifd, tags::GDAL_NODATA)?.trim().to_string())
        } else {
            None
        };

        Ok(GeoRaster {
            band,
            transform,
            spatial_ref,
            nodata,
        })
    }

    pub fn with_nodata(mut self, nodata: Option<String>) -> Self {
        self.nodata = nodata;
        self
    }

    /// No-data value parsed as a number, if it is one
    pub fn nodata_value(&self) -> Option<f64> {
        self.nodata.as_deref().and_then(|v| v.trim().parse().ok())
    }

    /// Writes the raster as a single-strip GeoTIFF
    pub fn write(&self, path: &Path, options: &WriteOptions) -> GeoResult<()> {
        self.to_builder(options)?.write(path)
    }

    /// Prepares the GeoTIFF encoding of this raster
    ///
    /// Switches to BigTIFF when the file would not fit in 32-bit offsets.
    pub fn to_builder(&self, options: &WriteOptions) -> GeoResult<TiffBuilder> {
        let handler = CompressionFactory::get_handler_by_name(&options.compression)?;
        let strip = handler.compress(self.band.as_bytes())?;

        let mut builder = self.builder(strip, handler.code())?;
        if builder.estimated_size() > CLASSIC_TIFF_LIMIT {
            debug!("{} bytes exceed classic TIFF limits, writing BigTIFF", builder.estimated_size());
            builder.promote_to_big_tiff();
        }
        Ok(builder)
    }

    fn builder(&self, strip: Vec<u8>, compression: u16) -> GeoResult<TiffBuilder> {
        let (rows, cols) = self.band.shape();
        let width = u32::try_from(cols).map_err(|_| GeoError::GenericError(format!("Width {} too large", cols)))?;
        let height = u32::try_from(rows).map_err(|_| GeoError::GenericError(format!("Height {} too large", rows)))?;

        let mut builder = TiffBuilder::new(false);
        let ifd = builder.add_ifd();
        builder.add_band_tags(ifd, width, height, self.band.data_type(), compression)?;
        builder.add_geotransform(ifd, &self.transform)?;
        builder.add_spatial_reference(ifd, &self.spatial_ref)?;
        if let Some(nodata) = &self.nodata {
            builder.add_nodata(ifd, nodata)?;
        }
        builder.setup_single_strip(ifd, strip)?;
        Ok(builder)
    }
}

fn read_transform(tiff_reader: &TiffReader, ifd: &IFD, reader: &mut dyn SeekableReader) -> GeoResult<Affine> {
    if ifd.has_tag(tags::MODEL_TRANSFORMATION_TAG) {
        let matrix = tiff_reader.read_tag_f64s(reader, ifd, tags::MODEL_TRANSFORMATION_TAG)?;
        if let Some(transform) = Affine::from_model_transformation(&matrix) {
            return Ok(transform);
        }
        warn!("ModelTransformationTag has {} values, expected 16", matrix.len());
    }

    if ifd.has_tag(tags::MODEL_PIXEL_SCALE_TAG) && ifd.has_tag(tags::MODEL_TIEPOINT_TAG) {
        let scale = tiff_reader.read_tag_f64s(reader, ifd, tags::MODEL_PIXEL_SCALE_TAG)?;
        let tiepoint = tiff_reader.read_tag_f64s(reader, ifd, tags::MODEL_TIEPOINT_TAG)?;
        if let Some(transform) = Affine::from_scale_and_tiepoint(&scale, &tiepoint) {
            return Ok(transform);
        }
        warn!("Incomplete pixel scale / tiepoint tags");
    }

    warn!("Raster has no geotransform, using identity");
    Ok(Affine::identity())
}

fn read_spatial_ref(
    tiff_reader: &TiffReader,
    ifd: &IFD,
    reader: &mut dyn SeekableReader,
) -> GeoResult<SpatialReference> {
    if !ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
        return Ok(SpatialReference::empty());
    }

    let directory = tiff_reader.read_tag_u16s(reader, ifd, tags::GEO_KEY_DIRECTORY_TAG)?;
    let doubles = if ifd.has_tag(tags::GEO_DOUBLE_PARAMS_TAG) {
        tiff_reader.read_tag_f64s(reader, ifd, tags::GEO_DOUBLE_PARAMS_TAG)?
    } else {
        Vec::new()
    };
    let ascii = if ifd.has_tag(tags::GEO_ASCII_PARAMS_TAG) {
        Some(tiff_reader.read_tag_ascii(reader, ifd, tags::GEO_ASCII_PARAMS_TAG)?)
    } else {
        None
    };

    Ok(SpatialReference::new(directory, doubles, ascii))
}
