//! In-memory raster band
//!
//! A band is a row-major grid of samples of one [`DataType`], stored as
//! little-endian bytes whatever the byte order of the file it came from.
//! Keeping raw bytes means windows can be cut and written back out without
//! a round trip through floating point.

use crate::errors::{GeoError, GeoResult};
use crate::raster::data_type::DataType;

#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    rows: usize,
    cols: usize,
    data_type: DataType,
    data: Vec<u8>,
}

impl Band {
    /// Wraps little-endian sample bytes; the length must match the shape
    pub fn new(rows: usize, cols: usize, data_type: DataType, data: Vec<u8>) -> GeoResult<Self> {
        let expected = rows
            .checked_mul(cols)
            .and_then(|n| n.checked_mul(data_type.size()))
            .ok_or_else(|| GeoError::InvalidLayout(format!("{}x{} {} band is too large", rows, cols, data_type)))?;
        if data.len() != expected {
            return Err(GeoError::GenericError(format!(
                "Band data holds {} bytes, expected {} for {}x{} {}",
                data.len(),
                expected,
                rows,
                cols,
                data_type
            )));
        }

        Ok(Band { rows, cols, data_type, data })
    }

    /// Builds a band from sample values, converting each to `data_type`
    pub fn from_values(rows: usize, cols: usize, data_type: DataType, values: &[f64]) -> GeoResult<Self> {
        let mut data = Vec::with_capacity(values.len() * data_type.size());
        for &value in values {
            data_type.encode(value, &mut data);
        }
        Self::new(rows, cols, data_type, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Raw little-endian sample bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Sample at (row, col), or `None` outside the band
    pub fn sample(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let size = self.data_type.size();
        let start = (row * self.cols + col) * size;
        Some(self.data_type.decode(&self.data[start..start + size]))
    }

    /// Iterates over every sample in row-major order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        let data_type = self.data_type;
        self.data.chunks_exact(data_type.size()).map(move |chunk| data_type.decode(chunk))
    }

    /// Copies the window `[row..row+height, col..col+width]`
    ///
    /// The window is truncated at the bottom and right edges, so a window
    /// that starts inside the band is never empty. A start outside the band
    /// yields an empty band.
    pub fn window(&self, row: usize, col: usize, height: usize, width: usize) -> Band {
        let row_end = row.saturating_add(height).min(self.rows);
        let col_end = col.saturating_add(width).min(self.cols);
        let out_rows = row_end.saturating_sub(row);
        let out_cols = col_end.saturating_sub(col);

        let size = self.data_type.size();
        let mut data = Vec::with_capacity(out_rows * out_cols * size);
        for r in row..row + out_rows {
            let start = (r * self.cols + col) * size;
            data.extend_from_slice(&self.data[start..start + out_cols * size]);
        }

        Band {
            rows: out_rows,
            cols: out_cols,
            data_type: self.data_type,
            data,
        }
    }

    /// Arithmetic mean of all samples; NaN for an empty band
    ///
    /// A NaN sample makes the mean NaN, which never compares equal to zero.
    pub fn mean(&self) -> f64 {
        let count = self.rows * self.cols;
        if count == 0 {
            return f64::NAN;
        }
        self.values().sum::<f64>() / count as f64
    }

    /// Minimum and maximum over samples for which `keep` returns true
    pub fn min_max<F>(&self, keep: F) -> Option<(f64, f64)>
    where
        F: Fn(f64) -> bool,
    {
        self.values()
            .filter(|v| !v.is_nan() && keep(*v))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
