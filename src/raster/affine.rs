//! Affine pixel-to-world transform

use std::fmt;

use log::debug;

/// Six-coefficient affine transform
///
/// `x = a * col + b * row + c` and `y = d * col + e * row + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Affine { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Affine::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// World coordinate of pixel (col, row)
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// Same pixel size and rotation, with pixel (0, 0) moved to `(x, y)`
    pub fn with_origin(&self, x: f64, y: f64) -> Self {
        Affine { c: x, f: y, ..*self }
    }

    /// Transform of a sub-window whose top-left pixel is (col, row) here
    pub fn for_window(&self, col: usize, row: usize) -> Self {
        let (x, y) = self.apply(col as f64, row as f64);
        self.with_origin(x, y)
    }

    /// True when the grid is north-up (no rotation or shear terms)
    pub fn is_rectilinear(&self) -> bool {
        self.b == 0.0 && self.d == 0.0
    }

    /// Builds the transform from a ModelTransformationTag (4x4, row-major)
    pub fn from_model_transformation(matrix: &[f64]) -> Option<Self> {
        if matrix.len() < 16 {
            return None;
        }
        Some(Affine::new(matrix[0], matrix[1], matrix[3], matrix[4], matrix[5], matrix[7]))
    }

    /// Builds the transform from ModelPixelScale and the first ModelTiepoint
    ///
    /// The tiepoint ties raster (i, j) to world (x, y); y pixel size is
    /// stored positive and points down the raster, hence the sign flip.
    pub fn from_scale_and_tiepoint(scale: &[f64], tiepoint: &[f64]) -> Option<Self> {
        if scale.len() < 2 || tiepoint.len() < 6 {
            return None;
        }
        let (sx, sy) = (scale[0], scale[1]);
        let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
        debug!("Pixel scale ({}, {}), tiepoint ({}, {}) -> ({}, {})", sx, sy, i, j, x, y);

        Some(Affine::new(sx, 0.0, x - i * sx, 0.0, -sy, y + j * sy))
    }

    /// ModelPixelScale values for a north-up transform
    pub fn to_pixel_scale(&self) -> [f64; 3] {
        [self.a, -self.e, 0.0]
    }

    /// ModelTiepoint tying raster (0, 0) to the origin
    pub fn to_tiepoint(&self) -> [f64; 6] {
        [0.0, 0.0, 0.0, self.c, self.f, 0.0]
    }

    /// ModelTransformationTag matrix
    pub fn to_model_transformation(&self) -> [f64; 16] {
        [
            self.a, self.b, 0.0, self.c,
            self.d, self.e, 0.0, self.f,
            0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]
    }
}

impl Default for Affine {
    fn default() -> Self {
        Affine::identity()
    }
}

impl fmt::Display for Affine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {:.6}, {:.6}, {:.6} |\n| {:.6}, {:.6}, {:.6} |",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}
