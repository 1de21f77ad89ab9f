//! Two-dimensional scalar field of signed real values.
//!
//! A `Field` stores `width * height` f64 values in row-major layout
//! (`index = y * width + x`). Column `x` runs over `[0, width)` and row `y`
//! over `[0, height)`. Values are not clamped: a wave amplitude, a potential
//! coefficient and a gradient magnitude all live in the same type.

use crate::error::EngineError;

/// A dense 2D grid of `f64` values with bounds-checked coordinate access.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

fn checked_len(width: usize, height: usize) -> Result<usize, EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(EngineError::InvalidDimensions)
}

impl Field {
    /// Creates a zero-filled field of the given dimensions.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        Self::filled(width, height, 0.0)
    }

    /// Creates a field with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: f64) -> Result<Self, EngineError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; len],
        })
    }

    /// Creates a field from a pre-built data vector, validating that
    /// `data.len() == width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<f64>) -> Result<Self, EngineError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(EngineError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Field width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed field.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat row-major index of `(x, y)`. The caller guarantees bounds.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Returns true if `(x, y)` addresses a cell of this field.
    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Gets the value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the field. Use [`Field::try_get`]
    /// for a checked lookup.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[self.index(x, y)]
    }

    /// Gets the value at `(x, y)`, or `OutOfBounds`.
    pub fn try_get(&self, x: usize, y: usize) -> Result<f64, EngineError> {
        if x >= self.width || y >= self.height {
            return Err(self.out_of_bounds(x, y));
        }
        Ok(self.get(x, y))
    }

    /// Sets the value at `(x, y)`, or returns `OutOfBounds`.
    pub fn set(&mut self, x: usize, y: usize, value: f64) -> Result<(), EngineError> {
        if x >= self.width || y >= self.height {
            return Err(self.out_of_bounds(x, y));
        }
        let idx = self.index(x, y);
        self.data[idx] = value;
        Ok(())
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> EngineError {
        EngineError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the underlying row-major data.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Overwrites this field with the contents of `other`.
    ///
    /// Returns `EngineError::DimensionMismatch` if the fields differ in size.
    pub fn copy_from(&mut self, other: &Field) -> Result<(), EngineError> {
        self.ensure_same_shape(other)?;
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// In-place element-wise addition.
    ///
    /// Returns `EngineError::DimensionMismatch` if the fields differ in size.
    pub fn add_assign(&mut self, other: &Field) -> Result<(), EngineError> {
        self.ensure_same_shape(other)?;
        self.data
            .iter_mut()
            .zip(other.data.iter())
            .for_each(|(a, b)| *a += b);
        Ok(())
    }

    fn ensure_same_shape(&self, other: &Field) -> Result<(), EngineError> {
        if self.width != other.width || self.height != other.height {
            return Err(EngineError::DimensionMismatch {
                lhs_w: self.width,
                lhs_h: self.height,
                rhs_w: other.width,
                rhs_h: other.height,
            });
        }
        Ok(())
    }

    /// Smallest and largest finite values, or `None` if no cell is finite.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Number of NaN or infinite cells.
    pub fn count_non_finite(&self) -> usize {
        self.data.iter().filter(|v| !v.is_finite()).count()
    }

    /// True when every cell is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Iterates over all cells yielding `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data.iter().enumerate().map(|(i, &v)| {
            let x = i % self.width;
            let y = i / self.width;
            (x, y, v)
        })
    }
}
