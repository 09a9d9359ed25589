#![warn(missing_docs)]

//! Alignment between buffer-order axes and map-frame axes.
//!
//! The backing storage of a grid is indexed along two buffer-order axes that need not
//! coincide with the map frame's x and y axes. An [`Alignment`] holds the fixed signed
//! permutation matrix that maps buffer-order vectors into the map frame. It is handed to
//! every conversion explicitly so different conventions can coexist.

use core::fmt;

use nalgebra::{Matrix2, Vector2};

use crate::error::MsgError;

/// Signed permutation taking buffer-order vectors into the map frame.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    buffer_to_map: Matrix2<i32>,
}

impl Alignment {
    /// Creates an alignment from its buffer-order to map-frame matrix.
    ///
    /// # Errors
    ///
    /// Returns `Err(MsgError::InvalidAlignment)` unless every row and every column holds
    /// exactly one non-zero entry and that entry is `1` or `-1`.
    pub fn new(buffer_to_map: Matrix2<i32>) -> Result<Self, MsgError> {
        if buffer_to_map.iter().any(|v| !(-1..=1).contains(v)) {
            return Err(MsgError::InvalidAlignment("entries must be -1, 0 or 1"));
        }
        let nonzero = buffer_to_map.map(|v| i32::from(v != 0));
        let rows_ok = nonzero.row_sum().iter().all(|&n| n == 1);
        let cols_ok = nonzero.column_sum().iter().all(|&n| n == 1);
        if !(rows_ok && cols_ok) {
            return Err(MsgError::InvalidAlignment("must be a signed permutation"));
        }
        Ok(Alignment { buffer_to_map })
    }

    /// Buffer order and map frame coincide.
    pub fn identity() -> Self {
        Alignment {
            buffer_to_map: Matrix2::identity(),
        }
    }

    /// Matrix taking buffer-order vectors into the map frame.
    pub fn buffer_to_map(&self) -> Matrix2<i32> {
        self.buffer_to_map
    }

    /// Matrix taking map-frame vectors into buffer order (the transpose).
    pub fn map_to_buffer(&self) -> Matrix2<i32> {
        self.buffer_to_map.transpose()
    }

    /// Unsigned permutation, used for sizes, lengths and start indices.
    pub fn permutation(&self) -> Matrix2<i32> {
        self.buffer_to_map.abs()
    }

    /// Reorders a non-negative integer pair (sizes, start indices) into buffer order.
    pub fn permute(&self, v: Vector2<i32>) -> Vector2<i32> {
        self.permutation() * v
    }

    /// Reorders a map-frame length into buffer order.
    pub fn permute_length(&self, length: Vector2<f64>) -> Vector2<f64> {
        self.permutation().cast::<f64>() * length
    }

    /// Rotates a buffer-order vector into the map frame.
    pub fn to_map(&self, v: Vector2<f64>) -> Vector2<f64> {
        self.buffer_to_map.cast::<f64>() * v
    }

    /// Rotates a map-frame vector into buffer order.
    pub fn to_buffer(&self, v: Vector2<f64>) -> Vector2<f64> {
        self.map_to_buffer().cast::<f64>() * v
    }
}

impl Default for Alignment {
    /// Buffer indices grow toward negative map x and y.
    fn default() -> Self {
        Alignment {
            buffer_to_map: -Matrix2::identity(),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.buffer_to_map;
        write!(f, "[[{}, {}], [{}, {}]]", m[(0, 0)], m[(0, 1)], m[(1, 0)], m[(1, 1)])
    }
}
