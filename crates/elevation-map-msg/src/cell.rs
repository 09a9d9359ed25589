//! Elevation cell readings.

use core::fmt;

/// A single elevation reading with its variance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellValue {
    /// Elevation (m).
    pub elevation: f32,
    /// Variance of the elevation (m²).
    pub variance: f32,
}

impl CellValue {
    /// Construct a new cell value.
    pub const fn new(elevation: f32, variance: f32) -> Self {
        CellValue {
            elevation,
            variance,
        }
    }

    /// See [`is_valid_cell`].
    pub fn is_valid(&self) -> bool {
        is_valid_cell(self.elevation, self.variance)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(elevation: {:.3} m, variance: {:.3})", self.elevation, self.variance)
    }
}

/// Returns `true` unless the elevation is NaN or the variance is infinite.
///
/// The check is intentionally asymmetric: an infinite elevation and a NaN variance
/// both count as valid.
pub fn is_valid_cell(elevation: f32, variance: f32) -> bool {
    !(elevation.is_nan() || variance.is_infinite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_cell() {
        assert!(is_valid_cell(1.0, 0.0));
        assert!(!is_valid_cell(f32::NAN, 0.0));
        assert!(!is_valid_cell(1.0, f32::INFINITY));
        assert!(!is_valid_cell(1.0, f32::NEG_INFINITY));
    }

    #[test]
    fn test_is_valid_cell_asymmetry() {
        assert!(is_valid_cell(f32::INFINITY, 0.0));
        assert!(is_valid_cell(f32::NEG_INFINITY, 0.0));
        assert!(is_valid_cell(1.0, f32::NAN));
        assert!(!is_valid_cell(f32::NAN, f32::NAN));
    }

    #[test]
    fn test_cell_value() {
        assert!(CellValue::new(0.25, 0.01).is_valid());
        assert!(!CellValue::new(f32::NAN, 0.01).is_valid());
        assert_eq!(CellValue::default(), CellValue::new(0.0, 0.0));
    }
}
