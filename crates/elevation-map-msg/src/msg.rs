//! Message types exchanged with map producers.
//!
//! These mirror the multi-array and elevation map messages that travel over the wire.
//! Transport and serialization are left to the caller.

use nalgebra::Vector3;

use crate::cell::CellValue;
use crate::color::pack_color;
use crate::error::MsgError;
use crate::layout::MultiArrayLayout;
use crate::map::GridMap;
use crate::{CellIndex, Position};

/// Flat array of `f32` values with a layout.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Float32MultiArray {
    /// How `data` represents the multi-dimensional array.
    pub layout: MultiArrayLayout,
    /// Backing values.
    pub data: Vec<f32>,
}

/// Flat array of `u32` values with a layout.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UInt32MultiArray {
    /// How `data` represents the multi-dimensional array.
    pub layout: MultiArrayLayout,
    /// Backing values.
    pub data: Vec<u32>,
}

/// A grid-based elevation map as published by a mapping node.
///
/// `elevation`, `variance` and `color` share the layout of `elevation`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElevationMap {
    /// Side length of the map along map-frame x (m).
    pub length_in_x: f64,
    /// Side length of the map along map-frame y (m).
    pub length_in_y: f64,
    /// Cell edge length (m).
    pub resolution: f64,
    /// Map centre in the map frame (m).
    pub position: Position,
    /// Circular buffer start along the outer axis.
    pub outer_start_index: i32,
    /// Circular buffer start along the inner axis.
    pub inner_start_index: i32,
    /// Elevation per cell (m).
    pub elevation: Float32MultiArray,
    /// Elevation variance per cell (m²).
    pub variance: Float32MultiArray,
    /// Packed `0xRRGGBB` color per cell.
    pub color: UInt32MultiArray,
}

impl ElevationMap {
    /// Builds the grid description of this message.
    ///
    /// # Errors
    ///
    /// Fails if the elevation layout is malformed or the geometry is invalid.
    pub fn grid_map(&self) -> Result<GridMap, MsgError> {
        GridMap::try_from(self)
    }

    /// Elevation and variance stored for `index`.
    ///
    /// Returns `None` if the index does not resolve to a stored value.
    pub fn cell_value(&self, grid: &GridMap, index: CellIndex) -> Option<CellValue> {
        let n = grid.flatten_index(index)?;
        let elevation = *self.elevation.data.get(n)?;
        let variance = *self.variance.data.get(n)?;
        Some(CellValue::new(elevation, variance))
    }

    /// Color channels stored for `index`.
    pub fn color_at(&self, grid: &GridMap, index: CellIndex) -> Option<Vector3<i32>> {
        let n = grid.flatten_index(index)?;
        self.color.data.get(n).map(|&value| pack_color(value))
    }

    /// Returns `true` if a valid reading is stored for `index`.
    pub fn is_valid_at(&self, grid: &GridMap, index: CellIndex) -> bool {
        self.cell_value(grid, index).is_some_and(|cell| cell.is_valid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn small_map() -> ElevationMap {
        let layout = MultiArrayLayout::row_major(2, 3);
        ElevationMap {
            length_in_x: 0.2,
            length_in_y: 0.3,
            resolution: 0.1,
            elevation: Float32MultiArray {
                layout: layout.clone(),
                data: vec![0.0, 0.1, 0.2, 1.0, f32::NAN, 1.2],
            },
            variance: Float32MultiArray {
                layout: layout.clone(),
                data: vec![0.01, 0.01, f32::INFINITY, 0.01, 0.01, 0.01],
            },
            color: UInt32MultiArray {
                layout,
                data: vec![0xff0000, 0x00ff00, 0x0000ff, 0, 0, 0x102030],
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_cell_value() {
        let msg = small_map();
        let grid = msg.grid_map().unwrap();
        assert_eq!(msg.cell_value(&grid, Vector2::new(1, 0)), Some(CellValue::new(1.0, 0.01)));
        assert_eq!(msg.cell_value(&grid, Vector2::new(0, 1)), Some(CellValue::new(0.1, 0.01)));
        assert_eq!(msg.cell_value(&grid, Vector2::new(2, 0)), None);
        assert_eq!(msg.cell_value(&grid, Vector2::new(-1, 0)), None);
    }

    #[test]
    fn test_color_at() {
        let msg = small_map();
        let grid = msg.grid_map().unwrap();
        assert_eq!(msg.color_at(&grid, Vector2::new(0, 2)), Some(Vector3::new(0, 0, 255)));
        assert_eq!(msg.color_at(&grid, Vector2::new(1, 2)), Some(Vector3::new(0x10, 0x20, 0x30)));
    }

    #[test]
    fn test_is_valid_at() {
        let msg = small_map();
        let grid = msg.grid_map().unwrap();
        assert!(msg.is_valid_at(&grid, Vector2::new(0, 0)));
        assert!(!msg.is_valid_at(&grid, Vector2::new(1, 1))); // NaN elevation
        assert!(!msg.is_valid_at(&grid, Vector2::new(0, 2))); // infinite variance
        assert!(!msg.is_valid_at(&grid, Vector2::new(5, 5)));
    }
}
