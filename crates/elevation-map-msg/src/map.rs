#![warn(missing_docs)]

//! Grid geometry: map extent, resolution and circular buffer start, with the conversions
//! between cell indices and map-frame positions.

use core::fmt;

use nalgebra::Vector2;
use tracing::debug;

use crate::alignment::Alignment;
use crate::error::MsgError;
use crate::layout::GridLayout;
use crate::msg::ElevationMap;
use crate::transform;
use crate::{CellIndex, Position};

/// A rectangular grid over a planar region, backed by a circular buffer.
///
/// Cell indices are in buffer order: `index.x` runs over rows and `index.y` over columns
/// of the backing layout.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GridMap {
    /// Side lengths along map-frame x and y (m).
    length: Vector2<f64>,
    /// Cell edge length (m).
    resolution: f64,
    /// Map centre in the map frame (m).
    position: Position,
    /// Storage index of the logical first cell, as (outer, inner).
    buffer_start_index: CellIndex,
    /// Layout of the backing buffer.
    layout: GridLayout,
}

impl GridMap {
    /// Creates a new GridMap with its start index at the beginning of the buffer.
    ///
    /// # Arguments
    /// * `length` - Side lengths along map-frame x and y (m)
    /// * `resolution` - Cell edge length (m)
    /// * `position` - Map centre in the map frame (m)
    /// * `layout` - Layout of the backing buffer
    ///
    /// # Returns
    /// * `Result<Self, MsgError>` - The created GridMap or an error if parameters are invalid
    pub fn new(
        length: Vector2<f64>,
        resolution: f64,
        position: Position,
        layout: GridLayout,
    ) -> Result<Self, MsgError> {
        if !(resolution > 0.0 && resolution.is_finite()) {
            return Err(MsgError::InvalidResolution("Resolution must be positive"));
        }
        if !length.iter().all(|l| l.is_finite() && *l >= 0.0) {
            return Err(MsgError::InvalidLength("Lengths must be finite and non-negative"));
        }

        Ok(GridMap {
            length,
            resolution,
            position,
            buffer_start_index: Vector2::zeros(),
            layout,
        })
    }

    /// Sets the storage index of the logical first cell.
    ///
    /// Any value is accepted; it is wrapped into the buffer when converting.
    #[must_use]
    pub fn with_buffer_start_index(mut self, buffer_start_index: CellIndex) -> Self {
        self.buffer_start_index = buffer_start_index;
        self
    }

    /// Side lengths along map-frame x and y (m).
    pub fn length(&self) -> Vector2<f64> {
        self.length
    }

    /// Cell edge length (m).
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Map centre in the map frame (m).
    pub fn position(&self) -> Position {
        self.position
    }

    /// Storage index of the logical first cell, as (outer, inner).
    pub fn buffer_start_index(&self) -> CellIndex {
        self.buffer_start_index
    }

    /// Layout of the backing buffer.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// `(rows, cols)` reordered into buffer order by `alignment`.
    pub fn buffer_size(&self, alignment: &Alignment) -> Vector2<i32> {
        let rows = i32::try_from(self.layout.rows).unwrap_or(i32::MAX);
        let cols = i32::try_from(self.layout.cols).unwrap_or(i32::MAX);
        alignment.permute(Vector2::new(rows, cols))
    }

    /// Start index reordered into buffer order by `alignment`.
    pub fn buffer_start(&self, alignment: &Alignment) -> CellIndex {
        alignment.permute(self.buffer_start_index)
    }

    /// Flat buffer offset of a cell index. See [`GridLayout::flatten_index`].
    pub fn flatten_index(&self, index: CellIndex) -> Option<usize> {
        self.layout.flatten_index(index)
    }

    /// Converts a cell index to the world position of the cell centre.
    ///
    /// # Arguments
    /// * `index` - Cell index in buffer order
    /// * `alignment` - Buffer-order to map-frame alignment
    ///
    /// # Returns
    /// * `Option<Position>` - Cell centre if the index is within the buffer, None otherwise
    pub fn index_to_position(&self, index: CellIndex, alignment: &Alignment) -> Option<Position> {
        transform::position_from_index(
            index,
            &self.length,
            &self.position,
            self.resolution,
            self.buffer_size(alignment),
            self.buffer_start(alignment),
            alignment,
        )
    }

    /// Converts a world position to the index of the cell containing it.
    ///
    /// # Arguments
    /// * `position` - Point in the map frame (m)
    /// * `alignment` - Buffer-order to map-frame alignment
    ///
    /// # Returns
    /// * `Option<CellIndex>` - Cell index if the position is inside the map, None otherwise
    pub fn position_to_index(&self, position: &Position, alignment: &Alignment) -> Option<CellIndex> {
        let index = transform::index_from_position(
            position,
            &self.length,
            &self.position,
            self.resolution,
            self.buffer_size(alignment),
            self.buffer_start(alignment),
            alignment,
        );
        if index.is_none() {
            debug!(x = position.x, y = position.y, "Position outside grid map");
        }
        index
    }

    /// Returns `true` if `position` lies inside the map.
    pub fn contains(&self, position: &Position, alignment: &Alignment) -> bool {
        transform::position_within_map(position, &self.length, &self.position, alignment)
    }
}

impl TryFrom<&ElevationMap> for GridMap {
    type Error = MsgError;

    fn try_from(msg: &ElevationMap) -> Result<Self, Self::Error> {
        let layout = GridLayout::try_from(&msg.elevation.layout)?;
        let map = GridMap::new(
            Vector2::new(msg.length_in_x, msg.length_in_y),
            msg.resolution,
            msg.position,
            layout,
        )?;
        Ok(map.with_buffer_start_index(Vector2::new(msg.outer_start_index, msg.inner_start_index)))
    }
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "GridMap ({:.3}x{:.3}m, resolution: {:.3}m)",
            self.length.x, self.length.y, self.resolution
        )?;
        writeln!(f, "Position: ({:.3}, {:.3})", self.position.x, self.position.y)?;
        writeln!(
            f,
            "Start index: ({}, {})",
            self.buffer_start_index.x, self.buffer_start_index.y
        )?;
        write!(f, "Layout: {}", self.layout)
    }
}
