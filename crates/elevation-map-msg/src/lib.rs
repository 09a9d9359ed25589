#![warn(missing_docs)]
#![doc = "Helpers for grid-based elevation map messages."]
#![doc = ""]
#![doc = "This crate converts between world-frame positions and grid cell indices,"]
#![doc = "introspects row-major and column-major storage layouts, and packs and unpacks"]
#![doc = "RGB color values. Every function is a pure computation over caller-supplied data."]

pub mod alignment;
pub mod cell;
pub mod color;
pub mod error;
pub mod layout;
pub mod map;
pub mod msg;
pub mod transform;

pub use alignment::Alignment;
pub use cell::{CellValue, is_valid_cell};
pub use color::{pack_color, pack_color_normalized, unpack_color};
pub use error::MsgError;
pub use layout::{
    COLUMN_INDEX_LABEL, GridLayout, MultiArrayDimension, MultiArrayLayout, N_DIMENSIONS,
    ROW_INDEX_LABEL, StorageIndex, col_count, is_row_major, row_count,
};
pub use map::GridMap;
pub use msg::{ElevationMap, Float32MultiArray, UInt32MultiArray};

/// Integer cell index in buffer order.
pub type CellIndex = nalgebra::Vector2<i32>;

/// Position in the map frame (m).
pub type Position = nalgebra::Vector2<f64>;
