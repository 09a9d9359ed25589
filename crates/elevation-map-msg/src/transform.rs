#![warn(missing_docs)]

//! Index and position math for circular grid buffers.
//!
//! A grid covers a rectangle of size `map_length` centred on `map_position`. Its cells are
//! stored in a buffer of `buffer_size` cells whose logical first cell sits at
//! `buffer_start_index`, so the map can scroll without moving data. Buffer-order vectors
//! reach the map frame through an [`Alignment`].
//!
//! Sizes, lengths and start indices passed here are already in buffer order.

use nalgebra::Vector2;

use crate::alignment::Alignment;
use crate::{CellIndex, Position};

/// Wraps each component of `index` into `[0, buffer_size)`.
///
/// Components with a non-positive buffer size are returned unchanged.
pub fn wrap_index(index: CellIndex, buffer_size: Vector2<i32>) -> CellIndex {
    index.zip_map(&buffer_size, |i, n| {
        if n > 0 { i.rem_euclid(n) } else { i }
    })
}

/// Returns `true` if both components lie in `[0, buffer_size)`.
pub fn index_within_range(index: CellIndex, buffer_size: Vector2<i32>) -> bool {
    index.x >= 0 && index.y >= 0 && index.x < buffer_size.x && index.y < buffer_size.y
}

/// Maps a logical index (counted from the first cell) to its storage index.
pub fn buffer_index_from_index(
    index: CellIndex,
    buffer_size: Vector2<i32>,
    buffer_start_index: CellIndex,
) -> CellIndex {
    if buffer_start_index == Vector2::zeros() {
        return index;
    }
    shift_wrapped(index, buffer_start_index, buffer_size, 1)
}

/// Maps a storage index back to its logical index (counted from the first cell).
pub fn index_from_buffer_index(
    buffer_index: CellIndex,
    buffer_size: Vector2<i32>,
    buffer_start_index: CellIndex,
) -> CellIndex {
    if buffer_start_index == Vector2::zeros() {
        return buffer_index;
    }
    shift_wrapped(buffer_index, buffer_start_index, buffer_size, -1)
}

// `index + sign * start` wrapped into the buffer. The sum is taken in i64, so any i32
// start index is valid.
fn shift_wrapped(
    index: CellIndex,
    start: CellIndex,
    buffer_size: Vector2<i32>,
    sign: i64,
) -> CellIndex {
    index.zip_zip_map(&start, &buffer_size, |i, s, n| {
        let sum = i64::from(i) + sign * i64::from(s);
        let wrapped = if n > 0 { sum.rem_euclid(i64::from(n)) } else { sum };
        i32::try_from(wrapped).unwrap_or(i)
    })
}

// Buffer-order offset of `position` from the map corner that holds the first cell.
fn offset_from_first_corner(
    position: &Position,
    map_length: &Vector2<f64>,
    map_position: &Position,
    alignment: &Alignment,
) -> Vector2<f64> {
    alignment.to_buffer(position - map_position) + 0.5 * alignment.permute_length(*map_length)
}

/// Returns `true` if `position` lies inside the map rectangle.
///
/// The rectangle is half-open in buffer order: the edge at the first cell is inside,
/// the opposite edge is outside.
pub fn position_within_map(
    position: &Position,
    map_length: &Vector2<f64>,
    map_position: &Position,
    alignment: &Alignment,
) -> bool {
    let offset = offset_from_first_corner(position, map_length, map_position, alignment);
    let length = alignment.permute_length(*map_length);
    offset.x >= 0.0 && offset.y >= 0.0 && offset.x < length.x && offset.y < length.y
}

/// World position of the centre of the cell stored at `index`.
///
/// Returns `None` if `index` is outside `[0, buffer_size)`.
pub fn position_from_index(
    index: CellIndex,
    map_length: &Vector2<f64>,
    map_position: &Position,
    resolution: f64,
    buffer_size: Vector2<i32>,
    buffer_start_index: CellIndex,
    alignment: &Alignment,
) -> Option<Position> {
    if !index_within_range(index, buffer_size) {
        return None;
    }
    let unwrapped = index_from_buffer_index(index, buffer_size, buffer_start_index).cast::<f64>();
    let half_length = 0.5 * alignment.permute_length(*map_length);
    let from_center = unwrapped.add_scalar(0.5) * resolution - half_length;
    Some(map_position + alignment.to_map(from_center))
}

/// Storage index of the cell containing `position`.
///
/// Returns `None` if `position` is outside the map.
pub fn index_from_position(
    position: &Position,
    map_length: &Vector2<f64>,
    map_position: &Position,
    resolution: f64,
    buffer_size: Vector2<i32>,
    buffer_start_index: CellIndex,
    alignment: &Alignment,
) -> Option<CellIndex> {
    if !position_within_map(position, map_length, map_position, alignment) {
        return None;
    }
    let offset = offset_from_first_corner(position, map_length, map_position, alignment);
    let index = (offset / resolution).map(|c| c.floor() as i32);
    // A length that is not an exact multiple of the resolution can leave a sliver
    // past the last cell.
    if !index_within_range(index, buffer_size) {
        return None;
    }
    Some(buffer_index_from_index(index, buffer_size, buffer_start_index))
}
