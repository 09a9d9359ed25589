//! Packing and unpacking of 24-bit RGB color values (`0xRRGGBB`).

use nalgebra::Vector3;

/// Splits a packed color value into its `(r, g, b)` channels.
///
/// Only the low 24 bits are read.
pub fn pack_color(color_value: u32) -> Vector3<i32> {
    Vector3::new(
        ((color_value >> 16) & 0xff) as i32,
        ((color_value >> 8) & 0xff) as i32,
        (color_value & 0xff) as i32,
    )
}

/// Same as [`pack_color`] with every channel scaled to `[0.0, 1.0]`.
pub fn pack_color_normalized(color_value: u32) -> Vector3<f32> {
    pack_color(color_value).cast::<f32>() / 255.0
}

/// Joins `(r, g, b)` channels into a packed color value.
///
/// Channels are not clamped: values outside `0..=255` spill into the neighbouring
/// channel bits.
pub fn unpack_color(color_vector: &Vector3<i32>) -> u32 {
    ((color_vector.x << 16) | (color_vector.y << 8) | color_vector.z) as u32
}
