#![warn(missing_docs)]

//! Layout introspection for flat two-dimensional arrays.
//!
//! A producer labels the first dimension descriptor with either [`ROW_INDEX_LABEL`] or
//! [`COLUMN_INDEX_LABEL`]. The label decides whether the backing buffer is row-major or
//! column-major; any other label is a configuration error.

use core::fmt;

use nalgebra::Vector2;
use tracing::error;

use crate::error::MsgError;

/// Number of dimension descriptors an elevation map layout carries.
pub const N_DIMENSIONS: usize = 2;

/// Label of a dimension that enumerates columns.
pub const COLUMN_INDEX_LABEL: &str = "column_index";

/// Label of a dimension that enumerates rows.
pub const ROW_INDEX_LABEL: &str = "row_index";

/// The two storage axes a dimension descriptor can stand for.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageIndex {
    /// The dimension enumerates columns.
    Column,
    /// The dimension enumerates rows.
    Row,
}

impl StorageIndex {
    /// Canonical label of this storage axis.
    pub const fn label(self) -> &'static str {
        match self {
            StorageIndex::Column => COLUMN_INDEX_LABEL,
            StorageIndex::Row => ROW_INDEX_LABEL,
        }
    }

    /// Looks up the storage axis for a label. Matching is exact.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            COLUMN_INDEX_LABEL => Some(StorageIndex::Column),
            ROW_INDEX_LABEL => Some(StorageIndex::Row),
            _ => None,
        }
    }
}

impl fmt::Display for StorageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One dimension descriptor of a multi-dimensional array layout.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiArrayDimension {
    /// Axis label, one of the canonical labels for elevation maps.
    pub label: String,
    /// Number of elements along this axis.
    pub size: u32,
    /// Number of flat elements spanned by one step along the enclosing axis.
    pub stride: u32,
}

impl MultiArrayDimension {
    /// Creates a dimension descriptor.
    pub fn new(label: impl Into<String>, size: u32, stride: u32) -> Self {
        MultiArrayDimension {
            label: label.into(),
            size,
            stride,
        }
    }
}

/// Layout of a flat array: ordered dimension descriptors plus a leading offset.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiArrayLayout {
    /// Dimension descriptors, outermost first.
    pub dim: Vec<MultiArrayDimension>,
    /// Number of elements to skip at the start of the flat data.
    pub data_offset: u32,
}

impl MultiArrayLayout {
    /// Dense row-major layout: rows are the outer dimension.
    ///
    /// The outer stride saturates at `u32::MAX`.
    pub fn row_major(rows: u32, cols: u32) -> Self {
        MultiArrayLayout {
            dim: vec![
                MultiArrayDimension::new(ROW_INDEX_LABEL, rows, rows.saturating_mul(cols)),
                MultiArrayDimension::new(COLUMN_INDEX_LABEL, cols, cols),
            ],
            data_offset: 0,
        }
    }

    /// Dense column-major layout: columns are the outer dimension.
    ///
    /// The outer stride saturates at `u32::MAX`.
    pub fn column_major(rows: u32, cols: u32) -> Self {
        MultiArrayLayout {
            dim: vec![
                MultiArrayDimension::new(COLUMN_INDEX_LABEL, cols, rows.saturating_mul(cols)),
                MultiArrayDimension::new(ROW_INDEX_LABEL, rows, rows),
            ],
            data_offset: 0,
        }
    }

    /// Storage axis of the first dimension, without any fallback.
    ///
    /// # Errors
    ///
    /// Returns `Err(MsgError::MissingDimension(0))` if the layout has no dimensions.
    /// Returns `Err(MsgError::InvalidLayoutLabel)` if the first label is not canonical.
    pub fn storage_order(&self) -> Result<StorageIndex, MsgError> {
        let first = self.dim.first().ok_or(MsgError::MissingDimension(0))?;
        StorageIndex::from_label(&first.label)
            .ok_or_else(|| MsgError::InvalidLayoutLabel(first.label.clone()))
    }

    fn size_of(&self, position: usize) -> Result<u32, MsgError> {
        self.dim
            .get(position)
            .map(|d| d.size)
            .ok_or(MsgError::MissingDimension(position))
    }
}

/// Returns `true` if the layout stores rows as its outer dimension.
///
/// A layout whose first label is neither [`ROW_INDEX_LABEL`] nor [`COLUMN_INDEX_LABEL`]
/// is logged as an error and reported as column-major. Callers must not rely on that
/// fallback; use [`MultiArrayLayout::storage_order`] to get the failure as a value.
pub fn is_row_major(layout: &MultiArrayLayout) -> bool {
    match layout.storage_order() {
        Ok(StorageIndex::Row) => true,
        Ok(StorageIndex::Column) => false,
        Err(e) => {
            error!(error = %e, "is_row_major() failed because layout label is not set correctly");
            false
        }
    }
}

/// Number of rows described by the layout.
///
/// # Errors
///
/// Returns `Err(MsgError::MissingDimension)` if the layout has fewer than two dimensions.
pub fn row_count(layout: &MultiArrayLayout) -> Result<u32, MsgError> {
    if is_row_major(layout) {
        layout.size_of(0)
    } else {
        layout.size_of(1)
    }
}

/// Number of columns described by the layout.
///
/// # Errors
///
/// Returns `Err(MsgError::MissingDimension)` if the layout has fewer than two dimensions.
pub fn col_count(layout: &MultiArrayLayout) -> Result<u32, MsgError> {
    if is_row_major(layout) {
        layout.size_of(1)
    } else {
        layout.size_of(0)
    }
}

/// Validated description of how a flat buffer represents the grid.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Rows are the outer dimension.
    pub row_major: bool,
    /// Number of rows.
    pub rows: u32,
    /// Number of columns.
    pub cols: u32,
    /// Leading offset into the flat buffer.
    pub data_offset: u32,
    /// Stride of the second dimension descriptor.
    pub stride: u32,
}

impl GridLayout {
    /// Dense row-major layout with no leading offset.
    pub const fn row_major(rows: u32, cols: u32) -> Self {
        GridLayout {
            row_major: true,
            rows,
            cols,
            data_offset: 0,
            stride: cols,
        }
    }

    /// Dense column-major layout with no leading offset.
    pub const fn column_major(rows: u32, cols: u32) -> Self {
        GridLayout {
            row_major: false,
            rows,
            cols,
            data_offset: 0,
            stride: rows,
        }
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Flat buffer offset of a cell index.
    ///
    /// Column-major: `data_offset + index.y * stride + index.x`.
    /// Row-major: `data_offset + index.x * stride + index.y`.
    ///
    /// Returns `None` only when the arithmetic yields a negative offset.
    pub fn flatten_index(&self, index: Vector2<i32>) -> Option<usize> {
        let (outer, inner) = if self.row_major {
            (index.x, index.y)
        } else {
            (index.y, index.x)
        };
        let offset =
            i64::from(self.data_offset) + i64::from(outer) * i64::from(self.stride) + i64::from(inner);
        usize::try_from(offset).ok()
    }

    /// Converts back into a labelled message layout.
    pub fn to_multi_array(&self) -> MultiArrayLayout {
        let (outer, inner) = if self.row_major {
            (
                MultiArrayDimension::new(ROW_INDEX_LABEL, self.rows, 0),
                MultiArrayDimension::new(COLUMN_INDEX_LABEL, self.cols, self.stride),
            )
        } else {
            (
                MultiArrayDimension::new(COLUMN_INDEX_LABEL, self.cols, 0),
                MultiArrayDimension::new(ROW_INDEX_LABEL, self.rows, self.stride),
            )
        };
        let outer = MultiArrayDimension {
            stride: outer.size.saturating_mul(self.stride),
            ..outer
        };
        MultiArrayLayout {
            dim: vec![outer, inner],
            data_offset: self.data_offset,
        }
    }
}

impl TryFrom<&MultiArrayLayout> for GridLayout {
    type Error = MsgError;

    fn try_from(layout: &MultiArrayLayout) -> Result<Self, Self::Error> {
        if layout.dim.len() < N_DIMENSIONS {
            return Err(MsgError::MissingDimension(layout.dim.len()));
        }
        let row_major = layout.storage_order()? == StorageIndex::Row;
        let (outer, inner) = (&layout.dim[0], &layout.dim[1]);
        let (rows, cols) = if row_major {
            (outer.size, inner.size)
        } else {
            (inner.size, outer.size)
        };
        Ok(GridLayout {
            row_major,
            rows,
            cols,
            data_offset: layout.data_offset,
            stride: inner.stride,
        })
    }
}

impl fmt::Display for GridLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = if self.row_major { "row-major" } else { "column-major" };
        write!(
            f,
            "{}x{} {} (offset: {}, stride: {})",
            self.rows, self.cols, order, self.data_offset, self.stride
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    // Runs `is_row_major` with a subscriber that records everything it logs.
    fn is_row_major_logged(layout: &MultiArrayLayout) -> (bool, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let row_major = tracing::subscriber::with_default(subscriber, || is_row_major(layout));
        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        (row_major, text)
    }

    fn labelled(label: &str) -> MultiArrayLayout {
        MultiArrayLayout {
            dim: vec![
                MultiArrayDimension::new(label, 4, 12),
                MultiArrayDimension::new("other", 3, 3),
            ],
            data_offset: 0,
        }
    }

    #[test]
    fn test_storage_index_labels() {
        assert_eq!(StorageIndex::Row.label(), "row_index");
        assert_eq!(StorageIndex::Column.label(), "column_index");
        assert_eq!(StorageIndex::from_label("row_index"), Some(StorageIndex::Row));
        assert_eq!(StorageIndex::from_label("column_index"), Some(StorageIndex::Column));
        assert_eq!(StorageIndex::from_label("Row_Index"), None);
        assert_eq!(StorageIndex::from_label(""), None);
    }

    #[test]
    fn test_is_row_major() {
        assert!(is_row_major(&labelled(ROW_INDEX_LABEL)));
        assert!(!is_row_major(&labelled(COLUMN_INDEX_LABEL)));
        // Unrecognised labels fall back to column-major
        assert!(!is_row_major(&labelled("")));
        assert!(!is_row_major(&labelled("rows")));
        assert!(!is_row_major(&MultiArrayLayout::default()));
    }

    #[test]
    fn test_is_row_major_reports_bad_labels() {
        let layouts = [labelled(""), labelled("rows"), MultiArrayLayout::default()];
        for layout in &layouts {
            let (row_major, logs) = is_row_major_logged(layout);
            assert!(!row_major);
            assert!(logs.contains("ERROR"), "{logs}");
            assert!(logs.contains("layout label is not set correctly"), "{logs}");
        }

        // The underlying error travels with the event
        let (_, logs) = is_row_major_logged(&labelled("rows"));
        assert!(logs.contains("Invalid layout label: \"rows\""), "{logs}");
        let (_, logs) = is_row_major_logged(&MultiArrayLayout::default());
        assert!(logs.contains("Layout is missing dimension 0"), "{logs}");

        for label in [ROW_INDEX_LABEL, COLUMN_INDEX_LABEL] {
            let (_, logs) = is_row_major_logged(&labelled(label));
            assert!(logs.is_empty(), "{logs}");
        }
    }

    #[test]
    fn test_storage_order_errors() {
        assert!(matches!(
            labelled("rows").storage_order(),
            Err(MsgError::InvalidLayoutLabel(label)) if label == "rows"
        ));
        assert!(matches!(
            MultiArrayLayout::default().storage_order(),
            Err(MsgError::MissingDimension(0))
        ));
    }

    #[test]
    fn test_row_and_col_count() {
        let row_major = MultiArrayLayout::row_major(4, 3);
        assert_eq!(row_count(&row_major), Ok(4));
        assert_eq!(col_count(&row_major), Ok(3));

        let column_major = MultiArrayLayout::column_major(4, 3);
        assert_eq!(row_count(&column_major), Ok(4));
        assert_eq!(col_count(&column_major), Ok(3));

        // A bad label reads as column-major, so rows come from dim[1]
        let bad = labelled("unknown");
        assert_eq!(row_count(&bad), Ok(3));
        assert_eq!(col_count(&bad), Ok(4));
    }

    #[test]
    fn test_counts_need_two_dimensions() {
        let mut layout = MultiArrayLayout::row_major(4, 3);
        layout.dim.pop();
        assert_eq!(row_count(&layout), Ok(4));
        assert_eq!(col_count(&layout), Err(MsgError::MissingDimension(1)));
    }

    #[test]
    fn test_grid_layout_from_multi_array() {
        let grid = GridLayout::try_from(&MultiArrayLayout::row_major(10, 8)).unwrap();
        assert_eq!(grid, GridLayout::row_major(10, 8));

        let grid = GridLayout::try_from(&MultiArrayLayout::column_major(10, 8)).unwrap();
        assert_eq!(grid, GridLayout::column_major(10, 8));
    }

    #[test]
    fn test_huge_layouts_saturate() {
        let layout = MultiArrayLayout::row_major(70_000, 70_000);
        assert_eq!(layout.dim[0].stride, u32::MAX);
        assert_eq!(layout.dim[1].stride, 70_000);
        assert_eq!(MultiArrayLayout::column_major(70_000, 70_000).dim[0].stride, u32::MAX);

        let grid = GridLayout::try_from(&layout).unwrap();
        assert_eq!(grid.cell_count(), 4_900_000_000);
        assert_eq!(grid.to_multi_array(), layout);
        assert_eq!(grid.flatten_index(Vector2::new(69_999, 69_999)), Some(4_899_999_999));
    }

    #[test]
    fn test_grid_layout_rejects_bad_layouts() {
        assert!(matches!(
            GridLayout::try_from(&labelled("")),
            Err(MsgError::InvalidLayoutLabel(_))
        ));
        let mut short = MultiArrayLayout::row_major(2, 2);
        short.dim.truncate(1);
        assert!(matches!(
            GridLayout::try_from(&short),
            Err(MsgError::MissingDimension(1))
        ));
    }

    #[test]
    fn test_flatten_index_row_major() {
        let layout = GridLayout::row_major(10, 10);
        assert_eq!(layout.flatten_index(Vector2::new(2, 3)), Some(23));
        assert_eq!(layout.flatten_index(Vector2::new(0, 0)), Some(0));
        assert_eq!(layout.flatten_index(Vector2::new(9, 9)), Some(99));
    }

    #[test]
    fn test_flatten_index_column_major() {
        let layout = GridLayout {
            data_offset: 5,
            ..GridLayout::column_major(4, 6)
        };
        // 5 + 3 * 4 + 2
        assert_eq!(layout.flatten_index(Vector2::new(2, 3)), Some(19));
    }

    #[test]
    fn test_flatten_index_negative_offset() {
        let layout = GridLayout::row_major(3, 3);
        assert_eq!(layout.flatten_index(Vector2::new(-1, 0)), None);
        // Offsets are not range checked beyond sign
        assert_eq!(layout.flatten_index(Vector2::new(0, 5)), Some(5));
    }

    #[test]
    fn test_to_multi_array_round_trip() {
        let layout = GridLayout {
            data_offset: 2,
            ..GridLayout::column_major(5, 7)
        };
        let msg = layout.to_multi_array();
        assert_eq!(msg.dim[0].label, COLUMN_INDEX_LABEL);
        assert_eq!(msg.dim[0].stride, 35);
        assert_eq!(GridLayout::try_from(&msg).unwrap(), layout);
    }

    #[test]
    fn test_display() {
        let text = format!("{}", GridLayout::row_major(2, 3));
        assert!(text.contains("2x3 row-major"));
    }
}
