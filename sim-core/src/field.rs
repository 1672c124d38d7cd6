use crate::error::StoreError;
use glam::Vec2;

/// A dense, row-major 2D array of per-object values.
///
/// Row `i` holds the attribute values of object `i`; the number of
/// columns is the attribute's width (2 for a position, 3 for a color,
/// 1 for a size, ...).
///
/// Arrays are kept per attribute rather than per object so that a
/// whole population can be updated in one pass over contiguous memory.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldArray {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl FieldArray {
    /// Creates an array of `rows × cols` zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Creates an array of `rows × cols` entries all equal to `value`.
    pub fn filled(rows: usize, cols: usize, value: f32) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Builds an array by evaluating `f(row, col)` for every entry.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// Builds an array from a list of rows.
    ///
    /// ### Parameters
    /// - `rows` - One slice per object; all must have the same length.
    ///
    /// ### Returns
    /// The array, or [`StoreError::RaggedRows`] if any row's length
    /// differs from the first row's. An empty list gives a `0 × 0` array.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self, StoreError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(StoreError::RaggedRows {
                    row: i,
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Builds a two-column array from 2D vectors.
    pub fn from_vec2s(points: &[Vec2]) -> Self {
        let data = points.iter().flat_map(|p| [p.x, p.y]).collect();
        Self {
            rows: points.len(),
            cols: 2,
            data,
        }
    }

    /// Number of rows (the leading dimension).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (the attribute width).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns row `i`.
    ///
    /// ### Panics
    /// Panics if `i` is out of bounds.
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Returns row `i` for in-place writes.
    ///
    /// ### Panics
    /// Panics if `i` is out of bounds.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterates over all rows in index order.
    pub fn iter_rows(&self) -> impl ExactSizeIterator<Item = &[f32]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Reads the first two columns of row `i` as a [`Vec2`].
    ///
    /// ### Panics
    /// Panics if `i` is out of bounds or the array has fewer than two columns.
    #[inline]
    pub fn vec2(&self, i: usize) -> Vec2 {
        let r = self.row(i);
        Vec2::new(r[0], r[1])
    }

    /// Writes `v` into the first two columns of row `i`.
    #[inline]
    pub fn set_vec2(&mut self, i: usize, v: Vec2) {
        let r = self.row_mut(i);
        r[0] = v.x;
        r[1] = v.y;
    }

    /// Sum of absolute values of column `col` over all rows.
    pub fn column_abs_sum(&self, col: usize) -> f32 {
        self.iter_rows().map(|r| r[col].abs()).sum()
    }

    /// The raw row-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_and_filled_have_expected_shape() {
        let z = FieldArray::zeros(4, 3);
        assert_eq!((z.rows(), z.cols()), (4, 3));
        assert!(z.as_slice().iter().all(|&v| v == 0.0));

        let f = FieldArray::filled(2, 1, 1.0);
        assert_eq!(f.as_slice(), &[1.0, 1.0]);
    }

    #[test]
    fn from_rows_keeps_row_order() {
        let a = FieldArray::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        assert_eq!(a.rows(), 3);
        assert_eq!(a.cols(), 2);
        assert_eq!(a.row(1), &[3.0, 4.0]);
        assert_eq!(a.vec2(2), Vec2::new(5.0, 6.0));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let rows: Vec<Vec<f32>> = vec![vec![1.0, 2.0], vec![3.0]];
        let err = FieldArray::from_rows(&rows).unwrap_err();
        assert_eq!(
            err,
            StoreError::RaggedRows {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn from_fn_fills_row_major() {
        let a = FieldArray::from_fn(2, 3, |r, c| (r * 10 + c) as f32);
        assert_eq!(a.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn set_vec2_and_row_mut_write_in_place() {
        let mut a = FieldArray::from_vec2s(&[Vec2::ZERO, Vec2::ONE]);
        a.set_vec2(0, Vec2::new(0.5, -0.5));
        a.row_mut(1)[1] = 7.0;
        assert_eq!(a.as_slice(), &[0.5, -0.5, 1.0, 7.0]);
    }

    #[test]
    fn column_abs_sum_ignores_sign() {
        let a = FieldArray::from_rows(&[[1.0, -2.0], [-3.0, 4.0]]).unwrap();
        assert_eq!(a.column_abs_sum(0), 4.0);
        assert_eq!(a.column_abs_sum(1), 6.0);
    }
}
