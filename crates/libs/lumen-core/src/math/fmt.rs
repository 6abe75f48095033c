use super::{Scalar, DISPLAY_PRECISION};
use nalgebra::{Dim, Matrix, RawStorage};
use std::fmt::{Display, Formatter};

/// Human-readable view of a matrix, see [`display_matrix`].
pub struct MatrixDisplay<'a, S, R: Dim, C: Dim, St> {
    matrix: &'a Matrix<S, R, C, St>,
    precision: usize,
}

/// Prints a matrix with [`DISPLAY_PRECISION`] significant digits.
///
/// A column is printed as a single bracketed row, `[1, 2, 3]`. Any other
/// shape is printed as a block with one line per row, rows separated by
/// `;`, and elements right-aligned to a common width:
///
/// ```text
/// [ 1, 20;
///   3,  4]
/// ```
pub fn display_matrix<S, R, C, St>(matrix: &Matrix<S, R, C, St>) -> MatrixDisplay<'_, S, R, C, St>
where
    S: Scalar,
    R: Dim,
    C: Dim,
    St: RawStorage<S, R, C>,
{
    MatrixDisplay {
        matrix,
        precision: DISPLAY_PRECISION,
    }
}

impl<'a, S, R, C, St> MatrixDisplay<'a, S, R, C, St>
where
    S: Scalar,
    R: Dim,
    C: Dim,
    St: RawStorage<S, R, C>,
{
    /// Overrides the number of significant digits.
    pub fn with_precision(mut self, digits: usize) -> Self {
        self.precision = digits;
        self
    }
}

impl<S, R, C, St> Display for MatrixDisplay<'_, S, R, C, St>
where
    S: Scalar,
    R: Dim,
    C: Dim,
    St: RawStorage<S, R, C>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (nrows, ncols) = self.matrix.shape();
        let cell = |i: usize, j: usize| self.matrix[(i, j)].to_significant(self.precision);

        if ncols == 1 {
            f.write_str("[")?;
            for i in 0..nrows {
                if i > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(&cell(i, 0))?;
            }
            return f.write_str("]");
        }

        let cells = (0..nrows)
            .map(|i| (0..ncols).map(|j| cell(i, j)).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let width = cells
            .iter()
            .flatten()
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(0);

        f.write_str("[")?;
        for (i, row) in cells.iter().enumerate() {
            if i > 0 {
                f.write_str(";\n ")?;
            }
            for (j, c) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{:>width$}", c, width = width)?;
            }
        }
        f.write_str("]")
    }
}
