use crate::errors::ModelError;

/// A trait for matrix-like containers holding a polynomial exponent table.
///
/// Row `i`, column `j` of the table is the exponent of input feature `j` in output feature
/// `i`. Implementors hand the table over row by row so the constructor in
/// [`crate::model::PolynomialFeatures`] can check that it is rectangular.
///
/// # Examples
///
/// ```rust
/// use sqf_export::prelude::Matrix;
///
/// let powers = vec![vec![0u32, 0], vec![1, 0], vec![0, 2]];
/// assert_eq!(powers.to_rows().unwrap().len(), 3);
///
/// let fixed = [[0u32, 1], [2, 0]];
/// assert_eq!(fixed.to_rows().unwrap(), vec![vec![0, 1], vec![2, 0]]);
/// ```
pub trait Matrix {
    /// Returns the rows of the table.
    ///
    /// # Errors
    /// Returns `ModelError::RaggedTable` if the rows do not all have the same width.
    fn to_rows(&self) -> Result<Vec<Vec<u32>>, ModelError>;
}

/// Checks that every row of `rows` is as wide as the first one.
pub(crate) fn check_rectangular(rows: &[Vec<u32>]) -> Result<(), ModelError> {
    let Some(expected) = rows.first().map(Vec::len) else {
        return Ok(());
    };
    match rows.iter().position(|row| row.len() != expected) {
        Some(row) => Err(ModelError::RaggedTable {
            row,
            expected,
            got: rows[row].len(),
        }),
        None => Ok(()),
    }
}

impl Matrix for Vec<Vec<u32>> {
    fn to_rows(&self) -> Result<Vec<Vec<u32>>, ModelError> {
        check_rectangular(self)?;
        Ok(self.clone())
    }
}

impl<const R: usize, const C: usize> Matrix for [[u32; C]; R] {
    fn to_rows(&self) -> Result<Vec<Vec<u32>>, ModelError> {
        Ok(self.iter().map(|row| row.to_vec()).collect())
    }
}

/// Implementation of Matrix trait for ndarray's Array2<u32>.
///
/// The table is read in logical row-major order regardless of the array's memory layout.
#[cfg(feature = "ndarray")]
impl Matrix for ndarray::Array2<u32> {
    fn to_rows(&self) -> Result<Vec<Vec<u32>>, ModelError> {
        Ok(self.rows().into_iter().map(|row| row.to_vec()).collect())
    }
}

/// Implementation of Matrix trait for nalgebra's DMatrix<u32>.
///
/// nalgebra stores matrices column-major; rows are gathered explicitly.
#[cfg(feature = "nalgebra")]
impl Matrix for nalgebra::DMatrix<u32> {
    fn to_rows(&self) -> Result<Vec<Vec<u32>>, ModelError> {
        Ok(self
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_rows() {
        let powers = vec![vec![0u32, 0], vec![1], vec![0, 1]];
        assert_eq!(
            powers.to_rows(),
            Err(ModelError::RaggedTable {
                row: 1,
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_empty_table_is_rectangular() {
        let powers: Vec<Vec<u32>> = vec![];
        assert_eq!(powers.to_rows(), Ok(vec![]));
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn test_ndarray_rows() {
        let powers = ndarray::arr2(&[[0u32, 0], [1, 0], [1, 1]]);
        assert_eq!(
            powers.to_rows().unwrap(),
            vec![vec![0, 0], vec![1, 0], vec![1, 1]]
        );
    }

    #[cfg(feature = "nalgebra")]
    #[test]
    fn test_nalgebra_rows() {
        let powers = nalgebra::DMatrix::from_row_slice(2, 2, &[0u32, 2, 1, 1]);
        assert_eq!(powers.to_rows().unwrap(), vec![vec![0, 2], vec![1, 1]]);
    }
}
