/// A trait for vector-like containers that fitted parameters can be read from.
///
/// Coefficient, mean and scale vectors usually come straight out of a numeric library. This
/// trait lets the model constructors accept them without a manual conversion step; the values
/// are copied once into the model.
///
/// # Examples
///
/// ```rust
/// use sqf_export::prelude::Vector;
///
/// let coef = vec![1.5, -2.0];
/// assert_eq!(coef.to_values(), vec![1.5, -2.0]);
/// assert_eq!(Vector::len(&[0.5; 3]), 3);
/// ```
pub trait Vector {
    /// Returns the length of the vector.
    fn len(&self) -> usize;

    /// Checks if the vector is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the values into an owned `Vec`, in index order.
    fn to_values(&self) -> Vec<f64>;
}

impl Vector for [f64] {
    fn len(&self) -> usize {
        <[f64]>::len(self)
    }

    fn to_values(&self) -> Vec<f64> {
        self.to_vec()
    }
}

impl Vector for Vec<f64> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn to_values(&self) -> Vec<f64> {
        self.clone()
    }
}

impl<const N: usize> Vector for [f64; N] {
    fn len(&self) -> usize {
        N
    }

    fn to_values(&self) -> Vec<f64> {
        self.to_vec()
    }
}

/// Implementation of Vector trait for ndarray's Array1<f64>.
///
/// Values are read element by element, so arrays that are not contiguous in memory are
/// copied correctly as well.
#[cfg(feature = "ndarray")]
impl Vector for ndarray::Array1<f64> {
    fn len(&self) -> usize {
        self.len()
    }

    fn to_values(&self) -> Vec<f64> {
        self.iter().copied().collect()
    }
}

/// Implementation of Vector trait for nalgebra's DVector<f64>.
#[cfg(feature = "nalgebra")]
impl Vector for nalgebra::DVector<f64> {
    fn len(&self) -> usize {
        self.len()
    }

    fn to_values(&self) -> Vec<f64> {
        self.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_vectors() {
        let values = vec![1.0, 2.0];
        assert_eq!(Vector::len(&values), 2);
        assert_eq!(values.to_values(), vec![1.0, 2.0]);

        let slice: &[f64] = &[3.0];
        assert_eq!(slice.to_values(), vec![3.0]);

        let empty: [f64; 0] = [];
        assert!(Vector::is_empty(&empty));
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn test_ndarray_vector() {
        let values = ndarray::arr1(&[1.0, -2.0, 3.0]);
        assert_eq!(Vector::len(&values), 3);
        assert_eq!(values.to_values(), vec![1.0, -2.0, 3.0]);

        // Copies taken from reversed and strided views.
        let reversed = values.slice(ndarray::s![..;-1]).to_owned();
        assert_eq!(reversed.to_values(), vec![3.0, -2.0, 1.0]);

        let strided = ndarray::arr2(&[[1.0, 2.0], [3.0, 4.0]]).column(1).to_owned();
        assert_eq!(Vector::len(&strided), 2);
        assert_eq!(strided.to_values(), vec![2.0, 4.0]);
    }

    #[cfg(feature = "nalgebra")]
    #[test]
    fn test_nalgebra_vector() {
        let values = nalgebra::DVector::from_vec(vec![0.5, 0.25]);
        assert_eq!(values.to_values(), vec![0.5, 0.25]);
    }
}
