use crate::error::MatGradError;
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Xavier (Glorot) normal initialization.
///
/// Samples each element of a `rows x cols` matrix from
/// `N(0, sqrt(2 / (fan_in + fan_out)))` with `fan_in = cols` and
/// `fan_out = rows`, the layout of a `[out, in]` weight matrix.
///
/// # Errors
/// `MatGradError::InitializationError` when both dimensions are zero.
pub fn xavier_normal<T: MatNumeric, R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> Result<Matrix<T>, MatGradError> {
    let fan_sum = rows + cols;
    if fan_sum == 0 {
        return Err(MatGradError::InitializationError(
            "xavier_normal needs at least one non-zero dimension".to_string(),
        ));
    }
    let std_dev = (2.0 / fan_sum as f64).sqrt();
    let normal = Normal::new(0.0, std_dev).map_err(|e| MatGradError::InitializationError(e.to_string()))?;
    Ok(Matrix::from_fn(rows, cols, |_, _| T::from_f64_lossy(normal.sample(rng))))
}

pub fn zeros<T: MatNumeric>(rows: usize, cols: usize) -> Matrix<T> {
    Matrix::zeros(rows, cols)
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
