use crate::error::MatGradError;
use crate::matrix::Matrix;
use crate::ops::traits::MatNumeric;

/// Result shape of broadcasting two 2-D shapes.
///
/// Each dimension must either match or be `1` on one side, in which case the
/// operand is repeated along it.
pub fn broadcast_shapes(
    shape_a: (usize, usize),
    shape_b: (usize, usize),
) -> Result<(usize, usize), MatGradError> {
    let dim = |a: usize, b: usize| -> Option<usize> {
        if a == b {
            Some(a)
        } else if a == 1 {
            Some(b)
        } else if b == 1 {
            Some(a)
        } else {
            None
        }
    };
    match (dim(shape_a.0, shape_b.0), dim(shape_a.1, shape_b.1)) {
        (Some(rows), Some(cols)) => Ok((rows, cols)),
        _ => Err(MatGradError::BroadcastError {
            shape1: shape_a,
            shape2: shape_b,
        }),
    }
}

/// Repeats `matrix` along its singleton dimensions to fill `shape`.
///
/// `shape` must be a valid broadcast target, i.e. the output of
/// [`broadcast_shapes`] for `matrix.shape()` and some other operand.
pub fn expand<T: MatNumeric>(matrix: &Matrix<T>, shape: (usize, usize)) -> Result<Matrix<T>, MatGradError> {
    if matrix.shape() == shape {
        return Ok(matrix.clone());
    }
    if broadcast_shapes(matrix.shape(), shape)? != shape {
        return Err(MatGradError::BroadcastError {
            shape1: matrix.shape(),
            shape2: shape,
        });
    }
    let (rows, cols) = matrix.shape();
    Ok(Matrix::from_fn(shape.0, shape.1, |r, c| {
        matrix[(if rows == 1 { 0 } else { r }, if cols == 1 { 0 } else { c })]
    }))
}

/// Sums `grad` over every dimension along which an operand of
/// `target_shape` was broadcast, giving a gradient of `target_shape`.
pub fn reduce_gradient<T: MatNumeric>(
    grad: &Matrix<T>,
    target_shape: (usize, usize),
) -> Result<Matrix<T>, MatGradError> {
    if grad.shape() == target_shape {
        return Ok(grad.clone());
    }
    let mut reduced = grad.clone();
    if target_shape.0 == 1 && reduced.rows() != 1 {
        reduced = reduced.sum_rows();
    }
    if target_shape.1 == 1 && reduced.cols() != 1 {
        reduced = reduced.sum_columns();
    }
    if reduced.shape() != target_shape {
        return Err(MatGradError::InternalError(format!(
            "cannot reduce gradient of shape {:?} to {:?}",
            grad.shape(),
            target_shape
        )));
    }
    Ok(reduced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_shapes() {
        assert_eq!(broadcast_shapes((3, 4), (3, 4)), Ok((3, 4)));
        assert_eq!(broadcast_shapes((3, 1), (3, 4)), Ok((3, 4)));
        assert_eq!(broadcast_shapes((1, 4), (3, 4)), Ok((3, 4)));
        assert_eq!(broadcast_shapes((1, 1), (2, 5)), Ok((2, 5)));
        assert_eq!(broadcast_shapes((3, 1), (1, 4)), Ok((3, 4)));
        assert_eq!(
            broadcast_shapes((2, 3), (3, 2)),
            Err(MatGradError::BroadcastError {
                shape1: (2, 3),
                shape2: (3, 2)
            })
        );
    }

    #[test]
    fn test_reduce_gradient() -> Result<(), MatGradError> {
        let grad = Matrix::new(vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3)?;
        assert_eq!(reduce_gradient(&grad, (2, 3))?, grad);
        assert_eq!(reduce_gradient(&grad, (2, 1))?.as_slice(), &[6.0, 15.0]);
        assert_eq!(reduce_gradient(&grad, (1, 3))?.as_slice(), &[5.0, 7.0, 9.0]);
        assert_eq!(reduce_gradient(&grad, (1, 1))?.as_slice(), &[21.0]);
        assert!(reduce_gradient(&grad, (3, 1)).is_err());
        Ok(())
    }

    #[test]
    fn test_expand() -> Result<(), MatGradError> {
        let column = Matrix::new(vec![1.0_f64, 2.0], 2, 1)?;
        assert_eq!(expand(&column, (2, 3))?.as_slice(), &[1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
        let row = Matrix::new(vec![1.0_f64, 2.0, 3.0], 1, 3)?;
        assert_eq!(expand(&row, (2, 3))?.as_slice(), &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
        assert_eq!(expand(&Matrix::scalar(4.0_f64), (1, 2))?.as_slice(), &[4.0, 4.0]);
        assert!(matches!(
            expand(&row, (2, 4)),
            Err(MatGradError::BroadcastError { .. })
        ));
        // Expanding never shrinks.
        assert!(expand(&row, (1, 1)).is_err());
        Ok(())
    }
}
