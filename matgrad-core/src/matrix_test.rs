use super::*;
use approx::assert_relative_eq;

fn create_test_matrix(data: Vec<f32>, rows: usize, cols: usize) -> Matrix<f32> {
    Matrix::new(data, rows, cols).expect("Test matrix creation failed")
}

#[test]
fn test_new_rejects_wrong_length() {
    let result = Matrix::<f32>::new(vec![1.0, 2.0, 3.0], 2, 2);
    assert_eq!(
        result.unwrap_err(),
        MatGradError::TensorCreationError {
            data_len: 3,
            shape: (2, 2)
        }
    );
}

#[test]
fn test_from_rows_and_index() -> Result<(), MatGradError> {
    let m = Matrix::from_rows(&[vec![1.0_f64, 2.0, 3.0], vec![4.0, 5.0, 6.0]])?;
    assert_eq!(m.shape(), (2, 3));
    assert_eq!(m[(1, 2)], 6.0);
    assert_eq!(m.get(0, 1), Some(2.0));
    assert_eq!(m.get(2, 0), None);
    assert_eq!(m.column(1), vec![2.0, 5.0]);
    Ok(())
}

#[test]
fn test_from_rows_ragged() {
    let result = Matrix::from_rows(&[vec![1.0_f32, 2.0], vec![3.0]]);
    assert!(matches!(result, Err(MatGradError::TensorCreationError { .. })));
}

#[test]
fn test_matmul_forward() -> Result<(), MatGradError> {
    let a = create_test_matrix(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
    let b = create_test_matrix(vec![5.0, 6.0, 7.0, 8.0], 2, 2);
    let c = a.matmul(&b)?;
    assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);

    let d = create_test_matrix(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
    let e = create_test_matrix(vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0], 3, 2);
    let f = d.matmul(&e)?;
    assert_eq!(f.shape(), (2, 2));
    assert_eq!(f.as_slice(), &[4.0, 5.0, 10.0, 11.0]);
    Ok(())
}

#[test]
fn test_matmul_inner_dim_mismatch() {
    let a = create_test_matrix(vec![1.0; 6], 2, 3);
    let b = create_test_matrix(vec![1.0; 6], 2, 3);
    assert!(matches!(
        a.matmul(&b),
        Err(MatGradError::IncompatibleShapes { shape1: (2, 3), shape2: (2, 3), .. })
    ));
}

#[test]
fn test_transpose() {
    let a = create_test_matrix(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
    let t = a.transpose();
    assert_eq!(t.shape(), (3, 2));
    assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    assert_eq!(t.transpose(), a);
}

#[test]
fn test_reductions() {
    let a = create_test_matrix(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
    assert_relative_eq!(a.sum(), 21.0);
    assert_eq!(a.sum_columns().as_slice(), &[6.0, 15.0]);
    assert_eq!(a.sum_columns().shape(), (2, 1));
    assert_eq!(a.sum_rows().as_slice(), &[5.0, 7.0, 9.0]);
    assert_eq!(a.sum_rows().shape(), (1, 3));
}

#[test]
fn test_reshaped_keeps_row_major_order() -> Result<(), MatGradError> {
    let a = create_test_matrix(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
    let r = a.reshaped(3, 2)?;
    assert_eq!(r[(0, 1)], 2.0);
    assert_eq!(r[(2, 0)], 5.0);
    assert!(matches!(a.reshaped(4, 2), Err(MatGradError::ShapeMismatch { .. })));
    Ok(())
}

#[test]
fn test_accumulate() -> Result<(), MatGradError> {
    let mut g = Matrix::<f32>::zeros(1, 2);
    g.accumulate(&create_test_matrix(vec![1.0, 2.0], 1, 2))?;
    g.accumulate(&create_test_matrix(vec![0.5, 0.5], 1, 2))?;
    assert_eq!(g.as_slice(), &[1.5, 2.5]);

    let err = g.accumulate(&Matrix::zeros(2, 1)).unwrap_err();
    assert_eq!(
        err,
        MatGradError::GradientAccumulationShapeMismatch {
            expected: (1, 2),
            actual: (2, 1)
        }
    );
    Ok(())
}

#[test]
fn test_zip_map_shape_check() {
    let a = Matrix::<f64>::ones(2, 2);
    let b = Matrix::<f64>::ones(1, 4);
    assert!(a.zip_map(&b, |x, y| x + y).is_err());
}
