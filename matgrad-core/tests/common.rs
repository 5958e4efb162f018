use matgrad_core::{Matrix, MatNumeric};

// Shared by several test binaries; each only uses a subset.
#[allow(dead_code)]
pub fn create_test_matrix<T: MatNumeric>(data: Vec<T>, rows: usize, cols: usize) -> Matrix<T> {
    Matrix::new(data, rows, cols).expect("Test matrix creation failed")
}

#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
