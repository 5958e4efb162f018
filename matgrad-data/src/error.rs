use matgrad_core::MatGradError;
use thiserror::Error;

/// Errors raised while reading or batching a dataset.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error while reading {stream}: {source}")]
    Io {
        stream: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {stream} file: magic number {found:#06x}, expected {expected:#06x}")]
    InvalidMagic {
        stream: &'static str,
        expected: u32,
        found: u32,
    },

    #[error("{stream} header describes {count} samples of {rows}x{cols}, which overflows usize")]
    HeaderOverflow {
        stream: &'static str,
        count: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Truncated {stream} stream: expected {expected} bytes of data, found {found}")]
    Truncated {
        stream: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Number of labels ({labels}) is less than number of images ({images})")]
    LabelCountMismatch { images: usize, labels: usize },

    #[error("Invalid batch: offset {offset}, batch size {batch_size}, dataset length {len}")]
    InvalidBatch {
        offset: usize,
        batch_size: usize,
        len: usize,
    },

    #[error("Index {index} out of bounds for dataset of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error(transparent)]
    Graph(#[from] MatGradError),
}
