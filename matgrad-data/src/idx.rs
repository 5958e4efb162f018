// matgrad-data/src/idx.rs

use crate::dataset::Dataset;
use crate::error::DataError;
use log::{debug, info};
use matgrad_core::{MatNumeric, Matrix};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub const IMAGE_MAGIC: u32 = 0x0803;
pub const LABEL_MAGIC: u32 = 0x0801;

/// Images and labels read from a pair of IDX files (the MNIST layout).
///
/// Pixels are stored normalised to `[0, 1]`, sample after sample.
#[derive(Debug, Clone)]
pub struct IdxDataset {
    pixels: Vec<f32>,
    labels: Vec<u8>,
    image_rows: usize,
    image_cols: usize,
}

impl IdxDataset {
    /// Opens and parses an image file and its label file.
    pub fn open(
        images_path: impl AsRef<Path>,
        labels_path: impl AsRef<Path>,
        max_samples: Option<usize>,
    ) -> Result<Self, DataError> {
        let images = File::open(images_path.as_ref()).map_err(|source| DataError::Io {
            stream: "images",
            source,
        })?;
        let labels = File::open(labels_path.as_ref()).map_err(|source| DataError::Io {
            stream: "labels",
            source,
        })?;
        Self::from_readers(BufReader::new(images), BufReader::new(labels), max_samples)
    }

    /// Parses an image stream (magic `0x0803`, then count, rows, cols as
    /// big-endian `u32`, then one byte per pixel) and a label stream (magic
    /// `0x0801`, count, one byte per label).
    ///
    /// Only the first `max_samples` images are read when given. The label
    /// stream may hold more labels than images but never fewer.
    pub fn from_readers<I: Read, L: Read>(
        mut images: I,
        mut labels: L,
        max_samples: Option<usize>,
    ) -> Result<Self, DataError> {
        let magic = read_u32_be(&mut images, "images")?;
        if magic != IMAGE_MAGIC {
            return Err(DataError::InvalidMagic {
                stream: "images",
                expected: IMAGE_MAGIC,
                found: magic,
            });
        }
        let mut num_images = read_u32_be(&mut images, "images")? as usize;
        let image_rows = read_u32_be(&mut images, "images")? as usize;
        let image_cols = read_u32_be(&mut images, "images")? as usize;
        if let Some(max) = max_samples {
            num_images = num_images.min(max);
        }

        let total = image_rows
            .checked_mul(image_cols)
            .and_then(|size| size.checked_mul(num_images))
            .ok_or(DataError::HeaderOverflow {
                stream: "images",
                count: num_images,
                rows: image_rows,
                cols: image_cols,
            })?;
        let raw = read_payload(&mut images, total, "images")?;
        let pixels = raw.iter().map(|&p| f32::from(p) / 255.0).collect();

        let label_magic = read_u32_be(&mut labels, "labels")?;
        if label_magic != LABEL_MAGIC {
            return Err(DataError::InvalidMagic {
                stream: "labels",
                expected: LABEL_MAGIC,
                found: label_magic,
            });
        }
        let num_labels = read_u32_be(&mut labels, "labels")? as usize;
        if num_labels < num_images {
            return Err(DataError::LabelCountMismatch {
                images: num_images,
                labels: num_labels,
            });
        }
        let label_bytes = read_payload(&mut labels, num_images, "labels")?;

        info!(
            "IdxDataset: loaded {} images of {}x{}",
            num_images, image_rows, image_cols
        );
        Ok(IdxDataset {
            pixels,
            labels: label_bytes,
            image_rows,
            image_cols,
        })
    }

    /// `(rows, cols)` of a single image.
    pub fn image_dims(&self) -> (usize, usize) {
        (self.image_rows, self.image_cols)
    }

    /// Pixels per image, the row count of a batch matrix.
    pub fn image_size(&self) -> usize {
        self.image_rows * self.image_cols
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    fn image(&self, index: usize) -> &[f32] {
        let size = self.image_size();
        &self.pixels[index * size..(index + 1) * size]
    }

    /// Contiguous batch starting at `offset`, clipped to the end of the data.
    ///
    /// Returns a `[image_size, batch]` matrix with one sample per column and
    /// the matching labels.
    ///
    /// # Errors
    /// `DataError::InvalidBatch` if `batch_size == 0` or `offset >= len`.
    pub fn get_batch<T: MatNumeric>(
        &self,
        batch_size: usize,
        offset: usize,
    ) -> Result<(Matrix<T>, Vec<usize>), DataError> {
        if batch_size == 0 || offset >= self.len() {
            return Err(DataError::InvalidBatch {
                offset,
                batch_size,
                len: self.len(),
            });
        }
        let end = (offset + batch_size).min(self.len());
        let indices: Vec<usize> = (offset..end).collect();
        self.gather(&indices)
    }

    /// Batch made of the samples at `indices`, in that order.
    ///
    /// # Errors
    /// `DataError::IndexOutOfBounds` for an index past the end,
    /// `DataError::InvalidBatch` for an empty index list.
    pub fn gather<T: MatNumeric>(&self, indices: &[usize]) -> Result<(Matrix<T>, Vec<usize>), DataError> {
        if indices.is_empty() {
            return Err(DataError::InvalidBatch {
                offset: 0,
                batch_size: 0,
                len: self.len(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(DataError::IndexOutOfBounds { index, len: self.len() });
        }
        let images = Matrix::from_fn(self.image_size(), indices.len(), |pixel, sample| {
            T::from_f64_lossy(f64::from(self.image(indices[sample])[pixel]))
        });
        let labels = indices.iter().map(|&i| usize::from(self.labels[i])).collect();
        debug!("IdxDataset::gather: batch of {}", indices.len());
        Ok((images, labels))
    }
}

impl Dataset for IdxDataset {
    type Item = (Vec<f32>, usize);

    fn get(&self, index: usize) -> Result<Self::Item, DataError> {
        if index >= self.len() {
            return Err(DataError::IndexOutOfBounds { index, len: self.len() });
        }
        Ok((self.image(index).to_vec(), usize::from(self.labels[index])))
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}

fn read_u32_be<R: Read>(reader: &mut R, stream: &'static str) -> Result<u32, DataError> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|source| DataError::Io { stream, source })?;
    Ok(u32::from_be_bytes(buf))
}

/// Reads exactly `len` bytes, growing the buffer only as data arrives so a
/// header claiming more data than the stream holds cannot force a huge
/// allocation.
fn read_payload<R: Read>(reader: &mut R, len: usize, stream: &'static str) -> Result<Vec<u8>, DataError> {
    let mut buf = Vec::new();
    let found = reader
        .by_ref()
        .take(len as u64)
        .read_to_end(&mut buf)
        .map_err(|source| DataError::Io { stream, source })?;
    if found != len {
        return Err(DataError::Truncated {
            stream,
            expected: len,
            found,
        });
    }
    Ok(buf)
}

#[cfg(test)]
#[path = "idx_test.rs"]
mod tests;
