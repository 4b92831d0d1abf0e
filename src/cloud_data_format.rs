//! This module provides an API to read and write labeled point-cloud
//! dataset files, the format the study viewer loads its synthetic test
//! datasets from. The files have the following structure:
//!
//! - An unsigned 32-bit point count.
//! - That many position triples, each three 32-bit floats.
//! - That many 32-bit float labels, one per point in the same order;
//!   `0.0` marks a noise point, `1.0` a structure point.
//!
//! All values are big-endian. There is no header beyond the count and no
//! trailing data.

use std::{
    fmt,
    fs::File,
    io::{Read, Write},
    path::Path,
};

/// A point position in dataset space.
pub type Point3 = [f32; 3];

/// Label value of a noise point.
pub const NOISE_LABEL: f32 = 0.0;

/// Label value of a structure point.
pub const STRUCTURE_LABEL: f32 = 1.0;

/// An in-memory point-cloud dataset: positions plus per-point labels.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudFile {
    points: Vec<Point3>,
    labels: Vec<f32>,
}

/// A nice little error that we can return if things go wrong while
/// building, reading, or writing a [`CloudFile`].
#[derive(Debug)]
pub enum CloudFileError {
    /// Returned when building a [`CloudFile`] from a point list and a label
    /// list of different lengths.
    MismatchedLabelCount,

    /// Returned when a file ends before the count it announced.
    Truncated,

    /// Returned when io fails while reading or writing files.
    IoError(std::io::Error),
}

impl fmt::Display for CloudFileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use CloudFileError as CFE;
        match self {
            CFE::MismatchedLabelCount => write!(f, "point and label counts differ"),
            CFE::Truncated => write!(f, "file is shorter than its point count"),
            CFE::IoError(error) => write!(f, "io error: {}", error),
        }
    }
}

impl std::error::Error for CloudFileError {}

impl CloudFile {
    /// Build a dataset from matching position and label lists.
    pub fn new(points: Vec<Point3>, labels: Vec<f32>) -> Result<Self, CloudFileError> {
        if points.len() != labels.len() {
            return Err(CloudFileError::MismatchedLabelCount);
        }
        Ok(Self { points, labels })
    }

    /// Build a dataset from a noise cloud and a structure cloud: the noise
    /// points come first carrying [`NOISE_LABEL`], the structure points
    /// after carrying [`STRUCTURE_LABEL`].
    pub fn from_noise_and_structure(noise: Vec<Point3>, structure: Vec<Point3>) -> Self {
        let mut labels = vec![NOISE_LABEL; noise.len()];
        labels.extend(std::iter::repeat(STRUCTURE_LABEL).take(structure.len()));

        let mut points = noise;
        points.extend_from_slice(&structure);

        Self { points, labels }
    }

    /// The point positions.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// The per-point labels, in the same order as [`points`](Self::points).
    pub fn labels(&self) -> &[f32] {
        &self.labels
    }

    /// Number of points in the dataset.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the dataset holds no points at all.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Write out a [`CloudFile`] to the path provided.
    pub fn to_path(&self, path: impl AsRef<Path>) -> Result<(), CloudFileError> {
        let mut handle = File::create(path).map_err(CloudFileError::IoError)?;
        self.to_file(&mut handle)
    }

    /// Write out a [`CloudFile`] to the [`Write`]able object provided.
    pub fn to_file(&self, file: &mut impl Write) -> Result<(), CloudFileError> {
        let count = self.points.len() as u32;
        file.write_all(&count.to_be_bytes())
            .map_err(CloudFileError::IoError)?;

        let p_buf: Vec<u8> = self
            .points
            .iter()
            .flat_map(|p| p.iter().flat_map(|f| f.to_be_bytes()))
            .collect();
        file.write_all(&p_buf).map_err(CloudFileError::IoError)?;

        let l_buf: Vec<u8> = self.labels.iter().flat_map(|f| f.to_be_bytes()).collect();
        file.write_all(&l_buf).map_err(CloudFileError::IoError)
    }

    /// Read a [`CloudFile`] from the path provided.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CloudFileError> {
        let mut handle = File::open(path).map_err(CloudFileError::IoError)?;
        Self::from_file(&mut handle)
    }

    /// Read a [`CloudFile`] from the [`Read`]able object provided.
    pub fn from_file(file: &mut impl Read) -> Result<Self, CloudFileError> {
        let mut raw = Vec::new();
        file.read_to_end(&mut raw).map_err(CloudFileError::IoError)?;

        if raw.len() < 4 {
            return Err(CloudFileError::Truncated);
        }
        let count = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize;

        // 12 bytes of position plus 4 bytes of label per point.
        if raw.len() < 4 + 16 * count {
            return Err(CloudFileError::Truncated);
        }

        let positions = &raw[4..4 + 12 * count];
        let points: Vec<Point3> = positions
            .chunks_exact(12)
            .map(|chunk| {
                [
                    f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
                    f32::from_be_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]),
                    f32::from_be_bytes([chunk[8], chunk[9], chunk[10], chunk[11]]),
                ]
            })
            .collect();

        let label_bytes = &raw[4 + 12 * count..4 + 16 * count];
        let labels: Vec<f32> = label_bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Ok(Self { points, labels })
    }
}
