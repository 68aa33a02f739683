//! Shared fixtures for the integration tests.

use std::path::{Path, PathBuf};

use ants2fsl::AffineRecord;
use tempfile::TempDir;

/// An identity transform shifted by (1, 2, 3), about the origin.
#[allow(dead_code)]
pub fn translation_record() -> AffineRecord {
    AffineRecord::new(
        [1., 0., 0., 0., 1., 0., 0., 0., 1., 1., 2., 3.],
        [0., 0., 0.],
    )
}

/// A small rotation with translation, about the origin.
#[allow(dead_code)]
#[rustfmt::skip]
pub fn rotation_record() -> AffineRecord {
    AffineRecord::new(
        [
            0.9992, -0.0299, 0.0277,
            0.0299, 0.9996, 0.0014,
            -0.0278, -0.0006, 0.9996,
            -26.9212, -23.5541, 46.1223,
        ],
        [0., 0., 0.],
    )
}

/// Known FSL output for `translation_record`.
#[allow(dead_code)]
pub const TRANSLATION_FSL: &str = "\
1.00002 -6.981e-05 7.933e-05 2.28939
7.714e-05 1.00005 -3.3e-05 3.94339
-1.758e-05 1.716e-05 0.999974 -5.94183
0 0 0 1
";

/// Bytes of a Level 4 MAT-file laid out the way ITK writes transforms:
/// little endian doubles, 12x1 parameters followed by the 3x1 fixed point.
#[allow(dead_code)]
pub fn itk_bytes(parameters: &[f64; 12], fixed: &[f64; 3]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut var = |name: &str, values: &[f64]| {
        for v in &[0i32, values.len() as i32, 1, 0, name.len() as i32 + 1] {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out.extend_from_slice(name.as_bytes());
        out.push(0);
        for v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
    };
    var("AffineTransform_double_3_3", parameters);
    var("fixed", fixed);
    out
}

/// Save a record to a fresh temporary directory, returning the directory
/// (which must be kept alive) and the file path.
#[allow(dead_code)]
pub fn save_record(record: &AffineRecord) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("0GenericAffine.mat");
    record.to_mat_file().to_file_v4(&path).unwrap();
    (dir, path)
}

/// Parse an FSL matrix file back into rows of numbers.
#[allow(dead_code)]
pub fn read_fsl<P: AsRef<Path>>(path: P) -> Vec<Vec<f64>> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.split(' ').map(|v| v.parse().unwrap()).collect())
        .collect()
}
