//! Utility functions to write FSL matrix files.
//!
//! FSL reads affine matrices as plain text: one line per row, values
//! separated by a single space. Values are printed like C's `%.6g`.

use crate::error::{ConvertError, Result};
use nalgebra::Matrix4;
use std::fs;
use std::path::Path;

/// Significant digits of each written value.
pub const PRECISION: usize = 6;

/// Format a number like C's `%.{precision}g`.
///
/// Fixed notation is used when the decimal exponent `x` of the rounded
/// value satisfies `-4 <= x < precision`, scientific notation otherwise.
/// Trailing zeros are removed in both cases.
pub fn format_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let text = if value < 0. { "-inf" } else { "inf" };
        return text.to_string();
    }
    let precision = precision.max(1);
    if value == 0. {
        let text = if value.is_sign_negative() { "-0" } else { "0" };
        return text.to_string();
    }

    // round first: the exponent may change (e.g. 999999.5 -> 1e+06)
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return sci,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Render a matrix in the FSL text layout.
pub fn format_matrix(matrix: &Matrix4<f64>) -> String {
    let mut out = String::new();
    for row in matrix.row_iter() {
        let line: Vec<String> = row.iter().map(|v| format_g(*v, PRECISION)).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Write a matrix to an FSL matrix file, replacing any existing file.
pub fn write_matrix<P: AsRef<Path>>(path: P, matrix: &Matrix4<f64>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, format_matrix(matrix)).map_err(|e| ConvertError::Write(path.to_path_buf(), e))
}
