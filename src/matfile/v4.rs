//! Level 4 MAT-files, as written by ITK's `MatlabTransformIO`.
//!
//! A Level 4 file is a flat sequence of variables. Each one starts with a
//! 20 byte header of five 32-bit integers (`type`, `mrows`, `ncols`, `imagf`,
//! `namlen`), followed by the NUL terminated name and the column-major data.

use super::typedef::Precision;
use super::MatVariable;
use crate::error::{ConvertError, Result};
use byteordered::{ByteOrdered, Endianness};
use num_traits::FromPrimitive;
use std::io::{Cursor, Read, Result as IoResult, Write};

const HEADER_LEN: usize = 20;

/// Guess the byte order of a variable from its leading type word.
///
/// Valid type words are below 5000, so reading one with the wrong byte
/// order yields either a negative or a huge number.
fn detect_endianness(word: [u8; 4]) -> Endianness {
    let mopt = i32::from_le_bytes(word);
    if (0..5000).contains(&mopt) {
        Endianness::Little
    } else {
        Endianness::Big
    }
}

/// Read all variables of a Level 4 MAT-file.
pub(crate) fn read_variables(data: &[u8]) -> Result<Vec<MatVariable>> {
    let mut cursor = Cursor::new(data);
    let mut variables = Vec::new();
    while (cursor.position() as usize) < data.len() {
        variables.push(read_variable(&mut cursor)?);
    }
    Ok(variables)
}

fn read_variable(cursor: &mut Cursor<&[u8]>) -> Result<MatVariable> {
    let start = cursor.position() as usize;
    let remaining = cursor.get_ref().len() - start;
    if remaining < HEADER_LEN {
        return Err(ConvertError::InvalidFormat("truncated variable header"));
    }
    let mut word = [0u8; 4];
    word.copy_from_slice(&cursor.get_ref()[start..start + 4]);
    let endianness = detect_endianness(word);

    let mut source = ByteOrdered::runtime(&mut *cursor, endianness);
    let mopt = source.read_i32()?;
    let rows = source.read_i32()?;
    let cols = source.read_i32()?;
    let imagf = source.read_i32()?;
    let namlen = source.read_i32()?;

    let machine = mopt / 1000;
    match (machine, endianness) {
        (0, Endianness::Little) | (1, Endianness::Big) => {}
        _ => return Err(ConvertError::UnsupportedMachineFormat(mopt)),
    }
    if (mopt / 100) % 10 != 0 {
        return Err(ConvertError::InvalidFormat("nonzero reserved digit in type"));
    }
    let precision = (mopt / 10) % 10;
    let precision = Precision::from_i32(precision)
        .ok_or(ConvertError::UnsupportedPrecision(precision))?;
    if mopt % 10 > 2 {
        return Err(ConvertError::InvalidFormat("unknown matrix type"));
    }
    if rows < 0 || cols < 0 {
        return Err(ConvertError::InvalidFormat("negative dimensions"));
    }
    if namlen <= 0 {
        return Err(ConvertError::InvalidFormat("missing variable name"));
    }
    let (rows, cols, namlen) = (rows as usize, cols as usize, namlen as usize);

    let numeric = precision.numeric_type();
    let parts = if imagf != 0 { 2 } else { 1 };
    let count = rows
        .checked_mul(cols)
        .ok_or(ConvertError::InvalidFormat("dimensions overflow"))?;
    let needed = count
        .checked_mul(numeric.size_of() * parts)
        .and_then(|n| n.checked_add(namlen))
        .ok_or(ConvertError::InvalidFormat("dimensions overflow"))?;
    if remaining - HEADER_LEN < needed {
        return Err(ConvertError::InvalidFormat("truncated variable data"));
    }

    let mut name = vec![0u8; namlen];
    source.read_exact(&mut name)?;
    let end = name.iter().position(|b| *b == 0).unwrap_or(namlen);
    let name = String::from_utf8_lossy(&name[..end]).into_owned();

    let real = numeric.read_values(&mut source, count)?;
    let imag = if imagf != 0 {
        Some(numeric.read_values(&mut source, count)?)
    } else {
        None
    };

    Ok(MatVariable::from_parts(name, rows, cols, real, imag))
}

/// Write variables as little endian, double precision Level 4 matrices.
pub(crate) fn write_variables<'a, W, I>(writer: W, variables: I) -> IoResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a MatVariable>,
{
    let mut writer = ByteOrdered::le(writer);
    for var in variables {
        writer.write_i32(0)?;
        writer.write_i32(var.rows() as i32)?;
        writer.write_i32(var.cols() as i32)?;
        writer.write_i32(if var.is_complex() { 1 } else { 0 })?;
        writer.write_i32(var.name().len() as i32 + 1)?;
        writer.write_all(var.name().as_bytes())?;
        writer.write_u8(0)?;
        for v in var.data() {
            writer.write_f64(*v)?;
        }
        if let Some(imag) = var.imaginary() {
            for v in imag {
                writer.write_f64(*v)?;
            }
        }
    }
    Ok(())
}
