//! Level 5 MAT-files.
//!
//! After a 128 byte header, the file holds a sequence of tagged data
//! elements. Variables are `miMATRIX` elements, possibly wrapped in an
//! `miCOMPRESSED` zlib stream.

use super::typedef::{ArrayClass, DataType};
use super::MatVariable;
use crate::error::{ConvertError, Result};
use byteordered::{ByteOrdered, Endianness};
use flate2::read::ZlibDecoder;
use log::trace;
use num_traits::FromPrimitive;
use std::io::Read;

/// Size of the descriptive header at the start of a Level 5 file.
pub const HEADER_LEN: usize = 128;

const FLAG_COMPLEX: u32 = 0x0800;

/// Check whether the given bytes start with a Level 5 header, returning
/// the file's byte order if so.
///
/// The header text never contains NUL bytes in its first four characters,
/// whereas a Level 4 type word always does.
pub(crate) fn detect(data: &[u8]) -> Option<Endianness> {
    if data.len() < HEADER_LEN || data[..4].contains(&0) {
        return None;
    }
    match &data[126..128] {
        b"IM" => Some(Endianness::Little),
        b"MI" => Some(Endianness::Big),
        _ => None,
    }
}

/// Read all numeric variables of a Level 5 MAT-file.
/// Arrays of other classes are skipped.
pub(crate) fn read_variables(data: &[u8], endianness: Endianness) -> Result<Vec<MatVariable>> {
    let mut variables = Vec::new();
    let mut pos = HEADER_LEN;
    while pos < data.len() {
        let (element, next) = read_element(data, pos, endianness)?;
        if let Some(var) = read_top_level(element, endianness)? {
            variables.push(var);
        }
        pos = next;
    }
    Ok(variables)
}

/// A raw data element: its type code and payload.
#[derive(Debug)]
struct Element<'a> {
    data_type: u32,
    payload: &'a [u8],
}

fn read_u32(bytes: &[u8], endianness: Endianness) -> Result<u32> {
    Ok(ByteOrdered::runtime(bytes, endianness).read_u32()?)
}

fn pad8(n: usize) -> usize {
    (n + 7) & !7
}

/// Read the element starting at `pos`, returning it together with the
/// position of the next element.
fn read_element(data: &[u8], pos: usize, endianness: Endianness) -> Result<(Element<'_>, usize)> {
    if data.len() - pos < 8 {
        return Err(ConvertError::InvalidFormat("truncated element tag"));
    }
    let word = read_u32(&data[pos..pos + 4], endianness)?;
    if word >> 16 != 0 {
        // small data element, packed in the tag itself
        let nbytes = (word >> 16) as usize;
        if nbytes > 4 {
            return Err(ConvertError::InvalidFormat("oversized small data element"));
        }
        let element = Element {
            data_type: word & 0xFFFF,
            payload: &data[pos + 4..pos + 4 + nbytes],
        };
        return Ok((element, pos + 8));
    }

    let nbytes = read_u32(&data[pos + 4..pos + 8], endianness)? as usize;
    let start = pos + 8;
    if data.len() - start < nbytes {
        return Err(ConvertError::InvalidFormat("truncated element data"));
    }
    let next = if word == DataType::Compressed as u32 {
        start + nbytes
    } else {
        // the last element may come without its padding
        (start + pad8(nbytes)).min(data.len())
    };
    let element = Element {
        data_type: word,
        payload: &data[start..start + nbytes],
    };
    Ok((element, next))
}

fn read_top_level(element: Element<'_>, endianness: Endianness) -> Result<Option<MatVariable>> {
    match DataType::from_u32(element.data_type) {
        Some(DataType::Matrix) => read_matrix(element.payload, endianness),
        Some(DataType::Compressed) => {
            let mut inflated = Vec::new();
            let _ = ZlibDecoder::new(element.payload).read_to_end(&mut inflated)?;
            let (inner, _) = read_element(&inflated, 0, endianness)?;
            read_top_level(inner, endianness)
        }
        _ => {
            trace!("skipping top level element of type {}", element.data_type);
            Ok(None)
        }
    }
}

/// Decode the sub-elements of an `miMATRIX` payload.
fn read_matrix(payload: &[u8], endianness: Endianness) -> Result<Option<MatVariable>> {
    let (flags, pos) = read_element(payload, 0, endianness)?;
    if flags.payload.len() < 8 {
        return Err(ConvertError::InvalidFormat("truncated array flags"));
    }
    let flags_word = read_u32(flags.payload, endianness)?;
    let class = (flags_word & 0xFF) as u8;
    let complex = flags_word & FLAG_COMPLEX != 0;

    let (dims, pos) = read_element(payload, pos, endianness)?;
    let dims = decode_numeric(&dims, endianness)?;
    if dims.len() < 2 || dims.iter().any(|d| *d < 0.0) {
        return Err(ConvertError::InvalidFormat("invalid array dimensions"));
    }
    let rows = dims[0] as usize;
    let cols = dims[1..]
        .iter()
        .try_fold(1usize, |acc, d| acc.checked_mul(*d as usize))
        .ok_or(ConvertError::InvalidFormat("dimensions overflow"))?;

    let (name, pos) = read_element(payload, pos, endianness)?;
    let name = String::from_utf8_lossy(name.payload).into_owned();

    match ArrayClass::from_u8(class) {
        Some(class) if class.is_numeric() => {}
        _ => {
            trace!("skipping variable `{}` of array class {}", name, class);
            return Ok(None);
        }
    }

    let (real, pos) = read_element(payload, pos, endianness)?;
    let real = decode_numeric(&real, endianness)?;
    let imag = if complex {
        let (imag, _) = read_element(payload, pos, endianness)?;
        Some(decode_numeric(&imag, endianness)?)
    } else {
        None
    };

    let count = rows
        .checked_mul(cols)
        .ok_or(ConvertError::InvalidFormat("dimensions overflow"))?;
    if real.len() != count || imag.as_ref().map_or(false, |i| i.len() != count) {
        return Err(ConvertError::InvalidFormat(
            "element count does not match array dimensions",
        ));
    }
    Ok(Some(MatVariable::from_parts(name, rows, cols, real, imag)))
}

fn decode_numeric(element: &Element<'_>, endianness: Endianness) -> Result<Vec<f64>> {
    let numeric = DataType::from_u32(element.data_type)
        .and_then(DataType::numeric_type)
        .ok_or(ConvertError::UnsupportedPrecision(element.data_type as i32))?;
    let size = numeric.size_of();
    if element.payload.len() % size != 0 {
        return Err(ConvertError::InvalidFormat("misaligned numeric data"));
    }
    let mut source = ByteOrdered::runtime(element.payload, endianness);
    Ok(numeric.read_values(&mut source, element.payload.len() / size)?)
}
