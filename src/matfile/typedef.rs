//! Type codes defined by the MAT-file formats, plus a means of
//! reading numeric values of any of those types as `f64`.

use byteordered::{ByteOrdered, Endian};
use num_derive::FromPrimitive;
use std::io::{Read, Result as IoResult};

/// Level 4 precision digit (`P` in the `MOPT` type word).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum Precision {
    /// 64 bit float.
    Float64 = 0,
    /// 32 bit float.
    Float32 = 1,
    /// signed int.
    Int32 = 2,
    /// signed short.
    Int16 = 3,
    /// unsigned short.
    Uint16 = 4,
    /// unsigned char.
    Uint8 = 5,
}

impl Precision {
    /// The numeric type used to store values of this precision.
    pub fn numeric_type(self) -> NumericType {
        match self {
            Precision::Float64 => NumericType::Float64,
            Precision::Float32 => NumericType::Float32,
            Precision::Int32 => NumericType::Int32,
            Precision::Int16 => NumericType::Int16,
            Precision::Uint16 => NumericType::Uint16,
            Precision::Uint8 => NumericType::Uint8,
        }
    }
}

/// Level 5 data element type (the `miXXX` constants).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum DataType {
    /// `miINT8`
    Int8 = 1,
    /// `miUINT8`
    Uint8 = 2,
    /// `miINT16`
    Int16 = 3,
    /// `miUINT16`
    Uint16 = 4,
    /// `miINT32`
    Int32 = 5,
    /// `miUINT32`
    Uint32 = 6,
    /// `miSINGLE`
    Single = 7,
    /// `miDOUBLE`
    Double = 9,
    /// `miINT64`
    Int64 = 12,
    /// `miUINT64`
    Uint64 = 13,
    /// `miMATRIX`
    Matrix = 14,
    /// `miCOMPRESSED`
    Compressed = 15,
    /// `miUTF8`
    Utf8 = 16,
    /// `miUTF16`
    Utf16 = 17,
    /// `miUTF32`
    Utf32 = 18,
}

impl DataType {
    /// The numeric type of this element's payload, if it holds numbers.
    pub fn numeric_type(self) -> Option<NumericType> {
        match self {
            DataType::Int8 => Some(NumericType::Int8),
            DataType::Uint8 => Some(NumericType::Uint8),
            DataType::Int16 => Some(NumericType::Int16),
            DataType::Uint16 => Some(NumericType::Uint16),
            DataType::Int32 => Some(NumericType::Int32),
            DataType::Uint32 => Some(NumericType::Uint32),
            DataType::Single => Some(NumericType::Float32),
            DataType::Double => Some(NumericType::Float64),
            DataType::Int64 => Some(NumericType::Int64),
            DataType::Uint64 => Some(NumericType::Uint64),
            _ => None,
        }
    }
}

/// Level 5 array class (the `mxXXX_CLASS` constants).
#[allow(missing_docs)]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum ArrayClass {
    Cell = 1,
    Struct = 2,
    Object = 3,
    Char = 4,
    Sparse = 5,
    Double = 6,
    Single = 7,
    Int8 = 8,
    Uint8 = 9,
    Int16 = 10,
    Uint16 = 11,
    Int32 = 12,
    Uint32 = 13,
    Int64 = 14,
    Uint64 = 15,
}

impl ArrayClass {
    /// Whether arrays of this class hold a plain numeric payload.
    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            ArrayClass::Cell
                | ArrayClass::Struct
                | ArrayClass::Object
                | ArrayClass::Char
                | ArrayClass::Sparse
        )
    }
}

/// Primitive storage type of numeric values, common to both format levels.
#[allow(missing_docs)]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum NumericType {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
}

impl NumericType {
    /// Retrieve the size of an element of this type, in bytes.
    pub fn size_of(self) -> usize {
        use NumericType::*;
        match self {
            Int8 | Uint8 => 1,
            Int16 | Uint16 => 2,
            Int32 | Uint32 | Float32 => 4,
            Int64 | Uint64 | Float64 => 8,
        }
    }

    /// Read `count` values of this type from a source, widened to `f64`.
    pub fn read_values<S, E>(self, source: &mut ByteOrdered<S, E>, count: usize) -> IoResult<Vec<f64>>
    where
        S: Read,
        E: Endian,
    {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let value = match self {
                NumericType::Int8 => f64::from(source.read_i8()?),
                NumericType::Uint8 => f64::from(source.read_u8()?),
                NumericType::Int16 => f64::from(source.read_i16()?),
                NumericType::Uint16 => f64::from(source.read_u16()?),
                NumericType::Int32 => f64::from(source.read_i32()?),
                NumericType::Uint32 => f64::from(source.read_u32()?),
                NumericType::Int64 => source.read_i64()? as f64,
                NumericType::Uint64 => source.read_u64()? as f64,
                NumericType::Float32 => f64::from(source.read_f32()?),
                NumericType::Float64 => source.read_f64()?,
            };
            out.push(value);
        }
        Ok(out)
    }
}
