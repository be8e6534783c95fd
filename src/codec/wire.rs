//! Little-endian primitives shared by the filter encoders.

use super::CodecError;
use crate::error::Result;
use std::io::Read;

/// Width of every header field in bytes.
pub(crate) const FIELD_LEN: usize = 8;

pub(crate) fn put_u64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn put_f64(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(&value.to_bits().to_le_bytes());
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn put_usize(out: &mut Vec<u8>, value: usize) {
    put_u64(out, value as u64);
}

pub(crate) fn read_u64<R: Read + ?Sized>(reader: &mut R) -> Result<u64> {
    let mut buf = [0u8; FIELD_LEN];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

pub(crate) fn read_f64<R: Read + ?Sized>(reader: &mut R) -> Result<f64> {
    read_u64(reader).map(f64::from_bits)
}

/// Narrow a stored `u64` to `usize`, naming the field on failure.
pub(crate) fn to_usize(field: &'static str, value: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| CodecError::ValueTooLarge { field, value }.into())
}

/// Read exactly `len` bytes without trusting `len` for the allocation.
///
/// The buffer grows as bytes arrive, so a header announcing an enormous
/// payload on a short stream fails with a truncation error instead of
/// reserving the announced size up front.
pub(crate) fn read_payload<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    Read::take(&mut *reader, len as u64).read_to_end(&mut payload)?;
    if payload.len() != len {
        return Err(CodecError::TruncatedPayload {
            expected: len,
            actual: payload.len(),
        }
        .into());
    }
    Ok(payload)
}
