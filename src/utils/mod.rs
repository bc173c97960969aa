use rand_core::{OsRng, RngCore};

use super::errors::{err_internal, Result};

/// Fills `out` with `byte_length` bytes from the operating system's CSPRNG.
/// Any previous contents of `out` are discarded.
pub fn rand_bytes(byte_length: usize, out: &mut Vec<u8>) -> Result<()> {
    let mut buf = vec![0u8; byte_length];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| err_internal(format!("randomness failure: {e}")))?;
    copy_into(&buf, out);
    Ok(())
}

/// Overwrites `dst` with the contents of `src`.
pub fn copy_into(src: &[u8], dst: &mut Vec<u8>) {
    dst.clear();
    dst.extend_from_slice(src);
}

/// Left-pads a big-endian integer encoding with zeroes up to `width` bytes.
/// Returns `None` if the encoding is wider than `width` once leading zeroes
/// are stripped.
pub fn left_pad(buf: &[u8], width: usize) -> Option<Vec<u8>> {
    let first = buf.iter().position(|b| *b != 0).unwrap_or(buf.len());
    let trimmed = &buf[first..];
    if trimmed.len() > width {
        return None;
    }
    let mut out = vec![0u8; width - trimmed.len()];
    out.extend_from_slice(trimmed);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rand_bytes_has_requested_length() {
        let mut out = vec![1, 2, 3];
        rand_bytes(48, &mut out).unwrap();
        assert_eq!(out.len(), 48);
    }

    #[test]
    fn copy_into_replaces_contents() {
        let mut dst = vec![9; 10];
        copy_into(&[1, 2], &mut dst);
        assert_eq!(dst, vec![1, 2]);
    }

    #[test]
    fn left_pad_widths() {
        assert_eq!(left_pad(&[1], 4), Some(vec![0, 0, 0, 1]));
        assert_eq!(left_pad(&[0, 0, 0, 0, 7], 4), Some(vec![0, 0, 0, 7]));
        assert_eq!(left_pad(&[], 2), Some(vec![0, 0]));
        assert_eq!(left_pad(&[1, 0, 0], 2), None);
    }
}
