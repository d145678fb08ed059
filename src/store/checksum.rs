//! CRC32 checksums for version records
//!
//! Every read verifies the checksum; a mismatch is reported as corruption.

use crc32fast::Hasher;

/// Computes a CRC32 (IEEE) checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Frames a record body as `<crc32 hex>\n<body>`.
pub fn seal(body: &[u8]) -> Vec<u8> {
    let mut framed = format!("{:08x}\n", compute_checksum(body)).into_bytes();
    framed.extend_from_slice(body);
    framed
}

/// Splits a framed record and verifies its checksum, returning the body.
pub fn unseal(framed: &[u8]) -> Result<&[u8], String> {
    let newline = framed
        .iter()
        .position(|b| *b == b'\n')
        .ok_or_else(|| "missing checksum header".to_string())?;

    let (header, rest) = framed.split_at(newline);
    let body = &rest[1..];

    let header = std::str::from_utf8(header).map_err(|_| "checksum header is not UTF-8".to_string())?;
    let expected = u32::from_str_radix(header, 16).map_err(|_| format!("bad checksum header '{}'", header))?;

    let actual = compute_checksum(body);
    if actual != expected {
        return Err(format!("checksum mismatch: stored {:08x}, computed {:08x}", expected, actual));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_deterministic() {
        let data = b"version record";
        assert_eq!(compute_checksum(data), compute_checksum(data));
    }

    #[test]
    fn test_seal_unseal() {
        let framed = seal(b"{\"a\":1}");
        assert_eq!(unseal(&framed).unwrap(), b"{\"a\":1}");
    }

    #[test]
    fn test_unseal_detects_corruption() {
        let mut framed = seal(b"{\"price\":100}");
        let last = framed.len() - 2;
        framed[last] ^= 0x01;
        assert!(unseal(&framed).unwrap_err().contains("checksum mismatch"));
    }

    #[test]
    fn test_unseal_rejects_missing_header() {
        assert!(unseal(b"no header at all").is_err());
        assert!(unseal(b"zzzzzzzz\n{}").is_err());
    }
}
