//! Reading data files as text.
//!
//! Data files are expected to be UTF-8, but hand-edited fixtures often carry a
//! BOM or a legacy encoding. The strategy is:
//! 1. Strip a UTF-8 BOM, or decode UTF-16 when a UTF-16 BOM is present
//! 2. Strict UTF-8 decode (fast path)
//! 3. Fall back to chardetng detection and decode with replacement

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use std::io;
use std::path::Path;

const DETECTION_SAMPLE_SIZE: usize = 8192;

/// Read the file at `path` and decode it to a `String`.
///
/// Only I/O failures are reported; undecodable bytes become U+FFFD.
pub fn read_text(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_bytes(&bytes))
}

pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xef, 0xbb, 0xbf]) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    if bytes.starts_with(&[0xff, 0xfe]) {
        return decode_with(UTF_16LE, bytes);
    }
    if bytes.starts_with(&[0xfe, 0xff]) {
        return decode_with(UTF_16BE, bytes);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let sample = &bytes[..bytes.len().min(DETECTION_SAMPLE_SIZE)];
    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    let encoding = detector.guess(None, true);
    tracing::debug!("decoding non-UTF-8 data file as {}", encoding.name());
    decode_with(encoding, bytes)
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> String {
    // `decode` sniffs and removes a matching BOM itself.
    let (decoded, _used, _had_errors) = encoding.decode(bytes);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("{\"a\": \"🚀\"}".as_bytes()).unwrap();
        file.flush().unwrap();

        assert_eq!(read_text(file.path()).unwrap(), "{\"a\": \"🚀\"}");
    }

    #[test]
    fn test_strips_utf8_bom() {
        let mut bytes = vec![0xef, 0xbb, 0xbf];
        bytes.extend_from_slice(b"{\"a\": 1}");
        assert_eq!(decode_bytes(&bytes), "{\"a\": 1}");
    }

    #[test]
    fn test_decodes_utf16le_bom() {
        let bytes = [0xff, 0xfe, b'h', 0x00, b'i', 0x00];
        assert_eq!(decode_bytes(&bytes), "hi");
    }

    #[test]
    fn test_latin1_fallback_keeps_ascii() {
        // "caf\xe9" is valid windows-1252 but not UTF-8
        let text = decode_bytes(b"name: caf\xe9");
        assert!(text.starts_with("name: caf"));
        assert_eq!(text.chars().count(), 10);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_text(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
