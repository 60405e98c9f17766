//! Text decoding with a legacy-encoding fallback.
//!
//! Spreadsheets exported on older Windows setups arrive as Windows-1252
//! rather than UTF-8. Decoding tries UTF-8 first and falls back to
//! Windows-1252; only a file that is valid in neither is rejected.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DashboardError, DashboardResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Windows-1252 code points for bytes 0x80..=0x9F. `None` marks the five
/// bytes the code page leaves undefined.
const WINDOWS_1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

/// The encoding a file was successfully decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceEncoding {
    /// UTF-8, with or without a byte-order mark.
    Utf8,
    /// Windows-1252 (the Latin-1 superset used by spreadsheet exports).
    Windows1252,
}

/// Decodes file contents, trying UTF-8 and then Windows-1252.
///
/// # Errors
///
/// Returns `DecodeError` if the bytes are valid in neither encoding.
///
/// # Examples
///
/// ```
/// use cost_dashboard::storage::{decode, SourceEncoding};
///
/// let (text, encoding) = decode(b"Sal\xE1rio", "sheet.csv").unwrap();
/// assert_eq!(text, "Salário");
/// assert_eq!(encoding, SourceEncoding::Windows1252);
/// ```
pub fn decode(bytes: &[u8], path: &str) -> DashboardResult<(String, SourceEncoding)> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let utf8_error = match std::str::from_utf8(body) {
        Ok(text) => return Ok((text.to_string(), SourceEncoding::Utf8)),
        Err(e) => e,
    };

    match decode_windows_1252(body) {
        Some(text) => {
            info!(
                path,
                utf8_error = %utf8_error,
                "File is not UTF-8; decoded as Windows-1252"
            );
            Ok((text, SourceEncoding::Windows1252))
        }
        None => Err(DashboardError::DecodeError {
            path: path.to_string(),
            message: format!(
                "not valid UTF-8 ({}) and contains bytes undefined in Windows-1252",
                utf8_error
            ),
        }),
    }
}

fn decode_windows_1252(bytes: &[u8]) -> Option<String> {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => WINDOWS_1252_HIGH[usize::from(b - 0x80)],
            _ => Some(char::from(b)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_is_preferred() {
        let (text, encoding) = decode("Salário".as_bytes(), "a.csv").unwrap();
        assert_eq!(text, "Salário");
        assert_eq!(encoding, SourceEncoding::Utf8);
    }

    #[test]
    fn test_bom_is_dropped() {
        let (text, encoding) = decode(b"\xEF\xBB\xBFName", "a.csv").unwrap();
        assert_eq!(text, "Name");
        assert_eq!(encoding, SourceEncoding::Utf8);
    }

    #[test]
    fn test_latin1_fallback() {
        let (text, encoding) = decode(b"Descri\xE7\xE3o;Categoria", "a.csv").unwrap();
        assert_eq!(text, "Descrição;Categoria");
        assert_eq!(encoding, SourceEncoding::Windows1252);
    }

    #[test]
    fn test_bom_is_dropped_before_legacy_decode() {
        let (text, encoding) = decode(b"\xEF\xBB\xBFSal\xE1rio;Nome", "a.csv").unwrap();
        assert_eq!(text, "Salário;Nome");
        assert_eq!(encoding, SourceEncoding::Windows1252);
    }

    #[test]
    fn test_windows_1252_specials() {
        let (text, _) = decode(b"\x80 100 \x96 \x93ok\x94", "a.csv").unwrap();
        assert_eq!(text, "\u{20AC} 100 \u{2013} \u{201C}ok\u{201D}");
    }

    #[test]
    fn test_undefined_byte_is_decode_error() {
        match decode(b"bad \x81 byte", "broken.csv") {
            Err(DashboardError::DecodeError { path, .. }) => assert_eq!(path, "broken.csv"),
            other => panic!("Expected DecodeError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        let (text, encoding) = decode(b"", "a.csv").unwrap();
        assert!(text.is_empty());
        assert_eq!(encoding, SourceEncoding::Utf8);
    }
}
