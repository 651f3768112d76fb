//! Text encoding detection and conversion
//!
//! Generated transform skeletons and JSON destinations must be written in the
//! same encoding as their source file, so the engines read and write through
//! this module instead of `fs::read_to_string`. Detection is BOM-based with a
//! plain UTF-8 fallback; UTF-32 and UTF-7 are recognized but rejected (no
//! config file in the wild should be encoded that way, and decoding them is
//! not worth carrying a transcoding dependency for).

use crate::core::error::{ShiftResult, TransformError};
use std::fs;
use std::path::Path;

/// Encodings recognized by BOM sniffing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
  /// UTF-8 without BOM (also covers plain ASCII)
  Utf8,
  /// UTF-8 with BOM (EF BB BF)
  Utf8Bom,
  /// UTF-16 little-endian (FF FE)
  Utf16Le,
  /// UTF-16 big-endian (FE FF)
  Utf16Be,
  /// UTF-32 little-endian (FF FE 00 00) - detected, not decodable
  Utf32Le,
  /// UTF-32 big-endian (00 00 FE FF) - detected, not decodable
  Utf32Be,
  /// UTF-7 (2B 2F 76) - detected, not decodable
  Utf7,
}

impl TextEncoding {
  pub fn name(self) -> &'static str {
    match self {
      TextEncoding::Utf8 => "UTF-8",
      TextEncoding::Utf8Bom => "UTF-8 with BOM",
      TextEncoding::Utf16Le => "UTF-16LE",
      TextEncoding::Utf16Be => "UTF-16BE",
      TextEncoding::Utf32Le => "UTF-32LE",
      TextEncoding::Utf32Be => "UTF-32BE",
      TextEncoding::Utf7 => "UTF-7",
    }
  }
}

/// Sniff the encoding from the first bytes of a buffer
///
/// UTF-32LE must be tested before UTF-16LE: its BOM (FF FE 00 00) starts with
/// the UTF-16LE BOM (FF FE).
pub fn detect(bytes: &[u8]) -> TextEncoding {
  if bytes.starts_with(&[0xFF, 0xFE, 0x00, 0x00]) {
    TextEncoding::Utf32Le
  } else if bytes.starts_with(&[0x00, 0x00, 0xFE, 0xFF]) {
    TextEncoding::Utf32Be
  } else if bytes.starts_with(&[0xFF, 0xFE]) {
    TextEncoding::Utf16Le
  } else if bytes.starts_with(&[0xFE, 0xFF]) {
    TextEncoding::Utf16Be
  } else if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
    TextEncoding::Utf8Bom
  } else if bytes.starts_with(&[0x2B, 0x2F, 0x76]) {
    TextEncoding::Utf7
  } else {
    TextEncoding::Utf8
  }
}

/// Read a file, detect its encoding, and decode it to a String
pub fn read_file(path: &Path) -> ShiftResult<(String, TextEncoding)> {
  let bytes = fs::read(path)?;
  let encoding = detect(&bytes);
  let text = decode(&bytes, encoding, path)?;
  Ok((text, encoding))
}

/// Decode a buffer in the given encoding (BOM stripped from the result)
pub fn decode(bytes: &[u8], encoding: TextEncoding, path: &Path) -> ShiftResult<String> {
  match encoding {
    TextEncoding::Utf8 => from_utf8(bytes, path),
    TextEncoding::Utf8Bom => from_utf8(&bytes[3..], path),
    TextEncoding::Utf16Le => from_utf16(&bytes[2..], u16::from_le_bytes, path),
    TextEncoding::Utf16Be => from_utf16(&bytes[2..], u16::from_be_bytes, path),
    TextEncoding::Utf32Le | TextEncoding::Utf32Be | TextEncoding::Utf7 => {
      Err(
        TransformError::UnsupportedEncoding {
          path: path.to_path_buf(),
          encoding: encoding.name().to_string(),
        }
        .into(),
      )
    }
  }
}

/// Encode a string in the given encoding, BOM included where the encoding has one
///
/// Only callable for decodable encodings; the callers obtain `encoding` from
/// a successful `read_file` so the non-decodable variants cannot reach here.
pub fn encode(text: &str, encoding: TextEncoding) -> Vec<u8> {
  match encoding {
    TextEncoding::Utf8 => text.as_bytes().to_vec(),
    TextEncoding::Utf8Bom => {
      let mut out = vec![0xEF, 0xBB, 0xBF];
      out.extend_from_slice(text.as_bytes());
      out
    }
    TextEncoding::Utf16Le => {
      let mut out = vec![0xFF, 0xFE];
      for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
      }
      out
    }
    TextEncoding::Utf16Be => {
      let mut out = vec![0xFE, 0xFF];
      for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
      }
      out
    }
    // Unreachable in practice; fall back to UTF-8 rather than panic
    TextEncoding::Utf32Le | TextEncoding::Utf32Be | TextEncoding::Utf7 => text.as_bytes().to_vec(),
  }
}

/// Write a file in the given encoding
pub fn write_file(path: &Path, text: &str, encoding: TextEncoding) -> ShiftResult<()> {
  fs::write(path, encode(text, encoding))?;
  Ok(())
}

fn from_utf8(bytes: &[u8], path: &Path) -> ShiftResult<String> {
  String::from_utf8(bytes.to_vec()).map_err(|_| {
    TransformError::Parse {
      path: path.to_path_buf(),
      reason: "file is not valid UTF-8".to_string(),
    }
    .into()
  })
}

fn from_utf16(bytes: &[u8], make_unit: fn([u8; 2]) -> u16, path: &Path) -> ShiftResult<String> {
  if bytes.len() % 2 != 0 {
    return Err(
      TransformError::Parse {
        path: path.to_path_buf(),
        reason: "UTF-16 file has an odd byte length".to_string(),
      }
      .into(),
    );
  }
  let units: Vec<u16> = bytes.chunks_exact(2).map(|pair| make_unit([pair[0], pair[1]])).collect();
  String::from_utf16(&units).map_err(|_| {
    TransformError::Parse {
      path: path.to_path_buf(),
      reason: "file contains invalid UTF-16".to_string(),
    }
    .into()
  })
}
