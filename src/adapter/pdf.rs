//! PDF adapter.
//!
//! Text-first recovery without a full PDF object model: content streams
//! are located by scanning for `stream`/`endstream` pairs, inflated when
//! Flate-compressed, and the show operators inside `BT`..`ET` blocks are
//! collected into lines. Fonts, CMaps and xref tables are not consulted,
//! which is enough for the text-based documents this crate targets;
//! subsetted-font PDFs may come back with little or no text, surfaced as
//! a warning rather than an error.

use chrono::{DateTime, Utc};
use flate2::read::ZlibDecoder;
use std::io::Read;

use super::{Decoded, FormatAdapter};
use crate::detect::is_pdf_bytes;
use crate::error::{Error, Result};
use crate::model::{DocumentFormat, Metadata};

/// Kerning adjustments past this point count as a word space.
const KERN_SPACE_THRESHOLD: f32 = -100.0;

/// Adapter for PDF files.
pub struct PdfAdapter;

impl PdfAdapter {
    /// Create a new PDF adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FormatAdapter for PdfAdapter {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn decode(&self, bytes: &[u8], file_name: &str) -> Result<Decoded> {
        if !is_pdf_bytes(bytes) {
            return Err(Error::Decode {
                adapter: "pdf".to_string(),
                reason: "missing %PDF header".to_string(),
            });
        }
        if is_encrypted(bytes) {
            return Err(Error::Encrypted);
        }

        let mut blocks: Vec<String> = Vec::new();
        for stream in extract_streams(bytes) {
            let text = extract_text(&stream);
            if !text.trim().is_empty() {
                blocks.push(text);
            }
        }
        let raw_text = blocks.join("\n");

        let mut warnings = Vec::new();
        if raw_text.trim().is_empty() {
            log::warn!("{}: no text content could be extracted", file_name);
            warnings.push("No text content could be extracted".to_string());
        }

        let mut decoded = Decoded::new(DocumentFormat::Pdf, raw_text).with_warnings(warnings);
        if let Some(metadata) = parse_info(bytes) {
            decoded = decoded.with_metadata(metadata);
        }
        Ok(decoded)
    }
}

impl Default for PdfAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check for the encryption entry in the document trailer.
///
/// Only the trailer dictionary declares encryption; shown text or an
/// Info string may mention the key name, so the scan starts at the last
/// `trailer` keyword. Documents without one (cross-reference streams)
/// fall through to extraction, which surfaces the no-text warning.
fn is_encrypted(bytes: &[u8]) -> bool {
    match find_last_subseq(bytes, b"trailer") {
        Some(at) => find_subseq(bytes, b"/Encrypt", at).is_some(),
        None => false,
    }
}

/// Collect the decoded bytes of every stream object.
///
/// The dictionary window before each `stream` keyword decides the
/// handling: Flate-compressed streams are inflated, unfiltered streams
/// are taken as-is, anything else (images, exotic filters) is skipped.
fn extract_streams(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut streams = Vec::new();
    let mut window_start = 0;
    let mut pos = 0;

    while let Some(key) = find_subseq(bytes, b"stream", pos) {
        // "endstream" contains "stream"; skip those hits.
        if key >= 3 && &bytes[key - 3..key] == b"end" {
            pos = key + 6;
            continue;
        }

        let mut data_start = key + 6;
        if bytes.get(data_start) == Some(&b'\r') {
            data_start += 1;
        }
        if bytes.get(data_start) == Some(&b'\n') {
            data_start += 1;
        }

        let Some(end) = find_subseq(bytes, b"endstream", data_start) else {
            break;
        };
        let mut data_end = end;
        while data_end > data_start && matches!(bytes[data_end - 1], b'\r' | b'\n') {
            data_end -= 1;
        }

        let dict_window = &bytes[window_start..key];
        let data = &bytes[data_start..data_end];
        if find_subseq(dict_window, b"/FlateDecode", 0).is_some() {
            let mut inflated = Vec::new();
            match ZlibDecoder::new(data).read_to_end(&mut inflated) {
                Ok(_) => streams.push(inflated),
                Err(e) => log::debug!("skipping stream that failed to inflate: {}", e),
            }
        } else if find_subseq(dict_window, b"/Filter", 0).is_some() {
            log::debug!("skipping stream with unsupported filter");
        } else {
            streams.push(data.to_vec());
        }

        pos = end + 9;
        window_start = pos;
    }
    streams
}

/// Walk a content stream and collect shown text, one line per advance.
fn extract_text(content: &[u8]) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut pending: Option<String> = None;
    let mut array: Option<Vec<String>> = None;
    let mut nums: Vec<f32> = Vec::new();
    let mut last_ty: Option<f32> = None;
    let mut in_text = false;
    let mut i = 0;

    let flush = |line: &mut String, lines: &mut Vec<String>| {
        if !line.is_empty() {
            lines.push(std::mem::take(line));
        }
    };

    while i < content.len() {
        let b = content[i];
        match b {
            b'(' => {
                let (string, next) = parse_literal(content, i);
                let text = decode_text_simple(&string);
                match array.as_mut() {
                    Some(items) if in_text => items.push(text),
                    _ => pending = Some(text),
                }
                i = next;
            }
            b'<' if content.get(i + 1) == Some(&b'<') => {
                i += 2;
            }
            b'<' => {
                let (string, next) = parse_hex(content, i);
                let text = decode_text_simple(&string);
                match array.as_mut() {
                    Some(items) if in_text => items.push(text),
                    _ => pending = Some(text),
                }
                i = next;
            }
            b'[' => {
                array = Some(Vec::new());
                i += 1;
            }
            b']' => {
                i += 1;
            }
            b'%' => {
                while i < content.len() && content[i] != b'\n' {
                    i += 1;
                }
            }
            b'\'' | b'"' => {
                if in_text {
                    flush(&mut line, &mut lines);
                    if let Some(text) = pending.take() {
                        line.push_str(&text);
                    }
                }
                i += 1;
            }
            b'0'..=b'9' | b'+' | b'-' | b'.' => {
                let start = i;
                i += 1;
                while i < content.len() && matches!(content[i], b'0'..=b'9' | b'.' | b'+' | b'-') {
                    i += 1;
                }
                if let Ok(n) = std::str::from_utf8(&content[start..i])
                    .unwrap_or("")
                    .parse::<f32>()
                {
                    match array.as_mut() {
                        Some(items) => {
                            if n < KERN_SPACE_THRESHOLD {
                                items.push(" ".to_string());
                            }
                        }
                        None => nums.push(n),
                    }
                }
            }
            b'/' => {
                i += 1;
                while i < content.len() && is_regular(content[i]) {
                    i += 1;
                }
            }
            _ if b.is_ascii_alphabetic() || b == b'*' => {
                let start = i;
                i += 1;
                while i < content.len() && is_regular(content[i]) {
                    i += 1;
                }
                match &content[start..i] {
                    b"BT" => {
                        in_text = true;
                        nums.clear();
                    }
                    b"ET" => {
                        in_text = false;
                        flush(&mut line, &mut lines);
                    }
                    b"Tj" => {
                        if in_text {
                            if let Some(text) = pending.take() {
                                line.push_str(&text);
                            }
                        }
                    }
                    b"TJ" => {
                        if in_text {
                            if let Some(items) = array.take() {
                                line.push_str(&items.concat());
                            }
                        }
                        array = None;
                    }
                    b"Td" | b"TD" => {
                        if in_text && nums.len() >= 2 && nums[nums.len() - 1] != 0.0 {
                            flush(&mut line, &mut lines);
                            last_ty = None;
                        }
                    }
                    b"T*" => {
                        if in_text {
                            flush(&mut line, &mut lines);
                        }
                    }
                    b"Tm" => {
                        if in_text && nums.len() >= 6 {
                            let ty = nums[nums.len() - 1];
                            if last_ty.map_or(false, |prev| (prev - ty).abs() > 0.1) {
                                flush(&mut line, &mut lines);
                            }
                            last_ty = Some(ty);
                        }
                    }
                    _ => {}
                }
                nums.clear();
            }
            _ => {
                i += 1;
            }
        }
    }
    flush(&mut line, &mut lines);
    lines.join("\n")
}

/// Parse a literal string starting at `(`, handling escapes and nesting.
fn parse_literal(bytes: &[u8], start: usize) -> (Vec<u8>, usize) {
    let mut out = Vec::new();
    let mut depth = 1;
    let mut i = start + 1;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => {
                i += 1;
                match bytes[i] {
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0C),
                    b'0'..=b'7' => {
                        let mut value = 0u16;
                        let mut digits = 0;
                        while digits < 3 && i < bytes.len() && bytes[i].is_ascii_digit() && bytes[i] < b'8'
                        {
                            value = value * 8 + u16::from(bytes[i] - b'0');
                            i += 1;
                            digits += 1;
                        }
                        out.push(value as u8);
                        continue;
                    }
                    b'\r' => {
                        if bytes.get(i + 1) == Some(&b'\n') {
                            i += 1;
                        }
                    }
                    b'\n' => {}
                    other => out.push(other),
                }
                i += 1;
            }
            b'(' => {
                depth += 1;
                out.push(b'(');
                i += 1;
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return (out, i + 1);
                }
                out.push(b')');
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    (out, i)
}

/// Parse a hex string starting at `<`.
fn parse_hex(bytes: &[u8], start: usize) -> (Vec<u8>, usize) {
    let mut digits = Vec::new();
    let mut i = start + 1;
    while i < bytes.len() && bytes[i] != b'>' {
        if bytes[i].is_ascii_hexdigit() {
            digits.push(bytes[i]);
        }
        i += 1;
    }
    if digits.len() % 2 == 1 {
        digits.push(b'0');
    }
    let out = digits
        .chunks(2)
        .filter_map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some((hi * 16 + lo) as u8)
        })
        .collect();
    (out, (i + 1).min(bytes.len()))
}

fn is_regular(b: u8) -> bool {
    !matches!(
        b,
        b'\0' | b'\t' | b'\n' | b'\x0C' | b'\r' | b' ' | b'(' | b')' | b'<' | b'>' | b'[' | b']'
            | b'{' | b'}' | b'/' | b'%'
    )
}

/// Decode a text byte sequence without font information.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Read the Info dictionary, if the document advertises one.
fn parse_info(bytes: &[u8]) -> Option<Metadata> {
    // Incremental updates append trailers, the last /Info wins.
    let info_at = find_last_subseq(bytes, b"/Info")?;
    let after = &bytes[info_at + 5..];
    let text = String::from_utf8_lossy(&after[..after.len().min(64)]);
    let mut parts = text.split_whitespace();
    let number: u32 = parts.next()?.parse().ok()?;
    let generation: u32 = parts.next()?.parse().ok()?;

    let needle = format!("{} {} obj", number, generation);
    let obj_start = find_subseq(bytes, needle.as_bytes(), 0)?;
    let obj_end = find_subseq(bytes, b"endobj", obj_start).unwrap_or(bytes.len());
    let object = &bytes[obj_start..obj_end];

    let metadata = Metadata {
        title: dict_string(object, b"/Title"),
        author: dict_string(object, b"/Author"),
        created: dict_string(object, b"/CreationDate").and_then(|d| parse_pdf_date(&d)),
        modified: dict_string(object, b"/ModDate").and_then(|d| parse_pdf_date(&d)),
    };
    if metadata.is_empty() {
        None
    } else {
        Some(metadata)
    }
}

/// Extract a string value following `key` in a dictionary slice.
fn dict_string(object: &[u8], key: &[u8]) -> Option<String> {
    let at = find_subseq(object, key, 0)?;
    let mut i = at + key.len();
    while i < object.len() && object[i].is_ascii_whitespace() {
        i += 1;
    }
    let (raw, _) = match object.get(i)? {
        b'(' => parse_literal(object, i),
        b'<' => parse_hex(object, i),
        _ => return None,
    };
    let value = decode_text_simple(&raw).trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.strip_prefix("D:")?;

    // At minimum we need YYYY
    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6).and_then(|m| m.parse().ok()).unwrap_or(1);
    let day: u32 = s.get(6..8).and_then(|d| d.parse().ok()).unwrap_or(1);
    let hour: u32 = s.get(8..10).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = s.get(10..12).and_then(|m| m.parse().ok()).unwrap_or(0);
    let second: u32 = s.get(12..14).and_then(|s| s.parse().ok()).unwrap_or(0);

    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
}

fn find_subseq(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|at| at + from)
}

fn find_last_subseq(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    let mut last = None;
    let mut from = 0;
    while let Some(at) = find_subseq(haystack, needle, from) {
        last = Some(at);
        from = at + 1;
    }
    last
}
