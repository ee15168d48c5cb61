//! Minimal ZIP reading for OPC containers.
//!
//! Office documents are ZIP archives with XML parts inside. This reader
//! covers exactly what those containers use in practice: an end-of-central-
//! directory record, central directory entries, and stored or Flate
//! compressed data. ZIP64 and encrypted archives are rejected.

use flate2::read::DeflateDecoder;
use std::io::Read;

use crate::detect::is_zip_bytes;
use crate::error::{Error, Result};

const EOCD_MAGIC: &[u8] = b"PK\x05\x06";
const CENTRAL_MAGIC: &[u8] = b"PK\x01\x02";
const LOCAL_MAGIC: &[u8] = b"PK\x03\x04";

/// EOCD record length plus the maximum trailing comment.
const MAX_EOCD_SCAN: usize = 22 + 65535;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;

/// A central directory entry.
#[derive(Debug)]
struct EntryRecord {
    name: String,
    method: u16,
    compressed_size: usize,
    uncompressed_size: usize,
    local_offset: usize,
}

/// Read-only view over a ZIP archive held in memory.
#[derive(Debug)]
pub struct OpcArchive<'a> {
    data: &'a [u8],
    entries: Vec<EntryRecord>,
}

impl<'a> OpcArchive<'a> {
    /// Open an archive over the given bytes.
    ///
    /// Parses the central directory eagerly; entry data is read on demand.
    pub fn open(data: &'a [u8]) -> Result<Self> {
        if !is_zip_bytes(data) {
            return Err(decode_error("not a ZIP archive"));
        }

        let eocd = find_eocd(data).ok_or_else(|| decode_error("missing end of central directory"))?;
        let entry_count = read_u16(data, eocd + 10)? as usize;
        let cd_offset = read_u32(data, eocd + 16)? as usize;
        if cd_offset == 0xFFFF_FFFF {
            return Err(decode_error("ZIP64 archives are not supported"));
        }

        let mut entries = Vec::with_capacity(entry_count);
        let mut pos = cd_offset;
        for _ in 0..entry_count {
            if !data.get(pos..).map_or(false, |d| d.starts_with(CENTRAL_MAGIC)) {
                return Err(decode_error("malformed central directory"));
            }
            let flags = read_u16(data, pos + 8)?;
            if flags & 0x0001 != 0 {
                return Err(decode_error("encrypted ZIP entries are not supported"));
            }
            let method = read_u16(data, pos + 10)?;
            let compressed_size = read_u32(data, pos + 20)? as usize;
            let uncompressed_size = read_u32(data, pos + 24)? as usize;
            let name_len = read_u16(data, pos + 28)? as usize;
            let extra_len = read_u16(data, pos + 30)? as usize;
            let comment_len = read_u16(data, pos + 32)? as usize;
            let local_offset = read_u32(data, pos + 42)? as usize;

            let name_bytes = data
                .get(pos + 46..pos + 46 + name_len)
                .ok_or_else(|| decode_error("truncated central directory"))?;
            entries.push(EntryRecord {
                name: String::from_utf8_lossy(name_bytes).into_owned(),
                method,
                compressed_size,
                uncompressed_size,
                local_offset,
            });
            pos += 46 + name_len + extra_len + comment_len;
        }

        log::debug!("opened OPC container with {} entries", entries.len());
        Ok(Self { data, entries })
    }

    /// Names of all entries, in central directory order.
    pub fn entry_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Check whether an entry exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Read and decompress one entry.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| decode_error(&format!("missing entry {}", name)))?;

        // The local header repeats name/extra lengths and they can differ
        // from the central directory's, so the data offset comes from here.
        let lo = entry.local_offset;
        if !self.data.get(lo..).map_or(false, |d| d.starts_with(LOCAL_MAGIC)) {
            return Err(decode_error("malformed local file header"));
        }
        let name_len = read_u16(self.data, lo + 26)? as usize;
        let extra_len = read_u16(self.data, lo + 28)? as usize;
        let start = lo + 30 + name_len + extra_len;
        let compressed = self
            .data
            .get(start..start + entry.compressed_size)
            .ok_or_else(|| decode_error("truncated entry data"))?;

        match entry.method {
            METHOD_STORED => Ok(compressed.to_vec()),
            METHOD_DEFLATE => {
                let mut out = Vec::with_capacity(entry.uncompressed_size);
                DeflateDecoder::new(compressed)
                    .read_to_end(&mut out)
                    .map_err(|e| decode_error(&format!("inflate failed for {}: {}", name, e)))?;
                Ok(out)
            }
            method => Err(decode_error(&format!(
                "unsupported compression method {} for {}",
                method, name
            ))),
        }
    }

    /// Read one entry as UTF-8 text.
    pub fn read_string(&self, name: &str) -> Result<String> {
        let bytes = self.read(name)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn decode_error(reason: &str) -> Error {
    Error::Decode {
        adapter: "opc".to_string(),
        reason: reason.to_string(),
    }
}

/// Locate the end-of-central-directory record.
///
/// The magic bytes can also occur inside a trailing archive comment; a
/// candidate only counts when its comment length runs exactly to the
/// end of the file.
fn find_eocd(data: &[u8]) -> Option<usize> {
    let scan_start = data.len().saturating_sub(MAX_EOCD_SCAN);
    let last = data.len().checked_sub(22)?;
    (scan_start..=last).rev().find(|&pos| {
        if !data[pos..].starts_with(EOCD_MAGIC) {
            return false;
        }
        let comment_len = u16::from_le_bytes([data[pos + 20], data[pos + 21]]) as usize;
        pos + 22 + comment_len == data.len()
    })
}

fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or_else(|| decode_error("unexpected end of archive"))
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| decode_error("unexpected end of archive"))
}

/// Build a stored (uncompressed) ZIP archive, for fixtures.
#[cfg(test)]
pub(crate) fn stored_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    stored_zip_with_comment(entries, b"")
}

/// Build a stored archive carrying a trailing comment.
#[cfg(test)]
pub(crate) fn stored_zip_with_comment(entries: &[(&str, &[u8])], comment: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();

    for (name, data) in entries {
        let offset = out.len() as u32;

        out.extend_from_slice(LOCAL_MAGIC);
        out.extend_from_slice(&[20, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(data);

        central.extend_from_slice(CENTRAL_MAGIC);
        central.extend_from_slice(&[20, 0, 20, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        central.extend_from_slice(&0u32.to_le_bytes());
        central.extend_from_slice(&(data.len() as u32).to_le_bytes());
        central.extend_from_slice(&(data.len() as u32).to_le_bytes());
        central.extend_from_slice(&(name.len() as u16).to_le_bytes());
        central.extend_from_slice(&[0u8; 12]);
        central.extend_from_slice(&offset.to_le_bytes());
        central.extend_from_slice(name.as_bytes());
    }

    let cd_offset = out.len() as u32;
    let cd_size = central.len() as u32;
    let count = entries.len() as u16;

    out.extend_from_slice(&central);
    out.extend_from_slice(EOCD_MAGIC);
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&cd_size.to_le_bytes());
    out.extend_from_slice(&cd_offset.to_le_bytes());
    out.extend_from_slice(&(comment.len() as u16).to_le_bytes());
    out.extend_from_slice(comment);
    out
}
