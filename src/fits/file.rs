//! Whole-file assembly: primary HDU plus binary-table extensions.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use super::header::{parse_header, serialize_header, Card, Header, Value};
use super::{BinTable, FitsError, BLOCK_SIZE};

/// An in-memory FITS file: one (data-less) primary HDU and any number of
/// binary-table extensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitsFile {
    /// Primary header cards beyond the mandatory ones.
    pub primary: Header,
    /// Binary-table extensions, in file order.
    pub tables: Vec<BinTable>,
}

impl FitsFile {
    /// An empty file skeleton.
    pub fn new() -> Self {
        FitsFile::default()
    }

    /// The first table with the given EXTNAME (case-insensitive).
    pub fn table(&self, name: &str) -> Result<&BinTable, FitsError> {
        self.tables
            .iter()
            .find(|t| {
                t.name
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| FitsError::HduNotFound(name.to_string()))
    }

    /// Like [`FitsFile::table`] but `None` when absent.
    pub fn table_opt(&self, name: &str) -> Option<&BinTable> {
        self.table(name).ok()
    }

    /// Read and parse a FITS file.
    pub fn open(path: &Path) -> Result<FitsFile, FitsError> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// Parse a FITS byte stream.
    pub fn parse(data: &[u8]) -> Result<FitsFile, FitsError> {
        let (primary_full, mut offset) = parse_header(data)?;
        match primary_full.get("SIMPLE") {
            Some(Value::Logical(true)) => {}
            _ => return Err(FitsError::Malformed("primary HDU lacks SIMPLE = T".into())),
        }
        offset += primary_data_len(&primary_full)?;

        let mut primary = Header::new();
        for card in primary_full.cards() {
            if !matches!(card.keyword.as_str(), "SIMPLE" | "BITPIX" | "EXTEND")
                && !card.keyword.starts_with("NAXIS")
            {
                primary.push(card.clone());
            }
        }

        let mut tables = Vec::new();
        while offset + BLOCK_SIZE <= data.len() {
            // Trailing padding blocks are all zero or all blank; stop there.
            if data[offset..offset + BLOCK_SIZE]
                .iter()
                .all(|&b| b == 0 || b == b' ')
            {
                break;
            }
            let (ext_header, _) = parse_header(&data[offset..])?;
            let xtension = ext_header.get_str("XTENSION")?.to_string();
            if xtension != "BINTABLE" {
                return Err(FitsError::UnsupportedExtension(xtension));
            }
            let (table, consumed) = BinTable::parse(&data[offset..])?;
            tables.push(table);
            offset += consumed;
        }

        Ok(FitsFile { primary, tables })
    }

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut cards = vec![
            Card::new("SIMPLE", Value::Logical(true)),
            Card::new("BITPIX", Value::Integer(8)),
            Card::new("NAXIS", Value::Integer(0)),
            Card::new("EXTEND", Value::Logical(true)),
        ];
        cards.extend(self.primary.cards().iter().cloned());
        let mut out = serialize_header(&cards);
        for table in &self.tables {
            out.extend_from_slice(&table.serialize());
        }
        out
    }

    /// Write to `path`, refusing to clobber unless `overwrite` is set. The
    /// file is flushed and synced before returning.
    pub fn write(&self, path: &Path, overwrite: bool) -> Result<(), FitsError> {
        if path.exists() && !overwrite {
            return Err(FitsError::AlreadyExists(path.to_path_buf()));
        }
        let mut file = File::create(path)?;
        file.write_all(&self.to_bytes())?;
        file.flush()?;
        file.sync_all()?;
        Ok(())
    }
}

/// Byte length of the primary data area (zero for the headers we write, but
/// instrument files may carry a primary image to skip over).
fn primary_data_len(header: &Header) -> Result<usize, FitsError> {
    let naxis = header.get_i64("NAXIS")? as usize;
    if naxis == 0 {
        return Ok(0);
    }
    let bitpix = header.get_i64("BITPIX")?.unsigned_abs() as usize;
    let mut elems = 1usize;
    for i in 1..=naxis {
        elems *= header.get_i64(&format!("NAXIS{i}"))? as usize;
    }
    let bytes = elems * bitpix / 8;
    Ok(bytes.div_ceil(BLOCK_SIZE) * BLOCK_SIZE)
}
