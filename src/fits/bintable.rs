//! Binary-table extension encode/decode.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use super::header::{parse_header, serialize_header, Card, Header, Value};
use super::{FitsError, BLOCK_SIZE};

/// Values of one column, flattened row-major for vector columns.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// TFORM `rD`.
    F64(Vec<f64>),
    /// TFORM `rE`.
    F32(Vec<f32>),
    /// TFORM `rJ`.
    I32(Vec<i32>),
    /// TFORM `rI`.
    I16(Vec<i16>),
    /// TFORM `wA`: fixed-width strings, one per row.
    Str(Vec<String>),
}

impl ColumnData {
    fn element_size(&self) -> usize {
        match self {
            ColumnData::F64(_) => 8,
            ColumnData::F32(_) => 4,
            ColumnData::I32(_) => 4,
            ColumnData::I16(_) => 2,
            ColumnData::Str(_) => 1,
        }
    }

    fn len(&self) -> usize {
        match self {
            ColumnData::F64(v) => v.len(),
            ColumnData::F32(v) => v.len(),
            ColumnData::I32(v) => v.len(),
            ColumnData::I16(v) => v.len(),
            ColumnData::Str(v) => v.len(),
        }
    }

    fn tform_code(&self) -> char {
        match self {
            ColumnData::F64(_) => 'D',
            ColumnData::F32(_) => 'E',
            ColumnData::I32(_) => 'J',
            ColumnData::I16(_) => 'I',
            ColumnData::Str(_) => 'A',
        }
    }
}

/// One named column with its repeat count (string width for `A`).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// TTYPE name.
    pub name: String,
    /// Repeat count (vector length per row; byte width for strings).
    pub repeat: usize,
    /// The values.
    pub data: ColumnData,
}

impl Column {
    fn byte_width(&self) -> usize {
        self.repeat * self.data.element_size()
    }

    fn tform(&self) -> String {
        format!("{}{}", self.repeat, self.data.tform_code())
    }
}

/// A binary-table HDU: name, user header cards, and columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinTable {
    /// EXTNAME, if any.
    pub name: Option<String>,
    /// Non-structural header cards (keywords, COMMENT lines).
    pub header: Header,
    columns: Vec<Column>,
    nrows: usize,
}

impl BinTable {
    /// An empty table with the given extension name.
    pub fn new(name: Option<&str>) -> Self {
        BinTable {
            name: name.map(str::to_string),
            ..BinTable::default()
        }
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn push_column(&mut self, column: Column) -> Result<(), FitsError> {
        let per_row = if matches!(column.data, ColumnData::Str(_)) {
            1
        } else {
            column.repeat
        };
        let rows = if per_row == 0 {
            0
        } else {
            column.data.len() / per_row
        };
        if rows * per_row != column.data.len() || (!self.columns.is_empty() && rows != self.nrows)
        {
            return Err(FitsError::BadColumnLength {
                column: column.name,
                got: column.data.len(),
                rows: self.nrows,
                repeat: column.repeat,
            });
        }
        if self.columns.is_empty() {
            self.nrows = rows;
        }
        self.columns.push(column);
        Ok(())
    }

    /// Append a scalar f64 column.
    pub fn push_f64(&mut self, name: &str, values: Vec<f64>) -> Result<(), FitsError> {
        self.push_column(Column {
            name: name.to_string(),
            repeat: 1,
            data: ColumnData::F64(values),
        })
    }

    /// Append a vector f64 column with `repeat` values per row, flattened.
    pub fn push_f64_vec(
        &mut self,
        name: &str,
        repeat: usize,
        values: Vec<f64>,
    ) -> Result<(), FitsError> {
        self.push_column(Column {
            name: name.to_string(),
            repeat,
            data: ColumnData::F64(values),
        })
    }

    /// Append a scalar i32 column.
    pub fn push_i32(&mut self, name: &str, values: Vec<i32>) -> Result<(), FitsError> {
        self.push_column(Column {
            name: name.to_string(),
            repeat: 1,
            data: ColumnData::I32(values),
        })
    }

    /// Append a vector i32 column with `repeat` values per row, flattened.
    pub fn push_i32_vec(
        &mut self,
        name: &str,
        repeat: usize,
        values: Vec<i32>,
    ) -> Result<(), FitsError> {
        self.push_column(Column {
            name: name.to_string(),
            repeat,
            data: ColumnData::I32(values),
        })
    }

    /// Append a scalar i16 column.
    pub fn push_i16(&mut self, name: &str, values: Vec<i16>) -> Result<(), FitsError> {
        self.push_column(Column {
            name: name.to_string(),
            repeat: 1,
            data: ColumnData::I16(values),
        })
    }

    /// Append a fixed-width string column. Values longer than `width` are an
    /// error rather than silently truncated.
    pub fn push_str(
        &mut self,
        name: &str,
        width: usize,
        values: Vec<String>,
    ) -> Result<(), FitsError> {
        if let Some(long) = values.iter().find(|v| v.len() > width) {
            return Err(FitsError::Malformed(format!(
                "string value {long:?} exceeds column width {width}"
            )));
        }
        self.push_column(Column {
            name: name.to_string(),
            repeat: width,
            data: ColumnData::Str(values),
        })
    }

    fn find(&self, name: &str) -> Result<&Column, FitsError> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| FitsError::ColumnNotFound(name.to_string()))
    }

    /// A scalar numeric column coerced to f64.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, FitsError> {
        let (repeat, values) = self.numeric_column_vec(name)?;
        if repeat != 1 {
            return Err(FitsError::TypeMismatch {
                column: name.to_string(),
                expected: "scalar numeric",
            });
        }
        Ok(values)
    }

    /// A numeric column coerced to f64, flattened, with its repeat count.
    pub fn numeric_column_vec(&self, name: &str) -> Result<(usize, Vec<f64>), FitsError> {
        let col = self.find(name)?;
        let values = match &col.data {
            ColumnData::F64(v) => v.clone(),
            ColumnData::F32(v) => v.iter().map(|&x| x as f64).collect(),
            ColumnData::I32(v) => v.iter().map(|&x| x as f64).collect(),
            ColumnData::I16(v) => v.iter().map(|&x| x as f64).collect(),
            ColumnData::Str(_) => {
                return Err(FitsError::TypeMismatch {
                    column: name.to_string(),
                    expected: "numeric",
                })
            }
        };
        Ok((col.repeat, values))
    }

    /// A scalar integer column coerced to i32.
    pub fn int_column(&self, name: &str) -> Result<Vec<i32>, FitsError> {
        let (repeat, values) = self.int_column_vec(name)?;
        if repeat != 1 {
            return Err(FitsError::TypeMismatch {
                column: name.to_string(),
                expected: "scalar integer",
            });
        }
        Ok(values)
    }

    /// An integer column coerced to i32, flattened, with its repeat count.
    pub fn int_column_vec(&self, name: &str) -> Result<(usize, Vec<i32>), FitsError> {
        let col = self.find(name)?;
        let values = match &col.data {
            ColumnData::I32(v) => v.clone(),
            ColumnData::I16(v) => v.iter().map(|&x| x as i32).collect(),
            _ => {
                return Err(FitsError::TypeMismatch {
                    column: name.to_string(),
                    expected: "integer",
                })
            }
        };
        Ok((col.repeat, values))
    }

    /// A string column, padding trimmed.
    pub fn str_column(&self, name: &str) -> Result<Vec<String>, FitsError> {
        let col = self.find(name)?;
        match &col.data {
            ColumnData::Str(v) => Ok(v.clone()),
            _ => Err(FitsError::TypeMismatch {
                column: name.to_string(),
                expected: "string",
            }),
        }
    }

    fn row_bytes(&self) -> usize {
        self.columns.iter().map(Column::byte_width).sum()
    }

    // ── Encoding ──

    /// Serialize this HDU (header blocks + padded data blocks).
    pub fn serialize(&self) -> Vec<u8> {
        let mut cards = vec![
            Card::new("XTENSION", Value::Str("BINTABLE".into())),
            Card::new("BITPIX", Value::Integer(8)),
            Card::new("NAXIS", Value::Integer(2)),
            Card::new("NAXIS1", Value::Integer(self.row_bytes() as i64)),
            Card::new("NAXIS2", Value::Integer(self.nrows as i64)),
            Card::new("PCOUNT", Value::Integer(0)),
            Card::new("GCOUNT", Value::Integer(1)),
            Card::new("TFIELDS", Value::Integer(self.columns.len() as i64)),
        ];
        for (i, col) in self.columns.iter().enumerate() {
            cards.push(Card::new(&format!("TTYPE{}", i + 1), Value::Str(col.name.clone())));
            cards.push(Card::new(&format!("TFORM{}", i + 1), Value::Str(col.tform())));
        }
        if let Some(name) = &self.name {
            cards.push(Card::new("EXTNAME", Value::Str(name.clone())));
        }
        cards.extend(self.header.cards().iter().cloned());

        let mut out = serialize_header(&cards);
        let data_start = out.len();
        for row in 0..self.nrows {
            for col in &self.columns {
                encode_cell(&mut out, col, row);
            }
        }
        // Data area pads to a whole block with zeros.
        let data_len = out.len() - data_start;
        out.resize(data_start + data_len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE, 0);
        out
    }

    // ── Decoding ──

    /// Parse one BINTABLE HDU from `data`, returning the table and the total
    /// bytes consumed. The caller has already checked XTENSION.
    pub fn parse(data: &[u8]) -> Result<(BinTable, usize), FitsError> {
        let (full_header, header_len) = parse_header(data)?;
        Self::from_header(full_header, &data[header_len..]).map(|(t, data_len)| {
            (t, header_len + data_len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE)
        })
    }

    fn from_header(full: Header, data: &[u8]) -> Result<(BinTable, usize), FitsError> {
        let nrows = full.get_i64("NAXIS2")? as usize;
        let naxis1 = full.get_i64("NAXIS1")? as usize;
        let nfields = full.get_i64("TFIELDS")? as usize;
        let name = full.get_str("EXTNAME").ok().map(str::to_string);

        let mut specs = Vec::with_capacity(nfields);
        for i in 1..=nfields {
            let ttype = full.get_str(&format!("TTYPE{i}"))?.to_string();
            let tform = full.get_str(&format!("TFORM{i}"))?.to_string();
            specs.push((ttype, parse_tform(&tform)?));
        }

        let row_bytes: usize = specs
            .iter()
            .map(|(_, (repeat, kind))| repeat * element_size(*kind))
            .sum();
        if row_bytes != naxis1 {
            return Err(FitsError::Malformed(format!(
                "NAXIS1 {naxis1} does not match column layout ({row_bytes} bytes)"
            )));
        }
        if data.len() < nrows * naxis1 {
            return Err(FitsError::UnexpectedEof);
        }

        let mut columns: Vec<Column> = specs
            .iter()
            .map(|(ttype, (repeat, kind))| Column {
                name: ttype.clone(),
                repeat: *repeat,
                data: empty_data(*kind, nrows * repeat_elems(*kind, *repeat)),
            })
            .collect();

        let mut offset = 0;
        for _ in 0..nrows {
            for col in columns.iter_mut() {
                let width = col.byte_width();
                decode_cell(&data[offset..offset + width], col)?;
                offset += width;
            }
        }

        // Keep only non-structural cards in the user-facing header.
        let mut header = Header::new();
        for card in full.cards() {
            if !is_structural(&card.keyword) {
                header.push(card.clone());
            }
        }

        Ok((
            BinTable {
                name,
                header,
                columns,
                nrows,
            },
            nrows * naxis1,
        ))
    }
}

fn is_structural(keyword: &str) -> bool {
    matches!(
        keyword,
        "XTENSION" | "BITPIX" | "NAXIS" | "NAXIS1" | "NAXIS2" | "PCOUNT" | "GCOUNT" | "TFIELDS"
            | "EXTNAME"
    ) || ((keyword.starts_with("TTYPE") || keyword.starts_with("TFORM"))
        && keyword[5..].chars().all(|c| c.is_ascii_digit())
        && !keyword[5..].is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    F64,
    F32,
    I32,
    I16,
    Str,
}

fn element_size(kind: Kind) -> usize {
    match kind {
        Kind::F64 => 8,
        Kind::F32 => 4,
        Kind::I32 => 4,
        Kind::I16 => 2,
        Kind::Str => 1,
    }
}

fn repeat_elems(kind: Kind, repeat: usize) -> usize {
    match kind {
        Kind::Str => 1,
        _ => repeat,
    }
}

fn empty_data(kind: Kind, capacity: usize) -> ColumnData {
    match kind {
        Kind::F64 => ColumnData::F64(Vec::with_capacity(capacity)),
        Kind::F32 => ColumnData::F32(Vec::with_capacity(capacity)),
        Kind::I32 => ColumnData::I32(Vec::with_capacity(capacity)),
        Kind::I16 => ColumnData::I16(Vec::with_capacity(capacity)),
        Kind::Str => ColumnData::Str(Vec::with_capacity(capacity)),
    }
}

fn parse_tform(tform: &str) -> Result<(usize, Kind), FitsError> {
    let tform = tform.trim();
    let split = tform
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| FitsError::UnsupportedTform(tform.to_string()))?;
    let repeat: usize = if split == 0 {
        1
    } else {
        tform[..split]
            .parse()
            .map_err(|_| FitsError::UnsupportedTform(tform.to_string()))?
    };
    let kind = match &tform[split..split + 1] {
        "D" => Kind::F64,
        "E" => Kind::F32,
        "J" => Kind::I32,
        "I" => Kind::I16,
        "A" => Kind::Str,
        _ => return Err(FitsError::UnsupportedTform(tform.to_string())),
    };
    Ok((repeat, kind))
}

fn encode_cell(out: &mut Vec<u8>, col: &Column, row: usize) {
    let r = col.repeat;
    match &col.data {
        ColumnData::F64(v) => {
            for &x in &v[row * r..(row + 1) * r] {
                let _ = out.write_f64::<BigEndian>(x);
            }
        }
        ColumnData::F32(v) => {
            for &x in &v[row * r..(row + 1) * r] {
                let _ = out.write_f32::<BigEndian>(x);
            }
        }
        ColumnData::I32(v) => {
            for &x in &v[row * r..(row + 1) * r] {
                let _ = out.write_i32::<BigEndian>(x);
            }
        }
        ColumnData::I16(v) => {
            for &x in &v[row * r..(row + 1) * r] {
                let _ = out.write_i16::<BigEndian>(x);
            }
        }
        ColumnData::Str(v) => {
            let mut bytes = v[row].as_bytes().to_vec();
            bytes.resize(r, b' ');
            out.extend_from_slice(&bytes);
        }
    }
}

fn decode_cell(mut bytes: &[u8], col: &mut Column) -> Result<(), FitsError> {
    let r = col.repeat;
    match &mut col.data {
        ColumnData::F64(v) => {
            for _ in 0..r {
                v.push(bytes.read_f64::<BigEndian>()?);
            }
        }
        ColumnData::F32(v) => {
            for _ in 0..r {
                v.push(bytes.read_f32::<BigEndian>()?);
            }
        }
        ColumnData::I32(v) => {
            for _ in 0..r {
                v.push(bytes.read_i32::<BigEndian>()?);
            }
        }
        ColumnData::I16(v) => {
            for _ in 0..r {
                v.push(bytes.read_i16::<BigEndian>()?);
            }
        }
        ColumnData::Str(v) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|_| FitsError::Malformed("non-ASCII string cell".into()))?;
            v.push(text.trim_end_matches([' ', '\0']).to_string());
        }
    }
    Ok(())
}
