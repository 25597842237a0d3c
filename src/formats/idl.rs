//! Reader for IDL save files carrying model spectra.
//!
//! Implements just enough of the IDL save format to pull named float
//! arrays out of an uncompressed file: the `SR` signature, the record
//! chain (VARIABLE, TIMESTAMP, VERSION, END), and 32/64-bit float array
//! payloads. Everything is big-endian with 32-bit alignment.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};

use crate::binmath::{self, EdgeMode};
use crate::instruments;
use crate::naming;
use crate::reader::ReadError;
use crate::spectbl::{SpecTable, SpecTableBuilder};

use super::basename;

const REC_VARIABLE: u32 = 2;
const REC_END: u32 = 6;

const TYPE_F32: u32 = 4;
const TYPE_F64: u32 = 5;

/// Array flag bit in an IDL variable descriptor.
const FLAG_ARRAY: u32 = 4;

/// nm to Angstrom, for solar-model files stored in SI units.
const WAVE_SCALE: f64 = 10.0;

/// W m-2 nm-1 to erg s-1 cm-2 A-1.
const FLUX_SCALE: f64 = 100.0;

/// Read a model spectrum from an IDL save file as a single table.
///
/// Two layouts are known: Lyman-alpha reconstructions store midpoints
/// and flux under `w140`/`lya_mod` in canonical units; solar files store
/// `wave`/`flux` in SI units.
pub fn read(path: &Path) -> Result<Vec<SpecTable>, ReadError> {
    let vars = read_sav(path)?;
    let base = basename(path).to_ascii_lowercase();
    let (wmid, flux) = if base.contains("mod_lya") {
        (variable(path, &vars, "w140")?, variable(path, &vars, "lya_mod")?)
    } else if base.contains("sun") {
        let w = variable(path, &vars, "wave")?;
        let f = variable(path, &vars, "flux")?;
        (
            w.iter().map(|x| x * WAVE_SCALE).collect(),
            f.iter().map(|x| x * FLUX_SCALE).collect(),
        )
    } else {
        return Err(ReadError::UnsupportedFormat {
            file: basename(path),
        });
    };

    let edges = binmath::mids2edges(&wmid, EdgeMode::Left).ok_or_else(|| ReadError::Parse {
        file: basename(path),
        detail: "fewer than two samples".into(),
    })?;
    let n = wmid.len();
    let table = SpecTableBuilder::new(edges[..n].to_vec(), edges[1..].to_vec(), flux)
        .instrument(instruments::code_for_token(&naming::instrument_token(
            path,
        )?))
        .star(naming::parse_star(path)?)
        .name(naming::parse_name(path)?)
        .filename(path.display().to_string())
        .build()?;
    Ok(vec![table])
}

fn variable(
    path: &Path,
    vars: &HashMap<String, Vec<f64>>,
    name: &str,
) -> Result<Vec<f64>, ReadError> {
    vars.get(name)
        .cloned()
        .ok_or_else(|| ReadError::MissingCompanion {
            file: basename(path),
            detail: format!("save file lacks variable {name:?}"),
        })
}

/// Extract every float array variable, keyed by lowercased name.
pub fn read_sav(path: &Path) -> Result<HashMap<String, Vec<f64>>, ReadError> {
    let data = fs::read(path)?;
    let mut cursor = Cursor {
        data: &data,
        pos: 0,
        path,
    };

    if cursor.take(4)? != b"SR\x00\x04" {
        return Err(cursor.parse_err("not an IDL save file"));
    }

    let mut vars = HashMap::new();
    loop {
        let rec_start = cursor.pos;
        let rectype = cursor.read_u32()?;
        let next_low = cursor.read_u32()? as u64;
        let next_high = cursor.read_u32()? as u64;
        let nextrec = (next_low + (next_high << 32)) as usize;
        cursor.skip(4)?;
        match rectype {
            REC_END => break,
            REC_VARIABLE => {
                if let Some((name, values)) = cursor.read_variable()? {
                    vars.insert(name, values);
                }
            }
            // TIMESTAMP, VERSION, and anything else are skipped whole.
            _ => {}
        }
        if nextrec <= rec_start || nextrec > data.len() {
            return Err(cursor.parse_err("record chain runs out of bounds"));
        }
        cursor.pos = nextrec;
    }
    Ok(vars)
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    path: &'a Path,
}

impl Cursor<'_> {
    fn parse_err(&self, detail: &str) -> ReadError {
        ReadError::Parse {
            file: basename(self.path),
            detail: detail.to_string(),
        }
    }

    fn take(&mut self, n: usize) -> Result<&[u8], ReadError> {
        if self.pos + n > self.data.len() {
            return Err(ReadError::Parse {
                file: basename(self.path),
                detail: "truncated save file".into(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn skip(&mut self, n: usize) -> Result<(), ReadError> {
        self.take(n).map(|_| ())
    }

    fn read_u32(&mut self) -> Result<u32, ReadError> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    /// Length-prefixed string, padded to 32-bit alignment.
    fn read_string(&mut self) -> Result<String, ReadError> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?.to_vec();
        self.align();
        String::from_utf8(bytes).map_err(|_| self.parse_err("non-UTF-8 variable name"))
    }

    fn align(&mut self) {
        self.pos = self.pos.div_ceil(4) * 4;
    }

    /// A VARIABLE record body. Non-array and non-float variables come back
    /// as `None`; the record chain skips past whatever is left unread.
    fn read_variable(&mut self) -> Result<Option<(String, Vec<f64>)>, ReadError> {
        let name = self.read_string()?.to_ascii_lowercase();
        let typecode = self.read_u32()?;
        let varflags = self.read_u32()?;
        if varflags & FLAG_ARRAY == 0 || !matches!(typecode, TYPE_F32 | TYPE_F64) {
            return Ok(None);
        }

        // Array descriptor.
        let arrstart = self.read_u32()?;
        if arrstart != 8 {
            return Err(self.parse_err("unsupported array descriptor"));
        }
        self.skip(4)?;
        let _nbytes = self.read_u32()?;
        let nelements = self.read_u32()? as usize;
        let _ndims = self.read_u32()?;
        self.skip(8)?;
        let nmax = self.read_u32()? as usize;
        self.skip(4 * nmax)?;

        // Data marker, then the raw elements.
        let varstart = self.read_u32()?;
        if varstart != 7 {
            return Err(self.parse_err("variable data marker missing"));
        }
        let values = match typecode {
            TYPE_F32 => {
                let raw = self.take(4 * nelements)?;
                raw.chunks_exact(4)
                    .map(|c| BigEndian::read_f32(c) as f64)
                    .collect()
            }
            TYPE_F64 => {
                let raw = self.take(8 * nelements)?;
                raw.chunks_exact(8).map(BigEndian::read_f64).collect()
            }
            _ => unreachable!(),
        };
        Ok(Some((name, values)))
    }
}
