//! Per-star settings: rejection lists for spectra known to be bad.
//!
//! Settings live in one JSON file per star, `<dir>/<star>.json`. A missing
//! file is not an error; it simply means nothing is rejected for that star.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One rejection rule: when a filename contains `config`, the table at
/// `index` in that file's read result is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectRule {
    /// Instrument-configuration substring matched against the filename.
    pub config: String,
    /// Index into the list of tables produced by reading the file.
    pub index: usize,
}

/// Settings for a single star.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarSettings {
    /// Rejection rules applied by the read dispatcher.
    #[serde(default)]
    pub reject_specs: Vec<RejectRule>,
}

/// Load settings for a star from `dir`, returning defaults when the file is
/// absent. A present-but-unparsable file is an error.
pub fn load(dir: &Path, star: &str) -> Result<StarSettings, std::io::Error> {
    let path = dir.join(format!("{star}.json"));
    if !path.is_file() {
        log::debug!("no settings file for {star}, skipping rejection");
        return Ok(StarSettings::default());
    }
    let reader = BufReader::new(File::open(&path)?);
    serde_json::from_reader(reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = load(dir.path(), "gj832").unwrap();
        assert!(s.reject_specs.is_empty());
    }

    #[test]
    fn parses_reject_rules() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join("gj832.json")).unwrap();
        write!(
            f,
            r#"{{"reject_specs": [{{"config": "cos_g230l", "index": 1}}]}}"#
        )
        .unwrap();
        let s = load(dir.path(), "gj832").unwrap();
        assert_eq!(
            s.reject_specs,
            vec![RejectRule {
                config: "cos_g230l".into(),
                index: 1
            }]
        );
    }

    #[test]
    fn garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), b"not json").unwrap();
        assert!(load(dir.path(), "bad").is_err());
    }
}
