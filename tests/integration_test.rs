//! End-to-end round trips through the public API: instrument file in,
//! canonical file out, canonical file back in.

use std::path::{Path, PathBuf};

use panspec::fits::{BinTable, FitsFile, Header, Value};
use panspec::reader::{self, ReadOptions};
use panspec::schema;
use panspec::writer;
use panspec::SpecTableBuilder;

fn hst_fixture(dir: &Path) -> PathBuf {
    let mut sci = BinTable::new(Some("SCI"));
    sci.push_f64_vec(
        "wavelength",
        5,
        vec![1301.0, 1302.0, 1303.0, 1304.0, 1305.0],
    )
    .unwrap();
    sci.push_f64_vec("flux", 5, vec![1.0e-14, 2.0e-14, 3.0e-14, 2.0e-14, 1.0e-14])
        .unwrap();
    sci.push_f64_vec("error", 5, vec![1.0e-15; 5]).unwrap();
    sci.push_i32_vec("dq", 5, vec![128, 0, 0, 0, 128]).unwrap();
    sci.header.set("EXPTIME", Value::Float(2400.0));
    sci.header.set("EXPSTART", Value::Float(56000.0));
    sci.header.set("EXPEND", Value::Float(56000.5));
    let path = dir.join("u_hst_cos_g130m_gj832_x1d.fits");
    FitsFile {
        primary: Header::new(),
        tables: vec![sci],
    }
    .write(&path, false)
    .unwrap();
    path
}

#[test]
fn instrument_file_to_canonical_file_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let input = hst_fixture(dir.path());

    let tables = reader::read(&input, &ReadOptions::default()).unwrap();
    assert_eq!(tables.len(), 1);
    let table = &tables[0];
    // The off-detector edges are gone and what is left validates.
    assert_eq!(table.flux, vec![2.0e-14, 3.0e-14, 2.0e-14]);
    table.validate().unwrap();

    let out = dir.path().join("w_hst_cos_g130m_gj832_panspec.fits");
    writer::write_fits(table, &out, false).unwrap();
    let back = reader::read(&out, &ReadOptions::default()).unwrap();
    assert_eq!(back.len(), 1);
    let back = &back[0];
    assert_eq!(back.w0, table.w0);
    assert_eq!(back.w1, table.w1);
    assert_eq!(back.flux, table.flux);
    assert_eq!(back.error, table.error);
    assert_eq!(back.exptime, table.exptime);
    assert_eq!(back.flags, table.flags);
    assert_eq!(back.instrument, table.instrument);
    assert_eq!(back.start, table.start);
    assert_eq!(back.end, table.end);
    assert_eq!(back.meta.name, table.meta.name);
    assert_eq!(back.meta.star, "gj832");
}

#[test]
fn canonical_files_are_self_describing() {
    let dir = tempfile::tempdir().unwrap();
    let table = SpecTableBuilder::new(
        vec![1000.0, 1001.0],
        vec![1001.0, 1002.0],
        vec![1.0e-14, 2.0e-14],
    )
    .instrument(panspec::instruments::code_of("hst_sts_e140m").unwrap())
    .star("gj832")
    .name("hst_sts_e140m_gj832")
    .build()
    .unwrap();
    let path = dir.path().join("w_hst_sts_e140m_gj832_panspec.fits");
    writer::write_fits(&table, &path, false).unwrap();

    // Any FITS reader can recover the legend and decode provenance bits.
    let file = FitsFile::open(&path).unwrap();
    let legend = file.table(schema::LEGEND_EXT).unwrap();
    let names = legend.str_column(schema::LEGEND_NAMES).unwrap();
    let codes = legend.int_column(schema::LEGEND_VALUES).unwrap();
    let spec = file.table(schema::SPECTRUM_EXT).unwrap();
    let instrument = spec.int_column(schema::INSTRUMENT).unwrap()[0];
    let position = codes.iter().position(|&c| c == instrument).unwrap();
    assert_eq!(names[position], "hst_sts_e140m");
}

#[test]
fn trimming_an_already_trimmed_table_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = hst_fixture(dir.path());
    let table = reader::read(&input, &ReadOptions::default())
        .unwrap()
        .remove(0);
    let again = table.trim_off_detector();
    assert_eq!(again, table);
}
