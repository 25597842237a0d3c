use std::path::{Path, PathBuf};

use super::*;
use crate::fits::{BinTable, FitsFile, Header, Value};
use crate::instruments;
use crate::schema::columns::DQ_OFF_DETECTOR;

fn p(s: &str) -> PathBuf {
    PathBuf::from(s)
}

// ── Dispatch ──

#[test]
fn resolve_follows_the_dispatch_table() {
    let cases = [
        ("w_hst_cos_g130m_gj832_coadd.fits", FileFormat::StdFits),
        ("w_hst_sts_e140m_gj832_custom.fits", FileFormat::StdFits),
        ("w_mod_lya_young_gj832.fits", FileFormat::StdFits),
        ("w_hst_cos_g130m_gj832_panspec.fits", FileFormat::StdFits),
        ("u_hst_cos_g130m_gj832_x1d.fits", FileFormat::HstFits),
        ("u_hst_sts_e140m_gj832_sx1.fits", FileFormat::HstFits),
        ("u_xmm_pn-_-----_epseri.fits", FileFormat::XmmFits),
        ("u_mod_euv_young_gj832.txt", FileFormat::Text),
        ("u_tmd_sol_-----_sun.csv", FileFormat::Csv),
        ("u_src_sol_-----_sun.csv", FileFormat::Csv),
        ("u_mod_lya_young_gj832.sav", FileFormat::IdlSav),
        ("u_mod_phx_-----_sun.idlsav", FileFormat::IdlSav),
    ];
    for (name, expected) in cases {
        assert_eq!(resolve(&p(name)).unwrap(), expected, "{name}");
    }
}

#[test]
fn resolve_rejects_unknown_combinations() {
    for name in [
        "u_kck_esi_-----_gj832.fits", // unknown observatory for FITS
        "u_mod_euv_grid_gj832.txt",   // text without the young marker
        "u_hst_cos_g130m_gj832.csv",  // CSV from a non-export observatory
        "u_hst_cos_g130m_gj832.dat",  // unknown extension
    ] {
        assert!(
            matches!(resolve(&p(name)), Err(ReadError::UnsupportedFormat { .. })),
            "{name}"
        );
    }
}

// ── HST ──

fn hst_fixture(dir: &Path, name: &str, dq: Vec<i32>) -> PathBuf {
    let mut sci = BinTable::new(Some("SCI"));
    let repeat = dq.len() / 2;
    sci.push_f64_vec(
        "wavelength",
        repeat,
        vec![1301.0, 1302.0, 1303.0, 1304.0, 1601.0, 1602.0, 1603.0, 1604.0],
    )
    .unwrap();
    sci.push_f64_vec("flux", repeat, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0])
        .unwrap();
    sci.push_f64_vec("error", repeat, vec![0.1; 8]).unwrap();
    sci.push_i32_vec("dq", repeat, dq).unwrap();
    sci.header.set("EXPTIME", Value::Float(1800.0));
    sci.header.set("EXPSTART", Value::Float(55000.0));
    sci.header.set("EXPEND", Value::Float(55000.5));
    let path = dir.join(name);
    FitsFile {
        primary: Header::new(),
        tables: vec![sci],
    }
    .write(&path, false)
    .unwrap();
    path
}

#[test]
fn hst_reads_one_table_per_row_with_left_edges() {
    let dir = tempfile::tempdir().unwrap();
    let path = hst_fixture(dir.path(), "u_hst_cos_g130m_gj832_x1d.fits", vec![0; 8]);
    let tables = hst::read(&path).unwrap();
    assert_eq!(tables.len(), 2);

    let a = &tables[0];
    assert_eq!(a.len(), 4);
    // Left-anchored recurrence keeps every midpoint an exact bin center.
    assert_eq!(a.w0[0], 1300.5);
    assert_eq!(a.w1[0], 1301.5);
    for (i, mid) in a.midpoints().iter().enumerate() {
        assert!((mid - (1301.0 + i as f64)).abs() < 1e-9);
    }
    assert_eq!(a.flux, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(a.exptime, vec![1800.0; 4]);
    assert_eq!(a.start, vec![55000.0; 4]);
    assert_eq!(a.end, vec![55000.5; 4]);
    let code = instruments::code_of("hst_cos_g130m").unwrap();
    assert_eq!(a.instrument, vec![code; 4]);
    assert_eq!(a.meta.star, "gj832");
    assert_eq!(a.meta.name, "hst_cos_g130m_gj832");
    assert_eq!(tables[1].flux, vec![5.0, 6.0, 7.0, 8.0]);
}

#[test]
fn hst_trims_off_detector_rows() {
    let dir = tempfile::tempdir().unwrap();
    // First row starts off detector, second row ends off detector.
    let dq = vec![DQ_OFF_DETECTOR, 0, 0, 0, 0, 0, 0, DQ_OFF_DETECTOR];
    let path = hst_fixture(dir.path(), "u_hst_cos_g130m_gj832_x1d.fits", dq);
    let tables = hst::read(&path).unwrap();
    assert_eq!(tables[0].flux, vec![2.0, 3.0, 4.0]);
    assert_eq!(tables[1].flux, vec![5.0, 6.0, 7.0]);
}

#[test]
fn hst_without_science_rows_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("u_hst_cos_g130m_gj832_x1d.fits");
    FitsFile::new().write(&path, false).unwrap();
    assert!(matches!(
        hst::read(&path),
        Err(ReadError::MissingCompanion { .. })
    ));
}

// ── XMM ──

fn xmm_fixture(dir: &Path, name: &str, wave: Vec<f64>, primary: Header) -> PathBuf {
    let n = wave.len();
    let mut sci = BinTable::new(Some("RGS"));
    sci.push_f64("Wave", wave).unwrap();
    sci.push_f64("CFlux", vec![1.0e-14; n]).unwrap();
    sci.push_f64("CFlux_err", vec![1.0e-15; n]).unwrap();
    let path = dir.join(name);
    FitsFile {
        primary,
        tables: vec![sci],
    }
    .write(&path, false)
    .unwrap();
    path
}

fn pn_header() -> Header {
    let mut h = Header::new();
    h.set("SPEC_EXPTIME_PN", Value::Float(12000.0));
    h.set("PN_DATE-OBS", Value::Str("2014-01-01T00:00:00".into()));
    h.set("PN_DATE-END", Value::Str("2014-01-01T06:00:00".into()));
    h
}

#[test]
fn xmm_pn_builds_a_uniform_grid() {
    let dir = tempfile::tempdir().unwrap();
    let path = xmm_fixture(
        dir.path(),
        "u_xmm_pn-_-----_epseri.fits",
        vec![10.0, 15.0, 20.0],
        pn_header(),
    );
    let tables = xmm::read(&path).unwrap();
    assert_eq!(tables.len(), 1);
    let t = &tables[0];
    // Outer edges sit a full bin outside the terminal midpoints.
    assert_eq!(t.w0, vec![5.0, 12.5, 17.5]);
    assert_eq!(t.w1, vec![12.5, 17.5, 25.0]);
    assert_eq!(t.exptime, vec![12000.0; 3]);
    // 2014-01-01 00:00 UT is MJD 56658; the exposure spans a quarter day.
    assert!((t.start[0] - 56658.0).abs() < 1e-9);
    assert!((t.end[0] - 56658.25).abs() < 1e-9);
    assert_eq!(
        t.instrument,
        vec![instruments::code_of("xmm_pn-_-----").unwrap(); 3]
    );
}

#[test]
fn xmm_spacing_within_tolerance_shares_edges() {
    let dir = tempfile::tempdir().unwrap();
    // Spacing 4.995 A is inside the tolerance; the shared edge must be
    // the mean of the two reconstructions so the bins stay contiguous.
    let path = xmm_fixture(
        dir.path(),
        "u_xmm_pn-_-----_epseri.fits",
        vec![10.0, 14.995, 19.990],
        pn_header(),
    );
    let t = &xmm::read(&path).unwrap()[0];
    assert_eq!(t.w0[0], 5.0);
    assert!((t.w0[1] - 12.4975).abs() < 1e-9);
    assert_eq!(t.w1[0], t.w0[1]);
    assert_eq!(t.w1[1], t.w0[2]);
    assert!((t.w1[2] - 24.990).abs() < 1e-9);
}

#[test]
fn xmm_mos_combines_both_cameras() {
    let mut h = Header::new();
    h.set("SPEC_EXPTIME_MOS1", Value::Float(10000.0));
    h.set("SPEC_EXPTIME_MOS2", Value::Float(14000.0));
    h.set("MOS1_DATE-OBS", Value::Str("2014-01-02T00:00:00".into()));
    h.set("MOS2_DATE-OBS", Value::Str("2014-01-01T12:00:00".into()));
    h.set("MOS1_DATE-END", Value::Str("2014-01-02T12:00:00".into()));
    h.set("MOS2_DATE-END", Value::Str("2014-01-02T06:00:00".into()));
    let dir = tempfile::tempdir().unwrap();
    let path = xmm_fixture(
        dir.path(),
        "u_xmm_mos_-----_epseri.fits",
        vec![10.0, 15.0],
        h,
    );
    let t = &xmm::read(&path).unwrap()[0];
    assert_eq!(t.exptime, vec![12000.0; 2]);
    // Earliest start (MOS2) to latest end (MOS1).
    assert!((t.start[0] - 56658.5).abs() < 1e-9); // 2014-01-01 12:00
    assert!((t.end[0] - 56659.5).abs() < 1e-9); // 2014-01-02 12:00
}

#[test]
fn xmm_gapped_grid_is_inconsistent() {
    let dir = tempfile::tempdir().unwrap();
    let path = xmm_fixture(
        dir.path(),
        "u_xmm_pn-_-----_epseri.fits",
        vec![10.0, 15.0, 20.5],
        pn_header(),
    );
    assert!(matches!(
        xmm::read(&path),
        Err(ReadError::DataConsistency { .. })
    ));
}

// ── Text ──

#[test]
fn text_reads_three_columns_with_simple_edges() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("u_mod_euv_young_gj832.txt");
    std::fs::write(
        &path,
        "# wavelength flux error\n100.0 1.0 0.1\n102.0 2.0 0.2\n\n104.0 3.0 0.3\n",
    )
    .unwrap();
    let t = &text::read(&path).unwrap()[0];
    assert_eq!(t.w0, vec![99.0, 101.0, 103.0]);
    assert_eq!(t.w1, vec![101.0, 103.0, 105.0]);
    assert_eq!(t.flux, vec![1.0, 2.0, 3.0]);
    assert_eq!(t.error, vec![0.1, 0.2, 0.3]);
    assert_eq!(
        t.instrument,
        vec![instruments::code_of("mod_euv_young").unwrap(); 3]
    );
}

#[test]
fn text_with_a_missing_column_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("u_mod_euv_young_gj832.txt");
    std::fs::write(&path, "100.0 1.0\n102.0 2.0\n").unwrap();
    assert!(matches!(text::read(&path), Err(ReadError::Parse { .. })));
}

// ── CSV ──

#[test]
fn csv_converts_si_units_and_drops_gaps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("u_tmd_sol_-----_sun.csv");
    std::fs::write(
        &path,
        "wavelength_nm,flux_W_m2_nm\n100.0,1.0\n100.2,nan\n100.4,3.0\n100.8,\n101.2,5.0\n",
    )
    .unwrap();
    let t = &csv::read(&path).unwrap()[0];
    // Edges derive from all five nm midpoints (1000..1012 A); the two
    // gap rows then mask out, leaving holes at 1001-1003 and 1006-1010.
    assert_eq!(t.w0, vec![999.0, 1003.0, 1010.0]);
    assert_eq!(t.w1, vec![1001.0, 1006.0, 1014.0]);
    assert_eq!(t.flux, vec![100.0, 300.0, 500.0]);
    // Unknown exporter configurations land in the catch-all code.
    assert_eq!(
        t.instrument,
        vec![instruments::code_of(instruments::OTHER).unwrap(); 3]
    );
}

// ── IDL save ──

fn push_record(out: &mut Vec<u8>, rectype: u32, body: &[u8]) {
    let start = out.len();
    out.extend_from_slice(&rectype.to_be_bytes());
    let nextrec = (start + 16 + body.len()) as u32;
    out.extend_from_slice(&nextrec.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes()); // high word
    out.extend_from_slice(&0u32.to_be_bytes()); // unknown
    out.extend_from_slice(body);
}

fn f64_variable(name: &str, values: &[f64]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&(name.len() as u32).to_be_bytes());
    body.extend_from_slice(name.as_bytes());
    while body.len() % 4 != 0 {
        body.push(0);
    }
    body.extend_from_slice(&5u32.to_be_bytes()); // typecode f64
    body.extend_from_slice(&4u32.to_be_bytes()); // varflags: array
    body.extend_from_slice(&8u32.to_be_bytes()); // arrstart
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&((values.len() * 8) as u32).to_be_bytes()); // nbytes
    body.extend_from_slice(&(values.len() as u32).to_be_bytes()); // nelements
    body.extend_from_slice(&1u32.to_be_bytes()); // ndims
    body.extend_from_slice(&[0; 8]);
    body.extend_from_slice(&1u32.to_be_bytes()); // nmax
    body.extend_from_slice(&(values.len() as u32).to_be_bytes()); // dims[0]
    body.extend_from_slice(&7u32.to_be_bytes()); // varstart
    for v in values {
        body.extend_from_slice(&v.to_be_bytes());
    }
    body
}

fn sav_fixture(dir: &Path, name: &str, vars: &[(&str, &[f64])]) -> PathBuf {
    let mut out = Vec::new();
    out.extend_from_slice(b"SR\x00\x04");
    for (var, values) in vars {
        push_record(&mut out, 2, &f64_variable(var, values));
    }
    push_record(&mut out, 6, &[]);
    let path = dir.join(name);
    std::fs::write(&path, out).unwrap();
    path
}

#[test]
fn idl_reads_lya_reconstructions() {
    let dir = tempfile::tempdir().unwrap();
    let path = sav_fixture(
        dir.path(),
        "u_mod_lya_young_gj832.sav",
        &[
            ("W140", &[1214.0, 1215.0, 1216.0]),
            ("LYA_MOD", &[1.0e-13, 5.0e-13, 1.0e-13]),
        ],
    );
    let t = &idl::read(&path).unwrap()[0];
    assert_eq!(t.flux, vec![1.0e-13, 5.0e-13, 1.0e-13]);
    assert_eq!(t.w0, vec![1213.5, 1214.5, 1215.5]);
    assert_eq!(
        t.instrument,
        vec![instruments::code_of("mod_lya_young").unwrap(); 3]
    );
}

#[test]
fn idl_solar_files_convert_si_units() {
    let dir = tempfile::tempdir().unwrap();
    let path = sav_fixture(
        dir.path(),
        "u_mod_phx_-----_sun.sav",
        &[("WAVE", &[100.0, 101.0]), ("FLUX", &[1.0, 2.0])],
    );
    let t = &idl::read(&path).unwrap()[0];
    assert_eq!(t.midpoints(), vec![1000.0, 1010.0]);
    assert_eq!(t.flux, vec![100.0, 200.0]);
}

#[test]
fn idl_missing_variable_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = sav_fixture(
        dir.path(),
        "u_mod_lya_young_gj832.sav",
        &[("W140", &[1214.0, 1215.0])],
    );
    assert!(matches!(
        idl::read(&path),
        Err(ReadError::MissingCompanion { .. })
    ));
}

#[test]
fn idl_rejects_non_save_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("u_mod_lya_young_gj832.sav");
    std::fs::write(&path, b"not a save file").unwrap();
    assert!(matches!(idl::read(&path), Err(ReadError::Parse { .. })));
}
