use super::header::{format_card, parse_header, serialize_header};
use super::*;

fn parse_one(card_text: &str) -> Card {
    let mut block = vec![b' '; BLOCK_SIZE];
    block[..card_text.len()].copy_from_slice(card_text.as_bytes());
    block[CARD_SIZE..CARD_SIZE + 3].copy_from_slice(b"END");
    let (header, _) = parse_header(&block).unwrap();
    header.cards()[0].clone()
}

#[test]
fn parse_string_card() {
    let c = parse_one("TELESCOP= 'Hubble  '           / telescope name");
    assert_eq!(c.keyword, "TELESCOP");
    assert_eq!(c.value, Some(Value::Str("Hubble".into())));
    assert_eq!(c.comment, Some("telescope name".into()));
}

#[test]
fn parse_integer_card() {
    let c = parse_one("BITPIX  =                    8 / bits");
    assert_eq!(c.value, Some(Value::Integer(8)));
}

#[test]
fn parse_float_card_with_d_exponent() {
    let c = parse_one("EXPTIME =             1.25D+03");
    assert_eq!(c.value, Some(Value::Float(1250.0)));
}

#[test]
fn parse_logical_card() {
    let c = parse_one("SIMPLE  =                    T / conforms");
    assert_eq!(c.value, Some(Value::Logical(true)));
}

#[test]
fn parse_comment_card() {
    let c = parse_one("COMMENT free text here");
    assert_eq!(c.keyword, "COMMENT");
    assert_eq!(c.comment, Some("free text here".into()));
}

#[test]
fn parse_hierarch_card() {
    let c = parse_one("HIERARCH SPEC_EXPTIME_MOS1 = 21873.5 / seconds");
    assert_eq!(c.keyword, "SPEC_EXPTIME_MOS1");
    assert_eq!(c.value, Some(Value::Float(21873.5)));
    assert_eq!(c.comment, Some("seconds".into()));
}

#[test]
fn parse_string_with_escaped_quote() {
    let c = parse_one("OBJECT  = 'it''s ok '");
    assert_eq!(c.value, Some(Value::Str("it's ok".into())));
}

#[test]
fn format_card_is_80_bytes() {
    let buf = format_card(&Card::new("NAXIS", Value::Integer(2)));
    assert_eq!(buf.len(), CARD_SIZE);
    assert_eq!(&buf[..8], b"NAXIS   ");
    assert_eq!(&buf[8..10], b"= ");
}

#[test]
fn long_keyword_round_trips_via_hierarch() {
    let card = Card::new("PN_DATE-OBS", Value::Str("2013-11-09T12:01:02".into()));
    let buf = format_card(&card);
    assert!(std::str::from_utf8(&buf).unwrap().starts_with("HIERARCH "));
    let mut block = vec![b' '; BLOCK_SIZE];
    block[..CARD_SIZE].copy_from_slice(&buf);
    block[CARD_SIZE..CARD_SIZE + 3].copy_from_slice(b"END");
    let (header, _) = parse_header(&block).unwrap();
    assert_eq!(
        header.get_str("PN_DATE-OBS").unwrap(),
        "2013-11-09T12:01:02"
    );
}

#[test]
fn header_value_round_trip() {
    let cards = vec![
        Card::new("FILENAME", Value::Str("u_hst_cos_g130m_gj832.fits".into())),
        Card::new("EXPTIME", Value::Float(1059.3217540001)),
        Card::new("COUNT", Value::Integer(-42)),
        Card::new("FLAG", Value::Logical(false)),
        Card::comment("hello"),
    ];
    let bytes = serialize_header(&cards);
    assert_eq!(bytes.len() % BLOCK_SIZE, 0);
    let (header, consumed) = parse_header(&bytes).unwrap();
    assert_eq!(consumed, bytes.len());
    assert_eq!(
        header.get_str("FILENAME").unwrap(),
        "u_hst_cos_g130m_gj832.fits"
    );
    assert_eq!(header.get_f64("EXPTIME").unwrap(), 1059.3217540001);
    assert_eq!(header.get_i64("COUNT").unwrap(), -42);
    assert_eq!(header.comments(), vec!["hello".to_string()]);
}

#[test]
fn long_comments_wrap_at_word_boundaries() {
    let mut header = Header::new();
    let text = "word ".repeat(40);
    header.push_comment(text.trim_end());
    assert!(header.comments().len() > 1);
    for line in header.comments() {
        assert!(line.len() <= 72);
    }
    let bytes = serialize_header(header.cards());
    let (parsed, _) = parse_header(&bytes).unwrap();
    assert_eq!(parsed.comments().join(" "), text.trim_end());
}

#[test]
fn bintable_scalar_round_trip() {
    let mut table = BinTable::new(Some("spectrum"));
    table.push_f64("w0", vec![1.0, 2.0, 3.0]).unwrap();
    table.push_i32("flags", vec![0, 128, 4]).unwrap();
    table.push_i16("code", vec![1, 2, 4]).unwrap();
    table.header.set("NAME", Value::Str("x".into()));

    let bytes = table.serialize();
    assert_eq!(bytes.len() % BLOCK_SIZE, 0);
    let (parsed, consumed) = BinTable::parse(&bytes).unwrap();
    assert_eq!(consumed, bytes.len());
    assert_eq!(parsed.name.as_deref(), Some("spectrum"));
    assert_eq!(parsed.nrows(), 3);
    assert_eq!(parsed.numeric_column("w0").unwrap(), vec![1.0, 2.0, 3.0]);
    assert_eq!(parsed.int_column("flags").unwrap(), vec![0, 128, 4]);
    assert_eq!(parsed.int_column("code").unwrap(), vec![1, 2, 4]);
    assert_eq!(parsed.header.get_str("NAME").unwrap(), "x");
}

#[test]
fn bintable_vector_round_trip() {
    let mut table = BinTable::new(Some("sci"));
    table
        .push_f64_vec("wavelength", 4, (0..8).map(f64::from).collect())
        .unwrap();
    table.push_i32_vec("dq", 4, vec![0; 8]).unwrap();
    let bytes = table.serialize();
    let (parsed, _) = BinTable::parse(&bytes).unwrap();
    assert_eq!(parsed.nrows(), 2);
    let (repeat, values) = parsed.numeric_column_vec("wavelength").unwrap();
    assert_eq!(repeat, 4);
    assert_eq!(values, (0..8).map(f64::from).collect::<Vec<_>>());
}

#[test]
fn bintable_string_column_pads_and_trims() {
    let mut table = BinTable::new(Some("legend"));
    table
        .push_str(
            "instruments",
            13,
            vec!["hst_cos_g130m".into(), "xmm_pn-_-----".into()],
        )
        .unwrap();
    table.push_i16("bitvalues", vec![1, 512]).unwrap();
    let bytes = table.serialize();
    let (parsed, _) = BinTable::parse(&bytes).unwrap();
    assert_eq!(
        parsed.str_column("instruments").unwrap(),
        vec!["hst_cos_g130m".to_string(), "xmm_pn-_-----".to_string()]
    );
}

#[test]
fn overlong_string_is_rejected() {
    let mut table = BinTable::new(None);
    assert!(matches!(
        table.push_str("s", 3, vec!["toolong".into()]),
        Err(FitsError::Malformed(_))
    ));
}

#[test]
fn mismatched_column_length_is_rejected() {
    let mut table = BinTable::new(None);
    table.push_f64("a", vec![1.0, 2.0]).unwrap();
    assert!(matches!(
        table.push_f64("b", vec![1.0]),
        Err(FitsError::BadColumnLength { .. })
    ));
}

#[test]
fn column_type_mismatch_is_reported() {
    let mut table = BinTable::new(None);
    table.push_f64("w0", vec![1.0]).unwrap();
    assert!(matches!(
        table.int_column("w0"),
        Err(FitsError::TypeMismatch { .. })
    ));
    assert!(matches!(
        table.numeric_column("missing"),
        Err(FitsError::ColumnNotFound(_))
    ));
}

#[test]
fn file_round_trip_multiple_extensions() {
    let mut file = FitsFile::new();
    file.primary.set("TARG", Value::Str("gj832".into()));
    let mut spec = BinTable::new(Some("spectrum"));
    spec.push_f64("w0", vec![1.0, 2.0]).unwrap();
    file.tables.push(spec);
    let mut legend = BinTable::new(Some("legend"));
    legend
        .push_str("instruments", 13, vec!["hst_cos_g130m".into()])
        .unwrap();
    legend.push_i16("bitvalues", vec![1]).unwrap();
    file.tables.push(legend);

    let parsed = FitsFile::parse(&file.to_bytes()).unwrap();
    assert_eq!(parsed.tables.len(), 2);
    assert_eq!(parsed.primary.get_str("TARG").unwrap(), "gj832");
    assert!(parsed.table("LEGEND").is_ok());
    assert!(matches!(
        parsed.table("nope"),
        Err(FitsError::HduNotFound(_))
    ));
}

#[test]
fn write_refuses_to_clobber() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.fits");
    let file = FitsFile::new();
    file.write(&path, false).unwrap();
    assert!(matches!(
        file.write(&path, false),
        Err(FitsError::AlreadyExists(_))
    ));
    file.write(&path, true).unwrap();
    let parsed = FitsFile::open(&path).unwrap();
    assert!(parsed.tables.is_empty());
}

#[test]
fn primary_image_data_is_skipped() {
    // A primary HDU carrying a small image, then a table.
    let mut cards = vec![
        Card::new("SIMPLE", Value::Logical(true)),
        Card::new("BITPIX", Value::Integer(-64)),
        Card::new("NAXIS", Value::Integer(1)),
        Card::new("NAXIS1", Value::Integer(10)),
    ];
    cards.push(Card::new("TARG", Value::Str("gj832".into())));
    let mut bytes = serialize_header(&cards);
    bytes.resize(bytes.len() + BLOCK_SIZE, 0); // 80 data bytes, padded
    let mut table = BinTable::new(Some("spectrum"));
    table.push_f64("w0", vec![5.0]).unwrap();
    bytes.extend_from_slice(&table.serialize());

    let parsed = FitsFile::parse(&bytes).unwrap();
    assert_eq!(parsed.tables.len(), 1);
    assert_eq!(parsed.primary.get_str("TARG").unwrap(), "gj832");
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn float_keywords_round_trip(x in proptest::num::f64::NORMAL) {
            let cards = vec![Card::new("VAL", Value::Float(x))];
            let bytes = serialize_header(&cards);
            let (header, _) = parse_header(&bytes).unwrap();
            prop_assert_eq!(header.get_f64("VAL").unwrap(), x);
        }

        #[test]
        fn f64_columns_round_trip(values in proptest::collection::vec(proptest::num::f64::NORMAL, 1..64)) {
            let mut table = BinTable::new(None);
            table.push_f64("x", values.clone()).unwrap();
            let (parsed, _) = BinTable::parse(&table.serialize()).unwrap();
            prop_assert_eq!(parsed.numeric_column("x").unwrap(), values);
        }
    }
}
