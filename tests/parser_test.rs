use fwffr::{
    Encoding, FieldSpec, FixedLengthFieldParser, FwfError, Layout, OffsetRecordType, ParseError,
    ParserOptions,
};
use std::collections::HashMap;

fn people_parser(options: ParserOptions) -> FixedLengthFieldParser {
    FixedLengthFieldParser::new(
        Layout::uniform([("id", 4), ("name", 8), ("balance", 7)]),
        ParserOptions {
            right_justified: ["balance".to_string()].into_iter().collect(),
            ..options
        },
    )
}

fn batch_types() -> HashMap<String, Vec<FieldSpec>> {
    let mut types = HashMap::new();
    types.insert(
        "H".to_string(),
        vec![FieldSpec::new("kind", 1), FieldSpec::new("created", 8)],
    );
    types.insert(
        "D".to_string(),
        vec![
            FieldSpec::new("kind", 1),
            FieldSpec::new("account", 5),
            FieldSpec::new("amount", 6),
        ],
    );
    types
}

#[test]
fn test_uniform_record_is_split_and_stripped() {
    let parser = people_parser(ParserOptions::default());
    let record = parser
        .parse_record(concat!("0001", "Ada Lov ", " 120.50"))
        .unwrap()
        .unwrap();

    assert_eq!(record.get("id"), Some("0001"));
    assert_eq!(record.get("name"), Some("Ada Lov"));
    assert_eq!(record.get("balance"), Some("120.50"));
    assert_eq!(record.record_type, None);
    let keys: Vec<&String> = record.data.keys().collect();
    assert_eq!(keys, vec!["id", "name", "balance"]);
}

#[test]
fn test_strip_disabled_keeps_padding() {
    let parser = people_parser(ParserOptions {
        strip: false,
        ..Default::default()
    });
    let record = parser.parse_record(concat!("0002", "Bob     ", "    3.1")).unwrap().unwrap();
    assert_eq!(record.get("name"), Some("Bob     "));
    assert_eq!(record.get("balance"), Some("    3.1"));
}

#[test]
fn test_short_line_yields_empty_trailing_fields() {
    let parser = people_parser(ParserOptions::default());
    let record = parser.parse_record("0003Cy").unwrap().unwrap();
    assert_eq!(record.get("name"), Some("Cy"));
    assert_eq!(record.get("balance"), Some(""));
}

#[test]
fn test_left_justified_field_with_leading_space_fails() {
    let parser = people_parser(ParserOptions::default());
    let err = parser
        .parse_record(concat!("0004", "  Dee   ", "   9.99"))
        .unwrap_err();
    assert_eq!(
        err,
        ParseError::Justification {
            field: "name".to_string(),
            value: "  Dee   ".to_string(),
        }
    );
    assert_eq!(err.to_string(), "Field \"name\" value \"  Dee   \" is not justified correctly");
}

#[test]
fn test_right_justified_field_with_trailing_space_fails() {
    let parser = people_parser(ParserOptions::default());
    let err = parser.parse_record(concat!("0005", "Eve     ", " 9.99  ")).unwrap_err();
    assert!(matches!(err, ParseError::Justification { ref field, .. } if field == "balance"));
}

#[test]
fn test_skip_justified_field_accepts_anything() {
    let parser = people_parser(ParserOptions {
        skip_justified: ["name".to_string()].into_iter().collect(),
        ..Default::default()
    });
    let record = parser.parse_record(concat!("0004", "  Dee   ", "   9.99")).unwrap().unwrap();
    assert_eq!(record.get("name"), Some("Dee"));
}

#[test]
fn test_justification_override_replaces_value() {
    let parser = people_parser(ParserOptions::default()).with_justification_override(
        |field: &str, value: &str| {
            if field == "name" {
                Some(value.trim_start().to_string())
            } else {
                None
            }
        },
    );

    let record = parser.parse_record(concat!("0004", "  Dee   ", "   9.99")).unwrap().unwrap();
    assert_eq!(record.get("name"), Some("Dee"));

    // The hook declines for other fields, so the error stands.
    let err = parser.parse_record(concat!("0005", "Eve     ", " 9.99  ")).unwrap_err();
    assert_eq!(err.field(), Some("balance"));
}

#[test]
fn test_override_value_is_stripped_when_strip_enabled() {
    let parser = people_parser(ParserOptions::default())
        .with_justification_override(|_: &str, _: &str| Some("  fixed  ".to_string()));
    let record = parser.parse_record(concat!("0004", "  Dee   ", "   9.99")).unwrap().unwrap();
    assert_eq!(record.get("name"), Some("fixed"));
}

#[test]
fn test_separator_is_required_between_fields() {
    let parser = FixedLengthFieldParser::new(
        Layout::uniform([("id", 3), ("name", 5), ("code", 2)]),
        ParserOptions {
            field_separator: Some("|".to_string()),
            ..Default::default()
        },
    );

    let record = parser.parse_record("001| Ann |XY").unwrap().unwrap();
    assert_eq!(record.get("name"), Some("Ann"));
    assert_eq!(record.get("code"), Some("XY"));

    let err = parser.parse_record("001| Ann ;XY").unwrap_err();
    assert_eq!(
        err,
        ParseError::MissingSeparator {
            field: "code".to_string(),
            pointer: 9,
        }
    );
    assert_eq!(err.to_string(), "No field separator found before \"code\" at 9");
}

#[test]
fn test_multi_character_separator() {
    let parser = FixedLengthFieldParser::new(
        Layout::uniform([("a", 2), ("b", 2)]),
        ParserOptions {
            field_separator: Some("::".to_string()),
            ..Default::default()
        },
    );
    let record = parser.parse_record("ab::cd").unwrap().unwrap();
    assert_eq!(record.get("b"), Some("cd"));

    let err = parser.parse_record("ab:").unwrap_err();
    assert!(matches!(err, ParseError::MissingSeparator { pointer: 2, .. }));
}

#[test]
fn test_typed_layout_selects_fields_by_type() {
    let parser = FixedLengthFieldParser::new(
        Layout::typed(OffsetRecordType::new(0, 1), batch_types()),
        ParserOptions {
            right_justified: ["amount".to_string()].into_iter().collect(),
            ..Default::default()
        },
    );

    let header = parser.parse_record("H20240131").unwrap().unwrap();
    assert_eq!(header.record_type.as_deref(), Some("H"));
    assert_eq!(header.get("created"), Some("20240131"));

    let detail = parser.parse_record("DAC001 12.00").unwrap().unwrap();
    assert_eq!(detail.record_type.as_deref(), Some("D"));
    assert_eq!(detail.get("account"), Some("AC001"));
    assert_eq!(detail.get("amount"), Some("12.00"));
    assert_eq!(detail.get("created"), None);
}

#[test]
fn test_unknown_type_skipped_or_rejected() {
    let lenient = FixedLengthFieldParser::new(
        Layout::typed(OffsetRecordType::new(0, 1), batch_types()),
        ParserOptions::default(),
    );
    assert_eq!(lenient.parse_record("Zwhatever").unwrap(), None);

    let strict = FixedLengthFieldParser::new(
        Layout::typed(OffsetRecordType::new(0, 1), batch_types()),
        ParserOptions {
            skip_unknown_types: false,
            ..Default::default()
        },
    );
    let err = strict.parse_record("Zwhatever").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownRecordType {
            record_type: "Z".to_string()
        }
    );
    assert_eq!(err.to_string(), "Unknown record type \"Z\" encountered");
}

#[test]
fn test_closure_resolver() {
    let mut types = HashMap::new();
    types.insert("long".to_string(), vec![FieldSpec::new("text", 10)]);
    types.insert("short".to_string(), vec![FieldSpec::new("text", 3)]);

    let resolver = |line: &str| {
        if line.chars().count() > 3 {
            "long".to_string()
        } else {
            "short".to_string()
        }
    };
    let parser = FixedLengthFieldParser::new(Layout::typed(resolver, types), ParserOptions::default());

    let record = parser.parse_record("abcdefg").unwrap().unwrap();
    assert_eq!(record.record_type.as_deref(), Some("long"));
    assert_eq!(record.get("text"), Some("abcdefg"));

    let record = parser.parse_record("ab").unwrap().unwrap();
    assert_eq!(record.record_type.as_deref(), Some("short"));
}

#[test]
fn test_offsets_count_characters_not_bytes() {
    let parser = FixedLengthFieldParser::new(
        Layout::uniform([("city", 6), ("code", 3)]),
        ParserOptions::default(),
    );
    let record = parser.parse_record("Zürich123").unwrap().unwrap();
    assert_eq!(record.get("city"), Some("Zürich"));
    assert_eq!(record.get("code"), Some("123"));
}

#[test]
fn test_latin1_input_through_reader() {
    let parser = FixedLengthFieldParser::new(
        Layout::uniform([("name", 5), ("code", 2)]),
        ParserOptions {
            encoding: Encoding::Latin1,
            ..Default::default()
        },
    );
    // "José " + "01" encoded as Latin-1
    let data = b"Jos\xe9 01\nAna  02\n";
    let records = parser.parse_bytes(data).unwrap();
    assert_eq!(records[0].get("name"), Some("José"));
    assert_eq!(records[0].get("code"), Some("01"));
    assert_eq!(records[1].line_number, Some(2));
}

#[test]
fn test_reader_stops_at_first_bad_record() {
    let parser = people_parser(ParserOptions::default());
    let data = concat!(
        "0001", "Ada     ", "   1.00", "\n",
        "0002", " Bob    ", "   2.00", "\n",
        "0003", "Cy      ", "   3.00", "\n",
    )
    .as_bytes();
    let mut reader = parser.records(data);

    assert!(reader.next().unwrap().is_ok());
    let err = reader.next().unwrap().unwrap_err();
    assert!(matches!(err, FwfError::Parse { line: 2, .. }));
    assert_eq!(err.line(), Some(2));
}
