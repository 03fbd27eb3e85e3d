//! Trace Parsing Tests.
//!
//! Covers the accepted line shapes, skipped lines, rejected lines and the
//! line numbering reported by [`TraceReader`].

use std::io::{self, BufRead, Cursor, Read};

use cachesim_core::sim::{TraceError, TraceReader, TraceRecord, parse_line};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("i 400a10", TraceRecord::instruction(0x40_0a10))]
#[case("d 0x7ffe1c28", TraceRecord::data(0x7ffe_1c28))]
#[case("I 0XFF", TraceRecord::instruction(0xff))]
#[case("D deadBEEF", TraceRecord::data(0xdead_beef))]
#[case("  i   0x10  ", TraceRecord::instruction(0x10))]
#[case("\ti\t0x10\r\n", TraceRecord::instruction(0x10))]
#[case("0x2000 d", TraceRecord::data(0x2000))]
#[case("40 i", TraceRecord::instruction(0x40))]
#[case("d 0x80 trailing tokens", TraceRecord::data(0x80))]
#[case("i ffffffffffffffff", TraceRecord::instruction(u64::MAX))]
fn parses_access_lines(#[case] text: &str, #[case] expected: TraceRecord) {
    assert_eq!(parse_line(text, 1).unwrap(), Some(expected));
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n")]
#[case("# header")]
#[case("   # indented comment")]
fn skips_blank_and_comment_lines(#[case] text: &str) {
    assert_eq!(parse_line(text, 1).unwrap(), None);
}

#[rstest]
#[case("i")]
#[case("0x40")]
#[case("x 0x40")]
#[case("0x40 0x80")]
fn rejects_lines_without_kind_and_address(#[case] text: &str) {
    let err = parse_line(text, 7).unwrap_err();
    assert!(
        matches!(&err, TraceError::Malformed { line: 7, text: got } if got == text.trim()),
        "unexpected error: {err:?}"
    );
}

#[rstest]
#[case("i 0xZZ", "0xZZ")]
#[case("d 12g4", "12g4")]
#[case("i 0x", "0x")]
#[case("i 10000000000000000", "10000000000000000")]
fn rejects_bad_addresses(#[case] text: &str, #[case] token: &str) {
    match parse_line(text, 3).unwrap_err() {
        TraceError::Address { line, token: got } => {
            assert_eq!(line, 3);
            assert_eq!(got, token);
        }
        other => panic!("expected an address error, got {other:?}"),
    }
}

#[test]
fn error_messages_name_the_line() {
    assert_eq!(
        parse_line("i", 12).unwrap_err().to_string(),
        "line 12: expected `<i|d> <hex address>`, got `i`"
    );
    assert_eq!(
        parse_line("d 0xq", 4).unwrap_err().to_string(),
        "line 4: invalid address `0xq`"
    );
}

// ══════════════════════════════════════════════════════════
// Reader
// ══════════════════════════════════════════════════════════

#[test]
fn reader_yields_records_in_order() {
    let trace = "# sample trace\ni 0x0\n\nd 0x40\n   \ni 0x80\n";
    let records: Vec<_> = TraceReader::new(Cursor::new(trace))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        records,
        vec![
            TraceRecord::instruction(0x0),
            TraceRecord::data(0x40),
            TraceRecord::instruction(0x80),
        ]
    );
}

#[test]
fn reader_handles_missing_final_newline() {
    let records: Vec<_> = TraceReader::new(Cursor::new("i 1\nd 2"))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 2);
}

/// Line numbers count every physical line, comments and blanks included.
#[test]
fn reader_reports_physical_line_numbers() {
    let trace = "# c\n\ni 0x0\nbogus\n";
    let mut reader = TraceReader::new(Cursor::new(trace));
    assert_eq!(reader.next().unwrap().unwrap(), TraceRecord::instruction(0));
    assert!(matches!(
        reader.next().unwrap(),
        Err(TraceError::Malformed { line: 4, .. })
    ));
    assert!(reader.next().is_none());
}

#[test]
fn reader_on_empty_source_is_empty() {
    assert_eq!(TraceReader::new(Cursor::new("")).count(), 0);
}

/// A reader that fails on the first read.
struct Broken;

impl Read for Broken {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk on fire"))
    }
}

#[test]
fn reader_surfaces_io_errors() {
    let source: Box<dyn BufRead> = Box::new(io::BufReader::new(Broken));
    let mut reader = TraceReader::new(source);
    let err = reader.next().unwrap().unwrap_err();
    assert!(matches!(err, TraceError::Io(_)));
    assert!(err.to_string().contains("disk on fire"));
}
