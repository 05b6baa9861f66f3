use std::collections::HashSet;

use super::*;

#[test]
fn parse_quoted_raster_line() {
    let s = Shape::from_line(r#""abc","https://example.com/x.png""#).unwrap();
    assert_eq!(s.id(), "abc");
    assert_eq!(s.source_url(), "https://example.com/x.png");
    assert_eq!(s.kind(), ShapeKind::Raster);
    assert!(s.local_source().is_none());
}

#[test]
fn parse_unquoted_vector_line() {
    let s = Shape::from_line("v1,https://example.com/a.svg").unwrap();
    assert_eq!(s.id(), "v1");
    assert_eq!(s.kind(), ShapeKind::Vector);
    assert_eq!(s.kind().extension(), "svg");
}

#[test]
fn svg_match_is_a_case_sensitive_substring() {
    assert_eq!(
        ShapeKind::classify("https://x/a.png?fmt=.svg"),
        ShapeKind::Vector
    );
    assert_eq!(ShapeKind::classify("https://x/a.SVG"), ShapeKind::Raster);
}

#[test]
fn malformed_lines_yield_nothing() {
    assert!(Shape::from_line(r#""onlyonefield""#).is_none());
    assert!(Shape::from_line(r#""a","b","c""#).is_none());
    assert!(Shape::from_line("").is_none());
    assert!(Shape::from_line(r#""","https://x/a.png""#).is_none());
    assert!(Shape::from_line(r#""a","""#).is_none());
}

#[test]
fn ids_that_escape_output_dirs_are_rejected() {
    assert!(Shape::from_line(r#""../etc","https://x/a.png""#).is_none());
    assert!(Shape::from_line(r#""a/b","https://x/a.png""#).is_none());
    assert!(Shape::from_line(r#"".","https://x/a.png""#).is_none());
}

#[test]
fn display_round_trips_through_from_line() {
    let s = Shape::new("42", "https://example.com/p.png").unwrap();
    let line = s.to_string();
    assert_eq!(line, r#""42","https://example.com/p.png""#);
    assert_eq!(Shape::from_line(&line).unwrap(), s);
}

#[test]
fn identity_ignores_local_source() {
    let a = Shape::new("1", "https://x/a.png").unwrap();
    let mut b = a.clone();
    b.set_local_source("original/1.png".into());

    let mut set = HashSet::new();
    set.insert(a);
    assert!(!set.insert(b));
}

#[test]
fn update_statement_uses_id_and_extension() {
    let s = Shape::new("7", "https://x/a.svg").unwrap();
    assert_eq!(
        s.update_statement("https://media.example.com/"),
        "update `butter_icon` SET `thumbtail` = https://media.example.com/7.svg WHERE `icon_id` = 7"
    );
}

#[test]
fn parse_shapes_skips_bad_lines_and_handles_crlf() {
    let text = "\"a\",\"https://x/a.png\"\r\nbroken\n\n\"b\",\"https://x/b.svg\"\n";
    let shapes = parse_shapes(text);
    assert_eq!(shapes.len(), 2);
    assert_eq!(shapes[0].id(), "a");
    assert_eq!(shapes[1].kind(), ShapeKind::Vector);
}

#[test]
fn read_shapes_missing_file_is_config_error() {
    let err = read_shapes(Path::new("definitely/not/here/shapes.txt")).unwrap_err();
    assert!(matches!(err, ShapeError::Config(_)));
}
