use jhp::parser::{parse, ParseErrorKind, Token};

fn err(source: &str) -> jhp::ParseError {
    parse(source).expect_err("expected a parse error")
}

#[test]
fn missing_brace_reports_expected_token() {
    let e = err("class C {");
    match e.kind() {
        ParseErrorKind::ExpectedToken { expected: Token::RBrace, found: Token::Eof } => {}
        other => panic!("unexpected kind: {:?}", other),
    }
    assert!(e.to_string().contains("expected"), "{}", e);
}

#[test]
fn missing_semicolon_after_package() {
    let e = err("package a.b class C {}");
    assert!(matches!(
        e.kind(),
        ParseErrorKind::ExpectedToken { expected: Token::Semicolon, .. }
    ));
}

#[test]
fn unexpected_token_at_top_level() {
    let e = err("+ class C {}");
    assert!(matches!(e.kind(), ParseErrorKind::UnexpectedToken { found: Token::Plus }));
}

#[test]
fn unexpected_identifier_quotes_its_text() {
    let e = err("garbage class C {}");
    match e.kind() {
        ParseErrorKind::UnexpectedIdentifier { name } => assert_eq!(name, "garbage"),
        other => panic!("unexpected kind: {:?}", other),
    }
    assert!(e.to_string().contains("'garbage'"), "{}", e);
}

#[test]
fn generic_field_is_rejected() {
    let e = err("class C { <T> int f = 1; }");
    match e.kind() {
        ParseErrorKind::GenericField { names } => assert_eq!(names, &["T"]),
        other => panic!("unexpected kind: {:?}", other),
    }
}

#[test]
fn generic_field_with_class_type_is_rejected() {
    let e = err("class C { <T> List<T> f; }");
    assert!(matches!(e.kind(), ParseErrorKind::GenericField { .. }));
}

#[test]
fn malformed_second_declarator() {
    let e = err("class C { int a, = 1; }");
    assert!(matches!(
        e.kind(),
        ParseErrorKind::MalformedDeclarator { found: Token::Assign }
    ));
}

#[test]
fn malformed_declarator_brackets() {
    let e = err("class C { int a, b[; }");
    assert!(matches!(e.kind(), ParseErrorKind::MalformedDeclarator { .. }));
}

#[test]
fn unrecognized_character() {
    let e = err("class C { int x = `1`; }");
    assert!(matches!(e.kind(), ParseErrorKind::UnrecognizedToken { .. }));
}

#[test]
fn invalid_unicode_escape() {
    let e = err("class C { String s = \"\\u00ZZ\"; }");
    assert!(matches!(e.kind(), ParseErrorKind::InvalidUnicodeEscape));
}

#[test]
fn unterminated_method_body() {
    let e = err("class C { void m() { if (x) { }");
    assert!(matches!(
        e.kind(),
        ParseErrorKind::ExpectedToken { expected: Token::RBrace, found: Token::Eof }
    ));
}

#[test]
fn unterminated_enum_constant_arguments() {
    let e = err("enum E { A(1, 2 }");
    assert!(matches!(e.kind(), ParseErrorKind::ExpectedToken { .. }));
}

#[test]
fn field_missing_semicolon() {
    let e = err("class C { int a = 1 }");
    assert!(matches!(
        e.kind(),
        ParseErrorKind::ExpectedToken { expected: Token::Semicolon, found: Token::RBrace }
    ));
}

#[test]
fn non_constant_annotation_argument() {
    let e = err("@A(foo()) class C {}");
    assert!(matches!(
        e.kind(),
        ParseErrorKind::ExpectedToken { .. } | ParseErrorKind::UnexpectedToken { .. }
    ));
}

#[test]
fn error_location_points_at_the_problem() {
    let e = err("class C {\n  int f\n}");
    assert_eq!(e.location().line, 3);
}

#[test]
fn errors_carry_the_source_handle() {
    let source = jhp::SourceFile::new("Bad.java", "interface I { !! }");
    let e = jhp::parse_source(source).unwrap_err();
    assert_eq!(e.source_file().path(), Some("Bad.java"));
    assert!(e.to_string().starts_with("Bad.java:"));
}
