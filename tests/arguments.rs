//! Argument lexer tests: token kinds, separators, escapes, and rejected input.

use fieldrules::{parse_arguments, Arguments, SyntaxErrorKind};

fn parsed(src: &str) -> Arguments {
    match parse_arguments(src) {
        Ok(a) => a,
        Err(e) => panic!("input={:?} error={}", src, e),
    }
}

// ==================== Valid argument lists ====================

#[test]
fn symbols_only() {
    let a = parsed("I9, I_1, I____10");
    assert_eq!(a.symbols, vec!["I9", "I_1", "I____10"]);
    assert!(a.integers.is_empty());
    assert!(a.strings.is_empty());
}

#[test]
fn integers_only() {
    let a = parsed("123, 456, 789");
    assert_eq!(a.integers, vec![123, 456, 789]);
    assert!(a.symbols.is_empty());
    assert!(a.strings.is_empty());
}

#[test]
fn strings_keep_inner_spacing() {
    let a = parsed("'hello', 'xvalidator', 'are  ', 's0 ', 'c007 !!!'");
    assert_eq!(a.strings, vec!["hello", "xvalidator", "are  ", "s0 ", "c007 !!!"]);
    assert!(a.integers.is_empty());
    assert!(a.symbols.is_empty());
}

#[test]
fn mixed_kinds() {
    let a = parsed("INT_MAX, 123, 'hello'");
    assert_eq!(a.strings, vec!["hello"]);
    assert_eq!(a.integers, vec![123]);
    assert_eq!(a.symbols, vec!["INT_MAX"]);
}

#[test]
fn surrounding_whitespace_and_trailing_comma() {
    assert_eq!(parsed(" 123 ").integers, vec![123]);
    assert_eq!(parsed(" 'test', ").strings, vec!["test"]);
}

#[test]
fn escaped_quotes_preserved() {
    assert_eq!(parsed(r" '\'test\'' ").strings, vec!["'test'"]);
}

#[test]
fn whitespace_alone_separates() {
    let a = parsed("1 2\t3\n4");
    assert_eq!(a.integers, vec![1, 2, 3, 4]);
}

#[test]
fn empty_string_literal() {
    assert_eq!(parsed("''").strings, vec![""]);
}

#[test]
fn leading_zeros_accepted() {
    assert_eq!(parsed("007").integers, vec![7]);
}

// ==================== Invalid argument lists ====================

#[test]
fn non_printable_character() {
    let e = parse_arguments("\u{0000}").unwrap_err();
    assert_eq!(e.kind, SyntaxErrorKind::NonPrintable('\u{0000}'));
    assert!(parse_arguments("'a\u{0007}b'").is_err());

    // Zero-width space, soft hyphen, private use, unassigned, byte order mark.
    for src in ["'a\u{200B}b'", "'a\u{00AD}b'", "'\u{E000}'", "'\u{0378}'", "'\u{FEFF}'"] {
        let e = parse_arguments(src).unwrap_err();
        assert!(matches!(e.kind, SyntaxErrorKind::NonPrintable(_)), "{:?}", src);
    }
    let e = parse_arguments("'\\\u{200B}'").unwrap_err();
    assert_eq!(e.kind, SyntaxErrorKind::NonPrintable('\u{200B}'));
}

#[test]
fn unclosed_quote() {
    let e = parse_arguments("'hello").unwrap_err();
    assert_eq!(e.kind, SyntaxErrorKind::UnterminatedString);
}

#[test]
fn lowercase_constant() {
    assert!(parse_arguments("CONST_not_capital").is_err());
    assert!(parse_arguments("lower").is_err());
}

#[test]
fn malformed_number() {
    assert!(parse_arguments("10_23").is_err());
    assert!(parse_arguments("-1").is_err());
    assert!(parse_arguments("1.5").is_err());
}

#[test]
fn unknown_token() {
    let e = parse_arguments("|..").unwrap_err();
    assert_eq!(e.offset, 0);
    assert_eq!(e.kind, SyntaxErrorKind::UnexpectedChar('|'));
}

#[test]
fn double_quotes_are_not_strings() {
    assert!(parse_arguments("\"x\"").is_err());
}

// ==================== Canonical form ====================

#[test]
fn canonical_text_reparses_equivalently() {
    let a = parsed("9, 'a b', LIMIT, 10, 'it\\'s'");
    let text = a.to_string();
    assert_eq!(text, "9, 10, 'a b', 'it\\'s', LIMIT");
    assert_eq!(parsed(&text), a);
}
