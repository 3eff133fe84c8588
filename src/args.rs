//! Argument lexer: turns the text between a rule's parentheses into typed argument lists.
//!
//! ## Tokens
//!
//! Tokens are separated by commas and/or whitespace (any number, in any mix).
//!
//! - `123`: decimal integer, no sign; overflow wraps like native `u64` arithmetic
//! - `'text'`: quoted string; `\` makes the next printable character literal (`'\''`, `'\\'`)
//! - `MAX_LEN`: symbolic constant `[A-Z][A-Z0-9_]*`, resolved later against the constant table
//!
//! ## Automaton
//!
//! | State | Input | Next |
//! |-------|-------|------|
//! | `Init` | digit / `A-Z` / `'` / separator | `Integer` / `Symbol` / `QuotedString` / `Init` |
//! | `Integer` | digit / separator | `Integer` / `Init` (emit) |
//! | `Symbol` | `A-Z0-9_` / separator | `Symbol` / `Init` (emit) |
//! | `QuotedString` | `'` / `\` / printable | `Init` (emit) / `Escape` / `QuotedString` |
//! | `Escape` | printable | `QuotedString` |
//!
//! Any other input is a [`SyntaxError`]. End of input emits a pending integer or symbol and
//! rejects an open string. There is no recovery and no partial result.

use std::fmt;
use unicode_general_category::{get_general_category, GeneralCategory};

const QUOTE: char = '\'';
const ESCAPE: char = '\\';
const SEPARATOR: char = ',';
const SYMBOL_JOINER: char = '_';

/// Parsed arguments of one rule invocation, each list in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    pub strings: Vec<String>,
    pub integers: Vec<u64>,
    /// Constant names, still unresolved.
    pub symbols: Vec<String>,
}

impl Arguments {
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty() && self.integers.is_empty() && self.symbols.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strings.len() + self.integers.len() + self.symbols.len()
    }
}

/// Canonical argument text: integers, then strings (escaped), then symbols.
/// Parsing the output yields the same lists.
impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            if !std::mem::take(&mut first) {
                f.write_str(", ")?;
            }
            Ok(())
        };
        for i in &self.integers {
            sep(f)?;
            write!(f, "{}", i)?;
        }
        for s in &self.strings {
            sep(f)?;
            f.write_str("'")?;
            for c in s.chars() {
                if c == QUOTE || c == ESCAPE {
                    write!(f, "{}", ESCAPE)?;
                }
                write!(f, "{}", c)?;
            }
            f.write_str("'")?;
        }
        for s in &self.symbols {
            sep(f)?;
            f.write_str(s)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid validator syntax at offset {offset}: {kind}")]
pub struct SyntaxError {
    /// Byte offset of the offending character (input length for an unterminated string).
    pub offset: usize,
    pub kind: SyntaxErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("non-printable character {0:?}")]
    NonPrintable(char),
    #[error("unterminated string")]
    UnterminatedString,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum State {
    #[default]
    Init,
    Integer,
    Symbol,
    QuotedString,
    Escape,
}

/// Parse one invocation's argument text.
pub fn parse_arguments(text: &str) -> Result<Arguments, SyntaxError> {
    parse_arguments_with_symbol_offsets(text).map(|(arguments, _)| arguments)
}

/// Like [`parse_arguments`], also returning the byte offset of each symbol
/// (parallel to `symbols`).
pub fn parse_arguments_with_symbol_offsets(
    text: &str,
) -> Result<(Arguments, Vec<usize>), SyntaxError> {
    let mut lexer = Lexer::default();
    for (offset, c) in text.char_indices() {
        lexer.step(offset, c).map_err(|kind| SyntaxError { offset, kind })?;
    }
    lexer.finish(text.len())
}

#[derive(Default)]
struct Lexer {
    state: State,
    int: u64,
    buf: String,
    out: Arguments,
    symbol_offsets: Vec<usize>,
}

impl Lexer {
    fn step(&mut self, offset: usize, c: char) -> Result<(), SyntaxErrorKind> {
        match self.state {
            State::Init => self.on_init(offset, c),
            State::Integer => self.on_integer(c),
            State::Symbol => self.on_symbol(c),
            State::QuotedString => self.on_string(c),
            State::Escape => self.on_escape(c),
        }
    }

    fn on_init(&mut self, offset: usize, c: char) -> Result<(), SyntaxErrorKind> {
        if let Some(d) = c.to_digit(10) {
            self.int = u64::from(d);
            self.state = State::Integer;
        } else if c.is_ascii_uppercase() {
            self.symbol_offsets.push(offset);
            self.buf.push(c);
            self.state = State::Symbol;
        } else if c == QUOTE {
            self.state = State::QuotedString;
        } else if !is_separator(c) {
            return Err(unexpected(c));
        }
        Ok(())
    }

    fn on_integer(&mut self, c: char) -> Result<(), SyntaxErrorKind> {
        if let Some(d) = c.to_digit(10) {
            self.int = self.int.wrapping_mul(10).wrapping_add(u64::from(d));
        } else if is_separator(c) {
            self.out.integers.push(self.int);
            self.state = State::Init;
        } else {
            return Err(unexpected(c));
        }
        Ok(())
    }

    fn on_symbol(&mut self, c: char) -> Result<(), SyntaxErrorKind> {
        if c.is_ascii_uppercase() || c.is_ascii_digit() || c == SYMBOL_JOINER {
            self.buf.push(c);
        } else if is_separator(c) {
            self.out.symbols.push(std::mem::take(&mut self.buf));
            self.state = State::Init;
        } else {
            return Err(unexpected(c));
        }
        Ok(())
    }

    fn on_string(&mut self, c: char) -> Result<(), SyntaxErrorKind> {
        if c == QUOTE {
            self.out.strings.push(std::mem::take(&mut self.buf));
            self.state = State::Init;
        } else if c == ESCAPE {
            self.state = State::Escape;
        } else if is_printable(c) {
            self.buf.push(c);
        } else {
            return Err(SyntaxErrorKind::NonPrintable(c));
        }
        Ok(())
    }

    fn on_escape(&mut self, c: char) -> Result<(), SyntaxErrorKind> {
        if !is_printable(c) {
            return Err(SyntaxErrorKind::NonPrintable(c));
        }
        self.buf.push(c);
        self.state = State::QuotedString;
        Ok(())
    }

    fn finish(mut self, len: usize) -> Result<(Arguments, Vec<usize>), SyntaxError> {
        match self.state {
            State::Init => {}
            State::Integer => self.out.integers.push(self.int),
            State::Symbol => self.out.symbols.push(self.buf),
            State::QuotedString | State::Escape => {
                return Err(SyntaxError {
                    offset: len,
                    kind: SyntaxErrorKind::UnterminatedString,
                })
            }
        }
        Ok((self.out, self.symbol_offsets))
    }
}

fn is_separator(c: char) -> bool {
    c == SEPARATOR || c.is_whitespace()
}

/// Letters, marks, numbers, punctuation and symbols, plus the ASCII space. Controls,
/// format characters, private-use and unassigned code points, and any other spacing
/// are not printable.
fn is_printable(c: char) -> bool {
    use GeneralCategory::*;
    c == ' '
        || matches!(
            get_general_category(c),
            UppercaseLetter
                | LowercaseLetter
                | TitlecaseLetter
                | ModifierLetter
                | OtherLetter
                | NonspacingMark
                | SpacingMark
                | EnclosingMark
                | DecimalNumber
                | LetterNumber
                | OtherNumber
                | ConnectorPunctuation
                | DashPunctuation
                | OpenPunctuation
                | ClosePunctuation
                | InitialPunctuation
                | FinalPunctuation
                | OtherPunctuation
                | MathSymbol
                | CurrencySymbol
                | ModifierSymbol
                | OtherSymbol
        )
}

fn unexpected(c: char) -> SyntaxErrorKind {
    if is_printable(c) {
        SyntaxErrorKind::UnexpectedChar(c)
    } else {
        SyntaxErrorKind::NonPrintable(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_tokens_keep_source_order_per_list() {
        let a = parse_arguments("INT_MAX, 123, 'hello', 7 B").unwrap();
        assert_eq!(a.integers, vec![123, 7]);
        assert_eq!(a.strings, vec!["hello"]);
        assert_eq!(a.symbols, vec!["INT_MAX", "B"]);
        assert_eq!(a.len(), 5);
    }

    #[test]
    fn empty_and_separator_only_input() {
        assert!(parse_arguments("").unwrap().is_empty());
        assert!(parse_arguments(" ,, \t, ").unwrap().is_empty());
    }

    #[test]
    fn integer_overflow_wraps() {
        // 2^64 + 5
        let a = parse_arguments("18446744073709551621").unwrap();
        assert_eq!(a.integers, vec![5]);
    }

    #[test]
    fn escape_keeps_backslash_and_quote() {
        let a = parse_arguments(r"'a\\b', '\'' ").unwrap();
        assert_eq!(a.strings, vec![r"a\b", "'"]);
    }

    #[test]
    fn separators_inside_strings_are_literal() {
        let a = parse_arguments("'a, b', 'c d'").unwrap();
        assert_eq!(a.strings, vec!["a, b", "c d"]);
    }

    #[test]
    fn tokens_must_be_separated() {
        assert!(parse_arguments("12AB").is_err());
        assert!(parse_arguments("AB'x'").is_err());
    }

    #[test]
    fn error_reports_offset_and_kind() {
        let e = parse_arguments("1, 2x").unwrap_err();
        assert_eq!(e.offset, 4);
        assert_eq!(e.kind, SyntaxErrorKind::UnexpectedChar('x'));

        let e = parse_arguments("'ab").unwrap_err();
        assert_eq!(e.offset, 3);
        assert_eq!(e.kind, SyntaxErrorKind::UnterminatedString);

        let e = parse_arguments("'a\\").unwrap_err();
        assert_eq!(e.kind, SyntaxErrorKind::UnterminatedString);

        let e = parse_arguments("'a\tb'").unwrap_err();
        assert_eq!(e.kind, SyntaxErrorKind::NonPrintable('\t'));
    }

    #[test]
    fn non_ascii_digits_and_letters_rejected() {
        assert!(parse_arguments("\u{0663}").is_err());
        assert!(parse_arguments("\u{00C9}T").is_err());
    }

    #[test]
    fn non_ascii_printable_allowed_in_strings() {
        let a = parse_arguments("'héllo wörld'").unwrap();
        assert_eq!(a.strings, vec!["héllo wörld"]);
    }

    #[test]
    fn format_private_use_and_unassigned_are_not_printable() {
        for c in ['\u{200B}', '\u{00AD}', '\u{FEFF}', '\u{E000}', '\u{0378}', '\u{2028}', '\u{00A0}'] {
            assert!(!is_printable(c), "{:?}", c);
        }
        for c in ['a', 'É', '\u{0301}', '7', '!', '€', '→', ' '] {
            assert!(is_printable(c), "{:?}", c);
        }
    }

    #[test]
    fn symbol_offsets_follow_symbols() {
        let (a, offsets) = parse_arguments_with_symbol_offsets("1, MAX, 'A B', MIN_2").unwrap();
        assert_eq!(a.symbols, vec!["MAX", "MIN_2"]);
        assert_eq!(offsets, vec![3, 15]);
    }

    #[test]
    fn display_reparses_to_same_lists() {
        for src in [
            "1, 22, 333",
            "'plain', 'with \\'quote\\'', 'back\\\\slash'",
            "MAX, 'x', 9, MIN_2",
            "",
        ] {
            let a = parse_arguments(src).unwrap();
            let b = parse_arguments(&a.to_string()).unwrap();
            assert_eq!(a, b, "source {:?} rendered as {:?}", src, a.to_string());
        }
    }
}
