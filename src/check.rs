//! Checker for rule text: reports problems without compiling a record type.
//!
//! Input is one rule string per line (as it would appear in a field annotation). Blank
//! lines and lines starting with `#` are skipped.
//!
//! ## Rules
//!
//! - **rule-syntax** (error): the line is not a list of `name(args)` invocations.
//! - **unknown-validator** (error): no factory registered under the name.
//! - **argument-syntax** (error): the argument text does not lex.
//! - **unknown-constant** (error): a symbol is neither an integer nor a string constant.
//! - **ambiguous-constant** (warning): a symbol is both; the integer is used.
//! - **duplicate-rule** (warning): the same validator appears twice on one line.
//!
//! Field types are unknown here, so type and arity problems only show up at registration.

use crate::args::parse_arguments_with_symbol_offsets;
use crate::registry::Registry;
use crate::rules::parse_rules;
use std::collections::HashSet;

/// Severity of a check finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Identifies which rule produced the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckRule {
    RuleSyntax,
    UnknownValidator,
    ArgumentSyntax,
    UnknownConstant,
    AmbiguousConstant,
    DuplicateRule,
}

impl CheckRule {
    pub fn id(self) -> &'static str {
        match self {
            CheckRule::RuleSyntax => "rule-syntax",
            CheckRule::UnknownValidator => "unknown-validator",
            CheckRule::ArgumentSyntax => "argument-syntax",
            CheckRule::UnknownConstant => "unknown-constant",
            CheckRule::AmbiguousConstant => "ambiguous-constant",
            CheckRule::DuplicateRule => "duplicate-rule",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            CheckRule::AmbiguousConstant | CheckRule::DuplicateRule => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A single finding with a 1-based line and (character) column.
#[derive(Debug, Clone)]
pub struct CheckMessage {
    pub line: usize,
    pub column: usize,
    pub rule: CheckRule,
    pub severity: Severity,
    pub message: String,
}

/// Check every rule line in `source` against `registry`. Returns messages in line order.
pub fn check_rules(source: &str, registry: &Registry) -> Vec<CheckMessage> {
    let mut out = Vec::new();

    for (i, line) in source.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut report = |offset: usize, rule: CheckRule, message: String| {
            out.push(CheckMessage {
                line: i + 1,
                column: column_at(line, offset),
                rule,
                severity: rule.severity(),
                message,
            });
        };

        let invocations = match parse_rules(line) {
            Ok(v) => v,
            Err(e) => {
                report(e.offset, CheckRule::RuleSyntax, e.message);
                continue;
            }
        };

        let mut seen = HashSet::new();
        for inv in &invocations {
            if !seen.insert(inv.name.as_str()) {
                report(
                    inv.offset,
                    CheckRule::DuplicateRule,
                    format!("{} appears more than once", inv.name),
                );
            }
            if registry.lookup_validator(&inv.name).is_none() {
                report(
                    inv.offset,
                    CheckRule::UnknownValidator,
                    format!("unknown validator: {}", inv.name),
                );
            }
            let (arguments, symbol_offsets) =
                match parse_arguments_with_symbol_offsets(&inv.arguments) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        report(
                            inv.arguments_offset + e.offset,
                            CheckRule::ArgumentSyntax,
                            e.kind.to_string(),
                        );
                        continue;
                    }
                };
            for (symbol, offset) in arguments.symbols.iter().zip(symbol_offsets) {
                let offset = inv.arguments_offset + offset;
                if registry.lookup_constant(symbol).is_none() {
                    report(
                        offset,
                        CheckRule::UnknownConstant,
                        format!("unknown constant: {}", symbol),
                    );
                } else if registry.is_ambiguous_constant(symbol) {
                    report(
                        offset,
                        CheckRule::AmbiguousConstant,
                        format!("{} is both an integer and a string constant; the integer is used", symbol),
                    );
                }
            }
        }
    }

    out
}

fn column_at(line: &str, offset: usize) -> usize {
    line.get(..offset)
        .map_or(offset, |prefix| prefix.chars().count())
        + 1
}
