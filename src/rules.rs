//! Split a field's rule text into `name(args)` invocations using PEST.

use pest::error::InputLocation;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "rules.pest"]
struct RuleTextParser;

/// One `name(args)` occurrence in rule text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    /// Raw text between the parentheses, not yet lexed.
    pub arguments: String,
    /// Byte offset of `name` in the rule text.
    pub offset: usize,
    /// Byte offset of `arguments` in the rule text.
    pub arguments_offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid rule text at offset {offset}: {message}")]
pub struct RuleTextError {
    pub offset: usize,
    pub message: String,
}

/// Parse rule text into invocations, left to right. Empty text yields no invocations.
pub fn parse_rules(text: &str) -> Result<Vec<Invocation>, RuleTextError> {
    let pairs = RuleTextParser::parse(Rule::rule_list, text).map_err(|e| RuleTextError {
        offset: match e.location {
            InputLocation::Pos(p) => p,
            InputLocation::Span((start, _)) => start,
        },
        message: e.variant.message().into_owned(),
    })?;

    let mut invocations = Vec::new();
    for pair in pairs.flat_map(|p| p.into_inner()) {
        if pair.as_rule() != Rule::invocation {
            continue;
        }
        let offset = pair.as_span().start();
        let mut name = String::new();
        let mut arguments = String::new();
        let mut arguments_offset = offset;
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::name => name = inner.as_str().to_string(),
                Rule::arguments => {
                    arguments = inner.as_str().to_string();
                    arguments_offset = inner.as_span().start();
                }
                _ => {}
            }
        }
        invocations.push(Invocation {
            name,
            arguments,
            offset,
            arguments_offset,
        });
    }
    Ok(invocations)
}
