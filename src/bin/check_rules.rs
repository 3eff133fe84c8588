//! Check rule text files: one rule string per line, as written in field annotations.
//!
//! Usage:
//!   check_rules [OPTIONS] [FILE ...]
//!   check_rules < rules.txt
//!
//! Options:
//!   --human, -H            Findings grouped per source, with per-source counts
//!   --const NAME=VALUE     Register a constant before checking (repeatable).
//!                          All-digit values are integer constants, others strings.
//!
//! Validators are the built-in ones. Exit code 1 if any error-level findings.

use anyhow::{bail, Context};
use fieldrules::check::{check_rules, CheckMessage, Severity};
use fieldrules::Registry;
use std::io::{self, Read};
use std::path::Path;

/// Finding counts for one source or for the whole run.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    errors: usize,
    warnings: usize,
}

impl Tally {
    fn of(messages: &[CheckMessage]) -> Self {
        let errors = messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .count();
        Tally {
            errors,
            warnings: messages.len() - errors,
        }
    }

    fn add(&mut self, other: Tally) {
        self.errors += other.errors;
        self.warnings += other.warnings;
    }

    fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }
}

/// `--human` groups findings under a per-source header; the default is one
/// `path:line:col: severity: message [rule]` line per finding.
fn report(path: &str, messages: &[CheckMessage], human: bool) -> Tally {
    let tally = Tally::of(messages);
    if human {
        if tally.is_clean() {
            println!("{}: ok", path);
            return tally;
        }
        println!(
            "{}: {} error(s), {} warning(s)",
            path, tally.errors, tally.warnings
        );
    }
    for m in messages {
        let severity = match m.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if human {
            println!(
                "  {:>4}:{:<3} {:<7} {} [{}]",
                m.line,
                m.column,
                severity,
                m.message,
                m.rule.id()
            );
        } else {
            println!(
                "{}:{}:{}: {}: {} [{}]",
                path,
                m.line,
                m.column,
                severity,
                m.message,
                m.rule.id()
            );
        }
    }
    tally
}

fn register_const(registry: &Registry, assignment: &str) -> anyhow::Result<()> {
    let Some((name, value)) = assignment.split_once('=') else {
        bail!("--const expects NAME=VALUE, got {:?}", assignment);
    };
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        let n: u64 = value
            .parse()
            .with_context(|| format!("constant {} out of range", name))?;
        registry.register_constant_int(name, n)?;
    } else {
        registry.register_constant_str(name, value)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut human = false;
    let registry = Registry::new();
    let mut paths = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--human" | "-H" => human = true,
            "--const" => {
                let assignment = args.next().context("--const needs NAME=VALUE")?;
                register_const(&registry, &assignment)?;
            }
            _ => match arg.strip_prefix("--const=") {
                Some(assignment) => register_const(&registry, assignment)?,
                None => paths.push(arg),
            },
        }
    }

    let mut sources = Vec::new();
    let mut unreadable = 0usize;
    if paths.is_empty() {
        let mut src = String::new();
        io::stdin().read_to_string(&mut src)?;
        sources.push(("<stdin>".to_string(), src));
    } else {
        for path in &paths {
            let path = Path::new(path);
            match std::fs::read_to_string(path) {
                Ok(s) => sources.push((path.display().to_string(), s)),
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    unreadable += 1;
                }
            }
        }
    }

    let mut total = Tally::default();
    let mut dirty = 0usize;
    for (display_path, src) in &sources {
        let tally = report(display_path, &check_rules(src, &registry), human);
        if !tally.is_clean() {
            dirty += 1;
        }
        total.add(tally);
    }

    if !total.is_clean() || human {
        eprintln!(
            "check: {} of {} source(s) with findings, {} error(s), {} warning(s)",
            dirty,
            sources.len(),
            total.errors,
            total.warnings
        );
    }
    if unreadable > 0 || total.errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
