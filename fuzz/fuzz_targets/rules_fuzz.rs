//! Rule text fuzz target: feed arbitrary bytes to the invocation splitter and argument lexer.
//! Neither may panic; both return Ok or a positioned error.
//! Build with: cargo fuzz run rules_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    if let Ok(args) = fieldrules::parse_arguments(s) {
        // Canonical text must lex back to the same arguments.
        let again = fieldrules::parse_arguments(&args.to_string()).ok();
        assert_eq!(again.as_ref(), Some(&args));
    }
    if let Ok(invocations) = fieldrules::parse_rules(s) {
        for inv in invocations {
            let _ = fieldrules::parse_arguments(&inv.arguments);
        }
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run rules_fuzz");
}
