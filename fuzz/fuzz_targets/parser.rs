#![no_main]

use libfuzzer_sys::fuzz_target;

// Whatever parses must print back to source that parses to the same tree
fuzz_target!(|source: &str| {
    if let Ok(program) = turtle::parse_str(source) {
        let printed = program.to_string();
        let reparsed = turtle::parse_str(&printed)
            .unwrap_or_else(|err| panic!("Printed program failed to parse: {}\n{}", err, printed));
        assert_eq!(program, reparsed, "{}", printed);
    }
});
