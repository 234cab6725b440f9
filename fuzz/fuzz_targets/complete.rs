#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use assist_parser::ParseMode;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    source: String,
    cursor: usize,
    diet: bool,
}

fuzz_target!(|input: FuzzInput| {
    let mode = if input.diet { ParseMode::Diet } else { ParseMode::Method };
    let cursor = input.cursor % (input.source.len() + 2);
    // Any buffer and cursor must yield a tree or a cursor error.
    if let Ok(result) = assist_parser::complete(&input.source, cursor, mode) {
        let _ = result.render();
    }
});
