#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|code: &[u8]| {
    let Ok(text) = std::str::from_utf8(code) else { return };
    let Ok(tokens) = exparse::tokenize(text) else { return };
    let Ok(expr) = exparse::parse(&tokens) else { return };

    assert_eq!(expr.tokens(), tokens);
    assert_eq!(exparse::parse_str(&expr.to_string()).ok(), Some(expr));
});
