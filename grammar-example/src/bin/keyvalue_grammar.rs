//! Settings-file grammar example.
//!
//! Tokenizes a small settings file with a text grammar, then reads the
//! token array with a second grammar.

use grammar_example::keyvalue::{parse_settings, tokenize};

const INPUT: &str = r#"# service settings
name = "demo"; retries = 3
verbose = true

threshold = -40
"#;

fn main() {
    println!("Input:\n{INPUT}");

    match tokenize(INPUT) {
        Ok(tokens) => println!("Tokens: {tokens:?}\n"),
        Err(error) => println!("Tokenizer error: {error}\n"),
    }

    match parse_settings(INPUT) {
        Ok(settings) => {
            println!("Settings:");
            for (key, setting) in &settings {
                println!("  {key} = {setting:?}");
            }
        }
        Err(error) => println!("Settings error: {error}"),
    }

    for broken in ["name = ;", "retries = 3 4", "title = \"unterminated"] {
        match parse_settings(broken) {
            Ok(settings) => println!("{broken:?} => {settings:?}"),
            Err(error) => println!("{broken:?} => {error}"),
        }
    }
}
