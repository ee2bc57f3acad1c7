//! Calculator grammar example.
//!
//! Evaluates a few expressions with the recursive calculator grammar and
//! shows the located errors produced for malformed input.

use grammar_example::calc::Calculator;

fn main() {
    let calculator = match Calculator::new() {
        Ok(calculator) => calculator,
        Err(error) => {
            eprintln!("failed to build the grammar: {error}");
            std::process::exit(1);
        }
    };

    let inputs = [
        "3 + 4",
        "3 + 4 * 5",
        "(1 + 2) * 3",
        "2 ^ 3 ^ 2",
        "-5 + 10 / 4",
        "1.5 * (2 - -2)",
        "1 + * 2",
        "8 / (4 - 4)",
        "(1 + 2",
    ];

    for input in inputs {
        println!("Input: {input}");
        match calculator.evaluate(input) {
            Ok(Some(value)) => println!("  = {value}"),
            Ok(None) => println!("  (no value)"),
            Err(error) => println!("  error: {error}"),
        }
    }
}
