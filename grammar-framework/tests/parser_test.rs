//! End-to-end use of the builder and the parser.

use grammar_framework::{
    alt, any, eof, nulls, seq, term, Atom, Error, MatchResult, Parser, Rule, Set, Stream,
    TextSource, TokenSource, Value,
};
use std::thread;

type V = Value<TextSource>;

fn lit(pattern: &str) -> Rule<TextSource, V> {
    Rule::from(pattern)
}

fn digit() -> Rule<TextSource, V> {
    term('0'..='9')
}

fn letter() -> Rule<TextSource, V> {
    Rule::new(Atom::class("a letter", char::is_alphabetic))
}

#[test]
fn test_add_flattens_sequences() {
    let rule = lit("a") + "b" + 'c';
    let items = rule.term().sequence_items().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(
        Parser::new(rule).parse("abc").unwrap().into_value().unwrap().to_text(),
        "abc"
    );
}

#[test]
fn test_add_keeps_nested_sequence_on_the_right() {
    let rule = lit("a") + (lit("b") + "c");
    let items = rule.term().sequence_items().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items[1].term().sequence_items().is_some());
}

#[test]
fn test_bitor_flattens_alternations() {
    let rule = lit("a") | "b" | "c";
    assert_eq!(rule.term().alternatives().unwrap().len(), 3);
    let parser = Parser::new(rule);
    assert_eq!(
        parser.parse("c").unwrap(),
        MatchResult::Value(Value::Slice("c".into()))
    );
}

#[test]
fn test_str_on_the_left() {
    let rule: Rule<TextSource, V> = "x" + digit();
    assert_eq!(rule.term().sequence_items().unwrap().len(), 2);
    let rule: Rule<TextSource, V> = "x" | digit();
    assert_eq!(rule.term().alternatives().unwrap().len(), 2);
}

#[test]
fn test_mul_and_not() {
    let rule = digit() * (1..) + !lit(".");
    let parser = Parser::new(rule);
    assert_eq!(
        parser.parse("123x").unwrap().into_value().unwrap().to_text(),
        "123"
    );
    assert!(parser.parse("12.5").is_err());
}

#[test]
fn test_rule_handles_share_terms() {
    let rule = lit("a");
    let copy = rule.clone();
    assert!(rule.ptr_eq(&copy));
    assert!(!rule.ptr_eq(&lit("a")));
}

#[test]
fn test_map_and_filter_map() {
    let upper = lit("abc").map(|value| Value::Slice(value.to_text().to_uppercase().into()));
    let mut stream = Stream::new(TextSource::new("abc"));
    assert_eq!(
        upper.matches(&mut stream).unwrap(),
        MatchResult::Value(Value::Slice("ABC".into()))
    );

    let small = digit().filter_map(|value| (value.to_text().as_str() < "5").then_some(value));
    let parser = Parser::new(alt([small, lit("9")]));
    assert!(parser.parse("3").unwrap().is_match());
    assert!(parser.parse("9").unwrap().is_match());
    assert!(parser.parse("7").is_err());
}

#[test]
fn test_optional_and_nulls() {
    let signed = seq([lit("-").optional(), digit()]);
    let parser = Parser::new(signed);
    assert_eq!(
        parser.parse("-4").unwrap().into_value().unwrap().to_text(),
        "-4"
    );
    assert_eq!(parser.parse("4").unwrap().into_value().unwrap().to_text(), "4");

    let parser = Parser::new(nulls::<TextSource, V>());
    assert_eq!(parser.parse("").unwrap(), MatchResult::Value(Value::List(vec![])));
}

#[test]
fn test_parse_leaves_trailing_input() {
    let parser = Parser::new(digit().many1());
    assert!(parser.parse("12ab").unwrap().is_match());
}

#[test]
fn test_parse_complete_rejects_trailing_input() {
    let parser = Parser::new(digit().many1());
    assert!(parser.parse_complete("12").unwrap().is_match());

    let error = parser.parse_complete("12ab").unwrap_err();
    let syntax = error.as_syntax().unwrap();
    assert_eq!(syntax.index, 2);
    assert_eq!(syntax.expected.as_deref(), Some("end of input"));
    assert_eq!(syntax.found.as_deref(), Some("'a'"));
}

#[test]
fn test_parse_error_message() {
    let parser = Parser::new(lit("let") + " " + letter());
    let error = parser.parse("let\n").unwrap_err();
    assert_eq!(
        error.to_string(),
        "syntax error, found \"\\n\", expected \" \", at line 1, column 4 (index 3)"
    );
}

#[test]
fn test_parse_all_collects_each_match() {
    let space = Rule::new(Set::<TextSource, V>::chars(" \t"));
    let word = space.many() + letter().many1();
    let parser = Parser::new(word.map(|value| Value::Slice(value.to_text().trim().into())));
    let words: Vec<String> = parser
        .parse_all("one two  three")
        .unwrap()
        .iter()
        .map(V::to_text)
        .collect();
    assert_eq!(words, vec!["one", "two", "three"]);
}

#[test]
fn test_parse_all_stops_without_progress() {
    let parser = Parser::new(digit().many());
    let values = parser.parse_all("12ab").unwrap();
    assert_eq!(values.len(), 1);
}

#[test]
fn test_parse_all_reports_errors() {
    let parser = Parser::new(digit() + ";");
    assert!(parser.parse_all("1;2;3").is_err());
    assert_eq!(parser.parse_all("1;2;").unwrap().len(), 2);
}

#[test]
fn test_parser_is_reusable() {
    let parser = Parser::new(alt([lit("ab"), lit("a")]) + eof());
    for _ in 0..3 {
        assert_eq!(
            parser.parse("a").unwrap().into_value().unwrap().to_text(),
            "a"
        );
    }
    assert_eq!(parser.parse("ab").unwrap(), parser.parse("ab").unwrap());
}

#[test]
fn test_parser_across_threads() {
    let number = digit().many1();
    let list = number.clone() + (lit(",") + number).many();
    let parser = Parser::new(list);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let parser = &parser;
                scope.spawn(move || {
                    let input = format!("{n},{n}{n},{n}");
                    parser.parse_complete(input.as_str()).map(|result| {
                        result.into_value().map(|value| value.to_text())
                    })
                })
            })
            .collect();
        for (n, handle) in handles.into_iter().enumerate() {
            let text = handle.join().unwrap().unwrap().unwrap();
            assert_eq!(text, format!("{n},{n}{n},{n}"));
        }
    });
}

#[test]
fn test_grammar_over_tokens() {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Tok {
        Ident,
        Assign,
        Number,
        Semi,
    }
    type TV = Value<TokenSource<Tok>>;

    let token = |tok: Tok| Rule::new(Atom::<TokenSource<Tok>, TV>::element(format!("{tok:?}"), move |t| *t == tok));
    let statement = token(Tok::Ident) + token(Tok::Assign) + token(Tok::Number) + token(Tok::Semi);
    let parser = Parser::new(statement);

    let tokens = vec![Tok::Ident, Tok::Assign, Tok::Number, Tok::Semi];
    let values = parser.parse_all(tokens).unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].as_list().map(<[_]>::len), Some(4));

    let error = parser
        .parse(vec![Tok::Ident, Tok::Number])
        .unwrap_err();
    let syntax = error.as_syntax().unwrap();
    assert_eq!(syntax.expected.as_deref(), Some("Assign"));
    assert_eq!(syntax.found.as_deref(), Some("Number"));
    assert_eq!(syntax.location, "index 1 of 2");
}

#[test]
fn test_any_and_redefinition_error_text() {
    let parser = Parser::new(any::<TextSource, V>() * 2);
    assert_eq!(parser.parse("xyz").unwrap().into_value().unwrap().to_text(), "xy");
    assert_eq!(
        Error::PassRedefined.to_string(),
        "forward reference is already defined"
    );
}
