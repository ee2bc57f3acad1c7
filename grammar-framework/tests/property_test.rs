use grammar_framework::{
    alt, MatchResult, Parser, Rule, Selector, Stream, TextSource, Value,
};
use proptest::prelude::*;

type V = Value<TextSource>;

fn lit(pattern: &str) -> Rule<TextSource, V> {
    Rule::from(pattern)
}

proptest! {
    #[test]
    fn verbatim_prefix_advances_by_its_length(prefix in "[a-z]{1,8}", rest in "[a-z0-9]{0,8}") {
        let input = format!("{prefix}{rest}");
        let mut stream = Stream::new(TextSource::new(input.as_str()));
        let result = lit(&prefix).matches(&mut stream).unwrap();
        prop_assert_eq!(result, MatchResult::Value(Value::Slice(prefix.as_str().into())));
        prop_assert_eq!(stream.position(), prefix.chars().count());
    }

    #[test]
    fn lookahead_never_moves_the_cursor(pattern in "[ab]{1,3}", input in "[ab]{0,6}") {
        for rule in [lit(&pattern).positive(), lit(&pattern).negative()] {
            let mut stream = Stream::new(TextSource::new(input.as_str()));
            let result = stream.speculate(|stream| rule.matches(stream)).unwrap();
            prop_assert_eq!(stream.position(), 0);
            prop_assert!(!matches!(result, MatchResult::Value(_)));
        }
    }

    #[test]
    fn positive_and_negative_disagree(pattern in "[ab]{1,3}", input in "[ab]{0,6}") {
        let mut stream = Stream::new(TextSource::new(input.as_str()));
        let positive = stream.speculate(|stream| lit(&pattern).positive().matches(stream)).unwrap();
        let negative = stream.speculate(|stream| lit(&pattern).negative().matches(stream)).unwrap();
        prop_assert_ne!(positive.is_match(), negative.is_match());
        prop_assert_eq!(positive.is_match(), input.starts_with(pattern.as_str()));
    }

    #[test]
    fn failed_speculation_restores_the_cursor(skip in 0usize..4, input in "[a-c]{4,10}") {
        let mut stream = Stream::new(TextSource::new(input.as_str()));
        stream.read(&Selector::Length(skip));
        let result = stream
            .speculate(|stream| {
                stream.read(&Selector::Length(3));
                Ok(MatchResult::<V>::NoMatch)
            })
            .unwrap();
        prop_assert_eq!(result, MatchResult::NoMatch);
        prop_assert_eq!(stream.position(), skip);
    }

    #[test]
    fn parsing_is_deterministic(input in "[ab]{0,10}") {
        let rule = alt([lit("ab"), lit("a"), lit("b")]).many();
        let parser = Parser::new(rule);
        let first = parser.parse(input.as_str()).unwrap();
        let second = parser.parse(input.as_str()).unwrap();
        prop_assert_eq!(first.clone(), second);
        let text = first.into_value().map(|value| value.to_text()).unwrap_or_default();
        prop_assert_eq!(text, input);
    }

    #[test]
    fn reads_are_clamped_to_the_input(length in 0usize..20, input in "[a-z]{0,10}") {
        let mut stream = Stream::new(TextSource::new(input.as_str()));
        stream.read(&Selector::Length(length));
        prop_assert_eq!(stream.position(), length.min(input.len()));
    }
}
