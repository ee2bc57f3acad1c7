use grammar_framework::{
    Error, Item, MatchResult, Position, Selector, Stream, TextSlice, TextSource, TokenSource,
};

type Outcome = grammar_framework::Result<MatchResult<()>>;

fn text(input: &str) -> Stream<TextSource> {
    Stream::new(TextSource::new(input))
}

fn slice(text: &str) -> Item<TextSource> {
    Item::Slice(TextSlice::from(text))
}

#[test]
fn test_read_single_element() {
    let mut stream = text("ab");
    assert_eq!(stream.read(&Selector::Element), Some(Item::Element('a')));
    assert_eq!(stream.position(), 1);
    assert_eq!(stream.peek(), Some('b'));
}

#[test]
fn test_read_fixed_length() {
    let mut stream = text("hello");
    assert_eq!(stream.read(&Selector::Length(3)), Some(slice("hel")));
    assert_eq!(stream.position(), 3);
}

#[test]
fn test_read_fixed_length_clamps_at_end() {
    let mut stream = text("hi");
    assert_eq!(stream.read(&Selector::Length(5)), Some(slice("hi")));
    assert!(stream.is_eof());
}

#[test]
fn test_read_until_includes_terminator() {
    let mut stream = text("key=value;rest");
    let until = Selector::Until(TextSlice::from(";"));
    assert_eq!(stream.read(&until), Some(slice("key=value;")));
    assert_eq!(stream.position(), 10);
}

#[test]
fn test_read_until_missing_terminator_reads_rest() {
    let mut stream = text("abc");
    assert_eq!(stream.read(&Selector::Until(TextSlice::from("|"))), Some(slice("abc")));
    assert!(stream.is_eof());
}

#[test]
fn test_read_at_end_of_input() {
    let mut stream = text("");
    assert_eq!(stream.read(&Selector::Element), None);
    assert_eq!(stream.read(&Selector::Length(2)), None);
    assert_eq!(stream.reads(), 0);
}

#[test]
fn test_reads_are_counted() {
    let mut stream = text("abcd");
    stream.read(&Selector::Element);
    stream.read(&Selector::Length(2));
    assert_eq!(stream.reads(), 2);
}

#[test]
fn test_speculate_rewinds_on_no_match() {
    let mut stream = text("abc");
    let outcome: Outcome = stream.speculate(|stream| {
        assert!(stream.has_open_speculation());
        stream.read(&Selector::Length(2));
        Ok(MatchResult::NoMatch)
    });
    assert_eq!(outcome, Ok(MatchResult::NoMatch));
    assert_eq!(stream.position(), 0);
    assert!(!stream.has_open_speculation());
}

#[test]
fn test_speculate_keeps_position_on_match() {
    let mut stream = text("abc");
    let outcome: Outcome = stream.speculate(|stream| {
        stream.read(&Selector::Length(2));
        Ok(MatchResult::Empty)
    });
    assert_eq!(outcome, Ok(MatchResult::Empty));
    assert_eq!(stream.position(), 2);
}

#[test]
fn test_nested_speculation_restores_outer_region() {
    let mut stream = text("abcd");
    let outcome: Outcome = stream.speculate(|stream| {
        stream.read(&Selector::Element);
        let inner: Outcome = stream.speculate(|stream| {
            stream.read(&Selector::Element);
            Ok(MatchResult::NoMatch)
        });
        assert_eq!(inner, Ok(MatchResult::NoMatch));
        assert_eq!(stream.position(), 1);
        assert!(stream.has_open_speculation());
        Ok(MatchResult::NoMatch)
    });
    assert_eq!(outcome, Ok(MatchResult::NoMatch));
    assert_eq!(stream.position(), 0);
}

#[test]
fn test_recovered_error_closes_the_region() {
    let mut stream = text("abc");
    let outcome: Outcome = stream.speculate(|stream| {
        stream.read(&Selector::Element);
        stream.flush();
        let inner: Outcome = stream.speculate(|stream| {
            stream.read(&Selector::Element);
            Err(Error::PassRedefined)
        });
        assert_eq!(inner, Err(Error::PassRedefined));
        assert_eq!(stream.position(), 2);
        assert!(!stream.has_open_speculation());
        Ok(MatchResult::Empty)
    });
    assert_eq!(outcome, Ok(MatchResult::Empty));
    assert!(!stream.has_open_speculation());
}

#[test]
fn test_rewind_past_flush_is_fatal() {
    let mut stream = text("abc");
    let outcome: Outcome = stream.speculate(|stream| {
        stream.read(&Selector::Length(2));
        stream.flush();
        assert!(!stream.has_open_speculation());
        Ok(MatchResult::NoMatch)
    });
    assert_eq!(
        outcome,
        Err(Error::RewindPastFlush {
            start: 0,
            position: 2
        })
    );
}

#[test]
fn test_flush_commits_enclosing_regions() {
    let mut stream = text("abc");
    let outcome: Outcome = stream.speculate(|stream| {
        stream.read(&Selector::Element);
        let inner: Outcome = stream.speculate(|stream| {
            stream.read(&Selector::Element);
            stream.flush();
            Ok(MatchResult::Empty)
        });
        assert_eq!(inner, Ok(MatchResult::Empty));
        assert!(!stream.has_open_speculation());
        Ok(MatchResult::NoMatch)
    });
    assert!(matches!(outcome, Err(Error::RewindPastFlush { start: 0, .. })));
}

#[test]
fn test_region_opened_after_flush_rewinds_to_its_own_start() {
    let mut stream = text("abc");
    let outcome: Outcome = stream.speculate(|stream| {
        stream.read(&Selector::Element);
        stream.flush();
        let inner: Outcome = stream.speculate(|stream| {
            stream.read(&Selector::Element);
            Ok(MatchResult::NoMatch)
        });
        assert_eq!(inner, Ok(MatchResult::NoMatch));
        assert_eq!(stream.position(), 1);
        assert!(!stream.has_open_speculation());
        Ok(MatchResult::Empty)
    });
    assert_eq!(outcome, Ok(MatchResult::Empty));
    assert_eq!(stream.position(), 1);
}

#[test]
fn test_hard_error_propagates_without_rewinding() {
    let mut stream = text("abc");
    let outcome: Outcome = stream.speculate(|stream| {
        stream.read(&Selector::Element);
        Err(Error::PassRedefined)
    });
    assert_eq!(outcome, Err(Error::PassRedefined));
    assert_eq!(stream.position(), 1);
}

#[test]
fn test_reject_is_soft_only_under_speculation() {
    let mut stream = text("abc");
    let hard: Outcome = stream.reject(0, || (Some("'a'".into()), Some("'z'".into())));
    let error = hard.unwrap_err();
    let syntax = error.as_syntax().unwrap();
    assert_eq!(syntax.index, 0);
    assert_eq!(syntax.found.as_deref(), Some("'a'"));

    let soft: Outcome = stream.speculate(|stream| stream.reject(0, || (None, None)));
    assert_eq!(soft, Ok(MatchResult::NoMatch));
}

#[test]
fn test_text_location() {
    let mut stream = text("ab\ncd");
    stream.read(&Selector::Length(3));
    assert_eq!(stream.location(), "line 2, column 1 (index 3)");
    assert_eq!(stream.location_position(), Position::at(2, 1, 3));
}

#[test]
fn test_token_stream() {
    let mut stream = Stream::new(TokenSource::new(vec![10, 20, 30]));
    assert_eq!(stream.read(&Selector::Element), Some(Item::Element(10)));
    assert_eq!(stream.read(&Selector::Length(5)), Some(Item::Slice(vec![20, 30])));
    assert_eq!(stream.location(), "index 3 of 3");
}

#[test]
fn test_checkpoint_records_floor() {
    let mut stream = text("abc");
    assert_eq!(stream.checkpoint().floor(), None);
    let _: Outcome = stream.speculate(|stream| {
        stream.read(&Selector::Element);
        let checkpoint = stream.checkpoint();
        assert_eq!(checkpoint.index(), 1);
        assert_eq!(checkpoint.floor(), Some(0));
        Ok(MatchResult::Empty)
    });
}
