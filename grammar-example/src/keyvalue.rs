//! Settings-file grammar, in two stages.
//!
//! A tokenizer grammar over text turns
//!
//! ```text
//! # comment
//! name = "demo"; retries = 3
//! verbose = true
//! ```
//!
//! into a token array, and a settings grammar over [`TokenSource`] reads
//! `key = value` entries separated by `;` or newlines.

use grammar_framework::{
    alt, eof, flush, Any, Atom, Item, Lookup, MatchResult, MatchValue, Parser, Result, Rule,
    Selector, Set, TextSlice, TextSource, TokenSource,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Ident(String),
    Number(i64),
    Str(String),
    Equals,
    Semi,
    Newline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    Bool(bool),
    Number(i64),
    Text(String),
}

// ============================================================================
// Tokenizer (text -> tokens)
// ============================================================================

/// Values produced while tokenizing.
#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme {
    Text(String),
    Token(Token),
    List(Vec<Lexeme>),
}

impl MatchValue<TextSource> for Lexeme {
    fn from_item(item: Item<TextSource>) -> Self {
        match item {
            Item::Element(ch) => Lexeme::Text(ch.to_string()),
            Item::Slice(slice) => Lexeme::Text(slice.to_string()),
        }
    }

    fn from_list(values: Vec<Self>) -> Self {
        Lexeme::List(values)
    }
}

impl Lexeme {
    fn text(&self) -> String {
        match self {
            Lexeme::Text(text) => text.clone(),
            Lexeme::Token(_) => String::new(),
            Lexeme::List(values) => values.iter().map(Lexeme::text).collect(),
        }
    }
}

type LexRule = Rule<TextSource, Lexeme>;

fn skipped(rule: LexRule) -> LexRule {
    rule.qualify(|_| MatchResult::Empty)
}

fn identifier() -> LexRule {
    let start: LexRule = Rule::new(Atom::class("a letter", |ch| {
        ch.is_alphabetic() || ch == '_'
    }));
    let rest: LexRule = Rule::new(Atom::class("a letter or digit", |ch| {
        ch.is_alphanumeric() || ch == '_'
    }));
    (start + rest.many()).map(|value| Lexeme::Token(Token::Ident(value.text())))
}

fn number() -> LexRule {
    let digits = LexRule::from('0'..='9').many1();
    (LexRule::from("-").optional() + digits)
        .filter_map(|value| value.text().parse().ok().map(|n| Lexeme::Token(Token::Number(n))))
}

/// A double-quoted string without escapes. The read runs to the closing quote.
fn string() -> LexRule {
    let until_quote = Selector::Until(TextSlice::from("\""));
    let body: LexRule = Rule::new(Any::new().with_selector(until_quote));
    let string = LexRule::from("\"") + body;
    string.filter_map(|value| {
        let text = value.text();
        let content = text.strip_prefix('"')?.strip_suffix('"')?;
        Some(Lexeme::Token(Token::Str(content.to_string())))
    })
}

fn punctuation() -> LexRule {
    Rule::new(Lookup::translate([
        ('=', Lexeme::Token(Token::Equals)),
        (';', Lexeme::Token(Token::Semi)),
        ('\n', Lexeme::Token(Token::Newline)),
    ]))
}

fn comment() -> LexRule {
    let rest: LexRule = Rule::new(Atom::class("anything but a newline", |ch| ch != '\n'));
    skipped(LexRule::from("#") + rest.many())
}

/// One token, or a stretch of blanks or a comment (which yield nothing).
pub fn token_grammar() -> LexRule {
    let blanks = skipped(Rule::new(Set::chars(" \t\r")).many1());
    alt([blanks, comment(), punctuation(), string(), number(), identifier()])
}

/// Splits `input` into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let lexemes = Parser::new(token_grammar()).parse_all(input)?;
    Ok(lexemes
        .into_iter()
        .filter_map(|lexeme| match lexeme {
            Lexeme::Token(token) => Some(token),
            _ => None,
        })
        .collect())
}

// ============================================================================
// Settings grammar (tokens -> entries)
// ============================================================================

/// Values produced while reading settings.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Token(Token),
    Tokens(Vec<Token>),
    Setting(Setting),
    Pair(String, Setting),
    List(Vec<Entry>),
}

impl MatchValue<TokenSource<Token>> for Entry {
    fn from_item(item: Item<TokenSource<Token>>) -> Self {
        match item {
            Item::Element(token) => Entry::Token(token),
            Item::Slice(tokens) => Entry::Tokens(tokens),
        }
    }

    fn from_list(values: Vec<Self>) -> Self {
        Entry::List(values)
    }
}

type EntryRule = Rule<TokenSource<Token>, Entry>;

fn token(token: Token) -> EntryRule {
    let description = format!("{token:?}");
    Rule::new(Atom::element(description, move |t: &Token| *t == token))
        .qualify(|_| MatchResult::Empty)
}

fn key() -> EntryRule {
    Rule::new(Atom::element("a key", |t: &Token| matches!(t, Token::Ident(_))))
}

fn value() -> EntryRule {
    let boolean: EntryRule = Rule::new(Lookup::translate([
        (Token::Ident("true".into()), Entry::Setting(Setting::Bool(true))),
        (Token::Ident("false".into()), Entry::Setting(Setting::Bool(false))),
    ]));
    let scalar: EntryRule = Rule::new(Atom::element("a value", |t: &Token| {
        matches!(t, Token::Ident(_) | Token::Number(_) | Token::Str(_))
    }));
    let scalar = scalar.filter_map(|entry| match entry {
        Entry::Token(Token::Number(n)) => Some(Entry::Setting(Setting::Number(n))),
        Entry::Token(Token::Str(text) | Token::Ident(text)) => {
            Some(Entry::Setting(Setting::Text(text)))
        }
        _ => None,
    });
    alt([boolean, scalar])
}

/// `key = value` up to a separator or the end of input. Once `key =` is
/// read the entry is committed, so a bad value is reported where it is.
fn entry() -> EntryRule {
    let separator: EntryRule = Rule::new(Set::elements([Token::Semi, Token::Newline]));
    let end = alt([separator.qualify(|_| MatchResult::Empty), eof()]);
    (key() + token(Token::Equals) + flush() + value() + end).filter_map(|entry| match entry {
        Entry::List(parts) => match <[Entry; 2]>::try_from(parts) {
            Ok([Entry::Token(Token::Ident(key)), Entry::Setting(setting)]) => {
                Some(Entry::Pair(key, setting))
            }
            _ => None,
        },
        _ => None,
    })
}

/// Every entry of a file; blank lines are skipped.
pub fn settings_grammar() -> EntryRule {
    let blank = alt([token(Token::Newline), token(Token::Semi)]);
    alt([blank, entry()])
}

/// Reads a settings file. Later entries override earlier ones.
pub fn parse_settings(input: &str) -> Result<BTreeMap<String, Setting>> {
    let tokens = tokenize(input)?;
    let entries = Parser::new(settings_grammar()).parse_all(tokens)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Pair(key, setting) => Some((key, setting)),
            _ => None,
        })
        .collect())
}
