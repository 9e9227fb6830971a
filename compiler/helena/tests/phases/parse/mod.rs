//! Tokenizer and parser phase tests.

use helena::{
    parse, tokenize, Delimiter, MorphemeKind, ParseErrorKind, Parser, ParserOptions, Token,
    TokenKind,
};
use pretty_assertions::assert_eq;

use crate::common::parse_ok;

// === Tokenizer ===

#[test]
fn single_word_is_one_text_token() {
    let tokens = tokenize("word");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Text);
    assert_eq!(tokens[0].literal, "word");
}

#[test]
fn tokens_reproduce_the_source() {
    let source = "cmd \"a $b\" {c [d]}\\\n  e # note\n";
    let joined: String = tokenize(source).iter().map(|t| t.sequence.as_str()).collect();
    assert_eq!(joined, source);
}

#[test]
fn escapes_keep_sequence_and_literal_apart() {
    let tokens: Vec<Token> = tokenize("a\\tb");
    let escape = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Escape)
        .expect("escape token");
    assert_eq!(escape.sequence, "\\t");
    assert_eq!(escape.literal, "\t");
}

// === Structure ===

#[test]
fn tuple_word_structure() {
    let script = parse_ok("(word1 word2)");
    assert_eq!(script.sentences.len(), 1);
    let word = &script.sentences[0].words[0];
    let MorphemeKind::Tuple(inner) = &word.morphemes[0].kind else {
        panic!("expected a tuple morpheme");
    };
    assert_eq!(inner.sentences[0].words.len(), 2);
}

#[test]
fn sentences_split_on_newline_and_semicolon() {
    let script = parse_ok("a b; c\nd");
    let sizes: Vec<usize> = script.sentences.iter().map(|s| s.words.len()).collect();
    assert_eq!(sizes, vec![2, 1, 1]);
}

#[test]
fn block_keeps_its_source_text() {
    let script = parse_ok("{cmd  $x }");
    let MorphemeKind::Block { value, .. } = &script.sentences[0].words[0].morphemes[0].kind
    else {
        panic!("expected a block morpheme");
    };
    assert_eq!(value, "cmd  $x ");
}

// === Errors ===

#[test]
fn delimiter_errors() {
    for (source, kind, message) in [
        (
            "{",
            ParseErrorKind::UnmatchedLeft(Delimiter::Brace),
            "unmatched left brace",
        ),
        (
            "}",
            ParseErrorKind::UnmatchedRight(Delimiter::Brace),
            "unmatched right brace",
        ),
        (
            "(}",
            ParseErrorKind::MismatchedRight(Delimiter::Brace),
            "mismatched right brace",
        ),
    ] {
        let error = parse(source).expect_err(source);
        assert_eq!(error.kind, kind);
        assert_eq!(error.to_string(), message);
    }
}

#[test]
fn unclosed_input_is_incomplete() {
    assert!(parse("cmd {a").unwrap_err().kind.is_incomplete());
    assert!(parse("\"open").unwrap_err().kind.is_incomplete());
    assert!(!parse("a)").unwrap_err().kind.is_incomplete());
}

#[test]
fn incremental_parse_continues_after_incomplete() {
    let mut parser = Parser::new(ParserOptions::default());
    parser.begin();
    for token in tokenize("cmd {a") {
        parser.push_token(&token).unwrap();
    }
    assert!(parser.close_stream().unwrap_err().kind.is_incomplete());
    for token in tokenize(" b}") {
        parser.push_token(&token).unwrap();
    }
    let script = parser.close_stream().unwrap();
    assert_eq!(script.sentences[0].words.len(), 2);
}
