use super::Lexicon;
use crate::schema::{DefaultValue, TypeToken};
use itertools::Itertools;
use logos::Logos;
use std::mem;

#[derive(Debug, Clone, Copy, PartialEq, Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
enum TypeLexer {
    #[token("array", ignore(ascii_case))]
    Array,
    #[token("of")]
    Of,
    #[token("number")]
    Number,
    #[token("or")]
    Or,
    /// `X and Y` lists same-depth alternatives, never a compound type
    #[token("and")]
    And,
    #[token(",")]
    Comma,
    #[regex(r"[^ \t\r\n\f,]+")]
    Word,
}

/// Parses a `Type` column phrase such as `Array of Array of String and Integer`.
///
/// Yields one token per `or` branch, in source order and without deduplication.
/// Phrases of unexpected shape degrade to best-effort tokens.
pub fn parse_types(phrase: &str, lexicon: &Lexicon) -> Vec<TypeToken> {
    let mut types = vec![];
    let mut branch = Branch::default();

    let mut lexer = TypeLexer::lexer(phrase);
    while let Some(token) = lexer.next() {
        match token {
            Ok(TypeLexer::Or) => types.extend(mem::take(&mut branch).finish(lexicon)),
            Ok(TypeLexer::Array) => branch.depth += 1,
            Ok(TypeLexer::Of) | Ok(TypeLexer::Number) => {}
            Ok(TypeLexer::And) | Ok(TypeLexer::Comma) => branch.split(),
            Ok(TypeLexer::Word) | Err(()) => branch.push(lexer.slice()),
        }
    }
    types.extend(branch.finish(lexicon));

    types
}

/// `True` and `False` columns pin the field to that literal.
pub fn literal_default(phrase: &str) -> Option<DefaultValue> {
    match phrase.trim() {
        "True" => Some(DefaultValue::Bool(true)),
        "False" => Some(DefaultValue::Bool(false)),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct Branch<'s> {
    depth: usize,
    leaves: Vec<Vec<&'s str>>,
    words: Vec<&'s str>,
}

impl<'s> Branch<'s> {
    fn push(&mut self, word: &'s str) {
        self.words.push(word);
    }

    fn split(&mut self) {
        if !self.words.is_empty() {
            self.leaves.push(mem::take(&mut self.words));
        }
    }

    fn finish(mut self, lexicon: &Lexicon) -> Option<TypeToken> {
        self.split();
        if self.leaves.is_empty() {
            return None;
        }

        let union = self
            .leaves
            .iter()
            .map(|words| words.join(" "))
            .map(|leaf| match lexicon.scalar(&leaf) {
                Some(scalar) => scalar.to_string(),
                None => leaf,
            })
            .join("|");

        Some(TypeToken::nested(TypeToken::new(union), self.depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(phrase: &str) -> Vec<TypeToken> {
        parse_types(phrase, &Lexicon::TELEGRAM)
    }

    #[test]
    fn scalars_renamed() {
        assert_eq!(parse("Integer"), vec!["int"]);
        assert_eq!(parse("String"), vec!["string"]);
        assert_eq!(parse("Boolean"), vec!["bool"]);
        assert_eq!(parse("Float"), vec!["float"]);
        assert_eq!(parse("Float number"), vec!["float"]);
        assert_eq!(parse("True"), vec!["bool"]);
        assert_eq!(parse("False"), vec!["bool"]);
    }

    #[test]
    fn union_order_preserved() {
        assert_eq!(parse("Integer or String"), vec!["int", "string"]);
        assert_eq!(parse("InputFile or String"), vec!["InputFile", "string"]);
    }

    #[test]
    fn array_of_type() {
        assert_eq!(
            parse("Array of InlineQueryResult"),
            vec!["Array<InlineQueryResult>"]
        );
    }

    #[test]
    fn array_of_array_type() {
        assert_eq!(
            parse("Array of Array of PhotoSize"),
            vec!["Array<Array<PhotoSize>>"]
        );
        assert_eq!(
            parse("Array of Array of InlineKeyboardButton"),
            vec!["Array<Array<InlineKeyboardButton>>"]
        );
    }

    #[test]
    fn depth_matches_array_count() {
        for depth in 0..5 {
            let phrase = format!("{}Sticker", "Array of ".repeat(depth));
            let types = parse(&phrase);
            assert_eq!(types.len(), 1);
            assert_eq!(types[0].depth(), depth);
            assert_eq!(types[0].leaves(), vec!["Sticker"]);
        }
    }

    #[test]
    fn and_lists_share_depth() {
        assert_eq!(
            parse("Array of Array of String and Integer"),
            vec!["Array<Array<string|int>>"]
        );
        assert_eq!(
            parse("Array of InputMediaAudio, InputMediaDocument, InputMediaPhoto and InputMediaVideo"),
            vec!["Array<InputMediaAudio|InputMediaDocument|InputMediaPhoto|InputMediaVideo>"]
        );
    }

    #[test]
    fn lowercase_array_counted() {
        assert_eq!(parse("array of String"), vec!["Array<string>"]);
    }

    #[test]
    fn empty_phrase() {
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
    }

    #[test]
    fn literal_defaults() {
        assert_eq!(literal_default("True"), Some(DefaultValue::Bool(true)));
        assert_eq!(literal_default("False"), Some(DefaultValue::Bool(false)));
        assert_eq!(literal_default("Boolean"), None);
    }
}
