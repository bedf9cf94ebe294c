use crate::{
    schema::DefaultValue,
    util::{fragment_text, ElementRefExt, StrExt},
};
use scraper::{Html, Selector};

const OPTIONAL_PREFIX: &str = "Optional.";
const MUST_BE: &str = "must be ";
const DEFAULTS_TO: &str = "defaults to";
const OPEN_QUOTE: char = '“';
const CLOSE_QUOTE: char = '”';

/// Description cell of a field table row.
#[derive(Debug, Clone)]
pub struct FieldDescription {
    markup: String,
    text: String,
}

impl FieldDescription {
    pub fn parse(markup: &str) -> Self {
        Self {
            markup: markup.to_string(),
            text: fragment_text(markup).trim().to_string(),
        }
    }

    /// Markup stripped, entities decoded, emoji kept as their `alt` text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Optionality signal used by type field tables.
    pub fn is_optional(&self) -> bool {
        self.text.starts_with(OPTIONAL_PREFIX)
    }

    /// `must be <em>X</em>` wins over `defaults to X`; no trigger means no default.
    pub fn default_value(&self) -> Option<DefaultValue> {
        self.must_be().or_else(|| self.defaults_to())
    }

    fn must_be(&self) -> Option<DefaultValue> {
        if !self.text.contains_ignore_ascii_case(MUST_BE.trim_end()) {
            return None;
        }

        let pos = self.markup.find(MUST_BE)?;
        let token = self.markup[pos + MUST_BE.len()..].split(' ').next()?;
        if token.is_empty() {
            return None;
        }

        let em = Selector::parse("em").unwrap();
        Html::parse_fragment(token)
            .select(&em)
            .next()
            .map(|elem| DefaultValue::String(elem.plain_text()))
    }

    fn defaults_to(&self) -> Option<DefaultValue> {
        let offset = self.text.find_ignore_ascii_case(DEFAULTS_TO)?;
        let token = self.text[offset + DEFAULTS_TO.len()..]
            .split_whitespace()
            .next()?;
        classify(token)
    }
}

/// Single entry point for prose-derived defaults.
pub fn infer_default(markup: &str) -> Option<DefaultValue> {
    FieldDescription::parse(markup).default_value()
}

fn classify(token: &str) -> Option<DefaultValue> {
    let value = token
        .strip_suffix(|c: char| c == '.' || c == ',')
        .unwrap_or(token);

    if value.starts_with(OPEN_QUOTE) && value.ends_with(CLOSE_QUOTE) {
        let unquoted = value.replace(|c: char| c == OPEN_QUOTE || c == CLOSE_QUOTE, "");
        return Some(DefaultValue::String(unquoted));
    }

    if let Ok(number) = value.parse::<i64>() {
        return Some(DefaultValue::Integer(number));
    }
    if let Ok(number) = value.parse::<f64>() {
        if number.is_finite() {
            return Some(DefaultValue::Integer(number as i64));
        }
    }

    if value.eq_ignore_ascii_case("true") {
        return Some(DefaultValue::Bool(true));
    }
    if value.eq_ignore_ascii_case("false") {
        return Some(DefaultValue::Bool(false));
    }

    // symbolic constant such as `MarkdownV2`
    match value.chars().next() {
        Some(first) if !first.is_ascii_lowercase() => Some(DefaultValue::String(value.to_string())),
        _ => None,
    }
}
