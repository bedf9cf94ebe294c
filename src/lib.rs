mod extractor;
mod lint;
mod parser;
mod schema;
mod util;

pub use extractor::{EntryKind, Extractor, ExtractorError};
pub use lint::{lint, LintError, Violation};
pub use parser::{infer_default, infer_return_types, parse_types, FieldDescription, Lexicon};
pub use schema::{
    DefaultValue, Field, MethodDef, Schema, TypeDef, TypeToken, FALLBACK_VERSION,
};

pub const CORE_TELEGRAM_URL: &str = "https://core.telegram.org";
pub const BOT_API_DOCS_URL: &str = "https://core.telegram.org/bots/api/";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Extractor: {0}")]
    Extractor(
        #[from]
        #[source]
        ExtractorError,
    ),
    #[error("Lint: {0}")]
    Lint(
        #[from]
        #[source]
        LintError,
    ),
}

pub fn extract(html_doc: &str) -> Result<Schema, Error> {
    let extractor = Extractor::from_str(html_doc);
    let schema = extractor.extract()?;
    Ok(schema)
}

/// Like [`extract`], but rejects schemas with dangling references or missing return types.
pub fn extract_strict(html_doc: &str) -> Result<Schema, Error> {
    let schema = extract(html_doc)?;
    lint(&schema)?;
    Ok(schema)
}
