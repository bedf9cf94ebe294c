mod description;
mod returns;
mod sentence;
mod types;

pub use description::{infer_default, FieldDescription};
pub use returns::infer_return_types;
pub use types::{literal_default, parse_types};

/// Fixed vocabularies the analyzers consult.
///
/// Passed explicitly so alternative tables can be swapped in without touching callers.
#[derive(Debug, Clone, Copy)]
pub struct Lexicon {
    /// Type column scalar words and their token names.
    pub scalars: &'static [(&'static str, &'static str)],
    /// Emphasized scalars in return sentences.
    pub return_scalars: &'static [(&'static str, &'static str)],
    /// Emphasized words in return sentences that never denote a type.
    pub return_noise: &'static [&'static str],
    /// Plural link texts standing for an array of the singular type.
    pub plurals: &'static [(&'static str, &'static str)],
    /// Methods documented without a return clause that return a boolean.
    pub bool_returns: &'static [&'static str],
}

impl Lexicon {
    pub const TELEGRAM: Lexicon = Lexicon {
        scalars: &[
            ("Integer", "int"),
            ("String", "string"),
            ("Boolean", "bool"),
            ("Float", "float"),
            ("True", "bool"),
            ("False", "bool"),
        ],
        return_scalars: &[("True", "bool"), ("Int", "int"), ("String", "string")],
        return_noise: &["False", "force", "Array"],
        plurals: &[("Messages", "Message")],
        bool_returns: &["answerShippingQuery", "answerPreCheckoutQuery"],
    };

    pub fn scalar(&self, word: &str) -> Option<&'static str> {
        lookup(self.scalars, word)
    }

    pub fn return_scalar(&self, word: &str) -> Option<&'static str> {
        lookup(self.return_scalars, word)
    }

    pub fn singular(&self, word: &str) -> Option<&'static str> {
        lookup(self.plurals, word)
    }

    pub fn is_return_noise(&self, word: &str) -> bool {
        self.return_noise.contains(&word)
    }

    pub fn returns_bool(&self, method: &str) -> bool {
        self.bool_returns.contains(&method)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::TELEGRAM
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], word: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(from, _)| *from == word)
        .map(|(_, to)| *to)
}
