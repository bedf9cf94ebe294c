use super::{sentence::Sentences, Lexicon};
use crate::schema::TypeToken;

const RETURN_MARKERS: &[&str] = &["returns", "is returned"];
const ARRAY: &str = "array";

/// Infers what a method returns from the sentences of its description.
///
/// Links name schema types, emphasis names scalars. Results keep sentence
/// order (links before emphasis) and may repeat.
pub fn infer_return_types(method: &str, description: &str, lexicon: &Lexicon) -> Vec<TypeToken> {
    let sentences = Sentences::parse(description);
    let mut types = vec![];

    for sentence in sentences.iter().filter(|sentence| {
        RETURN_MARKERS
            .iter()
            .any(|marker| sentence.contains_ignore_case(marker))
    }) {
        let depth = sentence.text().to_ascii_lowercase().matches(ARRAY).count();

        for link in sentence.links() {
            let name = link.as_inner().trim();
            if name.is_empty() {
                continue;
            }

            match lexicon.singular(name) {
                Some(singular) => types.push(TypeToken::array_of(singular.into())),
                None => types.push(TypeToken::nested(name.into(), depth)),
            }
        }

        for italic in sentence.italics() {
            let text = italic.as_inner().trim();
            if text.is_empty() || lexicon.is_return_noise(text) {
                continue;
            }

            let ty = lexicon.return_scalar(text).unwrap_or(text);
            types.push(ty.into());
        }
    }

    if types.is_empty() && lexicon.returns_bool(method) {
        types.push(TypeToken::new("bool"));
    }

    types
}
