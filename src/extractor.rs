mod walker;

use crate::{
    parser::{infer_return_types, literal_default, parse_types, FieldDescription, Lexicon},
    schema::{Field, MethodDef, Schema, TypeDef, FALLBACK_VERSION},
    util::{fragment_text, ElementRefExt, StrExt},
};
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use semver::Version;
use std::collections::HashMap;
use walker::{Blocks, Section, Walker};

const VERSION_MARKER: &str = "Bot API ";
const REQUIRED: &str = "Yes";
// name, type and description or required column
const MIN_CELLS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    #[error("No type or method headings found in document")]
    NoHeadings,
    #[error("Heading `{0}` is not attached to any block")]
    Detached(String),
    #[error("Row {row} of `{name}` table has {cells} cells, expected at least {expected}")]
    MalformedRow {
        name: String,
        row: usize,
        cells: usize,
        expected: usize,
    },
}

/// What a heading documents, decided by the case of its first letter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Method,
    Type,
}

impl EntryKind {
    pub fn classify(name: &str) -> Self {
        if name.is_first_letter_lowercase() {
            EntryKind::Method
        } else {
            EntryKind::Type
        }
    }
}

pub struct Extractor {
    doc: Html,
    lexicon: Lexicon,
}

impl Extractor {
    pub fn from_str(s: &str) -> Self {
        Self {
            doc: Html::parse_document(s),
            lexicon: Lexicon::default(),
        }
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// First `Bot API X.Y.Z` marker of the document, missing components zero-padded.
    pub fn version(&self) -> Version {
        let p = Selector::parse("p").unwrap();
        self.doc
            .select(&p)
            .find_map(|elem| parse_version_marker(&elem.plain_text()))
            .unwrap_or(FALLBACK_VERSION)
    }

    pub fn extract(&self) -> Result<Schema, ExtractorError> {
        let h4 = Selector::parse("h4").unwrap();
        let headings: Vec<ElementRef> = self.doc.select(&h4).collect();
        if headings.is_empty() {
            return Err(ExtractorError::NoHeadings);
        }

        let version = self.version();
        log::info!("Bot API version: {}", version);

        let walker = Walker::new();
        let mut outlines: HashMap<NodeId, Blocks> = HashMap::new();
        let mut schema = Schema::new(version);

        for heading in headings {
            let name = heading.plain_text().trim().to_string();
            // get rid of elements like `Formatting options`, `Sending files` that are not types or methods
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                log::debug!("Skipping heading `{}`", name);
                continue;
            }

            let parent = match heading.parent().and_then(ElementRef::wrap) {
                Some(parent) => parent,
                None => return Err(ExtractorError::Detached(name)),
            };
            let blocks = outlines
                .entry(parent.id())
                .or_insert_with(|| Blocks::of(parent));
            let cursor = match blocks.after(heading.id()) {
                Some(cursor) => cursor,
                None => return Err(ExtractorError::Detached(name)),
            };
            let section = walker.walk(cursor);

            match EntryKind::classify(&name) {
                EntryKind::Method => schema.methods.push(self.method(name, section)?),
                EntryKind::Type => schema.types.push(self.type_def(name, section)?),
            }
        }

        log::info!(
            "Extracted {} types and {} methods",
            schema.types.len(),
            schema.methods.len()
        );

        Ok(schema)
    }

    fn type_def(&self, name: String, section: Section) -> Result<TypeDef, ExtractorError> {
        let fields = self.fields(&name, EntryKind::Type, section.table)?;
        Ok(TypeDef {
            description: fragment_text(&section.description).trim().to_string(),
            name,
            fields,
            extended_by: section.extended_by,
        })
    }

    fn method(&self, name: String, section: Section) -> Result<MethodDef, ExtractorError> {
        let fields = self.fields(&name, EntryKind::Method, section.table)?;
        let return_types = infer_return_types(&name, &section.description, &self.lexicon);
        if return_types.is_empty() {
            log::debug!("No return type found for `{}`", name);
        }

        Ok(MethodDef {
            description: fragment_text(&section.description).trim().to_string(),
            name,
            fields,
            return_types,
        })
    }

    fn fields(
        &self,
        name: &str,
        kind: EntryKind,
        rows: Option<Vec<ElementRef>>,
    ) -> Result<Vec<Field>, ExtractorError> {
        let td = Selector::parse("td").unwrap();

        rows.unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(row, elem)| {
                let cells: Vec<ElementRef> = elem.select(&td).collect();
                // header rows have no data cells or only decorated ones
                let field_name = cells.first()?.own_text().trim().to_string();
                if field_name.is_empty() {
                    return None;
                }

                if cells.len() < MIN_CELLS {
                    return Some(Err(ExtractorError::MalformedRow {
                        name: name.to_string(),
                        row,
                        cells: cells.len(),
                        expected: MIN_CELLS,
                    }));
                }

                Some(Ok(self.field(field_name, kind, &cells)))
            })
            .collect()
    }

    fn field(&self, name: String, kind: EntryKind, cells: &[ElementRef]) -> Field {
        let phrase = cells[1].plain_text();
        let types = parse_types(phrase.trim(), &self.lexicon);

        let (optional, description) = match kind {
            EntryKind::Method => {
                let required = cells[2].plain_text();
                let description = cells
                    .get(3)
                    .map(|cell| cell.inner_html())
                    .unwrap_or_default();
                (
                    required.trim() != REQUIRED,
                    FieldDescription::parse(&description),
                )
            }
            EntryKind::Type => {
                let description = FieldDescription::parse(&cells[2].inner_html());
                (description.is_optional(), description)
            }
        };

        let default = literal_default(&phrase)
            .or_else(|| description.default_value())
            .filter(|default| {
                let consistent = default.fits(&types);
                if !consistent {
                    log::debug!("Dropping default {} of `{}`: no matching type", default, name);
                }
                consistent
            });

        Field {
            name,
            types,
            optional,
            description: description.into_text(),
            default,
        }
    }
}

fn parse_version_marker(text: &str) -> Option<Version> {
    let mut rest = text;
    while let Some(pos) = rest.find(VERSION_MARKER) {
        rest = &rest[pos + VERSION_MARKER.len()..];
        let numbers = rest
            .split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .next()
            .unwrap_or_default()
            .trim_end_matches('.');
        if !numbers.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }

        let mut components = numbers.split('.').map(|n| n.parse::<u64>().unwrap_or(0));
        let major = components.next().unwrap_or(0);
        let minor = components.next().unwrap_or(0);
        let patch = components.next().unwrap_or(0);
        return Some(Version::new(major, minor, patch));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DefaultValue;

    #[test]
    fn classify_by_first_letter() {
        assert_eq!(EntryKind::classify("getMe"), EntryKind::Method);
        assert_eq!(EntryKind::classify("User"), EntryKind::Type);
    }

    #[test]
    fn version_marker() {
        assert_eq!(
            parse_version_marker("Bot API 6.6"),
            Some(Version::new(6, 6, 0))
        );
        assert_eq!(
            parse_version_marker("Bot API 5.3.1."),
            Some(Version::new(5, 3, 1))
        );
        assert_eq!(parse_version_marker("Bot API 4"), Some(Version::new(4, 0, 0)));
        assert_eq!(
            parse_version_marker("The Bot API is an HTTP-based interface. Bot API 2.3"),
            Some(Version::new(2, 3, 0))
        );
        assert_eq!(parse_version_marker("The Bot API is great"), None);
    }

    #[test]
    fn version_fallback() {
        let extractor = Extractor::from_str("<h4>getMe</h4><p>A simple method.</p>");
        assert_eq!(extractor.version(), Version::new(1, 0, 0));
    }

    #[test]
    fn no_headings_is_fatal() {
        let extractor = Extractor::from_str("<h3>Recent changes</h3><p>Bot API 6.6</p>");
        assert!(matches!(
            extractor.extract(),
            Err(ExtractorError::NoHeadings)
        ));
    }

    #[test]
    fn malformed_row_is_fatal() {
        let extractor = Extractor::from_str(
            "<h4>User</h4><p>A user.</p><table><tbody><tr><td>id</td><td>Integer</td></tr></tbody></table>",
        );
        match extractor.extract() {
            Err(ExtractorError::MalformedRow {
                name,
                row,
                cells,
                expected,
            }) => {
                assert_eq!(name, "User");
                assert_eq!(row, 0);
                assert_eq!(cells, 2);
                assert_eq!(expected, 3);
            }
            other => panic!("unexpected result: {:?}", other.map(|schema| schema.version)),
        }
    }

    #[test]
    fn section_titles_skipped() {
        let extractor = Extractor::from_str(
            "<h4>Formatting options</h4><p>Text.</p><h4>getMe</h4><p>Returns basic information about the bot in form of a <a href=\"#user\">User</a> object.</p>",
        );
        let schema = extractor.extract().unwrap();
        assert!(schema.types.is_empty());
        assert_eq!(schema.methods.len(), 1);
        assert_eq!(schema.methods[0].name, "getMe");
        assert_eq!(schema.methods[0].return_types, vec!["User"]);
        assert!(schema.methods[0].fields.is_empty());
    }

    #[test]
    fn header_rows_skipped() {
        let extractor = Extractor::from_str(
            "<h4>User</h4><table><tbody>\
             <tr><td><strong>Field</strong></td><td><strong>Type</strong></td><td><strong>Description</strong></td></tr>\
             <tr><td>id</td><td>Integer</td><td>Unique identifier</td></tr>\
             </tbody></table>",
        );
        let schema = extractor.extract().unwrap();
        let fields = &schema.types[0].fields;
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "id");
    }

    #[test]
    fn optionality_signals() {
        let extractor = Extractor::from_str(
            "<h4>Chat</h4><table><tbody>\
             <tr><td>id</td><td>Integer</td><td>Unique identifier</td></tr>\
             <tr><td>title</td><td>String</td><td><em>Optional</em>. Title</td></tr>\
             </tbody></table>\
             <h4>getChat</h4><table><tbody>\
             <tr><td>chat_id</td><td>Integer or String</td><td>Yes</td><td>Unique identifier</td></tr>\
             <tr><td>limit</td><td>Integer</td><td>Optional</td><td>Optional. Defaults to 100.</td></tr>\
             </tbody></table>",
        );
        let schema = extractor.extract().unwrap();

        let chat = &schema.types[0].fields;
        assert!(!chat[0].optional);
        assert!(chat[1].optional);

        let get_chat = &schema.methods[0].fields;
        assert!(!get_chat[0].optional);
        assert_eq!(get_chat[0].types, vec!["int", "string"]);
        assert!(get_chat[1].optional);
        assert_eq!(get_chat[1].default, Some(DefaultValue::Integer(100)));
    }

    #[test]
    fn literal_type_default() {
        let extractor = Extractor::from_str(
            "<h4>ForceReply</h4><table><tbody>\
             <tr><td>force_reply</td><td>True</td><td>Shows reply interface to the user</td></tr>\
             </tbody></table>",
        );
        let schema = extractor.extract().unwrap();
        let field = &schema.types[0].fields[0];
        assert_eq!(field.types, vec!["bool"]);
        assert_eq!(field.default, Some(DefaultValue::Bool(true)));
    }

    #[test]
    fn inconsistent_default_dropped() {
        let extractor = Extractor::from_str(
            "<h4>getUpdates</h4><table><tbody>\
             <tr><td>allowed_updates</td><td>Array of String</td><td>Optional</td><td>Defaults to Everything.</td></tr>\
             </tbody></table>",
        );
        let schema = extractor.extract().unwrap();
        assert_eq!(schema.methods[0].fields[0].default, None);
    }
}
