use crate::util::{ElementRefExt, StrExt};
use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node};
use std::{mem, slice};

/// Markup split into sentences on `.`, keeping inline links and emphasis
/// as separate parts.
#[derive(Debug, Default)]
pub(crate) struct Sentences {
    inner: Vec<Sentence>,
}

impl Sentences {
    pub(crate) fn parse(markup: &str) -> Self {
        let fragment = Html::parse_fragment(markup);
        let mut builder = Builder::default();
        builder.visit(*fragment.root_element());
        builder.finish()
    }

    pub(crate) fn iter(&self) -> slice::Iter<'_, Sentence> {
        self.inner.iter()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Part {
    inner: String,
    kind: PartKind,
}

impl Part {
    fn text(inner: String) -> Self {
        Self {
            inner,
            kind: PartKind::Text,
        }
    }

    fn link(inner: String) -> Self {
        Self {
            inner,
            kind: PartKind::Link,
        }
    }

    fn italic(inner: String) -> Self {
        Self {
            inner,
            kind: PartKind::Italic,
        }
    }

    pub(crate) fn as_inner(&self) -> &str {
        &self.inner
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PartKind {
    Text,
    Link,
    Italic,
}

#[derive(Debug, Default)]
pub(crate) struct Sentence {
    parts: Vec<Part>,
}

impl Sentence {
    pub(crate) fn text(&self) -> String {
        self.parts.iter().map(Part::as_inner).collect()
    }

    pub(crate) fn contains_ignore_case(&self, needle: &str) -> bool {
        self.text().contains_ignore_ascii_case(needle)
    }

    pub(crate) fn links(&self) -> impl Iterator<Item = &Part> {
        self.parts
            .iter()
            .filter(|part| part.kind == PartKind::Link)
    }

    pub(crate) fn italics(&self) -> impl Iterator<Item = &Part> {
        self.parts
            .iter()
            .filter(|part| part.kind == PartKind::Italic)
    }

    fn is_blank(&self) -> bool {
        self.parts.iter().all(|part| part.inner.trim().is_empty())
    }
}

#[derive(Default)]
struct Builder {
    sentences: Vec<Sentence>,
    parts: Vec<Part>,
}

impl Builder {
    fn visit(&mut self, node: NodeRef<Node>) {
        for child in node.children() {
            match child.value() {
                Node::Text(text) => self.push_text(text),
                Node::Element(elem) => {
                    let element = match ElementRef::wrap(child) {
                        Some(element) => element,
                        None => continue,
                    };
                    match elem.name() {
                        "a" => self.parts.push(Part::link(element.plain_text())),
                        "em" => self.parts.push(Part::italic(element.plain_text())),
                        "img" => {
                            if let Some(alt) = elem.attr("alt") {
                                self.push_text(alt);
                            }
                        }
                        "br" => self.push_text("\n"),
                        name => {
                            log::trace!("Descending into <{}>", name);
                            self.visit(child);
                        }
                    }
                }
                _ => continue,
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        let mut pieces = text.split('.');
        if let Some(first) = pieces.next() {
            self.push_piece(first);
        }
        for piece in pieces {
            self.end_sentence();
            self.push_piece(piece);
        }
    }

    fn push_piece(&mut self, piece: &str) {
        if !piece.is_empty() {
            self.parts.push(Part::text(piece.to_string()));
        }
    }

    fn end_sentence(&mut self) {
        let sentence = Sentence {
            parts: mem::take(&mut self.parts),
        };
        if !sentence.is_blank() {
            self.sentences.push(sentence);
        }
    }

    fn finish(mut self) -> Sentences {
        self.end_sentence();
        Sentences {
            inner: self.sentences,
        }
    }
}
