use ego_tree::iter::Edge;
use scraper::{ElementRef, Html, Node};

pub trait StrExt {
    #[allow(clippy::wrong_self_convention)]
    fn is_first_letter_lowercase(self) -> bool;

    /// Byte offset of `needle`, ignoring ASCII case.
    fn find_ignore_ascii_case(self, needle: &str) -> Option<usize>;

    fn contains_ignore_ascii_case(self, needle: &str) -> bool;
}

impl<'a> StrExt for &'a str {
    fn is_first_letter_lowercase(self) -> bool {
        self.chars().next().map_or(false, char::is_lowercase)
    }

    fn find_ignore_ascii_case(self, needle: &str) -> Option<usize> {
        // ASCII lowering keeps byte offsets intact
        self.to_ascii_lowercase()
            .find(&needle.to_ascii_lowercase())
    }

    fn contains_ignore_ascii_case(self, needle: &str) -> bool {
        self.find_ignore_ascii_case(needle).is_some()
    }
}

pub trait ElementRefExt {
    /// Text content with emoji images replaced by their `alt` text.
    fn plain_text(&self) -> String;

    /// Text of direct text children only.
    fn own_text(&self) -> String;
}

impl ElementRefExt for ElementRef<'_> {
    fn plain_text(&self) -> String {
        self.traverse()
            .filter_map(|edge| {
                if let Edge::Open(node) = edge {
                    return match node.value() {
                        Node::Text(text) => Some(text.as_ref()),
                        Node::Element(elem) if elem.name() == "img" => elem.attr("alt"),
                        Node::Element(elem) if elem.name() == "br" => Some("\n"),
                        _ => None,
                    };
                }

                None
            })
            .collect()
    }

    fn own_text(&self) -> String {
        self.children()
            .filter_map(|node| node.value().as_text().map(|text| &**text))
            .collect()
    }
}

/// Plain text of an HTML fragment, entities decoded.
pub fn fragment_text(markup: &str) -> String {
    Html::parse_fragment(markup).root_element().plain_text()
}
