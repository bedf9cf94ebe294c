use crate::util::ElementRefExt;
use ego_tree::NodeId;
use scraper::{ElementRef, Selector};
use std::collections::HashMap;

/// Element children of one parent in document order, indexed by node id.
///
/// Built once per parent and shared by every heading below it; walks
/// advance an index instead of following sibling links.
pub(crate) struct Blocks<'a> {
    elements: Vec<ElementRef<'a>>,
    positions: HashMap<NodeId, usize>,
}

impl<'a> Blocks<'a> {
    pub(crate) fn of(parent: ElementRef<'a>) -> Self {
        let elements: Vec<_> = parent.children().filter_map(ElementRef::wrap).collect();
        let positions = elements
            .iter()
            .enumerate()
            .map(|(pos, elem)| (elem.id(), pos))
            .collect();
        Self {
            elements,
            positions,
        }
    }

    /// Cursor over the blocks following `id`.
    pub(crate) fn after(&self, id: NodeId) -> Option<Cursor<'_, 'a>> {
        let pos = *self.positions.get(&id)?;
        Some(Cursor {
            blocks: &self.elements,
            pos: pos + 1,
        })
    }
}

pub(crate) struct Cursor<'b, 'a> {
    blocks: &'b [ElementRef<'a>],
    pos: usize,
}

impl<'a> Iterator for Cursor<'_, 'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.blocks.get(self.pos).copied()?;
        self.pos += 1;
        Some(block)
    }
}

/// Raw content documenting one heading.
#[derive(Debug, Default)]
pub(crate) struct Section<'a> {
    /// Inner markup of every paragraph, each preceded by a line break.
    pub description: String,
    /// Body rows of the field table.
    pub table: Option<Vec<ElementRef<'a>>>,
    pub extended_by: Vec<String>,
}

pub(crate) struct Walker {
    li: Selector,
    rows: Selector,
}

impl Walker {
    pub(crate) fn new() -> Self {
        Self {
            li: Selector::parse("li").unwrap(),
            rows: Selector::parse("tbody tr").unwrap(),
        }
    }

    /// Collects paragraphs until the next heading. A list or a table ends
    /// the section: lists name the variants of an abstract type, tables
    /// hold fields and always come last.
    pub(crate) fn walk<'a>(&self, cursor: Cursor<'_, 'a>) -> Section<'a> {
        let mut section = Section::default();

        for block in cursor {
            match block.value().name() {
                name if is_heading(name) => break,
                "p" => {
                    section.description.push('\n');
                    section.description.push_str(&block.inner_html());
                }
                "ul" => {
                    section.extended_by = block
                        .select(&self.li)
                        .map(|li| li.plain_text().trim().to_string())
                        .filter(|name| !name.is_empty())
                        .collect();
                    break;
                }
                "table" => {
                    section.table = Some(block.select(&self.rows).collect());
                    break;
                }
                name => log::trace!("Skipping <{}> block", name),
            }
        }

        section
    }
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}
