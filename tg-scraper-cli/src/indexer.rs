use crate::encoder::Format;
use serde::Serialize;
use std::{fs, path::PathBuf};

fn md_to_html(md: &str) -> String {
    let parser = pulldown_cmark::Parser::new(md);
    let mut buf = String::new();
    pulldown_cmark::html::push_html(&mut buf, parser);
    buf
}

struct Serialized {
    content: String,
    path: String,
}

/// Collects artefacts and writes them below `publish_dir` together with an `index.html`.
pub struct Indexer {
    publish_dir: PathBuf,
    inner: Vec<Serialized>,
}

impl Indexer {
    pub fn new<P: Into<PathBuf>>(publish_dir: P) -> Self {
        Self {
            publish_dir: publish_dir.into(),
            inner: vec![],
        }
    }

    pub fn add<T: Serialize>(&mut self, value: &T, formats: Vec<(Format, String)>) -> anyhow::Result<()> {
        for (format, path) in formats {
            let content = format.encode(value)?;
            self.add_raw(path, content);
        }

        Ok(())
    }

    pub fn add_raw(&mut self, path: String, content: String) {
        self.inner.push(Serialized { content, path });
    }

    pub fn gen(self) -> anyhow::Result<()> {
        let mut index = String::new();

        for Serialized { content, path } in self.inner {
            let destination = self.publish_dir.join(&path);
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            log::debug!("Writing {}", destination.display());
            fs::write(destination, content)?;
            index += &format!("* [{path}]({path})\n", path = path);
        }

        fs::create_dir_all(&self.publish_dir)?;
        let html = md_to_html(&index);
        fs::write(self.publish_dir.join("index.html"), html)?;

        Ok(())
    }
}
