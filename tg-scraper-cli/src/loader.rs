use crate::versions::Layer;
use anyhow::Context;
use std::{fs, path::Path};
use tg_scraper::Schema;

/// Where a schema comes from.
pub enum Source<'a> {
    /// Scrape the documentation page of a layer.
    Layer(&'a Layer),
    /// Scrape a locally saved documentation page.
    Html(&'a Path),
    /// Load a previously exported schema.
    Json(&'a Path),
    Yaml(&'a Path),
}

pub fn fetch(url: &str) -> anyhow::Result<String> {
    log::info!("Fetching {}", url);
    let html = reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .with_context(|| format!("Failed to fetch {}", url))?;
    Ok(html)
}

pub fn load(source: Source, strict: bool) -> anyhow::Result<Schema> {
    match source {
        Source::Layer(layer) => {
            let html = fetch(layer.url())?;
            scrape(&html, strict).with_context(|| format!("Failed to extract {} schema", layer))
        }
        Source::Html(path) => {
            let html = read(path)?;
            scrape(&html, strict)
                .with_context(|| format!("Failed to extract schema from {}", path.display()))
        }
        Source::Json(path) => {
            log::info!("Using JSON schema {}", path.display());
            let schema = serde_json::from_str(&read(path)?)
                .with_context(|| format!("Invalid JSON schema {}", path.display()))?;
            Ok(schema)
        }
        Source::Yaml(path) => {
            log::info!("Using YAML schema {}", path.display());
            let schema = serde_yaml::from_str(&read(path)?)
                .with_context(|| format!("Invalid YAML schema {}", path.display()))?;
            Ok(schema)
        }
    }
}

fn scrape(html: &str, strict: bool) -> anyhow::Result<Schema> {
    log::info!("Extracting schema");
    let schema = if strict {
        tg_scraper::extract_strict(html)?
    } else {
        tg_scraper::extract(html)?
    };
    Ok(schema)
}

fn read(path: &Path) -> anyhow::Result<String> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        anyhow::bail!("{} is empty", path.display());
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
        let path = env::temp_dir().join(format!("tg-scraper-loader-{}-{}", std::process::id(), name));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_saved_schemas() {
        let json = temp_file(
            "schema.json",
            r#"{"version":"5.3.0","types":[{"name":"User","description":"A user.","fields":[],"extended_by":[]}],"methods":[]}"#,
        );
        let schema = load(Source::Json(&json), false).unwrap();
        assert_eq!(schema.version, semver::Version::new(5, 3, 0));
        assert_eq!(schema.types[0].name, "User");

        let yaml = temp_file("schema.yaml", &serde_yaml::to_string(&schema).unwrap());
        assert_eq!(load(Source::Yaml(&yaml), false).unwrap(), schema);

        fs::remove_file(json).unwrap();
        fs::remove_file(yaml).unwrap();
    }

    #[test]
    fn load_local_page() {
        let html = temp_file(
            "api.html",
            r##"<p>Bot API 5.3</p><h4>getMe</h4><p>Returns basic information about the bot in form of a <a href="#user">User</a> object.</p>"##,
        );
        let schema = load(Source::Html(&html), true).unwrap();
        assert_eq!(schema.version, semver::Version::new(5, 3, 0));
        assert_eq!(schema.methods[0].return_types, vec!["User"]);
        fs::remove_file(html).unwrap();
    }

    #[test]
    fn empty_file_rejected() {
        let empty = temp_file("empty.json", "  \n");
        assert!(load(Source::Json(&empty), false).is_err());
        fs::remove_file(empty).unwrap();
    }
}
