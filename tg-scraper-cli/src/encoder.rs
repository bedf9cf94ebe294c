use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Json,
    MinimizedJson,
    Yaml,
}

impl Format {
    /// JSON flavour selected by the `--readable` flag.
    pub fn json(readable: bool) -> Self {
        if readable {
            Format::Json
        } else {
            Format::MinimizedJson
        }
    }

    pub fn encode<T: Serialize>(self, value: &T) -> anyhow::Result<String> {
        let encoded = match self {
            Format::Json => serde_json::to_string_pretty(value)?,
            Format::MinimizedJson => serde_json::to_string(value)?,
            Format::Yaml => serde_yaml::to_string(value)?,
        };
        Ok(encoded)
    }
}
