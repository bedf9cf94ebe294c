use convert_case::{Case, Casing};
use std::{
    collections::HashSet,
    fmt::{self, Write},
};
use tg_scraper::{Field, MethodDef, Schema, TypeDef, TypeToken};

const VALUE: &str = "serde_json::Value";

/// Keywords that cannot be raw identifiers.
const RESERVED: &[&str] = &["crate", "self", "Self", "super"];

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where",
    "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try",
    "typeof", "unsized", "virtual", "yield",
];

/// Renders a schema as a Rust module: `types.rs` with one item per type, `api.rs` with
/// the `Api` trait.
pub struct StubCreator<'a> {
    schema: &'a Schema,
    namespace: Vec<String>,
    known: HashSet<&'a str>,
}

impl<'a> StubCreator<'a> {
    pub fn new(schema: &'a Schema, namespace: &str) -> anyhow::Result<Self> {
        let namespace: Vec<String> = namespace
            .trim_end_matches("::")
            .split("::")
            .map(str::to_string)
            .collect();
        if let Some(segment) = namespace.iter().find(|segment| !is_module_ident(segment)) {
            anyhow::bail!("Invalid namespace segment `{}`", segment);
        }

        Ok(Self {
            schema,
            namespace,
            known: schema.types.iter().map(|ty| ty.name.as_str()).collect(),
        })
    }

    /// Relative file paths and their contents.
    pub fn generate(&self) -> anyhow::Result<Vec<(String, String)>> {
        let dir = self.namespace.join("/");
        Ok(vec![
            (format!("{}/mod.rs", dir), self.module()?),
            (format!("{}/types.rs", dir), self.types()?),
            (format!("{}/api.rs", dir), self.api()?),
        ])
    }

    fn module(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "//! Telegram Bot API {} bindings.", self.schema.version)?;
        writeln!(out)?;
        writeln!(out, "pub mod api;")?;
        writeln!(out, "pub mod types;")?;
        writeln!(out)?;
        writeln!(out, "pub use api::Api;")?;
        Ok(out)
    }

    fn types(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "//! Telegram Bot API {} types.", self.schema.version)?;
        writeln!(out)?;
        writeln!(out, "use serde::{{Deserialize, Serialize}};")?;
        writeln!(out)?;
        out.push_str(RESPONSE);

        for ty in &self.schema.types {
            writeln!(out)?;
            if ty.is_abstract() {
                self.abstract_type(&mut out, ty)?;
            } else {
                self.concrete_type(&mut out, ty)?;
            }
        }

        Ok(out)
    }

    fn abstract_type(&self, out: &mut String, ty: &TypeDef) -> fmt::Result {
        doc(out, "", &ty.description)?;
        writeln!(out, "#[derive(Debug, Clone, Serialize, Deserialize)]")?;
        writeln!(out, "#[serde(untagged)]")?;
        writeln!(out, "pub enum {} {{", ty.name)?;
        for variant in &ty.extended_by {
            if !self.known.contains(variant.as_str()) {
                log::warn!("`{}` is extended by unknown type `{}`", ty.name, variant);
                continue;
            }
            writeln!(out, "    {variant}({variant}),", variant = variant)?;
        }
        writeln!(out, "}}")
    }

    fn concrete_type(&self, out: &mut String, ty: &TypeDef) -> fmt::Result {
        doc(out, "", &ty.description)?;
        writeln!(out, "#[derive(Debug, Clone, Serialize, Deserialize)]")?;
        writeln!(out, "pub struct {} {{", ty.name)?;
        for field in &ty.fields {
            doc(out, "    ", &field_doc(field))?;
            if field.optional {
                writeln!(
                    out,
                    "    #[serde(default, skip_serializing_if = \"Option::is_none\")]"
                )?;
            }
            if RESERVED.contains(&field.name.as_str()) {
                writeln!(out, "    #[serde(rename = \"{}\")]", field.name)?;
            }
            writeln!(
                out,
                "    pub {}: {},",
                ident(&field.name),
                self.field_type(field, true)
            )?;
        }
        writeln!(out, "}}")
    }

    fn api(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "//! Telegram Bot API {} methods.", self.schema.version)?;
        writeln!(out)?;
        writeln!(out, "#[allow(unused_imports)]")?;
        writeln!(out, "use super::types::*;")?;
        writeln!(out, "use serde::de::DeserializeOwned;")?;
        writeln!(out, "use serde_json::json;")?;
        writeln!(out)?;
        writeln!(out, "pub trait Api {{")?;
        writeln!(out, "    type Error;")?;
        writeln!(out)?;
        writeln!(
            out,
            "    /// Calls `method` with `args`; `null` arguments stand for omitted optional parameters."
        )?;
        writeln!(
            out,
            "    fn send_request<T: DeserializeOwned>(&self, method: &str, args: {}) -> Result<T, Self::Error>;",
            VALUE
        )?;

        for method in &self.schema.methods {
            writeln!(out)?;
            self.method(&mut out, method)?;
        }

        writeln!(out, "}}")?;
        Ok(out)
    }

    fn method(&self, out: &mut String, method: &MethodDef) -> fmt::Result {
        let mut fields: Vec<&Field> = method.fields.iter().collect();
        // required parameters first, stable otherwise
        fields.sort_by_key(|field| field.optional);

        doc(out, "    ", &method.description)?;
        if !fields.is_empty() {
            writeln!(out, "    ///")?;
            for field in &fields {
                writeln!(
                    out,
                    "    /// * `{}` - {}",
                    field.name,
                    single_line(&field_doc(field))
                )?;
            }
        }

        let params: String = fields
            .iter()
            .map(|field| format!(", {}: {}", ident(&field.name), self.field_type(field, false)))
            .collect();
        writeln!(
            out,
            "    fn {}(&self{}) -> Result<{}, Self::Error> {{",
            ident(&method.name.to_case(Case::Snake)),
            params,
            self.tokens_type(&method.return_types, false)
        )?;

        writeln!(out, "        let args = json!({{")?;
        for field in &method.fields {
            writeln!(out, "            \"{}\": {},", field.name, ident(&field.name))?;
        }
        writeln!(out, "        }});")?;
        writeln!(out, "        self.send_request(\"{}\", args)", method.name)?;
        writeln!(out, "    }}")
    }

    fn field_type(&self, field: &Field, boxed: bool) -> String {
        let ty = self.tokens_type(&field.types, boxed);
        if field.optional {
            format!("Option<{}>", ty)
        } else {
            ty
        }
    }

    fn tokens_type(&self, tokens: &[TypeToken], boxed: bool) -> String {
        match tokens {
            [token] => self.token_type(token, boxed),
            _ => VALUE.to_string(),
        }
    }

    fn token_type(&self, token: &TypeToken, boxed: bool) -> String {
        if let Some(element) = token.element() {
            return format!("Vec<{}>", self.token_type(&element, false));
        }

        match token.leaves().as_slice() {
            ["int"] => "i64".to_string(),
            ["float"] => "f64".to_string(),
            ["bool"] => "bool".to_string(),
            ["string"] => "String".to_string(),
            [name] if self.known.contains(name) => {
                if boxed {
                    format!("Box<{}>", name)
                } else {
                    name.to_string()
                }
            }
            _ => VALUE.to_string(),
        }
    }
}

const RESPONSE: &str = r#"/// Envelope of every Bot API answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response<T> {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
"#;

fn field_doc(field: &Field) -> String {
    match &field.default {
        Some(default) if !default.is_blank() => {
            format!("{} (default: {})", field.description, default)
        }
        _ => field.description.clone(),
    }
}

fn doc(out: &mut String, indent: &str, text: &str) -> fmt::Result {
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        writeln!(out, "{}/// {}", indent, line)?;
    }
    Ok(())
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn ident(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{}_", name)
    } else if KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}

fn is_module_ident(segment: &str) -> bool {
    let mut chars = segment.chars();
    let first = match chars.next() {
        Some(first) => first,
        None => return false,
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&segment)
        && !RESERVED.contains(&segment)
}
