use semver::Version;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// Version reported when the document carries no `Bot API X.Y.Z` marker.
pub const FALLBACK_VERSION: Version = Version::new(1, 0, 0);

const ARRAY_PREFIX: &str = "Array<";
const ARRAY_SUFFIX: &str = ">";

/// Root document handed to every consumer (encoders, exporters, stub generator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct Schema {
    #[cfg_attr(feature = "json-schema", schemars(with = "String"))]
    pub version: Version,
    pub types: Vec<TypeDef>,
    pub methods: Vec<MethodDef>,
}

impl Schema {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            types: vec![],
            methods: vec![],
        }
    }

    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|ty| ty.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// Maps every concrete variant name to the abstract type listing it in `extended_by`.
    pub fn parents(&self) -> HashMap<&str, &str> {
        self.types
            .iter()
            .flat_map(|ty| {
                ty.extended_by
                    .iter()
                    .map(move |child| (child.as_str(), ty.name.as_str()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct TypeDef {
    pub name: String,
    pub description: String,
    pub fields: Vec<Field>,
    /// Names of the concrete types this abstract type stands for.
    /// Resolved by name against [`Schema::types`], never by pointer.
    pub extended_by: Vec<String>,
}

impl TypeDef {
    pub fn is_abstract(&self) -> bool {
        !self.extended_by.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct MethodDef {
    pub name: String,
    pub description: String,
    pub fields: Vec<Field>,
    pub return_types: Vec<TypeToken>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct Field {
    pub name: String,
    pub types: Vec<TypeToken>,
    pub optional: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
}

/// Scalar default sniffed from a field's description or literal type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Integer(i64),
    String(String),
}

impl DefaultValue {
    /// `false`, `0` and `""` carry no information for exporters.
    pub fn is_blank(&self) -> bool {
        match self {
            DefaultValue::Bool(value) => !value,
            DefaultValue::Integer(value) => *value == 0,
            DefaultValue::String(value) => value.is_empty(),
        }
    }

    /// Whether the value could belong to one of the non-array `types`.
    pub fn fits(&self, types: &[TypeToken]) -> bool {
        types
            .iter()
            .filter(|ty| !ty.is_array())
            .flat_map(TypeToken::leaves)
            .any(|leaf| match self {
                DefaultValue::Bool(_) => leaf == "bool",
                DefaultValue::Integer(_) => leaf == "int" || leaf == "float",
                DefaultValue::String(_) => leaf == "string" || TypeToken::is_reference(leaf),
            })
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(value) => write!(f, "{}", value),
            DefaultValue::Integer(value) => write!(f, "{}", value),
            DefaultValue::String(value) => write!(f, "{:?}", value),
        }
    }
}

/// Normalized type string: `int`, `InlineQueryResult`, `Array<Array<string|int>>`.
///
/// Lower-case leaves are scalars, capitalized leaves reference a [`TypeDef`] by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(transparent)]
pub struct TypeToken(String);

impl TypeToken {
    pub fn new<T: Into<String>>(inner: T) -> Self {
        Self(inner.into())
    }

    pub fn array_of(inner: TypeToken) -> Self {
        Self([ARRAY_PREFIX, &inner.0, ARRAY_SUFFIX].concat())
    }

    /// Wraps `inner` into `depth` levels of `Array<...>`.
    pub fn nested(inner: TypeToken, depth: usize) -> Self {
        (0..depth).fold(inner, |token, _| Self::array_of(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_array(&self) -> bool {
        self.element().is_some()
    }

    /// Token one array level down, `None` for non-array tokens.
    pub fn element(&self) -> Option<TypeToken> {
        self.0
            .strip_prefix(ARRAY_PREFIX)
            .and_then(|s| s.strip_suffix(ARRAY_SUFFIX))
            .map(TypeToken::new)
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut token = self.clone();
        while let Some(element) = token.element() {
            depth += 1;
            token = element;
        }
        depth
    }

    /// Union members of the innermost element, in source order.
    pub fn leaves(&self) -> Vec<&str> {
        let mut inner = self.0.as_str();
        while let Some(element) = inner
            .strip_prefix(ARRAY_PREFIX)
            .and_then(|s| s.strip_suffix(ARRAY_SUFFIX))
        {
            inner = element;
        }
        inner.split('|').map(str::trim).collect()
    }

    pub fn is_reference(leaf: &str) -> bool {
        leaf.chars().next().map_or(false, char::is_uppercase)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TypeToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<&str> for TypeToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<str> for TypeToken {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schema {
        Schema {
            version: Version::new(6, 6, 0),
            types: vec![
                TypeDef {
                    name: "InputMedia".to_string(),
                    description: "This object represents the content of a media message to be sent.".to_string(),
                    fields: vec![],
                    extended_by: vec!["InputMediaPhoto".to_string()],
                },
                TypeDef {
                    name: "InputMediaPhoto".to_string(),
                    description: "Represents a photo to be sent.".to_string(),
                    fields: vec![Field {
                        name: "type".to_string(),
                        types: vec![TypeToken::new("string")],
                        optional: false,
                        description: "Type of the result, must be photo".to_string(),
                        default: Some(DefaultValue::String("photo".to_string())),
                    }],
                    extended_by: vec![],
                },
            ],
            methods: vec![MethodDef {
                name: "getUpdates".to_string(),
                description: "Use this method to receive incoming updates.".to_string(),
                fields: vec![Field {
                    name: "limit".to_string(),
                    types: vec![TypeToken::new("int")],
                    optional: true,
                    description: "Limits the number of updates to be retrieved. Defaults to 100.".to_string(),
                    default: Some(DefaultValue::Integer(100)),
                }],
                return_types: vec![TypeToken::new("Array<Update>")],
            }],
        }
    }

    #[test]
    fn json_round_trip() {
        let schema = sample();
        let json = serde_json::to_string(&schema).unwrap();
        let decoded: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, schema);
    }

    #[test]
    fn json_keeps_key_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        let version = json.find("\"version\"").unwrap();
        let types = json.find("\"types\"").unwrap();
        let methods = json.find("\"methods\"").unwrap();
        assert!(version < types && types < methods);
        assert!(json.starts_with(r#"{"version":"6.6.0","#));
    }

    #[test]
    fn yaml_round_trip() {
        let schema = sample();
        let yaml = serde_yaml::to_string(&schema).unwrap();
        let decoded: Schema = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(decoded, schema);
    }

    #[test]
    fn absent_default_not_serialized() {
        let field = Field {
            name: "offset".to_string(),
            types: vec![TypeToken::new("int")],
            optional: true,
            description: "Identifier of the first update to be returned".to_string(),
            default: None,
        };
        let json = serde_json::to_value(&field).unwrap();
        assert!(json.get("default").is_none());
    }

    #[test]
    fn token_nesting() {
        let token = TypeToken::nested(TypeToken::new("string|int"), 2);
        assert_eq!(token, "Array<Array<string|int>>");
        assert_eq!(token.depth(), 2);
        assert_eq!(token.leaves(), vec!["string", "int"]);
        assert_eq!(token.element().unwrap(), "Array<string|int>");
        assert!(!TypeToken::new("Message").is_array());
    }

    #[test]
    fn default_fits_types() {
        assert!(DefaultValue::Integer(0).fits(&[TypeToken::new("float")]));
        assert!(DefaultValue::Bool(true).fits(&[TypeToken::new("bool")]));
        assert!(DefaultValue::String("MarkdownV2".to_string()).fits(&[TypeToken::new("string")]));
        assert!(!DefaultValue::Integer(100).fits(&[TypeToken::new("Array<int>")]));
        assert!(!DefaultValue::Bool(false).fits(&[]));
    }

    #[test]
    fn parents_of_variants() {
        let schema = sample();
        let parents = schema.parents();
        assert_eq!(parents.get("InputMediaPhoto"), Some(&"InputMedia"));
        assert!(schema.type_def("InputMedia").unwrap().is_abstract());
    }
}
