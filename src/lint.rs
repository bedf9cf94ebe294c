use crate::schema::Schema;
use itertools::Itertools;
use std::{collections::HashSet, fmt};

#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Abstract type lists a variant that is not documented.
    UnknownVariant { parent: String, variant: String },
    MissingReturnType { method: String },
    DuplicateType(String),
    DuplicateMethod(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::UnknownVariant { parent, variant } => {
                write!(f, "`{}` is extended by unknown type `{}`", parent, variant)
            }
            Violation::MissingReturnType { method } => {
                write!(f, "Method `{}` has no return type", method)
            }
            Violation::DuplicateType(name) => write!(f, "Type `{}` defined twice", name),
            Violation::DuplicateMethod(name) => write!(f, "Method `{}` defined twice", name),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Schema has {} violation(s): {}", .0.len(), .0.iter().join("; "))]
pub struct LintError(pub Vec<Violation>);

/// Checks cross references of an extracted schema.
///
/// Extraction itself is tolerant, this is the place to reject documents that
/// lost information on the way.
pub fn lint(schema: &Schema) -> Result<(), LintError> {
    let mut violations = vec![];

    let mut types = HashSet::new();
    for ty in &schema.types {
        if !types.insert(ty.name.as_str()) {
            violations.push(Violation::DuplicateType(ty.name.clone()));
        }
    }

    let mut methods = HashSet::new();
    for method in &schema.methods {
        if !methods.insert(method.name.as_str()) {
            violations.push(Violation::DuplicateMethod(method.name.clone()));
        }

        if method.return_types.is_empty() {
            violations.push(Violation::MissingReturnType {
                method: method.name.clone(),
            });
        }
    }

    for ty in &schema.types {
        for variant in &ty.extended_by {
            if !types.contains(variant.as_str()) {
                violations.push(Violation::UnknownVariant {
                    parent: ty.name.clone(),
                    variant: variant.clone(),
                });
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(LintError(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MethodDef, TypeDef, TypeToken};
    use semver::Version;

    fn type_def(name: &str, extended_by: &[&str]) -> TypeDef {
        TypeDef {
            name: name.to_string(),
            description: String::new(),
            fields: vec![],
            extended_by: extended_by.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn method(name: &str, return_types: &[&str]) -> MethodDef {
        MethodDef {
            name: name.to_string(),
            description: String::new(),
            fields: vec![],
            return_types: return_types.iter().map(|&s| TypeToken::new(s)).collect(),
        }
    }

    #[test]
    fn consistent_schema() {
        let mut schema = Schema::new(Version::new(6, 6, 0));
        schema.types = vec![
            type_def("BotCommandScope", &["BotCommandScopeDefault"]),
            type_def("BotCommandScopeDefault", &[]),
        ];
        schema.methods = vec![method("getMe", &["User"])];
        assert!(lint(&schema).is_ok());
    }

    #[test]
    fn violations_collected() {
        let mut schema = Schema::new(Version::new(6, 6, 0));
        schema.types = vec![
            type_def("InputMedia", &["InputMediaPhoto"]),
            type_def("User", &[]),
            type_def("User", &[]),
        ];
        schema.methods = vec![method("close", &[]), method("getMe", &["User"]), method("getMe", &["User"])];

        let err = lint(&schema).unwrap_err();
        assert_eq!(
            err.0,
            vec![
                Violation::DuplicateType("User".to_string()),
                Violation::MissingReturnType {
                    method: "close".to_string()
                },
                Violation::DuplicateMethod("getMe".to_string()),
                Violation::UnknownVariant {
                    parent: "InputMedia".to_string(),
                    variant: "InputMediaPhoto".to_string()
                },
            ]
        );
        assert!(err.to_string().starts_with("Schema has 4 violation(s): Type `User` defined twice"));
    }
}
