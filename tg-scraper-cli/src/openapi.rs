use anyhow::Context;
use indexmap::{indexmap, IndexMap};
use openapiv3::{
    AnySchema, ArrayType, ExternalDocumentation, IntegerType, MediaType, NumberType, ObjectType, OpenAPI,
    Operation, PathItem, ReferenceOr, RequestBody, Response, Responses, Schema, SchemaData,
    SchemaKind, StatusCode, StringType, Type,
};
use tg_scraper::{Field, Schema as ApiSchema, TypeDef, TypeToken, BOT_API_DOCS_URL};

const BASE_SCHEMA: &str = include_str!("../base-schema.yml");
const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";
const JSON: &str = "application/json";
const FORM_DATA: &str = "multipart/form-data";

pub fn generate(schema: &ApiSchema) -> anyhow::Result<OpenAPI> {
    let mut api: OpenAPI = serde_yaml::from_str(BASE_SCHEMA).context("Base schema is invalid")?;

    let success = api
        .components
        .as_mut()
        .and_then(|components| components.schemas.remove("Success"))
        .context("Base schema has no `Success` component")?;

    let mut schemas = indexmap![];
    for ty in &schema.types {
        let schema_kind = if ty.is_abstract() {
            SchemaKind::AnyOf {
                any_of: ty
                    .extended_by
                    .iter()
                    .map(|variant| reference(variant))
                    .collect(),
            }
        } else {
            let (properties, required) = make_properties_and_required(&ty.fields);
            SchemaKind::Type(Type::Object(ObjectType {
                properties,
                required,
                ..ObjectType::default()
            }))
        };

        schemas.insert(
            ty.name.clone(),
            ReferenceOr::Item(Schema {
                schema_data: SchemaData {
                    description: Some(ty.description.clone()),
                    external_docs: Some(docs(ty)),
                    ..SchemaData::default()
                },
                schema_kind,
            }),
        );
    }

    let mut paths = indexmap![];
    for method in &schema.methods {
        let (properties, required) = make_properties_and_required(&method.fields);

        let mut content = indexmap![];
        for content_type in &[JSON, FORM_URL_ENCODED, FORM_DATA] {
            content.insert(
                content_type.to_string(),
                MediaType {
                    schema: Some(ReferenceOr::Item(Schema {
                        schema_data: SchemaData::default(),
                        schema_kind: SchemaKind::Type(Type::Object(ObjectType {
                            properties: properties.clone(),
                            required: required.clone(),
                            ..ObjectType::default()
                        })),
                    })),
                    ..MediaType::default()
                },
            );
        }

        let mut success = success.clone();
        if let ReferenceOr::Item(item) = &mut success {
            if let SchemaKind::Type(Type::Object(object)) = &mut item.schema_kind {
                object
                    .properties
                    .insert("result".to_string(), tokens_schema(&method.return_types));
            }
        }

        let operation = Operation {
            description: Some(method.description.clone()),
            request_body: if method.fields.is_empty() {
                None
            } else {
                Some(ReferenceOr::Item(RequestBody {
                    content,
                    required: !required.is_empty(),
                    ..RequestBody::default()
                }))
            },
            responses: Responses {
                default: Some(ReferenceOr::Item(Response {
                    content: indexmap! {
                        JSON.to_string() => MediaType {
                            schema: Some(ReferenceOr::Reference { reference: "#/components/schemas/Error".to_string() }),
                            ..MediaType::default()
                        }
                    },
                    ..Response::default()
                })),
                responses: indexmap! {
                    StatusCode::Code(200) => ReferenceOr::Item(Response {
                        content: indexmap! {
                            JSON.to_string() => MediaType {
                                schema: Some(success),
                                ..MediaType::default()
                            }
                        },
                        ..Response::default()
                    }),
                },
            },
            external_docs: Some(ExternalDocumentation {
                url: format!("{}#{}", BOT_API_DOCS_URL, method.name.to_lowercase()),
                ..ExternalDocumentation::default()
            }),
            ..Operation::default()
        };

        let item = PathItem {
            post: Some(operation),
            ..PathItem::default()
        };

        paths.insert(format!("/{}", method.name), ReferenceOr::Item(item));
    }

    api.info.version = schema.version.to_string();
    api.paths = paths;
    if let Some(components) = &mut api.components {
        components.schemas.extend(schemas)
    }

    Ok(api)
}

fn docs(ty: &TypeDef) -> ExternalDocumentation {
    ExternalDocumentation {
        url: format!("{}#{}", BOT_API_DOCS_URL, ty.name.to_lowercase()),
        ..ExternalDocumentation::default()
    }
}

fn make_properties_and_required(
    fields: &[Field],
) -> (IndexMap<String, ReferenceOr<Box<Schema>>>, Vec<String>) {
    fields.iter().fold(
        (indexmap![], vec![]),
        |(mut properties, mut required), field| {
            if !field.optional {
                required.push(field.name.clone());
            }

            let default = field
                .default
                .as_ref()
                .filter(|default| !default.is_blank())
                .and_then(|default| serde_json::to_value(default).ok());

            let property = match tokens_schema(&field.types) {
                ReferenceOr::Item(mut schema) => {
                    schema.schema_data.description = Some(field.description.clone());
                    schema.schema_data.default = default;
                    ReferenceOr::Item(schema)
                }
                reference => reference,
            };
            properties.insert(field.name.clone(), property);

            (properties, required)
        },
    )
}

fn tokens_schema(tokens: &[TypeToken]) -> ReferenceOr<Box<Schema>> {
    match tokens {
        [] => item(SchemaKind::Any(AnySchema::default())),
        [token] => token_schema(token),
        tokens => any_of(tokens.iter().map(token_schema)),
    }
}

fn token_schema(token: &TypeToken) -> ReferenceOr<Box<Schema>> {
    if let Some(element) = token.element() {
        return item(SchemaKind::Type(Type::Array(ArrayType {
            items: token_schema(&element),
            min_items: None,
            max_items: None,
            unique_items: false,
        })));
    }

    match token.leaves().as_slice() {
        [leaf] => leaf_schema(leaf),
        leaves => any_of(leaves.iter().map(|leaf| leaf_schema(leaf))),
    }
}

fn leaf_schema(leaf: &str) -> ReferenceOr<Box<Schema>> {
    if TypeToken::is_reference(leaf) {
        return reference(leaf);
    }

    let schema_type = match leaf {
        "int" => Type::Integer(IntegerType::default()),
        "float" => Type::Number(NumberType::default()),
        "bool" => Type::Boolean {},
        _ => Type::String(StringType::default()),
    };
    item(SchemaKind::Type(schema_type))
}

fn any_of<I>(schemas: I) -> ReferenceOr<Box<Schema>>
where
    I: Iterator<Item = ReferenceOr<Box<Schema>>>,
{
    item(SchemaKind::AnyOf {
        any_of: schemas.map(ReferenceOr::unbox).collect(),
    })
}

fn item(schema_kind: SchemaKind) -> ReferenceOr<Box<Schema>> {
    ReferenceOr::Item(Box::new(Schema {
        schema_data: SchemaData::default(),
        schema_kind,
    }))
}

fn reference<T>(name: &str) -> ReferenceOr<T> {
    ReferenceOr::Reference {
        reference: format!("#/components/schemas/{}", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;
    use serde_json::json;
    use tg_scraper::{DefaultValue, MethodDef};

    fn field(name: &str, types: &[&str], optional: bool, default: Option<DefaultValue>) -> Field {
        Field {
            name: name.to_string(),
            types: types.iter().map(|&ty| TypeToken::new(ty)).collect(),
            optional,
            description: format!("The {}", name),
            default,
        }
    }

    fn sample() -> ApiSchema {
        let mut schema = ApiSchema::new(Version::new(5, 3, 0));
        schema.types = vec![
            TypeDef {
                name: "InputMedia".to_string(),
                description: "Content of a media message.".to_string(),
                fields: vec![],
                extended_by: vec!["InputMediaPhoto".to_string()],
            },
            TypeDef {
                name: "InputMediaPhoto".to_string(),
                description: "A photo.".to_string(),
                fields: vec![
                    field("type", &["string"], false, Some(DefaultValue::String("photo".to_string()))),
                    field("caption", &["string"], true, None),
                ],
                extended_by: vec![],
            },
        ];
        schema.methods = vec![
            MethodDef {
                name: "sendMediaGroup".to_string(),
                description: "Sends a group of photos.".to_string(),
                fields: vec![
                    field("chat_id", &["int", "string"], false, None),
                    field("media", &["Array<InputMediaPhoto>"], false, None),
                    field("disable_notification", &["bool"], true, Some(DefaultValue::Bool(false))),
                ],
                return_types: vec![TypeToken::new("Array<Message>")],
            },
            MethodDef {
                name: "logOut".to_string(),
                description: "Logs out.".to_string(),
                fields: vec![],
                return_types: vec![TypeToken::new("bool")],
            },
        ];
        schema
    }

    fn generated() -> serde_json::Value {
        serde_json::to_value(generate(&sample()).unwrap()).unwrap()
    }

    #[test]
    fn abstract_types_become_any_of() {
        let api = generated();
        let schemas = &api["components"]["schemas"];
        assert_eq!(
            schemas["InputMedia"]["anyOf"],
            json!([{ "$ref": "#/components/schemas/InputMediaPhoto" }])
        );
        assert_eq!(schemas["InputMediaPhoto"]["type"], "object");
        assert_eq!(schemas["InputMediaPhoto"]["required"], json!(["type"]));
        assert_eq!(
            schemas["InputMediaPhoto"]["properties"]["type"]["default"],
            "photo"
        );
        assert!(schemas["Error"].is_object());
        assert!(schemas.get("Success").is_none());
    }

    #[test]
    fn methods_become_post_paths() {
        let api = generated();
        assert_eq!(api["info"]["version"], "5.3.0");

        let post = &api["paths"]["/sendMediaGroup"]["post"];
        let body = &post["requestBody"];
        assert_eq!(body["required"], true);
        for content_type in &[JSON, FORM_URL_ENCODED, FORM_DATA] {
            assert!(body["content"][content_type]["schema"].is_object());
        }

        let properties = &body["content"][JSON]["schema"]["properties"];
        assert_eq!(properties["chat_id"]["anyOf"][0]["type"], "integer");
        assert_eq!(properties["chat_id"]["anyOf"][1]["type"], "string");
        assert_eq!(properties["media"]["type"], "array");
        assert_eq!(
            properties["media"]["items"]["$ref"],
            "#/components/schemas/InputMediaPhoto"
        );
        assert!(properties["disable_notification"].get("default").is_none());

        let result = &post["responses"]["200"]["content"][JSON]["schema"]["properties"]["result"];
        assert_eq!(result["type"], "array");
        assert_eq!(result["items"]["$ref"], "#/components/schemas/Message");
    }

    #[test]
    fn methods_without_fields_have_no_body() {
        let api = generated();
        let post = &api["paths"]["/logOut"]["post"];
        assert!(post.get("requestBody").is_none());
        assert_eq!(
            post["responses"]["200"]["content"][JSON]["schema"]["properties"]["result"]["type"],
            "boolean"
        );
    }
}
