use serde_json::{json, Value};
use tg_scraper::{Field, MethodDef, Schema};

const COLLECTION_SCHEMA: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";
const BOT_URL: &str = "https://api.telegram.org/bot{{token}}";

/// Postman v2.1 collection with one form-data request per method.
pub fn generate(schema: &Schema) -> Value {
    let items: Vec<Value> = schema.methods.iter().map(request).collect();

    json!({
        "info": {
            "name": "Telegram Bot API",
            "schema": COLLECTION_SCHEMA,
            "version": schema.version.to_string(),
        },
        "variable": [
            { "key": "token", "value": "" }
        ],
        "item": items,
    })
}

fn request(method: &MethodDef) -> Value {
    let formdata: Vec<Value> = method.fields.iter().map(form_field).collect();

    json!({
        "name": method.name,
        "request": {
            "method": "POST",
            "body": {
                "mode": "formdata",
                "formdata": formdata,
            },
            "url": {
                "raw": format!("{}/{}", BOT_URL, method.name),
                "protocol": "https",
                "host": ["api", "telegram", "org"],
                "path": ["bot{{token}}", method.name],
            },
            "description": method.description,
        }
    })
}

fn form_field(field: &Field) -> Value {
    let requirement = if field.optional { "Optional" } else { "Required" };

    json!({
        "key": field.name,
        "disabled": field.optional,
        "description": format!("{}. {}", requirement, field.description),
        "type": "text",
    })
}
