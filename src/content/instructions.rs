/*!
 * Format instructions derived from a schema descriptor.
 *
 * The model receives these instructions alongside the transcript so it can
 * check the shape of its own output. Everything here is pure: the same
 * descriptor always renders the same text.
 */

use serde_json::{json, Map, Value};

use super::schema::{FieldDescriptor, FieldType, SchemaDescriptor};

const INSTRUCTIONS_HEADER: &str = "The output should be formatted as a JSON instance that conforms to the JSON schema below.

As an example, for the schema {\"properties\": {\"foo\": {\"title\": \"Foo\", \"description\": \"a list of strings\", \"type\": \"array\", \"items\": {\"type\": \"string\"}}}, \"required\": [\"foo\"]}
the object {\"foo\": [\"bar\", \"baz\"]} is a well-formatted instance of the schema. The object {\"properties\": {\"foo\": [\"bar\", \"baz\"]}} is not well-formatted.";

/// Render the JSON schema for a descriptor
pub fn json_schema(descriptor: &SchemaDescriptor) -> Value {
    let mut schema = object_schema(&descriptor.fields);
    if let Value::Object(ref mut map) = schema {
        map.insert("title".to_string(), Value::String(descriptor.name.to_string()));
        map.insert(
            "description".to_string(),
            Value::String(descriptor.description.to_string()),
        );
    }
    schema
}

fn object_schema(fields: &[FieldDescriptor]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        let mut property = field_schema(&field.field_type);
        if let Value::Object(ref mut map) = property {
            map.insert("title".to_string(), Value::String(title_case(field.name)));
            map.insert(
                "description".to_string(),
                Value::String(field.description.to_string()),
            );
        }
        properties.insert(field.name.to_string(), property);
    }

    let required: Vec<Value> = fields
        .iter()
        .map(|f| Value::String(f.name.to_string()))
        .collect();

    json!({
        "type": "object",
        "properties": Value::Object(properties),
        "required": required,
    })
}

fn field_schema(field_type: &FieldType) -> Value {
    match field_type {
        FieldType::String => json!({ "type": "string" }),
        FieldType::Integer { min, max } => json!({
            "type": "integer",
            "minimum": min,
            "maximum": max,
        }),
        FieldType::Array { items, len } => json!({
            "type": "array",
            "items": field_schema(items),
            "minItems": len,
            "maxItems": len,
        }),
        FieldType::Object(fields) => object_schema(fields),
    }
}

/// `video_title` -> `Video Title`
fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One line per constrained field, e.g. `- quiz[].options: array of exactly 4 string`
fn constraint_lines(fields: &[FieldDescriptor], prefix: &str, out: &mut Vec<String>) {
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", prefix, field.name)
        };
        out.push(format!("- {}: {}", path, field.field_type.type_name()));

        match &field.field_type {
            FieldType::Object(inner) => constraint_lines(inner, &path, out),
            FieldType::Array { items, .. } => {
                if let FieldType::Object(inner) = items.as_ref() {
                    constraint_lines(inner, &format!("{}[]", path), out);
                }
            }
            _ => {}
        }
    }
}

/// Build the full format instructions for a schema.
///
/// The text contains the JSON schema plus a flat list of the field
/// constraints (types, exact array lengths, integer bounds).
pub fn format_instructions(descriptor: &SchemaDescriptor) -> String {
    let schema = json_schema(descriptor);
    let schema_text = serde_json::to_string(&schema).unwrap_or_else(|_| "{}".to_string());

    let mut constraints = Vec::new();
    constraint_lines(&descriptor.fields, "", &mut constraints);

    format!(
        "{}\n\nHere is the output schema:\n```\n{}\n```\n\nField constraints:\n{}\n\nReturn only the JSON object, without markdown fences or commentary.",
        INSTRUCTIONS_HEADER,
        schema_text,
        constraints.join("\n")
    )
}
