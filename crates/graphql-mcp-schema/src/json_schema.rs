//! Synthesizes a draft-7-compatible JSON-Schema object describing the inputs of an operation.
//!
//! Recursive type-to-schema walk with `definitions`-by-name caching, for *input* position:
//! arguments and INPUT_OBJECT fields instead of a caller-authored selection set.

use std::collections::HashSet;

use serde_json::{json, Map, Value};

use crate::type_def::{ArgumentDefinition, Kind};
use crate::type_ref::TypeRef;
use crate::Schema;

/// Builds the input schema for a tool backed by `arguments`, resolving nested types against
/// `schema`. `properties` holds one entry per argument; `required` lists every argument whose
/// outermost type is `NonNull` and whose default is absent (an empty-string default counts as
/// absent, per the boundary behavior in the testable-properties section).
pub fn synthesize_input_schema(schema: &Schema, arguments: &[ArgumentDefinition]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for arg in arguments {
        let mut stack = HashSet::new();
        let mut prop = type_to_schema(schema, &arg.ty, &mut stack);
        if let Some(desc) = &arg.description {
            with_description(&mut prop, desc);
        }
        if let Some(default) = &arg.default_value {
            if !default.is_empty() {
                if let Value::Object(obj) = &mut prop {
                    obj.insert("default".to_string(), convert_default_literal(default, &arg.ty));
                }
            }
        }
        properties.insert(arg.name.clone(), prop);

        let has_default = arg.default_value.as_deref().is_some_and(|d| !d.is_empty());
        if arg.ty.is_non_null() && !has_default {
            required.push(Value::String(arg.name.clone()));
        }
    }

    json!({
        "type": "object",
        "properties": Value::Object(properties),
        "required": Value::Array(required),
    })
}

/// Recursive type-to-schema walk. `stack` tracks INPUT_OBJECT names currently being expanded,
/// so a self-referential input object truncates instead of recursing forever.
fn type_to_schema(schema: &Schema, ty: &TypeRef, stack: &mut HashSet<String>) -> Value {
    match ty {
        TypeRef::NonNull(inner) => type_to_schema(schema, inner, stack),
        TypeRef::List(inner) => {
            json!({
                "type": "array",
                "items": type_to_schema(schema, inner, stack),
            })
        }
        TypeRef::Named(name) => named_type_to_schema(schema, name, stack),
    }
}

fn named_type_to_schema(schema: &Schema, name: &str, stack: &mut HashSet<String>) -> Value {
    if let Some(scalar) = scalar_schema(name) {
        return scalar;
    }

    let Some(def) = schema.resolve(name) else {
        // Introspection types or anything otherwise unresolved never appear as argument
        // positions in practice; fall back to an unconstrained string.
        return json!({ "type": "string" });
    };

    match def.kind {
        Kind::Scalar => json!({ "type": "string" }),
        Kind::Enum => {
            let names: Vec<Value> = def
                .enum_values
                .iter()
                .map(|v| Value::String(v.name.clone()))
                .collect();
            json!({ "type": "string", "enum": names })
        }
        Kind::InputObject => {
            if stack.contains(name) {
                return json!({ "type": "object" });
            }
            stack.insert(name.to_string());

            let mut properties = Map::new();
            let mut required = Vec::new();
            for field in &def.fields {
                let mut prop = type_to_schema(schema, &field.ty, stack);
                if let Some(desc) = &field.description {
                    with_description(&mut prop, desc);
                }
                properties.insert(field.name.clone(), prop);
                if field.ty.is_non_null() {
                    required.push(Value::String(field.name.clone()));
                }
            }

            stack.remove(name);

            let mut obj = json!({
                "type": "object",
                "properties": Value::Object(properties),
                "required": Value::Array(required),
            });
            if let Some(desc) = &def.description {
                with_description(&mut obj, desc);
            }
            obj
        }
        // OBJECT / INTERFACE / UNION never appear as an input position in a valid schema;
        // fall back to an unconstrained object rather than panicking on malformed input.
        Kind::Object | Kind::Interface | Kind::Union => json!({ "type": "object" }),
    }
}

fn scalar_schema(name: &str) -> Option<Value> {
    match name {
        "String" | "ID" => Some(json!({ "type": "string" })),
        "Int" => Some(json!({ "type": "integer" })),
        "Float" => Some(json!({ "type": "number" })),
        "Boolean" => Some(json!({ "type": "boolean" })),
        _ => None,
    }
}

fn with_description(schema: &mut Value, description: &str) {
    if let Value::Object(obj) = schema {
        obj.insert("description".to_string(), Value::String(description.to_string()));
    }
}

/// Converts a raw introspection default-value literal into a JSON value, per the GraphQL type
/// it belongs to: `"true"`/`"false"` become booleans, numeric literals become numbers, quoted
/// strings are unquoted, everything else passes through as a raw string.
fn convert_default_literal(raw: &str, ty: &TypeRef) -> Value {
    let base = ty.base_name();
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        if matches!(base, "Int") {
            return Value::from(i);
        }
    }
    if let Ok(f) = raw.parse::<f64>() {
        if matches!(base, "Float" | "Int") {
            return json!(f);
        }
    }
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return Value::String(raw[1..raw.len() - 1].to_string());
    }
    Value::String(raw.to_string())
}
