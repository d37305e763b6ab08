//! Parses the `data` subtree of a GraphQL introspection response into a [`crate::Schema`].

use serde_json::Value;

use crate::errors::SchemaError;
use crate::type_def::{ArgumentDefinition, EnumValueDefinition, FieldDefinition, Kind, TypeDefinition};
use crate::type_ref::TypeRef;
use crate::Schema;

/// The standard introspection query this parser expects a response to.
pub const INTROSPECTION_QUERY: &str = include_str!("introspection_query.graphql");

/// Parses the `data` object of an introspection response (i.e. the value at `response["data"]`,
/// or the bare `{"__schema": {...}}` object) into a [`Schema`].
pub fn parse_introspection(data: &Value) -> Result<Schema, SchemaError> {
    let schema_obj = data
        .get("__schema")
        .ok_or(SchemaError::MissingField("__schema"))?;

    let query_type = schema_obj
        .get("queryType")
        .and_then(|v| v.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let mutation_type = schema_obj
        .get("mutationType")
        .filter(|v| !v.is_null())
        .and_then(|v| v.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let raw_types = schema_obj
        .get("types")
        .and_then(Value::as_array)
        .ok_or(SchemaError::MissingField("__schema.types"))?;

    let types = raw_types
        .iter()
        .map(parse_type_definition)
        .collect::<Result<Vec<_>, _>>()?;

    Schema::new(types, query_type, mutation_type)
}

fn parse_type_definition(v: &Value) -> Result<TypeDefinition, SchemaError> {
    let name = v
        .get("name")
        .and_then(Value::as_str)
        .ok_or(SchemaError::MissingField("name"))?
        .to_string();

    let kind_str = v
        .get("kind")
        .and_then(Value::as_str)
        .ok_or(SchemaError::MissingField("kind"))?;
    let kind = Kind::from_introspection_str(kind_str)
        .ok_or_else(|| SchemaError::MalformedTypeRef(format!("unknown kind `{kind_str}` for type `{name}`")))?;

    let description = v
        .get("description")
        .filter(|d| !d.is_null())
        .and_then(Value::as_str)
        .map(str::to_string);

    let fields = match kind {
        Kind::Object | Kind::Interface => parse_fields(v.get("fields"))?,
        Kind::InputObject => parse_input_fields(v.get("inputFields"))?,
        _ => Vec::new(),
    };

    let enum_values = if kind == Kind::Enum {
        parse_enum_values(v.get("enumValues"))?
    } else {
        Vec::new()
    };

    let possible_types = if kind == Kind::Union {
        v.get("possibleTypes")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|t| t.get("name").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    let interfaces = if matches!(kind, Kind::Object | Kind::Interface) {
        v.get("interfaces")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|t| t.get("name").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    Ok(TypeDefinition {
        name,
        kind,
        description,
        fields,
        enum_values,
        possible_types,
        interfaces,
    })
}

fn parse_fields(fields: Option<&Value>) -> Result<Vec<FieldDefinition>, SchemaError> {
    let Some(fields) = fields.and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    fields
        .iter()
        .map(|f| {
            let name = f
                .get("name")
                .and_then(Value::as_str)
                .ok_or(SchemaError::MissingField("field.name"))?
                .to_string();
            let description = f
                .get("description")
                .filter(|d| !d.is_null())
                .and_then(Value::as_str)
                .map(str::to_string);
            let ty = parse_type_ref(f.get("type").ok_or(SchemaError::MissingField("field.type"))?)?;
            let arguments = f
                .get("args")
                .and_then(Value::as_array)
                .map(|args| args.iter().map(parse_argument).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default();
            Ok(FieldDefinition {
                name,
                description,
                ty,
                arguments,
            })
        })
        .collect()
}

/// `INPUT_OBJECT` fields use `inputFields` and never carry arguments.
fn parse_input_fields(fields: Option<&Value>) -> Result<Vec<FieldDefinition>, SchemaError> {
    let Some(fields) = fields.and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    fields
        .iter()
        .map(|f| {
            let arg = parse_argument(f)?;
            Ok(FieldDefinition {
                name: arg.name,
                description: arg.description,
                ty: arg.ty,
                arguments: Vec::new(),
            })
        })
        .collect()
}

fn parse_argument(v: &Value) -> Result<ArgumentDefinition, SchemaError> {
    let name = v
        .get("name")
        .and_then(Value::as_str)
        .ok_or(SchemaError::MissingField("argument.name"))?
        .to_string();
    let description = v
        .get("description")
        .filter(|d| !d.is_null())
        .and_then(Value::as_str)
        .map(str::to_string);
    let ty = parse_type_ref(v.get("type").ok_or(SchemaError::MissingField("argument.type"))?)?;
    let default_value = v
        .get("defaultValue")
        .filter(|d| !d.is_null())
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ArgumentDefinition {
        name,
        description,
        ty,
        default_value,
    })
}

fn parse_enum_values(values: Option<&Value>) -> Result<Vec<EnumValueDefinition>, SchemaError> {
    let Some(values) = values.and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    values
        .iter()
        .map(|v| {
            let name = v
                .get("name")
                .and_then(Value::as_str)
                .ok_or(SchemaError::MissingField("enumValue.name"))?
                .to_string();
            let description = v
                .get("description")
                .filter(|d| !d.is_null())
                .and_then(Value::as_str)
                .map(str::to_string);
            Ok(EnumValueDefinition { name, description })
        })
        .collect()
}

/// Recursively parses a `__Type` reference. `NON_NULL` and `LIST` must carry `ofType`; any
/// other kind must carry a `name`. The innermost named reference is not resolved here.
fn parse_type_ref(v: &Value) -> Result<TypeRef, SchemaError> {
    let kind = v
        .get("kind")
        .and_then(Value::as_str)
        .ok_or(SchemaError::MissingField("type.kind"))?;

    match kind {
        "NON_NULL" => {
            let of_type = v.get("ofType").ok_or_else(|| {
                SchemaError::MalformedTypeRef("NON_NULL type reference missing ofType".to_string())
            })?;
            Ok(TypeRef::NonNull(Box::new(parse_type_ref(of_type)?)))
        }
        "LIST" => {
            let of_type = v.get("ofType").ok_or_else(|| {
                SchemaError::MalformedTypeRef("LIST type reference missing ofType".to_string())
            })?;
            Ok(TypeRef::List(Box::new(parse_type_ref(of_type)?)))
        }
        _ => {
            let name = v
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| SchemaError::MalformedTypeRef(format!("{kind} type reference missing name")))?;
            Ok(TypeRef::Named(name.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_simple_scalar_query_schema() {
        let data = json!({
            "__schema": {
                "queryType": {"name": "Query"},
                "mutationType": null,
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Query",
                        "description": null,
                        "fields": [{
                            "name": "count",
                            "description": null,
                            "args": [],
                            "type": {"kind": "NON_NULL", "ofType": {"kind": "SCALAR", "name": "Int"}},
                        }],
                        "inputFields": null,
                        "interfaces": [],
                        "enumValues": null,
                        "possibleTypes": null,
                    },
                ],
            },
        });

        let schema = parse_introspection(&data).expect("valid introspection response");
        let query = schema.query_type().expect("query root");
        let count = query.field("count").expect("count field");
        assert!(count.ty.is_non_null());
        assert_eq!(count.ty.base_name(), "Int");
        assert!(schema.mutation_type().is_none());
    }

    #[test]
    fn rejects_response_missing_schema_key() {
        let err = parse_introspection(&json!({})).unwrap_err();
        assert!(matches!(err, SchemaError::MissingField("__schema")));
    }

    #[test]
    fn parses_list_and_non_null_wrapping_for_arguments() {
        let data = json!({
            "__schema": {
                "queryType": {"name": "Query"},
                "mutationType": null,
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Query",
                        "description": null,
                        "fields": [{
                            "name": "users",
                            "description": null,
                            "args": [{
                                "name": "ids",
                                "description": null,
                                "type": {
                                    "kind": "NON_NULL",
                                    "ofType": {
                                        "kind": "LIST",
                                        "ofType": {
                                            "kind": "NON_NULL",
                                            "ofType": {"kind": "SCALAR", "name": "ID"}
                                        }
                                    }
                                },
                                "defaultValue": null,
                            }],
                            "type": {"kind": "LIST", "ofType": {"kind": "SCALAR", "name": "String"}},
                        }],
                        "inputFields": null,
                        "interfaces": [],
                        "enumValues": null,
                        "possibleTypes": null,
                    },
                ],
            },
        });

        let schema = parse_introspection(&data).expect("valid");
        let field = schema.query_type().expect("root").field("users").expect("field");
        let arg = &field.arguments[0];
        assert_eq!(arg.ty.to_string(), "[ID!]!");
    }
}
