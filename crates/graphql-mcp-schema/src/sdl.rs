//! SDL (Schema Definition Language) emission, and a minimal parser sufficient to round-trip
//! the SDL this module emits (used to test the `Parse . Emit-SDL . Parse` idempotence property).

use std::fmt::Write as _;

use crate::errors::SchemaError;
use crate::schema::{is_builtin_scalar, is_introspection_type};
use crate::type_def::{ArgumentDefinition, FieldDefinition, Kind, TypeDefinition};
use crate::type_ref::TypeRef;
use crate::Schema;

/// Renders every user-declared type in `schema` as SDL text, in declaration order.
/// Built-in scalars and introspection types are excluded, per invariant.
pub fn emit_sdl(schema: &Schema) -> String {
    let mut out = String::new();
    for t in schema.types() {
        if t.is_builtin_or_introspection() {
            continue;
        }
        write_type(&mut out, t);
        out.push('\n');
    }
    out
}

fn write_type(out: &mut String, t: &TypeDefinition) {
    if let Some(desc) = &t.description {
        let _ = writeln!(out, "\"\"\"{desc}\"\"\"");
    }
    match t.kind {
        Kind::Scalar => {
            let _ = writeln!(out, "scalar {}", t.name);
        }
        Kind::Enum => {
            let _ = writeln!(out, "enum {} {{", t.name);
            for v in &t.enum_values {
                let _ = writeln!(out, "  {}", v.name);
            }
            let _ = writeln!(out, "}}");
        }
        Kind::Union => {
            let members = t.possible_types.join(" | ");
            let _ = writeln!(out, "union {} = {}", t.name, members);
        }
        Kind::Object | Kind::Interface | Kind::InputObject => {
            let keyword = t.kind.sdl_keyword();
            if t.kind != Kind::InputObject && !t.interfaces.is_empty() {
                let _ = writeln!(out, "{} {} implements {} {{", keyword, t.name, t.interfaces.join(" & "));
            } else {
                let _ = writeln!(out, "{} {} {{", keyword, t.name);
            }
            for f in &t.fields {
                write_field(out, f, t.kind == Kind::InputObject);
            }
            let _ = writeln!(out, "}}");
        }
    }
}

fn write_field(out: &mut String, f: &FieldDefinition, is_input_field: bool) {
    if is_input_field {
        let _ = write!(out, "  {}: {}", f.name, f.ty);
    } else if f.arguments.is_empty() {
        let _ = write!(out, "  {}: {}", f.name, f.ty);
    } else {
        let args = f
            .arguments
            .iter()
            .map(render_argument)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(out, "  {}({}): {}", f.name, args, f.ty);
    }
    out.push('\n');
}

fn render_argument(a: &ArgumentDefinition) -> String {
    match &a.default_value {
        Some(d) if !d.is_empty() => format!("{}: {} = {}", a.name, a.ty, d),
        _ => format!("{}: {}", a.name, a.ty),
    }
}

/// Parses SDL text of the shape emitted by [`emit_sdl`]. Intentionally not a general-purpose
/// GraphQL SDL parser: it understands only the subset of syntax this module produces
/// (no directives, no descriptions on fields/arguments, no block-string escaping).
pub fn parse_sdl(sdl: &str) -> Result<Vec<TypeDefinition>, SchemaError> {
    let mut types = Vec::new();
    let mut lines = sdl.lines().peekable();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("\"\"\"") {
            // Single-line block-string description; the following line declares the type.
            continue;
        }
        if let Some(rest) = line.strip_prefix("scalar ") {
            types.push(TypeDefinition {
                name: rest.trim().to_string(),
                kind: Kind::Scalar,
                description: None,
                fields: vec![],
                enum_values: vec![],
                possible_types: vec![],
                interfaces: vec![],
            });
            continue;
        }
        if let Some(rest) = line.strip_prefix("union ") {
            let (name, members) = rest
                .split_once('=')
                .ok_or_else(|| SchemaError::SdlParse(format!("malformed union declaration: {line}")))?;
            types.push(TypeDefinition {
                name: name.trim().to_string(),
                kind: Kind::Union,
                description: None,
                fields: vec![],
                enum_values: vec![],
                possible_types: members.split('|').map(|s| s.trim().to_string()).collect(),
                interfaces: vec![],
            });
            continue;
        }
        if let Some(rest) = line.strip_prefix("enum ") {
            let name = rest.trim_end_matches('{').trim().to_string();
            let mut enum_values = Vec::new();
            for body_line in lines.by_ref() {
                let body_line = body_line.trim();
                if body_line == "}" {
                    break;
                }
                enum_values.push(crate::type_def::EnumValueDefinition {
                    name: body_line.to_string(),
                    description: None,
                });
            }
            types.push(TypeDefinition {
                name,
                kind: Kind::Enum,
                description: None,
                fields: vec![],
                enum_values,
                possible_types: vec![],
                interfaces: vec![],
            });
            continue;
        }
        if let Some(rest) = line
            .strip_prefix("type ")
            .or_else(|| line.strip_prefix("interface "))
            .or_else(|| line.strip_prefix("input "))
        {
            let kind = if line.starts_with("type ") {
                Kind::Object
            } else if line.starts_with("interface ") {
                Kind::Interface
            } else {
                Kind::InputObject
            };
            let header = rest.trim_end_matches('{').trim();
            let (name, interfaces) = if let Some((n, ifaces)) = header.split_once(" implements ") {
                (
                    n.trim().to_string(),
                    ifaces.split('&').map(|s| s.trim().to_string()).collect(),
                )
            } else {
                (header.to_string(), Vec::new())
            };

            let mut fields = Vec::new();
            for body_line in lines.by_ref() {
                let body_line = body_line.trim();
                if body_line == "}" {
                    break;
                }
                fields.push(parse_field_line(body_line)?);
            }

            types.push(TypeDefinition {
                name,
                kind,
                description: None,
                fields,
                enum_values: vec![],
                possible_types: vec![],
                interfaces,
            });
            continue;
        }

        return Err(SchemaError::SdlParse(format!("unrecognized SDL line: {line}")));
    }

    Ok(types)
}

fn parse_field_line(line: &str) -> Result<FieldDefinition, SchemaError> {
    let (name_and_args, ty_part) = line
        .split_once(':')
        .ok_or_else(|| SchemaError::SdlParse(format!("malformed field: {line}")))?;
    let name_and_args = name_and_args.trim();

    let (name, arguments) = if let Some(open) = name_and_args.find('(') {
        let name = name_and_args[..open].trim().to_string();
        let close = name_and_args
            .rfind(')')
            .ok_or_else(|| SchemaError::SdlParse(format!("unbalanced parens: {line}")))?;
        let args_str = &name_and_args[open + 1..close];
        let arguments = args_str
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(parse_argument_str)
            .collect::<Result<Vec<_>, _>>()?;
        (name, arguments)
    } else {
        (name_and_args.to_string(), Vec::new())
    };

    let ty = parse_type_ref_str(ty_part.trim())?;
    Ok(FieldDefinition {
        name,
        description: None,
        ty,
        arguments,
    })
}

fn parse_argument_str(s: &str) -> Result<ArgumentDefinition, SchemaError> {
    let (name_part, rest) = s
        .split_once(':')
        .ok_or_else(|| SchemaError::SdlParse(format!("malformed argument: {s}")))?;
    let (ty_str, default_value) = match rest.split_once('=') {
        Some((t, d)) => (t.trim(), Some(d.trim().to_string())),
        None => (rest.trim(), None),
    };
    Ok(ArgumentDefinition {
        name: name_part.trim().to_string(),
        description: None,
        ty: parse_type_ref_str(ty_str)?,
        default_value,
    })
}

fn parse_type_ref_str(s: &str) -> Result<TypeRef, SchemaError> {
    let s = s.trim();
    if let Some(inner) = s.strip_suffix('!') {
        return Ok(TypeRef::NonNull(Box::new(parse_type_ref_str(inner)?)));
    }
    if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        return Ok(TypeRef::List(Box::new(parse_type_ref_str(inner)?)));
    }
    if s.is_empty() {
        return Err(SchemaError::SdlParse("empty type reference".to_string()));
    }
    Ok(TypeRef::Named(s.to_string()))
}

/// True for names this module never emits SDL for.
pub fn is_suppressed(name: &str) -> bool {
    is_builtin_scalar(name) || is_introspection_type(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_def::EnumValueDefinition;

    fn sample_types() -> Vec<TypeDefinition> {
        vec![
            TypeDefinition {
                name: "Query".to_string(),
                kind: Kind::Object,
                description: None,
                fields: vec![FieldDefinition {
                    name: "users".to_string(),
                    description: None,
                    ty: TypeRef::named("User").non_null().list().non_null(),
                    arguments: vec![ArgumentDefinition {
                        name: "ids".to_string(),
                        description: None,
                        ty: TypeRef::named("ID").non_null().list().non_null(),
                        default_value: None,
                    }],
                }],
                enum_values: vec![],
                possible_types: vec![],
                interfaces: vec![],
            },
            TypeDefinition {
                name: "User".to_string(),
                kind: Kind::Object,
                description: None,
                fields: vec![
                    FieldDefinition {
                        name: "id".to_string(),
                        description: None,
                        ty: TypeRef::named("ID").non_null(),
                        arguments: vec![],
                    },
                    FieldDefinition {
                        name: "role".to_string(),
                        description: None,
                        ty: TypeRef::named("Role"),
                        arguments: vec![],
                    },
                ],
                enum_values: vec![],
                possible_types: vec![],
                interfaces: vec![],
            },
            TypeDefinition {
                name: "Role".to_string(),
                kind: Kind::Enum,
                description: None,
                fields: vec![],
                enum_values: vec![
                    EnumValueDefinition {
                        name: "ADMIN".to_string(),
                        description: None,
                    },
                    EnumValueDefinition {
                        name: "MEMBER".to_string(),
                        description: None,
                    },
                ],
                possible_types: vec![],
                interfaces: vec![],
            },
        ]
    }

    #[test]
    fn emits_wrapper_syntax_and_arguments() {
        let schema = Schema::new(sample_types(), Some("Query".to_string()), None).expect("valid");
        let sdl = emit_sdl(&schema);
        assert!(sdl.contains("users(ids: [ID!]!): [User!]!"));
        assert!(sdl.contains("enum Role {"));
    }

    #[test]
    fn parse_emit_parse_is_idempotent() {
        let schema = Schema::new(sample_types(), Some("Query".to_string()), None).expect("valid");
        let sdl_once = emit_sdl(&schema);

        let reparsed_types = parse_sdl(&sdl_once).expect("sdl parses");
        let reparsed = Schema::new(reparsed_types, Some("Query".to_string()), None).expect("valid");
        let sdl_twice = emit_sdl(&reparsed);

        assert_eq!(sdl_once, sdl_twice);
    }

    #[test]
    fn excludes_builtin_and_introspection_types_from_sdl() {
        assert!(is_suppressed("String"));
        assert!(is_suppressed("__Type"));
        assert!(!is_suppressed("User"));
    }
}
