//! Synthesizes a GraphQL operation document and selection set from a root field and a schema.
//!
//! The selection-set walk follows the same push-before-descend / pop-after visited-stack
//! discipline the corpus uses for bounded tree traversal, adapted to a depth limit plus a
//! cycle guard instead of an explicit worklist.

use crate::errors::SynthesisError;
use crate::schema::is_builtin_scalar;
use crate::tool::OperationKind;
use crate::type_def::{FieldDefinition, Kind, TypeDefinition};
use crate::type_ref::TypeRef;
use crate::Schema;

/// Tunables for operation synthesis. `skip_field_substrings` is the heuristic inclusion skip
/// list: a documented, empty-by-default extension point (see module docs on the open question
/// it resolves) — depth and cycle guards remain the primary termination mechanisms.
#[derive(Debug, Clone)]
pub struct SynthesizerConfig {
    pub max_depth: usize,
    pub skip_field_substrings: Vec<String>,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        SynthesizerConfig {
            max_depth: 5,
            skip_field_substrings: Vec::new(),
        }
    }
}

/// Produces `<kind>([$vars]) { <field.name>([args]) { <selection> } }` for `field`.
pub fn synthesize_operation(
    schema: &Schema,
    field: &FieldDefinition,
    kind: OperationKind,
    config: &SynthesizerConfig,
) -> Result<String, SynthesisError> {
    if config.max_depth == 0 {
        return Err(SynthesisError::InvalidMaxDepth(0));
    }

    let var_decls: Vec<String> = field
        .arguments
        .iter()
        .map(|a| format!("${}: {}", a.name, a.ty))
        .collect();
    let call_args: Vec<String> = field
        .arguments
        .iter()
        .map(|a| format!("{}: ${}", a.name, a.name))
        .collect();

    let mut visited = Vec::new();
    let selection = build_selection(schema, &field.ty, config, 0, &mut visited);

    let field_call = if call_args.is_empty() {
        field.name.clone()
    } else {
        format!("{}({})", field.name, call_args.join(", "))
    };
    let field_rendered = match selection {
        Some(body) => format!("{field_call} {body}"),
        None => field_call,
    };

    let doc = if var_decls.is_empty() {
        format!("{} {{ {} }}", kind.as_str(), field_rendered)
    } else {
        format!(
            "{}({}) {{ {} }}",
            kind.as_str(),
            var_decls.join(", "),
            field_rendered
        )
    };
    Ok(doc)
}

/// Finds `field_name` on `root` and synthesizes its operation document.
pub fn synthesize_by_name(
    schema: &Schema,
    root: &TypeDefinition,
    field_name: &str,
    kind: OperationKind,
    config: &SynthesizerConfig,
) -> Result<String, SynthesisError> {
    let field = root
        .field(field_name)
        .ok_or_else(|| SynthesisError::UnknownRootField(field_name.to_string()))?;
    synthesize_operation(schema, field, kind, config)
}

/// Returns `None` for a leaf (scalar/enum, or a depth/cycle cutoff); `Some(body)` otherwise,
/// where `body` is a brace-delimited selection set text.
fn build_selection(
    schema: &Schema,
    ty: &TypeRef,
    config: &SynthesizerConfig,
    depth: usize,
    visited: &mut Vec<String>,
) -> Option<String> {
    let base = ty.base_name();
    if is_builtin_scalar(base) {
        return None;
    }
    let def = schema.resolve(base)?;
    match def.kind {
        Kind::Scalar | Kind::Enum | Kind::InputObject => None,
        Kind::Object => {
            if depth >= config.max_depth {
                return None;
            }
            visited.push(def.name.clone());
            let body = expand_object_fields(schema, def, config, depth, visited);
            visited.pop();
            Some(format!("{{ {body} }}"))
        }
        Kind::Interface => {
            if depth >= config.max_depth {
                return None;
            }
            visited.push(def.name.clone());
            let body = expand_interface(schema, def, config, depth, visited);
            visited.pop();
            Some(format!("{{ {body} }}"))
        }
        Kind::Union => {
            if depth >= config.max_depth {
                return None;
            }
            visited.push(def.name.clone());
            let body = expand_union(schema, def, config, depth, visited);
            visited.pop();
            Some(format!("{{ {body} }}"))
        }
    }
}

fn included(field: &FieldDefinition, current_type: &str, config: &SynthesizerConfig, visited: &[String]) -> bool {
    if field.name.starts_with("__") {
        return false;
    }
    let base = field.ty.base_name();
    if base == current_type {
        return false;
    }
    if visited.iter().any(|v| v == base) {
        return false;
    }
    if config
        .skip_field_substrings
        .iter()
        .any(|s| field.name.contains(s.as_str()))
    {
        return false;
    }
    true
}

fn render_field(
    schema: &Schema,
    field: &FieldDefinition,
    alias: Option<&str>,
    config: &SynthesizerConfig,
    depth: usize,
    visited: &mut Vec<String>,
) -> String {
    let name_part = match alias {
        Some(a) => format!("{a}: {}", field.name),
        None => field.name.clone(),
    };

    if field.arguments.len() > 2 {
        return name_part;
    }

    match build_selection(schema, &field.ty, config, depth + 1, visited) {
        Some(body) => format!("{name_part} {body}"),
        None => name_part,
    }
}

fn expand_object_fields(
    schema: &Schema,
    def: &TypeDefinition,
    config: &SynthesizerConfig,
    depth: usize,
    visited: &mut Vec<String>,
) -> String {
    def.fields
        .iter()
        .filter(|f| included(f, &def.name, config, visited))
        .map(|f| render_field(schema, f, None, config, depth, visited))
        .collect::<Vec<_>>()
        .join(" ")
}

fn expand_interface(
    schema: &Schema,
    iface: &TypeDefinition,
    config: &SynthesizerConfig,
    depth: usize,
    visited: &mut Vec<String>,
) -> String {
    let common = expand_object_fields(schema, iface, config, depth, visited);

    let implementors: Vec<&TypeDefinition> = schema
        .types()
        .iter()
        .filter(|t| t.kind == Kind::Object && t.interfaces.iter().any(|i| i == &iface.name))
        .collect();

    let common_names: Vec<&str> = iface.fields.iter().map(|f| f.name.as_str()).collect();

    let mut parts = vec!["__typename".to_string()];
    if !common.is_empty() {
        parts.push(common);
    }

    for impl_ty in implementors {
        let own_fields: Vec<String> = impl_ty
            .fields
            .iter()
            .filter(|f| !common_names.contains(&f.name.as_str()))
            .filter(|f| included(f, &impl_ty.name, config, visited))
            .map(|f| render_field(schema, f, None, config, depth, visited))
            .collect();
        if !own_fields.is_empty() {
            parts.push(format!("... on {} {{ {} }}", impl_ty.name, own_fields.join(" ")));
        }
    }

    parts.join(" ")
}

fn expand_union(
    schema: &Schema,
    union_def: &TypeDefinition,
    config: &SynthesizerConfig,
    depth: usize,
    visited: &mut Vec<String>,
) -> String {
    let members: Vec<&TypeDefinition> = union_def
        .possible_types
        .iter()
        .filter_map(|name| schema.resolve(name))
        .collect();

    // S(x): number of members declaring field name x.
    let mut name_counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for member in &members {
        for f in &member.fields {
            if included(f, &member.name, config, visited) {
                *name_counts.entry(f.name.as_str()).or_insert(0) += 1;
            }
        }
    }

    let mut parts = vec!["__typename".to_string()];
    for member in members {
        let fields: Vec<String> = member
            .fields
            .iter()
            .filter(|f| included(f, &member.name, config, visited))
            .map(|f| {
                let conflict = name_counts.get(f.name.as_str()).copied().unwrap_or(0) >= 2;
                let alias = conflict.then(|| format!("{}_{}", member.name, f.name));
                render_field(schema, f, alias.as_deref(), config, depth, visited)
            })
            .collect();
        if !fields.is_empty() {
            parts.push(format!("... on {} {{ {} }}", member.name, fields.join(" ")));
        }
    }

    parts.join(" ")
}
