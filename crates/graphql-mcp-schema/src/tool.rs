use crate::json_schema::synthesize_input_schema;
use crate::type_def::FieldDefinition;
use crate::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        }
    }

    pub fn name_prefix(self) -> &'static str {
        match self {
            OperationKind::Query => "query_",
            OperationKind::Mutation => "mutation_",
        }
    }
}

/// A callable derived at registration time from a single root field.
#[derive(Debug, Clone)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub operation_kind: OperationKind,
    pub input_schema: serde_json::Value,
    pub field: FieldDefinition,
}

/// One tool per field of the query root, one per field of the mutation root. Names are
/// `query_<field>` / `mutation_<field>`; descriptions fall back to a generated default when
/// the field carries none.
pub fn derive_tools(schema: &Schema) -> Vec<Tool> {
    let mut tools = Vec::new();
    if let Some(query) = schema.query_type() {
        tools.extend(derive_for_root(schema, &query.fields, OperationKind::Query));
    }
    if let Some(mutation) = schema.mutation_type() {
        tools.extend(derive_for_root(schema, &mutation.fields, OperationKind::Mutation));
    }
    tools
}

fn derive_for_root(schema: &Schema, fields: &[FieldDefinition], kind: OperationKind) -> Vec<Tool> {
    fields
        .iter()
        .map(|field| {
            let description = field
                .description
                .clone()
                .unwrap_or_else(|| format!("Execute GraphQL {}: {}", kind.as_str(), field.name));
            Tool {
                name: format!("{}{}", kind.name_prefix(), field.name),
                description,
                operation_kind: kind,
                input_schema: synthesize_input_schema(schema, &field.arguments),
                field: field.clone(),
            }
        })
        .collect()
}
