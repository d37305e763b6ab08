use thiserror::Error;

/// Failures that can occur while parsing an introspection response into a [`crate::Schema`].
///
/// Mirrors the `CollectionError` style used elsewhere in this workspace: each variant carries
/// a human-readable message, with `#[source]` used where an underlying error exists.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("introspection response is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("type `{0}` declares field `{1}` whose return type `{2}` does not resolve in the registry and is not a built-in scalar")]
    UnresolvedReference(String, String, String),

    #[error("type `{0}` has kind {1:?} but declares {2}, which is only valid for {3}")]
    InconsistentKind(String, super::type_def::Kind, &'static str, &'static str),

    #[error("query root type `{0}` must have kind OBJECT")]
    InvalidQueryRoot(String),

    #[error("mutation root type `{0}` must have kind OBJECT")]
    InvalidMutationRoot(String),

    #[error("union `{0}` lists possible type `{1}`, which does not resolve to an OBJECT")]
    InvalidUnionMember(String, String),

    #[error("type reference is malformed: {0}")]
    MalformedTypeRef(String),

    #[error("failed to parse introspection JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse SDL: {0}")]
    SdlParse(String),
}

/// Failures during JSON-Schema or GraphQL-operation synthesis.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("type `{0}` referenced by an argument or field does not resolve in the schema")]
    UnresolvedType(String),

    #[error("root field `{0}` was not found on the query or mutation root type")]
    UnknownRootField(String),

    #[error("max_depth must be at least 1, got {0}")]
    InvalidMaxDepth(usize),
}
