//! Typed GraphQL schema model, introspection parser, SDL emission, JSON-Schema synthesis, and
//! GraphQL operation synthesis.
//!
//! This crate has no knowledge of MCP or any transport; it is a pure schema-to-document
//! pipeline consumed by `graphql-mcp-server`.

pub mod errors;
pub mod json_schema;
pub mod operation;
pub mod parser;
pub mod schema;
pub mod sdl;
pub mod tool;
pub mod type_def;
pub mod type_ref;

pub use errors::{SchemaError, SynthesisError};
pub use operation::{synthesize_by_name, synthesize_operation, SynthesizerConfig};
pub use parser::parse_introspection;
pub use schema::Schema;
pub use sdl::emit_sdl;
pub use tool::{derive_tools, OperationKind, Tool};
pub use type_def::{ArgumentDefinition, EnumValueDefinition, FieldDefinition, Kind, TypeDefinition};
pub use type_ref::TypeRef;
