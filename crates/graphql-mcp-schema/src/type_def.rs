use crate::type_ref::TypeRef;

/// Classification of a declared GraphQL type, mirroring the introspection `__TypeKind` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    Scalar,
}

impl Kind {
    pub(crate) fn from_introspection_str(s: &str) -> Option<Self> {
        match s {
            "OBJECT" => Some(Kind::Object),
            "INTERFACE" => Some(Kind::Interface),
            "UNION" => Some(Kind::Union),
            "ENUM" => Some(Kind::Enum),
            "INPUT_OBJECT" => Some(Kind::InputObject),
            "SCALAR" => Some(Kind::Scalar),
            _ => None,
        }
    }

    pub(crate) fn sdl_keyword(self) -> &'static str {
        match self {
            Kind::Object => "type",
            Kind::Interface => "interface",
            Kind::Union => "union",
            Kind::Enum => "enum",
            Kind::InputObject => "input",
            Kind::Scalar => "scalar",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArgumentDefinition {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    /// Raw default-value literal as it appeared in introspection (e.g. `"3"`, `"\"x\""`, `"true"`).
    pub default_value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    /// Empty for INPUT_OBJECT fields, which carry no arguments.
    pub arguments: Vec<ArgumentDefinition>,
}

#[derive(Debug, Clone)]
pub struct EnumValueDefinition {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: Kind,
    pub description: Option<String>,
    /// Populated for OBJECT / INTERFACE / INPUT_OBJECT.
    pub fields: Vec<FieldDefinition>,
    /// Populated only for ENUM.
    pub enum_values: Vec<EnumValueDefinition>,
    /// Populated only for UNION: names of member OBJECT types.
    pub possible_types: Vec<String>,
    /// Populated for OBJECT / INTERFACE: names of implemented interfaces.
    pub interfaces: Vec<String>,
}

impl TypeDefinition {
    /// True for built-in scalars and introspection meta-types, neither of which is emitted in SDL.
    pub fn is_builtin_or_introspection(&self) -> bool {
        self.name.starts_with("__")
            || matches!(
                self.name.as_str(),
                "String" | "Int" | "Float" | "Boolean" | "ID"
            )
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}
