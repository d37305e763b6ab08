use std::collections::HashMap;

use crate::errors::SchemaError;
use crate::type_def::{Kind, TypeDefinition};

pub const BUILTIN_SCALARS: &[&str] = &["String", "Int", "Float", "Boolean", "ID"];

pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

pub fn is_introspection_type(name: &str) -> bool {
    name.starts_with("__")
}

/// The root container produced by [`crate::parser::parse_introspection`].
///
/// Built once and immutable after construction. Cloning is shallow-cheap only in the sense
/// that callers are expected to share one instance behind `Arc`; `Schema` itself is plain data.
#[derive(Debug, Clone)]
pub struct Schema {
    types: Vec<TypeDefinition>,
    index: HashMap<String, usize>,
    query_type: Option<String>,
    mutation_type: Option<String>,
}

impl Schema {
    pub fn new(
        types: Vec<TypeDefinition>,
        query_type: Option<String>,
        mutation_type: Option<String>,
    ) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(types.len());
        for (i, t) in types.iter().enumerate() {
            index.insert(t.name.clone(), i);
        }
        let schema = Schema {
            types,
            index,
            query_type,
            mutation_type,
        };
        schema.validate()?;
        Ok(schema)
    }

    pub fn resolve(&self, name: &str) -> Option<&TypeDefinition> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    /// True iff `name` resolves in the registry, is a built-in scalar, or is an introspection type.
    fn resolvable(&self, name: &str) -> bool {
        self.resolve(name).is_some() || is_builtin_scalar(name) || is_introspection_type(name)
    }

    pub fn types(&self) -> &[TypeDefinition] {
        &self.types
    }

    pub fn query_type(&self) -> Option<&TypeDefinition> {
        self.query_type.as_deref().and_then(|n| self.resolve(n))
    }

    pub fn mutation_type(&self) -> Option<&TypeDefinition> {
        self.mutation_type.as_deref().and_then(|n| self.resolve(n))
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if let Some(name) = &self.query_type {
            match self.resolve(name) {
                Some(t) if t.kind == Kind::Object => {}
                Some(_) => return Err(SchemaError::InvalidQueryRoot(name.clone())),
                None => return Err(SchemaError::InvalidQueryRoot(name.clone())),
            }
        }
        if let Some(name) = &self.mutation_type {
            match self.resolve(name) {
                Some(t) if t.kind == Kind::Object => {}
                Some(_) => return Err(SchemaError::InvalidMutationRoot(name.clone())),
                None => return Err(SchemaError::InvalidMutationRoot(name.clone())),
            }
        }

        for t in &self.types {
            for field in &t.fields {
                let base = field.ty.base_name();
                if !self.resolvable(base) {
                    return Err(SchemaError::UnresolvedReference(
                        t.name.clone(),
                        field.name.clone(),
                        base.to_string(),
                    ));
                }
                for arg in &field.arguments {
                    let abase = arg.ty.base_name();
                    if !self.resolvable(abase) {
                        return Err(SchemaError::UnresolvedReference(
                            t.name.clone(),
                            format!("{}({})", field.name, arg.name),
                            abase.to_string(),
                        ));
                    }
                }
            }

            if t.kind == Kind::Union {
                for member in &t.possible_types {
                    match self.resolve(member) {
                        Some(mt) if mt.kind == Kind::Object => {}
                        _ => {
                            return Err(SchemaError::InvalidUnionMember(
                                t.name.clone(),
                                member.clone(),
                            ));
                        }
                    }
                }
            }

            if t.kind == Kind::Object {
                for iface_name in &t.interfaces {
                    let Some(iface) = self.resolve(iface_name) else {
                        return Err(SchemaError::UnresolvedReference(
                            t.name.clone(),
                            "interfaces".to_string(),
                            iface_name.clone(),
                        ));
                    };
                    if iface.kind != Kind::Interface {
                        return Err(SchemaError::InconsistentKind(
                            iface_name.clone(),
                            iface.kind,
                            "interfaces",
                            "INTERFACE",
                        ));
                    }
                    for iface_field in &iface.fields {
                        match t.field(&iface_field.name) {
                            Some(obj_field) if obj_field.ty.base_name() == iface_field.ty.base_name() => {}
                            _ => {
                                return Err(SchemaError::InconsistentKind(
                                    t.name.clone(),
                                    t.kind,
                                    "interfaces",
                                    "a superset of the interface's fields",
                                ));
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
