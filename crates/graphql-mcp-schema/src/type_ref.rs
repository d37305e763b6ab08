use std::fmt;

/// A possibly-wrapped reference to a named GraphQL type.
///
/// Wrapping is structural: `NonNull(List(Named("ID")))` renders as `[ID]!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    NonNull(Box<TypeRef>),
    List(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn non_null(self) -> Self {
        TypeRef::NonNull(Box::new(self))
    }

    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    /// Strips every wrapper and returns the innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::NonNull(inner) | TypeRef::List(inner) => inner.base_name(),
        }
    }

    /// True iff the outermost wrapper is `NonNull`.
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// True iff the outermost wrapper is `List` (possibly under no `NonNull`).
    pub fn is_list(&self) -> bool {
        matches!(self, TypeRef::List(_))
    }

    /// The type with one outer `NonNull` wrapper stripped, if present.
    pub fn unwrap_non_null(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_all_wrappers() {
        let t = TypeRef::named("ID").non_null().list().non_null();
        assert_eq!(t.base_name(), "ID");
    }

    #[test]
    fn render_matches_sdl_wrapper_syntax() {
        let t = TypeRef::named("ID").non_null().list().non_null();
        assert_eq!(t.to_string(), "[ID!]!");
    }

    #[test]
    fn outermost_wrapper_classification() {
        let non_null_list = TypeRef::named("Int").list().non_null();
        assert!(non_null_list.is_non_null());
        assert!(!non_null_list.is_list());

        let list = TypeRef::named("Int").non_null().list();
        assert!(list.is_list());
        assert!(!list.is_non_null());

        let named = TypeRef::named("Int");
        assert!(!named.is_non_null());
        assert!(!named.is_list());
    }
}
