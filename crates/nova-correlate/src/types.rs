use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::NodeId;

/// A class name in the form compiled code uses: `/` between packages and `$`
/// before nested classes, e.g. `java/util/Map$Entry`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BinaryName(String);

impl BinaryName {
    /// Wraps a name that is already in binary form.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Builds a binary name from a dotted package and the chain of class names
    /// from the top-level class down to the nested one.
    ///
    /// `from_source("java.util", &["Map", "Entry"])` is `java/util/Map$Entry`.
    pub fn from_source(package: &str, classes: &[&str]) -> Self {
        let mut out = String::with_capacity(
            package.len() + classes.iter().map(|c| c.len() + 1).sum::<usize>(),
        );
        if !package.is_empty() {
            out.extend(package.split('.').flat_map(|seg| [seg, "/"]));
        }
        for (i, class) in classes.iter().enumerate() {
            if i > 0 {
                out.push('$');
            }
            out.push_str(class);
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The package part in binary form (`java/util`), if any.
    pub fn package(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(package, _)| package)
    }

    /// The innermost class name (`Entry` for `java/util/Map$Entry`).
    pub fn simple_name(&self) -> &str {
        let class = self.0.rsplit_once('/').map_or(self.0.as_str(), |(_, c)| c);
        class.rsplit_once('$').map_or(class, |(_, c)| c)
    }
}

impl fmt::Debug for BinaryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for BinaryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BinaryName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BinaryName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A class or interface type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclaredType {
    pub binary_name: BinaryName,
}

impl DeclaredType {
    pub fn new(binary_name: impl Into<BinaryName>) -> Self {
        Self {
            binary_name: binary_name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeVariable {
    pub name: String,
    /// Upper bounds in source order. An unbounded variable has the single
    /// bound `java/lang/Object`.
    pub bounds: Vec<ResolvedType>,
}

/// The type of an expression as far as correlation cares.
///
/// Primitive and array types never own a called method; resolvers report them
/// (and anything else they cannot type) as [`ResolvedType::Error`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedType {
    Declared(DeclaredType),
    TypeVariable(TypeVariable),
    Error,
}

impl ResolvedType {
    pub fn declared(binary_name: impl Into<BinaryName>) -> Self {
        ResolvedType::Declared(DeclaredType::new(binary_name))
    }

    pub fn type_variable(name: impl Into<String>, bounds: Vec<ResolvedType>) -> Self {
        ResolvedType::TypeVariable(TypeVariable {
            name: name.into(),
            bounds,
        })
    }
}

/// Type and scope queries the describer needs from the host's semantic model.
pub trait TypeResolver {
    /// Type of the expression `expr`.
    fn type_of(&self, expr: NodeId) -> ResolvedType;

    /// Innermost class enclosing the scope at node `at`.
    fn enclosing_class(&self, at: NodeId) -> Option<DeclaredType>;
}

impl<T: TypeResolver + ?Sized> TypeResolver for &T {
    fn type_of(&self, expr: NodeId) -> ResolvedType {
        (**self).type_of(expr)
    }

    fn enclosing_class(&self, at: NodeId) -> Option<DeclaredType> {
        (**self).enclosing_class(at)
    }
}

/// A [`TypeResolver`] over precomputed answers.
///
/// Unknown expressions resolve to [`ResolvedType::Error`]; unknown scopes fall
/// back to the default enclosing class, if one was set.
#[derive(Clone, Debug, Default)]
pub struct MapResolver {
    types: HashMap<NodeId, ResolvedType>,
    enclosing: HashMap<NodeId, DeclaredType>,
    default_enclosing: Option<DeclaredType>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, expr: NodeId, ty: ResolvedType) -> Self {
        self.types.insert(expr, ty);
        self
    }

    pub fn with_enclosing_class(mut self, at: NodeId, class: DeclaredType) -> Self {
        self.enclosing.insert(at, class);
        self
    }

    pub fn with_default_enclosing_class(mut self, class: DeclaredType) -> Self {
        self.default_enclosing = Some(class);
        self
    }
}

impl TypeResolver for MapResolver {
    fn type_of(&self, expr: NodeId) -> ResolvedType {
        self.types.get(&expr).cloned().unwrap_or(ResolvedType::Error)
    }

    fn enclosing_class(&self, at: NodeId) -> Option<DeclaredType> {
        self.enclosing
            .get(&at)
            .or(self.default_enclosing.as_ref())
            .cloned()
    }
}
