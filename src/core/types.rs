//! The generic type model.
//!
//! Every type appearing in a method signature is translated into one of the
//! closed set of variants below. Rendering a [`Type`] with `Display` always
//! produces valid Go source syntax for that type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of a channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    /// `chan T`
    #[default]
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

impl ChanDir {
    /// The keyword prefix for this direction, including the trailing space.
    pub fn prefix(&self) -> &'static str {
        match self {
            ChanDir::Both => "chan ",
            ChanDir::Send => "chan<- ",
            ChanDir::Recv => "<-chan ",
        }
    }
}

/// Length of an array type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayLen {
    /// A slice: `[]T`
    #[default]
    Unbounded,
    /// A fixed-size array: `[N]T`
    Fixed(u64),
}

/// A Go type that can be rendered back into source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    /// A predeclared or package-local type such as `string` or `myStruct`.
    Builtin { name: String },

    /// A type qualified by a package name, e.g. `io.Reader`.
    Exported { package: String, ty: Box<Type> },

    /// A slice or fixed-size array.
    Array { len: ArrayLen, elem: Box<Type> },

    /// A channel.
    Chan { dir: ChanDir, elem: Box<Type> },

    /// The final `...T` parameter of a signature.
    Variadic { elem: Box<Type> },

    /// A function type.
    Func { inputs: Vec<Type>, outputs: Vec<Type> },

    /// A map type.
    Map { key: Box<Type>, value: Box<Type> },

    /// A pointer type.
    Pointer { elem: Box<Type> },
}

impl Type {
    /// A predeclared or local type.
    pub fn builtin(name: impl Into<String>) -> Self {
        Type::Builtin { name: name.into() }
    }

    /// A type exported from `package`.
    pub fn exported(package: impl Into<String>, name: impl Into<String>) -> Self {
        Type::Exported {
            package: package.into(),
            ty: Box::new(Type::builtin(name)),
        }
    }

    /// `[]elem`
    pub fn slice(elem: Type) -> Self {
        Type::Array {
            len: ArrayLen::Unbounded,
            elem: Box::new(elem),
        }
    }

    /// `[len]elem`
    pub fn array(len: u64, elem: Type) -> Self {
        Type::Array {
            len: ArrayLen::Fixed(len),
            elem: Box::new(elem),
        }
    }

    /// A channel in the given direction.
    pub fn chan(dir: ChanDir, elem: Type) -> Self {
        Type::Chan {
            dir,
            elem: Box::new(elem),
        }
    }

    /// `...elem`
    pub fn variadic(elem: Type) -> Self {
        Type::Variadic {
            elem: Box::new(elem),
        }
    }

    /// A function type.
    pub fn func(inputs: Vec<Type>, outputs: Vec<Type>) -> Self {
        Type::Func { inputs, outputs }
    }

    /// `map[key]value`
    pub fn map(key: Type, value: Type) -> Self {
        Type::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// `*elem`
    pub fn pointer(elem: Type) -> Self {
        Type::Pointer {
            elem: Box::new(elem),
        }
    }

    /// The package qualifier, if this is an exported type.
    pub fn package(&self) -> Option<&str> {
        match self {
            Type::Exported { package, .. } => Some(package),
            _ => None,
        }
    }

    /// The unqualified name of a named type.
    pub fn name(&self) -> Option<&str> {
        match self {
            Type::Builtin { name } => Some(name),
            Type::Exported { ty, .. } => ty.name(),
            _ => None,
        }
    }

    /// Check if this is a variadic parameter type.
    pub fn is_variadic(&self) -> bool {
        matches!(self, Type::Variadic { .. })
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Builtin { name } => f.write_str(name),
            Type::Exported { package, ty } => write!(f, "{}.{}", package, ty),
            Type::Array { len, elem } => match len {
                ArrayLen::Unbounded => write!(f, "[]{}", elem),
                ArrayLen::Fixed(n) => write!(f, "[{}]{}", n, elem),
            },
            Type::Chan { dir, elem } => {
                // `chan <-chan T` would re-parse as `chan<- chan T`.
                let needs_parens = *dir == ChanDir::Both
                    && matches!(**elem, Type::Chan { dir: ChanDir::Recv, .. });
                if needs_parens {
                    write!(f, "{}({})", dir.prefix(), elem)
                } else {
                    write!(f, "{}{}", dir.prefix(), elem)
                }
            }
            Type::Variadic { elem } => write!(f, "...{}", elem),
            Type::Func { inputs, outputs } => {
                f.write_str("func(")?;
                write_list(f, inputs)?;
                f.write_str(")")?;
                match outputs.len() {
                    0 => Ok(()),
                    1 => write!(f, " {}", outputs[0]),
                    _ => {
                        f.write_str(" (")?;
                        write_list(f, outputs)?;
                        f.write_str(")")
                    }
                }
            }
            Type::Map { key, value } => write!(f, "map[{}]{}", key, value),
            Type::Pointer { elem } => write!(f, "*{}", elem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_named() {
        assert_eq!(Type::builtin("bool").to_string(), "bool");
        assert_eq!(Type::exported("testpkg", "test").to_string(), "testpkg.test");
    }

    #[test]
    fn test_render_arrays() {
        assert_eq!(Type::slice(Type::builtin("bool")).to_string(), "[]bool");
        assert_eq!(Type::array(10, Type::builtin("bool")).to_string(), "[10]bool");
    }

    #[test]
    fn test_render_channels() {
        let b = || Type::builtin("bool");
        assert_eq!(Type::chan(ChanDir::Both, b()).to_string(), "chan bool");
        assert_eq!(Type::chan(ChanDir::Recv, b()).to_string(), "<-chan bool");
        assert_eq!(Type::chan(ChanDir::Send, b()).to_string(), "chan<- bool");
        assert_eq!(
            Type::chan(ChanDir::Both, Type::chan(ChanDir::Recv, b())).to_string(),
            "chan (<-chan bool)"
        );
        assert_eq!(
            Type::chan(ChanDir::Send, Type::chan(ChanDir::Both, b())).to_string(),
            "chan<- chan bool"
        );
    }

    #[test]
    fn test_render_funcs() {
        assert_eq!(Type::func(vec![], vec![]).to_string(), "func()");
        assert_eq!(
            Type::func(vec![Type::builtin("bool"), Type::builtin("int")], vec![]).to_string(),
            "func(bool, int)"
        );
        assert_eq!(
            Type::func(vec![], vec![Type::builtin("error")]).to_string(),
            "func() error"
        );
        assert_eq!(
            Type::func(vec![], vec![Type::builtin("bool"), Type::builtin("error")]).to_string(),
            "func() (bool, error)"
        );
    }

    #[test]
    fn test_render_composites() {
        assert_eq!(
            Type::map(Type::builtin("string"), Type::builtin("int")).to_string(),
            "map[string]int"
        );
        assert_eq!(Type::pointer(Type::builtin("uint64")).to_string(), "*uint64");
        assert_eq!(Type::variadic(Type::builtin("bool")).to_string(), "...bool");
        assert_eq!(
            Type::pointer(Type::exported("os", "File")).to_string(),
            "*os.File"
        );
    }

    #[test]
    fn test_names() {
        let t = Type::exported("io", "Reader");
        assert_eq!(t.package(), Some("io"));
        assert_eq!(t.name(), Some("Reader"));
        assert_eq!(Type::slice(Type::builtin("x")).name(), None);
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_string(&Type::pointer(Type::builtin("int"))).unwrap();
        assert_eq!(json, r#"{"kind":"pointer","elem":{"kind":"builtin","name":"int"}}"#);
    }
}
