//! Interfaces, methods, and parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::Type;

/// A named parameter or result of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name (synthesized as `param<N>`/`result<N>` when omitted)
    pub name: String,

    /// Parameter type
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Parameter {
    /// Create a new parameter.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Parameter {
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.ty)
    }
}

/// A method of an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Method name
    pub name: String,

    /// Inputs, in declaration order
    pub inputs: Vec<Parameter>,

    /// Results, in declaration order
    pub outputs: Vec<Parameter>,
}

impl Method {
    /// Create a method with no parameters or results.
    pub fn new(name: impl Into<String>) -> Self {
        Method {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Add an input parameter.
    pub fn with_input(mut self, param: Parameter) -> Self {
        self.inputs.push(param);
        self
    }

    /// Add a result parameter.
    pub fn with_output(mut self, param: Parameter) -> Self {
        self.outputs.push(param);
        self
    }

    /// Check if two methods are the same method: equal names, parameter
    /// and result types. Parameter names don't count.
    pub fn same_signature(&self, other: &Method) -> bool {
        fn types(params: &[Parameter]) -> impl Iterator<Item = &Type> + '_ {
            params.iter().map(|p| &p.ty)
        }
        self.name == other.name
            && types(&self.inputs).eq(types(&other.inputs))
            && types(&self.outputs).eq(types(&other.outputs))
    }

    /// Render the method as it would appear inside an interface body,
    /// e.g. `Read(p []byte) (n int, err error)`.
    pub fn signature(&self) -> String {
        let inputs: Vec<String> = self.inputs.iter().map(|p| p.to_string()).collect();
        let mut out = format!("{}({})", self.name, inputs.join(", "));
        if !self.outputs.is_empty() {
            let outputs: Vec<String> = self.outputs.iter().map(|p| p.to_string()).collect();
            out.push_str(&format!(" ({})", outputs.join(", ")));
        }
        out
    }

    /// Check if the final input is variadic.
    pub fn is_variadic(&self) -> bool {
        self.inputs.last().is_some_and(|p| p.ty.is_variadic())
    }
}

/// A fully flattened interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// The interface type as seen from the output package, e.g. `srcPkgAlias.Store`
    pub src_type: Type,

    /// Interface name
    pub name: String,

    /// Flattened methods in declaration order
    pub methods: Vec<Method>,
}

impl Interface {
    /// Create an interface with no methods.
    pub fn new(name: impl Into<String>, src_type: Type) -> Self {
        Interface {
            src_type,
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Look up a method by name.
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Method names in order.
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.iter().map(|m| m.name.as_str()).collect()
    }

    /// The same method set under another name.
    pub fn renamed(mut self, name: impl Into<String>, src_type: Type) -> Self {
        self.name = name.into();
        self.src_type = src_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_signature() {
        let m = Method::new("Read")
            .with_input(Parameter::new("p", Type::slice(Type::builtin("byte"))))
            .with_output(Parameter::new("n", Type::builtin("int")))
            .with_output(Parameter::new("err", Type::builtin("error")));

        assert_eq!(m.signature(), "Read(p []byte) (n int, err error)");
        assert!(!m.is_variadic());
        assert_eq!(Method::new("Close").signature(), "Close()");
    }

    #[test]
    fn test_variadic_method() {
        let m = Method::new("Printf")
            .with_input(Parameter::new("format", Type::builtin("string")))
            .with_input(Parameter::new("args", Type::variadic(Type::builtin("any"))));
        assert!(m.is_variadic());
    }

    #[test]
    fn test_renamed_keeps_methods() {
        let iface = Interface {
            src_type: Type::builtin("A"),
            name: "A".to_string(),
            methods: vec![Method::new("F")],
        };
        let renamed = iface.clone().renamed("B", Type::builtin("B"));
        assert_eq!(renamed.methods, iface.methods);
        assert_eq!(renamed.name, "B");
        assert_eq!(renamed.method_names(), vec!["F"]);
    }
}
