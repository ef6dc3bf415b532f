//! Comparison expressions over node properties

use super::node::Node;
use super::property::Value;
use crate::error::Result;
use std::fmt;

/// Cypher comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    /// The operator as written in Cypher
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A `(node, property)` binding obtained from [`Node::prop`]
#[derive(Debug, Clone)]
pub struct PropertyRef {
    node: Node,
    name: String,
}

impl PropertyRef {
    pub(crate) fn new(node: Node, name: &str) -> Self {
        Self {
            node,
            name: name.to_string(),
        }
    }

    /// The node owning the property
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build an expression, storing the coerced `value` in the property.
    pub fn compare(&self, op: Comparison, value: impl Into<Value>) -> Result<Expression> {
        let value = self.node.set(&self.name, value)?;
        Ok(Expression {
            node: self.node.clone(),
            property: self.name.clone(),
            op,
            value,
        })
    }

    /// `=`
    pub fn equals(&self, value: impl Into<Value>) -> Result<Expression> {
        self.compare(Comparison::Eq, value)
    }

    /// `<>`
    pub fn not_equals(&self, value: impl Into<Value>) -> Result<Expression> {
        self.compare(Comparison::Ne, value)
    }

    /// `<`
    pub fn less_than(&self, value: impl Into<Value>) -> Result<Expression> {
        self.compare(Comparison::Lt, value)
    }

    /// `<=`
    pub fn less_or_equal(&self, value: impl Into<Value>) -> Result<Expression> {
        self.compare(Comparison::Le, value)
    }

    /// `>`
    pub fn greater_than(&self, value: impl Into<Value>) -> Result<Expression> {
        self.compare(Comparison::Gt, value)
    }

    /// `>=`
    pub fn greater_or_equal(&self, value: impl Into<Value>) -> Result<Expression> {
        self.compare(Comparison::Ge, value)
    }
}

/// `var.prop <op> {var_prop}`
#[derive(Debug, Clone)]
pub struct Expression {
    node: Node,
    property: String,
    op: Comparison,
    value: Value,
}

impl Expression {
    /// The node whose property is compared
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The compared property name
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The comparison operator
    pub fn op(&self) -> Comparison {
        self.op
    }

    /// The coerced literal bound when the expression was built
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Name of the parameter carrying the right-hand value
    pub fn param_name(&self) -> String {
        param_name(&self.node.var(), &self.property)
    }

    /// `var.prop`
    pub(crate) fn target(&self) -> String {
        self.node.target(&self.property)
    }

    /// Value the parameter carries at render time
    pub(crate) fn current_value(&self) -> Value {
        self.node
            .value(&self.property)
            .unwrap_or_else(|_| self.value.clone())
    }
}

/// `{var}_{property}`, with every character outside `[A-Za-z0-9_]`
/// replaced by `_` so the name is always a valid placeholder
pub(crate) fn param_name(var: &str, property: &str) -> String {
    let mut name: String = format!("{}_{}", var, property)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}
