//! Graph nodes: labels, an identifier and typed property slots

use super::expression::PropertyRef;
use super::property::{Property, Value};
use crate::error::{OgmError, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Variable used when a node was never given one explicitly
pub const DEFAULT_NODE_VAR: &str = "node";

#[derive(Debug, Clone)]
struct NodeData {
    labels: Vec<String>,
    var: Option<String>,
    properties: Vec<(String, Property)>,
}

impl NodeData {
    fn property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, prop)| prop)
    }

    fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, prop)| prop)
    }

    fn var(&self) -> &str {
        self.var.as_deref().unwrap_or(DEFAULT_NODE_VAR)
    }

    fn not_found(&self, name: &str) -> OgmError {
        OgmError::PropertyNotFound {
            var: self.var().to_string(),
            property: name.to_string(),
        }
    }
}

/// A labeled graph node.
///
/// `Node` is a handle: clones refer to the same entity, so a value assigned
/// through one handle shows up in every clause built from another. Use
/// [`Node::copy`] for an independent node.
#[derive(Clone)]
pub struct Node {
    inner: Rc<RefCell<NodeData>>,
}

impl Node {
    /// A node with one label, no properties and the default variable
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(NodeData {
                labels: vec![label.into()],
                var: None,
                properties: Vec::new(),
            })),
        }
    }

    /// Add a secondary label. Duplicates are ignored.
    pub fn with_label(self, label: impl Into<String>) -> Self {
        let label = label.into();
        {
            let mut data = self.inner.borrow_mut();
            if !data.labels.contains(&label) {
                data.labels.push(label);
            }
        }
        self
    }

    /// Declare a property slot. Redeclaring a name replaces the slot in place.
    pub fn with_property(self, name: impl Into<String>, property: Property) -> Self {
        let name = name.into();
        {
            let mut data = self.inner.borrow_mut();
            match data.property_mut(&name) {
                Some(slot) => *slot = property,
                None => data.properties.push((name, property)),
            }
        }
        self
    }

    /// Give the node an explicit variable
    pub fn with_var(self, var: impl Into<String>) -> Self {
        self.set_var(var);
        self
    }

    /// Structurally identical node with its own property slots and a new variable
    pub fn copy(&self, var: impl Into<String>) -> Self {
        let mut data = self.inner.borrow().clone();
        data.var = Some(var.into());
        Self {
            inner: Rc::new(RefCell::new(data)),
        }
    }

    /// The node's variable, falling back to [`DEFAULT_NODE_VAR`]
    pub fn var(&self) -> String {
        self.inner.borrow().var().to_string()
    }

    /// The variable, only if one was assigned explicitly
    pub fn explicit_var(&self) -> Option<String> {
        self.inner.borrow().var.clone()
    }

    /// Assign the variable through any handle of this node
    pub fn set_var(&self, var: impl Into<String>) {
        self.inner.borrow_mut().var = Some(var.into());
    }

    /// Labels in declaration order
    pub fn labels(&self) -> Vec<String> {
        self.inner.borrow().labels.clone()
    }

    /// The label the node was created with
    pub fn primary_label(&self) -> String {
        self.inner.borrow().labels[0].clone()
    }

    /// Property names in declaration order
    pub fn property_names(&self) -> Vec<String> {
        self.inner
            .borrow()
            .properties
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Whether `name` is a declared property slot
    pub fn has_property(&self, name: &str) -> bool {
        self.inner.borrow().property(name).is_some()
    }

    /// Current value of a property (`Value::Null` when never assigned)
    pub fn value(&self, name: &str) -> Result<Value> {
        let data = self.inner.borrow();
        let value = data
            .property(name)
            .map(|prop| prop.value().clone())
            .ok_or_else(|| data.not_found(name));
        value
    }

    /// Coerce and assign a property value, returning the stored value
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<Value> {
        let mut data = self.inner.borrow_mut();
        let var = data.var().to_string();
        let stored = match data.property_mut(name) {
            Some(prop) => prop.set(value).cloned(),
            None => Err(OgmError::PropertyNotFound {
                var,
                property: name.to_string(),
            }),
        };
        stored
    }

    /// Reference to a declared property, for building expressions
    pub fn prop(&self, name: &str) -> Result<PropertyRef> {
        let data = self.inner.borrow();
        if data.property(name).is_none() {
            return Err(data.not_found(name));
        }
        Ok(PropertyRef::new(self.clone(), name))
    }

    /// `(var.prop, current value)` pairs in declaration order
    pub(crate) fn bindings(&self) -> Vec<(String, Value)> {
        self.inner
            .borrow()
            .properties
            .iter()
            .map(|(name, prop)| (name.clone(), prop.value().clone()))
            .collect()
    }

    /// `var.prop` with both names quoted as needed
    pub(crate) fn target(&self, property: &str) -> String {
        format!("{}.{}", quote_name(&self.var()), quote_name(property))
    }

    /// `var:`Label1`:`Label2`` as used inside a pattern
    pub(crate) fn labeled_pattern(&self) -> String {
        let data = self.inner.borrow();
        let mut out = quote_name(data.var());
        for label in &data.labels {
            out.push(':');
            out.push_str(&escape_identifier(label));
        }
        out
    }

    /// Whether both handles refer to the same node
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.borrow();
        f.debug_struct("Node")
            .field("var", &data.var)
            .field("labels", &data.labels)
            .field("properties", &data.properties)
            .finish()
    }
}

/// Backtick-quote a label or relationship type, doubling embedded backticks
pub(crate) fn escape_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// A variable or property name as written into statement text.
/// Anything but a plain identifier is backtick-quoted.
pub(crate) fn quote_name(name: &str) -> String {
    if is_plain_identifier(name) {
        name.to_string()
    } else {
        escape_identifier(name)
    }
}
