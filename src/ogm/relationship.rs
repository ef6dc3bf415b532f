//! Typed edges between nodes

use super::node::{escape_identifier, quote_name, Node};
use crate::error::{OgmError, Result};

/// Variable used when a relationship was never given one explicitly
pub const DEFAULT_REL_VAR: &str = "rel";

/// A typed edge from a start node to an optional end node
#[derive(Debug, Clone)]
pub struct Relationship {
    rel_type: String,
    start: Node,
    end: Option<Node>,
    var: Option<String>,
    directed: bool,
}

impl Relationship {
    /// A directed relationship with no end node yet
    pub fn new(rel_type: impl Into<String>, start: &Node) -> Self {
        Self {
            rel_type: rel_type.into(),
            start: start.clone(),
            end: None,
            var: None,
            directed: true,
        }
    }

    /// Attach the end node
    pub fn to(mut self, end: &Node) -> Self {
        self.end = Some(end.clone());
        self
    }

    /// Give the relationship an explicit variable (default `rel`)
    pub fn with_var(mut self, var: impl Into<String>) -> Self {
        self.var = Some(var.into());
        self
    }

    /// Render without an arrowhead
    pub fn undirected(mut self) -> Self {
        self.directed = false;
        self
    }

    /// Attach or replace the end node in place
    pub fn set_end(&mut self, end: &Node) {
        self.end = Some(end.clone());
    }

    /// The relationship type label
    pub fn rel_type(&self) -> &str {
        &self.rel_type
    }

    /// The node the relationship starts from
    pub fn start_node(&self) -> &Node {
        &self.start
    }

    /// The end node, `None` while detached
    pub fn end_node(&self) -> Option<&Node> {
        self.end.as_ref()
    }

    /// The variable, falling back to [`DEFAULT_REL_VAR`]
    pub fn var(&self) -> &str {
        self.var.as_deref().unwrap_or(DEFAULT_REL_VAR)
    }

    /// Whether the relationship renders with an arrowhead
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Whether no end node is attached
    pub fn is_detached(&self) -> bool {
        self.end.is_none()
    }

    /// The end node, provided it exists and has an explicit variable.
    ///
    /// A missing end fails before a missing variable.
    pub fn attached_end(&self) -> Result<&Node> {
        let end = self.end.as_ref().ok_or_else(|| OgmError::DetachedObject {
            rel_type: self.rel_type.clone(),
        })?;
        if end.explicit_var().is_none() {
            return Err(OgmError::MissingVariable {
                rel_type: self.rel_type.clone(),
            });
        }
        Ok(end)
    }

    /// `(start)-[var:`TYPE`]->(end)`, or `-(end)` when undirected
    pub(crate) fn pattern(&self, end: &Node) -> String {
        let arrow = if self.directed { "->" } else { "-" };
        format!(
            "({})-[{}:{}]{}({})",
            quote_name(&self.start.var()),
            quote_name(self.var()),
            escape_identifier(&self.rel_type),
            arrow,
            quote_name(&end.var())
        )
    }
}
