//! CREATE / MATCH clause builders and their composition into queries

use super::expression::{param_name, Expression};
use super::node::Node;
use super::property::Value;
use super::relationship::Relationship;
use crate::error::{OgmError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::BitAnd;
use std::str::FromStr;

/// Parameter name → bound value
pub type Params = BTreeMap<String, Value>;

/// Indentation of continuation lines (`SET`, `WHERE`)
const INDENT: &str = "    ";

/// How parameter placeholders are written into statement text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamStyle {
    /// `{name}`, the Neo4j 3.x syntax
    #[default]
    Braces,
    /// `$name`, required by Neo4j 4 and later
    Dollar,
}

impl ParamStyle {
    /// `name` written as a placeholder in this style
    pub fn placeholder(self, name: &str) -> String {
        match self {
            ParamStyle::Braces => format!("{{{}}}", name),
            ParamStyle::Dollar => format!("${}", name),
        }
    }
}

impl FromStr for ParamStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "braces" => Ok(ParamStyle::Braces),
            "dollar" => Ok(ParamStyle::Dollar),
            other => Err(format!("unknown parameter style: {}", other)),
        }
    }
}

/// Rendered statement text with its parameters, ready for a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub text: String,
    pub params: Params,
}

impl Statement {
    /// A statement without parameters
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Params::new(),
        }
    }
}

/// Parameters collected from one or more clauses.
///
/// Each name remembers the `(node, property)` slot it was read from. Binding
/// the same slot again is a no-op; binding the name from any other slot is a
/// collision, whatever the values.
#[derive(Debug, Default)]
pub struct Bindings {
    params: Params,
    owners: BTreeMap<String, (Node, String)>,
}

impl Bindings {
    /// No parameters bound yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `node.property` under its parameter name
    pub fn bind(&mut self, node: &Node, property: &str, value: Value) -> Result<()> {
        let name = param_name(&node.var(), property);
        match self.owners.get(&name) {
            Some((owner, owned)) if owner.ptr_eq(node) && owned == property => Ok(()),
            Some(_) => Err(OgmError::ParameterCollision(name)),
            None => {
                self.owners
                    .insert(name.clone(), (node.clone(), property.to_string()));
                self.params.insert(name, value);
                Ok(())
            }
        }
    }

    /// The bound values, keyed by parameter name
    pub fn into_params(self) -> Params {
        self.params
    }
}

/// A renderable piece of a Cypher query
pub trait Clause {
    /// Statement lines, first line unindented
    fn lines(&self, style: ParamStyle) -> Vec<String>;

    /// Bind this clause's parameters into `bindings`
    fn collect_params(&self, bindings: &mut Bindings) -> Result<()>;

    /// Statement text with lines joined by newlines
    fn render(&self, style: ParamStyle) -> String {
        self.lines(style).join("\n")
    }

    /// Parameters read from the bound properties as they are right now
    fn params(&self) -> Result<Params> {
        let mut bindings = Bindings::new();
        self.collect_params(&mut bindings)?;
        Ok(bindings.into_params())
    }

    /// Rendered text plus parameters, ready for a session
    fn statement(&self, style: ParamStyle) -> Result<Statement> {
        Ok(Statement {
            text: self.render(style),
            params: self.params()?,
        })
    }
}

fn set_line(target: &str, placeholder: &str) -> String {
    format!("{}SET {} = {}", INDENT, target, placeholder)
}

#[derive(Debug, Clone)]
enum CreateTarget {
    Node(Node),
    Relationship { rel: Relationship, end: Node },
}

/// `CREATE` for a node (one `SET` line per property) or a relationship
#[derive(Debug, Clone)]
pub struct Create {
    target: CreateTarget,
    assignments: Vec<Expression>,
}

impl Create {
    /// `CREATE` a node with a `SET` line per declared property
    pub fn node(node: &Node) -> Self {
        Self {
            target: CreateTarget::Node(node.clone()),
            assignments: Vec::new(),
        }
    }

    /// Fails when the relationship is detached or its end node has no
    /// explicit variable.
    pub fn relationship(rel: &Relationship) -> Result<Self> {
        let end = rel.attached_end()?.clone();
        Ok(Self {
            target: CreateTarget::Relationship {
                rel: rel.clone(),
                end,
            },
            assignments: Vec::new(),
        })
    }

    /// Assign a property through an expression built on it.
    ///
    /// Properties of the created node already have a `SET` line; any other
    /// property gets one appended.
    pub fn set(&mut self, expr: Expression) -> &mut Self {
        if let CreateTarget::Node(node) = &self.target {
            if node.ptr_eq(expr.node()) {
                return self;
            }
        }
        let already_set = self
            .assignments
            .iter()
            .any(|e| e.node().ptr_eq(expr.node()) && e.property() == expr.property());
        if !already_set {
            self.assignments.push(expr);
        }
        self
    }
}

impl Clause for Create {
    fn lines(&self, style: ParamStyle) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.target {
            CreateTarget::Node(node) => {
                lines.push(format!("CREATE ({})", node.labeled_pattern()));
                let var = node.var();
                for (name, _) in node.bindings() {
                    lines.push(set_line(
                        &node.target(&name),
                        &style.placeholder(&param_name(&var, &name)),
                    ));
                }
            }
            CreateTarget::Relationship { rel, end } => {
                lines.push(format!("CREATE {}", rel.pattern(end)));
            }
        }
        for expr in &self.assignments {
            lines.push(set_line(
                &expr.target(),
                &style.placeholder(&expr.param_name()),
            ));
        }
        lines
    }

    fn collect_params(&self, bindings: &mut Bindings) -> Result<()> {
        if let CreateTarget::Node(node) = &self.target {
            for (name, value) in node.bindings() {
                bindings.bind(node, &name, value)?;
            }
        }
        for expr in &self.assignments {
            bindings.bind(expr.node(), expr.property(), expr.current_value())?;
        }
        Ok(())
    }
}

/// `MATCH` on a node's labels, optionally filtered by one expression
#[derive(Debug, Clone)]
pub struct Match {
    node: Node,
    filter: Option<Expression>,
}

impl Match {
    /// `MATCH` on the node's labels
    pub fn node(node: &Node) -> Self {
        Self {
            node: node.clone(),
            filter: None,
        }
    }

    /// Attach a `WHERE` expression. Only one is supported per clause.
    pub fn filter(mut self, expr: Expression) -> Result<Self> {
        if self.filter.is_some() {
            return Err(OgmError::CompoundExpression);
        }
        self.filter = Some(expr);
        Ok(self)
    }

    /// The `WHERE` expression, if any
    pub fn expression(&self) -> Option<&Expression> {
        self.filter.as_ref()
    }
}

impl Clause for Match {
    fn lines(&self, style: ParamStyle) -> Vec<String> {
        let mut lines = vec![format!("MATCH ({})", self.node.labeled_pattern())];
        if let Some(expr) = &self.filter {
            lines.push(format!(
                "{}WHERE {} {} {}",
                INDENT,
                expr.target(),
                expr.op(),
                style.placeholder(&expr.param_name())
            ));
        }
        lines
    }

    fn collect_params(&self, bindings: &mut Bindings) -> Result<()> {
        if let Some(expr) = &self.filter {
            bindings.bind(expr.node(), expr.property(), expr.current_value())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Part {
    Create(Create),
    Match(Match),
}

impl Part {
    fn as_clause(&self) -> &dyn Clause {
        match self {
            Part::Create(c) => c,
            Part::Match(m) => m,
        }
    }
}

/// Clauses stacked in source order, built with `&`
#[derive(Debug, Clone, Default)]
pub struct Query {
    parts: Vec<Part>,
}

impl Query {
    /// An empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause (or another query's clauses)
    pub fn then(mut self, clause: impl Into<Query>) -> Self {
        self.parts.extend(clause.into().parts);
        self
    }

    /// Number of clauses
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether no clause was added
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl Clause for Query {
    fn lines(&self, style: ParamStyle) -> Vec<String> {
        self.parts
            .iter()
            .flat_map(|part| part.as_clause().lines(style))
            .collect()
    }

    fn collect_params(&self, bindings: &mut Bindings) -> Result<()> {
        for part in &self.parts {
            part.as_clause().collect_params(bindings)?;
        }
        Ok(())
    }
}

impl From<Create> for Query {
    fn from(clause: Create) -> Self {
        Self {
            parts: vec![Part::Create(clause)],
        }
    }
}

impl From<Match> for Query {
    fn from(clause: Match) -> Self {
        Self {
            parts: vec![Part::Match(clause)],
        }
    }
}

impl<C: Into<Query>> BitAnd<C> for Query {
    type Output = Query;

    fn bitand(self, rhs: C) -> Query {
        self.then(rhs)
    }
}

impl<C: Into<Query>> BitAnd<C> for Create {
    type Output = Query;

    fn bitand(self, rhs: C) -> Query {
        Query::from(self).then(rhs)
    }
}

impl<C: Into<Query>> BitAnd<C> for Match {
    type Output = Query;

    fn bitand(self, rhs: C) -> Query {
        Query::from(self).then(rhs)
    }
}

macro_rules! display_braces {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.render(ParamStyle::Braces))
                }
            }
        )*
    };
}

display_braces!(Create, Match, Query);
