//! Object-graph mapping: nodes, relationships and typed properties compiled
//! into parameterized Cypher.
//!
//! ```
//! use cypher_ogm::ogm::{Clause, Create, Node, Property, Value};
//!
//! let user = Node::new("User")
//!     .with_property("name", Property::new())
//!     .with_property("age", Property::integer());
//! user.prop("age")?.equals("29")?;
//!
//! let create = Create::node(&user);
//! assert_eq!(
//!     create.to_string(),
//!     "CREATE (node:`User`)\n    SET node.name = {node_name}\n    SET node.age = {node_age}"
//! );
//! assert_eq!(create.params()?["node_age"], Value::Integer(29));
//! # Ok::<(), cypher_ogm::OgmError>(())
//! ```

pub mod clause;
pub mod expression;
pub mod node;
pub mod property;
pub mod relationship;

pub use clause::{Bindings, Clause, Create, Match, ParamStyle, Params, Query, Statement};
pub use expression::{Comparison, Expression, PropertyRef};
pub use node::Node;
pub use property::{Property, PropertyType, Value};
pub use relationship::Relationship;
