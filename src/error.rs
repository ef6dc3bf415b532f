//! Errors raised while building or rendering Cypher clauses

use crate::ogm::PropertyType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OgmError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OgmError {
    /// A relationship was rendered before an end node was attached
    #[error("relationship `{rel_type}` is detached: it has no end node")]
    DetachedObject { rel_type: String },

    /// The end node of a relationship must carry an explicit variable
    #[error("end node of relationship `{rel_type}` has no explicit variable")]
    MissingVariable { rel_type: String },

    #[error("node `{var}` has no property named `{property}`")]
    PropertyNotFound { var: String, property: String },

    #[error("cannot coerce {value} to {target}")]
    Coercion { value: String, target: PropertyType },

    /// Two merged clauses bind the same parameter name to different values
    #[error("parameter `{0}` is bound by more than one property")]
    ParameterCollision(String),

    #[error("clause already has a WHERE expression; combining expressions is not supported")]
    CompoundExpression,
}
