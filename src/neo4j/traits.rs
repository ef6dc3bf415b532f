//! GraphSession trait definition
//!
//! The boundary between rendered statements and whatever executes them:
//! a live `GraphClient` or an in-memory mock in tests.

use crate::ogm::{Clause, ParamStyle, Statement};
use anyhow::Result;
use async_trait::async_trait;

pub const ALL_NODES: &str = "MATCH (all) RETURN all";
pub const DELETE_ALL: &str = "MATCH (all) DETACH DELETE all";

#[async_trait]
pub trait GraphSession: Send + Sync {
    /// Placeholder syntax statements are rendered with for this session
    fn param_style(&self) -> ParamStyle;

    /// Run a statement and collect every returned row
    async fn run(&self, statement: &Statement) -> Result<Vec<neo4rs::Row>>;

    /// Render a clause for this session.
    ///
    /// Clauses hold node handles and must be rendered before awaiting, so
    /// this step is synchronous: `session.run(&session.prepare(&create)?)`.
    fn prepare(&self, clause: &dyn Clause) -> Result<Statement> {
        Ok(clause.statement(self.param_style())?)
    }

    /// Every node in the graph
    async fn all(&self) -> Result<Vec<neo4rs::Row>> {
        self.run(&Statement::raw(ALL_NODES)).await
    }

    /// Remove every node and relationship
    async fn delete_all(&self) -> Result<()> {
        self.run(&Statement::raw(DELETE_ALL)).await?;
        Ok(())
    }
}
