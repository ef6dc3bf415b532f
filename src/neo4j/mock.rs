//! In-memory mock implementation of GraphSession for testing.
//!
//! Records every executed statement and returns no rows.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::traits::GraphSession;
use crate::ogm::{ParamStyle, Statement};
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Records every statement it is asked to run
pub struct MockGraphSession {
    pub param_style: ParamStyle,
    pub executed: RwLock<Vec<Statement>>,
}

impl MockGraphSession {
    pub fn new() -> Self {
        Self::with_param_style(ParamStyle::Dollar)
    }

    pub fn with_param_style(param_style: ParamStyle) -> Self {
        Self {
            param_style,
            executed: RwLock::new(Vec::new()),
        }
    }

    pub async fn executed_texts(&self) -> Vec<String> {
        self.executed
            .read()
            .await
            .iter()
            .map(|s| s.text.clone())
            .collect()
    }
}

#[async_trait]
impl GraphSession for MockGraphSession {
    fn param_style(&self) -> ParamStyle {
        self.param_style
    }

    async fn run(&self, statement: &Statement) -> Result<Vec<neo4rs::Row>> {
        self.executed.write().await.push(statement.clone());
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neo4j::traits::{ALL_NODES, DELETE_ALL};
    use crate::ogm::{Create, Match, Node, Property, Relationship, Value};

    #[tokio::test]
    async fn test_all_and_delete_all() {
        let session = MockGraphSession::new();
        let rows = session.all().await.unwrap();
        assert!(rows.is_empty());
        session.delete_all().await.unwrap();
        assert_eq!(session.executed_texts().await, vec![ALL_NODES, DELETE_ALL]);
    }

    #[tokio::test]
    async fn test_prepared_clause_uses_session_style() {
        let session = MockGraphSession::new();
        let statement = {
            let m = Node::new("User")
                .with_property("name", Property::new())
                .with_var("m");
            let n = m.copy("n");
            m.set("name", "Alice").unwrap();
            let rel = Relationship::new("KNOWS", &m).to(&n);
            let query = Match::node(&m)
                .filter(m.prop("name").unwrap().equals("Alice").unwrap())
                .unwrap()
                & Match::node(&n)
                & Create::relationship(&rel).unwrap();
            session.prepare(&query).unwrap()
        };
        session.run(&statement).await.unwrap();

        let executed = session.executed.read().await;
        assert_eq!(executed.len(), 1);
        assert_eq!(
            executed[0].text,
            "MATCH (m:`User`)\n    WHERE m.name = $m_name\nMATCH (n:`User`)\nCREATE (m)-[rel:`KNOWS`]->(n)"
        );
        assert_eq!(executed[0].params["m_name"], Value::Text("Alice".into()));
    }

    #[tokio::test]
    async fn test_braces_style_session() {
        let session = MockGraphSession::with_param_style(ParamStyle::Braces);
        let statement = {
            let node = Node::new("User").with_property("name", Property::new());
            session.prepare(&Create::node(&node)).unwrap()
        };
        session.run(&statement).await.unwrap();
        assert_eq!(
            session.executed_texts().await,
            vec!["CREATE (node:`User`)\n    SET node.name = {node_name}"]
        );
    }
}
