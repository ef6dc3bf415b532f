//! Neo4j client: Bolt URL handling and statement execution

use super::traits::GraphSession;
use crate::ogm::{ParamStyle, Statement, Value};
use crate::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{query, BoltNull, BoltType, Graph, Query};
use std::sync::Arc;

/// The only scheme the driver speaks
pub const SUPPORTED_SCHEME: &str = "bolt";
pub const DEFAULT_URL: &str = "bolt://localhost";
pub const DEFAULT_USER: &str = "neo4j";
pub const DEFAULT_PASSWORD: &str = "neo4j";

/// A parsed `scheme://[user:password@]host[:port]` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUrl {
    /// `host[:port]`
    pub address: String,
    pub user: String,
    pub password: String,
    /// The URL named a scheme other than bolt, which was replaced
    pub scheme_switched: bool,
}

impl ConnectionUrl {
    /// Parse a connection URL.
    ///
    /// `user` and `password` are only used when the URL carries no
    /// credentials of its own.
    pub fn parse(url: &str, user: &str, password: &str) -> Self {
        let (rest, scheme_switched) = match url.split_once("://") {
            Some((scheme, rest)) => {
                let switched = !scheme.eq_ignore_ascii_case(SUPPORTED_SCHEME);
                if switched {
                    tracing::warn!(
                        "Switching protocols from {} to {}. Only Bolt is supported at this time.",
                        scheme,
                        SUPPORTED_SCHEME
                    );
                }
                (rest, switched)
            }
            None => (url, false),
        };

        let (address, user, password) = match rest.rsplit_once('@') {
            Some((credentials, address)) => {
                let (u, p) = match credentials.split_once(':') {
                    Some((u, p)) => (decode(u), decode(p)),
                    None => (decode(credentials), password.to_string()),
                };
                (address.to_string(), u, p)
            }
            None => (rest.to_string(), user.to_string(), password.to_string()),
        };

        Self {
            address,
            user,
            password,
            scheme_switched,
        }
    }

    /// `bolt://host[:port]`
    pub fn uri(&self) -> String {
        format!("{}://{}", SUPPORTED_SCHEME, self.address)
    }
}

fn decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

impl From<Value> for BoltType {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => BoltType::Null(BoltNull),
            Value::Boolean(b) => b.into(),
            Value::Integer(i) => i.into(),
            Value::Float(x) => x.into(),
            Value::Text(s) => s.into(),
        }
    }
}

/// Attach every parameter of a rendered statement to a driver query
pub fn to_query(statement: &Statement) -> Query {
    statement
        .params
        .iter()
        .fold(query(&statement.text), |q, (name, value)| {
            q.param(name, BoltType::from(value.clone()))
        })
}

/// Session over a live Neo4j connection
pub struct GraphClient {
    graph: Arc<Graph>,
    param_style: ParamStyle,
}

impl GraphClient {
    /// Connect using a URL that may embed credentials
    pub async fn connect(url: &str, user: &str, password: &str) -> Result<Self> {
        let url = ConnectionUrl::parse(url, user, password);
        let uri = url.uri();
        tracing::info!("Connecting to Neo4j at {} as {}", uri, url.user);

        let graph = Graph::new(&uri, &url.user, &url.password)
            .await
            .with_context(|| format!("Failed to connect to Neo4j at {}", uri))?;

        Ok(Self {
            graph: Arc::new(graph),
            param_style: ParamStyle::Dollar,
        })
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        let client =
            Self::connect(&config.neo4j_url, &config.neo4j_user, &config.neo4j_password).await?;
        Ok(client.with_param_style(config.param_style))
    }

    pub fn with_param_style(mut self, style: ParamStyle) -> Self {
        self.param_style = style;
        self
    }
}

#[async_trait]
impl GraphSession for GraphClient {
    fn param_style(&self) -> ParamStyle {
        self.param_style
    }

    async fn run(&self, statement: &Statement) -> Result<Vec<neo4rs::Row>> {
        tracing::debug!(
            "Running Cypher ({} params):\n{}",
            statement.params.len(),
            statement.text
        );
        let mut result = self
            .graph
            .execute(to_query(statement))
            .await
            .context("Failed to run Cypher statement")?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }
}
