//! Cypher OGM - command line
//!
//! Build and run Cypher statements against a Neo4j server.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cypher_ogm::neo4j::{GraphClient, GraphSession};
use cypher_ogm::ogm::{Clause, Create, Node, Property, PropertyType, Statement};
use cypher_ogm::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ogm")]
#[command(about = "Build and run parameterized Cypher against Neo4j")]
struct Cli {
    /// YAML config file (defaults to ./config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a raw Cypher statement
    Run {
        /// Statement text
        cypher: String,
    },

    /// List every node in the graph
    All,

    /// Detach-delete every node in the graph
    DeleteAll {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Create a node
    Create {
        /// Node label (repeat for several labels)
        #[arg(short, long, required = true)]
        label: Vec<String>,

        /// Variable name used in the statement
        #[arg(long)]
        var: Option<String>,

        /// Property as name=value or name:type=value (type: text, int, float, bool)
        #[arg(short, long)]
        prop: Vec<String>,

        /// Print the statement as JSON instead of running it
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cypher_ogm=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { cypher } => {
            let client = GraphClient::from_config(&config).await?;
            print_rows(client.run(&Statement::raw(cypher)).await?);
            Ok(())
        }
        Commands::All => {
            let client = GraphClient::from_config(&config).await?;
            print_rows(client.all().await?);
            Ok(())
        }
        Commands::DeleteAll { yes } => {
            if !yes {
                bail!("Refusing to delete every node without --yes");
            }
            let client = GraphClient::from_config(&config).await?;
            client.delete_all().await?;
            tracing::info!("Deleted all nodes");
            Ok(())
        }
        Commands::Create {
            label,
            var,
            prop,
            dry_run,
        } => {
            let statement = build_create(&label, var, &prop, config.param_style)?;
            if dry_run {
                println!("{}", serde_json::to_string_pretty(&statement)?);
                return Ok(());
            }
            let client = GraphClient::from_config(&config).await?;
            client.run(&statement).await?;
            tracing::info!("Created node :{}", label.join(":"));
            Ok(())
        }
    }
}

/// Render a `CREATE` for a node described on the command line
fn build_create(
    labels: &[String],
    var: Option<String>,
    props: &[String],
    style: cypher_ogm::ogm::ParamStyle,
) -> Result<Statement> {
    let (first, rest) = labels.split_first().context("At least one label is required")?;
    let mut node = Node::new(first.as_str());
    for label in rest {
        node = node.with_label(label.as_str());
    }
    if let Some(var) = var {
        node = node.with_var(var);
    }

    let mut assignments = Vec::new();
    for arg in props {
        let (name, ty, value) = parse_prop_arg(arg)?;
        node = node.with_property(name.clone(), Property::typed(ty));
        assignments.push((name, value));
    }
    for (name, value) in assignments {
        node.set(&name, value)
            .with_context(|| format!("Invalid value for property {}", name))?;
    }

    Ok(Create::node(&node).statement(style)?)
}

/// `name=value` or `name:type=value`
fn parse_prop_arg(arg: &str) -> Result<(String, PropertyType, String)> {
    let (key, value) = arg
        .split_once('=')
        .with_context(|| format!("Expected name=value, got {}", arg))?;
    let (name, ty) = match key.split_once(':') {
        Some((name, ty)) => (name, ty.parse::<PropertyType>().map_err(anyhow::Error::msg)?),
        None => (key, PropertyType::Text),
    };
    if name.is_empty() {
        bail!("Property name is empty in {}", arg);
    }
    Ok((name.to_string(), ty, value.to_string()))
}

fn print_rows(rows: Vec<neo4rs::Row>) {
    for row in &rows {
        println!("{:?}", row);
    }
    tracing::info!("{} row(s)", rows.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use cypher_ogm::ogm::{ParamStyle, Value};

    #[test]
    fn test_parse_prop_arg() {
        let (name, ty, value) = parse_prop_arg("age:int=29").unwrap();
        assert_eq!(name, "age");
        assert_eq!(ty, PropertyType::Integer);
        assert_eq!(value, "29");

        let (name, ty, value) = parse_prop_arg("motto=a=b").unwrap();
        assert_eq!(name, "motto");
        assert_eq!(ty, PropertyType::Text);
        assert_eq!(value, "a=b");

        assert!(parse_prop_arg("age").is_err());
        assert!(parse_prop_arg("age:date=1").is_err());
        assert!(parse_prop_arg("=1").is_err());
    }

    #[test]
    fn test_build_create() {
        let statement = build_create(
            &["User".to_string(), "Person".to_string()],
            Some("u".to_string()),
            &["name=Frank".to_string(), "age:int=29".to_string()],
            ParamStyle::Dollar,
        )
        .unwrap();
        assert_eq!(
            statement.text,
            "CREATE (u:`User`:`Person`)\n    SET u.name = $u_name\n    SET u.age = $u_age"
        );
        assert_eq!(statement.params["u_age"], Value::Integer(29));
        assert_eq!(statement.params["u_name"], Value::Text("Frank".into()));
    }

    #[test]
    fn test_build_create_rejects_bad_values() {
        let result = build_create(
            &["User".to_string()],
            None,
            &["age:int=old".to_string()],
            ParamStyle::Dollar,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_build_create_quotes_hostile_names() {
        let statement = build_create(
            &["User".to_string()],
            None,
            &["n) DETACH DELETE n //=x".to_string()],
            ParamStyle::Dollar,
        )
        .unwrap();
        assert_eq!(
            statement.text,
            "CREATE (node:`User`)\n    SET node.`n) DETACH DELETE n //` = $node_n__DETACH_DELETE_n___"
        );
        assert_eq!(
            statement.params["node_n__DETACH_DELETE_n___"],
            Value::Text("x".into())
        );

        let statement = build_create(
            &["User".to_string()],
            Some("u) DETACH DELETE u //".to_string()),
            &["name=x".to_string()],
            ParamStyle::Dollar,
        )
        .unwrap();
        assert_eq!(
            statement.text,
            "CREATE (`u) DETACH DELETE u //`:`User`)\n    SET `u) DETACH DELETE u //`.name = $u__DETACH_DELETE_u____name"
        );
    }

    #[test]
    fn test_build_create_rejects_clashing_param_names() {
        let err = build_create(
            &["User".to_string()],
            Some("n".to_string()),
            &["a b=1".to_string(), "a_b=2".to_string()],
            ParamStyle::Dollar,
        )
        .unwrap_err();
        assert!(err.to_string().contains("n_a_b"));
    }
}
