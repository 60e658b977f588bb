//! Cypher script load target
//!
//! Renders every load operation as a Cypher statement instead of running it,
//! for hand-off to an external store. Datasets are referenced by URL: the
//! configured base plus the file name, or a `file:///` URL of the local path.

use super::{GraphTarget, LoadResult};
use crate::dataset::{read_table, EdgeDataset};
use crate::graph::Label;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::info;

pub struct CypherScriptTarget {
    script: PathBuf,
    url_base: Option<String>,
    statements: Mutex<Vec<String>>,
}

impl CypherScriptTarget {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            url_base: None,
            statements: Mutex::new(Vec::new()),
        }
    }

    /// Reference datasets as `<base><file name>` rather than by local path
    pub fn with_url_base(mut self, base: impl Into<String>) -> Self {
        self.url_base = Some(base.into());
        self
    }

    pub async fn statements(&self) -> Vec<String> {
        self.statements.lock().await.clone()
    }

    /// Write the collected statements, one per line, `;`-terminated
    pub async fn write_script(&self) -> std::io::Result<PathBuf> {
        let statements = self.statements.lock().await;
        let mut body = String::new();
        for statement in statements.iter() {
            body.push_str(statement);
            body.push_str(";\n");
        }
        if let Some(parent) = self.script.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.script, body).await?;
        info!("Wrote {} statements to {}", statements.len(), self.script.display());
        Ok(self.script.clone())
    }

    fn url(&self, location: &Path) -> String {
        match (&self.url_base, location.file_name()) {
            (Some(base), Some(name)) => format!("{}{}", base, name.to_string_lossy()),
            _ => format!("file:///{}", location.display().to_string().trim_start_matches('/')),
        }
    }

    async fn push(&self, statement: String) {
        self.statements.lock().await.push(statement);
    }
}

fn load_csv(url: &str) -> String {
    format!("USING PERIODIC COMMIT LOAD CSV WITH HEADERS FROM '{}' AS line", url)
}

#[async_trait]
impl GraphTarget for CypherScriptTarget {
    /// One statement that repeats bounded batches server-side until the
    /// store is empty, so the loader's loop ends after a single call.
    async fn delete_batch(&self, limit: usize) -> LoadResult<usize> {
        self.push(format!(
            "CALL apoc.periodic.commit('MATCH (n) WITH n LIMIT $limit DETACH DELETE n RETURN count(*)', {{limit: {}}})",
            limit
        ))
        .await;
        Ok(0)
    }

    async fn drop_uniqueness_constraints(&self) -> LoadResult<usize> {
        self.push("CALL apoc.schema.assert({}, {})".to_string()).await;
        Ok(0)
    }

    async fn create_uniqueness_constraint(&self, label: &Label, property: &str) -> LoadResult<()> {
        self.push(format!(
            "CREATE CONSTRAINT ON (n:{}) ASSERT n.{} IS UNIQUE",
            label, property
        ))
        .await;
        Ok(())
    }

    async fn create_nodes_from_dataset(&self, location: &Path, label: &Label) -> LoadResult<usize> {
        let table = read_table(location)?;
        let properties = table
            .columns()
            .iter()
            .map(|c| format!("{}: line.{}", c, c))
            .collect::<Vec<_>>()
            .join(", ");
        self.push(format!(
            "{} CREATE (n:{} {{{}}})",
            load_csv(&self.url(location)),
            label,
            properties
        ))
        .await;
        Ok(table.len())
    }

    async fn create_edges_from_dataset(&self, dataset: &EdgeDataset) -> LoadResult<usize> {
        let table = read_table(&dataset.location)?;
        let shape = &dataset.shape;
        let set = match &shape.attributes {
            Some(attributes) if !attributes.is_empty() => format!(
                " SET {}",
                attributes
                    .iter()
                    .map(|a| format!("r.{} = line.{}", a, a))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            _ => String::new(),
        };
        let (verb, arrow) = if shape.directional {
            ("CREATE", "->")
        } else {
            ("MERGE", "-")
        };
        self.push(format!(
            "{} MATCH (s:{} {{ {}: line.{} }}), (t:{} {{ {}: line.{} }}) {} (s)-[r:{}]{}(t){}",
            load_csv(&self.url(&dataset.location)),
            shape.source.label,
            shape.source.store_attribute,
            shape.source.dataset_column,
            shape.target.label,
            shape.target.store_attribute,
            shape.target.dataset_column,
            verb,
            shape.relationship,
            arrow,
            set
        ))
        .await;
        Ok(table.len())
    }
}
