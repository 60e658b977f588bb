//! In-process load target backed by [`GraphStore`]

use super::{GraphTarget, LoadError, LoadResult};
use crate::dataset::{read_table, EdgeDataset, Table};
use crate::graph::{GraphStore, Label, PropertyMap, PropertyValue};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Loads datasets straight into a shared [`GraphStore`].
///
/// Empty CSV cells are not set as properties, the same null semantics a
/// bulk `LOAD CSV` has.
pub struct EmbeddedTarget {
    store: Arc<RwLock<GraphStore>>,
}

impl EmbeddedTarget {
    /// Create a target over a fresh empty store
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(GraphStore::new())),
        }
    }

    /// Create a target wrapping an existing store
    pub fn with_store(store: Arc<RwLock<GraphStore>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<RwLock<GraphStore>> {
        &self.store
    }

    pub async fn store_read(&self) -> tokio::sync::RwLockReadGuard<'_, GraphStore> {
        self.store.read().await
    }
}

impl Default for EmbeddedTarget {
    fn default() -> Self {
        Self::new()
    }
}

fn column(table: &Table, location: &Path, name: &str) -> LoadResult<usize> {
    table.column_index(name).ok_or_else(|| LoadError::MissingColumn {
        location: location.to_path_buf(),
        column: name.to_string(),
    })
}

fn properties(row: &[String], columns: &[(usize, &str)]) -> PropertyMap {
    columns
        .iter()
        .filter_map(|&(index, name)| {
            let value = PropertyValue::from_cell(&row[index]);
            (!value.is_null()).then(|| (name.to_string(), value))
        })
        .collect()
}

#[async_trait]
impl GraphTarget for EmbeddedTarget {
    async fn delete_batch(&self, limit: usize) -> LoadResult<usize> {
        Ok(self.store.write().await.delete_batch(limit))
    }

    async fn drop_uniqueness_constraints(&self) -> LoadResult<usize> {
        Ok(self.store.write().await.drop_unique_constraints())
    }

    async fn create_uniqueness_constraint(&self, label: &Label, property: &str) -> LoadResult<()> {
        self.store.write().await.create_unique_constraint(label, property)?;
        Ok(())
    }

    async fn create_nodes_from_dataset(&self, location: &Path, label: &Label) -> LoadResult<usize> {
        let table = read_table(location)?;
        let columns: Vec<(usize, &str)> = table
            .columns()
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.as_str()))
            .collect();

        let mut store = self.store.write().await;
        for row in table.rows() {
            store.create_node(vec![label.clone()], properties(row, &columns))?;
        }
        Ok(table.len())
    }

    async fn create_edges_from_dataset(&self, dataset: &EdgeDataset) -> LoadResult<usize> {
        let location = dataset.location.as_path();
        let shape = &dataset.shape;
        let table = read_table(location)?;

        let source_column = column(&table, location, &shape.source.dataset_column)?;
        let target_column = column(&table, location, &shape.target.dataset_column)?;
        let attributes = shape
            .attributes
            .iter()
            .flatten()
            .map(|name| Ok((column(&table, location, name)?, name.as_str())))
            .collect::<LoadResult<Vec<_>>>()?;

        let mut store = self.store.write().await;
        let mut created = 0;
        for row in table.rows() {
            let sources = store.find_nodes(
                &shape.source.label,
                &shape.source.store_attribute,
                &PropertyValue::from_cell(&row[source_column]),
            );
            let targets = store.find_nodes(
                &shape.target.label,
                &shape.target.store_attribute,
                &PropertyValue::from_cell(&row[target_column]),
            );
            for &source in &sources {
                for &target in &targets {
                    store.create_edge(
                        source,
                        target,
                        shape.relationship.clone(),
                        shape.directional,
                        properties(row, &attributes),
                    )?;
                    created += 1;
                }
            }
        }
        Ok(created)
    }
}
