//! Staged pipeline: read, build, export, load
//!
//! Each stage fully materializes its output before the next starts. The
//! graph target is passed in; the pipeline keeps no connection state.

use crate::config::PipelineConfig;
use crate::dataset::{
    Dataset, DatasetDescriptor, DatasetWriter, EdgeDataset, Manifest, NodeDataset,
};
use crate::entity::{
    build_company_nodes, build_exemption_nodes, build_legal_person_nodes, build_person_nodes,
    build_postcode_nodes, build_statement_nodes, build_super_secure_nodes, CompanyNameIndex,
};
use crate::error::PipelineResult;
use crate::load::{load_manifest, GraphTarget, LoadReport};
use crate::matcher::{match_people, MatchReport};
use crate::relationship::{
    build_address_edges, build_company_control_edges, build_company_officer_edges,
    build_exemption_edges, build_legal_person_control_edges, build_person_control_edges,
    build_person_officer_edges, build_statement_edges, build_super_secure_control_edges,
};
use crate::source::SourceSnapshot;
use tracing::info;

/// Every dataset of one run, in production order
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub datasets: Vec<Dataset>,
    pub matches: MatchReport,
}

impl BuildOutput {
    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.name() == name)
    }
}

/// Build all node and edge datasets from one input snapshot
pub fn build(snapshot: &SourceSnapshot, config: &PipelineConfig) -> BuildOutput {
    let names = CompanyNameIndex::from_companies(&snapshot.companies);
    let mut datasets = Vec::new();

    datasets.push(Dataset::Edges(build_company_control_edges(snapshot)));
    datasets.push(Dataset::Edges(build_company_officer_edges(snapshot, &names)));
    datasets.push(Dataset::Nodes(build_company_nodes(snapshot, &names, config)));

    datasets.push(Dataset::Edges(build_person_officer_edges(snapshot)));
    datasets.push(Dataset::Edges(build_person_control_edges(snapshot)));
    let people = build_person_nodes(snapshot, config);
    let (probable, matches) = match_people(&people.table, config.max_block_size);
    datasets.push(Dataset::Edges(probable));
    datasets.push(Dataset::Nodes(people));

    datasets.push(Dataset::Nodes(build_legal_person_nodes(snapshot, config)));
    datasets.push(Dataset::Edges(build_legal_person_control_edges(snapshot)));
    datasets.push(Dataset::Nodes(build_exemption_nodes(snapshot, config)));
    datasets.push(Dataset::Edges(build_exemption_edges(snapshot)));
    datasets.push(Dataset::Nodes(build_statement_nodes(snapshot, config)));
    datasets.push(Dataset::Edges(build_statement_edges(snapshot)));
    datasets.push(Dataset::Nodes(build_super_secure_nodes(snapshot, config)));
    datasets.push(Dataset::Edges(build_super_secure_control_edges(snapshot)));
    datasets.push(Dataset::Nodes(build_postcode_nodes(snapshot, config)));
    datasets.push(Dataset::Edges(build_address_edges(snapshot)));

    info!("Built {} datasets", datasets.len());
    BuildOutput { datasets, matches }
}

/// Write every dataset and `manifest.json` under `config.output_dir`,
/// appending to the manifest in production order
pub fn export(datasets: &[Dataset], config: &PipelineConfig) -> PipelineResult<Manifest> {
    let writer = DatasetWriter::new(&config.output_dir, config.export_chunk_size);
    let mut manifest = Manifest::new();

    for dataset in datasets {
        let location = writer.write(dataset.name(), dataset.table())?;
        info!("Wrote {} ({} rows)", location.display(), dataset.table().len());
        let descriptor = match dataset {
            Dataset::Nodes(set) => DatasetDescriptor::Nodes(NodeDataset {
                location,
                label: set.label.clone(),
            }),
            Dataset::Edges(set) => DatasetDescriptor::Edges(EdgeDataset {
                location,
                shape: set.shape.clone(),
            }),
        };
        manifest.push(descriptor);
    }

    let manifest_path = writer.dir().join("manifest.json");
    std::fs::write(&manifest_path, manifest.to_json()?)?;
    info!("Wrote manifest with {} datasets to {}", manifest.len(), manifest_path.display());
    Ok(manifest)
}

/// One configured pipeline run
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn read_sources(&self) -> PipelineResult<SourceSnapshot> {
        Ok(SourceSnapshot::load(&self.config.input, self.config.sample_rows)?)
    }

    /// Read, build and export; no target involved
    pub fn build_and_export(&self) -> PipelineResult<(BuildOutput, Manifest)> {
        let snapshot = self.read_sources()?;
        let output = build(&snapshot, &self.config);
        let manifest = export(&output.datasets, &self.config)?;
        Ok((output, manifest))
    }

    /// Full run: build and export everything, then reset and load `target`
    pub async fn run<T>(&self, target: &T) -> PipelineResult<LoadReport>
    where
        T: GraphTarget + ?Sized,
    {
        let (_, manifest) = self.build_and_export()?;
        load_manifest(target, &manifest, &self.config).await
    }
}
