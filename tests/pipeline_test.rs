use psc_graph::{
    CypherScriptTarget, EdgeType, EmbeddedTarget, Label, Manifest, Pipeline, PipelineConfig,
    PipelineError,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// Two companies, one individual and one corporate controller, and an
/// officer who shares the individual's name and birth month but not the
/// postcode.
fn seed_inputs(dir: &Path) {
    write(
        dir,
        "companies.csv",
        "company_number,company_name,regaddress_addressline1,regaddress_posttown,regaddress_postcode\n\
         00000001,Acme Ltd,1 High Street,London,E1 1AA\n\
         00000002,Beta Holdings Limited,2 Low Road,London,N1 9GU\n",
    );
    write(
        dir,
        "active_psc_records.csv",
        "company_number,kind,etag,name,name_elements_forename,name_elements_surname,month_year_birth,address_postal_code,natures_of_control,notified_on,identification_place_registered,identification_registration_number\n\
         00000001,individual-person-with-significant-control,e1,Mr John Smith,John,Smith,1980-01,E1 1AA,\"['ownership-of-shares-75-to-100-percent']\",2020-01-01,,\n\
         00000001,corporate-entity-person-with-significant-control,e2,Beta Holdings Limited,,,,N1 9GU,\"['voting-rights-25-to-50-percent']\",2020-02-01,Companies House,2\n",
    );
    write(
        dir,
        "active_psc_statements.csv",
        "company_number,etag,statement,notified_on\n",
    );
    write(
        dir,
        "active_exemption_records.csv",
        "company_number,etag,notified_on\n00000002,x1,2021-03-04\n",
    );
    write(
        dir,
        "active_officers.csv",
        "company_number,person_number,corporate_indicator,title,forenames,surname,partial_date_of_birth,appointment_type,appointment_date,person_postcode\n\
         00000002,P1,,Mr,John,Smith,198001,1,2019-05-05,N1 1ZZ\n",
    );
}

fn config(tmp: &TempDir) -> PipelineConfig {
    let input = tmp.path().join("in");
    fs::create_dir_all(&input).unwrap();
    seed_inputs(&input);

    let mut config = PipelineConfig::default();
    config.input.dir = input;
    config.output_dir = tmp.path().join("out");
    config
}

#[tokio::test]
async fn test_full_run_into_embedded_store() {
    let tmp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(config(&tmp));
    let target = EmbeddedTarget::new();

    let report = pipeline.run(&target).await.unwrap();
    assert_eq!(report.constraints_created, 7);
    assert_eq!(report.deleted, 0);

    let store = target.store_read().await;
    let stats = store.statistics();
    assert_eq!(stats.nodes_by_label.get(&Label::new(Label::COMPANY)), Some(&2));
    assert_eq!(stats.nodes_by_label.get(&Label::new(Label::PERSON)), Some(&2));
    assert_eq!(stats.nodes_by_label.get(&Label::new(Label::EXEMPTION)), Some(&1));
    assert_eq!(stats.edges_by_type.get(&EdgeType::new(EdgeType::CONTROLS)), Some(&2));
    assert_eq!(stats.edges_by_type.get(&EdgeType::new(EdgeType::OFFICER_OF)), Some(&1));
    assert_eq!(stats.edges_by_type.get(&EdgeType::new(EdgeType::EXEMPT)), Some(&1));
    assert_eq!(
        stats.edges_by_type.get(&EdgeType::new(EdgeType::PROBABLY_SAME_PERSON)),
        Some(&1)
    );
    assert_eq!(report.total_nodes(), store.node_count());
    assert_eq!(report.total_edges(), store.edge_count());
}

#[tokio::test]
async fn test_rerun_resets_target_first() {
    let tmp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(config(&tmp));
    let target = EmbeddedTarget::new();

    let first = pipeline.run(&target).await.unwrap();
    let second = pipeline.run(&target).await.unwrap();

    assert_eq!(second.deleted, first.total_nodes());
    assert_eq!(second.constraints_dropped, 7);
    assert_eq!(target.store_read().await.node_count(), first.total_nodes());
}

#[test]
fn test_build_writes_datasets_and_manifest() {
    let tmp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(config(&tmp));

    let (output, manifest) = pipeline.build_and_export().unwrap();
    assert_eq!(output.datasets.len(), 17);
    assert_eq!(output.matches.pairs, 1);
    assert_eq!(manifest.len(), 17);

    let out = tmp.path().join("out");
    assert!(out.join("person_nodes.csv").exists());
    assert!(out.join("probable_id_edges.csv").exists());

    let json = fs::read_to_string(out.join("manifest.json")).unwrap();
    let written = Manifest::from_json(&json).unwrap();
    assert_eq!(written, manifest);
    assert_eq!(written.node_datasets().count(), 7);
    assert_eq!(written.edge_datasets().count(), 10);
}

#[test]
fn test_missing_required_input_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);
    fs::remove_file(config.input.dir.join("active_officers.csv")).unwrap();

    let err = Pipeline::new(config).build_and_export().unwrap_err();
    assert!(matches!(err, PipelineError::Source(_)));
}

#[tokio::test]
async fn test_cypher_script_target() {
    let tmp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(config(&tmp));
    let target = CypherScriptTarget::new(tmp.path().join("load.cypher"));

    pipeline.run(&target).await.unwrap();
    let path = target.write_script().await.unwrap();
    let script = fs::read_to_string(path).unwrap();

    assert!(script.contains("DETACH DELETE"));
    assert!(script.contains("PROBABLY_SAME_PERSON"));
    let first_node = script.find("CREATE (n:Person").unwrap();
    let first_edge = script.find("MERGE (s)-[r:PROBABLY_SAME_PERSON]").unwrap();
    assert!(first_node < first_edge);
}
