//! End-to-end tests: raw matrix through ingestion, versioning, and diffing

use chrono::NaiveDate;
use claimdiff::claim::Estado;
use claimdiff::data;
use claimdiff::ingest;
use claimdiff::store::SnapshotStore;
use claimdiff::workspace::ClaimdiffWorkspace;
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn matrix(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn ingest_matrix_into_versioned_store_and_diff() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = ClaimdiffWorkspace::create_new(temp_dir.path().to_path_buf()).unwrap();
    let mut store = SnapshotStore::open(workspace.blob_store());

    // First upload: claims A and B
    let first = ingest::process(
        &matrix(&[
            &["Reclamación", "Cliente", "Importe", "Estado"],
            &["A", "Acme", "1.500,00", "Si"],
            &["B", "Globex", "200", "No"],
        ]),
        today(),
    );
    assert_eq!(first.records.len(), 2);
    let v1 = store.save_new_version(first.records, "upload 1");

    // Second upload: B unchanged, C new, A gone
    let second = ingest::process(
        &matrix(&[
            &["Reclamación", "Cliente", "Importe", "Estado"],
            &["B", "Globex", "200", "No"],
            &["C", "Initech", "50", "Parcial"],
        ]),
        today(),
    );
    let v2 = store.save_new_version(second.records, "upload 2");

    let result = store.compare(&v2, &v1).unwrap();
    assert_eq!(result.added.len(), 1);
    assert_eq!(result.added[0].id, "C");
    assert_eq!(result.removed.len(), 1);
    assert_eq!(result.removed[0].id, "A");
    assert!(result.modified.is_empty());
}

#[test]
fn store_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = ClaimdiffWorkspace::create_new(temp_dir.path().to_path_buf()).unwrap();

    let (v1, v2) = {
        let mut store = SnapshotStore::open(workspace.blob_store());
        let outcome = ingest::process(
            &matrix(&[
                &["Reclamacion", "Cliente", "Importe"],
                &["R-1", "Acme", "100"],
            ]),
            today(),
        );
        let v1 = store.save_new_version(outcome.records.clone(), "first");
        let v2 = store.save_new_version(outcome.records, "second");
        (v1, v2)
    };

    let reopened = SnapshotStore::open(workspace.blob_store());
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.current().unwrap().id, v2);
    assert_eq!(reopened.previous().unwrap().id, v1);

    // Comparing a version against itself yields no changes
    let identity = reopened.compare(&v2, &v2).unwrap();
    assert!(!identity.has_changes());
}

#[test]
fn pasted_text_flows_through_pipeline() {
    let pasted = "Reclamación\tCliente\tImporte\tEstado\n\
                  R-1\tAcme\t1.500,00\tSi\n\
                  R-1\tDup\t10\tNo\n\
                  \tNoId\t5\tSi";

    let matrix = data::matrix_from_pasted(pasted);
    let outcome = ingest::process(&matrix, today());

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].id, "R-1");
    assert_eq!(outcome.records[0].monto_reclamado, 1500.0);
    assert_eq!(outcome.records[0].estado, Estado::Si);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].row_index, 3);
}

#[test]
fn modified_records_show_field_level_changes() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = ClaimdiffWorkspace::create_new(temp_dir.path().to_path_buf()).unwrap();
    let mut store = SnapshotStore::open(workspace.blob_store());

    let before = ingest::process(
        &matrix(&[
            &["Reclamacion", "Cliente", "Importe", "Estado"],
            &["R-1", "Acme", "100", "No"],
        ]),
        today(),
    );
    let v1 = store.save_new_version(before.records, "before");

    let after = ingest::process(
        &matrix(&[
            &["Reclamacion", "Cliente", "Importe", "Estado"],
            &["R-1", "Acme", "250", "Si"],
        ]),
        today(),
    );
    let v2 = store.save_new_version(after.records, "after");

    let result = store.compare(&v2, &v1).unwrap();
    assert_eq!(result.modified.len(), 1);

    let diff = &result.modified[0];
    let fields: Vec<&str> = diff.changes.iter().map(|c| c.field.as_str()).collect();
    // monto_aceptado changes too: Si with no explicit accepted amount
    // defaults it to the claimed amount
    assert!(fields.contains(&"monto_reclamado"));
    assert!(fields.contains(&"monto_aceptado"));
    assert!(fields.contains(&"estado"));
    assert!(!fields.contains(&"cliente"));
}
