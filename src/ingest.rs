//! Ingestion pipeline: raw matrix to validated claims plus an error report

use crate::claim::{Claim, Estado};
use crate::headers::map_headers;
use crate::transform::{transform_row, PartialClaim};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Placeholder for absent string fields.
const MISSING_TEXT: &str = "N/A";

/// One rejected data row. `row_index` is the row's position in the input
/// matrix (the header row is index 0).
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    pub row_index: usize,
    pub message: String,
    pub raw_row: Vec<String>,
}

/// Result of one ingestion batch. Malformed rows are data, not failures:
/// they are excluded from `records` and captured in `errors`/`error_rows`
/// for user review.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestOutcome {
    pub records: Vec<Claim>,
    pub errors: Vec<RowError>,
    pub error_rows: Vec<Vec<String>>,
}

impl IngestOutcome {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Run the full ingestion pipeline over a raw matrix.
///
/// Row 0 is the header row. Rows missing the required `numero` key are
/// reported as row errors; rows whose `numero` duplicates an
/// already-accepted record are silently dropped (first occurrence wins).
/// `today` is the processing date used when a record carries no usable
/// creation date; callers inject it so re-running the same input on the
/// same day is deterministic.
pub fn process(matrix: &[Vec<String>], today: NaiveDate) -> IngestOutcome {
    process_with_progress(matrix, today, None)
}

/// Same as [`process`], reporting `(processed, total)` data-row counts
/// through the optional callback.
pub fn process_with_progress(
    matrix: &[Vec<String>],
    today: NaiveDate,
    progress: Option<&dyn Fn(u64, u64)>,
) -> IngestOutcome {
    // Fewer than a header row plus one data row is an empty input, not an error
    if matrix.len() < 2 {
        return IngestOutcome::default();
    }

    let header_map = map_headers(&matrix[0]);
    let data_rows = &matrix[1..];
    let total = data_rows.len() as u64;

    let mut outcome = IngestOutcome::default();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (offset, row) in data_rows.iter().enumerate() {
        let row_index = offset + 1;
        if let Some(report) = progress {
            report(row_index as u64, total);
        }
        let partial = transform_row(row, &header_map);

        let numero = match partial.numero.as_deref() {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => {
                outcome.errors.push(RowError {
                    row_index,
                    message: "missing required unique identifier (numero)".to_string(),
                    raw_row: row.clone(),
                });
                outcome.error_rows.push(row.clone());
                continue;
            }
        };

        if !seen_ids.insert(numero.clone()) {
            // Duplicate within this batch: first occurrence wins
            log::debug!("Dropping duplicate claim '{}' at row {}", numero, row_index);
            continue;
        }

        outcome.records.push(complete_claim(numero, partial, today));
    }

    log::info!(
        "Ingested {} claims ({} rejected rows)",
        outcome.records.len(),
        outcome.errors.len()
    );
    outcome
}

/// Fill a partial claim with record-completion defaults.
///
/// An accepted claim with no explicit accepted amount defaults it to the
/// claimed amount; the credit (`abono`) defaults to the accepted amount.
/// The creation date falls back to the quality date, then to the processing
/// date.
fn complete_claim(numero: String, partial: PartialClaim, today: NaiveDate) -> Claim {
    let estado = partial.estado.unwrap_or_default();
    let monto_reclamado = partial.monto_reclamado.unwrap_or(0.0);
    let monto_aceptado = partial.monto_aceptado.unwrap_or(if estado == Estado::Si {
        monto_reclamado
    } else {
        0.0
    });
    let abono = partial.abono.or(partial.monto_aceptado).unwrap_or(0.0);
    let fecha_calidad = partial.fecha_calidad.unwrap_or_default();
    let fecha_creacion = if fecha_calidad.is_empty() {
        today.format("%Y-%m-%d").to_string()
    } else {
        fecha_calidad.clone()
    };

    Claim {
        id: numero.clone(),
        numero,
        cliente: default_text(partial.cliente),
        monto_reclamado,
        monto_aceptado,
        motivo: default_text(partial.motivo),
        motivo_cliente: default_text(partial.motivo_cliente),
        resolucion: default_text(partial.resolucion),
        fecha_calidad,
        mail_autorizacion_abono: non_empty(partial.mail_autorizacion_abono, "no"),
        autorizacion: default_text(partial.autorizacion),
        abono,
        envio_a_cliente: partial.envio_a_cliente.unwrap_or_default(),
        fecha_cierre: partial.fecha_cierre.unwrap_or_default(),
        dias_espera: partial.dias_espera.unwrap_or(0),
        estado,
        observaciones: partial.observaciones.unwrap_or_default(),
        fecha_creacion,
    }
}

fn default_text(value: Option<String>) -> String {
    non_empty(value, MISSING_TEXT)
}

fn non_empty(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}
