//! Row transformation: raw cells into a partial claim

use crate::claim::{ClaimField, Estado, FieldKind};
use crate::normalize::{normalize_estado, parse_amount, parse_date};
use std::collections::BTreeMap;

/// A claim under construction. `None` means the column was not present in
/// the header map; a mapped column with an empty cell still produces `Some`
/// with the normalizer's default-for-empty value.
#[derive(Debug, Clone, Default)]
pub struct PartialClaim {
    pub numero: Option<String>,
    pub cliente: Option<String>,
    pub monto_reclamado: Option<f64>,
    pub monto_aceptado: Option<f64>,
    pub motivo: Option<String>,
    pub motivo_cliente: Option<String>,
    pub resolucion: Option<String>,
    pub fecha_calidad: Option<String>,
    pub mail_autorizacion_abono: Option<String>,
    pub autorizacion: Option<String>,
    pub abono: Option<f64>,
    pub envio_a_cliente: Option<String>,
    pub fecha_cierre: Option<String>,
    pub dias_espera: Option<i64>,
    pub estado: Option<Estado>,
    pub observaciones: Option<String>,
}

impl PartialClaim {
    /// Normalize a raw cell for `field` and assign it. The normalizer is
    /// chosen by the field's declared kind, a finite dispatch table.
    fn assign(&mut self, field: ClaimField, raw: &str) {
        match field.kind() {
            FieldKind::Text => self.assign_text(field, raw.to_string()),
            FieldKind::Amount => self.assign_amount(field, parse_amount(raw)),
            FieldKind::Date => self.assign_date(field, parse_date(raw)),
            FieldKind::Status => self.estado = Some(normalize_estado(raw)),
        }
    }

    fn assign_text(&mut self, field: ClaimField, value: String) {
        let slot = match field {
            ClaimField::Numero => &mut self.numero,
            ClaimField::Cliente => &mut self.cliente,
            ClaimField::Motivo => &mut self.motivo,
            ClaimField::MotivoCliente => &mut self.motivo_cliente,
            ClaimField::Resolucion => &mut self.resolucion,
            ClaimField::MailAutorizacionAbono => &mut self.mail_autorizacion_abono,
            ClaimField::Autorizacion => &mut self.autorizacion,
            ClaimField::EnvioACliente => &mut self.envio_a_cliente,
            ClaimField::Observaciones => &mut self.observaciones,
            _ => return,
        };
        *slot = Some(value);
    }

    fn assign_amount(&mut self, field: ClaimField, value: f64) {
        match field {
            ClaimField::MontoReclamado => self.monto_reclamado = Some(value),
            ClaimField::MontoAceptado => self.monto_aceptado = Some(value),
            ClaimField::Abono => self.abono = Some(value),
            ClaimField::DiasEspera => self.dias_espera = Some(value as i64),
            _ => {}
        }
    }

    fn assign_date(&mut self, field: ClaimField, value: String) {
        match field {
            ClaimField::FechaCalidad => self.fecha_calidad = Some(value),
            ClaimField::FechaCierre => self.fecha_cierre = Some(value),
            _ => {}
        }
    }
}

/// Apply the header map and field normalizers to one raw row.
///
/// Columns absent from `header_map` are ignored. Missing cells within a
/// mapped column normalize as empty input.
pub fn transform_row(cells: &[String], header_map: &BTreeMap<usize, ClaimField>) -> PartialClaim {
    let mut partial = PartialClaim::default();
    for (&index, &field) in header_map {
        let raw = cells.get(index).map(String::as_str).unwrap_or("");
        partial.assign(field, raw);
    }
    partial
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::map_headers;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_transform_row_applies_normalizers() {
        let headers = row(&["Reclamacion", "Cliente", "Importe", "Tancada a SAP", "Estado"]);
        let map = map_headers(&headers);

        let partial = transform_row(&row(&["R-7", "Acme", "1.234,56", "5/6/2024", "aceptado"]), &map);

        assert_eq!(partial.numero.as_deref(), Some("R-7"));
        assert_eq!(partial.cliente.as_deref(), Some("Acme"));
        assert_eq!(partial.monto_reclamado, Some(1234.56));
        assert_eq!(partial.fecha_cierre.as_deref(), Some("2024-06-05"));
        assert_eq!(partial.estado, Some(Estado::Si));
    }

    #[test]
    fn test_missing_cells_use_empty_defaults() {
        let headers = row(&["Reclamacion", "Importe", "Estado"]);
        let map = map_headers(&headers);

        // Row shorter than the header row
        let partial = transform_row(&row(&["R-1"]), &map);

        assert_eq!(partial.numero.as_deref(), Some("R-1"));
        assert_eq!(partial.monto_reclamado, Some(0.0));
        assert_eq!(partial.estado, Some(Estado::No));
    }

    #[test]
    fn test_unmapped_columns_ignored() {
        let headers = row(&["Reclamacion", "Columna desconocida"]);
        let map = map_headers(&headers);

        let partial = transform_row(&row(&["R-2", "se pierde"]), &map);

        assert_eq!(partial.numero.as_deref(), Some("R-2"));
        assert!(partial.observaciones.is_none());
    }
}
