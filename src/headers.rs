//! Header mapping from locale-variant column names to canonical fields

use crate::claim::ClaimField;
use crate::normalize::normalize_header;
use std::collections::BTreeMap;

/// Known header variants, keyed by their normalized form. The table carries
/// both accented and unaccented spellings of each header as they appear in
/// the wild. Extending supported input formats means extending this table.
const HEADER_SYNONYMS: &[(&str, ClaimField)] = &[
    ("reclamacion", ClaimField::Numero),
    ("reclamación", ClaimField::Numero),
    ("cliente", ClaimField::Cliente),
    ("importe", ClaimField::MontoReclamado),
    ("importe (€)", ClaimField::MontoReclamado),
    ("importe aceptado", ClaimField::MontoAceptado),
    ("motivo", ClaimField::Motivo),
    ("motivo cliente", ClaimField::MotivoCliente),
    ("resolucion", ClaimField::Resolucion),
    ("resolución", ClaimField::Resolucion),
    ("data calidad", ClaimField::FechaCalidad),
    ("mail autorizacion abono", ClaimField::MailAutorizacionAbono),
    ("autorizacion", ClaimField::Autorizacion),
    ("autorización", ClaimField::Autorizacion),
    ("abono", ClaimField::Abono),
    ("envio a cliente", ClaimField::EnvioACliente),
    ("tancada a sap", ClaimField::FechaCierre),
    ("tancada sap", ClaimField::FechaCierre),
    ("dias de espera", ClaimField::DiasEspera),
    ("días de espera", ClaimField::DiasEspera),
    ("estado", ClaimField::Estado),
    ("observaciones", ClaimField::Observaciones),
];

/// Look up a normalized header in the synonym table.
pub fn canonical_field(normalized: &str) -> Option<ClaimField> {
    HEADER_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == normalized)
        .map(|(_, field)| *field)
}

/// Map a raw header row to `column index -> canonical field`.
///
/// Unrecognized headers are silently dropped: their column is ignored for
/// every data row. This keeps ingestion tolerant of extra columns and of
/// column reordering, at the cost of silently losing unmapped data.
pub fn map_headers(raw_headers: &[String]) -> BTreeMap<usize, ClaimField> {
    let mut header_map = BTreeMap::new();
    for (index, header) in raw_headers.iter().enumerate() {
        let normalized = normalize_header(header);
        if let Some(field) = canonical_field(&normalized) {
            log::trace!("Mapped column {} '{}' to {}", index, header, field.name());
            header_map.insert(index, field);
        } else if !normalized.is_empty() {
            log::debug!("Ignoring unrecognized header '{}' (column {})", header, index);
        }
    }
    header_map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_headers_with_variants() {
        let headers: Vec<String> = ["Reclamación", "CLIENTE", "Importe (€)", "Estado"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let map = map_headers(&headers);
        assert_eq!(map.get(&0), Some(&ClaimField::Numero));
        assert_eq!(map.get(&1), Some(&ClaimField::Cliente));
        assert_eq!(map.get(&2), Some(&ClaimField::MontoReclamado));
        assert_eq!(map.get(&3), Some(&ClaimField::Estado));
    }

    #[test]
    fn test_unrecognized_headers_dropped() {
        let headers: Vec<String> = ["Reclamacion", "Comentarios internos", "Cliente"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let map = map_headers(&headers);
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key(&1));
    }

    #[test]
    fn test_reordered_columns() {
        let headers: Vec<String> = ["Estado", "Reclamacion"].iter().map(|s| s.to_string()).collect();

        let map = map_headers(&headers);
        assert_eq!(map.get(&0), Some(&ClaimField::Estado));
        assert_eq!(map.get(&1), Some(&ClaimField::Numero));
    }
}
