//! Canonical claim record and its declared field set

use serde::{Deserialize, Serialize};
use std::fmt;

/// Acceptance state of a claim. Anything unrecognized collapses to `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Estado {
    #[serde(rename = "SI")]
    Si,
    #[default]
    #[serde(rename = "NO")]
    No,
    #[serde(rename = "PARCIAL")]
    Parcial,
}

impl Estado {
    /// Whether the claim counts as accepted for aggregate metrics.
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Si | Self::Parcial)
    }
}

impl fmt::Display for Estado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Si => "SI",
            Self::No => "NO",
            Self::Parcial => "PARCIAL",
        };
        write!(f, "{}", s)
    }
}

/// One normalized claim record.
///
/// `id` always equals `numero` (the unique business key). Dates are canonical
/// `YYYY-MM-DD` strings, or empty when the source value was unparseable.
/// Field declaration order is the order the diff engine reports changes in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub numero: String,
    pub cliente: String,
    pub monto_reclamado: f64,
    pub monto_aceptado: f64,
    pub motivo: String,
    pub motivo_cliente: String,
    pub resolucion: String,
    pub fecha_calidad: String,
    pub mail_autorizacion_abono: String,
    pub autorizacion: String,
    pub abono: f64,
    pub envio_a_cliente: String,
    pub fecha_cierre: String,
    pub dias_espera: i64,
    pub estado: Estado,
    pub observaciones: String,
    pub fecha_creacion: String,
}

/// How a raw cell is normalized before it lands in a [`Claim`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Amount,
    Date,
    Status,
}

/// Canonical fields a source column can map onto.
///
/// `fecha_creacion` is deliberately absent: it is never read from input,
/// only derived during record completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClaimField {
    Numero,
    Cliente,
    MontoReclamado,
    MontoAceptado,
    Motivo,
    MotivoCliente,
    Resolucion,
    FechaCalidad,
    MailAutorizacionAbono,
    Autorizacion,
    Abono,
    EnvioACliente,
    FechaCierre,
    DiasEspera,
    Estado,
    Observaciones,
}

impl ClaimField {
    /// Normalizer dispatch kind for this field.
    pub fn kind(self) -> FieldKind {
        match self {
            Self::Numero
            | Self::Cliente
            | Self::Motivo
            | Self::MotivoCliente
            | Self::Resolucion
            | Self::MailAutorizacionAbono
            | Self::Autorizacion
            | Self::EnvioACliente
            | Self::Observaciones => FieldKind::Text,
            Self::MontoReclamado | Self::MontoAceptado | Self::Abono | Self::DiasEspera => {
                FieldKind::Amount
            }
            Self::FechaCalidad | Self::FechaCierre => FieldKind::Date,
            Self::Estado => FieldKind::Status,
        }
    }

    /// Canonical snake_case name, matching the serialized `Claim` attribute.
    pub fn name(self) -> &'static str {
        match self {
            Self::Numero => "numero",
            Self::Cliente => "cliente",
            Self::MontoReclamado => "monto_reclamado",
            Self::MontoAceptado => "monto_aceptado",
            Self::Motivo => "motivo",
            Self::MotivoCliente => "motivo_cliente",
            Self::Resolucion => "resolucion",
            Self::FechaCalidad => "fecha_calidad",
            Self::MailAutorizacionAbono => "mail_autorizacion_abono",
            Self::Autorizacion => "autorizacion",
            Self::Abono => "abono",
            Self::EnvioACliente => "envio_a_cliente",
            Self::FechaCierre => "fecha_cierre",
            Self::DiasEspera => "dias_espera",
            Self::Estado => "estado",
            Self::Observaciones => "observaciones",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estado_serialization() {
        assert_eq!(serde_json::to_string(&Estado::Si).unwrap(), "\"SI\"");
        assert_eq!(serde_json::to_string(&Estado::Parcial).unwrap(), "\"PARCIAL\"");

        let parsed: Estado = serde_json::from_str("\"NO\"").unwrap();
        assert_eq!(parsed, Estado::No);
    }

    #[test]
    fn test_estado_accepted() {
        assert!(Estado::Si.is_accepted());
        assert!(Estado::Parcial.is_accepted());
        assert!(!Estado::No.is_accepted());
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(ClaimField::Numero.kind(), FieldKind::Text);
        assert_eq!(ClaimField::MontoReclamado.kind(), FieldKind::Amount);
        assert_eq!(ClaimField::DiasEspera.kind(), FieldKind::Amount);
        assert_eq!(ClaimField::FechaCierre.kind(), FieldKind::Date);
        assert_eq!(ClaimField::Estado.kind(), FieldKind::Status);
    }
}
