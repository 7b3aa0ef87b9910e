//! Period-bounded aggregate metrics and period-over-period variation

use crate::claim::Claim;
use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;

/// Default number of top clients reported.
pub const DEFAULT_TOP_CLIENTS: usize = 5;

/// Aggregate statistics over one date window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodStats {
    pub new_claims: usize,
    pub accepted_claims: usize,
    pub total_claimed: f64,
    pub total_accepted: f64,
}

/// One metric value with its period-over-period variation in percent.
/// `variation: None` means the comparison base was zero while the current
/// value is positive (rendered as "N/A").
#[derive(Debug, Clone, Serialize)]
pub struct Kpi {
    pub value: f64,
    pub variation: Option<f64>,
}

/// The per-metric KPI report for one trailing window.
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    pub new_claims: Kpi,
    pub accepted_claims: Kpi,
    pub total_claimed: Kpi,
    pub total_accepted: Kpi,
}

/// A client with its claimed-amount total over the window.
#[derive(Debug, Clone, Serialize)]
pub struct ClientTotal {
    pub name: String,
    pub total_claimed: f64,
}

/// Compute aggregate stats over records whose creation date falls within
/// `[start, end]` inclusive. Records with an empty or unparseable creation
/// date are excluded.
pub fn period_stats(records: &[Claim], start: NaiveDate, end: NaiveDate) -> PeriodStats {
    let mut stats = PeriodStats::default();
    for claim in records {
        let Some(created) = record_date(&claim.fecha_creacion) else {
            continue;
        };
        if created < start || created > end {
            continue;
        }
        stats.new_claims += 1;
        if claim.estado.is_accepted() {
            stats.accepted_claims += 1;
        }
        stats.total_claimed += claim.monto_reclamado;
        stats.total_accepted += claim.monto_aceptado;
    }
    stats
}

/// Compute the KPI report for the trailing `window_days` window ending
/// `today`, compared against the immediately preceding window of the same
/// length. The comparison runs over `previous` when a prior snapshot
/// exists, else over `current` itself.
pub fn calculate_kpis(
    current: &[Claim],
    previous: Option<&[Claim]>,
    window_days: i64,
    today: NaiveDate,
) -> KpiReport {
    let current_start = today - Duration::days(window_days);
    let previous_end = current_start - Duration::days(1);
    let previous_start = previous_end - Duration::days(window_days - 1);

    let current_stats = period_stats(current, current_start, today);
    let comparison_data = previous.unwrap_or(current);
    let previous_stats = period_stats(comparison_data, previous_start, previous_end);

    KpiReport {
        new_claims: kpi(current_stats.new_claims as f64, previous_stats.new_claims as f64),
        accepted_claims: kpi(
            current_stats.accepted_claims as f64,
            previous_stats.accepted_claims as f64,
        ),
        total_claimed: kpi(current_stats.total_claimed, previous_stats.total_claimed),
        total_accepted: kpi(current_stats.total_accepted, previous_stats.total_accepted),
    }
}

fn kpi(current: f64, previous: f64) -> Kpi {
    Kpi {
        value: current,
        variation: variation(current, previous),
    }
}

/// Percentage change; `None` is the "N/A" case (zero base, positive
/// current).
fn variation(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        if current > 0.0 {
            None
        } else {
            Some(0.0)
        }
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

/// Top clients by claimed-amount total over the trailing window, descending.
/// Ties keep the grouping's insertion order.
pub fn top_clients(
    records: &[Claim],
    window_days: i64,
    today: NaiveDate,
    limit: usize,
) -> Vec<ClientTotal> {
    let start = today - Duration::days(window_days);

    let mut totals: IndexMap<&str, f64> = IndexMap::new();
    for claim in records {
        let Some(created) = record_date(&claim.fecha_creacion) else {
            continue;
        };
        if created < start {
            continue;
        }
        *totals.entry(claim.cliente.as_str()).or_insert(0.0) += claim.monto_reclamado;
    }

    let mut ranked: Vec<ClientTotal> = totals
        .into_iter()
        .map(|(name, total_claimed)| ClientTotal {
            name: name.to_string(),
            total_claimed,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.total_claimed
            .partial_cmp(&a.total_claimed)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}

/// Claims whose quality date falls inside the trailing window and differs
/// from their creation date, i.e. records touched after they were created.
pub fn modified_claims<'a>(
    records: &'a [Claim],
    window_days: i64,
    today: NaiveDate,
) -> Vec<&'a Claim> {
    let start = today - Duration::days(window_days);
    records
        .iter()
        .filter(|claim| {
            let Some(quality) = record_date(&claim.fecha_calidad) else {
                return false;
            };
            quality >= start && claim.fecha_calidad != claim.fecha_creacion
        })
        .collect()
}

fn record_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
