//! Output formatting utilities

use crate::diff::ComparisonResult;
use crate::error::Result;
use crate::ingest::IngestOutcome;
use crate::metrics::{ClientTotal, Kpi, KpiReport};
use crate::store::Version;

/// Pretty printer for claimdiff output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print an ingestion summary with the row-error report
    pub fn print_ingest_summary(outcome: &IngestOutcome) {
        println!("📥 Ingestion result");
        println!("├─ Valid claims: {}", outcome.records.len());
        if outcome.errors.is_empty() {
            println!("└─ Rejected rows: 0");
            return;
        }

        println!("└─ Rejected rows: {}", outcome.errors.len());
        for (i, error) in outcome.errors.iter().enumerate() {
            let prefix = if i == outcome.errors.len() - 1 { "   └─" } else { "   ├─" };
            println!(
                "{} Row {}: {} [{}]",
                prefix,
                error.row_index,
                error.message,
                error.raw_row.join(" | ")
            );
        }
    }

    /// Print the version history list
    pub fn print_version_list(history: &[&Version], current_id: Option<&str>, previous_id: Option<&str>) {
        if history.is_empty() {
            println!("No versions found.");
            return;
        }

        println!("📸 Stored versions:");
        for (i, version) in history.iter().enumerate() {
            let prefix = if i == history.len() - 1 { "└─" } else { "├─" };
            let marker = if Some(version.id.as_str()) == current_id {
                " (current)"
            } else if Some(version.id.as_str()) == previous_id {
                " (previous)"
            } else {
                ""
            };
            println!(
                "{} {} — {} ({} rows, {}){}",
                prefix,
                version.id,
                version.metadata.name,
                version.metadata.rows,
                version.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                marker
            );
        }
    }

    /// Print one version's metadata
    pub fn print_version_metadata(version: &Version) {
        println!("📸 Version: {}", version.id);
        println!("├─ Name: {}", version.metadata.name);
        println!("├─ Created: {}", version.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("└─ Rows: {}", version.metadata.rows);
    }

    /// Print diff results between two versions
    pub fn print_comparison(result: &ComparisonResult, label_a: &str, label_b: &str) {
        println!("🔍 Comparison: {} → {}", label_b, label_a);

        if !result.has_changes() {
            println!("└─ ✅ No differences");
            return;
        }

        println!("├─ Added: {}", result.added.len());
        for claim in result.added.iter().take(5) {
            println!("│  ├─ {} ({})", claim.id, claim.cliente);
        }
        if result.added.len() > 5 {
            println!("│  └─ ... and {} more", result.added.len() - 5);
        }

        println!("├─ Removed: {}", result.removed.len());
        for claim in result.removed.iter().take(5) {
            println!("│  ├─ {} ({})", claim.id, claim.cliente);
        }
        if result.removed.len() > 5 {
            println!("│  └─ ... and {} more", result.removed.len() - 5);
        }

        println!("└─ Modified: {}", result.modified.len());
        for diff in result.modified.iter().take(5) {
            println!("   ├─ {}: {} field(s) changed", diff.claim_id, diff.changes.len());
            for change in diff.changes.iter().take(3) {
                println!(
                    "   │  └─ {}: {} → {}",
                    change.field,
                    render_value(&change.old_value),
                    render_value(&change.new_value)
                );
            }
            if diff.changes.len() > 3 {
                println!("   │  └─ ... and {} more", diff.changes.len() - 3);
            }
        }
        if result.modified.len() > 5 {
            println!("   └─ ... and {} more", result.modified.len() - 5);
        }
    }

    /// Print the KPI report with top clients
    pub fn print_kpi_report(
        report: &KpiReport,
        top: &[ClientTotal],
        modified_count: usize,
        window_days: i64,
    ) {
        println!("📊 KPIs (last {} days)", window_days);
        println!("├─ New claims: {}", format_kpi(&report.new_claims, false));
        println!("├─ Accepted claims: {}", format_kpi(&report.accepted_claims, false));
        println!("├─ Total claimed: {}", format_kpi(&report.total_claimed, true));
        println!("├─ Total accepted: {}", format_kpi(&report.total_accepted, true));
        println!("└─ Modified claims: {}", modified_count);

        if top.is_empty() {
            return;
        }
        println!();
        println!("🏆 Top clients by claimed amount:");
        for (i, client) in top.iter().enumerate() {
            let prefix = if i == top.len() - 1 { "└─" } else { "├─" };
            println!("{} {} — {:.2} €", prefix, client.name, client.total_claimed);
        }
    }
}

fn format_kpi(kpi: &Kpi, amount: bool) -> String {
    let value = if amount {
        format!("{:.2} €", kpi.value)
    } else {
        format!("{}", kpi.value as i64)
    };
    format!("{} ({})", value, format_variation(kpi.variation))
}

/// Render a variation percentage; a `None` base is displayed as "N/A".
pub fn format_variation(variation: Option<f64>) -> String {
    match variation {
        Some(v) => format!("{:+.1}%", v),
        None => "N/A".to_string(),
    }
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_variation() {
        assert_eq!(format_variation(Some(12.5)), "+12.5%");
        assert_eq!(format_variation(Some(-3.0)), "-3.0%");
        assert_eq!(format_variation(Some(0.0)), "+0.0%");
        assert_eq!(format_variation(None), "N/A");
    }
}
