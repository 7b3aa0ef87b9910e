//! Set and field-level diffing between two claim snapshots

use crate::claim::Claim;
use crate::error::Result;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// One field that differs between the two sides of a modified claim.
#[derive(Debug, Clone, Serialize)]
pub struct FieldChange {
    pub field: String,
    pub old_value: Value,
    pub new_value: Value,
}

/// A claim present on both sides with at least one differing field.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimDiff {
    pub claim_id: String,
    pub current: Claim,
    pub previous: Claim,
    pub changes: Vec<FieldChange>,
}

/// Added/removed/modified decomposition between two snapshots, keyed by
/// claim id. A is the current side, B the previous: `added` holds keys only
/// in A, `removed` keys only in B. Owned entirely by the caller; never
/// cached.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComparisonResult {
    pub added: Vec<Claim>,
    pub removed: Vec<Claim>,
    pub modified: Vec<ClaimDiff>,
}

impl ComparisonResult {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.modified.is_empty()
    }

    pub fn total_changes(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

/// Compare two claim sets. Output lists follow the insertion order of the
/// source snapshots, so comparisons are reproducible.
///
/// Field inequality is computed generically over the record's declared
/// attributes via its serialized form: a new `Claim` attribute participates
/// in diffing without any change here.
pub fn compare(current: &[Claim], previous: &[Claim]) -> Result<ComparisonResult> {
    let map_a: IndexMap<&str, &Claim> = current.iter().map(|c| (c.id.as_str(), c)).collect();
    let map_b: IndexMap<&str, &Claim> = previous.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut result = ComparisonResult::default();

    for (id, claim_a) in &map_a {
        match map_b.get(id) {
            None => result.added.push((*claim_a).clone()),
            Some(claim_b) => {
                let changes = field_changes(claim_a, claim_b)?;
                if !changes.is_empty() {
                    result.modified.push(ClaimDiff {
                        claim_id: (*id).to_string(),
                        current: (*claim_a).clone(),
                        previous: (*claim_b).clone(),
                        changes,
                    });
                }
            }
        }
    }

    for (id, claim_b) in &map_b {
        if !map_a.contains_key(id) {
            result.removed.push((*claim_b).clone());
        }
    }

    Ok(result)
}

/// Field-by-field value inequality in declared attribute order.
fn field_changes(current: &Claim, previous: &Claim) -> Result<Vec<FieldChange>> {
    let value_a = serde_json::to_value(current)?;
    let value_b = serde_json::to_value(previous)?;

    let (Value::Object(obj_a), Value::Object(obj_b)) = (value_a, value_b) else {
        return Ok(Vec::new());
    };

    let mut changes = Vec::new();
    for (field, new_value) in obj_a {
        let old_value = obj_b.get(&field).cloned().unwrap_or(Value::Null);
        if old_value != new_value {
            changes.push(FieldChange {
                field,
                old_value,
                new_value,
            });
        }
    }
    Ok(changes)
}
