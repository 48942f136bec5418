use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::maintenance::logs::LogEntry;
use crate::types::Hours;

/// Number of equipment items reported in a risk ranking by default.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRisk {
    pub equipment: String,
    pub downtime_hours: Hours,
}

/// Total downtime per equipment, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct EquipmentDowntime {
    totals: Vec<EquipmentRisk>,
    index: HashMap<String, usize>,
}

impl EquipmentDowntime {
    /// Add `hours` to the running total for `equipment`. Totals saturate at
    /// the top of the decimal range.
    pub fn add(&mut self, equipment: &str, hours: Hours) {
        match self.index.get(equipment) {
            Some(&i) => {
                let total = &mut self.totals[i].downtime_hours;
                *total = total.saturating_add(hours);
            }
            None => {
                self.index.insert(equipment.to_string(), self.totals.len());
                self.totals.push(EquipmentRisk {
                    equipment: equipment.to_string(),
                    downtime_hours: hours,
                });
            }
        }
    }

    /// Summed hours for `equipment`, if it appeared at all.
    pub fn get(&self, equipment: &str) -> Option<Hours> {
        self.index
            .get(equipment)
            .map(|&i| self.totals[i].downtime_hours)
    }

    pub fn total_hours(&self) -> Hours {
        self.totals
            .iter()
            .fold(Hours::ZERO, |acc, t| acc.saturating_add(t.downtime_hours))
    }

    /// All equipment, highest downtime first. Equal totals keep their
    /// first-appearance order.
    pub fn ranked(&self) -> Vec<EquipmentRisk> {
        let mut ranked = self.totals.clone();
        ranked.sort_by(|a, b| b.downtime_hours.cmp(&a.downtime_hours));
        ranked
    }

    pub fn iter(&self) -> impl Iterator<Item = &EquipmentRisk> {
        self.totals.iter()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, Hours)> for EquipmentDowntime {
    fn from_iter<I: IntoIterator<Item = (S, Hours)>>(iter: I) -> Self {
        let mut downtime = EquipmentDowntime::default();
        for (equipment, hours) in iter {
            downtime.add(equipment.as_ref(), hours);
        }
        downtime
    }
}

/// Sum downtime hours per equipment.
pub fn downtime_by_equipment(entries: &[LogEntry]) -> EquipmentDowntime {
    entries
        .iter()
        .map(|e| (e.equipment.as_str(), e.downtime_hours))
        .collect()
}

/// The `top_n` equipment items with the most downtime.
pub fn top_risk_equipment(downtime: &EquipmentDowntime, top_n: usize) -> Vec<EquipmentRisk> {
    let mut ranked = downtime.ranked();
    ranked.truncate(top_n);
    ranked
}
