//! Aggregation and ordering over an [`ElementSubgraph`].
//!
//! Pure functions, shared by every store backend. Success rates are compared
//! by cross-multiplying integer counts so equal ratios tie exactly.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use heal_core::enums::RunResult;
use heal_core::responses::{
    ElementAnalytics, HealingHistoryEntry, HealingStrategy, LocatorHistoryEntry, LocatorRank,
};

use crate::store::ElementSubgraph;

struct Tally<'a> {
    locator: &'a str,
    seq: u64,
    passes: u64,
    total: u64,
}

/// Descending success rate, then descending run count, then locator
/// insertion order. Locators with no runs are left out.
#[must_use]
pub fn ranked_locators(graph: &ElementSubgraph) -> Vec<LocatorRank> {
    let mut tallies: Vec<Tally<'_>> = graph
        .locators
        .iter()
        .filter(|l| !l.runs.is_empty())
        .map(|l| Tally {
            locator: &l.value,
            seq: l.seq,
            passes: l.runs.iter().filter(|r| r.result == RunResult::Pass).count() as u64,
            total: l.runs.len() as u64,
        })
        .collect();

    tallies.sort_by(|a, b| {
        compare_rates(b.passes, b.total, a.passes, a.total)
            .then_with(|| b.total.cmp(&a.total))
            .then_with(|| a.seq.cmp(&b.seq))
    });

    tallies
        .into_iter()
        .map(|t| LocatorRank {
            locator: t.locator.to_string(),
            passes: t.passes,
            total: t.total,
            success_rate: success_rate(t.passes, t.total),
        })
        .collect()
}

/// Compare `p1/t1` with `p2/t2` for non-zero totals.
fn compare_rates(p1: u64, t1: u64, p2: u64, t2: u64) -> Ordering {
    (u128::from(p1) * u128::from(t2)).cmp(&(u128::from(p2) * u128::from(t1)))
}

#[allow(clippy::cast_precision_loss)]
fn success_rate(passes: u64, total: u64) -> f64 {
    passes as f64 / total as f64
}

/// Distinct healing actions per type, most frequent first; ties keep the
/// order in which each type was first seen.
#[must_use]
pub fn ranked_strategies(graph: &ElementSubgraph) -> Vec<HealingStrategy> {
    let mut by_type: HashMap<&str, (u64, u64)> = HashMap::new();
    let mut seen = HashSet::new();

    for healing in &graph.healings {
        if !seen.insert(healing.action_id.as_str()) {
            continue;
        }
        let entry = by_type
            .entry(healing.healing_type.as_str())
            .or_insert((0, healing.seq));
        entry.0 += 1;
        entry.1 = entry.1.min(healing.seq);
    }

    let mut ranked: Vec<(&str, u64, u64)> = by_type
        .into_iter()
        .map(|(healing_type, (count, first_seq))| (healing_type, count, first_seq))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .map(|(healing_type, occurrences, _)| HealingStrategy {
            healing_type: healing_type.to_string(),
            occurrences,
        })
        .collect()
}

/// Every run seen through each locator, newest first.
#[must_use]
pub fn locator_history(graph: &ElementSubgraph) -> Vec<LocatorHistoryEntry> {
    let mut entries: Vec<(u64, LocatorHistoryEntry)> = graph
        .locators
        .iter()
        .flat_map(|l| {
            l.runs.iter().map(|r| {
                (
                    r.seq,
                    LocatorHistoryEntry {
                        locator: l.value.clone(),
                        result: r.result,
                        timestamp: r.timestamp,
                    },
                )
            })
        })
        .collect();

    entries.sort_by(|(seq_a, a), (seq_b, b)| {
        b.timestamp.cmp(&a.timestamp).then_with(|| seq_b.cmp(seq_a))
    });
    entries.into_iter().map(|(_, entry)| entry).collect()
}

/// Healing actions that generated a patch, newest first.
#[must_use]
pub fn healing_history(graph: &ElementSubgraph) -> Vec<HealingHistoryEntry> {
    let mut entries: Vec<(u64, HealingHistoryEntry)> = graph
        .healings
        .iter()
        .filter_map(|h| {
            h.patch_id.as_ref().map(|patch_id| {
                (
                    h.seq,
                    HealingHistoryEntry {
                        healing_type: h.healing_type.clone(),
                        patch_id: patch_id.clone(),
                        healed_at: h.timestamp,
                    },
                )
            })
        })
        .collect();

    entries.sort_by(|(seq_a, a), (seq_b, b)| {
        b.healed_at.cmp(&a.healed_at).then_with(|| seq_b.cmp(seq_a))
    });
    entries.into_iter().map(|(_, entry)| entry).collect()
}

/// Summary counts. A run reachable through two locators is counted once.
#[must_use]
pub fn element_analytics(graph: &ElementSubgraph) -> ElementAnalytics {
    let mut runs = HashSet::new();
    let mut failures = HashSet::new();

    for run in graph.locators.iter().flat_map(|l| &l.runs) {
        runs.insert(run.run_id.as_str());
        if run.result.is_fail() {
            failures.insert(run.run_id.as_str());
        }
    }

    ElementAnalytics {
        element_id: graph.element_id.clone(),
        locator_count: graph.locators.len() as u64,
        total_runs: runs.len() as u64,
        failures: failures.len() as u64,
    }
}
