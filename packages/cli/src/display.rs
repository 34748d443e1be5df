//! Terminal rendering for summaries and history.

use common::api::{DistributionEntry, HistoryEntry, RecordResponse, StatsResponse};
use common::equipment::{FLOW_UNIT, PRESSURE_UNIT, TEMPERATURE_UNIT};
use common::format::{flow_display, pressure_display, round_tenths};
use console::style;

const BAR_WIDTH: usize = 30;

/// KPI lines: count, flow (truncated), pressure and temperature (one decimal).
pub fn kpi_lines(stats: &StatsResponse) -> Vec<String> {
    let na = || "n/a".to_string();
    vec![
        format!("Total Units:      {}", stats.total_count),
        format!(
            "Avg Flowrate:     {}",
            stats
                .avg_flow
                .map(|v| format!("{} {FLOW_UNIT}", flow_display(v)))
                .unwrap_or_else(na)
        ),
        format!(
            "Avg Pressure:     {}",
            stats
                .avg_pressure
                .map(|v| format!("{} {PRESSURE_UNIT}", pressure_display(v)))
                .unwrap_or_else(na)
        ),
        format!(
            "Avg Temperature:  {}",
            stats
                .avg_temp
                .map(|v| format!("{:.1} {TEMPERATURE_UNIT}", round_tenths(v)))
                .unwrap_or_else(na)
        ),
    ]
}

/// Horizontal bar chart of the type distribution, scaled to the largest count.
pub fn distribution_lines(distribution: &[DistributionEntry]) -> Vec<String> {
    let max = distribution.iter().map(|e| e.count).max().unwrap_or(0);
    let label_width = distribution
        .iter()
        .map(|e| e.equipment_type.chars().count())
        .max()
        .unwrap_or(0);

    distribution
        .iter()
        .map(|entry| {
            let len = if max == 0 {
                0
            } else {
                ((entry.count as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
            };
            format!(
                "{:<label_width$}  {} {}",
                entry.equipment_type,
                "█".repeat(len.max(1)),
                entry.count
            )
        })
        .collect()
}

/// Fixed-width table of records, header first.
pub fn record_lines(records: &[RecordResponse]) -> Vec<String> {
    let name_width = records
        .iter()
        .map(|r| r.equipment_name.chars().count())
        .chain(["Equipment Name".len()])
        .max()
        .unwrap_or(0);
    let type_width = records
        .iter()
        .map(|r| r.equipment_type.chars().count())
        .chain(["Type".len()])
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!(
        "{:<name_width$}  {:<type_width$}  {:>8}  {:>8}  {:>11}",
        "Equipment Name", "Type", "Flowrate", "Pressure", "Temperature"
    )];
    lines.extend(records.iter().map(|r| {
        format!(
            "{:<name_width$}  {:<type_width$}  {:>8}  {:>8}  {:>11}",
            r.equipment_name, r.equipment_type, r.flowrate, r.pressure, r.temperature
        )
    }));
    lines
}

pub fn history_line(index: usize, entry: &HistoryEntry) -> String {
    format!(
        "{:>2}. {}  {}  {}",
        index + 1,
        style(format!("#{}", entry.id)).dim(),
        entry.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
        entry.file_name
    )
}
