use crate::models::StatsSnapshot;
use serde::{Deserialize, Serialize};

pub const CHART_LABELS: [&str; 3] = ["Delivered %", "Failed %", "Opt-outs"];
pub const CHART_COLORS: [&str; 3] = ["#22c55e", "#ef4444", "#f59e0b"];

/// Stat fields as shown on the dashboard, including the derived opt-out rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsView {
    pub total_users: u64,
    pub opt_outs: u64,
    pub sent: u64,
    pub failed: u64,
    pub delivery_pct: f64,
    pub failed_pct: f64,
    pub opt_out_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub data: Vec<f64>,
    pub colors: Vec<String>,
}

/// Input of the pie chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// `opt_outs / total_users * 100`, or 0 when there are no users.
pub fn opt_out_pct(opt_outs: u64, total_users: u64) -> f64 {
    if total_users == 0 {
        return 0.0;
    }
    let pct = opt_outs as f64 / total_users as f64 * 100.0;
    if pct.is_finite() { pct } else { 0.0 }
}

pub fn build_view(snapshot: &StatsSnapshot) -> StatsView {
    StatsView {
        total_users: snapshot.total_users,
        opt_outs: snapshot.opt_outs,
        sent: snapshot.sent,
        failed: snapshot.failed,
        delivery_pct: finite_or_zero(snapshot.delivery_pct),
        failed_pct: finite_or_zero(snapshot.failed_pct),
        opt_out_pct: opt_out_pct(snapshot.opt_outs, snapshot.total_users),
    }
}

pub fn build_chart(view: &StatsView) -> ChartData {
    ChartData {
        labels: CHART_LABELS.iter().map(|label| label.to_string()).collect(),
        datasets: vec![ChartDataset {
            data: vec![view.delivery_pct, view.failed_pct, view.opt_out_pct],
            colors: CHART_COLORS.iter().map(|color| color.to_string()).collect(),
        }],
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opt_out_pct_without_users_is_zero() {
        let pct = opt_out_pct(5, 0);
        assert_eq!(pct, 0.0);
        assert!(pct.is_finite());
    }

    #[test]
    fn opt_out_pct_divides_by_total() {
        assert_eq!(opt_out_pct(25, 200), 12.5);
    }

    #[test]
    fn chart_carries_three_slices() {
        let snapshot = StatsSnapshot {
            total_users: 200,
            opt_outs: 25,
            sent: 90,
            failed: 10,
            delivery_pct: 90.0,
            failed_pct: 10.0,
        };
        let chart = build_chart(&build_view(&snapshot));
        assert_eq!(chart.labels, vec!["Delivered %", "Failed %", "Opt-outs"]);
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].data, vec![90.0, 10.0, 12.5]);
        assert_eq!(chart.datasets[0].colors.len(), 3);
    }

    #[test]
    fn non_finite_server_values_are_zeroed() {
        let snapshot = StatsSnapshot {
            delivery_pct: f64::NAN,
            failed_pct: f64::INFINITY,
            ..StatsSnapshot::default()
        };
        let view = build_view(&snapshot);
        assert_eq!(view.delivery_pct, 0.0);
        assert_eq!(view.failed_pct, 0.0);
        assert_eq!(view.opt_out_pct, 0.0);
    }
}
