use fleet_route_derive::KvDisplay;

use crate::algo::{assigner::Assignment, density::ClusteringStats, route_builder::Route};

#[derive(Clone, Debug, Default, PartialEq, KvDisplay)]
pub struct OptimizationStatistics {
    pub deliveries: usize,
    pub clusters: usize,
    pub clustered: usize,
    pub isolated: usize,
    pub routes: usize,
    pub assigned_routes: usize,
    pub unassigned_routes: usize,
    pub assigned_deliveries: usize,
    pub unassigned_deliveries: usize,
    pub vehicles: usize,
    pub vehicles_used: usize,
    #[kv(fmt = "fixed")]
    pub total_distance_km: f64,
    #[kv(fmt = "fixed")]
    pub average_distance_km: f64,
    #[kv(fmt = "fixed")]
    pub total_minutes: f64,
    #[kv(fmt = "fixed")]
    pub total_weight_kg: f64,
    /// Mean over vehicles carrying at least one route.
    #[kv(fmt = "fixed")]
    pub average_utilization_percent: f64,
    #[kv(fmt = "fixed")]
    pub balance_score: f64,
}

impl OptimizationStatistics {
    pub(crate) fn collect(
        clustering: &ClusteringStats,
        assignment: &Assignment,
        balance_score: f64,
    ) -> Self {
        let assigned: Vec<&Route> = assignment.assigned_routes().map(|(_, r)| r).collect();
        let all = || assigned.iter().copied().chain(&assignment.unassigned);

        let routes = assigned.len() + assignment.unassigned.len();
        let total_distance_km: f64 = all().map(|r| r.total_distance_km).sum();
        let used: Vec<f64> = assignment
            .vehicles
            .iter()
            .filter(|v| v.is_used())
            .map(|v| v.utilization_percent())
            .collect();

        Self {
            deliveries: clustering.deliveries,
            clusters: clustering.clusters,
            clustered: clustering.clustered,
            isolated: clustering.isolated,
            routes,
            assigned_routes: assigned.len(),
            unassigned_routes: assignment.unassigned.len(),
            assigned_deliveries: assigned.iter().map(|r| r.stops()).sum(),
            unassigned_deliveries: assignment.unassigned.iter().map(Route::stops).sum(),
            vehicles: assignment.vehicles.len(),
            vehicles_used: used.len(),
            total_distance_km,
            average_distance_km: mean(total_distance_km, routes),
            total_minutes: all().map(|r| r.estimated_minutes).sum(),
            total_weight_kg: all().map(|r| r.total_weight_kg).sum(),
            average_utilization_percent: mean(used.iter().sum(), used.len()),
            balance_score,
        }
    }
}

fn mean(total: f64, n: usize) -> f64 {
    if n == 0 { 0.0 } else { total / n as f64 }
}
