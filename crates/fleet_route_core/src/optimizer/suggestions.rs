use std::fmt;

use crate::optimizer::planner::OptimizationResult;

const LOW_UTILIZATION_PCT: f64 = 50.0;
const ROUTES_PER_VEHICLE_LIMIT: usize = 2;
const HIGH_AVERAGE_DISTANCE_KM: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImprovementKind {
    AddCapacity,
    ConsolidateLoads,
    WidenClusterRadius,
    ShortenRoutes,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Improvement {
    pub priority: Priority,
    pub kind: ImprovementKind,
    pub message: String,
}

impl fmt::Display for Improvement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.priority, self.message)
    }
}

/// Threshold rules over the plan statistics, highest priority first.
pub fn suggestions(result: &OptimizationResult) -> Vec<Improvement> {
    let stats = &result.statistics;
    let mut out = Vec::new();

    if stats.unassigned_deliveries > 0 {
        out.push(Improvement {
            priority: Priority::High,
            kind: ImprovementKind::AddCapacity,
            message: format!(
                "{} deliveries in {} routes have no vehicle; add capacity or split the batch",
                stats.unassigned_deliveries, stats.unassigned_routes
            ),
        });
    }
    if stats.vehicles_used > 0 && stats.average_utilization_percent < LOW_UTILIZATION_PCT {
        out.push(Improvement {
            priority: Priority::Medium,
            kind: ImprovementKind::ConsolidateLoads,
            message: format!(
                "vehicles in use average {:.1}% utilization; consolidate onto fewer vehicles",
                stats.average_utilization_percent
            ),
        });
    }
    if stats.routes > ROUTES_PER_VEHICLE_LIMIT * stats.vehicles {
        out.push(Improvement {
            priority: Priority::Medium,
            kind: ImprovementKind::WidenClusterRadius,
            message: format!(
                "{} routes for {} vehicles; widen the cluster radius to merge nearby stops",
                stats.routes, stats.vehicles
            ),
        });
    }
    if stats.average_distance_km > HIGH_AVERAGE_DISTANCE_KM {
        out.push(Improvement {
            priority: Priority::Low,
            kind: ImprovementKind::ShortenRoutes,
            message: format!(
                "routes average {:.1} km; plan with fixed zones or a narrower radius",
                stats.average_distance_km
            ),
        });
    }

    out.sort_by(|a, b| b.priority.cmp(&a.priority));
    out
}
