//! Delivery route planning on geographic coordinates.
//! Groups deliveries by density or fixed zones, orders each group with a nearest-neighbor
//! pass, places routes on a capacity-limited fleet and predicts route durations.

mod algo;
mod error;
mod geo;
mod io;
pub mod logging;
mod model;
mod optimizer;
mod predict;
mod problem;

pub(crate) use io::options;

pub use algo::assigner::{Assignment, VehicleRoutes, assign_routes, assign_routes_with};
pub use algo::density::{Cluster, Clustering, ClusteringStats, clusterize};
pub use algo::packing::{BinLoad, CapacityPacker, SpreadLoad, TightFit};
pub use algo::rebalance::{
    BalanceStats, MoveSuggestion, RebalanceResult, RebalanceTuning, Suggestion,
    VehicleLoadout, apply_rebalance, balance_score, detect_problems, pack_best_fit_decreasing,
    rebalance, suggest_moves,
};
pub use algo::route_builder::{
    Route, RouteTiming, build_isolated_route, build_route, build_routes,
    driving_estimate_minutes, nearest_neighbor_order,
};
pub use algo::zoning::{Zone, ZoneTuning, Zoning, ZoningStats, zone, zone_seeded};
pub use error::{Error, Result};
pub use geo::GeoPoint;
pub use io::input::{parse_deliveries, parse_history, read_deliveries, read_history};
pub use io::options::{EngineOptions, LogFormat, LogLevel};
pub use model::{Delivery, DeliveryId, DriverId, Vehicle, VehicleId, Weekday, ZoneId};
pub use optimizer::planner::{
    Departure, OptimizationRequest, OptimizationResult, build_routes_and_assign, zone_routes,
};
pub use optimizer::statistics::OptimizationStatistics;
pub use optimizer::suggestions::{Improvement, ImprovementKind, Priority, suggestions};
pub use predict::history::{HistorySnapshot, HistorySource, NoHistory, PerformanceStats};
pub use predict::predictor::{
    FactorBreakdown, Prediction, PredictionRequest, PredictorTuning, predict_duration,
};
pub use problem::{Problem, ProblemKind, Severity};
