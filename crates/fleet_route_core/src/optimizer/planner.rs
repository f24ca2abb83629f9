use fleet_route_derive::New;

use crate::{
    Delivery, DriverId, EngineOptions, Result, Vehicle, Weekday,
    algo::{
        assigner::{Assignment, assign_routes},
        density::clusterize,
        rebalance::{RebalanceResult, RebalanceTuning, rebalance},
        route_builder::{Route, RouteTiming, build_route, build_routes},
        zoning::{ZoneTuning, zone_seeded},
    },
    optimizer::statistics::OptimizationStatistics,
    predict::{
        history::HistorySource,
        predictor::{PredictionRequest, PredictorTuning, predict_duration},
    },
    problem::Problem,
};

#[derive(Clone, Copy, Debug, PartialEq, New)]
pub struct Departure {
    pub hour: u32,
    pub day: Weekday,
}

impl From<&EngineOptions> for Departure {
    fn from(options: &EngineOptions) -> Self {
        Self::new(options.departure_hour, options.departure_day)
    }
}

/// One planning batch. `drivers[i]` drives `vehicles[i]` when present.
#[derive(Clone, Debug, PartialEq, New)]
pub struct OptimizationRequest {
    pub deliveries: Vec<Delivery>,
    pub vehicles: Vec<Vehicle>,
    pub drivers: Vec<DriverId>,
    pub departure: Departure,
    /// Falls back to the configured radius.
    pub cluster_radius_km: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptimizationResult {
    pub assignment: Assignment,
    /// Independent best-fit packing of the same deliveries, reported alongside.
    pub rebalance: RebalanceResult,
    pub statistics: OptimizationStatistics,
    /// No route was left without a vehicle.
    pub success: bool,
}

impl OptimizationResult {
    /// Assignment problems followed by the rebalancer's findings.
    pub fn problems(&self) -> impl Iterator<Item = &Problem> {
        self.assignment
            .problems
            .iter()
            .chain(&self.rebalance.problems)
    }
}

/// Clusters the batch, builds one route per cluster plus singleton routes, assigns them
/// to vehicles and runs the rebalancer over the same raw inputs.
pub fn build_routes_and_assign<H>(
    request: &OptimizationRequest,
    options: &EngineOptions,
    history: &H,
) -> Result<OptimizationResult>
where
    H: HistorySource + ?Sized,
{
    if request.deliveries.is_empty() || request.vehicles.is_empty() {
        log::info!(
            "optimize: nothing to plan deliveries={} vehicles={}",
            request.deliveries.len(),
            request.vehicles.len()
        );
        return Ok(OptimizationResult {
            statistics: OptimizationStatistics {
                deliveries: request.deliveries.len(),
                vehicles: request.vehicles.len(),
                balance_score: 100.0,
                ..OptimizationStatistics::default()
            },
            rebalance: RebalanceResult {
                success: true,
                ..RebalanceResult::default()
            },
            success: true,
            ..OptimizationResult::default()
        });
    }

    let radius_km = request
        .cluster_radius_km
        .unwrap_or(options.cluster_radius_km);
    let clustering = clusterize(&request.deliveries, radius_km, options.min_neighbors)?;
    let clustering_stats = clustering.stats.clone();

    let routes = build_routes(clustering, &RouteTiming::from(options));
    let mut assignment = assign_routes(routes, &request.vehicles);
    apply_driver_estimates(&mut assignment, request, options, history);

    let rebalance = rebalance(
        &request.deliveries,
        &request.vehicles,
        &RebalanceTuning::from(options),
    )?;
    let statistics = OptimizationStatistics::collect(
        &clustering_stats,
        &assignment,
        rebalance.statistics.balance_score,
    );
    let success = assignment.success();

    log::info!("optimize: done success={success}{statistics}");

    Ok(OptimizationResult {
        assignment,
        rebalance,
        statistics,
        success,
    })
}

/// Replaces speed-only estimates with predictions for vehicles whose driver has history.
fn apply_driver_estimates<H>(
    assignment: &mut Assignment,
    request: &OptimizationRequest,
    options: &EngineOptions,
    history: &H,
) where
    H: HistorySource + ?Sized,
{
    let tuning = PredictorTuning::from(options);
    let departure = request.departure;

    for (slot, driver) in assignment.vehicles.iter_mut().zip(&request.drivers) {
        if history.driver_stats(driver).is_none() {
            continue;
        }
        for route in &mut slot.routes {
            let prediction_request = PredictionRequest::new(
                route.total_distance_km,
                route.stops(),
                departure.hour,
                departure.day,
            )
            .with_driver_id(driver.clone());
            let prediction = predict_duration(&prediction_request, history, &tuning);
            log::debug!(
                "optimize: route={} driver={driver} minutes={:.1}->{:.1} confidence={:.0}",
                route.route_id,
                route.estimated_minutes,
                prediction.minutes,
                prediction.confidence
            );
            route.estimated_minutes = prediction.minutes;
        }
    }
}

/// Fixed-territory planning: one route per non-empty K-zone.
pub fn zone_routes(
    deliveries: &[Delivery],
    k: usize,
    options: &EngineOptions,
) -> Result<Vec<Route>> {
    let zoning = zone_seeded(deliveries, k, ZoneTuning::from(options), options.zone_seed)?;
    let timing = RouteTiming::from(options);

    let mut routes = Vec::with_capacity(zoning.zones.len());
    for zone in zoning.zones.into_iter().filter(|z| !z.is_empty()) {
        let members = zone.members.into_iter().map(|(_, d)| d).collect();
        routes.push(build_route(routes.len(), Some(zone.id), members, &timing));
    }
    log::info!(
        "optimize: zone routes={} iterations={}",
        routes.len(),
        zoning.stats.iterations
    );
    Ok(routes)
}
