use crate::{
    Delivery, EngineOptions,
    algo::density::Clustering,
    geo::{GeoPoint, geometry::PathGeometry},
    model::total_weight,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteTiming {
    pub base_speed_kmh: f64,
    pub minutes_per_stop: f64,
    pub isolated_route_minutes: f64,
}

impl Default for RouteTiming {
    fn default() -> Self {
        Self {
            base_speed_kmh: 40.0,
            minutes_per_stop: 10.0,
            isolated_route_minutes: 30.0,
        }
    }
}

impl From<&EngineOptions> for RouteTiming {
    fn from(options: &EngineOptions) -> Self {
        Self {
            base_speed_kmh: options.base_speed_kmh,
            minutes_per_stop: options.minutes_per_stop,
            isolated_route_minutes: options.isolated_route_minutes,
        }
    }
}

/// An ordered visiting sequence. `cluster_id` is `None` for isolated singletons.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub route_id: usize,
    pub cluster_id: Option<usize>,
    pub deliveries: Vec<Delivery>,
    pub total_distance_km: f64,
    pub total_weight_kg: f64,
    pub estimated_minutes: f64,
    /// Set once the route is placed on a vehicle.
    pub utilization_percent: Option<f64>,
}

impl Route {
    pub fn stops(&self) -> usize {
        self.deliveries.len()
    }

    pub fn is_isolated(&self) -> bool {
        self.cluster_id.is_none()
    }
}

/// Greedy nearest-neighbor order starting at the first delivery. Open path, no return leg.
pub fn nearest_neighbor_order(deliveries: Vec<Delivery>) -> Vec<Delivery> {
    let n = deliveries.len();
    if n <= 1 {
        return deliveries;
    }

    let mut remaining: Vec<Option<Delivery>> = deliveries.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(n);
    let mut current_idx = 0;

    while let Some(current) = remaining[current_idx].take() {
        let here = current.point;
        ordered.push(current);

        let mut best: Option<(usize, f64)> = None;
        for (idx, candidate) in remaining.iter().enumerate() {
            let Some(candidate) = candidate else {
                continue;
            };
            let d = here.distance_km(&candidate.point);
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((idx, d));
            }
        }
        match best {
            Some((idx, _)) => current_idx = idx,
            None => break,
        }
    }

    ordered
}

pub fn driving_estimate_minutes(distance_km: f64, stops: usize, timing: &RouteTiming) -> f64 {
    distance_km / timing.base_speed_kmh * 60.0 + timing.minutes_per_stop * stops as f64
}

/// Orders one group and computes distance, weight and a speed-based time estimate.
pub fn build_route(
    route_id: usize,
    cluster_id: Option<usize>,
    deliveries: Vec<Delivery>,
    timing: &RouteTiming,
) -> Route {
    let deliveries = nearest_neighbor_order(deliveries);
    let points: Vec<GeoPoint> = deliveries.iter().map(|d| d.point).collect();
    let total_distance_km = PathGeometry::open_path_km(&points);
    let total_weight_kg = total_weight(&deliveries);
    let estimated_minutes = driving_estimate_minutes(total_distance_km, deliveries.len(), timing);

    Route {
        route_id,
        cluster_id,
        deliveries,
        total_distance_km,
        total_weight_kg,
        estimated_minutes,
        utilization_percent: None,
    }
}

pub fn build_isolated_route(route_id: usize, delivery: Delivery, timing: &RouteTiming) -> Route {
    Route {
        route_id,
        cluster_id: None,
        total_distance_km: 0.0,
        total_weight_kg: delivery.weight_kg,
        estimated_minutes: timing.isolated_route_minutes,
        deliveries: vec![delivery],
        utilization_percent: None,
    }
}

/// One route per cluster, then one singleton route per isolated delivery. Route ids are
/// assigned sequentially in that order.
pub fn build_routes(clustering: Clustering, timing: &RouteTiming) -> Vec<Route> {
    let mut routes = Vec::with_capacity(clustering.clusters.len() + clustering.isolated.len());

    for cluster in clustering.clusters {
        let cluster_id = cluster.id;
        let route = build_route(routes.len(), Some(cluster_id), cluster.into_deliveries(), timing);
        log::debug!(
            "routes: cluster={cluster_id} stops={} distance_km={:.3} minutes={:.1}",
            route.stops(),
            route.total_distance_km,
            route.estimated_minutes
        );
        routes.push(route);
    }
    for (_, delivery) in clustering.isolated {
        routes.push(build_isolated_route(routes.len(), delivery, timing));
    }

    log::info!("routes: built routes={}", routes.len());
    routes
}
