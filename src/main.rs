use std::time::Instant;

use log::{info, warn};

use fleet_route_core::{
    Departure, EngineOptions, OptimizationRequest, Result, Route, build_routes_and_assign,
    logging, read_deliveries, read_history, suggestions, zone_routes,
};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = EngineOptions::from_args()?;
    logging::init_logger(&options)?;
    let deliveries = read_deliveries(&options)?;

    info!("options: {options}");
    info!(
        "input: deliveries={} vehicles={}",
        deliveries.len(),
        options.fleet.len()
    );

    if options.zones > 0 {
        let routes = zone_routes(&deliveries, options.zones, &options)?;
        for route in &routes {
            println!("{}", route_line(route, "-"));
        }
        info!(
            "output: zone routes={} time={:.2}s",
            routes.len(),
            now.elapsed().as_secs_f32()
        );
        return Ok(());
    }

    let request = OptimizationRequest::new(
        deliveries,
        options.fleet.clone(),
        options.drivers.clone(),
        Departure::from(&options),
    );
    let history = read_history(&options)?;
    if !history.is_empty() {
        info!("input: history loaded from {}", options.history);
    }
    let result = build_routes_and_assign(&request, &options, &history)?;

    for (vehicle, route) in result.assignment.assigned_routes() {
        println!("{}", route_line(route, vehicle.id.as_str()));
    }
    for route in &result.assignment.unassigned {
        println!("{}", route_line(route, "-"));
    }

    for problem in result.problems() {
        warn!("problem: {problem}");
    }
    for improvement in suggestions(&result) {
        info!("suggestion: {improvement}");
    }
    info!(
        "output: success={} routes={} time={:.2}s",
        result.success,
        result.statistics.routes,
        now.elapsed().as_secs_f32()
    );

    Ok(())
}

fn route_line(route: &Route, vehicle: &str) -> String {
    let ids: Vec<&str> = route.deliveries.iter().map(|d| d.id.as_str()).collect();
    format!(
        "route={} vehicle={vehicle} stops={} weight_kg={:.2} distance_km={:.3} minutes={:.1} deliveries={}",
        route.route_id,
        route.stops(),
        route.total_weight_kg,
        route.total_distance_km,
        route.estimated_minutes,
        ids.join(",")
    )
}
