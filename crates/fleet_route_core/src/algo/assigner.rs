use crate::{
    Vehicle, VehicleId,
    algo::{
        packing::{BinLoad, CapacityPacker, SpreadLoad},
        route_builder::Route,
    },
    problem::{Problem, ProblemKind},
};

#[derive(Clone, Debug, PartialEq)]
pub struct VehicleRoutes {
    pub vehicle: Vehicle,
    pub routes: Vec<Route>,
    pub load_kg: f64,
}

impl VehicleRoutes {
    pub fn utilization_percent(&self) -> f64 {
        self.vehicle.utilization_percent(self.load_kg)
    }

    pub fn is_used(&self) -> bool {
        !self.routes.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignment {
    /// One entry per input vehicle, in input order.
    pub vehicles: Vec<VehicleRoutes>,
    pub unassigned: Vec<Route>,
    pub problems: Vec<Problem>,
}

impl Assignment {
    pub fn routes_for(&self, vehicle_id: &VehicleId) -> &[Route] {
        self.vehicles
            .iter()
            .find(|v| &v.vehicle.id == vehicle_id)
            .map(|v| v.routes.as_slice())
            .unwrap_or_default()
    }

    pub fn assigned_routes(&self) -> impl Iterator<Item = (&Vehicle, &Route)> {
        self.vehicles
            .iter()
            .flat_map(|v| v.routes.iter().map(move |r| (&v.vehicle, r)))
    }

    pub fn success(&self) -> bool {
        self.unassigned.is_empty()
    }
}

/// Places routes on vehicles with the spread-load policy.
pub fn assign_routes(routes: Vec<Route>, vehicles: &[Vehicle]) -> Assignment {
    assign_routes_with(routes, vehicles, &SpreadLoad)
}

/// Places each route, in order, on the vehicle chosen by `packer`. A route that fits
/// nowhere is recorded as a problem and left unassigned; it is never split.
pub fn assign_routes_with<P>(routes: Vec<Route>, vehicles: &[Vehicle], packer: &P) -> Assignment
where
    P: CapacityPacker + ?Sized,
{
    let mut bins: Vec<BinLoad> = vehicles.iter().map(|v| BinLoad::empty(v.capacity_kg)).collect();
    let mut assignment = Assignment {
        vehicles: vehicles
            .iter()
            .map(|v| VehicleRoutes {
                vehicle: v.clone(),
                routes: Vec::new(),
                load_kg: 0.0,
            })
            .collect(),
        ..Assignment::default()
    };

    for mut route in routes {
        match packer.place(&mut bins, route.total_weight_kg) {
            Some(idx) => {
                let slot = &mut assignment.vehicles[idx];
                route.utilization_percent =
                    Some(slot.vehicle.utilization_percent(route.total_weight_kg));
                slot.load_kg = bins[idx].load_kg;
                log::debug!(
                    "assign: route={} vehicle={} weight_kg={:.2} load_kg={:.2}",
                    route.route_id,
                    slot.vehicle.id,
                    route.total_weight_kg,
                    slot.load_kg
                );
                slot.routes.push(route);
            }
            None => {
                let problem = Problem::of_kind(
                    ProblemKind::NoVehicleAvailable,
                    format!(
                        "route {} ({:.2} kg, {} deliveries) fits no vehicle",
                        route.route_id,
                        route.total_weight_kg,
                        route.stops()
                    ),
                )
                .with_route_id(route.route_id);
                log::warn!(
                    "assign: unassigned route={} weight_kg={:.2}",
                    route.route_id,
                    route.total_weight_kg
                );
                assignment.problems.push(problem);
                assignment.unassigned.push(route);
            }
        }
    }

    log::info!(
        "assign: done packer={} vehicles={} unassigned={}",
        packer.name(),
        vehicles.len(),
        assignment.unassigned.len()
    );
    assignment
}
