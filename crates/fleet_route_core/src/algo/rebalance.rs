use fleet_route_derive::KvDisplay;

use crate::{
    Delivery, DeliveryId, EngineOptions, Error, Result, Vehicle, VehicleId,
    algo::packing::{BinLoad, CAPACITY_EPS, CapacityPacker, TightFit},
    problem::{Problem, ProblemKind},
};

const SCORE_PER_STDEV_POINT: f64 = 2.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RebalanceTuning {
    /// Utilization points away from the fleet mean that count as imbalance.
    pub imbalance_threshold_pct: f64,
    pub underutilization_pct: f64,
    /// Kilograms moved off an overloaded vehicle on top of its excess.
    pub overload_margin_kg: f64,
}

impl Default for RebalanceTuning {
    fn default() -> Self {
        Self {
            imbalance_threshold_pct: 20.0,
            underutilization_pct: 50.0,
            overload_margin_kg: 10.0,
        }
    }
}

impl From<&EngineOptions> for RebalanceTuning {
    fn from(options: &EngineOptions) -> Self {
        Self {
            imbalance_threshold_pct: options.imbalance_threshold_pct,
            underutilization_pct: options.underutilization_pct,
            overload_margin_kg: options.overload_margin_kg,
        }
    }
}

/// Deliveries packed onto one vehicle with their running weight.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleLoadout {
    pub vehicle_id: VehicleId,
    pub capacity_kg: f64,
    pub load_kg: f64,
    pub deliveries: Vec<Delivery>,
}

impl VehicleLoadout {
    pub fn empty(vehicle: &Vehicle) -> Self {
        Self {
            vehicle_id: vehicle.id.clone(),
            capacity_kg: vehicle.capacity_kg,
            load_kg: 0.0,
            deliveries: Vec::new(),
        }
    }

    pub fn utilization_percent(&self) -> f64 {
        if self.capacity_kg <= 0.0 {
            return 0.0;
        }
        self.load_kg / self.capacity_kg * 100.0
    }

    pub fn spare_kg(&self) -> f64 {
        self.capacity_kg - self.load_kg
    }

    /// Zero unless [`is_overloaded`](Self::is_overloaded).
    pub fn excess_kg(&self) -> f64 {
        if self.is_overloaded() {
            self.load_kg - self.capacity_kg
        } else {
            0.0
        }
    }

    pub fn is_overloaded(&self) -> bool {
        self.load_kg > self.capacity_kg + CAPACITY_EPS
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoveSuggestion {
    pub from: VehicleId,
    pub to: VehicleId,
    pub delivery_ids: Vec<DeliveryId>,
    pub weight_kg: f64,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Suggestion {
    /// Concrete corrective move for an overloaded vehicle.
    Move(MoveSuggestion),
    /// Informational only; names no target.
    Combine {
        vehicle_id: VehicleId,
        utilization_percent: f64,
        message: String,
    },
}

#[derive(Clone, Debug, Default, PartialEq, KvDisplay)]
pub struct BalanceStats {
    pub vehicles: usize,
    pub deliveries: usize,
    pub packed: usize,
    pub unpacked: usize,
    #[kv(fmt = "fixed")]
    pub total_weight_kg: f64,
    #[kv(fmt = "fixed")]
    pub mean_utilization_percent: f64,
    #[kv(fmt = "fixed")]
    pub utilization_stdev: f64,
    #[kv(fmt = "fixed")]
    pub balance_score: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RebalanceResult {
    pub assignments: Vec<VehicleLoadout>,
    pub problems: Vec<Problem>,
    pub suggestions: Vec<Suggestion>,
    pub statistics: BalanceStats,
    /// No vehicle is overloaded.
    pub success: bool,
}

/// Re-packs raw deliveries with best-fit-decreasing, then diagnoses the packing and
/// proposes corrective moves. Nothing is applied; see [`apply_rebalance`].
pub fn rebalance(
    deliveries: &[Delivery],
    vehicles: &[Vehicle],
    tuning: &RebalanceTuning,
) -> Result<RebalanceResult> {
    if deliveries.is_empty() || vehicles.is_empty() {
        log::debug!(
            "rebalance: nothing to pack deliveries={} vehicles={}",
            deliveries.len(),
            vehicles.len()
        );
        return Ok(RebalanceResult {
            statistics: BalanceStats {
                vehicles: vehicles.len(),
                deliveries: deliveries.len(),
                balance_score: balance_score(0.0),
                ..BalanceStats::default()
            },
            success: true,
            ..RebalanceResult::default()
        });
    }
    if let Some(bad) = vehicles
        .iter()
        .find(|v| !v.capacity_kg.is_finite() || v.capacity_kg <= 0.0)
    {
        return Err(Error::invalid_input(format!(
            "vehicle {} capacity must be finite and > 0, got {}",
            bad.id, bad.capacity_kg
        )));
    }

    let (assignments, unpacked) = pack_best_fit_decreasing(deliveries, vehicles);
    let problems = detect_problems(&assignments, tuning);
    let suggestions = suggest_moves(&assignments, tuning);

    let utilizations: Vec<f64> = assignments
        .iter()
        .map(VehicleLoadout::utilization_percent)
        .collect();
    let (mean, stdev) = mean_and_stdev(&utilizations);
    let statistics = BalanceStats {
        vehicles: vehicles.len(),
        deliveries: deliveries.len(),
        packed: deliveries.len() - unpacked.len(),
        unpacked: unpacked.len(),
        total_weight_kg: assignments.iter().map(|a| a.load_kg).sum(),
        mean_utilization_percent: mean,
        utilization_stdev: stdev,
        balance_score: balance_score(stdev),
    };
    let success = !problems.iter().any(|p| p.kind == ProblemKind::Overload);

    log::info!(
        "rebalance: done problems={} suggestions={} success={success}{statistics}",
        problems.len(),
        suggestions.len()
    );

    Ok(RebalanceResult {
        assignments,
        problems,
        suggestions,
        statistics,
        success,
    })
}

/// Heaviest first onto the vehicle left with the least spare capacity. Deliveries that
/// fit nowhere are returned separately.
pub fn pack_best_fit_decreasing(
    deliveries: &[Delivery],
    vehicles: &[Vehicle],
) -> (Vec<VehicleLoadout>, Vec<Delivery>) {
    let mut order: Vec<&Delivery> = deliveries.iter().collect();
    order.sort_by(|a, b| b.weight_kg.total_cmp(&a.weight_kg));

    let mut bins: Vec<BinLoad> = vehicles.iter().map(|v| BinLoad::empty(v.capacity_kg)).collect();
    let mut loadouts: Vec<VehicleLoadout> = vehicles.iter().map(VehicleLoadout::empty).collect();
    let mut unpacked = Vec::new();

    for delivery in order {
        match TightFit.place(&mut bins, delivery.weight_kg) {
            Some(idx) => {
                loadouts[idx].load_kg = bins[idx].load_kg;
                loadouts[idx].deliveries.push(delivery.clone());
            }
            None => {
                log::debug!(
                    "rebalance: delivery={} weight_kg={:.2} fits no vehicle",
                    delivery.id,
                    delivery.weight_kg
                );
                unpacked.push(delivery.clone());
            }
        }
    }

    (loadouts, unpacked)
}

/// Overload, imbalance against the fleet mean and under-utilization, per vehicle in order.
pub fn detect_problems(loadouts: &[VehicleLoadout], tuning: &RebalanceTuning) -> Vec<Problem> {
    let utilizations: Vec<f64> = loadouts
        .iter()
        .map(VehicleLoadout::utilization_percent)
        .collect();
    let (mean, _) = mean_and_stdev(&utilizations);
    let mut problems = Vec::new();

    for (loadout, &utilization) in loadouts.iter().zip(&utilizations) {
        let id = &loadout.vehicle_id;
        if loadout.is_overloaded() {
            let excess = loadout.excess_kg();
            problems.push(
                Problem::of_kind(
                    ProblemKind::Overload,
                    format!("vehicle {id} exceeds capacity by {excess:.2} kg"),
                )
                .with_vehicle_id(id.clone())
                .with_excess_kg(excess)
                .with_utilization_percent(utilization),
            );
        }
        let deviation = (utilization - mean).abs();
        if deviation > tuning.imbalance_threshold_pct {
            problems.push(
                Problem::of_kind(
                    ProblemKind::Imbalance,
                    format!(
                        "vehicle {id} at {utilization:.1}% is {deviation:.1} points off \
                         the fleet mean {mean:.1}%"
                    ),
                )
                .with_vehicle_id(id.clone())
                .with_utilization_percent(utilization),
            );
        }
        if utilization < tuning.underutilization_pct {
            let spare = loadout.spare_kg();
            problems.push(
                Problem::of_kind(
                    ProblemKind::Underutilization,
                    format!("vehicle {id} at {utilization:.1}% has {spare:.2} kg spare"),
                )
                .with_vehicle_id(id.clone())
                .with_spare_kg(spare)
                .with_utilization_percent(utilization),
            );
        }
    }

    problems
}

/// Moves for every overloaded vehicle, then a combine hint for every under-used one.
///
/// Moves take the lightest deliveries until they cover the excess plus the margin and
/// target the first other vehicle whose spare capacity holds them. Earlier moves count
/// against later targets.
pub fn suggest_moves(loadouts: &[VehicleLoadout], tuning: &RebalanceTuning) -> Vec<Suggestion> {
    let mut projected: Vec<f64> = loadouts.iter().map(|l| l.load_kg).collect();
    let mut suggestions = Vec::new();

    for (src, loadout) in loadouts.iter().enumerate() {
        if !loadout.is_overloaded() {
            continue;
        }
        let target_kg = loadout.excess_kg() + tuning.overload_margin_kg;

        let mut lightest: Vec<&Delivery> = loadout.deliveries.iter().collect();
        lightest.sort_by(|a, b| a.weight_kg.total_cmp(&b.weight_kg));
        let mut moved = Vec::new();
        let mut moved_kg = 0.0;
        for delivery in lightest {
            if moved_kg >= target_kg {
                break;
            }
            moved_kg += delivery.weight_kg;
            moved.push(delivery.id.clone());
        }
        if moved.is_empty() {
            continue;
        }

        let dst = loadouts
            .iter()
            .enumerate()
            .find(|&(idx, other)| {
                idx != src && other.capacity_kg + CAPACITY_EPS - projected[idx] >= moved_kg
            });
        let Some((dst, target)) = dst else {
            log::warn!(
                "rebalance: no vehicle can take {moved_kg:.2} kg from overloaded vehicle={}",
                loadout.vehicle_id
            );
            continue;
        };

        projected[src] -= moved_kg;
        projected[dst] += moved_kg;
        suggestions.push(Suggestion::Move(MoveSuggestion {
            from: loadout.vehicle_id.clone(),
            to: target.vehicle_id.clone(),
            delivery_ids: moved,
            weight_kg: moved_kg,
            reason: format!(
                "vehicle {} is overloaded by {:.2} kg",
                loadout.vehicle_id,
                loadout.excess_kg()
            ),
        }));
    }

    for loadout in loadouts {
        let utilization = loadout.utilization_percent();
        if utilization < tuning.underutilization_pct {
            suggestions.push(Suggestion::Combine {
                vehicle_id: loadout.vehicle_id.clone(),
                utilization_percent: utilization,
                message: format!(
                    "vehicle {} runs at {utilization:.1}%; consider combining its load \
                     with another vehicle",
                    loadout.vehicle_id
                ),
            });
        }
    }

    suggestions
}

/// `clamp(100 - stdev * 2.5, 0, 100)` over the utilization standard deviation.
pub fn balance_score(utilization_stdev: f64) -> f64 {
    (100.0 - utilization_stdev * SCORE_PER_STDEV_POINT).clamp(0.0, 100.0)
}

/// Applies move suggestions to a copy of `current`.
///
/// Capacities are refreshed from `vehicles` and vehicles missing from `current` get an
/// empty loadout. Unknown vehicle or delivery ids are skipped.
pub fn apply_rebalance(
    current: &[VehicleLoadout],
    suggestions: &[Suggestion],
    vehicles: &[Vehicle],
) -> Vec<VehicleLoadout> {
    let mut loadouts = current.to_vec();
    for vehicle in vehicles {
        match loadouts.iter_mut().find(|l| l.vehicle_id == vehicle.id) {
            Some(loadout) => loadout.capacity_kg = vehicle.capacity_kg,
            None => loadouts.push(VehicleLoadout::empty(vehicle)),
        }
    }

    for suggestion in suggestions {
        let Suggestion::Move(mv) = suggestion else {
            continue;
        };
        let src = loadouts.iter().position(|l| l.vehicle_id == mv.from);
        let dst = loadouts.iter().position(|l| l.vehicle_id == mv.to);
        let (Some(src), Some(dst)) = (src, dst) else {
            log::warn!(
                "rebalance: skipping move from={} to={}: unknown vehicle",
                mv.from,
                mv.to
            );
            continue;
        };

        for delivery_id in &mv.delivery_ids {
            let Some(pos) = loadouts[src]
                .deliveries
                .iter()
                .position(|d| &d.id == delivery_id)
            else {
                log::warn!(
                    "rebalance: delivery={delivery_id} not on vehicle={}, skipped",
                    mv.from
                );
                continue;
            };
            let delivery = loadouts[src].deliveries.remove(pos);
            loadouts[src].load_kg -= delivery.weight_kg;
            loadouts[dst].load_kg += delivery.weight_kg;
            loadouts[dst].deliveries.push(delivery);
        }
    }

    loadouts
}

/// Population mean and standard deviation; zeros for an empty slice.
fn mean_and_stdev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::{
        BalanceStats, MoveSuggestion, RebalanceTuning, Suggestion, VehicleLoadout, apply_rebalance,
        balance_score, detect_problems, mean_and_stdev, pack_best_fit_decreasing, rebalance,
        suggest_moves,
    };
    use crate::{
        Delivery, DeliveryId, Vehicle, VehicleId,
        problem::{ProblemKind, Severity},
    };

    fn vehicle(id: &str, capacity: f64) -> Vehicle {
        Vehicle::new(VehicleId::from(id), capacity, String::new())
    }

    fn parcel(id: &str, weight: f64) -> Delivery {
        Delivery::new(id, weight, 0.0, 0.0)
    }

    fn loadout(id: &str, capacity: f64, weights: &[(&str, f64)]) -> VehicleLoadout {
        VehicleLoadout {
            vehicle_id: VehicleId::from(id),
            capacity_kg: capacity,
            load_kg: weights.iter().map(|(_, w)| w).sum(),
            deliveries: weights.iter().map(|&(d, w)| parcel(d, w)).collect(),
        }
    }

    /// 130 kg on a 100 kg vehicle.
    fn overloaded_a() -> VehicleLoadout {
        loadout(
            "A",
            100.0,
            &[("a1", 50.0), ("a2", 5.0), ("a3", 10.0), ("a4", 25.0), ("a5", 40.0)],
        )
    }

    fn ids(loadout: &VehicleLoadout) -> Vec<&str> {
        loadout.deliveries.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn best_fit_decreasing_prefers_the_tightest_vehicle() {
        let vehicles = [vehicle("A", 100.0), vehicle("B", 50.0)];
        let deliveries = [
            parcel("d40", 40.0),
            parcel("d30", 30.0),
            parcel("d20", 20.0),
            parcel("d45", 45.0),
        ];
        let (loadouts, unpacked) = pack_best_fit_decreasing(&deliveries, &vehicles);

        assert!(unpacked.is_empty());
        assert_eq!(ids(&loadouts[0]), vec!["d40", "d30", "d20"]);
        assert_eq!(ids(&loadouts[1]), vec!["d45"]);
        assert_eq!(loadouts[0].load_kg, 90.0);
        assert_eq!(loadouts[1].load_kg, 45.0);
    }

    #[test]
    fn equal_weights_keep_input_order_and_oversized_are_omitted() {
        let vehicles = [vehicle("A", 100.0)];
        let deliveries = [parcel("huge", 150.0), parcel("x", 10.0), parcel("y", 10.0)];
        let (loadouts, unpacked) = pack_best_fit_decreasing(&deliveries, &vehicles);

        assert_eq!(ids(&loadouts[0]), vec!["x", "y"]);
        assert_eq!(unpacked.len(), 1);
        assert_eq!(unpacked[0].id.as_str(), "huge");
    }

    #[test]
    fn packing_never_exceeds_capacity() {
        let vehicles = [vehicle("A", 70.0), vehicle("B", 55.0), vehicle("C", 30.0)];
        let deliveries: Vec<Delivery> = (0..20)
            .map(|i| parcel(&format!("d{i}"), ((i * 7) % 13 + 1) as f64))
            .collect();
        let (loadouts, _) = pack_best_fit_decreasing(&deliveries, &vehicles);
        for l in &loadouts {
            let sum: f64 = l.deliveries.iter().map(|d| d.weight_kg).sum();
            assert!(sum <= l.capacity_kg);
            assert!(!l.is_overloaded());
        }
    }

    #[test]
    fn decimal_weights_filling_a_vehicle_exactly_are_not_an_overload() {
        let vehicles = [vehicle("A", 100.0)];
        let deliveries = [parcel("d1", 79.4), parcel("d2", 10.2), parcel("d3", 10.4)];
        let result = rebalance(&deliveries, &vehicles, &RebalanceTuning::default())
            .expect("rebalance succeeds");

        assert_eq!(result.statistics.packed, 3);
        assert!(result.success);
        assert!(result.problems.iter().all(|p| p.kind != ProblemKind::Overload));
        assert!(
            result
                .suggestions
                .iter()
                .all(|s| !matches!(s, Suggestion::Move(_)))
        );

        let tiny = rebalance(
            &[parcel("a", 0.1), parcel("b", 0.2)],
            &[vehicle("T", 0.3)],
            &RebalanceTuning::default(),
        )
        .expect("rebalance succeeds");
        assert_eq!(tiny.statistics.unpacked, 0);
        assert!(tiny.success);
        assert_eq!(tiny.assignments[0].excess_kg(), 0.0);
    }

    #[test]
    fn detects_overload_imbalance_and_underutilization() {
        let loadouts = [
            overloaded_a(),
            loadout("B", 100.0, &[("b1", 20.0)]),
        ];
        let problems = detect_problems(&loadouts, &RebalanceTuning::default());
        let kinds: Vec<(ProblemKind, &str)> = problems
            .iter()
            .map(|p| (p.kind, p.vehicle_id.as_ref().map_or("", |v| v.as_str())))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (ProblemKind::Overload, "A"),
                (ProblemKind::Imbalance, "A"),
                (ProblemKind::Imbalance, "B"),
                (ProblemKind::Underutilization, "B"),
            ]
        );
        assert_eq!(problems[0].severity, Severity::Critical);
        assert_eq!(problems[0].excess_kg, Some(30.0));
        assert_eq!(problems[2].severity, Severity::Medium);
        assert_eq!(problems[3].severity, Severity::Low);
        assert_eq!(problems[3].spare_kg, Some(80.0));
    }

    #[test]
    fn moves_lightest_deliveries_to_first_vehicle_with_room() {
        let loadouts = [
            overloaded_a(),
            loadout("B", 100.0, &[("b1", 90.0)]),
            loadout("C", 100.0, &[("c1", 20.0)]),
        ];
        let suggestions = suggest_moves(&loadouts, &RebalanceTuning::default());

        assert_eq!(suggestions.len(), 2);
        let Suggestion::Move(mv) = &suggestions[0] else {
            panic!("expected a move first, got {:?}", suggestions[0]);
        };
        assert_eq!(mv.from.as_str(), "A");
        assert_eq!(mv.to.as_str(), "C");
        let moved: Vec<&str> = mv.delivery_ids.iter().map(|d| d.as_str()).collect();
        assert_eq!(moved, vec!["a2", "a3", "a4"]);
        assert_eq!(mv.weight_kg, 40.0);
        assert!(matches!(
            &suggestions[1],
            Suggestion::Combine { vehicle_id, .. } if vehicle_id.as_str() == "C"
        ));
    }

    #[test]
    fn apply_moves_named_deliveries_and_adjusts_loads() {
        let current = vec![
            overloaded_a(),
            loadout("B", 100.0, &[("b1", 20.0)]),
        ];
        let suggestions = suggest_moves(&current, &RebalanceTuning::default());
        let vehicles = [vehicle("A", 100.0), vehicle("B", 100.0), vehicle("C", 60.0)];
        let next = apply_rebalance(&current, &suggestions, &vehicles);

        assert_eq!(next.len(), 3);
        assert_eq!(next[0].load_kg, 90.0);
        assert_eq!(ids(&next[0]), vec!["a1", "a5"]);
        assert_eq!(next[1].load_kg, 60.0);
        assert_eq!(ids(&next[1]), vec!["b1", "a2", "a3", "a4"]);
        assert_eq!(next[2].vehicle_id.as_str(), "C");
        assert!(next[2].deliveries.is_empty());
        assert!(detect_problems(&next, &RebalanceTuning::default())
            .iter()
            .all(|p| p.kind != ProblemKind::Overload));
        assert_eq!(current[0].load_kg, 130.0);
    }

    #[test]
    fn apply_skips_unknown_vehicles_and_deliveries() {
        let current = vec![loadout("A", 100.0, &[("a1", 10.0)]), loadout("B", 100.0, &[])];
        let suggestions = vec![
            Suggestion::Move(MoveSuggestion {
                from: VehicleId::from("ghost"),
                to: VehicleId::from("B"),
                delivery_ids: vec![DeliveryId::from("a1")],
                weight_kg: 10.0,
                reason: String::new(),
            }),
            Suggestion::Move(MoveSuggestion {
                from: VehicleId::from("A"),
                to: VehicleId::from("B"),
                delivery_ids: vec![DeliveryId::from("missing"), DeliveryId::from("a1")],
                weight_kg: 10.0,
                reason: String::new(),
            }),
        ];
        let next = apply_rebalance(&current, &suggestions, &[]);
        assert!(next[0].deliveries.is_empty());
        assert_eq!(next[0].load_kg, 0.0);
        assert_eq!(ids(&next[1]), vec!["a1"]);
        assert_eq!(next[1].load_kg, 10.0);
    }

    #[test]
    fn balance_score_is_clamped_and_monotone() {
        assert_eq!(balance_score(0.0), 100.0);
        assert_eq!(balance_score(20.0), 50.0);
        assert_eq!(balance_score(40.0), 0.0);
        assert_eq!(balance_score(100.0), 0.0);
        let mut last = f64::INFINITY;
        for step in 0..50 {
            let score = balance_score(step as f64);
            assert!(score <= last);
            last = score;
        }
    }

    #[test]
    fn statistics_render_as_aligned_key_values() {
        let stats = BalanceStats {
            vehicles: 2,
            total_weight_kg: 12.5,
            ..BalanceStats::default()
        };
        let shown = stats.to_string();
        let value_of = |key: &str| {
            shown
                .lines()
                .map(str::trim)
                .find_map(|line| line.strip_prefix(key))
                .map(|rest| rest.trim_start().trim_start_matches('=').trim().to_string())
        };
        assert_eq!(value_of("vehicles").as_deref(), Some("2"));
        assert_eq!(value_of("total_weight_kg").as_deref(), Some("12.50"));
        assert_eq!(value_of("balance_score").as_deref(), Some("0.00"));
    }

    #[test]
    fn population_stdev() {
        let (mean, stdev) = mean_and_stdev(&[20.0, 60.0]);
        assert_eq!(mean, 40.0);
        assert_eq!(stdev, 20.0);
        assert_eq!(mean_and_stdev(&[]), (0.0, 0.0));
    }

    #[test]
    fn rebalance_reports_statistics_and_succeeds_without_overload() {
        let vehicles = [vehicle("A", 100.0), vehicle("B", 100.0)];
        let deliveries = [parcel("d1", 60.0), parcel("d2", 60.0), parcel("d3", 30.0)];
        let result = rebalance(&deliveries, &vehicles, &RebalanceTuning::default())
            .expect("rebalance succeeds");

        assert!(result.success);
        assert_eq!(result.statistics.packed, 3);
        assert_eq!(result.statistics.unpacked, 0);
        assert_eq!(result.statistics.total_weight_kg, 150.0);
        assert_eq!(result.assignments[0].load_kg, 90.0);
        assert_eq!(result.assignments[1].load_kg, 60.0);
        assert_eq!(result.statistics.mean_utilization_percent, 75.0);
        assert!((result.statistics.balance_score - 62.5).abs() < 1e-9);
    }

    #[test]
    fn empty_inputs_are_a_trivial_success() {
        let result = rebalance(&[], &[vehicle("A", 10.0)], &RebalanceTuning::default())
            .expect("empty deliveries");
        assert!(result.success);
        assert!(result.assignments.is_empty());
        assert_eq!(result.statistics.balance_score, 100.0);

        let result = rebalance(&[parcel("d", 1.0)], &[], &RebalanceTuning::default())
            .expect("empty fleet");
        assert!(result.success);
    }

    #[test]
    fn rejects_non_positive_capacity() {
        let tuning = RebalanceTuning::default();
        let err = rebalance(&[parcel("d", 1.0)], &[vehicle("A", 0.0)], &tuning)
            .expect_err("zero capacity");
        assert!(err.to_string().contains("vehicle A capacity must be finite and > 0"));
    }
}
