use fleet_route_derive::KvDisplay;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::index};

use crate::{
    Delivery, EngineOptions, Error, Result,
    geo::{GeoPoint, geometry::PathGeometry},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneTuning {
    pub max_iterations: usize,
    /// Every centroid must move less than this (km) for an early stop.
    pub convergence_km: f64,
}

impl Default for ZoneTuning {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            convergence_km: 0.001,
        }
    }
}

impl From<&EngineOptions> for ZoneTuning {
    fn from(options: &EngineOptions) -> Self {
        Self {
            max_iterations: options.zone_max_iterations,
            convergence_km: options.zone_convergence_km,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    pub id: usize,
    pub centroid: GeoPoint,
    pub members: Vec<(usize, Delivery)>,
    pub total_weight_kg: f64,
    pub mean_distance_km: f64,
}

impl Zone {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, KvDisplay)]
pub struct ZoningStats {
    pub deliveries: usize,
    pub zones: usize,
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Zoning {
    pub zones: Vec<Zone>,
    pub centroids: Vec<GeoPoint>,
    pub stats: ZoningStats,
}

/// Splits deliveries into exactly `k` zones around iteratively refined centroids.
///
/// Initial centroids are `k` distinct deliveries drawn from `rng`.
pub fn zone<R: Rng + ?Sized>(
    deliveries: &[Delivery],
    k: usize,
    tuning: ZoneTuning,
    rng: &mut R,
) -> Result<Zoning> {
    if deliveries.is_empty() {
        log::debug!("zoning: no deliveries");
        return Ok(Zoning::default());
    }
    let n = deliveries.len();
    if k == 0 || k > n {
        return Err(Error::invalid_input(format!(
            "zone count must be in 1..={n}, got {k}"
        )));
    }

    let points: Vec<GeoPoint> = deliveries.iter().map(|d| d.point).collect();
    let mut centroids: Vec<GeoPoint> = index::sample(rng, n, k)
        .into_iter()
        .map(|i| points[i])
        .collect();

    let mut iterations = 0;
    let mut converged = false;
    while iterations < tuning.max_iterations {
        iterations += 1;
        let labels = assign_nearest(&points, &centroids);
        let next = recompute_centroids(&points, &labels, &centroids);
        let max_shift = centroids
            .iter()
            .zip(&next)
            .map(|(a, b)| a.distance_km(b))
            .fold(0.0_f64, f64::max);
        centroids = next;
        log::debug!("zoning: iteration={iterations} max_shift_km={max_shift:.5}");
        if max_shift < tuning.convergence_km {
            converged = true;
            break;
        }
    }

    let labels = assign_nearest(&points, &centroids);
    let mut zones: Vec<Zone> = centroids
        .iter()
        .enumerate()
        .map(|(id, &centroid)| Zone {
            id,
            centroid,
            members: Vec::new(),
            total_weight_kg: 0.0,
            mean_distance_km: 0.0,
        })
        .collect();
    for (i, &label) in labels.iter().enumerate() {
        let zone = &mut zones[label];
        zone.total_weight_kg += deliveries[i].weight_kg;
        zone.mean_distance_km += zone.centroid.distance_km(&points[i]);
        zone.members.push((i, deliveries[i].clone()));
    }
    for zone in zones.iter_mut().filter(|z| !z.is_empty()) {
        zone.mean_distance_km /= zone.len() as f64;
    }

    let stats = ZoningStats {
        deliveries: n,
        zones: k,
        iterations,
        converged,
    };
    log::info!(
        "zoning: done n={n} k={k} iterations={iterations} converged={converged}"
    );

    Ok(Zoning {
        zones,
        centroids,
        stats,
    })
}

/// [`zone`] with a `StdRng` seeded from `seed`.
pub fn zone_seeded(
    deliveries: &[Delivery],
    k: usize,
    tuning: ZoneTuning,
    seed: u64,
) -> Result<Zoning> {
    let mut rng = StdRng::seed_from_u64(seed);
    zone(deliveries, k, tuning, &mut rng)
}

fn nearest_centroid(point: &GeoPoint, centroids: &[GeoPoint]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (idx, c) in centroids.iter().enumerate() {
        let d = point.distance_km(c);
        if d < best_d {
            best = idx;
            best_d = d;
        }
    }
    best
}

fn assign_nearest(points: &[GeoPoint], centroids: &[GeoPoint]) -> Vec<usize> {
    points
        .iter()
        .map(|p| nearest_centroid(p, centroids))
        .collect()
}

/// Mean of each zone's members; a zone left empty keeps its previous centroid.
fn recompute_centroids(
    points: &[GeoPoint],
    labels: &[usize],
    previous: &[GeoPoint],
) -> Vec<GeoPoint> {
    previous
        .iter()
        .enumerate()
        .map(|(zone, &prev)| {
            let mut members = points
                .iter()
                .zip(labels)
                .filter(|(_, label)| **label == zone)
                .map(|(p, _)| p)
                .peekable();
            if members.peek().is_none() {
                prev
            } else {
                PathGeometry::centroid(members)
            }
        })
        .collect()
}
