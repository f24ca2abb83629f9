use std::collections::VecDeque;

use fleet_route_derive::KvDisplay;

use crate::{
    Delivery, Error, Result,
    geo::{
        GeoPoint,
        geometry::{DistanceMatrix, PathGeometry},
    },
    model::total_weight,
};

const ERR_INVALID_RADIUS: &str = "radius_km must be finite and > 0";

/// Deliveries grouped by spatial density. `entries` keep the input index of each member,
/// sorted by that index.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    pub id: usize,
    pub entries: Vec<(usize, Delivery)>,
    pub centroid: GeoPoint,
    /// Largest member distance to the centroid.
    pub radius_km: f64,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight_kg(&self) -> f64 {
        total_weight(self.entries.iter().map(|(_, d)| d))
    }

    pub fn into_deliveries(self) -> Vec<Delivery> {
        self.entries.into_iter().map(|(_, d)| d).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, KvDisplay)]
pub struct ClusteringStats {
    pub deliveries: usize,
    pub clusters: usize,
    pub clustered: usize,
    pub isolated: usize,
    #[kv(fmt = "fixed")]
    pub clustered_percent: f64,
    #[kv(fmt = "fixed")]
    pub clustered_weight_kg: f64,
    #[kv(fmt = "fixed")]
    pub max_cluster_radius_km: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Clustering {
    pub clusters: Vec<Cluster>,
    /// Deliveries that joined no cluster, in input order.
    pub isolated: Vec<(usize, Delivery)>,
    pub stats: ClusteringStats,
}

/// Visit and membership bookkeeping for one clustering pass, plus the expansion queue.
struct ReachableSet {
    visited: Vec<bool>,
    membership: Vec<Option<usize>>,
    queue: VecDeque<usize>,
}

impl ReachableSet {
    fn new(n: usize) -> Self {
        Self {
            visited: vec![false; n],
            membership: vec![None; n],
            queue: VecDeque::new(),
        }
    }

    /// Marks `idx` visited; false when it already was.
    fn visit(&mut self, idx: usize) -> bool {
        !std::mem::replace(&mut self.visited[idx], true)
    }

    /// Puts `idx` in `cluster` unless it already belongs somewhere.
    fn claim(&mut self, idx: usize, cluster: usize) -> bool {
        if self.membership[idx].is_some() {
            return false;
        }
        self.membership[idx] = Some(cluster);
        true
    }

    fn enqueue_unclaimed(&mut self, idxs: &[usize]) {
        for &idx in idxs {
            if self.membership[idx].is_none() {
                self.queue.push_back(idx);
            }
        }
    }

    fn next(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }

    fn membership(&self, idx: usize) -> Option<usize> {
        self.membership[idx]
    }
}

/// Density-based clustering over Haversine distances.
///
/// A delivery with at least `min_neighbors` other deliveries within `radius_km` is a core
/// point. Clusters grow from core points through their neighborhoods; non-core points
/// reached this way join without growing the cluster further. Everything else is
/// isolated.
pub fn clusterize(
    deliveries: &[Delivery],
    radius_km: f64,
    min_neighbors: usize,
) -> Result<Clustering> {
    if !(radius_km.is_finite() && radius_km > 0.0) {
        return Err(Error::invalid_input(ERR_INVALID_RADIUS));
    }
    if deliveries.is_empty() {
        log::debug!("cluster: no deliveries");
        return Ok(Clustering::default());
    }

    let points: Vec<GeoPoint> = deliveries.iter().map(|d| d.point).collect();
    let matrix = DistanceMatrix::build(&points);
    let n = matrix.len();
    log::debug!("cluster: start n={n} radius_km={radius_km} min_neighbors={min_neighbors}");

    let mut reach = ReachableSet::new(n);
    let mut members: Vec<Vec<usize>> = Vec::new();

    for seed in 0..n {
        if !reach.visit(seed) {
            continue;
        }
        let neighbors = matrix.neighbors_within(seed, radius_km);
        if neighbors.len() < min_neighbors {
            continue;
        }

        let cluster = members.len();
        let mut group = Vec::with_capacity(neighbors.len() + 1);
        reach.claim(seed, cluster);
        group.push(seed);
        reach.enqueue_unclaimed(&neighbors);

        while let Some(idx) = reach.next() {
            if reach.claim(idx, cluster) {
                group.push(idx);
            }
            if !reach.visit(idx) {
                continue;
            }
            let reachable = matrix.neighbors_within(idx, radius_km);
            if reachable.len() >= min_neighbors {
                reach.enqueue_unclaimed(&reachable);
            }
        }

        group.sort_unstable();
        members.push(group);
    }

    let clusters: Vec<Cluster> = members
        .into_iter()
        .enumerate()
        .map(|(id, idxs)| build_cluster(id, &idxs, deliveries))
        .collect();
    let isolated: Vec<(usize, Delivery)> = (0..n)
        .filter(|&i| reach.membership(i).is_none())
        .map(|i| (i, deliveries[i].clone()))
        .collect();

    let stats = clustering_stats(n, &clusters, &isolated);
    log::info!(
        "cluster: done n={} clusters={} clustered={} isolated={} clustered_pct={:.1}",
        stats.deliveries,
        stats.clusters,
        stats.clustered,
        stats.isolated,
        stats.clustered_percent
    );

    Ok(Clustering {
        clusters,
        isolated,
        stats,
    })
}

fn build_cluster(id: usize, idxs: &[usize], deliveries: &[Delivery]) -> Cluster {
    let entries: Vec<(usize, Delivery)> = idxs
        .iter()
        .map(|&i| (i, deliveries[i].clone()))
        .collect();
    let centroid = PathGeometry::centroid(entries.iter().map(|(_, d)| &d.point));
    let radius_km = PathGeometry::max_distance_km(centroid, entries.iter().map(|(_, d)| &d.point));
    Cluster {
        id,
        entries,
        centroid,
        radius_km,
    }
}

fn clustering_stats(
    n: usize,
    clusters: &[Cluster],
    isolated: &[(usize, Delivery)],
) -> ClusteringStats {
    let clustered: usize = clusters.iter().map(Cluster::len).sum();
    ClusteringStats {
        deliveries: n,
        clusters: clusters.len(),
        clustered,
        isolated: isolated.len(),
        clustered_percent: if n == 0 {
            0.0
        } else {
            clustered as f64 / n as f64 * 100.0
        },
        clustered_weight_kg: clusters.iter().map(Cluster::total_weight_kg).sum(),
        max_cluster_radius_km: clusters.iter().map(|c| c.radius_km).fold(0.0, f64::max),
    }
}
