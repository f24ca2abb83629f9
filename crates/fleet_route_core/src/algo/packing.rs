use std::cmp::Ordering;

/// Slack for float rounding when summing weights against a capacity. Shared by every
/// fit and overload check.
pub(crate) const CAPACITY_EPS: f64 = 1e-9;

/// Capacity and committed load of one vehicle while packing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinLoad {
    pub capacity_kg: f64,
    pub load_kg: f64,
}

impl BinLoad {
    pub fn empty(capacity_kg: f64) -> Self {
        Self {
            capacity_kg,
            load_kg: 0.0,
        }
    }

    pub fn remaining_kg(&self) -> f64 {
        self.capacity_kg - self.load_kg
    }

    pub fn fits(&self, weight_kg: f64) -> bool {
        self.load_kg + weight_kg <= self.capacity_kg + CAPACITY_EPS
    }
}

/// Chooses which bin receives an item. Implementations only pick among bins that fit
/// the weight and break ties by bin order.
pub trait CapacityPacker {
    fn name(&self) -> &'static str;

    fn select(&self, bins: &[BinLoad], weight_kg: f64) -> Option<usize>;

    fn place(&self, bins: &mut [BinLoad], weight_kg: f64) -> Option<usize> {
        let idx = self.select(bins, weight_kg)?;
        bins[idx].load_kg += weight_kg;
        Some(idx)
    }
}

/// Least-loaded eligible bin.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpreadLoad;

/// Eligible bin with the least remaining capacity (best fit).
#[derive(Clone, Copy, Debug, Default)]
pub struct TightFit;

fn first_min_by<F>(bins: &[BinLoad], weight_kg: f64, key: F) -> Option<usize>
where
    F: Fn(&BinLoad) -> f64,
{
    let mut best: Option<(usize, f64)> = None;
    for (idx, bin) in bins.iter().enumerate() {
        if !bin.fits(weight_kg) {
            continue;
        }
        let k = key(bin);
        let better = match best {
            None => true,
            Some((_, best_k)) => k.total_cmp(&best_k) == Ordering::Less,
        };
        if better {
            best = Some((idx, k));
        }
    }
    best.map(|(idx, _)| idx)
}

impl CapacityPacker for SpreadLoad {
    fn name(&self) -> &'static str {
        "spread-load"
    }

    fn select(&self, bins: &[BinLoad], weight_kg: f64) -> Option<usize> {
        first_min_by(bins, weight_kg, |b| b.load_kg)
    }
}

impl CapacityPacker for TightFit {
    fn name(&self) -> &'static str {
        "tight-fit"
    }

    fn select(&self, bins: &[BinLoad], weight_kg: f64) -> Option<usize> {
        first_min_by(bins, weight_kg, BinLoad::remaining_kg)
    }
}

#[cfg(test)]
mod tests {
    use super::{BinLoad, CapacityPacker, SpreadLoad, TightFit};

    fn bins(loads: &[(f64, f64)]) -> Vec<BinLoad> {
        loads
            .iter()
            .map(|&(capacity_kg, load_kg)| BinLoad {
                capacity_kg,
                load_kg,
            })
            .collect()
    }

    #[test]
    fn spread_load_prefers_least_loaded_eligible_bin() {
        let b = bins(&[(100.0, 40.0), (100.0, 10.0), (20.0, 0.0)]);
        assert_eq!(SpreadLoad.select(&b, 30.0), Some(1));
        assert_eq!(SpreadLoad.select(&b, 15.0), Some(2));
    }

    #[test]
    fn tight_fit_prefers_smallest_remaining_capacity() {
        let b = bins(&[(100.0, 0.0), (50.0, 0.0), (30.0, 0.0)]);
        assert_eq!(TightFit.select(&b, 25.0), Some(2));
        assert_eq!(TightFit.select(&b, 40.0), Some(1));
    }

    #[test]
    fn ties_go_to_the_first_bin() {
        let b = bins(&[(100.0, 0.0), (100.0, 0.0)]);
        assert_eq!(SpreadLoad.select(&b, 10.0), Some(0));
        assert_eq!(TightFit.select(&b, 10.0), Some(0));
    }

    #[test]
    fn place_commits_weight_and_reports_no_fit() {
        let mut b = bins(&[(100.0, 0.0)]);
        assert_eq!(TightFit.place(&mut b, 60.0), Some(0));
        assert_eq!(b[0].load_kg, 60.0);
        assert_eq!(TightFit.place(&mut b, 50.0), None);
        assert_eq!(b[0].load_kg, 60.0);
        assert_eq!(SpreadLoad.place(&mut b, 40.0), Some(0));
        assert_eq!(b[0].remaining_kg(), 0.0);
    }

    #[test]
    fn packers_are_named() {
        let packers: [&dyn CapacityPacker; 2] = [&SpreadLoad, &TightFit];
        let names: Vec<&str> = packers.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["spread-load", "tight-fit"]);
        assert!(BinLoad::empty(5.0).fits(5.0));
    }
}
