use crate::geo::GeoPoint;

pub(crate) struct PathGeometry;

impl PathGeometry {
    /// Length of the open path `points[0] -> points[1] -> ... -> points[n-1]`.
    pub(crate) fn open_path_km(points: &[GeoPoint]) -> f64 {
        points
            .windows(2)
            .map(|leg| leg[0].distance_km(&leg[1]))
            .sum()
    }

    /// Unweighted mean of the coordinates; the origin for an empty slice.
    pub(crate) fn centroid<'a, I>(points: I) -> GeoPoint
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let mut lat = 0.0;
        let mut lon = 0.0;
        let mut n = 0usize;
        for p in points {
            lat += p.lat;
            lon += p.lon;
            n += 1;
        }
        if n == 0 {
            return GeoPoint::default();
        }
        GeoPoint::new(lat / n as f64, lon / n as f64)
    }

    pub(crate) fn max_distance_km<'a, I>(center: GeoPoint, points: I) -> f64
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        points
            .into_iter()
            .map(|p| center.distance_km(p))
            .fold(0.0_f64, f64::max)
    }
}

/// Dense symmetric pairwise distance table, row-major.
#[derive(Clone, Debug)]
pub(crate) struct DistanceMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    pub(crate) fn build(points: &[GeoPoint]) -> Self {
        let n = points.len();
        let mut cells = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].distance_km(&points[j]);
                cells[i * n + j] = d;
                cells[j * n + i] = d;
            }
        }
        Self { n, cells }
    }

    #[inline]
    pub(crate) fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.n + j]
    }

    pub(crate) fn len(&self) -> usize {
        self.n
    }

    /// Indices within `radius_km` of `i` (inclusive), excluding `i` itself.
    pub(crate) fn neighbors_within(&self, i: usize, radius_km: f64) -> Vec<usize> {
        (0..self.n)
            .filter(|&j| j != i && self.get(i, j) <= radius_km)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{DistanceMatrix, PathGeometry};
    use crate::geo::GeoPoint;

    #[test]
    fn open_path_does_not_close_the_loop() {
        let points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(2.0, 0.0),
        ];
        let expected = points[0].distance_km(&points[1]) + points[1].distance_km(&points[2]);
        assert!((PathGeometry::open_path_km(&points) - expected).abs() < 1e-9);
        assert_eq!(PathGeometry::open_path_km(&points[..1]), 0.0);
        assert_eq!(PathGeometry::open_path_km(&[]), 0.0);
    }

    #[test]
    fn centroid_averages_coordinates() {
        let points = [GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 6.0)];
        let c = PathGeometry::centroid(&points);
        assert!((c.lat - 2.0).abs() < 1e-12);
        assert!((c.lon - 4.0).abs() < 1e-12);
        assert_eq!(PathGeometry::centroid(&[]), GeoPoint::default());
    }

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal() {
        let points = vec![
            GeoPoint::new(4.60, -74.08),
            GeoPoint::new(4.61, -74.07),
            GeoPoint::new(4.70, -74.05),
        ];
        let m = DistanceMatrix::build(&points);
        assert_eq!(m.len(), 3);
        for i in 0..3 {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn neighbors_within_excludes_self_and_far_points() {
        let points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.0, 1.0),
        ];
        let m = DistanceMatrix::build(&points);
        assert_eq!(m.neighbors_within(0, 2.0), vec![1]);
        assert!(m.neighbors_within(2, 2.0).is_empty());
    }
}
