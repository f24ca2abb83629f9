use fleet_route_derive::{KvDisplay, New};

use crate::{
    DriverId, EngineOptions, Weekday, ZoneId,
    predict::history::{HistorySource, PerformanceStats},
};

/// Constants of the factor model.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictorTuning {
    pub base_speed_kmh: f64,
    pub minutes_per_stop: f64,
    pub driver_min_samples: usize,
    pub driver_factor_range: (f64, f64),
    pub zone_min_samples: usize,
    pub zone_factor_range: (f64, f64),
    /// Half-open `[start, end)` hour windows.
    pub peak_hours: Vec<(u32, u32)>,
    pub peak_factor: f64,
    /// Hours at or after `.0` or before `.1`.
    pub off_peak_hours: (u32, u32),
    pub off_peak_factor: f64,
    pub weekend_factor: f64,
    pub base_confidence: f64,
    pub max_confidence: f64,
    pub confidence_per_driver_sample: f64,
    pub confidence_per_zone_sample: f64,
    /// Cap on each of the driver and zone confidence bonuses.
    pub max_history_bonus: f64,
    pub min_range_minutes: f64,
}

impl Default for PredictorTuning {
    fn default() -> Self {
        Self {
            base_speed_kmh: 40.0,
            minutes_per_stop: 10.0,
            driver_min_samples: 5,
            driver_factor_range: (0.7, 1.3),
            zone_min_samples: 10,
            zone_factor_range: (0.8, 1.4),
            peak_hours: vec![(8, 12), (17, 20)],
            peak_factor: 1.2,
            off_peak_hours: (21, 7),
            off_peak_factor: 0.9,
            weekend_factor: 1.15,
            base_confidence: 60.0,
            max_confidence: 95.0,
            confidence_per_driver_sample: 2.0,
            confidence_per_zone_sample: 1.0,
            max_history_bonus: 20.0,
            min_range_minutes: 5.0,
        }
    }
}

impl From<&EngineOptions> for PredictorTuning {
    fn from(options: &EngineOptions) -> Self {
        Self {
            base_speed_kmh: options.base_speed_kmh,
            minutes_per_stop: options.minutes_per_stop,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, New)]
pub struct PredictionRequest {
    pub distance_km: f64,
    pub stops: usize,
    /// Departure hour of day. Values of 24 and above wrap around the clock.
    pub hour: u32,
    pub day: Weekday,
    pub zone_id: Option<ZoneId>,
    pub driver_id: Option<DriverId>,
}

#[derive(Clone, Debug, Default, PartialEq, KvDisplay)]
pub struct FactorBreakdown {
    #[kv(fmt = "fixed")]
    pub driver_factor: f64,
    #[kv(fmt = "fixed")]
    pub zone_factor: f64,
    #[kv(fmt = "fixed")]
    pub hour_factor: f64,
    #[kv(fmt = "fixed")]
    pub day_factor: f64,
    #[kv(fmt = "fixed")]
    pub effective_speed_kmh: f64,
    #[kv(fmt = "fixed")]
    pub driving_minutes: f64,
    #[kv(fmt = "fixed")]
    pub stop_minutes: f64,
    pub driver_samples: usize,
    pub zone_samples: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub minutes: f64,
    pub range_min: f64,
    pub range_max: f64,
    /// 0-100.
    pub confidence: f64,
    pub breakdown: FactorBreakdown,
}

/// Multiplicative factor model over a speed-based baseline.
///
/// Driver, hour and day factors scale the driving speed; the zone factor scales the
/// whole estimate. Missing or thin history leaves a factor at 1.0.
pub fn predict_duration<H>(
    request: &PredictionRequest,
    history: &H,
    tuning: &PredictorTuning,
) -> Prediction
where
    H: HistorySource + ?Sized,
{
    let driver = request
        .driver_id
        .as_ref()
        .and_then(|id| history.driver_stats(id));
    let zone = request.zone_id.as_ref().and_then(|id| history.zone_stats(id));

    let driver_factor = driver_factor(driver, tuning);
    let zone_factor = zone_factor(zone, tuning);
    let hour_factor = hour_factor(request.hour, tuning);
    let day_factor = if request.day.is_weekend() {
        tuning.weekend_factor
    } else {
        1.0
    };

    let effective_speed_kmh = tuning.base_speed_kmh * driver_factor * hour_factor * day_factor;
    let driving_minutes = if effective_speed_kmh > 0.0 {
        request.distance_km / effective_speed_kmh * 60.0
    } else {
        0.0
    };
    let stop_minutes = request.stops as f64 * tuning.minutes_per_stop;
    let minutes = (driving_minutes + stop_minutes) * zone_factor;

    let driver_samples = driver.map_or(0, |s| s.samples);
    let zone_samples = zone.map_or(0, |s| s.samples);
    let confidence = confidence(driver_samples, zone_samples, tuning);
    let half_width = minutes * (40.0 - confidence * 0.3) / 100.0;

    let breakdown = FactorBreakdown {
        driver_factor,
        zone_factor,
        hour_factor,
        day_factor,
        effective_speed_kmh,
        driving_minutes,
        stop_minutes,
        driver_samples,
        zone_samples,
    };
    log::debug!("predict: minutes={minutes:.1} confidence={confidence:.0}{breakdown}");

    Prediction {
        minutes,
        range_min: (minutes - half_width).max(tuning.min_range_minutes),
        range_max: minutes + half_width,
        confidence,
        breakdown,
    }
}

/// `baseline / actual`: a driver faster than the baseline gets a factor above 1.
fn driver_factor(stats: Option<PerformanceStats>, tuning: &PredictorTuning) -> f64 {
    match stats {
        Some(s) if s.samples >= tuning.driver_min_samples && s.avg_actual_minutes > 0.0 => {
            let (lo, hi) = tuning.driver_factor_range;
            (s.avg_baseline_minutes / s.avg_actual_minutes).clamp(lo, hi)
        }
        _ => 1.0,
    }
}

/// `actual / baseline`: a zone slower than the baseline gets a factor above 1.
fn zone_factor(stats: Option<PerformanceStats>, tuning: &PredictorTuning) -> f64 {
    match stats {
        Some(s) if s.samples >= tuning.zone_min_samples && s.avg_baseline_minutes > 0.0 => {
            let (lo, hi) = tuning.zone_factor_range;
            (s.avg_actual_minutes / s.avg_baseline_minutes).clamp(lo, hi)
        }
        _ => 1.0,
    }
}

fn hour_factor(hour: u32, tuning: &PredictorTuning) -> f64 {
    let hour = hour % 24;
    if tuning
        .peak_hours
        .iter()
        .any(|&(start, end)| (start..end).contains(&hour))
    {
        return tuning.peak_factor;
    }
    let (late, early) = tuning.off_peak_hours;
    if hour >= late || hour < early {
        return tuning.off_peak_factor;
    }
    1.0
}

fn confidence(driver_samples: usize, zone_samples: usize, tuning: &PredictorTuning) -> f64 {
    let driver_bonus =
        (driver_samples as f64 * tuning.confidence_per_driver_sample).min(tuning.max_history_bonus);
    let zone_bonus =
        (zone_samples as f64 * tuning.confidence_per_zone_sample).min(tuning.max_history_bonus);
    (tuning.base_confidence + driver_bonus + zone_bonus).min(tuning.max_confidence)
}

#[cfg(test)]
mod tests {
    use super::{PredictionRequest, PredictorTuning, hour_factor, predict_duration};
    use crate::{
        Weekday,
        predict::history::{HistorySnapshot, NoHistory, PerformanceStats},
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn peak_tuesday_without_history() {
        let request = PredictionRequest::new(40.0, 4, 9, Weekday::Tuesday);
        let p = predict_duration(&request, &NoHistory, &PredictorTuning::default());

        assert!(close(p.minutes, 90.0));
        assert!(close(p.confidence, 60.0));
        assert!(close(p.breakdown.effective_speed_kmh, 48.0));
        assert!(close(p.breakdown.driving_minutes, 50.0));
        assert!(close(p.breakdown.stop_minutes, 40.0));
        assert!(close(p.range_min, 70.2));
        assert!(close(p.range_max, 109.8));
    }

    #[test]
    fn hour_windows() {
        let tuning = PredictorTuning::default();
        assert_eq!(hour_factor(8, &tuning), 1.2);
        assert_eq!(hour_factor(11, &tuning), 1.2);
        assert_eq!(hour_factor(12, &tuning), 1.0);
        assert_eq!(hour_factor(17, &tuning), 1.2);
        assert_eq!(hour_factor(20, &tuning), 1.0);
        assert_eq!(hour_factor(21, &tuning), 0.9);
        assert_eq!(hour_factor(3, &tuning), 0.9);
        assert_eq!(hour_factor(6, &tuning), 0.9);
        assert_eq!(hour_factor(7, &tuning), 1.0);
    }

    #[test]
    fn hours_past_midnight_wrap() {
        let tuning = PredictorTuning::default();
        assert_eq!(hour_factor(24, &tuning), 0.9);
        assert_eq!(hour_factor(33, &tuning), 1.2);
        assert_eq!(hour_factor(45, &tuning), 0.9);

        let history = NoHistory;
        let morning = predict_duration(
            &PredictionRequest::new(20.0, 3, 9, Weekday::Tuesday),
            &history,
            &tuning,
        );
        let wrapped = predict_duration(
            &PredictionRequest::new(20.0, 3, 33, Weekday::Tuesday),
            &history,
            &tuning,
        );
        assert_eq!(wrapped.minutes, morning.minutes);
        assert_eq!(wrapped.breakdown.hour_factor, 1.2);
    }

    #[test]
    fn weekend_speeds_up_driving_only() {
        let request = PredictionRequest::new(46.0, 1, 14, Weekday::Sunday);
        let p = predict_duration(&request, &NoHistory, &PredictorTuning::default());
        assert!(close(p.breakdown.day_factor, 1.15));
        assert!(close(p.breakdown.effective_speed_kmh, 46.0));
        assert!(close(p.minutes, 70.0));
    }

    #[test]
    fn history_factors_are_clamped() {
        let history = HistorySnapshot::default()
            .with_driver("fast", PerformanceStats::new(8, 10.0, 100.0))
            .with_zone("jam", PerformanceStats::new(30, 300.0, 100.0));
        let request = PredictionRequest::new(10.0, 0, 14, Weekday::Monday)
            .with_driver_id("fast".into())
            .with_zone_id("jam".into());
        let p = predict_duration(&request, &history, &PredictorTuning::default());

        assert!(close(p.breakdown.driver_factor, 1.3));
        assert!(close(p.breakdown.zone_factor, 1.4));
        assert!(close(p.confidence, 95.0));
    }

    #[test]
    fn thin_history_stays_neutral_but_raises_confidence() {
        let history = HistorySnapshot::default()
            .with_driver("new", PerformanceStats::new(4, 10.0, 20.0))
            .with_zone("quiet", PerformanceStats::new(9, 30.0, 10.0));
        let request = PredictionRequest::new(20.0, 2, 14, Weekday::Wednesday)
            .with_driver_id("new".into())
            .with_zone_id("quiet".into());
        let p = predict_duration(&request, &history, &PredictorTuning::default());

        assert_eq!(p.breakdown.driver_factor, 1.0);
        assert_eq!(p.breakdown.zone_factor, 1.0);
        assert!(close(p.confidence, 60.0 + 8.0 + 9.0));
        assert!(close(p.minutes, 50.0));
    }

    #[test]
    fn slow_driver_lowers_speed() {
        let history =
            HistorySnapshot::default().with_driver("slow", PerformanceStats::new(5, 50.0, 40.0));
        let request = PredictionRequest::new(32.0, 0, 14, Weekday::Thursday)
            .with_driver_id("slow".into());
        let p = predict_duration(&request, &history, &PredictorTuning::default());
        assert!(close(p.breakdown.driver_factor, 0.8));
        assert!(close(p.minutes, 60.0));
    }

    #[test]
    fn lower_bound_is_floored() {
        let request = PredictionRequest::new(0.0, 0, 14, Weekday::Friday);
        let p = predict_duration(&request, &NoHistory, &PredictorTuning::default());
        assert_eq!(p.minutes, 0.0);
        assert_eq!(p.range_min, 5.0);
        assert_eq!(p.range_max, 0.0);
    }
}
