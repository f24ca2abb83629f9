use std::{fs, io::Read};

use crate::{Delivery, EngineOptions, Error, HistorySnapshot, PerformanceStats, Result};

const FIELDS_PER_TOKEN: usize = 4;
const HISTORY_FIELDS: usize = 4;

/// Reads deliveries from `--input` when set, stdin otherwise.
pub fn read_deliveries(options: &EngineOptions) -> Result<Vec<Delivery>> {
    let raw = match options.input_path() {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            Error::other(format!("failed to read input {}: {e}", path.display()))
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_deliveries(&raw)
}

/// Parses whitespace separated `id,weight_kg,lat,lon` tokens. Empty numeric fields are
/// treated as missing and defaulted by [`Delivery::from_raw`].
pub fn parse_deliveries(raw: &str) -> Result<Vec<Delivery>> {
    let mut deliveries = Vec::new();

    for (idx, tok) in raw.split_whitespace().enumerate() {
        let fields: Vec<&str> = tok.split(',').collect();
        if fields.len() != FIELDS_PER_TOKEN {
            return Err(Error::invalid_data(format!(
                "Token {}: expected 'id,weight,lat,lon' but got {} fields: {tok}",
                idx + 1,
                fields.len()
            )));
        }
        let id = fields[0].trim();
        if id.is_empty() {
            return Err(Error::invalid_data(format!("Token {}: missing id", idx + 1)));
        }

        let weight = optional_number(fields[1], idx, "weight")?;
        let lat = optional_number(fields[2], idx, "latitude")?;
        let lon = optional_number(fields[3], idx, "longitude")?;

        let delivery = Delivery::from_raw(id, weight, lat, lon);
        if let Some(reason) = suspicious_delivery(&delivery) {
            log::warn!("input: delivery id={} {reason}", delivery.id);
        }
        deliveries.push(delivery);
    }

    log::debug!("input: parsed deliveries={}", deliveries.len());
    Ok(deliveries)
}

/// Accepted but likely wrong. A negative weight lowers a vehicle's load when packed.
fn suspicious_delivery(delivery: &Delivery) -> Option<String> {
    if delivery.weight_kg < 0.0 {
        Some(format!("has negative weight {} kg", delivery.weight_kg))
    } else if !delivery.point.is_valid() {
        Some(format!("has out-of-range coordinates {}", delivery.point))
    } else {
        None
    }
}

/// Reads `--history` when set. Without it the snapshot is empty.
pub fn read_history(options: &EngineOptions) -> Result<HistorySnapshot> {
    let Some(path) = options.history_path() else {
        return Ok(HistorySnapshot::default());
    };
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::other(format!("failed to read history {}: {e}", path.display())))?;
    parse_history(&raw)
}

/// Parses whitespace separated `driver:<id>,samples,avg_minutes,baseline_minutes` and
/// `zone:<id>,...` tokens. A repeated key keeps the last row.
pub fn parse_history(raw: &str) -> Result<HistorySnapshot> {
    let mut history = HistorySnapshot::default();

    for (idx, tok) in raw.split_whitespace().enumerate() {
        let fields: Vec<&str> = tok.split(',').collect();
        if fields.len() != HISTORY_FIELDS {
            return Err(Error::invalid_data(format!(
                "History token {}: expected 'kind:id,samples,avg,baseline', got {tok}",
                idx + 1
            )));
        }
        let Some((kind, key)) = fields[0].split_once(':').filter(|(_, key)| !key.is_empty())
        else {
            return Err(Error::invalid_data(format!(
                "History token {}: missing kind:id in {}",
                idx + 1,
                fields[0]
            )));
        };

        let samples: usize = fields[1].trim().parse().map_err(|_| {
            let raw = fields[1];
            Error::invalid_data(format!("History token {}: invalid samples: {raw}", idx + 1))
        })?;
        let avg = history_minutes(fields[2], idx, "average minutes")?;
        let baseline = history_minutes(fields[3], idx, "baseline minutes")?;
        let stats = PerformanceStats::new(samples, avg, baseline);

        history = match kind {
            "driver" => history.with_driver(key, stats),
            "zone" => history.with_zone(key, stats),
            other => {
                return Err(Error::invalid_data(format!(
                    "History token {}: unknown kind {other} (expected driver or zone)",
                    idx + 1
                )));
            }
        };
    }

    Ok(history)
}

fn history_minutes(raw: &str, idx: usize, what: &str) -> Result<f64> {
    match optional_number(raw, idx, what)? {
        Some(value) if value >= 0.0 => Ok(value),
        _ => Err(Error::invalid_data(format!(
            "History token {}: {what} must be a number >= 0: {raw}",
            idx + 1
        ))),
    }
}

fn optional_number(raw: &str, idx: usize, what: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: f64 = raw.parse().map_err(|_| {
        Error::invalid_data(format!("Token {}: invalid {what}: {raw}", idx + 1))
    })?;
    if !value.is_finite() {
        return Err(Error::invalid_data(format!(
            "Token {}: {what} must be finite: {raw}",
            idx + 1
        )));
    }
    Ok(Some(value))
}
