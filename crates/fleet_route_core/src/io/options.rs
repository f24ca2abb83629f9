use std::{env, path::Path};

use fleet_route_derive::{CliOptions, CliValue, KvDisplay};
use log::LevelFilter;

use crate::{
    Error, Result,
    model::{DriverId, Vehicle, VehicleId, Weekday},
};

/// Engine configuration: clustering, timing, rebalancing and logging knobs.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct EngineOptions {
    /// Neighborhood radius for density clustering, in kilometres.
    #[cli(long = "cluster-radius")]
    pub cluster_radius_km: f64,
    /// Neighbors a delivery needs before it can seed or grow a cluster.
    #[cli(long = "min-neighbors")]
    pub min_neighbors: usize,
    /// Fixed zone count; 0 plans with density clustering instead.
    #[cli(long = "zones")]
    pub zones: usize,
    /// Iteration cap for fixed-zone partitioning.
    #[cli(long = "zone-max-iterations")]
    pub zone_max_iterations: usize,
    /// Centroid movement in kilometres under which zoning stops early.
    #[cli(long = "zone-convergence")]
    pub zone_convergence_km: f64,
    /// Seed for picking the initial zone centroids.
    #[cli(long = "zone-seed")]
    pub zone_seed: u64,
    /// Unadjusted driving speed in km/h.
    #[cli(long = "base-speed")]
    pub base_speed_kmh: f64,
    /// Handling time added per stop, in minutes.
    #[cli(long = "stop-minutes")]
    pub minutes_per_stop: f64,
    /// Fixed estimate for single-delivery routes, in minutes.
    #[cli(long = "isolated-route-minutes")]
    pub isolated_route_minutes: f64,
    /// Utilization points away from the fleet mean that count as imbalance.
    #[cli(long = "imbalance-threshold")]
    pub imbalance_threshold_pct: f64,
    /// Utilization percent under which a vehicle counts as under-used.
    #[cli(long = "underutilization-threshold")]
    pub underutilization_pct: f64,
    /// Extra kilograms moved off an overloaded vehicle beyond its excess.
    #[cli(long = "overload-margin")]
    pub overload_margin_kg: f64,
    /// Departure hour (0-23) used for duration predictions.
    #[cli(long = "departure-hour")]
    pub departure_hour: u32,
    /// Departure weekday used for duration predictions.
    #[cli(long = "departure-day", parse_with = "Weekday::parse")]
    pub departure_day: Weekday,
    /// Fleet as comma separated `id:capacity_kg[:label]` entries.
    #[cli(long = "fleet", parse_with = "parse_fleet")]
    #[kv(fmt = "len")]
    pub fleet: Vec<Vehicle>,
    /// Driver ids in fleet order, comma separated.
    #[cli(long = "drivers", parse_with = "parse_drivers")]
    #[kv(fmt = "len")]
    pub drivers: Vec<DriverId>,
    /// Logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Log file path. Empty means stderr.
    #[cli(long = "log-output")]
    pub log_output: String,
    /// Delivery input file path. Empty means stdin.
    #[cli(long = "input")]
    pub input: String,
    /// Driver and zone history file. Empty means no history.
    #[cli(long = "history")]
    pub history: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cluster_radius_km: 2.0,
            min_neighbors: 2,
            zones: 0,
            zone_max_iterations: 10,
            zone_convergence_km: 0.001,
            zone_seed: 42,
            base_speed_kmh: 40.0,
            minutes_per_stop: 10.0,
            isolated_route_minutes: 30.0,
            imbalance_threshold_pct: 20.0,
            underutilization_pct: 50.0,
            overload_margin_kg: 10.0,
            departure_hour: 8,
            departure_day: Weekday::Monday,
            fleet: Vec::new(),
            drivers: Vec::new(),
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            history: String::new(),
        }
    }
}

impl EngineOptions {
    pub fn from_args() -> Result<Self> {
        let options = Self::parse_from_iter(env::args().skip(1))?;
        options.validate()?;
        Ok(options)
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--").filter(|n| !n.is_empty()) else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if options.apply_cli_option(&name, value.clone())? {
                continue;
            }

            match name.as_str() {
                "log-timestamp" => {
                    options.log_timestamp = match value {
                        Some(v) => parse_bool(&name, &v)?,
                        None => true,
                    };
                }
                "no-log-timestamp" => {
                    if value.is_some() {
                        return Err(Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    options.log_timestamp = false;
                }
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.cluster_radius_km.is_finite() && self.cluster_radius_km > 0.0) {
            return Err(Error::invalid_input("cluster_radius_km must be > 0"));
        }
        if !(self.base_speed_kmh.is_finite() && self.base_speed_kmh > 0.0) {
            return Err(Error::invalid_input("base_speed_kmh must be > 0"));
        }
        if self.minutes_per_stop < 0.0 || self.isolated_route_minutes < 0.0 {
            return Err(Error::invalid_input("stop and route minutes must be >= 0"));
        }
        if self.zone_max_iterations == 0 {
            return Err(Error::invalid_input("zone_max_iterations must be > 0"));
        }
        if self.departure_hour > 23 {
            return Err(Error::invalid_input("departure_hour must be in 0..=23"));
        }
        Ok(())
    }

    pub fn usage() -> String {
        format!(
            concat!(
                "Usage:\n",
                "  fleet-route --fleet V1:500,V2:800 [options] < deliveries.txt\n",
                "  fleet-route --fleet V1:500 --input deliveries.txt --zones 4\n\n",
                "Deliveries are whitespace separated `id,weight_kg,lat,lon` tokens.\n",
                "Empty weight or coordinate fields default to 0.\n",
                "History lines are `driver:<id>,samples,avg_minutes,baseline_minutes`\n",
                "or `zone:<id>,...`; `--drivers` pairs driver ids with fleet order.\n\n",
                "Options:\n",
                "{}\n",
                "  --log-timestamp[=<bool>]\n",
                "  --no-log-timestamp\n",
                "  --help\n",
            ),
            Self::cli_usage()
        )
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_empty_path(&self.log_output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_empty_path(&self.input)
    }

    pub fn history_path(&self) -> Option<&Path> {
        non_empty_path(&self.history)
    }
}

fn non_empty_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}

pub(crate) fn parse_fleet(raw: &str) -> Result<Vec<Vehicle>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            let id = parts.next().unwrap_or_default().trim();
            let capacity = parts.next().ok_or_else(|| {
                Error::invalid_input(format!("Fleet entry {entry}: expected id:capacity_kg"))
            })?;
            let label = parts.next().unwrap_or(id);

            let capacity_kg: f64 = capacity.trim().parse().map_err(|_| {
                Error::invalid_input(format!("Fleet entry {entry}: invalid capacity {capacity}"))
            })?;
            if id.is_empty() || !(capacity_kg.is_finite() && capacity_kg > 0.0) {
                return Err(Error::invalid_input(format!(
                    "Fleet entry {entry}: id must be set and capacity must be > 0"
                )));
            }

            Ok(Vehicle::new(
                VehicleId::from(id),
                capacity_kg,
                label.to_string(),
            ))
        })
        .collect()
}

pub(crate) fn parse_drivers(raw: &str) -> Result<Vec<DriverId>> {
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(DriverId::from)
        .collect())
}
