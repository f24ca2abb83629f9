use std::fmt;

use fleet_route_derive::New;

use crate::model::VehicleId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    NoVehicleAvailable,
    Overload,
    Imbalance,
    Underutilization,
}

impl ProblemKind {
    /// Stable code shared with the persistence and reporting layers.
    pub fn code(self) -> &'static str {
        match self {
            Self::NoVehicleAvailable => "SIN_VEHICULO_DISPONIBLE",
            Self::Overload => "SOBRECARGA",
            Self::Imbalance => "DESBALANCE",
            Self::Underutilization => "SUBUTILIZACION",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::NoVehicleAvailable => Severity::High,
            Self::Overload => Severity::Critical,
            Self::Imbalance => Severity::Medium,
            Self::Underutilization => Severity::Low,
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A business condition found while planning. Never an error.
#[derive(Clone, Debug, PartialEq, New)]
pub struct Problem {
    pub kind: ProblemKind,
    pub severity: Severity,
    pub message: String,
    pub vehicle_id: Option<VehicleId>,
    pub route_id: Option<usize>,
    pub excess_kg: Option<f64>,
    pub spare_kg: Option<f64>,
    pub utilization_percent: Option<f64>,
}

impl Problem {
    pub fn of_kind(kind: ProblemKind, message: impl Into<String>) -> Self {
        Self::new(kind, kind.severity(), message.into())
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::{Problem, ProblemKind, Severity};
    use crate::model::VehicleId;

    #[test]
    fn severities_order_from_low_to_critical() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn of_kind_uses_default_severity_and_empty_details() {
        let p = Problem::of_kind(ProblemKind::NoVehicleAvailable, "route 3 has no vehicle")
            .with_route_id(3);
        assert_eq!(p.severity, Severity::High);
        assert_eq!(p.kind.code(), "SIN_VEHICULO_DISPONIBLE");
        assert_eq!(p.route_id, Some(3));
        assert!(p.vehicle_id.is_none());
        assert!(p.excess_kg.is_none());
    }

    #[test]
    fn display_includes_severity_and_code() {
        let p = Problem::of_kind(ProblemKind::Overload, "over by 12 kg")
            .with_vehicle_id(VehicleId::from("V-1"));
        assert_eq!(p.to_string(), "[CRITICAL] SOBRECARGA: over by 12 kg");
    }
}
