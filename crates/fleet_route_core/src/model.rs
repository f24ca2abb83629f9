use std::fmt;

use fleet_route_derive::{CliValue, New};

use crate::geo::GeoPoint;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Upstream identifier of a pending delivery.
    DeliveryId
);
string_id!(VehicleId);
string_id!(DriverId);
string_id!(
    /// Delivery zone key used for historical duration lookups.
    ZoneId
);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, CliValue)]
#[cli_value(option = "departure-day")]
pub enum Weekday {
    #[cli(alias = "mon")]
    Monday,
    #[cli(alias = "tue")]
    Tuesday,
    #[cli(alias = "wed")]
    Wednesday,
    #[cli(alias = "thu")]
    Thursday,
    #[cli(alias = "fri")]
    Friday,
    #[cli(alias = "sat")]
    Saturday,
    #[cli(alias = "sun")]
    Sunday,
}

impl Weekday {
    pub fn is_weekend(self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub id: DeliveryId,
    pub weight_kg: f64,
    pub point: GeoPoint,
}

impl Delivery {
    pub fn new(id: impl Into<DeliveryId>, weight_kg: f64, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            weight_kg,
            point: GeoPoint::new(lat, lon),
        }
    }

    /// Missing weight counts as 0 kg and missing coordinates as (0, 0). Upstream
    /// validation owns rejecting incomplete records.
    pub fn from_raw(
        id: impl Into<DeliveryId>,
        weight_kg: Option<f64>,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Self {
        Self::new(
            id,
            weight_kg.unwrap_or(0.0),
            lat.unwrap_or(0.0),
            lon.unwrap_or(0.0),
        )
    }
}

#[derive(Clone, Debug, PartialEq, New)]
pub struct Vehicle {
    pub id: VehicleId,
    pub capacity_kg: f64,
    pub label: String,
}

impl Vehicle {
    pub fn utilization_percent(&self, load_kg: f64) -> f64 {
        if self.capacity_kg <= 0.0 {
            return 0.0;
        }
        load_kg / self.capacity_kg * 100.0
    }
}

pub(crate) fn total_weight<'a, I>(deliveries: I) -> f64
where
    I: IntoIterator<Item = &'a Delivery>,
{
    deliveries.into_iter().map(|d| d.weight_kg).sum()
}
