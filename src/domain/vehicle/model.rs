//! Vehicle domain entity

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Vehicle classification recognised by the toll system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleType {
    Car,
    Motorbike,
    Tractor,
    Emergency,
    Diplomat,
    Foreign,
    Military,
}

impl VehicleType {
    /// Whether the type never accrues a fee, regardless of date and time
    pub fn is_toll_exempt(&self) -> bool {
        matches!(
            self,
            Self::Motorbike
                | Self::Tractor
                | Self::Emergency
                | Self::Diplomat
                | Self::Foreign
                | Self::Military
        )
    }

    /// Whether the passage registry accepts the type
    pub fn is_registrable(&self) -> bool {
        matches!(self, Self::Car | Self::Motorbike)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Motorbike => "Motorbike",
            Self::Tractor => "Tractor",
            Self::Emergency => "Emergency",
            Self::Diplomat => "Diplomat",
            Self::Foreign => "Foreign",
            Self::Military => "Military",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Car" => Some(Self::Car),
            "Motorbike" => Some(Self::Motorbike),
            "Tractor" => Some(Self::Tractor),
            "Emergency" => Some(Self::Emergency),
            "Diplomat" => Some(Self::Diplomat),
            "Foreign" => Some(Self::Foreign),
            "Military" => Some(Self::Military),
            _ => None,
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A vehicle identified by license number and type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub license_number: String,
    pub vehicle_type: VehicleType,
}

impl Vehicle {
    pub fn new(license_number: impl Into<String>, vehicle_type: VehicleType) -> Self {
        Self {
            license_number: license_number.into(),
            vehicle_type,
        }
    }

    /// Build a vehicle on the registration path. Only registrable types
    /// are accepted here; the other types are reachable through the
    /// rule engine directly.
    pub fn registrable(
        license_number: impl Into<String>,
        vehicle_type: VehicleType,
    ) -> DomainResult<Self> {
        if !vehicle_type.is_registrable() {
            return Err(DomainError::UnsupportedVehicleType(vehicle_type));
        }
        Ok(Self::new(license_number, vehicle_type))
    }
}

// ── Tests ──────────────────────────────────────────────────────
