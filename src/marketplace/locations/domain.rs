use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::providers::ProfileId;

/// Identifier wrapper for service-area records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceAreaId(pub String);

/// Structured street address as captured from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub exterior_number: String,
    pub interior_number: Option<String>,
    pub neighborhood: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Round to two decimal places (~1 km) for the public projection.
    pub fn rounded(self) -> Self {
        Self {
            latitude: (self.latitude * 100.0).round() / 100.0,
            longitude: (self.longitude * 100.0).round() / 100.0,
        }
    }
}

/// Geometric zone a provider serves, tagged by shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceZone {
    Radius { radius_km: f64 },
    Polygon { points: Vec<Coordinates> },
}

/// Outcome of the most recent geocoding attempt. `Pending` is the reserved
/// pre-attempt placeholder for asynchronous backends; the synchronous flow
/// only ever produces `Success` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeocodingStatus {
    Pending,
    Success,
    Failed,
}

impl GeocodingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            GeocodingStatus::Pending => "PENDING",
            GeocodingStatus::Success => "SUCCESS",
            GeocodingStatus::Failed => "FAILED",
        }
    }
}

/// A provider's single service-area record. A record whose geocoding failed
/// keeps its address so the owner can retry by editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAreaRecord {
    pub id: ServiceAreaId,
    pub profile_id: ProfileId,
    pub address: Address,
    pub coordinates: Option<Coordinates>,
    pub normalized_address: Option<String>,
    pub timezone: Option<String>,
    pub geocoding_status: GeocodingStatus,
    pub zone: ServiceZone,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for authoring a service area: address plus zone, no geo fields.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewServiceArea {
    pub address: Address,
    pub zone: ServiceZone,
}

/// Partial update payload for a service area. Address fields patch
/// individually; the zone replaces as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceAreaPatch {
    pub street: Option<String>,
    pub exterior_number: Option<String>,
    pub interior_number: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub zone: Option<ServiceZone>,
}

impl ServiceAreaPatch {
    /// A patch re-triggers geocoding only when one of the resolvable address
    /// components actually differs from the stored value. Interior number,
    /// neighborhood, and country do not affect the geocode.
    pub fn address_changed(&self, current: &Address) -> bool {
        fn differs(patched: &Option<String>, stored: &str) -> bool {
            patched.as_deref().is_some_and(|value| value != stored)
        }

        differs(&self.street, &current.street)
            || differs(&self.exterior_number, &current.exterior_number)
            || differs(&self.city, &current.city)
            || differs(&self.state, &current.state)
            || differs(&self.postal_code, &current.postal_code)
    }

    /// Patch-over-current address used for re-geocoding and persistence.
    pub fn merged_address(&self, current: &Address) -> Address {
        Address {
            street: self.street.clone().unwrap_or_else(|| current.street.clone()),
            exterior_number: self
                .exterior_number
                .clone()
                .unwrap_or_else(|| current.exterior_number.clone()),
            interior_number: self
                .interior_number
                .clone()
                .or_else(|| current.interior_number.clone()),
            neighborhood: self
                .neighborhood
                .clone()
                .or_else(|| current.neighborhood.clone()),
            city: self.city.clone().unwrap_or_else(|| current.city.clone()),
            state: self.state.clone().unwrap_or_else(|| current.state.clone()),
            postal_code: self
                .postal_code
                .clone()
                .unwrap_or_else(|| current.postal_code.clone()),
            country: self
                .country
                .clone()
                .unwrap_or_else(|| current.country.clone()),
        }
    }
}

/// Full projection returned to the owner and to moderators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceAreaView {
    pub id: ServiceAreaId,
    pub profile_id: ProfileId,
    pub address: Address,
    pub coordinates: Option<Coordinates>,
    pub normalized_address: Option<String>,
    pub timezone: Option<String>,
    pub geocoding_status: GeocodingStatus,
    pub zone: ServiceZone,
}

impl ServiceAreaView {
    pub fn from_record(record: &ServiceAreaRecord) -> Self {
        Self {
            id: record.id.clone(),
            profile_id: record.profile_id.clone(),
            address: record.address.clone(),
            coordinates: record.coordinates,
            normalized_address: record.normalized_address.clone(),
            timezone: record.timezone.clone(),
            geocoding_status: record.geocoding_status,
            zone: record.zone.clone(),
        }
    }
}

/// Privacy-reduced projection for everyone else: coarse coordinates, no
/// street-level fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicServiceAreaView {
    pub city: String,
    pub state: String,
    pub coordinates: Option<Coordinates>,
    pub zone: ServiceZone,
}

impl PublicServiceAreaView {
    pub fn from_record(record: &ServiceAreaRecord) -> Self {
        Self {
            city: record.address.city.clone(),
            state: record.address.state.clone(),
            coordinates: record.coordinates.map(Coordinates::rounded),
            zone: record.zone.clone(),
        }
    }
}

/// Projection picked by the caller's relationship to the owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServiceAreaProjection {
    Full(ServiceAreaView),
    Public(PublicServiceAreaView),
}
