use super::domain::{
    Address, GeocodingStatus, NewServiceArea, ServiceAreaRecord, ServiceZone,
};
use crate::marketplace::providers::ProfileId;

/// Geo fields written together as the outcome of one geocoding attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoOutcome {
    pub coordinates: Option<super::domain::Coordinates>,
    pub normalized_address: Option<String>,
    pub timezone: Option<String>,
    pub status: GeocodingStatus,
}

impl GeoOutcome {
    pub fn failed() -> Self {
        Self {
            coordinates: None,
            normalized_address: None,
            timezone: None,
            status: GeocodingStatus::Failed,
        }
    }
}

/// Payload for creating the one-per-profile record.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceAreaCreate {
    pub profile_id: ProfileId,
    pub data: NewServiceArea,
    pub geo: GeoOutcome,
}

/// Changes applied on update. `address` is the already-merged address;
/// `geo` is present only when geocoding re-ran.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceAreaChanges {
    pub address: Option<Address>,
    pub geo: Option<GeoOutcome>,
    pub zone: Option<ServiceZone>,
}

/// Storage abstraction for service-area records. Uniqueness per profile is
/// enforced here: `create` fails with [`LocationRepositoryError::Conflict`]
/// when a record already exists for the profile.
pub trait LocationRepository: Send + Sync {
    fn find_by_profile(
        &self,
        profile: &ProfileId,
    ) -> Result<Option<ServiceAreaRecord>, LocationRepositoryError>;
    fn create(&self, data: ServiceAreaCreate)
        -> Result<ServiceAreaRecord, LocationRepositoryError>;
    fn update(
        &self,
        profile: &ProfileId,
        changes: ServiceAreaChanges,
    ) -> Result<ServiceAreaRecord, LocationRepositoryError>;
    fn delete(&self, profile: &ProfileId) -> Result<(), LocationRepositoryError>;
}

/// Error enumeration for service-area storage failures.
#[derive(Debug, thiserror::Error)]
pub enum LocationRepositoryError {
    #[error("service area record not found")]
    NotFound,
    #[error("a service area record already exists for this profile")]
    Conflict,
    #[error("location store unavailable: {0}")]
    Unavailable(String),
}
