//! Provider service areas: structured address, geocoding boundary, and the
//! provisioning service with privacy-scoped projections.

pub mod domain;
pub mod geocoding;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Address, Coordinates, GeocodingStatus, NewServiceArea, PublicServiceAreaView, ServiceAreaId,
    ServiceAreaPatch, ServiceAreaProjection, ServiceAreaRecord, ServiceAreaView, ServiceZone,
};
pub use geocoding::{GeocodedAddress, GeocodingError, GeocodingGateway};
pub use repository::{
    GeoOutcome, LocationRepository, LocationRepositoryError, ServiceAreaChanges, ServiceAreaCreate,
};
pub use router::location_router;
pub use service::{LocationService, LocationServiceError};
