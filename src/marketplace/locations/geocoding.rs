use super::domain::Address;

/// Successful geocoder response.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    pub latitude: f64,
    pub longitude: f64,
    pub normalized_address: String,
    pub timezone: String,
}

/// Boundary to the external geocoder. Implementations wrap whatever vendor
/// API the deployment uses; the core only sees this contract.
pub trait GeocodingGateway: Send + Sync {
    fn geocode(&self, address: &Address) -> Result<GeocodedAddress, GeocodingError>;
}

/// The three failure modes of the geocoder. None of them surfaces to the
/// caller of create/update; the provisioning service converts all of them
/// into a FAILED status field.
#[derive(Debug, thiserror::Error)]
pub enum GeocodingError {
    #[error("geocoding request timed out")]
    Timeout,
    #[error("address could not be interpreted by the geocoder")]
    InvalidAddressFormat,
    #[error("geocoding service unavailable: {0}")]
    Unavailable(String),
}
