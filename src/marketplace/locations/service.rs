use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    Address, GeocodingStatus, NewServiceArea, PublicServiceAreaView, ServiceAreaPatch,
    ServiceAreaProjection, ServiceAreaRecord, ServiceAreaView,
};
use super::geocoding::GeocodingGateway;
use super::repository::{
    GeoOutcome, LocationRepository, LocationRepositoryError, ServiceAreaChanges, ServiceAreaCreate,
};
use crate::marketplace::authz;
use crate::marketplace::providers::{
    ActorRole, DirectoryError, ProfileId, ProviderDirectory, ProviderProfile, UserId,
};

/// Provisions and maintains a provider's single service-area record:
/// authorization, conditional geocoding, and privacy-scoped reads.
pub struct LocationService<L, P, G> {
    repository: Arc<L>,
    directory: Arc<P>,
    geocoder: Arc<G>,
}

impl<L, P, G> LocationService<L, P, G>
where
    L: LocationRepository + 'static,
    P: ProviderDirectory + 'static,
    G: GeocodingGateway + 'static,
{
    pub fn new(repository: Arc<L>, directory: Arc<P>, geocoder: Arc<G>) -> Self {
        Self {
            repository,
            directory,
            geocoder,
        }
    }

    /// Author the service area. Only the owner of a still-unverified profile
    /// may do this, exactly once. Geocoding failure is absorbed into the
    /// persisted record; a row is always written.
    pub fn create(
        &self,
        profile_id: &ProfileId,
        data: NewServiceArea,
        caller: &UserId,
    ) -> Result<ServiceAreaRecord, LocationServiceError> {
        let profile = self.require_profile(profile_id)?;

        if !authz::is_owner(&profile.user_id, caller) {
            return Err(LocationServiceError::Unauthorized);
        }

        if profile.verified {
            return Err(LocationServiceError::VerifiedProfileLocked);
        }

        if self.repository.find_by_profile(profile_id)?.is_some() {
            return Err(LocationServiceError::AlreadyExists);
        }

        let geo = self.attempt_geocode(profile_id, &data.address);

        let record = self.repository.create(ServiceAreaCreate {
            profile_id: profile_id.clone(),
            data,
            geo,
        })?;

        info!(
            profile = %profile_id.0,
            geocoding = record.geocoding_status.label(),
            "service area created"
        );
        Ok(record)
    }

    /// Apply a partial update. Re-geocodes only when a resolvable address
    /// field actually changed; zone-only edits never touch the geocoder.
    /// Once the profile is verified, only a moderator may proceed.
    pub fn update(
        &self,
        profile_id: &ProfileId,
        patch: ServiceAreaPatch,
        caller: &UserId,
        role: ActorRole,
    ) -> Result<ServiceAreaRecord, LocationServiceError> {
        let profile = self.require_profile(profile_id)?;

        let is_owner = authz::is_owner(&profile.user_id, caller);
        let is_moderator = authz::can_moderate(role);

        if !is_owner && !is_moderator {
            return Err(LocationServiceError::Unauthorized);
        }

        if profile.verified && !is_moderator {
            return Err(LocationServiceError::VerifiedProfileLocked);
        }

        let current = self
            .repository
            .find_by_profile(profile_id)?
            .ok_or(LocationServiceError::NotFound)?;

        let merged = patch.merged_address(&current.address);
        let geo = if patch.address_changed(&current.address) {
            Some(self.attempt_geocode(profile_id, &merged))
        } else {
            None
        };

        let changes = ServiceAreaChanges {
            address: Some(merged),
            geo,
            zone: patch.zone,
        };

        Ok(self.repository.update(profile_id, changes)?)
    }

    /// Read with a projection chosen by the caller's relationship to the
    /// owner: full record for owner/moderator, coarse public view otherwise.
    pub fn get(
        &self,
        profile_id: &ProfileId,
        caller: &UserId,
        role: ActorRole,
    ) -> Result<ServiceAreaProjection, LocationServiceError> {
        let profile = self.require_profile(profile_id)?;

        let record = self
            .repository
            .find_by_profile(profile_id)?
            .ok_or(LocationServiceError::NotFound)?;

        if authz::is_owner(&profile.user_id, caller) || authz::can_moderate(role) {
            Ok(ServiceAreaProjection::Full(ServiceAreaView::from_record(
                &record,
            )))
        } else {
            Ok(ServiceAreaProjection::Public(
                PublicServiceAreaView::from_record(&record),
            ))
        }
    }

    /// Explicit removal, owner or moderator only.
    pub fn delete(
        &self,
        profile_id: &ProfileId,
        caller: &UserId,
        role: ActorRole,
    ) -> Result<(), LocationServiceError> {
        let profile = self.require_profile(profile_id)?;

        if !authz::is_owner(&profile.user_id, caller) && !authz::can_moderate(role) {
            return Err(LocationServiceError::Unauthorized);
        }

        match self.repository.delete(profile_id) {
            Ok(()) => {
                info!(profile = %profile_id.0, "service area deleted");
                Ok(())
            }
            Err(LocationRepositoryError::NotFound) => Err(LocationServiceError::NotFound),
            Err(other) => Err(other.into()),
        }
    }

    /// Run the geocoder and capture the outcome as data. Every gateway error
    /// downgrades to a FAILED status with null geo fields; the provider's
    /// workflow is never blocked by a third-party outage.
    fn attempt_geocode(&self, profile_id: &ProfileId, address: &Address) -> GeoOutcome {
        match self.geocoder.geocode(address) {
            Ok(result) => GeoOutcome {
                coordinates: Some(super::domain::Coordinates {
                    latitude: result.latitude,
                    longitude: result.longitude,
                }),
                normalized_address: Some(result.normalized_address),
                timezone: Some(result.timezone),
                status: GeocodingStatus::Success,
            },
            Err(error) => {
                warn!(
                    profile = %profile_id.0,
                    error = %error,
                    "geocoding failed, persisting record with FAILED status"
                );
                GeoOutcome::failed()
            }
        }
    }

    fn require_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<ProviderProfile, LocationServiceError> {
        self.directory
            .find_by_id(profile_id)?
            .ok_or(LocationServiceError::ProfileNotFound)
    }
}

/// Error raised by the location provisioning service. Geocoding failures are
/// deliberately absent: they become persisted state, never errors.
#[derive(Debug, thiserror::Error)]
pub enum LocationServiceError {
    #[error("provider profile not found")]
    ProfileNotFound,
    #[error("service area record not found")]
    NotFound,
    #[error("a service area record already exists for this profile")]
    AlreadyExists,
    #[error("caller is not allowed to perform this action")]
    Unauthorized,
    #[error("a verified profile's service area can only be edited by a moderator")]
    VerifiedProfileLocked,
    #[error(transparent)]
    Repository(#[from] LocationRepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
