use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Listing, ListingId, ListingPatch, NewListing, VisibilityStatus};
use super::repository::{ListingRepository, RepositoryError};
use super::state_machine::{self, TransitionError};
use crate::marketplace::audit::{AuditEvent, AuditSink};
use crate::marketplace::authz;
use crate::marketplace::providers::{
    ActorRole, DirectoryError, ProviderDirectory, ProviderProfile, UserId,
};

/// Orchestrates authorization, the visibility state machine, and persistence
/// for listing lifecycle operations. Collaborators are injected at
/// construction; the service holds no other state.
pub struct ListingService<R, P, A> {
    repository: Arc<R>,
    directory: Arc<P>,
    audit: Arc<A>,
}

impl<R, P, A> ListingService<R, P, A>
where
    R: ListingRepository + 'static,
    P: ProviderDirectory + 'static,
    A: AuditSink + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<P>, audit: Arc<A>) -> Self {
        Self {
            repository,
            directory,
            audit,
        }
    }

    /// Create a listing in DRAFT for the calling provider. The owner must
    /// already have a provider profile; the repository assigns identity.
    pub fn create(&self, data: NewListing, owner: &UserId) -> Result<Listing, ListingServiceError> {
        let profile = self
            .directory
            .find_by_user_id(owner)?
            .ok_or(ListingServiceError::ProfileNotFound)?;

        let listing = self.repository.create(data, &profile.user_id)?;
        info!(listing = %listing.id.0, owner = %owner.0, "listing created as draft");
        Ok(listing)
    }

    /// Fetch a listing honoring visibility rules. Absent and invisible
    /// listings both come back as `None` so callers can render a generic 404.
    pub fn get(
        &self,
        id: &ListingId,
        caller: Option<&UserId>,
        role: Option<ActorRole>,
    ) -> Result<Option<Listing>, ListingServiceError> {
        let Some(listing) = self.repository.find_by_id(id)? else {
            return Ok(None);
        };

        if role.is_some_and(authz::can_moderate) {
            return Ok(Some(listing));
        }

        if caller.is_some_and(|caller| authz::is_owner(&listing.owner_id, caller)) {
            return Ok(Some(listing));
        }

        if listing.visibility_status != VisibilityStatus::Active {
            return Ok(None);
        }

        Ok(Some(listing))
    }

    /// All of an owner's listings regardless of status, optionally filtered.
    pub fn list_for_owner(
        &self,
        owner: &UserId,
        status: Option<VisibilityStatus>,
    ) -> Result<Vec<Listing>, ListingServiceError> {
        Ok(self.repository.find_by_owner(owner, status)?)
    }

    /// Apply a partial patch. Archived listings are immutable and updates
    /// never change visibility status.
    pub fn update(
        &self,
        id: &ListingId,
        patch: &ListingPatch,
        caller: &UserId,
    ) -> Result<Listing, ListingServiceError> {
        let listing = self.require_listing(id)?;

        if !authz::is_owner(&listing.owner_id, caller) {
            return Err(ListingServiceError::Unauthorized);
        }

        if listing.is_archived() {
            return Err(TransitionError::InvalidTransition {
                from: VisibilityStatus::Archived,
                to: VisibilityStatus::Archived,
            }
            .into());
        }

        Ok(self.repository.update(id, patch)?)
    }

    /// DRAFT/PAUSED → ACTIVE by the owner. Persisting ACTIVE stamps
    /// `last_published_at` inside the repository.
    pub fn publish(&self, id: &ListingId, caller: &UserId) -> Result<Listing, ListingServiceError> {
        self.owner_transition(id, caller, VisibilityStatus::Active)
    }

    /// ACTIVE → PAUSED by the owner.
    pub fn pause(&self, id: &ListingId, caller: &UserId) -> Result<Listing, ListingServiceError> {
        self.owner_transition(id, caller, VisibilityStatus::Paused)
    }

    /// Soft delete: any status → ARCHIVED, idempotent. The record is never
    /// physically removed.
    pub fn archive(&self, id: &ListingId, caller: &UserId) -> Result<Listing, ListingServiceError> {
        self.owner_transition(id, caller, VisibilityStatus::Archived)
    }

    /// Moderator override: force ACTIVE → PAUSED and record the action.
    pub fn admin_pause(
        &self,
        id: &ListingId,
        moderator: &UserId,
        role: ActorRole,
    ) -> Result<Listing, ListingServiceError> {
        self.moderator_transition(id, moderator, role, VisibilityStatus::Paused)
    }

    /// Moderator override: reinstate PAUSED → ACTIVE and record the action.
    pub fn admin_activate(
        &self,
        id: &ListingId,
        moderator: &UserId,
        role: ActorRole,
    ) -> Result<Listing, ListingServiceError> {
        self.moderator_transition(id, moderator, role, VisibilityStatus::Active)
    }

    fn owner_transition(
        &self,
        id: &ListingId,
        caller: &UserId,
        target: VisibilityStatus,
    ) -> Result<Listing, ListingServiceError> {
        let listing = self.require_listing(id)?;

        if !authz::is_owner(&listing.owner_id, caller) {
            return Err(ListingServiceError::Unauthorized);
        }

        let profile = self.owning_profile(&listing)?;
        self.commit_transition(&listing, target, &profile)
    }

    fn moderator_transition(
        &self,
        id: &ListingId,
        moderator: &UserId,
        role: ActorRole,
        target: VisibilityStatus,
    ) -> Result<Listing, ListingServiceError> {
        if !authz::can_moderate(role) {
            return Err(ListingServiceError::Unauthorized);
        }

        let listing = self.require_listing(id)?;
        let profile = self.owning_profile(&listing)?;
        let previous = listing.visibility_status;
        let updated = self.commit_transition(&listing, target, &profile)?;

        self.audit.record(AuditEvent {
            actor: moderator.clone(),
            subject: updated.id.clone(),
            previous_status: previous,
            new_status: updated.visibility_status,
            occurred_at: Utc::now(),
        });

        Ok(updated)
    }

    /// Validate against the state machine, then persist with a conditional
    /// write keyed on the status we validated. A concurrent transition shows
    /// up as `RepositoryError::StaleStatus` instead of clobbering it.
    fn commit_transition(
        &self,
        listing: &Listing,
        target: VisibilityStatus,
        profile: &ProviderProfile,
    ) -> Result<Listing, ListingServiceError> {
        state_machine::transition_to(listing, target, profile)?;

        let updated =
            self.repository
                .update_visibility(&listing.id, listing.visibility_status, target)?;

        info!(
            listing = %updated.id.0,
            from = listing.visibility_status.label(),
            to = updated.visibility_status.label(),
            "listing visibility changed"
        );
        Ok(updated)
    }

    fn require_listing(&self, id: &ListingId) -> Result<Listing, ListingServiceError> {
        self.repository
            .find_by_id(id)?
            .ok_or(ListingServiceError::NotFound)
    }

    fn owning_profile(&self, listing: &Listing) -> Result<ProviderProfile, ListingServiceError> {
        self.directory
            .find_by_user_id(&listing.owner_id)?
            .ok_or(ListingServiceError::ProfileNotFound)
    }
}

/// Error raised by the listing lifecycle service. Every variant maps 1:1 to
/// a stable caller-visible kind.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error("listing not found")]
    NotFound,
    #[error("provider profile not found")]
    ProfileNotFound,
    #[error("caller is not allowed to perform this action")]
    Unauthorized,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
