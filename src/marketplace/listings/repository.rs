use serde::Serialize;

use super::domain::{Listing, ListingId, ListingPatch, NewListing, VisibilityStatus};
use crate::marketplace::providers::UserId;

/// Storage abstraction for listings so the service layer can be exercised in
/// isolation.
///
/// Contract notes:
/// - `create` assigns identity and stores the record as a DRAFT with no
///   publish timestamp.
/// - `update_visibility` is a compare-and-swap: it fails with
///   [`RepositoryError::StaleStatus`] unless the stored status still equals
///   `expected`, closing the fetch-then-write gap between concurrent
///   transition requests. It stamps `last_published_at` iff `next` is ACTIVE.
pub trait ListingRepository: Send + Sync {
    fn create(&self, data: NewListing, owner: &UserId) -> Result<Listing, RepositoryError>;
    fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError>;
    fn find_by_owner(
        &self,
        owner: &UserId,
        status: Option<VisibilityStatus>,
    ) -> Result<Vec<Listing>, RepositoryError>;
    fn update(&self, id: &ListingId, patch: &ListingPatch) -> Result<Listing, RepositoryError>;
    fn update_visibility(
        &self,
        id: &ListingId,
        expected: VisibilityStatus,
        next: VisibilityStatus,
    ) -> Result<Listing, RepositoryError>;
}

/// Error enumeration for listing storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("listing not found")]
    NotFound,
    #[error("listing status changed concurrently (stored {}, expected {})", stored.label(), expected.label())]
    StaleStatus {
        stored: VisibilityStatus,
        expected: VisibilityStatus,
    },
    #[error("listing store unavailable: {0}")]
    Unavailable(String),
}

/// Serialized representation returned by the HTTP boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ListingSummaryView {
    pub id: ListingId,
    pub title: String,
    pub status: &'static str,
    pub price_cents: u32,
    pub duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_published_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ListingSummaryView {
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            id: listing.id.clone(),
            title: listing.title.clone(),
            status: listing.visibility_status.label(),
            price_cents: listing.price_cents,
            duration_minutes: listing.duration_minutes,
            last_published_at: listing.last_published_at,
        }
    }
}
