//! Listing lifecycle: domain types, visibility state machine, and the
//! orchestrating service with its storage boundary.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod state_machine;

#[cfg(test)]
mod tests;

pub use domain::{
    CategoryId, ImageRef, Listing, ListingId, ListingPatch, NewListing, VisibilityStatus,
};
pub use repository::{ListingRepository, ListingSummaryView, RepositoryError};
pub use router::listing_router;
pub use service::{ListingService, ListingServiceError};
pub use state_machine::{
    can_transition, transition_to, validate_publication_requirements, PublicationViolation,
    TransitionError,
};
