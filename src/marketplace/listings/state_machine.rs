//! Visibility state machine for listings.
//!
//! Transition table (directed):
//!
//! ```text
//!     DRAFT ──────→ ACTIVE ←──────→ PAUSED
//!       ↑             ↓                ↓
//!       └─────────────┴────────────────┘
//!                     ↓
//!                 ARCHIVED (terminal)
//! ```
//!
//! DRAFT → ACTIVE is the only gated edge: it re-checks the publication
//! requirements. PAUSED → ACTIVE does not; a listing that was published once
//! is assumed to still satisfy baseline completeness.

use serde::Serialize;
use std::fmt;

use super::domain::{Listing, VisibilityStatus};
use crate::marketplace::authz;
use crate::marketplace::providers::ProviderProfile;

/// Allowed targets per current status. Self-transitions are legal everywhere
/// and handled separately in [`can_transition`].
const fn allowed_targets(from: VisibilityStatus) -> &'static [VisibilityStatus] {
    match from {
        VisibilityStatus::Draft => &[VisibilityStatus::Active, VisibilityStatus::Archived],
        VisibilityStatus::Active => &[
            VisibilityStatus::Paused,
            VisibilityStatus::Draft,
            VisibilityStatus::Archived,
        ],
        VisibilityStatus::Paused => &[
            VisibilityStatus::Active,
            VisibilityStatus::Draft,
            VisibilityStatus::Archived,
        ],
        VisibilityStatus::Archived => &[],
    }
}

/// True when the move is in the table or is an idempotent no-op.
pub fn can_transition(from: VisibilityStatus, to: VisibilityStatus) -> bool {
    if from == to {
        return true;
    }

    let mut targets = allowed_targets(from).iter();
    targets.any(|target| *target == to)
}

/// A single unmet publication condition. All conditions are independent and
/// collected together, never short-circuited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationViolation {
    ProviderUnverified,
    MissingTitle,
    MissingDescription,
    MissingCategory,
    NonPositivePrice,
    NonPositiveDuration,
}

impl PublicationViolation {
    pub const fn message(self) -> &'static str {
        match self {
            PublicationViolation::ProviderUnverified => {
                "provider must be verified to publish listings"
            }
            PublicationViolation::MissingTitle => "listing title is required",
            PublicationViolation::MissingDescription => "listing description is required",
            PublicationViolation::MissingCategory => "listing category is required",
            PublicationViolation::NonPositivePrice => "price must be greater than zero",
            PublicationViolation::NonPositiveDuration => {
                "duration must be greater than zero minutes"
            }
        }
    }
}

impl fmt::Display for PublicationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Collect every unmet condition for the DRAFT → ACTIVE edge.
pub fn validate_publication_requirements(
    listing: &Listing,
    profile: &ProviderProfile,
) -> Vec<PublicationViolation> {
    let mut violations = Vec::new();

    if !authz::can_publish(profile) {
        violations.push(PublicationViolation::ProviderUnverified);
    }
    if listing.title.trim().is_empty() {
        violations.push(PublicationViolation::MissingTitle);
    }
    if listing.description.trim().is_empty() {
        violations.push(PublicationViolation::MissingDescription);
    }
    if listing.category_id.0.trim().is_empty() {
        violations.push(PublicationViolation::MissingCategory);
    }
    if listing.price_cents == 0 {
        violations.push(PublicationViolation::NonPositivePrice);
    }
    if listing.duration_minutes == 0 {
        violations.push(PublicationViolation::NonPositiveDuration);
    }

    violations
}

/// Rejection raised when a transition cannot proceed.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("transition from {} to {} is not allowed", from.label(), to.label())]
    InvalidTransition {
        from: VisibilityStatus,
        to: VisibilityStatus,
    },
    #[error("publication requirements not met ({} violations)", violations.len())]
    RequirementsNotMet {
        violations: Vec<PublicationViolation>,
    },
}

/// Validate a transition without mutating or persisting anything. The caller
/// commits the new status and stamps `last_published_at` when the target is
/// ACTIVE.
pub fn transition_to(
    listing: &Listing,
    target: VisibilityStatus,
    profile: &ProviderProfile,
) -> Result<(), TransitionError> {
    let current = listing.visibility_status;

    if !can_transition(current, target) {
        return Err(TransitionError::InvalidTransition {
            from: current,
            to: target,
        });
    }

    if current == VisibilityStatus::Draft && target == VisibilityStatus::Active {
        let violations = validate_publication_requirements(listing, profile);
        if !violations.is_empty() {
            return Err(TransitionError::RequirementsNotMet { violations });
        }
    }

    Ok(())
}
