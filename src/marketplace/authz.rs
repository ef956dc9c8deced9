//! Pure authorization predicates. No other module re-implements ownership
//! logic; everything below is side-effect free.

use super::listings::domain::Listing;
use super::providers::{ActorRole, ProviderProfile, UserId};

/// The caller is the owner of the resource.
pub fn is_owner(resource_owner: &UserId, caller: &UserId) -> bool {
    resource_owner == caller
}

/// A provider may publish listings only while verified. An absent profile is
/// never treated as permission; callers must resolve the profile first.
pub fn can_publish(profile: &ProviderProfile) -> bool {
    profile.verified
}

/// Moderators may override ownership restrictions.
pub fn can_moderate(role: ActorRole) -> bool {
    role == ActorRole::Moderator
}

/// A listing is editable by its owning provider or by a moderator.
pub fn can_edit_listing(listing: &Listing, caller: &UserId, role: ActorRole) -> bool {
    can_moderate(role) || is_owner(&listing.owner_id, caller)
}
