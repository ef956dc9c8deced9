//! Marketplace domain services: listing lifecycle and provider service areas.

pub mod audit;
pub mod authz;
pub mod listings;
pub mod locations;
pub mod providers;

pub use audit::{AuditEvent, AuditSink, TracingAuditSink};
pub use providers::{
    ActorRole, DirectoryError, ProfileId, ProviderDirectory, ProviderProfile, UserId,
};
