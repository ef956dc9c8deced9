//! Core domain services for a two-sided home services marketplace.
//!
//! The crate owns two workflows: the listing lifecycle (visibility state
//! machine, publication gating, moderation) and provider service-area
//! provisioning (geocoding with failure absorption, privacy-scoped reads).
//! Persistence engines, auth token verification, and UI live elsewhere and
//! reach this core only through the collaborator traits.

pub mod config;
pub mod error;
pub mod infra;
pub mod marketplace;
pub mod telemetry;
