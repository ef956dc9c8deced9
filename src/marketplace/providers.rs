use serde::{Deserialize, Serialize};

/// Identifier wrapper for authenticated users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for provider profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// Role of the caller as established by the (out-of-scope) auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    Client,
    Provider,
    Moderator,
}

impl ActorRole {
    pub const fn label(self) -> &'static str {
        match self {
            ActorRole::Client => "CLIENT",
            ActorRole::Provider => "PROVIDER",
            ActorRole::Moderator => "MODERATOR",
        }
    }
}

/// Vetted-identity record for a service provider. `verified` gates listing
/// publication and freezes self-service edits of the service area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub verified: bool,
}

/// Lookup abstraction over provider profiles, owned by the persistence layer.
pub trait ProviderDirectory: Send + Sync {
    fn find_by_id(&self, id: &ProfileId) -> Result<Option<ProviderProfile>, DirectoryError>;
    fn find_by_user_id(&self, user_id: &UserId)
        -> Result<Option<ProviderProfile>, DirectoryError>;
}

/// Failure to reach the profile store.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("provider directory unavailable: {0}")]
    Unavailable(String),
}
