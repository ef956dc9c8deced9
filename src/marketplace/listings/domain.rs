use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::providers::UserId;

/// Identifier wrapper for listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

/// Identifier wrapper for service categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub String);

/// Reference to an uploaded listing image. Upload and storage are owned by
/// an external layer; the core only tracks ordered references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef(pub String);

/// Lifecycle state of a listing. Stored and serialized in the upper-case
/// form used by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibilityStatus {
    Draft,
    Active,
    Paused,
    Archived,
}

impl VisibilityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VisibilityStatus::Draft => "DRAFT",
            VisibilityStatus::Active => "ACTIVE",
            VisibilityStatus::Paused => "PAUSED",
            VisibilityStatus::Archived => "ARCHIVED",
        }
    }
}

/// A provider's service offering. Price is carried in integer cents; the
/// primitive range checks (lengths, bounds) happen upstream of this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub owner_id: UserId,
    pub category_id: CategoryId,
    pub title: String,
    pub description: String,
    pub price_cents: u32,
    pub duration_minutes: u32,
    pub visibility_status: VisibilityStatus,
    pub last_published_at: Option<DateTime<Utc>>,
    pub images: Vec<ImageRef>,
}

impl Listing {
    pub fn is_archived(&self) -> bool {
        self.visibility_status == VisibilityStatus::Archived
    }

    /// Apply a partial patch. Visibility is never touched here; status moves
    /// only through the state machine.
    pub fn apply(&mut self, patch: &ListingPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(category_id) = &patch.category_id {
            self.category_id = category_id.clone();
        }
        if let Some(price_cents) = patch.price_cents {
            self.price_cents = price_cents;
        }
        if let Some(duration_minutes) = patch.duration_minutes {
            self.duration_minutes = duration_minutes;
        }
        if let Some(images) = &patch.images {
            self.images = images.clone();
        }
    }
}

/// Input for creating a listing. The repository assigns identity and the
/// service pins the initial status to Draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListing {
    pub category_id: CategoryId,
    pub title: String,
    pub description: String,
    pub price_cents: u32,
    pub duration_minutes: u32,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

/// Partial update payload. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub price_cents: Option<u32>,
    pub duration_minutes: Option<u32>,
    pub images: Option<Vec<ImageRef>>,
}

impl ListingPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.price_cents.is_none()
            && self.duration_minutes.is_none()
            && self.images.is_none()
    }
}
