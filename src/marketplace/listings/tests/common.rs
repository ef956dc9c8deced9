use std::sync::{Arc, Mutex};

use crate::infra::{InMemoryListingRepository, InMemoryProviderDirectory};
use crate::marketplace::audit::{AuditEvent, AuditSink};
use crate::marketplace::listings::domain::{CategoryId, Listing, NewListing};
use crate::marketplace::listings::service::ListingService;
use crate::marketplace::providers::{ProfileId, ProviderProfile, UserId};

pub(super) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(super) fn profile(user_id: &str, verified: bool) -> ProviderProfile {
    ProviderProfile {
        id: ProfileId(format!("prof-{user_id}")),
        user_id: user(user_id),
        verified,
    }
}

pub(super) fn complete_listing_input() -> NewListing {
    NewListing {
        category_id: CategoryId("cat-electrical".to_string()),
        title: "Panel upgrade".to_string(),
        description: "Replace fuse boxes with modern breaker panels.".to_string(),
        price_cents: 120_000,
        duration_minutes: 240,
        images: Vec::new(),
    }
}

pub(super) fn incomplete_listing_input() -> NewListing {
    NewListing {
        category_id: CategoryId(String::new()),
        title: String::new(),
        description: String::new(),
        price_cents: 0,
        duration_minutes: 0,
        images: Vec::new(),
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl RecordingAuditSink {
    pub(super) fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditSink for RecordingAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events
            .lock()
            .expect("audit mutex poisoned")
            .push(event);
    }
}

pub(super) type TestListingService =
    ListingService<InMemoryListingRepository, InMemoryProviderDirectory, RecordingAuditSink>;

pub(super) fn build_service() -> (
    TestListingService,
    Arc<InMemoryListingRepository>,
    Arc<InMemoryProviderDirectory>,
    Arc<RecordingAuditSink>,
) {
    let repository = Arc::new(InMemoryListingRepository::default());
    let directory = Arc::new(InMemoryProviderDirectory::default());
    let audit = Arc::new(RecordingAuditSink::default());
    let service = ListingService::new(repository.clone(), directory.clone(), audit.clone());
    (service, repository, directory, audit)
}

/// Seed a verified provider and a complete draft listing owned by them.
pub(super) fn seeded_draft(
    service: &TestListingService,
    directory: &InMemoryProviderDirectory,
    owner: &str,
) -> Listing {
    directory.insert(profile(owner, true));
    service
        .create(complete_listing_input(), &user(owner))
        .expect("seeded listing creates")
}
