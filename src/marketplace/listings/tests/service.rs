use super::common::*;
use crate::marketplace::listings::domain::{ListingId, ListingPatch, VisibilityStatus};
use crate::marketplace::listings::repository::{ListingRepository, RepositoryError};
use crate::marketplace::listings::service::ListingServiceError;
use crate::marketplace::listings::state_machine::{PublicationViolation, TransitionError};
use crate::marketplace::providers::ActorRole;

#[test]
fn create_requires_provider_profile() {
    let (service, _, _, _) = build_service();

    match service.create(complete_listing_input(), &user("nobody")) {
        Err(ListingServiceError::ProfileNotFound) => {}
        other => panic!("expected missing profile error, got {other:?}"),
    }
}

#[test]
fn create_starts_in_draft_without_publish_timestamp() {
    let (service, _, directory, _) = build_service();
    let listing = seeded_draft(&service, &directory, "user-1");

    assert_eq!(listing.visibility_status, VisibilityStatus::Draft);
    assert!(listing.last_published_at.is_none());
}

#[test]
fn get_hides_drafts_from_strangers_and_anonymous_callers() {
    let (service, _, directory, _) = build_service();
    let listing = seeded_draft(&service, &directory, "user-1");

    let anonymous = service.get(&listing.id, None, None).expect("lookup works");
    assert!(anonymous.is_none());

    let stranger = service
        .get(&listing.id, Some(&user("user-2")), Some(ActorRole::Client))
        .expect("lookup works");
    assert!(stranger.is_none());
}

#[test]
fn get_shows_any_status_to_owner_and_moderator() {
    let (service, _, directory, _) = build_service();
    let listing = seeded_draft(&service, &directory, "user-1");

    let owner_view = service
        .get(&listing.id, Some(&user("user-1")), Some(ActorRole::Provider))
        .expect("lookup works");
    assert!(owner_view.is_some());

    let moderator_view = service
        .get(&listing.id, Some(&user("mod-1")), Some(ActorRole::Moderator))
        .expect("lookup works");
    assert!(moderator_view.is_some());
}

#[test]
fn get_returns_active_listings_to_everyone() {
    let (service, _, directory, _) = build_service();
    let listing = seeded_draft(&service, &directory, "user-1");
    service
        .publish(&listing.id, &user("user-1"))
        .expect("publishes");

    let anonymous = service.get(&listing.id, None, None).expect("lookup works");
    assert_eq!(
        anonymous.expect("visible").visibility_status,
        VisibilityStatus::Active
    );
}

#[test]
fn get_missing_listing_is_none_not_error() {
    let (service, _, _, _) = build_service();
    let found = service
        .get(&ListingId("lst-missing".to_string()), None, None)
        .expect("lookup works");
    assert!(found.is_none());
}

#[test]
fn update_requires_ownership() {
    let (service, _, directory, _) = build_service();
    let listing = seeded_draft(&service, &directory, "user-1");

    let patch = ListingPatch {
        title: Some("New title".to_string()),
        ..ListingPatch::default()
    };
    match service.update(&listing.id, &patch, &user("user-2")) {
        Err(ListingServiceError::Unauthorized) => {}
        other => panic!("expected unauthorized, got {other:?}"),
    }
}

#[test]
fn update_applies_patch_without_touching_status() {
    let (service, _, directory, _) = build_service();
    let listing = seeded_draft(&service, &directory, "user-1");

    let patch = ListingPatch {
        price_cents: Some(95_000),
        ..ListingPatch::default()
    };
    let updated = service
        .update(&listing.id, &patch, &user("user-1"))
        .expect("patch applies");

    assert_eq!(updated.price_cents, 95_000);
    assert_eq!(updated.visibility_status, VisibilityStatus::Draft);
}

#[test]
fn archived_listings_reject_any_update_as_invalid_transition() {
    let (service, _, directory, _) = build_service();
    let listing = seeded_draft(&service, &directory, "user-1");
    service
        .archive(&listing.id, &user("user-1"))
        .expect("archives");

    for patch in [
        ListingPatch::default(),
        ListingPatch {
            title: Some("Renamed".to_string()),
            ..ListingPatch::default()
        },
    ] {
        match service.update(&listing.id, &patch, &user("user-1")) {
            Err(ListingServiceError::Transition(TransitionError::InvalidTransition {
                from,
                to,
            })) => {
                assert_eq!(from, VisibilityStatus::Archived);
                assert_eq!(to, VisibilityStatus::Archived);
            }
            other => panic!("expected invalid transition, got {other:?}"),
        }
    }
}

#[test]
fn publish_stamps_last_published_at() {
    let (service, _, directory, _) = build_service();
    let listing = seeded_draft(&service, &directory, "user-1");

    let published = service
        .publish(&listing.id, &user("user-1"))
        .expect("publishes");

    assert_eq!(published.visibility_status, VisibilityStatus::Active);
    assert!(published.last_published_at.is_some());
}

#[test]
fn publish_with_unverified_provider_collects_violations() {
    let (service, _, directory, _) = build_service();
    directory.insert(profile("user-1", false));
    let listing = service
        .create(incomplete_listing_input(), &user("user-1"))
        .expect("draft creates");

    match service.publish(&listing.id, &user("user-1")) {
        Err(ListingServiceError::Transition(TransitionError::RequirementsNotMet {
            violations,
        })) => {
            assert_eq!(violations.len(), 6);
            assert!(violations.contains(&PublicationViolation::ProviderUnverified));
        }
        other => panic!("expected requirements failure, got {other:?}"),
    }
}

#[test]
fn republish_after_pause_skips_requirement_validation() {
    let (service, _, directory, _) = build_service();
    let listing = seeded_draft(&service, &directory, "user-1");
    let owner = user("user-1");

    service.publish(&listing.id, &owner).expect("publishes");
    service.pause(&listing.id, &owner).expect("pauses");

    // Blank the title while paused; resuming must not re-validate.
    let patch = ListingPatch {
        title: Some(String::new()),
        ..ListingPatch::default()
    };
    service
        .update(&listing.id, &patch, &owner)
        .expect("paused listings stay editable");

    let resumed = service.publish(&listing.id, &owner).expect("resumes");
    assert_eq!(resumed.visibility_status, VisibilityStatus::Active);
}

#[test]
fn archive_is_idempotent() {
    let (service, _, directory, _) = build_service();
    let listing = seeded_draft(&service, &directory, "user-1");
    let owner = user("user-1");

    let archived = service.archive(&listing.id, &owner).expect("archives");
    assert_eq!(archived.visibility_status, VisibilityStatus::Archived);

    let archived_again = service
        .archive(&listing.id, &owner)
        .expect("archiving twice is a no-op");
    assert_eq!(archived_again.visibility_status, VisibilityStatus::Archived);
}

#[test]
fn stale_status_surfaces_as_conflict_instead_of_clobbering() {
    let (service, repository, directory, _) = build_service();
    let listing = seeded_draft(&service, &directory, "user-1");

    // Another writer archives between our fetch and our publish attempt.
    repository
        .update_visibility(
            &listing.id,
            VisibilityStatus::Draft,
            VisibilityStatus::Archived,
        )
        .expect("concurrent archive");

    match repository.update_visibility(
        &listing.id,
        VisibilityStatus::Draft,
        VisibilityStatus::Active,
    ) {
        Err(RepositoryError::StaleStatus { stored, expected }) => {
            assert_eq!(stored, VisibilityStatus::Archived);
            assert_eq!(expected, VisibilityStatus::Draft);
        }
        other => panic!("expected stale status conflict, got {other:?}"),
    }
}

#[test]
fn admin_operations_require_moderator_role() {
    let (service, _, directory, audit) = build_service();
    let listing = seeded_draft(&service, &directory, "user-1");
    service
        .publish(&listing.id, &user("user-1"))
        .expect("publishes");

    match service.admin_pause(&listing.id, &user("user-1"), ActorRole::Provider) {
        Err(ListingServiceError::Unauthorized) => {}
        other => panic!("expected unauthorized, got {other:?}"),
    }
    assert!(audit.events().is_empty());
}

#[test]
fn admin_pause_and_activate_emit_audit_events() {
    let (service, _, directory, audit) = build_service();
    let listing = seeded_draft(&service, &directory, "user-1");
    service
        .publish(&listing.id, &user("user-1"))
        .expect("publishes");

    let moderator = user("mod-1");
    let paused = service
        .admin_pause(&listing.id, &moderator, ActorRole::Moderator)
        .expect("moderator pauses");
    assert_eq!(paused.visibility_status, VisibilityStatus::Paused);

    let reinstated = service
        .admin_activate(&listing.id, &moderator, ActorRole::Moderator)
        .expect("moderator reinstates");
    assert_eq!(reinstated.visibility_status, VisibilityStatus::Active);

    let events = audit.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].actor, moderator);
    assert_eq!(events[0].previous_status, VisibilityStatus::Active);
    assert_eq!(events[0].new_status, VisibilityStatus::Paused);
    assert_eq!(events[1].previous_status, VisibilityStatus::Paused);
    assert_eq!(events[1].new_status, VisibilityStatus::Active);
}

#[test]
fn list_for_owner_supports_status_filter() {
    let (service, _, directory, _) = build_service();
    let first = seeded_draft(&service, &directory, "user-1");
    let owner = user("user-1");
    let second = service
        .create(complete_listing_input(), &owner)
        .expect("second listing creates");
    service.publish(&second.id, &owner).expect("publishes");

    let all = service.list_for_owner(&owner, None).expect("lists");
    assert_eq!(all.len(), 2);

    let drafts = service
        .list_for_owner(&owner, Some(VisibilityStatus::Draft))
        .expect("lists drafts");
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].id, first.id);
}
