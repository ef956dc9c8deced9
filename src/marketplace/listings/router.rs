use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ListingId, ListingPatch, NewListing, VisibilityStatus};
use super::repository::{ListingRepository, ListingSummaryView, RepositoryError};
use super::service::{ListingService, ListingServiceError};
use super::state_machine::TransitionError;
use crate::marketplace::audit::AuditSink;
use crate::marketplace::providers::{ActorRole, ProviderDirectory, UserId};

/// Caller identity extracted from headers placed by the upstream auth layer.
/// Token verification itself is out of scope for this core.
pub(crate) fn caller_identity(headers: &HeaderMap) -> (Option<UserId>, Option<ActorRole>) {
    let user = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| UserId(value.to_string()));

    let role = headers
        .get("x-user-role")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| match value {
            "CLIENT" => Some(ActorRole::Client),
            "PROVIDER" => Some(ActorRole::Provider),
            "MODERATOR" => Some(ActorRole::Moderator),
            _ => None,
        });

    (user, role)
}

fn require_caller(headers: &HeaderMap) -> Result<UserId, Response> {
    let (user, _) = caller_identity(headers);
    user.ok_or_else(|| {
        let payload = json!({ "error": "missing caller identity" });
        (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
    })
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct OwnerListingQuery {
    status: Option<VisibilityStatus>,
}

/// Router builder exposing the listing lifecycle endpoints.
pub fn listing_router<R, P, A>(service: Arc<ListingService<R, P, A>>) -> Router
where
    R: ListingRepository + 'static,
    P: ProviderDirectory + 'static,
    A: AuditSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/listings",
            post(create_handler::<R, P, A>).get(owner_listings_handler::<R, P, A>),
        )
        .route(
            "/api/v1/listings/:id",
            get(get_handler::<R, P, A>)
                .patch(update_handler::<R, P, A>)
                .delete(archive_handler::<R, P, A>),
        )
        .route(
            "/api/v1/listings/:id/publish",
            post(publish_handler::<R, P, A>),
        )
        .route("/api/v1/listings/:id/pause", post(pause_handler::<R, P, A>))
        .route(
            "/api/v1/listings/:id/moderation/pause",
            post(admin_pause_handler::<R, P, A>),
        )
        .route(
            "/api/v1/listings/:id/moderation/activate",
            post(admin_activate_handler::<R, P, A>),
        )
        .with_state(service)
}

async fn create_handler<R, P, A>(
    State(service): State<Arc<ListingService<R, P, A>>>,
    headers: HeaderMap,
    axum::Json(data): axum::Json<NewListing>,
) -> Response
where
    R: ListingRepository + 'static,
    P: ProviderDirectory + 'static,
    A: AuditSink + 'static,
{
    let caller = match require_caller(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.create(data, &caller) {
        Ok(listing) => (
            StatusCode::CREATED,
            axum::Json(ListingSummaryView::from_listing(&listing)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

async fn get_handler<R, P, A>(
    State(service): State<Arc<ListingService<R, P, A>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: ListingRepository + 'static,
    P: ProviderDirectory + 'static,
    A: AuditSink + 'static,
{
    let (caller, role) = caller_identity(&headers);
    match service.get(&ListingId(id), caller.as_ref(), role) {
        Ok(Some(listing)) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "listing not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn owner_listings_handler<R, P, A>(
    State(service): State<Arc<ListingService<R, P, A>>>,
    Query(query): Query<OwnerListingQuery>,
    headers: HeaderMap,
) -> Response
where
    R: ListingRepository + 'static,
    P: ProviderDirectory + 'static,
    A: AuditSink + 'static,
{
    let caller = match require_caller(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.list_for_owner(&caller, query.status) {
        Ok(listings) => {
            let views: Vec<ListingSummaryView> =
                listings.iter().map(ListingSummaryView::from_listing).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn update_handler<R, P, A>(
    State(service): State<Arc<ListingService<R, P, A>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    axum::Json(patch_data): axum::Json<ListingPatch>,
) -> Response
where
    R: ListingRepository + 'static,
    P: ProviderDirectory + 'static,
    A: AuditSink + 'static,
{
    let caller = match require_caller(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.update(&ListingId(id), &patch_data, &caller) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn publish_handler<R, P, A>(
    State(service): State<Arc<ListingService<R, P, A>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: ListingRepository + 'static,
    P: ProviderDirectory + 'static,
    A: AuditSink + 'static,
{
    let caller = match require_caller(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.publish(&ListingId(id), &caller) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn pause_handler<R, P, A>(
    State(service): State<Arc<ListingService<R, P, A>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: ListingRepository + 'static,
    P: ProviderDirectory + 'static,
    A: AuditSink + 'static,
{
    let caller = match require_caller(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.pause(&ListingId(id), &caller) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn archive_handler<R, P, A>(
    State(service): State<Arc<ListingService<R, P, A>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: ListingRepository + 'static,
    P: ProviderDirectory + 'static,
    A: AuditSink + 'static,
{
    let caller = match require_caller(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.archive(&ListingId(id), &caller) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn admin_pause_handler<R, P, A>(
    State(service): State<Arc<ListingService<R, P, A>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: ListingRepository + 'static,
    P: ProviderDirectory + 'static,
    A: AuditSink + 'static,
{
    let (caller, role) = caller_identity(&headers);
    let (Some(caller), Some(role)) = (caller, role) else {
        let payload = json!({ "error": "missing caller identity" });
        return (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response();
    };

    match service.admin_pause(&ListingId(id), &caller, role) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn admin_activate_handler<R, P, A>(
    State(service): State<Arc<ListingService<R, P, A>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: ListingRepository + 'static,
    P: ProviderDirectory + 'static,
    A: AuditSink + 'static,
{
    let (caller, role) = caller_identity(&headers);
    let (Some(caller), Some(role)) = (caller, role) else {
        let payload = json!({ "error": "missing caller identity" });
        return (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response();
    };

    match service.admin_activate(&ListingId(id), &caller, role) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ListingServiceError) -> Response {
    match error {
        ListingServiceError::NotFound | ListingServiceError::ProfileNotFound => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ListingServiceError::Unauthorized => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        ListingServiceError::Transition(TransitionError::RequirementsNotMet { violations }) => {
            let messages: Vec<&'static str> =
                violations.iter().map(|violation| violation.message()).collect();
            let payload = json!({
                "error": "publication requirements not met",
                "violations": messages,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        ListingServiceError::Transition(TransitionError::InvalidTransition { from, to }) => {
            let payload = json!({
                "error": "invalid state transition",
                "from": from.label(),
                "to": to.label(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        ListingServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "listing not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ListingServiceError::Repository(RepositoryError::StaleStatus { .. }) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
