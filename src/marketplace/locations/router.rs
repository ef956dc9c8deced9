use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::domain::{NewServiceArea, ServiceAreaPatch, ServiceAreaView};
use super::geocoding::GeocodingGateway;
use super::repository::{LocationRepository, LocationRepositoryError};
use super::service::{LocationService, LocationServiceError};
use crate::marketplace::listings::router::caller_identity;
use crate::marketplace::providers::{ActorRole, ProfileId, ProviderDirectory, UserId};

/// Router builder for the one-per-profile service-area endpoints.
pub fn location_router<L, P, G>(service: Arc<LocationService<L, P, G>>) -> Router
where
    L: LocationRepository + 'static,
    P: ProviderDirectory + 'static,
    G: GeocodingGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/providers/:profile_id/location",
            get(get_handler::<L, P, G>)
                .post(create_handler::<L, P, G>)
                .patch(update_handler::<L, P, G>)
                .delete(delete_handler::<L, P, G>),
        )
        .with_state(service)
}

fn require_identity(headers: &HeaderMap) -> Result<(UserId, ActorRole), Response> {
    let (user, role) = caller_identity(headers);
    match (user, role) {
        (Some(user), Some(role)) => Ok((user, role)),
        _ => {
            let payload = json!({ "error": "missing caller identity" });
            Err((StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response())
        }
    }
}

async fn create_handler<L, P, G>(
    State(service): State<Arc<LocationService<L, P, G>>>,
    Path(profile_id): Path<String>,
    headers: HeaderMap,
    axum::Json(data): axum::Json<NewServiceArea>,
) -> Response
where
    L: LocationRepository + 'static,
    P: ProviderDirectory + 'static,
    G: GeocodingGateway + 'static,
{
    let (caller, _) = match require_identity(&headers) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    match service.create(&ProfileId(profile_id), data, &caller) {
        Ok(record) => (
            StatusCode::CREATED,
            axum::Json(ServiceAreaView::from_record(&record)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

async fn update_handler<L, P, G>(
    State(service): State<Arc<LocationService<L, P, G>>>,
    Path(profile_id): Path<String>,
    headers: HeaderMap,
    axum::Json(patch): axum::Json<ServiceAreaPatch>,
) -> Response
where
    L: LocationRepository + 'static,
    P: ProviderDirectory + 'static,
    G: GeocodingGateway + 'static,
{
    let (caller, role) = match require_identity(&headers) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    match service.update(&ProfileId(profile_id), patch, &caller, role) {
        Ok(record) => (
            StatusCode::OK,
            axum::Json(ServiceAreaView::from_record(&record)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

async fn get_handler<L, P, G>(
    State(service): State<Arc<LocationService<L, P, G>>>,
    Path(profile_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    L: LocationRepository + 'static,
    P: ProviderDirectory + 'static,
    G: GeocodingGateway + 'static,
{
    let (caller, role) = match require_identity(&headers) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    match service.get(&ProfileId(profile_id), &caller, role) {
        Ok(projection) => (StatusCode::OK, axum::Json(projection)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn delete_handler<L, P, G>(
    State(service): State<Arc<LocationService<L, P, G>>>,
    Path(profile_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    L: LocationRepository + 'static,
    P: ProviderDirectory + 'static,
    G: GeocodingGateway + 'static,
{
    let (caller, role) = match require_identity(&headers) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    match service.delete(&ProfileId(profile_id), &caller, role) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: LocationServiceError) -> Response {
    match error {
        LocationServiceError::ProfileNotFound | LocationServiceError::NotFound => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        LocationServiceError::Unauthorized | LocationServiceError::VerifiedProfileLocked => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        LocationServiceError::AlreadyExists
        | LocationServiceError::Repository(LocationRepositoryError::Conflict) => {
            let payload = json!({ "error": "a service area record already exists for this profile" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        LocationServiceError::Repository(LocationRepositoryError::NotFound) => {
            let payload = json!({ "error": "service area record not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
