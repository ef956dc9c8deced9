//! In-memory implementations of the collaborator traits, used by the server
//! binary and by the crate-level integration tests. Production deployments
//! swap these for database and vendor-backed adapters.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::marketplace::listings::domain::{
    Listing, ListingId, ListingPatch, NewListing, VisibilityStatus,
};
use crate::marketplace::listings::repository::{ListingRepository, RepositoryError};
use crate::marketplace::locations::domain::{Coordinates, ServiceAreaId, ServiceAreaRecord};
use crate::marketplace::locations::geocoding::{
    GeocodedAddress, GeocodingError, GeocodingGateway,
};
use crate::marketplace::locations::repository::{
    LocationRepository, LocationRepositoryError, ServiceAreaChanges, ServiceAreaCreate,
};
use crate::marketplace::providers::{
    DirectoryError, ProfileId, ProviderDirectory, ProviderProfile, UserId,
};

static LISTING_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SERVICE_AREA_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_listing_id() -> ListingId {
    let id = LISTING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ListingId(format!("lst-{id:06}"))
}

fn next_service_area_id() -> ServiceAreaId {
    let id = SERVICE_AREA_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ServiceAreaId(format!("loc-{id:06}"))
}

#[derive(Default, Clone)]
pub struct InMemoryListingRepository {
    records: Arc<Mutex<HashMap<ListingId, Listing>>>,
}

impl ListingRepository for InMemoryListingRepository {
    fn create(&self, data: NewListing, owner: &UserId) -> Result<Listing, RepositoryError> {
        let listing = Listing {
            id: next_listing_id(),
            owner_id: owner.clone(),
            category_id: data.category_id,
            title: data.title,
            description: data.description,
            price_cents: data.price_cents,
            duration_minutes: data.duration_minutes,
            visibility_status: VisibilityStatus::Draft,
            last_published_at: None,
            images: data.images,
        };

        let mut guard = self.records.lock().expect("listing mutex poisoned");
        guard.insert(listing.id.clone(), listing.clone());
        Ok(listing)
    }

    fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        let guard = self.records.lock().expect("listing mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_owner(
        &self,
        owner: &UserId,
        status: Option<VisibilityStatus>,
    ) -> Result<Vec<Listing>, RepositoryError> {
        let guard = self.records.lock().expect("listing mutex poisoned");
        let mut listings: Vec<Listing> = guard
            .values()
            .filter(|listing| listing.owner_id == *owner)
            .filter(|listing| status.is_none_or(|wanted| listing.visibility_status == wanted))
            .cloned()
            .collect();
        listings.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(listings)
    }

    fn update(&self, id: &ListingId, patch: &ListingPatch) -> Result<Listing, RepositoryError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        let listing = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        listing.apply(patch);
        Ok(listing.clone())
    }

    fn update_visibility(
        &self,
        id: &ListingId,
        expected: VisibilityStatus,
        next: VisibilityStatus,
    ) -> Result<Listing, RepositoryError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        let listing = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;

        if listing.visibility_status != expected {
            return Err(RepositoryError::StaleStatus {
                stored: listing.visibility_status,
                expected,
            });
        }

        listing.visibility_status = next;
        if next == VisibilityStatus::Active {
            listing.last_published_at = Some(Utc::now());
        }
        Ok(listing.clone())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryProviderDirectory {
    profiles: Arc<Mutex<HashMap<ProfileId, ProviderProfile>>>,
}

impl InMemoryProviderDirectory {
    pub fn insert(&self, profile: ProviderProfile) {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(profile.id.clone(), profile);
    }
}

impl ProviderDirectory for InMemoryProviderDirectory {
    fn find_by_id(&self, id: &ProfileId) -> Result<Option<ProviderProfile>, DirectoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ProviderProfile>, DirectoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard
            .values()
            .find(|profile| profile.user_id == *user_id)
            .cloned())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryLocationRepository {
    records: Arc<Mutex<HashMap<ProfileId, ServiceAreaRecord>>>,
}

impl LocationRepository for InMemoryLocationRepository {
    fn find_by_profile(
        &self,
        profile: &ProfileId,
    ) -> Result<Option<ServiceAreaRecord>, LocationRepositoryError> {
        let guard = self.records.lock().expect("location mutex poisoned");
        Ok(guard.get(profile).cloned())
    }

    fn create(
        &self,
        data: ServiceAreaCreate,
    ) -> Result<ServiceAreaRecord, LocationRepositoryError> {
        let mut guard = self.records.lock().expect("location mutex poisoned");
        if guard.contains_key(&data.profile_id) {
            return Err(LocationRepositoryError::Conflict);
        }

        let now = Utc::now();
        let record = ServiceAreaRecord {
            id: next_service_area_id(),
            profile_id: data.profile_id.clone(),
            address: data.data.address,
            coordinates: data.geo.coordinates,
            normalized_address: data.geo.normalized_address,
            timezone: data.geo.timezone,
            geocoding_status: data.geo.status,
            zone: data.data.zone,
            created_at: now,
            updated_at: now,
        };
        guard.insert(data.profile_id, record.clone());
        Ok(record)
    }

    fn update(
        &self,
        profile: &ProfileId,
        changes: ServiceAreaChanges,
    ) -> Result<ServiceAreaRecord, LocationRepositoryError> {
        let mut guard = self.records.lock().expect("location mutex poisoned");
        let record = guard
            .get_mut(profile)
            .ok_or(LocationRepositoryError::NotFound)?;

        if let Some(address) = changes.address {
            record.address = address;
        }
        if let Some(geo) = changes.geo {
            record.coordinates = geo.coordinates;
            record.normalized_address = geo.normalized_address;
            record.timezone = geo.timezone;
            record.geocoding_status = geo.status;
        }
        if let Some(zone) = changes.zone {
            record.zone = zone;
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    fn delete(&self, profile: &ProfileId) -> Result<(), LocationRepositoryError> {
        let mut guard = self.records.lock().expect("location mutex poisoned");
        guard
            .remove(profile)
            .map(|_| ())
            .ok_or(LocationRepositoryError::NotFound)
    }
}

/// Offline geocoder for local runs: deterministic pseudo-coordinates derived
/// from the postal code, so repeated requests for the same address agree.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeterministicGeocoder;

impl GeocodingGateway for DeterministicGeocoder {
    fn geocode(
        &self,
        address: &crate::marketplace::locations::domain::Address,
    ) -> Result<GeocodedAddress, GeocodingError> {
        if address.postal_code.trim().is_empty() || address.city.trim().is_empty() {
            return Err(GeocodingError::InvalidAddressFormat);
        }

        let mut hasher = DefaultHasher::new();
        address.postal_code.hash(&mut hasher);
        address.city.hash(&mut hasher);
        let seed = hasher.finish();

        let point = Coordinates {
            latitude: 14.0 + (seed % 18_000) as f64 / 1_000.0,
            longitude: -118.0 + ((seed >> 16) % 32_000) as f64 / 1_000.0,
        };

        Ok(GeocodedAddress {
            latitude: point.latitude,
            longitude: point.longitude,
            normalized_address: format!(
                "{} {}, {} {}, {}",
                address.street, address.exterior_number, address.postal_code, address.city,
                address.country
            ),
            timezone: "America/Mexico_City".to_string(),
        })
    }
}
