use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::infra::{InMemoryLocationRepository, InMemoryProviderDirectory};
use crate::marketplace::locations::domain::test_support::address;
use crate::marketplace::locations::domain::{Address, NewServiceArea, ServiceZone};
use crate::marketplace::locations::geocoding::{
    GeocodedAddress, GeocodingError, GeocodingGateway,
};
use crate::marketplace::locations::service::LocationService;
use crate::marketplace::providers::{ProfileId, ProviderProfile, UserId};

pub(super) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(super) fn profile_id(id: &str) -> ProfileId {
    ProfileId(id.to_string())
}

pub(super) fn profile(id: &str, user_id: &str, verified: bool) -> ProviderProfile {
    ProviderProfile {
        id: profile_id(id),
        user_id: user(user_id),
        verified,
    }
}

pub(super) fn new_service_area() -> NewServiceArea {
    NewServiceArea {
        address: address(),
        zone: ServiceZone::Radius { radius_km: 12.5 },
    }
}

/// Scripted geocoder outcome for one attempt.
pub(super) enum GeocodeScript {
    Succeed,
    Fail(fn() -> GeocodingError),
}

/// Geocoder fake that counts invocations and plays back a script, falling
/// back to success once the script is exhausted.
pub(super) struct ScriptedGeocoder {
    script: Mutex<Vec<GeocodeScript>>,
    calls: AtomicUsize,
}

impl ScriptedGeocoder {
    pub(super) fn succeeding() -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn scripted(script: Vec<GeocodeScript>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl GeocodingGateway for ScriptedGeocoder {
    fn geocode(&self, address: &Address) -> Result<GeocodedAddress, GeocodingError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let mut script = self.script.lock().expect("geocoder mutex poisoned");
        let step = if script.is_empty() {
            GeocodeScript::Succeed
        } else {
            script.remove(0)
        };

        match step {
            GeocodeScript::Succeed => Ok(GeocodedAddress {
                latitude: 19.373_456,
                longitude: -99.178_912,
                normalized_address: format!(
                    "{} {}, {} {}",
                    address.street, address.exterior_number, address.postal_code, address.city
                ),
                timezone: "America/Mexico_City".to_string(),
            }),
            GeocodeScript::Fail(make_error) => Err(make_error()),
        }
    }
}

pub(super) type TestLocationService =
    LocationService<InMemoryLocationRepository, InMemoryProviderDirectory, ScriptedGeocoder>;

pub(super) fn build_service(
    geocoder: ScriptedGeocoder,
) -> (
    TestLocationService,
    Arc<InMemoryLocationRepository>,
    Arc<InMemoryProviderDirectory>,
    Arc<ScriptedGeocoder>,
) {
    let repository = Arc::new(InMemoryLocationRepository::default());
    let directory = Arc::new(InMemoryProviderDirectory::default());
    let geocoder = Arc::new(geocoder);
    let service = LocationService::new(repository.clone(), directory.clone(), geocoder.clone());
    (service, repository, directory, geocoder)
}

/// Seed an unverified provider profile and a geocoded service area for it.
pub(super) fn seeded_area(
    service: &TestLocationService,
    directory: &InMemoryProviderDirectory,
) -> ProfileId {
    directory.insert(profile("prof-1", "user-1", false));
    service
        .create(&profile_id("prof-1"), new_service_area(), &user("user-1"))
        .expect("seeded area creates");
    profile_id("prof-1")
}
