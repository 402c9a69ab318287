//! In-memory upstreams for engine tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    entities::{Coordinates, RouteInfo},
    error::LookupError,
    external::{GeocodeProvider, RouteProvider},
};

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Start(String),
    End(String),
}

/// Shared record of upstream activity: in-flight gauge plus an ordered event log.
#[derive(Debug, Default)]
pub struct Probe {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    events: Mutex<Vec<Event>>,
}

impl Probe {
    fn enter(&self, tag: &str) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.events.lock().unwrap().push(Event::Start(tag.to_string()));
    }

    fn leave(&self, tag: &str) {
        self.events.lock().unwrap().push(Event::End(tag.to_string()));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct FakeGeocoder {
    places: Mutex<HashMap<String, Coordinates>>,
    fallback: Option<Coordinates>,
    error: Option<LookupError>,
    delay: Duration,
    probe: Option<Arc<Probe>>,
    calls: AtomicUsize,
}

impl FakeGeocoder {
    /// Answers every query with the same coordinates.
    pub fn always(coordinates: Coordinates) -> Self {
        Self {
            fallback: Some(coordinates),
            ..Self::default()
        }
    }

    pub fn failing(error: LookupError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn with_probe(mut self, probe: Arc<Probe>, delay: Duration) -> Self {
        self.probe = Some(probe);
        self.delay = delay;
        self
    }

    pub fn insert(&self, query: &str, coordinates: Coordinates) {
        self.places
            .lock()
            .unwrap()
            .insert(query.to_string(), coordinates);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodeProvider for FakeGeocoder {
    async fn search(&self, query: &str) -> Result<Coordinates, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(probe) = &self.probe {
            probe.enter(query);
            tokio::time::sleep(self.delay).await;
            probe.leave(query);
        }

        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        let known = self.places.lock().unwrap().get(query).copied();

        known
            .or(self.fallback)
            .ok_or_else(|| LookupError::AddressNotFound(query.to_string()))
    }
}

#[derive(Default)]
pub struct FakeRouter {
    error: Option<LookupError>,
    delay: Duration,
    probe: Option<Arc<Probe>>,
    calls: AtomicUsize,
}

impl FakeRouter {
    pub fn failing(error: LookupError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Events are tagged with the start latitude.
    pub fn with_probe(mut self, probe: Arc<Probe>, delay: Duration) -> Self {
        self.probe = Some(probe);
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RouteProvider for FakeRouter {
    async fn route(&self, start: Coordinates, end: Coordinates) -> Result<RouteInfo, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(probe) = &self.probe {
            let tag = start.lat.to_string();
            probe.enter(&tag);
            tokio::time::sleep(self.delay).await;
            probe.leave(&tag);
        }

        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        Ok(RouteInfo {
            geometry: vec![[start.lon, start.lat], [end.lon, end.lat]],
            distance_km: 12.5,
            duration_min: 15.0,
        })
    }
}
