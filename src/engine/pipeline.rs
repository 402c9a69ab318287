//! Origin resolution: geocode, then route, per origin, in paced batches.
//!
//! Each batch runs on spawned tasks gated by a semaphore of at most
//! `max_workers` permits, so no more than that many origins are talking to
//! the upstream services at once. A batch is fully drained before the next
//! one starts, and `pause` separates consecutive batches. Results are
//! collected in completion order.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::{
    engine::{
        estimate::{estimated_duration_min, haversine_km},
        Geocoder, Router,
    },
    entities::{BatchError, Destination, Origin, OriginSource, ResolvedOrigin},
    error::{batch_failed_error, validation_error, Error, LookupError},
};

/// How many underlying messages an all-failed batch reports.
const REPORTED_ERRORS: usize = 3;

#[derive(Clone, Debug)]
pub struct BatchSettings {
    pub batch_size: usize,
    pub max_workers: usize,
    pub pause: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            batch_size: 5,
            max_workers: 3,
            pause: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub resolved: Vec<ResolvedOrigin>,
    pub errors: Vec<BatchError>,
}

impl BatchOutcome {
    /// A batch fails only when nothing resolved. Partial errors are dropped
    /// once at least one origin made it.
    pub fn into_result(self) -> Result<Vec<ResolvedOrigin>, Error> {
        if !self.resolved.is_empty() {
            if !self.errors.is_empty() {
                tracing::warn!(
                    errors = self.errors.len(),
                    resolved = self.resolved.len(),
                    "dropping errors of partially resolved batch"
                );
            }

            return Ok(self.resolved);
        }

        if self.errors.is_empty() {
            return Err(validation_error("no valid origin was processed"));
        }

        let message = self
            .errors
            .iter()
            .take(REPORTED_ERRORS)
            .map(|err| err.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        Err(batch_failed_error(message))
    }
}

enum Resolution {
    Resolved(ResolvedOrigin),
    Failed(BatchError),
}

/// Everything one worker needs to resolve a single origin.
#[derive(Clone)]
struct Resolver {
    geocoder: Arc<Geocoder>,
    router: Arc<Router>,
    destination: Arc<Destination>,
}

impl Resolver {
    #[tracing::instrument(skip(self, origin), fields(origin = %origin.label()))]
    async fn resolve_one(&self, origin: Origin) -> Resolution {
        let coordinates = match &origin.source {
            OriginSource::Coordinates(coordinates) => *coordinates,
            OriginSource::Address(text) | OriginSource::Name(text) => {
                match self.geocoder.resolve(text).await {
                    Ok(coordinates) => coordinates,
                    Err(err) => {
                        tracing::warn!(error = %err, "geocoding failed");

                        return Resolution::Failed(BatchError {
                            display_name: origin.label(),
                            message: format!("could not resolve '{}': {}", origin.label(), err),
                        });
                    }
                }
            }
        };

        let destination = self.destination.coordinates();

        match self.router.resolve(coordinates, destination).await {
            Ok(route) => {
                Resolution::Resolved(ResolvedOrigin::routed(&origin, coordinates, route))
            }
            Err(err) => {
                let note = match err {
                    LookupError::RouteNotFound => {
                        "route unavailable: no drivable route".to_string()
                    }
                    err => format!("route unavailable: {}", err),
                };
                tracing::warn!(%note, "falling back to straight-line estimate");

                let distance = haversine_km(coordinates, destination);

                Resolution::Resolved(ResolvedOrigin::estimated(
                    &origin,
                    coordinates,
                    distance,
                    estimated_duration_min(distance),
                    note,
                ))
            }
        }
    }
}

pub struct Pipeline {
    resolver: Resolver,
    settings: BatchSettings,
}

impl Pipeline {
    pub fn new(
        geocoder: Arc<Geocoder>,
        router: Arc<Router>,
        destination: Arc<Destination>,
        settings: BatchSettings,
    ) -> Self {
        Self {
            resolver: Resolver {
                geocoder,
                router,
                destination,
            },
            settings,
        }
    }

    #[tracing::instrument(skip_all, fields(origins = origins.len()))]
    pub async fn resolve_batch(&self, origins: Vec<Origin>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let mut batches = origins.chunks(self.settings.batch_size.max(1)).peekable();

        while let Some(batch) = batches.next() {
            self.run_batch(batch, &mut outcome).await;

            if batches.peek().is_some() && !self.settings.pause.is_zero() {
                tokio::time::sleep(self.settings.pause).await;
            }
        }

        tracing::info!(
            resolved = outcome.resolved.len(),
            failed = outcome.errors.len(),
            "origins resolved"
        );

        outcome
    }

    async fn run_batch(&self, batch: &[Origin], outcome: &mut BatchOutcome) {
        let workers = Arc::new(Semaphore::new(
            self.settings.max_workers.min(batch.len()).max(1),
        ));

        let mut tasks: FuturesUnordered<_> = batch
            .iter()
            .cloned()
            .map(|origin| {
                let label = origin.label();
                let resolver = self.resolver.clone();
                let workers = Arc::clone(&workers);

                let handle = tokio::spawn(async move {
                    // the semaphore is never closed, so acquiring cannot fail
                    let _permit = workers.acquire_owned().await;
                    resolver.resolve_one(origin).await
                });

                async move { (label, handle.await) }
            })
            .collect();

        while let Some((label, joined)) = tasks.next().await {
            match joined {
                Ok(Resolution::Resolved(resolved)) => outcome.resolved.push(resolved),
                Ok(Resolution::Failed(failure)) => outcome.errors.push(failure),
                Err(err) => {
                    tracing::error!(origin = %label, error = %err, "resolution task aborted");

                    outcome.errors.push(BatchError {
                        message: format!("could not resolve '{}': {}", label, err),
                        display_name: label,
                    });
                }
            }
        }
    }
}
