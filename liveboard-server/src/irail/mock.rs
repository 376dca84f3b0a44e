//! Mock iRail client for running without network access.
//!
//! Serves canned JSON bodies, either registered in code or loaded from a
//! fixture directory, through the same parsing path as the live client.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::client::{IrailApi, parse_body, parse_liveboard};
use super::error::IrailError;
use super::types::{Direction, LiveboardResult, TrainComposition, TrainInfo};

/// A canned reply for one request.
#[derive(Debug, Clone)]
enum Reply {
    /// Answer 200 with this body.
    Body(String),
    /// Answer with this non-2xx status.
    Status(u16),
    /// Fail as if the connection was refused.
    Unreachable,
}

#[derive(Debug, Default)]
struct Fixtures {
    liveboards: HashMap<(String, Direction), Reply>,
    vehicles: HashMap<String, Reply>,
    compositions: HashMap<String, Reply>,
}

/// Mock iRail client that serves registered or on-disk fixtures.
///
/// Station names are matched case-insensitively. A request with no
/// fixture answers 404, like iRail does for unknown stations and trains.
#[derive(Clone, Default)]
pub struct MockIrailClient {
    fixtures: Arc<RwLock<Fixtures>>,
}

fn station_key(station: &str, direction: Direction) -> (String, Direction) {
    (station.to_lowercase(), direction)
}

impl MockIrailClient {
    /// Create a mock with no fixtures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixtures from a directory.
    ///
    /// Expects files named `liveboard-{departures|arrivals}-{station}.json`,
    /// `vehicle-{id}.json` and `composition-{id}.json`. Other files are
    /// ignored.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> io::Result<Self> {
        let data_dir = data_dir.as_ref();
        let mut fixtures = Fixtures::default();

        for entry in std::fs::read_dir(data_dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let body = std::fs::read_to_string(&path)?;

            if let Some(station) = stem.strip_prefix("liveboard-departures-") {
                fixtures
                    .liveboards
                    .insert(station_key(station, Direction::Departures), Reply::Body(body));
            } else if let Some(station) = stem.strip_prefix("liveboard-arrivals-") {
                fixtures
                    .liveboards
                    .insert(station_key(station, Direction::Arrivals), Reply::Body(body));
            } else if let Some(id) = stem.strip_prefix("vehicle-") {
                fixtures.vehicles.insert(id.to_string(), Reply::Body(body));
            } else if let Some(id) = stem.strip_prefix("composition-") {
                fixtures.compositions.insert(id.to_string(), Reply::Body(body));
            }
        }

        let count =
            fixtures.liveboards.len() + fixtures.vehicles.len() + fixtures.compositions.len();
        if count == 0 {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no fixture files found in {}", data_dir.display()),
            ));
        }

        Ok(Self {
            fixtures: Arc::new(RwLock::new(fixtures)),
        })
    }

    /// Serve `body` for the liveboard of `station` in `direction`.
    pub async fn insert_liveboard(
        &self,
        station: &str,
        direction: Direction,
        body: impl Into<String>,
    ) {
        self.fixtures
            .write()
            .await
            .liveboards
            .insert(station_key(station, direction), Reply::Body(body.into()));
    }

    /// Serve `body` for the vehicle endpoint of `train_id`.
    pub async fn insert_vehicle(&self, train_id: &str, body: impl Into<String>) {
        self.fixtures
            .write()
            .await
            .vehicles
            .insert(train_id.to_string(), Reply::Body(body.into()));
    }

    /// Serve `body` for the composition endpoint of `train_id`.
    pub async fn insert_composition(&self, train_id: &str, body: impl Into<String>) {
        self.fixtures
            .write()
            .await
            .compositions
            .insert(train_id.to_string(), Reply::Body(body.into()));
    }

    /// Make the liveboard of `station` fail at the transport level.
    pub async fn fail_liveboard(&self, station: &str, direction: Direction) {
        self.fixtures
            .write()
            .await
            .liveboards
            .insert(station_key(station, direction), Reply::Unreachable);
    }

    /// Make the vehicle endpoint of `train_id` fail at the transport level.
    pub async fn fail_vehicle(&self, train_id: &str) {
        self.fixtures
            .write()
            .await
            .vehicles
            .insert(train_id.to_string(), Reply::Unreachable);
    }

    /// Make the composition endpoint of `train_id` answer `status`.
    pub async fn fail_composition(&self, train_id: &str, status: u16) {
        self.fixtures
            .write()
            .await
            .compositions
            .insert(train_id.to_string(), Reply::Status(status));
    }

    /// Number of loaded fixtures, across all endpoints.
    pub async fn len(&self) -> usize {
        let fixtures = self.fixtures.read().await;
        fixtures.liveboards.len() + fixtures.vehicles.len() + fixtures.compositions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Resolve a reply to a body, or the error it stands for.
fn into_body(reply: Option<Reply>, what: &str) -> Result<String, IrailError> {
    match reply {
        Some(Reply::Body(body)) => Ok(body),
        Some(Reply::Status(status)) => Err(IrailError::HttpStatus {
            status,
            message: format!("mock failure for {what}"),
        }),
        Some(Reply::Unreachable) => Err(IrailError::Network(Box::new(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            format!("connection refused for {what}"),
        )))),
        None => Err(IrailError::HttpStatus {
            status: 404,
            message: format!("no mock data for {what}"),
        }),
    }
}

impl IrailApi for MockIrailClient {
    async fn liveboard(
        &self,
        station: &str,
        direction: Direction,
    ) -> Result<LiveboardResult, IrailError> {
        let reply = self
            .fixtures
            .read()
            .await
            .liveboards
            .get(&station_key(station, direction))
            .cloned();
        let body = into_body(reply, &format!("{direction} of {station:?}"))?;
        parse_liveboard(&body, direction)
    }

    async fn vehicle(&self, train_id: &str) -> Result<TrainInfo, IrailError> {
        let reply = self.fixtures.read().await.vehicles.get(train_id).cloned();
        let body = into_body(reply, &format!("vehicle {train_id}"))?;
        parse_body(&body)
    }

    async fn composition(&self, train_id: &str) -> Result<TrainComposition, IrailError> {
        let reply = self.fixtures.read().await.compositions.get(train_id).cloned();
        let body = into_body(reply, &format!("composition {train_id}"))?;
        parse_body(&body)
    }
}
