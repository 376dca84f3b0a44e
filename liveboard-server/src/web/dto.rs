//! Request and response types for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::irail::Direction;

use super::templates::{BoardRowView, BoardView, SegmentView, StopView, TrainDetailView};

// ============================================================================
// Liveboard
// ============================================================================

/// Query string of the liveboard page.
#[derive(Debug, Default, Deserialize)]
pub struct LiveboardQuery {
    /// Committed station; absent means the default station
    pub station: Option<String>,

    /// `departures` or `arrivals`
    pub arrdep: Option<String>,
}

impl LiveboardQuery {
    pub fn direction(&self) -> Direction {
        self.arrdep
            .as_deref()
            .map(Direction::from_query)
            .unwrap_or_default()
    }
}

/// JSON body of a loaded liveboard.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub station: String,
    pub direction: Direction,
    pub rows: Vec<BoardRowView>,
}

impl From<BoardView> for BoardResponse {
    fn from(board: BoardView) -> Self {
        Self {
            station: board.station,
            direction: board.direction,
            rows: board.rows,
        }
    }
}

// ============================================================================
// Train detail
// ============================================================================

/// JSON body of a loaded train detail view.
#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub train_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    pub stops: Vec<StopView>,
    pub segments: Vec<SegmentView>,
}

impl From<TrainDetailView> for TrainResponse {
    fn from(train: TrainDetailView) -> Self {
        Self {
            train_id: train.train_id,
            station: Some(train.station).filter(|s| !s.is_empty()),
            stops: train.stops,
            segments: train.segments,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
