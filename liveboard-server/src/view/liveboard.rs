//! Liveboard view state.
//!
//! Holds the search box text, the committed station, the direction toggle
//! and the last board fetched for them. Committing a new station or
//! flipping the direction changes the view's key and yields a ticket for
//! a new fetch.

use tracing::{debug, warn};

use crate::irail::{Direction, IrailApi, IrailError, LiveboardResult};

use super::fetch::{Completion, FetchTicket, Phase, RequestTracker, Slot};

/// Station shown before the user searches for anything.
pub const DEFAULT_STATION: &str = "Cologne";

/// What a liveboard fetch is keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardKey {
    pub station: String,
    pub direction: Direction,
}

/// A finished liveboard request, ready to hand back to the view.
#[derive(Debug)]
pub struct BoardFetch {
    pub ticket: FetchTicket<BoardKey>,
    pub outcome: Result<LiveboardResult, IrailError>,
}

/// Run the request `ticket` stands for.
///
/// Does not touch the view, so several fetches may be in flight at once;
/// [`LiveboardView::complete`] sorts out which one wins.
pub async fn fetch_board<A: IrailApi>(api: &A, ticket: FetchTicket<BoardKey>) -> BoardFetch {
    let key = ticket.key();
    let outcome = api.liveboard(&key.station, key.direction).await;
    BoardFetch { ticket, outcome }
}

#[derive(Debug, Clone)]
pub struct LiveboardView {
    search_text: String,
    tracker: RequestTracker<BoardKey>,
    board: Slot<LiveboardResult>,
}

impl LiveboardView {
    /// A view showing departures from `station`.
    pub fn new(station: impl Into<String>) -> Self {
        Self::with_direction(station, Direction::Departures)
    }

    pub fn with_direction(station: impl Into<String>, direction: Direction) -> Self {
        Self {
            search_text: String::new(),
            tracker: RequestTracker::new(BoardKey {
                station: station.into(),
                direction,
            }),
            board: Slot::default(),
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Edit the search box. Nothing is fetched until [`submit`](Self::submit).
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn key(&self) -> &BoardKey {
        self.tracker.key()
    }

    pub fn station(&self) -> &str {
        &self.key().station
    }

    pub fn direction(&self) -> Direction {
        self.key().direction
    }

    /// Start the initial fetch.
    pub fn mount(&mut self) -> FetchTicket<BoardKey> {
        self.refetch()
    }

    /// Commit the search text as the station, as typed.
    ///
    /// Returns a ticket when the station changed. The empty string is a
    /// valid station; the remote side decides what it means.
    pub fn submit(&mut self) -> Option<FetchTicket<BoardKey>> {
        let key = BoardKey {
            station: self.search_text.clone(),
            direction: self.direction(),
        };
        if self.tracker.set_key(key) {
            Some(self.refetch())
        } else {
            None
        }
    }

    /// Flip between departures and arrivals.
    pub fn toggle_direction(&mut self) -> FetchTicket<BoardKey> {
        let key = BoardKey {
            station: self.station().to_string(),
            direction: self.direction().toggled(),
        };
        self.tracker.set_key(key);
        self.refetch()
    }

    fn refetch(&mut self) -> FetchTicket<BoardKey> {
        self.board.begin();
        self.tracker.issue()
    }

    /// Apply a finished fetch. Returns whether it was applied.
    pub fn complete(&mut self, fetch: BoardFetch) -> bool {
        let BoardFetch { ticket, outcome } = fetch;
        let key = ticket.key();

        match self.board.complete(&self.tracker, &ticket, outcome) {
            Completion::Applied => true,
            Completion::Failed(e) => {
                warn!(
                    station = %key.station,
                    direction = %key.direction,
                    error = %e,
                    "failed to load liveboard"
                );
                true
            }
            Completion::Stale => {
                debug!(
                    station = %key.station,
                    direction = %key.direction,
                    seq = ticket.seq(),
                    "discarding stale liveboard response"
                );
                false
            }
        }
    }

    pub fn phase(&self) -> &Phase<LiveboardResult> {
        self.board.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.phase().is_loading()
    }

    /// Fetch the board for the current key and apply it.
    pub async fn load<A: IrailApi>(&mut self, api: &A) {
        let ticket = self.refetch();
        let fetch = fetch_board(api, ticket).await;
        self.complete(fetch);
    }
}

impl Default for LiveboardView {
    fn default() -> Self {
        Self::new(DEFAULT_STATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irail::{Departure, MockIrailClient};

    fn board(stations: &[&str]) -> LiveboardResult {
        LiveboardResult::Departures(
            stations
                .iter()
                .map(|s| Departure {
                    station: Some(s.to_string()),
                    ..Departure::default()
                })
                .collect(),
        )
    }

    fn unreachable() -> IrailError {
        IrailError::Network(Box::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        )))
    }

    #[test]
    fn defaults_to_departures_from_default_station() {
        let view = LiveboardView::default();
        assert_eq!(view.station(), DEFAULT_STATION);
        assert_eq!(view.direction(), Direction::Departures);
        assert_eq!(view.search_text(), "");
        assert!(matches!(view.phase(), Phase::Idle));
    }

    #[test]
    fn mount_enters_loading() {
        let mut view = LiveboardView::default();
        let ticket = view.mount();
        assert!(view.is_loading());
        assert_eq!(ticket.key().station, DEFAULT_STATION);
    }

    #[test]
    fn submit_commits_search_text_verbatim() {
        let mut view = LiveboardView::default();
        view.set_search_text("  Gent  ");
        let ticket = view.submit().unwrap();
        assert_eq!(ticket.key().station, "  Gent  ");
        assert_eq!(view.station(), "  Gent  ");
    }

    #[test]
    fn submit_accepts_empty_station() {
        let mut view = LiveboardView::default();
        let ticket = view.submit().unwrap();
        assert_eq!(ticket.key().station, "");
    }

    #[test]
    fn resubmitting_same_station_does_not_refetch() {
        let mut view = LiveboardView::new("Gent");
        view.set_search_text("Gent");
        assert!(view.submit().is_none());
    }

    #[test]
    fn toggle_twice_restores_direction() {
        let mut view = LiveboardView::default();
        let there = view.toggle_direction();
        assert_eq!(there.key().direction, Direction::Arrivals);
        let back = view.toggle_direction();
        assert_eq!(back.key().direction, Direction::Departures);
        assert_eq!(view.direction(), Direction::Departures);
    }

    #[test]
    fn loading_blanks_previous_board() {
        let mut view = LiveboardView::default();
        let ticket = view.mount();
        view.complete(BoardFetch {
            ticket,
            outcome: Ok(board(&["Liège"])),
        });
        assert!(view.phase().ready().is_some());

        view.toggle_direction();
        assert!(view.is_loading());
        assert!(view.phase().ready().is_none());
    }

    #[test]
    fn late_response_for_old_station_is_discarded() {
        let mut view = LiveboardView::default();
        let first = view.mount();

        view.set_search_text("Gent");
        let second = view.submit().unwrap();

        assert!(view.complete(BoardFetch {
            ticket: second,
            outcome: Ok(board(&["Brugge"])),
        }));
        assert!(!view.complete(BoardFetch {
            ticket: first,
            outcome: Ok(board(&["Liège"])),
        }));

        let shown = view.phase().ready().unwrap();
        assert_eq!(shown.entries()[0].station(), Some("Brugge"));
    }

    #[test]
    fn late_response_for_old_direction_is_discarded() {
        let mut view = LiveboardView::default();
        let departures = view.mount();
        let _arrivals = view.toggle_direction();

        assert!(!view.complete(BoardFetch {
            ticket: departures,
            outcome: Ok(board(&["Liège"])),
        }));
        assert!(view.is_loading());
    }

    #[test]
    fn failure_ends_loading() {
        let mut view = LiveboardView::default();
        let ticket = view.mount();
        assert!(view.complete(BoardFetch {
            ticket,
            outcome: Err(unreachable()),
        }));
        assert!(view.phase().is_failed());
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn load_keeps_source_order() {
        let api = MockIrailClient::new();
        api.insert_liveboard(
            "Cologne",
            Direction::Departures,
            r#"{"departures": {"departure": [
                {"station": "Aachen", "time": "1700000000"},
                {"station": "Liège", "time": "1700000300"},
                {"station": "Bruxelles-Midi", "time": "1700000900"}
            ]}}"#,
        )
        .await;

        let mut view = LiveboardView::default();
        view.load(&api).await;

        let stations: Vec<_> = view
            .phase()
            .ready()
            .unwrap()
            .entries()
            .iter()
            .map(|e| e.station().unwrap_or_default().to_string())
            .collect();
        assert_eq!(stations, ["Aachen", "Liège", "Bruxelles-Midi"]);
    }

    #[tokio::test]
    async fn concurrent_fetches_resolve_to_current_key() {
        let api = MockIrailClient::new();
        api.insert_liveboard("Cologne", Direction::Departures, r#"{"departures": {}}"#)
            .await;
        api.insert_liveboard(
            "Cologne",
            Direction::Arrivals,
            r#"{"arrivals": {"arrival": [{"station": "Aachen"}]}}"#,
        )
        .await;

        let mut view = LiveboardView::default();
        let departures = view.mount();
        let arrivals = view.toggle_direction();

        let (dep, arr) = tokio::join!(
            fetch_board(&api, departures),
            fetch_board(&api, arrivals)
        );
        // Apply in the "wrong" order: the arrivals board must survive.
        view.complete(arr);
        view.complete(dep);

        assert_eq!(
            view.phase().ready().map(LiveboardResult::direction),
            Some(Direction::Arrivals)
        );
    }
}
