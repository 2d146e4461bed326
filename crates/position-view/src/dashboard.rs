//! Dashboard
//!
//! Holds the loaded record collection together with the filter and sort
//! settings, and drives the fetch cycle:
//!
//! ```text
//! idle -> loading -> (loaded | failed)
//! ```
//!
//! [`Dashboard::mount`] dispatches the first fetch straight away; a dashboard
//! that has never fetched reports [`ViewStatus::Loading`], not an empty table.
//! `loaded` and `failed` last until the next reload re-enters `loading`.
//! Each dispatched fetch gets a [`Ticket`]; a result carrying an older ticket
//! than the latest dispatched one is discarded, so overlapping reloads can
//! never overwrite newer data with stale data.

use realtime::HttpRequest;
use tracing::{debug, info, warn};

use crate::filter::{Filters, IgnitionFilter, TypeFilter};
use crate::position::Position;
use crate::sort::{SortConfig, SortKey};
use crate::source::{FetchError, PositionSource};
use crate::table::{Query, Table};

/// Where the current fetch cycle stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Sequence number of a dispatched fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// What the page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus<'a> {
    /// A fetch is outstanding.
    Loading,

    /// The last fetch failed with this message.
    Failed(&'a str),

    /// No record passed the filters.
    Empty,

    /// At least one record to show.
    Table,
}

/// Record collection plus view settings.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    records: Vec<Position>,
    state: FetchState,
    query: Query,
    dispatched: u64,
}

impl Dashboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dashboard and run its first fetch cycle.
    pub async fn mount(source: &PositionSource, provider: &impl HttpRequest) -> Self {
        let mut dashboard = Self::new();
        dashboard.reload(source, provider).await;
        dashboard
    }

    /// Start a fetch cycle: clears any previous error and enters `loading`.
    /// Pass the returned ticket to [`Dashboard::complete_fetch`].
    pub fn begin_fetch(&mut self) -> Ticket {
        self.dispatched += 1;
        self.state = FetchState::Loading;
        debug!(ticket = self.dispatched, "fetch dispatched");
        Ticket(self.dispatched)
    }

    /// Finish the fetch identified by `ticket`.
    ///
    /// On success the record collection is replaced wholesale; on failure the
    /// previous records are kept and the error message recorded. Returns
    /// `false` when the result was discarded because a newer fetch has been
    /// dispatched since.
    pub fn complete_fetch(
        &mut self, ticket: Ticket, outcome: Result<Vec<Position>, FetchError>,
    ) -> bool {
        if ticket.0 < self.dispatched {
            debug!(ticket = ticket.0, latest = self.dispatched, "discarding stale fetch result");
            return false;
        }

        match outcome {
            Ok(records) => {
                info!(records = records.len(), "positions loaded");
                self.records = records;
                self.state = FetchState::Loaded;
            }
            Err(e) => {
                warn!(error = %e, "positions fetch failed");
                self.state = FetchState::Failed(e.to_string());
            }
        }
        true
    }

    /// Run a complete fetch cycle against `source`.
    pub async fn reload(&mut self, source: &PositionSource, provider: &impl HttpRequest) {
        let ticket = self.begin_fetch();
        let outcome = source.fetch(provider).await;
        self.complete_fetch(ticket, outcome);
    }

    /// Reload is offered only when no fetch is outstanding.
    #[must_use]
    pub fn can_reload(&self) -> bool {
        self.state != FetchState::Loading
    }

    #[must_use]
    pub const fn state(&self) -> &FetchState {
        &self.state
    }

    /// The last successfully loaded records.
    #[must_use]
    pub fn records(&self) -> &[Position] {
        &self.records
    }

    #[must_use]
    pub const fn filters(&self) -> &Filters {
        &self.query.filters
    }

    pub fn set_type_filter(&mut self, tipo: TypeFilter) {
        self.query.filters.tipo = tipo;
    }

    pub const fn set_ignition_filter(&mut self, ignicao: IgnitionFilter) {
        self.query.filters.ignicao = ignicao;
    }

    #[must_use]
    pub const fn sort_config(&self) -> &SortConfig {
        &self.query.sort
    }

    /// Column header click.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.query.sort = self.query.sort.toggle(key);
    }

    /// Filtered, sorted records and summary, computed from the current
    /// records and settings. Usable in any state, including while a reload
    /// is outstanding.
    #[must_use]
    pub fn table(&self) -> Table<'_> {
        self.query.apply(&self.records)
    }

    /// What to show for the current state. Nothing has loaded before the
    /// first fetch resolves, so `idle` shows as loading. An empty result
    /// after filtering is [`ViewStatus::Empty`], never an error.
    #[must_use]
    pub fn status(&self) -> ViewStatus<'_> {
        match &self.state {
            FetchState::Idle | FetchState::Loading => ViewStatus::Loading,
            FetchState::Failed(message) => ViewStatus::Failed(message),
            FetchState::Loaded => {
                if self.table().is_empty() {
                    ViewStatus::Empty
                } else {
                    ViewStatus::Table
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::position::normalize_all;

    fn fleet(ids: &[i64]) -> Vec<Position> {
        let raw = ids.iter().map(|id| json!({"identificador": id, "tipo": "carro"})).collect();
        normalize_all(serde_json::Value::Array(raw)).expect("should normalize")
    }

    #[test]
    fn starts_idle() {
        let dashboard = Dashboard::new();
        assert_eq!(dashboard.state(), &FetchState::Idle);
        assert!(dashboard.can_reload());
        assert_eq!(dashboard.status(), ViewStatus::Loading);
    }

    #[test]
    fn loading_disables_reload() {
        let mut dashboard = Dashboard::new();
        dashboard.begin_fetch();

        assert_eq!(dashboard.state(), &FetchState::Loading);
        assert!(!dashboard.can_reload());
        assert_eq!(dashboard.status(), ViewStatus::Loading);
    }

    #[test]
    fn success_replaces_records() {
        let mut dashboard = Dashboard::new();

        let ticket = dashboard.begin_fetch();
        assert!(dashboard.complete_fetch(ticket, Ok(fleet(&[1, 2, 3]))));
        assert_eq!(dashboard.records().len(), 3);

        let ticket = dashboard.begin_fetch();
        assert!(dashboard.complete_fetch(ticket, Ok(fleet(&[9]))));
        assert_eq!(dashboard.records().len(), 1);
        assert_eq!(dashboard.status(), ViewStatus::Table);
    }

    #[test]
    fn failure_keeps_previous_records() {
        let mut dashboard = Dashboard::new();
        let ticket = dashboard.begin_fetch();
        dashboard.complete_fetch(ticket, Ok(fleet(&[1, 2])));

        let ticket = dashboard.begin_fetch();
        dashboard.complete_fetch(ticket, Err(FetchError::Transport("connection refused".into())));

        assert_eq!(dashboard.status(), ViewStatus::Failed("connection refused"));
        assert_eq!(dashboard.records().len(), 2);
    }

    #[test]
    fn reload_clears_error() {
        let mut dashboard = Dashboard::new();
        let ticket = dashboard.begin_fetch();
        dashboard.complete_fetch(ticket, Err(FetchError::Status(http::StatusCode::BAD_GATEWAY)));
        assert_eq!(dashboard.status(), ViewStatus::Failed("failed to fetch positions"));

        dashboard.begin_fetch();
        assert_eq!(dashboard.state(), &FetchState::Loading);
    }

    #[test]
    fn stale_result_discarded() {
        let mut dashboard = Dashboard::new();
        let first = dashboard.begin_fetch();
        let second = dashboard.begin_fetch();

        // newer request resolves first
        assert!(dashboard.complete_fetch(second, Ok(fleet(&[2]))));
        assert!(!dashboard.complete_fetch(first, Ok(fleet(&[1, 1, 1]))));

        assert_eq!(dashboard.records().len(), 1);
        assert_eq!(dashboard.state(), &FetchState::Loaded);
    }

    #[test]
    fn stays_loading_until_latest_resolves() {
        let mut dashboard = Dashboard::new();
        let first = dashboard.begin_fetch();
        let second = dashboard.begin_fetch();

        assert!(!dashboard.complete_fetch(first, Ok(fleet(&[1]))));
        assert_eq!(dashboard.state(), &FetchState::Loading);

        assert!(dashboard.complete_fetch(second, Err(FetchError::Decode("bad".into()))));
        assert_eq!(dashboard.state(), &FetchState::Failed("bad".into()));
        assert!(dashboard.records().is_empty());
    }

    #[test]
    fn settings_apply_while_loading() {
        let mut dashboard = Dashboard::new();
        let ticket = dashboard.begin_fetch();
        dashboard.complete_fetch(ticket, Ok(fleet(&[3, 1, 2])));

        dashboard.begin_fetch();
        dashboard.toggle_sort(SortKey::Identificador);
        dashboard.set_type_filter(TypeFilter::Only("CARRO".into()));

        let ids: Vec<_> = dashboard
            .table()
            .records
            .iter()
            .filter_map(|r| r.identificador.as_ref())
            .map(ToString::to_string)
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}
