//! Per-screen view controller.
//!
//! Owns one screen's records and `ViewState`, drives the fetch collaborator,
//! and re-runs the engine pipeline synchronously after every change.
//!
//! Phases: `Idle → Loading → Ready`, `Ready → Ready` on local changes,
//! `Ready → Loading → Ready` on refetch, and `Loading → Error` on a failed
//! fetch. An error keeps the last good result; there is no automatic retry.

use crate::fetch::{ListFetcher, QueryParams};
use crate::mutation::{Mutation, RecordMutator};
use crate::{Error, Result};
use abaca_engine::ExportFormat;
use abaca_types::{
    DateRange, EntityKind, FilterSelection, RawRecord, Record, SortSpec, ViewConfig, ViewResult,
    ViewState,
};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Identifies one fetch attempt. Results for any ticket other than the most
/// recent one are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// The only failure states a user sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    LoadFailed,
    Empty,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::LoadFailed => "Failed to load records. Please try again later.",
            Notice::Empty => "No records found.",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewController {
    entity: EntityKind,
    config: ViewConfig,
    state: ViewState,
    query: QueryParams,
    records: Vec<Record>,
    result: ViewResult,
    phase: Phase,
    /// Phase of the last applied fetch, restored when an in-flight fetch is
    /// invalidated without a newer one replacing it
    settled: Phase,
    generation: u64,
    /// Generation of the newest outstanding fetch
    in_flight: Option<u64>,
    mounted: bool,
    last_error: Option<String>,
}

impl ViewController {
    pub fn new(entity: EntityKind, config: ViewConfig) -> Self {
        let state = ViewState::new(&config);
        let result = ViewResult::empty(state.page_size());
        Self {
            entity,
            config,
            state,
            query: QueryParams::new(),
            records: Vec::new(),
            result,
            phase: Phase::Idle,
            settled: Phase::Idle,
            generation: 0,
            in_flight: None,
            mounted: true,
            last_error: None,
        }
    }

    /// Controller using the built-in view for the entity
    pub fn builtin(entity: EntityKind) -> Self {
        Self::new(entity, abaca_engine::catalog::view_config(entity).clone())
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn result(&self) -> &ViewResult {
        &self.result
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn notice(&self) -> Option<Notice> {
        match self.phase {
            Phase::Error => Some(Notice::LoadFailed),
            Phase::Ready if self.result.is_empty() => Some(Notice::Empty),
            _ => None,
        }
    }

    /// Change server-side fetch parameters. Any fetch still in flight
    /// becomes stale and its result is dropped when it resolves, which puts
    /// the phase back to the last settled one; call `load` to fetch with the
    /// new parameters.
    pub fn set_query(&mut self, query: QueryParams) {
        if query != self.query {
            self.query = query;
            self.generation += 1;
        }
    }

    /// Screen went away: every outstanding fetch result will be discarded
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.in_flight = Some(self.generation);
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Apply a resolved fetch. Returns false when the result was discarded
    /// because the ticket is stale or the screen is unmounted.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<RawRecord>>,
    ) -> bool {
        if !self.mounted || ticket.generation != self.generation {
            debug!(
                entity = %self.entity,
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale fetch result"
            );
            if self.in_flight == Some(ticket.generation) {
                self.in_flight = None;
                self.phase = self.settled;
            }
            return false;
        }

        self.in_flight = None;
        match outcome {
            Ok(raws) => {
                self.records = abaca_engine::normalize_records(&raws, &self.config);
                self.last_error = None;
                self.phase = Phase::Ready;
                self.recompute();
            }
            Err(err) => {
                warn!(entity = %self.entity, error = %err, "failed to load records");
                self.last_error = Some(err.to_string());
                self.phase = Phase::Error;
            }
        }
        self.settled = self.phase;
        true
    }

    pub async fn load<F: ListFetcher>(&mut self, fetcher: &F) -> Phase {
        if !self.mounted {
            debug!(entity = %self.entity, "load skipped on unmounted view");
            return self.phase;
        }
        let ticket = self.begin_fetch();
        let outcome = fetcher.fetch_list(self.entity, &self.query).await;
        self.complete_fetch(ticket, outcome);
        self.phase
    }

    /// Apply a mutation; on success refetch the whole list. A failed
    /// mutation leaves records and state untouched.
    pub async fn mutate<M, F>(
        &mut self,
        mutator: &M,
        fetcher: &F,
        mutation: &Mutation,
    ) -> Result<Phase>
    where
        M: RecordMutator,
        F: ListFetcher,
    {
        if !self.mounted {
            return Err(Error::InvalidOperation(
                "cannot mutate records of an unmounted view".to_string(),
            ));
        }

        if let Err(err) = mutator.apply(self.entity, mutation).await {
            warn!(entity = %self.entity, %mutation, error = %err, "mutation failed");
            return Err(err);
        }

        info!(entity = %self.entity, %mutation, "mutation applied, refetching");
        Ok(self.load(fetcher).await)
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.set_search(text);
        self.recompute();
    }

    pub fn set_filter(&mut self, field: &str, selection: FilterSelection) -> Result<()> {
        self.state.set_filter(&self.config, field, selection)?;
        self.recompute();
        Ok(())
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.state.set_date_range(range);
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.state.set_sort(sort);
        self.recompute();
    }

    pub fn toggle_sort(&mut self, field: &str) {
        self.state.toggle_sort(field);
        self.recompute();
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.set_page(page);
        self.recompute();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.set_page_size(page_size);
        self.recompute();
    }

    pub fn next_page(&mut self) {
        if self.result.has_next() {
            self.set_page(self.result.page + 1);
        }
    }

    pub fn previous_page(&mut self) {
        if self.result.has_previous() {
            self.set_page(self.result.page - 1);
        }
    }

    fn recompute(&mut self) {
        self.result = abaca_engine::run_view(&self.records, &self.config, &self.state);
    }

    /// Filtered, sorted, unpaginated records
    pub fn filtered(&self) -> Vec<&Record> {
        abaca_engine::filtered_records(&self.records, &self.config, &self.state)
    }

    /// Export the filtered set with the view's export columns
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        let columns = self.config.export_columns();
        Ok(abaca_engine::export(self.filtered(), &columns, format)?)
    }
}
