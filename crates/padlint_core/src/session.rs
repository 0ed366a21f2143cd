//! Per-document check session.
//!
//! A remote check runs in three steps so that the session is never
//! borrowed across the network call:
//!
//! 1. [`CheckSession::begin_check`] (or [`on_timer_fired`] /
//!    [`request_check`]) takes a snapshot and returns a [`CheckTicket`]
//!    together with the request to send.
//! 2. The host awaits [`Checker::check`] with that request.
//! 3. [`CheckSession::complete_check`] commits the result, unless the
//!    ticket no longer matches the session.
//!
//! [`check_now`](CheckSession::check_now) chains the three steps for callers
//! that own the session exclusively.
//!
//! [`on_timer_fired`]: CheckSession::on_timer_fired
//! [`request_check`]: CheckSession::request_check

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use padlint_cache::ResultCache;
use padlint_client::{CheckRequest, CheckResponse, Checker, ClientError, Issue};
use padlint_text::{Fingerprint, LineRange, OffsetMap};

use crate::SessionError;
use crate::applicator;
use crate::config::SessionConfig;
use crate::document::{HighlightSurface, HostDocument};
use crate::highlight::{HighlightRecord, HighlightRegistry, Popup};
use crate::mapper::{self, DroppedIssue, MappingReport};
use crate::scheduler::{Scheduler, SchedulerState, TimerDecision, TimerRequest, TimerToken};
use crate::snapshot::{TextSnapshot, snapshot};

/// Source of check generations, shared by all sessions so that a ticket
/// never matches a session it was not issued by.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Fingerprint and revision of the last content a check was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LastChecked {
    fingerprint: Fingerprint,
    revision: Option<u64>,
}

impl LastChecked {
    fn of(snapshot: &TextSnapshot) -> Self {
        Self {
            fingerprint: snapshot.fingerprint,
            revision: snapshot.revision,
        }
    }

    fn matches(&self, snapshot: &TextSnapshot) -> bool {
        if self.fingerprint != snapshot.fingerprint {
            return false;
        }
        match (self.revision, snapshot.revision) {
            (Some(then), Some(now)) => then == now,
            _ => true,
        }
    }
}

/// Proof of an in-flight remote check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTicket {
    fingerprint: Fingerprint,
    revision: Option<u64>,
    document: String,
    generation: u64,
    forced: bool,
}

impl CheckTicket {
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    /// Whether the check was requested manually.
    pub fn is_forced(&self) -> bool {
        self.forced
    }
}

/// Why a check did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Content has not changed since the last check.
    Unchanged,
    /// Nothing but whitespace to check.
    EmptyText,
    /// A later edit superseded the timer.
    StaleTimer,
    /// A check is running; the timer comes back when it finishes.
    Deferred,
}

/// Result of asking the session to start a check.
#[derive(Debug)]
pub enum CheckStart {
    Skipped(SkipReason),
    /// Answered from the cache; highlights are already rendered.
    Cached(CheckReport),
    /// Send `request` to the checker and pass the answer to
    /// [`CheckSession::complete_check`] with `ticket`.
    Remote {
        ticket: CheckTicket,
        request: CheckRequest,
    },
}

/// Where the rendered issues came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Checker,
    Cache,
    /// Blank text; no check was needed.
    Empty,
}

/// Summary of a committed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub fingerprint: Fingerprint,
    pub source: ResultSource,
    /// Issues returned for the text.
    pub issue_count: usize,
    /// Highlights now live.
    pub rendered: usize,
    /// Issues that could not be placed.
    pub dropped: Vec<DroppedIssue>,
    /// The checker flagged its result as incomplete.
    pub incomplete: bool,
}

impl CheckReport {
    fn empty(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            source: ResultSource::Empty,
            issue_count: 0,
            rendered: 0,
            dropped: Vec::new(),
            incomplete: false,
        }
    }

    /// One-line message for the user.
    pub fn summary(&self) -> String {
        if self.issue_count > 0 {
            format!("Found {} error(s)", self.issue_count)
        } else {
            "No errors found".to_string()
        }
    }
}

/// Why a checker result was not rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The session was reset or switched documents meanwhile.
    Superseded,
    /// The document identity no longer matches.
    DocumentChanged,
    /// The content was edited during the call.
    ContentChanged,
}

/// What happened to a completed remote check.
#[derive(Debug)]
pub enum CheckStatus {
    Rendered(CheckReport),
    Discarded(DiscardReason),
    Failed(ClientError),
}

/// Completion of a remote check.
#[derive(Debug)]
#[must_use]
pub struct CheckOutcome {
    pub status: CheckStatus,
    /// Whether the check was requested manually.
    pub forced: bool,
    /// A debounce timer the host must start.
    pub timer: Option<TimerRequest>,
}

impl CheckOutcome {
    /// Turns the outcome into what the requester sees.
    ///
    /// Transport failures surface only for manual checks.
    pub fn into_result(self) -> Result<Option<CheckReport>, SessionError> {
        match self.status {
            CheckStatus::Rendered(report) => Ok(Some(report)),
            CheckStatus::Discarded(_) => Ok(None),
            CheckStatus::Failed(e) if self.forced => Err(SessionError::Transport(e)),
            CheckStatus::Failed(_) => Ok(None),
        }
    }
}

/// All check state of one document.
#[derive(Debug)]
pub struct CheckSession<D> {
    config: SessionConfig,
    document: D,
    scheduler: Scheduler,
    cache: ResultCache,
    registry: HighlightRegistry,
    last_checked: Option<LastChecked>,
    generation: u64,
}

impl<D> CheckSession<D>
where
    D: HostDocument + HighlightSurface,
{
    pub fn new(config: SessionConfig, document: D) -> Self {
        let scheduler = Scheduler::new(config.auto_check, config.debounce());
        let cache = ResultCache::new(config.cache_size);
        let registry = HighlightRegistry::new(&document);

        debug!(
            "Session for '{}' ({} renderer)",
            document.identity(),
            registry.renderer_name()
        );

        Self {
            config,
            document,
            scheduler,
            cache,
            registry,
            last_checked: None,
            generation: next_generation(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access for host-side edits; follow up with [`on_edit`](Self::on_edit).
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Disables the result cache (`--no-cache`).
    pub fn disable_cache(&mut self) {
        self.cache.disable();
    }

    pub fn highlights(&self) -> &HighlightRegistry {
        &self.registry
    }

    pub fn lookup(&self, id: &str) -> Option<&HighlightRecord> {
        self.registry.lookup(id)
    }

    pub fn status(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn is_checking(&self) -> bool {
        self.scheduler.is_checking()
    }

    /// Whether the content differs from what was last checked.
    pub fn needs_check(&self) -> bool {
        self.has_changed(&snapshot(&self.document))
    }

    /// Records an edit. Start the returned timer, if any.
    pub fn on_edit(&mut self) -> Option<TimerRequest> {
        self.scheduler.on_edit()
    }

    /// Handles a fired debounce timer.
    pub fn on_timer_fired(&mut self, token: TimerToken) -> Result<CheckStart, SessionError> {
        match self.scheduler.on_timer_fired(token) {
            TimerDecision::Stale => Ok(CheckStart::Skipped(SkipReason::StaleTimer)),
            TimerDecision::Deferred => Ok(CheckStart::Skipped(SkipReason::Deferred)),
            TimerDecision::Due => self.begin_check(false),
        }
    }

    /// Starts a manual check: no debounce, no change guard, no cache.
    pub fn request_check(&mut self) -> Result<CheckStart, SessionError> {
        self.begin_check(true)
    }

    /// Starts a check.
    ///
    /// Fails with [`SessionError::AlreadyInProgress`] while another check
    /// runs. Starting a remote check clears the current highlights.
    pub fn begin_check(&mut self, force: bool) -> Result<CheckStart, SessionError> {
        if self.scheduler.is_checking() {
            debug!("Check already in progress, skipping");
            return Err(SessionError::AlreadyInProgress);
        }

        let snap = snapshot(&self.document);

        if !force && !self.has_changed(&snap) {
            debug!("Content unchanged ({}), skipping", snap.fingerprint);
            self.scheduler.settle();
            return Ok(CheckStart::Skipped(SkipReason::Unchanged));
        }

        if snap.is_blank() {
            debug!("Document is blank, skipping");
            self.registry.clear(&mut self.document);
            self.last_checked = Some(LastChecked::of(&snap));
            self.scheduler.settle();
            return Ok(CheckStart::Skipped(SkipReason::EmptyText));
        }

        if force {
            self.cache.clear();
        } else if let Some(issues) = self.cache.issues(snap.fingerprint) {
            let issues = issues.to_vec();
            self.last_checked = Some(LastChecked::of(&snap));
            self.scheduler.settle();
            info!("Using cached result for {}", snap.fingerprint);
            let report = self.render(snap.fingerprint, &issues, ResultSource::Cache, false);
            return Ok(CheckStart::Cached(report));
        }

        self.scheduler.start()?;
        self.registry.clear(&mut self.document);
        self.last_checked = Some(LastChecked::of(&snap));
        self.generation = next_generation();

        let ticket = CheckTicket {
            fingerprint: snap.fingerprint,
            revision: snap.revision,
            document: self.document.identity().to_string(),
            generation: self.generation,
            forced: force,
        };
        let request = CheckRequest::new(snap.text, self.config.default_language.clone())
            .with_filters(self.config.filters.clone());

        debug!(
            "Starting {} check of {}",
            if force { "manual" } else { "automatic" },
            ticket.fingerprint
        );
        Ok(CheckStart::Remote { ticket, request })
    }

    /// Commits the checker's answer for `ticket`.
    pub fn complete_check(
        &mut self,
        ticket: CheckTicket,
        result: Result<CheckResponse, ClientError>,
    ) -> CheckOutcome {
        let forced = ticket.forced;

        if ticket.generation != self.generation {
            warn!("Discarding result of superseded check {}", ticket.fingerprint);
            return CheckOutcome {
                status: CheckStatus::Discarded(DiscardReason::Superseded),
                forced,
                timer: None,
            };
        }

        let timer = self.scheduler.finish();
        let outcome = |status: CheckStatus| CheckOutcome {
            status,
            forced,
            timer,
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!("Check failed: {}", e);
                // Allow a retry of the same content.
                self.last_checked = None;
                return outcome(CheckStatus::Failed(e));
            }
        };

        if self.document.identity() != ticket.document {
            warn!(
                "Document changed from '{}' to '{}' during check",
                ticket.document,
                self.document.identity()
            );
            self.cache.clear();
            self.last_checked = None;
            return outcome(CheckStatus::Discarded(DiscardReason::DocumentChanged));
        }

        self.cache.put(ticket.fingerprint, response.matches.clone());

        let current = snapshot(&self.document);
        if current.fingerprint != ticket.fingerprint {
            warn!(
                "Content changed during check ({} -> {}), discarding result",
                ticket.fingerprint, current.fingerprint
            );
            return outcome(CheckStatus::Discarded(DiscardReason::ContentChanged));
        }

        let report = self.render(
            ticket.fingerprint,
            &response.matches,
            ResultSource::Checker,
            response.is_incomplete(),
        );
        outcome(CheckStatus::Rendered(report))
    }

    /// Runs a manual check to completion.
    pub async fn check_now<C: Checker>(&mut self, checker: &C) -> Result<CheckReport, SessionError> {
        let (ticket, request) = match self.request_check()? {
            CheckStart::Remote { ticket, request } => (ticket, request),
            CheckStart::Cached(report) => return Ok(report),
            CheckStart::Skipped(_) => {
                return Ok(CheckReport::empty(snapshot(&self.document).fingerprint));
            }
        };

        let result = checker.check(request).await;
        self.complete_check(ticket, result)
            .into_result()?
            .ok_or(SessionError::Discarded)
    }

    /// Opens the suggestion popup of a highlight.
    pub fn open_popup(&mut self, id: &str) -> Result<Popup, SessionError> {
        self.registry
            .open_popup(&mut self.document, id)
            .ok_or_else(|| SessionError::UnknownHighlight(id.to_string()))
    }

    pub fn close_popup(&mut self) {
        self.registry.close_popup(&mut self.document);
    }

    /// Dismisses a suggestion. The highlight stays.
    pub fn reject(&mut self, id: &str) -> Result<(), SessionError> {
        if self.registry.lookup(id).is_none() {
            return Err(SessionError::UnknownHighlight(id.to_string()));
        }
        self.registry.close_popup(&mut self.document);
        debug!("Rejected suggestion for {}", id);
        Ok(())
    }

    /// Replaces the text of highlight `id` with `replacement`.
    pub fn accept(&mut self, id: &str, replacement: &str) -> Result<LineRange, SessionError> {
        let record = self
            .registry
            .lookup(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownHighlight(id.to_string()))?;

        match applicator::apply(&mut self.document, &mut self.registry, &record, replacement) {
            Ok(range) => {
                self.registry.close_popup(&mut self.document);
                self.last_checked = None;
                Ok(range)
            }
            Err(e) => {
                self.registry.close_popup(&mut self.document);
                Err(e)
            }
        }
    }

    /// Accepts the first suggestion of `id`.
    ///
    /// Without a suggestion this only closes the popup and returns `None`.
    pub fn accept_first(&mut self, id: &str) -> Result<Option<LineRange>, SessionError> {
        let replacement = self
            .registry
            .lookup(id)
            .ok_or_else(|| SessionError::UnknownHighlight(id.to_string()))?
            .issue
            .first_replacement()
            .map(str::to_string);

        match replacement {
            Some(text) => self.accept(id, &text).map(Some),
            None => {
                self.registry.close_popup(&mut self.document);
                Ok(None)
            }
        }
    }

    /// Moves the session to another document, returning the previous one.
    ///
    /// Highlights and timers are dropped and any in-flight result will be
    /// discarded. The cache is cleared when the identity changes.
    pub fn switch_document(&mut self, document: D) -> D {
        self.registry.clear(&mut self.document);
        let previous = mem::replace(&mut self.document, document);

        if previous.identity() != self.document.identity() {
            info!(
                "Switched document '{}' -> '{}'",
                previous.identity(),
                self.document.identity()
            );
            self.cache.clear();
        }

        self.registry = HighlightRegistry::new(&self.document);
        self.scheduler.reset();
        self.last_checked = None;
        self.generation = next_generation();
        previous
    }

    /// Drops all state: highlights, cache, timers and in-flight results.
    pub fn reset(&mut self) {
        self.registry.clear(&mut self.document);
        self.cache.clear();
        self.scheduler.reset();
        self.last_checked = None;
        self.generation = next_generation();
    }

    fn has_changed(&self, snap: &TextSnapshot) -> bool {
        self.last_checked.is_none_or(|last| !last.matches(snap))
    }

    fn current_lines(&self) -> Vec<String> {
        match self.document.lines() {
            Ok(lines) => lines,
            Err(e) => {
                debug!("Line export unavailable ({}), splitting snapshot", e);
                snapshot(&self.document)
                    .text
                    .split('\n')
                    .map(str::to_string)
                    .collect()
            }
        }
    }

    fn render(
        &mut self,
        fingerprint: Fingerprint,
        issues: &[Issue],
        source: ResultSource,
        incomplete: bool,
    ) -> CheckReport {
        let lines = self.current_lines();
        let map = OffsetMap::from_lines(&lines);
        let MappingReport { records, dropped } = mapper::map_with(&map, issues);

        let rendered = self
            .registry
            .render(&mut self.document, records, map.line_lengths());

        let report = CheckReport {
            fingerprint,
            source,
            issue_count: issues.len(),
            rendered,
            dropped,
            incomplete,
        };
        info!("{}", report.summary());
        report
    }
}
