use crate::host::{HostDocument, HostError, find_all_items};
use crate::metrics::DispatchMetrics;
use crate::models::{ParsedCatalog, RequestCode, SelectionResult};
use crate::request::Mailbox;
use crate::services::{CatalogError, CatalogQuery, CatalogStore, group_attributes};
use crate::ui::FrontEnd;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Errors raised while dispatching a request
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Host query failed: {0}")]
    Host(#[from] HostError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Where the handler is within one wake-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Dispatching(RequestCode),
}

/// What a single [`RequestHandler::execute`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Mailbox was empty (spurious or coalesced wake)
    NoRequest,

    /// The request ran to completion
    Completed(RequestCode),

    /// The mailbox held a discriminant no handler exists for
    Ignored(u8),
}

type Handler<H, F> = fn(&mut RequestHandler<H, F>) -> Result<(), DispatchError>;

/// Re-arms the front-end when dropped, including during unwinding.
struct RearmGuard<F: FrontEnd + ?Sized>(Arc<F>);

impl<F: FrontEnd + ?Sized> Drop for RearmGuard<F> {
    fn drop(&mut self) {
        self.0.rearm();
    }
}

/// Executes requests on the host-processing thread.
///
/// Owns the host document and the catalog state; nothing else touches them.
/// Each [`execute`](Self::execute) call takes whatever is in the mailbox,
/// runs that one request to completion and re-arms the front-end.
pub struct RequestHandler<H, F: ?Sized> {
    mailbox: Arc<Mailbox>,
    document: H,
    front_end: Arc<F>,
    store: CatalogStore,
    query: CatalogQuery,
    parsed: ParsedCatalog,
    selection: SelectionResult,
    state: DispatchState,
    metrics: Arc<DispatchMetrics>,
}

impl<H, F> RequestHandler<H, F>
where
    H: HostDocument,
    F: FrontEnd + ?Sized,
{
    pub fn new(
        mailbox: Arc<Mailbox>,
        document: H,
        front_end: Arc<F>,
        store: CatalogStore,
        metrics: Arc<DispatchMetrics>,
    ) -> Self {
        Self {
            mailbox,
            document,
            front_end,
            store,
            query: CatalogQuery::new(),
            parsed: ParsedCatalog::default(),
            selection: SelectionResult::default(),
            state: DispatchState::Idle,
            metrics,
        }
    }

    /// Name reported in logs
    pub fn name(&self) -> &'static str {
        "paramgroups request handler"
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Catalog as last reread from disk
    pub fn parsed_catalog(&self) -> &ParsedCatalog {
        &self.parsed
    }

    /// Result of the last selection request
    pub fn selection(&self) -> &SelectionResult {
        &self.selection
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Handle one wake-up.
    ///
    /// The front-end is re-armed on every path out of this function: normal
    /// return, error, and panic.
    pub fn execute(&mut self) -> Result<DispatchOutcome, DispatchError> {
        let _rearm = RearmGuard(Arc::clone(&self.front_end));

        if let DispatchState::Dispatching(code) = self.state {
            tracing::warn!("Previous {} dispatch did not complete", code);
            self.state = DispatchState::Idle;
        }

        let code = match self.mailbox.take_and_clear() {
            Ok(code) => code,
            Err(unknown) => {
                tracing::warn!("Ignoring unexpected request: {}", unknown);
                self.metrics.record_unrecognized();
                return Ok(DispatchOutcome::Ignored(unknown.0));
            }
        };

        self.metrics.record_request(code);

        let Some(handler) = Self::handler_for(code) else {
            tracing::trace!("Woken with no pending request");
            return Ok(DispatchOutcome::NoRequest);
        };

        tracing::debug!("Dispatching {}", code);
        self.state = DispatchState::Dispatching(code);
        let result = handler(self);
        self.state = DispatchState::Idle;

        match result {
            Ok(()) => Ok(DispatchOutcome::Completed(code)),
            Err(e) => {
                self.metrics.record_failure();
                Err(e)
            }
        }
    }

    fn handler_for(code: RequestCode) -> Option<Handler<H, F>> {
        match code {
            RequestCode::None => None,
            RequestCode::Initial => Some(Self::on_initial),
            RequestCode::ChangeSelection => Some(Self::on_change_selection),
        }
    }

    /// Rebuild the catalog from the document and fill the primary list.
    fn on_initial(&mut self) -> Result<(), DispatchError> {
        let started = Instant::now();

        let items = find_all_items(&self.document)?;
        let groups = group_attributes(&items);
        self.store.write_catalog(&groups)?;

        self.parsed = self.store.read_catalog()?;
        self.store.write_index(&self.parsed)?;

        self.metrics.record_catalog_build(started.elapsed());
        tracing::info!(
            "Catalog rebuilt from {} items: {} groups in {:.2}s",
            items.len(),
            self.parsed.titles.len(),
            started.elapsed().as_secs_f32()
        );

        self.front_end.set_primary_list(self.parsed.titles.clone());
        Ok(())
    }

    /// Fill the secondary list with the attributes of the selected group.
    fn on_change_selection(&mut self) -> Result<(), DispatchError> {
        self.selection.clear();

        match self.front_end.selected_title() {
            Some(title) => {
                self.selection = self.query.select(&self.parsed, &title);
                tracing::debug!("{} attributes under {:?}", self.selection.len(), title);
            }
            None => tracing::warn!("Selection changed but no title is selected"),
        }

        self.front_end
            .set_secondary_list(self.selection.attributes().to_vec());
        Ok(())
    }
}
