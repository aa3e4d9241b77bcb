mod fetch;

use crate::cache::QueryCache;
use crate::config::{ClassTokens, PlacementFn, WidgetConfig, WidgetHooks};
use crate::debounce::Debouncer;
use crate::error::ResolutionError;
use crate::menu::{MenuContainer, MenuStateMachine, Renderer};
use crate::present::Presenter;
use crate::source::{Resolution, ResultSource, Transport};
use crate::Result;
use fetch::FetchSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use typeahead_types::{FieldNames, MenuState, RenderPlan, ResultItem, WidgetEvent, WidgetUpdate};

/// One incremental search widget bound to one input.
///
/// Owns its query cache, menu state and current render plan exclusively.
/// All state is touched from a single task; timers and fetch completions are
/// multiplexed by [`Autocomplete::run`].
pub struct Autocomplete {
    fields: FieldNames,
    source: ResultSource,
    transport: Arc<dyn Transport>,
    renderer: Box<dyn Renderer>,
    placement: Option<PlacementFn>,
    container: MenuContainer,

    cache: QueryCache,
    presenter: Presenter,
    menu: MenuStateMachine,
    plan: Option<RenderPlan>,

    /// Live value of the input element
    input: String,

    debounce: Debouncer,
    blur_grace: Duration,
    /// Pending deferred close after blur
    blur_close_at: Option<Instant>,

    fetches: FetchSet,

    /// Channel to send updates to observers
    update_tx: UnboundedSender<WidgetUpdate>,

    torn_down: bool,
}

impl Autocomplete {
    /// Create a widget. Returns the widget and a receiver for its updates.
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails validation.
    pub fn new(
        config: WidgetConfig,
        hooks: WidgetHooks,
        transport: Arc<dyn Transport>,
        renderer: Box<dyn Renderer>,
    ) -> Result<(Self, UnboundedReceiver<WidgetUpdate>)> {
        config.validate()?;

        let fields = config.field_names();
        let tokens = ClassTokens::resolve(&config);
        let container = MenuContainer {
            class: tokens.menu.clone(),
        };
        let presenter = Presenter::new(tokens, fields.clone(), config.highlight, hooks.format);
        let source = ResultSource::from(config.source.clone());
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        debug!(
            "Creating widget: remote={}, delay={}ms, highlight={}",
            source.is_remote(),
            config.delay,
            config.highlight
        );

        Ok((
            Self {
                fields,
                source,
                transport,
                renderer,
                placement: hooks.menu_placement,
                container,
                cache: QueryCache::new(),
                presenter,
                menu: MenuStateMachine::new(config.fade_in(), config.fade_out()),
                plan: None,
                input: String::new(),
                debounce: Debouncer::new(config.delay()),
                blur_grace: config.blur_grace(),
                blur_close_at: None,
                fetches: FetchSet::new(config.fetch_timeout()),
                update_tx,
                torn_down: false,
            },
            update_rx,
        ))
    }

    /// Process a host event - updates are sent via channel
    pub fn process(&mut self, event: WidgetEvent) {
        if self.torn_down {
            debug!("Ignoring {:?} after teardown", event);
            return;
        }

        match event {
            WidgetEvent::Input { text } => self.handle_input(text),
            WidgetEvent::Focus => self.handle_focus(),
            WidgetEvent::Blur => self.handle_blur(),
            WidgetEvent::ItemClicked { generation, index } => {
                self.handle_item_clicked(generation, index);
            }
            WidgetEvent::Teardown => self.shutdown(),
        }
    }

    /// Fire every timer whose deadline is at or before `now`
    pub fn poll_timers(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }

        if self.debounce.fire_if_due(now) {
            debug!("Debounce elapsed, resolving '{}'", self.input);
            self.update_results();
        }

        if self.blur_close_at.is_some_and(|at| now >= at) {
            self.blur_close_at = None;
            debug!("Blur grace period elapsed");
            self.close_menu();
        }
    }

    /// Earliest pending timer deadline
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.debounce.deadline(), self.blur_close_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Drive the widget until teardown or until the event channel closes.
    pub async fn run(mut self, mut events: UnboundedReceiver<WidgetEvent>) {
        info!("Widget event loop started");

        loop {
            let deadline = self.next_deadline();

            tokio::select! {
                event = events.recv() => {
                    if let Some(event) = event {
                        self.process(event);
                    } else {
                        debug!("Event channel closed");
                        self.shutdown();
                    }
                }
                () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.poll_timers(Instant::now());
                }
                Some((query, outcome)) = self.fetches.next_completion(), if !self.fetches.is_empty() => {
                    self.complete_fetch(&query, outcome);
                }
            }

            if self.torn_down {
                break;
            }
        }

        info!("Widget event loop stopped");
    }

    /// Spawn the event loop on the current runtime.
    /// Returns the event sender for the host and the loop's handle.
    #[must_use]
    pub fn spawn(self) -> (UnboundedSender<WidgetEvent>, JoinHandle<()>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(self.run(event_rx));
        (event_tx, handle)
    }

    /// Cancel every timer and abort in-flight fetches. Idempotent.
    pub fn shutdown(&mut self) {
        if self.torn_down {
            return;
        }
        self.debounce.cancel();
        self.blur_close_at = None;
        self.fetches.abort_all();
        self.torn_down = true;
        info!("Widget torn down");
    }

    /// Install the results of a finished remote fetch.
    ///
    /// Successful results are cached under the query they were requested
    /// with. They are rendered only if that query is still the live input;
    /// an answer for a superseded query is kept for later hits but not shown.
    ///
    /// Failures are reported as `ResolutionFailed` and never cached. A
    /// malformed payload for the live query additionally renders an empty
    /// plan and opens the menu; transport failures and timeouts leave the
    /// menu as it is.
    pub fn complete_fetch(
        &mut self,
        query: &str,
        outcome: std::result::Result<Vec<ResultItem>, ResolutionError>,
    ) {
        match outcome {
            Ok(results) => {
                info!("Fetched {} results for '{}'", results.len(), query);
                let results = self.cache.store(query, results);
                if self.input == query {
                    self.process_results(&results);
                } else {
                    debug!(
                        "Discarding stale results for '{}' (input is now '{}')",
                        query, self.input
                    );
                }
            }
            Err(e) => {
                warn!("Failed to resolve '{}': {}", query, e);
                let malformed = matches!(e, ResolutionError::Malformed(_));
                self.send_update(WidgetUpdate::ResolutionFailed {
                    query: query.to_string(),
                    message: e.to_string(),
                });

                // A payload that arrived but was not a result list still
                // opens the menu, empty
                if malformed && self.input == query {
                    self.process_results(&[]);
                }
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> MenuState {
        self.menu.state()
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn plan(&self) -> Option<&RenderPlan> {
        self.plan.as_ref()
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.menu.attached()
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    #[must_use]
    pub fn pending_fetches(&self) -> usize {
        self.fetches.len()
    }

    fn handle_input(&mut self, text: String) {
        self.input = text;

        if self.input.is_empty() {
            self.debounce.cancel();
            self.reset_menu();
            return;
        }

        self.debounce.schedule(Instant::now());
    }

    /// Open the menu. Focus also cancels a deferred close from an earlier
    /// blur, so re-focusing within the grace period keeps the menu open.
    fn handle_focus(&mut self) {
        self.blur_close_at = None;
        self.open_menu();
    }

    fn handle_blur(&mut self) {
        self.debounce.cancel();
        self.blur_close_at = Some(Instant::now() + self.blur_grace);
        debug!("Blur: closing in {}ms", self.blur_grace.as_millis());
    }

    fn handle_item_clicked(&mut self, generation: u64, index: usize) {
        let Some(plan) = &self.plan else {
            warn!("Item click with no rendered plan");
            return;
        };

        if plan.generation != generation {
            warn!(
                "Ignoring click on item from plan {} (current plan is {})",
                generation, plan.generation
            );
            return;
        }

        let Some(item) = plan.item(index) else {
            warn!("Item {} not found in plan {}", index, generation);
            return;
        };

        let value = item.label_text();
        debug!("Selected '{}'", value);

        self.input.clone_from(&value);
        self.renderer.set_input_value(&value);
        self.debounce.cancel();
        self.blur_close_at = None;
        self.send_update(WidgetUpdate::Selected { value });
        self.close_menu();
    }

    /// Resolve the live input and show its results
    fn update_results(&mut self) {
        let query = self.input.clone();

        if query.is_empty() {
            self.reset_menu();
            return;
        }

        if let Some(results) = self.cache.get(&query) {
            debug!("Cache hit for '{}' ({} results)", query, results.len());
            self.process_results(&results);
            return;
        }

        if self.fetches.is_in_flight(&query) {
            debug!("Fetch for '{}' already in flight", query);
            return;
        }

        debug!("Cache miss for '{}'", query);
        match self
            .source
            .resolve(&query, &self.fields, self.transport.as_ref())
        {
            Resolution::Ready(results) => {
                let results = self.cache.store(&query, results);
                self.process_results(&results);
            }
            Resolution::Pending(fetch) => self.fetches.dispatch(query, fetch),
        }
    }

    fn process_results(&mut self, results: &[ResultItem]) {
        let plan = self.presenter.present(results, &self.input);

        self.menu.ensure_attached(
            &self.container,
            self.placement.as_mut(),
            self.renderer.as_mut(),
        );
        self.renderer.render(&plan);
        self.send_update(WidgetUpdate::Rendered {
            generation: plan.generation,
            item_count: plan.item_count(),
        });
        self.plan = Some(plan);

        self.open_menu();
    }

    fn reset_menu(&mut self) {
        self.renderer.clear();
        self.plan = None;
        self.close_menu();
    }

    fn open_menu(&mut self) {
        let update = self.menu.open(self.renderer.as_mut());
        self.send_update(update);
    }

    fn close_menu(&mut self) {
        if let Some(update) = self.menu.close(self.renderer.as_mut()) {
            self.send_update(update);
        }
    }

    /// Send an update to observers
    fn send_update(&self, update: WidgetUpdate) {
        if let Err(e) = self.update_tx.send(update) {
            error!("Failed to send update: {}", e);
        }
    }
}

impl Drop for Autocomplete {
    fn drop(&mut self) {
        self.shutdown();
    }
}
