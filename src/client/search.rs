use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::client::{ClientError, ProductLookup};
use crate::features::products::dtos::ProductResponseDto;
use crate::shared::constants::{PRODUCT_DETAILS_PATH, RESULTS_PAGE_PATH, SEARCH_DEBOUNCE};

/// Visible state of the search widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Empty term, nothing shown
    Idle,
    /// Waiting for the debounce timer
    Pending,
    /// Request in flight, overlay shows a loading indicator
    Loading,
    /// At least one recommendation loaded
    Results,
    /// The last lookup matched nothing (or failed)
    Empty,
    /// Overlay hidden by a click outside the widget
    Dismissed,
}

/// What the caller should do with the debounce timer after a keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
    /// (Re)start the debounce timer for this keystroke
    Debounce { generation: u64 },
    /// Term is blank; drop any pending timer
    Cleared,
}

/// A lookup fired by the widget, tagged so late responses can be recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub term: String,
}

/// Search-as-you-type state machine
///
/// Pure state: timers and requests are driven from outside, see
/// [`DebouncedSearch`].
#[derive(Debug, Clone)]
pub struct SearchWidget {
    term: String,
    phase: SearchPhase,
    recommendations: Vec<ProductResponseDto>,
    overlay_visible: bool,
    generation: u64,
    last_lookup_failed: bool,
}

impl Default for SearchWidget {
    fn default() -> Self {
        Self {
            term: String::new(),
            phase: SearchPhase::Idle,
            recommendations: Vec::new(),
            overlay_visible: false,
            generation: 0,
            last_lookup_failed: false,
        }
    }
}

impl SearchWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn phase(&self) -> SearchPhase {
        match self.phase {
            SearchPhase::Loading | SearchPhase::Results | SearchPhase::Empty
                if !self.overlay_visible =>
            {
                SearchPhase::Dismissed
            }
            phase => phase,
        }
    }

    pub fn recommendations(&self) -> &[ProductResponseDto] {
        &self.recommendations
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Loading
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Whether the most recent applied lookup failed
    ///
    /// Failures are otherwise silent: the widget just shows no results.
    pub fn last_lookup_failed(&self) -> bool {
        self.last_lookup_failed
    }

    /// A keystroke replaced the term
    ///
    /// Any request still in flight becomes stale.
    pub fn input(&mut self, term: impl Into<String>) -> InputEffect {
        self.term = term.into();
        self.generation += 1;

        if self.term.trim().is_empty() {
            self.phase = SearchPhase::Idle;
            self.recommendations.clear();
            self.overlay_visible = false;
            self.last_lookup_failed = false;
            return InputEffect::Cleared;
        }

        self.phase = SearchPhase::Pending;
        InputEffect::Debounce {
            generation: self.generation,
        }
    }

    /// The debounce timer started for keystroke `generation` elapsed
    ///
    /// Returns the request to fire, if any. A timer from an earlier keystroke
    /// fires nothing: the newer keystroke has its own quiet period.
    pub fn debounce_elapsed(&mut self, generation: u64) -> Option<SearchRequest> {
        if generation != self.generation || self.phase != SearchPhase::Pending {
            return None;
        }

        let term = self.term.trim();
        if term.is_empty() {
            return None;
        }

        self.phase = SearchPhase::Loading;
        self.overlay_visible = true;
        Some(SearchRequest {
            generation: self.generation,
            term: term.to_string(),
        })
    }

    /// Apply the outcome of `request`; returns false when it was stale
    pub fn apply(
        &mut self,
        request: &SearchRequest,
        outcome: Result<Vec<ProductResponseDto>, ClientError>,
    ) -> bool {
        if request.generation != self.generation || self.phase != SearchPhase::Loading {
            tracing::debug!("Discarding stale search response for {:?}", request.term);
            return false;
        }

        match outcome {
            Ok(products) => {
                self.phase = if products.is_empty() {
                    SearchPhase::Empty
                } else {
                    SearchPhase::Results
                };
                self.recommendations = products;
                self.last_lookup_failed = false;
            }
            Err(e) => {
                tracing::warn!("Product lookup for {:?} failed: {}", request.term, e);
                self.phase = SearchPhase::Empty;
                self.recommendations.clear();
                self.last_lookup_failed = true;
            }
        }
        true
    }

    /// Hide the overlay; term and in-flight request are untouched
    pub fn click_outside(&mut self) {
        self.overlay_visible = false;
    }

    /// Path of the results page, if there is anything to search for
    pub fn submit(&self) -> Option<String> {
        let term = self.term.trim();
        if term.is_empty() && self.recommendations.is_empty() {
            return None;
        }
        Some(format!(
            "{}?query={}",
            RESULTS_PAGE_PATH,
            urlencoding::encode(term)
        ))
    }

    /// Path of the detail page for the recommendation at `index`
    pub fn select(&self, index: usize) -> Option<String> {
        self.recommendations.get(index).map(|product| {
            format!(
                "{}/{}",
                PRODUCT_DETAILS_PATH,
                urlencoding::encode(&product.code)
            )
        })
    }
}

/// Drives a [`SearchWidget`] with a real debounce timer and lookups
///
/// Each keystroke restarts the timer. When it fires, the lookup runs in its
/// own task, so later keystrokes never abort a request; its result is simply
/// discarded if it is stale by the time it lands.
pub struct DebouncedSearch {
    widget: Arc<Mutex<SearchWidget>>,
    lookup: Arc<dyn ProductLookup>,
    debounce: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedSearch {
    pub fn new(lookup: Arc<dyn ProductLookup>) -> Self {
        Self::with_debounce(lookup, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(lookup: Arc<dyn ProductLookup>, debounce: Duration) -> Self {
        Self {
            widget: Arc::new(Mutex::new(SearchWidget::new())),
            lookup,
            debounce,
            timer: Mutex::new(None),
        }
    }

    /// Current widget state
    pub async fn snapshot(&self) -> SearchWidget {
        self.widget.lock().await.clone()
    }

    pub async fn input(&self, term: impl Into<String>) {
        // Held for the whole keystroke so timer replacement follows input order
        let mut timer = self.timer.lock().await;
        let effect = self.widget.lock().await.input(term);

        if let Some(handle) = timer.take() {
            handle.abort();
        }

        if let InputEffect::Debounce { generation } = effect {
            let widget = Arc::clone(&self.widget);
            let lookup = Arc::clone(&self.lookup);
            let debounce = self.debounce;

            *timer = Some(tokio::spawn(async move {
                tokio::time::sleep(debounce).await;

                let Some(request) = widget.lock().await.debounce_elapsed(generation) else {
                    return;
                };

                tokio::spawn(async move {
                    let outcome = lookup.search(&request.term).await;
                    widget.lock().await.apply(&request, outcome);
                });
            }));
        }
    }

    pub async fn click_outside(&self) {
        self.widget.lock().await.click_outside();
    }

    pub async fn submit(&self) -> Option<String> {
        self.widget.lock().await.submit()
    }

    pub async fn select(&self, index: usize) -> Option<String> {
        self.widget.lock().await.select(index)
    }
}
