//! Per-process presentation state.
//!
//! A [`Session`] owns the API client, the display locale, the most recent
//! successful [`AnalysisResult`] and the "submit disabled" flag. Only one
//! analysis may be in flight at a time; a second submission is rejected
//! with [`LensError::Busy`] rather than queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use crate::client::AnalysisClient;
use crate::error::{LensError, ValidationError};
use crate::locale::Locale;
use crate::model::AnalysisResult;
use crate::render::HistoryPanel;

pub struct Session {
    client: AnalysisClient,
    locale: Locale,
    current: Mutex<Option<Arc<AnalysisResult>>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when dropped, on success and failure alike.
struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn new(client: AnalysisClient, locale: Locale) -> Self {
        Self {
            client,
            locale,
            current: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn client(&self) -> &AnalysisClient {
        &self.client
    }

    /// `true` while an analysis request is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<AnalysisResult>>> {
        // The slot holds plain data, so a poisoned lock is still usable.
        self.current.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// The most recent successful result, if any.
    pub fn current(&self) -> Option<Arc<AnalysisResult>> {
        self.slot().clone()
    }

    /// Back to the input view: forget the current result.
    pub fn reset(&self) {
        self.slot().take();
    }

    /// Validate, submit, and on success make the result current.
    ///
    /// A failed request leaves the previous result untouched. The submit flag
    /// is always cleared before this returns.
    pub async fn analyze(&self, text: &str) -> Result<Arc<AnalysisResult>, LensError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        let _guard = SubmitGuard::acquire(&self.in_flight).ok_or(LensError::Busy)?;

        match self.client.submit_analysis(text).await {
            Ok(result) => {
                info!(
                    prediction = %result.prediction,
                    confidence = result.confidence,
                    "analysis complete"
                );
                let result = Arc::new(result);
                *self.slot() = Some(Arc::clone(&result));
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, "analysis failed");
                Err(e)
            }
        }
    }

    /// Load history into a panel; any failure becomes the "unavailable" placeholder.
    pub async fn history_panel(&self) -> HistoryPanel {
        match self.client.fetch_history().await {
            Ok(items) => HistoryPanel::from_items(&items, self.locale),
            Err(e) => {
                warn!(error = %e, "history unavailable");
                HistoryPanel::Unavailable
            }
        }
    }
}
