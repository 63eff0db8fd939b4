//! Pagination collector
//!
//! A [`PageCollector`] walks a list-shaped method page by page. It is pulled,
//! never pushed: each [`PageCollector::next_page`] makes at most one call
//! through the client, so pages are strictly sequential and every call is
//! paced by the client's scheduler.
//!
//! ```text
//!          next_page            success, continue
//!   Idle ───────────▶ (call) ─────────────────────▶ Idle
//!                        │ success, stop / no items
//!                        ├──────────────────────────▶ Done
//!                        │ error
//!                        └──────────────────────────▶ Failed(err)
//! ```

use futures::stream::{self, Stream};
use tracing::{debug, info, warn};
use vkclient_domain::{Page, PageQuery, VkError};

use super::client::VkClient;

/// Where a collector is in its run
#[derive(Debug, Clone, PartialEq)]
pub enum CollectorState {
    /// Ready to request the page at the current offset
    Idle,
    /// Finished normally; no further calls will be made
    Done,
    /// A call failed; the error was returned once and is kept here
    Failed(VkError),
}

/// Forward-only producer of the pages of one method
#[derive(Debug)]
pub struct PageCollector {
    client: VkClient,
    method: String,
    query: PageQuery,
    items_seen: u64,
    pages: usize,
    state: CollectorState,
}

impl PageCollector {
    pub(crate) fn new(client: VkClient, method: &str, query: PageQuery) -> Self {
        let state = if query.limit_reached(0) {
            debug!(method, "explicit limit of zero, nothing to collect");
            CollectorState::Done
        } else {
            CollectorState::Idle
        };

        Self { client, method: method.to_string(), query, items_seen: 0, pages: 0, state }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn state(&self) -> &CollectorState {
        &self.state
    }

    /// Offset the next page will be requested at.
    pub fn offset(&self) -> u64 {
        self.query.offset()
    }

    pub fn items_seen(&self) -> u64 {
        self.items_seen
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self.state, CollectorState::Idle)
    }

    /// Fetch the next page.
    ///
    /// Returns `None` once the run is over, without contacting the remote
    /// service. A failure is returned exactly once and leaves the collector
    /// in [`CollectorState::Failed`].
    pub async fn next_page(&mut self) -> Option<Result<Page, VkError>> {
        if self.is_finished() {
            return None;
        }

        let offset = self.query.offset();
        let params = self.query.page_params(self.items_seen);
        debug!(method = %self.method, offset, "requesting page");

        let response = match self.client.call(&self.method, params).await {
            Ok(response) => response,
            Err(err) => {
                warn!(method = %self.method, offset, error = %err, "collection failed");
                self.state = CollectorState::Failed(err.clone());
                return Some(Err(err));
            }
        };

        let Some(page) = Page::from_response(response) else {
            debug!(method = %self.method, offset, "response has no items, collection finished");
            self.state = CollectorState::Done;
            return None;
        };

        let page_len = page.len() as u64;
        self.items_seen += page_len;
        self.pages += 1;
        debug!(
            method = %self.method,
            offset,
            items = page_len,
            total = ?page.total_count,
            "page received"
        );

        // an empty page cannot move the offset, so it always ends the run
        if page_len > 0 && self.query.should_continue(self.items_seen, page.total_count) {
            self.query.advance(page_len);
        } else {
            info!(
                method = %self.method,
                pages = self.pages,
                items = self.items_seen,
                "collection finished"
            );
            self.state = CollectorState::Done;
        }

        Some(Ok(page))
    }

    /// Turn the collector into a [`Stream`] of pages.
    pub fn into_stream(self) -> impl Stream<Item = Result<Page, VkError>> + Send {
        stream::unfold(self, |mut collector| async move {
            collector.next_page().await.map(|page| (page, collector))
        })
    }
}
