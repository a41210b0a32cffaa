//! Page-key cursor over the extension listing
//!
//! Streams are lazy and restartable: each call to [`ExtensionPager::pages`]
//! starts again at the first page. The first error ends the stream.

use std::collections::HashSet;
use std::sync::Arc;

use dynext_core::ExtensionApi;
use dynext_domain::constants::DEFAULT_PAGE_SIZE;
use dynext_domain::{DynextError, ExtensionListPage, ExtensionSummary, Result};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

enum Cursor {
    First,
    Next(String),
    Exhausted,
}

/// Cursor position plus every page key already followed.
struct Walk {
    cursor: Cursor,
    seen: HashSet<String>,
}

/// Walks every page of the extension listing.
#[derive(Clone)]
pub struct ExtensionPager {
    api: Arc<dyn ExtensionApi>,
    page_size: u32,
}

impl ExtensionPager {
    /// Pager with the default page size.
    pub fn new(api: Arc<dyn ExtensionApi>) -> Self {
        Self { api, page_size: DEFAULT_PAGE_SIZE }
    }

    /// Override the page size; zero is raised to one.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Stream of pages, following `nextPageKey` until it is absent.
    pub fn pages(&self, cancel: CancellationToken) -> BoxStream<'static, Result<ExtensionListPage>> {
        let api = Arc::clone(&self.api);
        let page_size = self.page_size;

        let start = Walk { cursor: Cursor::First, seen: HashSet::new() };
        stream::try_unfold(start, move |mut walk| {
            let api = Arc::clone(&api);
            let cancel = cancel.clone();
            async move {
                let key = match walk.cursor {
                    Cursor::Exhausted => return Ok(None),
                    Cursor::First => None,
                    Cursor::Next(key) => {
                        if !walk.seen.insert(key.clone()) {
                            return Err(DynextError::decoding(format!(
                                "extension listing returned page key '{key}' twice"
                            )));
                        }
                        Some(key)
                    }
                };

                let page = api.list_extensions(page_size, key.as_deref(), &cancel).await?;
                debug!(items = page.extensions.len(), last = page.is_last(), "listing page fetched");

                walk.cursor = match &page.next_page_key {
                    Some(next) => Cursor::Next(next.clone()),
                    None => Cursor::Exhausted,
                };
                Ok(Some((page, walk)))
            }
        })
        .boxed()
    }

    /// Stream of individual summaries across all pages.
    pub fn items(&self, cancel: CancellationToken) -> BoxStream<'static, Result<ExtensionSummary>> {
        self.pages(cancel)
            .map_ok(|page| stream::iter(page.extensions.into_iter().map(Ok)))
            .try_flatten()
            .boxed()
    }

    /// Collect every summary into memory.
    pub async fn collect(&self, cancel: CancellationToken) -> Result<Vec<ExtensionSummary>> {
        self.items(cancel).try_collect().await
    }
}
