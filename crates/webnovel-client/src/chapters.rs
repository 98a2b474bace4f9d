//! Paginated chapter list for a single novel view.
//!
//! Page 1 replaces the list, later pages are merged in: chapters whose
//! `chapter_number` is already present are dropped and the rest are appended
//! in server order. Toggling the sort order rebuilds the list from page 1.
//! Responses that arrive after the view moved on (another novel, another
//! sort order) are discarded.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures_signals::{
    map_ref,
    signal::{Mutable, Signal},
    signal_vec::MutableVec,
};
use webnovel_lib::models::{Chapter, ChapterPage, ChapterQuery, SortOrder};

use crate::{api::ApiClient, config::ClientConfig, error::Error};

pub const DEFAULT_SCROLL_PROXIMITY: f64 = 1.2;

#[async_trait]
pub trait ChapterSource: Send + Sync {
    async fn list_chapters(&self, novel_id: &str, query: ChapterQuery)
    -> Result<ChapterPage, Error>;
}

#[async_trait]
impl ChapterSource for ApiClient {
    async fn list_chapters(
        &self,
        novel_id: &str,
        query: ChapterQuery,
    ) -> Result<ChapterPage, Error> {
        ApiClient::list_chapters(self, novel_id, query).await
    }
}

#[async_trait]
impl<T: ChapterSource + ?Sized> ChapterSource for Arc<T> {
    async fn list_chapters(
        &self,
        novel_id: &str,
        query: ChapterQuery,
    ) -> Result<ChapterPage, Error> {
        (**self).list_chapters(novel_id, query).await
    }
}

/// `true` when the viewport is within `factor` viewport heights of the end
/// of the list
pub fn near_bottom(scroll_top: f64, scroll_height: f64, client_height: f64, factor: f64) -> bool {
    scroll_height - scroll_top <= client_height * factor
}

/// Chapters of `page` whose number is neither in `existing` nor earlier in
/// `page`, in page order
fn unseen(existing: &[Chapter], page: Vec<Chapter>) -> Vec<Chapter> {
    let mut seen: HashSet<u32> = existing.iter().map(|c| c.chapter_number).collect();
    page.into_iter()
        .filter(|chapter| seen.insert(chapter.chapter_number))
        .collect()
}

/// Clears a busy flag when the load that raised it finishes or is dropped.
/// A load superseded by a newer generation leaves the flag to the newer one.
struct BusyGuard<'a> {
    flag: &'a Mutable<bool>,
    generation: &'a AtomicU64,
    raised_at: u64,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if self.generation.load(Ordering::SeqCst) == self.raised_at {
            self.flag.set_neq(false);
        }
    }
}

pub struct ChapterController<S> {
    source: S,
    page_size: u32,
    scroll_proximity: f64,
    novel_id: Mutable<Option<String>>,
    sort_order: Mutable<SortOrder>,
    current_page: Mutable<u32>,
    total_pages: Mutable<u32>,
    exhausted: Mutable<bool>,
    chapters: MutableVec<Chapter>,
    loading: Mutable<bool>,
    is_loading_more: Mutable<bool>,
    error: Mutable<Option<String>>,
    /// bumped whenever the list is rebuilt, responses carrying an older
    /// value are stale
    generation: AtomicU64,
}

impl<S: ChapterSource> ChapterController<S> {
    pub fn new(source: S, page_size: u32) -> Self {
        Self {
            source,
            page_size,
            scroll_proximity: DEFAULT_SCROLL_PROXIMITY,
            novel_id: Mutable::new(None),
            sort_order: Mutable::new(SortOrder::default()),
            current_page: Mutable::new(1),
            total_pages: Mutable::new(0),
            exhausted: Mutable::new(false),
            chapters: MutableVec::new(),
            loading: Mutable::new(false),
            is_loading_more: Mutable::new(false),
            error: Mutable::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn from_config(source: S, config: &ClientConfig) -> Self {
        Self::new(source, config.page_size).with_scroll_proximity(config.scroll_proximity)
    }

    pub fn with_scroll_proximity(mut self, factor: f64) -> Self {
        self.scroll_proximity = factor;
        self
    }

    pub fn novel_id(&self) -> Option<String> {
        self.novel_id.get_cloned()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order.get()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page.get()
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages.get()
    }

    pub fn chapters(&self) -> Vec<Chapter> {
        self.chapters.lock_ref().to_vec()
    }

    pub fn len(&self) -> usize {
        self.chapters.lock_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.lock_ref().is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more.get()
    }

    pub fn error(&self) -> Option<String> {
        self.error.get_cloned()
    }

    pub fn has_more(&self) -> bool {
        !self.exhausted.get() && self.current_page.get() < self.total_pages.get()
    }

    pub fn has_more_signal(&self) -> impl Signal<Item = bool> + use<S> {
        map_ref! {
            let exhausted = self.exhausted.signal(),
            let current_page = self.current_page.signal(),
            let total_pages = self.total_pages.signal() =>

            !*exhausted && *current_page < *total_pages
        }
    }

    /// Rebuilds the list from page 1 of `novel_id` in `sort_order`. A call
    /// matching the initial load already in flight is a no-op, any other
    /// call supersedes whatever is in flight.
    pub async fn load_initial(&self, novel_id: &str, sort_order: SortOrder) -> Result<(), Error> {
        let novel_id = novel_id.trim();
        if novel_id.is_empty() {
            let err = Error::from(webnovel_lib::error::Error::MissingField("novel_id"));
            self.error.set(Some(err.to_string()));
            return Err(err);
        }

        if self.loading.get()
            && self.sort_order.get() == sort_order
            && self.novel_id.lock_ref().as_deref() == Some(novel_id)
        {
            debug!("page 1 of {novel_id} ({sort_order}) already loading");
            return Ok(());
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.novel_id.set(Some(novel_id.to_string()));
        self.sort_order.set_neq(sort_order);
        self.current_page.set(1);
        self.total_pages.set(0);
        self.exhausted.set(false);
        self.chapters.lock_mut().clear();
        self.error.set(None);
        // a superseded next page fetch never clears its own flag
        self.is_loading_more.set_neq(false);
        self.loading.set_neq(true);
        let busy = BusyGuard {
            flag: &self.loading,
            generation: &self.generation,
            raised_at: generation,
        };

        let query = ChapterQuery::new(1, self.page_size, sort_order);
        let result = self.source.list_chapters(novel_id, query).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding stale page 1 of {novel_id} ({sort_order})");
            return Ok(());
        }
        drop(busy);

        match result {
            Ok(page) => {
                debug!(
                    "loaded page 1/{} of {novel_id} ({sort_order}), {} chapters",
                    page.total_pages,
                    page.chapters.len()
                );
                self.total_pages.set(page.total_pages);
                self.exhausted.set(page.chapters.is_empty());
                self.chapters
                    .lock_mut()
                    .replace_cloned(unseen(&[], page.chapters));
                Ok(())
            }
            Err(e) => {
                error!("failed to load chapters of {novel_id}: {e:?}");
                self.error.set(Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Fetches and merges the page after `current_page`. Does nothing while
    /// any load is running or when there is nothing left to fetch.
    pub async fn load_next_page(&self) -> Result<(), Error> {
        if self.loading.get() || !self.has_more() {
            return Ok(());
        }
        let Some(novel_id) = self.novel_id.get_cloned() else {
            return Ok(());
        };
        if self.is_loading_more.replace(true) {
            return Ok(());
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let _busy = BusyGuard {
            flag: &self.is_loading_more,
            generation: &self.generation,
            raised_at: generation,
        };
        let sort_order = self.sort_order.get();
        let next = self.current_page.get() + 1;

        let query = ChapterQuery::new(next, self.page_size, sort_order);
        let result = self.source.list_chapters(&novel_id, query).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding stale page {next} of {novel_id} ({sort_order})");
            return Ok(());
        }

        match result {
            Ok(page) => {
                let received = page.chapters.len();
                self.total_pages.set(page.total_pages);
                if page.chapters.is_empty() {
                    self.exhausted.set(true);
                }

                let mut chapters = self.chapters.lock_mut();
                let fresh = unseen(&chapters, page.chapters);
                debug!(
                    "loaded page {next}/{} of {novel_id} ({sort_order}), {} of {received} chapters new",
                    page.total_pages,
                    fresh.len()
                );
                for chapter in fresh {
                    chapters.push_cloned(chapter);
                }
                drop(chapters);

                self.current_page.set(next);
                self.error.set(None);
                Ok(())
            }
            Err(e) => {
                error!("failed to load page {next} of {novel_id}: {e:?}");
                self.error.set(Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Flips the sort order and rebuilds the list from page 1
    pub async fn toggle_sort_order(&self) -> Result<(), Error> {
        let sort_order = self.sort_order.get().toggled();
        match self.novel_id.get_cloned() {
            Some(novel_id) => self.load_initial(&novel_id, sort_order).await,
            None => {
                self.sort_order.set(sort_order);
                Ok(())
            }
        }
    }

    /// Scroll handler, loads the next page once the end of the list is
    /// close enough
    pub async fn on_scroll(
        &self,
        scroll_top: f64,
        scroll_height: f64,
        client_height: f64,
    ) -> Result<(), Error> {
        if near_bottom(scroll_top, scroll_height, client_height, self.scroll_proximity) {
            self.load_next_page().await
        } else {
            Ok(())
        }
    }
}

impl<S: ChapterSource> std::fmt::Debug for ChapterController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChapterController")
            .field("novel_id", &self.novel_id.get_cloned())
            .field("sort_order", &self.sort_order.get())
            .field("current_page", &self.current_page.get())
            .field("total_pages", &self.total_pages.get())
            .field("chapters", &self.len())
            .field("loading", &self.loading.get())
            .field("is_loading_more", &self.is_loading_more.get())
            .finish()
    }
}
