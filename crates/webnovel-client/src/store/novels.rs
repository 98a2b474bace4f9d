use std::collections::HashMap;

use futures_signals::{
    signal::Mutable,
    signal_vec::MutableVec,
};
use serde::Serialize;
use webnovel_lib::models::{Chapter, Novel, NovelFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Library view state. Not persisted, the content service is the source of
/// truth for novels.
#[derive(Clone)]
pub struct NovelStore {
    novels: MutableVec<Novel>,
    filter: Mutable<NovelFilter>,
    selected: Mutable<Option<Novel>>,
    chapters: Mutable<HashMap<String, Vec<Chapter>>>,
    current_chapter: Mutable<Option<(String, Chapter)>>,
    status: Mutable<QueryStatus>,
    error: Mutable<Option<String>>,
}

impl NovelStore {
    pub fn new() -> Self {
        Self {
            novels: MutableVec::new(),
            filter: Mutable::new(NovelFilter::All),
            selected: Mutable::new(None),
            chapters: Mutable::new(HashMap::new()),
            current_chapter: Mutable::new(None),
            status: Mutable::new(QueryStatus::Idle),
            error: Mutable::new(None),
        }
    }

    pub fn novels(&self) -> Vec<Novel> {
        self.novels.lock_ref().to_vec()
    }

    pub fn filtered_novels(&self) -> Vec<Novel> {
        let filter = self.filter.get();
        self.novels
            .lock_ref()
            .iter()
            .filter(|novel| filter.matches(novel))
            .cloned()
            .collect()
    }

    pub fn filter(&self) -> NovelFilter {
        self.filter.get()
    }

    pub fn selected(&self) -> Option<Novel> {
        self.selected.get_cloned()
    }

    pub fn chapters(&self, novel_id: &str) -> Option<Vec<Chapter>> {
        self.chapters.lock_ref().get(novel_id).cloned()
    }

    pub fn current_chapter(&self) -> Option<Chapter> {
        self.current_chapter
            .lock_ref()
            .as_ref()
            .map(|(_, chapter)| chapter.clone())
    }

    pub fn status(&self) -> QueryStatus {
        self.status.get()
    }

    pub fn error(&self) -> Option<String> {
        self.error.get_cloned()
    }

    pub fn set_novels(&self, novels: Vec<Novel>) {
        self.novels.lock_mut().replace_cloned(novels);
    }

    pub fn filter_by_type(&self, filter: NovelFilter) {
        self.filter.set_neq(filter);
    }

    pub fn select(&self, novel: Option<Novel>) {
        self.selected.set(novel);
    }

    pub fn set_chapters(&self, novel_id: &str, chapters: Vec<Chapter>) {
        self.chapters
            .lock_mut()
            .insert(novel_id.to_string(), chapters);
    }

    pub fn set_current_chapter(&self, novel_id: &str, chapter: Option<Chapter>) {
        self.current_chapter
            .set(chapter.map(|chapter| (novel_id.to_string(), chapter)));
    }

    pub fn add(&self, novel: Novel) {
        self.novels.lock_mut().push_cloned(novel);
    }

    /// Replaces the novel with the same id, in the list and as the selection
    pub fn update(&self, novel: Novel) {
        {
            let mut novels = self.novels.lock_mut();
            if let Some(index) = position(&novels, &novel.id) {
                novels.set_cloned(index, novel.clone());
            }
        }

        let mut selected = self.selected.lock_mut();
        if selected.as_ref().is_some_and(|s| s.id == novel.id) {
            *selected = Some(novel);
        }
    }

    pub fn remove(&self, novel_id: &str) {
        {
            let mut novels = self.novels.lock_mut();
            if let Some(index) = position(&novels, novel_id) {
                novels.remove(index);
            }
        }

        let mut selected = self.selected.lock_mut();
        if selected.as_ref().is_some_and(|s| s.id == novel_id) {
            *selected = None;
        }
        drop(selected);

        self.chapters.lock_mut().remove(novel_id);
    }

    /// Flips the read flag of one chapter wherever this store holds a copy
    pub fn mark_chapter_read(&self, novel_id: &str, chapter_number: u32, read: bool) {
        let mark = |chapter: &mut Chapter| {
            if chapter.chapter_number == chapter_number {
                chapter.read = read;
            }
        };

        if let Some(chapters) = self.chapters.lock_mut().get_mut(novel_id) {
            chapters.iter_mut().for_each(mark);
        }

        if let Some(novel) = self.selected.lock_mut().as_mut() {
            if novel.id == novel_id {
                if let Some(chapters) = novel.chapters.as_mut() {
                    chapters.iter_mut().for_each(mark);
                }
            }
        }

        if let Some((id, chapter)) = self.current_chapter.lock_mut().as_mut() {
            if id.as_str() == novel_id {
                mark(chapter);
            }
        }
    }

    pub fn set_status(&self, status: QueryStatus) {
        self.status.set_neq(status);
    }

    pub fn set_error(&self, error: Option<String>) {
        if error.is_some() {
            self.status.set_neq(QueryStatus::Error);
        }
        self.error.set(error);
    }
}

impl Default for NovelStore {
    fn default() -> Self {
        Self::new()
    }
}

fn position(novels: &[Novel], novel_id: &str) -> Option<usize> {
    novels.iter().position(|novel| novel.id == novel_id)
}

#[cfg(test)]
mod test {
    use super::*;
    use webnovel_lib::models::NovelType;

    fn novel(id: &str, kind: NovelType) -> Novel {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "title": format!("Novel {id}"),
            "source_url": format!("https://example.com/{id}"),
            "source_name": "example",
            "type": kind.as_str(),
            "chapters": [
                {"title": "Chapter 1", "chapter_number": 1, "url": "https://example.com/1"},
                {"title": "Chapter 2", "chapter_number": 2, "url": "https://example.com/2"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_filter_by_type() {
        let store = NovelStore::new();
        store.set_novels(vec![
            novel("a", NovelType::Novel),
            novel("b", NovelType::Manhwa),
            novel("c", NovelType::Novel),
        ]);

        assert_eq!(store.filtered_novels().len(), 3);
        store.filter_by_type(NovelFilter::Manhwa);
        let ids: Vec<_> = store.filtered_novels().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(store.novels().len(), 3);
    }

    #[test]
    fn test_update_and_remove_follow_selection() {
        let store = NovelStore::new();
        store.set_novels(vec![novel("a", NovelType::Novel)]);
        store.select(Some(novel("a", NovelType::Novel)));

        let mut updated = novel("a", NovelType::Novel);
        updated.title = "Renamed".to_string();
        store.update(updated);
        assert_eq!(store.novels()[0].title, "Renamed");
        assert_eq!(store.selected().map(|n| n.title), Some("Renamed".to_string()));

        store.remove("a");
        assert!(store.novels().is_empty());
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_add_appends() {
        let store = NovelStore::new();
        store.add(novel("a", NovelType::Novel));
        store.add(novel("b", NovelType::Manhwa));
        assert_eq!(store.novels().len(), 2);
    }

    #[test]
    fn test_mark_chapter_read() {
        let store = NovelStore::new();
        let selected = novel("a", NovelType::Novel);
        let chapters = selected.chapters.clone().unwrap();
        store.select(Some(selected));
        store.set_chapters("a", chapters.clone());
        store.set_current_chapter("a", Some(chapters[1].clone()));

        store.mark_chapter_read("a", 2, true);

        assert!(store.selected().unwrap().chapter(2).unwrap().read);
        assert!(!store.selected().unwrap().chapter(1).unwrap().read);
        assert!(store.chapters("a").unwrap()[1].read);
        assert!(store.current_chapter().unwrap().read);

        store.mark_chapter_read("other", 1, true);
        assert!(!store.selected().unwrap().chapter(1).unwrap().read);
    }

    #[test]
    fn test_error_sets_status() {
        let store = NovelStore::new();
        store.set_status(QueryStatus::Loading);
        store.set_error(Some("Server error. Please try again later.".to_string()));
        assert_eq!(store.status(), QueryStatus::Error);
    }
}
