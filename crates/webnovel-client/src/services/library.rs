use webnovel_lib::models::{
    ChapterPage, ContentFormat, DownloadRange, Language, Novel, NovelCreate, NovelUpdate,
};

use crate::{
    api::{ApiClient, ChapterResponse, EpubFile, novels::DEFAULT_LIST_LIMIT},
    error::Error,
    store::{NovelStore, QueryStatus},
};

/// Novel operations that keep the [`NovelStore`] in step with the content
/// service
#[derive(Clone)]
pub struct LibraryService {
    api: ApiClient,
    store: NovelStore,
}

impl LibraryService {
    pub fn new(api: ApiClient, store: NovelStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &NovelStore {
        &self.store
    }

    fn track<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        match &result {
            Ok(_) => {
                self.store.set_error(None);
                self.store.set_status(QueryStatus::Success);
            }
            Err(e) => self.store.set_error(Some(e.to_string())),
        }
        result
    }

    pub async fn refresh(&self) -> Result<Vec<Novel>, Error> {
        self.store.set_status(QueryStatus::Loading);
        let novels = self.track(self.api.list_novels(0, DEFAULT_LIST_LIMIT).await)?;
        debug!("library has {} novels", novels.len());
        self.store.set_novels(novels.clone());

        Ok(novels)
    }

    pub async fn open(&self, novel_id: &str) -> Result<Novel, Error> {
        self.store.set_status(QueryStatus::Loading);
        let novel = self.track(self.api.get_novel(novel_id).await)?;
        if let Some(chapters) = &novel.chapters {
            self.store.set_chapters(&novel.id, chapters.clone());
        }
        self.store.select(Some(novel.clone()));

        Ok(novel)
    }

    pub async fn create(&self, novel: &NovelCreate) -> Result<Novel, Error> {
        let novel = self.api.create_novel(novel).await?;
        info!("added {} ({})", novel.title, novel.id);
        self.store.add(novel.clone());

        Ok(novel)
    }

    pub async fn update(&self, novel_id: &str, update: &NovelUpdate) -> Result<Novel, Error> {
        let novel = self.api.update_novel(novel_id, update).await?;
        self.store.update(novel.clone());

        Ok(novel)
    }

    pub async fn delete(&self, novel_id: &str) -> Result<(), Error> {
        self.api.delete_novel(novel_id).await?;
        info!("deleted {novel_id}");
        self.store.remove(novel_id);

        Ok(())
    }

    /// Rescrapes the chapter list upstream
    pub async fn refresh_chapters(&self, novel_id: &str) -> Result<ChapterPage, Error> {
        let page = self.api.fetch_chapters(novel_id).await?;
        info!("{novel_id} now lists {} chapters", page.chapters.len());
        self.store.set_chapters(novel_id, page.chapters.clone());

        Ok(page)
    }

    pub async fn read_chapter(
        &self,
        novel_id: &str,
        chapter_number: u32,
        format: ContentFormat,
        language: Language,
    ) -> Result<ChapterResponse, Error> {
        let content = self
            .api
            .get_chapter(novel_id, chapter_number, format, language)
            .await?;

        let chapter = self
            .store
            .chapters(novel_id)
            .and_then(|chapters| {
                chapters
                    .into_iter()
                    .find(|chapter| chapter.chapter_number == chapter_number)
            });
        if chapter.is_some() {
            self.store.set_current_chapter(novel_id, chapter);
        }

        Ok(content)
    }

    pub async fn update_reading_progress(
        &self,
        novel_id: &str,
        current_chapter: u32,
    ) -> Result<Novel, Error> {
        let novel = self
            .api
            .update_reading_progress(novel_id, current_chapter)
            .await?;
        self.store.update(novel.clone());
        self.store.mark_chapter_read(novel_id, current_chapter, true);

        Ok(novel)
    }

    pub async fn download(&self, novel_id: &str, range: DownloadRange) -> Result<EpubFile, Error> {
        let file = self.api.download_novel(novel_id, range).await?;
        info!("downloaded {} ({} bytes)", file.filename, file.bytes.len());

        Ok(file)
    }

    pub async fn download_chapters(
        &self,
        novel_id: &str,
        chapter_numbers: &[u32],
        language: Language,
    ) -> Result<EpubFile, Error> {
        let file = self
            .api
            .download_chapters(novel_id, chapter_numbers, language)
            .await?;
        info!("downloaded {} ({} bytes)", file.filename, file.bytes.len());

        Ok(file)
    }
}
