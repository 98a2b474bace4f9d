use reqwest::Method;
use webnovel_lib::models::{
    ChapterContent, ChapterPage, ChapterQuery, ContentFormat, DownloadRange, Language,
};

use super::{ApiClient, EpubFile, decode, epub, is_epub, novels::check_id};
use crate::error::Error;

/// Chapter content comes back as JSON or as an EPUB depending on the
/// requested format
#[derive(Debug, Clone)]
pub enum ChapterResponse {
    Content(ChapterContent),
    Epub(EpubFile),
}

impl ApiClient {
    pub async fn list_chapters(
        &self,
        novel_id: &str,
        query: ChapterQuery,
    ) -> Result<ChapterPage, Error> {
        check_id(novel_id)?;
        query.validate()?;
        self.get(
            &format!("/novels/{novel_id}/chapters"),
            &[
                ("page", query.page.to_string()),
                ("page_size", query.page_size.to_string()),
                ("sort_order", query.sort_order.to_string()),
            ],
        )
        .await
    }

    /// Asks the content service to scrape the source again and returns what
    /// it found
    pub async fn fetch_chapters(&self, novel_id: &str) -> Result<ChapterPage, Error> {
        check_id(novel_id)?;
        let res = self
            .send(
                Method::POST,
                &format!("/novels/{novel_id}/chapters/fetch"),
                |req| req,
            )
            .await?;
        decode(res).await
    }

    pub async fn get_chapter(
        &self,
        novel_id: &str,
        chapter_number: u32,
        format: ContentFormat,
        language: Language,
    ) -> Result<ChapterResponse, Error> {
        check_id(novel_id)?;
        check_chapter(chapter_number)?;
        let res = self
            .send(
                Method::GET,
                &format!("/novels/{novel_id}/chapters/{chapter_number}"),
                |req| req.query(&[("format", format.as_str()), ("language", language.as_str())]),
            )
            .await?;

        if is_epub(&res) {
            let file = epub(res, &format!("chapter_{chapter_number}.epub")).await?;
            Ok(ChapterResponse::Epub(file))
        } else {
            Ok(ChapterResponse::Content(decode(res).await?))
        }
    }

    pub async fn download_novel(
        &self,
        novel_id: &str,
        range: DownloadRange,
    ) -> Result<EpubFile, Error> {
        check_id(novel_id)?;
        range.validate()?;
        let res = self
            .send(
                Method::GET,
                &format!("/novels/{novel_id}/download"),
                |req| req.query(&range.query_pairs()),
            )
            .await?;
        epub(res, &format!("{novel_id}.epub")).await
    }

    pub async fn download_chapters(
        &self,
        novel_id: &str,
        chapter_numbers: &[u32],
        language: Language,
    ) -> Result<EpubFile, Error> {
        check_id(novel_id)?;
        if chapter_numbers.is_empty() {
            return Err(webnovel_lib::error::Error::MissingField("chapter_numbers").into());
        }
        for &chapter_number in chapter_numbers {
            check_chapter(chapter_number)?;
        }

        let res = self
            .send(
                Method::POST,
                &format!("/novels/{novel_id}/chapters/download"),
                |req| {
                    req.query(&[("language", language.as_str())])
                        .json(chapter_numbers)
                },
            )
            .await?;

        let fallback = match chapter_numbers {
            [single] => format!("chapter_{single}.epub"),
            _ => format!("{novel_id}.epub"),
        };
        epub(res, &fallback).await
    }
}

fn check_chapter(chapter_number: u32) -> Result<(), Error> {
    if chapter_number < 1 {
        return Err(webnovel_lib::error::Error::invalid("chapter_number", "chapters start at 1").into());
    }
    Ok(())
}
