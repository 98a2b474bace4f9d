use reqwest::Method;
use webnovel_lib::models::{Novel, NovelCreate, NovelUpdate};

use super::{ApiClient, NO_QUERY, decode};
use crate::error::Error;

pub const DEFAULT_LIST_LIMIT: u32 = 100;

impl ApiClient {
    pub async fn list_novels(&self, skip: u32, limit: u32) -> Result<Vec<Novel>, Error> {
        self.get("/novels", &[("skip", skip), ("limit", limit)])
            .await
    }

    pub async fn get_novel(&self, novel_id: &str) -> Result<Novel, Error> {
        check_id(novel_id)?;
        self.get(&format!("/novels/{novel_id}"), NO_QUERY).await
    }

    pub async fn create_novel(&self, novel: &NovelCreate) -> Result<Novel, Error> {
        novel.validate()?;
        let res = self
            .send(Method::POST, "/novels", |req| req.json(novel))
            .await?;
        decode(res).await
    }

    pub async fn update_novel(&self, novel_id: &str, update: &NovelUpdate) -> Result<Novel, Error> {
        check_id(novel_id)?;
        update.validate()?;
        let res = self
            .send(Method::PATCH, &format!("/novels/{novel_id}"), |req| {
                req.json(update)
            })
            .await?;
        decode(res).await
    }

    pub async fn delete_novel(&self, novel_id: &str) -> Result<(), Error> {
        check_id(novel_id)?;
        self.send(Method::DELETE, &format!("/novels/{novel_id}"), |req| req)
            .await?;
        Ok(())
    }

    pub async fn update_reading_progress(
        &self,
        novel_id: &str,
        current_chapter: u32,
    ) -> Result<Novel, Error> {
        check_id(novel_id)?;
        if current_chapter < 1 {
            return Err(webnovel_lib::error::Error::invalid(
                "current_chapter",
                "chapters start at 1",
            )
            .into());
        }
        let res = self
            .send(
                Method::PATCH,
                &format!("/novels/{novel_id}/reading-progress"),
                |req| req.query(&[("current_chapter", current_chapter)]),
            )
            .await?;
        decode(res).await
    }
}

pub(crate) fn check_id(novel_id: &str) -> Result<(), Error> {
    if novel_id.trim().is_empty() {
        return Err(webnovel_lib::error::Error::MissingField("novel_id").into());
    }
    Ok(())
}
