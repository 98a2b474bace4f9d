use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::Error, models::Chapter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NovelType {
    #[default]
    Novel,
    Manhwa,
}

impl NovelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NovelType::Novel => "novel",
            NovelType::Manhwa => "manhwa",
        }
    }
}

impl FromStr for NovelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "novel" | "webnovel" => Ok(NovelType::Novel),
            "manhwa" => Ok(NovelType::Manhwa),
            _ => Err(Error::UnknownVariant {
                kind: "novel type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for NovelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A novel as the content service returns it. Counters are only present on
/// some responses and are never derived locally.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Novel {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub source_url: String,
    pub source_name: String,
    #[serde(default)]
    pub source_language: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: NovelType,
    #[serde(default)]
    pub chapters: Option<Vec<Chapter>>,
    #[serde(default, with = "crate::datetime::option")]
    pub added_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::datetime::option")]
    pub last_updated_api: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::datetime::option")]
    pub last_updated_chapters: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::datetime::option")]
    pub last_scraped: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::datetime::option")]
    pub next_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub update_schedule: Option<String>,
    #[serde(default)]
    pub total_chapters: Option<u32>,
    #[serde(default)]
    pub last_chapter_number: Option<u32>,
    #[serde(default)]
    pub read_chapters: Option<u32>,
    #[serde(default)]
    pub downloaded_chapters: Option<u32>,
    #[serde(default)]
    pub reading_progress: Option<f64>,
}

impl Novel {
    pub fn chapter(&self, chapter_number: u32) -> Option<&Chapter> {
        self.chapters
            .as_ref()?
            .iter()
            .find(|chapter| chapter.chapter_number == chapter_number)
    }
}

/// Body of `POST /novels`. An empty title asks the content service to scrape
/// the metadata from `source_url`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NovelCreate {
    pub title: String,
    pub source_url: String,
    pub source_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: NovelType,
}

impl NovelCreate {
    pub fn validate(&self) -> Result<(), Error> {
        if self.source_url.trim().is_empty() {
            return Err(Error::MissingField("source_url"));
        }
        validate_url("source_url", &self.source_url)?;
        if self.source_name.trim().is_empty() {
            return Err(Error::MissingField("source_name"));
        }
        if let Some(cover) = &self.cover_image_url {
            validate_url("cover_image_url", cover)?;
        }
        Ok(())
    }
}

/// Body of `PATCH /novels/{id}`, only the fields that are set are sent
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NovelUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    pub kind: Option<NovelType>,
}

impl NovelUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.is_empty() {
            return Err(Error::EmptyUpdate);
        }
        if let Some(url) = &self.source_url {
            validate_url("source_url", url)?;
        }
        if let Some(url) = &self.cover_image_url {
            validate_url("cover_image_url", url)?;
        }
        Ok(())
    }
}

/// Filter applied by the library view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NovelFilter {
    #[default]
    All,
    Novel,
    Manhwa,
}

impl NovelFilter {
    pub fn matches(&self, novel: &Novel) -> bool {
        match self {
            NovelFilter::All => true,
            NovelFilter::Novel => novel.kind == NovelType::Novel,
            NovelFilter::Manhwa => novel.kind == NovelType::Manhwa,
        }
    }
}

impl FromStr for NovelFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(NovelFilter::All),
            other => other.parse::<NovelType>().map(|kind| match kind {
                NovelType::Novel => NovelFilter::Novel,
                NovelType::Manhwa => NovelFilter::Manhwa,
            }),
        }
    }
}

fn validate_url(field: &'static str, url: &str) -> Result<(), Error> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(Error::invalid(field, "should be an http(s) URL"))
    }
}
