use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A chapter as listed by the content service, identified within its novel by
/// `chapter_number`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Chapter {
    pub title: String,
    pub chapter_number: u32,
    #[serde(default)]
    pub chapter_title: Option<String>,
    pub url: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub downloaded: bool,
}

impl Chapter {
    /// `chapter_title` overrides `title` when the source provides one
    pub fn display_title(&self) -> &str {
        match self.chapter_title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(Error::InvalidSortOrder(other.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One server-paginated batch of chapters. The chapter refresh endpoint only
/// guarantees `chapters`, hence the defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ChapterPage {
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChapterQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort_order: SortOrder,
}

impl ChapterQuery {
    pub fn new(page: u32, page_size: u32, sort_order: SortOrder) -> Self {
        Self {
            page,
            page_size,
            sort_order,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.page < 1 {
            return Err(Error::invalid("page", "pages start at 1"));
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::invalid(
                "page_size",
                format!("should be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }
        Ok(())
    }
}

impl Default for ChapterQuery {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE, SortOrder::default())
    }
}
