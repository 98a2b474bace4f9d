use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    #[default]
    Raw,
    Epub,
}

impl ContentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFormat::Raw => "raw",
            ContentFormat::Epub => "epub",
        }
    }
}

impl FromStr for ContentFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(ContentFormat::Raw),
            "epub" => Ok(ContentFormat::Epub),
            _ => Err(Error::UnknownVariant {
                kind: "format",
                value: s.to_string(),
            }),
        }
    }
}

/// Languages the content service can deliver, `es` being machine translated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            _ => Err(Error::UnknownVariant {
                kind: "language",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ManhwaImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub images: Vec<ManhwaImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TextContent {
    pub title: String,
    pub chapter_number: u32,
    #[serde(default)]
    pub chapter_title: Option<String>,
    pub content: String,
}

/// Body of `GET /novels/{id}/chapters/{n}?format=raw`. Manhwa chapters come
/// back as image lists, novels as cleaned text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ChapterContent {
    Images(ImageContent),
    Text(TextContent),
}

/// Which chapters an EPUB download covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadRange {
    #[default]
    All,
    Single(u32),
    Range {
        start: Option<u32>,
        end: Option<u32>,
    },
}

impl DownloadRange {
    pub fn validate(&self) -> Result<(), Error> {
        match *self {
            DownloadRange::All => Ok(()),
            DownloadRange::Single(n) if n < 1 => {
                Err(Error::invalid("single_chapter", "chapters start at 1"))
            }
            DownloadRange::Single(_) => Ok(()),
            DownloadRange::Range { start, end } => {
                if start == Some(0) {
                    return Err(Error::invalid("start_chapter", "chapters start at 1"));
                }
                if end == Some(0) {
                    return Err(Error::invalid("end_chapter", "chapters start at 1"));
                }
                if let (Some(start), Some(end)) = (start, end) {
                    if start > end {
                        return Err(Error::invalid(
                            "start_chapter",
                            "should be less than or equal to end chapter",
                        ));
                    }
                }
                Ok(())
            }
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match *self {
            DownloadRange::All => vec![],
            DownloadRange::Single(n) => vec![("single_chapter", n.to_string())],
            DownloadRange::Range { start, end } => {
                let mut pairs = vec![];
                if let Some(start) = start {
                    pairs.push(("start_chapter", start.to_string()));
                }
                if let Some(end) = end {
                    pairs.push(("end_chapter", end.to_string()));
                }
                pairs
            }
        }
    }
}
