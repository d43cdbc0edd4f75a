//! Domain types for the story feed.
//!
//! # Design
//! `Item` mirrors the upstream item object but is defined with Rust field
//! names; serde renames map them back onto the wire keys. Every field carries
//! `#[serde(default)]` because the upstream omits keys freely (text posts have
//! no `url`, fresh posts may lack a `score`), and an omitted key must decode to
//! the field type's zero value rather than fail.
//!
//! `Category` is a closed enum. Matches over it are exhaustive, so an unmapped
//! category cannot reach the resolver; the only fallible path is parsing a
//! category name from text, which yields `FeedError::InvalidCategory`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// Source-assigned identifier of an item.
pub type ItemId = u64;

/// A single story as returned by the item resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,
    /// Author handle.
    #[serde(default, rename = "by")]
    pub author: String,
    /// Creation time in seconds since the Unix epoch.
    #[serde(default, rename = "time")]
    pub created_at: i64,
    #[serde(default)]
    pub title: String,
    /// Score at the moment the item was fetched.
    #[serde(default)]
    pub score: i64,
    /// Link target; empty for text-only posts.
    #[serde(default)]
    pub url: String,
}

/// Ranked story lists offered by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Top,
    New,
    Best,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Top, Category::New, Category::Best];

    /// Resource name of the list, relative to the API base URL.
    pub fn resource(self) -> &'static str {
        match self {
            Category::Top => "topstories.json",
            Category::New => "newstories.json",
            Category::Best => "beststories.json",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::New => "new",
            Category::Best => "best",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" | "topstories" => Ok(Category::Top),
            "new" | "newstories" => Ok(Category::New),
            "best" | "beststories" => Ok(Category::Best),
            _ => Err(FeedError::InvalidCategory(s.to_string())),
        }
    }
}
