//! Data structures for the catalog hierarchy
//!
//! Contains the shared models used across the application:
//! - **Entities**: series, seasons and episodes as returned by the catalog API
//! - **Drafts**: request bodies for creating each entity
//! - **Ordering**: number-ordered lists with sorted merge-insertion

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Entities
// =============================================================================

/// A series, the top level of the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.id)
    }
}

/// A season, owned by exactly one series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: String,
    pub series_id: String,
    pub number: u32,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Season {} [{}]", self.number, self.id)
    }
}

/// An episode, owned by exactly one season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub season_id: String,
    pub number: u32,
    pub title: String,
    pub duration_seconds: u32,
    /// `None` until a video has been attached
    #[serde(default)]
    pub video_url: Option<String>,
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} ({}s) {}",
            self.number,
            self.title,
            self.duration_seconds,
            self.video_url.as_deref().unwrap_or("no video")
        )
    }
}

// =============================================================================
// Drafts (create request bodies)
// =============================================================================

/// Body of `POST /api/series`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSeries {
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
}

/// Body of `POST /api/series/{seriesId}/seasons`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSeason {
    pub number: u32,
}

/// Body of `POST /api/seasons/{seasonId}/episodes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEpisode {
    pub number: u32,
    pub title: String,
    pub duration_seconds: u32,
    pub video_url: Option<String>,
}

/// Response of `POST /api/media/images`
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

/// Trim a text field, mapping blank input to `None`
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Convert a form number into a positive `u32`, if it is one
pub fn positive(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|n| *n > 0)
}

// =============================================================================
// Ordering
// =============================================================================

/// Entities kept in ascending `number` order
pub trait Numbered {
    fn number(&self) -> u32;
}

impl Numbered for Season {
    fn number(&self) -> u32 {
        self.number
    }
}

impl Numbered for Episode {
    fn number(&self) -> u32 {
        self.number
    }
}

/// Stable sort by number; equal numbers keep server order
pub fn sort_by_number<T: Numbered>(items: &mut [T]) {
    items.sort_by_key(|x| x.number());
}

/// Insert `item` after every element whose number is `<=` its own.
///
/// Duplicated numbers or identifiers are kept side by side; the list stays sorted.
pub fn merge_sorted<T: Numbered>(items: &mut Vec<T>, item: T) {
    let at = items.partition_point(|x| x.number() <= item.number());
    items.insert(at, item);
}
