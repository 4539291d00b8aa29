//! Catalog API gateways
//!
//! - `http`: transport wrapper and `ApiError`
//! - `problem`: error normalization into one display message
//! - `series`, `seasons`, `episodes`: one gateway per hierarchy level
//! - `media`: poster image uploads

pub mod episodes;
pub mod http;
pub mod media;
pub mod problem;
pub mod seasons;
pub mod series;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::models::{Episode, NewEpisode, NewSeason, NewSeries, Season, Series};

pub use episodes::EpisodeGateway;
pub use http::{ApiError, HttpClient};
pub use media::MediaGateway;
pub use problem::{classify, is_cancelled, message_for, user_message, FailureKind};
pub use seasons::SeasonGateway;
pub use series::SeriesGateway;

/// List and create entities of one hierarchy level, scoped by parent
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Identifier of the owning entity (`()` for top-level series)
    type Parent: Send + Sync;
    type Entity: Send;
    type Draft: Send;

    /// Fetch all children of `parent`.
    ///
    /// Fails with [`ApiError::Cancelled`] once `cancel` fires.
    async fn list(
        &self,
        parent: &Self::Parent,
        cancel: &CancellationToken,
    ) -> Result<Vec<Self::Entity>>;

    /// Create a child of `parent`, returning it with its assigned identifier
    async fn create(&self, parent: &Self::Parent, draft: Self::Draft) -> Result<Self::Entity>;
}

/// Uploads an image and returns the URL it is served from
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> Result<String>;
}

pub type SeriesApi = dyn Gateway<Parent = (), Entity = Series, Draft = NewSeries>;
pub type SeasonApi = dyn Gateway<Parent = String, Entity = Season, Draft = NewSeason>;
pub type EpisodeApi = dyn Gateway<Parent = String, Entity = Episode, Draft = NewEpisode>;

/// The full set of gateways the admin workflow talks to
#[derive(Clone)]
pub struct Gateways {
    pub series: Arc<SeriesApi>,
    pub seasons: Arc<SeasonApi>,
    pub episodes: Arc<EpisodeApi>,
    pub media: Arc<dyn ImageUploader>,
}

impl Gateways {
    /// HTTP-backed gateways sharing one client
    pub fn http(client: HttpClient) -> Self {
        Self {
            series: Arc::new(SeriesGateway::new(client.clone())),
            seasons: Arc::new(SeasonGateway::new(client.clone())),
            episodes: Arc::new(EpisodeGateway::new(client.clone())),
            media: Arc::new(MediaGateway::new(client)),
        }
    }
}

impl std::fmt::Debug for Gateways {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateways").finish_non_exhaustive()
    }
}
