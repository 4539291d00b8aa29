//! Episode gateway
//!
//! `/api/seasons/{seasonId}/episodes`.

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{Gateway, HttpClient};
use crate::models::{sort_by_number, Episode, NewEpisode};

/// Episodes of one season
#[derive(Debug, Clone)]
pub struct EpisodeGateway {
    http: HttpClient,
}

impl EpisodeGateway {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn path(season_id: &str) -> String {
        format!("/api/seasons/{}/episodes", urlencoding::encode(season_id))
    }
}

#[async_trait]
impl Gateway for EpisodeGateway {
    type Parent = String;
    type Entity = Episode;
    type Draft = NewEpisode;

    async fn list(&self, season_id: &String, cancel: &CancellationToken) -> Result<Vec<Episode>> {
        let mut episodes: Vec<Episode> = self.http.get_json(&Self::path(season_id), cancel).await?;
        sort_by_number(&mut episodes);
        debug!(%season_id, count = episodes.len(), "fetched episodes");
        Ok(episodes)
    }

    async fn create(&self, season_id: &String, draft: NewEpisode) -> Result<Episode> {
        let created: Episode = self.http.post_json(&Self::path(season_id), &draft).await?;
        debug!(%season_id, id = %created.id, number = created.number, "created episode");
        Ok(created)
    }
}
