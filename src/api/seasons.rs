//! Season gateway
//!
//! Seasons are always addressed through their series:
//! `/api/series/{seriesId}/seasons`.

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{Gateway, HttpClient};
use crate::models::{sort_by_number, NewSeason, Season};

/// Seasons of one series
#[derive(Debug, Clone)]
pub struct SeasonGateway {
    http: HttpClient,
}

impl SeasonGateway {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn path(series_id: &str) -> String {
        format!("/api/series/{}/seasons", urlencoding::encode(series_id))
    }
}

#[async_trait]
impl Gateway for SeasonGateway {
    type Parent = String;
    type Entity = Season;
    type Draft = NewSeason;

    async fn list(&self, series_id: &String, cancel: &CancellationToken) -> Result<Vec<Season>> {
        let mut seasons: Vec<Season> = self.http.get_json(&Self::path(series_id), cancel).await?;
        sort_by_number(&mut seasons);
        debug!(%series_id, count = seasons.len(), "fetched seasons");
        Ok(seasons)
    }

    async fn create(&self, series_id: &String, draft: NewSeason) -> Result<Season> {
        let created: Season = self.http.post_json(&Self::path(series_id), &draft).await?;
        debug!(%series_id, id = %created.id, number = created.number, "created season");
        Ok(created)
    }
}
