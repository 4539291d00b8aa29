//! Series gateway
//!
//! `GET /api/series` and `POST /api/series`.

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{Gateway, HttpClient};
use crate::models::{NewSeries, Series};

const SERIES_PATH: &str = "/api/series";

/// Top-level series gateway
#[derive(Debug, Clone)]
pub struct SeriesGateway {
    http: HttpClient,
}

impl SeriesGateway {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Gateway for SeriesGateway {
    type Parent = ();
    type Entity = Series;
    type Draft = NewSeries;

    async fn list(&self, _parent: &(), cancel: &CancellationToken) -> Result<Vec<Series>> {
        let series: Vec<Series> = self.http.get_json(SERIES_PATH, cancel).await?;
        debug!(count = series.len(), "fetched series");
        Ok(series)
    }

    async fn create(&self, _parent: &(), draft: NewSeries) -> Result<Series> {
        let created: Series = self.http.post_json(SERIES_PATH, &draft).await?;
        debug!(id = %created.id, "created series");
        Ok(created)
    }
}
