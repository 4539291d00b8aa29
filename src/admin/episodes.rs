//! Episodes panel
//!
//! Two selectors in sequence: the series selector drives the season list, the
//! season selector drives the episode list. Changing the series always resets
//! the season selection and the episode list.

use tracing::{debug, info};

use super::{display_error, load, unknown_selection};
use crate::api::Gateways;
use crate::cascade::{Cascade, LoadState, Settled, Ticket};
use crate::models::{non_blank, positive, Episode, NewEpisode, Season, Series};
use crate::task::Task;

/// Form fields as typed by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeForm {
    pub number: i64,
    pub title: String,
    pub duration_seconds: i64,
    pub video_url: String,
}

impl Default for EpisodeForm {
    fn default() -> Self {
        Self {
            number: 1,
            title: String::new(),
            duration_seconds: 1400,
            video_url: String::new(),
        }
    }
}

impl EpisodeForm {
    fn draft(&self) -> Option<NewEpisode> {
        Some(NewEpisode {
            number: positive(self.number)?,
            title: non_blank(&self.title)?,
            duration_seconds: positive(self.duration_seconds)?,
            video_url: non_blank(&self.video_url),
        })
    }
}

#[derive(Debug)]
pub enum Message {
    SelectSeries(Option<String>),
    SeasonsLoaded(Ticket, anyhow::Result<Vec<Season>>),
    SelectSeason(Option<String>),
    EpisodesLoaded(Ticket, anyhow::Result<Vec<Episode>>),
    Reload,
    NumberChanged(i64),
    TitleChanged(String),
    DurationChanged(i64),
    VideoUrlChanged(String),
    Submit,
    Created {
        season_id: String,
        result: anyhow::Result<Episode>,
    },
}

#[derive(Debug, Default)]
pub struct EpisodesPanel {
    seasons: Cascade<Season>,
    episodes: Cascade<Episode>,
    form: EpisodeForm,
    submitting: bool,
    error: Option<String>,
}

impl EpisodesPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_series(&self) -> Option<&str> {
        self.seasons.parent()
    }

    pub fn selected_season(&self) -> Option<&str> {
        self.episodes.parent()
    }

    pub fn seasons(&self) -> &[Season] {
        self.seasons.items()
    }

    pub fn seasons_state(&self) -> &LoadState {
        self.seasons.state()
    }

    pub fn episodes(&self) -> &[Episode] {
        self.episodes.items()
    }

    pub fn episodes_state(&self) -> &LoadState {
        self.episodes.state()
    }

    pub fn form(&self) -> &EpisodeForm {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit needs a selected season, a non-blank title and positive number and duration
    pub fn can_submit(&self) -> bool {
        !self.submitting && self.episodes.parent().is_some() && self.form.draft().is_some()
    }

    pub fn update(&mut self, message: Message, gateways: &Gateways, series: &[Series]) -> Task<Message> {
        match message {
            Message::SelectSeries(series_id) => {
                if let Some(id) = series_id.as_deref().filter(|id| !id.trim().is_empty()) {
                    if !series.iter().any(|s| s.id == id) {
                        self.error = Some(unknown_selection("series", id));
                        return Task::none();
                    }
                }
                self.error = None;
                let fetch = self.seasons.select(series_id);
                if fetch.is_some() || self.seasons.parent().is_none() {
                    self.episodes.select(None);
                }
                load(fetch, &gateways.seasons, Message::SeasonsLoaded)
            }
            Message::SeasonsLoaded(ticket, result) => {
                if self.seasons.settle(ticket, result) == Settled::Applied {
                    if let Some(message) = self.seasons.state().error() {
                        self.error = Some(message.to_string());
                    }
                }
                Task::none()
            }
            Message::SelectSeason(season_id) => {
                if self.seasons.parent().is_none() {
                    debug!("season selected without a series, ignoring");
                    return Task::none();
                }
                if let Some(id) = season_id.as_deref().filter(|id| !id.trim().is_empty()) {
                    if !self.seasons.items().iter().any(|s| s.id == id) {
                        self.error = Some(unknown_selection("season", id));
                        return Task::none();
                    }
                }
                self.error = None;
                load(
                    self.episodes.select(season_id),
                    &gateways.episodes,
                    Message::EpisodesLoaded,
                )
            }
            Message::EpisodesLoaded(ticket, result) => {
                if self.episodes.settle(ticket, result) == Settled::Applied {
                    if let Some(message) = self.episodes.state().error() {
                        self.error = Some(message.to_string());
                    }
                }
                Task::none()
            }
            Message::Reload => {
                self.error = None;
                if self.episodes.parent().is_some() {
                    load(self.episodes.reload(), &gateways.episodes, Message::EpisodesLoaded)
                } else {
                    load(self.seasons.reload(), &gateways.seasons, Message::SeasonsLoaded)
                }
            }
            Message::NumberChanged(number) => {
                self.form.number = number;
                Task::none()
            }
            Message::TitleChanged(title) => {
                self.form.title = title;
                Task::none()
            }
            Message::DurationChanged(seconds) => {
                self.form.duration_seconds = seconds;
                Task::none()
            }
            Message::VideoUrlChanged(url) => {
                self.form.video_url = url;
                Task::none()
            }
            Message::Submit => {
                if !self.can_submit() {
                    return Task::none();
                }
                let (Some(season_id), Some(draft)) =
                    (self.episodes.parent().map(str::to_string), self.form.draft())
                else {
                    return Task::none();
                };
                self.submitting = true;
                self.error = None;

                let api = gateways.episodes.clone();
                Task::perform(
                    async move {
                        let result = api.create(&season_id, draft).await;
                        (season_id, result)
                    },
                    |(season_id, result)| Message::Created { season_id, result },
                )
            }
            Message::Created { season_id, result } => {
                self.submitting = false;
                match result {
                    Ok(episode) => {
                        info!(%season_id, number = episode.number, title = %episode.title, "episode created");
                        self.episodes.merge(&season_id, episode);
                    }
                    Err(err) => self.error = display_error(&err),
                }
                Task::none()
            }
        }
    }
}
