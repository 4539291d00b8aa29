//! Seasons panel: series selector driving one cascade, plus a create form

use tracing::info;

use super::{display_error, load, unknown_selection};
use crate::api::Gateways;
use crate::cascade::{Cascade, LoadState, Settled, Ticket};
use crate::models::{positive, NewSeason, Season, Series};
use crate::task::Task;

#[derive(Debug)]
pub enum Message {
    SelectSeries(Option<String>),
    Loaded(Ticket, anyhow::Result<Vec<Season>>),
    Reload,
    NumberChanged(i64),
    Submit,
    Created {
        series_id: String,
        result: anyhow::Result<Season>,
    },
}

#[derive(Debug)]
pub struct SeasonsPanel {
    seasons: Cascade<Season>,
    number: i64,
    submitting: bool,
    error: Option<String>,
}

impl Default for SeasonsPanel {
    fn default() -> Self {
        Self {
            seasons: Cascade::new(),
            number: 1,
            submitting: false,
            error: None,
        }
    }
}

impl SeasonsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_series(&self) -> Option<&str> {
        self.seasons.parent()
    }

    pub fn seasons(&self) -> &[Season] {
        self.seasons.items()
    }

    pub fn load_state(&self) -> &LoadState {
        self.seasons.state()
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit needs a selected series and a positive season number
    pub fn can_submit(&self) -> bool {
        !self.submitting && self.seasons.parent().is_some() && positive(self.number).is_some()
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
                load(self.seasons.select(series_id), &gateways.seasons, Message::Loaded)
            }
            Message::Reload => {
                self.error = None;
                load(self.seasons.reload(), &gateways.seasons, Message::Loaded)
            }
            Message::Loaded(ticket, result) => {
                if self.seasons.settle(ticket, result) == Settled::Applied {
                    if let Some(message) = self.seasons.state().error() {
                        self.error = Some(message.to_string());
                    }
                }
                Task::none()
            }
            Message::NumberChanged(number) => {
                self.number = number;
                Task::none()
            }
            Message::Submit => {
                if !self.can_submit() {
                    return Task::none();
                }
                let (Some(series_id), Some(number)) =
                    (self.seasons.parent().map(str::to_string), positive(self.number))
                else {
                    return Task::none();
                };
                self.submitting = true;
                self.error = None;

                let api = gateways.seasons.clone();
                Task::perform(
                    async move {
                        let result = api.create(&series_id, NewSeason { number }).await;
                        (series_id, result)
                    },
                    |(series_id, result)| Message::Created { series_id, result },
                )
            }
            Message::Created { series_id, result } => {
                self.submitting = false;
                match result {
                    Ok(season) => {
                        info!(%series_id, number = season.number, "season created");
                        self.seasons.merge(&series_id, season);
                    }
                    Err(err) => self.error = display_error(&err),
                }
                Task::none()
            }
        }
    }
}
