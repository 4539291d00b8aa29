//! Series panel: create form plus poster upload side-channel

use tracing::info;

use super::display_error;
use crate::api::Gateways;
use crate::models::{non_blank, NewSeries, Series};
use crate::task::Task;

/// Form fields as typed by the operator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesForm {
    pub title: String,
    pub description: String,
    pub poster_url: String,
}

impl SeriesForm {
    fn draft(&self) -> Option<NewSeries> {
        Some(NewSeries {
            title: non_blank(&self.title)?,
            description: non_blank(&self.description),
            poster_url: non_blank(&self.poster_url),
        })
    }
}

#[derive(Debug)]
pub enum Message {
    TitleChanged(String),
    DescriptionChanged(String),
    PosterUrlChanged(String),
    UploadPoster { file_name: String, bytes: Vec<u8> },
    PosterUploaded(anyhow::Result<String>),
    Submit,
    Created(anyhow::Result<Series>),
}

/// Raised towards the workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Created(Series),
}

#[derive(Debug, Default)]
pub struct SeriesPanel {
    form: SeriesForm,
    submitting: bool,
    uploading: bool,
    error: Option<String>,
}

impl SeriesPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &SeriesForm {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit is enabled with a non-blank title and no submission in flight
    pub fn can_submit(&self) -> bool {
        !self.submitting && non_blank(&self.form.title).is_some()
    }

    pub fn update(&mut self, message: Message, gateways: &Gateways) -> (Task<Message>, Option<Event>) {
        match message {
            Message::TitleChanged(title) => {
                self.form.title = title;
                (Task::none(), None)
            }
            Message::DescriptionChanged(description) => {
                self.form.description = description;
                (Task::none(), None)
            }
            Message::PosterUrlChanged(url) => {
                self.form.poster_url = url;
                (Task::none(), None)
            }
            Message::UploadPoster { file_name, bytes } => {
                if self.uploading {
                    return (Task::none(), None);
                }
                self.uploading = true;
                self.error = None;

                let media = gateways.media.clone();
                let task = Task::perform(
                    async move { media.upload_image(&file_name, bytes).await },
                    Message::PosterUploaded,
                );
                (task, None)
            }
            Message::PosterUploaded(result) => {
                self.uploading = false;
                match result {
                    Ok(url) => self.form.poster_url = url,
                    Err(err) => self.error = display_error(&err),
                }
                (Task::none(), None)
            }
            Message::Submit => {
                let Some(draft) = self.form.draft().filter(|_| self.can_submit()) else {
                    return (Task::none(), None);
                };
                self.submitting = true;
                self.error = None;

                let series = gateways.series.clone();
                let task = Task::perform(
                    async move { series.create(&(), draft).await },
                    Message::Created,
                );
                (task, None)
            }
            Message::Created(result) => {
                self.submitting = false;
                match result {
                    Ok(created) => {
                        info!(id = %created.id, title = %created.title, "series created");
                        // the poster reference stays for the next series
                        self.form.title.clear();
                        self.form.description.clear();
                        (Task::none(), Some(Event::Created(created)))
                    }
                    Err(err) => {
                        self.error = display_error(&err);
                        (Task::none(), None)
                    }
                }
            }
        }
    }
}
