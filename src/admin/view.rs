//! Serializable snapshots of the workflow, for JSON output and the admin shell

use std::fmt;

use serde::Serialize;

use super::episodes::EpisodeForm;
use super::series::SeriesForm;
use super::AdminWorkflow;
use crate::cascade::LoadState;
use crate::models::{Episode, Season, Series};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesListView<'a> {
    pub items: &'a [Series],
    pub loading: bool,
    pub error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPanelView<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub poster_url: &'a str,
    pub submitting: bool,
    pub uploading: bool,
    pub can_submit: bool,
    pub error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonsPanelView<'a> {
    pub series_id: Option<&'a str>,
    pub seasons: &'a [Season],
    pub load: &'a LoadState,
    pub number: i64,
    pub submitting: bool,
    pub can_submit: bool,
    pub error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodesPanelView<'a> {
    pub series_id: Option<&'a str>,
    pub season_id: Option<&'a str>,
    pub seasons: &'a [Season],
    pub seasons_load: &'a LoadState,
    pub episodes: &'a [Episode],
    pub episodes_load: &'a LoadState,
    pub form: EpisodeFormView<'a>,
    pub submitting: bool,
    pub can_submit: bool,
    pub error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeFormView<'a> {
    pub number: i64,
    pub title: &'a str,
    pub duration_seconds: i64,
    pub video_url: &'a str,
}

/// Snapshot of one panel
#[derive(Debug, Serialize)]
#[serde(tag = "panel", rename_all = "lowercase")]
pub enum PanelView<'a> {
    Series(SeriesPanelView<'a>),
    Seasons(SeasonsPanelView<'a>),
    Episodes(EpisodesPanelView<'a>),
}

/// Snapshot of the whole workflow
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowView<'a> {
    pub series: SeriesListView<'a>,
    pub panels: [PanelView<'a>; 3],
}

impl<'a> WorkflowView<'a> {
    pub fn new(workflow: &'a AdminWorkflow) -> Self {
        let list = workflow.series_list();
        Self {
            series: SeriesListView {
                items: list.items(),
                loading: list.is_loading(),
                error: list.error(),
            },
            panels: [
                series_panel(workflow),
                seasons_panel(workflow),
                episodes_panel(workflow),
            ],
        }
    }
}

pub fn series_panel(workflow: &AdminWorkflow) -> PanelView<'_> {
    let panel = workflow.series_panel();
    let SeriesForm {
        title,
        description,
        poster_url,
    } = panel.form();
    PanelView::Series(SeriesPanelView {
        title,
        description,
        poster_url,
        submitting: panel.is_submitting(),
        uploading: panel.is_uploading(),
        can_submit: panel.can_submit(),
        error: panel.error(),
    })
}

pub fn seasons_panel(workflow: &AdminWorkflow) -> PanelView<'_> {
    let panel = workflow.seasons_panel();
    PanelView::Seasons(SeasonsPanelView {
        series_id: panel.selected_series(),
        seasons: panel.seasons(),
        load: panel.load_state(),
        number: panel.number(),
        submitting: panel.is_submitting(),
        can_submit: panel.can_submit(),
        error: panel.error(),
    })
}

pub fn episodes_panel(workflow: &AdminWorkflow) -> PanelView<'_> {
    let panel = workflow.episodes_panel();
    let EpisodeForm {
        number,
        title,
        duration_seconds,
        video_url,
    } = panel.form();
    PanelView::Episodes(EpisodesPanelView {
        series_id: panel.selected_series(),
        season_id: panel.selected_season(),
        seasons: panel.seasons(),
        seasons_load: panel.seasons_state(),
        episodes: panel.episodes(),
        episodes_load: panel.episodes_state(),
        form: EpisodeFormView {
            number: *number,
            title,
            duration_seconds: *duration_seconds,
            video_url,
        },
        submitting: panel.is_submitting(),
        can_submit: panel.can_submit(),
        error: panel.error(),
    })
}

fn load_label(state: &LoadState) -> &str {
    match state {
        LoadState::Idle => "idle",
        LoadState::Loading => "loading...",
        LoadState::Ready => "ready",
        LoadState::Failed(message) => message.as_str(),
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

impl fmt::Display for PanelView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelView::Series(view) => {
                writeln!(f, "[series]")?;
                writeln!(f, "  title:       {}", view.title)?;
                writeln!(f, "  description: {}", view.description)?;
                writeln!(f, "  poster:      {}", view.poster_url)?;
                if view.uploading {
                    writeln!(f, "  uploading poster...")?;
                }
                if view.submitting {
                    writeln!(f, "  submitting...")?;
                }
            }
            PanelView::Seasons(view) => {
                writeln!(f, "[seasons] series {} ({})", or_dash(view.series_id), load_label(view.load))?;
                for season in view.seasons {
                    writeln!(f, "  {}", season)?;
                }
                writeln!(f, "  next number: {}", view.number)?;
                if view.submitting {
                    writeln!(f, "  submitting...")?;
                }
            }
            PanelView::Episodes(view) => {
                writeln!(
                    f,
                    "[episodes] series {} ({}) season {} ({})",
                    or_dash(view.series_id),
                    load_label(view.seasons_load),
                    or_dash(view.season_id),
                    load_label(view.episodes_load),
                )?;
                for season in view.seasons {
                    writeln!(f, "  {}", season)?;
                }
                for episode in view.episodes {
                    writeln!(f, "    {}", episode)?;
                }
                if view.submitting {
                    writeln!(f, "  submitting...")?;
                }
            }
        }

        let error = match self {
            PanelView::Series(view) => view.error,
            PanelView::Seasons(view) => view.error,
            PanelView::Episodes(view) => view.error,
        };
        if let Some(error) = error {
            writeln!(f, "  error: {}", error)?;
        }
        Ok(())
    }
}

impl fmt::Display for WorkflowView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.series.loading { " (loading...)" } else { "" };
        writeln!(f, "Series{}:", status)?;
        for series in self.series.items {
            writeln!(f, "  {}", series)?;
        }
        if let Some(error) = self.series.error {
            writeln!(f, "  error: {}", error)?;
        }
        for panel in &self.panels {
            write!(f, "{}", panel)?;
        }
        Ok(())
    }
}
