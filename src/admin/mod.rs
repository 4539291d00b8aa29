//! Admin workflow
//!
//! Composes the gateways and the cascading controllers into three panels
//! (series, seasons, episodes) that share one series list. The workflow is the
//! only writer of that list; panels read it through [`AdminWorkflow::series`].
//!
//! Every event goes through [`AdminWorkflow::update`], one at a time. Gateway
//! calls come back as [`Task`]s whose outcomes re-enter `update` as messages.

pub mod episodes;
pub mod seasons;
pub mod series;
pub mod view;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{classify, user_message, FailureKind, Gateway, Gateways};
use crate::cascade::{Fetch, Ticket};
use crate::models::Series;
use crate::task::Task;

pub use episodes::EpisodesPanel;
pub use seasons::SeasonsPanel;
pub use series::SeriesPanel;
pub use view::WorkflowView;

#[derive(Debug)]
pub enum Message {
    /// Re-fetch the shared series list
    RefreshSeries,
    SeriesLoaded(u64, anyhow::Result<Vec<Series>>),
    Series(series::Message),
    Seasons(seasons::Message),
    Episodes(episodes::Message),
}

/// The shared series list and its load status
#[derive(Debug, Default)]
pub struct SeriesList {
    items: Vec<Series>,
    loading: bool,
    error: Option<String>,
    in_flight: Option<(u64, CancellationToken)>,
    issued: u64,
}

impl SeriesList {
    pub fn items(&self) -> &[Series] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn refresh(&mut self, gateways: &Gateways) -> Task<Message> {
        if let Some((_, token)) = self.in_flight.take() {
            token.cancel();
        }
        self.issued += 1;
        let generation = self.issued;
        let token = CancellationToken::new();
        self.in_flight = Some((generation, token.clone()));
        self.loading = true;
        self.error = None;

        let api = gateways.series.clone();
        Task::perform(
            async move { api.list(&(), &token).await },
            move |result| Message::SeriesLoaded(generation, result),
        )
    }

    fn settle(&mut self, generation: u64, result: anyhow::Result<Vec<Series>>) {
        let current = matches!(
            &self.in_flight,
            Some((live, token)) if *live == generation && !token.is_cancelled()
        );
        if !current {
            debug!(generation, "discarding stale series list");
            return;
        }
        self.in_flight = None;
        self.loading = false;

        match result {
            Ok(items) => self.items = items,
            Err(err) => self.error = display_error(&err),
        }
    }
}

/// The three admin panels over one shared series list
#[derive(Debug)]
pub struct AdminWorkflow {
    gateways: Gateways,
    series: SeriesList,
    series_panel: SeriesPanel,
    seasons_panel: SeasonsPanel,
    episodes_panel: EpisodesPanel,
}

impl AdminWorkflow {
    pub fn new(gateways: Gateways) -> Self {
        Self {
            gateways,
            series: SeriesList::default(),
            series_panel: SeriesPanel::new(),
            seasons_panel: SeasonsPanel::new(),
            episodes_panel: EpisodesPanel::new(),
        }
    }

    /// Initial work: fetch the shared series list
    pub fn start(&mut self) -> Task<Message> {
        self.series.refresh(&self.gateways)
    }

    /// The series list every panel selects from
    pub fn series(&self) -> &[Series] {
        self.series.items()
    }

    pub fn series_list(&self) -> &SeriesList {
        &self.series
    }

    pub fn series_panel(&self) -> &SeriesPanel {
        &self.series_panel
    }

    pub fn seasons_panel(&self) -> &SeasonsPanel {
        &self.seasons_panel
    }

    pub fn episodes_panel(&self) -> &EpisodesPanel {
        &self.episodes_panel
    }

    /// Serializable snapshot of every panel
    pub fn view(&self) -> WorkflowView<'_> {
        WorkflowView::new(self)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::RefreshSeries => self.series.refresh(&self.gateways),
            Message::SeriesLoaded(generation, result) => {
                self.series.settle(generation, result);
                Task::none()
            }
            Message::Series(message) => {
                let (task, event) = self.series_panel.update(message, &self.gateways);
                let refresh = match event {
                    Some(series::Event::Created(_)) => self.series.refresh(&self.gateways),
                    None => Task::none(),
                };
                Task::batch([task.map(Message::Series), refresh])
            }
            Message::Seasons(message) => self
                .seasons_panel
                .update(message, &self.gateways, self.series.items())
                .map(Message::Seasons),
            Message::Episodes(message) => self
                .episodes_panel
                .update(message, &self.gateways, self.series.items())
                .map(Message::Episodes),
        }
    }
}

/// Message to show for a failed action, `None` for cancellations
pub(crate) fn display_error(err: &anyhow::Error) -> Option<String> {
    match classify(err) {
        FailureKind::Cancelled => None,
        kind => {
            let message = user_message(err);
            warn!(?kind, error = %message, "action failed");
            Some(message)
        }
    }
}

pub(crate) fn unknown_selection(what: &str, id: &str) -> String {
    format!("No {} with id {}", what, id)
}

/// Run a dependent fetch issued by a cascade
pub(crate) fn load<E, D, M>(
    fetch: Option<Fetch>,
    api: &Arc<dyn Gateway<Parent = String, Entity = E, Draft = D>>,
    loaded: fn(Ticket, anyhow::Result<Vec<E>>) -> M,
) -> Task<M>
where
    E: Send + 'static,
    D: Send + 'static,
    M: Send + 'static,
{
    let Some(Fetch {
        parent,
        ticket,
        token,
    }) = fetch
    else {
        return Task::none();
    };
    let api = api.clone();
    Task::perform(
        async move { api.list(&parent, &token).await },
        move |result| loaded(ticket, result),
    )
}
