//! Single-threaded event loop for the admin workflow
//!
//! Operator input arrives over an mpsc channel; gateway calls run as futures in
//! a [`FuturesUnordered`] polled on the same task. Whichever is ready first is
//! turned into a message and handed to [`AdminWorkflow::update`], so state is
//! only ever touched from this loop.

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::admin::{AdminWorkflow, Message};
use crate::task::Task;

/// Operator-side input to the loop
#[derive(Debug)]
pub enum Input {
    Dispatch(Message),
    /// Ask for a snapshot without changing state
    Inspect,
    /// Wait for every pending call to finish, then report
    Settle,
}

/// What caused the observer to be called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Operator,
    Completion,
    Inspect,
    Settled,
}

pub struct Runtime {
    workflow: AdminWorkflow,
    pending: FuturesUnordered<BoxFuture<'static, Message>>,
}

impl Runtime {
    pub fn new(workflow: AdminWorkflow) -> Self {
        Self {
            workflow,
            pending: FuturesUnordered::new(),
        }
    }

    /// Queue the workflow's initial work
    pub fn start(&mut self) {
        let task = self.workflow.start();
        self.spawn(task);
    }

    /// Feed one message through `update` and queue the returned work
    pub fn dispatch(&mut self, message: Message) {
        let task = self.workflow.update(message);
        self.spawn(task);
    }

    pub fn workflow(&self) -> &AdminWorkflow {
        &self.workflow
    }

    pub fn into_workflow(self) -> AdminWorkflow {
        self.workflow
    }

    /// Number of gateway calls still running
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Wait for the next completion and apply it. Returns `false` when idle.
    pub async fn step(&mut self) -> bool {
        match self.pending.next().await {
            Some(message) => {
                self.dispatch(message);
                true
            }
            None => false,
        }
    }

    /// Apply completions until nothing is pending
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    /// Drive the loop until `inbound` closes, then finish pending work.
    ///
    /// `observe` sees the workflow after every applied event.
    pub async fn run<F>(mut self, mut inbound: mpsc::UnboundedReceiver<Input>, mut observe: F) -> AdminWorkflow
    where
        F: FnMut(&AdminWorkflow, Trigger),
    {
        loop {
            tokio::select! {
                Some(message) = self.pending.next(), if !self.pending.is_empty() => {
                    self.dispatch(message);
                    observe(&self.workflow, Trigger::Completion);
                }
                input = inbound.recv() => match input {
                    Some(Input::Dispatch(message)) => {
                        self.dispatch(message);
                        observe(&self.workflow, Trigger::Operator);
                    }
                    Some(Input::Inspect) => observe(&self.workflow, Trigger::Inspect),
                    Some(Input::Settle) => {
                        self.settle().await;
                        observe(&self.workflow, Trigger::Settled);
                    }
                    None => break,
                },
            }
        }

        debug!(pending = self.pending.len(), "input closed, finishing pending calls");
        self.settle().await;
        self.workflow
    }

    fn spawn(&mut self, task: Task<Message>) {
        for future in task.into_futures() {
            self.pending.push(future);
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("workflow", &self.workflow)
            .field("pending", &self.pending.len())
            .finish()
    }
}
