//! Deferred work returned from `update`
//!
//! A [`Task`] is a batch of futures, each resolving to exactly one message that
//! is fed back into the same `update` function. Nothing runs until the event
//! loop (see [`crate::runtime`]) polls it.

use std::fmt;
use std::future::Future;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;

#[must_use = "a Task does nothing unless handed to the event loop"]
pub struct Task<M> {
    futures: Vec<BoxFuture<'static, M>>,
}

impl<M: Send + 'static> Task<M> {
    /// No work
    pub fn none() -> Self {
        Self {
            futures: Vec::new(),
        }
    }

    /// Run `future` and turn its output into a message
    pub fn perform<T, F>(future: F, map: impl FnOnce(T) -> M + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            futures: vec![future.map(map).boxed()],
        }
    }

    /// Deliver a message on the next turn of the loop
    pub fn done(message: M) -> Self {
        Self {
            futures: vec![futures::future::ready(message).boxed()],
        }
    }

    /// Combine several tasks into one
    pub fn batch(tasks: impl IntoIterator<Item = Task<M>>) -> Self {
        Self {
            futures: tasks.into_iter().flat_map(|t| t.futures).collect(),
        }
    }

    /// Wrap every produced message, e.g. to lift a panel message into the workflow's
    pub fn map<N, F>(self, f: F) -> Task<N>
    where
        N: Send + 'static,
        F: Fn(M) -> N + Clone + Send + 'static,
    {
        Task {
            futures: self
                .futures
                .into_iter()
                .map(|fut| {
                    let f = f.clone();
                    fut.map(f).boxed()
                })
                .collect(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.futures.len()
    }

    pub fn into_futures(self) -> Vec<BoxFuture<'static, M>> {
        self.futures
    }

    /// Run every future to completion, returning messages in batch order
    pub async fn collect(self) -> Vec<M> {
        join_all(self.futures).await
    }
}

impl<M: Send + 'static> Default for Task<M> {
    fn default() -> Self {
        Self::none()
    }
}

impl<M> fmt::Debug for Task<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("pending", &self.futures.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Outer {
        Inner(u32),
    }

    #[tokio::test]
    async fn test_batch_and_map() {
        let task = Task::batch([
            Task::perform(async { 1 }, |n: u32| n * 10),
            Task::none(),
            Task::done(7),
        ]);
        assert_eq!(task.len(), 2);

        let messages = task.map(Outer::Inner).collect().await;
        assert_eq!(messages, vec![Outer::Inner(10), Outer::Inner(7)]);
    }

    #[test]
    fn test_done_resolves_on_first_poll() {
        let mut collected = tokio_test::task::spawn(Task::done(3u8).collect());
        let messages = tokio_test::assert_ready!(collected.poll());
        assert_eq!(messages, vec![3]);
    }

    #[test]
    fn test_none_is_empty() {
        let task: Task<()> = Task::none();
        assert!(task.is_none());
        assert_eq!(format!("{:?}", task), "Task { pending: 0 }");
    }
}
