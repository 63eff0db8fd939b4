//! Full-drain aggregation of a collector

use vkclient_domain::{Collected, VkError};

use super::collect::{CollectorState, PageCollector};

impl PageCollector {
    /// Drain the remaining pages into one [`Collected`] value.
    ///
    /// Pages already pulled are not fetched again; only the remainder is
    /// folded in. A collector that has already failed returns its error.
    pub async fn aggregate(self) -> Result<Collected, VkError> {
        aggregate(self).await
    }
}

/// Concatenate items in emission order; `total_count` and metadata are
/// last-page-wins.
pub async fn aggregate(mut collector: PageCollector) -> Result<Collected, VkError> {
    let mut collected = Collected::default();

    while let Some(page) = collector.next_page().await {
        collected.absorb(page?);
    }

    match collector.state() {
        CollectorState::Failed(err) => Err(err.clone()),
        CollectorState::Idle | CollectorState::Done => Ok(collected),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use vkclient_domain::{Config, Params};

    use super::*;
    use crate::api::client::VkClient;
    use crate::testing::ScriptedInvoker;

    fn client(invoker: &Arc<ScriptedInvoker>) -> VkClient {
        VkClient::builder()
            .config(Config::default())
            .invoker(Arc::clone(invoker) as _)
            .build()
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn concatenates_items_in_order() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .page(vec![json!("a"), json!("b")], Some(3))
                .page(vec![json!("c")], Some(3)),
        );

        let collected = client(&invoker).collect("wall.get", Params::new()).await.unwrap();

        assert_eq!(collected.items, vec![json!("a"), json!("b"), json!("c")]);
        assert_eq!(collected.total_count, Some(3));
        assert_eq!(collected.pages, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn metadata_is_last_page_wins() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .respond(json!({"response": {
                    "count": 2, "items": [1], "profiles": ["p1"], "next_from": "x"
                }}))
                .respond(json!({"response": {"count": 2, "items": [2], "profiles": ["p2"]}})),
        );

        let collected = client(&invoker).collect("wall.get", Params::new()).await.unwrap();

        assert_eq!(collected.metadata["profiles"], json!(["p2"]));
        assert_eq!(collected.metadata["next_from"], json!("x"));
        assert_eq!(
            collected.into_value(),
            json!({"count": 2, "items": [1, 2], "profiles": ["p2"], "next_from": "x"})
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failure_on_second_call_fails_the_aggregate() {
        let error = VkError::Application { code: 6, message: "Too many requests per second".into() };
        let invoker = Arc::new(
            ScriptedInvoker::new().page(vec![json!(1), json!(2)], Some(4)).fail(error.clone()),
        );

        let result = client(&invoker).collect("wall.get", Params::new()).await;

        assert_eq!(result, Err(error));
        assert_eq!(invoker.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn drains_only_the_remainder() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .page(vec![json!(1)], Some(3))
                .page(vec![json!(2)], Some(3))
                .page(vec![json!(3)], Some(3)),
        );
        let mut collector = client(&invoker).collect_stream("wall.get", Params::new()).unwrap();

        collector.next_page().await.unwrap().unwrap();
        let rest = collector.aggregate().await.unwrap();

        assert_eq!(rest.items, vec![json!(2), json!(3)]);
        assert_eq!(invoker.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn already_failed_collector_returns_its_error() {
        let error = VkError::Transport("HTTP request timed out".into());
        let invoker = Arc::new(ScriptedInvoker::new().fail(error.clone()));
        let mut collector = client(&invoker).collect_stream("wall.get", Params::new()).unwrap();

        assert!(collector.next_page().await.unwrap().is_err());

        assert_eq!(collector.aggregate().await, Err(error));
        assert_eq!(invoker.call_count(), 1);
    }
}
