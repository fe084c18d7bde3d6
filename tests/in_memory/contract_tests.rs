//! Shared store contract run against `InMemoryTaskStore`.

use crate::store_contract;
use gtd::task::adapters::memory::InMemoryTaskStore;
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
fn store() -> InMemoryTaskStore {
    InMemoryTaskStore::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_then_get_returns_equal_task(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::save_then_get_returns_equal_task(&store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_rejects_blank_title(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::save_rejects_blank_title(&store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_overwrites_every_field(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::save_overwrites_every_field(&store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_hides_task_everywhere(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::delete_hides_task_everywhere(&store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_missing_or_deleted_is_not_found(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::delete_missing_or_deleted_is_not_found(&store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_cannot_resurrect_deleted_task(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::save_cannot_resurrect_deleted_task(&store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_time_survives_reopening(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::completion_time_survives_reopening(&store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_filters_return_exact_matches(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::status_filters_return_exact_matches(&store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_matches_text_fields_ignoring_case(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::search_matches_text_fields_ignoring_case(&store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_search_returns_every_visible_task(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::empty_search_returns_every_visible_task(&store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_scoped_reads_are_isolated(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::owner_scoped_reads_are_isolated(&store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lists_are_newest_first(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::lists_are_newest_first(&store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_saves_are_all_visible(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::concurrent_saves_are_all_visible(Arc::new(store)).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_folds_non_ascii_case(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::search_folds_non_ascii_case(&store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_rejects_nul_characters(store: InMemoryTaskStore) -> eyre::Result<()> {
    store_contract::save_rejects_nul_characters(&store).await
}
