//! Shared store contract run against `PostgresTaskStore`.

use crate::postgres::helpers::{PgTestContext, context};
use crate::store_contract;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn save_then_get_returns_equal_task(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::save_then_get_returns_equal_task(&*ctx.store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn save_rejects_blank_title(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::save_rejects_blank_title(&*ctx.store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn save_overwrites_every_field(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::save_overwrites_every_field(&*ctx.store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn delete_hides_task_everywhere(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::delete_hides_task_everywhere(&*ctx.store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn delete_missing_or_deleted_is_not_found(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::delete_missing_or_deleted_is_not_found(&*ctx.store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn save_cannot_resurrect_deleted_task(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::save_cannot_resurrect_deleted_task(&*ctx.store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn completion_time_survives_reopening(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::completion_time_survives_reopening(&*ctx.store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn status_filters_return_exact_matches(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::status_filters_return_exact_matches(&*ctx.store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn search_matches_text_fields_ignoring_case(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::search_matches_text_fields_ignoring_case(&*ctx.store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn empty_search_returns_every_visible_task(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::empty_search_returns_every_visible_task(&*ctx.store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn owner_scoped_reads_are_isolated(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::owner_scoped_reads_are_isolated(&*ctx.store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn lists_are_newest_first(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::lists_are_newest_first(&*ctx.store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn concurrent_saves_are_all_visible(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::concurrent_saves_are_all_visible(ctx.store.clone()).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn search_folds_non_ascii_case(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::search_folds_non_ascii_case(&*ctx.store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires GTD_TEST_DATABASE_URL"]
async fn save_rejects_nul_characters(
    #[future] context: eyre::Result<PgTestContext>,
) -> eyre::Result<()> {
    let ctx = context.await?;
    store_contract::save_rejects_nul_characters(&*ctx.store).await
}
