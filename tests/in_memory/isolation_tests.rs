//! Copy semantics and sharing behaviour specific to the in-memory store.

use crate::store_contract::{SteppingClock, new_task, saved_task};
use eyre::ensure;
use gtd::task::{adapters::memory::InMemoryTaskStore, domain::TaskStatus, ports::TaskStore};
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
fn store() -> InMemoryTaskStore {
    InMemoryTaskStore::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fetched_tasks_do_not_alias_stored_state(store: InMemoryTaskStore) -> eyre::Result<()> {
    let clock = SteppingClock::new();
    let task = saved_task(&store, &clock, "Original", "alice").await?;

    let mut fetched = store.get(task.id()).await?;
    fetched.set_title("Edited locally");
    fetched.mark_as_done(&clock);
    let refetched = store.get(task.id()).await?;

    ensure!(refetched.title() == "Original", "local edit leaked into store");
    ensure!(refetched.status() == TaskStatus::Inbox, "status leaked");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn caller_edits_after_save_are_not_visible(store: InMemoryTaskStore) -> eyre::Result<()> {
    let clock = SteppingClock::new();
    let mut task = new_task(&clock, "Saved copy", "alice");
    store.save(&mut task).await?;

    task.set_title("Unsaved edit");
    let stored = store.get(task.id()).await?;

    ensure!(stored.title() == "Saved copy", "store aliased caller's task");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clones_share_the_same_records(store: InMemoryTaskStore) -> eyre::Result<()> {
    let clock = SteppingClock::new();
    let other_handle = store.clone();

    let task = saved_task(&other_handle, &clock, "Shared", "alice").await?;

    ensure!(store.get(task.id()).await? == task, "clone wrote elsewhere");
    ensure!(store.len()? == 1, "expected one record");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn soft_deleted_records_stay_in_storage(store: InMemoryTaskStore) -> eyre::Result<()> {
    let clock = SteppingClock::new();
    let task = saved_task(&store, &clock, "Soft", "alice").await?;

    store.delete(task.id()).await?;

    ensure!(store.len()? == 1, "soft delete should keep the record");
    ensure!(!store.is_empty()?, "store should not report empty");
    ensure!(store.get_all().await?.is_empty(), "record should be hidden");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_readers_and_writers_do_not_interfere(
    store: InMemoryTaskStore,
) -> eyre::Result<()> {
    let shared = Arc::new(store);
    let clock = Arc::new(SteppingClock::new());

    let writers: Vec<_> = (0..8)
        .map(|index| {
            let writer = Arc::clone(&shared);
            let writer_clock = Arc::clone(&clock);
            tokio::spawn(async move {
                let mut task = new_task(&writer_clock, &format!("write {index}"), "alice");
                writer.save(&mut task).await?;
                writer.delete(task.id()).await?;
                let mut keeper = new_task(&writer_clock, "keeper", "alice");
                writer.save(&mut keeper).await
            })
        })
        .collect();
    let readers: Vec<_> = (0..8)
        .map(|_| {
            let reader = Arc::clone(&shared);
            tokio::spawn(async move { reader.search("write").await.map(|found| found.len()) })
        })
        .collect();

    for handle in writers {
        handle.await??;
    }
    for handle in readers {
        let seen = handle.await??;
        ensure!(seen <= 8, "reader saw {seen} matches");
    }
    ensure!(shared.get_all().await?.len() == 8, "expected eight keepers");
    ensure!(shared.search("write").await?.is_empty(), "deleted writes visible");
    Ok(())
}
