//! Then steps for task capture scenarios.

use super::world::{TaskWorld, run_async};
use gtd::task::{
    domain::{OwnerId, TaskStatus},
    ports::{TaskStore, TaskStoreError},
};
use rstest_bdd_macros::then;

fn parse_status(raw: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(raw).map_err(|err| eyre::eyre!("bad status in scenario: {err}"))
}

fn parse_owner(raw: String) -> Result<OwnerId, eyre::Report> {
    OwnerId::new(raw).map_err(|err| eyre::eyre!("bad owner in scenario: {err}"))
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskWorld, status: String) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let actual = world.current_task()?.status();
    if actual != expected {
        return Err(eyre::eyre!("expected status {expected}, found {actual}"));
    }
    Ok(())
}

#[then("the task has no completion time")]
fn task_has_no_completion_time(world: &TaskWorld) -> Result<(), eyre::Report> {
    if let Some(completed) = world.current_task()?.completed_at() {
        return Err(eyre::eyre!("unexpected completion time {completed}"));
    }
    Ok(())
}

#[then(r#"the "{status}" tasks of "{owner}" contain exactly that task"#)]
fn filtered_tasks_contain_task(
    world: &TaskWorld,
    status: String,
    owner: String,
) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    let found = run_async(
        world
            .store
            .get_by_status_and_owner(parse_status(&status)?, &parse_owner(owner)?),
    )
    .map_err(|err| eyre::eyre!("status query failed: {err}"))?;

    if found.as_slice() != std::slice::from_ref(task) {
        return Err(eyre::eyre!("expected exactly the task, found {found:?}"));
    }
    Ok(())
}

#[then(r#"the "{status}" tasks of "{owner}" are empty"#)]
fn filtered_tasks_are_empty(
    world: &TaskWorld,
    status: String,
    owner: String,
) -> Result<(), eyre::Report> {
    let found = run_async(
        world
            .store
            .get_by_status_and_owner(parse_status(&status)?, &parse_owner(owner)?),
    )
    .map_err(|err| eyre::eyre!("status query failed: {err}"))?;

    if !found.is_empty() {
        return Err(eyre::eyre!("expected no tasks, found {}", found.len()));
    }
    Ok(())
}

#[then("fetching the task reports not found")]
fn fetching_reports_not_found(world: &TaskWorld) -> Result<(), eyre::Report> {
    let id = world.current_task()?.id();
    match run_async(world.store.get(id)) {
        Err(TaskStoreError::NotFound(missing)) if missing == id => Ok(()),
        other => Err(eyre::eyre!("expected NotFound, got {other:?}")),
    }
}

#[then("the save fails validation")]
fn save_fails_validation(world: &TaskWorld) -> Result<(), eyre::Report> {
    match world.last_save.as_ref() {
        Some(Err(TaskStoreError::Validation(_))) => Ok(()),
        other => Err(eyre::eyre!("expected validation failure, got {other:?}")),
    }
}

#[then("the store holds no tasks")]
fn store_holds_no_tasks(world: &TaskWorld) -> Result<(), eyre::Report> {
    let records = world.store.len()?;
    if records != 0 {
        return Err(eyre::eyre!("expected an empty store, found {records}"));
    }
    Ok(())
}

#[then("the stored task has a completion time")]
fn stored_task_has_completion_time(world: &TaskWorld) -> Result<(), eyre::Report> {
    let id = world.current_task()?.id();
    let stored = run_async(world.store.get(id))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?;
    if stored.completed_at().is_none() {
        return Err(eyre::eyre!("completion time was not persisted"));
    }
    Ok(())
}
