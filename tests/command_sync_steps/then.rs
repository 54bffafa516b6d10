//! Then steps for command synchronisation BDD scenarios.

use super::world::SyncWorld;
use eyre::eyre;
use rstest_bdd_macros::then;
use slashgate::command::{config::DeploymentScope, services::SyncReport};

fn report(world: &SyncWorld) -> Result<&SyncReport, eyre::Report> {
    world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre!("no client has started"))
}

#[then("the platform holds {count:usize} commands")]
fn platform_holds(world: &SyncWorld, count: usize) -> Result<(), eyre::Report> {
    let commands = world
        .platform
        .commands(DeploymentScope::Global)
        .map_err(|err| eyre!("read platform: {err}"))?;
    if commands.len() != count {
        return Err(eyre!("expected {count} commands, found {}", commands.len()));
    }
    Ok(())
}

#[then("the sync report created {count:usize} commands")]
fn report_created(world: &SyncWorld, count: usize) -> Result<(), eyre::Report> {
    let created = &report(world)?.created;
    if created.len() != count {
        return Err(eyre!("expected {count} creations, found {created:?}"));
    }
    Ok(())
}

#[then("the sync report changed nothing")]
fn report_is_noop(world: &SyncWorld) -> Result<(), eyre::Report> {
    let last = report(world)?;
    if !last.is_noop() {
        return Err(eyre!("expected no remote changes, got {last:?}"));
    }
    Ok(())
}

#[then(r#"the sync report deleted "{name}""#)]
fn report_deleted(world: &SyncWorld, name: String) -> Result<(), eyre::Report> {
    let deleted = &report(world)?.deleted;
    if deleted != &[name] {
        return Err(eyre!("unexpected deletions {deleted:?}"));
    }
    Ok(())
}
