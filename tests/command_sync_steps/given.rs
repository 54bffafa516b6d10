//! Given steps for command synchronisation BDD scenarios.

use super::world::{SyncWorld, start};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use slashgate::command::{adapters::InMemoryCommandPlatform, ports::PlatformError};

#[given("an empty platform")]
fn an_empty_platform(world: &mut SyncWorld) {
    world.platform = InMemoryCommandPlatform::new();
    world.last_report = None;
}

#[given("a client declaring roll and images has started")]
fn client_already_started(world: &mut SyncWorld) -> Result<(), eyre::Report> {
    start(world, true).wrap_err("start the first client")
}

#[given("the platform fails the next {count:usize} calls transiently")]
fn platform_fails_transiently(world: &mut SyncWorld, count: usize) -> Result<(), eyre::Report> {
    for _ in 0..count {
        world
            .platform
            .fail_next(PlatformError::Transient("connection reset".to_owned()))
            .wrap_err("inject failure")?;
    }
    Ok(())
}
