//! When steps for command synchronisation BDD scenarios.

use super::world::{SyncWorld, start};
use rstest_bdd_macros::when;

#[when("a client declaring roll and images starts")]
fn start_roll_and_images(world: &mut SyncWorld) -> Result<(), eyre::Report> {
    start(world, true)
}

#[when("a client declaring only roll starts")]
fn start_roll_only(world: &mut SyncWorld) -> Result<(), eyre::Report> {
    start(world, false)
}
