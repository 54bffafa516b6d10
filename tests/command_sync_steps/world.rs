//! Shared world state for command synchronisation BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use slashgate::command::{
    adapters::InMemoryCommandPlatform,
    config::{ClientConfig, RetryPolicy},
    domain::{
        Arguments, CommandDecl, HandlerError, HandlerSignature, NamespaceDecl, Parameter,
        SchemaValidationError,
    },
    services::{CommandClient, SyncReport},
};

/// Client type used by the BDD world.
pub type TestClient = CommandClient<(), InMemoryCommandPlatform, DefaultClock>;

/// Scenario world for synchronisation behaviour tests.
#[derive(Default)]
pub struct SyncWorld {
    /// Platform shared by every client started in the scenario.
    pub platform: InMemoryCommandPlatform,
    /// Report of the most recent startup.
    pub last_report: Option<SyncReport>,
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SyncWorld {
    SyncWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds a client on the world's platform.
pub fn client(world: &SyncWorld) -> TestClient {
    CommandClient::new(
        Arc::new(world.platform.clone()),
        Arc::new(DefaultClock),
        ClientConfig::global().with_retry(RetryPolicy::immediate()),
    )
}

/// Declares `roll` and, when `with_images` is set, the `images` namespace.
///
/// # Errors
///
/// Returns an error if a declaration is invalid.
pub fn declare(client: &mut TestClient, with_images: bool) -> Result<(), SchemaValidationError> {
    client.command(CommandDecl::new(
        HandlerSignature::new("roll")
            .doc("Roll a die.\n\n:sides: How many sides (default 6).")
            .parameter(Parameter::of::<Option<i64>>("sides")),
        |_: (), _: Arguments| async { Ok::<(), HandlerError>(()) },
    ))?;
    if with_images {
        client.namespace(
            NamespaceDecl::new("images")
                .doc("Fetch random images.")
                .command(CommandDecl::new(
                    HandlerSignature::new("cat").doc("A random cat."),
                    |_: (), _: Arguments| async { Ok::<(), HandlerError>(()) },
                )),
        )?;
    }
    Ok(())
}

/// Declares and starts a client, recording its sync report.
///
/// # Errors
///
/// Returns an error if declaration or startup fails.
pub fn start(world: &mut SyncWorld, with_images: bool) -> Result<(), eyre::Report> {
    let mut app = client(world);
    declare(&mut app, with_images)?;
    let running = run_async(app.start())?;
    world.last_report = Some(running.sync_report().clone());
    Ok(())
}
