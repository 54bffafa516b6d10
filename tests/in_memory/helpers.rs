//! Shared test helpers for in-memory platform integration tests.

use std::sync::{Arc, Mutex};

use mockable::DefaultClock;
use rstest::fixture;
use slashgate::command::{
    adapters::InMemoryCommandPlatform,
    config::{ClientConfig, RetryPolicy},
    domain::{
        Arguments, ChoiceSet, CommandDecl, HandlerError, HandlerSignature, NamespaceDecl,
        Parameter,
    },
    ports::CommandHandler,
    services::CommandClient,
};
use std::io;
use tokio::runtime::Runtime;

/// Client type used throughout the in-memory tests.
pub type TestClient = CommandClient<(), InMemoryCommandPlatform, DefaultClock>;

/// Arguments captured by a recording handler, one entry per invocation.
pub type Recorded = Arc<Mutex<Vec<(String, Arguments)>>>;

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
}

/// Provides a fresh in-memory platform for each test.
#[fixture]
pub fn platform() -> InMemoryCommandPlatform {
    InMemoryCommandPlatform::new()
}

/// Provides an empty invocation log.
#[fixture]
pub fn recorded() -> Recorded {
    Recorded::default()
}

/// Builds a client registering globally without retry delays.
#[must_use]
pub fn client(platform: &InMemoryCommandPlatform, config: ClientConfig) -> TestClient {
    CommandClient::new(
        Arc::new(platform.clone()),
        Arc::new(DefaultClock),
        config.with_retry(RetryPolicy::immediate()),
    )
}

/// A handler that records its arguments under `label`.
pub fn recording(recorded: &Recorded, label: &str) -> impl CommandHandler<()> + 'static {
    let log = Arc::clone(recorded);
    let name = label.to_owned();
    move |_: (), arguments: Arguments| {
        let sink = Arc::clone(&log);
        let entry = name.clone();
        async move {
            sink.lock()
                .map_err(|err| -> HandlerError { err.to_string().into() })?
                .push((entry, arguments));
            Ok::<(), HandlerError>(())
        }
    }
}

/// The `roll` command with an optional `sides` integer.
#[must_use]
pub fn roll(recorded: &Recorded) -> CommandDecl<()> {
    CommandDecl::new(
        HandlerSignature::new("roll")
            .doc("Roll a die.\n\n:sides: How many sides (default 6).")
            .parameter(Parameter::of::<Option<i64>>("sides")),
        recording(recorded, "roll"),
    )
}

/// The `images` namespace with `cat`, `dog` and `any` leaves.
#[must_use]
pub fn images(recorded: &Recorded) -> NamespaceDecl<()> {
    ["cat", "dog", "any"].into_iter().fold(
        NamespaceDecl::new("images").doc("Fetch random images."),
        |namespace, leaf| {
            namespace.command(CommandDecl::new(
                HandlerSignature::new(leaf).doc(format!("A random {leaf} picture.")),
                recording(recorded, &format!("images {leaf}")),
            ))
        },
    )
}

/// The `order` command taking a closed set of cup sizes.
///
/// # Errors
///
/// Returns an error if the choice set is invalid.
pub fn order(
    recorded: &Recorded,
) -> Result<CommandDecl<()>, Box<dyn std::error::Error + Send + Sync>> {
    let sizes = ChoiceSet::strings("size", [("Small", "s"), ("Medium", "m"), ("Large", "l")])?;
    Ok(CommandDecl::new(
        HandlerSignature::new("order")
            .doc("Order a drink.\n:size: Cup size.")
            .parameter(Parameter::choice("size", sizes)),
        recording(recorded, "order"),
    ))
}

/// Returns the invocations recorded so far.
///
/// # Errors
///
/// Returns an error if the log lock is poisoned.
pub fn invocations(
    recorded: &Recorded,
) -> Result<Vec<(String, Arguments)>, Box<dyn std::error::Error + Send + Sync>> {
    let log = recorded.lock().map_err(|err| err.to_string())?;
    Ok(log.clone())
}
