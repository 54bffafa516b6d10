//! Startup synchronisation tests for [`InMemoryCommandPlatform`].

use crate::in_memory::helpers::{Recorded, client, images, platform, recorded, roll, runtime};
use rstest::rstest;
use slashgate::command::{
    adapters::{InMemoryCommandPlatform, PlatformOperation},
    config::{ClientConfig, DeploymentScope},
    domain::{CommandPayload, GuildId, InteractionEvent},
    ports::PlatformError,
    services::InteractionOutcome,
};
use std::io;
use tokio::runtime::Runtime;

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Restarting with an unchanged tree touches nothing remotely.
#[rstest]
fn restart_with_same_tree_is_a_noop(
    runtime: io::Result<Runtime>,
    platform: InMemoryCommandPlatform,
    recorded: Recorded,
) -> TestResult {
    let rt = runtime?;

    let mut first = client(&platform, ClientConfig::global());
    first
        .command(roll(&recorded))?
        .namespace(images(&recorded))?;
    let initial = rt.block_on(first.start())?;

    let mut second = client(&platform, ClientConfig::global());
    second
        .command(roll(&recorded))?
        .namespace(images(&recorded))?;
    let restarted = rt.block_on(second.start())?;

    assert_eq!(initial.sync_report().created, ["roll", "images"]);
    assert!(restarted.sync_report().is_noop());
    assert_eq!(restarted.sync_report().unchanged, ["roll", "images"]);
    assert_eq!(platform.operations()?.len(), 2);
    Ok(())
}

/// A removed command is deleted and a changed one replaced.
#[rstest]
fn restart_with_changed_tree_reconciles(
    runtime: io::Result<Runtime>,
    platform: InMemoryCommandPlatform,
    recorded: Recorded,
) -> TestResult {
    let rt = runtime?;

    let mut first = client(&platform, ClientConfig::global());
    first
        .command(roll(&recorded))?
        .namespace(images(&recorded))?;
    rt.block_on(first.start())?;

    let mut second = client(&platform, ClientConfig::global());
    second.namespace(images(&recorded).description("Pictures of animals."))?;
    let restarted = rt.block_on(second.start())?;

    assert_eq!(restarted.sync_report().updated, ["images"]);
    assert_eq!(restarted.sync_report().deleted, ["roll"]);
    assert_eq!(
        platform.commands(DeploymentScope::Global)?,
        restarted.tree().schema()
    );
    Ok(())
}

/// Guild deployments never touch the global command set.
#[rstest]
fn guild_scope_is_isolated(
    runtime: io::Result<Runtime>,
    platform: InMemoryCommandPlatform,
    recorded: Recorded,
) -> TestResult {
    let rt = runtime?;
    let guild = GuildId::new(4242);

    let mut global = client(&platform, ClientConfig::global());
    global.command(roll(&recorded))?;
    rt.block_on(global.start())?;

    let mut scoped = client(&platform, ClientConfig::for_guild(guild));
    scoped.namespace(images(&recorded))?;
    rt.block_on(scoped.start())?;

    assert_eq!(platform.commands(DeploymentScope::Global)?.len(), 1);
    assert_eq!(
        platform.operations()?.last(),
        Some(&PlatformOperation::Create {
            scope: DeploymentScope::Guild(guild),
            name: "images".to_owned(),
        })
    );
    Ok(())
}

/// One client can register some roots globally and others in a guild.
#[rstest]
fn mixed_scopes_register_from_one_client(
    runtime: io::Result<Runtime>,
    platform: InMemoryCommandPlatform,
    recorded: Recorded,
) -> TestResult {
    let rt = runtime?;
    let guild = DeploymentScope::Guild(GuildId::new(4242));

    let mut app = client(&platform, ClientConfig::global());
    app.command(roll(&recorded))?
        .namespace(images(&recorded).scope(guild))?;
    let running = rt.block_on(app.start())?;

    assert_eq!(
        running.sync_report().scopes,
        [DeploymentScope::Global, guild]
    );
    assert_eq!(
        names(&platform.commands(DeploymentScope::Global)?),
        ["roll"]
    );
    assert_eq!(names(&platform.commands(guild)?), ["images"]);

    let event = InteractionEvent::new("images").subcommand("cat");
    let outcome = rt.block_on(running.handle_interaction((), &event));
    assert_eq!(outcome, InteractionOutcome::Completed);

    let restarted = {
        let mut again = client(&platform, ClientConfig::global());
        again
            .command(roll(&recorded))?
            .namespace(images(&recorded).scope(guild))?;
        rt.block_on(again.start())?
    };
    assert_eq!(restarted.sync_report().unchanged, ["roll", "images"]);
    assert!(restarted.sync_report().created.is_empty());
    Ok(())
}

/// Transient failures are retried until the pass succeeds.
#[rstest]
fn transient_failures_are_retried(
    runtime: io::Result<Runtime>,
    platform: InMemoryCommandPlatform,
    recorded: Recorded,
) -> TestResult {
    let rt = runtime?;
    platform.fail_next(PlatformError::Transient("connection reset".to_owned()))?;
    platform.fail_next(PlatformError::Transient("connection reset".to_owned()))?;

    let mut app = client(&platform, ClientConfig::global());
    app.command(roll(&recorded))?;
    let running = rt.block_on(app.start())?;

    assert_eq!(running.sync_report().created, ["roll"]);
    assert_eq!(platform.call_count()?, 4);
    Ok(())
}

fn names(commands: &[CommandPayload]) -> Vec<&str> {
    commands
        .iter()
        .map(|command| command.name.as_str())
        .collect()
}
