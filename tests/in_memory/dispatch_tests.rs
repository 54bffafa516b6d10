//! Dispatch tests for a running client backed by [`InMemoryCommandPlatform`].

use crate::in_memory::helpers::{
    Recorded, client, images, invocations, order, platform, recorded, roll, runtime,
};
use rstest::rstest;
use serde_json::json;
use slashgate::command::{
    adapters::InMemoryCommandPlatform,
    config::ClientConfig,
    domain::{ChoiceValue, DispatchError, InteractionEvent, RawOption, SelectedChoice},
    services::InteractionOutcome,
};
use std::io;
use tokio::runtime::Runtime;

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Tests that an omitted optional option reaches the handler as absent.
#[rstest]
fn omitted_option_is_absent(
    runtime: io::Result<Runtime>,
    platform: InMemoryCommandPlatform,
    recorded: Recorded,
) -> TestResult {
    let rt = runtime?;
    let mut app = client(&platform, ClientConfig::global());
    app.command(roll(&recorded))?;
    let running = rt.block_on(app.start())?;

    let event = InteractionEvent::new("roll");
    let outcome = rt.block_on(running.handle_interaction((), &event));

    assert_eq!(outcome, InteractionOutcome::Completed);
    let calls = invocations(&recorded)?;
    let [(label, arguments)] = calls.as_slice() else {
        return Err("expected exactly one invocation".into());
    };
    assert_eq!(label, "roll");
    assert_eq!(arguments.get::<i64>("sides")?, None);
    Ok(())
}

/// Tests that a native group payload routes to exactly one leaf.
#[rstest]
fn native_payload_routes_to_group_leaf(
    runtime: io::Result<Runtime>,
    platform: InMemoryCommandPlatform,
    recorded: Recorded,
) -> TestResult {
    let rt = runtime?;
    let mut app = client(&platform, ClientConfig::global());
    app.command(roll(&recorded))?.namespace(images(&recorded))?;
    let running = rt.block_on(app.start())?;
    let event = InteractionEvent::from_application_command(&json!({
        "type": 2,
        "data": {
            "name": "images",
            "type": 1,
            "options": [{"name": "cat", "type": 1}]
        }
    }))?;

    let outcome = rt.block_on(running.handle_interaction((), &event));

    assert_eq!(outcome, InteractionOutcome::Completed);
    let labels: Vec<String> = invocations(&recorded)?
        .into_iter()
        .map(|(label, _)| label)
        .collect();
    assert_eq!(labels, ["images cat"]);
    Ok(())
}

/// Tests that choice options deliver the declared member.
#[rstest]
fn choice_option_delivers_member(
    runtime: io::Result<Runtime>,
    platform: InMemoryCommandPlatform,
    recorded: Recorded,
) -> TestResult {
    let rt = runtime?;
    let mut app = client(&platform, ClientConfig::global());
    app.command(order(&recorded)?)?;
    let running = rt.block_on(app.start())?;
    let event = InteractionEvent::new("order").option(RawOption::new("size", "m").with_type(3));

    let outcome = rt.block_on(running.handle_interaction((), &event));

    assert_eq!(outcome, InteractionOutcome::Completed);
    let calls = invocations(&recorded)?;
    let (_, arguments) = calls.first().ok_or("expected an invocation")?;
    let size = arguments.require::<SelectedChoice>("size")?;
    assert_eq!(size.label(), "Medium");
    assert_eq!(size, ChoiceValue::from("m"));
    Ok(())
}

/// Tests that an undeclared choice never reaches the handler.
#[rstest]
fn undeclared_choice_is_rejected(
    runtime: io::Result<Runtime>,
    platform: InMemoryCommandPlatform,
    recorded: Recorded,
) -> TestResult {
    let rt = runtime?;
    let mut app = client(&platform, ClientConfig::global());
    app.command(order(&recorded)?)?;
    let running = rt.block_on(app.start())?;
    let event = InteractionEvent::new("order").option(RawOption::new("size", "xl"));

    let outcome = rt.block_on(running.handle_interaction((), &event));

    assert!(matches!(
        outcome,
        InteractionOutcome::Rejected(DispatchError::UnknownChoice { .. })
    ));
    assert!(invocations(&recorded)?.is_empty());
    Ok(())
}

/// Tests that a group name alone is not a command.
#[rstest]
fn group_without_leaf_is_unknown(
    runtime: io::Result<Runtime>,
    platform: InMemoryCommandPlatform,
    recorded: Recorded,
) -> TestResult {
    let rt = runtime?;
    let mut app = client(&platform, ClientConfig::global());
    app.namespace(images(&recorded))?;
    let running = rt.block_on(app.start())?;

    let event = InteractionEvent::new("images");
    let outcome = rt.block_on(running.handle_interaction((), &event));

    assert_eq!(
        outcome,
        InteractionOutcome::Rejected(DispatchError::UnknownCommand {
            path: "images".to_owned()
        })
    );
    Ok(())
}
