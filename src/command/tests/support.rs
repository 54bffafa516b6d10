//! Shared builders for command unit tests.

use crate::command::{
    domain::{Arguments, CommandDecl, HandlerError, HandlerSignature, Parameter},
    ports::CommandHandler,
};

/// A handler that always succeeds.
pub(super) fn noop() -> impl CommandHandler<()> + 'static {
    |_: (), _: Arguments| async { Ok::<(), HandlerError>(()) }
}

/// A documented command with no options.
pub(super) fn leaf(name: &str) -> CommandDecl<()> {
    CommandDecl::new(
        HandlerSignature::new(name).doc(format!("Runs {name}.")),
        noop(),
    )
}

/// The `roll` command: one optional, documented integer.
pub(super) fn roll_signature() -> HandlerSignature {
    HandlerSignature::new("roll")
        .doc("Roll a die.\n\n:sides: How many sides (default 6).")
        .parameter(Parameter::of::<Option<i64>>("sides"))
}
