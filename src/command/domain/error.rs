//! Error types for schema validation, dispatch and handler invocation.

use super::Snowflake;
use thiserror::Error;

/// Failure raised by user handler code.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors detected while declaring commands, before anything is registered.
///
/// Every variant is fatal at startup: an invalid schema is never registered
/// and never dispatched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaValidationError {
    /// A command, namespace or option name violates the platform pattern.
    #[error("invalid name '{name}': {reason}")]
    InvalidName {
        /// The offending name, after normalisation.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// A command or namespace has neither a doc summary nor an override.
    #[error("'{node}' has no description")]
    MissingDescription {
        /// Qualified node path.
        node: String,
    },

    /// A description exceeds the platform's 100-character limit.
    #[error("description of '{node}' is {length} characters, exceeding the limit of 100")]
    DescriptionTooLong {
        /// Qualified node or option path.
        node: String,
        /// Actual length in characters.
        length: usize,
    },

    /// A parameter has no doc-comment entry and no explicit description.
    #[error("parameter '{parameter}' of '/{command}' has no description")]
    MissingParameterDescription {
        /// Qualified command path.
        command: String,
        /// Parameter name.
        parameter: String,
    },

    /// A parameter type has no mapping to an option kind.
    #[error("parameter '{parameter}' of '/{command}' has unsupported type '{type_name}'")]
    UnsupportedType {
        /// Qualified command path.
        command: String,
        /// Parameter name.
        parameter: String,
        /// Declared type name.
        type_name: String,
    },

    /// A required parameter was declared after an optional one.
    #[error("required parameter '{parameter}' of '/{command}' follows an optional parameter")]
    RequiredAfterOptional {
        /// Qualified command path.
        command: String,
        /// The misplaced required parameter.
        parameter: String,
    },

    /// Two parameters of one command share a name.
    #[error("parameter '{parameter}' is declared twice on '/{command}'")]
    DuplicateOption {
        /// Qualified command path.
        command: String,
        /// Duplicated parameter name.
        parameter: String,
    },

    /// A command declares more options than the platform accepts.
    #[error("'/{command}' declares {count} options, exceeding the limit of 25")]
    TooManyOptions {
        /// Qualified command path.
        command: String,
        /// Declared option count.
        count: usize,
    },

    /// Two siblings under the same parent share a name.
    #[error("'{name}' is declared twice under '{parent}'")]
    DuplicateName {
        /// Parent path, or `<root>` for root nodes.
        parent: String,
        /// Duplicated child name.
        name: String,
    },

    /// A namespace holds more children than the platform accepts.
    #[error("'{parent}' has {count} children, exceeding the limit of 25")]
    TooManyChildren {
        /// Namespace path.
        parent: String,
        /// Child count.
        count: usize,
    },

    /// The tree holds more root nodes than the platform accepts.
    #[error("{count} root commands declared, exceeding the limit of 100")]
    TooManyRootNodes {
        /// Root node count.
        count: usize,
    },

    /// A namespace has no members.
    #[error("namespace '{namespace}' has no commands")]
    EmptyNamespace {
        /// Namespace path.
        namespace: String,
    },

    /// Namespaces were nested deeper than group → subgroup.
    #[error("namespace '{path}' is nested too deeply (at most group → subgroup → command)")]
    NestingTooDeep {
        /// Path of the namespace that exceeded the depth limit.
        path: String,
    },

    /// A namespace member chose its own deployment scope.
    #[error("'{path}' sets a deployment scope, but only root declarations may")]
    ScopedMember {
        /// Path of the member.
        path: String,
    },

    /// A choice set has fewer than 1 or more than 25 members.
    #[error("choice set '{set}' has {count} members; between 1 and 25 are required")]
    ChoiceCount {
        /// Choice set name.
        set: String,
        /// Member count.
        count: usize,
    },

    /// Choice set members do not share one value kind.
    #[error("choice '{member}' of set '{set}' has a different value type from earlier choices")]
    MixedChoiceKinds {
        /// Choice set name.
        set: String,
        /// The first member with a differing kind.
        member: String,
    },

    /// Two members of a choice set share a value.
    #[error("choice set '{set}' contains the value {value} more than once")]
    DuplicateChoiceValue {
        /// Choice set name.
        set: String,
        /// Duplicated value.
        value: String,
    },

    /// A choice label or value violates platform limits.
    #[error("invalid choice in set '{set}': {reason}")]
    InvalidChoice {
        /// Choice set name.
        set: String,
        /// Why the member was rejected.
        reason: String,
    },

    /// Bounds were declared for a kind that does not support them, or are
    /// inverted.
    #[error("invalid bounds on parameter '{parameter}' of '/{command}': {reason}")]
    InvalidBounds {
        /// Qualified command path.
        command: String,
        /// Parameter name.
        parameter: String,
        /// Why the bounds were rejected.
        reason: String,
    },

    /// A legacy permission overlay is malformed.
    #[error("invalid permission overlay on '{node}': {reason}")]
    InvalidPermission {
        /// Node the overlay is attached to.
        node: String,
        /// Why the overlay was rejected.
        reason: String,
    },
}

/// Errors raised while routing an inbound interaction to a handler.
///
/// Dispatch errors are recovered per event: the event is acknowledged as
/// failed and logged, and other events are unaffected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    /// No command leaf matches the event path.
    #[error("no command registered at '/{path}'")]
    UnknownCommand {
        /// Path requested by the event.
        path: String,
    },

    /// The event payload could not be interpreted.
    #[error("malformed interaction event: {0}")]
    MalformedEvent(String),

    /// The event carries an option the command does not declare.
    #[error("'/{command}' received undeclared option '{option}'")]
    UnknownOption {
        /// Qualified command path.
        command: String,
        /// Undeclared option name.
        option: String,
    },

    /// A required option is absent from the event.
    #[error("'/{command}' is missing required option '{option}'")]
    MissingRequiredOption {
        /// Qualified command path.
        command: String,
        /// Missing option name.
        option: String,
    },

    /// The event reports a type code that disagrees with the declared kind.
    #[error("option '{option}' of '/{command}' has type {found}, expected {expected}")]
    KindMismatch {
        /// Qualified command path.
        command: String,
        /// Option name.
        option: String,
        /// Declared type code.
        expected: u8,
        /// Type code carried by the event.
        found: u8,
    },

    /// A raw value could not be converted to the declared kind.
    #[error("invalid value for option '{option}' of '/{command}': {reason}")]
    InvalidValue {
        /// Qualified command path.
        command: String,
        /// Option name.
        option: String,
        /// Conversion failure.
        reason: String,
    },

    /// An entity id is absent from the resolved-entity table.
    #[error("option '{option}' of '/{command}' references unresolved entity {id}")]
    UnresolvedEntity {
        /// Qualified command path.
        command: String,
        /// Option name.
        option: String,
        /// Referenced entity id.
        id: Snowflake,
    },

    /// A choice option received a value outside its declared set.
    #[error("option '{option}' of '/{command}' received undeclared choice {value}")]
    UnknownChoice {
        /// Qualified command path.
        command: String,
        /// Option name.
        option: String,
        /// Received raw value.
        value: String,
    },

    /// A value falls outside the declared bounds.
    #[error("option '{option}' of '/{command}' is out of bounds: {reason}")]
    OutOfBounds {
        /// Qualified command path.
        command: String,
        /// Option name.
        option: String,
        /// Which bound was violated.
        reason: String,
    },
}

/// A handler-raised failure, reified with the command that raised it.
#[derive(Debug, Error)]
#[error("command '/{command}' raised an error: {source}")]
pub struct InvocationError {
    command: String,
    #[source]
    source: HandlerError,
}

impl InvocationError {
    /// Wraps a handler failure.
    #[must_use]
    pub fn new(command: impl Into<String>, source: HandlerError) -> Self {
        Self {
            command: command.into(),
            source,
        }
    }

    /// Returns the qualified path of the failing command.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the original handler failure.
    #[must_use]
    pub fn original(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }

    /// Consumes the wrapper and returns the original failure.
    #[must_use]
    pub fn into_original(self) -> HandlerError {
        self.source
    }
}

/// A handler task panicked instead of returning.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("handler panicked: {0}")]
pub struct HandlerPanicked(pub String);

/// Errors raised by typed access to a coerced argument set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArgumentError {
    /// The command declares no argument with this name.
    #[error("no argument named '{0}'")]
    Unknown(String),

    /// The argument was not provided.
    #[error("argument '{0}' was not provided")]
    Missing(String),

    /// The argument holds a different kind of value.
    #[error("argument '{name}' holds {found}, not {expected}")]
    TypeMismatch {
        /// Argument name.
        name: String,
        /// Requested kind.
        expected: &'static str,
        /// Stored kind.
        found: &'static str,
    },
}
