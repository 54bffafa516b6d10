//! Handler signatures and the introspector that turns them into options.
//!
//! A handler's parameters are declared explicitly as [`Parameter`]s, each
//! with a [`DeclaredType`]. The introspector maps every declared type to an
//! [`OptionKind`], resolves each parameter's description from the doc
//! comment (or an explicit override), and enforces the platform's ordering
//! rule that required options precede optional ones. All failures surface
//! at declaration time.

use super::{
    ChoiceSet, CommandName, CommandOption, DocCommentParser, FieldListParser, OptionBounds,
    OptionKind, SchemaValidationError,
    entity::{Channel, Mentionable, Role, User},
    name::validate_description,
};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Maximum number of options on one command.
pub const MAX_OPTIONS: usize = 25;

/// The declared type of a handler parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    /// Text.
    Text,
    /// Whole number.
    WholeNumber,
    /// Real number.
    RealNumber,
    /// Flag.
    Flag,
    /// A user.
    User,
    /// A role.
    Role,
    /// A channel.
    Channel,
    /// A user or a role.
    Mentionable,
    /// A closed choice set.
    Choice(ChoiceSet),
    /// An optional wrapper around another type.
    Optional(Box<DeclaredType>),
    /// A type name with no option mapping.
    Named(String),
}

impl DeclaredType {
    /// Wraps `inner` as optional.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Maps the type to an option kind, returning `(kind, required)`.
    ///
    /// Returns `None` for unmapped names and nested optionals.
    #[must_use]
    pub fn option_kind(&self) -> Option<(OptionKind, bool)> {
        match self {
            Self::Optional(inner) => match inner.as_ref() {
                Self::Optional(_) => None,
                other => other.option_kind().map(|(kind, _)| (kind, false)),
            },
            Self::Text => Some((OptionKind::String, true)),
            Self::WholeNumber => Some((OptionKind::Integer, true)),
            Self::RealNumber => Some((OptionKind::Number, true)),
            Self::Flag => Some((OptionKind::Boolean, true)),
            Self::User => Some((OptionKind::User, true)),
            Self::Role => Some((OptionKind::Role, true)),
            Self::Channel => Some((OptionKind::Channel, true)),
            Self::Mentionable => Some((OptionKind::Mentionable, true)),
            Self::Choice(set) => Some((OptionKind::for_choices(set.kind()), true)),
            Self::Named(_) => None,
        }
    }

    fn choices(&self) -> Option<&ChoiceSet> {
        match self {
            Self::Choice(set) => Some(set),
            Self::Optional(inner) => inner.choices(),
            _ => None,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("string"),
            Self::WholeNumber => f.write_str("integer"),
            Self::RealNumber => f.write_str("number"),
            Self::Flag => f.write_str("boolean"),
            Self::User => f.write_str("user"),
            Self::Role => f.write_str("role"),
            Self::Channel => f.write_str("channel"),
            Self::Mentionable => f.write_str("mentionable"),
            Self::Choice(set) => write!(f, "choice<{}>", set.name()),
            Self::Optional(inner) => write!(f, "Option<{inner}>"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Parses type names from declarative tables.
///
/// Unknown names parse successfully into [`DeclaredType::Named`]; the
/// introspector rejects them with the parameter and command in context.
impl FromStr for DeclaredType {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Some(inner) = optional_inner(trimmed) {
            return Ok(Self::optional(inner.parse()?));
        }
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "string" | "str" | "text" => Self::Text,
            "integer" | "int" | "i64" => Self::WholeNumber,
            "number" | "float" | "f64" => Self::RealNumber,
            "boolean" | "bool" => Self::Flag,
            "user" | "member" => Self::User,
            "role" => Self::Role,
            "channel" => Self::Channel,
            "mentionable" => Self::Mentionable,
            _ => Self::Named(trimmed.to_owned()),
        })
    }
}

fn optional_inner(value: &str) -> Option<&str> {
    value
        .strip_suffix('?')
        .or_else(|| {
            value
                .strip_prefix("Option<")
                .and_then(|rest| rest.strip_suffix('>'))
        })
        .or_else(|| {
            value
                .strip_prefix("Optional[")
                .and_then(|rest| rest.strip_suffix(']'))
        })
}

/// Rust types that map onto an option kind.
pub trait OptionType {
    /// Returns the declared type for `Self`.
    fn declared_type() -> DeclaredType;
}

impl OptionType for String {
    fn declared_type() -> DeclaredType {
        DeclaredType::Text
    }
}

impl OptionType for i64 {
    fn declared_type() -> DeclaredType {
        DeclaredType::WholeNumber
    }
}

impl OptionType for f64 {
    fn declared_type() -> DeclaredType {
        DeclaredType::RealNumber
    }
}

impl OptionType for bool {
    fn declared_type() -> DeclaredType {
        DeclaredType::Flag
    }
}

impl OptionType for User {
    fn declared_type() -> DeclaredType {
        DeclaredType::User
    }
}

impl OptionType for Role {
    fn declared_type() -> DeclaredType {
        DeclaredType::Role
    }
}

impl OptionType for Channel {
    fn declared_type() -> DeclaredType {
        DeclaredType::Channel
    }
}

impl OptionType for Mentionable {
    fn declared_type() -> DeclaredType {
        DeclaredType::Mentionable
    }
}

impl<T: OptionType> OptionType for Option<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::optional(T::declared_type())
    }
}

/// One declared handler parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    declared: DeclaredType,
    description: Option<String>,
    bounds: Option<OptionBounds>,
}

impl Parameter {
    /// Declares a parameter with an explicit type.
    #[must_use]
    pub fn new(name: impl Into<String>, declared: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared,
            description: None,
            bounds: None,
        }
    }

    /// Declares a parameter typed by a Rust type.
    ///
    /// ```
    /// use slashgate::command::domain::{DeclaredType, Parameter};
    ///
    /// let sides = Parameter::of::<Option<i64>>("sides");
    /// assert_eq!(
    ///     sides.declared_type(),
    ///     &DeclaredType::optional(DeclaredType::WholeNumber),
    /// );
    /// ```
    #[must_use]
    pub fn of<T: OptionType>(name: impl Into<String>) -> Self {
        Self::new(name, T::declared_type())
    }

    /// Declares a required choice parameter.
    #[must_use]
    pub fn choice(name: impl Into<String>, set: ChoiceSet) -> Self {
        Self::new(name, DeclaredType::Choice(set))
    }

    /// Sets an explicit description, taking precedence over the doc comment.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the parameter optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        if !matches!(self.declared, DeclaredType::Optional(_)) {
            self.declared = DeclaredType::optional(self.declared);
        }
        self
    }

    /// Sets value or length bounds.
    #[must_use]
    pub const fn with_bounds(mut self, bounds: OptionBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Returns the declared name, as written.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn declared_type(&self) -> &DeclaredType {
        &self.declared
    }
}

/// The declared surface of a handler: name, doc comment and parameters.
///
/// The invocation context is the handler's first argument by construction
/// and is never declared here.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerSignature {
    name: String,
    doc: Option<String>,
    description: Option<String>,
    parameters: Vec<Parameter>,
}

impl HandlerSignature {
    /// Starts a signature for a handler named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            description: None,
            parameters: Vec::new(),
        }
    }

    /// Sets the structured doc comment.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Sets an explicit description, taking precedence over the doc summary.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Returns the handler name, as written.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared parameters in order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

/// The introspector's output for one handler.
#[derive(Debug, Clone, PartialEq)]
pub struct IntrospectedSignature {
    /// Validated command name.
    pub name: CommandName,
    /// Validated command description.
    pub description: String,
    /// Options in declared order.
    pub options: Vec<CommandOption>,
}

/// Derives options and descriptions from handler signatures.
#[derive(Debug, Clone, Default)]
pub struct SignatureIntrospector<P = FieldListParser> {
    parser: P,
}

impl SignatureIntrospector {
    /// Creates an introspector using [`FieldListParser`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parser: FieldListParser,
        }
    }
}

impl<P: DocCommentParser> SignatureIntrospector<P> {
    /// Creates an introspector with a custom doc-comment parser.
    #[must_use]
    pub const fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    /// Introspects `signature`, qualifying error paths with `parent`.
    ///
    /// `parent` is the space-separated path of enclosing namespaces, empty
    /// for root commands.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError`] when a parameter has no
    /// description or an unmapped type, the command has no description,
    /// required parameters follow optional ones, or names and limits are
    /// violated.
    pub fn introspect(
        &self,
        parent: &str,
        signature: &HandlerSignature,
    ) -> Result<IntrospectedSignature, SchemaValidationError> {
        let name = CommandName::new(&signature.name)?;
        let path = qualify(parent, name.as_str());
        let doc = signature
            .doc
            .as_deref()
            .map(|doc| self.parser.parse(doc))
            .unwrap_or_default();

        let summary = signature
            .description
            .as_deref()
            .or(doc.summary.as_deref())
            .ok_or_else(|| SchemaValidationError::MissingDescription { node: path.clone() })?;
        let description = validate_description(&path, summary)?;

        if signature.parameters.len() > MAX_OPTIONS {
            return Err(SchemaValidationError::TooManyOptions {
                command: path,
                count: signature.parameters.len(),
            });
        }

        let mut seen = HashSet::new();
        let mut seen_optional = false;
        let mut options = Vec::with_capacity(signature.parameters.len());
        for parameter in &signature.parameters {
            let option = build_option(&path, parameter, &doc.parameters)?;
            if !seen.insert(option.name().clone()) {
                return Err(SchemaValidationError::DuplicateOption {
                    command: path,
                    parameter: option.name().to_string(),
                });
            }
            if option.is_required() && seen_optional {
                return Err(SchemaValidationError::RequiredAfterOptional {
                    command: path,
                    parameter: option.name().to_string(),
                });
            }
            seen_optional |= !option.is_required();
            options.push(option);
        }

        for documented in doc.parameters.keys() {
            if !seen.iter().any(|name| name.as_str() == documented) {
                debug!(
                    command = %path,
                    parameter = %documented,
                    "doc comment describes an undeclared parameter"
                );
            }
        }

        Ok(IntrospectedSignature {
            name,
            description,
            options,
        })
    }

    /// Resolves a namespace description: explicit override first, then the
    /// doc summary.
    pub(crate) fn namespace_description(
        &self,
        path: &str,
        doc: Option<&str>,
        description: Option<&str>,
    ) -> Result<String, SchemaValidationError> {
        let summary = doc.and_then(|text| self.parser.parse(text).summary);
        let text = description
            .or(summary.as_deref())
            .ok_or_else(|| SchemaValidationError::MissingDescription {
                node: path.to_owned(),
            })?;
        validate_description(path, text)
    }
}

fn build_option(
    command: &str,
    parameter: &Parameter,
    documented: &indexmap::IndexMap<String, String>,
) -> Result<CommandOption, SchemaValidationError> {
    let name = CommandName::new(&parameter.name)?;
    let (kind, required) = parameter.declared.option_kind().ok_or_else(|| {
        SchemaValidationError::UnsupportedType {
            command: command.to_owned(),
            parameter: name.to_string(),
            type_name: parameter.declared.to_string(),
        }
    })?;

    let text = parameter
        .description
        .as_deref()
        .or_else(|| documented.get(name.as_str()).map(String::as_str))
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| SchemaValidationError::MissingParameterDescription {
            command: command.to_owned(),
            parameter: name.to_string(),
        })?;
    let description = validate_description(&format!("{command} {name}"), text)?;

    let mut option = CommandOption::new(name, description, kind, required);
    if let Some(set) = parameter.declared.choices() {
        option = option.with_choices(set.clone());
    }
    if let Some(bounds) = parameter.bounds {
        bounds
            .check_against(kind)
            .map_err(|reason| SchemaValidationError::InvalidBounds {
                command: command.to_owned(),
                parameter: option.name().to_string(),
                reason,
            })?;
        option = option.with_bounds(bounds);
    }
    Ok(option)
}

/// Joins a parent path and a child name with a space.
pub(crate) fn qualify(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent} {name}")
    }
}
