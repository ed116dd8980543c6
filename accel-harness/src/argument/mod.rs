//! Typed, self-describing command-line arguments and per-benchmark
//! argument containers.
//!
//! Every benchmark declares a container struct embedding [`CommonArguments`]
//! (the api selector and the iteration count shared by all benchmarks) plus
//! its own typed arguments. [`bind_tokens`] binds raw `--key=value` tokens to
//! a container and validates the result; a container that fails binding is
//! never executed.

mod basic;
mod enums;

pub use basic::{
    BoolArgument, ByteSizeArgument, IntegerArgument, NonNegativeIntegerArgument,
    PositiveIntegerArgument, StringArgument, ThreeComponentUintArgument, UintTupleArgument,
};
pub use enums::{ArgEnum, EnumArgument};

use std::any::Any;

use crate::api::ApiSelection;

/// Default iteration count when `--iterations` is not supplied.
pub const DEFAULT_ITERATIONS: u64 = 10;

/// Validation state of a single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgState {
    /// No token was bound; the argument holds its default (if any).
    Unset,
    /// A token was bound and accepted.
    Parsed,
    /// A token was bound and rejected.
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("unknown argument key '{0}'")]
    UnknownKey(String),
    #[error("argument '{key}': {message}")]
    InvalidValue { key: String, message: String },
    #[error("argument '{0}' is required but was not provided")]
    MissingRequired(String),
    #[error("argument '{0}' expects a value")]
    MissingValue(String),
}

impl ArgumentError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ArgumentError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// A named, typed, described command-line argument.
pub trait Argument {
    /// Stable command-line key.
    fn key(&self) -> &str;

    /// Help string shown in listings.
    fn help(&self) -> &str;

    fn state(&self) -> ArgState;

    /// True when a token was explicitly bound to this argument, as opposed
    /// to the argument holding its default.
    fn was_parsed(&self) -> bool {
        self.state() == ArgState::Parsed
    }

    /// Bind one raw token to this argument.
    fn parse(&mut self, token: &str) -> Result<(), ArgumentError>;

    /// Check the settled value. Required arguments report
    /// [`ArgumentError::MissingRequired`] when left unset.
    fn validate(&self) -> Result<(), ArgumentError>;

    /// Printable current value, used for help text and result lines.
    fn display_value(&self) -> String;

    /// True for boolean arguments that may appear as a bare `--flag`.
    fn is_flag(&self) -> bool {
        false
    }
}

/// Arguments shared by every benchmark: the backend selector and the
/// measured iteration count.
pub struct CommonArguments {
    pub api: EnumArgument<ApiSelection>,
    pub iterations: PositiveIntegerArgument,
}

impl CommonArguments {
    pub fn new() -> Self {
        Self {
            api: EnumArgument::new("api", "Backend API to run against", ApiSelection::All),
            iterations: PositiveIntegerArgument::with_default(
                "iterations",
                "Number of measured repetitions",
                DEFAULT_ITERATIONS,
            ),
        }
    }

    pub fn arguments(&self) -> Vec<&dyn Argument> {
        vec![&self.api, &self.iterations]
    }

    pub fn arguments_mut(&mut self) -> Vec<&mut dyn Argument> {
        vec![&mut self.api, &mut self.iterations]
    }
}

impl Default for CommonArguments {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered collection of arguments for one benchmark invocation.
///
/// `arguments()` and `arguments_mut()` must yield the same arguments in the
/// same order, common arguments first.
pub trait ArgumentContainer: Any {
    fn common(&self) -> &CommonArguments;

    /// All arguments in declaration order, common arguments first.
    fn arguments(&self) -> Vec<&dyn Argument>;

    fn arguments_mut(&mut self) -> Vec<&mut dyn Argument>;

    fn as_any(&self) -> &dyn Any;
}

impl dyn ArgumentContainer {
    pub fn downcast_ref<T: ArgumentContainer>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Render `Name(key=value ...)` listing only explicitly-set arguments,
    /// so a result line reflects user intent rather than defaults.
    pub fn command_line(&self, name: &str) -> String {
        let set: Vec<String> = self
            .arguments()
            .iter()
            .filter(|arg| arg.was_parsed())
            .map(|arg| format!("{}={}", arg.key(), arg.display_value()))
            .collect();
        if set.is_empty() {
            name.to_string()
        } else {
            format!("{}({})", name, set.join(" "))
        }
    }
}

/// A container for benchmarks that take no arguments beyond the common ones.
pub struct EmptyArguments {
    pub common: CommonArguments,
}

impl EmptyArguments {
    pub fn new() -> Self {
        Self {
            common: CommonArguments::new(),
        }
    }
}

impl Default for EmptyArguments {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgumentContainer for EmptyArguments {
    fn common(&self) -> &CommonArguments {
        &self.common
    }

    fn arguments(&self) -> Vec<&dyn Argument> {
        self.common.arguments()
    }

    fn arguments_mut(&mut self) -> Vec<&mut dyn Argument> {
        self.common.arguments_mut()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn split_token(token: &str) -> (&str, Option<&str>) {
    let body = token.strip_prefix("--").unwrap_or(token);
    match body.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => (body, None),
    }
}

fn is_bool_literal(token: &str) -> bool {
    token.eq_ignore_ascii_case("true")
        || token.eq_ignore_ascii_case("false")
        || token == "0"
        || token == "1"
}

/// Bind a sequence of command-line tokens to a container and validate it.
///
/// Accepted token forms: `--key=value`, `--key value`, `key value`, and bare
/// `--flag` for booleans. Keys resolve case-insensitively; unknown keys are
/// a hard error. All errors are collected, not just the first.
pub fn bind_tokens(
    container: &mut dyn ArgumentContainer,
    tokens: &[String],
) -> Result<(), Vec<ArgumentError>> {
    let mut errors = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let (key, inline) = split_token(&tokens[i]);

        let found = {
            let arguments = container.arguments();
            arguments
                .iter()
                .position(|arg| arg.key().eq_ignore_ascii_case(key))
                .map(|idx| (idx, arguments[idx].is_flag()))
        };

        let Some((idx, is_flag)) = found else {
            errors.push(ArgumentError::UnknownKey(key.to_string()));
            // Consume the would-be value so one mistake reports one error.
            if inline.is_none() && tokens.get(i + 1).is_some_and(|t| !t.starts_with("--")) {
                i += 1;
            }
            i += 1;
            continue;
        };

        let value: String = match inline {
            Some(v) => v.to_string(),
            None if is_flag => {
                // A bare flag is true; an explicit bool literal may follow.
                match tokens.get(i + 1) {
                    Some(next) if is_bool_literal(next) => {
                        i += 1;
                        next.clone()
                    }
                    _ => "true".to_string(),
                }
            }
            None => match tokens.get(i + 1) {
                Some(next) => {
                    i += 1;
                    next.clone()
                }
                None => {
                    errors.push(ArgumentError::MissingValue(key.to_string()));
                    i += 1;
                    continue;
                }
            },
        };

        if let Some(argument) = container.arguments_mut().into_iter().nth(idx) {
            if let Err(err) = argument.parse(&value) {
                errors.push(err);
            }
        }
        i += 1;
    }

    for arg in container.arguments() {
        if let Err(err) = arg.validate() {
            errors.push(err);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Api;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    struct ProbeArguments {
        common: CommonArguments,
        size: ByteSizeArgument,
        verify: BoolArgument,
        threads: PositiveIntegerArgument,
    }

    impl ProbeArguments {
        fn new() -> Self {
            Self {
                common: CommonArguments::new(),
                size: ByteSizeArgument::new("size", "Buffer size", 1024),
                verify: BoolArgument::new("verify", "Check results", false),
                threads: PositiveIntegerArgument::new("threads", "Thread count"),
            }
        }
    }

    impl ArgumentContainer for ProbeArguments {
        fn common(&self) -> &CommonArguments {
            &self.common
        }

        fn arguments(&self) -> Vec<&dyn Argument> {
            let mut args = self.common.arguments();
            args.push(&self.size);
            args.push(&self.verify);
            args.push(&self.threads);
            args
        }

        fn arguments_mut(&mut self) -> Vec<&mut dyn Argument> {
            let mut args = self.common.arguments_mut();
            args.push(&mut self.size);
            args.push(&mut self.verify);
            args.push(&mut self.threads);
            args
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_bind_key_equals_value() {
        let mut args = ProbeArguments::new();
        bind_tokens(&mut args, &tokens(&["--size=64K", "--threads=4"])).unwrap();
        assert_eq!(args.size.get(), 64 * 1024);
        assert_eq!(args.threads.get(), 4);
        assert!(args.size.was_parsed());
        assert!(!args.verify.was_parsed());
    }

    #[test]
    fn test_bind_key_value_pairs() {
        let mut args = ProbeArguments::new();
        bind_tokens(&mut args, &tokens(&["size", "2M", "--threads", "8"])).unwrap();
        assert_eq!(args.size.get(), 2 * 1024 * 1024);
        assert_eq!(args.threads.get(), 8);
    }

    #[test]
    fn test_bind_bare_flag() {
        let mut args = ProbeArguments::new();
        bind_tokens(&mut args, &tokens(&["--verify", "--threads=1"])).unwrap();
        assert!(args.verify.get());
    }

    #[test]
    fn test_bind_flag_with_literal() {
        let mut args = ProbeArguments::new();
        bind_tokens(&mut args, &tokens(&["--verify", "false", "--threads=1"])).unwrap();
        assert!(!args.verify.get());
        assert!(args.verify.was_parsed());
    }

    #[test]
    fn test_unknown_key_is_hard_error() {
        let mut args = ProbeArguments::new();
        let errs = bind_tokens(&mut args, &tokens(&["--bogus=3", "--threads=1"])).unwrap_err();
        assert_eq!(errs, vec![ArgumentError::UnknownKey("bogus".to_string())]);
    }

    #[test]
    fn test_unknown_key_consumes_its_value() {
        let mut args = ProbeArguments::new();
        let errs = bind_tokens(&mut args, &tokens(&["bogus", "3", "--threads=1"])).unwrap_err();
        assert_eq!(errs.len(), 1);
    }

    #[test]
    fn test_missing_required_argument() {
        let mut args = ProbeArguments::new();
        let errs = bind_tokens(&mut args, &tokens(&["--size=1K"])).unwrap_err();
        assert_eq!(
            errs,
            vec![ArgumentError::MissingRequired("threads".to_string())]
        );
    }

    #[test]
    fn test_keys_resolve_case_insensitively() {
        let mut args = ProbeArguments::new();
        bind_tokens(&mut args, &tokens(&["--SIZE=1K", "--Threads=2"])).unwrap();
        assert_eq!(args.size.get(), 1024);
        assert_eq!(args.threads.get(), 2);
    }

    #[test]
    fn test_missing_value_reported() {
        let mut args = ProbeArguments::new();
        let errs = bind_tokens(&mut args, &tokens(&["--threads"])).unwrap_err();
        assert!(errs.contains(&ArgumentError::MissingValue("threads".to_string())));
    }

    #[test]
    fn test_binding_is_deterministic() {
        let toks = tokens(&["--size=64K", "--verify", "--threads=4", "--api=Host"]);
        let mut first = ProbeArguments::new();
        let mut second = ProbeArguments::new();
        bind_tokens(&mut first, &toks).unwrap();
        bind_tokens(&mut second, &toks).unwrap();
        assert_eq!(first.size.get(), second.size.get());
        assert_eq!(first.verify.get(), second.verify.get());
        assert_eq!(first.threads.get(), second.threads.get());
        assert_eq!(first.common.api.get(), second.common.api.get());
        let parsed = |c: &ProbeArguments| {
            c.arguments()
                .iter()
                .map(|a| a.was_parsed())
                .collect::<Vec<_>>()
        };
        assert_eq!(parsed(&first), parsed(&second));
    }

    #[test]
    fn test_common_arguments_defaults() {
        let mut args = ProbeArguments::new();
        bind_tokens(&mut args, &tokens(&["--threads=1"])).unwrap();
        assert_eq!(args.common.api.get(), ApiSelection::All);
        assert_eq!(args.common.iterations.get(), DEFAULT_ITERATIONS);
    }

    #[test]
    fn test_api_selection_parses() {
        let mut args = ProbeArguments::new();
        bind_tokens(&mut args, &tokens(&["--api=Host", "--threads=1"])).unwrap();
        assert_eq!(args.common.api.get(), ApiSelection::Single(Api::Host));
    }

    #[test]
    fn test_command_line_lists_only_explicit_arguments() {
        let mut args = ProbeArguments::new();
        bind_tokens(&mut args, &tokens(&["--size=64K", "--threads=4"])).unwrap();
        let container: &dyn ArgumentContainer = &args;
        assert_eq!(
            container.command_line("Probe"),
            "Probe(size=64K threads=4)"
        );
    }

    #[test]
    fn test_command_line_without_arguments() {
        let mut args = EmptyArguments::new();
        bind_tokens(&mut args, &[]).unwrap();
        let container: &dyn ArgumentContainer = &args;
        assert_eq!(container.command_line("Probe"), "Probe");
    }

    #[test]
    fn test_errors_are_collected_not_first_only() {
        let mut args = ProbeArguments::new();
        let errs =
            bind_tokens(&mut args, &tokens(&["--size=junkK", "--threads=0"])).unwrap_err();
        assert_eq!(errs.len(), 2);
    }
}
