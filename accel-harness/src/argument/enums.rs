//! Enumeration arguments validated against a closed set of named values.

use super::{ArgState, Argument, ArgumentError};

/// A closed value set usable as an [`EnumArgument`]. Names are matched
/// exactly against the command-line token.
pub trait ArgEnum: Copy + Eq + 'static {
    const VALUES: &'static [Self];

    fn name(self) -> &'static str;

    fn from_name(token: &str) -> Option<Self> {
        Self::VALUES.iter().copied().find(|v| v.name() == token)
    }
}

/// An argument whose value is one of a declared closed set.
pub struct EnumArgument<E: ArgEnum> {
    key: &'static str,
    help: &'static str,
    value: E,
    state: ArgState,
}

impl<E: ArgEnum> EnumArgument<E> {
    pub fn new(key: &'static str, help: &'static str, default: E) -> Self {
        Self {
            key,
            help,
            value: default,
            state: ArgState::Unset,
        }
    }

    pub fn get(&self) -> E {
        self.value
    }

    fn valid_names() -> String {
        E::VALUES
            .iter()
            .map(|v| v.name())
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl<E: ArgEnum> Argument for EnumArgument<E> {
    fn key(&self) -> &str {
        self.key
    }

    fn help(&self) -> &str {
        self.help
    }

    fn state(&self) -> ArgState {
        self.state
    }

    fn parse(&mut self, token: &str) -> Result<(), ArgumentError> {
        match E::from_name(token) {
            Some(value) => {
                self.value = value;
                self.state = ArgState::Parsed;
                Ok(())
            }
            None => {
                self.state = ArgState::Invalid;
                Err(ArgumentError::invalid(
                    self.key,
                    format!("expects one of {}, got '{token}'", Self::valid_names()),
                ))
            }
        }
    }

    fn validate(&self) -> Result<(), ArgumentError> {
        Ok(())
    }

    fn display_value(&self) -> String {
        self.value.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Flavor {
        Plain,
        Salted,
    }

    impl ArgEnum for Flavor {
        const VALUES: &'static [Flavor] = &[Flavor::Plain, Flavor::Salted];

        fn name(self) -> &'static str {
            match self {
                Flavor::Plain => "Plain",
                Flavor::Salted => "Salted",
            }
        }
    }

    #[test]
    fn test_enum_exact_match() {
        let mut arg = EnumArgument::new("flavor", "", Flavor::Plain);
        arg.parse("Salted").unwrap();
        assert_eq!(arg.get(), Flavor::Salted);
    }

    #[test]
    fn test_enum_rejects_near_misses() {
        let mut arg = EnumArgument::new("flavor", "", Flavor::Plain);
        assert!(arg.parse("salted").is_err());
        assert!(arg.parse("Salt").is_err());
        assert_eq!(arg.state(), ArgState::Invalid);
        assert_eq!(arg.get(), Flavor::Plain);
    }

    #[test]
    fn test_enum_error_lists_valid_names() {
        let mut arg = EnumArgument::new("flavor", "", Flavor::Plain);
        let err = arg.parse("bogus").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Plain|Salted"), "{message}");
    }

    #[test]
    fn test_enum_display_value() {
        let arg = EnumArgument::new("flavor", "", Flavor::Salted);
        assert_eq!(arg.display_value(), "Salted");
        assert!(!arg.was_parsed());
    }
}
