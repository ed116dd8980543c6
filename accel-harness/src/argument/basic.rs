//! Concrete argument types: booleans, the integer family, byte sizes,
//! strings, and fixed-arity uint tuples.

use super::{ArgState, Argument, ArgumentError};

const KILOBYTE: u64 = 1 << 10;
const MEGABYTE: u64 = 1 << 20;
const GIGABYTE: u64 = 1 << 30;

/// Format a byte count with a binary suffix when it divides cleanly
/// (e.g. 65536 -> "64K").
pub(crate) fn format_byte_size(bytes: u64) -> String {
    if bytes >= GIGABYTE && bytes % GIGABYTE == 0 {
        format!("{}G", bytes / GIGABYTE)
    } else if bytes >= MEGABYTE && bytes % MEGABYTE == 0 {
        format!("{}M", bytes / MEGABYTE)
    } else if bytes >= KILOBYTE && bytes % KILOBYTE == 0 {
        format!("{}K", bytes / KILOBYTE)
    } else {
        bytes.to_string()
    }
}

/// A boolean argument. Accepts `true`/`false`/`1`/`0` and may appear as a
/// bare `--flag`, which sets it to true.
pub struct BoolArgument {
    key: &'static str,
    help: &'static str,
    value: bool,
    state: ArgState,
}

impl BoolArgument {
    pub fn new(key: &'static str, help: &'static str, default: bool) -> Self {
        Self {
            key,
            help,
            value: default,
            state: ArgState::Unset,
        }
    }

    pub fn get(&self) -> bool {
        self.value
    }
}

impl Argument for BoolArgument {
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
        let parsed = if token.eq_ignore_ascii_case("true") || token == "1" {
            Some(true)
        } else if token.eq_ignore_ascii_case("false") || token == "0" {
            Some(false)
        } else {
            None
        };
        match parsed {
            Some(value) => {
                self.value = value;
                self.state = ArgState::Parsed;
                Ok(())
            }
            None => {
                self.state = ArgState::Invalid;
                Err(ArgumentError::invalid(
                    self.key,
                    format!("expects true/false/1/0, got '{token}'"),
                ))
            }
        }
    }

    fn validate(&self) -> Result<(), ArgumentError> {
        Ok(())
    }

    fn display_value(&self) -> String {
        self.value.to_string()
    }

    fn is_flag(&self) -> bool {
        true
    }
}

/// A signed integer argument with a default.
pub struct IntegerArgument {
    key: &'static str,
    help: &'static str,
    value: i64,
    state: ArgState,
}

impl IntegerArgument {
    pub fn new(key: &'static str, help: &'static str, default: i64) -> Self {
        Self {
            key,
            help,
            value: default,
            state: ArgState::Unset,
        }
    }

    pub fn get(&self) -> i64 {
        self.value
    }
}

impl Argument for IntegerArgument {
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
        match token.parse::<i64>() {
            Ok(value) => {
                self.value = value;
                self.state = ArgState::Parsed;
                Ok(())
            }
            Err(_) => {
                self.state = ArgState::Invalid;
                Err(ArgumentError::invalid(
                    self.key,
                    format!("expects an integer, got '{token}'"),
                ))
            }
        }
    }

    fn validate(&self) -> Result<(), ArgumentError> {
        Ok(())
    }

    fn display_value(&self) -> String {
        self.value.to_string()
    }
}

/// An unsigned integer argument with a default.
pub struct NonNegativeIntegerArgument {
    key: &'static str,
    help: &'static str,
    value: u64,
    state: ArgState,
}

impl NonNegativeIntegerArgument {
    pub fn new(key: &'static str, help: &'static str, default: u64) -> Self {
        Self {
            key,
            help,
            value: default,
            state: ArgState::Unset,
        }
    }

    pub fn get(&self) -> u64 {
        self.value
    }
}

impl Argument for NonNegativeIntegerArgument {
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
        match token.parse::<u64>() {
            Ok(value) => {
                self.value = value;
                self.state = ArgState::Parsed;
                Ok(())
            }
            Err(_) => {
                self.state = ArgState::Invalid;
                Err(ArgumentError::invalid(
                    self.key,
                    format!("expects a non-negative integer, got '{token}'"),
                ))
            }
        }
    }

    fn validate(&self) -> Result<(), ArgumentError> {
        Ok(())
    }

    fn display_value(&self) -> String {
        self.value.to_string()
    }
}

/// A strictly positive integer. Constructed with [`new`](Self::new) it is
/// required; with [`with_default`](Self::with_default) it is optional.
pub struct PositiveIntegerArgument {
    key: &'static str,
    help: &'static str,
    value: u64,
    required: bool,
    state: ArgState,
}

impl PositiveIntegerArgument {
    pub fn new(key: &'static str, help: &'static str) -> Self {
        Self {
            key,
            help,
            value: 0,
            required: true,
            state: ArgState::Unset,
        }
    }

    pub fn with_default(key: &'static str, help: &'static str, default: u64) -> Self {
        debug_assert!(default > 0);
        Self {
            key,
            help,
            value: default,
            required: false,
            state: ArgState::Unset,
        }
    }

    pub fn get(&self) -> u64 {
        self.value
    }
}

impl Argument for PositiveIntegerArgument {
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
        match token.parse::<u64>() {
            Ok(value) if value > 0 => {
                self.value = value;
                self.state = ArgState::Parsed;
                Ok(())
            }
            _ => {
                self.state = ArgState::Invalid;
                Err(ArgumentError::invalid(
                    self.key,
                    format!("expects a positive integer, got '{token}'"),
                ))
            }
        }
    }

    fn validate(&self) -> Result<(), ArgumentError> {
        if self.required && self.state == ArgState::Unset {
            Err(ArgumentError::MissingRequired(self.key.to_string()))
        } else {
            Ok(())
        }
    }

    fn display_value(&self) -> String {
        self.value.to_string()
    }
}

/// A byte count: a decimal non-negative integer with an optional
/// case-insensitive binary suffix (K=2^10, M=2^20, G=2^30).
pub struct ByteSizeArgument {
    key: &'static str,
    help: &'static str,
    value: u64,
    state: ArgState,
}

impl ByteSizeArgument {
    pub fn new(key: &'static str, help: &'static str, default: u64) -> Self {
        Self {
            key,
            help,
            value: default,
            state: ArgState::Unset,
        }
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    fn parse_token(&self, token: &str) -> Option<u64> {
        let token = token.trim();
        let (digits, multiplier) = match token.chars().last() {
            Some('k') | Some('K') => (&token[..token.len() - 1], KILOBYTE),
            Some('m') | Some('M') => (&token[..token.len() - 1], MEGABYTE),
            Some('g') | Some('G') => (&token[..token.len() - 1], GIGABYTE),
            _ => (token, 1),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u64>().ok()?.checked_mul(multiplier)
    }
}

impl Argument for ByteSizeArgument {
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
        match self.parse_token(token) {
            Some(value) => {
                self.value = value;
                self.state = ArgState::Parsed;
                Ok(())
            }
            None => {
                self.state = ArgState::Invalid;
                Err(ArgumentError::invalid(
                    self.key,
                    format!("expects a byte size such as 4096, 64K, 1M or 2G, got '{token}'"),
                ))
            }
        }
    }

    fn validate(&self) -> Result<(), ArgumentError> {
        Ok(())
    }

    fn display_value(&self) -> String {
        format_byte_size(self.value)
    }
}

/// A free-form string argument.
pub struct StringArgument {
    key: &'static str,
    help: &'static str,
    value: String,
    state: ArgState,
}

impl StringArgument {
    pub fn new(key: &'static str, help: &'static str, default: &str) -> Self {
        Self {
            key,
            help,
            value: default.to_string(),
            state: ArgState::Unset,
        }
    }

    pub fn get(&self) -> &str {
        &self.value
    }
}

impl Argument for StringArgument {
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
        self.value = token.to_string();
        self.state = ArgState::Parsed;
        Ok(())
    }

    fn validate(&self) -> Result<(), ArgumentError> {
        Ok(())
    }

    fn display_value(&self) -> String {
        self.value.clone()
    }
}

/// A fixed-arity tuple of unsigned integers, written `a,b,c`.
/// Used for 3D origins and regions.
pub struct UintTupleArgument<const N: usize> {
    key: &'static str,
    help: &'static str,
    value: [u64; N],
    state: ArgState,
}

pub type ThreeComponentUintArgument = UintTupleArgument<3>;

impl<const N: usize> UintTupleArgument<N> {
    pub fn new(key: &'static str, help: &'static str, default: [u64; N]) -> Self {
        Self {
            key,
            help,
            value: default,
            state: ArgState::Unset,
        }
    }

    pub fn get(&self) -> [u64; N] {
        self.value
    }
}

impl<const N: usize> Argument for UintTupleArgument<N> {
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
        let parts: Vec<&str> = token.split(',').collect();
        if parts.len() == N {
            let mut value = [0u64; N];
            let mut ok = true;
            for (slot, part) in value.iter_mut().zip(&parts) {
                match part.trim().parse::<u64>() {
                    Ok(v) => *slot = v,
                    Err(_) => {
                        ok = false;
                        break;
                    }
                }
            }
            if ok {
                self.value = value;
                self.state = ArgState::Parsed;
                return Ok(());
            }
        }
        self.state = ArgState::Invalid;
        Err(ArgumentError::invalid(
            self.key,
            format!("expects {N} comma-separated unsigned integers, got '{token}'"),
        ))
    }

    fn validate(&self) -> Result<(), ArgumentError> {
        Ok(())
    }

    fn display_value(&self) -> String {
        self.value
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}
