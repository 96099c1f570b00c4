//! Numbered string registers and the captured selection

use crate::selection::Region;
use std::fmt;

/// Number of registers, `_0` to `_9`
pub const REGISTER_COUNT: usize = 10;

/// Index of one register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register(u8);

impl Register {
    pub fn new(index: u8) -> Option<Self> {
        (usize::from(index) < REGISTER_COUNT).then_some(Self(index))
    }

    /// Register named by an ASCII digit
    pub fn from_digit(c: char) -> Option<Self> {
        c.to_digit(10).and_then(|d| Self::new(d as u8))
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_{}", self.0)
    }
}

/// Registers plus the selection stored by `[set]`
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    registers: [String; REGISTER_COUNT],
    active: Option<Region>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content of a register, empty until written
    pub fn get(&self, register: Register) -> &str {
        &self.registers[register.index()]
    }

    pub fn set(&mut self, register: Register, value: &str) {
        let slot = &mut self.registers[register.index()];
        slot.clear();
        slot.push_str(value);
    }

    /// Add one to the integer a register starts with
    ///
    /// A register that does not start with an integer counts as 0.
    pub fn increment(&mut self, register: Register) -> &str {
        let next = leading_integer(self.get(register)).saturating_add(1);
        self.set(register, &next.to_string());
        self.get(register)
    }

    /// Remember a selection for later `[_]` references
    pub fn capture(&mut self, region: Region) {
        self.active = Some(region);
    }

    pub fn active_selection(&self) -> Option<Region> {
        self.active
    }
}

/// Parse the integer at the start of `text`, 0 if there is none
fn leading_integer(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));
    if negative {
        -value
    } else {
        value
    }
}
