//! Run configuration shared by the reader, the writer and the CLI

use crate::error::{Error, Result};

/// Delimiter used when none is given
pub const DEFAULT_DELIMITER: char = ' ';

/// Settings for reading and writing a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    delimiter: u8,
}

impl Config {
    /// Create a config with the given delimiter, rejecting ones the writer cannot escape
    pub fn new(delimiter: char) -> Result<Self> {
        if !delimiter.is_ascii() || matches!(delimiter, '"' | '\\' | '\n' | '\r') {
            return Err(Error::InvalidDelimiter(delimiter.to_string()));
        }
        Ok(Self {
            delimiter: delimiter as u8,
        })
    }

    /// Parse a delimiter given as a command-line string
    pub fn from_arg(arg: &str) -> Result<Self> {
        let mut chars = arg.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c),
            _ => Err(Error::InvalidDelimiter(arg.to_string())),
        }
    }

    /// The delimiter as a char
    pub fn delimiter_char(&self) -> char {
        self.delimiter as char
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_space() {
        assert_eq!(Config::default().delimiter_char(), ' ');
    }

    #[test]
    fn test_valid_delimiters() {
        assert_eq!(Config::new(',').unwrap().delimiter_char(), ',');
        assert_eq!(Config::from_arg(":").unwrap().delimiter_char(), ':');
        assert_eq!(Config::from_arg("\t").unwrap().delimiter_char(), '\t');
    }

    #[test]
    fn test_invalid_delimiters() {
        assert!(matches!(Config::new('"'), Err(Error::InvalidDelimiter(_))));
        assert!(matches!(Config::new('\\'), Err(Error::InvalidDelimiter(_))));
        assert!(matches!(Config::new('é'), Err(Error::InvalidDelimiter(_))));
        assert!(matches!(Config::from_arg(""), Err(Error::InvalidDelimiter(_))));
        assert!(matches!(Config::from_arg(",;"), Err(Error::InvalidDelimiter(_))));
    }
}
