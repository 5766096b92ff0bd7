//! Input handling in front of the tree
//!
//! Keys and commands arrive as text. Anything that is not a well-formed
//! integer key is rejected here, before it can reach the tree.
//!
//! Script format, one command per line:
//!
//! ```text
//! # build the LR case
//! insert 30 10 20
//! search 20
//! delete 30
//! find 10
//! print
//! ```

use std::fmt;

use thiserror::Error;

/// Key type accepted by the command-line front end.
pub type Key = i64;

/// Error type returned while parsing keys and scripts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Token is not an integer.
    #[error("line {line}: invalid key '{token}'")]
    InvalidKey {
        /// 1-based line number (0 for keys outside a script).
        line: usize,
        /// Offending token.
        token: String,
    },

    /// First word of a line is not a known command.
    #[error("line {line}: unknown command '{word}'")]
    UnknownCommand {
        /// 1-based line number.
        line: usize,
        /// Offending word.
        word: String,
    },

    /// Command that needs keys was given none.
    #[error("line {line}: '{command}' needs at least one key")]
    MissingKey {
        /// 1-based line number.
        line: usize,
        /// Command name.
        command: &'static str,
    },

    /// `print` takes no arguments.
    #[error("line {line}: 'print' takes no arguments")]
    UnexpectedArgument {
        /// 1-based line number.
        line: usize,
    },
}

/// One script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert each key in order.
    Insert(Vec<Key>),
    /// Delete each key in order.
    Delete(Vec<Key>),
    /// Traced search for each key.
    Search(Vec<Key>),
    /// Plain lookup for each key; produces no steps.
    Find(Vec<Key>),
    /// Print the current tree.
    Print,
}

impl Command {
    /// Command name as written in scripts.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Insert(_) => "insert",
            Command::Delete(_) => "delete",
            Command::Search(_) => "search",
            Command::Find(_) => "find",
            Command::Print => "print",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if let Command::Insert(keys) | Command::Delete(keys) | Command::Search(keys) | Command::Find(keys) =
            self
        {
            for key in keys {
                write!(f, " {key}")?;
            }
        }
        Ok(())
    }
}

/// Parse a single key token (surrounding whitespace is ignored).
pub fn parse_key(token: &str) -> Result<Key, InputError> {
    parse_key_on_line(token, 0)
}

fn parse_key_on_line(token: &str, line: usize) -> Result<Key, InputError> {
    let trimmed = token.trim();
    trimmed.parse::<Key>().map_err(|_| InputError::InvalidKey {
        line,
        token: trimmed.to_string(),
    })
}

/// Parse every token of `tokens` as a key.
pub fn parse_keys<'a, I>(tokens: I) -> Result<Vec<Key>, InputError>
where
    I: IntoIterator<Item = &'a str>,
{
    tokens.into_iter().map(parse_key).collect()
}

/// Parse a command script. Blank lines and `#` comments are skipped.
pub fn parse_script(source: &str) -> Result<Vec<Command>, InputError> {
    let mut commands = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let mut words = content.split_whitespace();
        let Some(word) = words.next() else {
            continue;
        };
        let name = match word.to_ascii_lowercase().as_str() {
            "insert" => "insert",
            "delete" => "delete",
            "search" => "search",
            "find" => "find",
            "print" => "print",
            _ => {
                return Err(InputError::UnknownCommand {
                    line,
                    word: word.to_string(),
                })
            }
        };
        let keys = words
            .map(|token| parse_key_on_line(token, line))
            .collect::<Result<Vec<_>, _>>()?;

        let command = match name {
            "print" if keys.is_empty() => Command::Print,
            "print" => return Err(InputError::UnexpectedArgument { line }),
            "insert" => Command::Insert(require_keys(keys, line, name)?),
            "delete" => Command::Delete(require_keys(keys, line, name)?),
            "search" => Command::Search(require_keys(keys, line, name)?),
            _ => Command::Find(require_keys(keys, line, name)?),
        };
        commands.push(command);
    }
    Ok(commands)
}

fn require_keys(keys: Vec<Key>, line: usize, command: &'static str) -> Result<Vec<Key>, InputError> {
    if keys.is_empty() {
        Err(InputError::MissingKey { line, command })
    } else {
        Ok(keys)
    }
}
