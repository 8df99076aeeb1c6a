//! Command argument parsing
//!
//! Options are declared per command with short and long handles
//! (`-e`, `--emojis`). Option values follow the handle as the next word or
//! after `=` on long handles. Everything else is positional, in order.

use std::collections::HashMap;

/// One declared option
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    /// First handle is the canonical one, e.g. `["-e", "--emojis"]`
    pub handles: &'static [&'static str],
    pub description: &'static str,
    pub required: bool,
    pub requires_arg: bool,
}

impl OptionSpec {
    /// Canonical name: the first handle without dashes
    pub fn name(&self) -> &'static str {
        self.handles
            .first()
            .map_or("", |handle| handle.trim_start_matches('-'))
    }

    fn matches(&self, word: &str) -> bool {
        self.handles.contains(&word)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgsError {
    #[error("Missing required argument: {0}")]
    MissingRequired(&'static str),

    #[error("Not enough arguments following: {0}")]
    MissingValue(&'static str),
}

/// Parsed arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    values: HashMap<&'static str, String>,
    positional: Vec<String>,
}

impl ParsedArgs {
    /// Value of an option by canonical name; a repeated option keeps its last value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }
}

/// Parse `words` against `specs`
pub fn parse(specs: &[OptionSpec], words: &[String]) -> Result<ParsedArgs, ArgsError> {
    let mut parsed = ParsedArgs::default();
    let is_option = |word: &str| specs.iter().any(|spec| spec.matches(word));

    let mut words = words.iter();
    while let Some(word) = words.next() {
        if let Some((handle, value)) = word.split_once('=').filter(|(h, _)| h.starts_with("--")) {
            if let Some(spec) = specs.iter().find(|spec| spec.matches(handle)) {
                if value.is_empty() && spec.requires_arg {
                    return Err(ArgsError::MissingValue(spec.name()));
                }
                parsed.values.insert(spec.name(), value.to_string());
                continue;
            }
        }

        let Some(spec) = specs.iter().find(|spec| spec.matches(word)) else {
            parsed.positional.push(word.clone());
            continue;
        };

        match words.as_slice().first() {
            Some(next) if !is_option(next) => {
                parsed.values.insert(spec.name(), next.clone());
                words.next();
            }
            _ if spec.requires_arg => return Err(ArgsError::MissingValue(spec.name())),
            _ => {
                parsed.values.insert(spec.name(), String::new());
            }
        }
    }

    if let Some(missing) = specs
        .iter()
        .find(|spec| spec.required && !parsed.values.contains_key(spec.name()))
    {
        return Err(ArgsError::MissingRequired(missing.name()));
    }

    Ok(parsed)
}

/// Split message content into words the way commands see them
///
/// Only spaces separate words; line breaks stay inside the word.
pub fn split_words(content: &str) -> Vec<String> {
    content
        .trim()
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}
