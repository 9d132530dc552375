use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use crate::util;

/// Name of the implicit section holding every line that appears before the first header.
pub const GLOBAL: &str = "global";

/// A named, ordered group of options.
///
/// Sections are created through [`Ini::add_section`](crate::Ini::add_section) and shared as
/// `Arc<Section>`; every method takes `&self` and synchronizes on a lock private to the section.
#[derive(Debug)]
pub struct Section {
    name: String,
    options: RwLock<Options>,
}

/// Option values plus the order in which names were first added.
///
/// `values` may hold names that `order` does not: [`Section::set_value_for`] stores a value
/// without registering the name for rendering.
#[derive(Debug, Default)]
struct Options {
    values: HashMap<String, String>,
    order: Vec<String>,
}

impl Section {
    #[must_use]
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            options: RwLock::new(Options::default()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the section is the implicit `global` block.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.name == GLOBAL
    }

    #[must_use]
    pub fn exists(&self, option: &str) -> bool {
        util::read(&self.options).values.contains_key(option)
    }

    /// Returns the value of `option`, or an empty string when it is not set.
    #[must_use]
    pub fn value_of(&self, option: &str) -> String {
        util::read(&self.options)
            .values
            .get(option)
            .cloned()
            .unwrap_or_default()
    }

    /// Overwrites the value of `option` and returns the old value.
    ///
    /// The option order is left untouched: a name that was never [`add`](Self::add)ed gets a
    /// value but is not listed by [`option_names`](Self::option_names) nor rendered.
    pub fn set_value_for(&self, option: &str, value: &str) -> String {
        util::write(&self.options)
            .values
            .insert(option.to_owned(), value.to_owned())
            .unwrap_or_default()
    }

    /// Adds an option, or overwrites it in place if it already exists. Returns the old value.
    ///
    /// Only a name without any stored value is appended to the option order, so a name that got
    /// its value from [`set_value_for`](Self::set_value_for) stays unlisted.
    pub fn add(&self, option: &str, value: &str) -> String {
        let mut options = util::write(&self.options);
        options.insert(option, value)
    }

    /// Removes `option` and returns its value.
    pub fn delete(&self, option: &str) -> String {
        let mut options = util::write(&self.options);
        options.order.retain(|name| name != option);
        options.values.remove(option).unwrap_or_default()
    }

    /// Option names in the order they were first added.
    #[must_use]
    pub fn option_names(&self) -> Vec<String> {
        util::read(&self.options).order.clone()
    }

    /// A copy of every stored value, including ones set through
    /// [`set_value_for`](Self::set_value_for) that are not part of the option order.
    #[must_use]
    pub fn options(&self) -> HashMap<String, String> {
        util::read(&self.options).values.clone()
    }

    /// Parses a raw `key=value`, `key:value` or bare `key` line and adds it.
    ///
    /// The first `=` wins over any `:`. Entries whose value is empty (bare keys, comment lines
    /// without a delimiter) are dropped.
    pub fn add_option(&self, line: &str) {
        let (key, value) = parse_option(line);
        if !value.is_empty() {
            _ = self.add(key, value);
        }
    }
}

impl Options {
    /// Set `value`, registering `option` in the order list only if it held no value before.
    fn insert(&mut self, option: &str, value: &str) -> String {
        let old = self.values.insert(option.to_owned(), value.to_owned());
        if old.is_none() {
            self.order.push(option.to_owned());
        }
        old.unwrap_or_default()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_global() {
            writeln!(f, "[{}]", self.name)?;
        }

        let options = util::read(&self.options);
        for name in &options.order {
            match options.values.get(name).map(String::as_str) {
                Some(value) if !value.is_empty() => writeln!(f, "{name} = {value}")?,
                _ => writeln!(f, "{name}")?,
            }
        }

        Ok(())
    }
}

fn parse_option(line: &str) -> (&str, &str) {
    let delimiter = line.find('=').or_else(|| line.find(':'));

    match delimiter {
        Some(i) => (line[..i].trim_matches(' '), line[i + 1..].trim_matches(' ')),
        None => (line.trim_matches(' '), ""),
    }
}
