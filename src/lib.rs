#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

//! In-memory model of an INI-style configuration file.
//!
//! A file is parsed into an [`Ini`], which keeps every `[section]` block in the order it first
//! appeared. Repeated headers produce separate [`Section`] instances under the same name. Both
//! levels can be queried and mutated concurrently and serialized back to text with `Display`.

mod error;
mod parser;
mod save;
mod section;
mod util;

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

pub use error::{Error, Result};
pub use parser::Parser;
pub use section::{GLOBAL, Section};
pub use util::clean_path;

/// Section instances keyed by name, iterated in first-appearance order.
type Registry = IndexMap<String, Vec<Arc<Section>>>;

#[derive(Debug)]
pub struct Ini {
    path: PathBuf,
    sections: RwLock<Registry>,
}

impl Ini {
    /// Creates an empty model. `path` is only recorded; nothing is read.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sections: RwLock::new(Registry::new()),
        }
    }

    /// Parses the file at `path` (after cleaning it lexically).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened or read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = clean_path(path.as_ref());
        let file = File::open(&path).map_err(|e| Error::io(&path, e))?;

        Parser::new(BufReader::new(file))
            .into_ini(path.clone())
            .map_err(|e| match e {
                Error::Stream(source) => Error::io(&path, source),
                e => e,
            })
    }

    /// Parses an arbitrary line-oriented stream. `path` is only recorded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stream`] on the first read failure.
    pub fn from_reader(path: impl Into<PathBuf>, reader: impl io::BufRead) -> Result<Self> {
        Parser::new(reader).into_ini(path.into())
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.path
    }

    /// Appends a new, empty section instance under `name` and returns it.
    ///
    /// Calling this twice with the same name yields two independent sections; the name keeps
    /// its original position in the section order.
    pub fn add_section(&self, name: &str) -> Arc<Section> {
        let section = Arc::new(Section::new(name.to_owned()));

        util::write(&self.sections)
            .entry(name.to_owned())
            .or_default()
            .push(Arc::clone(&section));

        section
    }

    /// Returns the first section registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no section has that name.
    pub fn section(&self, name: &str) -> Result<Arc<Section>> {
        util::read(&self.sections)
            .get(name)
            .and_then(|instances| instances.first())
            .cloned()
            .ok_or_else(|| Error::not_found(name))
    }

    /// Returns every instance of `name`, or every section in the file when `name` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `name` is non-empty and unknown.
    pub fn sections(&self, name: &str) -> Result<Vec<Arc<Section>>> {
        let sections = util::read(&self.sections);

        if name.is_empty() {
            return Ok(sections.values().flatten().cloned().collect());
        }

        sections
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(name))
    }

    /// Looks up `option` in the first section named `section`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the section does not exist. A missing option is an empty
    /// string, not an error.
    pub fn string_value(&self, section: &str, option: &str) -> Result<String> {
        Ok(self.section(section)?.value_of(option))
    }

    /// Returns every section whose name matches `pattern`, in section order.
    ///
    /// The pattern is unanchored: `db` matches `mydb-1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if `pattern` is not a valid regular expression.
    pub fn find(&self, pattern: &str) -> Result<Vec<Arc<Section>>> {
        let re = compile(pattern)?;
        let sections = util::read(&self.sections);

        Ok(sections
            .iter()
            .filter(|(name, _)| re.is_match(name))
            .flat_map(|(_, instances)| instances.iter().cloned())
            .collect())
    }

    /// Removes every section whose name matches `pattern` and returns the removed sections.
    ///
    /// Matching and removal happen under one write lock. Remaining sections keep their order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if `pattern` is not a valid regular expression; nothing
    /// is removed in that case.
    pub fn delete(&self, pattern: &str) -> Result<Vec<Arc<Section>>> {
        let re = compile(pattern)?;
        let mut sections = util::write(&self.sections);
        let mut removed = Vec::new();

        sections.retain(|name, instances| {
            if re.is_match(name) {
                removed.append(instances);
                false
            } else {
                true
            }
        });

        debug!(pattern, removed = removed.len(), "deleted sections");
        Ok(removed)
    }

    /// Writes every instance of `name` to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `name` is non-empty and unknown, or [`Error::Stream`] if
    /// writing fails.
    pub fn write_section(&self, name: &str, mut writer: impl Write) -> Result<()> {
        for section in self.sections(name)? {
            write!(writer, "{section}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Ini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = util::read(&self.sections);
        for section in sections.values().flatten() {
            write!(f, "{section}")?;
        }
        Ok(())
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })
}
