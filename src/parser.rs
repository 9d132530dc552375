use std::io::BufRead;
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::Result;
use crate::section::GLOBAL;
use crate::Ini;

/// Represents an on-going parse over a line-oriented byte stream.
#[derive(Debug)]
pub struct Parser<R> {
    reader: R,
    buffer: Vec<u8>,
    line: usize,
}

impl<R: BufRead> Parser<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(256),
            line: 0,
        }
    }

    /// Consumes the stream and builds the file model.
    ///
    /// Lines before the first header land in the implicit `global` section. Consumes `self`
    /// because the reader is exhausted afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stream`](crate::Error::Stream) on the first read failure; nothing
    /// parsed so far is kept.
    pub fn into_ini(mut self, path: PathBuf) -> Result<Ini> {
        let ini = Ini::new(path);
        let mut active = ini.add_section(GLOBAL);

        while let Some(line) = self.next_line()? {
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') {
                let name = line.trim_matches(|c| matches!(c, ' ' | '[' | ']'));
                trace!(line = self.line, section = name, "section header");
                active = ini.add_section(name);
                continue;
            }

            // Comments are forwarded too; `add_option` drops whatever has no value.
            active.add_option(&line);
        }

        debug!(
            path = %ini.file_path().display(),
            lines = self.line,
            sections = count(&ini),
            "parsed configuration"
        );

        Ok(ini)
    }

    /// Reads the next line without its terminator, decoding invalid UTF-8 lossily.
    fn next_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line += 1;

        let mut bytes = self.buffer.as_slice();
        bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);

        Ok(Some(String::from_utf8_lossy(bytes).into_owned()))
    }
}

fn count(ini: &Ini) -> usize {
    ini.sections("").map_or(0, |sections| sections.len())
}
