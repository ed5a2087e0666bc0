//! Parsers for the free-form listings returned by `list-modules`,
//! `list-sinks` and `list-sources`.
//!
//! A listing is a sequence of records. Each record starts at an `index: N`
//! line (sinks and sources prefix the default entry with `*`) and runs until
//! the next `index:` line or the end of the text. Anything before the first
//! record, such as the welcome banner, is ignored.

use std::sync::LazyLock;

use regex::Regex;

use crate::services::pulse::{
    PulseError, Volume,
    device::{DeviceIndex, ModuleIndex, ModuleInfo, SinkInfo, SourceInfo},
};

#[allow(clippy::expect_used)]
fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("listing patterns are valid")
}

static RECORD_START: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^[ \t*]*index:[ \t]*(\d+)"));
static NAME: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^[ \t]*name:[ \t]*<([^>\n]*)>"));
static ARGUMENT: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^[ \t]*argument:[ \t]*<(.*)>[ \t]*$"));
static VOLUME: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^[ \t]*volume:(.*)$"));
static CHANNEL_RAW: LazyLock<Regex> = LazyLock::new(|| pattern(r"(\d+)[ \t]*/[ \t]*\d+%"));
static MUTED: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^[ \t]*muted:[ \t]*(yes|no)"));
static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| pattern(r#"(?m)^[ \t]*device\.description[ \t]*=[ \t]*"([^"\n]*)""#));

/// One contiguous record of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Raw index text, digits only
    pub index: &'a str,
    /// Record text from its `index:` line up to the next record
    pub body: &'a str,
}

impl Record<'_> {
    /// Parsed index
    ///
    /// # Errors
    /// Returns `Protocol` when the index does not fit in a `u32`
    pub fn index(&self) -> Result<u32, PulseError> {
        self.index
            .parse()
            .map_err(|e| PulseError::Protocol(format!("bad index '{}': {e}", self.index)))
    }

    /// Value of the `name: <...>` line
    pub fn name(&self) -> Option<&str> {
        capture(&NAME, self.body)
    }

    /// Value of the `argument: <...>` line
    pub fn argument(&self) -> Option<&str> {
        capture(&ARGUMENT, self.body)
    }
}

fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Split a listing into records
pub fn records(text: &str) -> Vec<Record<'_>> {
    let starts: Vec<(usize, &str)> = RECORD_START
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let index = caps.get(1)?;
            Some((whole.start(), index.as_str()))
        })
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &(start, index))| {
            let end = starts.get(i + 1).map_or(text.len(), |&(next, _)| next);
            Record {
                index,
                body: &text[start..end],
            }
        })
        .collect()
}

/// Parse a `list-modules` reply
///
/// # Errors
/// Returns `Protocol` for records with an unparseable index or no name
pub fn parse_modules(text: &str) -> Result<Vec<ModuleInfo>, PulseError> {
    records(text)
        .into_iter()
        .map(|record| {
            let index = record.index()?;
            let name = record.name().ok_or_else(|| {
                PulseError::Protocol(format!("module {index} has no name"))
            })?;
            Ok(ModuleInfo {
                index: ModuleIndex(index),
                name: name.to_string(),
                argument: record.argument().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Parse a `list-sinks` reply
///
/// # Errors
/// Returns `Protocol` for records with an unparseable index, no name, or
/// unparseable volume values
pub fn parse_sinks(text: &str) -> Result<Vec<SinkInfo>, PulseError> {
    records(text)
        .into_iter()
        .map(|record| {
            let index = record.index()?;
            let name = record
                .name()
                .ok_or_else(|| PulseError::Protocol(format!("sink {index} has no name")))?;

            Ok(SinkInfo {
                index: DeviceIndex(index),
                name: name.to_string(),
                description: capture(&DESCRIPTION, record.body)
                    .unwrap_or(name)
                    .to_string(),
                volume: parse_volume(record.body)?,
                muted: capture(&MUTED, record.body) == Some("yes"),
            })
        })
        .collect()
}

/// Parse a `list-sources` reply
///
/// # Errors
/// Returns `Protocol` for records with an unparseable index or no name
pub fn parse_sources(text: &str) -> Result<Vec<SourceInfo>, PulseError> {
    records(text)
        .into_iter()
        .map(|record| {
            let index = record.index()?;
            let name = record
                .name()
                .ok_or_else(|| PulseError::Protocol(format!("source {index} has no name")))?;

            Ok(SourceInfo {
                index: DeviceIndex(index),
                name: name.to_string(),
                description: capture(&DESCRIPTION, record.body)
                    .unwrap_or(name)
                    .to_string(),
            })
        })
        .collect()
}

fn parse_volume(body: &str) -> Result<Volume, PulseError> {
    let Some(line) = capture(&VOLUME, body) else {
        return Ok(Volume::default());
    };

    let raw = CHANNEL_RAW
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            m.as_str()
                .parse::<u32>()
                .map_err(|e| PulseError::Protocol(format!("bad volume '{}': {e}", m.as_str())))
        })
        .collect::<Result<Vec<u32>, PulseError>>()?;

    if raw.is_empty() {
        return Ok(Volume::default());
    }
    Ok(Volume::from_raw(&raw))
}
