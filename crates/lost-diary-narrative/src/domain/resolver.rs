//! Text resolution: turns a segment into displayable content.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use lost_diary_core::error::StoryError;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use super::dates::DerivedDates;
use super::device::DeviceInfo;
use super::responses::ResponseMap;
use super::segment::{Segment, SegmentContent};

/// Text shown while the session's derived dates are not yet available.
pub const LOADING_PLACEHOLDER: &str = "Loading...";

/// Segment ids containing this marker are rendered as system logs.
pub const SYSTEM_MARKER: &str = "meta_";

/// Segment ids rendered as system logs without carrying the marker.
pub const SYSTEM_SEGMENT_IDS: [&str; 6] = [
    "consumer_reflection1",
    "ethical_consumer_system",
    "consumer_intro",
    "connection_lost",
    "connection_attempt",
    "consumer_responsibility",
];

static DIARY_STAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+ \d+, \d{4}:").expect("diary stamp pattern is valid"));

/// Failure raised by a content function.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    /// The content reads a response the reader has not given.
    #[error("missing response: {0}")]
    MissingResponse(String),
}

/// Everything a content function may read.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Answers given so far.
    pub responses: &'a ResponseMap,
    /// Reader's device.
    pub device: &'a DeviceInfo,
    /// Session dates, absent until derived.
    pub dates: Option<&'a DerivedDates>,
    /// Wall-clock instant of the resolution.
    pub now: DateTime<Utc>,
}

impl ResolveContext<'_> {
    /// The answer stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::MissingResponse` if the reader has not answered.
    pub fn response(&self, key: &str) -> Result<&str, ContentError> {
        self.responses
            .get(key)
            .ok_or_else(|| ContentError::MissingResponse(key.to_owned()))
    }

    /// The answer stored under `key`, or `fallback` if the reader never
    /// answered. Used for text that must render in seeded sessions.
    #[must_use]
    pub fn response_or<'b>(&'b self, key: &str, fallback: &'b str) -> &'b str {
        self.responses.get(key).unwrap_or(fallback)
    }

    /// The device class, or `fallback`.
    #[must_use]
    pub fn device_type_or<'b>(&'b self, fallback: &'b str) -> &'b str {
        self.device.device_type_or(fallback)
    }

    /// Runs `render` with the session dates, or yields the loading
    /// placeholder when they are not derived yet.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `render`.
    pub fn with_dates<F>(&self, render: F) -> Result<String, ContentError>
    where
        F: FnOnce(&DerivedDates) -> Result<String, ContentError>,
    {
        match self.dates {
            Some(dates) => render(dates),
            None => Ok(LOADING_PLACEHOLDER.to_owned()),
        }
    }
}

/// Presentation hints derived from a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContentStyle {
    /// Rendered in the system-log style.
    pub system_log: bool,
    /// Carries bullet items.
    pub has_bullets: bool,
    /// Contains at least one diary date-stamp line.
    pub has_diary_stamp: bool,
}

/// Kind of a single line of resolved text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineKind {
    /// A diary date stamp such as `March 12, 2025:`.
    DiaryStamp,
    /// Anything else.
    Plain,
}

/// A segment's content, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedContent {
    /// The segment this was resolved from.
    pub segment_id: String,
    /// Main text.
    pub text: String,
    /// Bullet items, empty unless the segment carries a list.
    pub bullet_items: Vec<String>,
    /// Line shown after the list.
    pub footer: Option<String>,
    /// Presentation hints.
    pub style: ContentStyle,
}

impl ResolvedContent {
    /// Splits the text into lines tagged by kind.
    pub fn lines(&self) -> impl Iterator<Item = (LineKind, &str)> {
        self.text.lines().map(|line| {
            let kind = if is_diary_stamp(line) {
                LineKind::DiaryStamp
            } else {
                LineKind::Plain
            };
            (kind, line)
        })
    }
}

/// Returns `true` if `line` contains a diary date stamp.
#[must_use]
pub fn is_diary_stamp(line: &str) -> bool {
    DIARY_STAMP.is_match(line)
}

/// Returns `true` if segments with this id use the system-log style.
#[must_use]
pub fn is_system_segment(segment_id: &str) -> bool {
    segment_id.contains(SYSTEM_MARKER) || SYSTEM_SEGMENT_IDS.contains(&segment_id)
}

/// Resolves `segment` against `context`.
///
/// Literal text is returned verbatim. Computed content is evaluated; it is
/// never cached, so wall-clock dependent segments stay current.
///
/// # Errors
///
/// Returns `StoryError::Content` if a content function fails.
pub fn resolve(
    segment: &Segment,
    context: &ResolveContext<'_>,
) -> Result<ResolvedContent, StoryError> {
    let (text, bullet_items, footer) = match &segment.content {
        SegmentContent::Literal(text) => (text.clone(), Vec::new(), None),
        SegmentContent::Computed(render) => {
            let text = render(context).map_err(|e| StoryError::Content {
                segment_id: segment.id.clone(),
                message: e.to_string(),
            })?;
            (text, Vec::new(), None)
        }
        SegmentContent::List {
            text,
            items,
            footer,
        } => (text.clone(), items.clone(), footer.clone()),
    };

    let style = ContentStyle {
        system_log: is_system_segment(&segment.id),
        has_bullets: !bullet_items.is_empty(),
        has_diary_stamp: text.lines().any(is_diary_stamp),
    };

    Ok(ResolvedContent {
        segment_id: segment.id.clone(),
        text,
        bullet_items,
        footer,
        style,
    })
}
