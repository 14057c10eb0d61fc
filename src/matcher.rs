//! Trigger detection at the cursor.

use crate::config::{ConfigError, ConfigResult};
use crate::surface::{Cursor, SelectionRange, Surface};
use regex::{NoExpand, Regex};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// The pattern deciding which text before the cursor is completable.
///
/// The first capture group is the query text handed to the host.
#[derive(Debug, Clone)]
pub struct Trigger {
    re: Regex,
}

impl Trigger {
    pub fn new(pattern: &str) -> ConfigResult<Self> {
        let re = Regex::new(pattern)?;
        if re.captures_len() < 2 {
            return Err(ConfigError::PatternWithoutCapture {
                pattern: pattern.to_string(),
            });
        }
        Ok(Self { re })
    }

    pub fn as_str(&self) -> &str {
        self.re.as_str()
    }

    /// First match of the pattern in `head`.
    pub fn find(&self, head: &str) -> Option<MatchResult> {
        let caps = self.re.captures(head)?;
        let full = caps.get(0)?;
        let groups = caps
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str().to_string()))
            .collect();
        Some(MatchResult {
            full: full.as_str().to_string(),
            groups,
            span: full.range(),
        })
    }

    pub fn span(&self, head: &str) -> Option<Range<usize>> {
        self.re.find(head).map(|m| m.range())
    }

    /// Replaces the first match in `head` with `replacement`, taken literally.
    /// Returns `None` when the pattern does not match.
    pub fn replace_first(&self, head: &str, replacement: &str) -> Option<String> {
        self.re.is_match(head).then(|| {
            self.re
                .replacen(head, 1, NoExpand(replacement))
                .into_owned()
        })
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.re.as_str())
    }
}

/// One successful application of the trigger to the text before the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// The whole matched text.
    pub full: String,
    /// Capture groups in order; `None` for groups that did not participate.
    pub groups: Vec<Option<String>>,
    /// Byte range of the match within the head text.
    pub span: Range<usize>,
}

impl MatchResult {
    /// The query text: the first capture group, or empty.
    pub fn query(&self) -> &str {
        self.group(1).unwrap_or("")
    }

    /// Capture group `index`, 1-based like regex groups.
    pub fn group(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.groups.get(i))
            .and_then(|g| g.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleReason {
    NoCursor,
    RangeSelected,
    NoMatch,
}

impl fmt::Display for IdleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdleReason::NoCursor => write!(f, "no cursor"),
            IdleReason::RangeSelected => write!(f, "range selected"),
            IdleReason::NoMatch => write!(f, "no match"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActiveMatch<A> {
    pub result: MatchResult,
    /// Cursor range at match time.
    pub cursor: SelectionRange,
    pub anchor: A,
}

#[derive(Debug, Clone)]
pub enum MatchState<A> {
    Idle,
    Matched(ActiveMatch<A>),
}

impl<A> Default for MatchState<A> {
    fn default() -> Self {
        MatchState::Idle
    }
}

impl<A> MatchState<A> {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchState::Matched(_))
    }

    pub fn result(&self) -> Option<&MatchResult> {
        match self {
            MatchState::Matched(active) => Some(&active.result),
            MatchState::Idle => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Evaluation<A> {
    Idle(IdleReason),
    Matched(ActiveMatch<A>),
}

/// Decides from scratch whether the surface has a completable match at
/// its cursor. Nothing is carried over from earlier evaluations.
pub fn evaluate<S: Surface>(surface: &S, trigger: &Trigger) -> Evaluation<S::Anchor> {
    let offset = match surface.cursor() {
        Cursor::Missing => return Evaluation::Idle(IdleReason::NoCursor),
        Cursor::Range(_) => return Evaluation::Idle(IdleReason::RangeSelected),
        Cursor::Collapsed(offset) => offset,
    };

    let head = surface.text_before();
    let Some(result) = trigger.find(&head) else {
        return Evaluation::Idle(IdleReason::NoMatch);
    };
    let Some(anchor) = surface.snapshot() else {
        return Evaluation::Idle(IdleReason::NoCursor);
    };

    Evaluation::Matched(ActiveMatch {
        result,
        cursor: SelectionRange::caret(offset),
        anchor,
    })
}
