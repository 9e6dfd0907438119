//! Core types for the Truth or Dare Bot API.
//!
//! This module contains the domain vocabulary shared by the client and its
//! consumers:
//! - [`Rating`] - Content rating selector for prompt requests
//! - [`PromptKind`] - The three prompt families served by the API
//! - [`Prompt`] - A prompt payload as returned by the server

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string is not a recognized content rating.
#[derive(Debug, Error)]
#[error("Invalid rating '{0}', expected one of: pg, pg13, r")]
pub struct InvalidRating(pub String);

/// Content rating accepted by every prompt endpoint.
///
/// Ratings are validated by construction: the client operations take this
/// enum, so an unrecognized rating can never reach the server. The string
/// boundary ([`FromStr`]) rejects anything else with [`InvalidRating`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Family-friendly prompts (the default).
    #[default]
    Pg,

    /// Teen-appropriate prompts.
    Pg13,

    /// Mature prompts.
    R,
}

impl Rating {
    /// Returns the query-parameter value for this rating.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pg => "pg",
            Self::Pg13 => "pg13",
            Self::R => "r",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = InvalidRating;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pg" => Ok(Self::Pg),
            "pg13" => Ok(Self::Pg13),
            "r" => Ok(Self::R),
            other => Err(InvalidRating(other.to_string())),
        }
    }
}

/// The kind of prompt served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PromptKind {
    /// A truth question.
    Truth,

    /// A dare challenge.
    Dare,

    /// A "would you rather" style prompt.
    Random,
}

impl PromptKind {
    /// Returns the kind as an uppercase wire-format string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Truth => "TRUTH",
            Self::Dare => "DARE",
            Self::Random => "RANDOM",
        }
    }

    /// Returns the resource path serving this kind of prompt.
    pub(crate) fn path(&self) -> &'static str {
        match self {
            Self::Truth => "truth",
            Self::Dare => "dare",
            Self::Random => "wyr",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single prompt as returned by the API.
///
/// The payload is handed to callers exactly as deserialized, with no
/// transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Server-assigned prompt identifier.
    pub id: String,

    /// Which prompt family produced this entry.
    #[serde(rename = "type")]
    pub kind: PromptKind,

    /// Content rating the prompt was served under.
    pub rating: Rating,

    /// The prompt text to present to players.
    pub question: String,
}
