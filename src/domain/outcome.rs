//! Operation outcomes
//!
//! Every repository operation answers with one tag out of a closed set:
//!
//! | Tag          | Payload | Meaning                                  |
//! |--------------|---------|------------------------------------------|
//! | `ok`         | yes     | succeeded, returns current state         |
//! | `created`    | yes     | insert succeeded, returns inserted value |
//! | `no-content` | no      | deletion succeeded                       |
//! | `not-found`  | no      | target document does not exist           |
//! | `conflict`   | no      | insert collided with an existing id      |
//!
//! [`Outcome`] holds the whole set. Operations return the narrowest enum
//! covering only the tags they can actually produce ([`Lookup`],
//! [`Insertion`], [`Deletion`]), so a `match` never needs an unreachable arm.
//! Each narrow enum converts into [`Outcome`] without loss.
//!
//! # Example
//!
//! ```rust
//! use cosmos_repo::domain::{Lookup, Outcome, OutcomeKind};
//!
//! let found: Lookup<&str> = Lookup::Ok("payload");
//! match found {
//!     Lookup::Ok(value) => assert_eq!(value, "payload"),
//!     Lookup::NotFound => unreachable!(),
//! }
//!
//! let outcome: Outcome<&str> = Lookup::NotFound.into();
//! assert_eq!(outcome.kind(), OutcomeKind::NotFound);
//! assert_eq!(outcome.kind().to_string(), "not-found");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of an [`Outcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeKind {
    Ok,
    Created,
    NoContent,
    NotFound,
    Conflict,
}

impl OutcomeKind {
    /// The tag as written in logs and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Ok => "ok",
            OutcomeKind::Created => "created",
            OutcomeKind::NoContent => "no-content",
            OutcomeKind::NotFound => "not-found",
            OutcomeKind::Conflict => "conflict",
        }
    }

    /// Whether the tag describes a completed write or read
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            OutcomeKind::Ok | OutcomeKind::Created | OutcomeKind::NoContent
        )
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any repository outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Succeeded, carries the current state
    Ok(T),
    /// Insert succeeded, carries the inserted value
    Created(T),
    /// Delete succeeded
    NoContent,
    /// The addressed document does not exist
    NotFound,
    /// The document identity is already taken
    Conflict,
}

impl<T> Outcome<T> {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Ok(_) => OutcomeKind::Ok,
            Outcome::Created(_) => OutcomeKind::Created,
            Outcome::NoContent => OutcomeKind::NoContent,
            Outcome::NotFound => OutcomeKind::NotFound,
            Outcome::Conflict => OutcomeKind::Conflict,
        }
    }

    /// Borrow the payload of a value-bearing outcome
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Ok(value) | Outcome::Created(value) => Some(value),
            Outcome::NoContent | Outcome::NotFound | Outcome::Conflict => None,
        }
    }

    /// Take the payload of a value-bearing outcome
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Ok(value) | Outcome::Created(value) => Some(value),
            Outcome::NoContent | Outcome::NotFound | Outcome::Conflict => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Created(value) => Outcome::Created(f(value)),
            Outcome::NoContent => Outcome::NoContent,
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Conflict => Outcome::Conflict,
        }
    }
}

/// Outcome of `get`, `update` and stored procedure execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Ok(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Lookup::Ok(_) => OutcomeKind::Ok,
            Lookup::NotFound => OutcomeKind::NotFound,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound)
    }

    /// Collapse into an `Option`, dropping the tag
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Ok(value) => Some(value),
            Lookup::NotFound => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Ok(value) => Lookup::Ok(f(value)),
            Lookup::NotFound => Lookup::NotFound,
        }
    }
}

/// Outcome of `insert`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion<T> {
    Created(T),
    Conflict,
}

impl<T> Insertion<T> {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Insertion::Created(_) => OutcomeKind::Created,
            Insertion::Conflict => OutcomeKind::Conflict,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Insertion::Conflict)
    }
}

/// Outcome of `delete`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    NoContent,
    NotFound,
}

impl Deletion {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Deletion::NoContent => OutcomeKind::NoContent,
            Deletion::NotFound => OutcomeKind::NotFound,
        }
    }
}

impl<T> From<Lookup<T>> for Outcome<T> {
    fn from(lookup: Lookup<T>) -> Self {
        match lookup {
            Lookup::Ok(value) => Outcome::Ok(value),
            Lookup::NotFound => Outcome::NotFound,
        }
    }
}

impl<T> From<Insertion<T>> for Outcome<T> {
    fn from(insertion: Insertion<T>) -> Self {
        match insertion {
            Insertion::Created(value) => Outcome::Created(value),
            Insertion::Conflict => Outcome::Conflict,
        }
    }
}

impl<T> From<Deletion> for Outcome<T> {
    fn from(deletion: Deletion) -> Self {
        match deletion {
            Deletion::NoContent => Outcome::NoContent,
            Deletion::NotFound => Outcome::NotFound,
        }
    }
}
