//! Note entity, identity and input validation.
//!
//! # Responsibility
//! - Define the persisted note record shape.
//! - Provide the epoch-millisecond converter used by storage.
//! - Provide the input rules applied before an add is attempted.
//!
//! # Invariants
//! - `id` and `entry_date` are fixed at construction and never change.
//! - `entry_date` carries millisecond precision so storage round-trips exactly.
//! - Storage never validates; only intent-raising callers do.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

const ENTRY_DATE_DISPLAY_FORMAT: &str = "%a, %-d %b %I:%M %p";

/// Stable primary key of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Field of a note that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Description,
}

impl Display for NoteField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Description => write!(f, "description"),
        }
    }
}

/// Rejection reasons for user-entered note content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    EmptyDescription,
    InvalidCharacters { field: NoteField },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title must not be empty"),
            Self::EmptyDescription => write!(f, "note description must not be empty"),
            Self::InvalidCharacters { field } => {
                write!(f, "note {field} may only contain letters and whitespace")
            }
        }
    }
}

impl Error for NoteValidationError {}

/// A single persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    id: NoteId,
    title: String,
    description: String,
    entry_date: DateTime<Utc>,
}

impl Note {
    /// Creates a note with a generated id and the current time.
    ///
    /// No validation happens here; see [`Note::try_new`].
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: NoteId::new(),
            title: title.into(),
            description: description.into(),
            entry_date: now_millis(),
        }
    }

    /// Creates a note only if both fields pass [`Note::validate`].
    pub fn try_new(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, NoteValidationError> {
        let note = Self::new(title, description);
        note.validate()?;
        Ok(note)
    }

    /// Rebuilds a note from stored parts.
    ///
    /// Used by storage read paths where identity already exists.
    pub fn from_parts(
        id: NoteId,
        title: impl Into<String>,
        description: impl Into<String>,
        entry_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            entry_date,
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn entry_date(&self) -> DateTime<Utc> {
        self.entry_date
    }

    /// Returns a copy with a replaced title; identity and date are kept.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with a replaced description; identity and date are kept.
    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self.clone()
        }
    }

    /// Checks the rules the note screen applies before saving.
    ///
    /// # Errors
    /// - `EmptyTitle` / `EmptyDescription` when a field is blank.
    /// - `InvalidCharacters` when a field holds anything but letters and whitespace.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        if self.description.trim().is_empty() {
            return Err(NoteValidationError::EmptyDescription);
        }
        if !is_accepted_input(&self.title) {
            return Err(NoteValidationError::InvalidCharacters {
                field: NoteField::Title,
            });
        }
        if !is_accepted_input(&self.description) {
            return Err(NoteValidationError::InvalidCharacters {
                field: NoteField::Description,
            });
        }
        Ok(())
    }
}

/// Per-keystroke input filter: letters and whitespace only.
///
/// Empty input is accepted so a field can be cleared.
pub fn is_accepted_input(text: &str) -> bool {
    text.chars().all(|ch| ch.is_alphabetic() || ch.is_whitespace())
}

/// Converts an entry date to the integer stored in `notes.entry_date`.
pub fn entry_date_to_epoch_millis(date: &DateTime<Utc>) -> i64 {
    date.timestamp_millis()
}

/// Converts a stored epoch value back to an entry date.
///
/// Returns `None` when the value is outside the representable range.
pub fn entry_date_from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Renders an entry date the way note rows display it, e.g. `Mon, 3 Jun 09:15 AM`.
pub fn format_entry_date(date: &DateTime<Utc>) -> String {
    date.format(ENTRY_DATE_DISPLAY_FORMAT).to_string()
}

fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    entry_date_from_epoch_millis(now.timestamp_millis()).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_notes_get_distinct_ids() {
        let first = Note::new("Trip", "Lake");
        let second = Note::new("Trip", "Lake");
        assert_ne!(first.id(), second.id());
        assert_ne!(first, second);
    }

    #[test]
    fn entry_date_survives_epoch_conversion() {
        let note = Note::new("Trip", "Lake");
        let millis = entry_date_to_epoch_millis(&note.entry_date());
        assert_eq!(entry_date_from_epoch_millis(millis), Some(note.entry_date()));
    }

    #[test]
    fn entry_date_conversion_rejects_out_of_range_values() {
        assert_eq!(entry_date_from_epoch_millis(i64::MAX), None);
    }

    #[test]
    fn with_title_keeps_identity_and_date() {
        let note = Note::new("Trip", "Lake");
        let renamed = note.with_title("Holiday");
        assert_eq!(renamed.id(), note.id());
        assert_eq!(renamed.entry_date(), note.entry_date());
        assert_eq!(renamed.title(), "Holiday");
        assert_eq!(renamed.description(), "Lake");
    }

    #[test]
    fn try_new_rejects_blank_fields() {
        assert_eq!(
            Note::try_new("  ", "Lake").unwrap_err(),
            NoteValidationError::EmptyTitle
        );
        assert_eq!(
            Note::try_new("Trip", "").unwrap_err(),
            NoteValidationError::EmptyDescription
        );
    }

    #[test]
    fn try_new_rejects_digits_and_punctuation() {
        let err = Note::try_new("Trip 2", "Lake").unwrap_err();
        assert_eq!(
            err,
            NoteValidationError::InvalidCharacters {
                field: NoteField::Title
            }
        );
        let err = Note::try_new("Trip", "Lake!").unwrap_err();
        assert_eq!(
            err,
            NoteValidationError::InvalidCharacters {
                field: NoteField::Description
            }
        );
    }

    #[test]
    fn input_filter_accepts_letters_whitespace_and_empty() {
        assert!(is_accepted_input(""));
        assert!(is_accepted_input("Android Compose"));
        assert!(is_accepted_input("Café\tdu monde"));
        assert!(!is_accepted_input("Keep at it..."));
    }

    #[test]
    fn note_id_parses_its_display_form() {
        let id = NoteId::new();
        let parsed: NoteId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<NoteId>().is_err());
    }

    #[test]
    fn entry_date_format_matches_row_layout() {
        let date = Utc.with_ymd_and_hms(2024, 6, 3, 21, 5, 0).unwrap();
        assert_eq!(format_entry_date(&date), "Mon, 3 Jun 09:05 PM");
    }

    #[test]
    fn json_form_uses_plain_id_and_survives_reload() {
        let note = Note::new("Trip", "Lake");
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["id"], serde_json::json!(note.id().to_string()));
        assert_eq!(value["title"], "Trip");
        assert_eq!(value["description"], "Lake");

        let reloaded: Note = serde_json::from_value(value).unwrap();
        assert_eq!(reloaded, note);

        let id: NoteId = serde_json::from_str(&format!("\"{}\"", note.id())).unwrap();
        assert_eq!(id, note.id());
    }
}
