//! Canned notes used to populate an empty database.

use super::note::Note;

const SAMPLE_NOTES: &[(&str, &str)] = &[
    ("A good day", "We went on a vacation by the lake"),
    ("Android Compose", "Working on Android Compose course today"),
    ("Keep at it", "Sometimes things just happen"),
    ("A movie day", "Watching a movie with family today"),
    ("A movie day", "Watching a movie with family today"),
    ("A movie day", "Watching a movie with family today"),
    ("A movie day", "Watching a movie with family today"),
    ("A movie day", "Watching a movie with family today"),
    ("A movie day", "Watching a movie with family today"),
    ("A movie day", "Watching a movie with family"),
];

/// Returns freshly constructed sample notes, each with its own id.
pub fn sample_notes() -> Vec<Note> {
    SAMPLE_NOTES
        .iter()
        .map(|(title, description)| Note::new(*title, *description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::sample_notes;
    use std::collections::HashSet;

    #[test]
    fn sample_notes_pass_validation_and_have_unique_ids() {
        let notes = sample_notes();
        assert_eq!(notes.len(), 10);
        for note in &notes {
            note.validate().unwrap();
        }
        let ids: HashSet<_> = notes.iter().map(|note| note.id()).collect();
        assert_eq!(ids.len(), notes.len());
    }
}
