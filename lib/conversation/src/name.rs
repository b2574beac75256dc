//! Heuristic name capture.
//!
//! Picks the first capitalized token that is not part of a self-introduction
//! phrase. It is deliberately simple: "My name is Maria" yields `Maria`,
//! "hello there" yields nothing.

/// Tokens skipped while looking for a name (compared lower-cased).
const STOPWORDS: &[&str] = &["i'm", "my", "name", "is", "call", "me", "i", "am"];

/// Phrases that signal the user is introducing themselves.
const INTRODUCTION_CUES: &[&str] = &["my name is", "i'm", "i am", "call me"];

/// Extracts a probable first name from free text.
///
/// Tokens are split on whitespace. A candidate must start with an uppercase
/// character and be longer than one character; punctuation is stripped from
/// the returned value.
#[must_use]
pub fn extract_name(text: &str) -> Option<String> {
    text.split_whitespace()
        .filter(|word| !STOPWORDS.contains(&word.to_lowercase().as_str()))
        .filter(|word| word.chars().next().is_some_and(char::is_uppercase))
        .filter(|word| word.chars().count() > 1)
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .find(|clean| !clean.is_empty())
}

/// Returns true if the text contains a self-introduction cue.
#[must_use]
pub fn introduces_self(text: &str) -> bool {
    let lower = text.to_lowercase();
    INTRODUCTION_CUES.iter().any(|cue| lower.contains(cue))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_name_after_introduction() {
        assert_eq!(extract_name("My name is Maria"), Some("Maria".to_string()));
        assert_eq!(extract_name("I'm Tom."), Some("Tom".to_string()));
        assert_eq!(extract_name("Call me Ishmael!"), Some("Ishmael".to_string()));
    }

    #[test]
    fn bare_name_is_accepted() {
        assert_eq!(extract_name("Carlos"), Some("Carlos".to_string()));
    }

    #[test]
    fn lowercase_text_has_no_name() {
        assert_eq!(extract_name("hello there"), None);
        assert_eq!(extract_name("my name is maria"), None);
    }

    #[test]
    fn single_letters_are_skipped() {
        assert_eq!(extract_name("X marks the spot"), None);
        assert_eq!(extract_name("A Bob"), Some("Bob".to_string()));
    }

    #[test]
    fn unicode_names_keep_letters_and_drop_punctuation() {
        assert_eq!(extract_name("ÉÉ"), Some("ÉÉ".to_string()));
        assert_eq!(extract_name("I am Zoë-Ann"), Some("ZoëAnn".to_string()));
    }

    #[test]
    fn introduction_cues_are_case_insensitive() {
        assert!(introduces_self("Hi, MY NAME IS Ana"));
        assert!(introduces_self("i am Leo"));
        assert!(introduces_self("you can call me Al"));
        assert!(!introduces_self("what are your hours?"));
    }
}
