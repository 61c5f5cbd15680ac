//! Heuristic gate deciding whether input is in the tutor's scope
//!
//! This is a keyword check, not a classifier. False positives and false
//! negatives are expected; the prompt itself repeats the scope restriction.

/// Domain keywords that put a message in scope (matched as lowercase substrings)
pub const EDUCATION_KEYWORDS: &[&str] = &[
    "education",
    "learning",
    "teaching",
    "classroom",
    "student",
    "school",
    "university",
    "college",
    "curriculum",
    "knowledge",
    "exam",
];

/// Returns true when `text` contains a question mark or an education keyword
///
/// # Examples
///
/// ```
/// use tutorchat::chat::is_in_scope;
///
/// assert!(is_in_scope("Why is the sky blue?"));
/// assert!(is_in_scope("Tips for my University application"));
/// assert!(!is_in_scope("hello"));
/// ```
pub fn is_in_scope(text: &str) -> bool {
    if text.contains('?') {
        return true;
    }

    let lowered = text.to_lowercase();
    EDUCATION_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}
