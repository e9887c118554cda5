//! Name handling shared by authors and members

/// A person record is usable only if at least one name part is filled in.
pub fn has_any_name(first_name: &str, last_name: &str, middle: &str) -> bool {
    [first_name, last_name, middle]
        .iter()
        .any(|part| !part.trim().is_empty())
}

/// Display form used in log lines and conflict messages.
pub fn full_name(first_name: &str, middle: &str, last_name: &str) -> String {
    [first_name, middle, last_name]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_any_name() {
        assert!(!has_any_name("", " ", ""));
        assert!(has_any_name("", "Herbert", ""));
    }

    #[test]
    fn test_full_name() {
        assert_eq!(full_name("Frank", "", "Herbert"), "Frank Herbert");
        assert_eq!(full_name("Ursula", "K.", "Le Guin"), "Ursula K. Le Guin");
    }
}
