//! Escape-sequence and whitespace cleanup for raw question text.

/// Replaces literal and real newline/tab sequences with spaces, then collapses
/// runs of spaces into one.
///
/// Leading and trailing spaces are kept (collapsed to one); the junk filter
/// relies on seeing the text as the user sent it.
#[must_use]
pub fn normalize(text: &str) -> String {
    let replaced = text
        .replace("\\n", " ")
        .replace("\\t", " ")
        .replace(['\n', '\t'], " ");

    let mut output = String::with_capacity(replaced.len());
    let mut previous_space = false;
    for ch in replaced.chars() {
        if ch == ' ' {
            if previous_space {
                continue;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
        output.push(ch);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_replaces_real_newlines_and_tabs() {
        assert_eq!(normalize("когда\nсессия\tначнется"), "когда сессия начнется");
    }

    #[test]
    fn test_normalize_replaces_literal_escape_sequences() {
        assert_eq!(normalize(r"когда\nсессия\tначнется"), "когда сессия начнется");
    }

    #[test]
    fn test_normalize_collapses_space_runs() {
        assert_eq!(normalize("где    столовая \n\n корпуса"), "где столовая корпуса");
    }

    #[test]
    fn test_normalize_keeps_single_edge_space() {
        assert_eq!(normalize("  вопрос  "), " вопрос ");
    }

    #[test]
    fn test_normalize_empty_stays_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("a\\n\\n b\t\tc");
        assert_eq!(normalize(&once), once);
    }
}
