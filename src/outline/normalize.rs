//! Outline de-duplication and level smoothing.

use crate::model::{HeadingCandidate, HeadingLevel};

/// Produce the final outline from accepted heading candidates.
///
/// A candidate whose `(text, page)` equals the previously kept one is dropped.
/// An H3 directly after an H1 on the same page is demoted to H2; every other
/// level jump is left as-is. The pass is idempotent.
pub fn normalize_outline(candidates: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
    let mut outline: Vec<HeadingCandidate> = Vec::with_capacity(candidates.len());

    for mut candidate in candidates {
        if let Some(previous) = outline.last() {
            if previous.text == candidate.text && previous.page == candidate.page {
                continue;
            }

            if previous.page == candidate.page
                && previous.level == HeadingLevel::H1
                && candidate.level == HeadingLevel::H3
            {
                log::debug!(
                    "Demoting {:?} on page {} from H3 to H2",
                    candidate.text,
                    candidate.page
                );
                candidate.level = HeadingLevel::H2;
            }
        }

        outline.push(candidate);
    }

    outline
}

#[cfg(test)]
mod tests {
    use super::*;
    use HeadingLevel::*;

    fn h(level: HeadingLevel, text: &str, page: u32) -> HeadingCandidate {
        HeadingCandidate::new(level, text, page)
    }

    #[test]
    fn test_consecutive_duplicates_collapse() {
        let outline = normalize_outline(vec![
            h(H2, "Methods", 2),
            h(H2, "Methods", 2),
            h(H3, "Methods", 3),
        ]);
        assert_eq!(outline, vec![h(H2, "Methods", 2), h(H3, "Methods", 3)]);
    }

    #[test]
    fn test_non_consecutive_duplicates_survive() {
        let outline = normalize_outline(vec![
            h(H2, "Notes", 1),
            h(H2, "Other", 1),
            h(H2, "Notes", 1),
        ]);
        assert_eq!(outline.len(), 3);
    }

    #[test]
    fn test_same_page_jump_is_demoted() {
        let outline = normalize_outline(vec![h(H1, "Intro", 1), h(H3, "Detail", 1)]);
        assert_eq!(outline, vec![h(H1, "Intro", 1), h(H2, "Detail", 1)]);
    }

    #[test]
    fn test_cross_page_jump_is_kept() {
        let outline = normalize_outline(vec![h(H1, "Intro", 1), h(H3, "Detail", 2)]);
        assert_eq!(outline, vec![h(H1, "Intro", 1), h(H3, "Detail", 2)]);
    }

    #[test]
    fn test_rising_levels_untouched() {
        let input = vec![h(H3, "a", 1), h(H1, "b", 1), h(H2, "c", 1)];
        assert_eq!(normalize_outline(input.clone()), input);
    }

    #[test]
    fn test_only_direct_successor_is_demoted() {
        let outline = normalize_outline(vec![
            h(H1, "Intro", 1),
            h(H3, "First", 1),
            h(H3, "Second", 1),
        ]);
        assert_eq!(
            outline,
            vec![h(H1, "Intro", 1), h(H2, "First", 1), h(H3, "Second", 1)]
        );
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            h(H1, "Intro", 1),
            h(H3, "Detail", 1),
            h(H3, "Detail", 1),
            h(H3, "Next", 1),
            h(H1, "Results", 2),
            h(H3, "Table", 3),
            h(H1, "End", 3),
            h(H3, "Tail", 3),
        ];
        let once = normalize_outline(input);
        let twice = normalize_outline(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty() {
        assert!(normalize_outline(Vec::new()).is_empty());
    }
}
