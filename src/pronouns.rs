use serde::Serialize;
use std::ops::RangeInclusive;

/// Number of person/number/gender slots in a conjugation table.
pub const SLOT_COUNT: usize = 14;

/// Second-person slots, the only ones the imperative mood exists for.
pub const IMPERATIVE_RANGE: RangeInclusive<usize> = 6..=11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PronounSlot {
    pub index: usize,
    pub label: &'static str,
    pub display_form: &'static str,
}

const fn slot_entry(index: usize, label: &'static str, display_form: &'static str) -> PronounSlot {
    PronounSlot { index, label, display_form }
}

/// The 14-form ordering used by every conjugation table.
pub const PRONOUNS: [PronounSlot; SLOT_COUNT] = [
    slot_entry(0, "3rd masc sing", "هو"),
    slot_entry(1, "3rd masc dual", "هما"),
    slot_entry(2, "3rd masc pl", "هم"),
    slot_entry(3, "3rd fem sing", "هي"),
    slot_entry(4, "3rd fem dual", "هما"),
    slot_entry(5, "3rd fem pl", "هنّ"),
    slot_entry(6, "2nd masc sing", "أنتَ"),
    slot_entry(7, "2nd dual", "أنتما"),
    slot_entry(8, "2nd masc pl", "أنتم"),
    slot_entry(9, "2nd fem sing", "أنتِ"),
    slot_entry(10, "2nd dual (alt)", "أنتما"),
    slot_entry(11, "2nd fem pl", "أنتنّ"),
    slot_entry(12, "1st sing", "أنا"),
    slot_entry(13, "1st pl", "نحن"),
];

pub fn slot(index: usize) -> Option<&'static PronounSlot> {
    PRONOUNS.get(index)
}

/// Maps a slot onto the representative of its display-duplicate pair.
pub fn canon(index: usize) -> usize {
    match index {
        4 => 1,
        10 => 7,
        other => other,
    }
}

/// The 12 slots with distinct display forms (everything but 4 and 10).
pub fn unique_indices() -> Vec<usize> {
    (0..SLOT_COUNT).filter(|&i| canon(i) == i).collect()
}

pub fn is_imperative_compatible(index: usize) -> bool {
    IMPERATIVE_RANGE.contains(&index)
}

pub fn imperative_indices() -> Vec<usize> {
    IMPERATIVE_RANGE.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn canon_collapses_duplicate_slots() {
        assert_eq!(canon(4), 1);
        assert_eq!(canon(10), 7);
        for i in (0..SLOT_COUNT).filter(|i| *i != 4 && *i != 10) {
            assert_eq!(canon(i), i);
        }
    }

    #[test]
    fn unique_indices_has_twelve_slots() {
        let unique = unique_indices();
        assert_eq!(unique.len(), 12);
        assert!(!unique.contains(&4));
        assert!(!unique.contains(&10));
    }

    #[test]
    fn unique_slots_have_distinct_display_forms() {
        let forms: HashSet<&str> = unique_indices()
            .into_iter()
            .map(|i| PRONOUNS[i].display_form)
            .collect();
        assert_eq!(forms.len(), 12);
        assert_eq!(PRONOUNS[4].display_form, PRONOUNS[1].display_form);
        assert_eq!(PRONOUNS[10].display_form, PRONOUNS[7].display_form);
    }

    #[test]
    fn imperative_range_is_second_person() {
        assert_eq!(imperative_indices(), vec![6, 7, 8, 9, 10, 11]);
        assert!(!is_imperative_compatible(5));
        assert!(!is_imperative_compatible(12));
        assert!(PRONOUNS
            .iter()
            .filter(|p| is_imperative_compatible(p.index))
            .all(|p| p.label.starts_with("2nd")));
    }

    #[test]
    fn slot_indices_match_positions() {
        for (i, p) in PRONOUNS.iter().enumerate() {
            assert_eq!(p.index, i);
        }
        assert!(slot(SLOT_COUNT).is_none());
    }
}
