use serde::{Deserialize, Serialize};

/// A base verb (past-tense citation form with harakat) and its present-tense
/// pattern key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerbEntry {
    pub lemma: String,
    pub pattern: String,
}

impl VerbEntry {
    pub fn new(lemma: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            lemma: lemma.into(),
            pattern: pattern.into(),
        }
    }
}

/// Built-in practice vocabulary. Keeps a spread of patterns.
pub fn sample_verbs() -> Vec<VerbEntry> {
    vec![
        VerbEntry::new("كَتَبَ", "nasara"),  // kataba
        VerbEntry::new("فَتَحَ", "fataha"),  // fataha
        VerbEntry::new("نَصَرَ", "nasara"),  // nasara
        VerbEntry::new("ضَرَبَ", "daraba"),  // daraba
        VerbEntry::new("سَمِعَ", "samia"),   // sami'a
        VerbEntry::new("حَسِبَ", "hasiba"),  // hasiba
        VerbEntry::new("كَرُمَ", "karuma"),  // karuma
        VerbEntry::new("دَرَسَ", "nasara"),  // darasa
        VerbEntry::new("شَرِبَ", "samia"),   // shariba
    ]
}

/// Every entry in `verbs` whose lemma differs from `verb`'s.
pub fn other_verbs<'a>(verbs: &'a [VerbEntry], verb: &VerbEntry) -> Vec<&'a VerbEntry> {
    verbs.iter().filter(|v| v.lemma != verb.lemma).collect()
}
