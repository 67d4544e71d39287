//! Muscularity term normalization
//!
//! Maps free-form muscularity labels (vision-model output, user input,
//! French or English, with or without accents) onto the fixed catalog
//! vocabulary [`MuscularityLevel`].
//!
//! Lookup order:
//! 1. empty input → [`MuscularityLevel::Normal`]
//! 2. exact match in the synonym table after folding
//! 3. keyword substring match: severe → atrophy → medium → muscular → athletic
//! 4. [`MuscularityLevel::Normal`], reported as unmapped

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::observer::{MatchObserver, NoopObserver};

/// Canonical muscularity vocabulary used by the archetype catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MuscularityLevel {
    SevereAtrophy,
    Atrophied,
    SlightlyAtrophied,
    Normal,
    NormalStocky,
    MediumMuscled,
    Muscular,
    Athletic,
    LessMuscledFeminine,
    MediumMuscledFeminine,
    MoreMuscledFeminine,
}

impl MuscularityLevel {
    pub const ALL: [MuscularityLevel; 11] = [
        MuscularityLevel::SevereAtrophy,
        MuscularityLevel::Atrophied,
        MuscularityLevel::SlightlyAtrophied,
        MuscularityLevel::Normal,
        MuscularityLevel::NormalStocky,
        MuscularityLevel::MediumMuscled,
        MuscularityLevel::Muscular,
        MuscularityLevel::Athletic,
        MuscularityLevel::LessMuscledFeminine,
        MuscularityLevel::MediumMuscledFeminine,
        MuscularityLevel::MoreMuscledFeminine,
    ];

    /// Label as written in the catalog
    pub fn label(self) -> &'static str {
        match self {
            MuscularityLevel::SevereAtrophy => "Atrophie sévère",
            MuscularityLevel::Atrophied => "Atrophié",
            MuscularityLevel::SlightlyAtrophied => "Légèrement atrophié",
            MuscularityLevel::Normal => "Normal",
            MuscularityLevel::NormalStocky => "Normal trapu",
            MuscularityLevel::MediumMuscled => "Moyennement musclé",
            MuscularityLevel::Muscular => "Musclé",
            MuscularityLevel::Athletic => "Athlétique",
            MuscularityLevel::LessMuscledFeminine => "Moins musclée",
            MuscularityLevel::MediumMuscledFeminine => "Moyennement musclée",
            MuscularityLevel::MoreMuscledFeminine => "Plus musclée",
        }
    }

    /// Parse an exact catalog label (surrounding whitespace ignored)
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.iter().copied().find(|level| level.label() == label)
    }
}

impl fmt::Display for MuscularityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Folded synonym → canonical level
///
/// Keys are already folded: no accents, lowercase, single spaces.
const SYNONYMS: &[(&str, MuscularityLevel)] = &[
    // severe atrophy
    ("atrophie severe", MuscularityLevel::SevereAtrophy),
    ("severe atrophie", MuscularityLevel::SevereAtrophy),
    ("severement atrophie", MuscularityLevel::SevereAtrophy),
    ("tres atrophie", MuscularityLevel::SevereAtrophy),
    ("severe atrophy", MuscularityLevel::SevereAtrophy),
    ("severely atrophied", MuscularityLevel::SevereAtrophy),
    // atrophy
    ("atrophie", MuscularityLevel::Atrophied),
    ("atrophiee", MuscularityLevel::Atrophied),
    ("atrophy", MuscularityLevel::Atrophied),
    ("atrophied", MuscularityLevel::Atrophied),
    ("peu muscle", MuscularityLevel::Atrophied),
    ("peu musclee", MuscularityLevel::Atrophied),
    // slight atrophy
    ("legerement atrophie", MuscularityLevel::SlightlyAtrophied),
    ("legerement atrophiee", MuscularityLevel::SlightlyAtrophied),
    ("un peu atrophie", MuscularityLevel::SlightlyAtrophied),
    ("slightly atrophied", MuscularityLevel::SlightlyAtrophied),
    ("slight atrophy", MuscularityLevel::SlightlyAtrophied),
    // normal
    ("normal", MuscularityLevel::Normal),
    ("normale", MuscularityLevel::Normal),
    ("moyen", MuscularityLevel::Normal),
    ("moyenne", MuscularityLevel::Normal),
    ("average", MuscularityLevel::Normal),
    ("standard", MuscularityLevel::Normal),
    // normal stocky
    ("normal trapu", MuscularityLevel::NormalStocky),
    ("normale trapue", MuscularityLevel::NormalStocky),
    ("trapu", MuscularityLevel::NormalStocky),
    ("trapue", MuscularityLevel::NormalStocky),
    ("stocky", MuscularityLevel::NormalStocky),
    ("normal stocky", MuscularityLevel::NormalStocky),
    // medium muscle
    ("moyennement muscle", MuscularityLevel::MediumMuscled),
    ("moderement muscle", MuscularityLevel::MediumMuscled),
    ("medium muscle", MuscularityLevel::MediumMuscled),
    ("medium muscular", MuscularityLevel::MediumMuscled),
    ("moderately muscular", MuscularityLevel::MediumMuscled),
    ("moderately muscled", MuscularityLevel::MediumMuscled),
    // muscular
    ("muscle", MuscularityLevel::Muscular),
    ("muscular", MuscularityLevel::Muscular),
    ("muscled", MuscularityLevel::Muscular),
    ("tres muscle", MuscularityLevel::Muscular),
    ("bien muscle", MuscularityLevel::Muscular),
    // athletic
    ("athletique", MuscularityLevel::Athletic),
    ("athletic", MuscularityLevel::Athletic),
    ("athlete", MuscularityLevel::Athletic),
    ("sportif", MuscularityLevel::Athletic),
    ("sportive", MuscularityLevel::Athletic),
    // feminine
    ("moins musclee", MuscularityLevel::LessMuscledFeminine),
    ("less muscular", MuscularityLevel::LessMuscledFeminine),
    ("less muscled", MuscularityLevel::LessMuscledFeminine),
    ("moyennement musclee", MuscularityLevel::MediumMuscledFeminine),
    ("moderement musclee", MuscularityLevel::MediumMuscledFeminine),
    ("plus musclee", MuscularityLevel::MoreMuscledFeminine),
    ("more muscular", MuscularityLevel::MoreMuscledFeminine),
    ("more muscled", MuscularityLevel::MoreMuscledFeminine),
    ("musclee", MuscularityLevel::MoreMuscledFeminine),
];

fn synonym_index() -> &'static AHashMap<&'static str, MuscularityLevel> {
    static INDEX: OnceLock<AHashMap<&'static str, MuscularityLevel>> = OnceLock::new();
    INDEX.get_or_init(|| SYNONYMS.iter().copied().collect())
}

/// Map a free-form label onto the canonical vocabulary
pub fn normalize(raw: Option<&str>) -> MuscularityLevel {
    normalize_with(raw, &NoopObserver)
}

/// Same as [`normalize`], reporting unmapped input to `observer`
pub fn normalize_with(raw: Option<&str>, observer: &dyn MatchObserver) -> MuscularityLevel {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return MuscularityLevel::Normal,
    };

    let folded = fold(raw);
    if let Some(level) = synonym_index().get(folded.as_str()) {
        return *level;
    }

    match keyword_match(&folded) {
        Some(level) => level,
        None => {
            observer.unmapped_term(raw, MuscularityLevel::Normal);
            MuscularityLevel::Normal
        }
    }
}

fn keyword_match(folded: &str) -> Option<MuscularityLevel> {
    if folded.contains("sever") {
        return Some(MuscularityLevel::SevereAtrophy);
    }
    if folded.contains("atroph") {
        let slight = ["leger", "slight", "un peu", "mild"]
            .iter()
            .any(|q| folded.contains(q));
        return Some(if slight {
            MuscularityLevel::SlightlyAtrophied
        } else {
            MuscularityLevel::Atrophied
        });
    }
    if ["moyen", "medium", "moder"].iter().any(|k| folded.contains(k)) {
        return Some(if folded.contains("musclee") {
            MuscularityLevel::MediumMuscledFeminine
        } else {
            MuscularityLevel::MediumMuscled
        });
    }
    if folded.contains("muscl") || folded.contains("muscular") {
        return Some(MuscularityLevel::Muscular);
    }
    if folded.contains("athlet") || folded.contains("sport") {
        return Some(MuscularityLevel::Athletic);
    }
    None
}

/// Strip diacritics, lowercase, and collapse separators to single spaces
pub fn fold(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars().flat_map(char::to_lowercase) {
        match fold_char(c) {
            Some(replacement) => out.push_str(replacement),
            None if c == '-' || c == '_' || c.is_whitespace() => out.push(' '),
            None => out.push(c),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fold_char(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        // combining diacritical marks left over from decomposed input
        '\u{0300}'..='\u{036f}' => "",
        _ => return None,
    };
    Some(folded)
}
