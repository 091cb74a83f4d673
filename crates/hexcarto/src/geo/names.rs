//! Constituency name normalisation shared by entities and boundaries.

use once_cell::sync::Lazy;
use regex::Regex;

static PARENTHESISED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)").unwrap());

/// Maps a display name to a lookup key. Two spellings of the same place
/// must map to the same key.
pub trait NameNormalizer {
    fn normalize(&self, name: &str) -> String;
}

impl<F: Fn(&str) -> String> NameNormalizer for F {
    fn normalize(&self, name: &str) -> String {
        self(name)
    }
}

/// Rules for UK constituency names across boundary eras and data sources.
///
/// - lowercase, drop parenthesised text;
/// - `"Kingston upon Hull"` → `"hull"`;
/// - fold Welsh/accented vowels, `&` → `and`, hyphens and commas → space,
///   drop apostrophes and full stops;
/// - expand compass abbreviations (`N`, `SE`, ...);
/// - drop the filler words `and`/`the`, then sort the words so
///   `"East Antrim"`, `"Antrim East"` and `"Chester, City of"` /
///   `"City of Chester"` agree.
#[derive(Clone, Copy, Debug, Default)]
pub struct UkNameNormalizer;

impl NameNormalizer for UkNameNormalizer {
    fn normalize(&self, name: &str) -> String {
        let mut n = PARENTHESISED.replace_all(&name.to_lowercase(), "").into_owned();
        n = n.replace("kingston upon hull", "hull");
        n = fold_diacritics(&n).replace('&', " and ");
        n.retain(|c| c != '\'' && c != '\u{2019}' && c != '.');

        let mut words: Vec<&str> = Vec::new();
        for w in n.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            match w {
                "and" | "the" => {}
                "n" => words.push("north"),
                "s" => words.push("south"),
                "e" => words.push("east"),
                "w" => words.push("west"),
                "ne" => words.extend(["north", "east"]),
                "nw" => words.extend(["north", "west"]),
                "se" => words.extend(["south", "east"]),
                "sw" => words.extend(["south", "west"]),
                other => words.push(other),
            }
        }
        words.sort_unstable();
        words.join(" ")
    }
}

/// Replace accented Latin letters common in UK place names with their base letter.
pub fn fold_diacritics(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ŵ' => 'w',
            'ŷ' | 'ÿ' => 'y',
            other => other,
        })
        .collect()
}
