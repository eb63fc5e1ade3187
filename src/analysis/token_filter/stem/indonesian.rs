//! Dictionary-backed Indonesian stemmer.
//!
//! Implements confix stripping: inflectional particles (`-lah`, `-kah`,
//! `-tah`, `-pun`), possessive pronouns (`-ku`, `-mu`, `-nya`) and
//! derivational suffixes (`-i`, `-kan`, `-an`) are removed right to left, then
//! up to three derivational prefixes (`di-`, `ke-`, `se-`, `be-`, `te-`,
//! `me-`, `pe-`) with their recoding variants. The root dictionary is checked
//! after every step and the first dictionary hit wins. A word whose root
//! cannot be found is returned unchanged.
//!
//! Hyphenated reduplication (`film-film`) is collapsed when both halves share
//! a root. This only applies to direct [`Stemmer`] callers: the text
//! normalizer turns every `-` into a space before tokens reach the stemmer.
//!
//! # Examples
//!
//! ```
//! use sentimen::analysis::token_filter::stem::{IndonesianStemmer, Stemmer};
//!
//! let stemmer = IndonesianStemmer::from_words(["film", "tulis", "main"]);
//! assert_eq!(stemmer.stem("filmnya"), "film");
//! assert_eq!(stemmer.stem("menulis"), "tulis");
//! assert_eq!(stemmer.stem("bermain"), "main");
//! assert_eq!(stemmer.stem("recommended"), "recommended");
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

use super::Stemmer;

/// Maximum number of memoised words.
const CACHE_CAPACITY: usize = 16_384;

/// Maximum number of stacked derivational prefixes.
const MAX_PREFIX_REMOVALS: usize = 3;

/// Shortest remainder accepted after removing an affix.
const MIN_STEM_LEN: usize = 2;

const PARTICLES: &[&str] = &["lah", "kah", "tah", "pun"];
const POSSESSIVES: &[&str] = &["nya", "ku", "mu"];
const DERIVATIONAL_SUFFIXES: &[&str] = &["kan", "an", "i"];

/// Indonesian stemmer backed by a dictionary of root words.
///
/// Results are memoised per word; the memo is shared by all callers and
/// never changes the result for a given word.
pub struct IndonesianStemmer {
    dictionary: Arc<HashSet<String>>,
    cache: RwLock<AHashMap<String, String>>,
}

impl std::fmt::Debug for IndonesianStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndonesianStemmer")
            .field("dictionary_size", &self.dictionary.len())
            .field("cached_words", &self.cache.read().len())
            .finish()
    }
}

impl IndonesianStemmer {
    /// Create a stemmer over the given root words.
    pub fn new(dictionary: HashSet<String>) -> Self {
        IndonesianStemmer {
            dictionary: Arc::new(dictionary),
            cache: RwLock::new(AHashMap::new()),
        }
    }

    /// Create a stemmer from a list of root words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(words.into_iter().map(|w| w.into()).collect())
    }

    /// Number of root words in the dictionary.
    pub fn dictionary_len(&self) -> usize {
        self.dictionary.len()
    }

    /// Check whether a word is a known root.
    pub fn is_root_word(&self, word: &str) -> bool {
        self.dictionary.contains(word)
    }

    fn stem_word(&self, word: &str) -> String {
        if word.len() <= MIN_STEM_LEN || self.is_root_word(word) {
            return word.to_string();
        }

        // Reduplicated plurals ("film-film") collapse to the shared root.
        // Normalized text never contains '-', so only direct callers get here.
        if let Some((left, right)) = word.split_once('-') {
            let left = self.stem_word(left);
            if left == self.stem_word(right) {
                return left;
            }
        }

        if has_prefix_precedence(word) {
            let root = self.prefix_candidates(word).into_iter().find_map(|candidate| {
                if self.is_root_word(&candidate) {
                    Some(candidate)
                } else {
                    self.strip_suffixes_to_root(&candidate)
                }
            });
            if let Some(root) = root {
                return root;
            }
        }

        self.stem_singular(word)
            .unwrap_or_else(|| word.to_string())
    }

    /// Suffixes first, then prefixes, then prefixes on partially restored forms.
    fn stem_singular(&self, word: &str) -> Option<String> {
        let mut forms = vec![word.to_string()];
        let mut removed_kan = false;
        let mut current = word.to_string();

        for suffixes in [PARTICLES, POSSESSIVES, DERIVATIONAL_SUFFIXES] {
            if let Some((stripped, suffix)) = strip_suffix(&current, suffixes) {
                removed_kan = suffix == "kan";
                current = stripped;
                if self.is_root_word(&current) {
                    return Some(current);
                }
                forms.push(current.clone());
            }
        }

        if let Some(root) = self.strip_prefixes(&current) {
            return Some(root);
        }

        if removed_kan {
            let restored = format!("{current}k");
            if self.is_root_word(&restored) {
                return Some(restored);
            }
            if let Some(root) = self.strip_prefixes(&restored) {
                return Some(root);
            }
        }

        forms
            .iter()
            .rev()
            .skip(1)
            .find_map(|form| self.strip_prefixes(form))
    }

    fn strip_suffixes_to_root(&self, word: &str) -> Option<String> {
        let mut current = word.to_string();
        for suffixes in [PARTICLES, POSSESSIVES, DERIVATIONAL_SUFFIXES] {
            if let Some((stripped, _)) = strip_suffix(&current, suffixes) {
                current = stripped;
                if self.is_root_word(&current) {
                    return Some(current);
                }
            }
        }
        None
    }

    fn strip_prefixes(&self, word: &str) -> Option<String> {
        self.prefix_candidates(word)
            .into_iter()
            .find(|candidate| self.is_root_word(candidate))
    }

    /// Every form reachable by removing one to three prefixes, depth first.
    fn prefix_candidates(&self, word: &str) -> Vec<String> {
        let mut out = Vec::new();
        collect_prefix_candidates(word, 0, &mut out);
        out
    }
}

impl Stemmer for IndonesianStemmer {
    fn stem(&self, word: &str) -> String {
        if let Some(hit) = self.cache.read().get(word) {
            return hit.clone();
        }

        let stemmed = self.stem_word(word);

        let mut cache = self.cache.write();
        if cache.len() < CACHE_CAPACITY {
            cache.insert(word.to_string(), stemmed.clone());
        }
        stemmed
    }

    fn name(&self) -> &'static str {
        "indonesian"
    }
}

fn collect_prefix_candidates(word: &str, depth: usize, out: &mut Vec<String>) {
    if depth == MAX_PREFIX_REMOVALS {
        return;
    }
    for candidate in strip_prefix_once(word) {
        if candidate.len() < MIN_STEM_LEN {
            continue;
        }
        out.push(candidate.clone());
        collect_prefix_candidates(&candidate, depth + 1, out);
    }
}

fn strip_suffix(word: &str, suffixes: &[&'static str]) -> Option<(String, &'static str)> {
    suffixes.iter().find_map(|&suffix| {
        word.strip_suffix(suffix)
            .filter(|stem| stem.len() >= MIN_STEM_LEN)
            .map(|stem| (stem.to_string(), suffix))
    })
}

/// `be-...-lah`, `be-...-an` and `me/di/pe/te-...-i` confixes strip the prefix first.
fn has_prefix_precedence(word: &str) -> bool {
    (word.starts_with("be") && (word.ends_with("lah") || word.ends_with("an")))
        || (["me", "di", "pe", "te"].iter().any(|p| word.starts_with(p)) && word.ends_with('i'))
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn starts_with_vowel(s: &str) -> bool {
    s.chars().next().is_some_and(is_vowel)
}

fn starts_with_any(s: &str, set: &str) -> bool {
    s.chars().next().is_some_and(|c| set.contains(c))
}

/// `C1erC2` words lose `be-`/`te-` without the `r` (bekerja → kerja).
fn is_consonant_er(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() && !is_vowel(c) && c != 'r')
        && chars.as_str().starts_with("er")
}

/// Candidate remainders after removing one derivational prefix.
fn strip_prefix_once(word: &str) -> Vec<String> {
    let mut out = Vec::new();

    for plain in ["di", "ke", "se"] {
        if let Some(rest) = word.strip_prefix(plain) {
            out.push(rest.to_string());
        }
    }

    // be- / te-
    for (prefix, with_r) in [("be", "ber"), ("te", "ter")] {
        if let Some(rest) = word.strip_prefix(with_r) {
            out.push(rest.to_string());
        }
        if let Some(rest) = word.strip_prefix(prefix)
            && (rest.starts_with('r') || is_consonant_er(rest))
        {
            out.push(rest.to_string());
        }
    }
    if let Some(rest) = word.strip_prefix("bel")
        && rest.starts_with("ajar")
    {
        out.push(rest.to_string());
    }

    // me- / pe-
    for base in ["me", "pe"] {
        let Some(after) = word.strip_prefix(base) else {
            continue;
        };
        if let Some(rest) = after.strip_prefix("ng") {
            if let Some(single_syllable) = rest.strip_prefix('e') {
                out.push(single_syllable.to_string());
            }
            if starts_with_vowel(rest) {
                out.push(rest.to_string());
                out.push(format!("k{rest}"));
            } else if starts_with_any(rest, "ghqk") {
                out.push(rest.to_string());
            }
        } else if let Some(rest) = after.strip_prefix("ny") {
            if starts_with_vowel(rest) {
                out.push(format!("s{rest}"));
                out.push(format!("ny{rest}"));
            }
        } else if let Some(rest) = after.strip_prefix('m') {
            if starts_with_any(rest, "bfvp") {
                out.push(rest.to_string());
            } else if starts_with_vowel(rest) {
                out.push(format!("m{rest}"));
                out.push(format!("p{rest}"));
            }
        } else if let Some(rest) = after.strip_prefix('n') {
            if starts_with_any(rest, "cdjstz") {
                out.push(rest.to_string());
            } else if starts_with_vowel(rest) {
                out.push(format!("n{rest}"));
                out.push(format!("t{rest}"));
            }
        } else if starts_with_any(after, "lmnrwy") {
            out.push(after.to_string());
        }

        if base == "pe" {
            if let Some(rest) = word.strip_prefix("per") {
                out.push(rest.to_string());
            }
            if let Some(rest) = word.strip_prefix("pel")
                && rest.starts_with("ajar")
            {
                out.push(rest.to_string());
            }
        }
    }

    out
}
