//! Fuzzy string similarity on a 0–100 scale.
//!
//! All scorers work on Unicode scalar values and are built on the normalized
//! Indel similarity (insertions and deletions only), computed from the
//! longest common subsequence with a bit-parallel algorithm.

use std::collections::{BTreeSet, HashMap};

const UNBASE_SCALE: f64 = 0.95;

/// Normalized Indel similarity of two strings.
pub fn ratio(s1: &str, s2: &str) -> f64 {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    indel_ratio(&a, &b)
}

/// Best `ratio` between the shorter string and any equally long window of
/// the longer one. Windows clipped at either end of the longer string are
/// considered too.
pub fn partial_ratio(s1: &str, s2: &str) -> f64 {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    partial_ratio_chars(&a, &b)
}

/// `ratio` after sorting whitespace-separated tokens.
pub fn token_sort_ratio(s1: &str, s2: &str) -> f64 {
    ratio(&sorted_tokens(s1).join(" "), &sorted_tokens(s2).join(" "))
}

/// Compares the shared tokens against each side's remaining tokens.
pub fn token_set_ratio(s1: &str, s2: &str) -> f64 {
    let a: BTreeSet<&str> = s1.split_whitespace().collect();
    let b: BTreeSet<&str> = s2.split_whitespace().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = a.intersection(&b).copied().collect();
    let diff_ab: Vec<&str> = a.difference(&b).copied().collect();
    let diff_ba: Vec<&str> = b.difference(&a).copied().collect();

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect = intersection.join(" ");
    let ab = diff_ab.join(" ");
    let ba = diff_ba.join(" ");

    if sect.is_empty() {
        return ratio(&ab, &ba);
    }

    // Shared tokens lead both sides of every comparison.
    let sect_ab = format!("{sect} {ab}");
    let sect_ba = format!("{sect} {ba}");
    ratio(&sect_ab, &sect_ba)
        .max(ratio(&sect, &sect_ab))
        .max(ratio(&sect, &sect_ba))
}

/// `partial_ratio` over sorted tokens; any shared token is a perfect match.
pub fn partial_token_ratio(s1: &str, s2: &str) -> f64 {
    let tokens_a: Vec<&str> = s1.split_whitespace().collect();
    let tokens_b: Vec<&str> = s2.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let set_a: BTreeSet<&str> = tokens_a.iter().copied().collect();
    let set_b: BTreeSet<&str> = tokens_b.iter().copied().collect();
    if set_a.intersection(&set_b).next().is_some() {
        return 100.0;
    }

    let result = partial_ratio(&sorted_tokens(s1).join(" "), &sorted_tokens(s2).join(" "));

    // Without duplicate tokens the differences equal the full token lists.
    if tokens_a.len() == set_a.len() && tokens_b.len() == set_b.len() {
        return result;
    }

    let diff_ab: Vec<&str> = set_a.difference(&set_b).copied().collect();
    let diff_ba: Vec<&str> = set_b.difference(&set_a).copied().collect();
    result.max(partial_ratio(&diff_ab.join(" "), &diff_ba.join(" ")))
}

/// Weighted combination of the other scorers, picking the most favourable
/// one for the length difference between the inputs.
pub fn wratio(s1: &str, s2: &str) -> f64 {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();
    if len1 == 0 || len2 == 0 {
        return 0.0;
    }

    let len_ratio = len1.max(len2) as f64 / len1.min(len2) as f64;
    let base = ratio(s1, s2);

    if len_ratio < 1.5 {
        let token = token_sort_ratio(s1, s2).max(token_set_ratio(s1, s2));
        return base.max(token * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    base.max(partial_ratio(s1, s2) * partial_scale)
        .max(partial_token_ratio(s1, s2) * UNBASE_SCALE * partial_scale)
}

fn sorted_tokens(s: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens
}

fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    let lcs = if a.len() <= b.len() {
        Pattern::new(a).lcs(b)
    } else {
        Pattern::new(b).lcs(a)
    };
    let distance = total - 2 * lcs;
    100.0 * (1.0 - distance as f64 / total as f64)
}

fn partial_ratio_chars(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (needle, haystack) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut best = best_window(needle, haystack);
    if best < 100.0 && needle.len() == haystack.len() {
        best = best.max(best_window(haystack, needle));
    }
    best
}

/// Slide `needle` across `haystack`, scoring each candidate window.
///
/// Windows are only scored when the character entering them occurs in the
/// needle; any other window scores no higher than its predecessor.
fn best_window(needle: &[char], haystack: &[char]) -> f64 {
    let pattern = Pattern::new(needle);
    let len = needle.len();
    let mut best = 0.0_f64;

    // Prefix windows shorter than the needle.
    for end in 1..len {
        if pattern.contains(haystack[end - 1]) {
            best = best.max(pattern.window_ratio(&haystack[..end]));
            if best >= 100.0 {
                return best;
            }
        }
    }

    // Full-length windows.
    for start in 0..=(haystack.len() - len) {
        let end = start + len;
        if pattern.contains(haystack[end - 1]) {
            best = best.max(pattern.window_ratio(&haystack[start..end]));
            if best >= 100.0 {
                return best;
            }
        }
    }

    // Suffix windows shorter than the needle.
    for start in (haystack.len() - len + 1)..haystack.len() {
        if pattern.contains(haystack[start]) {
            best = best.max(pattern.window_ratio(&haystack[start..]));
            if best >= 100.0 {
                return best;
            }
        }
    }

    best
}

/// Bit masks of character positions in a pattern, one `u64` per 64 chars.
struct Pattern {
    len: usize,
    words: usize,
    masks: HashMap<char, Vec<u64>>,
}

impl Pattern {
    fn new(chars: &[char]) -> Self {
        let words = chars.len().div_ceil(64).max(1);
        let mut masks: HashMap<char, Vec<u64>> = HashMap::new();
        for (i, ch) in chars.iter().enumerate() {
            let mask = masks.entry(*ch).or_insert_with(|| vec![0; words]);
            mask[i / 64] |= 1u64 << (i % 64);
        }
        Self {
            len: chars.len(),
            words,
            masks,
        }
    }

    fn contains(&self, ch: char) -> bool {
        self.masks.contains_key(&ch)
    }

    fn window_ratio(&self, window: &[char]) -> f64 {
        let total = self.len + window.len();
        100.0 * (2 * self.lcs(window)) as f64 / total as f64
    }

    /// Length of the longest common subsequence with `text` (Hyyrö).
    fn lcs(&self, text: &[char]) -> usize {
        if self.len == 0 || text.is_empty() {
            return 0;
        }

        let mut v = vec![u64::MAX; self.words];
        for ch in text {
            let Some(mask) = self.masks.get(ch) else {
                continue;
            };
            let mut carry = 0u64;
            for (word, m) in v.iter_mut().zip(mask) {
                let u = *word & m;
                let (sum, c1) = word.overflowing_add(u);
                let (sum, c2) = sum.overflowing_add(carry);
                carry = u64::from(c1 || c2);
                *word = sum | (*word & !m);
            }
        }

        let mut matched = 0;
        for (i, word) in v.iter().enumerate() {
            let bits = (self.len - i * 64).min(64);
            let valid = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
            matched += (!word & valid).count_ones() as usize;
        }
        matched
    }
}
