//! String similarity used for fuzzy resolution and suggestions.

/// Score how alike two names are, in `[0.0, 1.0]`.
///
/// Case-insensitive and symmetric. Equality scores 1.0, a prefix 0.9 and a
/// substring 0.7; anything else falls back to normalized edit distance.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a == b {
        return 1.0;
    }
    if a.starts_with(&b) || b.starts_with(&a) {
        return 0.9;
    }
    if a.contains(&b) || b.contains(&a) {
        return 0.7;
    }

    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / max_len as f64
}

/// Edit distance counting single-character insertions, deletions and
/// substitutions.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j] + cost)
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("flux", "flux"), 0);
    }

    #[test]
    fn test_exact_is_case_insensitive() {
        assert_eq!(similarity("Flux", "flux"), 1.0);
    }

    #[test]
    fn test_prefix_and_substring() {
        assert_eq!(similarity("imagetovide", "imagetovideo"), 0.9);
        assert_eq!(similarity("image-to-video", "video"), 0.7);
    }

    #[test]
    fn test_edit_distance_fallback() {
        let score = similarity("image-to-vidoe", "image-to-video");
        assert!((score - (1.0 - 2.0 / 14.0)).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric() {
        assert_eq!(similarity("upscale", "upscaler"), similarity("upscaler", "upscale"));
        assert_eq!(similarity("kling", "wan"), similarity("wan", "kling"));
    }
}
