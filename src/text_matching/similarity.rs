//! Normalized edit-distance similarity for short strings
//!
//! Substitutions cost 2 (a delete plus an insert), so two strings sharing no
//! characters score 0.0 and identical strings score 1.0.

/// Edit distance where insertions and deletions cost 1 and substitutions 2
pub fn indel_distance(a: &[char], b: &[char]) -> usize {
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
            let substitution = previous[j] + if ca == cb { 0 } else { 2 };
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Similarity in [0.0, 1.0]: `(|a| + |b| - distance) / (|a| + |b|)`
pub fn similarity_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let distance = indel_distance(a, b);
    (total - distance) as f64 / total as f64
}

/// Same as [`similarity_ratio`] for string slices
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    similarity_ratio(&a, &b)
}
