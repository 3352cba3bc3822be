//! Handle templating detection.
//!
//! Sybil farms mint handles from templates (`farm_user01`, `farm_user02`,
//! ...). Two normalizations expose that: the *stem* (alphanumerics with the
//! trailing digit run stripped) groups handles that differ only by counter,
//! and the *shape* (letters -> `a`, digits -> `d`, other runs -> `_`) groups
//! handles cut from the same pattern.

/// Normalized views of a handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleNorm {
    /// Lowercased, trimmed handle.
    pub normalized: String,
    /// Normalized handle with non-alphanumerics stripped.
    pub alnum: String,
    /// `alnum` with the trailing digit run stripped.
    pub stem: String,
    /// Character-class shape of the normalized handle.
    pub shape: String,
    /// Whether `alnum` ends with three or more digits.
    pub numeric_suffix: bool,
}

/// Compute the normalized views of a handle.
#[must_use]
pub fn normalize_handle(handle: &str) -> HandleNorm {
    let normalized = handle.trim().to_lowercase();
    let alnum: String = normalized.chars().filter(|c| c.is_alphanumeric()).collect();
    let stem = alnum.trim_end_matches(|c: char| c.is_ascii_digit()).to_string();

    let mut shape = String::with_capacity(normalized.len());
    for c in normalized.chars() {
        let class = if c.is_alphabetic() {
            'a'
        } else if c.is_ascii_digit() {
            'd'
        } else {
            '_'
        };
        if class == '_' && shape.ends_with('_') {
            continue;
        }
        shape.push(class);
    }

    let suffix_digits = alnum
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();

    HandleNorm {
        normalized,
        alnum,
        stem,
        shape,
        numeric_suffix: suffix_digits >= 3,
    }
}

/// Combine population counts into the handle pattern score.
///
/// `stem_count` and `shape_count` are how many actors share this handle's
/// stem and shape respectively (including the actor itself).
#[must_use]
pub fn handle_pattern_score(stem_count: usize, shape_count: usize, numeric_suffix: bool) -> f64 {
    let stem_score = ((stem_count.saturating_sub(1)) as f64 / 10.0).clamp(0.0, 1.0);
    let shape_score = ((shape_count.saturating_sub(1)) as f64 / 20.0).clamp(0.0, 1.0);
    let suffix_score = if numeric_suffix { 0.4 } else { 0.0 };
    (0.5 * stem_score + 0.3 * shape_score + suffix_score).clamp(0.0, 1.0)
}
