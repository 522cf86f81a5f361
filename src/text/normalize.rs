use unicode_normalization::UnicodeNormalization;

/// Folds case, trims, collapses internal whitespace, and strips every
/// character that is not a Unicode letter or digit.
///
/// Pure, total, and idempotent: `normalize(normalize(x)) == normalize(x)`
/// because the output never contains anything but lowercase alphanumerics
/// separated by single ASCII spaces.
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;
    let mut wrote_any = false;

    for ch in s.nfkc() {
        for lower in ch.to_lowercase() {
            if lower.is_alphanumeric() {
                if pending_space && wrote_any {
                    out.push(' ');
                }
                pending_space = false;
                out.push(lower);
                wrote_any = true;
            } else if lower.is_whitespace() {
                pending_space = true;
            }
            // Any other punctuation/symbol is dropped without introducing a
            // word boundary — keeping dashes inside tokens is a non-goal.
        }
    }

    out
}
