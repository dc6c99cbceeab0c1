//! Edit distance over Unicode scalar values.
//!
//! Classic Levenshtein dynamic programming with rolling rows. With
//! `transposition` enabled the optimal-string-alignment rule also applies:
//! swapping two adjacent characters costs one edit ("hlep" -> "help").

/// Edit distance between `a` and `b`.
pub fn edit_distance(a: &str, b: &str, transposition: bool) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    edit_distance_chars(&a, &b, transposition)
}

pub fn edit_distance_chars(a: &[char], b: &[char], transposition: bool) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let width = b.len() + 1;
    // Row i-2, only read when transposition is on.
    let mut before_prev: Vec<usize> = vec![0; width];
    let mut prev: Vec<usize> = (0..width).collect();
    let mut cur: Vec<usize> = vec![0; width];

    for i in 1..=a.len() {
        cur[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
            if transposition && i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(before_prev[j - 2] + 1);
            }
            cur[j] = best;
        }
        std::mem::swap(&mut before_prev, &mut prev);
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[b.len()]
}
