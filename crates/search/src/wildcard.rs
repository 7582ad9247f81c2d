//! Anchored glob matching
//!
//! `*` matches zero or more characters, `?` matches exactly one, and a
//! backslash escapes the next wildcard or escape character into a literal.
//! Matching is anchored to the full target: `abc` does not match pattern
//! `b`, only `*b*` does.
//!
//! Patterns are expected to have been normalized by [`clean_pattern`]
//! before matching; [`crate::WildcardQuery`] does this at construction.

/// Normalize a raw pattern for matching.
///
/// Collapses runs of `*` into a single `*` and keeps `\*`, `\?`, and `\\`
/// as escape pairs. Any other escape sequence passes through unchanged. A
/// dangling trailing backslash is kept and matches a literal backslash.
pub fn clean_pattern(pattern: &str) -> String {
    let mut cleaned = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                cleaned.push('\\');
                if let Some(next) = chars.next() {
                    cleaned.push(next);
                }
            }
            '*' => {
                cleaned.push('*');
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
            }
            _ => cleaned.push(c),
        }
    }
    cleaned
}

/// One pattern position that consumes exactly one target character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// `?` - any single character
    Any,
    /// A literal character (escapes already resolved)
    Literal(char),
}

/// Match `target` against a cleaned pattern.
///
/// The pattern is split on unescaped `*` into segments of literal/`?`
/// tokens: the first segment must match a prefix of the target, the last a
/// suffix, and interior segments are located in order left to right. The
/// empty pattern matches only the empty target; `"*"` matches everything.
/// Case-insensitive matching folds ASCII letters.
pub fn wildcard_match(target: &str, pattern: &str, case_sensitive: bool) -> bool {
    let (mut segments, leading_star, trailing_star) = parse_segments(pattern);
    if !case_sensitive {
        for segment in &mut segments {
            for token in segment.iter_mut() {
                if let Token::Literal(c) = token {
                    *c = c.to_ascii_lowercase();
                }
            }
        }
    }

    let target: Vec<char> = if case_sensitive {
        target.chars().collect()
    } else {
        target.chars().map(|c| c.to_ascii_lowercase()).collect()
    };

    if segments.is_empty() {
        // Pattern was empty or a lone `*`
        return leading_star || target.is_empty();
    }

    // A pattern with no `*` must cover the target exactly
    if segments.len() == 1 && !leading_star && !trailing_star {
        let segment = &segments[0];
        return segment.len() == target.len() && segment_matches_at(&target, 0, segment);
    }

    let mut lo = 0;
    let mut hi = target.len();
    let mut first = 0;
    let mut last = segments.len();

    if !leading_star {
        let segment = &segments[0];
        if segment.len() > hi || !segment_matches_at(&target, 0, segment) {
            return false;
        }
        lo = segment.len();
        first = 1;
    }
    if !trailing_star {
        let segment = &segments[segments.len() - 1];
        if segment.len() > hi - lo {
            return false;
        }
        let start = hi - segment.len();
        if !segment_matches_at(&target, start, segment) {
            return false;
        }
        hi = start;
        last -= 1;
    }

    // Interior segments float: take the leftmost position for each in turn,
    // which is the greedy placement the `*` boundaries allow.
    for segment in &segments[first..last] {
        match find_segment(&target, lo, hi, segment) {
            Some(at) => lo = at + segment.len(),
            None => return false,
        }
    }
    true
}

/// Split a cleaned pattern on unescaped `*`.
///
/// Returns the non-empty segments plus whether the pattern begins and ends
/// with a `*`.
fn parse_segments(pattern: &str) -> (Vec<Vec<Token>>, bool, bool) {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    let mut leading_star = false;
    let mut trailing_star = false;
    let mut at_start = true;

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if at_start {
                    leading_star = true;
                }
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                trailing_star = true;
            }
            '?' => {
                current.push(Token::Any);
                trailing_star = false;
            }
            '\\' => {
                // Backslash escapes wildcards and itself; before anything
                // else it is an ordinary literal.
                match chars.peek() {
                    Some(&next) if matches!(next, '*' | '?' | '\\') => {
                        chars.next();
                        current.push(Token::Literal(next));
                    }
                    _ => current.push(Token::Literal('\\')),
                }
                trailing_star = false;
            }
            _ => {
                current.push(Token::Literal(c));
                trailing_star = false;
            }
        }
        at_start = false;
    }
    if !current.is_empty() {
        segments.push(current);
    }
    (segments, leading_star, trailing_star)
}

/// Test a segment at a fixed target position.
fn segment_matches_at(target: &[char], at: usize, segment: &[Token]) -> bool {
    if at + segment.len() > target.len() {
        return false;
    }
    segment.iter().zip(&target[at..]).all(|(token, &c)| match token {
        Token::Any => true,
        Token::Literal(lit) => *lit == c,
    })
}

/// Find the leftmost position in `[lo, hi)` where the segment matches.
fn find_segment(target: &[char], lo: usize, hi: usize, segment: &[Token]) -> Option<usize> {
    if segment.len() > hi - lo {
        return None;
    }
    (lo..=hi - segment.len()).find(|&at| segment_matches_at(target, at, segment))
}
