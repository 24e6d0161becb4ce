//! Heuristic password strength scoring on a fixed 0-5 scale.
//!
//! This is a quick meter for interactive feedback, not an entropy
//! estimate. The rules are additive and deterministic; the only required
//! property is that the same input always gets the same score.

/// Ascending runs that cost a point when present anywhere in the password.
const SEQUENCES: [&str; 12] = [
    "abc", "bcd", "cde", "def", "efg", "123", "234", "345", "456", "567", "678", "789",
];

/// Well-known weak substrings, matched case-insensitively.
const WEAK_TOKENS: [&str; 4] = ["password", "123456", "qwerty", "admin"];

const LABELS: [&str; 6] = ["Very Weak", "Weak", "Fair", "Good", "Strong", "Very Strong"];

/// Result of scoring a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrengthReport {
    /// Clamped to 0..=5.
    pub score: u8,
    pub label: &'static str,
}

/// Score a password.
///
/// Length tiers award +3 (>= 12), +2 (>= 8) or +1 (>= 6); each present
/// character class adds +1; a run of three identical characters costs 1,
/// an ascending sequence costs 1 and a known weak token costs 2. The sum
/// is clamped to 0..=5 and mapped to a label. The empty password is a
/// special case reported as "None".
pub fn evaluate(password: &str) -> StrengthReport {
    if password.is_empty() {
        return StrengthReport {
            score: 0,
            label: "None",
        };
    }

    let mut score: i32 = 0;

    let length = password.chars().count();
    if length >= 12 {
        score += 3;
    } else if length >= 8 {
        score += 2;
    } else if length >= 6 {
        score += 1;
    }

    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 1;
    }

    if has_repeated_run(password) {
        score -= 1;
    }

    let lowered = password.to_lowercase();
    if SEQUENCES.iter().any(|s| lowered.contains(s)) {
        score -= 1;
    }
    if WEAK_TOKENS.iter().any(|t| lowered.contains(t)) {
        score -= 2;
    }

    let score = score.clamp(0, 5) as u8;
    StrengthReport {
        score,
        label: LABELS[score as usize],
    }
}

/// Three or more consecutive identical characters.
fn has_repeated_run(password: &str) -> bool {
    let mut run = 0usize;
    let mut previous: Option<char> = None;
    for c in password.chars() {
        if previous == Some(c) {
            run += 1;
            if run >= 3 {
                return true;
            }
        } else {
            previous = Some(c);
            run = 1;
        }
    }
    false
}
