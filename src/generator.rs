//! Random password generation from selectable character classes.

use rand::Rng;

pub const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
pub const DIGITS: &[u8] = b"0123456789";
pub const SYMBOLS: &[u8] = b"!@#$%^&*()_+~`|}{[]:;?><,./-=";

/// Which character classes to draw from, and how many characters to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: 16,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
        }
    }
}

impl GeneratorOptions {
    /// The alphabet implied by the enabled classes, in fixed class order.
    /// An all-false configuration falls back to lowercase + digits so the
    /// alphabet is never empty.
    pub fn alphabet(&self) -> Vec<u8> {
        let mut chars = Vec::new();
        if self.uppercase {
            chars.extend_from_slice(UPPERCASE);
        }
        if self.lowercase {
            chars.extend_from_slice(LOWERCASE);
        }
        if self.digits {
            chars.extend_from_slice(DIGITS);
        }
        if self.symbols {
            chars.extend_from_slice(SYMBOLS);
        }
        if chars.is_empty() {
            chars.extend_from_slice(LOWERCASE);
            chars.extend_from_slice(DIGITS);
        }
        chars
    }
}

/// Generate a random password of exactly `options.length` characters.
///
/// Characters are sampled uniformly with replacement from the enabled
/// classes. A fix-up pass then patches one random position per enabled
/// class that ended up unrepresented. Fixes are applied in class order and
/// may overwrite each other, so class presence is best effort, not
/// guaranteed.
pub fn generate(options: &GeneratorOptions) -> String {
    let mut rng = rand::thread_rng();
    let alphabet = options.alphabet();

    let mut password: Vec<u8> = (0..options.length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect();

    if !password.is_empty() {
        let classes: [(bool, &[u8]); 4] = [
            (options.uppercase, UPPERCASE),
            (options.lowercase, LOWERCASE),
            (options.digits, DIGITS),
            (options.symbols, SYMBOLS),
        ];
        for (enabled, class) in classes {
            if enabled && !password.iter().any(|c| class.contains(c)) {
                let pos = rng.gen_range(0..password.len());
                password[pos] = class[rng.gen_range(0..class.len())];
            }
        }
    }

    // Alphabet bytes are all ASCII.
    password.iter().map(|&c| c as char).collect()
}
