//! Verification code generation.

use rand::distributions::{Distribution, Uniform};

/// The characters verification codes consist of.
const CODE_CHARS: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// The length of a verification code.
pub(crate) const CODE_LENGTH: usize = 6;

/// Generates a random verification code.
pub(crate) fn generate() -> String {
    Uniform::from(0..CODE_CHARS.len())
        .sample_iter(rand::thread_rng())
        .take(CODE_LENGTH)
        .map(|index| CODE_CHARS[index])
        .collect()
}
