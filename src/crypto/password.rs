//! Random password generation for new records.

use rand::Rng;
use zeroize::Zeroizing;

/// Length of a generated password.
pub const GENERATED_PASSWORD_LEN: usize = 16;

/// Letters, digits and ASCII punctuation (94 printable characters).
pub const PASSWORD_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
abcdefghijklmnopqrstuvwxyz\
0123456789\
!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Generate a 16-character password drawn uniformly from `PASSWORD_CHARSET`.
///
/// Uses the thread-local CSPRNG (ChaCha seeded from the OS).
pub fn generate_password() -> Zeroizing<String> {
    let mut rng = rand::rng();
    let password: String = (0..GENERATED_PASSWORD_LEN)
        .map(|_| char::from(PASSWORD_CHARSET[rng.random_range(0..PASSWORD_CHARSET.len())]))
        .collect();
    Zeroizing::new(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_has_94_distinct_characters() {
        let mut chars = PASSWORD_CHARSET.to_vec();
        chars.sort_unstable();
        chars.dedup();
        assert_eq!(chars.len(), 94);
        assert!(PASSWORD_CHARSET.iter().all(|b| b.is_ascii_graphic()));
    }

    #[test]
    fn generated_password_has_expected_shape() {
        let pw = generate_password();
        assert_eq!(pw.chars().count(), GENERATED_PASSWORD_LEN);
        assert!(pw.bytes().all(|b| PASSWORD_CHARSET.contains(&b)));
    }

    #[test]
    fn generated_passwords_differ() {
        assert_ne!(*generate_password(), *generate_password());
    }
}
