//! RFC 6238 time-based one-time passcodes (HMAC-SHA1).

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::secret::SharedSecret;

/// Default window length in seconds.
pub const DEFAULT_PERIOD_SECS: u64 = 30;

/// Default number of code digits.
pub const DEFAULT_DIGITS: u32 = 6;

/// TOTP parameters shared by challenge and verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotpParams {
    /// Window length in seconds.
    pub period_secs: u64,
    /// Code length (6 or 8).
    pub digits: u32,
    /// Adjacent windows accepted on each side of the current one (0 or 1).
    pub skew_windows: u64,
}

impl Default for TotpParams {
    fn default() -> Self {
        Self {
            period_secs: DEFAULT_PERIOD_SECS,
            digits: DEFAULT_DIGITS,
            skew_windows: 0,
        }
    }
}

/// A one-time passcode.  Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OtpCode([REDACTED])")
    }
}

/// Index of the window containing `at`.  Instants before the epoch map to 0.
pub fn window_index(at: DateTime<Utc>, params: &TotpParams) -> u64 {
    let secs = u64::try_from(at.timestamp()).unwrap_or(0);
    secs / params.period_secs.max(1)
}

/// Compute the code for the window containing `at`.
pub fn code_at(secret: &SharedSecret, at: DateTime<Utc>, params: &TotpParams) -> OtpCode {
    code_for_window(secret, window_index(at, params), params.digits)
}

/// HOTP (RFC 4226) over a window counter.
pub fn code_for_window(secret: &SharedSecret, counter: u64, digits: u32) -> OtpCode {
    // HMAC accepts keys of any length.
    let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC-SHA1 accepts any key length"));
    mac.update(&counter.to_be_bytes());
    let mut digest: [u8; 20] = mac.finalize().into_bytes().into();

    // Dynamic truncation.
    let offset = usize::from(digest[digest.len() - 1] & 0x0f);
    let binary = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);
    digest.zeroize();

    // The truncated value is 31 bits, so with ten or more digits there
    // is nothing to reduce.
    let value = match 10u32.checked_pow(digits) {
        Some(modulus) => binary % modulus,
        None => binary,
    };
    OtpCode(format!("{value:0width$}", width = digits as usize))
}

/// Check `submitted` against the window containing `at` (and, with skew,
/// its neighbours).
///
/// Every candidate window is compared in constant time and the results
/// are OR-ed, so timing does not reveal which window matched.
pub fn verify_code(
    secret: &SharedSecret,
    submitted: &str,
    at: DateTime<Utc>,
    params: &TotpParams,
) -> bool {
    let current = window_index(at, params);
    let first = current.saturating_sub(params.skew_windows);
    let last = current.saturating_add(params.skew_windows);

    let submitted = submitted.trim().as_bytes();
    let mut matched = subtle::Choice::from(0u8);
    for window in first..=last {
        let expected = code_for_window(secret, window, params.digits);
        matched |= expected.as_str().as_bytes().ct_eq(submitted);
    }
    matched.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rfc_secret() -> SharedSecret {
        SharedSecret::from_bytes(b"12345678901234567890".to_vec()).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn eight_digits() -> TotpParams {
        TotpParams {
            digits: 8,
            ..TotpParams::default()
        }
    }

    #[test]
    fn rfc6238_sha1_vectors() {
        let secret = rfc_secret();
        let p = eight_digits();
        assert_eq!(code_at(&secret, at(59), &p).as_str(), "94287082");
        assert_eq!(code_at(&secret, at(1_111_111_109), &p).as_str(), "07081804");
        assert_eq!(code_at(&secret, at(1_111_111_111), &p).as_str(), "14050471");
        assert_eq!(code_at(&secret, at(1_234_567_890), &p).as_str(), "89005924");
        assert_eq!(code_at(&secret, at(2_000_000_000), &p).as_str(), "69279037");
    }

    #[test]
    fn six_digit_codes_are_low_digits_of_rfc_vectors() {
        let secret = rfc_secret();
        let p = TotpParams::default();
        assert_eq!(code_at(&secret, at(59), &p).as_str(), "287082");
        assert_eq!(code_at(&secret, at(1_111_111_109), &p).as_str(), "081804");
    }

    #[test]
    fn same_window_same_code() {
        let secret = rfc_secret();
        let p = TotpParams::default();
        assert_eq!(code_at(&secret, at(30), &p), code_at(&secret, at(59), &p));
    }

    #[test]
    fn verify_exact_window_only_by_default() {
        let secret = rfc_secret();
        let p = TotpParams::default();
        let code = code_at(&secret, at(59), &p);
        assert!(verify_code(&secret, code.as_str(), at(59), &p));
        assert!(verify_code(&secret, code.as_str(), at(30), &p));
        assert!(!verify_code(&secret, code.as_str(), at(90), &p));
        assert!(!verify_code(&secret, code.as_str(), at(29), &p));
    }

    #[test]
    fn verify_with_skew_accepts_adjacent_windows_only() {
        let secret = rfc_secret();
        let p = TotpParams {
            skew_windows: 1,
            ..TotpParams::default()
        };
        let code = code_at(&secret, at(1_000), &p);
        assert!(verify_code(&secret, code.as_str(), at(1_000 - 30), &p));
        assert!(verify_code(&secret, code.as_str(), at(1_000 + 30), &p));
        assert!(!verify_code(&secret, code.as_str(), at(1_000 + 60), &p));
    }

    #[test]
    fn verify_rejects_wrong_length_and_garbage() {
        let secret = rfc_secret();
        let p = TotpParams::default();
        assert!(!verify_code(&secret, "", at(59), &p));
        assert!(!verify_code(&secret, "28708", at(59), &p));
        assert!(!verify_code(&secret, "2870822", at(59), &p));
        assert!(!verify_code(&secret, "abcdef", at(59), &p));
    }

    #[test]
    fn long_codes_do_not_overflow() {
        let secret = rfc_secret();
        for digits in [10, 12, 32] {
            let code = code_for_window(&secret, 1, digits);
            assert_eq!(code.as_str().len(), digits as usize);
            assert!(code.as_str().ends_with("94287082"));
        }
    }

    #[test]
    fn verify_trims_surrounding_whitespace() {
        let secret = rfc_secret();
        let p = TotpParams::default();
        assert!(verify_code(&secret, " 287082\n", at(59), &p));
    }
}
