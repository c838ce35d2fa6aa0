//! One-shot OTP gate guarding vault unlock.
//!
//! ```text
//! Idle --issue_challenge--> ChallengeIssued --verify--> Verified | Denied
//! ```
//!
//! `Verified` and `Denied` are terminal.  There is no retry: a gate that
//! denied once stays denied, and a new session needs a new gate.

use chrono::{DateTime, Utc};

use super::secret::SharedSecret;
use super::totp::{self, OtpCode, TotpParams};

/// Current position in the unlock state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    ChallengeIssued,
    Verified,
    Denied,
}

impl GateState {
    /// Returns `true` for `Verified` and `Denied`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Verified | Self::Denied)
    }
}

/// Stateful wrapper around TOTP challenge and verification.
#[derive(Debug)]
pub struct OtpGate {
    params: TotpParams,
    state: GateState,
}

impl OtpGate {
    pub fn new(params: TotpParams) -> Self {
        Self {
            params,
            state: GateState::Idle,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn params(&self) -> &TotpParams {
        &self.params
    }

    /// Produce the code for the window containing `at`.
    ///
    /// Issuing again before verification just recomputes the code; once
    /// the gate is terminal the state is left untouched.
    pub fn issue_challenge(&mut self, secret: &SharedSecret, at: DateTime<Utc>) -> OtpCode {
        if !self.state.is_terminal() {
            self.state = GateState::ChallengeIssued;
        }
        totp::code_at(secret, at, &self.params)
    }

    /// Check `submitted` for the window containing `at`.
    ///
    /// Only a gate in `ChallengeIssued` can be verified.  Verifying from
    /// `Idle` denies; verifying a terminal gate returns `false` and never
    /// re-opens it.
    pub fn verify(&mut self, secret: &SharedSecret, submitted: &str, at: DateTime<Utc>) -> bool {
        match self.state {
            GateState::ChallengeIssued => {
                let ok = totp::verify_code(secret, submitted, at, &self.params);
                self.state = if ok {
                    GateState::Verified
                } else {
                    GateState::Denied
                };
                ok
            }
            GateState::Idle => {
                self.state = GateState::Denied;
                false
            }
            GateState::Verified | GateState::Denied => false,
        }
    }
}

impl Default for OtpGate {
    fn default() -> Self {
        Self::new(TotpParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn secret() -> SharedSecret {
        SharedSecret::from_bytes(b"12345678901234567890".to_vec()).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_010, 0).unwrap()
    }

    #[test]
    fn starts_idle() {
        assert_eq!(OtpGate::default().state(), GateState::Idle);
    }

    #[test]
    fn correct_code_verifies() {
        let s = secret();
        let mut gate = OtpGate::default();
        let code = gate.issue_challenge(&s, t0());
        assert_eq!(gate.state(), GateState::ChallengeIssued);
        assert!(gate.verify(&s, code.as_str(), t0()));
        assert_eq!(gate.state(), GateState::Verified);
    }

    #[test]
    fn wrong_code_denies_permanently() {
        let s = secret();
        let mut gate = OtpGate::default();
        let code = gate.issue_challenge(&s, t0());
        assert!(!gate.verify(&s, "000000x", t0()));
        assert_eq!(gate.state(), GateState::Denied);

        // No second chance, even with the right code.
        assert!(!gate.verify(&s, code.as_str(), t0()));
        gate.issue_challenge(&s, t0());
        assert_eq!(gate.state(), GateState::Denied);
    }

    #[test]
    fn code_from_previous_window_is_denied() {
        let s = secret();
        let mut gate = OtpGate::default();
        let code = gate.issue_challenge(&s, t0());
        assert!(!gate.verify(&s, code.as_str(), t0() + Duration::seconds(31)));
        assert_eq!(gate.state(), GateState::Denied);
    }

    #[test]
    fn verify_without_challenge_denies() {
        let s = secret();
        let code = totp::code_at(&s, t0(), &TotpParams::default());
        let mut gate = OtpGate::default();
        assert!(!gate.verify(&s, code.as_str(), t0()));
        assert_eq!(gate.state(), GateState::Denied);
    }

    #[test]
    fn verified_gate_is_not_reusable() {
        let s = secret();
        let mut gate = OtpGate::default();
        let code = gate.issue_challenge(&s, t0());
        assert!(gate.verify(&s, code.as_str(), t0()));
        assert!(!gate.verify(&s, code.as_str(), t0()));
        assert_eq!(gate.state(), GateState::Verified);
    }
}
