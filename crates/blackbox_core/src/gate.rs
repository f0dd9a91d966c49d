//! Session gate state machine.
//!
//! # Responsibility
//! - Hold lock state and the 4-digit credential buffer.
//! - Drive timed authenticate/reject transitions without blocking callers.
//!
//! # Invariants
//! - The credential buffer never exceeds 4 digits.
//! - A scheduled transition fires only while the gate is still in the state
//!   that scheduled it; any other transition invalidates it.
//! - Rejection is uniform: no attempt counting, no lockout, no detail about
//!   which digits mismatched.

use log::info;
use std::time::{Duration, Instant};

/// Number of digits in the reference credential.
pub const PIN_LENGTH: usize = 4;

/// Demo-grade default credential, surfaced to the user as recoverable.
pub const DEFAULT_PIN: &str = "1984";

/// Gate lifecycle states.
///
/// `Authenticating` and `Rejected` are transient and resolve through
/// [`SessionGate::poll`] once their deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Locked, accepting digit input.
    LockedInput,
    /// Credential matched, holding for the authenticate delay.
    Authenticating,
    /// Access granted.
    Unlocked,
    /// Credential mismatched, holding for the rejection-signal delay.
    Rejected,
}

/// Events produced when a deferred transition resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    /// Authenticate delay elapsed, gate is now `Unlocked`.
    Unlocked,
    /// Rejection signal elapsed, gate is back to `LockedInput`.
    RejectionCleared,
}

/// Gate tuning knobs.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Reference credential, compared by exact match.
    pub pin: String,
    /// Hold time in `Authenticating` before granting access.
    pub authenticate_delay: Duration,
    /// Hold time in `Rejected` before accepting input again.
    pub reject_delay: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            pin: DEFAULT_PIN.to_string(),
            authenticate_delay: Duration::from_millis(1500),
            reject_delay: Duration::from_millis(500),
        }
    }
}

/// Deferred transition armed by `attempt_unlock`.
///
/// `armed_in` pins the transition to the state that scheduled it, so a stale
/// deadline can never fire after the gate moved on.
#[derive(Debug, Clone, Copy)]
struct PendingTransition {
    due: Instant,
    armed_in: GateState,
}

/// Lock/authentication state machine guarding vault access.
#[derive(Debug)]
pub struct SessionGate {
    state: GateState,
    buffer: Vec<u8>,
    config: GateConfig,
    pending: Option<PendingTransition>,
}

impl SessionGate {
    /// Creates a locked gate with the provided configuration.
    pub fn new(config: GateConfig) -> Self {
        Self {
            state: GateState::LockedInput,
            buffer: Vec::with_capacity(PIN_LENGTH),
            config,
            pending: None,
        }
    }

    /// Current gate state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Number of digits currently buffered.
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether access is currently granted.
    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    /// Appends one digit (0-9) to the credential buffer.
    ///
    /// No-op when the buffer is full, when the value is not a digit, or when
    /// the gate is not accepting input.
    pub fn submit_digit(&mut self, digit: u8) {
        if self.state != GateState::LockedInput {
            return;
        }
        if digit > 9 || self.buffer.len() >= PIN_LENGTH {
            return;
        }
        self.buffer.push(digit);
    }

    /// Removes the most recent buffered digit, if any.
    pub fn delete_digit(&mut self) {
        if self.state == GateState::LockedInput {
            self.buffer.pop();
        }
    }

    /// Validates the buffered credential against the reference pin.
    ///
    /// Valid only from `LockedInput` with exactly 4 buffered digits; any
    /// other call is a no-op. On match the gate holds in `Authenticating`
    /// until the authenticate delay elapses; on mismatch it signals
    /// `Rejected`, clears the buffer and returns to input after the reject
    /// delay. Both resolutions happen through [`SessionGate::poll`].
    pub fn attempt_unlock(&mut self, now: Instant) {
        if self.state != GateState::LockedInput || self.buffer.len() != PIN_LENGTH {
            return;
        }

        let entered: String = self.buffer.iter().map(|d| (b'0' + d) as char).collect();
        if entered == self.config.pin {
            info!("event=gate_attempt module=gate status=accepted");
            self.transition(GateState::Authenticating);
            self.pending = Some(PendingTransition {
                due: now + self.config.authenticate_delay,
                armed_in: GateState::Authenticating,
            });
        } else {
            // Uniform rejection; the entered digits are never logged.
            info!("event=gate_attempt module=gate status=rejected");
            self.buffer.clear();
            self.transition(GateState::Rejected);
            self.pending = Some(PendingTransition {
                due: now + self.config.reject_delay,
                armed_in: GateState::Rejected,
            });
        }
    }

    /// Synchronously returns to `LockedInput`.
    ///
    /// Valid only from `Unlocked`; callers own discarding editor state.
    pub fn relock(&mut self) {
        if self.state != GateState::Unlocked {
            return;
        }
        info!("event=gate_relock module=gate status=ok");
        self.buffer.clear();
        self.transition(GateState::LockedInput);
    }

    /// Fires the scheduled transition when due.
    ///
    /// Returns the resolved event, or `None` when nothing is due. A deadline
    /// armed by a state the gate has since left is dropped without effect.
    pub fn poll(&mut self, now: Instant) -> Option<GateEvent> {
        let pending = self.pending?;
        if pending.armed_in != self.state {
            self.pending = None;
            return None;
        }
        if now < pending.due {
            return None;
        }

        self.pending = None;
        match self.state {
            GateState::Authenticating => {
                self.buffer.clear();
                self.state = GateState::Unlocked;
                info!("event=gate_unlock module=gate status=ok");
                Some(GateEvent::Unlocked)
            }
            GateState::Rejected => {
                self.state = GateState::LockedInput;
                Some(GateEvent::RejectionCleared)
            }
            _ => None,
        }
    }

    fn transition(&mut self, next: GateState) {
        self.state = next;
        self.pending = None;
    }
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{GateConfig, GateEvent, GateState, SessionGate, PIN_LENGTH};
    use std::time::{Duration, Instant};

    fn enter(gate: &mut SessionGate, pin: &str) {
        for ch in pin.chars() {
            gate.submit_digit(ch as u8 - b'0');
        }
    }

    #[test]
    fn buffer_is_capped_at_pin_length() {
        let mut gate = SessionGate::default();
        for digit in [1, 9, 8, 4, 7, 7, 7] {
            gate.submit_digit(digit);
        }
        assert_eq!(gate.buffer_len(), PIN_LENGTH);
    }

    #[test]
    fn non_digit_input_is_ignored() {
        let mut gate = SessionGate::default();
        gate.submit_digit(10);
        gate.submit_digit(255);
        assert_eq!(gate.buffer_len(), 0);
    }

    #[test]
    fn delete_digit_pops_last_entry() {
        let mut gate = SessionGate::default();
        enter(&mut gate, "19");
        gate.delete_digit();
        assert_eq!(gate.buffer_len(), 1);
        gate.delete_digit();
        gate.delete_digit();
        assert_eq!(gate.buffer_len(), 0);
    }

    #[test]
    fn attempt_with_short_buffer_is_noop() {
        let mut gate = SessionGate::default();
        enter(&mut gate, "198");
        gate.attempt_unlock(Instant::now());
        assert_eq!(gate.state(), GateState::LockedInput);
        assert_eq!(gate.buffer_len(), 3);
    }

    #[test]
    fn correct_pin_unlocks_after_authenticate_delay() {
        let mut gate = SessionGate::default();
        let start = Instant::now();
        enter(&mut gate, "1984");
        gate.attempt_unlock(start);
        assert_eq!(gate.state(), GateState::Authenticating);

        // Not due yet.
        assert_eq!(gate.poll(start + Duration::from_millis(100)), None);
        assert_eq!(gate.state(), GateState::Authenticating);

        let event = gate.poll(start + Duration::from_millis(1500));
        assert_eq!(event, Some(GateEvent::Unlocked));
        assert_eq!(gate.state(), GateState::Unlocked);
        assert_eq!(gate.buffer_len(), 0);
    }

    #[test]
    fn wrong_pin_rejects_then_returns_to_input() {
        let mut gate = SessionGate::default();
        let start = Instant::now();
        enter(&mut gate, "0000");
        gate.attempt_unlock(start);
        assert_eq!(gate.state(), GateState::Rejected);
        assert_eq!(gate.buffer_len(), 0);

        let event = gate.poll(start + Duration::from_millis(500));
        assert_eq!(event, Some(GateEvent::RejectionCleared));
        assert_eq!(gate.state(), GateState::LockedInput);
    }

    #[test]
    fn input_is_ignored_while_rejected() {
        let mut gate = SessionGate::default();
        let start = Instant::now();
        enter(&mut gate, "0000");
        gate.attempt_unlock(start);
        gate.submit_digit(1);
        assert_eq!(gate.buffer_len(), 0);
    }

    #[test]
    fn relock_is_synchronous_and_only_valid_from_unlocked() {
        let mut gate = SessionGate::default();
        let start = Instant::now();

        // Relock from locked is a no-op.
        gate.relock();
        assert_eq!(gate.state(), GateState::LockedInput);

        enter(&mut gate, "1984");
        gate.attempt_unlock(start);
        gate.poll(start + Duration::from_millis(1500));
        assert_eq!(gate.state(), GateState::Unlocked);

        gate.relock();
        assert_eq!(gate.state(), GateState::LockedInput);
        assert_eq!(gate.buffer_len(), 0);
    }

    #[test]
    fn stale_deadline_never_fires_after_state_change() {
        let mut gate = SessionGate::new(GateConfig {
            pin: "1984".to_string(),
            ..GateConfig::default()
        });
        let start = Instant::now();
        enter(&mut gate, "1984");
        gate.attempt_unlock(start);
        assert_eq!(gate.state(), GateState::Authenticating);

        // Force the gate out of the scheduling state before the deadline.
        gate.transition(GateState::LockedInput);

        // A poll far past the original deadline must not unlock.
        assert_eq!(gate.poll(start + Duration::from_secs(10)), None);
        assert_eq!(gate.state(), GateState::LockedInput);
    }
}
