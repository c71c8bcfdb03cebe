//! Session phase state machine.

use serde::{Deserialize, Serialize};

/// Which store backs the cart for the current session.
///
/// Phase transitions:
/// ```text
/// GuestLocal ──► Syncing ──► AuthenticatedRemote
///     ▲                              │
///     └──────────── logout ──────────┘
/// ```
///
/// A session that already holds a token at startup begins directly in
/// `AuthenticatedRemote` (unless a leftover guest cart forces the normal
/// merge path through `Syncing`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SessionPhase {
    /// Unauthenticated: local persistence is the only source of truth.
    #[default]
    GuestLocal,

    /// The one-time guest→authenticated merge is in flight.
    Syncing,

    /// Authenticated: the remote cart service is authoritative.
    AuthenticatedRemote,
}

impl SessionPhase {
    /// Returns true if the cart is backed by local persistence.
    pub fn is_guest(&self) -> bool {
        matches!(self, SessionPhase::GuestLocal)
    }

    /// Returns true while the guest→authenticated merge runs.
    pub fn is_syncing(&self) -> bool {
        matches!(self, SessionPhase::Syncing)
    }

    /// Returns true if the remote cart service is authoritative.
    pub fn is_remote_backed(&self) -> bool {
        matches!(self, SessionPhase::AuthenticatedRemote)
    }

    /// Returns the phase name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::GuestLocal => "GuestLocal",
            SessionPhase::Syncing => "Syncing",
            SessionPhase::AuthenticatedRemote => "AuthenticatedRemote",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_phase_is_guest() {
        assert_eq!(SessionPhase::default(), SessionPhase::GuestLocal);
    }

    #[test]
    fn guest_is_locally_backed() {
        assert!(SessionPhase::GuestLocal.is_guest());
        assert!(!SessionPhase::GuestLocal.is_syncing());
        assert!(!SessionPhase::GuestLocal.is_remote_backed());
    }

    #[test]
    fn syncing_is_transient() {
        assert!(!SessionPhase::Syncing.is_guest());
        assert!(SessionPhase::Syncing.is_syncing());
        assert!(!SessionPhase::Syncing.is_remote_backed());
    }

    #[test]
    fn authenticated_is_remote_backed() {
        assert!(!SessionPhase::AuthenticatedRemote.is_guest());
        assert!(SessionPhase::AuthenticatedRemote.is_remote_backed());
    }

    #[test]
    fn display() {
        assert_eq!(SessionPhase::GuestLocal.to_string(), "GuestLocal");
        assert_eq!(SessionPhase::Syncing.to_string(), "Syncing");
        assert_eq!(
            SessionPhase::AuthenticatedRemote.to_string(),
            "AuthenticatedRemote"
        );
    }
}
