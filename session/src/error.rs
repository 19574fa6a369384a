//! Error types for session operations.

use std::fmt;

use codec::{CodecError, ObjectIndex};

use crate::Role;

/// Result type for session operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors raised by a [`SyncSession`](crate::SyncSession).
///
/// Network trouble never shows up here: malformed, late and missing packets
/// are absorbed by the inbox and the playout buffer.
#[derive(Debug)]
#[non_exhaustive]
pub enum SyncError {
    /// An operation for the other role was called.
    WrongRole { expected: Role, actual: Role },

    /// A registry already holds as many entries as a packet list can carry.
    RegistryFull { kind: RegistryKind, limit: usize },

    /// No projectile slot holds this index.
    UnknownProjectile { index: ObjectIndex },

    /// Configuration failed to parse or validate.
    InvalidConfig { reason: String },

    /// The outgoing packet could not be encoded.
    Codec(CodecError),

    /// The transport refused the packet.
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

/// Which registry an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Objects,
    Projectiles,
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongRole { expected, actual } => {
                write!(f, "operation requires {expected} role, session is {actual}")
            }
            Self::RegistryFull { kind, limit } => {
                write!(f, "{kind} registry full: limit {limit}")
            }
            Self::UnknownProjectile { index } => {
                write!(f, "no projectile slot holds object {index}")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid sync config: {reason}"),
            Self::Codec(err) => write!(f, "codec error: {err}"),
            Self::Transport(err) => write!(f, "transport error: {err}"),
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Objects => write!(f, "object"),
            Self::Projectiles => write!(f, "projectile"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(err) => Some(err),
            Self::Transport(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<CodecError> for SyncError {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_role_display() {
        let err = SyncError::WrongRole {
            expected: Role::Server,
            actual: Role::Client,
        };
        let msg = err.to_string();
        assert!(msg.contains("server"));
        assert!(msg.contains("client"));
    }

    #[test]
    fn registry_full_display() {
        let err = SyncError::RegistryFull {
            kind: RegistryKind::Projectiles,
            limit: 511,
        };
        assert!(err.to_string().contains("projectile registry full"));
    }

    #[test]
    fn transport_has_source() {
        use std::error::Error;
        let inner = std::io::Error::other("link down");
        let err = SyncError::Transport(Box::new(inner));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("link down"));
    }
}
