#![forbid(unsafe_code)]

use core::fmt;

use sheet_runtime::ScopeError;

/// Errors surfaced by [`OverlayHost`](super::OverlayHost).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// The window provider had no window to give.
    MissingWindow,
    /// The overlay has already been released.
    AlreadyReleased,
    /// The overlay's saved-state identity could not be registered.
    Scope(ScopeError),
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingWindow => write!(f, "no native window available for overlay"),
            Self::AlreadyReleased => write!(f, "overlay has already been released"),
            Self::Scope(err) => write!(f, "overlay state registration failed: {err}"),
        }
    }
}

impl std::error::Error for OverlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scope(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ScopeError> for OverlayError {
    fn from(err: ScopeError) -> Self {
        Self::Scope(err)
    }
}
