#![forbid(unsafe_code)]

//! Overlay presentation properties.
//!
//! [`OverlayProperties`] is an immutable value: callers build a new one per
//! show-request and hosts compare instances structurally to detect changes
//! across re-renders. There are no setters, only builder methods that
//! consume and return a new value.

/// Whether the overlay window is marked secure (excluded from screenshots
/// and non-secure displays).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SecurePolicy {
    /// Follow the parent window.
    #[default]
    Inherit,
    /// Always secure.
    ForceOn,
    /// Never secure.
    ForceOff,
}

impl SecurePolicy {
    /// Resolve against the parent window's secure flag.
    #[inline]
    pub const fn resolve(self, parent_secure: bool) -> bool {
        match self {
            Self::Inherit => parent_secure,
            Self::ForceOn => true,
            Self::ForceOff => false,
        }
    }
}

/// Behaviour flags for one bottom-sheet presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlayProperties {
    /// Back gesture, back key, and Escape request dismissal.
    pub dismiss_on_back_signal: bool,
    /// A complete tap outside the sheet requests dismissal.
    pub dismiss_on_outside_tap: bool,
    /// Secure-window policy.
    pub secure_policy: SecurePolicy,
    /// Content draws behind system bars.
    pub edge_to_edge_content_enabled: bool,
}

impl Default for OverlayProperties {
    fn default() -> Self {
        Self {
            dismiss_on_back_signal: true,
            dismiss_on_outside_tap: true,
            secure_policy: SecurePolicy::Inherit,
            edge_to_edge_content_enabled: true,
        }
    }
}

impl OverlayProperties {
    /// Default properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether back signals dismiss.
    #[must_use]
    pub const fn dismiss_on_back_signal(mut self, dismiss: bool) -> Self {
        self.dismiss_on_back_signal = dismiss;
        self
    }

    /// Set whether outside taps dismiss.
    #[must_use]
    pub const fn dismiss_on_outside_tap(mut self, dismiss: bool) -> Self {
        self.dismiss_on_outside_tap = dismiss;
        self
    }

    /// Set the secure policy.
    #[must_use]
    pub const fn secure_policy(mut self, policy: SecurePolicy) -> Self {
        self.secure_policy = policy;
        self
    }

    /// Set edge-to-edge content.
    #[must_use]
    pub const fn edge_to_edge_content_enabled(mut self, enabled: bool) -> Self {
        self.edge_to_edge_content_enabled = enabled;
        self
    }
}
