#![forbid(unsafe_code)]

//! The native modal window seam.
//!
//! An overlay lives in its own window, sized to the host screen so that
//! pointer events outside the sheet reach it. Platform backends implement
//! [`NativeWindow`]; [`WindowProvider`] hands one out per overlay.

use sheet_core::LayoutDirection;
use sheet_core::geometry::Rect;
use sheet_render::PackedRgba;

/// Icon colour for the system bars while the overlay is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemBarAppearance {
    /// Light icons, for dark backgrounds.
    LightIcons,
    /// Dark icons, for light backgrounds.
    DarkIcons,
}

impl SystemBarAppearance {
    /// Light icons exactly when the scrim is dark.
    pub fn for_scrim(scrim: PackedRgba) -> Self {
        if scrim.luminance() < 0.5 {
            Self::LightIcons
        } else {
            Self::DarkIcons
        }
    }
}

/// A platform window that can host one overlay.
pub trait NativeWindow {
    /// Full bounds of the screen the window covers.
    fn screen_bounds(&self) -> Rect;

    /// Add the window to the screen.
    fn attach(&mut self);

    /// Remove the window from the screen.
    fn detach(&mut self);

    fn is_attached(&self) -> bool;

    /// Secure flag of the window that requested the overlay.
    fn parent_secure(&self) -> bool;

    fn set_secure(&mut self, secure: bool);

    /// `false` lets content draw behind the system bars.
    fn set_decor_fits_system_windows(&mut self, fits: bool);

    fn set_layout_direction(&mut self, direction: LayoutDirection);

    fn set_system_bar_appearance(&mut self, appearance: SystemBarAppearance);

    /// Stop every ancestor of the content container from clipping its
    /// children, so the sheet's shadow is not cut off.
    fn disable_ancestor_clipping(&mut self);
}

/// Creates native windows for overlays.
pub trait WindowProvider {
    type Window: NativeWindow;

    /// A fresh, detached window, or `None` if the platform has no window
    /// handle to offer.
    fn create_window(&mut self) -> Option<Self::Window>;
}
