//! Screens and panel visibility.

use bitflags::bitflags;
use mediafetch_assets::AssetKind;

/// Top-level screen. The only transition is `Landing -> Demonstration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Landing,
    Demonstration,
}

bitflags! {
    /// Which panels are visible.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Panels: u8 {
        const TEXT    = 0b0000_0001;
        const IMAGE   = 0b0000_0010;
        const VIDEO   = 0b0000_0100;
        const MODEL   = 0b0000_1000;
        /// The fixed "failed to load" panel
        const FAILED  = 0b0001_0000;
        /// The loading indicator
        const LOADING = 0b0010_0000;

        /// The four mutually exclusive content panels
        const CONTENT = Self::TEXT.bits() | Self::IMAGE.bits() | Self::VIDEO.bits() | Self::MODEL.bits();
    }
}

impl Panels {
    /// The content panel showing `kind`.
    pub fn for_kind(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Text => Self::TEXT,
            AssetKind::Image => Self::IMAGE,
            AssetKind::VideoUrl => Self::VIDEO,
            AssetKind::Model => Self::MODEL,
        }
    }

    /// Returns true if the loading indicator is up.
    #[inline]
    pub fn is_loading(&self) -> bool {
        self.contains(Self::LOADING)
    }

    /// Returns true if the failure panel is up.
    #[inline]
    pub fn is_failed(&self) -> bool {
        self.contains(Self::FAILED)
    }

    /// The visible content panels only.
    #[inline]
    pub fn content(&self) -> Self {
        self.intersection(Self::CONTENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_kind_has_its_own_panel() {
        let mut seen = Panels::empty();
        for kind in AssetKind::ALL {
            let panel = Panels::for_kind(kind);
            assert_eq!(panel.bits().count_ones(), 1);
            assert!(!seen.intersects(panel));
            seen |= panel;
        }
        assert_eq!(seen, Panels::CONTENT);
    }

    #[test]
    fn test_content_ignores_overlays() {
        let panels = Panels::IMAGE | Panels::LOADING | Panels::FAILED;
        assert_eq!(panels.content(), Panels::IMAGE);
        assert!(panels.is_loading());
        assert!(panels.is_failed());
    }
}
