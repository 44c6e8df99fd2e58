/// Viewports at or below this width use the mobile sidebar.
pub const MOBILE_BREAKPOINT: u32 = 768;

/// Icon shown on the desktop toggle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ToggleIcon {
    Bars,
    ChevronRight,
}

impl ToggleIcon {
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Bars => "fas fa-bars",
            Self::ChevronRight => "fas fa-chevron-right",
        }
    }
}

/// Collapsible navigation sidebar.
///
/// The mobile toggle and backdrop are only wired up when the page first
/// loads on a narrow viewport; a desktop-width load never grows them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar {
    collapsed: bool,
    open: bool,
    mobile: bool,
    mobile_toggle_visible: bool,
}

impl Sidebar {
    pub fn new(viewport_width: u32) -> Self {
        let mut sidebar = Self {
            collapsed: false,
            open: false,
            mobile: viewport_width <= MOBILE_BREAKPOINT,
            mobile_toggle_visible: false,
        };
        sidebar.handle_resize(viewport_width);
        sidebar
    }

    /// Flip the collapsed state and return the icon the button should show.
    pub fn toggle(&mut self) -> ToggleIcon {
        self.collapsed = !self.collapsed;
        self.icon()
    }

    pub fn icon(&self) -> ToggleIcon {
        if self.collapsed {
            ToggleIcon::ChevronRight
        } else {
            ToggleIcon::Bars
        }
    }

    /// Mobile menu button: slide the sidebar in or out.
    pub fn toggle_mobile(&mut self) {
        if self.mobile {
            self.open = !self.open;
        }
    }

    /// A click on the backdrop (outside the menu) closes the mobile sidebar.
    pub fn backdrop_click(&mut self) {
        if self.mobile {
            self.open = false;
        }
    }

    pub fn handle_resize(&mut self, viewport_width: u32) {
        if !self.mobile {
            return;
        }
        if viewport_width <= MOBILE_BREAKPOINT {
            self.mobile_toggle_visible = true;
        } else {
            self.mobile_toggle_visible = false;
            self.open = false;
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mobile_toggle_visible(&self) -> bool {
        self.mobile_toggle_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_toggle_flips_icon() {
        let mut sidebar = Sidebar::new(1280);
        assert_eq!(sidebar.icon(), ToggleIcon::Bars);
        assert_eq!(sidebar.toggle(), ToggleIcon::ChevronRight);
        assert!(sidebar.is_collapsed());
        assert_eq!(sidebar.toggle().icon_class(), "fas fa-bars");
    }

    #[test]
    fn desktop_load_has_no_mobile_behaviour() {
        let mut sidebar = Sidebar::new(1280);
        sidebar.handle_resize(500);
        sidebar.toggle_mobile();
        assert!(!sidebar.mobile_toggle_visible());
        assert!(!sidebar.is_open());
    }

    #[test]
    fn mobile_open_close_and_resize() {
        let mut sidebar = Sidebar::new(MOBILE_BREAKPOINT);
        assert!(sidebar.mobile_toggle_visible());

        sidebar.toggle_mobile();
        assert!(sidebar.is_open());
        sidebar.backdrop_click();
        assert!(!sidebar.is_open());

        sidebar.toggle_mobile();
        sidebar.handle_resize(1024);
        assert!(!sidebar.is_open());
        assert!(!sidebar.mobile_toggle_visible());

        sidebar.handle_resize(600);
        assert!(sidebar.mobile_toggle_visible());
    }
}
