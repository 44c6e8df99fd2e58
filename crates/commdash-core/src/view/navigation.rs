use serde::{Deserialize, Serialize};

/// One sidebar navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub href: String,
    pub label: String,
    #[serde(default)]
    pub active: bool,
}

impl NavLink {
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
            active: false,
        }
    }
}

/// Mark exactly the links whose `href` equals `current_path` as active.
/// Returns how many matched.
pub fn set_active_navigation(links: &mut [NavLink], current_path: &str) -> usize {
    let mut matched = 0;
    for link in links {
        link.active = link.href == current_path;
        if link.active {
            matched += 1;
        }
    }
    matched
}
