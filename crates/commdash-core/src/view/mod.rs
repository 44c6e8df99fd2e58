//! Page-level view state: sidebar, navigation highlighting, tooltips, and
//! loading placeholders.
//!
//! These model what the page shows, not how it is drawn. A front end (web,
//! terminal) reads this state and renders it.

pub mod loading;
pub mod navigation;
pub mod sidebar;
pub mod tooltip;

pub use loading::{ChartLoader, LoadingPlaceholder};
pub use navigation::{NavLink, set_active_navigation};
pub use sidebar::{Sidebar, ToggleIcon};
pub use tooltip::{Rect, Size, Tooltip, TooltipLayer};
