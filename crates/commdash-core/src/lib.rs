//! Presentation logic for the commission dashboard, free of any page or
//! terminal binding.
//!
//! - **[`format`]**: Currency, percentage, and compact-number formatting
//!   plus the percentage-change policy used by the summary cards.
//!
//! - **[`Table`]** / **[`TableRegistry`]**: In-memory tables with
//!   direction-toggling sort, case-insensitive filtering, and header sort
//!   indicators. Sort direction is an explicit [`SortState`] record, not a
//!   string attribute on a rendered element.
//!
//! - **[`export`]**: Escaped CSV serialization of a table's cells. Download
//!   mechanics are left to the caller; [`CsvExport`] carries the bytes, the
//!   file name, and the MIME type.
//!
//! - **[`NotificationCenter`]**: Toast lifecycle as an explicit state machine
//!   (`Entering → Visible → Leaving → Removed`) over an injectable [`Clock`].
//!
//! - **[`refresh`]**: Path-keyed page loaders and the periodic auto-refresh
//!   driver.
//!
//! - **[`view`]**, **[`chart`]**, **[`debounce`]**: Sidebar, navigation,
//!   tooltip, and loading-state models, the chart palette, and an input
//!   debouncer.

pub mod chart;
pub mod debounce;
pub mod error;
pub mod export;
pub mod format;
pub mod notify;
pub mod refresh;
pub mod table;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use chart::{ChartColor, gradient, hex_to_rgba};
pub use debounce::Debouncer;
pub use error::CoreError;
pub use export::{CsvExport, ExportScope, export_to_csv};
pub use format::{Locale, calculate_change, format_currency, format_number, format_percentage};
pub use notify::{
    Clock, ManualClock, Notification, NotificationCenter, NotificationId, NotificationKind,
    NotificationTimings, NotificationView, Phase, SystemClock, TokioClock, Transition,
};
pub use refresh::{AutoRefresh, PageLoader, RefreshOutcome, RefreshRegistry};
pub use table::{
    DataType, DirectionMemory, Header, Row, SortDirection, SortIndicator, SortState, Table,
    TableId, TableRegistry,
};
