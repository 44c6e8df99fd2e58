// ── Column sorting ──
//
// Direction toggles on every call. Unparseable numeric cells resolve to NaN
// and always sink below parsed values, whichever way the column is sorted.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::{Row, SortIndicator, Table};
use crate::error::CoreError;

/// How a column's text is interpreted for comparison.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum DataType {
    #[default]
    #[strum(to_string = "text", serialize = "string")]
    Text,
    #[strum(to_string = "number")]
    Number,
    #[strum(to_string = "currency")]
    Currency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Direction for the next sort given the remembered one: anything but a
    /// previous ascending sort yields ascending.
    pub fn toggle_from(previous: Option<Self>) -> Self {
        match previous {
            Some(Self::Ascending) => Self::Descending,
            Some(Self::Descending) | None => Self::Ascending,
        }
    }

    pub fn indicator(self) -> SortIndicator {
        match self {
            Self::Ascending => SortIndicator::Ascending,
            Self::Descending => SortIndicator::Descending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Whether the toggle flag is shared by the whole table or kept per column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DirectionMemory {
    /// One flag per table; switching columns keeps toggling it.
    #[default]
    PerTable,
    /// One flag per column; a column sorted for the first time starts ascending.
    PerColumn,
}

/// Remembered sort direction(s) of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    memory: DirectionMemory,
    table: Option<SortDirection>,
    columns: HashMap<usize, SortDirection>,
    last_column: Option<usize>,
}

impl SortState {
    pub fn new(memory: DirectionMemory) -> Self {
        Self {
            memory,
            ..Self::default()
        }
    }

    pub fn memory(&self) -> DirectionMemory {
        self.memory
    }

    /// The direction a sort of `column` would use next.
    pub fn next_direction(&self, column: usize) -> SortDirection {
        let previous = match self.memory {
            DirectionMemory::PerTable => self.table,
            DirectionMemory::PerColumn => self.columns.get(&column).copied(),
        };
        SortDirection::toggle_from(previous)
    }

    /// Column and direction of the most recent sort, if any.
    pub fn last(&self) -> Option<(usize, SortDirection)> {
        let column = self.last_column?;
        let direction = match self.memory {
            DirectionMemory::PerTable => self.table?,
            DirectionMemory::PerColumn => *self.columns.get(&column)?,
        };
        Some((column, direction))
    }

    fn record(&mut self, column: usize, direction: SortDirection) {
        self.table = Some(direction);
        self.columns.insert(column, direction);
        self.last_column = Some(column);
    }
}

// ── Comparison ──────────────────────────────────────────────────────

/// Parse a numeric or currency cell: drop everything except ASCII digits,
/// `.` and `-`, then read the longest leading float. No digits → NaN.
///
/// `"R 1 234,50"` → `123450`, `"1.2.3"` → `1.2`, `"12-3"` → `12`.
pub fn parse_numeric(text: &str) -> f64 {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    parse_float_prefix(&stripped)
}

fn parse_float_prefix(s: &str) -> f64 {
    let mut end = 0;
    let mut digits = 0;
    let mut chars = s.char_indices().peekable();

    if let Some((_, '-')) = chars.peek() {
        chars.next();
        end = 1;
    }
    while let Some(&(i, c)) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        chars.next();
        digits += 1;
        end = i + 1;
    }
    if let Some(&(i, '.')) = chars.peek() {
        chars.next();
        let mut fraction = 0;
        while let Some(&(j, c)) = chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            chars.next();
            fraction += 1;
            end = j + 1;
        }
        if fraction == 0 && digits > 0 {
            end = i;
        }
        digits += fraction;
    }

    if digits == 0 {
        return f64::NAN;
    }
    s.get(..end)
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Locale-aware text ordering in collation levels: base letters with accents
/// and case folded away, then accents (unaccented first), then lowercase
/// before uppercase, then code point order.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Canonical decomposition with combining marks dropped, lowercased:
/// `"Émile"` → `"emile"`.
fn base_letters(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Precomputed comparison key for one cell.
enum SortKey {
    Text(String),
    Number(f64),
}

impl SortKey {
    fn from_cell(text: &str, data_type: DataType) -> Self {
        match data_type {
            DataType::Text => Self::Text(text.trim().to_owned()),
            DataType::Number | DataType::Currency => Self::Number(parse_numeric(text)),
        }
    }

    fn compare(&self, other: &Self, direction: SortDirection) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => direction.apply(compare_text(a, b)),
            (Self::Number(a), Self::Number(b)) => match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => direction.apply(a.partial_cmp(b).unwrap_or(Ordering::Equal)),
            },
            // Keys of one sort share a data type.
            _ => Ordering::Equal,
        }
    }
}

impl Table {
    /// Sort the body by `column`, toggling direction, and update the header
    /// indicators. Returns the direction applied.
    ///
    /// The sort is stable: rows with equal keys keep their relative order.
    pub fn sort(
        &mut self,
        column: usize,
        data_type: DataType,
    ) -> Result<SortDirection, CoreError> {
        self.check_column(column)?;
        let direction = self.sort_state.next_direction(column);

        let mut keyed: Vec<(SortKey, Row)> = std::mem::take(&mut self.rows)
            .into_iter()
            .map(|row| {
                let key = SortKey::from_cell(row.cell(column).unwrap_or_default(), data_type);
                (key, row)
            })
            .collect();
        keyed.sort_by(|(a, _), (b, _)| a.compare(b, direction));
        self.rows = keyed.into_iter().map(|(_, row)| row).collect();

        for (index, header) in self.headers.iter_mut().enumerate() {
            header.indicator = if index == column {
                direction.indicator()
            } else {
                SortIndicator::Neutral
            };
        }
        self.sort_state.record(column, direction);

        debug!(
            table = %self.id,
            column,
            data_type = %data_type,
            direction = %direction,
            rows = self.rows.len(),
            "sorted table"
        );
        Ok(direction)
    }
}
