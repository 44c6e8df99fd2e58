// ── Chart palette ──
//
// Dashboard charts draw from six named colours and fill areas with a
// vertical fade from the series colour to transparent.

use serde::Serialize;

use crate::error::CoreError;

/// Height in pixels of the vertical fill gradient.
pub const GRADIENT_HEIGHT: u32 = 400;

/// Opacity at the top of a fill gradient when none is given.
pub const DEFAULT_GRADIENT_OPACITY: f64 = 0.3;

/// Named chart colours.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ChartColor {
    Primary,
    Success,
    Warning,
    Danger,
    Info,
    Secondary,
}

impl ChartColor {
    pub fn hex(self) -> &'static str {
        match self {
            Self::Primary => "#4e73df",
            Self::Success => "#1cc88a",
            Self::Warning => "#f6c23e",
            Self::Danger => "#e74a3c",
            Self::Info => "#36b9cc",
            Self::Secondary => "#858796",
        }
    }

    pub fn rgba(self, alpha: f64) -> String {
        let [r, g, b] = parse_hex(self.hex()).unwrap_or_default();
        rgba(r, g, b, alpha)
    }
}

/// Convert `#rrggbb` to a CSS `rgba(r, g, b, alpha)` string.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Result<String, CoreError> {
    let [r, g, b] = parse_hex(hex)?;
    Ok(rgba(r, g, b, alpha))
}

fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> String {
    format!("rgba({r}, {g}, {b}, {alpha})")
}

fn parse_hex(hex: &str) -> Result<[u8; 3], CoreError> {
    let invalid = |reason: &str| CoreError::InvalidColor {
        value: hex.to_owned(),
        reason: reason.to_owned(),
    };

    let digits = hex
        .strip_prefix('#')
        .ok_or_else(|| invalid("expected a leading '#'"))?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("expected six hex digits"));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16).map_err(|e| invalid(&e.to_string()))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// One colour stop of a linear gradient; `offset` runs from 0 (top) to 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
}

/// Vertical fill gradient from `(0, 0)` to `(0, height)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    pub height: u32,
    pub stops: Vec<GradientStop>,
}

/// Fade `color` from `opacity` at the top to transparent at the bottom.
pub fn gradient(color: &str, opacity: f64) -> Result<Gradient, CoreError> {
    Ok(Gradient {
        height: GRADIENT_HEIGHT,
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: hex_to_rgba(color, opacity)?,
            },
            GradientStop {
                offset: 1.0,
                color: hex_to_rgba(color, 0.0)?,
            },
        ],
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn converts_hex_to_rgba() {
        assert_eq!(hex_to_rgba("#4e73df", 0.3).unwrap(), "rgba(78, 115, 223, 0.3)");
        assert_eq!(hex_to_rgba("#FFFFFF", 1.0).unwrap(), "rgba(255, 255, 255, 1)");
    }

    #[test]
    fn rejects_malformed_colours() {
        for bad in ["4e73df", "#4e73d", "#4e73dfff", "#zz73df", ""] {
            assert!(
                matches!(hex_to_rgba(bad, 1.0), Err(CoreError::InvalidColor { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn palette_colours_are_valid() {
        for color in ChartColor::iter() {
            assert!(hex_to_rgba(color.hex(), 0.5).is_ok(), "{color}");
        }
        assert_eq!(ChartColor::Danger.rgba(0.0), "rgba(231, 74, 60, 0)");
        assert_eq!("SUCCESS".parse::<ChartColor>().unwrap(), ChartColor::Success);
    }

    #[test]
    fn gradient_fades_to_transparent() {
        let g = gradient(ChartColor::Success.hex(), DEFAULT_GRADIENT_OPACITY).unwrap();
        assert_eq!(g.height, 400);
        assert_eq!(
            g.stops,
            vec![
                GradientStop {
                    offset: 0.0,
                    color: "rgba(28, 200, 138, 0.3)".into(),
                },
                GradientStop {
                    offset: 1.0,
                    color: "rgba(28, 200, 138, 0)".into(),
                },
            ]
        );
    }
}
