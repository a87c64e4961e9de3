use pulsemap_types::Severity;
use serde::{Deserialize, Serialize};

/// Color representation.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Self::try_from_hex(&value).unwrap_or(Color::TRANSPARENT)
    }
}

impl From<Color> for String {
    fn from(val: Color) -> Self {
        val.to_hex()
    }
}

impl Color {
    /// Transparent color: `#00000000`
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Constructs color from its RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses a color from a `#RRGGBB` or `#RRGGBBAA` string at compile time.
    ///
    /// # Panics
    ///
    /// Panics if the string is not a valid hex color.
    pub const fn from_hex(hex_string: &'static str) -> Self {
        let bytes = hex_string.as_bytes();
        if bytes.len() != 7 && bytes.len() != 9 || bytes[0] != b'#' {
            panic!("Invalid color hex string");
        }

        let a = if bytes.len() == 9 {
            hex_pair(bytes[7], bytes[8])
        } else {
            255
        };

        Self {
            r: hex_pair(bytes[1], bytes[2]),
            g: hex_pair(bytes[3], bytes[4]),
            b: hex_pair(bytes[5], bytes[6]),
            a,
        }
    }

    /// Parses a color from a `#RRGGBB` or `#RRGGBBAA` string.
    pub fn try_from_hex(hex_string: &str) -> Option<Self> {
        let digits = hex_string.strip_prefix('#')?;
        if digits.len() != 6 && digits.len() != 8 || !digits.is_ascii() {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        let a = if digits.len() == 8 { channel(6)? } else { 255 };

        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }

    /// `#RRGGBB` if the color is opaque, `#RRGGBBAA` otherwise.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }

    /// CSS functional notation: `rgba(r,g,b,alpha)`.
    pub fn to_css_rgba(&self) -> String {
        let alpha = (self.a as f64 / 255.0 * 100.0).round() / 100.0;
        format!("rgba({},{},{},{alpha})", self.r, self.g, self.b)
    }

    /// Returns a copy of the color with the given alpha channel.
    pub fn with_alpha(&self, a: u8) -> Self {
        Self { a, ..*self }
    }

    /// Returns a copy of the color with the alpha channel set from an opacity in `[0, 1]`.
    pub fn with_opacity(&self, opacity: f64) -> Self {
        self.with_alpha((opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Blends each channel linearly between `self` (`k == 0`) and `other` (`k == 1`).
    pub fn interpolate(&self, other: &Color, k: f64) -> Self {
        let k = k.clamp(0.0, 1.0);
        let channel = |from: u8, to: u8| {
            let (from, to) = (from as f64, to as f64);
            (from + (to - from) * k).round() as u8
        };
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: channel(self.a, other.a),
        }
    }

    /// Red component.
    pub fn r(&self) -> u8 {
        self.r
    }

    /// Green component.
    pub fn g(&self) -> u8 {
        self.g
    }

    /// Blue component.
    pub fn b(&self) -> u8 {
        self.b
    }

    /// Opacity component.
    pub fn a(&self) -> u8 {
        self.a
    }
}

const fn hex_pair(high: u8, low: u8) -> u8 {
    hex_digit(high) * 16 + hex_digit(low)
}

const fn hex_digit(byte: u8) -> u8 {
    match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'f' => byte - b'a' + 10,
        b'A'..=b'F' => byte - b'A' + 10,
        _ => panic!("Invalid hex character"),
    }
}

/// Fixed four-entry palette mapping severity tiers to marker colors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SeverityPalette {
    low: Color,
    moderate: Color,
    severe: Color,
    critical: Color,
}

impl Default for SeverityPalette {
    fn default() -> Self {
        Self {
            low: Color::from_hex("#22c55e"),
            moderate: Color::from_hex("#eab308"),
            severe: Color::from_hex("#ef4444"),
            critical: Color::from_hex("#dc2626"),
        }
    }
}

impl SeverityPalette {
    /// Color of the given tier. Unknown severity uses the `moderate` color.
    pub fn color(&self, severity: Option<Severity>) -> Color {
        match severity {
            Some(Severity::Low) => self.low,
            Some(Severity::Moderate) | None => self.moderate,
            Some(Severity::Severe) => self.severe,
            Some(Severity::Critical) => self.critical,
        }
    }

    /// Legend entries in tier order.
    pub fn legend(&self) -> [(Severity, Color); 4] {
        Severity::ALL.map(|severity| (severity, self.color(Some(severity))))
    }
}
