use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// An sRGB color with an alpha channel.
///
/// Unpremultiplied by convention.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color([u8; 4]);

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(u8::MAX, u8::MAX, u8::MAX);
    pub const RED: Color = Color::rgb(u8::MAX, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, u8::MAX);

    /// Creates a color from its RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Creates a color from RGB components with 100% alpha.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, u8::MAX)
    }

    pub fn red(&self) -> u8 {
        self.0[0]
    }

    pub fn green(&self) -> u8 {
        self.0[1]
    }

    pub fn blue(&self) -> u8 {
        self.0[2]
    }

    pub fn alpha(&self) -> u8 {
        self.0[3]
    }

    /// Gets the color as an array of values in RGBA order.
    pub fn to_array(&self) -> [u8; 4] {
        self.0
    }

    /// Creates a color from an array of values in RGBA order.
    pub fn from_array(array: [u8; 4]) -> Self {
        Self(array)
    }

    /// Converts to premultiplied RGBA with components in `[0, 1]`.
    pub fn to_premultiplied(&self) -> [f32; 4] {
        let a = self.alpha() as f32 / 255.;
        [
            self.red() as f32 / 255. * a,
            self.green() as f32 / 255. * a,
            self.blue() as f32 / 255. * a,
            a,
        ]
    }

    /// Converts from premultiplied RGBA with components in `[0, 1]`.
    ///
    /// Out-of-range components are clamped.
    pub fn from_premultiplied(rgba: [f32; 4]) -> Self {
        let a = rgba[3].clamp(0., 1.);
        if a <= 0. {
            return Self::TRANSPARENT;
        }
        let channel = |c: f32| ((c / a).clamp(0., 1.) * 255.).round() as u8;
        Self([
            channel(rgba[0]),
            channel(rgba[1]),
            channel(rgba[2]),
            (a * 255.).round() as u8,
        ])
    }

    /// Linearly interpolates each unpremultiplied component.
    ///
    /// `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = if t.is_nan() { 0. } else { t.clamp(0., 1.) };
        let mut out = [0u8; 4];
        for (i, component) in out.iter_mut().enumerate() {
            let a = self.0[i] as f32;
            let b = other.0[i] as f32;
            *component = (a + (b - a) * t).round() as u8;
        }
        Self(out)
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rgba = self.to_array();
        write!(f, "#{:02x}{:02x}{:02x}", rgba[0], rgba[1], rgba[2])?;
        if rgba[3] != u8::MAX {
            write!(f, "{:02x}", rgba[3])?;
        }
        Ok(())
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<[u8; 4]> for Color {
    fn from(array: [u8; 4]) -> Self {
        Self::from_array(array)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected parenthesis after color type")]
    MissingParenthesis,
    #[error("unknown color '{0}' - expected a hex color, `rgb`, `rgba` or a color name")]
    UnknownType(String),
    #[error(transparent)]
    BadValue(#[from] std::num::ParseIntError),
    #[error("alpha component '{0}' is not a number in [0, 1]")]
    BadAlpha(String),
    #[error("expected {expected} color components but found {actual}")]
    ComponentMismatch { expected: usize, actual: usize },
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match *s.as_bytes() {
            [b'#', ..] => parse_hex(s),
            [b'r', b'g', b'b', b'a', ..] => parse_rgba(&s[4..]),
            [b'r', b'g', b'b', ..] => parse_rgb(&s[3..]),
            _ => named_color(s).ok_or_else(|| ColorParseError::UnknownType(s.to_owned())),
        }
    }
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name.to_ascii_lowercase().as_str() {
        "transparent" => Color::TRANSPARENT,
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::RED,
        "green" => Color::GREEN,
        "lime" => Color::rgb(0, 255, 0),
        "blue" => Color::BLUE,
        "yellow" => Color::rgb(255, 255, 0),
        "cyan" | "aqua" => Color::rgb(0, 255, 255),
        "magenta" | "fuchsia" => Color::rgb(255, 0, 255),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "silver" => Color::rgb(192, 192, 192),
        "maroon" => Color::rgb(128, 0, 0),
        "olive" => Color::rgb(128, 128, 0),
        "navy" => Color::rgb(0, 0, 128),
        "purple" => Color::rgb(128, 0, 128),
        "teal" => Color::rgb(0, 128, 128),
        "orange" => Color::rgb(255, 165, 0),
        _ => return None,
    };
    Some(color)
}

fn parse_hex(s: &str) -> Result<Color, ColorParseError> {
    let digits = &s[1..];
    let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
    if !digits.is_ascii() {
        return Err(ColorParseError::UnknownType(s.to_owned()));
    }
    match digits.len() {
        3 => Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Ok(Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => Err(ColorParseError::UnknownType(s.to_owned())),
    }
}

fn parse_rgb(s: &str) -> Result<Color, ColorParseError> {
    let parts = components(parenthesized(s)?);
    if let [r, g, b] = *parts.as_slice() {
        Ok(Color::rgb(r.parse()?, g.parse()?, b.parse()?))
    } else {
        Err(ColorParseError::ComponentMismatch {
            expected: 3,
            actual: parts.len(),
        })
    }
}

fn parse_rgba(s: &str) -> Result<Color, ColorParseError> {
    let parts = components(parenthesized(s)?);
    if let [r, g, b, a] = *parts.as_slice() {
        let alpha: f32 = a
            .parse()
            .ok()
            .filter(|a: &f32| (0.0..=1.0).contains(a))
            .ok_or_else(|| ColorParseError::BadAlpha(a.to_owned()))?;
        Ok(Color::rgba(
            r.parse()?,
            g.parse()?,
            b.parse()?,
            (alpha * 255.).round() as u8,
        ))
    } else {
        Err(ColorParseError::ComponentMismatch {
            expected: 4,
            actual: parts.len(),
        })
    }
}

fn parenthesized(s: &str) -> Result<&str, ColorParseError> {
    let s = s.trim();
    match (s.chars().next(), s.chars().last()) {
        (Some('('), Some(')')) if s.len() >= 2 => Ok(&s[1..s.len() - 1]),
        _ => Err(ColorParseError::MissingParenthesis),
    }
}

fn components(s: &str) -> Vec<&str> {
    s.split(',').map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_strings() {
        let color = Color::rgba(255, 254, 1, 255);
        assert_eq!(color.to_string(), "#fffe01");

        let color = Color::rgba(0, 0, 0, 128);
        assert_eq!(color.to_string(), "#00000080");
    }

    #[test]
    fn parse_forms() {
        assert_eq!("#f00".parse::<Color>(), Ok(Color::RED));
        assert_eq!("#0000ff".parse::<Color>(), Ok(Color::BLUE));
        assert_eq!("#00000080".parse::<Color>(), Ok(Color::rgba(0, 0, 0, 128)));
        assert_eq!("rgb(1, 2, 3)".parse::<Color>(), Ok(Color::rgb(1, 2, 3)));
        assert_eq!("rgba(1, 2, 3, 0.5)".parse(), Ok(Color::rgba(1, 2, 3, 128)));
        assert_eq!(" White ".parse::<Color>(), Ok(Color::WHITE));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            "rgb(1, 2)".parse::<Color>(),
            Err(ColorParseError::ComponentMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert!(matches!(
            "rgb 1, 2, 3".parse::<Color>(),
            Err(ColorParseError::MissingParenthesis)
        ));
        assert!(matches!(
            "#12345".parse::<Color>(),
            Err(ColorParseError::UnknownType(_))
        ));
        assert!(matches!(
            "rgba(1, 2, 3, 2)".parse::<Color>(),
            Err(ColorParseError::BadAlpha(_))
        ));
    }

    #[test]
    fn lerp_midpoint() {
        let mid = Color::RED.lerp(Color::BLUE, 0.5);
        assert_eq!(mid, Color::rgb(128, 0, 128));
    }

    #[test]
    fn premultiplied_conversion() {
        let color = Color::rgba(200, 100, 0, 128);
        let back = Color::from_premultiplied(color.to_premultiplied());
        assert_eq!(back, color);
        assert_eq!(Color::from_premultiplied([0.5, 0.5, 0.5, 0.]), Color::TRANSPARENT);
    }
}
