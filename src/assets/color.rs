use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA8 color as picked in the editor (`#rrggbb` in JSON).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha scaled by `opacity` (0..=1).
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (f32::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Premultiplied `[r, g, b, a]` bytes.
    pub fn premultiplied(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional, case-insensitive).
    pub fn parse_hex(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(format!("invalid hex color \"{s}\""));
        }

        fn hex_byte(pair: &str) -> Result<u8, String> {
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
        }

        match s.len() {
            3 => {
                let nib = |i: usize| hex_byte(&s[i..i + 1]).map(|v| v * 17);
                Ok(Self::rgb(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Ok(Self::rgb(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Ok(Self::rgba(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
                hex_byte(&s[6..8])?,
            )),
            _ => Err("hex color must be #RGB, #RRGGBB or #RRGGBBAA".to_owned()),
        }
    }

    /// Lowercase `#rrggbb` (or `#rrggbbaa` when not opaque).
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl Serialize for Rgba8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
