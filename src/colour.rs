//! Colour type, hex parsing and diagram colour codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DiagramError, Result};

/// An RGBA colour value. Serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Named colour codes accepted after the `c` prefix.
const NAMED_CODES: &[(&str, Colour)] = &[
    ("GRE", Colour::rgb(0x99, 0xDD, 0x99)),
    ("BLU", Colour::rgb(0x55, 0x55, 0xBB)),
    ("PNK", Colour::rgb(0xFF, 0xAA, 0xAA)),
    ("RED", Colour::rgb(0xEE, 0x33, 0x22)),
    ("YEL", Colour::rgb(0xFF, 0xFF, 0x33)),
    ("BLK", Colour::rgb(0x00, 0x00, 0x00)),
];

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a hex colour string.
    ///
    /// Supports `#RGB`, `#RRGGBB` and `#RRGGBBAA`; the `#` is optional.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        let invalid = || DiagramError::Parse {
            message: format!("Invalid hex colour: {}", s),
            help: Some("Use #RGB, #RRGGBB, or #RRGGBBAA format".to_string()),
        };
        if !hex.is_ascii() {
            return Err(invalid());
        }

        match hex.len() {
            3 => {
                let mut digits = [0u8; 3];
                for (slot, c) in digits.iter_mut().zip(hex.chars()) {
                    *slot = parse_hex_digit(c)? * 17;
                }
                Ok(Self::rgb(digits[0], digits[1], digits[2]))
            }
            6 => Ok(Self::rgb(
                parse_hex_byte(&hex[0..2])?,
                parse_hex_byte(&hex[2..4])?,
                parse_hex_byte(&hex[4..6])?,
            )),
            8 => Ok(Self::new(
                parse_hex_byte(&hex[0..2])?,
                parse_hex_byte(&hex[2..4])?,
                parse_hex_byte(&hex[4..6])?,
                parse_hex_byte(&hex[6..8])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Decode the three characters after a `c` colour marker: either a
    /// named code (`RED`, `BLU`, ...) or three upper-case hex digits.
    pub fn from_code(code: &str) -> Option<Self> {
        if let Some((_, colour)) = NAMED_CODES.iter().find(|(name, _)| *name == code) {
            return Some(*colour);
        }
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)) {
            return Self::from_hex(code).ok();
        }
        None
    }

    /// Text on a dark fill is drawn white.
    pub fn is_dark(self) -> bool {
        self.r.max(self.g).max(self.b) < 200
    }
}

impl FromStr for Colour {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Colour {
    type Error = DiagramError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_hex(&s)
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_string()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

fn parse_hex_digit(c: char) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| DiagramError::Parse {
            message: format!("Invalid hex digit: {}", c),
            help: None,
        })
}

fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| DiagramError::Parse {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}
