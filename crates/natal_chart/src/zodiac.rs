//! Tropical zodiac placement.
//!
//! Maps an ecliptic longitude onto one of the twelve 30° signs and breaks the
//! remainder down into degrees, minutes and seconds of arc.

use serde::{Deserialize, Serialize};

/// Wrap any longitude into `[0, 360)`.
pub fn normalize(longitude: f64) -> f64 {
    let wrapped = longitude.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign at position `index` (0 = Aries), wrapping past Pisces.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    pub fn element(self) -> Element {
        match self.index() % 4 {
            0 => Element::Fire,
            1 => Element::Earth,
            2 => Element::Air,
            _ => Element::Water,
        }
    }

    /// Traditional (pre-modern) ruling planet.
    pub fn ruler(self) -> &'static str {
        const TRADITIONAL_RULERS: [&str; 12] = [
            "mars",    // Aries
            "venus",   // Taurus
            "mercury", // Gemini
            "moon",    // Cancer
            "sun",     // Leo
            "mercury", // Virgo
            "venus",   // Libra
            "mars",    // Scorpio
            "jupiter", // Sagittarius
            "saturn",  // Capricorn
            "saturn",  // Aquarius
            "jupiter", // Pisces
        ];
        TRADITIONAL_RULERS[self.index()]
    }
}

/// A longitude expressed as sign plus truncated degree/minute/second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignPosition {
    pub sign: ZodiacSign,
    pub degree: u32,
    pub minute: u32,
    pub second: u32,
}

impl SignPosition {
    /// Degrees into the sign rebuilt from the truncated parts.
    pub fn degree_in_sign(&self) -> f64 {
        self.degree as f64 + self.minute as f64 / 60.0 + self.second as f64 / 3600.0
    }
}

/// Resolve a longitude to its sign and in-sign degree.
///
/// Every step truncates, so 29°59'59.99" Aries stays in Aries.
pub fn sign_of(longitude: f64) -> SignPosition {
    let lon = normalize(longitude);
    let sign_index = ((lon / 30.0).floor() as usize).min(11);
    let degree_in_sign = lon % 30.0;

    let degree = degree_in_sign.floor();
    let minutes_total = (degree_in_sign - degree) * 60.0;
    let minute = minutes_total.floor();
    let second = ((minutes_total - minute) * 60.0).floor();

    SignPosition {
        sign: ZodiacSign::from_index(sign_index),
        degree: degree as u32,
        minute: minute as u32,
        second: second as u32,
    }
}
