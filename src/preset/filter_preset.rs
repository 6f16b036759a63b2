//! The fixed set of film presets

use crate::error::RetroCamError;
use crate::preset::recipe::{Adjustment, VisualRecipe};
use serde::{Deserialize, Serialize};
use smallvec::smallvec;
use std::fmt;
use std::str::FromStr;

/// A named, fixed visual style selectable on the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPreset {
    /// 1950s black and white
    Noir,
    /// 1960s punchy colour stock
    Koda,
    /// Washed-out 1970s
    Retro,
    /// Warm 1980s
    Sepia,
    /// Saturated 1990s
    Neon,
    /// Inverted-hue future
    Cyber,
}

impl FilterPreset {
    /// Every preset, in the order the camera shows them
    pub const ALL: [Self; 6] = [
        Self::Noir,
        Self::Koda,
        Self::Retro,
        Self::Sepia,
        Self::Neon,
        Self::Cyber,
    ];

    /// Stable lowercase identifier, used in file names and commands
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Noir => "noir",
            Self::Koda => "koda",
            Self::Retro => "retro",
            Self::Sepia => "sepia",
            Self::Neon => "neon",
            Self::Cyber => "cyber",
        }
    }

    /// Year printed on the preset's button
    pub const fn era_label(self) -> &'static str {
        match self {
            Self::Noir => "1950",
            Self::Koda => "1960",
            Self::Retro => "1970",
            Self::Sepia => "1980",
            Self::Neon => "1990",
            Self::Cyber => "3999",
        }
    }

    /// Handwritten date under the photo
    pub const fn caption_date(self) -> &'static str {
        match self {
            Self::Noir => "Nov 23, 1950",
            Self::Koda => "May 16, 1964",
            Self::Retro => "Aug 14, 1972",
            Self::Sepia => "Dec 12, 1980",
            Self::Neon => "July 04, 1990",
            Self::Cyber => "Jan 01, 3999",
        }
    }

    /// Colour adjustments that give the preset its look
    pub fn recipe(self) -> VisualRecipe {
        use Adjustment::{Brightness, Contrast, Grayscale, HueRotate, Saturate, Sepia};

        let steps = match self {
            Self::Sepia => smallvec![
                Sepia(0.3),
                Contrast(1.25),
                Brightness(0.9),
                HueRotate(-15.0),
                Saturate(0.8),
            ],
            Self::Neon => smallvec![
                Saturate(1.8),
                Contrast(1.1),
                HueRotate(10.0),
                Brightness(1.1),
            ],
            Self::Noir => smallvec![Grayscale(1.0), Contrast(1.4), Brightness(0.9)],
            Self::Retro => smallvec![
                Contrast(0.9),
                Brightness(1.1),
                Sepia(0.3),
                HueRotate(-30.0),
                Saturate(0.7),
            ],
            Self::Cyber => smallvec![
                Contrast(1.3),
                Brightness(1.05),
                HueRotate(180.0),
                Saturate(1.2),
            ],
            Self::Koda => smallvec![
                Contrast(1.6),
                Saturate(1.6),
                Brightness(1.0),
                Sepia(0.0),
                HueRotate(-9.0),
            ],
        };
        VisualRecipe::new(steps)
    }
}

impl fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for FilterPreset {
    type Err = RetroCamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|preset| preset.identifier().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RetroCamError::UnknownPreset(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_are_unique() {
        let mut ids: Vec<_> = FilterPreset::ALL.iter().map(|p| p.identifier()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), FilterPreset::ALL.len());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("NEON".parse::<FilterPreset>().unwrap(), FilterPreset::Neon);
        assert_eq!(" koda ".parse::<FilterPreset>().unwrap(), FilterPreset::Koda);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "lomo".parse::<FilterPreset>().unwrap_err();
        assert!(matches!(err, RetroCamError::UnknownPreset(name) if name == "lomo"));
    }

    #[test]
    fn test_serde_uses_identifier() {
        let json = serde_json::to_string(&FilterPreset::Cyber).unwrap();
        assert_eq!(json, "\"cyber\"");
        let parsed: FilterPreset = serde_json::from_str("\"sepia\"").unwrap();
        assert_eq!(parsed, FilterPreset::Sepia);
    }

    #[test]
    fn test_every_preset_has_a_recipe() {
        for preset in FilterPreset::ALL {
            assert!(!preset.recipe().is_empty(), "{preset} has no adjustments");
        }
    }

    #[test]
    fn test_caption_matches_era() {
        assert_eq!(FilterPreset::Noir.caption_date(), "Nov 23, 1950");
        assert_eq!(FilterPreset::Cyber.era_label(), "3999");
    }
}
