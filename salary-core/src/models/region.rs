use serde::{Deserialize, Serialize};

/// Minimum-wage zone a worker is employed in.
///
/// The zone only affects the unemployment-insurance cap, which is twenty times
/// the zone's regional minimum salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    #[default]
    I,
    II,
    III,
    IV,
}

impl Region {
    pub fn all() -> &'static [Region] {
        &[Region::I, Region::II, Region::III, Region::IV]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::II => "II",
            Self::III => "III",
            Self::IV => "IV",
        }
    }

    /// Parses either the roman (`"II"`) or the numeric (`"2"`) form.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "I" | "1" => Some(Self::I),
            "II" | "2" => Some(Self::II),
            "III" | "3" => Some(Self::III),
            "IV" | "4" => Some(Self::IV),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::I => "Region I (Hanoi/HCMC)",
            Self::II => "Region II",
            Self::III => "Region III",
            Self::IV => "Region IV",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
