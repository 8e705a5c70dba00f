use serde::{Deserialize, Serialize};

/// Selects which amount is used as the social-insurance contribution base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsuranceMode {
    /// Contributions are computed on the gross salary (subject to the caps).
    #[default]
    OnGross,
    /// Contributions are computed on a separately declared amount.
    FixedAmount,
}

impl InsuranceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnGross => "ON_GROSS",
            Self::FixedAmount => "FIXED_AMOUNT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ON_GROSS" | "GROSS" => Some(Self::OnGross),
            "FIXED_AMOUNT" | "FIXED" => Some(Self::FixedAmount),
            _ => None,
        }
    }
}

impl std::fmt::Display for InsuranceMode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
