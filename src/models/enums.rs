use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// Declaration order is severity order.
str_enum!(RiskCategory {
    Low => "low",
    Moderate => "moderate",
    High => "high",
    Critical => "critical",
});

str_enum!(Answer {
    Yes => "yes",
    No => "no",
    Sometimes => "sometimes",
});

str_enum!(Gender {
    Male => "male",
    Female => "female",
});

str_enum!(AnalysisSource {
    Model => "model",
    Fallback => "fallback",
});

impl Answer {
    /// Points contributed to the local symptom score.
    pub fn points(&self) -> u32 {
        match self {
            Self::Yes => 2,
            Self::Sometimes => 1,
            Self::No => 0,
        }
    }
}

impl Default for RiskCategory {
    fn default() -> Self {
        Self::Moderate
    }
}
