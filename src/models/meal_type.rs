use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum MealType {
    #[value(alias = "m")]
    Morning,
    #[value(alias = "e")]
    Evening,
}

impl MealType {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MealType::Morning => "MORNING",
            MealType::Evening => "EVENING",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "MORNING" => Some(MealType::Morning),
            "EVENING" => Some(MealType::Evening),
            _ => None,
        }
    }

    pub fn all() -> [MealType; 2] {
        [MealType::Morning, MealType::Evening]
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
