//! Display labels for grades, item types and weekdays.
//!
//! The index keys everything by numeric codes; these are only used where
//! output leaves the crate.

use super::model::{DayOfWeek, Grade, ItemType};
use std::fmt;

impl Grade {
    pub fn label(self) -> &'static str {
        match self {
            Grade::Common => "Common",
            Grade::Uncommon => "Uncommon",
            Grade::Rare => "Rare",
            Grade::Epic => "Epic",
            Grade::Legendary => "Legendary",
            Grade::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl ItemType {
    pub fn label(self) -> &'static str {
        match self {
            ItemType::Card => "Card",
            ItemType::Item => "Item",
            ItemType::Material => "Material",
            ItemType::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

impl DayOfWeek {
    pub fn name(self) -> &'static str {
        DAY_NAMES[self.index() as usize]
    }

    /// Accepts `0`..`6`, three-letter abbreviations and full names, in any case.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(index) = text.parse::<i64>() {
            return DayOfWeek::from_index(index);
        }
        if text.len() < 3 {
            return None;
        }
        let lower = text.to_ascii_lowercase();
        DayOfWeek::ALL.into_iter().find(|day| {
            let name = day.name().to_ascii_lowercase();
            name == lower || (lower.len() == 3 && name.starts_with(&lower))
        })
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
