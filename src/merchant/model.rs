//! Snapshot records: items, regions and weekly schedule slots.
//!
//! Upstream data is loose. Ids arrive as strings or numbers, times as
//! `HH:MM:SS` text, and optional fields go missing entirely. Decoding never
//! rejects a record because of one bad field; it substitutes the defaults
//! documented on each type instead. Whole entries that are not objects are
//! skipped.

use chrono::{Datelike, NaiveDateTime, NaiveTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Window length used when a slot's duration is missing or unreadable.
/// Upstream merchants stay for five and a half hours.
pub const DEFAULT_WINDOW: Span = Span::from_hms(5, 30, 0);

/// Day of the week, counted from Sunday (`0`) to Saturday (`6`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub const SUNDAY: DayOfWeek = DayOfWeek(0);
    pub const MONDAY: DayOfWeek = DayOfWeek(1);
    pub const TUESDAY: DayOfWeek = DayOfWeek(2);
    pub const WEDNESDAY: DayOfWeek = DayOfWeek(3);
    pub const THURSDAY: DayOfWeek = DayOfWeek(4);
    pub const FRIDAY: DayOfWeek = DayOfWeek(5);
    pub const SATURDAY: DayOfWeek = DayOfWeek(6);

    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::SUNDAY,
        DayOfWeek::MONDAY,
        DayOfWeek::TUESDAY,
        DayOfWeek::WEDNESDAY,
        DayOfWeek::THURSDAY,
        DayOfWeek::FRIDAY,
        DayOfWeek::SATURDAY,
    ];

    /// Returns `None` for anything outside `0..=6`.
    pub fn from_index(index: i64) -> Option<Self> {
        if (0..7).contains(&index) {
            Some(DayOfWeek(index as u8))
        } else {
            None
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Weekday of a wall-clock instant on the reference clock.
    pub fn of(at: &NaiveDateTime) -> Self {
        DayOfWeek(at.weekday().num_days_from_sunday() as u8)
    }

    /// The day `days` days earlier, wrapping from Sunday back to Saturday.
    pub fn days_before(self, days: u32) -> Self {
        let back = (days % 7) as u8;
        DayOfWeek((self.0 + 7 - back) % 7)
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

/// A length of time with whole-second precision, shown as `HH:MM:SS`.
///
/// Hours are not capped at 23, so a window longer than a day still renders
/// and parses (`"27:00:00"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    secs: u32,
}

impl Span {
    pub const ZERO: Span = Span { secs: 0 };

    pub const fn from_secs(secs: u32) -> Self {
        Span { secs }
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Span {
            secs: hours * 3600 + minutes * 60 + seconds,
        }
    }

    pub fn as_secs(self) -> u32 {
        self.secs
    }

    pub fn is_zero(self) -> bool {
        self.secs == 0
    }

    pub fn to_duration(self) -> chrono::Duration {
        chrono::Duration::seconds(i64::from(self.secs))
    }

    /// Parse `H:MM:SS` or `H:MM`. Minutes and seconds must be below 60.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split(':');
        let hours: u32 = parts.next()?.trim().parse().ok()?;
        let minutes: u32 = parts.next()?.trim().parse().ok()?;
        let seconds: u32 = match parts.next() {
            Some(s) => s.trim().parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
            return None;
        }
        hours
            .checked_mul(3600)?
            .checked_add(minutes * 60 + seconds)
            .map(Span::from_secs)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.secs / 3600,
            (self.secs / 60) % 60,
            self.secs % 60
        )
    }
}

impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a wall-clock time of day (`HH:MM:SS` or `HH:MM`).
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()
}

/// Item rarity. Codes outside `1..=5` are kept as [`Grade::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Unknown(i64),
}

impl Grade {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Grade::Common,
            2 => Grade::Uncommon,
            3 => Grade::Rare,
            4 => Grade::Epic,
            5 => Grade::Legendary,
            other => Grade::Unknown(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Grade::Common => 1,
            Grade::Uncommon => 2,
            Grade::Rare => 3,
            Grade::Epic => 4,
            Grade::Legendary => 5,
            Grade::Unknown(code) => code,
        }
    }

    /// Ordering key for "best first" listings; unknown grades sort last.
    pub fn rank(self) -> u8 {
        match self {
            Grade::Unknown(_) => 0,
            known => known.code() as u8,
        }
    }

    /// Rare or better.
    pub fn is_notable(self) -> bool {
        matches!(self, Grade::Rare | Grade::Epic | Grade::Legendary)
    }
}

impl Default for Grade {
    fn default() -> Self {
        Grade::Unknown(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Card,
    Item,
    Material,
    Unknown(i64),
}

impl ItemType {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ItemType::Card,
            2 => ItemType::Item,
            3 => ItemType::Material,
            other => ItemType::Unknown(other),
        }
    }
}

impl Default for ItemType {
    fn default() -> Self {
        ItemType::Unknown(0)
    }
}

/// One entry of a merchant's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_item_type")]
    pub kind: ItemType,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_grade")]
    pub grade: Grade,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub hidden: bool,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub icon: Option<String>,
}

impl Item {
    pub fn new(name: impl Into<String>, grade: Grade, kind: ItemType) -> Self {
        Self {
            id: String::new(),
            kind,
            name: name.into(),
            grade,
            hidden: false,
            icon: None,
        }
    }
}

/// A merchant location. `name` is the place, `npc_name` the vendor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub npc_name: String,
    /// Join key into [`ScheduleSlot::groups`]. Regions without one never
    /// appear on the schedule.
    #[serde(default, deserialize_with = "lenient_int")]
    pub group: Option<i64>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub items: Vec<Item>,
}

impl Region {
    pub fn new(name: impl Into<String>, npc_name: impl Into<String>, group: i64) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            npc_name: npc_name.into(),
            group: Some(group),
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }
}

/// One recurring weekly appearance window shared by every region whose
/// group is listed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleSlot {
    /// `None` when upstream sent a day outside `0..=6`.
    #[serde(rename = "dayOfWeek", default, deserialize_with = "lenient_day")]
    pub day: Option<DayOfWeek>,
    #[serde(
        rename = "startTime",
        default = "midnight",
        deserialize_with = "lenient_clock"
    )]
    pub start: NaiveTime,
    #[serde(default = "default_window", deserialize_with = "lenient_span")]
    pub duration: Span,
    #[serde(default, deserialize_with = "lenient_groups")]
    pub groups: Vec<i64>,
}

impl ScheduleSlot {
    pub fn new(day: DayOfWeek, start: NaiveTime, duration: Span, groups: Vec<i64>) -> Self {
        Self {
            day: Some(day),
            start,
            duration,
            groups,
        }
    }
}

/// The raw record sets an index is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub regions: Vec<Region>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub schedules: Vec<ScheduleSlot>,
}

impl Snapshot {
    pub fn new(regions: Vec<Region>, schedules: Vec<ScheduleSlot>) -> Self {
        Self { regions, schedules }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.schedules.is_empty()
    }
}

fn midnight() -> NaiveTime {
    NaiveTime::MIN
}

fn default_window() -> Span {
    DEFAULT_WINDOW
}

fn value_as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

fn lenient_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(value_as_int(&Value::deserialize(d)?))
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().map(|v| v != 0).unwrap_or(false),
        Value::String(s) => matches!(s.trim(), "true" | "1"),
        _ => false,
    })
}

fn lenient_grade<'de, D: Deserializer<'de>>(d: D) -> Result<Grade, D::Error> {
    Ok(value_as_int(&Value::deserialize(d)?)
        .map(Grade::from_code)
        .unwrap_or_default())
}

fn lenient_item_type<'de, D: Deserializer<'de>>(d: D) -> Result<ItemType, D::Error> {
    Ok(value_as_int(&Value::deserialize(d)?)
        .map(ItemType::from_code)
        .unwrap_or_default())
}

fn lenient_day<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DayOfWeek>, D::Error> {
    Ok(value_as_int(&Value::deserialize(d)?).and_then(DayOfWeek::from_index))
}

fn lenient_clock<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => parse_clock(&s).unwrap_or_else(midnight),
        _ => midnight(),
    })
}

fn lenient_span<'de, D: Deserializer<'de>>(d: D) -> Result<Span, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Span::parse(&s).unwrap_or(DEFAULT_WINDOW),
        _ => DEFAULT_WINDOW,
    })
}

fn lenient_groups<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<i64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(values) => values.iter().filter_map(value_as_int).collect(),
        single => value_as_int(&single).into_iter().collect(),
    })
}

fn lenient_seq<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(d)? {
        Value::Array(values) => values
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}
