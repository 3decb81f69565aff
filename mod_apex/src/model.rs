//! Upstream payloads. Every field is optional; the accessors carry the default shown when the
//! upstream leaves a field out, so formatters never deal with missing data themselves.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use std::fmt;

pub const NA: &str = "N/A";
pub const ZERO: &str = "0";
pub const EMPTY: &str = "";

/// A leaf value the upstream sends as either a string or a number, depending on the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(Number),
    Bool(bool),
}

impl Scalar {
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Text(s) => !s.is_empty(),
            Scalar::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
            Scalar::Bool(b) => *b,
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Scalar::Number(n) => n.as_f64() == Some(1.0),
            Scalar::Bool(b) => *b,
            Scalar::Text(_) => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Scalar::Text(s),
            Value::Number(n) => Scalar::Number(n),
            Value::Bool(b) => Scalar::Bool(b),
            Value::Null => Scalar::Text(String::new()),
            other => Scalar::Text(other.to_string()),
        })
    }
}

fn show(v: &Option<Scalar>, default: &str) -> String {
    match v {
        Some(s) => s.to_string(),
        None => default.to_string(),
    }
}

fn truthy(v: &Option<Scalar>) -> bool {
    v.as_ref().map_or(false, Scalar::is_truthy)
}

/// Name of a JSON value's type, for error messages.
pub fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// Optional object section. Null counts as absent; anything other than an object is an error,
// since derived struct deserializers would otherwise accept arrays.
fn object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        v @ Value::Object(_) => T::deserialize(v).map(Some).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!("expected an object, found {}", kind(&other)))),
    }
}

// Like `object`, but an empty object also counts as absent, so optional sections only render
// when they actually carry something.
fn non_empty<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::Object(m) if m.is_empty() => Ok(None),
        v @ Value::Object(_) => T::deserialize(v).map(Some).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!("expected an object, found {}", kind(&other)))),
    }
}

// player / matches (/bridge)

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Player {
    #[serde(deserialize_with = "non_empty")]
    pub global: Option<Global>,
    #[serde(deserialize_with = "non_empty")]
    pub realtime: Option<Realtime>,
    #[serde(rename = "recentMatches")]
    pub recent_matches: Option<Vec<Match>>,
}

impl Player {
    pub fn uid(&self) -> String {
        match &self.global {
            Some(g) => show(&g.uid, NA),
            None => NA.to_string(),
        }
    }

    pub fn matches(&self) -> &[Match] {
        self.recent_matches.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Global {
    pub uid: Option<Scalar>,
    pub level: Option<Scalar>,
    #[serde(deserialize_with = "non_empty")]
    pub rank: Option<Rank>,
    #[serde(deserialize_with = "non_empty")]
    pub total: Option<Stats>,
    #[serde(deserialize_with = "non_empty")]
    pub season: Option<Stats>,
}

impl Global {
    /// Level, if the upstream reports a nonzero one.
    pub fn level(&self) -> Option<String> {
        if truthy(&self.level) {
            Some(show(&self.level, ZERO))
        } else {
            None
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Rank {
    #[serde(rename = "rankName")]
    pub rank_name: Option<Scalar>,
    #[serde(rename = "rankDiv")]
    pub rank_div: Option<Scalar>,
    #[serde(rename = "rankScore")]
    pub rank_score: Option<Scalar>,
}

impl Rank {
    pub fn name(&self) -> String {
        show(&self.rank_name, NA)
    }
    pub fn div(&self) -> String {
        show(&self.rank_div, EMPTY)
    }
    pub fn score(&self) -> String {
        show(&self.rank_score, ZERO)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub kills: Option<Stat>,
    pub damage: Option<Stat>,
    pub games_played: Option<Stat>,
}

impl Stats {
    pub fn kills(&self) -> String {
        Stat::value_of(&self.kills)
    }
    pub fn damage(&self) -> String {
        Stat::value_of(&self.damage)
    }
    pub fn games_played(&self) -> String {
        Stat::value_of(&self.games_played)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Stat {
    pub value: Option<Scalar>,
}

impl Stat {
    fn value_of(stat: &Option<Stat>) -> String {
        match stat {
            Some(s) => show(&s.value, ZERO),
            None => ZERO.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Realtime {
    #[serde(rename = "isOnline")]
    pub is_online: Option<Scalar>,
    #[serde(rename = "isInGame")]
    pub is_in_game: Option<Scalar>,
    #[serde(rename = "currentStateAsText")]
    pub current_state: Option<Scalar>,
}

impl Realtime {
    pub fn online(&self) -> bool {
        self.is_online.as_ref().map_or(false, Scalar::is_one)
    }
    pub fn in_game(&self) -> bool {
        self.is_in_game.as_ref().map_or(false, Scalar::is_one)
    }
    pub fn state(&self) -> Option<String> {
        if truthy(&self.current_state) {
            Some(show(&self.current_state, EMPTY))
        } else {
            None
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Match {
    #[serde(rename = "gameMode")]
    pub game_mode: Option<Scalar>,
    pub kills: Option<Scalar>,
    pub damage: Option<Scalar>,
    pub rank: Option<Scalar>,
}

impl Match {
    pub fn game_mode(&self) -> String {
        show(&self.game_mode, NA)
    }
    pub fn kills(&self) -> String {
        show(&self.kills, ZERO)
    }
    pub fn damage(&self) -> String {
        show(&self.damage, ZERO)
    }
    pub fn rank(&self) -> String {
        show(&self.rank, NA)
    }
}

// uid (/nametouid)

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NameToUid {
    pub uid: Option<Scalar>,
}

impl NameToUid {
    pub fn uid(&self) -> String {
        show(&self.uid, NA)
    }
}

// leaderboard / predator

pub const PLATFORMS: [&str; 3] = ["PC", "PS4", "X1"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Boards {
    #[serde(rename = "PC")]
    pub pc: Option<Vec<RankedEntry>>,
    #[serde(rename = "PS4")]
    pub ps4: Option<Vec<RankedEntry>>,
    #[serde(rename = "X1")]
    pub x1: Option<Vec<RankedEntry>>,
}

impl Boards {
    /// Boards present in the response, in `PLATFORMS` order.
    pub fn platforms(&self) -> Vec<(&'static str, &[RankedEntry])> {
        PLATFORMS
            .iter()
            .copied()
            .zip(vec![&self.pc, &self.ps4, &self.x1])
            .filter_map(|(name, board)| board.as_deref().map(|b| (name, b)))
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RankedEntry {
    pub name: Option<Scalar>,
    pub rank: Option<EntryRank>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EntryRank {
    #[serde(rename = "rankScore")]
    pub rank_score: Option<Scalar>,
}

impl RankedEntry {
    pub fn name(&self) -> String {
        show(&self.name, NA)
    }
    pub fn score(&self) -> String {
        match &self.rank {
            Some(r) => show(&r.rank_score, ZERO),
            None => ZERO.to_string(),
        }
    }
}

// map (/maprotation)

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MapRotation {
    #[serde(deserialize_with = "object")]
    pub battle_royale: Option<Rotation>,
    #[serde(deserialize_with = "object")]
    pub arenas: Option<Rotation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Rotation {
    pub current: Option<MapSlot>,
    pub next: Option<MapSlot>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MapSlot {
    pub map: Option<Scalar>,
    #[serde(rename = "remainingTimer")]
    pub remaining_timer: Option<Scalar>,
}

impl Rotation {
    pub fn current_map(&self) -> String {
        self.current.as_ref().map_or_else(|| NA.to_string(), |s| show(&s.map, NA))
    }
    pub fn remaining(&self) -> String {
        self.current
            .as_ref()
            .map_or_else(|| NA.to_string(), |s| show(&s.remaining_timer, NA))
    }
    pub fn next_map(&self) -> String {
        self.next.as_ref().map_or_else(|| NA.to_string(), |s| show(&s.map, NA))
    }
}

// store

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Store {
    #[serde(rename = "bundleContent")]
    pub bundle_content: Option<Vec<BundleItem>>,
}

impl Store {
    pub fn items(&self) -> &[BundleItem] {
        self.bundle_content.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BundleItem {
    pub item: Option<Named>,
    pub cost: Option<Cost>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Named {
    pub name: Option<Scalar>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Cost {
    pub amount: Option<Scalar>,
    pub currency: Option<Scalar>,
}

impl Named {
    fn name_of(n: &Option<Named>) -> String {
        match n {
            Some(n) => show(&n.name, NA),
            None => NA.to_string(),
        }
    }
}

impl BundleItem {
    pub fn name(&self) -> String {
        Named::name_of(&self.item)
    }
    pub fn amount(&self) -> String {
        self.cost.as_ref().map_or_else(|| ZERO.to_string(), |c| show(&c.amount, ZERO))
    }
    pub fn currency(&self) -> String {
        self.cost
            .as_ref()
            .map_or_else(|| EMPTY.to_string(), |c| show(&c.currency, EMPTY))
    }
}

// crafting

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CraftingItem {
    #[serde(rename = "itemType")]
    pub item_type: Option<Named>,
    pub cost: Option<Scalar>,
    #[serde(rename = "endDate")]
    pub end_date: Option<EndDate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EndDate {
    pub date: Option<Scalar>,
}

impl CraftingItem {
    pub fn name(&self) -> String {
        Named::name_of(&self.item_type)
    }
    pub fn cost(&self) -> String {
        show(&self.cost, ZERO)
    }
    pub fn end_date(&self) -> String {
        self.end_date.as_ref().map_or_else(|| NA.to_string(), |d| show(&d.date, NA))
    }
}

// news

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewsItem {
    pub title: Option<Scalar>,
    pub short_desc: Option<Scalar>,
    pub link: Option<Scalar>,
}

impl NewsItem {
    pub fn title(&self) -> String {
        show(&self.title, NA)
    }
    pub fn short_desc(&self) -> String {
        show(&self.short_desc, EMPTY)
    }
    pub fn link(&self) -> String {
        show(&self.link, NA)
    }
}

// status (/servers)

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServerStatus {
    #[serde(rename = "Server")]
    pub server: Option<Scalar>,
    #[serde(rename = "Status")]
    pub status: Option<Scalar>,
    #[serde(rename = "ResponseTime")]
    pub response_time: Option<Scalar>,
}

impl ServerStatus {
    pub fn server(&self) -> String {
        show(&self.server, NA)
    }
    pub fn status(&self) -> String {
        show(&self.status, NA)
    }
    pub fn response_time(&self) -> String {
        show(&self.response_time, NA)
    }
}
