//! Data structures returned by the Tatsu API.
//!
//! Discord IDs in responses are strings. Enumerations travel as integers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TatsuError;

/// The way to modify a member's points or score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ActionType {
    /// Add to the current value.
    Add,
    /// Remove from the current value.
    Remove,
}

impl ActionType {
    /// Picks the action for a signed amount: negative amounts remove.
    pub fn for_amount(amount: i64) -> Self {
        if amount < 0 {
            ActionType::Remove
        } else {
            ActionType::Add
        }
    }
}

impl From<ActionType> for u8 {
    fn from(action: ActionType) -> Self {
        match action {
            ActionType::Add => 0,
            ActionType::Remove => 1,
        }
    }
}

impl TryFrom<u8> for ActionType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ActionType::Add),
            1 => Ok(ActionType::Remove),
            _ => Err(format!("Unknown action type: {}", value)),
        }
    }
}

/// The type of Tatsu subscription a user has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SubscriptionType {
    /// No subscription.
    #[default]
    None,
    /// First tier.
    Supporter,
    /// Second tier.
    Supporter2,
    /// Third tier.
    Supporter3,
}

impl From<SubscriptionType> for u8 {
    fn from(subscription: SubscriptionType) -> Self {
        match subscription {
            SubscriptionType::None => 0,
            SubscriptionType::Supporter => 1,
            SubscriptionType::Supporter2 => 2,
            SubscriptionType::Supporter3 => 3,
        }
    }
}

impl TryFrom<u8> for SubscriptionType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SubscriptionType::None),
            1 => Ok(SubscriptionType::Supporter),
            2 => Ok(SubscriptionType::Supporter2),
            3 => Ok(SubscriptionType::Supporter3),
            _ => Err(format!("Unknown subscription type: {}", value)),
        }
    }
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionType::None => write!(f, "None"),
            tier => write!(f, "Supporter{}", "+".repeat(u8::from(*tier) as usize)),
        }
    }
}

/// Currency a store item is priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CurrencyType {
    /// Tatsu credits.
    Credits,
    /// Tatsu tokens.
    Tokens,
    /// Real money, in US dollars.
    Usd,
}

impl From<CurrencyType> for u8 {
    fn from(currency: CurrencyType) -> Self {
        match currency {
            CurrencyType::Credits => 0,
            CurrencyType::Tokens => 1,
            CurrencyType::Usd => 2,
        }
    }
}

impl TryFrom<u8> for CurrencyType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CurrencyType::Credits),
            1 => Ok(CurrencyType::Tokens),
            2 => Ok(CurrencyType::Usd),
            _ => Err(format!("Unknown currency type: {}", value)),
        }
    }
}

/// Time range a ranking is computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// All time.
    #[default]
    All,
    /// The last month.
    Month,
    /// The last week.
    Week,
}

impl Period {
    /// Returns the path segment used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::All => "all",
            Period::Month => "month",
            Period::Week => "week",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = TatsuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Period::All),
            "month" => Ok(Period::Month),
            "week" => Ok(Period::Week),
            _ => Err(TatsuError::invalid_argument(format!(
                "Invalid period '{}'. Valid periods: all, month, week",
                s
            ))),
        }
    }
}

/// A guild member's points information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildMemberPoints {
    /// The Discord ID of the guild.
    pub guild_id: String,
    /// The member's points.
    pub points: i64,
    /// The member's rank based on their points.
    pub rank: u64,
    /// The member's Discord ID.
    pub user_id: String,
}

/// A guild member's score information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildMemberScore {
    pub guild_id: String,
    pub score: i64,
    pub user_id: String,
}

/// A guild member's ranking over some period of time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildMemberRanking {
    pub guild_id: String,
    pub rank: u64,
    pub score: i64,
    pub user_id: String,
}

/// One entry of a guild leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub rank: u64,
    pub score: i64,
    pub user_id: String,
}

/// The rankings within a guild over some period of time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRankings {
    /// The Discord ID of the guild.
    pub guild_id: String,
    /// Rankings, ordered by rank.
    #[serde(default)]
    pub rankings: Vec<Ranking>,
}

/// A Tatsu user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Discord avatar hash.
    pub avatar_hash: String,
    /// Discord avatar URL.
    pub avatar_url: String,
    /// Credits the user holds.
    pub credits: i64,
    /// 4-digit Discord discriminator.
    pub discriminator: String,
    /// Discord ID.
    pub id: String,
    /// Text in the user's info box.
    pub info_box: String,
    /// Reputation points.
    pub reputation: i64,
    /// Subscription tier.
    pub subscription_type: SubscriptionType,
    /// Renewal time when the user has a subscription.
    #[serde(default)]
    pub subscription_renewal: Option<DateTime<Utc>>,
    /// Text in the user's title.
    pub title: String,
    /// Tokens the user holds.
    pub tokens: i64,
    /// Discord username.
    pub username: String,
    /// Experience points.
    pub xp: i64,
}

/// A price of a store item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorePrice {
    pub currency: CurrencyType,
    pub amount: f64,
}

/// The listing of a Tatsu store item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreListing {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub description: String,
    /// Whether the item is new in the store.
    pub new: bool,
    /// URL of an image preview.
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub prices: Vec<StorePrice>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}
