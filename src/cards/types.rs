use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Card element. The steampunk table uses the first four, the extended table
/// adds lightning and ice. Anything unrecognised deserialises to `Unknown`,
/// which is neutral against everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Element {
    Fire,
    Water,
    Air,
    Earth,
    Lightning,
    Ice,
    #[default]
    Unknown,
}

impl Element {
    pub fn name(&self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Air => "air",
            Element::Earth => "earth",
            Element::Lightning => "lightning",
            Element::Ice => "ice",
            Element::Unknown => "unknown",
        }
    }

    pub fn parse(raw: &str) -> Element {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fire" => Element::Fire,
            "water" => Element::Water,
            "air" | "wind" => Element::Air,
            "earth" => Element::Earth,
            "lightning" => Element::Lightning,
            "ice" => Element::Ice,
            _ => Element::Unknown,
        }
    }
}

impl From<String> for Element {
    fn from(raw: String) -> Self {
        Element::parse(&raw)
    }
}

impl From<Element> for String {
    fn from(element: Element) -> Self {
        element.name().to_string()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    #[serde(rename = "R1")]
    Common = 1,
    #[serde(rename = "R2")]
    Uncommon = 2,
    #[serde(rename = "R3")]
    Rare = 3,
    #[serde(rename = "R4")]
    Epic = 4,
    #[serde(rename = "R5")]
    Legendary = 5,
    #[serde(rename = "R6")]
    Mythic = 6,
}

impl Rarity {
    pub const ALL: [Rarity; 6] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
    ];

    /// Ordinal rank, 1 (common) through 6 (mythic).
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    pub fn index(&self) -> usize {
        self.rank() as usize - 1
    }

    pub fn from_rank(rank: u8) -> Option<Rarity> {
        Rarity::ALL.get((rank as usize).checked_sub(1)?).copied()
    }

    pub fn id(&self) -> &'static str {
        match self {
            Rarity::Common => "R1",
            Rarity::Uncommon => "R2",
            Rarity::Rare => "R3",
            Rarity::Epic => "R4",
            Rarity::Legendary => "R5",
            Rarity::Mythic => "R6",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
        }
    }

    /// Accepts both the rank id ("R3") and the tier name ("rare").
    pub fn parse(raw: &str) -> Option<Rarity> {
        let raw = raw.trim();
        Rarity::ALL.into_iter().find(|r| {
            r.id().eq_ignore_ascii_case(raw) || r.name().eq_ignore_ascii_case(raw)
        })
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

fn lenient_rarity<'de, D>(deserializer: D) -> Result<Option<Rarity>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(id)) => Rarity::parse(&id),
        Some(Value::Null) | None => None,
        Some(other) => {
            warn!(value = %other, "ignoring non-string rarity");
            None
        }
    })
}

fn lenient_element<'de, D>(deserializer: D) -> Result<Element, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(name)) => Element::parse(&name),
        Some(Value::Null) | None => Element::Unknown,
        Some(other) => {
            warn!(value = %other, "ignoring non-string element");
            Element::Unknown
        }
    })
}

/// Accepts numbers and numeric strings. Negative, non-finite or non-numeric
/// values read as absent.
fn lenient_number(raw: Option<Value>) -> Option<f64> {
    let value = match &raw {
        None | Some(Value::Null) => return None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => {
            if let Some(other) = raw {
                warn!(value = %other, "ignoring malformed numeric field");
            }
            None
        }
    }
}

fn lenient_u32_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    // `as` saturates at u32::MAX
    Ok(lenient_number(raw).map(|v| v.round() as u32))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u32_opt(deserializer)?.unwrap_or(0))
}

fn lenient_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(lenient_number(raw))
}

/// Catalog entry. Immutable once the catalog is loaded.
///
/// Numeric fields that are missing or malformed in the source data default
/// to zero (fractions are rounded), and an unrecognised rarity becomes
/// `None`. Consumers log and fall back rather than refusing the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_element")]
    pub element: Element,
    #[serde(default, alias = "rarityId", deserialize_with = "lenient_rarity")]
    pub rarity: Option<Rarity>,
    #[serde(default, deserialize_with = "lenient_u32_opt")]
    pub base_power: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64_opt")]
    pub upgrade_mult: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub attack: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub defense: u32,
    #[serde(default)]
    pub starter: bool,
}

impl Card {
    pub fn new(id: &str, element: Element, rarity: Rarity, base_power: u32) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            element,
            rarity: Some(rarity),
            base_power: Some(base_power),
            upgrade_mult: None,
            attack: base_power,
            defense: (base_power as f64 * 0.8).round() as u32,
            starter: false,
        }
    }

    pub fn with_upgrade_mult(mut self, mult: f64) -> Self {
        self.upgrade_mult = Some(mult);
        self
    }

    pub fn with_stats(mut self, attack: u32, defense: u32) -> Self {
        self.attack = attack;
        self.defense = defense;
        self
    }

    pub fn as_starter(mut self) -> Self {
        self.starter = true;
        self
    }
}

/// One owned copy of a catalog card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInstance {
    pub uid: String,
    pub card_id: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub xp: u32,
}

fn default_level() -> u32 {
    1
}

impl CardInstance {
    pub fn new(card_id: &str) -> Self {
        Self {
            uid: uuid::Uuid::new_v4().to_string(),
            card_id: card_id.to_string(),
            level: 1,
            xp: 0,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }
}

/// A card as it fights: catalog identity plus the stats at its level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuelCard {
    pub card_id: String,
    pub name: String,
    pub element: Element,
    pub rarity: Option<Rarity>,
    pub level: u32,
    pub attack: u32,
    pub defense: u32,
    pub power: u32,
}

impl DuelCard {
    pub fn new(card_id: &str, element: Element, attack: u32, defense: u32) -> Self {
        Self {
            card_id: card_id.to_string(),
            name: card_id.to_string(),
            element,
            rarity: None,
            level: 1,
            attack,
            defense,
            power: attack,
        }
    }

    pub fn with_power(mut self, power: u32) -> Self {
        self.power = power;
        self
    }

    /// Builds the fighting form of `card` at `level`, using additive growth
    /// for both power and attack.
    pub fn from_card(card: &Card, level: u32) -> Self {
        let level = level.max(1);
        let power = crate::progression::additive_power(card, level);
        Self {
            card_id: card.id.clone(),
            name: card.name.clone(),
            element: card.element,
            rarity: card.rarity,
            level,
            attack: power,
            defense: card.defense,
            power,
        }
    }
}
