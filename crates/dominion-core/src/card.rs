//! Card catalog: variants, type tags and the immutable descriptor table.
//!
//! This module contains:
//! - `CardType` tags (treasure, victory, curse, action, attack, reaction)
//! - `CardKind`, one variant per card in the catalog
//! - `CardSpec`, the per-variant descriptor (cost, tags, value)
//! - `Card` instances and the `CardMint` that hands out their identities

use crate::player::Player;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type tags a card variant can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Treasure,
    Victory,
    Curse,
    Action,
    Attack,
    Reaction,
}

/// Every card variant in the catalog.
///
/// The declaration order is the index into the descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardKind {
    // ==================== Basic ====================
    Copper,
    Silver,
    Gold,
    Estate,
    Duchy,
    Province,
    Curse,

    // ==================== Kingdom ====================
    Cellar,
    Chapel,
    Moat,
    Harbinger,
    Merchant,
    Vassal,
    Village,
    Workshop,
    Bureaucrat,
    Gardens,
    Militia,
    Moneylender,
    Poacher,
    Remodel,
    Smithy,
    ThroneRoom,
    Bandit,
    CouncilRoom,
    Festival,
    Laboratory,
    Library,
    Market,
    Mine,
    Sentry,
    Witch,
    Artisan,

    // ==================== First edition ====================
    Chancellor,
    Woodcutter,
    Feast,
    Spy,
    Thief,
    Adventurer,
}

/// Immutable per-variant descriptor
#[derive(Debug)]
pub struct CardSpec {
    pub kind: CardKind,
    pub name: &'static str,
    pub cost: u32,
    pub types: &'static [CardType],
    /// Coin value for treasures, points for victory and curse cards
    pub value: i32,
    /// Overrides `value` when scoring depends on the owner's cards
    pub dynamic_value: Option<fn(&Player) -> i32>,
}

impl CardSpec {
    /// Whether this variant carries the given tag
    pub fn has_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }
}

use CardType::{Action, Attack, Reaction, Treasure, Victory};

/// Worth 1 point per 10 cards in deck, hand and discard, rounded down.
fn gardens_value(player: &Player) -> i32 {
    (player.scored_cards().count() / 10) as i32
}

const fn basic(kind: CardKind, name: &'static str, cost: u32, types: &'static [CardType], value: i32) -> CardSpec {
    CardSpec {
        kind,
        name,
        cost,
        types,
        value,
        dynamic_value: None,
    }
}

const fn action(kind: CardKind, name: &'static str, cost: u32, types: &'static [CardType]) -> CardSpec {
    basic(kind, name, cost, types, 0)
}

const ACTION: &[CardType] = &[Action];
const ACTION_ATTACK: &[CardType] = &[Action, Attack];

static CATALOG: [CardSpec; 39] = [
    basic(CardKind::Copper, "Copper", 0, &[Treasure], 1),
    basic(CardKind::Silver, "Silver", 3, &[Treasure], 2),
    basic(CardKind::Gold, "Gold", 6, &[Treasure], 3),
    basic(CardKind::Estate, "Estate", 2, &[Victory], 1),
    basic(CardKind::Duchy, "Duchy", 5, &[Victory], 3),
    basic(CardKind::Province, "Province", 8, &[Victory], 6),
    basic(CardKind::Curse, "Curse", 0, &[CardType::Curse], -1),
    action(CardKind::Cellar, "Cellar", 2, ACTION),
    action(CardKind::Chapel, "Chapel", 2, ACTION),
    action(CardKind::Moat, "Moat", 2, &[Action, Reaction]),
    action(CardKind::Harbinger, "Harbinger", 3, ACTION),
    action(CardKind::Merchant, "Merchant", 3, ACTION),
    action(CardKind::Vassal, "Vassal", 3, ACTION),
    action(CardKind::Village, "Village", 3, ACTION),
    action(CardKind::Workshop, "Workshop", 3, ACTION),
    action(CardKind::Bureaucrat, "Bureaucrat", 4, ACTION_ATTACK),
    CardSpec {
        kind: CardKind::Gardens,
        name: "Gardens",
        cost: 4,
        types: &[Victory],
        value: 0,
        dynamic_value: Some(gardens_value),
    },
    action(CardKind::Militia, "Militia", 4, ACTION_ATTACK),
    action(CardKind::Moneylender, "Moneylender", 4, ACTION),
    action(CardKind::Poacher, "Poacher", 4, ACTION),
    action(CardKind::Remodel, "Remodel", 4, ACTION),
    action(CardKind::Smithy, "Smithy", 4, ACTION),
    action(CardKind::ThroneRoom, "Throne Room", 4, ACTION),
    action(CardKind::Bandit, "Bandit", 5, ACTION_ATTACK),
    action(CardKind::CouncilRoom, "Council Room", 5, ACTION),
    action(CardKind::Festival, "Festival", 5, ACTION),
    action(CardKind::Laboratory, "Laboratory", 5, ACTION),
    action(CardKind::Library, "Library", 5, ACTION),
    action(CardKind::Market, "Market", 5, ACTION),
    action(CardKind::Mine, "Mine", 5, ACTION),
    action(CardKind::Sentry, "Sentry", 5, ACTION),
    action(CardKind::Witch, "Witch", 5, ACTION_ATTACK),
    action(CardKind::Artisan, "Artisan", 6, ACTION),
    action(CardKind::Chancellor, "Chancellor", 3, ACTION),
    action(CardKind::Woodcutter, "Woodcutter", 3, ACTION),
    action(CardKind::Feast, "Feast", 4, ACTION),
    action(CardKind::Spy, "Spy", 4, ACTION_ATTACK),
    action(CardKind::Thief, "Thief", 4, ACTION_ATTACK),
    action(CardKind::Adventurer, "Adventurer", 6, ACTION),
];

impl CardKind {
    /// Cards present in every game
    pub const BASIC: [CardKind; 7] = [
        CardKind::Copper,
        CardKind::Silver,
        CardKind::Gold,
        CardKind::Estate,
        CardKind::Duchy,
        CardKind::Province,
        CardKind::Curse,
    ];

    /// All kingdom cards that can be chosen for a game
    pub const KINGDOM: [CardKind; 32] = [
        CardKind::Cellar,
        CardKind::Chapel,
        CardKind::Moat,
        CardKind::Harbinger,
        CardKind::Merchant,
        CardKind::Vassal,
        CardKind::Village,
        CardKind::Workshop,
        CardKind::Bureaucrat,
        CardKind::Gardens,
        CardKind::Militia,
        CardKind::Moneylender,
        CardKind::Poacher,
        CardKind::Remodel,
        CardKind::Smithy,
        CardKind::ThroneRoom,
        CardKind::Bandit,
        CardKind::CouncilRoom,
        CardKind::Festival,
        CardKind::Laboratory,
        CardKind::Library,
        CardKind::Market,
        CardKind::Mine,
        CardKind::Sentry,
        CardKind::Witch,
        CardKind::Artisan,
        CardKind::Chancellor,
        CardKind::Woodcutter,
        CardKind::Feast,
        CardKind::Spy,
        CardKind::Thief,
        CardKind::Adventurer,
    ];

    /// Kingdom used when setup is given no override
    pub const DEFAULT_KINGDOM: [CardKind; 10] = [
        CardKind::Cellar,
        CardKind::Market,
        CardKind::Merchant,
        CardKind::Militia,
        CardKind::Mine,
        CardKind::Moat,
        CardKind::Remodel,
        CardKind::Smithy,
        CardKind::Village,
        CardKind::Workshop,
    ];

    /// Descriptor for this variant
    pub fn spec(self) -> &'static CardSpec {
        &CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn cost(self) -> u32 {
        self.spec().cost
    }

    pub fn has_type(self, card_type: CardType) -> bool {
        self.spec().has_type(card_type)
    }

    pub fn is_basic(self) -> bool {
        Self::BASIC.contains(&self)
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error parsing a card name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown card: {0}")]
pub struct UnknownCard(pub String);

impl FromStr for CardKind {
    type Err = UnknownCard;

    /// Case-insensitive; spaces are optional ("throne room", "ThroneRoom").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        CATALOG
            .iter()
            .find(|spec| {
                spec.name
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .eq_ignore_ascii_case(&wanted)
            })
            .map(|spec| spec.kind)
            .ok_or_else(|| UnknownCard(s.to_string()))
    }
}

/// Identity of a single card instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

/// A card instance. Instances of the same kind differ only by `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
}

impl Card {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn cost(&self) -> u32 {
        self.kind.cost()
    }

    pub fn is(&self, card_type: CardType) -> bool {
        self.kind.has_type(card_type)
    }

    pub fn is_action(&self) -> bool {
        self.is(CardType::Action)
    }

    pub fn is_treasure(&self) -> bool {
        self.is(CardType::Treasure)
    }

    pub fn is_victory(&self) -> bool {
        self.is(CardType::Victory)
    }

    pub fn is_reaction(&self) -> bool {
        self.is(CardType::Reaction)
    }

    /// Points this card is worth to `owner`
    pub fn points(&self, owner: &Player) -> i32 {
        let spec = self.kind.spec();
        match spec.dynamic_value {
            Some(value) => value(owner),
            None => spec.value,
        }
    }

    /// Coins this card adds when held in hand during the buy phase
    pub fn coins(&self) -> u32 {
        if self.is_treasure() {
            self.kind.spec().value.max(0) as u32
        } else {
            0
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hands out unique card identities for the lifetime of a game
#[derive(Debug, Clone, Default)]
pub struct CardMint {
    next: u32,
}

impl CardMint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create one new instance
    pub fn mint(&mut self, kind: CardKind) -> Card {
        let id = CardId(self.next);
        self.next += 1;
        Card { id, kind }
    }

    /// Create `count` new instances of the same kind
    pub fn mint_n(&mut self, kind: CardKind, count: usize) -> Vec<Card> {
        (0..count).map(|_| self.mint(kind)).collect()
    }

    /// Number of instances minted so far
    pub fn minted(&self) -> u32 {
        self.next
    }
}
