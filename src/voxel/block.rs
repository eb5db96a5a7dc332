//! Block type

use std::fmt;
use std::str::FromStr;

/// One of the 50 classic block types, stored as a single byte in the map
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Block {
    #[default]
    Air = 0,
    Stone = 1,
    Grass = 2,
    Dirt = 3,
    Cobblestone = 4,
    Plank = 5,
    Plant = 6,
    Admincrete = 7,
    Water = 8,
    StillWater = 9,
    Lava = 10,
    StillLava = 11,
    Sand = 12,
    Gravel = 13,
    GoldOre = 14,
    IronOre = 15,
    Coal = 16,
    Log = 17,
    Leaves = 18,
    Sponge = 19,
    Glass = 20,
    Red = 21,
    Orange = 22,
    Yellow = 23,
    Lime = 24,
    Green = 25,
    Teal = 26,
    Aqua = 27,
    Cyan = 28,
    Blue = 29,
    Indigo = 30,
    Violet = 31,
    Magenta = 32,
    Pink = 33,
    Black = 34,
    Gray = 35,
    White = 36,
    YellowFlower = 37,
    RedFlower = 38,
    BrownMushroom = 39,
    RedMushroom = 40,
    Gold = 41,
    Iron = 42,
    DoubleStair = 43,
    Stair = 44,
    Brick = 45,
    Tnt = 46,
    Books = 47,
    MossyRocks = 48,
    Obsidian = 49,
}

impl Block {
    /// Every block, indexed by its id
    pub const ALL: [Block; 50] = [
        Block::Air, Block::Stone, Block::Grass, Block::Dirt, Block::Cobblestone,
        Block::Plank, Block::Plant, Block::Admincrete, Block::Water, Block::StillWater,
        Block::Lava, Block::StillLava, Block::Sand, Block::Gravel, Block::GoldOre,
        Block::IronOre, Block::Coal, Block::Log, Block::Leaves, Block::Sponge,
        Block::Glass, Block::Red, Block::Orange, Block::Yellow, Block::Lime,
        Block::Green, Block::Teal, Block::Aqua, Block::Cyan, Block::Blue,
        Block::Indigo, Block::Violet, Block::Magenta, Block::Pink, Block::Black,
        Block::Gray, Block::White, Block::YellowFlower, Block::RedFlower, Block::BrownMushroom,
        Block::RedMushroom, Block::Gold, Block::Iron, Block::DoubleStair, Block::Stair,
        Block::Brick, Block::Tnt, Block::Books, Block::MossyRocks, Block::Obsidian,
    ];

    const NAMES: [&'static str; 50] = [
        "air", "stone", "grass", "dirt", "cobblestone",
        "plank", "plant", "admincrete", "water", "stillwater",
        "lava", "stilllava", "sand", "gravel", "goldore",
        "ironore", "coal", "log", "leaves", "sponge",
        "glass", "red", "orange", "yellow", "lime",
        "green", "teal", "aqua", "cyan", "blue",
        "indigo", "violet", "magenta", "pink", "black",
        "gray", "white", "yellowflower", "redflower", "brownmushroom",
        "redmushroom", "gold", "iron", "doublestair", "stair",
        "brick", "tnt", "books", "mossyrocks", "obsidian",
    ];

    const ALIASES: &'static [(&'static str, Block)] = &[
        ("rock", Block::Stone),
        ("cobble", Block::Cobblestone),
        ("wood", Block::Plank),
        ("sapling", Block::Plant),
        ("bedrock", Block::Admincrete),
        ("adminium", Block::Admincrete),
        ("tree", Block::Log),
        ("trunk", Block::Log),
        ("grey", Block::Gray),
        ("purple", Block::Violet),
        ("steps", Block::DoubleStair),
        ("step", Block::Stair),
        ("slab", Block::Stair),
        ("bookshelf", Block::Books),
        ("mossy", Block::MossyRocks),
        ("empty", Block::Air),
    ];

    /// Block for a raw map byte, if it is a known id
    pub fn from_u8(id: u8) -> Option<Block> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a block name or number is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized block \"{0}\"")]
pub struct UnknownBlock(pub String);

impl FromStr for Block {
    type Err = UnknownBlock;

    /// Accepts a block name (case-insensitive, `_` ignored), an alias or a numeric id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<u8>() {
            return Block::from_u8(id).ok_or_else(|| UnknownBlock(s.to_string()));
        }
        let key: String = s.chars().filter(|&c| c != '_').collect::<String>().to_lowercase();
        if let Some(index) = Block::NAMES.iter().position(|&name| name == key) {
            return Ok(Block::ALL[index]);
        }
        Block::ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|&(_, block)| block)
            .ok_or_else(|| UnknownBlock(s.to_string()))
    }
}
