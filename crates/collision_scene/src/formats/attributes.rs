//! Named collision flags and material attributes
//!
//! The binary formats store both as plain integers. Their meaning depends on
//! the game the file belongs to, so every lookup goes through [`Game`].
//! Names are the game symbols without their `COL_FLAG_` / `COL_MATERIAL_`
//! prefix; lookups by name accept either form.

#![allow(missing_docs)]

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::FormatRevision;

const FLAG_SYMBOL_PREFIX: &str = "COL_FLAG_";
const MATERIAL_SYMBOL_PREFIX: &str = "COL_MATERIAL_";

/// Which game's tables give names to flag bits and material ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Game {
    /// Paper Mario: The Thousand-Year Door (Switch)
    #[default]
    Ttyd,
    /// Paper Mario: The Origami King
    OrigamiKing,
    /// Paper Mario: Color Splash; no material table is known
    ColorSplash,
}

impl Game {
    /// Every supported game
    pub const ALL: [Self; 3] = [Self::Ttyd, Self::OrigamiKing, Self::ColorSplash];

    /// Identifier used in settings files and on the command line
    pub fn id(self) -> &'static str {
        match self {
            Self::Ttyd => "ttyd",
            Self::OrigamiKing => "origami_king",
            Self::ColorSplash => "color_splash",
        }
    }

    /// Look a game up by [`Game::id`]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|game| game.id().eq_ignore_ascii_case(id))
    }

    /// Revision the game's files are written in
    pub fn native_revision(self) -> FormatRevision {
        match self {
            Self::ColorSplash => FormatRevision::Legacy,
            Self::Ttyd | Self::OrigamiKing => FormatRevision::Current,
        }
    }

    /// `(name, bit)` for every named flag, in bit order
    pub fn flag_table(self) -> Vec<(&'static str, u64)> {
        match self {
            Self::Ttyd => TtydFlags::all().iter_names().map(|(name, f)| (name, f.bits())).collect(),
            Self::OrigamiKing => OrigamiKingFlags::all()
                .iter_names()
                .map(|(name, f)| (name, f.bits()))
                .collect(),
            Self::ColorSplash => ColorSplashFlags::all()
                .iter_names()
                .map(|(name, f)| (name, u64::from(f.bits())))
                .collect(),
        }
    }

    /// Names of the set bits of `flag`, lowest first. Bits the table does
    /// not name come out as `BIT<n>`.
    pub fn flag_names(self, flag: u64) -> Vec<String> {
        let table = self.flag_table();
        (0..u64::BITS)
            .map(|bit| 1u64 << bit)
            .filter(|&value| flag & value != 0)
            .map(|value| {
                table
                    .iter()
                    .find(|&&(_, named)| named == value)
                    .map_or_else(|| format!("BIT{}", value.trailing_zeros()), |(name, _)| (*name).to_string())
            })
            .collect()
    }

    /// `flag` as `NAME | NAME`, or `NONE` when no bit is set
    pub fn describe_flags(self, flag: u64) -> String {
        if flag == 0 {
            return "NONE".to_string();
        }
        self.flag_names(flag).join(" | ")
    }

    /// Bit value of a named flag
    pub fn flag_from_name(self, name: &str) -> Option<u64> {
        let name = name.strip_prefix(FLAG_SYMBOL_PREFIX).unwrap_or(name);
        self.flag_table()
            .into_iter()
            .find(|(named, _)| named.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Name of material attribute `id`
    pub fn material_name(self, id: u32) -> Option<&'static str> {
        match self {
            Self::Ttyd => TtydMaterial::from_id(id).map(TtydMaterial::name),
            Self::OrigamiKing => OrigamiKingMaterial::from_id(id).map(OrigamiKingMaterial::name),
            Self::ColorSplash => None,
        }
    }

    /// Material name, or the bare number when the table has none
    pub fn material_label(self, id: u32) -> String {
        self.material_name(id).map_or_else(|| id.to_string(), str::to_string)
    }

    /// Attribute id of a named material
    pub fn material_from_name(self, name: &str) -> Option<u32> {
        let name = name.strip_prefix(MATERIAL_SYMBOL_PREFIX).unwrap_or(name);
        match self {
            Self::Ttyd => TtydMaterial::from_name(name).map(TtydMaterial::id),
            Self::OrigamiKing => OrigamiKingMaterial::from_name(name).map(OrigamiKingMaterial::id),
            Self::ColorSplash => None,
        }
    }
}

bitflags! {
    /// Collision flags of The Thousand-Year Door
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TtydFlags: u64 {
        const TYPE_1 = 1 << 0;
        const TOMEI = 1 << 1;
        const HAMMER = 1 << 2;
        const ENEMY = 1 << 3;
        const PARTY = 1 << 4;
        const TYPE_2 = 1 << 5;
        const TYPE_3 = 1 << 6;
        const TYPE_4 = 1 << 7;
        const SLIT = 1 << 8;
        const ROLL = 1 << 9;
        const OUTLINE = 1 << 10;
        const TYPE_5 = 1 << 11;
        const TYPE_6 = 1 << 12;
        const TYPE_7 = 1 << 13;
        const TYPE_8 = 1 << 14;
        const EMERGENCY = 1 << 15;
        const TYPE_9 = 1 << 16;
        const TYPE_10 = 1 << 17;
        const TYPE_11 = 1 << 18;
        const TYPE_12 = 1 << 19;
        const ITEM = 1 << 20;
        const TYPE_13 = 1 << 21;
        const TYPE_14 = 1 << 22;
        const TYPE_15 = 1 << 23;
        const TYPE_16 = 1 << 24;
        const TYPE_17 = 1 << 25;
        const IGNORE_NPC = 1 << 26;
        const TYPE_18 = 1 << 27;
        const TYPE_19 = 1 << 28;
        const TYPE_20 = 1 << 29;
        const IGNORE_SHIP = 1 << 30;
        const TYPE_21 = 1 << 31;
        const TYPE_22 = 1 << 32;
        const TYPE_23 = 1 << 33;
        const IGNORE_TOMEI = 1 << 34;
        const IGNORE_KAKURE = 1 << 35;
        const TYPE_24 = 1 << 36;
        const IGNORE_ENEMY = 1 << 37;
        const PARTYBIG = 1 << 38;
        const TYPE_25 = 1 << 39;
        const TYPE_26 = 1 << 40;
        const TYPE_27 = 1 << 41;
        const TYPE_28 = 1 << 42;
        const TYPE_29 = 1 << 43;
        const TYPE_30 = 1 << 44;
        const TYPE_31 = 1 << 45;
        const TYPE_32 = 1 << 46;
        const TYPE_33 = 1 << 47;
        const IGNORE_PLAYER = 1 << 48;
        const IGNORE_PARTY = 1 << 49;
        const IGNORE_SLIT = 1 << 50;
        const IGNORE_ROLL = 1 << 51;
        const TYPE_34 = 1 << 52;
        const ABYSS = 1 << 53;
        const TYPE_35 = 1 << 54;
        const IGNORE_JABARA = 1 << 55;
        const TYPE_36 = 1 << 56;
        const TYPE_37 = 1 << 57;
        const TYPE_38 = 1 << 58;
        const TYPE_39 = 1 << 59;
        const TYPE_40 = 1 << 60;
        const IGNORE_PARTY_MASK = 1 << 61;
        const TYPE_41 = 1 << 62;
        const TYPE_42 = 1 << 63;
    }
}

bitflags! {
    /// Collision flags of The Origami King
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OrigamiKingFlags: u64 {
        const IGNORE_PAPER = 1 << 0;
        const IGNORE_TOMEI = 1 << 1;
        const IGNORE_HAMMER = 1 << 2;
        const IGNORE_ENEMY = 1 << 3;
        const IGNORE_PARTY = 1 << 4;
        const IGNORE_BOTHSIDES = 1 << 5;
        const IGNORE_OTOTO = 1 << 6;
        const IGNORE_TOGE = 1 << 7;
        const IGNORE_HAMMERPAPER = 1 << 8;
        const IGNORE_MARIOHAMMER = 1 << 9;
        const IGNORE_STRONG = 1 << 10;
        const IGNORE_MARIOPAPER = 1 << 11;
        const IGNORE_SWINGHAMMER = 1 << 12;
        const IGNORE_SLOPE = 1 << 13;
        const IGNORE_WEAK = 1 << 14;
        const IGNORE_EMERGENCY = 1 << 15;
        const IGNORE_X_INKMASK = 1 << 16;
        const IGNORE_IGNOREHANDLE = 1 << 17;
        const IGNORE_NOTONMOVE = 1 << 18;
        const IGNORE_IGNOREITEM = 1 << 19;
        const IGNORE_ITEM = 1 << 20;
        const IGNORE_KAKURE = 1 << 21;
        const IGNORE_SOFT = 1 << 22;
        const IGNORE_WALL = 1 << 23;
        const IGNORE_OTOTOGUARD = 1 << 24;
        const IGNORE_HEADBUTTEFFECT = 1 << 25;
        const IGNORE_IGNORENPC = 1 << 26;
        const IGNORE_X_ONLYPAINT = 1 << 27;
        const IGNORE_IGNOREPAPER = 1 << 28;
        const IGNORE_X_INVISIBLE = 1 << 29;
        const IGNORE_X_NOTPAINT = 1 << 30;
        const IGNORE_WATERSURFACE = 1 << 31;
        const IGNORE_VEHICLE = 1 << 32;
        const IGNORE_HARIKO = 1 << 33;
        const IGNORE_VEHICLEFORCEHIT = 1 << 34;
        const IGNORE_SPECIALMESH = 1 << 35;
        const IGNORE_PRESIMPLIFY = 1 << 36;
        const IGNORE_OUTLINE = 1 << 37;
        const IGNORE_ENEMYITEM = 1 << 38;
        const IGNORE_IGNOREHARIKO = 1 << 39;
        const IGNORE_NORECOVERPOS = 1 << 40;
        const IGNORE_NOGENERATEHOLE = 1 << 41;
        const IGNORE_HINT = 1 << 42;
        const IGNORE_ONDYNAMIC_NO_IGNOREROTATE = 1 << 43;
        const IGNORE_NOCAMERASHAKE = 1 << 44;
        const IGNORE_WEAPON = 1 << 45;
        const IGNORE_NOPUSHUPWALL = 1 << 46;
        const IGNORE_ICEPLATE = 1 << 47;
        const IGNORE_HOLESURFACE = 1 << 48;
        const IGNORE_HOLEWALL = 1 << 49;
        const IGNORE_HITONDASHATTACK = 1 << 50;
        const IGNORE_HOLEINNERWALL = 1 << 51;
        const IGNORE_HOLEGUARDWALL = 1 << 52;
        const IGNORE_HOLEBORDER = 1 << 53;
        const IGNORE_VEHICLEMESH = 1 << 54;
        const IGNORE_HARIKOMESH = 1 << 55;
        const IGNORE_HOLEWALLCOVER = 1 << 56;
        const IGNORE_ITEMMESH = 1 << 57;
        const IGNORE_PLAYER_MASK = 1 << 58;
        const IGNORE_HAMMER_MASK = 1 << 59;
        const IGNORE_PAPER_MASK = 1 << 60;
        const IGNORE_NPC_MASK = 1 << 61;
        const IGNORE_NPCWEAPON_MASK = 1 << 62;
        const IGNORE_HARIKO_MASK = 1 << 63;
    }
}

bitflags! {
    /// Collision flags of Color Splash; the legacy revision stores 32 bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ColorSplashFlags: u32 {
        const TYPE_0 = 1 << 0;
        const TOMEI = 1 << 1;
        const TYPE_2 = 1 << 2;
        const TYPE_3 = 1 << 3;
        const TYPE_4 = 1 << 4;
        const TYPE_5 = 1 << 5;
        const TYPE_6 = 1 << 6;
        const TYPE_7 = 1 << 7;
        const TYPE_8 = 1 << 8;
        const TYPE_9 = 1 << 9;
        const TYPE_10 = 1 << 10;
        const TYPE_11 = 1 << 11;
        const TYPE_12 = 1 << 12;
        const TYPE_13 = 1 << 13;
        const TYPE_14 = 1 << 14;
        const TYPE_15 = 1 << 15;
        const TYPE_16 = 1 << 16;
        const TYPE_17 = 1 << 17;
        const TYPE_18 = 1 << 18;
        const TYPE_19 = 1 << 19;
        const TYPE_20 = 1 << 20;
        const TYPE_21 = 1 << 21;
        const TYPE_22 = 1 << 22;
        const TYPE_23 = 1 << 23;
        const TYPE_24 = 1 << 24;
        const TYPE_25 = 1 << 25;
        const TYPE_26 = 1 << 26;
        const TYPE_27 = 1 << 27;
        const TYPE_28 = 1 << 28;
        const TYPE_29 = 1 << 29;
        const TYPE_30 = 1 << 30;
    }
}

macro_rules! material_table {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $id:literal => $label:literal,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum $name {
            $($variant = $id,)*
        }

        impl $name {
            /// Every entry, in id order
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Entry for attribute `id`
            pub fn from_id(id: u32) -> Option<Self> {
                match id {
                    $($id => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Attribute id stored in files
            pub fn id(self) -> u32 {
                self as u32
            }

            /// Symbol name without its prefix
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)*
                }
            }

            /// Entry with the given name, ignoring case
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|m| m.name().eq_ignore_ascii_case(name))
            }
        }
    };
}

material_table! {
    /// Surface materials of The Thousand-Year Door
    TtydMaterial {
        Plain = 0 => "PLAIN",
        Turf = 1 => "TURF",
        Grass = 2 => "GRASS",
        Grass2 = 3 => "GRASS2",
        Stone = 4 => "STONE",
        Wood = 5 => "WOOD",
        Woodplate = 6 => "WOODPLATE",
        Metal = 7 => "METAL",
        Metalplate = 8 => "METALPLATE",
        Sand = 9 => "SAND",
        Water = 10 => "WATER",
        Ice = 11 => "ICE",
        Snow = 12 => "SNOW",
        Cloththick = 13 => "CLOTHTHICK",
        Gravel = 14 => "GRAVEL",
        Concretetube = 15 => "CONCRETETUBE",
        Flower = 16 => "FLOWER",
        Leaf = 17 => "LEAF",
        Soil = 18 => "SOIL",
        Glass = 19 => "GLASS",
        Papertape = 20 => "PAPERTAPE",
        Hole = 21 => "HOLE",
        Tatami = 22 => "TATAMI",
        Pottery = 23 => "POTTERY",
        Lava = 24 => "LAVA",
        Realsoil = 25 => "REALSOIL",
        Realice = 26 => "REALICE",
        Realwater = 27 => "REALWATER",
        Oil = 28 => "OIL",
        Watershallow = 29 => "WATERSHALLOW",
        Tree = 30 => "TREE",
        Treeslim = 31 => "TREESLIM",
        Pampasgrass = 32 => "PAMPASGRASS",
        Squidink = 33 => "SQUIDINK",
        Treebig = 34 => "TREEBIG",
        Bush = 35 => "BUSH",
        Wire = 36 => "WIRE",
        Stoneprocess = 37 => "STONEPROCESS",
        Cloth = 38 => "CLOTH",
        Gold = 39 => "GOLD",
        Mud = 40 => "MUD",
        Thorn = 41 => "THORN",
        Magiccircle = 42 => "MAGICCIRCLE",
        Soilhard = 43 => "SOILHARD",
        Plastic = 44 => "PLASTIC",
        Cardboard = 45 => "CARDBOARD",
        Metalchain = 46 => "METALCHAIN",
        Clothhard = 47 => "CLOTHHARD",
        Clothsoft = 48 => "CLOTHSOFT",
        Paper = 49 => "PAPER",
        Paperthick = 50 => "PAPERTHICK",
        Potterybig = 51 => "POTTERYBIG",
        Rubber = 52 => "RUBBER",
        Metalfence = 53 => "METALFENCE",
        Highgrass = 54 => "HIGHGRASS",
        Brick = 55 => "BRICK",
        Generichard = 56 => "GENERICHARD",
        Genericsoft = 57 => "GENERICSOFT",
        Junglegrass = 58 => "JUNGLEGRASS",
        Ash = 59 => "ASH",
        Roofingtile = 60 => "ROOFINGTILE",
        Specialusage1 = 61 => "SPECIALUSAGE1",
        Specialusage2 = 62 => "SPECIALUSAGE2",
        Specialusage3 = 63 => "SPECIALUSAGE3",
        Specialusage4 = 64 => "SPECIALUSAGE4",
        Realoil = 65 => "REALOIL",
        Rope = 66 => "ROPE",
        Magiccircleice = 67 => "MAGICCIRCLEICE",
        Momiji = 68 => "MOMIJI",
        Vinyl = 69 => "VINYL",
        Leaffallen = 70 => "LEAFFALLEN",
        Replicate = 71 => "REPLICATE",
        Bamboo = 72 => "BAMBOO",
        Straw = 73 => "STRAW",
        Roofingtilewood = 74 => "ROOFINGTILEWOOD",
        Metalcan = 75 => "METALCAN",
        Metalcansmall = 76 => "METALCANSMALL",
        Clothextrathick = 77 => "CLOTHEXTRATHICK",
        Wetland = 78 => "WETLAND",
        Waterrunning = 79 => "WATERRUNNING",
        Highgrass2 = 80 => "HIGHGRASS2",
        Marioobject = 81 => "MARIOOBJECT",
        Glassbroken = 82 => "GLASSBROKEN",
        Icenoslip = 83 => "ICENOSLIP",
        Stoneplate = 84 => "STONEPLATE",
        Metalhollow = 85 => "METALHOLLOW",
        Metalhollowbig = 86 => "METALHOLLOWBIG",
        Metalhollowsmall = 87 => "METALHOLLOWSMALL",
        Metalpipe = 88 => "METALPIPE",
        Metalpipebig = 89 => "METALPIPEBIG",
        Metalpipesmall = 90 => "METALPIPESMALL",
        Woodrattle = 91 => "WOODRATTLE",
        Stonerattle = 92 => "STONERATTLE",
        Cloththickhard = 93 => "CLOTHTHICKHARD",
        Leaffallenwater = 94 => "LEAFFALLENWATER",
        Clothextrathickhard = 95 => "CLOTHEXTRATHICKHARD",
        Potteryrattle = 96 => "POTTERYRATTLE",
        Plant = 97 => "PLANT",
        Brickrattle = 98 => "BRICKRATTLE",
        Waterdeep = 99 => "WATERDEEP",
        Soilsoft = 100 => "SOILSOFT",
        Metalplatethin = 101 => "METALPLATETHIN",
        Watersoap = 102 => "WATERSOAP",
        Flowercarpet = 103 => "FLOWERCARPET",
        Asparagus = 104 => "ASPARAGUS",
        Vinewonder = 105 => "VINEWONDER",
        Hologram = 106 => "HOLOGRAM",
        Melon = 107 => "MELON",
        Concreteplate = 108 => "CONCRETEPLATE",
        Soillittlesoft = 109 => "SOILLITTLESOFT",
        Tile = 110 => "TILE",
        Concrete = 111 => "CONCRETE",
        Goldcoin = 112 => "GOLDCOIN",
        Liquidsticky = 113 => "LIQUIDSTICKY",
        Anotherdimension = 114 => "ANOTHERDIMENSION",
        Waterpuddle = 122 => "WATERPUDDLE",
    }
}

material_table! {
    /// Surface materials of The Origami King
    OrigamiKingMaterial {
        Plain = 0 => "PLAIN",
        Turf = 1 => "TURF",
        Grass = 2 => "GRASS",
        Grass2 = 3 => "GRASS2",
        Stone = 4 => "STONE",
        Wood = 5 => "WOOD",
        Woodplate = 6 => "WOODPLATE",
        Metal = 7 => "METAL",
        Metalplate = 8 => "METALPLATE",
        Sand = 9 => "SAND",
        Water = 10 => "WATER",
        Ice = 11 => "ICE",
        Snow = 12 => "SNOW",
        Cloththick = 13 => "CLOTHTHICK",
        Gravel = 14 => "GRAVEL",
        Concrete = 15 => "CONCRETE",
        Flower = 16 => "FLOWER",
        Leaf = 17 => "LEAF",
        Soil = 18 => "SOIL",
        Glass = 19 => "GLASS",
        Papertape = 20 => "PAPERTAPE",
        Hole = 21 => "HOLE",
        Tatami = 22 => "TATAMI",
        Pottery = 23 => "POTTERY",
        Lava = 24 => "LAVA",
        Realsoil = 25 => "REALSOIL",
        Realice = 26 => "REALICE",
        Realwater = 27 => "REALWATER",
        Oil = 28 => "OIL",
        Watershallow = 29 => "WATERSHALLOW",
        Tree = 30 => "TREE",
        Treeslim = 31 => "TREESLIM",
        Pampasgrass = 32 => "PAMPASGRASS",
        Squidink = 33 => "SQUIDINK",
        Treebig = 34 => "TREEBIG",
        Bush = 35 => "BUSH",
        Wire = 36 => "WIRE",
        Stoneprocess = 37 => "STONEPROCESS",
        Cloth = 38 => "CLOTH",
        Gold = 39 => "GOLD",
        Mud = 40 => "MUD",
        Thorn = 41 => "THORN",
        Magiccircle = 42 => "MAGICCIRCLE",
        Soilhard = 43 => "SOILHARD",
        Plastic = 44 => "PLASTIC",
        Cardboard = 45 => "CARDBOARD",
        Metalchain = 46 => "METALCHAIN",
        Clothhard = 47 => "CLOTHHARD",
        Clothsoft = 48 => "CLOTHSOFT",
        Paper = 49 => "PAPER",
        Paperthick = 50 => "PAPERTHICK",
        Potterybig = 51 => "POTTERYBIG",
        Rubber = 52 => "RUBBER",
        Metalfence = 53 => "METALFENCE",
        Highgrass = 54 => "HIGHGRASS",
        Brick = 55 => "BRICK",
        Generichard = 56 => "GENERICHARD",
        Genericsoft = 57 => "GENERICSOFT",
        Junglegrass = 58 => "JUNGLEGRASS",
        Ash = 59 => "ASH",
        Roofingtile = 60 => "ROOFINGTILE",
        Specialusage1 = 61 => "SPECIALUSAGE1",
        Specialusage2 = 62 => "SPECIALUSAGE2",
        Specialusage3 = 63 => "SPECIALUSAGE3",
        Specialusage4 = 64 => "SPECIALUSAGE4",
        Realoil = 65 => "REALOIL",
        Rope = 66 => "ROPE",
        Magiccircleice = 67 => "MAGICCIRCLEICE",
        Momiji = 68 => "MOMIJI",
        Vinyl = 69 => "VINYL",
        Leaffallen = 70 => "LEAFFALLEN",
        Tomeiblockmark = 71 => "TOMEIBLOCKMARK",
        Bamboo = 72 => "BAMBOO",
        Straw = 73 => "STRAW",
        Roofingtilewood = 74 => "ROOFINGTILEWOOD",
        Metalcan = 75 => "METALCAN",
        Metalcansmall = 76 => "METALCANSMALL",
        Clothextrathick = 77 => "CLOTHEXTRATHICK",
        Wetland = 78 => "WETLAND",
        Waterrunning = 79 => "WATERRUNNING",
        Highgrass2 = 80 => "HIGHGRASS2",
        Marioobject = 81 => "MARIOOBJECT",
        Glassbroken = 82 => "GLASSBROKEN",
        Icenoslip = 83 => "ICENOSLIP",
        Stoneplate = 84 => "STONEPLATE",
        Metalhollow = 85 => "METALHOLLOW",
        Metalhollowbig = 86 => "METALHOLLOWBIG",
        Metalhollowsmall = 87 => "METALHOLLOWSMALL",
        Metalpipe = 88 => "METALPIPE",
        Metalpipebig = 89 => "METALPIPEBIG",
        Metalpipesmall = 90 => "METALPIPESMALL",
        Woodrattle = 91 => "WOODRATTLE",
        Stonerattle = 92 => "STONERATTLE",
        Cloththickhard = 93 => "CLOTHTHICKHARD",
        Leaffallenwater = 94 => "LEAFFALLENWATER",
        Clothextrathickhard = 95 => "CLOTHEXTRATHICKHARD",
    }
}
