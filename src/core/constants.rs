// Deck and duel shape
pub const DECK_SIZE: usize = 9;
pub const DEFAULT_STARTING_HP: u32 = 100;
pub const MIRROR_HAND_SIZE: usize = 3;
pub const MIRROR_LOG_CAP: usize = 10;

// Element multipliers
pub const STRONG_MULTIPLIER: f64 = 1.5;
pub const WEAK_MULTIPLIER: f64 = 0.5;
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

// Power growth
pub const DEFAULT_UPGRADE_MULT: f64 = 1.1;
pub const POWER_PROGRESSION_MAX_LEVEL: u32 = 20;
// Additive power step per level, indexed by rarity rank - 1 (R1..R6)
pub const RARITY_POWER_INCREMENT: [u32; 6] = [10, 20, 50, 100, 500, 500];

// XP curve: need(L) = 20 + 12*(L-1) + 2*(L-1)^2
pub const XP_NEED_BASE: u32 = 20;
pub const XP_NEED_LINEAR: u32 = 12;
pub const XP_NEED_QUADRATIC: u32 = 2;

// Drop rates (percent weights, R1..R6)
pub const DEFAULT_RARITY_WEIGHTS: [f64; 6] = [60.0, 15.0, 15.0, 10.0, 0.0, 0.0];
pub const DEFAULT_ELEMENT_WEIGHT: f64 = 25.0;
pub const LEGENDARY_GUARANTEE_AFTER: u32 = 40;
pub const MYTHIC_GUARANTEE_AFTER: u32 = 120;
pub const POST_DUEL_DROP_CHANCE: f64 = 0.05;

// Adaptive enemy deck
pub const ENEMY_TARGET_OFFSET: i64 = 20;
pub const ENEMY_LEVEL_CAP: u32 = 20;
pub const ENEMY_LEVEL_UP_ATTEMPTS: u32 = 500;

// Profile
pub const STARTING_BOLTS: u64 = 500;
pub const PROFILE_FILE_NAME: &str = "profile.json";
pub const SAVE_DIR_NAME: &str = ".cardastika";
