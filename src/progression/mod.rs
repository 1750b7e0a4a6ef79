//! Card power growth and the XP curve.

pub mod power;
pub mod xp;

pub use power::{additive_power, multiplicative_power, rarity_increment};
pub use xp::{add_xp, xp_needed, xp_value, CardProgress};
