//! Card upgrades and the profile service that owns every profile mutation.

pub mod logic;
pub mod service;

pub use logic::{
    can_upgrade, extra_copies, has_any_upgradable, perform_upgrade, upgrade_cost, upgrade_stats, UpgradeError,
    UpgradeStats,
};
pub use service::ProfileService;
