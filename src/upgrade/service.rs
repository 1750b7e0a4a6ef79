use super::logic::{perform_upgrade, UpgradeError};
use crate::cards::catalog::Catalog;
use crate::cards::types::CardInstance;
use crate::drops::types::DropResult;
use crate::profile::store::ProfileStore;
use crate::profile::types::{Inventory, PlayerProfile};
use crate::progression::xp::{add_xp, can_absorb, xp_value, CardProgress};
use tracing::{debug, info};

/// Single entry point for profile changes. Every operation loads the
/// profile, validates, mutates and saves; on error nothing is saved.
pub struct ProfileService<'a, S: ProfileStore> {
    store: S,
    catalog: &'a Catalog,
}

impl<'a, S: ProfileStore> ProfileService<'a, S> {
    pub fn new(store: S, catalog: &'a Catalog) -> Self {
        Self { store, catalog }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn profile(&self) -> Result<PlayerProfile, UpgradeError> {
        Ok(self.store.load()?)
    }

    pub fn inventory(&self) -> Result<Inventory, UpgradeError> {
        Ok(self.store.load()?.inventory())
    }

    fn transact<T>(&self, f: impl FnOnce(&mut PlayerProfile) -> Result<T, UpgradeError>) -> Result<T, UpgradeError> {
        let mut profile = self.store.load()?;
        let value = f(&mut profile)?;
        self.store.save(&profile)?;
        Ok(value)
    }

    /// Adds a fresh level-1 copy of `card_id` to the collection.
    pub fn grant_card(&self, card_id: &str) -> Result<CardInstance, UpgradeError> {
        if self.catalog.get(card_id).is_none() {
            return Err(UpgradeError::UnknownCard {
                card_id: card_id.to_string(),
            });
        }
        self.transact(|profile| {
            let instance = CardInstance::new(card_id);
            profile.collection.push(instance.clone());
            debug!(card_id, uid = %instance.uid, "card granted");
            Ok(instance)
        })
    }

    /// Stores the drawn card (if any) and the pity counters the drop left.
    pub fn apply_drop(&self, drop: &DropResult) -> Result<Option<CardInstance>, UpgradeError> {
        self.transact(|profile| {
            profile.pity = drop.pity;
            let granted = drop.card.as_ref().map(|card| CardInstance::new(&card.id));
            if let Some(instance) = &granted {
                profile.collection.push(instance.clone());
            }
            Ok(granted)
        })
    }

    /// Upgrades the deck card in `slot` and returns its new level.
    pub fn upgrade_deck_card(&self, slot: usize) -> Result<u32, UpgradeError> {
        let level = self.transact(|profile| perform_upgrade(profile, slot))?;
        info!(slot, level, "deck card upgraded");
        Ok(level)
    }

    /// Upgrades every deck card as far as its duplicates allow. Returns the
    /// number of levels gained.
    pub fn upgrade_all_deck_cards(&self) -> Result<u32, UpgradeError> {
        self.transact(|profile| {
            let mut upgrades = 0;
            // Spending deck duplicates shifts later slots, so sweep until a pass changes nothing.
            loop {
                let before = upgrades;
                let mut slot = 0;
                while slot < profile.deck_cards.len() {
                    match perform_upgrade(profile, slot) {
                        Ok(_) => upgrades += 1,
                        Err(UpgradeError::InsufficientCopies { .. }) => slot += 1,
                        Err(e) => return Err(e),
                    }
                }
                if upgrades == before {
                    return Ok(upgrades);
                }
            }
        })
    }

    /// Burns the collection copy `consumed_uid` into the XP progress of
    /// `target_card_id`.
    pub fn absorb_card(&self, target_card_id: &str, consumed_uid: &str) -> Result<CardProgress, UpgradeError> {
        let target = self
            .catalog
            .get(target_card_id)
            .ok_or_else(|| UpgradeError::UnknownCard {
                card_id: target_card_id.to_string(),
            })?;
        self.transact(|profile| {
            let index = profile
                .collection
                .iter()
                .position(|c| c.uid == consumed_uid)
                .ok_or_else(|| UpgradeError::UnknownInstance {
                    uid: consumed_uid.to_string(),
                })?;
            let consumed = &profile.collection[index];
            let consumed_card = self
                .catalog
                .get(&consumed.card_id)
                .ok_or_else(|| UpgradeError::UnknownCard {
                    card_id: consumed.card_id.clone(),
                })?;
            if !can_absorb(target, consumed_card) {
                return Err(UpgradeError::InvalidAbsorb {
                    target: target_card_id.to_string(),
                    consumed: consumed.card_id.clone(),
                });
            }
            let gained = xp_value(consumed.level);
            profile.collection.remove(index);
            let progress = add_xp(&mut profile.progress, target_card_id, gained);
            info!(
                target = target_card_id,
                xp = gained,
                level = progress.level,
                "card absorbed"
            );
            Ok(progress)
        })
    }
}
