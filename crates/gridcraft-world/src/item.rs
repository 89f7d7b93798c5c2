//! Chargeable items and their durable charge.
//!
//! An item's charge lives in a string-keyed [`ChargeStore`] attached to its
//! stack, under [`CHARGE_KEY`], as the canonical decimal string of an
//! [`EnergyValue`]. Only single-item stacks can be charged or discharged.

use std::collections::BTreeMap;

use gridcraft_types::EnergyValue;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Store key the charge is persisted under: `gridcraft:Charge`.
pub const CHARGE_KEY: &str = "gridcraft:Charge";

/// String-keyed persistent storage attached to an item stack.
pub trait ChargeStore {
    /// Value stored under `key`.
    fn get(&self, key: &str) -> Option<&str>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String);

    /// Whether anything is stored under `key`.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// [`ChargeStore`] kept in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryChargeStore {
    entries: BTreeMap<String, String>,
}

impl MemoryChargeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChargeStore for MemoryChargeStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }
}

/// A stack of identical items with its attached data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack<S = MemoryChargeStore> {
    /// Number of items in the stack.
    pub count: u32,
    /// Persistent data shared by the stack.
    pub data: S,
}

impl ItemStack {
    /// A single item with empty data.
    pub fn single() -> Self {
        Self {
            count: 1,
            data: MemoryChargeStore::new(),
        }
    }
}

/// An item that carries an energy charge between zero and
/// [`max_charge`](ChargeableItem::max_charge).
pub trait ChargeableItem {
    /// Largest charge the item can hold.
    fn max_charge(&self) -> EnergyValue;

    /// Current charge. A stack with nothing stored reads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CorruptCharge`] if the stored value is not a
    /// valid energy amount.
    fn charge_of<S: ChargeStore>(&self, stack: &ItemStack<S>) -> Result<EnergyValue, WorldError> {
        match stack.data.get(CHARGE_KEY) {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(EnergyValue::ZERO),
        }
    }

    /// Room left before the item is full.
    fn free_space<S: ChargeStore>(&self, stack: &ItemStack<S>) -> Result<EnergyValue, WorldError> {
        Ok(self.max_charge().saturating_sub(self.charge_of(stack)?))
    }

    /// Whether the item is not fully charged.
    fn has_free_space<S: ChargeStore>(&self, stack: &ItemStack<S>) -> Result<bool, WorldError> {
        Ok(self.charge_of(stack)? < self.max_charge())
    }

    /// Whether the item holds any energy.
    fn has_energy<S: ChargeStore>(&self, stack: &ItemStack<S>) -> Result<bool, WorldError> {
        Ok(!self.charge_of(stack)?.is_zero())
    }

    /// Overwrite the charge, capped at the maximum.
    fn set_charge<S: ChargeStore>(&self, stack: &mut ItemStack<S>, charge: EnergyValue) {
        let charge = charge.min(self.max_charge());
        stack.data.set(CHARGE_KEY, charge.to_string());
    }

    /// Add up to `amount`, returning what the item could not use.
    ///
    /// Stacks of more than one item are not charged at all.
    fn charge<S: ChargeStore>(
        &self,
        stack: &mut ItemStack<S>,
        amount: EnergyValue,
    ) -> Result<EnergyValue, WorldError> {
        if stack.count != 1 {
            return Ok(amount);
        }
        let charge = self.charge_of(stack)?;
        let used = self.max_charge().saturating_sub(charge).min(amount);
        self.set_charge(stack, charge.saturating_add(used));
        Ok(amount.saturating_sub(used))
    }

    /// Remove exactly `amount`, or nothing if the item holds less.
    fn discharge<S: ChargeStore>(
        &self,
        stack: &mut ItemStack<S>,
        amount: EnergyValue,
    ) -> Result<bool, WorldError> {
        if stack.count != 1 {
            return Ok(false);
        }
        let charge = self.charge_of(stack)?;
        if charge < amount {
            return Ok(false);
        }
        self.set_charge(stack, charge.saturating_sub(amount));
        Ok(true)
    }

    /// Initialise a freshly crafted stack. Existing charge is kept.
    fn on_craft<S: ChargeStore>(&self, stack: &mut ItemStack<S>) {
        if !stack.data.contains(CHARGE_KEY) {
            stack.data.set(CHARGE_KEY, EnergyValue::ZERO.to_string());
        }
    }
}

/// A plain rechargeable cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyCell {
    /// Largest charge the cell holds.
    pub max_charge: EnergyValue,
}

impl ChargeableItem for EnergyCell {
    fn max_charge(&self) -> EnergyValue {
        self.max_charge
    }
}
