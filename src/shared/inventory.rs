use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{ItemCatalog, ItemId, INVENTORY_COLS, INVENTORY_ROWS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: ItemId,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(item_id: impl Into<ItemId>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// A stack lifted off the grid by a drag gesture, remembering where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldStack {
    pub stack: ItemStack,
    pub origin: usize,
}

/// One non-empty slot in an exported snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub slot: usize,
    pub id: ItemId,
    pub qty: u32,
}

/// Fixed-size grid of stacks, `rows × cols`, scanned row by row.
///
/// Every occupied slot holds `0 < quantity <= max_stack` of a catalogued
/// item. Mutators that cannot honour that leave the slot untouched.
#[derive(Resource, Debug, Clone)]
pub struct Inventory {
    rows: usize,
    cols: usize,
    slots: Vec<Option<ItemStack>>,
    held: Option<HeldStack>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(INVENTORY_ROWS, INVENTORY_COLS)
    }
}

impl Inventory {
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            slots: vec![None; rows * cols],
            held: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none) && self.held.is_none()
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&ItemStack> {
        self.assert_slot(index);
        self.slots[index].as_ref()
    }

    pub fn held(&self) -> Option<&HeldStack> {
        self.held.as_ref()
    }

    fn assert_slot(&self, index: usize) {
        assert!(
            index < self.slots.len(),
            "inventory slot {index} out of range (0..{})",
            self.slots.len()
        );
    }

    /// Adds `amount` units, topping up existing stacks before opening new
    /// ones. Returns true only if everything fit; whatever did fit stays.
    pub fn add_item(&mut self, catalog: &ItemCatalog, item_id: &str, amount: u32) -> bool {
        if amount == 0 {
            return true;
        }
        let Some(max_stack) = catalog.max_stack(item_id) else {
            return false;
        };
        let mut remaining = amount;

        // First pass: merge into stacks of the same item
        for stack in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if stack.item_id == item_id && stack.quantity < max_stack {
                let add = remaining.min(max_stack - stack.quantity);
                stack.quantity += add;
                remaining -= add;
            }
        }

        // Second pass: open empty slots
        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let add = remaining.min(max_stack);
                *slot = Some(ItemStack::new(item_id, add));
                remaining -= add;
            }
        }

        remaining == 0
    }

    /// True if `add_item` with the same arguments would absorb everything.
    pub fn can_fit(&self, catalog: &ItemCatalog, item_id: &str, amount: u32) -> bool {
        if amount == 0 {
            return true;
        }
        let Some(max_stack) = catalog.max_stack(item_id) else {
            return false;
        };
        let capacity: u64 = self
            .slots
            .iter()
            .map(|slot| match slot {
                None => max_stack as u64,
                Some(s) if s.item_id == item_id => max_stack.saturating_sub(s.quantity) as u64,
                Some(_) => 0,
            })
            .sum();
        capacity >= amount as u64
    }

    /// Removes up to `amount` units in scan order. Returns how many were removed.
    pub fn remove_item(&mut self, item_id: &str, amount: u32) -> u32 {
        let mut remaining = amount;
        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if let Some(stack) = slot {
                if stack.item_id == item_id {
                    let take = remaining.min(stack.quantity);
                    stack.quantity -= take;
                    remaining -= take;
                    if stack.quantity == 0 {
                        *slot = None;
                    }
                }
            }
        }
        amount - remaining
    }

    pub fn count_item(&self, item_id: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.item_id == item_id)
            .map(|s| s.quantity)
            .sum()
    }

    pub fn has_item(&self, item_id: &str, amount: u32) -> bool {
        self.count_item(item_id) >= amount
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.held = None;
    }

    // ─── Drag and drop ───────────────────────────────────────────────────

    pub fn is_dragging(&self) -> bool {
        self.held.is_some()
    }

    /// Lifts the whole stack in `index` into the held buffer.
    pub fn pick_up(&mut self, index: usize) -> bool {
        self.assert_slot(index);
        if self.held.is_some() {
            return false;
        }
        let Some(stack) = self.slots[index].take() else {
            return false;
        };
        self.held = Some(HeldStack {
            stack,
            origin: index,
        });
        true
    }

    /// Drops the held stack on `index`.
    ///
    /// Empty target: the stack moves there. Same stackable item: merges up to
    /// capacity and the overflow stays held. Anything else: the target's
    /// stack goes back to the drag origin.
    pub fn drop_on(&mut self, catalog: &ItemCatalog, index: usize) -> bool {
        self.assert_slot(index);
        let Some(held) = self.held.take() else {
            return false;
        };

        match self.slots[index].take() {
            None => {
                self.slots[index] = Some(held.stack);
            }
            Some(mut target)
                if target.item_id == held.stack.item_id
                    && catalog.is_stackable(&target.item_id) =>
            {
                let max_stack = catalog
                    .max_stack(&target.item_id)
                    .unwrap_or(target.quantity);
                let moved = held
                    .stack
                    .quantity
                    .min(max_stack.saturating_sub(target.quantity));
                target.quantity += moved;
                self.slots[index] = Some(target);

                let rest = held.stack.quantity - moved;
                if rest > 0 {
                    self.held = Some(HeldStack {
                        stack: ItemStack::new(held.stack.item_id, rest),
                        origin: held.origin,
                    });
                }
            }
            Some(target) => {
                self.slots[index] = Some(held.stack);
                if self.slots[held.origin].is_none() {
                    self.slots[held.origin] = Some(target);
                } else {
                    // Origin was refilled mid-drag; keep the displaced stack in hand.
                    self.held = Some(HeldStack {
                        stack: target,
                        origin: held.origin,
                    });
                }
            }
        }
        true
    }

    /// Puts the held stack back: into its origin if free, otherwise wherever
    /// it fits. Returns false (still holding) if it cannot be placed whole.
    pub fn cancel_drag(&mut self, catalog: &ItemCatalog) -> bool {
        let Some(held) = self.held.take() else {
            return true;
        };
        if self.slots[held.origin].is_none() {
            self.slots[held.origin] = Some(held.stack);
            return true;
        }
        if self.can_fit(catalog, &held.stack.item_id, held.stack.quantity) {
            return self.add_item(catalog, &held.stack.item_id, held.stack.quantity);
        }
        self.held = Some(held);
        false
    }

    // ─── Snapshot ────────────────────────────────────────────────────────

    /// Non-empty slots in scan order. A stack in mid-drag is exported at
    /// its origin so nothing is lost.
    pub fn export_state(&self) -> Vec<SlotRecord> {
        let mut records: Vec<SlotRecord> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(slot, stack)| {
                stack.as_ref().map(|s| SlotRecord {
                    slot,
                    id: s.item_id.clone(),
                    qty: s.quantity,
                })
            })
            .collect();
        if let Some(held) = &self.held {
            records.push(SlotRecord {
                slot: held.origin,
                id: held.stack.item_id.clone(),
                qty: held.stack.quantity,
            });
        }
        records
    }

    /// Clears the grid and repopulates it from `records`. Records land in
    /// their own slot when it is free and valid, otherwise go through
    /// `add_item`. Returns false if any unit could not be restored.
    pub fn import_state(&mut self, catalog: &ItemCatalog, records: &[SlotRecord]) -> bool {
        self.clear();
        let mut complete = true;
        let mut deferred = Vec::new();

        for record in records {
            if record.qty == 0 {
                continue;
            }
            let Some(max_stack) = catalog.max_stack(&record.id) else {
                complete = false;
                continue;
            };
            let fits_in_place = record.slot < self.slots.len()
                && self.slots[record.slot].is_none()
                && record.qty <= max_stack;
            if fits_in_place {
                self.slots[record.slot] = Some(ItemStack::new(record.id.clone(), record.qty));
            } else {
                deferred.push(record);
            }
        }

        for record in deferred {
            complete &= self.add_item(catalog, &record.id, record.qty);
        }
        complete
    }
}
