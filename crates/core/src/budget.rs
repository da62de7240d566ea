//! Budget line-item aggregation.
//!
//! A budget is a flat collection of [`BudgetLineItem`]s linked into
//! parent/child groups (e.g. a cast-personnel row with one child per cast
//! member). Totals are recomputed from scratch on every read; at the tens to
//! low hundreds of items a production carries, memoization would buy nothing.
//!
//! Category resolution is by name against whatever category list the
//! production configured; items whose category is blank aggregate under the
//! `"Uncategorized"` bucket rather than erroring.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::EntityId;

/// Bucket name for items with a blank category.
pub const UNCATEGORIZED: &str = "Uncategorized";

// ---------------------------------------------------------------------------
// BudgetLineItem
// ---------------------------------------------------------------------------

/// Kind of external contact a line item can link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Cast,
    Crew,
}

/// Link from a line item to a cast/crew contact record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLink {
    pub contact_id: EntityId,
    pub kind: ContactKind,
}

/// One budget row, created by template import or manual add and updated in
/// place on every field edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLineItem {
    pub id: EntityId,
    pub name: String,
    pub account_code: String,
    /// Category name, resolved against the production's category list.
    pub category: String,
    pub subcategory: String,
    /// Optional free-text grouping within a category.
    pub section: Option<String>,
    pub quantity: f64,
    pub days: f64,
    pub unit_cost: f64,
    /// Explicit budgeted total. Overrides the computed total and serves as
    /// the "budgeted" side of variance.
    pub total_budget: Option<f64>,
    pub parent_id: Option<EntityId>,
    /// Child item ids for personnel groupings. A parent with children
    /// reports the sum of its children, never its own fields.
    pub child_ids: Vec<EntityId>,
    pub linked_contact: Option<ContactLink>,
    /// Excludes the item from every aggregate total.
    pub ignore_total: bool,
}

impl BudgetLineItem {
    /// Create a leaf item with a fresh id and zeroed amounts.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: name.into(),
            account_code: String::new(),
            category: category.into(),
            subcategory: String::new(),
            section: None,
            quantity: 0.0,
            days: 0.0,
            unit_cost: 0.0,
            total_budget: None,
            parent_id: None,
            child_ids: Vec::new(),
            linked_contact: None,
            ignore_total: false,
        }
    }

    /// `quantity × days × unit_cost`, ignoring any override.
    pub fn computed_total(&self) -> f64 {
        self.quantity * self.days * self.unit_cost
    }
}

// ---------------------------------------------------------------------------
// BudgetSheet
// ---------------------------------------------------------------------------

/// The backing collection for one production's budget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetSheet {
    items: Vec<BudgetLineItem>,
}

impl BudgetSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<BudgetLineItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[BudgetLineItem] {
        &self.items
    }

    pub fn get(&self, id: EntityId) -> Option<&BudgetLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    // -- mutation ------------------------------------------------------------

    pub fn add_item(&mut self, item: BudgetLineItem) {
        self.items.push(item);
    }

    /// Add a child under an existing parent, wiring both link directions.
    pub fn add_child_item(
        &mut self,
        parent_id: EntityId,
        mut child: BudgetLineItem,
    ) -> Result<(), CoreError> {
        let parent = self
            .items
            .iter_mut()
            .find(|item| item.id == parent_id)
            .ok_or(CoreError::NotFound {
                entity: "budget line item",
                id: parent_id,
            })?;
        child.parent_id = Some(parent_id);
        parent.child_ids.push(child.id);
        self.items.push(child);
        Ok(())
    }

    /// Replace an item in place by identity.
    pub fn update_item(&mut self, updated: BudgetLineItem) -> Result<(), CoreError> {
        let slot = self
            .items
            .iter_mut()
            .find(|item| item.id == updated.id)
            .ok_or(CoreError::NotFound {
                entity: "budget line item",
                id: updated.id,
            })?;
        *slot = updated;
        Ok(())
    }

    /// Remove an item and repair every link that referenced it: the id is
    /// dropped from all parent child lists (leaving it would orphan a total
    /// into the parent's group sum), and children pointing at a removed
    /// parent are detached.
    pub fn remove_item(&mut self, id: EntityId) -> Result<BudgetLineItem, CoreError> {
        let idx = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CoreError::NotFound {
                entity: "budget line item",
                id,
            })?;
        let removed = self.items.remove(idx);

        for item in &mut self.items {
            item.child_ids.retain(|child_id| *child_id != id);
            if item.parent_id == Some(id) {
                item.parent_id = None;
            }
        }

        Ok(removed)
    }

    pub fn clear_all(&mut self) {
        self.items.clear();
    }

    // -- totals --------------------------------------------------------------

    /// Total for one item in isolation: zero when excluded, else the explicit
    /// override, else `quantity × days × unit_cost`.
    pub fn item_total(&self, item: &BudgetLineItem) -> f64 {
        if item.ignore_total {
            return 0.0;
        }
        item.total_budget.unwrap_or_else(|| item.computed_total())
    }

    /// Total for an item as it contributes to aggregates: a parent with
    /// children reports the sum of its children's [`item_total`](Self::item_total)s
    /// (its own fields are ignored once it has children); unresolvable child
    /// ids contribute zero.
    pub fn effective_total(&self, item: &BudgetLineItem) -> f64 {
        if item.ignore_total {
            return 0.0;
        }
        if item.child_ids.is_empty() {
            return self.item_total(item);
        }
        item.child_ids
            .iter()
            .filter_map(|child_id| self.get(*child_id))
            .map(|child| self.item_total(child))
            .sum()
    }

    /// The "actual" side of variance: children sum for a group, the computed
    /// (non-override) total for a leaf.
    pub fn actual_total(&self, item: &BudgetLineItem) -> f64 {
        if item.child_ids.is_empty() {
            item.computed_total()
        } else {
            item.child_ids
                .iter()
                .filter_map(|child_id| self.get(*child_id))
                .map(|child| self.item_total(child))
                .sum()
        }
    }

    /// `budgeted − actual`; `None` when no explicit budget is set. Negative
    /// variance signals over-budget.
    pub fn variance(&self, item: &BudgetLineItem) -> Option<f64> {
        item.total_budget
            .map(|budgeted| budgeted - self.actual_total(item))
    }

    /// Top-level items (no parent) that participate in aggregate totals.
    fn aggregating_items(&self) -> impl Iterator<Item = &BudgetLineItem> + '_ {
        self.items
            .iter()
            .filter(|item| item.parent_id.is_none() && !item.ignore_total)
    }

    /// Subtotal for a category by name. Only top-level rows are summed, so a
    /// personnel child is counted once through its parent's group total.
    pub fn category_subtotal(&self, category: &str) -> f64 {
        self.aggregating_items()
            .filter(|item| item.category == category)
            .map(|item| self.effective_total(item))
            .sum()
    }

    /// Subtotal for a free-text section grouping.
    pub fn section_subtotal(&self, section: &str) -> f64 {
        self.aggregating_items()
            .filter(|item| item.section.as_deref() == Some(section))
            .map(|item| self.effective_total(item))
            .sum()
    }

    /// Per-category totals for the summary view, blank categories bucketed
    /// under [`UNCATEGORIZED`].
    pub fn category_totals(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for item in self.aggregating_items() {
            let bucket = if item.category.trim().is_empty() {
                UNCATEGORIZED.to_string()
            } else {
                item.category.clone()
            };
            *totals.entry(bucket).or_insert(0.0) += self.effective_total(item);
        }
        totals
    }

    /// Grand total across all top-level items.
    pub fn grand_total(&self) -> f64 {
        self.aggregating_items()
            .map(|item| self.effective_total(item))
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, category: &str, quantity: f64, days: f64, unit_cost: f64) -> BudgetLineItem {
        let mut item = BudgetLineItem::new(name, category);
        item.quantity = quantity;
        item.days = days;
        item.unit_cost = unit_cost;
        item
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // -- item_total --

    #[test]
    fn item_total_is_quantity_times_days_times_unit_cost() {
        let sheet = BudgetSheet::new();
        let item = leaf("Camera rental", "Camera", 2.0, 5.0, 300.0);
        assert!(close(sheet.item_total(&item), 3000.0));
    }

    #[test]
    fn item_total_override_wins() {
        let sheet = BudgetSheet::new();
        let mut item = leaf("Camera rental", "Camera", 2.0, 5.0, 300.0);
        item.total_budget = Some(2500.0);
        assert!(close(sheet.item_total(&item), 2500.0));
    }

    #[test]
    fn ignored_item_totals_zero() {
        let sheet = BudgetSheet::new();
        let mut item = leaf("Contingency", "Other", 1.0, 1.0, 500.0);
        item.total_budget = Some(500.0);
        item.ignore_total = true;
        assert!(close(sheet.item_total(&item), 0.0));
    }

    // -- group totals --

    fn sheet_with_group() -> (BudgetSheet, EntityId) {
        let mut sheet = BudgetSheet::new();
        // Parent's own fields would compute 999 if ever consulted.
        let mut parent = leaf("Cast", "Talent", 1.0, 1.0, 999.0);
        let parent_id = parent.id;
        parent.section = Some("Above the line".to_string());
        sheet.add_item(parent);
        sheet
            .add_child_item(parent_id, {
                let mut child = leaf("Lead", "Talent", 1.0, 10.0, 10.0);
                child.total_budget = Some(100.0);
                child
            })
            .unwrap();
        sheet
            .add_child_item(parent_id, leaf("Supporting", "Talent", 1.0, 5.0, 50.0))
            .unwrap();
        (sheet, parent_id)
    }

    #[test]
    fn group_total_sums_children_not_own_fields() {
        let (sheet, parent_id) = sheet_with_group();
        let parent = sheet.get(parent_id).unwrap();
        // 100 (override) + 250 (computed), never 999 or 1349.
        assert!(close(sheet.effective_total(parent), 350.0));
    }

    #[test]
    fn group_total_skips_missing_children() {
        let (mut sheet, parent_id) = sheet_with_group();
        let mut parent = sheet.get(parent_id).unwrap().clone();
        parent.child_ids.push(uuid::Uuid::new_v4());
        sheet.update_item(parent).unwrap();
        let parent = sheet.get(parent_id).unwrap();
        assert!(close(sheet.effective_total(parent), 350.0));
    }

    #[test]
    fn leaf_effective_total_uses_override() {
        let sheet = BudgetSheet::new();
        let mut item = leaf("Stock", "Camera", 0.0, 0.0, 0.0);
        item.total_budget = Some(800.0);
        assert!(close(sheet.effective_total(&item), 800.0));
    }

    // -- subtotals --

    #[test]
    fn category_subtotal_sums_matching_top_level_items() {
        let (mut sheet, _) = sheet_with_group();
        sheet.add_item(leaf("Grip truck", "Grip", 1.0, 10.0, 200.0));
        assert!(close(sheet.category_subtotal("Talent"), 350.0));
        assert!(close(sheet.category_subtotal("Grip"), 2000.0));
        assert!(close(sheet.category_subtotal("Wardrobe"), 0.0));
    }

    #[test]
    fn children_are_not_double_counted() {
        // Children share the parent's category; only the parent row may count.
        let (sheet, _) = sheet_with_group();
        assert!(close(sheet.grand_total(), 350.0));
    }

    #[test]
    fn ignored_item_excluded_from_subtotals() {
        let mut sheet = BudgetSheet::new();
        let mut item = leaf("Insurance", "Production", 1.0, 1.0, 100.0);
        item.total_budget = Some(500.0);
        item.ignore_total = true;
        sheet.add_item(item);
        sheet.add_item(leaf("Permits", "Production", 1.0, 1.0, 300.0));
        assert!(close(sheet.category_subtotal("Production"), 300.0));
    }

    #[test]
    fn section_subtotal_matches_section_only() {
        let (mut sheet, _) = sheet_with_group();
        let mut other = leaf("Editor", "Post", 1.0, 20.0, 400.0);
        other.section = Some("Below the line".to_string());
        sheet.add_item(other);
        assert!(close(sheet.section_subtotal("Above the line"), 350.0));
        assert!(close(sheet.section_subtotal("Below the line"), 8000.0));
    }

    #[test]
    fn blank_category_buckets_as_uncategorized() {
        let mut sheet = BudgetSheet::new();
        sheet.add_item(leaf("Misc", "  ", 1.0, 1.0, 50.0));
        sheet.add_item(leaf("Tape", "", 1.0, 1.0, 25.0));
        let totals = sheet.category_totals();
        assert!(close(totals[UNCATEGORIZED], 75.0));
    }

    // -- variance --

    #[test]
    fn variance_for_group_is_budget_minus_children() {
        let (mut sheet, parent_id) = sheet_with_group();
        let mut parent = sheet.get(parent_id).unwrap().clone();
        parent.total_budget = Some(400.0);
        sheet.update_item(parent).unwrap();
        let parent = sheet.get(parent_id).unwrap();
        assert!(close(sheet.variance(parent).unwrap(), 50.0));
    }

    #[test]
    fn negative_variance_signals_over_budget() {
        let (mut sheet, parent_id) = sheet_with_group();
        let mut parent = sheet.get(parent_id).unwrap().clone();
        parent.total_budget = Some(300.0);
        sheet.update_item(parent).unwrap();
        let parent = sheet.get(parent_id).unwrap();
        assert!(close(sheet.variance(parent).unwrap(), -50.0));
    }

    #[test]
    fn variance_none_without_budget() {
        let sheet = BudgetSheet::new();
        let item = leaf("Gaffer", "Electric", 1.0, 10.0, 650.0);
        assert!(sheet.variance(&item).is_none());
    }

    #[test]
    fn leaf_variance_compares_budget_to_computed() {
        let sheet = BudgetSheet::new();
        let mut item = leaf("Gaffer", "Electric", 1.0, 10.0, 650.0);
        item.total_budget = Some(7000.0);
        assert!(close(sheet.variance(&item).unwrap(), 500.0));
    }

    // -- mutation --

    #[test]
    fn update_replaces_by_identity() {
        let mut sheet = BudgetSheet::new();
        let item = leaf("Crane", "Grip", 1.0, 2.0, 900.0);
        let id = item.id;
        sheet.add_item(item);

        let mut updated = sheet.get(id).unwrap().clone();
        updated.days = 3.0;
        sheet.update_item(updated).unwrap();

        assert!(close(sheet.get(id).unwrap().days, 3.0));
        assert_eq!(sheet.items().len(), 1);
    }

    #[test]
    fn update_unknown_item_errors() {
        let mut sheet = BudgetSheet::new();
        let err = sheet.update_item(leaf("Ghost", "None", 0.0, 0.0, 0.0));
        assert!(err.is_err());
    }

    #[test]
    fn removing_child_rewrites_parent_child_list() {
        let (mut sheet, parent_id) = sheet_with_group();
        let child_id = sheet.get(parent_id).unwrap().child_ids[0];
        sheet.remove_item(child_id).unwrap();

        let parent = sheet.get(parent_id).unwrap();
        assert_eq!(parent.child_ids.len(), 1);
        // Only the remaining child contributes.
        assert!(close(sheet.effective_total(parent), 250.0));
    }

    #[test]
    fn removing_parent_detaches_children() {
        let (mut sheet, parent_id) = sheet_with_group();
        sheet.remove_item(parent_id).unwrap();
        assert!(sheet.items().iter().all(|item| item.parent_id.is_none()));
    }

    #[test]
    fn remove_unknown_item_errors() {
        let mut sheet = BudgetSheet::new();
        assert!(sheet.remove_item(uuid::Uuid::new_v4()).is_err());
    }

    #[test]
    fn clear_all_empties_the_sheet() {
        let (mut sheet, _) = sheet_with_group();
        sheet.clear_all();
        assert!(sheet.items().is_empty());
        assert!(close(sheet.grand_total(), 0.0));
    }
}
