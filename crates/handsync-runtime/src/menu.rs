//! Menu trigger lookup
//!
//! Panels are named `Menu_01`, `Menu_02`, ... in registration order. A
//! trigger activates its panel; panels start inactive and stay active
//! until reset.

use std::collections::HashMap;

use handsync_core::{HandsyncError, HandsyncResult};

const MENU_PREFIX: &str = "Menu_0";

#[derive(Debug, Clone, Default)]
pub struct MenuRegistry {
    lookup: HashMap<String, usize>,
    active: Vec<bool>,
}

impl MenuRegistry {
    pub fn new(panel_count: usize) -> Self {
        let lookup = (0..panel_count)
            .map(|i| (Self::menu_name(i), i))
            .collect();
        Self {
            lookup,
            active: vec![false; panel_count],
        }
    }

    /// Trigger name for the panel at `index`
    pub fn menu_name(index: usize) -> String {
        format!("{}{}", MENU_PREFIX, index + 1)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    /// Activate the panel named `name` and return its index
    pub fn trigger(&mut self, name: &str) -> HandsyncResult<usize> {
        let index = self
            .index_of(name)
            .ok_or_else(|| HandsyncError::UnknownMenu(name.to_string()))?;
        if !self.active[index] {
            tracing::debug!(menu = name, index, "menu activated");
        }
        self.active[index] = true;
        Ok(index)
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    pub fn active_panels(&self) -> impl Iterator<Item = usize> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter_map(|(i, on)| on.then_some(i))
    }

    /// Deactivate every panel
    pub fn reset(&mut self) {
        self.active.fill(false);
    }

    pub fn panel_count(&self) -> usize {
        self.active.len()
    }
}
