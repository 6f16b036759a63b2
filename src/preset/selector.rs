//! Active preset selection

use crate::error::Result;
use crate::preset::FilterPreset;
use tracing::info;

/// Holds the one active preset
#[derive(Debug, Clone)]
pub struct FilterSelector {
    active: FilterPreset,
}

impl FilterSelector {
    /// Create a selector with `initial` active
    pub fn new(initial: FilterPreset) -> Self {
        Self { active: initial }
    }

    /// The selectable presets, in display order
    pub fn presets(&self) -> &'static [FilterPreset] {
        &FilterPreset::ALL
    }

    /// The currently active preset
    pub fn active(&self) -> FilterPreset {
        self.active
    }

    /// Make `preset` active
    pub fn select(&mut self, preset: FilterPreset) {
        if preset != self.active {
            info!("Film mode changed: {} -> {}", self.active, preset);
        }
        self.active = preset;
    }

    /// Make the preset named `identifier` active
    ///
    /// Leaves the active preset unchanged when the name is unknown.
    pub fn select_by_name(&mut self, identifier: &str) -> Result<FilterPreset> {
        let preset = identifier.parse::<FilterPreset>()?;
        self.select(preset);
        Ok(preset)
    }
}

impl Default for FilterSelector {
    fn default() -> Self {
        Self::new(FilterPreset::Koda)
    }
}
