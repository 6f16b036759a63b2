//! Film presets and the filter selector
//!
//! # Overview
//!
//! A preset is one of six fixed "film" looks. Each maps to a
//! [`VisualRecipe`], an ordered list of colour adjustments modelled on CSS
//! filter functions, plus the era label and the handwritten caption printed
//! under the photo.
//!
//! The [`FilterSelector`] holds the active preset. It has no timing of its
//! own; the print sequencer reads the active preset once per accepted shutter
//! press and keeps that snapshot for the lifetime of the print.

pub mod filter_preset;
pub mod recipe;
pub mod selector;

pub use filter_preset::FilterPreset;
pub use recipe::{Adjustment, VisualRecipe};
pub use selector::FilterSelector;
