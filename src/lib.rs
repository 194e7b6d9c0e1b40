//! Interactive terminal map of administrative districts.
//!
//! Districts from a GeoJSON source are drawn as dithered Braille fills with
//! outlines. Hovering highlights a district and shows its name; clicking opens
//! a detail modal with a separate map fitted to that district.

pub mod app;
pub mod braille;
pub mod config;
pub mod data;
pub mod error;
pub mod geo;
pub mod layout;
pub mod logging;
pub mod map;
pub mod modal;
pub mod popup;
pub mod ui;
