//! Course-section schedule optimizer.
//!
//! Takes the section listing exported from the registration system, enumerates
//! every clash-free lecture/lab combination for the selected courses, and ranks
//! them by days off, a free weekday, or instructor preference.
//!
//! Pipeline: [`validation`] → [`session`] filtering → [`generator`] (using
//! [`time_codec`] and [`conflict`]) → [`selector`]; [`explainer`] and
//! [`overview`] read the run's by-products.

pub mod config;
pub mod conflict;
pub mod data;
pub mod explainer;
pub mod generator;
pub mod locale;
pub mod overview;
pub mod selector;
pub mod server;
pub mod session;
pub mod time_codec;
pub mod validation;
