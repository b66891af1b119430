//! autoslider: reproduce a character profile in a menu-driven editor
//!
//! Reconciles a baseline ("default") profile with a target profile and emits
//! the ordered, timed key presses that walk the editor from one to the other.
//! The editor offers no feedback, so the planner tracks the cursor purely from
//! the actions it has issued.

pub mod cli;
pub mod config;
pub mod encode;
pub mod plan;
pub mod presets;
pub mod profile;
pub mod propagate;
pub mod render;
pub mod sink;
