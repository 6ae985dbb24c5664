//! Bevy ECS integration for framewall.
//!
//! Components, messages, resources, state stores, systems and plugins for
//! the frame placement and selection scene.

pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod state_store;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_utils;

pub use components::*;
pub use events::*;
pub use plugin::{FramewallHeadlessPlugin, FramewallViewerPlugin, TICK_DT};
pub use resources::*;
pub use state_store::{SelectionStore, SelectionSummary, StateStores};
pub use systems::selection::SELECTION_LIFT;
