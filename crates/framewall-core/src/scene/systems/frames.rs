//! Registry-level frame operations: global removal and the hanging
//! preview tint.

use bevy::prelude::*;

use crate::scene::components::{FrameMaterial, PlacedFrame, WallAnchor};
use crate::scene::events::{ClearFramesEvent, HangPreviewEvent};
use crate::scene::resources::{FrameRegistry, HangPreview, SelectionState, TransformLedgerRes};
use crate::scene::state_store::StateStores;

/// Opacity applied to every frame while the hanging preview is active.
const HANG_OPACITY: f32 = 0.5;

/// System to remove every anchor (and therefore every frame) from the
/// scene. On-disk images are left alone.
pub fn handle_clear_frames(
    mut commands: Commands,
    mut events: MessageReader<ClearFramesEvent>,
    anchors: Query<Entity, With<WallAnchor>>,
    mut registry: ResMut<FrameRegistry>,
    mut ledger: ResMut<TransformLedgerRes>,
    mut selection: ResMut<SelectionState>,
    stores: Res<StateStores>,
) {
    for _ in events.read() {
        let mut removed = 0;
        for anchor in anchors.iter() {
            commands.entity(anchor).despawn();
            removed += 1;
        }
        registry.clear();
        ledger.0.clear();
        *selection = SelectionState::Idle;
        stores.selection.close_modal();
        tracing::info!("[frames] removed {removed} anchors");
    }
}

/// System to apply or lift the hanging preview tint.
///
/// Re-resolves every registered frame's texture from its saved path and
/// sets the overlay opacity, so leaving the preview restores the identical
/// texture source at full opacity.
pub fn handle_hang_preview(
    mut events: MessageReader<HangPreviewEvent>,
    mut hang: ResMut<HangPreview>,
    mut frames: Query<(&PlacedFrame, &mut FrameMaterial)>,
    stores: Res<StateStores>,
) {
    for event in events.read() {
        hang.hanging = event.hanging;
        let opacity = if event.hanging { HANG_OPACITY } else { 1.0 };

        for (frame, mut material) in frames.iter_mut() {
            let mut resolved = FrameMaterial::resolve(&frame.image_path);
            resolved.opacity = opacity;
            *material = resolved;
        }

        stores.selection.set_hanging(event.hanging);
        tracing::info!("[frames] hanging preview {}", event.hanging);
    }
}
