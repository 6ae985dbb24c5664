//! The selection state machine.
//!
//! Interprets resolved taps against the frame registry and transform
//! ledger, drives the animated lift/return transitions, and arbitrates
//! slider commands against in-flight handoff animations.
//!
//! A selection handoff (`Switching`) remembers the handle of the outgoing
//! frame's return animation and completes only when exactly that handle
//! finishes; completions belonging to superseded animations are ignored.

use bevy::prelude::*;

use crate::ledger::TransformLedger;
use crate::scene::components::{CollisionExtents, PlacedFrame};
use crate::scene::events::{
    DeselectEvent, RotateCommandEvent, ScaleCommandEvent, TapEvent, TweenFinishedEvent,
};
use crate::scene::resources::{
    FrameRegistry, SelectionState, TransformLedgerRes, TweenHandles, ViewGeometryRes,
};
use crate::scene::state_store::StateStores;
use crate::tween::{TransformTween, TweenHandle, TweenTransform};

/// How far a frame lifts off the wall while selected, in meters along the
/// anchor-local Y axis.
pub const SELECTION_LIFT: f32 = 0.2;

/// System to resolve taps and run the selection state machine.
#[allow(clippy::too_many_arguments)]
pub fn handle_taps(
    mut commands: Commands,
    mut taps: MessageReader<TapEvent>,
    view: Res<ViewGeometryRes>,
    registry: Res<FrameRegistry>,
    mut selection: ResMut<SelectionState>,
    mut ledger: ResMut<TransformLedgerRes>,
    mut handles: ResMut<TweenHandles>,
    stores: Res<StateStores>,
    frames: Query<(Entity, &PlacedFrame, &CollisionExtents, &GlobalTransform)>,
    mut transforms: Query<&mut Transform, With<PlacedFrame>>,
) {
    for tap in taps.read() {
        let (origin, direction) = view.0.screen_ray(tap.screen_point);
        let hit = nearest_hit(origin, direction, &frames);

        match hit {
            Some((tapped, tapped_id)) => on_frame_tapped(
                tapped,
                tapped_id,
                &mut commands,
                &registry,
                &mut selection,
                &mut ledger.0,
                &mut handles,
                &stores,
                &mut transforms,
            ),
            None => {
                // Tapping empty space deselects, if anything is active.
                deselect_active(
                    &mut commands,
                    &registry,
                    &mut selection,
                    &mut ledger.0,
                    &mut handles,
                    &stores,
                    &mut transforms,
                );
            }
        }
    }
}

/// System to handle an explicit deselect command (modal dismissed).
#[allow(clippy::too_many_arguments)]
pub fn handle_deselect(
    mut commands: Commands,
    mut events: MessageReader<DeselectEvent>,
    registry: Res<FrameRegistry>,
    mut selection: ResMut<SelectionState>,
    mut ledger: ResMut<TransformLedgerRes>,
    mut handles: ResMut<TweenHandles>,
    stores: Res<StateStores>,
    mut transforms: Query<&mut Transform, With<PlacedFrame>>,
) {
    for _ in events.read() {
        deselect_active(
            &mut commands,
            &registry,
            &mut selection,
            &mut ledger.0,
            &mut handles,
            &stores,
            &mut transforms,
        );
    }
}

/// System to apply slider scale commands to the selected frame.
///
/// Ignored while switching or when nothing is stably selected.
pub fn handle_scale_commands(
    mut events: MessageReader<ScaleCommandEvent>,
    registry: Res<FrameRegistry>,
    selection: Res<SelectionState>,
    mut ledger: ResMut<TransformLedgerRes>,
    stores: Res<StateStores>,
    mut transforms: Query<&mut Transform, With<PlacedFrame>>,
) {
    for event in events.read() {
        let Some(id) = selection.selected_id() else {
            tracing::debug!("[selection] scale ignored (switching or no selection)");
            continue;
        };
        let Some(new_scale) = ledger.0.apply_scale(id, event.factor) else {
            // ensure_record runs at selection time; a selected frame
            // without a record is a programming error.
            debug_assert!(false, "selected frame {id} has no transform record");
            tracing::warn!("[selection] no transform record for selected frame {id}");
            continue;
        };
        if let Some(mut transform) = registry.entity_of(id).and_then(|e| transforms.get_mut(e).ok())
        {
            transform.scale = new_scale;
        }
        if let Some(record) = ledger.0.get(id) {
            stores.selection.set_scale(record.scale);
        }
    }
}

/// System to apply slider rotation commands to the selected frame.
///
/// Same guards as scaling.
pub fn handle_rotate_commands(
    mut events: MessageReader<RotateCommandEvent>,
    registry: Res<FrameRegistry>,
    selection: Res<SelectionState>,
    mut ledger: ResMut<TransformLedgerRes>,
    stores: Res<StateStores>,
    mut transforms: Query<&mut Transform, With<PlacedFrame>>,
) {
    for event in events.read() {
        let Some(id) = selection.selected_id() else {
            tracing::debug!("[selection] rotate ignored (switching or no selection)");
            continue;
        };
        let Some(angle) = ledger.0.apply_rotation(id, event.degrees) else {
            debug_assert!(false, "selected frame {id} has no transform record");
            tracing::warn!("[selection] no transform record for selected frame {id}");
            continue;
        };
        if let Some(mut transform) = registry.entity_of(id).and_then(|e| transforms.get_mut(e).ok())
        {
            transform.rotation = Quat::from_rotation_y(angle);
        }
        if let Some(record) = ledger.0.get(id) {
            stores.selection.set_angle_degrees(record.slider_angle());
        }
    }
}

/// System to complete a selection handoff when the outgoing frame's
/// return animation finishes.
pub fn handle_tween_finished(
    mut events: MessageReader<TweenFinishedEvent>,
    mut selection: ResMut<SelectionState>,
) {
    for event in events.read() {
        if let SelectionState::Switching { to, pending, .. } = &*selection {
            if *pending == event.handle {
                tracing::debug!("[selection] handoff complete, selected {to}");
                *selection = SelectionState::Selected { id: to.clone() };
            }
            // Completions for superseded animations are stale; ignore.
        }
    }
}

/// Resolves a tap ray to the nearest hit frame, if any.
fn nearest_hit(
    origin: Vec3,
    direction: Vec3,
    frames: &Query<(Entity, &PlacedFrame, &CollisionExtents, &GlobalTransform)>,
) -> Option<(Entity, String)> {
    let mut nearest: Option<(f32, Entity, &str)> = None;
    for (entity, frame, extents, world) in frames.iter() {
        if let Some(distance) = extents.ray_hit(world, origin, direction) {
            if nearest.is_none_or(|(best, _, _)| distance < best) {
                nearest = Some((distance, entity, frame.id.as_str()));
            }
        }
    }
    nearest.map(|(_, entity, id)| (entity, id.to_string()))
}

/// Runs the tap-on-frame transitions of the state machine.
#[allow(clippy::too_many_arguments)]
fn on_frame_tapped(
    tapped: Entity,
    tapped_id: String,
    commands: &mut Commands,
    registry: &FrameRegistry,
    selection: &mut SelectionState,
    ledger: &mut TransformLedger,
    handles: &mut TweenHandles,
    stores: &StateStores,
    transforms: &mut Query<&mut Transform, With<PlacedFrame>>,
) {
    match selection.active_id().map(str::to_owned) {
        // Tapping the frame that is already active: put it back.
        Some(active) if active == tapped_id => {
            deselect_active(
                commands, registry, selection, ledger, handles, stores, transforms,
            );
        }
        // Tapping a different frame while one is active: hand off.
        Some(active) => {
            let pending = return_to_wall(&active, commands, registry, ledger, handles, transforms);
            select_frame(
                tapped, &tapped_id, commands, ledger, handles, stores, transforms,
            );
            match pending {
                Some(pending) => {
                    *selection = SelectionState::Switching {
                        from: active,
                        to: tapped_id,
                        pending,
                    };
                }
                // The outgoing frame vanished; skip the handoff.
                None => *selection = SelectionState::Selected { id: tapped_id },
            }
        }
        // Nothing active: plain selection.
        None => {
            select_frame(
                tapped, &tapped_id, commands, ledger, handles, stores, transforms,
            );
            *selection = SelectionState::Selected { id: tapped_id };
        }
    }
}

/// Lifts a frame into its selected pose and publishes its slider values.
fn select_frame(
    entity: Entity,
    id: &str,
    commands: &mut Commands,
    ledger: &mut TransformLedger,
    handles: &mut TweenHandles,
    stores: &StateStores,
    transforms: &mut Query<&mut Transform, With<PlacedFrame>>,
) {
    let Ok(transform) = transforms.get(entity) else {
        return;
    };
    let current = TweenTransform::from_transform(transform);

    ledger.ensure_record(id, current.translation, current.scale, current.angle);
    // Capture any displacement the frame picked up since, then lift.
    ledger.capture_drag(id, current.translation.x, current.translation.z);
    ledger.lift(id, SELECTION_LIFT);

    let Some(record) = ledger.get(id) else {
        return;
    };
    stores
        .selection
        .open_modal(id, record.scale, record.slider_angle());

    let target = TweenTransform::new(record.new_translate, record.new_scale, record.new_angle);
    start_tween(commands, handles, entity, current, target);
    tracing::debug!("[selection] selected {id}");
}

/// Animates the active frame back to its resting pose and returns the
/// animation handle, or `None` when the frame no longer exists.
fn return_to_wall(
    id: &str,
    commands: &mut Commands,
    registry: &FrameRegistry,
    ledger: &mut TransformLedger,
    handles: &mut TweenHandles,
    transforms: &mut Query<&mut Transform, With<PlacedFrame>>,
) -> Option<TweenHandle> {
    let entity = registry.entity_of(id)?;
    let transform = transforms.get(entity).ok()?;
    let current = TweenTransform::from_transform(transform);

    if !ledger.capture_drag(id, current.translation.x, current.translation.z) {
        debug_assert!(false, "active frame {id} has no transform record");
        tracing::warn!("[selection] no transform record for active frame {id}");
        return None;
    }
    // Always return to resting height, never to a transient lifted value.
    ledger.settle(id);

    let record = ledger.get(id)?;
    let target = TweenTransform::new(record.new_translate, record.new_scale, record.new_angle);
    Some(start_tween(commands, handles, entity, current, target))
}

/// Deselects whatever frame is active and closes the modal.
#[allow(clippy::too_many_arguments)]
fn deselect_active(
    commands: &mut Commands,
    registry: &FrameRegistry,
    selection: &mut SelectionState,
    ledger: &mut TransformLedger,
    handles: &mut TweenHandles,
    stores: &StateStores,
    transforms: &mut Query<&mut Transform, With<PlacedFrame>>,
) {
    let Some(id) = selection.active_id().map(str::to_owned) else {
        return;
    };
    return_to_wall(&id, commands, registry, ledger, handles, transforms);
    stores.selection.close_modal();
    *selection = SelectionState::Idle;
    tracing::debug!("[selection] deselected {id}");
}

/// Starts a standard eased transition, superseding any in-flight one.
fn start_tween(
    commands: &mut Commands,
    handles: &mut TweenHandles,
    entity: Entity,
    start: TweenTransform,
    end: TweenTransform,
) -> TweenHandle {
    let handle = handles.allocate();
    commands
        .entity(entity)
        .insert(TransformTween::new(handle, start, end));
    handle
}

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    use super::SELECTION_LIFT;
    use crate::image_store::FrameImage;
    use crate::ledger::SCALE_MAX;
    use crate::scene::resources::{FrameCommand, SelectionState, TransformLedgerRes};
    use crate::scene::test_utils::TestApp;
    use crate::tween::TransformTween;

    fn image() -> FrameImage {
        // 1000 px squares give palm-sized frames that are easy to hit.
        FrameImage::solid(1000, 1000, [120, 90, 60, 255])
    }

    /// Places a frame at the given screen pin and returns its id.
    fn place(app: &mut TestApp, pin: Vec2) -> String {
        app.place_frame_at(pin, image());
        app.frame_id_at(pin).expect("frame placed under pin")
    }

    fn left_pin(app: &TestApp) -> Vec2 {
        app.screen_center() - Vec2::new(200.0, 0.0)
    }

    fn right_pin(app: &TestApp) -> Vec2 {
        app.screen_center() + Vec2::new(200.0, 0.0)
    }

    #[test]
    fn test_select_lifts_and_opens_modal() {
        // Scenario A.
        let mut app = TestApp::with_facing_wall();
        let center = app.screen_center();
        let a = place(&mut app, center);

        app.tap_frame(&a);
        assert_eq!(app.selection(), SelectionState::Selected { id: a.clone() });

        let summary = app.stores().selection.get_summary();
        assert!(summary.modal_visible);
        assert_eq!(summary.selected_id.as_deref(), Some(a.as_str()));
        assert_eq!(summary.scale, 1.0);
        assert_eq!(summary.angle_degrees, 0.0);

        app.finish_transition();
        let transform = app.transform_of(&a);
        assert!((transform.translation.y - SELECTION_LIFT).abs() < 1e-4);
    }

    #[test]
    fn test_tap_again_restores_resting_height() {
        // Scenario C.
        let mut app = TestApp::with_facing_wall();
        let center = app.screen_center();
        let a = place(&mut app, center);

        app.tap_frame(&a);
        app.finish_transition();
        app.tap_frame(&a);
        assert_eq!(app.selection(), SelectionState::Idle);
        assert!(!app.stores().selection.get_summary().modal_visible);

        app.finish_transition();
        let transform = app.transform_of(&a);
        assert!(transform.translation.y.abs() < 1e-4);
    }

    #[test]
    fn test_switch_passes_through_switching() {
        // Scenario B / P3: never Selected(a) -> Selected(b) directly.
        let mut app = TestApp::with_facing_wall();
        let (left, right) = (left_pin(&app), right_pin(&app));
        let a = place(&mut app, left);
        let b = place(&mut app, right);

        app.tap_frame(&a);
        app.finish_transition();
        app.tap_frame(&b);
        match app.selection() {
            SelectionState::Switching { from, to, .. } => {
                assert_eq!(from, a);
                assert_eq!(to, b);
            }
            other => panic!("expected Switching, got {other:?}"),
        }
        // The modal already shows the incoming frame.
        let summary = app.stores().selection.get_summary();
        assert!(summary.modal_visible);
        assert_eq!(summary.selected_id.as_deref(), Some(b.as_str()));

        app.finish_transition();
        assert_eq!(app.selection(), SelectionState::Selected { id: b.clone() });
        // The outgoing frame is back at resting height, the incoming lifted.
        assert!(app.transform_of(&a).translation.y.abs() < 1e-4);
        assert!((app.transform_of(&b).translation.y - SELECTION_LIFT).abs() < 1e-4);
    }

    #[test]
    fn test_switching_guard_ignores_sliders() {
        // P2: scale/rotate during Switching leave the ledger untouched.
        let mut app = TestApp::with_facing_wall();
        let (left, right) = (left_pin(&app), right_pin(&app));
        let a = place(&mut app, left);
        let b = place(&mut app, right);

        app.tap_frame(&a);
        app.finish_transition();
        app.tap_frame(&b);
        assert!(app.selection().is_switching());

        app.push_command(FrameCommand::Scale { factor: 3.0 });
        app.push_command(FrameCommand::Rotate { degrees: 45.0 });
        app.update();

        let ledger = app.world().resource::<TransformLedgerRes>();
        let record = ledger.0.get(&b).unwrap();
        assert_eq!(record.scale, 1.0);
        assert_eq!(record.new_scale, record.orig_scale);
        assert_eq!(record.new_angle, 0.0);

        // Once the handoff completes, sliders work again.
        app.finish_transition();
        app.push_command(FrameCommand::Scale { factor: 3.0 });
        app.update();
        let ledger = app.world().resource::<TransformLedgerRes>();
        assert_eq!(ledger.0.get(&b).unwrap().scale, 3.0);
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        // Deselecting mid-handoff supersedes the pending animation; its
        // completion must not resurrect a selection.
        let mut app = TestApp::with_facing_wall();
        let (left, right) = (left_pin(&app), right_pin(&app));
        let a = place(&mut app, left);
        let b = place(&mut app, right);

        app.tap_frame(&a);
        app.finish_transition();
        app.tap_frame(&b);
        assert!(app.selection().is_switching());

        // Tap the incoming frame again before the handoff completes.
        app.tap_frame(&b);
        assert_eq!(app.selection(), SelectionState::Idle);
        assert!(!app.stores().selection.get_summary().modal_visible);

        app.finish_transition();
        assert_eq!(app.selection(), SelectionState::Idle);
        assert!(app.transform_of(&b).translation.y.abs() < 1e-4);
    }

    #[test]
    fn test_tap_empty_space_deselects() {
        let mut app = TestApp::with_facing_wall();
        let center = app.screen_center();
        let a = place(&mut app, center);

        app.tap_frame(&a);
        app.finish_transition();
        app.tap(Vec2::new(40.0, 40.0));
        assert_eq!(app.selection(), SelectionState::Idle);
        assert!(!app.stores().selection.get_summary().modal_visible);
    }

    #[test]
    fn test_tap_empty_space_idle_is_noop() {
        let mut app = TestApp::with_facing_wall();
        let center = app.screen_center();
        place(&mut app, center);

        app.tap(Vec2::new(40.0, 40.0));
        assert_eq!(app.selection(), SelectionState::Idle);
        assert!(!app.stores().selection.get_summary().modal_visible);
    }

    #[test]
    fn test_deselect_command_matches_tap_empty() {
        let mut app = TestApp::with_facing_wall();
        let center = app.screen_center();
        let a = place(&mut app, center);

        app.tap_frame(&a);
        app.finish_transition();
        app.push_command(FrameCommand::Deselect);
        app.update();

        assert_eq!(app.selection(), SelectionState::Idle);
        app.finish_transition();
        assert!(app.transform_of(&a).translation.y.abs() < 1e-4);
    }

    #[test]
    fn test_scale_and_rotate_apply_to_transform() {
        // P4/P5 end to end.
        let mut app = TestApp::with_facing_wall();
        let center = app.screen_center();
        let a = place(&mut app, center);
        app.tap_frame(&a);
        app.finish_transition();

        app.push_command(FrameCommand::Scale { factor: 2.0 });
        app.push_command(FrameCommand::Rotate { degrees: 90.0 });
        app.update();

        let transform = app.transform_of(&a);
        assert!(transform.scale.abs_diff_eq(Vec3::splat(2.0), 1e-5));
        let (axis, angle) = transform.rotation.to_axis_angle();
        let signed = if axis.y < 0.0 { -angle } else { angle };
        assert!((signed + FRAC_PI_2).abs() < 1e-4);

        let summary = app.stores().selection.get_summary();
        assert_eq!(summary.scale, 2.0);
        assert!((summary.angle_degrees - 90.0).abs() < 1e-3);

        // Back to factor 1.0 restores the original scale exactly.
        app.push_command(FrameCommand::Scale { factor: 1.0 });
        app.update();
        assert_eq!(app.transform_of(&a).scale, Vec3::ONE);
    }

    #[test]
    fn test_out_of_range_sliders_are_clamped() {
        let mut app = TestApp::with_facing_wall();
        let center = app.screen_center();
        let a = place(&mut app, center);
        app.tap_frame(&a);
        app.finish_transition();

        app.push_command(FrameCommand::Scale { factor: 99.0 });
        app.push_command(FrameCommand::Rotate { degrees: 800.0 });
        app.update();

        let ledger = app.world().resource::<TransformLedgerRes>();
        let record = ledger.0.get(&a).unwrap();
        assert_eq!(record.scale, SCALE_MAX);
        assert!((record.slider_angle() - 360.0).abs() < 1e-3);
    }

    #[test]
    fn test_drag_capture_on_deselect() {
        // A manual drag while selected survives deselection on X/Z while
        // Y still returns to resting height.
        let mut app = TestApp::with_facing_wall();
        let center = app.screen_center();
        let a = place(&mut app, center);
        app.tap_frame(&a);
        app.finish_transition();

        // Simulate the gesture layer dragging the frame along the wall.
        let entity = app.registry().entity_of(&a).unwrap();
        {
            let mut transform = app.world_mut().get_mut::<Transform>(entity).unwrap();
            transform.translation.x = 0.3;
            transform.translation.z = -0.1;
        }
        app.update();

        app.push_command(FrameCommand::Deselect);
        app.update();
        app.finish_transition();

        let transform = app.transform_of(&a);
        assert!((transform.translation.x - 0.3).abs() < 1e-4);
        assert!((transform.translation.z + 0.1).abs() < 1e-4);
        assert!(transform.translation.y.abs() < 1e-4);
    }

    #[test]
    fn test_reselect_reuses_pending_values() {
        // Records never expire: reselecting shows the stored scale, not a
        // reset to 1.0.
        let mut app = TestApp::with_facing_wall();
        let center = app.screen_center();
        let a = place(&mut app, center);

        app.tap_frame(&a);
        app.finish_transition();
        app.push_command(FrameCommand::Scale { factor: 2.5 });
        app.update();
        app.tap_frame(&a);
        app.finish_transition();

        app.tap_frame(&a);
        let summary = app.stores().selection.get_summary();
        assert_eq!(summary.scale, 2.5);
        // And the lift target keeps the scaled size.
        app.finish_transition();
        assert!(app.transform_of(&a).scale.abs_diff_eq(Vec3::splat(2.5), 1e-4));
    }

    #[test]
    fn test_new_tween_supersedes_old() {
        // Re-tapping mid-animation retargets: only one tween component
        // remains and the frame still ends at a consistent pose.
        let mut app = TestApp::with_facing_wall();
        let center = app.screen_center();
        let a = place(&mut app, center);

        app.tap_frame(&a);
        app.step(5);
        app.tap_frame(&a); // deselect mid-lift
        let entity = app.registry().entity_of(&a).unwrap();
        assert!(app.world().get::<TransformTween>(entity).is_some());

        app.finish_transition();
        assert!(app.world().get::<TransformTween>(entity).is_none());
        assert!(app.transform_of(&a).translation.y.abs() < 1e-4);
        assert_eq!(app.selection(), SelectionState::Idle);
    }
}
