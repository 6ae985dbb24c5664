//! Animated transition advance.
//!
//! Runs on the fixed-update schedule so animations progress by exact
//! timesteps; completion messages fire in the order the animations were
//! started.

use bevy::prelude::*;

use crate::scene::events::TweenFinishedEvent;
use crate::tween::TransformTween;

/// System to advance in-flight transitions and apply them to transforms.
pub fn advance_tweens(
    time: Res<Time>,
    mut commands: Commands,
    mut finished: MessageWriter<TweenFinishedEvent>,
    mut tweens: Query<(Entity, &mut Transform, &mut TransformTween)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (entity, mut transform, mut tween) in tweens.iter_mut() {
        tween.elapsed += dt;
        let sample = tween.sample();
        transform.translation = sample.translation;
        transform.scale = sample.scale;
        transform.rotation = Quat::from_rotation_y(sample.angle);

        if tween.is_finished() {
            finished.write(TweenFinishedEvent {
                entity,
                handle: tween.handle,
            });
            commands.entity(entity).remove::<TransformTween>();
        }
    }
}
