//! Command dispatch.
//!
//! Drains the external command queue once per frame and fans the commands
//! out to the placement, selection and registry systems as messages,
//! preserving producer order.

use bevy::prelude::*;

use crate::geometry::pixel_to_point;
use crate::layout::{TEMPLATE_IMAGE_HEIGHT, TEMPLATE_IMAGE_WIDTH, template_slots};
use crate::scene::events::{
    ClearFramesEvent, ConvertImageEvent, DeselectEvent, HangPreviewEvent, PlaceFrameEvent,
    RotateCommandEvent, ScaleCommandEvent,
};
use crate::scene::resources::{CommandQueue, DisplayMetricsRes, FrameCommand};

/// System to process all commands from the external command queue.
#[allow(clippy::too_many_arguments)]
pub fn process_commands(
    command_queue: Res<CommandQueue>,
    metrics: Res<DisplayMetricsRes>,
    mut place_events: MessageWriter<PlaceFrameEvent>,
    mut convert_events: MessageWriter<ConvertImageEvent>,
    mut clear_events: MessageWriter<ClearFramesEvent>,
    mut deselect_events: MessageWriter<DeselectEvent>,
    mut scale_events: MessageWriter<ScaleCommandEvent>,
    mut rotate_events: MessageWriter<RotateCommandEvent>,
    mut hang_events: MessageWriter<HangPreviewEvent>,
) {
    for command in command_queue.drain() {
        match command {
            FrameCommand::AddFrame { image } => {
                tracing::info!("[command] AddFrame {image:?}");
                // Pin at the screen center, measured in points not pixels.
                place_events.write(PlaceFrameEvent {
                    image,
                    pin: metrics.0.center_point(),
                });
            }
            FrameCommand::AddFrames { images } => {
                tracing::info!("[command] AddFrames ({} images)", images.len());
                for (slot, image) in template_slots().into_iter().zip(images) {
                    let points = pixel_to_point(
                        slot,
                        TEMPLATE_IMAGE_WIDTH,
                        TEMPLATE_IMAGE_HEIGHT,
                        &metrics.0,
                    );
                    // Pin each frame based on its slot center.
                    place_events.write(PlaceFrameEvent {
                        image,
                        pin: points.center(),
                    });
                }
            }
            FrameCommand::RemoveAllAnchors => {
                tracing::info!("[command] RemoveAllAnchors");
                clear_events.write(ClearFramesEvent);
            }
            FrameCommand::ConvertImageToWorldSpace => {
                tracing::info!("[command] ConvertImageToWorldSpace");
                convert_events.write(ConvertImageEvent);
            }
            FrameCommand::Deselect => {
                tracing::info!("[command] Deselect");
                deselect_events.write(DeselectEvent);
            }
            FrameCommand::Scale { factor } => {
                scale_events.write(ScaleCommandEvent { factor });
            }
            FrameCommand::Rotate { degrees } => {
                rotate_events.write(RotateCommandEvent { degrees });
            }
            FrameCommand::HangFrames { hanging } => {
                tracing::info!("[command] HangFrames hanging={hanging}");
                hang_events.write(HangPreviewEvent { hanging });
            }
        }
    }
}
