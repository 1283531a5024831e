use bevy::prelude::*;

use crate::config::EXPORT_PATH;
use crate::systems::export::ExportEvent;
use crate::systems::landmass::{GizmosVisible, RegenerateEvent, Seed};

// R = new seed, Space = rebuild current seed, P = export, G = toggle gizmos
pub fn key_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    seed: Res<Seed>,
    mut gizmos_visible: ResMut<GizmosVisible>,
    mut regen_events: EventWriter<RegenerateEvent>,
    mut export_events: EventWriter<ExportEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        regen_events.write(RegenerateEvent { seed: rand::random() });
    }

    if keyboard.just_pressed(KeyCode::Space) {
        regen_events.write(RegenerateEvent { seed: seed.0 });
    }

    if keyboard.just_pressed(KeyCode::KeyP) {
        export_events.write(ExportEvent { filename: EXPORT_PATH.to_string() });
    }

    if keyboard.just_pressed(KeyCode::KeyG) {
        gizmos_visible.0 = !gizmos_visible.0;
    }
}
