//! High-level plugin composition.
//!
//! `StickmanPlatformerPlugin` glues together all domain-specific plugins (levels, player, movement,
//! triggers, effects, UI) and sets up system ordering. Each subsystem owns its own resources; this
//! orchestrator only registers them with the Bevy application.

use bevy::prelude::*;

use crate::audio::GameAudioPlugin;
use crate::camera::CameraPlugin;
use crate::collision::CollisionPlugin;
use crate::draw::DrawPlugin;
use crate::level::LevelPlugin;
use crate::movement::MovementPlugin;
use crate::player::PlayerPlugin;
use crate::progress::ProgressPlugin;
use crate::state::{toggle_pause, GameSet, GameState};
use crate::ui::UiPlugin;

pub struct StickmanPlatformerPlugin;

impl Plugin for StickmanPlatformerPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_plugins((
                LevelPlugin,     // Layout catalog + per-level entity lifecycle.
                PlayerPlugin,    // The persistent player body.
                MovementPlugin,  // Input, kinematics, moving platforms.
                CollisionPlugin, // Hazard, coin and finish overlaps.
                ProgressPlugin,  // Score, level advancement, victory.
                CameraPlugin,    // Fixed view, shake and flash.
                DrawPlugin,      // Stick figure and outlines.
                GameAudioPlugin, // Sound effects.
                UiPlugin,        // HUD, pause and victory overlays.
            ))
            // Within a frame: read input, move bodies, detect overlaps, then react to them.
            .configure_sets(
                Update,
                (
                    GameSet::Input,
                    GameSet::Movement,
                    GameSet::Collision,
                    GameSet::Effects,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(Update, toggle_pause.before(GameSet::Input));
    }
}
