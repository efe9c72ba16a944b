//! Player entity lifecycle. The player is spawned once and lives for the whole session; level loads
//! and hazards only move it back to the spawn point.
//!
//! The body itself is invisible. `draw` renders a stick figure on top of it every frame.

use bevy::prelude::*;

use crate::collision::Collider;
use crate::level::LevelConfig;
use crate::movement::{MovementState, Velocity};

pub const PLAYER_SIZE: Vec2 = Vec2::new(20.0, 40.0);

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_player);
    }
}

/// Marker component used by many systems (movement, triggers, drawing) to identify the player.
#[derive(Component)]
pub struct Player;

fn spawn_player(mut commands: Commands, config: Res<LevelConfig>) {
    let spawn = config.spawn_world().extend(2.0);

    commands.spawn((
        Name::new("Player"),
        Player,
        SpatialBundle::from_transform(Transform::from_translation(spawn)),
        Velocity::default(),
        MovementState::default(),
        Collider::from_size(PLAYER_SIZE),
    ));
}

/// Puts the player back on the spawn point at rest.
pub fn reset_player(
    config: Res<LevelConfig>,
    mut query: Query<(&mut Transform, &mut Velocity, &mut MovementState), With<Player>>,
) {
    for (mut transform, mut velocity, mut state) in &mut query {
        respawn(&config, &mut transform, &mut velocity, &mut state);
    }
}

pub fn respawn(
    config: &LevelConfig,
    transform: &mut Transform,
    velocity: &mut Velocity,
    state: &mut MovementState,
) {
    let spawn = config.spawn_world();
    transform.translation.x = spawn.x;
    transform.translation.y = spawn.y;
    velocity.0 = Vec2::ZERO;
    state.on_ground = false;
    state.wants_jump = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_returns_player_to_spawn_at_rest() {
        let mut app = App::new();
        app.init_resource::<LevelConfig>()
            .add_systems(Startup, spawn_player)
            .add_systems(Update, reset_player);
        app.update();

        let player = {
            let world = app.world_mut();
            let mut query = world.query_filtered::<Entity, With<Player>>();
            query.single(world)
        };
        {
            let mut entity = app.world_mut().entity_mut(player);
            if let Some(mut transform) = entity.get_mut::<Transform>() {
                transform.translation = Vec3::new(300.0, -290.0, 2.0);
            }
            if let Some(mut velocity) = entity.get_mut::<Velocity>() {
                velocity.0 = Vec2::new(200.0, -700.0);
            }
        }

        app.update();

        let world = app.world();
        let spawn = LevelConfig::default().spawn_world();
        let transform = world.get::<Transform>(player).copied();
        assert_eq!(
            transform.map(|t| t.translation),
            Some(Vec3::new(spawn.x, spawn.y, 2.0))
        );
        assert_eq!(world.get::<Velocity>(player).map(|v| v.0), Some(Vec2::ZERO));
    }
}
