//! Axis-aligned bounding boxes and trigger detection.
//!
//! Solid geometry (platforms, ground) is resolved inside `movement`; this module only reports
//! overlaps between the player and the non-solid triggers: hazards, coins and the finish flag.

use bevy::prelude::*;

use crate::level::LevelConfig;
use crate::player::Player;
use crate::state::{GameSet, GameState};

pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TriggerEvent>().add_systems(
            Update,
            (detect_triggers, check_fall_out)
                .chain()
                .in_set(GameSet::Collision)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self::new(center, size * 0.5)
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Touching edges do not count as an overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        delta.x < reach.x && delta.y < reach.y
    }
}

#[derive(Component, Copy, Clone, Debug)]
pub struct Collider {
    pub half_extents: Vec2,
}

impl Collider {
    pub fn from_size(size: Vec2) -> Self {
        Self {
            half_extents: size * 0.5,
        }
    }

    pub fn aabb(&self, transform: &Transform) -> Aabb {
        Aabb::new(transform.translation.truncate(), self.half_extents)
    }
}

/// Blocks movement. The player lands on, bumps into and slides along these.
#[derive(Component)]
pub struct Solid;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hazard {
    Spike,
    Lava,
}

#[derive(Component)]
pub struct Coin;

#[derive(Component)]
pub struct FinishZone;

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum TriggerEvent {
    Hazard(Hazard),
    Coin(Entity),
    Finish,
    FellOut,
}

fn detect_triggers(
    player_query: Query<(&Transform, &Collider), With<Player>>,
    hazards: Query<(&Transform, &Collider, &Hazard), Without<Player>>,
    coins: Query<(Entity, &Transform, &Collider), (With<Coin>, Without<Player>)>,
    finish: Query<(&Transform, &Collider), (With<FinishZone>, Without<Player>)>,
    mut events: EventWriter<TriggerEvent>,
) {
    let Ok((transform, collider)) = player_query.get_single() else {
        return;
    };
    let player = collider.aabb(transform);

    // One hazard event per frame is enough; touching two spikes still means one reset.
    if let Some((_, _, hazard)) = hazards
        .iter()
        .find(|(transform, collider, _)| player.overlaps(&collider.aabb(transform)))
    {
        events.send(TriggerEvent::Hazard(*hazard));
    }

    for (entity, transform, collider) in &coins {
        if player.overlaps(&collider.aabb(transform)) {
            events.send(TriggerEvent::Coin(entity));
        }
    }

    if finish
        .iter()
        .any(|(transform, collider)| player.overlaps(&collider.aabb(transform)))
    {
        events.send(TriggerEvent::Finish);
    }
}

fn check_fall_out(
    config: Res<LevelConfig>,
    player_query: Query<&Transform, With<Player>>,
    mut events: EventWriter<TriggerEvent>,
) {
    let Ok(transform) = player_query.get_single() else {
        return;
    };

    if transform.translation.y < config.fall_limit_y() {
        events.send(TriggerEvent::FellOut);
    }
}
