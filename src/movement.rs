//! Player input, arcade-style kinematics and moving platforms.
//!
//! Every step integrates gravity, then resolves the player's box against all `Solid` colliders one
//! axis at a time: horizontal first, vertical second. The vertical pass decides whether the player
//! is supported, which in turn gates the next jump.

use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

use crate::collision::{Aabb, Collider, Solid};
use crate::level::LevelConfig;
use crate::player::Player;
use crate::state::{GameSet, GameState};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementSettings>()
            .add_event::<PlayerJumped>()
            .add_systems(
                Update,
                (
                    read_player_input.in_set(GameSet::Input),
                    (move_platforms, apply_kinematics)
                        .chain()
                        .in_set(GameSet::Movement),
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

#[derive(Resource, Clone, Debug)]
pub struct MovementSettings {
    pub gravity: f32,
    pub run_speed: f32,
    pub jump_speed: f32,
    pub terminal_velocity: f32,
    /// How close the player's feet must be to a moving platform's top to ride it.
    pub carry_tolerance: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            gravity: 1000.0,
            run_speed: 200.0,
            jump_speed: 500.0,
            terminal_velocity: -1800.0,
            carry_tolerance: 5.0,
        }
    }
}

#[derive(Component, Default, Deref, DerefMut, Debug, Clone, Copy)]
pub struct Velocity(pub Vec2);

#[derive(Component, Default, Debug)]
pub struct MovementState {
    /// Supported from below after the last step, by a solid or the world floor.
    pub on_ground: bool,
    pub wants_jump: bool,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct MovingPlatform {
    pub start_x: f32,
    pub end_x: f32,
    pub speed: f32,
}

impl MovingPlatform {
    /// Turns the platform around once it passes either end of its path. A platform already heading
    /// back toward its path keeps its velocity.
    pub fn next_velocity(&self, x: f32, velocity_x: f32) -> f32 {
        if velocity_x > 0.0 && x >= self.end_x {
            -self.speed
        } else if velocity_x < 0.0 && x <= self.start_x {
            self.speed
        } else {
            velocity_x
        }
    }
}

#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerJumped;

fn read_player_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<MovementSettings>,
    mut query: Query<(&mut Velocity, &mut MovementState), With<Player>>,
) {
    let left = keyboard.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]);
    let right = keyboard.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]);
    let jump = keyboard.any_just_pressed([KeyCode::Space, KeyCode::ArrowUp]);

    for (mut velocity, mut state) in &mut query {
        velocity.x = horizontal_intent(left, right) * settings.run_speed;

        if jump {
            state.wants_jump = true;
        }
    }
}

/// Left wins when both directions are held.
pub fn horizontal_intent(left: bool, right: bool) -> f32 {
    if left {
        -1.0
    } else if right {
        1.0
    } else {
        0.0
    }
}

/// Reverses platforms at the ends of their paths, moves them, and drags along a player who is
/// standing on top.
fn move_platforms(
    time: Res<Time>,
    settings: Res<MovementSettings>,
    mut platforms: Query<
        (&mut Transform, &mut Velocity, &MovingPlatform, &Collider),
        Without<Player>,
    >,
    mut player_query: Query<
        (&mut Transform, &Collider, &MovementState),
        (With<Player>, Without<MovingPlatform>),
    >,
) {
    let dt = time.delta_seconds();
    let mut player = player_query.get_single_mut().ok();

    for (mut transform, mut velocity, platform, collider) in &mut platforms {
        velocity.x = platform.next_velocity(transform.translation.x, velocity.x);

        if let Some((player_transform, player_collider, state)) = player.as_mut() {
            let offset = carry_offset(
                player_collider.aabb(player_transform),
                state.on_ground,
                collider.aabb(&transform),
                velocity.x,
                dt,
                settings.carry_tolerance,
            );
            player_transform.translation.x += offset;
        }

        transform.translation.x += velocity.x * dt;
    }
}

/// Horizontal distance a grounded player standing on `platform` travels with it this step.
pub fn carry_offset(
    player: Aabb,
    on_ground: bool,
    platform: Aabb,
    platform_velocity_x: f32,
    dt: f32,
    tolerance: f32,
) -> f32 {
    if !on_ground {
        return 0.0;
    }

    let feet = player.min().y;
    let top = platform.max().y;
    let above = (feet - top).abs() < tolerance;
    let over = player.max().x > platform.min().x && player.min().x < platform.max().x;

    if above && over {
        platform_velocity_x * dt
    } else {
        0.0
    }
}

fn apply_kinematics(
    time: Res<Time>,
    settings: Res<MovementSettings>,
    config: Res<LevelConfig>,
    solids: Query<(&Transform, &Collider), (With<Solid>, Without<Player>)>,
    mut query: Query<
        (&mut Transform, &mut Velocity, &mut MovementState, &Collider),
        With<Player>,
    >,
    mut jumped: EventWriter<PlayerJumped>,
) {
    let dt = time.delta_seconds();
    let obstacles: Vec<Aabb> = solids
        .iter()
        .map(|(transform, collider)| collider.aabb(transform))
        .collect();

    for (mut transform, mut velocity, mut state, collider) in &mut query {
        if state.wants_jump && state.on_ground {
            velocity.y = settings.jump_speed;
            state.on_ground = false;
            jumped.send(PlayerJumped);
        }
        state.wants_jump = false;

        velocity.y = (velocity.y - settings.gravity * dt).max(settings.terminal_velocity);

        let mut position = transform.translation.truncate();
        let contacts = step_body(
            &mut position,
            &mut velocity.0,
            collider.half_extents,
            dt,
            &obstacles,
            config.world_half_extents(),
        );
        state.on_ground = contacts.down;
        if contacts.up || contacts.side {
            trace!("Player blocked: {:?}", contacts);
        }

        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Contacts {
    pub down: bool,
    pub up: bool,
    pub side: bool,
}

const SKIN: f32 = 0.001;
/// How far a body may already be sunk into a solid and still be pushed back out on top of it.
const LANDING_TOLERANCE: f32 = 4.0;

/// Moves a box by `velocity * dt`, stopping it against `solids` and the world bounds.
pub fn step_body(
    position: &mut Vec2,
    velocity: &mut Vec2,
    half: Vec2,
    dt: f32,
    solids: &[Aabb],
    bounds: Vec2,
) -> Contacts {
    let mut contacts = Contacts {
        side: resolve_horizontal(position, &mut velocity.x, half, dt, solids),
        ..default()
    };

    let (down, up) = resolve_vertical(position, &mut velocity.y, half, dt, solids);
    contacts.down = down;
    contacts.up = up;

    let limit = bounds - half;
    if position.x.abs() > limit.x {
        position.x = position.x.clamp(-limit.x, limit.x);
        velocity.x = 0.0;
        contacts.side = true;
    }
    if position.y < -limit.y {
        position.y = -limit.y;
        velocity.y = velocity.y.max(0.0);
        contacts.down = true;
    } else if position.y > limit.y {
        position.y = limit.y;
        velocity.y = velocity.y.min(0.0);
        contacts.up = true;
    }

    contacts
}

/// True when the extent `position ± half` overlaps `min..max` on one axis.
fn spans(position: f32, half: f32, min: f32, max: f32) -> bool {
    position - half < max && position + half > min
}

// Only faces the leading edge crosses during this step stop the body. Solids it already overlaps
// are ignored.
fn resolve_horizontal(
    position: &mut Vec2,
    velocity: &mut f32,
    half: Vec2,
    dt: f32,
    solids: &[Aabb],
) -> bool {
    if velocity.abs() < f32::EPSILON {
        return false;
    }

    let new_x = position.x + *velocity * dt;
    let in_row = |solid: &&Aabb| spans(position.y, half.y - SKIN, solid.min().y, solid.max().y);

    let stop = if *velocity > 0.0 {
        let edge = position.x + half.x;
        let new_edge = new_x + half.x;
        solids
            .iter()
            .filter(in_row)
            .filter(|solid| solid.min().x >= edge - SKIN && solid.min().x < new_edge)
            .map(|solid| solid.min().x - half.x - SKIN)
            .reduce(f32::min)
    } else {
        let edge = position.x - half.x;
        let new_edge = new_x - half.x;
        solids
            .iter()
            .filter(in_row)
            .filter(|solid| solid.max().x <= edge + SKIN && solid.max().x > new_edge)
            .map(|solid| solid.max().x + half.x + SKIN)
            .reduce(f32::max)
    };

    match stop {
        Some(x) => {
            position.x = x;
            *velocity = 0.0;
            true
        }
        None => {
            position.x = new_x;
            false
        }
    }
}

/// Returns `(down, up)` contacts.
fn resolve_vertical(
    position: &mut Vec2,
    velocity: &mut f32,
    half: Vec2,
    dt: f32,
    solids: &[Aabb],
) -> (bool, bool) {
    let new_y = position.y + *velocity * dt;
    let in_column = |solid: &&Aabb| spans(position.x, half.x - SKIN, solid.min().x, solid.max().x);

    if *velocity <= 0.0 {
        let feet = position.y - half.y;
        let new_feet = new_y - half.y;
        let landing = solids
            .iter()
            .filter(in_column)
            .filter(|solid| {
                let top = solid.max().y;
                feet >= top - LANDING_TOLERANCE && new_feet < top
            })
            .map(|solid| solid.max().y)
            .reduce(f32::max);

        if let Some(top) = landing {
            position.y = top + half.y + SKIN;
            *velocity = 0.0;
            return (true, false);
        }
    } else {
        let head = position.y + half.y;
        let new_head = new_y + half.y;
        let ceiling = solids
            .iter()
            .filter(in_column)
            .filter(|solid| {
                let bottom = solid.min().y;
                head <= bottom + LANDING_TOLERANCE && new_head > bottom
            })
            .map(|solid| solid.min().y)
            .reduce(f32::min);

        if let Some(bottom) = ceiling {
            position.y = bottom - half.y - SKIN;
            *velocity = 0.0;
            return (false, true);
        }
    }

    position.y = new_y;
    (false, false)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const HALF: Vec2 = Vec2::new(10.0, 20.0);
    const BOUNDS: Vec2 = Vec2::new(640.0, 350.0);
    const DT: f32 = 1.0 / 60.0;

    fn floor() -> Aabb {
        Aabb::from_center_size(Vec2::new(0.0, -10.0), Vec2::new(200.0, 20.0))
    }

    #[test]
    fn left_wins_over_right() {
        assert_eq!(horizontal_intent(true, true), -1.0);
        assert_eq!(horizontal_intent(false, true), 1.0);
        assert_eq!(horizontal_intent(false, false), 0.0);
    }

    #[test]
    fn platform_reverses_only_past_its_ends() {
        let platform = MovingPlatform {
            start_x: -100.0,
            end_x: 100.0,
            speed: 120.0,
        };

        assert_eq!(platform.next_velocity(0.0, 120.0), 120.0);
        assert_eq!(platform.next_velocity(100.0, 120.0), -120.0);
        assert_eq!(platform.next_velocity(130.0, 120.0), -120.0);
        assert_eq!(platform.next_velocity(130.0, -120.0), -120.0);
        assert_eq!(platform.next_velocity(-100.0, -120.0), 120.0);
        assert_eq!(platform.next_velocity(-100.0, 120.0), 120.0);
    }

    #[test]
    fn falling_body_lands_on_floor() {
        let mut position = Vec2::new(0.0, 20.5);
        let mut velocity = Vec2::new(0.0, -60.0);

        let contacts = step_body(&mut position, &mut velocity, HALF, DT, &[floor()], BOUNDS);

        assert!(contacts.down);
        assert_eq!(velocity.y, 0.0);
        assert!((position.y - 20.0).abs() < 0.01);
    }

    #[test]
    fn body_beside_a_platform_is_not_teleported_on_top() {
        let wall = Aabb::from_center_size(Vec2::new(15.0, 0.0), Vec2::new(20.0, 200.0));
        let mut position = Vec2::new(0.0, 0.0);
        let mut velocity = Vec2::new(0.0, -10.0);

        let contacts = step_body(&mut position, &mut velocity, HALF, DT, &[wall], BOUNDS);

        assert!(!contacts.down);
        assert!(position.y < 0.0);
    }

    #[test]
    fn running_into_a_wall_stops_at_its_face() {
        let wall = Aabb::from_center_size(Vec2::new(30.0, 0.0), Vec2::new(20.0, 200.0));
        let mut position = Vec2::new(8.0, 0.0);
        let mut velocity = Vec2::new(200.0, 0.0);

        let contacts = step_body(&mut position, &mut velocity, HALF, DT, &[wall], BOUNDS);

        assert!(contacts.side);
        assert_eq!(velocity.x, 0.0);
        assert!((position.x - 10.0).abs() < 0.01);
    }

    #[test]
    fn jumping_into_a_ceiling_bonks() {
        let ceiling = Aabb::from_center_size(Vec2::new(0.0, 31.0), Vec2::new(100.0, 20.0));
        let mut position = Vec2::ZERO;
        let mut velocity = Vec2::new(0.0, 500.0);

        let contacts = step_body(&mut position, &mut velocity, HALF, DT, &[ceiling], BOUNDS);

        assert!(contacts.up);
        assert_eq!(velocity.y, 0.0);
        assert!((position.y - 1.0).abs() < 0.01);
    }

    #[test]
    fn fast_fall_at_low_frame_rate_still_lands() {
        for (dt, vy) in [(0.07, -1000.0), (0.1, -800.0)] {
            let mut position = Vec2::new(0.0, 20.5);
            let mut velocity = Vec2::new(0.0, vy);

            let contacts = step_body(&mut position, &mut velocity, HALF, dt, &[floor()], BOUNDS);

            assert!(contacts.down, "dt {dt} fell through the floor to {}", position.y);
            assert!((position.y - 20.0).abs() < 0.01);
        }
    }

    #[test]
    fn fast_jump_at_low_frame_rate_still_bonks() {
        let ceiling = Aabb::from_center_size(Vec2::new(0.0, 31.0), Vec2::new(100.0, 20.0));
        let mut position = Vec2::ZERO;
        let mut velocity = Vec2::new(0.0, 900.0);

        let contacts = step_body(&mut position, &mut velocity, HALF, 0.1, &[ceiling], BOUNDS);

        assert!(contacts.up);
        assert!((position.y - 1.0).abs() < 0.01);
    }

    #[test]
    fn platform_slid_into_the_body_does_not_pin_it() {
        // The platform's left face is 4 px inside the body's right side.
        let platform = Aabb::from_center_size(Vec2::new(51.0, 0.0), Vec2::new(90.0, 20.0));

        let mut position = Vec2::ZERO;
        let mut velocity = Vec2::new(-200.0, 0.0);
        let contacts = step_body(&mut position, &mut velocity, HALF, DT, &[platform], BOUNDS);
        assert!(!contacts.side);
        assert!(position.x < 0.0);

        let mut position = Vec2::ZERO;
        let mut velocity = Vec2::new(200.0, 0.0);
        let contacts = step_body(&mut position, &mut velocity, HALF, DT, &[platform], BOUNDS);
        assert!(!contacts.side);
        assert!(position.x > 0.0);
    }

    #[test]
    fn world_bounds_contain_the_body() {
        let mut position = Vec2::new(635.0, -345.0);
        let mut velocity = Vec2::new(200.0, -100.0);

        let contacts = step_body(&mut position, &mut velocity, HALF, DT, &[], BOUNDS);

        assert_eq!(position, Vec2::new(630.0, -330.0));
        assert!(contacts.side && contacts.down);
    }

    #[test]
    fn carry_applies_only_to_riders() {
        let platform = Aabb::from_center_size(Vec2::ZERO, Vec2::new(90.0, 20.0));
        let rider = Aabb::new(Vec2::new(30.0, 30.001), HALF);
        let off_edge = Aabb::new(Vec2::new(80.0, 30.0), HALF);
        let airborne = Aabb::new(Vec2::new(0.0, 60.0), HALF);

        assert!((carry_offset(rider, true, platform, 120.0, 0.5, 5.0) - 60.0).abs() < 1e-4);
        assert_eq!(carry_offset(rider, false, platform, 120.0, 0.5, 5.0), 0.0);
        assert_eq!(carry_offset(off_edge, true, platform, 120.0, 0.5, 5.0), 0.0);
        assert_eq!(carry_offset(airborne, true, platform, 120.0, 0.5, 5.0), 0.0);
    }

    fn kinematics_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<MovementSettings>()
            .init_resource::<LevelConfig>()
            .add_event::<PlayerJumped>()
            .add_systems(Update, (move_platforms, apply_kinematics).chain());
        app
    }

    fn tick(app: &mut App) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(16));
        app.update();
    }

    #[test]
    fn grounded_player_jumps_once() {
        let mut app = kinematics_app();
        app.world_mut().spawn((
            Solid,
            Transform::from_xyz(0.0, -10.0, 0.0),
            Collider::from_size(Vec2::new(200.0, 20.0)),
        ));
        let player = app
            .world_mut()
            .spawn((
                Player,
                Transform::from_xyz(0.0, 20.001, 0.0),
                Velocity::default(),
                MovementState {
                    on_ground: true,
                    wants_jump: true,
                },
                Collider::from_size(Vec2::new(20.0, 40.0)),
            ))
            .id();

        tick(&mut app);

        let velocity = app.world().get::<Velocity>(player).map(|v| v.y);
        assert!(velocity.is_some_and(|vy| vy > 400.0));
        let jumps = app.world().resource::<Events<PlayerJumped>>().len();
        assert_eq!(jumps, 1);

        if let Some(mut state) = app.world_mut().get_mut::<MovementState>(player) {
            state.wants_jump = true;
        }
        tick(&mut app);
        let jumps = app.world().resource::<Events<PlayerJumped>>().len();
        assert_eq!(jumps, 1, "airborne player must not jump again");
    }

    #[test]
    fn rider_moves_with_platform() {
        let mut app = kinematics_app();
        app.world_mut().spawn((
            Solid,
            MovingPlatform {
                start_x: -100.0,
                end_x: 100.0,
                speed: 100.0,
            },
            Velocity(Vec2::new(100.0, 0.0)),
            Transform::from_xyz(0.0, -10.0, 0.0),
            Collider::from_size(Vec2::new(90.0, 20.0)),
        ));
        let player = app
            .world_mut()
            .spawn((
                Player,
                Transform::from_xyz(0.0, 20.001, 0.0),
                Velocity::default(),
                MovementState {
                    on_ground: true,
                    wants_jump: false,
                },
                Collider::from_size(Vec2::new(20.0, 40.0)),
            ))
            .id();

        for _ in 0..10 {
            tick(&mut app);
        }

        let transform = app.world().get::<Transform>(player).copied();
        let state_on_ground = app
            .world()
            .get::<MovementState>(player)
            .is_some_and(|state| state.on_ground);
        assert!(state_on_ground);
        assert!(transform.is_some_and(|t| (t.translation.x - 16.0).abs() < 0.1));
    }
}
