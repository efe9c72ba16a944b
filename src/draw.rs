//! Immediate-mode drawing with gizmos: the animated stick figure and shape outlines.
//!
//! Gizmos are rebuilt every frame, so nothing here owns entities.

use bevy::prelude::*;

use crate::movement::Velocity;
use crate::player::Player;

const STICKMAN_COLOR: Color = Color::BLACK;
const LINE_WIDTH: f32 = 3.0;

pub struct DrawPlugin;

impl Plugin for DrawPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, configure_gizmos)
            .add_systems(PostUpdate, (draw_outlines, draw_stickman));
    }
}

/// Stroke drawn around a filled shape. Points and sizes are local to the entity.
#[derive(Component, Clone, Copy, Debug)]
pub struct Outline {
    pub color: Color,
    pub shape: OutlineShape,
}

#[derive(Clone, Copy, Debug)]
pub enum OutlineShape {
    Rect(Vec2),
    Triangle([Vec2; 3]),
}

impl Outline {
    pub fn rect(color: Color, size: Vec2) -> Self {
        Self {
            color,
            shape: OutlineShape::Rect(size),
        }
    }

    pub fn triangle(color: Color, points: [Vec2; 3]) -> Self {
        Self {
            color,
            shape: OutlineShape::Triangle(points),
        }
    }
}

/// Line segments and head of the stick figure for one frame, in world units.
#[derive(Debug, Clone, PartialEq)]
pub struct StickmanPose {
    pub head: Vec2,
    pub head_radius: f32,
    pub torso: [Vec2; 2],
    /// Left hand, shoulder, right hand.
    pub arms: [Vec2; 3],
    pub left_leg: [Vec2; 2],
    pub right_leg: [Vec2; 2],
}

impl StickmanPose {
    /// Arms swing at 10 rad/s and legs at 20 rad/s, but only while running.
    pub fn new(center: Vec2, elapsed: f32, velocity_x: f32) -> Self {
        let moving = if velocity_x != 0.0 { 1.0 } else { 0.0 };
        let arm = (elapsed * 10.0).sin() * 5.0 * moving;
        let leg = (elapsed * 20.0).sin() * 8.0 * moving;
        let Vec2 { x, y } = center;
        let hip = Vec2::new(x, y - 10.0);

        Self {
            head: Vec2::new(x, y + 15.0),
            head_radius: 8.0,
            torso: [Vec2::new(x, y + 7.0), hip],
            arms: [
                Vec2::new(x - 10.0, y + 5.0 - arm),
                Vec2::new(x, y + 5.0),
                Vec2::new(x + 10.0, y + 5.0 + arm),
            ],
            left_leg: [hip, Vec2::new(x - 5.0 + leg, y - 20.0)],
            right_leg: [hip, Vec2::new(x + 5.0 - leg, y - 20.0)],
        }
    }
}

fn configure_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    config.line_width = LINE_WIDTH;
}

fn draw_stickman(
    time: Res<Time>,
    query: Query<(&Transform, &Velocity), With<Player>>,
    mut gizmos: Gizmos,
) {
    for (transform, velocity) in &query {
        let pose = StickmanPose::new(
            transform.translation.truncate(),
            time.elapsed_seconds(),
            velocity.x,
        );

        gizmos.circle_2d(pose.head, pose.head_radius, STICKMAN_COLOR);
        gizmos.line_2d(pose.torso[0], pose.torso[1], STICKMAN_COLOR);
        gizmos.linestrip_2d(pose.arms, STICKMAN_COLOR);
        gizmos.line_2d(pose.left_leg[0], pose.left_leg[1], STICKMAN_COLOR);
        gizmos.line_2d(pose.right_leg[0], pose.right_leg[1], STICKMAN_COLOR);
    }
}

fn draw_outlines(query: Query<(&GlobalTransform, &Outline)>, mut gizmos: Gizmos) {
    for (transform, outline) in &query {
        let origin = transform.translation().truncate();
        match outline.shape {
            OutlineShape::Rect(size) => gizmos.rect_2d(origin, 0.0, size, outline.color),
            OutlineShape::Triangle([a, b, c]) => gizmos.linestrip_2d(
                [a, b, c, a].map(|point| origin + point),
                outline.color,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_pose_is_symmetric() {
        let pose = StickmanPose::new(Vec2::new(100.0, 50.0), 1.234, 0.0);
        assert_eq!(pose.head, Vec2::new(100.0, 65.0));
        assert_eq!(pose.arms[0], Vec2::new(90.0, 55.0));
        assert_eq!(pose.arms[2], Vec2::new(110.0, 55.0));
        assert_eq!(pose.left_leg[1], Vec2::new(95.0, 30.0));
        assert_eq!(pose.right_leg[1], Vec2::new(105.0, 30.0));
    }

    #[test]
    fn running_pose_swings_limbs_in_opposition() {
        let elapsed = 0.05;
        let pose = StickmanPose::new(Vec2::ZERO, elapsed, -200.0);
        let arm = (elapsed * 10.0).sin() * 5.0;
        let leg = (elapsed * 20.0).sin() * 8.0;

        assert!((pose.arms[0].y - (5.0 - arm)).abs() < 1e-5);
        assert!((pose.arms[2].y - (5.0 + arm)).abs() < 1e-5);
        assert!((pose.left_leg[1].x - (-5.0 + leg)).abs() < 1e-5);
        assert!((pose.right_leg[1].x - (5.0 - leg)).abs() < 1e-5);
    }

    #[test]
    fn torso_runs_from_neck_to_hip() {
        let pose = StickmanPose::new(Vec2::new(0.0, 0.0), 0.0, 0.0);
        assert_eq!(pose.torso, [Vec2::new(0.0, 7.0), Vec2::new(0.0, -10.0)]);
        assert_eq!(pose.left_leg[0], pose.torso[1]);
    }
}
