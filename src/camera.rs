//! Camera setup and screen effects. The camera never follows the player: every level fits the
//! 1280x700 view, so the projection is scaled to keep that whole area visible at any window size.
//! Shake and flash are short-lived feedback for hazards and level changes.

use bevy::prelude::*;
use bevy::render::camera::ScalingMode;

use crate::level::LevelConfig;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EffectSettings>()
            .init_resource::<CameraShake>()
            .init_resource::<ScreenFlash>()
            .add_systems(Startup, (setup_camera, spawn_flash_overlay))
            .add_systems(Update, (apply_camera_shake, update_flash_overlay));
    }
}

#[derive(Resource, Clone, Debug)]
pub struct EffectSettings {
    pub shake_duration: f32,
    /// Fraction of the viewport the camera may be displaced by.
    pub shake_intensity: f32,
    pub flash_duration: f32,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            shake_duration: 0.2,
            shake_intensity: 0.01,
            flash_duration: 0.2,
        }
    }
}

#[derive(Component)]
pub struct MainCamera;

#[derive(Resource, Default, Debug)]
pub struct CameraShake {
    pub remaining: f32,
    pub duration: f32,
    pub intensity: f32,
}

impl CameraShake {
    pub fn start(&mut self, duration: f32, intensity: f32) {
        self.remaining = duration;
        self.duration = duration;
        self.intensity = intensity;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Displacement for the current frame; decays linearly to zero over the shake.
    pub fn offset(&self, viewport: Vec2, elapsed: f32) -> Vec2 {
        if !self.is_active() || self.duration <= 0.0 {
            return Vec2::ZERO;
        }

        let strength = self.intensity * (self.remaining / self.duration);
        Vec2::new(
            (elapsed * 97.0).sin() * viewport.x,
            (elapsed * 131.0).cos() * viewport.y,
        ) * strength
    }
}

#[derive(Resource, Default, Debug)]
pub struct ScreenFlash {
    pub remaining: f32,
    pub duration: f32,
}

impl ScreenFlash {
    pub fn start(&mut self, duration: f32) {
        self.remaining = duration;
        self.duration = duration;
    }

    /// 1.0 right after the flash starts, fading to 0.0.
    pub fn alpha(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.duration).clamp(0.0, 1.0)
    }
}

#[derive(Component)]
struct FlashOverlay;

fn setup_camera(mut commands: Commands, config: Res<LevelConfig>) {
    let mut camera = Camera2dBundle::default();
    camera.projection.scaling_mode = ScalingMode::AutoMin {
        min_width: config.viewport.x,
        min_height: config.viewport.y,
    };

    commands.spawn((Name::new("MainCamera"), MainCamera, camera));
}

fn spawn_flash_overlay(mut commands: Commands, config: Res<LevelConfig>) {
    commands.spawn((
        FlashOverlay,
        Name::new("FlashOverlay"),
        SpriteBundle {
            sprite: Sprite {
                color: Color::srgba(1.0, 1.0, 1.0, 0.0),
                custom_size: Some(config.viewport * 2.0),
                ..default()
            },
            transform: Transform::from_xyz(0.0, 0.0, 900.0),
            ..default()
        },
    ));
}

fn apply_camera_shake(
    time: Res<Time>,
    config: Res<LevelConfig>,
    mut shake: ResMut<CameraShake>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(mut camera_transform) = camera_query.get_single_mut() else {
        return;
    };

    if !shake.is_active() {
        if camera_transform.translation.truncate() != Vec2::ZERO {
            camera_transform.translation.x = 0.0;
            camera_transform.translation.y = 0.0;
        }
        return;
    }

    let offset = shake.offset(config.viewport, time.elapsed_seconds());
    camera_transform.translation.x = offset.x;
    camera_transform.translation.y = offset.y;
    shake.remaining -= time.delta_seconds();
}

fn update_flash_overlay(
    time: Res<Time>,
    mut flash: ResMut<ScreenFlash>,
    mut overlay_query: Query<&mut Sprite, With<FlashOverlay>>,
) {
    if flash.remaining <= 0.0 && flash.duration <= 0.0 {
        return;
    }

    let alpha = flash.alpha();
    for mut sprite in &mut overlay_query {
        sprite.color = Color::srgba(1.0, 1.0, 1.0, alpha);
    }

    flash.remaining -= time.delta_seconds();
    if flash.remaining <= 0.0 {
        // Leave the overlay transparent until the next flash.
        flash.remaining = 0.0;
        flash.duration = 0.0;
        for mut sprite in &mut overlay_query {
            sprite.color = Color::srgba(1.0, 1.0, 1.0, 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shake_decays_to_nothing() {
        let mut shake = CameraShake::default();
        let viewport = Vec2::new(1280.0, 700.0);
        assert_eq!(shake.offset(viewport, 1.0), Vec2::ZERO);

        shake.start(0.2, 0.01);
        let offset = shake.offset(viewport, 0.013);
        assert!(offset.x.abs() <= 12.8 && offset.y.abs() <= 7.0);
        assert!(offset != Vec2::ZERO);

        shake.remaining = 0.0;
        assert!(!shake.is_active());
        assert_eq!(shake.offset(viewport, 0.013), Vec2::ZERO);
    }

    #[test]
    fn flash_fades_out() {
        let mut flash = ScreenFlash::default();
        assert_eq!(flash.alpha(), 0.0);

        flash.start(0.2);
        assert_eq!(flash.alpha(), 1.0);
        flash.remaining = 0.05;
        assert!((flash.alpha() - 0.25).abs() < 1e-6);
    }
}
