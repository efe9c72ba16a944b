//! Hand-authored level layouts.
//!
//! Coordinates are screen pixels with the origin in the top-left corner and y growing downward,
//! which is how the levels were drawn. `LevelConfig::to_world` converts them when spawning.

use bevy::math::Vec2;

use crate::collision::Aabb;

/// Height shared by every moving platform.
pub const MOVING_PLATFORM_HEIGHT: f32 = 20.0;
pub const SPIKE_HITBOX: Vec2 = Vec2::new(16.0, 16.0);
pub const COIN_RADIUS: f32 = 8.0;
pub const FINISH_SIZE: Vec2 = Vec2::new(30.0, 50.0);

/// Axis-aligned rectangle given by its centre and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Block {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// A platform that patrols horizontally between `start_x` and `end_x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformPath {
    pub start_x: f32,
    pub end_x: f32,
    pub y: f32,
    pub speed: f32,
    pub width: f32,
}

impl PlatformPath {
    pub const fn new(start_x: f32, y: f32, end_x: f32, speed: f32, width: f32) -> Self {
        Self {
            start_x,
            end_x,
            y,
            speed,
            width,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LevelLayout {
    pub name: &'static str,
    pub platforms: &'static [Block],
    pub moving_platforms: &'static [PlatformPath],
    pub spikes: &'static [Vec2],
    pub lava: &'static [Block],
    pub coins: &'static [Vec2],
    /// Foot of the flag pole.
    pub finish: Vec2,
}

impl LevelLayout {
    /// Trigger rectangle that sits on top of the flag's foot.
    pub fn finish_zone(&self) -> Aabb {
        Aabb::from_center_size(
            Vec2::new(self.finish.x, self.finish.y - FINISH_SIZE.y * 0.5),
            FINISH_SIZE,
        )
    }

    /// Spikes are drawn 10px above their anchor and collide with a 16px square.
    pub fn spike_box(spike: Vec2) -> Aabb {
        Aabb::from_center_size(Vec2::new(spike.x, spike.y - 10.0), SPIKE_HITBOX)
    }

    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }
}

pub static LEVELS: [LevelLayout; 5] = [
    LevelLayout {
        name: "First Steps",
        platforms: &[
            Block::new(100.0, 650.0, 200.0, 20.0),
            Block::new(350.0, 550.0, 150.0, 20.0),
            Block::new(600.0, 450.0, 150.0, 20.0),
        ],
        moving_platforms: &[],
        spikes: &[
            Vec2::new(250.0, 640.0),
            Vec2::new(280.0, 640.0),
            Vec2::new(450.0, 540.0),
        ],
        lava: &[],
        coins: &[
            Vec2::new(150.0, 610.0),
            Vec2::new(350.0, 510.0),
            Vec2::new(600.0, 410.0),
        ],
        finish: Vec2::new(700.0, 400.0),
    },
    LevelLayout {
        name: "Ferry",
        platforms: &[
            Block::new(100.0, 550.0, 150.0, 20.0),
            Block::new(300.0, 480.0, 100.0, 20.0),
            Block::new(500.0, 400.0, 100.0, 20.0),
            Block::new(680.0, 320.0, 120.0, 20.0),
        ],
        moving_platforms: &[PlatformPath::new(250.0, 350.0, 380.0, 100.0, 100.0)],
        spikes: &[
            Vec2::new(200.0, 540.0),
            Vec2::new(350.0, 470.0),
            Vec2::new(380.0, 470.0),
            Vec2::new(550.0, 390.0),
            Vec2::new(580.0, 390.0),
        ],
        lava: &[],
        coins: &[
            Vec2::new(300.0, 440.0),
            Vec2::new(500.0, 360.0),
            Vec2::new(315.0, 310.0),
        ],
        finish: Vec2::new(730.0, 270.0),
    },
    LevelLayout {
        name: "Hot Floor",
        platforms: &[
            Block::new(100.0, 550.0, 120.0, 20.0),
            Block::new(280.0, 480.0, 80.0, 20.0),
            Block::new(450.0, 420.0, 80.0, 20.0),
            Block::new(620.0, 350.0, 80.0, 20.0),
        ],
        moving_platforms: &[
            PlatformPath::new(180.0, 380.0, 320.0, 120.0, 90.0),
            PlatformPath::new(520.0, 280.0, 680.0, 150.0, 90.0),
        ],
        spikes: &[
            Vec2::new(180.0, 540.0),
            Vec2::new(210.0, 540.0),
            Vec2::new(330.0, 470.0),
            Vec2::new(500.0, 410.0),
            Vec2::new(530.0, 410.0),
            Vec2::new(670.0, 340.0),
        ],
        lava: &[Block::new(740.0, 660.0, 1080.0, 20.0)],
        coins: &[
            Vec2::new(280.0, 440.0),
            Vec2::new(450.0, 380.0),
            Vec2::new(620.0, 310.0),
        ],
        finish: Vec2::new(750.0, 220.0),
    },
    LevelLayout {
        name: "Long Ride",
        platforms: &[
            Block::new(100.0, 550.0, 120.0, 20.0),
            Block::new(520.0, 380.0, 80.0, 20.0),
        ],
        moving_platforms: &[
            PlatformPath::new(250.0, 480.0, 620.0, 120.0, 90.0),
            PlatformPath::new(520.0, 280.0, 680.0, 150.0, 90.0),
        ],
        spikes: &[
            Vec2::new(180.0, 540.0),
            Vec2::new(210.0, 540.0),
            Vec2::new(350.0, 470.0),
        ],
        lava: &[Block::new(740.0, 660.0, 1080.0, 20.0)],
        coins: &[
            Vec2::new(100.0, 510.0),
            Vec2::new(435.0, 440.0),
            Vec2::new(520.0, 340.0),
            Vec2::new(600.0, 240.0),
        ],
        finish: Vec2::new(750.0, 220.0),
    },
    LevelLayout {
        name: "Summit",
        platforms: &[
            Block::new(80.0, 560.0, 100.0, 20.0),
            Block::new(250.0, 500.0, 90.0, 20.0),
            Block::new(420.0, 440.0, 90.0, 20.0),
            Block::new(600.0, 380.0, 80.0, 20.0),
            Block::new(720.0, 300.0, 120.0, 20.0),
        ],
        moving_platforms: &[
            PlatformPath::new(180.0, 420.0, 360.0, 130.0, 100.0),
            PlatformPath::new(500.0, 260.0, 750.0, 160.0, 90.0),
        ],
        spikes: &[
            Vec2::new(160.0, 550.0),
            Vec2::new(190.0, 550.0),
            Vec2::new(300.0, 490.0),
            Vec2::new(330.0, 490.0),
            Vec2::new(460.0, 430.0),
            Vec2::new(490.0, 430.0),
            Vec2::new(630.0, 370.0),
            Vec2::new(660.0, 370.0),
            Vec2::new(690.0, 370.0),
        ],
        lava: &[Block::new(740.0, 660.0, 1080.0, 20.0)],
        coins: &[
            Vec2::new(250.0, 460.0),
            Vec2::new(270.0, 380.0),
            Vec2::new(420.0, 400.0),
            Vec2::new(600.0, 340.0),
            Vec2::new(720.0, 260.0),
        ],
        finish: Vec2::new(760.0, 250.0),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_platform_paths_are_well_formed() {
        for level in &LEVELS {
            for path in level.moving_platforms {
                assert!(path.start_x < path.end_x, "{}: reversed path", level.name);
                assert!(path.speed > 0.0, "{}: stationary platform", level.name);
            }
        }
    }

    #[test]
    fn finish_zone_stands_on_the_flag_foot() {
        let zone = LEVELS[0].finish_zone();
        assert_eq!(zone.center, Vec2::new(700.0, 375.0));
        assert_eq!(zone.max().y, 400.0);
        assert_eq!(zone.half_extents, Vec2::new(15.0, 25.0));
    }

    #[test]
    fn spike_hitbox_is_raised_above_anchor() {
        let hitbox = LevelLayout::spike_box(Vec2::new(250.0, 640.0));
        assert_eq!(hitbox.center, Vec2::new(250.0, 630.0));
        assert_eq!(hitbox.half_extents, Vec2::splat(8.0));
    }

    #[test]
    fn every_level_has_coins_inside_the_viewport() {
        for level in &LEVELS {
            assert!(level.coin_count() > 0, "{} has no coins", level.name);
            for coin in level.coins {
                assert!((0.0..=1280.0).contains(&coin.x));
                assert!((0.0..=700.0).contains(&coin.y));
            }
        }
    }
}
