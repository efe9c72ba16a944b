//! Level orchestration: owns the layout catalog, tracks which level is active, and rebuilds the
//! level's entities whenever the game passes through `GameState::Loading`.
//!
//! Everything spawned for a level is tagged with `LevelEntity` so the next load can sweep it away.
//! The base ground and backdrop are spawned once and survive every reload.

use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};

use crate::collision::{Coin, Collider, FinishZone, Hazard, Solid};
use crate::draw::Outline;
use crate::levels::{
    Block, LevelLayout, COIN_RADIUS, FINISH_SIZE, LEVELS, MOVING_PLATFORM_HEIGHT, SPIKE_HITBOX,
};
use crate::movement::{MovingPlatform, Velocity};
use crate::player::reset_player;
use crate::state::GameState;

const PLATFORM_FILL: Color = Color::srgb(0.545, 0.271, 0.075);
const PLATFORM_EDGE: Color = Color::srgb(0.396, 0.263, 0.129);
const MOVING_FILL: Color = Color::srgb(0.824, 0.412, 0.118);
const SPIKE_FILL: Color = Color::srgb(1.0, 0.0, 0.0);
const SPIKE_EDGE: Color = Color::srgb(0.545, 0.0, 0.0);
const LAVA_FILL: Color = Color::srgb(1.0, 0.271, 0.0);
const LAVA_EDGE: Color = Color::srgb(0.698, 0.133, 0.133);
const COIN_FILL: Color = Color::srgb(1.0, 0.843, 0.0);
const FLAG_POLE: Color = Color::BLACK;
const FLAG_FILL: Color = Color::srgb(0.0, 1.0, 0.0);
const FLAG_EDGE: Color = Color::srgb(0.0, 0.533, 0.0);
const SKY_TOP: Color = Color::srgb(0.529, 0.808, 0.922);
const SKY_BOTTOM: Color = Color::srgb(0.878, 0.965, 1.0);

/// Upward-pointing spike, relative to its hitbox centre.
const SPIKE_POINTS: [Vec2; 3] = [
    Vec2::new(0.0, 10.0),
    Vec2::new(-10.0, -10.0),
    Vec2::new(10.0, -10.0),
];
/// Pennant, relative to the foot of the pole.
const PENNANT_POINTS: [Vec2; 3] = [
    Vec2::new(2.0, 45.0),
    Vec2::new(2.0, 25.0),
    Vec2::new(27.0, 35.0),
];

/// Registers level resources, the persistent scenery, and the load pipeline.
pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelConfig>()
            .init_resource::<LevelCatalog>()
            .init_resource::<CurrentLevel>()
            .add_systems(Startup, (spawn_backdrop, spawn_base_ground))
            .add_systems(
                OnEnter(GameState::Loading),
                (despawn_level, spawn_level, reset_player, finish_loading).chain(),
            );
    }
}

/// Viewport and spawn configuration. Positions are in screen pixels (top-left origin, y down),
/// the same space the layouts are authored in.
#[derive(Resource, Clone, Debug)]
pub struct LevelConfig {
    pub viewport: Vec2,
    pub spawn_point: Vec2,
    /// The player is reset once its centre drops below this screen row.
    pub fall_limit: f32,
    pub base_ground: Block,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(1280.0, 700.0),
            spawn_point: Vec2::new(100.0, 500.0),
            fall_limit: 650.0,
            base_ground: Block::new(640.0, 690.0, 1280.0, 20.0),
        }
    }
}

impl LevelConfig {
    /// Maps screen pixels onto Bevy world units centred on the viewport.
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(screen.x - self.viewport.x * 0.5, self.viewport.y * 0.5 - screen.y)
    }

    pub fn spawn_world(&self) -> Vec2 {
        self.to_world(self.spawn_point)
    }

    pub fn fall_limit_y(&self) -> f32 {
        self.viewport.y * 0.5 - self.fall_limit
    }

    /// Half extents of the playable area in world units.
    pub fn world_half_extents(&self) -> Vec2 {
        self.viewport * 0.5
    }
}

#[derive(Resource, Clone, Copy)]
pub struct LevelCatalog {
    levels: &'static [LevelLayout],
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::new(&LEVELS)
    }
}

impl LevelCatalog {
    pub fn new(levels: &'static [LevelLayout]) -> Self {
        Self { levels }
    }

    /// Levels are numbered from 1.
    pub fn get(&self, number: usize) -> Option<&'static LevelLayout> {
        number.checked_sub(1).and_then(|index| self.levels.get(index))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn is_last(&self, number: usize) -> bool {
        number >= self.levels.len()
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentLevel {
    pub number: usize,
}

impl Default for CurrentLevel {
    fn default() -> Self {
        Self { number: 1 }
    }
}

/// Marker for everything that belongs to the active level only.
#[derive(Component)]
pub struct LevelEntity;

fn spawn_backdrop(
    mut commands: Commands,
    config: Res<LevelConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let mut mesh = Mesh::from(Rectangle::from_size(config.viewport));
    let colors: Option<Vec<[f32; 4]>> = match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
        Some(VertexAttributeValues::Float32x3(positions)) => Some(
            positions
                .iter()
                .map(|position| {
                    let color = if position[1] > 0.0 { SKY_TOP } else { SKY_BOTTOM };
                    let linear = LinearRgba::from(color);
                    [linear.red, linear.green, linear.blue, linear.alpha]
                })
                .collect(),
        ),
        _ => None,
    };

    match colors {
        Some(colors) => mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors),
        None => warn!("Backdrop mesh has no positions; falling back to a flat sky."),
    }

    commands.spawn((
        Name::new("Backdrop"),
        MaterialMesh2dBundle {
            mesh: Mesh2dHandle(meshes.add(mesh)),
            material: materials.add(ColorMaterial::from(Color::WHITE)),
            transform: Transform::from_xyz(0.0, 0.0, -10.0),
            ..default()
        },
    ));
}

fn spawn_base_ground(mut commands: Commands, config: Res<LevelConfig>) {
    let ground = config.base_ground;
    commands.spawn((
        Name::new("BaseGround"),
        Solid,
        Collider::from_size(ground.size()),
        SpriteBundle {
            sprite: Sprite {
                color: PLATFORM_FILL,
                custom_size: Some(ground.size()),
                ..default()
            },
            transform: Transform::from_translation(config.to_world(ground.center()).extend(0.0)),
            ..default()
        },
    ));
}

pub fn despawn_level(mut commands: Commands, query: Query<Entity, With<LevelEntity>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

pub fn spawn_level(
    mut commands: Commands,
    config: Res<LevelConfig>,
    catalog: Res<LevelCatalog>,
    mut current: ResMut<CurrentLevel>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if catalog.is_empty() {
        warn!("Level catalog is empty; nothing to spawn.");
        return;
    }

    let layout = match catalog.get(current.number) {
        Some(layout) => layout,
        None => {
            warn!(
                "Level {} does not exist ({} available); restarting from level 1.",
                current.number,
                catalog.len()
            );
            current.number = 1;
            let Some(layout) = catalog.get(1) else {
                return;
            };
            layout
        }
    };

    for platform in layout.platforms {
        spawn_block(
            &mut commands,
            &config,
            *platform,
            (PLATFORM_FILL, PLATFORM_EDGE),
            (Name::new("Platform"), Solid),
        );
    }

    for path in layout.moving_platforms {
        let size = Vec2::new(path.width, MOVING_PLATFORM_HEIGHT);
        let start = config.to_world(Vec2::new(path.start_x, path.y));
        let end_x = config.to_world(Vec2::new(path.end_x, path.y)).x;
        commands.spawn((
            LevelEntity,
            Name::new("MovingPlatform"),
            Solid,
            MovingPlatform {
                start_x: start.x,
                end_x,
                speed: path.speed,
            },
            Velocity(Vec2::new(path.speed, 0.0)),
            Collider::from_size(size),
            Outline::rect(PLATFORM_FILL, size),
            SpriteBundle {
                sprite: Sprite {
                    color: MOVING_FILL,
                    custom_size: Some(size),
                    ..default()
                },
                transform: Transform::from_translation(start.extend(0.0)),
                ..default()
            },
        ));
    }

    for lava in layout.lava {
        spawn_block(
            &mut commands,
            &config,
            *lava,
            (LAVA_FILL, LAVA_EDGE),
            (Name::new("Lava"), Hazard::Lava),
        );
    }

    let spike_mesh = Mesh2dHandle(meshes.add(Triangle2d::new(
        SPIKE_POINTS[0],
        SPIKE_POINTS[1],
        SPIKE_POINTS[2],
    )));
    let spike_material = materials.add(ColorMaterial::from(SPIKE_FILL));
    for spike in layout.spikes {
        let hitbox = LevelLayout::spike_box(*spike);
        commands.spawn((
            LevelEntity,
            Name::new("Spike"),
            Hazard::Spike,
            Collider::from_size(SPIKE_HITBOX),
            Outline::triangle(SPIKE_EDGE, SPIKE_POINTS),
            MaterialMesh2dBundle {
                mesh: spike_mesh.clone(),
                material: spike_material.clone(),
                transform: Transform::from_translation(config.to_world(hitbox.center).extend(1.0)),
                ..default()
            },
        ));
    }

    let coin_mesh = Mesh2dHandle(meshes.add(Circle::new(COIN_RADIUS)));
    let coin_material = materials.add(ColorMaterial::from(COIN_FILL));
    for coin in layout.coins {
        commands.spawn((
            LevelEntity,
            Name::new("Coin"),
            Coin,
            Collider::from_size(Vec2::splat(COIN_RADIUS * 2.0)),
            MaterialMesh2dBundle {
                mesh: coin_mesh.clone(),
                material: coin_material.clone(),
                transform: Transform::from_translation(config.to_world(*coin).extend(0.5)),
                ..default()
            },
        ));
    }

    spawn_flag(&mut commands, &config, layout, &mut meshes, &mut materials);

    info!(
        "Spawned level {} '{}': {} platforms, {} moving, {} spikes, {} coins",
        current.number,
        layout.name,
        layout.platforms.len(),
        layout.moving_platforms.len(),
        layout.spikes.len(),
        layout.coin_count()
    );
}

fn spawn_block(
    commands: &mut Commands,
    config: &LevelConfig,
    block: Block,
    (fill, edge): (Color, Color),
    extra: impl Bundle,
) {
    commands.spawn((
        LevelEntity,
        extra,
        Collider::from_size(block.size()),
        Outline::rect(edge, block.size()),
        SpriteBundle {
            sprite: Sprite {
                color: fill,
                custom_size: Some(block.size()),
                ..default()
            },
            transform: Transform::from_translation(config.to_world(block.center()).extend(0.0)),
            ..default()
        },
    ));
}

/// The finish trigger is invisible; the pole and pennant are purely decorative children.
fn spawn_flag(
    commands: &mut Commands,
    config: &LevelConfig,
    layout: &LevelLayout,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
) {
    let zone = layout.finish_zone();
    let foot = config.to_world(layout.finish);
    let zone_center = config.to_world(zone.center);

    commands
        .spawn((
            LevelEntity,
            Name::new("Finish"),
            FinishZone,
            Collider::from_size(FINISH_SIZE),
            SpatialBundle::from_transform(Transform::from_translation(zone_center.extend(0.2))),
        ))
        .with_children(|parent| {
            let offset = foot - zone_center;
            parent.spawn(SpriteBundle {
                sprite: Sprite {
                    color: FLAG_POLE,
                    custom_size: Some(Vec2::new(4.0, FINISH_SIZE.y)),
                    ..default()
                },
                transform: Transform::from_xyz(offset.x, offset.y + FINISH_SIZE.y * 0.5, 0.0),
                ..default()
            });
            parent.spawn((
                Outline::triangle(FLAG_EDGE, PENNANT_POINTS),
                MaterialMesh2dBundle {
                    mesh: Mesh2dHandle(meshes.add(Triangle2d::new(
                        PENNANT_POINTS[0],
                        PENNANT_POINTS[1],
                        PENNANT_POINTS[2],
                    ))),
                    material: materials.add(ColorMaterial::from(FLAG_FILL)),
                    transform: Transform::from_xyz(offset.x, offset.y, 0.1),
                    ..default()
                },
            ));
        });
}

fn finish_loading(current: Res<CurrentLevel>, mut next_state: ResMut<NextState<GameState>>) {
    debug!("Level {} loaded; resuming play", current.number);
    next_state.set(GameState::Playing);
}
