//! HUD, pause menu and victory screen.
//!
//! UI entities are part of Bevy's ECS; once despawned, all associated style/text components are
//! dropped automatically.

use bevy::prelude::*;

use crate::level::CurrentLevel;
use crate::progress::{victory_remaining, Score, VictoryTimer};
use crate::state::GameState;

const HUD_TEXT: Color = Color::WHITE;
/// Dark panel behind each HUD line; white text alone washes out against the pale sky.
const HUD_BACKING: Color = Color::srgba(0.0, 0.0, 0.0, 0.55);
const CONTROLS_HINT: &str = "ARROWS to Move  |  SPACE to Jump  |  ESC to Pause";

/// Registers the HUD plus the pause and victory overlays.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(Update, (update_level_text, update_coin_text))
            .add_systems(OnEnter(GameState::Paused), spawn_pause_menu)
            .add_systems(OnExit(GameState::Paused), despawn_overlay::<PauseMenu>)
            .add_systems(OnEnter(GameState::Victory), spawn_victory_screen)
            .add_systems(
                Update,
                update_victory_countdown.run_if(in_state(GameState::Victory)),
            )
            .add_systems(OnExit(GameState::Victory), despawn_overlay::<VictoryScreen>);
    }
}

#[derive(Component)]
struct LevelText;

#[derive(Component)]
struct CoinText;

#[derive(Component)]
struct PauseMenu;

#[derive(Component)]
struct VictoryScreen;

#[derive(Component)]
struct VictoryCountdown;

pub fn level_label(number: usize) -> String {
    format!("LEVEL {number}")
}

pub fn coin_label(coins: u32) -> String {
    format!("COINS: {coins}")
}

fn hud_text(value: String, font_size: f32, top: f32) -> TextBundle {
    TextBundle::from_section(
        value,
        TextStyle {
            font_size,
            color: HUD_TEXT,
            ..default()
        },
    )
    .with_style(Style {
        position_type: PositionType::Absolute,
        left: Val::Px(16.0),
        top: Val::Px(top),
        padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
        ..default()
    })
    .with_background_color(HUD_BACKING)
}

fn spawn_hud(mut commands: Commands, current: Res<CurrentLevel>, score: Res<Score>) {
    commands.spawn((
        Name::new("LevelText"),
        LevelText,
        hud_text(level_label(current.number), 32.0, 12.0),
    ));
    commands.spawn((
        Name::new("ControlsHint"),
        hud_text(CONTROLS_HINT.to_owned(), 18.0, 62.0),
    ));
    commands.spawn((
        Name::new("CoinText"),
        CoinText,
        hud_text(coin_label(score.coins), 24.0, 96.0),
    ));
}

fn update_level_text(current: Res<CurrentLevel>, mut query: Query<&mut Text, With<LevelText>>) {
    if !current.is_changed() {
        return;
    }
    for mut text in &mut query {
        text.sections[0].value = level_label(current.number);
    }
}

fn update_coin_text(score: Res<Score>, mut query: Query<&mut Text, With<CoinText>>) {
    if !score.is_changed() {
        return;
    }
    for mut text in &mut query {
        text.sections[0].value = coin_label(score.coins);
    }
}

fn overlay_node(alpha: f32) -> NodeBundle {
    NodeBundle {
        background_color: BackgroundColor(Color::srgba(0.0, 0.0, 0.0, alpha)),
        style: Style {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            ..default()
        },
        z_index: ZIndex::Global(10),
        ..default()
    }
}

fn spawn_pause_menu(mut commands: Commands) {
    commands
        .spawn((PauseMenu, Name::new("PauseMenu"), overlay_node(0.6)))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "Paused\nPress ESC to resume",
                TextStyle {
                    font_size: 36.0,
                    color: Color::srgba(0.9, 0.9, 0.9, 1.0),
                    ..default()
                },
            ));
        });
}

fn spawn_victory_screen(mut commands: Commands, score: Res<Score>, timer: Res<VictoryTimer>) {
    commands
        .spawn((VictoryScreen, Name::new("VictoryScreen"), overlay_node(0.5)))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "YOU WIN!",
                TextStyle {
                    font_size: 60.0,
                    color: HUD_TEXT,
                    ..default()
                },
            ));
            parent.spawn(TextBundle::from_section(
                format!("Coins collected: {}", score.coins),
                TextStyle {
                    font_size: 28.0,
                    color: HUD_TEXT,
                    ..default()
                },
            ));
            parent.spawn((
                VictoryCountdown,
                TextBundle::from_section(
                    countdown_label(victory_remaining(&timer).as_secs_f32()),
                    TextStyle {
                        font_size: 20.0,
                        color: HUD_TEXT,
                        ..default()
                    },
                ),
            ));
        });
}

fn countdown_label(seconds: f32) -> String {
    format!("Restarting in {}...", seconds.ceil().max(0.0) as u32)
}

fn update_victory_countdown(
    timer: Res<VictoryTimer>,
    mut query: Query<&mut Text, With<VictoryCountdown>>,
) {
    for mut text in &mut query {
        text.sections[0].value = countdown_label(victory_remaining(&timer).as_secs_f32());
    }
}

fn despawn_overlay<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
