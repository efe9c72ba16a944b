//! Reactions to triggers: hazards send the player back to the spawn point, coins add to the score,
//! and the finish flag advances to the next level or, after the last one, to the victory screen.

use std::time::Duration;

use bevy::prelude::*;

use crate::camera::{CameraShake, EffectSettings, ScreenFlash};
use crate::collision::TriggerEvent;
use crate::level::{CurrentLevel, LevelCatalog, LevelConfig};
use crate::movement::{MovementState, Velocity};
use crate::player::{respawn, Player};
use crate::state::{GameSet, GameState};

pub struct ProgressPlugin;

impl Plugin for ProgressPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Score>()
            .init_resource::<VictoryTimer>()
            .add_systems(
                Update,
                handle_triggers
                    .in_set(GameSet::Effects)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnEnter(GameState::Victory), start_victory)
            .add_systems(
                Update,
                restart_after_victory.run_if(in_state(GameState::Victory)),
            );
    }
}

#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub coins: u32,
}

/// How long the victory screen stays up before the game starts over.
#[derive(Resource, Debug)]
pub struct VictoryTimer(pub Timer);

impl Default for VictoryTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(5.0, TimerMode::Once))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progression {
    NextLevel(usize),
    Victory,
}

/// What finishing level `current` leads to.
pub fn progression_after(current: usize, catalog: &LevelCatalog) -> Progression {
    if catalog.is_last(current) {
        Progression::Victory
    } else {
        Progression::NextLevel(current + 1)
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_triggers(
    mut commands: Commands,
    mut events: EventReader<TriggerEvent>,
    config: Res<LevelConfig>,
    catalog: Res<LevelCatalog>,
    effects: Res<EffectSettings>,
    mut current: ResMut<CurrentLevel>,
    mut score: ResMut<Score>,
    mut shake: ResMut<CameraShake>,
    mut flash: ResMut<ScreenFlash>,
    mut next_state: ResMut<NextState<GameState>>,
    mut player_query: Query<(&mut Transform, &mut Velocity, &mut MovementState), With<Player>>,
) {
    let triggers: Vec<TriggerEvent> = events.read().copied().collect();

    for trigger in triggers {
        match trigger {
            TriggerEvent::Hazard(hazard) => {
                info!("Player hit {:?}; back to spawn", hazard);
                shake.start(effects.shake_duration, effects.shake_intensity);
                for (mut transform, mut velocity, mut state) in &mut player_query {
                    respawn(&config, &mut transform, &mut velocity, &mut state);
                }
            }
            TriggerEvent::FellOut => {
                debug!("Player fell out of the world");
                for (mut transform, mut velocity, mut state) in &mut player_query {
                    respawn(&config, &mut transform, &mut velocity, &mut state);
                }
            }
            TriggerEvent::Coin(coin) => {
                if let Some(mut entity) = commands.get_entity(coin) {
                    entity.despawn();
                    score.coins += 1;
                    debug!("Coin collected; score is now {}", score.coins);
                }
            }
            TriggerEvent::Finish => {
                match progression_after(current.number, &catalog) {
                    Progression::NextLevel(number) => {
                        info!("Level {} complete; loading level {}", current.number, number);
                        current.number = number;
                        flash.start(effects.flash_duration);
                        next_state.set(GameState::Loading);
                    }
                    Progression::Victory => {
                        info!("Final level complete with {} coins", score.coins);
                        next_state.set(GameState::Victory);
                    }
                }
                // The level is being torn down; anything else queued this frame is stale.
                return;
            }
        }
    }
}

fn start_victory(mut timer: ResMut<VictoryTimer>) {
    timer.0.reset();
}

fn restart_after_victory(
    time: Res<Time>,
    mut timer: ResMut<VictoryTimer>,
    mut current: ResMut<CurrentLevel>,
    mut score: ResMut<Score>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }

    info!("Restarting from level 1");
    current.number = 1;
    *score = Score::default();
    next_state.set(GameState::Loading);
}

/// Remaining time on the victory screen, used by the overlay countdown.
pub fn victory_remaining(timer: &VictoryTimer) -> Duration {
    timer.0.remaining()
}
