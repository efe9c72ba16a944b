//! Sound effects. Handles are loaded once and kept in `AudioHandles`; clips play on gameplay events.
//!
//! Bevy's asset system reference-counts handles, so keeping them in a resource keeps the decoded
//! audio alive. A clip that failed to load (for example a missing file) is skipped silently.

use bevy::prelude::*;

use crate::collision::TriggerEvent;
use crate::movement::PlayerJumped;
use crate::state::GameSet;

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AudioHandles>()
            .add_systems(Startup, load_audio_handles)
            .add_systems(Update, play_sound_effects.after(GameSet::Collision));
    }
}

#[derive(Resource, Default)]
pub struct AudioHandles {
    pub jump: Option<Handle<AudioSource>>,
    pub coin: Option<Handle<AudioSource>>,
    pub hazard: Option<Handle<AudioSource>>,
    pub finish: Option<Handle<AudioSource>>,
}

fn load_audio_handles(asset_server: Res<AssetServer>, mut handles: ResMut<AudioHandles>) {
    handles.jump = Some(asset_server.load("audio/jump.ogg"));
    handles.coin = Some(asset_server.load("audio/coin.ogg"));
    handles.hazard = Some(asset_server.load("audio/hazard.ogg"));
    handles.finish = Some(asset_server.load("audio/finish.ogg"));

    info!("Queued sound effects from assets/audio/; missing clips stay silent.");
}

fn play_sound_effects(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    handles: Res<AudioHandles>,
    mut jumps: EventReader<PlayerJumped>,
    mut triggers: EventReader<TriggerEvent>,
) {
    let mut clips: Vec<&Option<Handle<AudioSource>>> = Vec::new();

    if jumps.read().count() > 0 {
        clips.push(&handles.jump);
    }

    for trigger in triggers.read() {
        clips.push(match trigger {
            TriggerEvent::Hazard(_) => &handles.hazard,
            TriggerEvent::Coin(_) => &handles.coin,
            TriggerEvent::Finish => &handles.finish,
            TriggerEvent::FellOut => continue,
        });
    }

    for handle in clips.into_iter().flatten() {
        if !asset_server.is_loaded_with_dependencies(handle.id()) {
            continue;
        }
        commands.spawn(AudioBundle {
            source: handle.clone(),
            settings: PlaybackSettings::DESPAWN,
        });
    }
}
