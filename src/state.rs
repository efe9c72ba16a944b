//! Global game state definitions. States are stored by Bevy as a plain enum resource; switching
//! states updates the value and runs the on-enter/on-exit schedules.

use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

/// High-level state machine for the game loop.
///
/// `Loading` rebuilds the current level and immediately hands over to `Playing`. `Victory` freezes
/// the player until the restart timer elapses and sends the game back through `Loading`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Paused,
    Victory,
}

/// Named system sets to structure the Update schedule.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Movement,
    Collision,
    Effects,
}

/// Toggles between Playing and Paused when `ESC` is pressed.
pub fn toggle_pause(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }

    match state.get() {
        GameState::Playing => next_state.set(GameState::Paused),
        GameState::Paused => next_state.set(GameState::Playing),
        GameState::Loading | GameState::Victory => {}
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;

    fn app_in(state: GameState) -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .insert_state(state)
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(Update, toggle_pause);
        app
    }

    /// Presses and releases ESC across one frame, then lets the pending transition apply.
    fn tap_escape(app: &mut App) {
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Escape);
        app.update();

        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.release(KeyCode::Escape);
        keyboard.clear();
        app.update();
    }

    fn current(app: &App) -> GameState {
        *app.world().resource::<State<GameState>>().get()
    }

    #[test]
    fn escape_pauses_and_resumes() {
        let mut app = app_in(GameState::Playing);
        app.update();

        tap_escape(&mut app);
        assert_eq!(current(&app), GameState::Paused);

        tap_escape(&mut app);
        assert_eq!(current(&app), GameState::Playing);
    }

    #[test]
    fn escape_is_ignored_during_victory() {
        let mut app = app_in(GameState::Victory);
        app.update();

        tap_escape(&mut app);
        assert_eq!(current(&app), GameState::Victory);
    }
}
