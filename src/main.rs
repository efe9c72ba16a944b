//! Application entry point: composes the Bevy runtime, core plugins, and window configuration,
//! then defers to `StickmanPlatformerPlugin` defined in `app.rs`.

mod app;
mod audio;
mod camera;
mod collision;
mod draw;
mod level;
mod levels;
mod movement;
mod player;
mod progress;
mod state;
mod ui;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod wasm;

use app::StickmanPlatformerPlugin;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::window::{Window, WindowResizeConstraints, WindowResolution};

fn main() {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    wasm::set_panic_hook();

    // Level layouts are authored against a 1280x700 canvas. The camera scales the projection so the
    // whole canvas stays visible when the window is resized.
    let primary_window = Window {
        title: "Stickman Platformer".to_string(),
        resolution: WindowResolution::new(1280.0, 700.0),
        resizable: true,
        resize_constraints: WindowResizeConstraints {
            min_width: 640.0,
            min_height: 350.0,
            max_width: f32::INFINITY,
            max_height: f32::INFINITY,
        },
        canvas: cfg!(all(target_arch = "wasm32", feature = "web"))
            .then(|| "#bevy-canvas".to_owned()),
        fit_canvas_to_parent: cfg!(all(target_arch = "wasm32", feature = "web")),
        ..default()
    };

    let default_plugins = DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(primary_window),
            ..default()
        })
        .set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(cfg!(not(target_arch = "wasm32"))),
            ..default()
        });

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.529, 0.808, 0.922)))
        .add_plugins(default_plugins)
        .add_plugins(StickmanPlatformerPlugin)
        .run();
}
