//! ringbounce - balls bouncing inside a circle, each wall hit adds a ball
//!
//! Main entry point: app setup and system registration.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResolution};
use ringbounce::constants::*;
use ringbounce::{
    BounceSession, Boundary, ControlAction, EventBus, EventLogConfig, EventLogger, FpsCounter,
    InitSettings, events, input, render, session, snapshot, ui,
};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let settings = InitSettings::load().apply_args(&args);

    let Some(boundary) = Boundary::from_viewport(settings.window_width, settings.window_height)
    else {
        eprintln!(
            "Invalid window size {}x{}",
            settings.window_width, settings.window_height
        );
        return;
    };

    let bus = if settings.event_logging {
        EventBus::new()
    } else {
        EventBus::disabled()
    };
    let logger = EventLogger::new(EventLogConfig {
        enabled: settings.event_logging,
        ..default()
    });

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                resolution: WindowResolution::new(
                    settings.window_width as u32,
                    settings.window_height as u32,
                ),
                title: settings.caption.clone(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(BounceSession::new(boundary, settings.initial_speed))
        .insert_resource(bus)
        .insert_resource(logger)
        .insert_resource(settings)
        .init_resource::<FpsCounter>()
        .add_message::<ControlAction>()
        .add_systems(
            Startup,
            (setup, render::setup_ball_meshes, start_event_log, fit_to_window).chain(),
        )
        // One pass per frame: controls, step, log, draw, HUD
        .add_systems(
            Update,
            (
                events::update_event_bus_time,
                input::keyboard_controls,
                ui::button_controls,
                input::window_resize_controls,
                input::apply_controls,
                session::advance_session,
                events::write_bus_events,
                render::sync_ball_visuals,
                render::draw_boundary_and_trails,
                ui::count_frames,
                ui::update_hit_count_text,
                ui::update_fps_text,
                ui::update_pause_label,
                snapshot::manual_snapshot,
            )
                .chain(),
        )
        .run();
}

/// Camera, HUD and buttons
fn setup(mut commands: Commands, settings: Res<InitSettings>) {
    commands.spawn(Camera2d);
    ui::spawn_hud(&mut commands, &settings.caption, settings.show_fps);
    ui::spawn_control_buttons(&mut commands);
}

/// The window may not get the requested size (scale factor, tiling WMs);
/// start from the size it actually has. The log's config line keeps the
/// requested size and the RZ/RS pair after it records the refit.
fn fit_to_window(
    window: Single<&Window, With<PrimaryWindow>>,
    mut session: ResMut<BounceSession>,
    mut bus: ResMut<EventBus>,
) {
    let (width, height) = (window.width(), window.height());
    if input::fit_session_to_viewport(&mut session, &mut bus, width, height) {
        info!("Fitted boundary to {}x{} window", width, height);
    }
}

fn start_event_log(mut logger: ResMut<EventLogger>, session: Res<BounceSession>) {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    logger.start_session(&timestamp);
    logger.log_config(session.config_snapshot());
}
