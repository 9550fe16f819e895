//! Headless App Builder
//!
//! Provides a reusable builder for creating headless Bevy apps for simulation.
//! Used by simulation runner, scenario testing, and parallel execution.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use std::time::Duration;

use crate::arena::Boundary;
use crate::constants::DEFAULT_BALL_SPEED;
use crate::events::EventBus;
use crate::input::apply_controls;
use crate::session::{BounceSession, ControlAction, emit_wall_hits};

use super::metrics::RunMetrics;

/// Frame rate headless apps pretend to run at
const HEADLESS_FPS: f32 = 60.0;

/// Nominal frame rate of a headless app; event timestamps derive from it
#[derive(Resource, Debug, Clone, Copy)]
pub struct HeadlessClock {
    pub fps: f32,
}

/// Builder for creating headless Bevy apps
pub struct HeadlessAppBuilder {
    session: Option<BounceSession>,
    minimal_threads: bool,
    record_events: bool,
}

impl Default for HeadlessAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessAppBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            session: None,
            minimal_threads: false,
            record_events: true,
        }
    }

    /// Start from this session instead of the default seeded one
    pub fn with_session(mut self, session: BounceSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Enable minimal thread mode (task pools = 1)
    ///
    /// Use this when running many apps in parallel to avoid hitting OS thread limits.
    pub fn with_minimal_threads(mut self) -> Self {
        self.minimal_threads = true;
        self
    }

    /// Drop bus events instead of queueing them
    pub fn without_events(mut self) -> Self {
        self.record_events = false;
        self
    }

    /// Build the app with minimal plugins, the session and the step systems
    ///
    /// The returned app has:
    /// - MinimalPlugins with ScheduleRunnerPlugin
    /// - BounceSession, EventBus, RunMetrics and HeadlessClock resources
    /// - ControlAction messages applied before each step
    ///
    /// Callers drive it with `app.update()`, one call per frame.
    pub fn build(self) -> App {
        let mut app = App::new();

        let runner = ScheduleRunnerPlugin::run_loop(Duration::from_secs_f32(1.0 / HEADLESS_FPS));
        if self.minimal_threads {
            app.add_plugins(MinimalPlugins.set(runner).set(TaskPoolPlugin {
                task_pool_options: TaskPoolOptions::with_num_threads(1),
            }));
        } else {
            app.add_plugins(MinimalPlugins.set(runner));
        }

        let session = self.session.unwrap_or_else(|| {
            BounceSession::with_seed(
                Boundary::new(Vec2::new(400.0, 300.0), 300.0),
                DEFAULT_BALL_SPEED,
                0,
            )
        });

        app.insert_resource(session);
        app.insert_resource(if self.record_events {
            EventBus::new()
        } else {
            EventBus::disabled()
        });
        app.insert_resource(RunMetrics::new());
        app.insert_resource(HeadlessClock { fps: HEADLESS_FPS });
        app.add_message::<ControlAction>();

        app.add_systems(Update, (apply_controls, headless_step).chain());

        app
    }
}

/// Step once, stamp events with frame time, and fold the step into RunMetrics
pub fn headless_step(
    mut session: ResMut<BounceSession>,
    mut bus: ResMut<EventBus>,
    mut metrics: ResMut<RunMetrics>,
    clock: Res<HeadlessClock>,
) {
    bus.update_time(session.frame as f32 / clock.fps);
    let hits_before = session.hit_count;
    let report = session.step();
    emit_wall_hits(&mut bus, &report, session.frame, hits_before);
    metrics.observe(&session, &report);
}
