//! Drawing - boundary ring and trails via gizmos, balls as circle meshes
//!
//! The session works in canvas space (origin top-left, +y down); the 2D
//! camera is centered with +y up, so every point goes through
//! `canvas_to_world` first.

use bevy::prelude::*;

use crate::ball::BallVisual;
use crate::constants::*;
use crate::session::BounceSession;

/// Shared mesh and material for every ball
#[derive(Resource, Clone)]
pub struct BallMeshHandles {
    pub mesh: Handle<Mesh>,
    pub material: Handle<ColorMaterial>,
}

/// Map a canvas point into world space for a viewport of `viewport` size
pub fn canvas_to_world(point: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(point.x - viewport.x / 2.0, viewport.y / 2.0 - point.y)
}

pub fn setup_ball_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.insert_resource(BallMeshHandles {
        mesh: meshes.add(Circle::new(BALL_RADIUS)),
        material: materials.add(BALL_COLOR),
    });
}

/// Boundary circle plus one line strip per trail
pub fn draw_boundary_and_trails(session: Res<BounceSession>, mut gizmos: Gizmos) {
    let viewport = session.boundary.viewport();
    gizmos.circle_2d(
        canvas_to_world(session.boundary.center, viewport),
        session.boundary.radius,
        BOUNDARY_COLOR,
    );

    for ball in &session.balls {
        if ball.trail.len() < 2 {
            continue;
        }
        gizmos.linestrip_2d(
            ball.trail.iter().map(|&p| canvas_to_world(p, viewport)),
            TRAIL_COLOR,
        );
    }
}

/// Keep one mesh entity per ball, indexed by population order
pub fn sync_ball_visuals(
    mut commands: Commands,
    session: Res<BounceSession>,
    handles: Res<BallMeshHandles>,
    mut visuals: Query<(Entity, &BallVisual, &mut Transform)>,
) {
    let viewport = session.boundary.viewport();
    let population = session.balls.len();
    let mut drawn = 0;

    for (entity, visual, mut transform) in &mut visuals {
        match session.balls.get(visual.0) {
            Some(ball) => {
                transform.translation = canvas_to_world(ball.position, viewport).extend(BALL_Z);
                drawn = drawn.max(visual.0 + 1);
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for index in drawn..population {
        let world = canvas_to_world(session.balls[index].position, viewport);
        commands.spawn((
            Mesh2d(handles.mesh.clone()),
            MeshMaterial2d(handles.material.clone()),
            Transform::from_translation(world.extend(BALL_Z)),
            BallVisual(index),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_to_world_flips_y() {
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(canvas_to_world(Vec2::new(400.0, 300.0), viewport), Vec2::ZERO);
        assert_eq!(
            canvas_to_world(Vec2::ZERO, viewport),
            Vec2::new(-400.0, 300.0)
        );
        assert_eq!(
            canvas_to_world(Vec2::new(800.0, 600.0), viewport),
            Vec2::new(400.0, -300.0)
        );
    }
}
