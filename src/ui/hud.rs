//! HUD components and systems (hit count, fps, caption)

use bevy::prelude::*;

use crate::constants::*;
use crate::session::BounceSession;
use crate::ui::FpsCounter;

/// Hit count text component
#[derive(Component)]
pub struct HitCountText;

/// FPS text component
#[derive(Component)]
pub struct FpsText;

/// Fixed caption, bottom-left
#[derive(Component)]
pub struct CaptionText;

pub fn hit_count_label(session: &BounceSession) -> String {
    format!(
        "Hits: {}  |  Balls: {}  |  Speed: {}{}",
        session.hit_count,
        session.population(),
        session.speed,
        if session.paused { "  |  PAUSED" } else { "" }
    )
}

/// Spawn the three HUD texts as absolute UI nodes
pub fn spawn_hud(commands: &mut Commands, caption: &str, show_fps: bool) {
    commands.spawn((
        Text::new("Hits: 0"),
        TextFont {
            font_size: HUD_FONT_SIZE,
            ..default()
        },
        TextColor(TEXT_PRIMARY),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
        HitCountText,
    ));

    commands.spawn((
        Text::new("FPS: --"),
        TextFont {
            font_size: HUD_FONT_SIZE,
            ..default()
        },
        TextColor(TEXT_SECONDARY),
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
        if show_fps {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        },
        FpsText,
    ));

    commands.spawn((
        Text::new(caption),
        TextFont {
            font_size: CAPTION_FONT_SIZE,
            ..default()
        },
        TextLayout::new_with_justify(Justify::Left),
        TextColor(TEXT_PRIMARY),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            bottom: Val::Px(10.0),
            ..default()
        },
        CaptionText,
    ));
}

pub fn update_hit_count_text(
    session: Res<BounceSession>,
    mut text_query: Query<&mut Text, With<HitCountText>>,
) {
    if !session.is_changed() {
        return;
    }
    let Ok(mut text) = text_query.single_mut() else {
        return;
    };
    text.0 = hit_count_label(&session);
}

pub fn update_fps_text(
    counter: Res<FpsCounter>,
    mut text_query: Query<&mut Text, With<FpsText>>,
) {
    let Ok(mut text) = text_query.single_mut() else {
        return;
    };
    let label = format!("FPS: {}", counter.fps);
    if text.0 != label {
        text.0 = label;
    }
}
