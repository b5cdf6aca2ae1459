//! Bevy viewer for a shelf of marble jars.
//!
//! Bevy's `Update` schedule is the tick source: every frame ticks the shelf
//! once, then jars and marbles are drawn with gizmos straight from the
//! simulation state. Canvas coordinates (y down) are mapped to world
//! coordinates (y up), one jar next to the other.
//!
//! Keys: Space start/stop, D drop a marble, U undo the last marble (both on
//! the current user's jar).

use bevy::prelude::*;

use crate::simulation::geometry::JarGeometry;
use crate::simulation::scenario::Scenario;

#[derive(Component)]
struct OwnerLabel(String);

const JAR_GAP: f32 = 40.0; // horizontal space between jars
const OUTLINE_SEGMENTS: usize = 32;

pub fn run_2d(scenario: Scenario) {
    info!("run_2d: starting Bevy 2D viewer with {} jars", scenario.shelf.len());

    App::new()
        .insert_resource(scenario)
        // logging is set up by the binary
        .add_plugins(DefaultPlugins.build().disable::<bevy::log::LogPlugin>())
        .add_systems(Startup, setup_jars_system)
        .add_systems(Update, (input_system, physics_step_system, draw_system, label_system).chain())
        .run();
}

/// World-space offset of the `index`-th jar's canvas centre.
fn jar_offset(index: usize, count: usize, canvas: [f64; 2]) -> f32 {
    let w = canvas[0] as f32 + JAR_GAP;
    (index as f32 - 0.5 * (count as f32 - 1.0)) * w
}

/// Canvas point to world point for a jar drawn at `offset`.
fn to_world(x: f64, y: f64, offset: f32, canvas: [f64; 2]) -> Vec2 {
    Vec2::new(
        offset + x as f32 - 0.5 * canvas[0] as f32,
        0.5 * canvas[1] as f32 - y as f32,
    )
}

fn setup_jars_system(mut commands: Commands, scenario: Res<Scenario>) {
    // 2D camera
    commands.spawn(Camera2dBundle::default());

    let canvas = scenario.engine.canvas;
    let count = scenario.shelf.len();
    for (i, (owner, _)) in scenario.shelf.jars().enumerate() {
        let offset = jar_offset(i, count, canvas);
        let pos = to_world(0.5 * canvas[0], canvas[1] + 20.0, offset, canvas);

        commands.spawn((
            Text2dBundle {
                text: Text::from_section(
                    owner.to_string(),
                    TextStyle {
                        font_size: 18.0,
                        ..default()
                    },
                ),
                transform: Transform::from_xyz(pos.x, pos.y, 0.0),
                ..default()
            },
            OwnerLabel(owner.to_string()),
        ));
    }
}

fn input_system(keys: Res<ButtonInput<KeyCode>>, mut scenario: ResMut<Scenario>) {
    if keys.just_pressed(KeyCode::Space) {
        if scenario.shelf.is_running() {
            scenario.shelf.stop();
        } else {
            scenario.shelf.start();
        }
    }

    let Some(user) = scenario.shelf.current_user().map(str::to_string) else {
        return;
    };
    if keys.just_pressed(KeyCode::KeyD) {
        if let Err(e) = scenario.shelf.drop_now(&user) {
            warn!("drop failed: {e}");
        }
    }
    if keys.just_pressed(KeyCode::KeyU) {
        if let Some(left) = scenario.shelf.undo(&user) {
            info!("undo: {user} has {left} marbles");
        }
    }
}

fn physics_step_system(mut scenario: ResMut<Scenario>) {
    if let Err(e) = scenario.shelf.tick() {
        warn!("shelf tick failed: {e}");
    }
}

fn draw_system(scenario: Res<Scenario>, mut gizmos: Gizmos) {
    let canvas = scenario.engine.canvas;
    let count = scenario.shelf.len();

    for (i, (_, jar)) in scenario.shelf.jars().enumerate() {
        let offset = jar_offset(i, count, canvas);
        let sim = jar.sim();

        let outline = jar_outline(sim.jar());
        gizmos.linestrip_2d(
            outline.into_iter().map(|(x, y)| to_world(x, y, offset, canvas)),
            Color::srgb(0.8, 0.8, 0.85),
        );

        for body in sim.bodies() {
            let centre = to_world(body.x.x, body.x.y, offset, canvas);
            let r = body.radius as f32;
            let [cr, cg, cb] = body.color.to_unit();
            let [hr, hg, hb] = body.color.lighten(0.4).to_unit();

            gizmos.circle_2d(centre, r, Color::srgb(cr, cg, cb));
            gizmos.circle_2d(centre + Vec2::new(-0.25 * r, 0.25 * r), r / 3.0, Color::srgb(hr, hg, hb));
        }
    }
}

fn label_system(scenario: Res<Scenario>, mut labels: Query<(&OwnerLabel, &mut Text)>) {
    for (label, mut text) in &mut labels {
        let n = scenario.shelf.jar(&label.0).map_or(0, |j| j.target());
        text.sections[0].value = format!("{} ({n})", label.0);
    }
}

/// Collidable outline in canvas coordinates: left wall, bowl, right wall.
fn jar_outline(jar: &JarGeometry) -> Vec<(f64, f64)> {
    let cx = jar.center_x();
    let cs = jar.curve_start();
    let h = jar.curve_height();

    let bowl: Vec<(f64, f64)> = (0..=OUTLINE_SEGMENTS)
        .map(|k| {
            let y = cs + h * k as f64 / OUTLINE_SEGMENTS as f64;
            (jar.bowl_half_width(y), y)
        })
        .collect();

    let mut points = vec![(jar.left(), 0.0)];
    points.extend(bowl.iter().map(|&(w, y)| (cx - w, y)));
    points.extend(bowl.iter().rev().map(|&(w, y)| (cx + w, y)));
    points.push((jar.right(), 0.0));
    points
}
