//! Frame composition from a game snapshot
//!
//! Produces a flat list of 2D primitives in screen pixels. Presenters only
//! translate these into draw calls, so everything visual can be checked
//! without a browser.

use glam::Vec2;

use crate::economy::{CatalogEntry, CatalogKind, ItemStatus, Palette, Rgb, neon};
use crate::game::Snapshot;
use crate::layout::{Layout, ROAD_MARK_PERIOD};
use crate::sim::{Entity, EntityKind, Player, PowerUpKind, RunState};

/// Length of one lane marking dash
const DASH_LENGTH: f32 = 24.0;
const DASH_WIDTH: f32 = 3.0;
const EDGE_WIDTH: f32 = 3.0;
const SHIELD_RADIUS: f32 = 45.0;
const GARAGE_PREVIEW_Y: f32 = 260.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A single drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Cover the whole viewport
    Fill { color: Rgb, alpha: f32 },
    Rect {
        min: Vec2,
        size: Vec2,
        fill: Rgb,
        stroke: Option<Rgb>,
        glow: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
        alpha: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgb,
        width: f32,
    },
    /// Closed outline, filled and stroked
    Polygon {
        points: Vec<Vec2>,
        fill: Rgb,
        stroke: Rgb,
        glow: f32,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        bold: bool,
        color: Rgb,
        align: TextAlign,
    },
}

impl Shape {
    fn text(pos: Vec2, text: impl Into<String>, size: f32, color: Rgb, align: TextAlign) -> Self {
        Shape::Text {
            pos,
            text: text.into(),
            size,
            bold: false,
            color,
            align,
        }
    }

    fn bold_text(pos: Vec2, text: impl Into<String>, size: f32, color: Rgb) -> Self {
        Shape::Text {
            pos,
            text: text.into(),
            size,
            bold: true,
            color,
            align: TextAlign::Center,
        }
    }
}

/// What the garage screen shows for the item under the cursor
#[derive(Debug, Clone, Copy)]
pub struct GarageView<'a> {
    pub tab: CatalogKind,
    pub entry: &'a CatalogEntry,
    pub status: ItemStatus,
}

/// Compose a full frame. `garage` replaces the run screens while open.
pub fn frame(snapshot: &Snapshot, time_ms: f64, garage: Option<&GarageView>) -> Vec<Shape> {
    let layout = snapshot.layout;
    let mut shapes = Vec::with_capacity(64);

    shapes.push(Shape::Fill {
        color: neon::BLACK,
        alpha: 1.0,
    });
    road(&mut shapes, layout, snapshot.road_offset);

    if let Some(view) = garage {
        garage_screen(&mut shapes, snapshot, view, time_ms);
        return shapes;
    }

    let colors = snapshot.palette.colors_at(time_ms);
    match snapshot.phase {
        RunState::Menu => menu(&mut shapes, snapshot),
        RunState::Playing => {
            game_objects(&mut shapes, snapshot, colors);
            hud(&mut shapes, snapshot);
        }
        RunState::Paused => {
            game_objects(&mut shapes, snapshot, colors);
            hud(&mut shapes, snapshot);
            paused(&mut shapes, layout);
        }
        RunState::GameOver => {
            game_objects(&mut shapes, snapshot, colors);
            game_over(&mut shapes, snapshot);
        }
    }
    shapes
}

/// Road surface, pink edges and scrolling lane markings
fn road(shapes: &mut Vec<Shape>, layout: &Layout, offset: f32) {
    let right = layout.road_left + layout.road_width;
    shapes.push(Shape::Rect {
        min: Vec2::new(layout.road_left, 0.0),
        size: Vec2::new(layout.road_width, layout.height),
        fill: neon::DARK_GRAY,
        stroke: None,
        glow: 0.0,
    });
    for x in [layout.road_left, right] {
        shapes.push(Shape::Line {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, layout.height),
            color: neon::PINK,
            width: EDGE_WIDTH,
        });
    }

    for divider in 1..layout.lane_count {
        let x = layout.road_left + layout.lane_width * divider as f32;
        let mut y = offset.rem_euclid(ROAD_MARK_PERIOD) - ROAD_MARK_PERIOD;
        while y < layout.height {
            shapes.push(Shape::Rect {
                min: Vec2::new(x - DASH_WIDTH / 2.0, y),
                size: Vec2::new(DASH_WIDTH, DASH_LENGTH),
                fill: neon::CYAN,
                stroke: None,
                glow: 0.0,
            });
            y += ROAD_MARK_PERIOD;
        }
    }
}

fn game_objects(shapes: &mut Vec<Shape>, snapshot: &Snapshot, colors: (Rgb, Rgb)) {
    for coin in snapshot.coins {
        pickup(shapes, coin, neon::YELLOW, "$");
    }
    for powerup in snapshot.powerups {
        match powerup.kind {
            EntityKind::PowerUp(PowerUpKind::Shield) => pickup(shapes, powerup, neon::GREEN, "S"),
            EntityKind::PowerUp(PowerUpKind::SlowMo) => pickup(shapes, powerup, neon::BLUE, "T"),
            _ => {}
        }
    }
    for obstacle in snapshot.obstacles {
        let size = obstacle.kind.visual_size();
        shapes.push(Shape::Rect {
            min: obstacle.pos - size / 2.0,
            size,
            fill: neon::DARK_GRAY,
            stroke: Some(neon::RED),
            glow: 10.0,
        });
    }
    for particle in snapshot.particles {
        shapes.push(Shape::Circle {
            center: particle.pos,
            radius: particle.size,
            fill: Some(neon::RED),
            stroke: None,
            alpha: particle.life.clamp(0.0, 1.0),
        });
    }
    vehicle(shapes, snapshot.vehicle, snapshot.player.pos(), 1.0, colors);
    shield_ring(shapes, snapshot.player);
}

fn pickup(shapes: &mut Vec<Shape>, entity: &Entity, color: Rgb, label: &str) {
    shapes.push(Shape::Circle {
        center: entity.pos,
        radius: entity.kind.visual_size().x / 2.0,
        fill: Some(color),
        stroke: None,
        alpha: 1.0,
    });
    shapes.push(Shape::text(
        entity.pos + Vec2::new(0.0, 4.0),
        label,
        12.0,
        neon::BLACK,
        TextAlign::Center,
    ));
}

fn shield_ring(shapes: &mut Vec<Shape>, player: &Player) {
    if player.shield_active() {
        shapes.push(Shape::Circle {
            center: player.pos(),
            radius: SHIELD_RADIUS,
            fill: None,
            stroke: Some(neon::GREEN),
            alpha: 1.0,
        });
    }
}

/// Body outline for a vehicle id, centered on the origin, nose up
pub fn vehicle_outline(id: &str) -> Vec<Vec2> {
    let pts: &[(f32, f32)] = match id {
        "sport" => &[
            (-18.0, 30.0),
            (-22.0, 0.0),
            (-15.0, -25.0),
            (0.0, -35.0),
            (15.0, -25.0),
            (22.0, 0.0),
            (18.0, 30.0),
        ],
        "suv" => &[(-20.0, -30.0), (20.0, -30.0), (20.0, 35.0), (-20.0, 35.0)],
        "moto" => &[
            (-10.0, 30.0),
            (-10.0, -25.0),
            (0.0, -35.0),
            (10.0, -25.0),
            (10.0, 30.0),
        ],
        "future" => &[(-20.0, 30.0), (0.0, -40.0), (20.0, 30.0)],
        // retro, and anything unknown
        _ => &[
            (-15.0, -30.0),
            (15.0, -30.0),
            (20.0, -25.0),
            (20.0, 25.0),
            (15.0, 30.0),
            (-15.0, 30.0),
            (-20.0, 25.0),
            (-20.0, -25.0),
        ],
    };
    pts.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
}

fn vehicle(
    shapes: &mut Vec<Shape>,
    id: &str,
    at: Vec2,
    scale: f32,
    (primary, secondary): (Rgb, Rgb),
) {
    shapes.push(Shape::Polygon {
        points: vehicle_outline(id)
            .into_iter()
            .map(|p| at + p * scale)
            .collect(),
        fill: neon::DARK_GRAY,
        stroke: primary,
        glow: 20.0,
    });
    // Accent light
    shapes.push(Shape::Circle {
        center: at,
        radius: 5.0 * scale,
        fill: Some(secondary),
        stroke: None,
        alpha: 1.0,
    });
}

fn hud(shapes: &mut Vec<Shape>, snapshot: &Snapshot) {
    let width = snapshot.layout.width;
    shapes.push(Shape::Text {
        pos: Vec2::new(20.0, 40.0),
        text: format!("Score: {}", snapshot.score),
        size: 24.0,
        bold: true,
        color: neon::CYAN,
        align: TextAlign::Left,
    });
    shapes.push(Shape::Text {
        pos: Vec2::new(width - 20.0, 40.0),
        text: format!("$ {}", snapshot.balance),
        size: 24.0,
        bold: true,
        color: neon::YELLOW,
        align: TextAlign::Right,
    });
}

fn menu(shapes: &mut Vec<Shape>, snapshot: &Snapshot) {
    let layout = snapshot.layout;
    let center = Vec2::new(layout.width / 2.0, layout.height / 2.0);

    shapes.push(Shape::bold_text(center + Vec2::new(0.0, -60.0), "NEON", 40.0, neon::PINK));
    shapes.push(Shape::bold_text(center + Vec2::new(0.0, -20.0), "DRIFT", 40.0, neon::CYAN));
    shapes.push(Shape::text(
        center + Vec2::new(0.0, 50.0),
        "Tap to start",
        20.0,
        neon::WHITE,
        TextAlign::Center,
    ));
    if snapshot.best_score > 0 {
        shapes.push(Shape::text(
            center + Vec2::new(0.0, 90.0),
            format!("Best: {}", snapshot.best_score),
            16.0,
            neon::YELLOW,
            TextAlign::Center,
        ));
    }
    shapes.push(Shape::text(
        Vec2::new(layout.width - 40.0, 50.0),
        "GARAGE",
        12.0,
        neon::WHITE,
        TextAlign::Center,
    ));
}

fn paused(shapes: &mut Vec<Shape>, layout: &Layout) {
    shapes.push(Shape::Fill {
        color: neon::BLACK,
        alpha: 0.6,
    });
    shapes.push(Shape::bold_text(
        Vec2::new(layout.width / 2.0, layout.height / 2.0),
        "PAUSED",
        40.0,
        neon::CYAN,
    ));
    shapes.push(Shape::text(
        Vec2::new(layout.width / 2.0, layout.height / 2.0 + 50.0),
        "Tap to resume",
        20.0,
        neon::WHITE,
        TextAlign::Center,
    ));
}

fn game_over(shapes: &mut Vec<Shape>, snapshot: &Snapshot) {
    let layout = snapshot.layout;
    let center = Vec2::new(layout.width / 2.0, layout.height / 2.0);

    shapes.push(Shape::Fill {
        color: neon::BLACK,
        alpha: 0.8,
    });
    shapes.push(Shape::bold_text(center + Vec2::new(0.0, -50.0), "GAME OVER", 40.0, neon::RED));
    shapes.push(Shape::text(
        center,
        format!("Score: {}", snapshot.score),
        24.0,
        neon::CYAN,
        TextAlign::Center,
    ));
    shapes.push(Shape::text(
        center + Vec2::new(0.0, 40.0),
        format!("Total coins: {}", snapshot.balance),
        24.0,
        neon::YELLOW,
        TextAlign::Center,
    ));
    if let Some(run) = snapshot.last_run {
        let line = if run.new_best {
            format!("+{} coins  NEW BEST!", run.coins_earned)
        } else {
            format!("+{} coins", run.coins_earned)
        };
        shapes.push(Shape::text(
            center + Vec2::new(0.0, 70.0),
            line,
            16.0,
            neon::GREEN,
            TextAlign::Center,
        ));
    }
    shapes.push(Shape::text(
        center + Vec2::new(0.0, 100.0),
        "Play again",
        18.0,
        neon::WHITE,
        TextAlign::Center,
    ));
}

/// Button fill for each garage status
pub fn status_color(status: ItemStatus) -> Rgb {
    match status {
        ItemStatus::Selected => neon::GREEN,
        ItemStatus::Owned => neon::BLUE,
        ItemStatus::Affordable => neon::YELLOW,
        ItemStatus::TooExpensive => neon::RED,
    }
}

fn garage_screen(shapes: &mut Vec<Shape>, snapshot: &Snapshot, view: &GarageView, time_ms: f64) {
    let layout = snapshot.layout;
    let (w, h) = (layout.width, layout.height);
    let cx = w / 2.0;

    shapes.push(Shape::Fill {
        color: neon::BLACK,
        alpha: 1.0,
    });
    shapes.push(Shape::bold_text(Vec2::new(cx, 50.0), "GARAGE", 30.0, neon::YELLOW));
    shapes.push(Shape::text(
        Vec2::new(cx, 80.0),
        format!("$ {}", snapshot.balance),
        20.0,
        neon::YELLOW,
        TextAlign::Center,
    ));

    for (kind, label, x) in [
        (CatalogKind::Vehicle, "VEHICLES", cx - 80.0),
        (CatalogKind::Color, "COLORS", cx + 80.0),
    ] {
        let color = if view.tab == kind {
            neon::CYAN
        } else {
            neon::DARK_GRAY
        };
        shapes.push(Shape::text(Vec2::new(x, 120.0), label, 20.0, color, TextAlign::Center));
    }

    let entry = view.entry;
    shapes.push(Shape::bold_text(
        Vec2::new(cx, 180.0),
        entry.display_name.to_uppercase(),
        24.0,
        neon::WHITE,
    ));

    let preview = Vec2::new(cx, GARAGE_PREVIEW_Y);
    match view.tab {
        CatalogKind::Vehicle => {
            let colors = snapshot.palette.colors_at(time_ms);
            vehicle(shapes, &entry.id, preview, 1.5, colors);
        }
        CatalogKind::Color => {
            let palette = entry.palette.unwrap_or(Palette::CyclingHue);
            let (primary, _) = palette.colors_at(time_ms);
            shapes.push(Shape::Circle {
                center: preview,
                radius: 40.0,
                fill: Some(primary),
                stroke: None,
                alpha: 1.0,
            });
        }
    }

    if !entry.description.is_empty() {
        shapes.push(Shape::text(
            Vec2::new(cx, 350.0),
            entry.description.clone(),
            16.0,
            neon::CYAN,
            TextAlign::Center,
        ));
    }

    shapes.push(Shape::Rect {
        min: Vec2::new(cx - 100.0, h - 150.0),
        size: Vec2::new(200.0, 50.0),
        fill: status_color(view.status),
        stroke: None,
        glow: 0.0,
    });
    shapes.push(Shape::bold_text(
        Vec2::new(cx, h - 118.0),
        view.status.label(entry.price),
        20.0,
        neon::BLACK,
    ));

    let arrow_y = h / 2.0 + 50.0;
    shapes.push(Shape::text(
        Vec2::new(40.0, arrow_y),
        "<",
        40.0,
        neon::WHITE,
        TextAlign::Center,
    ));
    shapes.push(Shape::text(
        Vec2::new(w - 40.0, arrow_y),
        ">",
        40.0,
        neon::WHITE,
        TextAlign::Center,
    ));
    shapes.push(Shape::text(
        Vec2::new(30.0, 40.0),
        "BACK",
        14.0,
        neon::WHITE,
        TextAlign::Center,
    ));
}
