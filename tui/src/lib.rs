//! TUI rendering for Venosim using ratatui.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────┬───────────────────────┐
//! │                              │  CLINICAL ANALYSIS    │
//! │   vessel canvas              │  (explanation panel)  │
//! │   (left leg reference,       ├───────────────────────┤
//! │    right leg simulation)     │  PROGRESSION CONTROLS │
//! │                              ├───────────────────────┤
//! │                              │  status               │
//! └──────────────────────────────┴───────────────────────┘
//! ```
//!
//! Rendering is one-directional: this crate reads the [`App`] and draws; it
//! never mutates simulation state (input handling lives in [`input`]).

mod input;
pub mod scene;
mod theme;

pub use input::{handle_events, handle_key};
pub use theme::{Palette, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Padding, Paragraph, Wrap,
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Points},
    },
};

use venosim_engine::{App, Stage};
use scene::{SCENE_HEIGHT, SCENE_WIDTH, Scene, Valve, Vessel};

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &App) {
    let palette = palette(app.high_contrast());

    let bg = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg, frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(frame.area());

    draw_vessels(frame, app, columns[0], &palette);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(9),    // Explanation
            Constraint::Length(8), // Controls
            Constraint::Length(3), // Status
        ])
        .split(columns[1]);

    draw_explanation(frame, app, right[0], &palette);
    draw_controls(frame, app, right[1], &palette);
    draw_status(frame, app, right[2], &palette);
}

// ============================================================================
// Vessel canvas
// ============================================================================

/// Scene space has y growing downward; the canvas grows upward.
fn flip(y: f64) -> f64 {
    SCENE_HEIGHT - y
}

fn draw_vessels(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let scene = Scene::build(
        app.stage(),
        app.clock_secs(),
        app.stage_elapsed_secs(),
        app.clot_travel_progress(),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .title(Span::styled(" VASCULAR VIEW ", styles::panel_title(palette)))
        .style(Style::default().bg(palette.bg_panel));

    let canvas = Canvas::default()
        .block(block)
        .x_bounds([0.0, SCENE_WIDTH])
        .y_bounds([0.0, SCENE_HEIGHT])
        .paint(|ctx| paint_scene(ctx, &scene, palette));

    frame.render_widget(canvas, area);
}

fn paint_scene(ctx: &mut Context, scene: &Scene, palette: &Palette) {
    paint_vessel(ctx, &scene.left_vessel, palette);
    paint_vessel(ctx, &scene.right_vessel, palette);

    ctx.layer();

    let flow: Vec<(f64, f64)> = scene
        .particles
        .iter()
        .filter(|p| !p.reflux)
        .map(|p| (p.pos.x, flip(p.pos.y)))
        .collect();
    let cell_color = if scene.right_vessel.diseased {
        palette.cell_slow
    } else {
        palette.cell
    };
    ctx.draw(&Points {
        coords: &flow,
        color: cell_color,
    });

    let reflux: Vec<(f64, f64)> = scene
        .particles
        .iter()
        .filter(|p| p.reflux)
        .map(|p| (p.pos.x, flip(p.pos.y)))
        .collect();
    if !reflux.is_empty() {
        ctx.draw(&Points {
            coords: &reflux,
            color: palette.valve_failed,
        });
    }

    if let Some(clot) = &scene.clot
        && let Some(color) = palette.clot_color(clot.opacity)
    {
        ctx.draw(&Circle {
            x: clot.pos.x,
            y: flip(clot.pos.y),
            radius: clot.radius,
            color,
        });
    }

    ctx.print(
        40.0,
        flip(60.0),
        Line::styled("LEFT LEG · REFERENCE", Style::default().fg(palette.text_muted)),
    );
    ctx.print(
        300.0,
        flip(60.0),
        Line::styled("RIGHT LEG · SIMULATION", Style::default().fg(palette.text_muted)),
    );
    let verdict = match scene.stage {
        Stage::Normal => "flow normal",
        Stage::Varicose => "venous hypertension / stasis",
        Stage::ThrombusFormed => "thrombus at lower valve",
        Stage::Detaching => "embolus in transit",
        Stage::PostEmbolism => "embolism occurred",
    };
    ctx.print(
        280.0,
        flip(640.0),
        Line::styled(
            verdict,
            Style::default().fg(if scene.stage.is_diseased() {
                palette.valve_failed
            } else {
                palette.healthy
            }),
        ),
    );
}

fn paint_vessel(ctx: &mut Context, vessel: &Vessel, palette: &Palette) {
    let (wall, lumen) = if vessel.diseased {
        (palette.diseased_dim, palette.diseased)
    } else {
        (palette.healthy_dim, palette.healthy)
    };

    for pair in vessel.centerline.windows(2) {
        // Walls: centerline offset sideways by the half width. The vessels
        // run mostly vertical, so a horizontal offset is a fair wall.
        for side in [-1.0, 1.0] {
            let off = side * vessel.half_width;
            ctx.draw(&CanvasLine {
                x1: pair[0].x + off,
                y1: flip(pair[0].y),
                x2: pair[1].x + off,
                y2: flip(pair[1].y),
                color: wall,
            });
        }
        ctx.draw(&CanvasLine {
            x1: pair[0].x,
            y1: flip(pair[0].y),
            x2: pair[1].x,
            y2: flip(pair[1].y),
            color: lumen,
        });
    }

    for valve in &vessel.valves {
        paint_valve(ctx, valve, palette);
    }
}

/// Healthy valves render as a closing chevron whose apex flutters with the
/// pulse; failed valves hang flat, unable to seal.
fn paint_valve(ctx: &mut Context, valve: &Valve, palette: &Palette) {
    let (cx, cy) = (valve.center.x, valve.center.y);

    let segments: [(f64, f64, f64, f64); 2] = if valve.failed {
        [(-14.0, 0.0, -4.0, -2.0), (14.0, 0.0, 4.0, -2.0)]
    } else {
        let apex = -6.0 - 4.0 * valve.flutter;
        [(-9.0, 0.0, 0.0, apex), (9.0, 0.0, 0.0, apex)]
    };

    let color = if valve.failed {
        palette.valve_failed
    } else {
        palette.valve_ok
    };

    let (sin, cos) = valve.tilt_deg.to_radians().sin_cos();
    for (x1, y1, x2, y2) in segments {
        let (rx1, ry1) = (x1 * cos - y1 * sin, x1 * sin + y1 * cos);
        let (rx2, ry2) = (x2 * cos - y2 * sin, x2 * sin + y2 * cos);
        ctx.draw(&CanvasLine {
            x1: cx + rx1,
            y1: flip(cy + ry1),
            x2: cx + rx2,
            y2: flip(cy + ry2),
            color,
        });
    }
}

// ============================================================================
// Panels
// ============================================================================

fn panel_block<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .title(Span::styled(title, styles::panel_title(palette)))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::horizontal(1))
}

fn draw_explanation(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let block = panel_block(" CLINICAL ANALYSIS ", palette);

    let mut lines: Vec<Line> = Vec::new();
    if app.is_loading() {
        lines.push(Line::styled(
            format!("{} analyzing…", spinner_frame(app.clock_secs())),
            Style::default().fg(palette.accent),
        ));
    } else if let Some(explanation) = app.explanation() {
        lines.push(Line::styled(
            explanation.title.clone(),
            Style::default().fg(palette.severity(explanation.severity)),
        ));
        lines.push(Line::from(""));
        lines.push(Line::styled(
            explanation.content.clone(),
            Style::default().fg(palette.text_secondary),
        ));
    } else {
        lines.push(Line::styled(
            "Awaiting simulation…",
            Style::default().fg(palette.text_muted),
        ));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_controls(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let block = panel_block(" PROGRESSION ", palette);
    let locked = app.controls_locked();

    let stage_line = |key: &str, stage: Stage| -> Line {
        let style = if locked {
            styles::control_disabled(palette)
        } else if app.stage() == stage {
            styles::control_active(palette)
        } else {
            styles::control_enabled(palette)
        };
        Line::styled(format!("[{key}] {}", stage.label()), style)
    };

    let detach_available = app.stage() == Stage::ThrombusFormed;
    let detach_style = if detach_available {
        Style::default().fg(palette.critical)
    } else {
        styles::control_disabled(palette)
    };

    let lines = vec![
        stage_line("1", Stage::Normal),
        stage_line("2", Stage::Varicose),
        stage_line("3", Stage::ThrombusFormed),
        Line::styled("[d] Detach thrombus (critical demo)", detach_style),
        Line::from(""),
        Line::styled(
            "[c] contrast  [q] quit",
            Style::default().fg(palette.text_muted),
        ),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let block = panel_block(" STATUS ", palette);

    let backend = if app.is_online() {
        Span::styled("AI: online", Style::default().fg(palette.accent))
    } else {
        Span::styled("AI: offline", Style::default().fg(palette.text_muted))
    };

    let line = Line::from(vec![
        Span::styled(
            app.stage().label(),
            Style::default().fg(if app.stage().is_diseased() {
                palette.valve_failed
            } else {
                palette.healthy
            }),
        ),
        Span::styled("  ·  ", Style::default().fg(palette.text_disabled)),
        backend,
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
