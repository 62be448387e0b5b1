//! Scene construction: a pure function from simulation state to geometry.
//!
//! Coordinates live in a fixed 500x700 space (x right, y down, matching the
//! hand-authored vessel curves); the drawing layer flips y for the canvas.
//! Nothing here reads the clock on its own - all motion is derived from the
//! values passed in, so a scene is reproducible for any instant.

use venosim_types::Stage;

/// Width of the scene coordinate space.
pub const SCENE_WIDTH: f64 = 500.0;
/// Height of the scene coordinate space.
pub const SCENE_HEIGHT: f64 = 700.0;

/// Where the parked thrombus sits along the diseased vessel (normalized
/// arc length), at the lower valve bulge.
pub const CLOT_PARK: f64 = 0.36;

const HEALTHY_HALF_WIDTH: f64 = 9.0;
const DISEASED_HALF_WIDTH: f64 = 14.0;

/// Seconds for one particle to traverse a healthy vessel.
const FLOW_PERIOD_HEALTHY: f32 = 1.5;
/// Seconds for one particle to traverse a diseased vessel (stasis).
const FLOW_PERIOD_DISEASED: f32 = 4.0;

const LEFT_PARTICLES: usize = 4;
const RIGHT_PARTICLES: usize = 5;
const REFLUX_PARTICLES: usize = 3;

/// Seconds for the clot to fade in when a clot-bearing stage begins.
const CLOT_FADE_IN: f32 = 0.3;
/// Delay before the embolized clot starts fading out, then its duration.
const CLOT_FADE_OUT_DELAY: f32 = 0.5;
const CLOT_FADE_OUT: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One vein valve glyph.
#[derive(Debug, Clone, Copy)]
pub struct Valve {
    pub center: Point,
    /// Failed valves render flattened and tinted; healthy ones as a closing
    /// chevron.
    pub failed: bool,
    /// Glyph rotation in degrees (diseased vessels push valves sideways).
    pub tilt_deg: f64,
    /// 0..1 oscillation driving the healthy open/close animation.
    pub flutter: f64,
}

/// A blood-cell particle.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Point,
    /// Reflux particles hover and fall back instead of advancing.
    pub reflux: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Clot {
    pub pos: Point,
    /// 0..1; the drawing layer maps this to color intensity.
    pub opacity: f32,
    pub radius: f64,
}

#[derive(Debug, Clone)]
pub struct Vessel {
    pub centerline: Vec<Point>,
    pub half_width: f64,
    pub diseased: bool,
    pub valves: Vec<Valve>,
}

/// Complete visual description of one frame.
#[derive(Debug, Clone)]
pub struct Scene {
    pub stage: Stage,
    pub left_vessel: Vessel,
    pub right_vessel: Vessel,
    pub particles: Vec<Particle>,
    pub clot: Option<Clot>,
}

// ============================================================================
// Path geometry
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Seg {
    Line(Point, Point),
    Cubic(Point, Point, Point, Point),
}

fn cubic_point(p0: Point, c1: Point, c2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let x = u * u * u * p0.x
        + 3.0 * u * u * t * c1.x
        + 3.0 * u * t * t * c2.x
        + t * t * t * p3.x;
    let y = u * u * u * p0.y
        + 3.0 * u * u * t * c1.y
        + 3.0 * u * t * t * c2.y
        + t * t * t * p3.y;
    Point::new(x, y)
}

/// A path flattened into samples with a cumulative arc-length table, so
/// positions can be looked up by normalized arc length rather than raw
/// curve parameter (uniform speed along the curve).
#[derive(Debug, Clone)]
pub struct SampledPath {
    points: Vec<Point>,
    cum_len: Vec<f64>,
}

const SAMPLES_PER_SEG: usize = 32;

impl SampledPath {
    fn from_segs(segs: &[Seg]) -> Self {
        let mut points = Vec::new();
        for (i, seg) in segs.iter().enumerate() {
            let start = usize::from(i > 0); // skip duplicated joint
            for s in start..=SAMPLES_PER_SEG {
                let t = s as f64 / SAMPLES_PER_SEG as f64;
                let point = match *seg {
                    Seg::Line(a, b) => Point::new(
                        a.x + (b.x - a.x) * t,
                        a.y + (b.y - a.y) * t,
                    ),
                    Seg::Cubic(p0, c1, c2, p3) => cubic_point(p0, c1, c2, p3, t),
                };
                points.push(point);
            }
        }

        let mut cum_len = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cum_len.push(0.0);
        for pair in points.windows(2) {
            let dx = pair[1].x - pair[0].x;
            let dy = pair[1].y - pair[0].y;
            total += (dx * dx + dy * dy).sqrt();
            cum_len.push(total);
        }

        Self { points, cum_len }
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Position at normalized arc length `u` in 0..1 (clamped).
    #[must_use]
    pub fn point_at(&self, u: f64) -> Point {
        let total = *self.cum_len.last().unwrap_or(&0.0);
        if total <= 0.0 {
            return self.points.first().copied().unwrap_or(Point::new(0.0, 0.0));
        }
        let target = u.clamp(0.0, 1.0) * total;
        let idx = match self
            .cum_len
            .binary_search_by(|len| len.partial_cmp(&target).unwrap_or(std::cmp::Ordering::Less))
        {
            Ok(i) => i,
            Err(i) => i,
        };
        if idx == 0 {
            return self.points[0];
        }
        if idx >= self.points.len() {
            return self.points[self.points.len() - 1];
        }
        let span = self.cum_len[idx] - self.cum_len[idx - 1];
        let frac = if span > 0.0 {
            (target - self.cum_len[idx - 1]) / span
        } else {
            0.0
        };
        let a = self.points[idx - 1];
        let b = self.points[idx];
        Point::new(a.x + (b.x - a.x) * frac, a.y + (b.y - a.y) * frac)
    }
}

/// Straight reference vessel in the left leg, foot (bottom) to pelvis (top).
#[must_use]
pub fn left_vessel_path() -> SampledPath {
    SampledPath::from_segs(&[Seg::Line(Point::new(160.0, 580.0), Point::new(160.0, 100.0))])
}

/// Simulated vessel in the right leg: straight when healthy, a hand-authored
/// bulging wave once the valves fail.
#[must_use]
pub fn right_vessel_path(diseased: bool) -> SampledPath {
    if diseased {
        SampledPath::from_segs(&[
            Seg::Cubic(
                Point::new(340.0, 580.0),
                Point::new(340.0, 500.0),
                Point::new(380.0, 450.0),
                Point::new(350.0, 380.0),
            ),
            // Smooth continuation: first control mirrors the previous one.
            Seg::Cubic(
                Point::new(350.0, 380.0),
                Point::new(320.0, 310.0),
                Point::new(300.0, 250.0),
                Point::new(340.0, 150.0),
            ),
            Seg::Line(Point::new(340.0, 150.0), Point::new(340.0, 100.0)),
        ])
    } else {
        SampledPath::from_segs(&[Seg::Line(Point::new(340.0, 580.0), Point::new(340.0, 100.0))])
    }
}

// ============================================================================
// Scene assembly
// ============================================================================

/// Per-valve placement for the right leg; the diseased vessel bulges, so
/// each valve shifts sideways and tilts to stay inside the wall.
const RIGHT_VALVES: [(f64, f64, f64, f64); 3] = [
    // (y, x healthy, x diseased, tilt when diseased)
    (450.0, 340.0, 368.0, 15.0),
    (300.0, 340.0, 315.0, -15.0),
    (150.0, 340.0, 340.0, 0.0),
];

const LEFT_VALVE_YS: [f64; 3] = [450.0, 300.0, 150.0];

fn flutter(clock: f32, y: f64) -> f64 {
    // One close/open cycle per second, phase-offset by height so the valves
    // do not move in lockstep.
    let phase = f64::from(clock) + y / 300.0;
    (phase * std::f64::consts::TAU).sin() * 0.5 + 0.5
}

fn left_vessel(clock: f32) -> Vessel {
    let path = left_vessel_path();
    let valves = LEFT_VALVE_YS
        .iter()
        .map(|&y| Valve {
            center: Point::new(160.0, y),
            failed: false,
            tilt_deg: 0.0,
            flutter: flutter(clock, y),
        })
        .collect();
    Vessel {
        centerline: path.points().to_vec(),
        half_width: HEALTHY_HALF_WIDTH,
        diseased: false,
        valves,
    }
}

fn right_vessel(stage: Stage, clock: f32) -> Vessel {
    let diseased = stage.is_diseased();
    let path = right_vessel_path(diseased);
    let valves = RIGHT_VALVES
        .iter()
        .map(|&(y, x_healthy, x_diseased, tilt)| {
            if diseased {
                Valve {
                    center: Point::new(x_diseased, y),
                    failed: true,
                    tilt_deg: tilt,
                    flutter: 0.0,
                }
            } else {
                Valve {
                    center: Point::new(x_healthy, y),
                    failed: false,
                    tilt_deg: 0.0,
                    flutter: flutter(clock, y),
                }
            }
        })
        .collect();
    Vessel {
        centerline: path.points().to_vec(),
        half_width: if diseased {
            DISEASED_HALF_WIDTH
        } else {
            HEALTHY_HALF_WIDTH
        },
        diseased,
        valves,
    }
}

/// Flow particles move foot-to-pelvis (u: 0 -> 1); reflux particles hover
/// around the lower bulge and fall back.
fn particles(stage: Stage, clock: f32) -> Vec<Particle> {
    let mut out = Vec::new();
    let left_path = left_vessel_path();
    let right_diseased = stage.is_diseased();
    let right_path = right_vessel_path(right_diseased);

    for i in 0..LEFT_PARTICLES {
        let phase = clock / FLOW_PERIOD_HEALTHY + i as f32 / LEFT_PARTICLES as f32;
        out.push(Particle {
            pos: left_path.point_at(f64::from(phase.fract())),
            reflux: false,
        });
    }

    let right_period = if right_diseased {
        FLOW_PERIOD_DISEASED
    } else {
        FLOW_PERIOD_HEALTHY
    };
    for i in 0..RIGHT_PARTICLES {
        let phase = clock / right_period + i as f32 / RIGHT_PARTICLES as f32;
        out.push(Particle {
            pos: right_path.point_at(f64::from(phase.fract())),
            reflux: false,
        });
    }

    if right_diseased {
        for i in 0..REFLUX_PARTICLES {
            let phase = clock / FLOW_PERIOD_DISEASED + i as f32 * 0.3;
            // Oscillate around the lower bulge: 0.40 +- 0.05.
            let u = 0.40 + 0.05 * f64::from((phase * std::f32::consts::TAU).sin());
            out.push(Particle {
                pos: right_path.point_at(u),
                reflux: true,
            });
        }
    }

    out
}

fn clot_opacity(stage: Stage, stage_elapsed: f32) -> Option<f32> {
    match stage {
        Stage::ThrombusFormed => Some((stage_elapsed / CLOT_FADE_IN).clamp(0.0, 1.0)),
        // The stage clock resets on detachment, but the clot was already
        // fully visible; re-running the fade-in would make it blink.
        Stage::Detaching => Some(1.0),
        Stage::PostEmbolism => {
            let faded = ((stage_elapsed - CLOT_FADE_OUT_DELAY) / CLOT_FADE_OUT).clamp(0.0, 1.0);
            Some(1.0 - faded)
        }
        Stage::Normal | Stage::Varicose => None,
    }
}

fn clot(stage: Stage, stage_elapsed: f32, travel: f32) -> Option<Clot> {
    let opacity = clot_opacity(stage, stage_elapsed)?;
    let path = right_vessel_path(true);
    let u = CLOT_PARK + f64::from(travel) * (1.0 - CLOT_PARK);
    Some(Clot {
        pos: path.point_at(u),
        opacity,
        radius: 12.0,
    })
}

impl Scene {
    /// Build the frame for one instant.
    ///
    /// * `clock` - monotonic animation clock in seconds
    /// * `stage_elapsed` - seconds since the stage was entered
    /// * `travel` - clot travel progress from the engine (0 parked, 1 arrived)
    #[must_use]
    pub fn build(stage: Stage, clock: f32, stage_elapsed: f32, travel: f32) -> Self {
        Self {
            stage,
            left_vessel: left_vessel(clock),
            right_vessel: right_vessel(stage, clock),
            particles: particles(stage, clock),
            clot: clot(stage, stage_elapsed, travel),
        }
    }
}
