//! Deterministic visual identity: a seeded pseudo-random stream drives
//! palette, accessory, gait, and temperament choices, plus a procedural
//! 16x16 pixel sprite. Everything here is a pure function of its inputs so
//! regeneration is the cache; no asset is ever persisted.

use serde::{Deserialize, Serialize};

use crate::types::{AccessoryKind, AgentRole, Gait, Temperament, VisualIdentity};

// ---------------------------------------------------------------------------
// Seeded randomness
// ---------------------------------------------------------------------------

/// FNV-1a over the seed's chars. Order-dependent and case-sensitive, so
/// "abc" and "cba" produce unrelated streams.
pub fn hash_seed(seed: &str) -> u32 {
    let mut hash: u32 = 2_166_136_261;
    for ch in seed.chars() {
        hash ^= ch as u32;
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}

/// Small deterministic pseudo-random stream (mulberry32 step function).
///
/// Derive independent streams per purpose by salting the seed string
/// (`seed:role:profile`, `agent:zone:slot`) rather than sharing one stream
/// across unrelated draws; sharing couples draw order between values that
/// should not influence each other.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: &str) -> Self {
        Self {
            state: hash_seed(seed),
        }
    }

    /// Next value in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        ((t ^ (t >> 14)) as f64) / 4_294_967_296.0
    }

    /// Uniform pick from a slice; `None` only for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = (self.next() * items.len() as f64) as usize;
        items.get(index.min(items.len() - 1))
    }
}

// ---------------------------------------------------------------------------
// Palettes
// ---------------------------------------------------------------------------

struct Palette {
    key: &'static str,
    base: &'static str,
    accent: &'static str,
    accessory: &'static str,
}

const fn palette(
    key: &'static str,
    base: &'static str,
    accent: &'static str,
    accessory: &'static str,
) -> Palette {
    Palette {
        key,
        base,
        accent,
        accessory,
    }
}

const ORCHESTRATOR_PALETTES: [Palette; 2] = [
    palette("captain-indigo", "#6d7cff", "#a8b4ff", "#f8fafc"),
    palette("vector-navy", "#4e67de", "#83a3ff", "#dbeafe"),
];
const PLANNER_PALETTES: [Palette; 2] = [
    palette("cyan-grid", "#27b9df", "#86ebff", "#d9faff"),
    palette("ice-map", "#0ea5e9", "#67e8f9", "#cffafe"),
];
const FRONTEND_PALETTES: [Palette; 2] = [
    palette("mint-weave", "#15bfa0", "#74f6d2", "#ddfff5"),
    palette("teal-bloom", "#0ea78a", "#5eead4", "#e6fffa"),
];
const BACKEND_PALETTES: [Palette; 2] = [
    palette("ember-core", "#f37f34", "#ffc48d", "#fff0de"),
    palette("forge-copper", "#d3661c", "#fdba74", "#ffedd5"),
];
const REVIEWER_PALETTES: [Palette; 2] = [
    palette("emerald-seal", "#24ad59", "#87efad", "#eafff0"),
    palette("sage-guard", "#228d4d", "#4ade80", "#dcfce7"),
];
const WORKER_PALETTES: [Palette; 2] = [
    palette("steel-core", "#66758c", "#c5d1e5", "#e2e8f0"),
    palette("slate-bot", "#536276", "#94a3b8", "#dce3ed"),
];

fn role_palettes(role: AgentRole) -> &'static [Palette] {
    match role {
        AgentRole::Orchestrator => &ORCHESTRATOR_PALETTES,
        AgentRole::Planner => &PLANNER_PALETTES,
        AgentRole::Frontend => &FRONTEND_PALETTES,
        AgentRole::Backend => &BACKEND_PALETTES,
        AgentRole::Reviewer => &REVIEWER_PALETTES,
        AgentRole::Worker => &WORKER_PALETTES,
    }
}

const ACCESSORIES: [AccessoryKind; 4] = [
    AccessoryKind::Visor,
    AccessoryKind::Headset,
    AccessoryKind::Antenna,
    AccessoryKind::Badge,
];
const GAITS: [Gait; 3] = [Gait::Steady, Gait::Quick, Gait::Drift];
const TEMPERAMENTS: [Temperament; 4] = [
    Temperament::Calm,
    Temperament::Focused,
    Temperament::Bold,
    Temperament::Precise,
];

// ---------------------------------------------------------------------------
// Identity generation
// ---------------------------------------------------------------------------

/// `PRE-123` style tag: first three alphabetic characters of the display
/// name uppercased (padded with `X`; an empty or symbol-only name degrades
/// to the `AGENT` root) plus a three-digit number from the seed hash.
fn callsign(display_name: &str, seed: &str) -> String {
    let clean: String = display_name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_uppercase();
    let root = if clean.is_empty() {
        "AGENT"
    } else {
        clean.as_str()
    };
    let mut prefix: String = root.chars().take(3).collect();
    while prefix.len() < 3 {
        prefix.push('X');
    }
    let suffix = hash_seed(seed) % 900 + 100;
    format!("{}-{}", prefix, suffix)
}

/// Derive the full visual profile for an agent. Pure and deterministic:
/// identical arguments always yield a byte-identical identity.
pub fn generate_identity(seed: &str, role: AgentRole, display_name: &str) -> VisualIdentity {
    // Profile draws use their own salted stream so sprite-frame draws for
    // the same agent can never perturb palette selection.
    let mut rng = SeededRng::new(&format!("{}:{}:profile", seed, role));
    let palettes = role_palettes(role);
    let palette = rng.pick(palettes).unwrap_or(&palettes[0]);

    VisualIdentity {
        seed: seed.to_string(),
        callsign: callsign(display_name, seed),
        palette_key: palette.key.to_string(),
        base_color: palette.base.to_string(),
        accent_color: palette.accent.to_string(),
        accessory_color: palette.accessory.to_string(),
        accessory: *rng.pick(&ACCESSORIES).unwrap_or(&AccessoryKind::Badge),
        gait: *rng.pick(&GAITS).unwrap_or(&Gait::Steady),
        temperament: *rng.pick(&TEMPERAMENTS).unwrap_or(&Temperament::Focused),
    }
}

// ---------------------------------------------------------------------------
// Sprite
// ---------------------------------------------------------------------------

pub const SPRITE_SIZE: usize = 16;

const SKIN: &str = "#f5d1b5";
const INK: &str = "#122032";

/// Row-major pixel grid; `None` is transparent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelMatrix {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Option<String>>,
}

impl PixelMatrix {
    fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width * height],
        }
    }

    fn set(&mut self, x: i32, y: i32, value: &str) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.pixels[y as usize * self.width + x as usize] = Some(value.to_string());
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&str> {
        self.pixels
            .get(y * self.width + x)
            .and_then(|p| p.as_deref())
    }
}

/// Build the 16x16 walking sprite for an identity. Pure function of
/// (identity, frame): the same frame value always yields identical pixels,
/// so re-renders are idempotent. Legs and arms alternate on `frame % 4`.
pub fn sprite(identity: &VisualIdentity, frame: u32) -> PixelMatrix {
    let mut matrix = PixelMatrix::blank(SPRITE_SIZE, SPRITE_SIZE);

    // Head
    for y in 3..=6 {
        for x in 5..=10 {
            matrix.set(x, y, SKIN);
        }
    }

    // Body with accent stripe
    for y in 7..=11 {
        for x in 4..=11 {
            matrix.set(x, y, &identity.base_color);
        }
    }
    for x in 4..=11 {
        matrix.set(x, 8, &identity.accent_color);
    }

    // Eyes
    matrix.set(6, 4, INK);
    matrix.set(9, 4, INK);

    match identity.accessory {
        AccessoryKind::Visor => {
            for x in 5..=10 {
                matrix.set(x, 2, &identity.accessory_color);
            }
        }
        AccessoryKind::Headset => {
            matrix.set(4, 4, &identity.accessory_color);
            matrix.set(11, 4, &identity.accessory_color);
        }
        AccessoryKind::Antenna => {
            matrix.set(8, 1, &identity.accessory_color);
            matrix.set(8, 0, &identity.accent_color);
        }
        AccessoryKind::Badge => {
            matrix.set(10, 10, &identity.accessory_color);
        }
    }

    // Two-phase walk cycle
    let phase = frame % 4;
    let (left_leg, right_leg) = if phase < 2 { (6, 9) } else { (5, 10) };
    for y in 12..=14 {
        matrix.set(left_leg, y, INK);
        matrix.set(right_leg, y, INK);
    }
    matrix.set(4, if phase < 2 { 9 } else { 10 }, INK);
    matrix.set(11, if phase < 2 { 10 } else { 9 }, INK);

    matrix
}
