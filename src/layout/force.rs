use std::f64::consts::PI;

use crate::{
    foundation::{
        core::{Point, Vec2, Viewport},
        error::{VisError, VisResult},
    },
    store::entity::EntityStore,
};

/// One region rule of the category bias: items whose joined tags contain any keyword are pulled
/// toward `(x, y)`, given as fractions of the viewport.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BiasRule {
    pub keywords: Vec<String>,
    pub x: f64,
    pub y: f64,
}

/// Category-dependent placement bias. Rules are tried in order; the first match wins. Items
/// matching nothing, including items without tags, go to the default region.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CategoryBias {
    pub rules: Vec<BiasRule>,
    pub default_x: f64,
    pub default_y: f64,
}

impl Default for CategoryBias {
    fn default() -> Self {
        Self {
            rules: vec![
                BiasRule {
                    keywords: vec!["hip hop".to_string(), "rap".to_string()],
                    x: 0.75,
                    y: 0.5,
                },
                BiasRule {
                    keywords: vec!["house".to_string()],
                    x: 0.25,
                    y: 0.25,
                },
            ],
            default_x: 1.0,
            default_y: 0.5,
        }
    }
}

impl CategoryBias {
    /// Target point for an item with the given tags.
    pub fn region(&self, genres: &[String], viewport: &Viewport) -> Point {
        let joined = genres.join("-");
        let (fx, fy) = if joined.is_empty() {
            (self.default_x, self.default_y)
        } else {
            self.rules
                .iter()
                .find(|r| r.keywords.iter().any(|k| joined.contains(k.as_str())))
                .map(|r| (r.x, r.y))
                .unwrap_or((self.default_x, self.default_y))
        };
        Point::new(fx * viewport.width, fy * viewport.height)
    }
}

/// Tuning of the force provider. Defaults reproduce the graph section's look.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    pub link_distance: f64,
    /// `None` uses `1 / min(degree(source), degree(target))`.
    pub link_strength: Option<f64>,
    /// Negative values repel.
    pub charge_strength: f64,
    pub collide_radius: f64,
    pub collide_strength: f64,
    pub center_strength: f64,
    pub bias_x_strength: f64,
    pub bias_y_strength: f64,
    pub bias: CategoryBias,
    pub alpha_min: f64,
    /// `None` derives the decay that reaches `alpha_min` in 300 ticks.
    pub alpha_decay: Option<f64>,
    pub alpha_target: f64,
    pub velocity_decay: f64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            link_distance: 30.0,
            link_strength: None,
            charge_strength: -30.0,
            collide_radius: 30.0,
            collide_strength: 1.0,
            center_strength: 1.0,
            bias_x_strength: 0.02,
            bias_y_strength: 0.1,
            bias: CategoryBias::default(),
            alpha_min: 0.001,
            alpha_decay: None,
            alpha_target: 0.0,
            velocity_decay: 0.4,
        }
    }
}

impl ForceConfig {
    pub fn validate(&self) -> VisResult<()> {
        let finite = [
            self.link_distance,
            self.charge_strength,
            self.collide_radius,
            self.collide_strength,
            self.center_strength,
            self.bias_x_strength,
            self.bias_y_strength,
            self.alpha_min,
            self.alpha_target,
            self.velocity_decay,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(VisError::validation("force parameters must be finite"));
        }
        if self.link_distance < 0.0 || self.collide_radius < 0.0 {
            return Err(VisError::validation(
                "force link_distance/collide_radius must be >= 0",
            ));
        }
        if !(0.0..1.0).contains(&self.alpha_min) || self.alpha_min == 0.0 {
            return Err(VisError::validation("force alpha_min must be in (0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.velocity_decay) {
            return Err(VisError::validation(
                "force velocity_decay must be in [0, 1]",
            ));
        }
        if let Some(d) = self.alpha_decay
            && !(d.is_finite() && (0.0..=1.0).contains(&d))
        {
            return Err(VisError::validation("force alpha_decay must be in [0, 1]"));
        }
        if let Some(s) = self.link_strength
            && !s.is_finite()
        {
            return Err(VisError::validation("force link_strength must be finite"));
        }
        Ok(())
    }

    pub fn effective_alpha_decay(&self) -> f64 {
        self.alpha_decay
            .unwrap_or_else(|| 1.0 - self.alpha_min.powf(1.0 / 300.0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Simulation is stopped; nothing moved.
    Idle,
    /// One step was taken and the simulation keeps running.
    Stepped,
    /// One step was taken and alpha fell below `alpha_min`, so the simulation stopped itself.
    Settled,
}

impl TickOutcome {
    pub fn moved(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[derive(Clone, Copy, Debug)]
struct SimNode {
    pos: Point,
    vel: Vec2,
    region: Point,
}

#[derive(Clone, Copy, Debug)]
struct SimLink {
    source: usize,
    target: usize,
    strength: f64,
    bias: f64,
}

/// Linear congruential source for the sub-pixel jiggle that separates coincident nodes.
#[derive(Clone, Copy, Debug)]
struct Lcg(u32);

impl Lcg {
    fn next_unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        f64::from(self.0) / 4_294_967_296.0
    }

    fn jiggle(&mut self) -> f64 {
        (self.next_unit() - 0.5) * 1e-6
    }
}

/// Stateful, iterative force-directed layout over every catalog item.
///
/// Node slots match [`EntityStore`] slots. The host drives it with [`ForceSimulation::tick`];
/// nothing happens between ticks.
#[derive(Clone, Debug)]
pub struct ForceSimulation {
    config: ForceConfig,
    center: Point,
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    alpha: f64,
    alpha_decay: f64,
    running: bool,
    rng: Lcg,
}

impl ForceSimulation {
    /// Build a stopped simulation over every catalog item and relationship.
    #[tracing::instrument(skip_all, fields(items = store.len()))]
    pub fn new(config: ForceConfig, viewport: &Viewport, store: &EntityStore) -> VisResult<Self> {
        Self::from_parts(
            config,
            viewport,
            store.items().iter().map(|item| item.genres.as_slice()),
            store.relationships().iter().map(|r| r.ends()),
        )
    }

    /// Build a stopped simulation from per-node tags and slot pairs. Nodes start on the
    /// phyllotaxis spiral; self-loops exert no force and are skipped.
    pub fn from_parts<'a>(
        config: ForceConfig,
        viewport: &Viewport,
        tags: impl IntoIterator<Item = &'a [String]>,
        pairs: impl IntoIterator<Item = (usize, usize)>,
    ) -> VisResult<Self> {
        config.validate()?;

        let initial_angle = PI * (3.0 - 5f64.sqrt());
        let nodes = tags
            .into_iter()
            .enumerate()
            .map(|(i, genres)| {
                let radius = 10.0 * (0.5 + i as f64).sqrt();
                let angle = i as f64 * initial_angle;
                SimNode {
                    pos: Point::new(radius * angle.cos(), radius * angle.sin()),
                    vel: Vec2::ZERO,
                    region: config.bias.region(genres, viewport),
                }
            })
            .collect::<Vec<_>>();

        let mut degree = vec![0usize; nodes.len()];
        let mut kept = Vec::new();
        for (s, t) in pairs {
            if s == t {
                continue;
            }
            if s >= nodes.len() || t >= nodes.len() {
                return Err(VisError::integrity(format!(
                    "force link ({s}, {t}) references a missing node"
                )));
            }
            degree[s] += 1;
            degree[t] += 1;
            kept.push((s, t));
        }
        let links = kept
            .into_iter()
            .map(|(source, target)| {
                let (ds, dt) = (degree[source] as f64, degree[target] as f64);
                SimLink {
                    source,
                    target,
                    strength: config.link_strength.unwrap_or(1.0 / ds.min(dt)),
                    bias: ds / (ds + dt),
                }
            })
            .collect();

        Ok(Self {
            alpha_decay: config.effective_alpha_decay(),
            config,
            center: viewport.center(),
            nodes,
            links,
            alpha: 1.0,
            running: false,
            rng: Lcg(1),
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Resume stepping. Idempotent; alpha is left untouched.
    pub fn start(&mut self) {
        if !self.running {
            tracing::debug!(alpha = self.alpha, "force simulation started");
            self.running = true;
        }
    }

    /// Pause stepping. No-op when already stopped.
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!(alpha = self.alpha, "force simulation stopped");
            self.running = false;
        }
    }

    pub fn reheat(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn positions(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.nodes.iter().map(|n| n.pos)
    }

    pub fn position(&self, slot: usize) -> Option<Point> {
        self.nodes.get(slot).map(|n| n.pos)
    }

    pub fn velocity(&self, slot: usize) -> Option<Vec2> {
        self.nodes.get(slot).map(|n| n.vel)
    }

    pub fn region(&self, slot: usize) -> Option<Point> {
        self.nodes.get(slot).map(|n| n.region)
    }

    /// Advance one step if running.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        self.step();
        if self.alpha < self.config.alpha_min {
            self.running = false;
            tracing::debug!(alpha = self.alpha, "force simulation settled");
            return TickOutcome::Settled;
        }
        TickOutcome::Stepped
    }

    /// Run ticks until the simulation stops or `max_ticks` is reached. Returns ticks taken.
    pub fn settle(&mut self, max_ticks: usize) -> usize {
        let mut n = 0;
        while n < max_ticks && self.tick().moved() {
            n += 1;
        }
        n
    }

    /// One integration step regardless of the running flag.
    pub fn step(&mut self) {
        self.alpha += (self.config.alpha_target - self.alpha) * self.alpha_decay;
        let alpha = self.alpha;
        tracing::trace!(alpha, "force step");
        if self.nodes.is_empty() {
            return;
        }

        self.apply_links(alpha);
        self.apply_charge(alpha);
        self.apply_collide();
        self.apply_center();
        self.apply_bias(alpha);

        let keep = 1.0 - self.config.velocity_decay;
        for n in &mut self.nodes {
            n.vel *= keep;
            n.pos += n.vel;
        }
    }

    fn apply_links(&mut self, alpha: f64) {
        let distance = self.config.link_distance;
        for li in 0..self.links.len() {
            let link = self.links[li];
            let (s, t) = (self.nodes[link.source], self.nodes[link.target]);
            let mut x = t.pos.x + t.vel.x - s.pos.x - s.vel.x;
            let mut y = t.pos.y + t.vel.y - s.pos.y - s.vel.y;
            if x == 0.0 {
                x = self.rng.jiggle();
            }
            if y == 0.0 {
                y = self.rng.jiggle();
            }
            let len = (x * x + y * y).sqrt();
            let k = (len - distance) / len * alpha * link.strength;
            let d = Vec2::new(x * k, y * k);
            self.nodes[link.target].vel -= d * link.bias;
            self.nodes[link.source].vel += d * (1.0 - link.bias);
        }
    }

    fn apply_charge(&mut self, alpha: f64) {
        let strength = self.config.charge_strength;
        if strength == 0.0 {
            return;
        }
        let n = self.nodes.len();
        let mut dv = vec![Vec2::ZERO; n];
        for (i, acc) in dv.iter_mut().enumerate() {
            let pi = self.nodes[i].pos;
            for j in 0..n {
                if i == j {
                    continue;
                }
                let pj = self.nodes[j].pos;
                let mut x = pj.x - pi.x;
                let mut y = pj.y - pi.y;
                let mut l = x * x + y * y;
                if x == 0.0 {
                    x = self.rng.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.rng.jiggle();
                    l += y * y;
                }
                if l < 1.0 {
                    l = l.sqrt();
                }
                let w = strength * alpha / l;
                *acc += Vec2::new(x * w, y * w);
            }
        }
        for (node, d) in self.nodes.iter_mut().zip(dv) {
            node.vel += d;
        }
    }

    fn apply_collide(&mut self) {
        let r = self.config.collide_radius;
        if r <= 0.0 {
            return;
        }
        let strength = self.config.collide_strength;
        let reach = r + r;
        let n = self.nodes.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (self.nodes[i], self.nodes[j]);
                let mut x = (a.pos.x + a.vel.x) - (b.pos.x + b.vel.x);
                let mut y = (a.pos.y + a.vel.y) - (b.pos.y + b.vel.y);
                let mut l = x * x + y * y;
                if l >= reach * reach {
                    continue;
                }
                if x == 0.0 {
                    x = self.rng.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.rng.jiggle();
                    l += y * y;
                }
                let len = l.sqrt();
                let k = (reach - len) / len * strength;
                // equal radii split the push evenly
                let push = Vec2::new(x * k, y * k) * 0.5;
                self.nodes[i].vel += push;
                self.nodes[j].vel -= push;
            }
        }
    }

    fn apply_center(&mut self) {
        let n = self.nodes.len() as f64;
        let (sx, sy) = self
            .nodes
            .iter()
            .fold((0.0, 0.0), |(sx, sy), node| (sx + node.pos.x, sy + node.pos.y));
        let shift = Vec2::new(
            (sx / n - self.center.x) * self.config.center_strength,
            (sy / n - self.center.y) * self.config.center_strength,
        );
        for node in &mut self.nodes {
            node.pos -= shift;
        }
    }

    fn apply_bias(&mut self, alpha: f64) {
        let (kx, ky) = (self.config.bias_x_strength, self.config.bias_y_strength);
        for node in &mut self.nodes {
            node.vel.x += (node.region.x - node.pos.x) * kx * alpha;
            node.vel.y += (node.region.y - node.pos.y) * ky * alpha;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/force.rs"]
mod tests;
