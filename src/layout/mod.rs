pub mod forces;

use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::constants::ALPHA_DECAY;
use crate::constants::ALPHA_MIN;
use crate::constants::REHEAT_ALPHA;
use crate::constants::SPAWN_JITTER_PX;
use crate::constants::VELOCITY_DECAY;
use crate::graph::GraphView;
use crate::utils::normalize_address;

/// Simulation state for one bubble. `fx`/`fy` present means the user
/// pinned it; the node holds that position until released.
#[derive(Debug, Clone, Serialize)]
pub struct SimNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub fx: Option<f64>,
    pub fy: Option<f64>,
    pub radius: f64,
}

impl SimNode {
    pub fn is_pinned(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimLink {
    pub source: usize,
    pub target: usize,
}

/// Continuous force relaxation over the current graph. The engine owns
/// every transient coordinate; rebuilds merge by node id so positions,
/// velocities and pins survive data and filter changes.
#[derive(Debug)]
pub struct LayoutEngine {
    width: f64,
    height: f64,
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    degrees: Vec<usize>,
    index: HashMap<String, usize>,
    alpha: f64,
    alpha_target: f64,
}

impl LayoutEngine {
    pub fn new(
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            width,
            height,
            nodes: Vec::new(),
            links: Vec::new(),
            degrees: Vec::new(),
            index: HashMap::new(),
            alpha: 1.0,
            alpha_target: 0.0,
        }
    }

    /// Key-based merge against the previous tick state: a node id seen
    /// before carries its coordinates, velocity and pin over exactly; a
    /// new id spawns near the viewport center with zero velocity and no
    /// pin. Ids absent from the new view are dropped. Restarts cooling.
    pub fn sync(
        &mut self,
        view: &GraphView,
    ) {
        let mut rng = rand::rng();
        let mut next_nodes = Vec::with_capacity(view.nodes.len());
        let mut next_index = HashMap::with_capacity(view.nodes.len());

        for node in &view.nodes {
            let key = normalize_address(&node.id);
            let radius = view.radius_scale.scale(node.balance);
            let sim = match self.index.get(&key) {
                Some(&prev_idx) => {
                    let prev = &self.nodes[prev_idx];
                    SimNode {
                        id: node.id.clone(),
                        x: prev.x,
                        y: prev.y,
                        vx: prev.vx,
                        vy: prev.vy,
                        fx: prev.fx,
                        fy: prev.fy,
                        radius,
                    }
                },
                None => SimNode {
                    id: node.id.clone(),
                    x: self.width / 2.0 + (rng.random::<f64>() - 0.5) * SPAWN_JITTER_PX,
                    y: self.height / 2.0 + (rng.random::<f64>() - 0.5) * SPAWN_JITTER_PX,
                    vx: 0.0,
                    vy: 0.0,
                    fx: None,
                    fy: None,
                    radius,
                },
            };
            next_index.insert(key, next_nodes.len());
            next_nodes.push(sim);
        }

        let mut degrees = vec![0usize; next_nodes.len()];
        let links: Vec<SimLink> = view
            .links
            .iter()
            .filter_map(|link| {
                let source = *next_index.get(&normalize_address(&link.source))?;
                let target = *next_index.get(&normalize_address(&link.target))?;
                degrees[source] += 1;
                degrees[target] += 1;
                Some(SimLink { source, target })
            })
            .collect();

        debug!("layout_sync::nodes::{}::links::{}", next_nodes.len(), links.len());

        self.nodes = next_nodes;
        self.index = next_index;
        self.links = links;
        self.degrees = degrees;
        self.alpha = 1.0;
    }

    /// One relaxation step. There is no terminal state; callers tick on
    /// their animation schedule and may stop once `is_settled`.
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;

        forces::apply_links(&mut self.nodes, &self.links, &self.degrees, self.alpha);
        forces::apply_charge(&mut self.nodes, self.alpha);
        forces::apply_collide(&mut self.nodes);
        forces::apply_center(&mut self.nodes, self.width / 2.0, self.height / 2.0);

        for node in &mut self.nodes {
            match (node.fx, node.fy) {
                (Some(fx), Some(fy)) => {
                    node.x = fx;
                    node.y = fy;
                    node.vx = 0.0;
                    node.vy = 0.0;
                },
                _ => {
                    node.vx *= 1.0 - VELOCITY_DECAY;
                    node.vy *= 1.0 - VELOCITY_DECAY;
                    node.x += node.vx;
                    node.y += node.vy;
                },
            }
        }
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < ALPHA_MIN
    }

    /// Run ticks until settled, bounded by `max_ticks`. Returns the number
    /// of ticks executed.
    pub fn settle(
        &mut self,
        max_ticks: usize,
    ) -> usize {
        let mut ticks = 0;
        while !self.is_settled() && ticks < max_ticks {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Pin a node at the given coordinates (drag).
    pub fn pin(
        &mut self,
        id: &str,
        x: f64,
        y: f64,
    ) -> bool {
        let Some(&idx) = self.index.get(&normalize_address(id)) else {
            return false;
        };
        let node = &mut self.nodes[idx];
        node.fx = Some(x);
        node.fy = Some(y);
        node.x = x;
        node.y = y;
        true
    }

    /// Clear a pin and nudge the simulation so the node settles back in.
    pub fn release(
        &mut self,
        id: &str,
    ) -> bool {
        let Some(&idx) = self.index.get(&normalize_address(id)) else {
            return false;
        };
        let node = &mut self.nodes[idx];
        node.fx = None;
        node.fy = None;
        self.alpha = self.alpha.max(REHEAT_ALPHA);
        true
    }

    pub fn get(
        &self,
        id: &str,
    ) -> Option<&SimNode> {
        self.index.get(&normalize_address(id)).map(|&idx| &self.nodes[idx])
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}
