use rand::Rng;

use crate::constants::CENTER_STRENGTH;
use crate::constants::CHARGE_STRENGTH;
use crate::constants::COLLIDE_PADDING;
use crate::constants::COLLIDE_STRENGTH;
use crate::constants::LINK_DISTANCE;
use crate::constants::LINK_STRENGTH;

use super::SimLink;
use super::SimNode;

// Tiny random displacement that breaks ties between coincident nodes so
// no force pass divides by zero.
fn jiggle() -> f64 {
    (rand::rng().random::<f64>() - 0.5) * 1e-6
}

/// Spring force pulling linked nodes toward a fixed rest distance. The
/// low strength keeps it from dominating the repulsion; the correction is
/// split between endpoints biased by degree, so hubs move less.
pub fn apply_links(
    nodes: &mut [SimNode],
    links: &[SimLink],
    degrees: &[usize],
    alpha: f64,
) {
    for link in links {
        let (s, t) = (link.source, link.target);
        if s == t {
            continue;
        }

        let mut dx = (nodes[t].x + nodes[t].vx) - (nodes[s].x + nodes[s].vx);
        let mut dy = (nodes[t].y + nodes[t].vy) - (nodes[s].y + nodes[s].vy);
        if dx == 0.0 && dy == 0.0 {
            dx = jiggle();
            dy = jiggle();
        }

        let len = (dx * dx + dy * dy).sqrt();
        let scale = (len - LINK_DISTANCE) / len * alpha * LINK_STRENGTH;
        dx *= scale;
        dy *= scale;

        let bias = degrees[s] as f64 / (degrees[s] + degrees[t]) as f64;
        nodes[t].vx -= dx * bias;
        nodes[t].vy -= dy * bias;
        nodes[s].vx += dx * (1.0 - bias);
        nodes[s].vy += dy * (1.0 - bias);
    }
}

/// Many-body repulsion, inverse-square on distance. Spreads unconnected
/// nodes apart.
pub fn apply_charge(
    nodes: &mut [SimNode],
    alpha: f64,
) {
    let n = nodes.len();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let mut dx = nodes[j].x - nodes[i].x;
            let mut dy = nodes[j].y - nodes[i].y;
            if dx == 0.0 && dy == 0.0 {
                dx = jiggle();
                dy = jiggle();
            }
            let l2 = dx * dx + dy * dy;
            let w = CHARGE_STRENGTH * alpha / l2;
            nodes[i].vx += dx * w;
            nodes[i].vy += dy * w;
        }
    }
}

/// Pairwise overlap resolution on padded radii: overlapping bubbles are
/// pushed apart along their separation axis, the smaller one moving more.
pub fn apply_collide(nodes: &mut [SimNode]) {
    let n = nodes.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let ri = nodes[i].radius + COLLIDE_PADDING;
            let rj = nodes[j].radius + COLLIDE_PADDING;
            let r = ri + rj;

            let mut dx = (nodes[j].x + nodes[j].vx) - (nodes[i].x + nodes[i].vx);
            let mut dy = (nodes[j].y + nodes[j].vy) - (nodes[i].y + nodes[i].vy);
            if dx == 0.0 && dy == 0.0 {
                dx = jiggle();
                dy = jiggle();
            }

            let l2 = dx * dx + dy * dy;
            if l2 >= r * r {
                continue;
            }

            let len = l2.sqrt();
            let overlap = (r - len) / len * COLLIDE_STRENGTH;
            dx *= overlap;
            dy *= overlap;

            let wi = rj * rj / (ri * ri + rj * rj);
            nodes[j].vx += dx * wi;
            nodes[j].vy += dy * wi;
            nodes[i].vx -= dx * (1.0 - wi);
            nodes[i].vy -= dy * (1.0 - wi);
        }
    }
}

/// Weak centering: translate the whole layout so its centroid drifts
/// toward the viewport center without fighting the other forces.
pub fn apply_center(
    nodes: &mut [SimNode],
    cx: f64,
    cy: f64,
) {
    if nodes.is_empty() {
        return;
    }
    let n = nodes.len() as f64;
    let sx = (nodes.iter().map(|node| node.x).sum::<f64>() / n - cx) * CENTER_STRENGTH;
    let sy = (nodes.iter().map(|node| node.y).sum::<f64>() / n - cy) * CENTER_STRENGTH;
    for node in nodes {
        node.x -= sx;
        node.y -= sy;
    }
}
