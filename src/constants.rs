/// ======================= Trace crawl =======================
/// Number of addresses queried concurrently within one batch.
pub const TRACE_BATCH_SIZE: usize = 5;

/// Pause between batches so explorer rate limits are respected.
pub const TRACE_INTER_BATCH_DELAY_MS: u64 = 500;

/// Hard ceiling on hop depth a single run may request.
pub const TRACE_MAX_HOPS: usize = 10;

/// ======================= Graph topology =======================
/// Components larger than this receive a distinct cluster color.
pub const GROUP_SIZE_THRESHOLD: usize = 3;

/// Golden-ratio conjugate driving the cluster hue walk.
pub const GOLDEN_RATIO: f64 = 0.618033988749895;

/// Flat color for components at or below the size threshold.
pub const DEFAULT_GROUP_COLOR: &str = "#94a3b8";

/// ======================= Node radii =======================
pub const RADIUS_MIN_PX: f64 = 20.0;

pub const RADIUS_MAX_PX: f64 = 80.0;

/// Fallback balance domain when the node set is empty or degenerate.
pub const DEGENERATE_DOMAIN: (f64, f64) = (0.001, 1.0);

/// ======================= Force layout =======================
pub const LINK_DISTANCE: f64 = 250.0;

pub const LINK_STRENGTH: f64 = 0.05;

pub const CHARGE_STRENGTH: f64 = -400.0;

/// Extra clearance added to a node's rendered radius for collision checks.
pub const COLLIDE_PADDING: f64 = 40.0;

pub const COLLIDE_STRENGTH: f64 = 0.8;

pub const CENTER_STRENGTH: f64 = 0.05;

/// New nodes spawn inside a square of this side length around the center.
pub const SPAWN_JITTER_PX: f64 = 100.0;

pub const ALPHA_MIN: f64 = 0.001;

pub const ALPHA_DECAY: f64 = 0.0228;

pub const VELOCITY_DECAY: f64 = 0.4;

/// Alpha target nudge applied when a pinned node is released.
pub const REHEAT_ALPHA: f64 = 0.3;
