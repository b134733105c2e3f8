use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
        }
    }
}
