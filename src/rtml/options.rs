use serde::Deserialize;

/// Serialization parameters for RTML output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderOptions {
    /// Decimal places for coordinates, airmass and exposure times.
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    /// Picture description used when an exposure carries none.
    #[serde(default)]
    pub default_picture_description: Option<String>,
}

fn default_decimals() -> usize {
    6
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            default_picture_description: None,
        }
    }
}

impl RenderOptions {
    pub fn float(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value)
    }
}
