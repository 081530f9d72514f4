use serde::{Deserialize, Serialize};

/// Four-step classification of the usage metric. Marker color and radius both
/// derive from the bucket, so the two encodings share their thresholds by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageBucket {
    /// < 500
    Light,
    /// 500..1000
    Moderate,
    /// 1000..5000
    Heavy,
    /// >= 5000
    Extreme,
}

impl UsageBucket {
    pub fn classify(usage: u64) -> Self {
        if usage < 500 {
            UsageBucket::Light
        } else if usage < 1000 {
            UsageBucket::Moderate
        } else if usage < 5000 {
            UsageBucket::Heavy
        } else {
            UsageBucket::Extreme
        }
    }

    /// Marker fill/stroke color as a hex token.
    pub fn color(&self) -> &'static str {
        match self {
            UsageBucket::Light => "#c6e5f2",
            UsageBucket::Moderate => "#91d1f0",
            UsageBucket::Heavy => "#4a90e2",
            UsageBucket::Extreme => "#0d3b66",
        }
    }

    /// Marker radius in pixels.
    pub fn radius(&self) -> u8 {
        match self {
            UsageBucket::Light => 3,
            UsageBucket::Moderate => 5,
            UsageBucket::Heavy => 8,
            UsageBucket::Extreme => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UsageBucket::Light => "light",
            UsageBucket::Moderate => "moderate",
            UsageBucket::Heavy => "heavy",
            UsageBucket::Extreme => "extreme",
        }
    }
}

impl std::fmt::Display for UsageBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub fn usage_color(usage: u64) -> &'static str {
    UsageBucket::classify(usage).color()
}

pub fn usage_radius(usage: u64) -> u8 {
    UsageBucket::classify(usage).radius()
}
