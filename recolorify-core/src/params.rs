/// Tuning knobs for a recolor request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecolorParams {
    /// Multiplier applied to each source pixel's RGB before matching.
    pub luminosity: f64,
    /// How many palette candidates feed the blend for each pixel.
    pub nearest: usize,
    /// Inverse-distance exponent.
    pub power: f64,
    /// Pixels farther than this (in channel units) from every palette color
    /// are left alone. Zero disables the check.
    pub max_distance: f64,
}

pub const DEFAULT_LUMINOSITY: f64 = 1.0;
pub const DEFAULT_NEAREST: usize = 30;
pub const DEFAULT_POWER: f64 = 4.0;

impl Default for RecolorParams {
    fn default() -> Self {
        Self {
            luminosity: DEFAULT_LUMINOSITY,
            nearest: DEFAULT_NEAREST,
            power: DEFAULT_POWER,
            max_distance: 0.0,
        }
    }
}

impl RecolorParams {
    /// Build params from untrusted values, replacing anything out of range
    /// with its default. A non-positive max distance disables the threshold.
    pub fn sanitized(
        luminosity: Option<f64>,
        nearest: Option<i64>,
        power: Option<f64>,
        max_distance: Option<f64>,
    ) -> Self {
        let positive = |v: Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0);
        Self {
            luminosity: positive(luminosity).unwrap_or(DEFAULT_LUMINOSITY),
            nearest: nearest
                .filter(|n| *n >= 1)
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(DEFAULT_NEAREST),
            power: positive(power).unwrap_or(DEFAULT_POWER),
            max_distance: positive(max_distance).unwrap_or(0.0),
        }
    }

    /// Balanced defaults.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Gentle falloff: wide, smooth gradients between palette colors.
    pub fn soft() -> Self {
        Self {
            power: 2.0,
            ..Self::default()
        }
    }

    /// Few candidates and a steep falloff: close to posterized.
    pub fn crisp() -> Self {
        Self {
            nearest: 4,
            power: 8.0,
            ..Self::default()
        }
    }

    /// Single candidate: plain nearest-color quantization.
    pub fn strict() -> Self {
        Self {
            nearest: 1,
            ..Self::default()
        }
    }

    pub fn from_preset(name: &str) -> Option<Self> {
        match name {
            "balanced" => Some(Self::balanced()),
            "soft" => Some(Self::soft()),
            "crisp" => Some(Self::crisp()),
            "strict" => Some(Self::strict()),
            _ => None,
        }
    }

    pub fn all_presets() -> Vec<(&'static str, Self)> {
        vec![
            ("balanced", Self::balanced()),
            ("soft", Self::soft()),
            ("crisp", Self::crisp()),
            ("strict", Self::strict()),
        ]
    }

    pub fn preset_names() -> &'static [&'static str] {
        &["balanced", "soft", "crisp", "strict"]
    }

    pub fn with_luminosity(mut self, luminosity: f64) -> Self {
        self.luminosity = luminosity;
        self
    }

    pub fn with_nearest(mut self, nearest: usize) -> Self {
        self.nearest = nearest;
        self
    }

    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Squared threshold, or `None` when the check is disabled.
    pub fn max_distance_sq(&self) -> Option<f64> {
        (self.max_distance > 0.0).then(|| self.max_distance * self.max_distance)
    }
}
