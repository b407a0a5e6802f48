/// Sequential color scales for the map, light (low score) to dark (high score).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    Reds,
    Blues,
    Greens,
    Greys,
    Purples,
    Oranges,
}

impl ColorScale {
    pub const ALL: [ColorScale; 6] = [
        ColorScale::Reds,
        ColorScale::Blues,
        ColorScale::Greens,
        ColorScale::Greys,
        ColorScale::Purples,
        ColorScale::Oranges,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Resolve `name`, then `fallback`, then reds.
    pub fn resolve(name: &str, fallback: &str) -> Self {
        Self::from_name(name)
            .or_else(|| {
                tracing::debug!("Unknown color scale {name:?}, using {fallback:?}");
                Self::from_name(fallback)
            })
            .unwrap_or(ColorScale::Reds)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorScale::Reds => "reds",
            ColorScale::Blues => "blues",
            ColorScale::Greens => "greens",
            ColorScale::Greys => "greys",
            ColorScale::Purples => "purples",
            ColorScale::Oranges => "oranges",
        }
    }

    fn endpoints(&self) -> ([u8; 3], [u8; 3]) {
        match self {
            ColorScale::Reds => ([255, 245, 240], [103, 0, 13]),
            ColorScale::Blues => ([247, 251, 255], [8, 48, 107]),
            ColorScale::Greens => ([247, 252, 245], [0, 68, 27]),
            ColorScale::Greys => ([255, 255, 255], [0, 0, 0]),
            ColorScale::Purples => ([252, 251, 253], [63, 0, 125]),
            ColorScale::Oranges => ([255, 245, 235], [127, 39, 4]),
        }
    }

    /// CSS hex color at position `t` in [0, 1]; out-of-range values are clamped.
    pub fn color_at(&self, t: f64) -> String {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let (light, dark) = self.endpoints();
        let channel = |i: usize| {
            let a = f64::from(light[i]);
            let b = f64::from(dark[i]);
            (a + (b - a) * t).round() as u8
        };
        format!("#{:02x}{:02x}{:02x}", channel(0), channel(1), channel(2))
    }

    /// Fill for `score` within the table's `(min, max)`. A flat table sits mid-scale.
    pub fn fill(&self, score: f64, bounds: (f64, f64)) -> String {
        let (min, max) = bounds;
        let t = if max > min { (score - min) / (max - min) } else { 0.5 };
        self.color_at(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(ColorScale::from_name("Blues"), Some(ColorScale::Blues));
        assert_eq!(ColorScale::from_name(" GREYS "), Some(ColorScale::Greys));
        assert_eq!(ColorScale::from_name("viridis"), None);
    }

    #[test]
    fn resolve_falls_back() {
        assert_eq!(ColorScale::resolve("viridis", "greens"), ColorScale::Greens);
        assert_eq!(ColorScale::resolve("viridis", "nope"), ColorScale::Reds);
    }

    #[test]
    fn endpoints_and_clamping() {
        assert_eq!(ColorScale::Greys.color_at(0.0), "#ffffff");
        assert_eq!(ColorScale::Greys.color_at(1.0), "#000000");
        assert_eq!(ColorScale::Greys.color_at(7.0), "#000000");
        assert_eq!(ColorScale::Greys.color_at(f64::NAN), "#ffffff");
    }

    #[test]
    fn fill_spans_bounds() {
        let scale = ColorScale::Greys;
        assert_eq!(scale.fill(10.0, (10.0, 20.0)), "#ffffff");
        assert_eq!(scale.fill(20.0, (10.0, 20.0)), "#000000");
        assert_eq!(scale.fill(3.0, (3.0, 3.0)), scale.color_at(0.5));
    }
}
