use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("cannot scale an empty series")]
    Empty,
    #[error("every value equals {value}; the range is degenerate")]
    DegenerateRange { value: f64 },
    #[error("value at index {index} is not finite")]
    NonFinite { index: usize },
}

/// Target interval for min-max scaling. `low` is where the minimum raw value lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRange {
    pub low: f64,
    pub high: f64,
}

impl ScaleRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Range for an indicator weight. Higher score is always better: a regular
    /// indicator maps its maximum to `weight`, an inverted one maps its minimum there.
    pub fn for_weight(weight: u32, invert: bool) -> Self {
        let w = f64::from(weight);
        if invert {
            Self::new(w, 0.0)
        } else {
            Self::new(0.0, w)
        }
    }
}

/// Linearly rescale `values` so the minimum maps to `range.low` and the maximum to `range.high`.
pub fn minmax_scale(values: &[f64], range: ScaleRange) -> Result<Vec<f64>, ScaleError> {
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(ScaleError::NonFinite { index });
    }
    let (min, max) = bounds(values).ok_or(ScaleError::Empty)?;
    let span = max - min;
    if span == 0.0 {
        return Err(ScaleError::DegenerateRange { value: min });
    }

    let width = range.high - range.low;
    // Dividing first keeps the extremes exact: (max - min) / span == 1.0.
    Ok(values
        .iter()
        .map(|v| range.low + width * ((v - min) / span))
        .collect())
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}
