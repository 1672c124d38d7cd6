/// An external scalar series with one value per frame.
///
/// The driver owns the signal; update policies only read the current value.
#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    values: Vec<f32>,
}

impl Signal {
    /// `sin(t / 5) * 0.5 + 0.5` for `t` in `0..steps`, oscillating in `[0, 1]`.
    pub fn sinusoid(steps: usize) -> Self {
        let values = (0..steps)
            .map(|t| (t as f32 / 5.0).sin() * 0.5 + 0.5)
            .collect();
        Self { values }
    }

    pub fn from_values(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Value at frame `t`, or `None` past the end.
    #[inline]
    pub fn get(&self, t: usize) -> Option<f32> {
        self.values.get(t).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.values.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sinusoid_starts_at_half_and_stays_in_unit_range() {
        let s = Signal::sinusoid(1000);
        assert_eq!(s.len(), 1000);
        assert_eq!(s.get(0), Some(0.5));
        assert!(s.iter().all(|v| (0.0..=1.0).contains(&v)));
        assert_eq!(s.get(1000), None);
    }

    #[test]
    fn sinusoid_matches_closed_form() {
        let s = Signal::sinusoid(20);
        let expected = (7.0f32 / 5.0).sin() * 0.5 + 0.5;
        assert!((s.get(7).unwrap() - expected).abs() < 1e-6);
    }
}
