//! Easing curves

/// An easing curve: maps normalized elapsed time [0,1] to normalized
/// progress [0,1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ease {
    /// Constant rate, no acceleration
    #[default]
    Linear,
    /// Gentle deceleration: 1 - (1-t)^2
    QuadOut,
    /// Acceleration from rest: t^3
    CubicIn,
    /// Deceleration into place: 1 - (1-t)^3
    CubicOut,
    /// Very strong initial burst that decays exponentially; the
    /// "explosion" feel: 1 - 2^(-10t)
    ExpoOut,
}

impl Ease {
    /// Apply the curve to a linear factor `t`. Input is clamped to [0,1],
    /// and every curve maps 0 → 0 and 1 → 1 exactly.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::CubicIn => t * t * t,
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 5] = [
        Ease::Linear,
        Ease::QuadOut,
        Ease::CubicIn,
        Ease::CubicOut,
        Ease::ExpoOut,
    ];

    #[test]
    fn endpoints_exact() {
        for ease in ALL {
            assert_eq!(ease.apply(0.0), 0.0, "{ease:?} at 0");
            assert_eq!(ease.apply(1.0), 1.0, "{ease:?} at 1");
        }
    }

    #[test]
    fn monotonic_non_decreasing() {
        for ease in ALL {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = ease.apply(i as f32 / 100.0);
                assert!(v >= prev - 1e-6, "{ease:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn out_of_range_input_clamps() {
        for ease in ALL {
            assert_eq!(ease.apply(-0.5), 0.0);
            assert_eq!(ease.apply(1.5), 1.0);
        }
    }

    #[test]
    fn expo_out_front_loads_motion() {
        // Most of the travel happens early
        assert!(Ease::ExpoOut.apply(0.3) > 0.85);
    }
}
