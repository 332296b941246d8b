/// Easing curve applied to normalized transition time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    QuadInOut,
    #[default]
    CubicInOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 / 2.0
                } else {
                    let u = t2 - 1.0;
                    (u * (2.0 - u) + 1.0) / 2.0
                }
            }
            Self::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
        }
    }
}
