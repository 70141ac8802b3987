//! Weighted-random event gate
//!
//! Likelihood tiers map to explicit probability fractions, each tier
//! halving the previous one. The policy is independent of any particular
//! generator's native range.

use rand::Rng;

/// How likely an event is to fire on a given roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Likelihood {
    /// ~100%
    HighlyLikely,
    /// 50%
    QuiteLikely,
    /// 25%
    ModeratelyLikely,
    /// 12.5%
    Maybe,
    /// 6.25%
    Unlikely,
    /// 3.125%
    QuiteUnlikely,
    /// 1.5625%
    YeahRight,
}

impl Likelihood {
    /// Success probability as a fraction of 1
    pub fn probability(self) -> f64 {
        match self {
            Likelihood::HighlyLikely => 1.0,
            Likelihood::QuiteLikely => 0.5,
            Likelihood::ModeratelyLikely => 0.25,
            Likelihood::Maybe => 0.125,
            Likelihood::Unlikely => 0.0625,
            Likelihood::QuiteUnlikely => 0.03125,
            Likelihood::YeahRight => 0.015625,
        }
    }
}

/// Draw once; true when the draw falls inside the tier's fraction
pub fn roll<R: Rng + ?Sized>(rng: &mut R, likelihood: Likelihood) -> bool {
    rng.gen::<f64>() < likelihood.probability()
}
