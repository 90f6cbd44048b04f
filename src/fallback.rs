//! Ordered degrade policy for quotations.
//!
//! Each tier is a [`FareStrategy`]; the chain tries them in order and returns
//! the first usable fare, tagged with the tier that produced it.

use tracing::{debug, error, warn};

use crate::error::QuoteError;
use crate::models::{FareBreakdown, Provenance};

pub trait FareStrategy<Ctx: ?Sized>: Send + Sync {
    /// Tag applied to every fare this strategy produces.
    fn provenance(&self) -> Provenance;

    fn attempt(&self, ctx: &Ctx) -> Result<FareBreakdown, QuoteError>;
}

pub struct FallbackChain<Ctx: ?Sized> {
    strategies: Vec<Box<dyn FareStrategy<Ctx>>>,
}

impl<Ctx: ?Sized> Default for FallbackChain<Ctx> {
    fn default() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }
}

impl<Ctx: ?Sized> FallbackChain<Ctx> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, strategy: impl FareStrategy<Ctx> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn tiers(&self) -> Vec<Provenance> {
        self.strategies.iter().map(|s| s.provenance()).collect()
    }

    /// Runs tiers in order. Unrecoverable errors stop the chain at once;
    /// otherwise the last tier's error is returned when every tier fails.
    pub fn run(&self, ctx: &Ctx) -> Result<FareBreakdown, QuoteError> {
        let mut last_error = None;

        for strategy in &self.strategies {
            let tier = strategy.provenance();
            match strategy.attempt(ctx).and_then(ensure_chargeable) {
                Ok(mut fare) => {
                    fare.provenance = tier;
                    if tier.is_degraded() {
                        warn!(tier = ?tier, total_fare = fare.total_fare, "serving degraded quote");
                    } else {
                        debug!(tier = ?tier, total_fare = fare.total_fare, "quote computed");
                    }
                    return Ok(fare);
                }
                Err(err) if !err.is_recoverable() => return Err(err),
                Err(err) => {
                    warn!(tier = ?tier, error = %err, "fare tier failed");
                    last_error = Some(err);
                }
            }
        }

        error!("every fare tier failed");
        Err(last_error.unwrap_or(QuoteError::ServiceUnavailable))
    }
}

/// A rider must never be shown a zero or negative price.
fn ensure_chargeable(fare: FareBreakdown) -> Result<FareBreakdown, QuoteError> {
    if fare.total_fare > 0 {
        Ok(fare)
    } else {
        Err(QuoteError::InvalidFare(fare.total_fare))
    }
}
