//! aq-core: stable foundation for aqueduct.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + divisor flooring)
//! - ids (plan identifiers)
//! - rng (seedable simulation randomness)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod rng;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use rng::SimRng;
pub use units::*;
