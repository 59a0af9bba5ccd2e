//! warpgrid-ramp — time-based probability ramp for admission gating.
//!
//! A [`ProbabilityRamp`] answers two questions for a caller deciding
//! whether to let an attempt through: "what is the current chance" and
//! "should this attempt pass". The chance climbs linearly from a minimum
//! to a maximum over a warm-up window, then holds at the maximum.
//!
//! # Components
//!
//! - **`ramp`** — `ProbabilityRamp` (current chance, check, reset)
//! - **`config`** — serde-embeddable `RampConfig` with duration strings
//! - **`clock`** — `Clock` trait, `SystemClock`, `ManualClock` for tests
//! - **`random`** — `RandomSource` trait, `ThreadRandom`, `SeededRandom`
//! - **`error`** — construction errors
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use warpgrid_ramp::ProbabilityRamp;
//!
//! let ramp = ProbabilityRamp::new(0.1, 0.9, Duration::from_secs(30)).unwrap();
//! assert!(ramp.current_chance() >= 0.1);
//! if ramp.check() {
//!     // let the attempt through
//! }
//! ```
//!
//! All operations are synchronous, constant time, and safe to call from
//! many threads through an `Arc`.

pub mod clock;
pub mod config;
pub mod error;
pub mod ramp;
pub mod random;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RampConfig;
pub use error::{RampError, RampResult};
pub use ramp::{ProbabilityRamp, RampSnapshot};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
