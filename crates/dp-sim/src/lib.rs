//! `dp-sim` — thread-per-seat driver for the rust_dp dining table.
//!
//! # Agent loop
//!
//! ```text
//! one OS thread per seat, forever (until stopped):
//!   ① Think   — sample think delay, report activity, interruptible sleep.
//!   ② Hungry  — Thinking → Hungry, report activity.
//!   ③ Acquire — SeatHandle::wait_to_eat: check, else block on the seat's
//!               gate until a neighbour finishes, re-check.
//!   ④ Eat     — sample eat delay, report activity, interruptible sleep.
//!   ⑤ Release — Eating → Thinking, signal both neighbours' gates.
//! ```
//!
//! No lock is held across ① or ④.  Stopping sets the shared [`Shutdown`]
//! flag (cutting sleeps short) and closes every gate (releasing blocked
//! hungry seats).  A seat that is eating when the stop arrives still runs ⑤.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use dp_core::DelayConfig;
//! use dp_sim::{ActivityLog, SimBuilder, UniformDelays};
//!
//! let timing = UniformDelays::new(DelayConfig::default())?;
//! let report = SimBuilder::new(5, timing)
//!     .seed(42)
//!     .observer(ActivityLog)
//!     .build()?
//!     .run_for(Duration::from_secs(10))?;
//! println!("{} meals", report.total_meals());
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod shutdown;
pub mod sim;
pub mod timing;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{Activity, ActivityLog, MealTally, NoopObserver, PhaseObserver};
pub use shutdown::Shutdown;
pub use sim::{Sim, SimHandle, SimReport, Stopper};
pub use timing::{FixedDelays, TimingSource, UniformDelays};
