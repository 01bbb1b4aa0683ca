//! `dp-core` — foundational types for the `rust_dp` dining table.
//!
//! This crate is a dependency of every other `dp-*` crate.  It intentionally
//! has no `dp-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `SeatId` (ring position)                              |
//! | [`phase`]       | `Phase` enum (`Thinking` → `Hungry` → `Eating`)       |
//! | [`delay`]       | `DelayConfig` (think/eat duration ranges)             |
//! | [`rng`]         | `SeatRng` (per-seat deterministic RNG)                |
//! | [`error`]       | `DpError`, `DpResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod delay;
pub mod error;
pub mod ids;
pub mod phase;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use delay::DelayConfig;
pub use error::{DpError, DpResult};
pub use ids::SeatId;
pub use phase::Phase;
pub use rng::SeatRng;
