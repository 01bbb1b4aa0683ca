//! `dp-table` — the shared state of the dining table.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ring`]        | `Ring` — immutable circular adjacency, `MIN_SEATS`        |
//! | [`eligibility`] | `can_eat` — the pure "may this seat start eating?" check  |
//! | [`gate`]        | `Gate` — single-slot wake/notify signal, one per seat     |
//! | [`table`]       | `Table`, `SeatHandle` (single-writer token per seat)      |
//! | [`snapshot`]    | `Snapshot` — all phases read at one consistent instant    |
//!
//! # Forks without fork objects
//!
//! Forks are never modelled.  A seat may eat iff it is hungry and neither ring
//! neighbour is eating, so fork ownership is derived from neighbour phases.
//! Each seat's phase sits behind its own mutex; a seat trying to eat locks
//! itself plus its two neighbours (always in ascending `SeatId` order) and
//! flips `Hungry → Eating` under those locks.  No global lock exists.
//!
//! ```text
//!   finish_eating(i)  ──signal──▶ gate(i-1) ──▶ seat i-1 re-runs try_eat
//!                     └─signal──▶ gate(i+1) ──▶ seat i+1 re-runs try_eat
//! ```

pub mod eligibility;
pub mod gate;
pub mod ring;
pub mod snapshot;
pub mod table;


pub use eligibility::can_eat;
pub use gate::{Gate, GateWait};
pub use ring::{MIN_SEATS, Ring};
pub use snapshot::Snapshot;
pub use table::{SeatHandle, Table, WaitOutcome};
