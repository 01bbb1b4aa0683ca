//! The three phases a philosopher cycles through.

/// What a seat is doing right now.
///
/// The only legal transitions are the cyclic ones returned by
/// [`Phase::next`]: `Thinking → Hungry → Eating → Thinking`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Not holding or requesting forks (initial state).
    #[default]
    Thinking,
    /// Waiting for both neighbours to stop eating.
    Hungry,
    /// Holding both forks shared with the neighbours.
    Eating,
}

impl Phase {
    /// All phases in cycle order.
    pub const CYCLE: [Phase; 3] = [Phase::Thinking, Phase::Hungry, Phase::Eating];

    /// The phase that follows `self` in the cycle.
    #[inline]
    pub fn next(self) -> Phase {
        match self {
            Phase::Thinking => Phase::Hungry,
            Phase::Hungry   => Phase::Eating,
            Phase::Eating   => Phase::Thinking,
        }
    }

    /// `true` only for [`Phase::Eating`]: a seat in this phase holds both of
    /// its forks.
    #[inline]
    pub fn is_eating(self) -> bool {
        matches!(self, Phase::Eating)
    }

    /// Human-readable label, used in activity lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Thinking => "thinking",
            Phase::Hungry   => "hungry",
            Phase::Eating   => "eating",
        }
    }

    /// Single-letter code used by compact table snapshots.
    pub fn symbol(self) -> char {
        match self {
            Phase::Thinking => 'T',
            Phase::Hungry   => 'H',
            Phase::Eating   => 'E',
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
