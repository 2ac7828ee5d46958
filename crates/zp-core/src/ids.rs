//! Strongly typed agent identifier.
//!
//! Agents are owned by the host world; the movement core only ever refers to
//! them by id.  `AgentId` is `Copy + Ord + Hash` so it can key hash sets and
//! sorted maps without ceremony.

use std::fmt;

/// Opaque handle of an agent in the host world.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u32);

impl AgentId {
    /// Sentinel meaning "no agent".
    pub const INVALID: AgentId = AgentId(u32::MAX);

    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for AgentId {
    /// Uninitialized ids are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

impl From<AgentId> for usize {
    #[inline(always)]
    fn from(id: AgentId) -> usize {
        id.0 as usize
    }
}

impl TryFrom<usize> for AgentId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<AgentId, Self::Error> {
        u32::try_from(n).map(AgentId)
    }
}
