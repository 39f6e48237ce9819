//! Deterministic selection among agents that can all perform a segment.

/// How the allocator picks one agent when several qualify.
///
/// Every strategy breaks remaining ties by lowest `AgentId`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AllocationStrategy {
    /// Fewest segments assigned so far.
    #[default]
    LeastLoaded,
    /// Always the lowest capable id.
    FirstCapable,
    /// Least cumulative processing time (segment length / process speed).
    LeastWork,
}
