//! Shared numeric constants.

/// Target arc length of one discretized arc sub-segment, in length units.
pub const DEFAULT_ARC_SEGMENT_LENGTH: f64 = 1.0;

/// Upper bound on sub-segments generated for a single arc command.
pub const MAX_ARC_SEGMENTS: usize = 100_000;
