//! Arc move handling (G2/G3)
//!
//! Arcs are given by an endpoint and an I/J center offset relative to the
//! current position. They are discretized into short straight sub-segments
//! of roughly equal arc length so the output stays a plain polyline.
//!
//! Angular deltas follow one sign convention throughout: clockwise sweeps
//! are negative radians in `(-2π, 0]`, counter-clockwise sweeps are
//! non-negative in `[0, 2π)`.

use std::f64::consts::TAU;

use layerscope_core::constants::MAX_ARC_SEGMENTS;
use layerscope_core::{ArcInfo, InterpretError, Movement, Position};
use tracing::trace;

use crate::gcode::ParsedLine;

/// A discretized arc command
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPath {
    /// Center, radius and direction shared by every sub-segment
    pub info: ArcInfo,
    /// Angle of the start position around the center
    pub start_angle: f64,
    /// Signed angular sweep (negative for clockwise)
    pub delta: f64,
    /// Sub-segments in traversal order
    pub segments: Vec<Movement>,
    /// Sub-segments dropped because a computed point was not finite
    pub skipped: Vec<InterpretError>,
    /// Programmed endpoint at the starting Z
    pub end: Position,
}

impl ArcPath {
    /// Number of sub-segments the arc was divided into, dropped ones included
    pub fn segment_count(&self) -> usize {
        self.segments.len() + self.skipped.len()
    }
}

/// Signed sweep from `start_angle` to `end_angle`
pub fn angular_delta(start_angle: f64, end_angle: f64, clockwise: bool) -> f64 {
    let mut delta = end_angle - start_angle;
    if clockwise {
        if delta > 0.0 {
            delta -= TAU;
        }
    } else if delta < 0.0 {
        delta += TAU;
    }
    delta
}

/// Number of sub-segments for an arc of `radius` sweeping `delta` radians
///
/// Always at least one, never more than [`MAX_ARC_SEGMENTS`].
pub fn segment_count(radius: f64, delta: f64, segment_length: f64) -> usize {
    let count = (radius * delta.abs() / segment_length).ceil();
    if count.is_nan() || count < 1.0 {
        1
    } else if count >= MAX_ARC_SEGMENTS as f64 {
        MAX_ARC_SEGMENTS
    } else {
        count as usize
    }
}

/// Interpret an arc command starting at `current`
///
/// Fails without producing geometry when the center offset is incomplete or
/// the radius is not a finite positive number.
pub fn interpret_arc(
    line: &ParsedLine<'_>,
    current: Position,
    segment_length: f64,
) -> Result<ArcPath, InterpretError> {
    let line_number = line.line_number;
    let clockwise = line.code == "G2";

    let end_x = line.param('X').unwrap_or(current.x);
    let end_y = line.param('Y').unwrap_or(current.y);

    let (offset_i, offset_j) = match (line.param('I'), line.param('J')) {
        (Some(i), Some(j)) => (i, j),
        (None, None) => {
            return Err(InterpretError::UnresolvedArcCenter {
                line_number,
                missing: "I/J",
            })
        }
        (None, Some(_)) => {
            return Err(InterpretError::UnresolvedArcCenter {
                line_number,
                missing: "I",
            })
        }
        (Some(_), None) => {
            return Err(InterpretError::UnresolvedArcCenter {
                line_number,
                missing: "J",
            })
        }
    };

    let center = (current.x + offset_i, current.y + offset_j);
    let radius = (current.x - center.0).hypot(current.y - center.1);
    if !radius.is_finite() || radius <= 0.0 {
        return Err(InterpretError::InvalidArcRadius {
            line_number,
            radius,
        });
    }

    let start_angle = (current.y - center.1).atan2(current.x - center.0);
    let end_angle = (end_y - center.1).atan2(end_x - center.0);
    let delta = angular_delta(start_angle, end_angle, clockwise);
    let count = segment_count(radius, delta, segment_length);

    trace!(
        "Arc: from={}, to=({:.3},{:.3}), center=({:.3},{:.3}), radius={:.4}, delta={:.4}, segments={}, cw={}",
        current, end_x, end_y, center.0, center.1, radius, delta, count, clockwise
    );

    let info = ArcInfo {
        center,
        radius,
        clockwise,
    };
    let sweep = Sweep {
        start_angle,
        delta,
        count,
    };
    let (segments, skipped) = discretize(&info, &sweep, current, line.is_extruding(), line_number);

    Ok(ArcPath {
        info,
        start_angle,
        delta,
        segments,
        skipped,
        end: Position::new(end_x, end_y, current.z),
    })
}

struct Sweep {
    start_angle: f64,
    delta: f64,
    count: usize,
}

/// Walk the sweep, emitting one movement per finite point
///
/// A non-finite point is dropped; the next movement starts from the last
/// point that was emitted.
fn discretize(
    info: &ArcInfo,
    sweep: &Sweep,
    start: Position,
    is_extruding: bool,
    line_number: usize,
) -> (Vec<Movement>, Vec<InterpretError>) {
    let mut segments = Vec::with_capacity(sweep.count);
    let mut skipped = Vec::new();
    let mut previous = start;

    for i in 1..=sweep.count {
        let fraction = i as f64 / sweep.count as f64;
        let angle = sweep.start_angle + sweep.delta * fraction;
        let x = info.center.0 + info.radius * angle.cos();
        let y = info.center.1 + info.radius * angle.sin();

        if !(x.is_finite() && y.is_finite()) {
            skipped.push(InterpretError::InvalidArcSegmentPoint {
                line_number,
                segment: i,
                x,
                y,
            });
            continue;
        }

        let to = Position::new(x, y, start.z);
        segments.push(Movement {
            from: previous,
            to,
            is_extruding,
            is_purge: false,
            arc: Some(*info),
        });
        previous = to;
    }

    (segments, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn run(line: &str, current: Position) -> Result<ArcPath, InterpretError> {
        let parsed = ParsedLine::parse(1, line).unwrap();
        interpret_arc(&parsed, current, 1.0)
    }

    #[test]
    fn test_angular_delta_sign_convention() {
        let ccw = angular_delta(0.0, FRAC_PI_2, false);
        let cw = angular_delta(0.0, FRAC_PI_2, true);
        assert!((ccw - FRAC_PI_2).abs() < EPS);
        assert!((cw + 3.0 * FRAC_PI_2).abs() < EPS);

        // already negative clockwise sweeps stay as they are
        assert!((angular_delta(FRAC_PI_2, 0.0, true) + FRAC_PI_2).abs() < EPS);
        // negative counter-clockwise sweeps wrap into [0, 2π)
        assert!((angular_delta(FRAC_PI_2, 0.0, false) - 3.0 * FRAC_PI_2).abs() < EPS);
        // coincident start and end
        assert_eq!(angular_delta(PI, PI, true), 0.0);
        assert_eq!(angular_delta(PI, PI, false), 0.0);
    }

    #[test]
    fn test_segment_count() {
        assert_eq!(segment_count(10.0, FRAC_PI_2, 1.0), 16);
        assert_eq!(segment_count(10.0, -FRAC_PI_2, 1.0), 16);
        assert_eq!(segment_count(0.1, 0.1, 1.0), 1);
        assert_eq!(segment_count(1.0, 0.0, 1.0), 1);
        assert_eq!(segment_count(1e12, PI, 1.0), MAX_ARC_SEGMENTS);
        assert_eq!(segment_count(1.0, f64::NAN, 1.0), 1);
    }

    #[test]
    fn test_counter_clockwise_quarter_arc() {
        let arc = run("G3 X0 Y10 I-10 J0", Position::new(10.0, 0.0, 0.2)).unwrap();
        assert!(!arc.info.clockwise);
        assert_eq!(arc.info.center, (0.0, 0.0));
        assert!((arc.info.radius - 10.0).abs() < EPS);
        assert!((arc.delta - FRAC_PI_2).abs() < EPS);
        assert_eq!(arc.segments.len(), 16);
        assert!(arc.skipped.is_empty());

        let last = arc.segments.last().unwrap().to;
        assert!(last.x.abs() < 1e-6);
        assert!((last.y - 10.0).abs() < 1e-6);
        assert_eq!(last.z, 0.2);
        assert_eq!(arc.end, Position::new(0.0, 10.0, 0.2));

        // every point stays in the first quadrant
        for segment in &arc.segments {
            assert!(segment.to.x >= -1e-9 && segment.to.y >= -1e-9);
            assert_eq!(segment.arc, Some(arc.info));
        }
    }

    #[test]
    fn test_clockwise_goes_the_long_way() {
        let arc = run("G2 X0 Y10 I-10 J0", Position::new(10.0, 0.0, 0.0)).unwrap();
        assert!(arc.info.clockwise);
        assert!(arc.delta < 0.0);
        assert_eq!(arc.segments.len(), 48);
        // first step moves below the X axis
        assert!(arc.segments[0].to.y < 0.0);
    }

    #[test]
    fn test_segments_are_chained() {
        let start = Position::new(10.0, 0.0, 0.0);
        let arc = run("G3 X-10 Y0 I-10 J0", start).unwrap();
        assert_eq!(arc.segments[0].from, start);
        for pair in arc.segments.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
    }

    #[test]
    fn test_extrusion_flag_carries_to_segments() {
        let arc = run("G3 X0 Y10 I-10 J0 E2.5", Position::new(10.0, 0.0, 0.0)).unwrap();
        assert!(arc.segments.iter().all(|s| s.is_extruding && !s.is_purge));
    }

    #[test]
    fn test_missing_offsets() {
        let err = run("G2 X10 Y10", Position::default()).unwrap_err();
        assert_eq!(
            err,
            InterpretError::UnresolvedArcCenter {
                line_number: 1,
                missing: "I/J"
            }
        );
        let err = run("G2 X10 Y10 J5", Position::default()).unwrap_err();
        assert!(matches!(
            err,
            InterpretError::UnresolvedArcCenter { missing: "I", .. }
        ));
        let err = run("G2 X10 Y10 I5", Position::default()).unwrap_err();
        assert!(matches!(
            err,
            InterpretError::UnresolvedArcCenter { missing: "J", .. }
        ));
    }

    #[test]
    fn test_zero_radius() {
        let err = run("G2 X10 Y10 I0 J0", Position::default()).unwrap_err();
        assert!(matches!(err, InterpretError::InvalidArcRadius { .. }));
    }

    #[test]
    fn test_infinite_radius() {
        let err = run("G3 X1 Y1 I1e308 J1e308", Position::new(1e308, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, InterpretError::InvalidArcRadius { .. }));
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let info = ArcInfo {
            center: (f64::NAN, 0.0),
            radius: 1.0,
            clockwise: false,
        };
        let sweep = Sweep {
            start_angle: 0.0,
            delta: PI,
            count: 4,
        };
        let (segments, skipped) = discretize(&info, &sweep, Position::default(), false, 3);
        assert!(segments.is_empty());
        assert_eq!(skipped.len(), 4);
        assert!(matches!(
            skipped[0],
            InterpretError::InvalidArcSegmentPoint {
                line_number: 3,
                segment: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_endpoint_axes_keep_current_values() {
        // full circle: endpoint equals start
        let arc = run("G3 I-5 J0", Position::new(5.0, 0.0, 0.0)).unwrap();
        assert_eq!(arc.end, Position::new(5.0, 0.0, 0.0));
        assert_eq!(arc.delta, 0.0);
        assert_eq!(arc.segment_count(), 1);
    }
}
