use layerscope_core::data::*;
use std::sync::Arc;

use layerscope_core::{CollectingSink, Diagnostic, DiagnosticSinkHandle, InterpretError};

#[test]
fn test_layer_serializes_with_collaborator_field_names() {
    let mut layer = Layer::at(0.2);
    layer.movements.push(Movement::extrusion(
        Position::new(0.0, 0.0, 0.2),
        Position::new(10.0, 0.0, 0.2),
    ));
    layer.purges.push(PurgePoint {
        position: Position::new(10.0, 0.0, 0.2),
    });

    let json = serde_json::to_value(&layer).unwrap();
    assert_eq!(json["z"], 0.2);
    assert_eq!(json["movements"][0]["is_extruding"], true);
    assert_eq!(json["movements"][0]["is_purge"], false);
    assert!(json["movements"][0]["arc"].is_null());
    assert_eq!(json["movements"][0]["to"]["x"], 10.0);
    assert_eq!(json["purges"][0]["position"]["x"], 10.0);
}

#[test]
fn test_pending_layer_serializes_null_z() {
    let layer = Layer::pending();
    let json = serde_json::to_value(&layer).unwrap();
    assert!(json["z"].is_null());
}

#[test]
fn test_arc_metadata_round_trips() {
    let arc = ArcInfo {
        center: (5.0, 5.0),
        radius: 5.0,
        clockwise: false,
    };
    let movement = Movement::travel(Position::new(10.0, 5.0, 0.0), Position::new(5.0, 10.0, 0.0))
        .with_arc(arc);

    let text = serde_json::to_string(&movement).unwrap();
    let back: Movement = serde_json::from_str(&text).unwrap();
    assert_eq!(back, movement);
}

#[test]
fn test_extrusion_count_includes_purges() {
    let origin = Position::default();
    let mut layer = Layer::pending();
    layer.movements.push(Movement::travel(origin, Position::new(1.0, 0.0, 0.0)));
    layer.movements.push(Movement {
        is_purge: true,
        ..Movement::extrusion(origin, origin)
    });
    layer.movements.push(Movement::extrusion(origin, Position::new(0.0, 1.0, 0.0)));

    assert_eq!(layer.extrusion_count(), 2);
    assert_eq!(
        layer.movements.iter().filter(|m| m.deposits_material()).count(),
        1
    );
}

#[test]
fn test_sink_handle_shares_collected_diagnostics() {
    let collector = Arc::new(CollectingSink::new());
    let handle: DiagnosticSinkHandle = collector.clone();

    handle.report(&Diagnostic::new(
        "G2 X10 Y10",
        InterpretError::UnresolvedArcCenter {
            line_number: 1,
            missing: "I/J",
        },
    ));

    assert_eq!(collector.len(), 1);
}
