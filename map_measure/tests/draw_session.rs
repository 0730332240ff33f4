use map_measure::{
    draw::{DrawEvent, DrawSession, DrawType, SessionOptions, TipState, ToolMode, IDLE_TIP},
    geometry::{Geometry, Point},
    gis::{Feature, FeatureId},
    labels::MeasureStyles,
    measure::Measurement,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn session(options: SessionOptions) -> DrawSession {
    init();
    DrawSession::new(options, MeasureStyles::new(Measurement::Planar))
}

fn click(s: &mut DrawSession, x: f64, y: f64) -> Option<FeatureId> {
    s.handle(DrawEvent::Click(Point::new(x, y)))
}

#[test]
fn polygon_measure_flow() {
    let mut s = session(SessionOptions::default());
    assert_eq!(s.tip(), IDLE_TIP);

    click(&mut s, 0.0, 0.0);
    assert_eq!(s.state(), TipState::Drawing);
    assert_eq!(s.tip(), "Click to continue drawing the polygon");
    click(&mut s, 100.0, 0.0);
    click(&mut s, 100.0, 100.0);

    let id = s.handle(DrawEvent::Finish).expect("polygon committed");
    assert_eq!(s.state(), TipState::Committed);
    assert_eq!(s.tip(), IDLE_TIP);
    assert!(s.sketch_geometry().is_none());
    assert_eq!(s.feature_labels(), vec![(id, vec!["5000 m\u{00B2}".to_string()])]);

    s.handle(DrawEvent::PointerMove(Point::new(500.0, 500.0)));
    assert_eq!(s.state(), TipState::Idle);
}

#[test]
fn finish_needs_enough_vertices() {
    let mut s = session(SessionOptions {
        draw_type: DrawType::LineString,
        ..Default::default()
    });
    click(&mut s, 0.0, 0.0);
    assert_eq!(s.handle(DrawEvent::Finish), None);
    click(&mut s, 10.0, 0.0);
    assert!(s.handle(DrawEvent::Finish).is_some());
    assert_eq!(s.source().len(), 1);
}

#[test]
fn segment_labels_follow_the_toggle() {
    let mut s = session(SessionOptions {
        draw_type: DrawType::LineString,
        ..Default::default()
    });
    click(&mut s, 0.0, 0.0);
    click(&mut s, 30.0, 40.0);
    click(&mut s, 30.0, 140.0);
    let id = s.handle(DrawEvent::Finish).unwrap();

    assert_eq!(s.feature_labels(), vec![(id, vec!["0.15 km".to_string()])]);
    s.set_show_segments(true);
    assert_eq!(
        s.feature_labels(),
        vec![(
            id,
            vec!["50 m".to_string(), "0.1 km".to_string(), "0.15 km".to_string()]
        )]
    );
}

#[test]
fn clear_previous_drops_earlier_features() {
    let mut s = session(SessionOptions {
        draw_type: DrawType::Point,
        ..Default::default()
    });
    let first = click(&mut s, 1.0, 1.0).unwrap();
    s.set_clear_previous(true);
    let second = click(&mut s, 2.0, 2.0).unwrap();
    assert_ne!(first, second);
    assert_eq!(s.source().len(), 1);
    assert!(s.source().get(first).is_none());
    assert!(s.source().get(second).is_some());
}

#[test]
fn escape_discards_the_sketch() {
    let mut s = session(SessionOptions::default());
    click(&mut s, 0.0, 0.0);
    click(&mut s, 10.0, 0.0);
    s.handle(DrawEvent::Abort);
    assert!(s.sketch_geometry().is_none());
    assert_eq!(s.state(), TipState::Idle);
    assert!(s.source().is_empty());
}

#[test]
fn changing_type_restarts_the_gesture() {
    let mut s = session(SessionOptions::default());
    click(&mut s, 0.0, 0.0);
    s.handle(DrawEvent::TypeChanged(DrawType::LineString));
    assert_eq!(s.draw_type(), DrawType::LineString);
    assert!(s.sketch_geometry().is_none());
    assert_eq!(s.tip(), IDLE_TIP);

    click(&mut s, 0.0, 0.0);
    assert_eq!(s.tip(), "Click to continue drawing the line");
}

#[test]
fn circle_follows_the_pointer() {
    let mut s = session(SessionOptions {
        draw_type: DrawType::Circle,
        ..Default::default()
    });
    click(&mut s, 0.0, 0.0);
    s.handle(DrawEvent::PointerMove(Point::new(3.0, 4.0)));
    match s.sketch_geometry() {
        Some(Geometry::Circle(c)) => assert_eq!(c.radius, 5.0),
        other => panic!("unexpected sketch {other:?}"),
    }
    let id = click(&mut s, 3.0, 4.0).unwrap();
    assert!(matches!(
        s.source().get(id).map(|f| &f.geometry),
        Some(Geometry::Circle(_))
    ));
}

#[test]
fn shape_mode_selects_touched_features() {
    let mut s = session(SessionOptions {
        mode: ToolMode::Shape,
        draw_type: DrawType::Square,
        ..Default::default()
    });
    let inside = s
        .source_mut()
        .add(Feature::new(Geometry::Point(Point::new(0.2, 0.2))));
    s.source_mut()
        .add(Feature::new(Geometry::Point(Point::new(0.9, 0.9))));
    s.source_mut()
        .add(Feature::new(Geometry::Point(Point::new(100.0, 100.0))));

    click(&mut s, 0.0, 0.0);
    s.handle(DrawEvent::PointerMove(Point::new(1.0, 0.0)));
    let id = click(&mut s, 1.0, 0.0).unwrap();

    assert_eq!(s.selection(), &[inside]);
    match s.source().get(id).map(|f| &f.geometry) {
        Some(Geometry::Polygon(p)) => assert_eq!(p.outer_ring().len(), 5),
        other => panic!("unexpected geometry {other:?}"),
    }
    assert!(s.feature_labels().iter().all(|(_, texts)| texts.is_empty()));
}

#[test]
fn modify_hint_is_pinned_until_the_pointer_moves() {
    let mut s = session(SessionOptions::default());
    click(&mut s, 0.0, 0.0);
    click(&mut s, 10.0, 0.0);
    s.handle(DrawEvent::PointerMove(Point::new(10.0, 10.0)));
    s.for_each_sketch_style(|_, _| {});
    click(&mut s, 10.0, 10.0);
    s.handle(DrawEvent::Finish).unwrap();

    assert_eq!(s.styles().modify.geometry, Some(Point::new(10.0, 10.0)));
    assert!(s.modify_style().is_some());

    s.handle(DrawEvent::PointerMove(Point::new(50.0, 50.0)));
    assert_eq!(s.styles().modify.geometry, None);
    assert!(s.modify_style().is_none());

    s.handle(DrawEvent::PointerMove(Point::new(10.5, 0.5)));
    assert_eq!(s.modify().vertex, Some(Point::new(10.0, 0.0)));
    assert!(s.modify_style().is_some());
}

#[test]
fn sketch_tip_is_shown_at_the_cursor() {
    let mut s = session(SessionOptions::default());
    s.handle(DrawEvent::PointerMove(Point::new(3.0, 3.0)));
    let mut tips = Vec::new();
    s.for_each_sketch_style(|feature, styles| {
        if let Geometry::Point(_) = feature.geometry {
            tips.extend(styles.iter().filter_map(|st| st.text().map(str::to_string)));
        }
    });
    assert_eq!(tips, vec![IDLE_TIP.to_string()]);
}
