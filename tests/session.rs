use std::rc::Rc;

use pose_editor::checker::HoleChecker;
use pose_editor::drag::Direction;
use pose_editor::edge::Stretch;
use pose_editor::geometry::Absent;
use pose_editor::point::Point;
use pose_editor::problem::{read_pose_from_file, SAMPLE_POSE, SAMPLE_PROBLEM};
use pose_editor::{EditorError, Session};

const TRIANGLE: &str = r#"{"hole":[[0,0],[20,0],[0,20]],"epsilon":0,
    "figure":{"vertices":[[1,1],[5,1],[1,5]],"edges":[[0,1],[1,2],[2,0]]}}"#;

#[test]
fn edit_the_sample_solution() {
    let mut session = Session::sample(Rc::new(HoleChecker)).unwrap();
    {
        let report = session.model().report();
        assert!(report.verdict.as_ref().unwrap().all_ok());
        assert_eq!(report.dislikes, Some(624));
        assert_eq!(report.score, Some(0));
    }

    // Drop vertex 5 onto the bottom right corner of the hole.
    assert_eq!(session.press(Point::new(59.0, 70.0), 2.0), Some(5));
    assert!(session.drag_to(Point::new(80.2, 81.9)));
    assert!(session.drag_to(Point::new(95.3, 94.8)));
    assert!(session.model().report().verdict.as_ref().unwrap().all_ok());
    assert_eq!(session.release(), Some(5));

    let model = session.model();
    let v5 = &model.vertices()[5];
    assert_eq!(v5.pos(), Point::new(95.0, 95.0));
    assert!(v5.at_corner());
    assert_eq!(model.edges()[0].stretch(), Stretch::TooShort);
    assert!(!model.edges()[0].globally_valid());
    assert!(!model.report().verdict.as_ref().unwrap().all_ok());
    assert_eq!(model.report().dislikes, Some(476));
    assert!(model.output().contains("[95,95]"));

    assert!(session.nudge(Direction::Left));
    let model = session.model();
    assert_eq!(model.vertices()[5].pos(), Point::new(94.0, 95.0));
    assert!(!model.vertices()[5].at_corner());
    assert_eq!(model.report().dislikes, Some(477));

    // Back to the known good pose.
    session.load_pose_text(SAMPLE_POSE).unwrap();
    assert!(session.model().report().verdict.as_ref().unwrap().all_ok());
    assert_eq!(session.model().output(), SAMPLE_POSE);
    assert_eq!(session.drag().last_dragged(), Some(5));
}

#[test]
fn rejected_loads_change_nothing() {
    let mut session = Session::sample(Rc::new(HoleChecker)).unwrap();

    match session.load_pose_text(r#"{"vertices":[[1,1],[2,2]]}"#) {
        Err(EditorError::VertexCountMismatch { expected, found }) => {
            assert_eq!((expected, found), (20, 2));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(
        session.load_pose_text("not json"),
        Err(EditorError::Json(_))
    ));
    assert!(matches!(
        session.load_problem_file("does/not/exist.json"),
        Err(EditorError::Io(_))
    ));
    let far = r#"{"hole":[[0,0],[10,0],[0,10]],"epsilon":0,
        "figure":{"vertices":[[0,0],[134217729,0]],"edges":[[0,1]]}}"#;
    assert!(matches!(
        session.load_problem_text(far),
        Err(EditorError::CoordinateOutOfRange { .. })
    ));

    assert_eq!(session.model().output(), SAMPLE_POSE);
    assert_eq!(session.model().report().dislikes, Some(624));
}

#[test]
fn reload_starts_over() {
    let mut session = Session::sample(Rc::new(HoleChecker)).unwrap();
    session.press(Point::new(59.0, 70.0), 2.0);
    session.release();

    session.load_problem_text(TRIANGLE).unwrap();
    let model = session.model();
    assert_eq!(model.vertices().len(), 3);
    assert_eq!(model.output(), r#"{"vertices":[[1,1],[5,1],[1,5]]}"#);
    assert!(model.report().verdict.as_ref().unwrap().all_ok());
    assert_eq!(model.report().dislikes, Some(2 + 226 + 226));
    assert!(!session.nudge(Direction::Up));
}

#[test]
fn without_geometry_only_lengths_are_checked() {
    let mut session = Session::sample(Rc::new(Absent)).unwrap();
    let model = session.model();
    assert!(model.report().verdict.is_none());
    assert!(model.report().dislikes.is_none());
    assert!(model.report().score.is_none());
    assert!(model.vertices().iter().all(|v| v.globally_valid()));
    assert_eq!(model.output(), SAMPLE_POSE);

    session.press(Point::new(59.0, 70.0), 2.0);
    session.drag_to(Point::new(95.0, 95.0));
    session.release();
    let model = session.model();
    assert_eq!(model.edges()[0].stretch(), Stretch::TooShort);
    assert!(model.edges().iter().all(|e| e.globally_valid()));
    assert!(model.output().contains("[95,95]"));
}

#[test]
fn saved_pose_reads_back() {
    let mut session = Session::sample(Rc::new(HoleChecker)).unwrap();
    session.press(Point::new(59.0, 70.0), 2.0);
    session.drag_to(Point::new(60.4, 70.4));
    session.release();

    let path = std::env::temp_dir().join(format!("pose-editor-{}.json", std::process::id()));
    session.save_pose_file(&path).unwrap();
    let pose = read_pose_from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(pose.vertices[5], [60, 70]);
    assert_eq!(pose, session.model().pose());

    let mut other = Session::from_text(SAMPLE_PROBLEM, Rc::new(HoleChecker)).unwrap();
    other.load_pose(&pose).unwrap();
    assert_eq!(other.model().output(), session.model().output());
}
