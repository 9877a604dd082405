//! The pose model: hole, figure vertices and edges of one loaded puzzle, plus
//! whatever the geometry module last said about the current pose.

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::edge::{Annulus, Edge, EdgeId};
use crate::error::{EditorError, Result};
use crate::geometry::{GeometryModule, PoseScorer, Verdict};
use crate::point::{squared_distance, GridPoint, Point};
use crate::problem::{Hole, Pose, Problem};
use crate::vertex::{Vertex, VertexId};

/// Whether a vertex update also recomputes the incident edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cascade {
    Edges,
    /// Used by batch moves, which must call
    /// [`PoseModel::recompute_edges`] and [`PoseModel::refresh`] afterwards.
    Deferred,
}

/// Results of the last [`PoseModel::refresh`].
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub output: String,
    pub verdict: Option<Verdict>,
    pub dislikes: Option<i64>,
    pub score: Option<i64>,
}

pub struct PoseModel {
    problem: Problem,
    // Corners in the puzzle's own order, used for labels and corner snapping.
    corners: Hole,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    epsilon: i64,
    geometry: Rc<dyn GeometryModule>,
    scorer: Option<Box<dyn PoseScorer>>,
    report: Report,
}

impl std::fmt::Debug for PoseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseModel")
            .field("vertices", &self.vertices.len())
            .field("edges", &self.edges.len())
            .field("epsilon", &self.epsilon)
            .field("geometry", &self.geometry.name())
            .finish()
    }
}

impl PoseModel {
    pub fn new(problem: Problem, geometry: Rc<dyn GeometryModule>) -> Result<Self> {
        problem.validate()?;

        let mut corners = problem.hole.clone();
        if problem.reversed_hole() {
            corners.reverse();
        }
        let mut vertices: Vec<Vertex> = problem
            .figure
            .vertices
            .iter()
            .map(|&p| Vertex::new(p, &corners))
            .collect();
        let epsilon = problem.epsilon;
        let mut edges = Vec::with_capacity(problem.figure.edges.len());
        for (id, &(i, j)) in problem.figure.edges.iter().enumerate() {
            vertices[i].attach(id);
            vertices[j].attach(id);
            edges.push(Edge::new((i, j), epsilon, &vertices));
        }
        let scorer = geometry.pose_scorer(&problem);

        info!(
            hole = problem.hole.len(),
            vertices = vertices.len(),
            edges = edges.len(),
            epsilon,
            geometry = geometry.name(),
            "loaded problem"
        );
        let mut model = PoseModel {
            problem,
            corners,
            vertices,
            edges,
            epsilon,
            geometry,
            scorer,
            report: Report::default(),
        };
        model.refresh();
        Ok(model)
    }

    pub fn from_text(text: &str, geometry: Rc<dyn GeometryModule>) -> Result<Self> {
        let problem = geometry.parse_problem(text)?;
        PoseModel::new(problem, geometry)
    }

    /// The hole polygon as it is drawn.
    pub fn hole(&self) -> &[GridPoint] {
        &self.problem.hole
    }

    /// Corner index labels, numbered in the puzzle's original winding.
    pub fn corner_labels(&self) -> impl Iterator<Item = (usize, GridPoint)> + '_ {
        self.corners.iter().copied().enumerate()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn epsilon(&self) -> i64 {
        self.epsilon
    }

    pub fn geometry(&self) -> &dyn GeometryModule {
        self.geometry.as_ref()
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    /// The serialized pose from the last refresh.
    pub fn output(&self) -> &str {
        &self.report.output
    }

    pub fn pose(&self) -> Pose {
        Pose {
            vertices: self.vertices.iter().map(|v| v.pos().to_grid()).collect(),
        }
    }

    /// Rounds the vertex onto the grid and refreshes what depends on it.
    pub fn update_vertex(&mut self, id: VertexId, cascade: Cascade) {
        self.vertices[id].settle(&self.corners);
        if cascade == Cascade::Edges {
            self.recompute_incident(id);
        }
    }

    /// Moves a vertex to an unrounded live position, recomputing its incident
    /// edges but nothing global.
    pub fn track_vertex(&mut self, id: VertexId, pos: Point) {
        let vertex = &mut self.vertices[id];
        vertex.set_pos(pos);
        vertex.track(&self.corners);
        self.recompute_incident(id);
    }

    fn recompute_incident(&mut self, id: VertexId) {
        for &e in self.vertices[id].edges() {
            self.edges[e].recompute(&self.vertices);
        }
    }

    pub fn recompute_edges(&mut self) {
        for edge in &mut self.edges {
            edge.recompute(&self.vertices);
        }
    }

    /// Revalidates the whole pose and re-serializes it. Must follow every
    /// settled change to the pose.
    pub fn refresh(&mut self) {
        let pose = self.pose();

        let verdict = self.geometry.check_solution(&self.problem, &pose);
        for v in &mut self.vertices {
            v.set_globally_valid(true);
        }
        for e in &mut self.edges {
            e.set_globally_valid(true);
        }
        if let Some(verdict) = &verdict {
            for (v, &ok) in self.vertices.iter_mut().zip(&verdict.vertices) {
                v.set_globally_valid(ok);
            }
            for (e, &ok) in self.edges.iter_mut().zip(&verdict.edges) {
                e.set_globally_valid(ok);
            }
            debug!(
                invalid_vertices = verdict.invalid_vertices().count(),
                invalid_edges = verdict.invalid_edges().count(),
                "checked pose"
            );
        }
        self.report.verdict = verdict;
        self.report.dislikes = self.geometry.dislikes(&self.problem, &pose);
        self.report.score = self.scorer.as_ref().map(|s| s.test_pose(&pose));
        if let Some(score) = self.report.score {
            debug!(score, "all pair distance test");
        }

        match self.geometry.serialize_pose(&pose) {
            Ok(text) => self.report.output = text,
            Err(e) => warn!("could not serialize pose: {}", e),
        }
    }

    /// Repositions every vertex. Rejected without any change unless the pose
    /// has exactly one in-range position per figure vertex.
    pub fn load_pose(&mut self, pose: &Pose) -> Result<()> {
        pose.validate()?;
        if pose.vertices.len() != self.vertices.len() {
            warn!(
                expected = self.vertices.len(),
                found = pose.vertices.len(),
                "rejected pose"
            );
            return Err(EditorError::VertexCountMismatch {
                expected: self.vertices.len(),
                found: pose.vertices.len(),
            });
        }
        for (id, &p) in pose.vertices.iter().enumerate() {
            self.vertices[id].set_pos(Point::from_grid(p));
            self.update_vertex(id, Cascade::Deferred);
        }
        self.recompute_edges();
        self.refresh();
        info!(vertices = pose.vertices.len(), "loaded pose");
        Ok(())
    }

    pub fn load_pose_text(&mut self, text: &str) -> Result<()> {
        let pose = self.geometry.parse_pose(text)?;
        self.load_pose(&pose)
    }

    /// Shifts a vertex by a whole grid step and revalidates.
    pub fn nudge(&mut self, id: VertexId, [dx, dy]: GridPoint) {
        let [x, y] = self.vertices[id].pos().to_grid();
        self.vertices[id].set_pos(Point::from_grid([x + dx, y + dy]));
        self.update_vertex(id, Cascade::Edges);
        self.refresh();
    }

    /// The closest vertex within `radius` of `p`.
    pub fn vertex_at(&self, p: Point, radius: f64) -> Option<VertexId> {
        let r2 = radius * radius;
        self.vertices
            .iter()
            .enumerate()
            .map(|(id, v)| (id, squared_distance(v.pos(), p)))
            .filter(|&(_, d2)| d2 <= r2)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(id, _)| id)
    }

    /// One feasibility annulus per edge incident to `id`, each centred on the
    /// edge's other endpoint.
    pub fn hints_for(&self, id: VertexId) -> Vec<Annulus> {
        self.vertices[id]
            .edges()
            .iter()
            .filter_map(|&e| self.edges[e].hint_for(id, &self.vertices))
            .collect()
    }

    pub fn incident_edges(&self, id: VertexId) -> &[EdgeId] {
        self.vertices[id].edges()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::HoleChecker;
    use crate::edge::Stretch;
    use crate::geometry::Absent;
    use crate::problem::{parse_pose_json, parse_problem_json, SAMPLE_POSE, SAMPLE_PROBLEM};

    fn sample(geometry: Rc<dyn GeometryModule>) -> PoseModel {
        PoseModel::from_text(SAMPLE_PROBLEM, geometry).unwrap()
    }

    fn stretches(model: &PoseModel) -> Vec<Stretch> {
        model.edges().iter().map(|e| e.stretch()).collect()
    }

    #[test]
    fn fresh_figure_is_locally_valid() {
        let model = sample(Rc::new(Absent));
        assert_eq!(model.vertices().len(), 20);
        assert!(model.edges().iter().all(|e| e.is_valid()));
        assert_eq!(model.edges()[0].original_squared_length(), 1000);
        assert_eq!(model.output(), r#"{"vertices":[[20,30],[20,40],[30,95],[40,15],[40,35],[40,65],[40,95],[45,5],[45,25],[50,15],[50,70],[55,5],[55,25],[60,15],[60,35],[60,65],[60,95],[70,95],[80,30],[80,40]]}"#);
    }

    #[test]
    fn incident_edges_are_recorded() {
        let model = sample(Rc::new(Absent));
        // Vertex 5 appears in edges (2,5), (5,4) and (5,10).
        assert_eq!(model.incident_edges(5), &[0, 1, 28]);
        assert_eq!(model.hints_for(5).len(), 3);
    }

    #[test]
    fn sample_pose_is_locally_valid_without_geometry() {
        let mut model = sample(Rc::new(Absent));
        model.load_pose_text(SAMPLE_POSE).unwrap();
        assert!(model.edges().iter().all(|e| e.is_valid()));
        assert!(model.report().verdict.is_none());
        assert!(model.report().dislikes.is_none());
        assert!(model.report().score.is_none());
        assert_eq!(model.output(), SAMPLE_POSE);
    }

    #[test]
    fn moving_one_vertex_only_touches_its_edges() {
        let mut model = sample(Rc::new(Absent));
        // (30,95)-(41,66): 962 against 1000, within 15%.
        model.track_vertex(5, Point::new(41.0, 66.0));
        model.update_vertex(5, Cascade::Edges);
        assert_eq!(model.edges()[0].stretch(), Stretch::Ok);

        model.track_vertex(5, Point::new(40.0, 40.0));
        model.update_vertex(5, Cascade::Edges);
        assert_eq!(model.edges()[0].stretch(), Stretch::TooLong);
        // (40,40)-(40,35) is 25 against 900.
        assert_eq!(model.edges()[1].stretch(), Stretch::TooShort);
        assert_eq!(model.edges()[28].stretch(), Stretch::TooLong);
        let others = stretches(&model)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| ![0, 1, 28].contains(i))
            .all(|(_, s)| s == Stretch::Ok);
        assert!(others);
    }

    #[test]
    fn update_is_idempotent() {
        let mut model = sample(Rc::new(Absent));
        model.track_vertex(3, Point::new(42.6, 17.4));
        model.update_vertex(3, Cascade::Edges);
        let pos = model.vertices()[3].pos();
        let before = stretches(&model);
        model.update_vertex(3, Cascade::Edges);
        assert_eq!(model.vertices()[3].pos(), pos);
        assert_eq!(pos, Point::new(43.0, 17.0));
        assert_eq!(stretches(&model), before);
    }

    #[test]
    fn mismatched_pose_changes_nothing() {
        let mut model = sample(Rc::new(HoleChecker));
        model.load_pose_text(SAMPLE_POSE).unwrap();
        let positions: Vec<_> = model.vertices().iter().map(|v| v.pos()).collect();
        let before = stretches(&model);
        let output = model.output().to_owned();

        let short = Pose {
            vertices: vec![[0, 0]; 19],
        };
        match model.load_pose(&short) {
            Err(EditorError::VertexCountMismatch {
                expected: 20,
                found: 19,
            }) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(model.load_pose_text("{\"vertices\": [[1, 2],").is_err());

        let after: Vec<_> = model.vertices().iter().map(|v| v.pos()).collect();
        assert_eq!(after, positions);
        assert_eq!(stretches(&model), before);
        assert_eq!(model.output(), output);
    }

    #[test]
    fn far_away_pose_is_rejected_untouched() {
        let text = r#"{"hole":[[0,0],[10,0],[0,10]],"epsilon":0,
            "figure":{"vertices":[[0,0],[1,0]],"edges":[[0,1]]}}"#;
        let mut model = PoseModel::from_text(text, Rc::new(HoleChecker)).unwrap();
        let before = model.output().to_owned();
        let far = parse_pose_json(r#"{"vertices":[[0,0],[3500000000,0]]}"#).unwrap();
        assert!(matches!(
            model.load_pose(&far),
            Err(EditorError::CoordinateOutOfRange { .. })
        ));
        assert_eq!(model.output(), before);
        assert_eq!(model.vertices()[1].pos(), Point::new(1.0, 0.0));
    }

    #[test]
    fn geometry_verdict_marks_elements() {
        let model = sample(Rc::new(HoleChecker));
        let verdict = model.report().verdict.clone().unwrap();
        assert!(!verdict.all_ok());
        for (v, &ok) in model.vertices().iter().zip(&verdict.vertices) {
            assert_eq!(v.globally_valid(), ok);
        }
        for (e, &ok) in model.edges().iter().zip(&verdict.edges) {
            assert_eq!(e.globally_valid(), ok);
            if !ok {
                assert_eq!(e.priority(), 2);
            }
        }
    }

    #[test]
    fn valid_pose_clears_global_marks() {
        let mut model = sample(Rc::new(HoleChecker));
        assert!(model.edges().iter().any(|e| !e.globally_valid()));
        model.load_pose(&parse_pose_json(SAMPLE_POSE).unwrap()).unwrap();
        assert!(model.vertices().iter().all(|v| v.globally_valid()));
        assert!(model.edges().iter().all(|e| e.globally_valid()));
        assert_eq!(model.report().dislikes, Some(624));
        assert_eq!(model.report().score, Some(0));
    }

    #[test]
    fn nudge_moves_by_whole_steps() {
        let mut model = sample(Rc::new(Absent));
        model.nudge(0, [-1, 0]);
        model.nudge(0, [0, 1]);
        assert_eq!(model.vertices()[0].pos(), Point::new(19.0, 31.0));
        assert!(model.output().starts_with(r#"{"vertices":[[19,31],"#));
    }

    #[test]
    fn corner_flag_follows_the_hole() {
        let mut model = sample(Rc::new(Absent));
        assert!(!model.vertices()[2].at_corner());
        model.track_vertex(2, Point::new(35.2, 94.6));
        assert!(model.vertices()[2].at_corner());
        model.update_vertex(2, Cascade::Edges);
        assert_eq!(model.vertices()[2].pos(), Point::new(35.0, 95.0));
        assert!(model.vertices()[2].at_corner());
    }

    #[test]
    fn reversed_hole_numbers_corners_backwards() {
        let mut problem = parse_problem_json(SAMPLE_PROBLEM).unwrap();
        problem.internal = Some(crate::problem::Internal {
            reversed_hole: true,
        });
        let model = PoseModel::new(problem, Rc::new(Absent)).unwrap();
        let labels: Vec<_> = model.corner_labels().collect();
        assert_eq!(labels[0], (0, [55, 80]));
        assert_eq!(labels[8], (8, [45, 80]));
        assert_eq!(model.hole()[0], [45, 80]);
    }

    #[test]
    fn vertex_hit_test_picks_the_closest() {
        let model = sample(Rc::new(Absent));
        assert_eq!(model.vertex_at(Point::new(20.5, 30.5), 2.0), Some(0));
        assert_eq!(model.vertex_at(Point::new(20.0, 35.0), 2.0), None);
        assert_eq!(model.vertex_at(Point::new(20.0, 36.0), 5.0), Some(1));
    }
}
