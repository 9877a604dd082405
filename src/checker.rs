//! Integer geometry implementation of [`GeometryModule`].

use itertools::Itertools;
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
use tracing::warn;

use crate::edge::{within_tolerance, SCALE};
use crate::geometry::{GeometryModule, PoseScorer, Verdict};
use crate::point::{grid_squared_distance, GridPoint};
use crate::problem::{Pose, Problem};

fn cross(o: GridPoint, a: GridPoint, b: GridPoint) -> i64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn on_segment(p: GridPoint, a: GridPoint, b: GridPoint) -> bool {
    cross(a, b, p) == 0
        && a[0].min(b[0]) <= p[0]
        && p[0] <= a[0].max(b[0])
        && a[1].min(b[1]) <= p[1]
        && p[1] <= a[1].max(b[1])
}

/// True if the open segments cross at a single interior point.
fn properly_crosses(a: (GridPoint, GridPoint), b: (GridPoint, GridPoint)) -> bool {
    let d1 = cross(b.0, b.1, a.0).signum();
    let d2 = cross(b.0, b.1, a.1).signum();
    let d3 = cross(a.0, a.1, b.0).signum();
    let d4 = cross(a.0, a.1, b.1).signum();
    d1 * d2 < 0 && d3 * d4 < 0
}

/// Inside or on the boundary of the polygon.
pub fn contains_point(hole: &[GridPoint], p: GridPoint) -> bool {
    if hole.is_empty() {
        return false;
    }
    let mut c = false;
    for (&a, &b) in hole.iter().circular_tuple_windows() {
        if on_segment(p, a, b) {
            return true;
        }
        if (a[1] <= p[1]) != (b[1] <= p[1]) {
            // Is p left of where this edge crosses the horizontal through p?
            let lhs = (p[0] - a[0]) * (b[1] - a[1]);
            let rhs = (b[0] - a[0]) * (p[1] - a[1]);
            if (b[1] > a[1] && lhs < rhs) || (b[1] < a[1] && lhs > rhs) {
                c = !c;
            }
        }
    }
    c
}

/// Whether the whole segment stays inside the polygon, boundary included.
pub fn contains_segment(hole: &[GridPoint], a: GridPoint, b: GridPoint) -> bool {
    if !contains_point(hole, a) || !contains_point(hole, b) {
        return false;
    }
    if hole
        .iter()
        .circular_tuple_windows()
        .any(|(&p, &q)| properly_crosses((a, b), (p, q)))
    {
        return false;
    }
    // The segment can still leave through corners. Split it at every corner it
    // touches and test the middle of each piece, in doubled coordinates so the
    // midpoints stay on the grid.
    let dir = [b[0] - a[0], b[1] - a[1]];
    let along = |p: GridPoint| (p[0] - a[0]) * dir[0] + (p[1] - a[1]) * dir[1];
    let cuts: Vec<GridPoint> = hole
        .iter()
        .copied()
        .filter(|&c| c != a && c != b && on_segment(c, a, b))
        .chain([a, b].iter().copied())
        .sorted_by_key(|&p| along(p))
        .dedup()
        .collect();
    let doubled: Vec<GridPoint> = hole.iter().map(|p| [2 * p[0], 2 * p[1]]).collect();
    cuts.iter()
        .tuple_windows()
        .all(|(u, v)| contains_point(&doubled, [u[0] + v[0], u[1] + v[1]]))
}

/// Sum over hole corners of the squared distance to the closest vertex.
pub fn calc_dislikes(hole: &[GridPoint], vertices: &[GridPoint]) -> i64 {
    hole.iter()
        .map(|&h| {
            vertices
                .iter()
                .map(|&v| grid_squared_distance(h, v))
                .min()
                .unwrap_or(0)
        })
        .fold(0, i64::saturating_add)
}

/// The full placement rules: every vertex inside the hole, every edge inside
/// the hole and within the length tolerance of the puzzle's figure.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoleChecker;

impl GeometryModule for HoleChecker {
    fn name(&self) -> &str {
        "hole-checker"
    }

    fn check_solution(&self, problem: &Problem, pose: &Pose) -> Option<Verdict> {
        let figure = &problem.figure;
        if let Err(e) = problem.validate().and_then(|()| pose.validate()) {
            warn!("not judging pose: {}", e);
            return None;
        }
        if pose.vertices.len() != figure.vertices.len() {
            warn!(
                expected = figure.vertices.len(),
                found = pose.vertices.len(),
                "pose does not match figure"
            );
            return None;
        }
        let vertices = pose
            .vertices
            .iter()
            .map(|&v| contains_point(&problem.hole, v))
            .collect();
        let edges = figure
            .edges
            .iter()
            .map(|&(i, j)| {
                let d2_orig = grid_squared_distance(figure.vertices[i], figure.vertices[j]);
                let (a, b) = (pose.vertices[i], pose.vertices[j]);
                within_tolerance(grid_squared_distance(a, b), d2_orig, problem.epsilon)
                    && contains_segment(&problem.hole, a, b)
            })
            .collect();
        Some(Verdict { vertices, edges })
    }

    fn dislikes(&self, problem: &Problem, pose: &Pose) -> Option<i64> {
        Some(calc_dislikes(&problem.hole, &pose.vertices))
    }

    fn pose_scorer(&self, problem: &Problem) -> Option<Box<dyn PoseScorer>> {
        Some(Box::new(AllPairDist::from_problem(problem)))
    }
}

/// Longest distance two vertices can be apart while every edge on some path
/// between them stays within tolerance.
#[derive(Debug, Clone)]
pub struct AllPairDist {
    n: usize,
    dist: Vec<f64>,
}

impl AllPairDist {
    pub fn from_problem(problem: &Problem) -> Self {
        let figure = &problem.figure;
        let n = figure.vertices.len();
        let mut dist = vec![f64::INFINITY; n * n];
        for i in 0..n {
            dist[i * n + i] = 0.0;
        }
        let stretch = 1.0 + problem.epsilon as f64 / SCALE as f64;
        for &(i, j) in &figure.edges {
            let d2 = grid_squared_distance(figure.vertices[i], figure.vertices[j]) as f64;
            let w = (d2 * stretch).sqrt();
            if w < dist[i * n + j] {
                dist[i * n + j] = w;
                dist[j * n + i] = w;
            }
        }
        for k in 0..n {
            for i in 0..n {
                let ik = dist[i * n + k];
                if ik.is_infinite() {
                    continue;
                }
                for j in 0..n {
                    let via = ik + dist[k * n + j];
                    if via < dist[i * n + j] {
                        dist[i * n + j] = via;
                    }
                }
            }
        }
        AllPairDist { n, dist }
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.dist[i * self.n + j]
    }
}

impl PoseScorer for AllPairDist {
    /// Number of vertex pairs placed further apart than the figure allows.
    fn test_pose(&self, pose: &Pose) -> i64 {
        let n = self.n.min(pose.vertices.len());
        let row = |i: usize| {
            ((i + 1)..n)
                .filter(|&j| {
                    let d = (grid_squared_distance(pose.vertices[i], pose.vertices[j]) as f64).sqrt();
                    d > self.distance(i, j) + 1e-9
                })
                .count()
        };
        #[cfg(not(target_arch = "wasm32"))]
        let violations: usize = (0..n).into_par_iter().map(row).sum();
        #[cfg(target_arch = "wasm32")]
        let violations: usize = (0..n).map(row).sum();
        violations as i64
    }
}
