//! Contract of the optional geometry module.
//!
//! The editor itself only checks edge lengths. Anything that needs the hole
//! polygon (containment, boundary crossings, scoring) comes from a
//! [`GeometryModule`]. The pose model is handed one at construction: either a
//! working checker or [`Absent`], whose authoritative answers are all `None`.

use crate::error::Result;
use crate::problem::{self, Pose, Problem};

/// Per-element results of the authoritative solution check, index-aligned
/// with the figure's vertices and edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    pub vertices: Vec<bool>,
    pub edges: Vec<bool>,
}

impl Verdict {
    pub fn all_ok(&self) -> bool {
        self.vertices.iter().chain(self.edges.iter()).all(|&ok| ok)
    }

    pub fn invalid_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|&(_, &ok)| !ok)
            .map(|(i, _)| i)
    }

    pub fn invalid_vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|&(_, &ok)| !ok)
            .map(|(i, _)| i)
    }
}

/// Precomputed scoring helper bound to one problem.
pub trait PoseScorer {
    fn test_pose(&self, pose: &Pose) -> i64;
}

pub trait GeometryModule {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }

    fn parse_problem(&self, text: &str) -> Result<Problem> {
        problem::parse_problem_json(text)
    }

    fn parse_pose(&self, text: &str) -> Result<Pose> {
        problem::parse_pose_json(text)
    }

    fn serialize_pose(&self, pose: &Pose) -> Result<String> {
        problem::pose_to_json(pose)
    }

    /// `None` when this module cannot judge the pose.
    fn check_solution(&self, problem: &Problem, pose: &Pose) -> Option<Verdict>;

    fn dislikes(&self, problem: &Problem, pose: &Pose) -> Option<i64>;

    fn pose_scorer(&self, problem: &Problem) -> Option<Box<dyn PoseScorer>>;
}

/// Stand-in used when no geometry module is available. Parsing falls back to
/// plain JSON, every authoritative query answers `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Absent;

impl GeometryModule for Absent {
    fn name(&self) -> &str {
        "absent"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn check_solution(&self, _problem: &Problem, _pose: &Pose) -> Option<Verdict> {
        None
    }

    fn dislikes(&self, _problem: &Problem, _pose: &Pose) -> Option<i64> {
        None
    }

    fn pose_scorer(&self, _problem: &Problem) -> Option<Box<dyn PoseScorer>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::HoleChecker;
    use crate::problem::{SAMPLE_POSE, SAMPLE_PROBLEM};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn absent_module_answers_nothing() {
        let problem = Absent.parse_problem(SAMPLE_PROBLEM).unwrap();
        let pose = Absent.parse_pose(SAMPLE_POSE).unwrap();
        assert!(!Absent.is_available());
        assert!(Absent.check_solution(&problem, &pose).is_none());
        assert!(Absent.dislikes(&problem, &pose).is_none());
        assert!(Absent.pose_scorer(&problem).is_none());
    }

    #[test]
    fn absent_module_round_trips_poses() {
        let pose = Absent.parse_pose(SAMPLE_POSE).unwrap();
        let text = Absent.serialize_pose(&pose).unwrap();
        assert_eq!(text, SAMPLE_POSE);
        assert_eq!(Absent.parse_pose(&text).unwrap(), pose);
    }

    #[test]
    fn random_poses_survive_serialization() {
        let modules: [&dyn GeometryModule; 2] = [&Absent, &HoleChecker];
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..500 {
            let len = rng.gen_range(0..40);
            let wide = rng.gen_bool(0.2);
            let vertices = (0..len)
                .map(|_| {
                    if wide {
                        [rng.gen::<i64>(), rng.gen::<i64>()]
                    } else {
                        [rng.gen_range(-1000..1000), rng.gen_range(-1000..1000)]
                    }
                })
                .collect();
            let pose = Pose { vertices };
            for module in modules.iter() {
                let text = module.serialize_pose(&pose).unwrap();
                assert_eq!(module.parse_pose(&text).unwrap(), pose, "{}", text);
            }
        }
    }

    #[test]
    fn verdict_lists_failures() {
        let verdict = Verdict {
            vertices: vec![true, false, true],
            edges: vec![false, true],
        };
        assert!(!verdict.all_ok());
        assert_eq!(verdict.invalid_vertices().collect::<Vec<_>>(), vec![1]);
        assert_eq!(verdict.invalid_edges().collect::<Vec<_>>(), vec![0]);
    }
}
