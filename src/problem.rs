use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{EditorError, Result};
use crate::point::{in_range, GridPoint, MAX_COORDINATE};

pub type Hole = Vec<GridPoint>;

fn check_coordinates(points: &[GridPoint]) -> Result<()> {
    match points.iter().find(|&&p| !in_range(p)) {
        Some(p) => Err(EditorError::CoordinateOutOfRange {
            value: if p[0].abs() > MAX_COORDINATE { p[0] } else { p[1] },
            limit: MAX_COORDINATE,
        }),
        None => Ok(()),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct Figure {
    pub vertices: Vec<GridPoint>,
    pub edges: Vec<(usize, usize)>,
}

/// Metadata added by our own problem preprocessing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Eq, PartialEq)]
pub struct Internal {
    #[serde(default)]
    pub reversed_hole: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct Problem {
    pub hole: Hole,
    pub epsilon: i64,
    pub figure: Figure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<Internal>,
}

impl Problem {
    pub fn reversed_hole(&self) -> bool {
        self.internal.as_ref().map_or(false, |i| i.reversed_hole)
    }

    /// Checks the structural invariants the editor relies on.
    pub fn validate(&self) -> Result<()> {
        if self.hole.is_empty() {
            return Err(EditorError::EmptyHole);
        }
        check_coordinates(&self.hole)?;
        check_coordinates(&self.figure.vertices)?;
        let vertex_count = self.figure.vertices.len();
        for (edge, &(a, b)) in self.figure.edges.iter().enumerate() {
            for index in [a, b].iter().copied() {
                if index >= vertex_count {
                    return Err(EditorError::EdgeIndexOutOfRange {
                        edge,
                        index,
                        vertex_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// The figure as given, i.e. the pose the puzzle starts from.
    pub fn initial_pose(&self) -> Pose {
        Pose {
            vertices: self.figure.vertices.clone(),
        }
    }
}

/// One position per figure vertex, in figure order. Also the solution format.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Eq, PartialEq)]
pub struct Pose {
    pub vertices: Vec<GridPoint>,
}

impl Pose {
    pub fn validate(&self) -> Result<()> {
        check_coordinates(&self.vertices)
    }
}

pub fn parse_problem_json(text: &str) -> Result<Problem> {
    Ok(serde_json::from_str(text)?)
}

pub fn parse_pose_json(text: &str) -> Result<Pose> {
    Ok(serde_json::from_str(text)?)
}

pub fn pose_to_json(pose: &Pose) -> Result<String> {
    Ok(serde_json::to_string(pose)?)
}

pub fn read_pose_from_file<P: AsRef<Path>>(path: P) -> Result<Pose> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_pose_to_file<P: AsRef<Path>>(path: P, pose: &Pose) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer(&file, pose)?;
    Ok(())
}

// Problem 1, used when nothing else is configured.
pub const SAMPLE_PROBLEM: &str = r#"{"hole":[[45,80],[35,95],[5,95],[35,50],[5,5],[35,5],[95,95],[65,95],[55,80]],"epsilon":150000,"figure":{"edges":[[2,5],[5,4],[4,1],[1,0],[0,8],[8,3],[3,7],[7,11],[11,13],[13,12],[12,18],[18,19],[19,14],[14,15],[15,17],[17,16],[16,10],[10,6],[6,2],[8,12],[7,9],[9,3],[8,9],[9,12],[13,9],[9,11],[4,8],[12,14],[5,10],[10,15]],"vertices":[[20,30],[20,40],[30,95],[40,15],[40,35],[40,65],[40,95],[45,5],[45,25],[50,15],[50,70],[55,5],[55,25],[60,15],[60,35],[60,65],[60,95],[70,95],[80,30],[80,40]]}}"#;

pub const SAMPLE_POSE: &str = r#"{"vertices":[[35,51],[40,60],[83,93],[34,25],[48,40],[59,70],[73,92],[29,15],[44,29],[40,18],[49,76],[36,7],[34,27],[30,17],[32,38],[40,69],[27,94],[17,93],[11,13],[18,21]]}"#;
