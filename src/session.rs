//! The live puzzle: one pose model and the drag controller working on it.
//! Loading a new puzzle replaces both wholesale.

use std::path::Path;
use std::rc::Rc;

use tracing::{info, warn};

use crate::config::Settings;
use crate::drag::{Direction, DragController};
use crate::error::Result;
use crate::geometry::GeometryModule;
use crate::model::PoseModel;
use crate::point::Point;
use crate::problem::{self, Pose, Problem, SAMPLE_POSE, SAMPLE_PROBLEM};
use crate::vertex::VertexId;

pub struct Session {
    geometry: Rc<dyn GeometryModule>,
    model: PoseModel,
    drag: DragController,
}

impl Session {
    pub fn new(problem: Problem, geometry: Rc<dyn GeometryModule>) -> Result<Self> {
        let model = PoseModel::new(problem, geometry.clone())?;
        Ok(Session {
            geometry,
            model,
            drag: DragController::new(),
        })
    }

    pub fn from_text(text: &str, geometry: Rc<dyn GeometryModule>) -> Result<Self> {
        let problem = geometry.parse_problem(text)?;
        Session::new(problem, geometry)
    }

    /// The built-in sample problem with its sample pose applied.
    pub fn sample(geometry: Rc<dyn GeometryModule>) -> Result<Self> {
        let mut session = Session::from_text(SAMPLE_PROBLEM, geometry)?;
        session.load_pose_text(SAMPLE_POSE)?;
        Ok(session)
    }

    /// Opens whatever the settings point at, or the sample when they name
    /// no problem. A pose that does not fit is logged and skipped.
    pub fn open(settings: &Settings) -> Result<Self> {
        let geometry = settings.geometry_module();
        let mut session = match &settings.problem {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                Session::from_text(&text, geometry)?
            }
            None => Session::sample(geometry)?,
        };
        if let Some(path) = &settings.pose {
            if let Err(e) = session.load_pose_file(path) {
                warn!(path = %path.display(), "pose not loaded: {}", e);
            }
        }
        info!(
            vertices = session.model.vertices().len(),
            geometry = session.geometry.name(),
            "session open"
        );
        Ok(session)
    }

    pub fn model(&self) -> &PoseModel {
        &self.model
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn geometry(&self) -> &dyn GeometryModule {
        self.geometry.as_ref()
    }

    /// Replaces the puzzle. On error the current one stays untouched.
    pub fn load_problem(&mut self, problem: Problem) -> Result<()> {
        let model = PoseModel::new(problem, self.geometry.clone())?;
        if self.drag.active().is_some() {
            info!("abandoning drag for new problem");
        }
        self.model = model;
        self.drag.reset();
        Ok(())
    }

    pub fn load_problem_text(&mut self, text: &str) -> Result<()> {
        let problem = self.geometry.parse_problem(text)?;
        self.load_problem(problem)
    }

    pub fn load_problem_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        self.load_problem_text(&text)
    }

    /// Moves every vertex to the given pose, abandoning any drag.
    pub fn load_pose(&mut self, pose: &Pose) -> Result<()> {
        self.model.load_pose(pose)?;
        self.drag.abandon();
        Ok(())
    }

    pub fn load_pose_text(&mut self, text: &str) -> Result<()> {
        let pose = self.geometry.parse_pose(text)?;
        self.load_pose(&pose)
    }

    pub fn load_pose_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        self.load_pose_text(&text)
    }

    pub fn save_pose_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        problem::write_pose_to_file(&path, &self.model.pose())?;
        info!(path = %path.as_ref().display(), "saved pose");
        Ok(())
    }

    pub fn press(&mut self, at: Point, hit_radius: f64) -> Option<VertexId> {
        self.drag.press(&self.model, at, hit_radius)
    }

    pub fn drag_to(&mut self, at: Point) -> bool {
        self.drag.drag_to(&mut self.model, at)
    }

    pub fn release(&mut self) -> Option<VertexId> {
        self.drag.release(&mut self.model)
    }

    pub fn nudge(&mut self, direction: Direction) -> bool {
        let moved = self.drag.nudge(&mut self.model, direction);
        if !moved {
            warn!("nothing to nudge yet, drag a vertex first");
        }
        moved
    }
}
