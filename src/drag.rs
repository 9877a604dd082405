use tracing::debug;

use crate::edge::Annulus;
use crate::model::{Cascade, PoseModel};
use crate::point::{GridPoint, Point};
use crate::vertex::VertexId;

/// A unit grid step, as bound to the arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    pub fn delta(self) -> GridPoint {
        match self {
            Direction::Left => [-1, 0],
            Direction::Up => [0, -1],
            Direction::Right => [1, 0],
            Direction::Down => [0, 1],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        vertex: VertexId,
        // Where the pointer grabbed the vertex, relative to its centre.
        grab: Point,
        hints: Vec<Annulus>,
    },
}

/// Turns pointer events into vertex moves. One vertex at a time.
#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    last_dragged: Option<VertexId>,
}

impl Default for DragController {
    fn default() -> Self {
        Self {
            state: DragState::Idle,
            last_dragged: None,
        }
    }
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn active(&self) -> Option<VertexId> {
        match self.state {
            DragState::Dragging { vertex, .. } => Some(vertex),
            DragState::Idle => None,
        }
    }

    /// Feasibility hints for the vertex being dragged, empty when idle.
    pub fn hints(&self) -> &[Annulus] {
        match &self.state {
            DragState::Dragging { hints, .. } => hints,
            DragState::Idle => &[],
        }
    }

    pub fn last_dragged(&self) -> Option<VertexId> {
        self.last_dragged
    }

    /// Starts dragging whatever vertex is under the pointer. Ignored while
    /// another drag is active.
    pub fn press(&mut self, model: &PoseModel, at: Point, hit_radius: f64) -> Option<VertexId> {
        if self.active().is_some() {
            return None;
        }
        let vertex = model.vertex_at(at, hit_radius)?;
        self.begin(model, vertex, at);
        Some(vertex)
    }

    pub fn begin(&mut self, model: &PoseModel, vertex: VertexId, at: Point) {
        let hints = model.hints_for(vertex);
        debug!(vertex, hints = hints.len(), "drag start");
        self.state = DragState::Dragging {
            vertex,
            grab: model.vertices()[vertex].pos() - at,
            hints,
        };
    }

    /// Follows the pointer without rounding. Returns false when idle.
    pub fn drag_to(&mut self, model: &mut PoseModel, at: Point) -> bool {
        match self.state {
            DragState::Dragging { vertex, grab, .. } => {
                model.track_vertex(vertex, at + grab);
                true
            }
            DragState::Idle => false,
        }
    }

    /// Drops the vertex onto the grid and revalidates the whole pose.
    pub fn release(&mut self, model: &mut PoseModel) -> Option<VertexId> {
        let vertex = self.active()?;
        self.state = DragState::Idle;
        model.update_vertex(vertex, Cascade::Edges);
        model.refresh();
        self.last_dragged = Some(vertex);
        debug!(vertex, pos = ?model.vertices()[vertex].pos(), "drag end");
        Some(vertex)
    }

    /// Moves the most recently dragged vertex one step.
    pub fn nudge(&mut self, model: &mut PoseModel, direction: Direction) -> bool {
        match self.last_dragged {
            Some(vertex) => {
                model.nudge(vertex, direction.delta());
                true
            }
            None => false,
        }
    }

    /// Drops any drag in progress without touching the model.
    pub fn abandon(&mut self) {
        self.state = DragState::Idle;
    }

    /// Forgets everything, for when the model is replaced.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
        self.last_dragged = None;
    }
}
