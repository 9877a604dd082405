use crate::edge::EdgeId;
use crate::point::{GridPoint, Point};

pub type VertexId = usize;

/// A figure vertex. Its id is its index in the figure's vertex list.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pos: Point,
    at_corner: bool,
    globally_valid: bool,
    edges: Vec<EdgeId>,
}

impl Vertex {
    pub fn new(pos: GridPoint, hole: &[GridPoint]) -> Self {
        let mut vertex = Vertex {
            pos: Point::from_grid(pos),
            at_corner: false,
            globally_valid: true,
            edges: vec![],
        };
        vertex.settle(hole);
        vertex
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Moves the vertex without rounding or touching any derived state.
    pub fn set_pos(&mut self, pos: Point) {
        self.pos = pos;
    }

    /// Rounds the position onto the grid and recomputes the corner flag.
    pub fn settle(&mut self, hole: &[GridPoint]) {
        self.pos = self.pos.rounded();
        self.track(hole);
    }

    /// Recomputes derived state for an unrounded live position.
    pub fn track(&mut self, hole: &[GridPoint]) {
        self.at_corner = is_hole_corner(hole, self.pos.to_grid());
        self.globally_valid = true;
    }

    /// Whether the rounded position coincides with a hole corner.
    pub fn at_corner(&self) -> bool {
        self.at_corner
    }

    pub fn globally_valid(&self) -> bool {
        self.globally_valid
    }

    pub(crate) fn set_globally_valid(&mut self, ok: bool) {
        self.globally_valid = ok;
    }

    /// Incident edges, fixed once the figure is built.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub(crate) fn attach(&mut self, edge: EdgeId) {
        self.edges.push(edge);
    }
}

pub fn is_hole_corner(hole: &[GridPoint], p: GridPoint) -> bool {
    hole.iter().any(|&corner| corner == p)
}
