use crate::point::{grid_squared_distance, squared_distance, Point};
use crate::vertex::{Vertex, VertexId};

pub type EdgeId = usize;

/// Epsilon is given in parts per `SCALE` of the squared length.
pub const SCALE: i64 = 1_000_000;

/// How an edge's current length compares to its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stretch {
    Ok,
    TooShort,
    TooLong,
}

impl Stretch {
    pub fn is_ok(self) -> bool {
        self == Stretch::Ok
    }

    fn judge(ok: bool, shorter: bool) -> Self {
        if ok {
            Stretch::Ok
        } else if shorter {
            Stretch::TooShort
        } else {
            Stretch::TooLong
        }
    }
}

/// `|SCALE·d2_now − SCALE·d2_orig| <= d2_orig·epsilon`, evaluated exactly.
pub fn within_tolerance(d2_now: i64, d2_orig: i64, epsilon: i64) -> bool {
    let scale = SCALE as i128;
    let deviation = (scale * d2_now as i128 - scale * d2_orig as i128).abs();
    deviation <= d2_orig as i128 * epsilon as i128
}

/// Classifies the squared length between two grid points.
pub fn classify_exact(d2_now: i64, d2_orig: i64, epsilon: i64) -> Stretch {
    Stretch::judge(within_tolerance(d2_now, d2_orig, epsilon), d2_now < d2_orig)
}

/// Classifies a sub-grid length seen mid-drag, in floating point.
pub fn classify(d2_now: f64, d2_orig: i64, epsilon: i64) -> Stretch {
    let scale = SCALE as f64;
    let ok = (scale * d2_now - scale * d2_orig as f64).abs() <= d2_orig as f64 * epsilon as f64;
    Stretch::judge(ok, d2_now < d2_orig as f64)
}

/// Ring of positions around a fixed endpoint that keeps one edge in tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annulus {
    pub center: Point,
    pub inner: f64,
    pub outer: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    ends: (VertexId, VertexId),
    epsilon: i64,
    original_squared_length: i64,
    stretch: Stretch,
    globally_valid: bool,
}

impl Edge {
    /// Captures the baseline from the endpoints' grid positions right now.
    pub fn new(ends: (VertexId, VertexId), epsilon: i64, vertices: &[Vertex]) -> Self {
        let d2 = grid_squared_distance(
            vertices[ends.0].pos().to_grid(),
            vertices[ends.1].pos().to_grid(),
        );
        let mut edge = Edge {
            ends,
            epsilon,
            original_squared_length: d2,
            stretch: Stretch::Ok,
            globally_valid: true,
        };
        edge.recompute(vertices);
        edge
    }

    pub fn ends(&self) -> (VertexId, VertexId) {
        self.ends
    }

    pub fn epsilon(&self) -> i64 {
        self.epsilon
    }

    pub fn original_squared_length(&self) -> i64 {
        self.original_squared_length
    }

    pub fn current_squared_length(&self, vertices: &[Vertex]) -> f64 {
        squared_distance(vertices[self.ends.0].pos(), vertices[self.ends.1].pos())
    }

    pub fn recompute(&mut self, vertices: &[Vertex]) {
        let (a, b) = (vertices[self.ends.0].pos(), vertices[self.ends.1].pos());
        self.stretch = if a.is_integral() && b.is_integral() {
            let d2_now = grid_squared_distance(a.to_grid(), b.to_grid());
            classify_exact(d2_now, self.original_squared_length, self.epsilon)
        } else {
            classify(squared_distance(a, b), self.original_squared_length, self.epsilon)
        };
        self.globally_valid = true;
    }

    pub fn stretch(&self) -> Stretch {
        self.stretch
    }

    pub fn is_valid(&self) -> bool {
        self.stretch.is_ok()
    }

    pub fn globally_valid(&self) -> bool {
        self.globally_valid
    }

    pub(crate) fn set_globally_valid(&mut self, ok: bool) {
        self.globally_valid = ok;
    }

    /// Draw order: higher priorities go on top.
    pub fn priority(&self) -> u8 {
        if !self.globally_valid {
            2
        } else if !self.stretch.is_ok() {
            1
        } else {
            0
        }
    }

    pub fn other_end(&self, vertex: VertexId) -> Option<VertexId> {
        match self.ends {
            (a, b) if a == vertex => Some(b),
            (a, b) if b == vertex => Some(a),
            _ => None,
        }
    }

    /// Where `vertex` could go to keep this edge valid, with the other
    /// endpoint held still. `None` if `vertex` is not an endpoint.
    pub fn hint_for(&self, vertex: VertexId, vertices: &[Vertex]) -> Option<Annulus> {
        let fixed = self.other_end(vertex)?;
        let d2 = self.original_squared_length as f64;
        let e = self.epsilon as f64 / SCALE as f64;
        Some(Annulus {
            center: vertices[fixed].pos(),
            inner: (d2 * (1.0 - e)).max(0.0).sqrt(),
            outer: (d2 * (1.0 + e)).sqrt(),
        })
    }
}
