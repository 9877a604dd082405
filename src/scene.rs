//! What to draw for the current model, rebuilt from scratch every frame.
//! Each sprite carries the id of the entity it shows; the model never holds
//! anything visual.

use eframe::egui::Color32;

use crate::drag::DragController;
use crate::edge::{Annulus, Edge, EdgeId, Stretch};
use crate::model::PoseModel;
use crate::point::Point;
use crate::vertex::{Vertex, VertexId};

pub fn background() -> Color32 {
    Color32::from_rgb(0x99, 0x99, 0x99)
}

pub fn hole_stroke() -> Color32 {
    Color32::WHITE
}

pub fn hint_fill() -> Color32 {
    Color32::from_rgba_unmultiplied(0x00, 0x00, 0xff, 51)
}

pub fn globally_invalid() -> Color32 {
    Color32::from_rgb(0x80, 0x00, 0x80)
}

pub fn edge_color(edge: &Edge) -> Color32 {
    if !edge.globally_valid() {
        return globally_invalid();
    }
    match edge.stretch() {
        Stretch::Ok => Color32::from_rgb(0x00, 0x00, 0xff),
        Stretch::TooShort => Color32::from_rgb(0xcc, 0xcc, 0x00),
        Stretch::TooLong => Color32::from_rgb(0xff, 0x00, 0x00),
    }
}

pub fn vertex_color(vertex: &Vertex) -> Color32 {
    if !vertex.globally_valid() {
        globally_invalid()
    } else if vertex.at_corner() {
        Color32::from_rgb(0x00, 0xff, 0x00)
    } else {
        Color32::from_rgb(0x00, 0x80, 0x00)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSprite {
    pub id: EdgeId,
    pub from: Point,
    pub to: Point,
    pub color: Color32,
    pub priority: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexSprite {
    pub id: VertexId,
    pub center: Point,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CornerLabel {
    pub index: usize,
    pub at: Point,
}

/// Drawn back to front: hole, edges (by priority), corner labels, vertices,
/// then the drag hints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub hole: Vec<Point>,
    pub edges: Vec<EdgeSprite>,
    pub corners: Vec<CornerLabel>,
    pub vertices: Vec<VertexSprite>,
    pub hints: Vec<Annulus>,
}

impl Scene {
    pub fn build(model: &PoseModel, drag: &DragController) -> Self {
        let vertices = model.vertices();
        let mut edges: Vec<EdgeSprite> = model
            .edges()
            .iter()
            .enumerate()
            .map(|(id, edge)| {
                let (a, b) = edge.ends();
                EdgeSprite {
                    id,
                    from: vertices[a].pos(),
                    to: vertices[b].pos(),
                    color: edge_color(edge),
                    priority: edge.priority(),
                }
            })
            .collect();
        // Stable, so equal priorities keep figure order.
        edges.sort_by_key(|e| e.priority);

        Scene {
            hole: model.hole().iter().map(|&p| Point::from_grid(p)).collect(),
            edges,
            corners: model
                .corner_labels()
                .map(|(index, p)| CornerLabel {
                    index,
                    at: Point::from_grid(p),
                })
                .collect(),
            vertices: vertices
                .iter()
                .enumerate()
                .map(|(id, v)| VertexSprite {
                    id,
                    center: v.pos(),
                    color: vertex_color(v),
                })
                .collect(),
            hints: drag.hints().to_vec(),
        }
    }
}
