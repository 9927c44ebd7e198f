//! Shape tessellation for 2D primitives
//!
//! Every shape becomes a plain triangle list appended to a caller-owned
//! buffer, so a whole frame ends up in one draw call.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Segments used for circles unless a caller needs something else
pub const CIRCLE_SEGMENTS: u32 = 32;

/// Two triangles covering a quad given in winding order
fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: [f32; 4]) {
    let [a, b, c, d] = corners;
    out.extend_from_slice(&[
        Vertex::at(a, color),
        Vertex::at(b, color),
        Vertex::at(c, color),
        Vertex::at(a, color),
        Vertex::at(c, color),
        Vertex::at(d, color),
    ]);
}

/// Filled axis-aligned rectangle
pub fn rect(out: &mut Vec<Vertex>, r: &Rect, color: [f32; 4]) {
    if r.w <= 0.0 || r.h <= 0.0 {
        return;
    }
    quad(
        out,
        [
            Vec2::new(r.x, r.y),
            Vec2::new(r.right(), r.y),
            Vec2::new(r.right(), r.bottom()),
            Vec2::new(r.x, r.bottom()),
        ],
        color,
    );
}

/// Stroke centred on the edge of `r`, `width` pixels wide
pub fn rect_outline(out: &mut Vec<Vertex>, r: &Rect, width: f32, color: [f32; 4]) {
    let half = width / 2.0;
    let outer = Rect::new(r.x - half, r.y - half, r.w + width, r.h + width);
    // Top and bottom bands span the full outer width, sides fill between them
    rect(out, &Rect::new(outer.x, outer.y, outer.w, width), color);
    rect(out, &Rect::new(outer.x, outer.bottom() - width, outer.w, width), color);
    rect(
        out,
        &Rect::new(outer.x, outer.y + width, width, outer.h - 2.0 * width),
        color,
    );
    rect(
        out,
        &Rect::new(outer.right() - width, outer.y + width, width, outer.h - 2.0 * width),
        color,
    );
}

fn on_circle(center: Vec2, radius: f32, i: u32, segments: u32) -> Vec2 {
    let theta = (i as f32 / segments as f32) * TAU;
    center + Vec2::new(theta.cos(), theta.sin()) * radius
}

/// Filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    if segments < 3 || radius <= 0.0 {
        return;
    }
    out.reserve((segments * 3) as usize);
    for i in 0..segments {
        out.push(Vertex::at(center, color));
        out.push(Vertex::at(on_circle(center, radius, i, segments), color));
        out.push(Vertex::at(on_circle(center, radius, i + 1, segments), color));
    }
}

/// Annulus between `inner_radius` and `outer_radius`
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    if segments < 3 || outer_radius <= inner_radius {
        return;
    }
    let inner_radius = inner_radius.max(0.0);
    out.reserve((segments * 6) as usize);
    for i in 0..segments {
        quad(
            out,
            [
                on_circle(center, inner_radius, i, segments),
                on_circle(center, outer_radius, i, segments),
                on_circle(center, outer_radius, i + 1, segments),
                on_circle(center, inner_radius, i + 1, segments),
            ],
            color,
        );
    }
}
