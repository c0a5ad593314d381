//! Oriented box-box narrow phase.
//!
//! Separating-axis test over the four face normals, biased against
//! face switching (relative tolerance 0.95, absolute tolerance
//! 0.01 · half-extent), then Sutherland-Hodgman clipping of the
//! incident edge against the reference face's side planes. Survivors
//! behind the reference plane become contacts, at most two.

use glam::{Mat2, Vec2};
use marrow_body::Body;
use marrow_types::Scalar;

use crate::feature::{FeatureId, EDGE1, EDGE2, EDGE3, EDGE4, NO_EDGE};

/// Face-switch bias: keep the current axis unless a competitor beats
/// it by more than 5% plus a small absolute slack.
const RELATIVE_TOLERANCE: Scalar = 0.95;
const ABSOLUTE_TOLERANCE: Scalar = 0.01;

/// One clipped contact produced by [`collide`].
#[derive(Debug, Clone, Copy)]
pub struct RawContact {
    /// World position on the reference face.
    pub position: Vec2,
    /// Separating axis, pointing from body A toward body B.
    pub normal: Vec2,
    /// Signed distance along the axis; negative when penetrating.
    pub separation: Scalar,
    /// Feature id, already flipped into A-reference convention.
    pub feature: FeatureId,
}

#[derive(Debug, Clone, Copy, Default)]
struct ClipVertex {
    v: Vec2,
    fp: FeatureId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Axis {
    FaceAX,
    FaceAY,
    FaceBX,
    FaceBY,
}

/// Component-wise absolute value of a 2×2 matrix.
fn abs_mat2(m: Mat2) -> Mat2 {
    Mat2::from_cols(m.x_axis.abs(), m.y_axis.abs())
}

/// Narrow-phase collision between two oriented rectangles.
///
/// Returns at most two contacts; an empty vector means the boxes are
/// separated along some face normal.
pub fn collide(a: &Body, b: &Body) -> Vec<RawContact> {
    let h_a = 0.5 * a.size;
    let h_b = 0.5 * b.size;

    let pos_a = a.position();
    let pos_b = b.position();

    let rot_a = a.rotation();
    let rot_b = b.rotation();
    let rot_at = rot_a.transpose();
    let rot_bt = rot_b.transpose();

    let dp = pos_b - pos_a;
    let d_a = rot_at * dp;
    let d_b = rot_bt * dp;

    let c = rot_at * rot_b;
    let abs_c = abs_mat2(c);
    let abs_ct = abs_c.transpose();

    // Box A faces
    let face_a = d_a.abs() - h_a - abs_c * h_b;
    if face_a.x > 0.0 || face_a.y > 0.0 {
        return Vec::new();
    }

    // Box B faces
    let face_b = d_b.abs() - h_b - abs_ct * h_a;
    if face_b.x > 0.0 || face_b.y > 0.0 {
        return Vec::new();
    }

    // Reference face: largest penetration, biased against switching.
    let mut axis = Axis::FaceAX;
    let mut separation = face_a.x;
    let mut normal = if d_a.x > 0.0 { rot_a.x_axis } else { -rot_a.x_axis };

    if face_a.y > RELATIVE_TOLERANCE * separation + ABSOLUTE_TOLERANCE * h_a.y {
        axis = Axis::FaceAY;
        separation = face_a.y;
        normal = if d_a.y > 0.0 { rot_a.y_axis } else { -rot_a.y_axis };
    }

    if face_b.x > RELATIVE_TOLERANCE * separation + ABSOLUTE_TOLERANCE * h_b.x {
        axis = Axis::FaceBX;
        separation = face_b.x;
        normal = if d_b.x > 0.0 { rot_b.x_axis } else { -rot_b.x_axis };
    }

    if face_b.y > RELATIVE_TOLERANCE * separation + ABSOLUTE_TOLERANCE * h_b.y {
        axis = Axis::FaceBY;
        normal = if d_b.y > 0.0 { rot_b.y_axis } else { -rot_b.y_axis };
    }

    // Clip setup for the chosen reference face.
    let front_normal: Vec2;
    let front: Scalar;
    let side_normal: Vec2;
    let neg_side: Scalar;
    let pos_side: Scalar;
    let neg_edge: u8;
    let pos_edge: u8;
    let incident: [ClipVertex; 2];
    match axis {
        Axis::FaceAX => {
            front_normal = normal;
            front = pos_a.dot(front_normal) + h_a.x;
            side_normal = rot_a.y_axis;
            let side = pos_a.dot(side_normal);
            neg_side = -side + h_a.y;
            pos_side = side + h_a.y;
            neg_edge = EDGE3;
            pos_edge = EDGE1;
            incident = incident_edge(h_b, pos_b, rot_b, front_normal);
        }
        Axis::FaceAY => {
            front_normal = normal;
            front = pos_a.dot(front_normal) + h_a.y;
            side_normal = rot_a.x_axis;
            let side = pos_a.dot(side_normal);
            neg_side = -side + h_a.x;
            pos_side = side + h_a.x;
            neg_edge = EDGE2;
            pos_edge = EDGE4;
            incident = incident_edge(h_b, pos_b, rot_b, front_normal);
        }
        Axis::FaceBX => {
            front_normal = -normal;
            front = pos_b.dot(front_normal) + h_b.x;
            side_normal = rot_b.y_axis;
            let side = pos_b.dot(side_normal);
            neg_side = -side + h_b.y;
            pos_side = side + h_b.y;
            neg_edge = EDGE3;
            pos_edge = EDGE1;
            incident = incident_edge(h_a, pos_a, rot_a, front_normal);
        }
        Axis::FaceBY => {
            front_normal = -normal;
            front = pos_b.dot(front_normal) + h_b.y;
            side_normal = rot_b.x_axis;
            let side = pos_b.dot(side_normal);
            neg_side = -side + h_b.x;
            pos_side = side + h_b.x;
            neg_edge = EDGE2;
            pos_edge = EDGE4;
            incident = incident_edge(h_a, pos_a, rot_a, front_normal);
        }
    }

    // Clip against the side planes, then keep points behind the face.
    let Some(clipped) = clip_segment(incident, -side_normal, neg_side, neg_edge) else {
        return Vec::new();
    };
    let Some(clipped) = clip_segment(clipped, side_normal, pos_side, pos_edge) else {
        return Vec::new();
    };

    let flip = matches!(axis, Axis::FaceBX | Axis::FaceBY);
    let mut contacts = Vec::with_capacity(2);
    for cv in clipped {
        let sep = front_normal.dot(cv.v) - front;
        if sep <= 0.0 {
            let mut feature = cv.fp;
            if flip {
                feature.flip();
            }
            contacts.push(RawContact {
                position: cv.v - sep * front_normal,
                normal,
                separation: sep,
                feature,
            });
        }
    }
    contacts
}

/// Picks the incident edge: the edge of the other box whose outward
/// normal is most anti-parallel to the reference normal.
fn incident_edge(h: Vec2, pos: Vec2, rot: Mat2, normal: Vec2) -> [ClipVertex; 2] {
    let n = -(rot.transpose() * normal);
    let n_abs = n.abs();

    let mut c = [ClipVertex::default(); 2];
    if n_abs.x > n_abs.y {
        if n.x >= 0.0 {
            c[0].v = Vec2::new(h.x, -h.y);
            c[0].fp.in_edge_b = EDGE3;
            c[0].fp.out_edge_b = EDGE4;
            c[1].v = Vec2::new(h.x, h.y);
            c[1].fp.in_edge_b = EDGE4;
            c[1].fp.out_edge_b = EDGE1;
        } else {
            c[0].v = Vec2::new(-h.x, h.y);
            c[0].fp.in_edge_b = EDGE1;
            c[0].fp.out_edge_b = EDGE2;
            c[1].v = Vec2::new(-h.x, -h.y);
            c[1].fp.in_edge_b = EDGE2;
            c[1].fp.out_edge_b = EDGE3;
        }
    } else if n.y >= 0.0 {
        c[0].v = Vec2::new(h.x, h.y);
        c[0].fp.in_edge_b = EDGE4;
        c[0].fp.out_edge_b = EDGE1;
        c[1].v = Vec2::new(-h.x, h.y);
        c[1].fp.in_edge_b = EDGE1;
        c[1].fp.out_edge_b = EDGE2;
    } else {
        c[0].v = Vec2::new(-h.x, -h.y);
        c[0].fp.in_edge_b = EDGE2;
        c[0].fp.out_edge_b = EDGE3;
        c[1].v = Vec2::new(h.x, -h.y);
        c[1].fp.in_edge_b = EDGE3;
        c[1].fp.out_edge_b = EDGE4;
    }

    for cv in &mut c {
        cv.v = pos + rot * cv.v;
    }
    c
}

/// Sutherland-Hodgman clip of a two-point segment against one
/// half-plane. Returns `None` when fewer than two points survive.
fn clip_segment(
    v_in: [ClipVertex; 2],
    normal: Vec2,
    offset: Scalar,
    clip_edge: u8,
) -> Option<[ClipVertex; 2]> {
    let mut out = [ClipVertex::default(); 2];
    let mut count = 0;

    let d0 = normal.dot(v_in[0].v) - offset;
    let d1 = normal.dot(v_in[1].v) - offset;

    if d0 <= 0.0 {
        out[count] = v_in[0];
        count += 1;
    }
    if d1 <= 0.0 {
        out[count] = v_in[1];
        count += 1;
    }

    if d0 * d1 < 0.0 {
        let t = d0 / (d0 - d1);
        let mut cv = ClipVertex {
            v: v_in[0].v + t * (v_in[1].v - v_in[0].v),
            fp: v_in[0].fp,
        };
        if d0 > 0.0 {
            cv.fp.in_edge_a = clip_edge;
            cv.fp.in_edge_b = NO_EDGE;
        } else {
            cv.fp.out_edge_a = clip_edge;
            cv.fp.out_edge_b = NO_EDGE;
        }
        out[count] = cv;
        count += 1;
    }

    (count == 2).then_some(out)
}
