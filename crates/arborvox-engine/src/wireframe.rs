//! Debug wireframe geometry for voxel bounds.
//!
//! Each voxel gets a wireframe cube built from twelve thin cuboids, one per
//! edge. The geometry is generated once from the rest-pose bounds; per tick
//! only a rigid offset changes, so retransforming is a single vector store
//! per box.

use arborvox_core::{Aabb, Vec3};
use arborvox_mesh::Voxel;

/// Corner index pairs for the twelve edges of [`Aabb::corners`].
const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Triangle indices for one thin edge cuboid; vertices 0..3 cap the start of
/// the edge, 4..7 the end.
#[rustfmt::skip]
const BOX: [u32; 36] = [
    0, 1, 2, 0, 2, 3, // start cap
    4, 6, 5, 4, 7, 6, // end cap
    0, 4, 5, 0, 5, 1,
    1, 5, 6, 1, 6, 2,
    2, 6, 7, 2, 7, 3,
    3, 7, 4, 3, 4, 0,
];

/// Edge thickness as a fraction of the box's X extent.
const THICKNESS_RATIO: f32 = 0.02;

/// Wireframe cube for one voxel: rest-pose geometry plus a rigid offset.
#[derive(Clone, Debug)]
pub struct WireframeBox {
    base_positions: Vec<Vec3>,
    triangles: Vec<u32>,
    offset: Vec3,
}

impl WireframeBox {
    /// Build the twelve edge cuboids for `bounds`.
    #[must_use]
    pub fn from_bounds(bounds: &Aabb) -> Self {
        let corners = bounds.corners();
        let thickness = bounds.size.x * THICKNESS_RATIO;

        let mut base_positions = Vec::with_capacity(EDGES.len() * 8);
        let mut triangles = Vec::with_capacity(EDGES.len() * BOX.len());
        for (a, b) in EDGES {
            push_edge(&corners[a], &corners[b], thickness, &mut base_positions, &mut triangles);
        }

        Self {
            base_positions,
            triangles,
            offset: Vec3::zeros(),
        }
    }

    /// Current rigid offset from the rest pose.
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Move the whole box to the given offset from its rest pose.
    pub fn set_offset(&mut self, offset: Vec3) {
        self.offset = offset;
    }

    /// Vertex positions with the current offset applied.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.base_positions.iter().map(move |p| p + self.offset)
    }

    /// Triangle index buffer over [`Self::positions`].
    #[must_use]
    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.base_positions.len()
    }
}

fn push_edge(
    from: &Vec3,
    to: &Vec3,
    thickness: f32,
    positions: &mut Vec<Vec3>,
    triangles: &mut Vec<u32>,
) {
    let axis = to - from;
    let length = axis.norm();
    if length < 1e-8 {
        return;
    }
    let dir = axis / length;

    // Frame perpendicular to the edge. Vertical edges get a fixed frame so
    // the cross product cannot degenerate.
    let (right, up) = if dir.y.abs() > 0.9 {
        (Vec3::x(), Vec3::z())
    } else {
        let right = dir.cross(&Vec3::y()).normalize();
        let up = right.cross(&dir);
        (right, up)
    };

    let h = thickness * 0.5;
    let base = positions.len() as u32;
    for end in [from, to] {
        positions.push(end - right * h - up * h);
        positions.push(end + right * h - up * h);
        positions.push(end + right * h + up * h);
        positions.push(end - right * h + up * h);
    }
    triangles.extend(BOX.iter().map(|i| base + i));
}

/// Index-aligned wireframes for a voxel list.
///
/// `boxes[i]` always corresponds to `voxels[i]`; generation must happen
/// after pruning so the lists stay parallel.
#[derive(Clone, Debug, Default)]
pub struct WireframeSet {
    boxes: Vec<WireframeBox>,
    visible: bool,
}

impl WireframeSet {
    /// Build one wireframe per voxel from its rest-pose bounds.
    #[must_use]
    pub fn generate(voxels: &[Voxel]) -> Self {
        let boxes = voxels
            .iter()
            .map(|v| {
                let mut rest_bounds = v.bounds;
                rest_bounds.translate(&-v.displacement());
                WireframeBox::from_bounds(&rest_bounds)
            })
            .collect();
        Self {
            boxes,
            visible: true,
        }
    }

    /// Move each wireframe to its voxel's current displacement.
    pub fn retransform(&mut self, voxels: &[Voxel]) {
        for (wire, voxel) in self.boxes.iter_mut().zip(voxels) {
            wire.set_offset(voxel.displacement());
        }
    }

    /// Whether the wireframes should be drawn.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the wireframes. Hiding does not stop retransforms; the
    /// offsets stay current so re-showing needs no catch-up pass.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Number of wireframe boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Check whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Wireframe for the voxel at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&WireframeBox> {
        self.boxes.get(index)
    }

    /// Iterate over the wireframe boxes in voxel order.
    pub fn iter(&self) -> impl Iterator<Item = &WireframeBox> {
        self.boxes.iter()
    }
}
