//! Segmented page mesh and joint chain.
//!
//! CPU builds one indexed, skinnable box mesh at startup; every page in the
//! book shares it. The host uploads the buffers once and applies a per-page
//! joint palette each frame.

use glam::{EulerRot, Mat4, Quat, Vec3};
use static_assertions::const_assert_eq;

/// Page dimensions in scene units. Width runs along +X from the spine.
pub const PAGE_WIDTH: f32 = 1.28;
pub const PAGE_HEIGHT: f32 = 1.71;
pub const PAGE_DEPTH: f32 = 0.003;

/// Number of bend segments along the page width.
pub const PAGE_SEGMENTS: usize = 30;
/// Width of a single bend segment.
pub const SEGMENT_WIDTH: f32 = PAGE_WIDTH / PAGE_SEGMENTS as f32;
/// Joints in the chain: one at the spine plus one per segment boundary.
pub const JOINT_COUNT: usize = PAGE_SEGMENTS + 1;

/// Vertical subdivisions. The bend only happens along X, so two rows keep
/// the vertex count down without visible faceting.
pub const HEIGHT_SEGMENTS: usize = 2;

/// Material slot order shared with the host renderer.
///
/// Slots follow the face build order below: the four edge strips first,
/// then the two textured faces.
pub const SLOT_OUTER_EDGE: u32 = 0;
pub const SLOT_SPINE_EDGE: u32 = 1;
pub const SLOT_TOP_EDGE: u32 = 2;
pub const SLOT_BOTTOM_EDGE: u32 = 3;
pub const SLOT_FRONT_FACE: u32 = 4;
pub const SLOT_BACK_FACE: u32 = 5;
pub const MATERIAL_SLOT_COUNT: usize = 6;

/// Vertex format for the skinned page mesh, four influence lanes wide as
/// skinned-mesh attributes conventionally are.
///
/// Only the first two lanes carry weight: a vertex blends the two adjacent
/// joints of its band, and `joints[1]` is always `joints[0] + 1` except on
/// the last band, where both collapse to the tip joint. Lanes 2 and 3 stay
/// zero-weighted.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PageVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub joints: [u16; 4],
    pub weights: [f32; 4],
}

// Layout contract with the host's vertex buffer description.
const_assert_eq!(std::mem::size_of::<PageVertex>(), 56);

/// One run of triangle indices drawn with a single material slot.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MaterialGroup {
    /// First index of the run.
    pub start: u32,
    /// Number of indices in the run.
    pub count: u32,
    /// Material slot (`SLOT_*`).
    pub material: u32,
}

/// Indexed page geometry with skinning attributes and material groups.
#[derive(Debug, Clone)]
pub struct PageMesh {
    pub vertices: Vec<PageVertex>,
    pub indices: Vec<u16>,
    pub groups: Vec<MaterialGroup>,
}

impl PageMesh {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Articulation of one joint, radians. `swing` is rotation about +Y (the
/// page turn), `fold` about +X (the corner fold during a turn).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointAngles {
    pub swing: f32,
    pub fold: f32,
}

#[allow(clippy::too_many_arguments)]
fn build_face(
    vertices: &mut Vec<PageVertex>,
    indices: &mut Vec<u16>,
    groups: &mut Vec<MaterialGroup>,
    u_axis: usize,
    v_axis: usize,
    w_axis: usize,
    u_dir: f32,
    v_dir: f32,
    width: f32,
    height: f32,
    depth: f32,
    grid_x: usize,
    grid_y: usize,
    material: u32,
) {
    let seg_w = width / grid_x as f32;
    let seg_h = height / grid_y as f32;
    let base = vertices.len() as u16;
    let group_start = indices.len() as u32;

    for iy in 0..=grid_y {
        let v = iy as f32 * seg_h - height / 2.0;
        for ix in 0..=grid_x {
            let u = ix as f32 * seg_w - width / 2.0;

            let mut position = [0.0f32; 3];
            position[u_axis] = u * u_dir;
            position[v_axis] = v * v_dir;
            position[w_axis] = depth / 2.0;

            let mut normal = [0.0f32; 3];
            normal[w_axis] = if depth > 0.0 { 1.0 } else { -1.0 };

            vertices.push(PageVertex {
                position,
                normal,
                uv: [ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32],
                joints: [0; 4],
                weights: [1.0, 0.0, 0.0, 0.0],
            });
        }
    }

    let stride = (grid_x + 1) as u16;
    for iy in 0..grid_y as u16 {
        for ix in 0..grid_x as u16 {
            let a = base + ix + stride * iy;
            let b = base + ix + stride * (iy + 1);
            let c = base + (ix + 1) + stride * (iy + 1);
            let d = base + (ix + 1) + stride * iy;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    groups.push(MaterialGroup {
        start: group_start,
        count: indices.len() as u32 - group_start,
        material,
    });
}

/// Build the shared page mesh.
///
/// The box is segmented along its width, then shifted so the spine sits at
/// x = 0 and the page spans `[0, PAGE_WIDTH]`. Skinning attributes are
/// derived from the shifted x coordinate.
pub fn build_page_mesh() -> PageMesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut groups = Vec::new();

    let (w, h, d) = (PAGE_WIDTH, PAGE_HEIGHT, PAGE_DEPTH);
    let (ws, hs) = (PAGE_SEGMENTS, HEIGHT_SEGMENTS);

    // Face order fixes the material slots: +x, -x, +y, -y, +z, -z.
    let mut face = |u, v, w_axis, u_dir, v_dir, fw, fh, fd, gx, gy, slot| {
        build_face(
            &mut vertices,
            &mut indices,
            &mut groups,
            u,
            v,
            w_axis,
            u_dir,
            v_dir,
            fw,
            fh,
            fd,
            gx,
            gy,
            slot,
        );
    };
    face(2, 1, 0, -1.0, -1.0, d, h, w, 1, hs, SLOT_OUTER_EDGE);
    face(2, 1, 0, 1.0, -1.0, d, h, -w, 1, hs, SLOT_SPINE_EDGE);
    face(0, 2, 1, 1.0, 1.0, w, d, h, ws, 1, SLOT_TOP_EDGE);
    face(0, 2, 1, 1.0, -1.0, w, d, -h, ws, 1, SLOT_BOTTOM_EDGE);
    face(0, 1, 2, 1.0, -1.0, w, h, d, ws, hs, SLOT_FRONT_FACE);
    face(0, 1, 2, -1.0, -1.0, w, h, -d, ws, hs, SLOT_BACK_FACE);

    for vertex in &mut vertices {
        vertex.position[0] += w / 2.0;
    }

    assign_skin_attributes(&mut vertices);

    PageMesh {
        vertices,
        indices,
        groups,
    }
}

/// Two-joint influence per vertex: the band a vertex falls in picks its
/// first joint, the fractional position inside the band splits the weight
/// with the next joint.
fn assign_skin_attributes(vertices: &mut [PageVertex]) {
    let last = JOINT_COUNT as u16 - 1;
    for vertex in vertices {
        let x = vertex.position[0];
        let band = (x / SEGMENT_WIDTH).floor().max(0.0);
        let joint = (band as u16).min(last);
        let next = (joint + 1).min(last);
        let blend = (x / SEGMENT_WIDTH - band).clamp(0.0, 1.0);
        vertex.joints = [joint, next, 0, 0];
        vertex.weights = [1.0 - blend, blend, 0.0, 0.0];
    }
}

/// Forward kinematics over the joint chain, producing skinning matrices.
///
/// Joint `j` sits `SEGMENT_WIDTH` along its parent's +X axis; joint 0 is
/// the spine hinge at the origin. Local articulation applies fold about X
/// then swing about Y. Each palette entry maps bind-pose positions into the
/// posed page, so an unrotated chain yields identity matrices.
pub fn compute_joint_palette(angles: &[JointAngles; JOINT_COUNT]) -> Vec<Mat4> {
    let mut palette = Vec::with_capacity(JOINT_COUNT);
    let mut world = Mat4::IDENTITY;
    for (j, joint) in angles.iter().enumerate() {
        let offset = if j == 0 { 0.0 } else { SEGMENT_WIDTH };
        let rotation = Quat::from_euler(EulerRot::XYZ, joint.fold, joint.swing, 0.0);
        let local = Mat4::from_translation(Vec3::new(offset, 0.0, 0.0)) * Mat4::from_quat(rotation);
        world *= local;

        let bind_x = j as f32 * SEGMENT_WIDTH;
        let inverse_bind = Mat4::from_translation(Vec3::new(-bind_x, 0.0, 0.0));
        palette.push(world * inverse_bind);
    }
    palette
}
