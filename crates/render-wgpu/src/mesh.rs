use bytemuck::{Pod, Zeroable};
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Generate box vertices and indices with the given full extents.
pub fn box_mesh(width: f32, height: f32, depth: f32) -> (Vec<Vertex>, Vec<u16>) {
    let x = width / 2.0;
    let y = height / 2.0;
    let z = depth / 2.0;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex { position: [-x, -y,  z], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ x, -y,  z], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ x,  y,  z], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [-x,  y,  z], normal: [0.0, 0.0, 1.0] },
        // -Z face
        Vertex { position: [ x, -y, -z], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-x, -y, -z], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-x,  y, -z], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [ x,  y, -z], normal: [0.0, 0.0, -1.0] },
        // +X face
        Vertex { position: [ x, -y,  z], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ x, -y, -z], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ x,  y, -z], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ x,  y,  z], normal: [1.0, 0.0, 0.0] },
        // -X face
        Vertex { position: [-x, -y, -z], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-x, -y,  z], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-x,  y,  z], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-x,  y, -z], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        Vertex { position: [-x,  y,  z], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ x,  y,  z], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ x,  y, -z], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [-x,  y, -z], normal: [0.0, 1.0, 0.0] },
        // -Y face
        Vertex { position: [-x, -y, -z], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ x, -y, -z], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ x, -y,  z], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [-x, -y,  z], normal: [0.0, -1.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    (vertices, indices)
}

/// Generate a single quad in the XY plane facing +Z. Drawn without backface
/// culling; the glass panel is seen from both sides.
pub fn plane_mesh(width: f32, height: f32) -> (Vec<Vertex>, Vec<u16>) {
    let x = width / 2.0;
    let y = height / 2.0;
    let n = [0.0, 0.0, 1.0];
    let vertices = vec![
        Vertex { position: [-x, -y, 0.0], normal: n },
        Vertex { position: [x, -y, 0.0], normal: n },
        Vertex { position: [x, y, 0.0], normal: n },
        Vertex { position: [-x, y, 0.0], normal: n },
    ];
    let indices = vec![0, 1, 2, 2, 3, 0];
    (vertices, indices)
}

/// Generate a torus in the XY plane around the Z axis.
pub fn torus_mesh(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> (Vec<Vertex>, Vec<u16>) {
    let mut vertices =
        Vec::with_capacity(((radial_segments + 1) * (tubular_segments + 1)) as usize);
    for j in 0..=radial_segments {
        let phi = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let theta = i as f32 / tubular_segments as f32 * TAU;
            let position = [
                (radius + tube * phi.cos()) * theta.cos(),
                (radius + tube * phi.cos()) * theta.sin(),
                tube * phi.sin(),
            ];
            let normal = [phi.cos() * theta.cos(), phi.cos() * theta.sin(), phi.sin()];
            vertices.push(Vertex { position, normal });
        }
    }

    let stride = tubular_segments + 1;
    let mut indices = Vec::with_capacity((radial_segments * tubular_segments * 6) as usize);
    for j in 0..radial_segments {
        for i in 0..tubular_segments {
            let a = (j * stride + i) as u16;
            let b = (j * stride + i + 1) as u16;
            let c = ((j + 1) * stride + i) as u16;
            let d = ((j + 1) * stride + i + 1) as u16;
            indices.extend_from_slice(&[a, b, d, d, c, a]);
        }
    }
    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(v: [f32; 3]) -> f32 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    #[test]
    fn box_mesh_respects_extents() {
        let (verts, indices) = box_mesh(1.1, 2.0, 0.75);
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
        for v in &verts {
            assert!(v.position[0].abs() <= 0.55 + 1e-6);
            assert!(v.position[1].abs() <= 1.0 + 1e-6);
            assert!(v.position[2].abs() <= 0.375 + 1e-6);
            assert!((length(v.normal) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn plane_is_one_quad() {
        let (verts, indices) = plane_mesh(1.05, 1.9);
        assert_eq!(verts.len(), 4);
        assert_eq!(indices.len(), 6);
    }

    #[test]
    fn torus_indices_in_bounds() {
        let (verts, indices) = torus_mesh(0.23, 0.03, 16, 80);
        assert_eq!(verts.len(), 17 * 81);
        assert_eq!(indices.len(), (16 * 80 * 6) as usize);
        for idx in &indices {
            assert!((*idx as usize) < verts.len());
        }
    }

    #[test]
    fn torus_normals_are_unit() {
        let (verts, _) = torus_mesh(0.23, 0.03, 8, 12);
        for v in &verts {
            assert!((length(v.normal) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn torus_stays_within_outer_radius() {
        let (verts, _) = torus_mesh(0.23, 0.03, 16, 80);
        for v in &verts {
            let planar = (v.position[0].powi(2) + v.position[1].powi(2)).sqrt();
            assert!(planar <= 0.23 + 0.03 + 1e-5);
            assert!(v.position[2].abs() <= 0.03 + 1e-6);
        }
    }
}
