//! Unit meshes for the decoration archetypes
//!
//! Five fixed geometries, generated once and shared by every instance:
//! sphere (ornaments and lights), box, tetrahedron (foliage), flat plane
//! (ribbon segments), octahedron (tree-topper star).

use bytemuck::{Pod, Zeroable};
use std::f32::consts::PI;

/// A vertex with position and normal. Color comes from instance data.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A mesh with vertices and triangle indices
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Unit UV sphere
pub fn create_sphere_mesh(segments: u32, rings: u32) -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = v * PI;
        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let theta = u * 2.0 * PI;
            let p = [
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            ];
            vertices.push(Vertex {
                position: p,
                normal: p,
            });
        }
    }

    let stride = segments + 1;
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    Mesh { vertices, indices }
}

/// Unit axis-aligned box
pub fn create_box_mesh() -> Mesh {
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        // (normal, tangent u, tangent v)
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for (n, u, v) in faces {
        let base = vertices.len() as u32;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (-0.5, 0.5), (0.5, 0.5)] {
            vertices.push(Vertex {
                position: [
                    n[0] * 0.5 + u[0] * su + v[0] * sv,
                    n[1] * 0.5 + u[1] * su + v[1] * sv,
                    n[2] * 0.5 + u[2] * su + v[2] * sv,
                ],
                normal: n,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }

    Mesh { vertices, indices }
}

/// Regular tetrahedron inscribed in the unit sphere, flat-shaded
pub fn create_tetrahedron_mesh() -> Mesh {
    let s = 1.0 / 3.0_f32.sqrt();
    let corners = [
        [s, s, s],
        [s, -s, -s],
        [-s, s, -s],
        [-s, -s, s],
    ];
    let faces = [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];
    flat_shaded(&corners, &faces)
}

/// Regular octahedron inscribed in the unit sphere, flat-shaded
pub fn create_octahedron_mesh() -> Mesh {
    let corners = [
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ];
    let faces = [
        [2, 4, 0],
        [2, 0, 5],
        [2, 5, 1],
        [2, 1, 4],
        [3, 0, 4],
        [3, 5, 0],
        [3, 1, 5],
        [3, 4, 1],
    ];
    flat_shaded(&corners, &faces)
}

/// Unit plane in the XY plane, facing +Z. Drawn without culling so both
/// sides of a ribbon segment render.
pub fn create_plane_mesh() -> Mesh {
    let n = [0.0, 0.0, 1.0];
    let vertices = vec![
        Vertex {
            position: [-0.5, -0.5, 0.0],
            normal: n,
        },
        Vertex {
            position: [0.5, -0.5, 0.0],
            normal: n,
        },
        Vertex {
            position: [-0.5, 0.5, 0.0],
            normal: n,
        },
        Vertex {
            position: [0.5, 0.5, 0.0],
            normal: n,
        },
    ];
    Mesh {
        vertices,
        indices: vec![0, 1, 2, 2, 1, 3],
    }
}

/// Duplicate corner positions per face with the face normal
fn flat_shaded(corners: &[[f32; 3]], faces: &[[usize; 3]]) -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for face in faces {
        let a = corners[face[0]];
        let b = corners[face[1]];
        let c = corners[face[2]];
        let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let mut n = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len > 0.0 {
            n = [n[0] / len, n[1] / len, n[2] / len];
        }

        let base = vertices.len() as u32;
        for p in [a, b, c] {
            vertices.push(Vertex {
                position: p,
                normal: n,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normals_unit(mesh: &Mesh) {
        for v in &mesh.vertices {
            let len =
                (v.normal[0] * v.normal[0] + v.normal[1] * v.normal[1] + v.normal[2] * v.normal[2])
                    .sqrt();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn sphere_counts_and_normals() {
        let mesh = create_sphere_mesh(16, 12);
        assert_eq!(mesh.vertex_count(), 17 * 13);
        assert_eq!(mesh.index_count(), (16 * 12 * 6) as usize);
        normals_unit(&mesh);
    }

    #[test]
    fn box_has_six_faces() {
        let mesh = create_box_mesh();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        normals_unit(&mesh);
    }

    #[test]
    fn tetrahedron_is_flat_shaded() {
        let mesh = create_tetrahedron_mesh();
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.index_count(), 12);
        normals_unit(&mesh);
    }

    #[test]
    fn octahedron_faces_point_outward() {
        let mesh = create_octahedron_mesh();
        assert_eq!(mesh.index_count(), 24);
        normals_unit(&mesh);
        // Face normal should agree with the face centroid direction
        for tri in mesh.indices.chunks(3) {
            let v = &mesh.vertices[tri[0] as usize];
            let c = [
                (mesh.vertices[tri[0] as usize].position[0]
                    + mesh.vertices[tri[1] as usize].position[0]
                    + mesh.vertices[tri[2] as usize].position[0])
                    / 3.0,
                (mesh.vertices[tri[0] as usize].position[1]
                    + mesh.vertices[tri[1] as usize].position[1]
                    + mesh.vertices[tri[2] as usize].position[1])
                    / 3.0,
                (mesh.vertices[tri[0] as usize].position[2]
                    + mesh.vertices[tri[1] as usize].position[2]
                    + mesh.vertices[tri[2] as usize].position[2])
                    / 3.0,
            ];
            let dot = v.normal[0] * c[0] + v.normal[1] * c[1] + v.normal[2] * c[2];
            assert!(dot > 0.0, "inward-facing octahedron face");
        }
    }

    #[test]
    fn vertex_layout_size() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }
}
