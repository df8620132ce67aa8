//! Procedural geometry for the ornaments, dust, star and photo planes.
//!
//! Every mesh is unit sized and non-indexed; per-instance model matrices
//! carry the real dimensions. All meshes share one vertex buffer.

use crate::constants::{STAR_DEPTH, STAR_INNER_RADIUS, STAR_OUTER_RADIUS};
use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MeshVertex {
    pub(crate) pos: [f32; 3],
    pub(crate) normal: [f32; 3],
}

impl MeshVertex {
    #[inline]
    fn new(pos: Vec3, normal: Vec3) -> Self {
        Self {
            pos: pos.to_array(),
            normal: normal.to_array(),
        }
    }

    pub(crate) const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Vertex span of one mesh inside the shared buffer.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MeshRange {
    pub(crate) first: u32,
    pub(crate) count: u32,
}

impl MeshRange {
    #[inline]
    pub(crate) fn vertices(&self) -> std::ops::Range<u32> {
        self.first..self.first + self.count
    }
}

pub(crate) struct MeshLibrary {
    pub(crate) vertices: Vec<MeshVertex>,
    pub(crate) cube: MeshRange,
    pub(crate) sphere: MeshRange,
    pub(crate) tetra: MeshRange,
    pub(crate) star: MeshRange,
    pub(crate) quad: MeshRange,
}

impl MeshLibrary {
    pub(crate) fn build() -> Self {
        let mut vertices = Vec::new();
        let mut push = |mesh: Vec<MeshVertex>| {
            let range = MeshRange {
                first: vertices.len() as u32,
                count: mesh.len() as u32,
            };
            vertices.extend(mesh);
            range
        };
        let cube = push(cube());
        let sphere = push(sphere(12, 16));
        let tetra = push(tetrahedron());
        let star = push(star_prism(STAR_OUTER_RADIUS, STAR_INNER_RADIUS, STAR_DEPTH));
        let quad = push(quad());
        Self {
            vertices,
            cube,
            sphere,
            tetra,
            star,
            quad,
        }
    }
}

fn cube() -> Vec<MeshVertex> {
    let mut out = Vec::with_capacity(36);
    for n in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
        let u = if n.y.abs() > 0.5 { Vec3::X } else { Vec3::Y };
        let v = n.cross(u);
        let c = |su: f32, sv: f32| (n + u * su + v * sv) * 0.5;
        let corners = [
            c(-1.0, -1.0),
            c(1.0, -1.0),
            c(1.0, 1.0),
            c(-1.0, -1.0),
            c(1.0, 1.0),
            c(-1.0, 1.0),
        ];
        out.extend(corners.iter().map(|&p| MeshVertex::new(p, n)));
    }
    out
}

/// Unit-radius UV sphere.
fn sphere(stacks: u32, slices: u32) -> Vec<MeshVertex> {
    let point = |i: u32, j: u32| {
        let theta = PI * i as f32 / stacks as f32;
        let phi = TAU * j as f32 / slices as f32;
        Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin())
    };
    let mut out = Vec::with_capacity((stacks * slices * 6) as usize);
    for i in 0..stacks {
        for j in 0..slices {
            let (a, b, c, d) = (point(i, j), point(i + 1, j), point(i + 1, j + 1), point(i, j + 1));
            out.extend([a, b, c, a, c, d].iter().map(|&p| MeshVertex::new(p, p)));
        }
    }
    out
}

fn tetrahedron() -> Vec<MeshVertex> {
    let v = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
    ]
    .map(Vec3::normalize);
    let mut out = Vec::with_capacity(12);
    for skip in 0..4 {
        let n = -v[skip];
        out.extend(
            (0..4)
                .filter(|&i| i != skip)
                .map(|i| MeshVertex::new(v[i], n)),
        );
    }
    out
}

/// Five-point star outline extruded along Z.
fn star_prism(outer: f32, inner: f32, depth: f32) -> Vec<MeshVertex> {
    let rim: Vec<Vec3> = (0..10)
        .map(|i| {
            let angle = i as f32 * PI / 5.0 + FRAC_PI_2;
            let r = if i % 2 == 0 { outer } else { inner };
            Vec3::new(angle.cos() * r, angle.sin() * r, 0.0)
        })
        .collect();
    let half = Vec3::new(0.0, 0.0, depth / 2.0);
    let mut out = Vec::with_capacity(10 * 12);
    for i in 0..rim.len() {
        let (a, b) = (rim[i], rim[(i + 1) % rim.len()]);
        out.extend([half, a + half, b + half].map(|p| MeshVertex::new(p, Vec3::Z)));
        out.extend([-half, b - half, a - half].map(|p| MeshVertex::new(p, Vec3::NEG_Z)));
        let edge = b - a;
        let mut n = Vec3::new(edge.y, -edge.x, 0.0).normalize_or_zero();
        if n.dot((a + b) * 0.5) < 0.0 {
            n = -n;
        }
        out.extend(
            [a + half, a - half, b - half, a + half, b - half, b + half]
                .map(|p| MeshVertex::new(p, n)),
        );
    }
    out
}

/// Unit square in the XY plane facing +Z.
fn quad() -> Vec<MeshVertex> {
    [
        (-0.5, -0.5),
        (0.5, -0.5),
        (0.5, 0.5),
        (-0.5, -0.5),
        (0.5, 0.5),
        (-0.5, 0.5),
    ]
    .iter()
    .map(|&(x, y)| MeshVertex::new(Vec3::new(x, y, 0.0), Vec3::Z))
    .collect()
}

/// Billboard corners for snow flakes, in [-1, 1].
pub(crate) const SNOW_CORNERS: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];
