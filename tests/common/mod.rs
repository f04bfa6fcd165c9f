//! Meshes shared by the integration tests.

#![allow(dead_code)]

use std::f64::consts::TAU;

use voromesh::algo::clean::remove_duplicate_vertices;
use voromesh::nalgebra::Point3;
use voromesh::prelude::*;

/// Flat `n` x `n` grid over `[0, size]^2`.
pub fn grid(n: usize, size: f64) -> TriMesh {
    let mut vertices = Vec::new();
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(size * i as f64 / n as f64, size * j as f64 / n as f64, 0.0));
        }
    }
    let mut faces = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v01 = v00 + n + 1;
            faces.push([v00, v00 + 1, v01 + 1]);
            faces.push([v00, v01 + 1, v01]);
        }
    }
    build_from_triangles(&vertices, &faces).unwrap()
}

/// Flat disk around `center`: a center vertex plus `rings` rings of `6 i`
/// vertices, stitched into strips.
pub fn disk(rings: usize, radius: f64, center: Point3<f64>) -> TriMesh {
    let mut vertices = vec![center];
    for i in 1..=rings {
        let r = radius * i as f64 / rings as f64;
        for k in 0..6 * i {
            let t = TAU * k as f64 / (6 * i) as f64;
            vertices.push(Point3::new(center.x + r * t.cos(), center.y + r * t.sin(), center.z));
        }
    }
    // Ring i starts at 1 + 3 i (i - 1).
    let start = |i: usize| if i == 0 { 0 } else { 1 + 3 * i * (i - 1) };
    let mut faces = Vec::new();
    for k in 0..6 {
        faces.push([0, start(1) + k, start(1) + (k + 1) % 6]);
    }
    for i in 2..=rings {
        let (m, n) = (6 * (i - 1), 6 * i);
        let inner = |a: usize| start(i - 1) + a % m;
        let outer = |b: usize| start(i) + b % n;
        let (mut a, mut b) = (0, 0);
        while a < m || b < n {
            if b < n && (a >= m || (b + 1) * m <= (a + 1) * n) {
                faces.push([inner(a), outer(b), outer(b + 1)]);
                b += 1;
            } else {
                faces.push([inner(a), outer(b), inner(a + 1)]);
                a += 1;
            }
        }
    }
    build_from_triangles(&vertices, &faces).unwrap()
}

/// Closed unit cube with an `n` x `n` grid per side, outward oriented.
pub fn cube(n: usize) -> TriMesh {
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces = Vec::new();
    let sides = [(0, 0.0, 1, 2), (0, 1.0, 1, 2), (1, 0.0, 2, 0), (1, 1.0, 2, 0), (2, 0.0, 0, 1), (2, 1.0, 0, 1)];
    for &(axis, value, ua, va) in &sides {
        let base = vertices.len();
        for j in 0..=n {
            for i in 0..=n {
                let mut p = Point3::origin();
                p[axis] = value;
                p[ua] = i as f64 / n as f64;
                p[va] = j as f64 / n as f64;
                vertices.push(p);
            }
        }
        for j in 0..n {
            for i in 0..n {
                let v00 = base + j * (n + 1) + i;
                let (v10, v01) = (v00 + 1, v00 + n + 1);
                let v11 = v01 + 1;
                if value > 0.5 {
                    faces.push([v00, v10, v11]);
                    faces.push([v00, v11, v01]);
                } else {
                    faces.push([v00, v11, v10]);
                    faces.push([v00, v01, v11]);
                }
            }
        }
    }
    let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
    remove_duplicate_vertices(&mut mesh);
    mesh.update_topology();
    mesh.update_border_flags();
    mesh
}

/// Concatenate two meshes without welding.
pub fn merged(a: &TriMesh, b: &TriMesh) -> TriMesh {
    let (mut vertices, mut faces) = to_face_vertex(a);
    let (vb, fb) = to_face_vertex(b);
    let offset = vertices.len();
    vertices.extend(vb);
    faces.extend(fb.iter().map(|f| f.map(|i| i + offset)));
    build_from_triangles(&vertices, &faces).unwrap()
}

/// Whether some output vertex sits within `tol` of `p`.
pub fn has_vertex_near(mesh: &TriMesh, p: &Point3<f64>, tol: f64) -> bool {
    mesh.positions().any(|q| (q - p).norm() <= tol)
}
