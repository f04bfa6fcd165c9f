//! Midpoint refinement.
//!
//! Splits every edge longer than a threshold at its midpoint and
//! re-triangulates the affected faces (1-to-2, 1-to-3 or 1-to-4). Split
//! decisions are made per edge, so neighbouring faces always agree and the
//! result stays conforming.

use std::collections::HashMap;

use nalgebra::Point3;

use crate::mesh::{Face, TriMesh, VertexId};

/// Upper bound on refinement passes in [`preprocess_for_voronoi`].
pub const MAX_REFINEMENT_PASSES: usize = 10;

/// Split every edge longer than `max_edge` once.
///
/// Returns `true` if any edge was split. Adjacency is dropped.
pub fn refine_midpoint(mesh: &mut TriMesh, max_edge: f64) -> bool {
    let mut midpoints: HashMap<(u32, u32), VertexId> = HashMap::new();
    let mut face_mids: Vec<[Option<VertexId>; 3]> = Vec::with_capacity(mesh.num_faces());

    for f in mesh.face_ids().collect::<Vec<_>>() {
        let verts = mesh.face_vertices(f);
        let mut mids = [None; 3];
        for z in 0..3 {
            if mesh.edge_length(f, z) <= max_edge {
                continue;
            }
            let (a, b) = (verts[z], verts[(z + 1) % 3]);
            let key = (a.raw().min(b.raw()), a.raw().max(b.raw()));
            let mid = match midpoints.get(&key) {
                Some(&m) => m,
                None => {
                    let p = Point3::from((mesh.position(a).coords + mesh.position(b).coords) * 0.5);
                    let m = mesh.add_vertex(p);
                    midpoints.insert(key, m);
                    m
                }
            };
            mids[z] = Some(mid);
        }
        face_mids.push(mids);
    }

    if midpoints.is_empty() {
        return false;
    }

    let old_faces = std::mem::take(&mut mesh.faces);
    let mut faces = Vec::with_capacity(old_faces.len() * 2);
    for (face, mids) in old_faces.iter().zip(&face_mids) {
        split_face(mesh, face.vertices, *mids, &mut faces);
    }
    mesh.faces = faces;
    mesh.invalidate_topology();
    true
}

fn split_face(
    mesh: &TriMesh,
    verts: [VertexId; 3],
    mids: [Option<VertexId>; 3],
    out: &mut Vec<Face>,
) {
    let mut push = |t: [VertexId; 3]| out.push(Face::new(t));
    let split_count = mids.iter().filter(|m| m.is_some()).count();
    match split_count {
        0 => push(verts),
        1 => {
            let Some(z) = mids.iter().position(|m| m.is_some()) else {
                return;
            };
            let (a, b, c) = (verts[z], verts[(z + 1) % 3], verts[(z + 2) % 3]);
            let Some(m) = mids[z] else { return };
            push([a, m, c]);
            push([m, b, c]);
        }
        2 => {
            // Rotate so the unsplit edge is edge 2 (c -> a).
            let Some(unsplit) = mids.iter().position(|m| m.is_none()) else {
                return;
            };
            let z = (unsplit + 1) % 3;
            let (a, b, c) = (verts[z], verts[(z + 1) % 3], verts[(z + 2) % 3]);
            let (Some(m0), Some(m1)) = (mids[z], mids[(z + 1) % 3]) else {
                return;
            };
            push([m0, b, m1]);
            // Split the remaining quad a, m0, m1, c along its shorter diagonal.
            let d_am1 = (mesh.position(a) - mesh.position(m1)).norm_squared();
            let d_m0c = (mesh.position(m0) - mesh.position(c)).norm_squared();
            if d_am1 <= d_m0c {
                push([a, m0, m1]);
                push([a, m1, c]);
            } else {
                push([a, m0, c]);
                push([m0, m1, c]);
            }
        }
        _ => {
            let (Some(m0), Some(m1), Some(m2)) = (mids[0], mids[1], mids[2]) else {
                return;
            };
            let [v0, v1, v2] = verts;
            push([v0, m0, m2]);
            push([m0, v1, m1]);
            push([m2, m1, v2]);
            push([m0, m1, m2]);
        }
    }
}

/// Refine a mesh so Voronoi regions of spacing `radius` span many vertices.
///
/// Runs [`refine_midpoint`] with threshold `radius / refinement_ratio`
/// until no edge exceeds it or [`MAX_REFINEMENT_PASSES`] is reached, then
/// drops unreferenced vertices and rebuilds adjacency and border flags.
/// Returns the number of passes that split something.
pub fn preprocess_for_voronoi(mesh: &mut TriMesh, radius: f64, refinement_ratio: f64) -> usize {
    crate::algo::clean::remove_unreferenced_vertices(mesh);
    let threshold = radius / refinement_ratio;
    let mut passes = 0;
    while passes < MAX_REFINEMENT_PASSES && refine_midpoint(mesh, threshold) {
        passes += 1;
    }
    mesh.update_topology();
    mesh.update_border_flags();
    log::debug!(
        "voronoi preprocessing: {} passes, {} vertices, {} faces",
        passes,
        mesh.num_vertices(),
        mesh.num_faces()
    );
    passes
}
