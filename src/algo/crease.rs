//! Topological cut along sharp edges.
//!
//! An edge is a crease when the angle between the normals of its two faces
//! exceeds a threshold. Cutting gives every vertex one copy per fan of
//! faces that can be reached around it without crossing a crease, so the
//! creases become border edges.

use crate::mesh::{FaceId, TriMesh, Vertex, VertexId};

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Whether the edge between faces with normals `a` and `b` is a crease.
fn is_crease(a: &nalgebra::Vector3<f64>, b: &nalgebra::Vector3<f64>, angle_rad: f64) -> bool {
    if a.norm() == 0.0 || b.norm() == 0.0 {
        return false;
    }
    a.angle(b) > angle_rad
}

/// Cut `mesh` along every edge whose dihedral angle exceeds `angle_rad`.
///
/// New vertices copy the position and flags of the vertex they split from.
/// Adjacency is dropped; call [`TriMesh::update_topology`] afterwards.
/// Returns the number of vertices added.
pub fn crease_cut(mesh: &mut TriMesh, angle_rad: f64) -> usize {
    if !mesh.has_topology() {
        mesh.update_topology();
    }
    let normals: Vec<_> = mesh.face_ids().map(|f| mesh.face_normal(f)).collect();
    let num_original = mesh.num_vertices();
    let mut rewires: Vec<(FaceId, usize, VertexId)> = Vec::new();
    // Source of each copy; copies are appended once adjacency is no longer read.
    let mut copies: Vec<VertexId> = Vec::new();

    for vi in 0..num_original {
        let v = VertexId::new(vi);
        let incident = mesh.vertex_faces(v).to_vec();
        if incident.len() < 2 {
            continue;
        }

        let local = |f: FaceId| incident.iter().position(|&(g, _)| g == f);
        let mut parent: Vec<usize> = (0..incident.len()).collect();
        for (i, &(f, z)) in incident.iter().enumerate() {
            let z = z as usize;
            // The two edges of f that touch v.
            for e in [z, (z + 2) % 3] {
                let (g, _) = mesh.ff(f, e);
                if g == f || is_crease(&normals[f.index()], &normals[g.index()], angle_rad) {
                    continue;
                }
                if let Some(j) = local(g) {
                    let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                    if ri != rj {
                        parent[ri.max(rj)] = ri.min(rj);
                    }
                }
            }
        }

        // The fan containing the first incident face keeps v.
        let mut copy_of_root: Vec<Option<VertexId>> = vec![None; incident.len()];
        for (i, &(f, z)) in incident.iter().enumerate() {
            let root = find(&mut parent, i);
            if root == 0 {
                continue;
            }
            let target = match copy_of_root[root] {
                Some(copy) => copy,
                None => {
                    let copy = VertexId::new(num_original + copies.len());
                    copies.push(v);
                    copy_of_root[root] = Some(copy);
                    copy
                }
            };
            rewires.push((f, z as usize, target));
        }
    }

    for &src in &copies {
        let Vertex { position, flags } = mesh.vertex(src).clone();
        mesh.add_vertex_with_flags(position, flags);
    }
    for (f, z, target) in rewires {
        mesh.faces[f.index()].vertices[z] = target;
    }
    mesh.invalidate_topology();
    copies.len()
}
