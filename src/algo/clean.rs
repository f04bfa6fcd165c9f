//! Mesh cleaning and component utilities.
//!
//! Duplicate and unreferenced vertex removal, connected-component labeling
//! over face-face adjacency, component extraction and concatenation.

use std::collections::VecDeque;

use crate::mesh::{FaceId, TriMesh, VertexId};

/// Merge vertices with exactly equal positions.
///
/// Faces are redirected to the surviving vertex and faces that become
/// degenerate are removed. Flags of merged vertices are combined. Adjacency
/// is dropped. Returns the number of vertices removed.
pub fn remove_duplicate_vertices(mesh: &mut TriMesh) -> usize {
    let positions: Vec<_> = mesh.positions().copied().collect();
    let (remap, representatives) = crate::mesh::coincident_vertex_map(&positions);
    let removed = mesh.vertices.len() - representatives.len();
    if removed == 0 {
        return 0;
    }

    let mut merged: Vec<_> = representatives
        .iter()
        .map(|&old| mesh.vertices[old].clone())
        .collect();
    for (old, v) in mesh.vertices.iter().enumerate() {
        let flags = &mut merged[remap[old]].flags;
        flags.border |= v.flags.border;
        flags.selected |= v.flags.selected;
        flags.visited |= v.flags.visited;
    }
    mesh.vertices = merged;

    for face in &mut mesh.faces {
        face.vertices = face.vertices.map(|v| VertexId::new(remap[v.index()]));
    }
    mesh.faces.retain(|f| {
        let [a, b, c] = f.vertices;
        a != b && b != c && a != c
    });
    mesh.invalidate_topology();
    removed
}

/// Drop vertices not used by any face and compact the vertex vector.
///
/// Returns the number of vertices removed.
pub fn remove_unreferenced_vertices(mesh: &mut TriMesh) -> usize {
    let mut used = vec![false; mesh.vertices.len()];
    for face in &mesh.faces {
        for v in face.vertices {
            used[v.index()] = true;
        }
    }
    let before = mesh.vertices.len();
    let mut remap = vec![VertexId::invalid(); before];
    let mut kept = Vec::with_capacity(before);
    for (i, v) in mesh.vertices.drain(..).enumerate() {
        if used[i] {
            remap[i] = VertexId::new(kept.len());
            kept.push(v);
        }
    }
    mesh.vertices = kept;
    for face in &mut mesh.faces {
        face.vertices = face.vertices.map(|v| remap[v.index()]);
    }
    mesh.invalidate_topology();
    before - mesh.vertices.len()
}

/// Label connected components through shared edges.
///
/// Returns the faces of each component in ascending order; components are
/// ordered by their smallest face. Computes adjacency if it is stale.
pub fn connected_components(mesh: &mut TriMesh) -> Vec<Vec<FaceId>> {
    if !mesh.has_topology() {
        mesh.update_topology();
    }
    let mut label = vec![usize::MAX; mesh.num_faces()];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for seed in mesh.face_ids() {
        if label[seed.index()] != usize::MAX {
            continue;
        }
        let id = components.len();
        let mut faces = Vec::new();
        label[seed.index()] = id;
        queue.push_back(seed);
        while let Some(f) = queue.pop_front() {
            faces.push(f);
            for z in 0..3 {
                let (g, _) = mesh.ff(f, z);
                if label[g.index()] == usize::MAX {
                    label[g.index()] = id;
                    queue.push_back(g);
                }
            }
        }
        faces.sort();
        components.push(faces);
    }
    components
}

/// Copy a set of faces and the vertices they use into a new mesh.
///
/// Vertices keep their flags and relative order. The result has adjacency
/// and border flags computed.
pub fn extract_component(mesh: &TriMesh, faces: &[FaceId]) -> TriMesh {
    let mut used = vec![false; mesh.num_vertices()];
    for &f in faces {
        for v in mesh.face_vertices(f) {
            used[v.index()] = true;
        }
    }

    let mut out = TriMesh::with_capacity(used.iter().filter(|&&u| u).count(), faces.len());
    let mut remap = vec![VertexId::invalid(); mesh.num_vertices()];
    for v in mesh.vertex_ids() {
        if used[v.index()] {
            let src = mesh.vertex(v);
            remap[v.index()] = out.add_vertex_with_flags(src.position, src.flags);
        }
    }
    for &f in faces {
        out.add_face(mesh.face_vertices(f).map(|v| remap[v.index()]));
    }
    out.update_topology();
    out.update_border_flags();
    out
}

/// Append all vertices and faces of `src` to `dst`.
pub fn append(dst: &mut TriMesh, src: &TriMesh) {
    let offset = dst.num_vertices();
    dst.vertices.extend(src.vertices.iter().cloned());
    dst.faces.extend(src.faces.iter().map(|f| {
        let mut face = *f;
        face.vertices = f.vertices.map(|v| VertexId::new(v.index() + offset));
        face
    }));
    dst.invalidate_topology();
}
