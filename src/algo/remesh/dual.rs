//! Dual triangulation of a vertex Voronoi partition.
//!
//! Every face whose corners belong to three different regions becomes a
//! triangle over the three region seeds. That alone leaves gaps along the
//! boundary wherever a boundary stretch between two boundary seeds crosses
//! further regions; those stretches are walked with [`Pos`] and closed
//! with a triangle fan.
//!
//! Neighbouring faces can touch the same three regions; each oriented
//! triangle is emitted once.

use std::collections::HashSet;

use crate::algo::clean::remove_unreferenced_vertices;
use crate::algo::voronoi::VoronoiSources;
use crate::mesh::{Pos, TriMesh, VertexId};

/// Build the dual mesh of `sources` over `mesh`.
///
/// `seeds` lists the seed vertices; repeats are allowed and map to one
/// output vertex. Border flags of `mesh` are refreshed, and its selected and
/// visited flags are overwritten. The output keeps only referenced seeds,
/// in first-occurrence order.
pub fn build_dual_mesh(mesh: &mut TriMesh, sources: &VoronoiSources, seeds: &[VertexId]) -> TriMesh {
    let mut out = TriMesh::with_capacity(seeds.len(), 2 * seeds.len());
    let mut seed_map: Vec<Option<VertexId>> = vec![None; mesh.num_vertices()];
    for &s in seeds {
        if seed_map[s.index()].is_none() {
            seed_map[s.index()] = Some(out.add_vertex(*mesh.position(s)));
        }
    }
    let dual = |src: Option<VertexId>| src.and_then(|s| seed_map[s.index()]);
    let mut emitted = HashSet::new();

    let mut inner = 0;
    for f in mesh.face_ids() {
        let [a, b, c] = mesh.face_vertices(f).map(|v| dual(sources.source(v)));
        if let (Some(a), Some(b), Some(c)) = (a, b, c) {
            if a != b && b != c && a != c && add_unique(&mut out, &mut emitted, [a, b, c]) {
                inner += 1;
            }
        }
    }

    if !mesh.has_topology() {
        mesh.update_topology();
    }
    mesh.update_border_flags();
    mesh.clear_selected();
    mesh.clear_visited();
    let mut border_seeds = Vec::new();
    for &s in seeds {
        let flags = mesh.flags_mut(s);
        if flags.border && !flags.selected {
            flags.selected = true;
            border_seeds.push(s);
        }
    }

    let max_steps = mesh.num_border_edges() + 1;
    let mut fans = 0;
    for &start in &border_seeds {
        if mesh.flags(start).visited {
            continue;
        }
        let Some(&(f, z)) = mesh
            .vertex_faces(start)
            .iter()
            .find(|&&(f, z)| mesh.is_border_edge(f, z as usize))
        else {
            continue;
        };

        let mut pos = Pos::from_corner(mesh, f, z as usize);
        let mut arc = Vec::new();
        push_distinct(&mut arc, dual(sources.source(start)));
        let mut steps = 0;
        loop {
            let rotation_bound = 2 * mesh.vertex_faces(pos.v).len() + 2;
            if !pos.next_b(mesh, rotation_bound) {
                log::warn!("border walk from {:?} lost the boundary", start);
                break;
            }
            steps += 1;
            let v = pos.v;
            push_distinct(&mut arc, dual(sources.source(v)));

            if mesh.flags(v).selected {
                mesh.flags_mut(v).visited = true;
                fans += fan_triangulate(&mut out, &mut emitted, &arc);
                arc.clear();
                push_distinct(&mut arc, dual(sources.source(v)));
                if v == start {
                    break;
                }
            }
            if steps > max_steps {
                log::warn!("border walk from {:?} did not close", start);
                break;
            }
        }
    }

    remove_unreferenced_vertices(&mut out);
    out.update_topology();
    out.update_border_flags();
    log::debug!(
        "dual mesh: {} inner triangles, {} border triangles, {} vertices",
        inner,
        fans,
        out.num_vertices()
    );
    out
}

fn push_distinct(arc: &mut Vec<VertexId>, v: Option<VertexId>) {
    if let Some(v) = v {
        if arc.last() != Some(&v) {
            arc.push(v);
        }
    }
}

/// Add `tri` unless a rotation of it was already added.
fn add_unique(out: &mut TriMesh, emitted: &mut HashSet<[VertexId; 3]>, tri: [VertexId; 3]) -> bool {
    let r = (0..3).min_by_key(|&i| tri[i]).unwrap_or(0);
    let key = [tri[r], tri[(r + 1) % 3], tri[(r + 2) % 3]];
    if !emitted.insert(key) {
        return false;
    }
    out.add_face(tri);
    true
}

/// Fan `(v0, v[i+1], v[i+2])` over a region sequence; returns faces added.
fn fan_triangulate(
    out: &mut TriMesh,
    emitted: &mut HashSet<[VertexId; 3]>,
    arc: &[VertexId],
) -> usize {
    if arc.len() < 3 {
        return 0;
    }
    let mut added = 0;
    for w in arc[1..].windows(2) {
        let tri = [arc[0], w[0], w[1]];
        // A region can come back later in the same arc.
        if tri[0] != tri[1] && tri[0] != tri[2] && add_unique(out, emitted, tri) {
            added += 1;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fixtures::{create_grid_mesh, create_tetrahedron};
    use crate::algo::voronoi::{compute_sources, VoronoiSources};
    use crate::mesh::{build_from_triangles, FaceId};

    fn dual_of(mesh: &mut TriMesh, seeds: &[VertexId]) -> TriMesh {
        let sources = compute_sources(mesh, seeds);
        build_dual_mesh(mesh, &sources, seeds)
    }

    fn has_face(mesh: &TriMesh, tri: [usize; 3]) -> bool {
        mesh.face_ids().any(|f| {
            let v = mesh.face_vertices(f).map(|v| v.index());
            (0..3).any(|r| [v[r], v[(r + 1) % 3], v[(r + 2) % 3]] == tri)
        })
    }

    #[test]
    fn test_every_vertex_a_seed_reproduces_closed_mesh() {
        let mut mesh = create_tetrahedron();
        let seeds: Vec<VertexId> = mesh.vertex_ids().collect();
        let dual = dual_of(&mut mesh, &seeds);
        assert_eq!(dual.num_vertices(), 4);
        assert_eq!(dual.num_faces(), 4);
        for f in mesh.face_ids() {
            let v = mesh.face_vertices(f).map(|v| v.index());
            assert!(has_face(&dual, v));
        }
    }

    #[test]
    fn test_every_vertex_a_seed_reproduces_open_mesh() {
        let mut mesh = create_grid_mesh(3, 1.0);
        let seeds: Vec<VertexId> = mesh.vertex_ids().collect();
        let dual = dual_of(&mut mesh, &seeds);
        assert_eq!(dual.num_faces(), mesh.num_faces());
        assert_eq!(dual.num_border_edges(), 12);
        // Every border seed was reached by a walk.
        assert_eq!(mesh.count_vertices_where(|f| f.visited), 12);
    }

    #[test]
    fn test_border_arc_through_third_region_is_closed() {
        // 5 x 5 grid; seeds at the four corners and at (0.5, 0.25).
        let mut mesh = create_grid_mesh(4, 1.0);
        let seeds: Vec<VertexId> = [0, 4, 7, 20, 24].map(VertexId::new).to_vec();
        let dual = dual_of(&mut mesh, &seeds);

        assert_eq!(dual.num_vertices(), 5);
        // The bottom side runs through the region of seed 7.
        assert!(has_face(&dual, [1, 2, 0]));
        for f in dual.face_ids() {
            assert!(dual.face_cross(f).z > 0.0, "face {:?} is flipped", f);
        }
    }

    #[test]
    fn test_repeated_region_triple_gives_one_triangle() {
        // Closed fan of six triangles around vertex 0. The ring cycles through
        // regions B, C, A twice, so two faces touch A, B and C in the same order.
        let mut vertices = vec![nalgebra::Point3::origin()];
        for i in 0..6 {
            let t = i as f64 * std::f64::consts::PI / 3.0;
            vertices.push(nalgebra::Point3::new(t.cos(), t.sin(), 0.0));
        }
        let faces: Vec<[usize; 3]> = (0..6).map(|i| [0, 1 + i, 1 + (i + 1) % 6]).collect();
        let mut mesh = build_from_triangles(&vertices, &faces).unwrap();

        let [a, b, c] = [0, 1, 2].map(VertexId::new);
        let labels = vec![Some(a), Some(b), Some(c), Some(a), Some(b), Some(c), Some(a)];
        let sources = VoronoiSources::from_labels(labels);
        let dual = build_dual_mesh(&mut mesh, &sources, &[a, b, c]);

        assert_eq!(dual.num_vertices(), 3);
        assert_eq!(dual.num_faces(), 1);
        assert!(dual.face_cross(FaceId::new(0)).z > 0.0);
    }

    #[test]
    fn test_unreached_vertices_are_skipped() {
        let mut mesh = create_grid_mesh(2, 1.0);
        let dual = dual_of(&mut mesh, &[]);
        assert!(dual.is_empty());
        assert_eq!(dual.num_faces(), 0);
    }

    #[test]
    fn test_fan_triangulate() {
        let mut out = TriMesh::new();
        let mut emitted = HashSet::new();
        let ids: Vec<VertexId> = (0..5)
            .map(|i| out.add_vertex(nalgebra::Point3::new(i as f64, 0.0, 0.0)))
            .collect();
        assert_eq!(fan_triangulate(&mut out, &mut emitted, &ids[..2]), 0);
        assert_eq!(fan_triangulate(&mut out, &mut emitted, &ids), 3);
        assert_eq!(out.face_vertices(FaceId::new(2)), [ids[0], ids[3], ids[4]]);
        // Returning to the first region skips the degenerate triangle.
        let back = [ids[0], ids[1], ids[0], ids[2]];
        assert_eq!(fan_triangulate(&mut out, &mut emitted, &back), 0);
        // A rotation of an emitted triangle is not added twice.
        assert_eq!(fan_triangulate(&mut out, &mut emitted, &[ids[2], ids[0], ids[1]]), 0);
        assert_eq!(out.num_faces(), 3);
    }
}
