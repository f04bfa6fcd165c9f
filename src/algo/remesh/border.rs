//! Boundary extraction and resampling.
//!
//! The boundary of a component is lifted into an [`EdgeMesh`], cut into
//! arcs at junctions, visited vertices and sharp turns, and every arc is
//! resampled at the target spacing. The samples become the fixed seeds.

use nalgebra::Point3;

use crate::algo::clean::remove_duplicate_vertices;
use crate::algo::spatial::PointIndex;
use crate::mesh::{build_from_points, EdgeMesh, TriMesh};

/// Copy every border edge of `mesh` into a boundary graph.
///
/// Endpoints keep their flags. Coincident endpoints are merged by exact
/// position, so the graph is connected wherever the boundary touches
/// itself. Needs current border bits.
pub fn extract_border(mesh: &TriMesh) -> EdgeMesh {
    let mut border = EdgeMesh::new();
    for f in mesh.face_ids() {
        let face = mesh.face(f);
        for z in 0..3 {
            if !face.border[z] {
                continue;
            }
            let (a, b) = (face.vertices[z], face.vertices[(z + 1) % 3]);
            let ea = border.add_vertex(*mesh.position(a), mesh.flags(a));
            let eb = border.add_vertex(*mesh.position(b), mesh.flags(b));
            border.add_edge(ea, eb);
        }
    }
    border.remove_duplicate_vertices();
    border
}

fn selected_positions(border: &EdgeMesh) -> Vec<Point3<f64>> {
    border
        .vertex_ids()
        .filter(|&v| border.flags(v).selected)
        .map(|v| *border.position(v))
        .collect()
}

/// Positions where three or more boundary edges meet.
pub fn boundary_junctions(mesh: &TriMesh) -> Vec<Point3<f64>> {
    let mut border = extract_border(mesh);
    border.clear_selected();
    border.select_branching_vertices();
    selected_positions(&border)
}

/// Positions where the boundary, with coincident edges collapsed, is not a
/// simple curve.
///
/// After a crease cut both sides of a seam carry a copy of the seam edges.
/// Collapsing them leaves the seam network, whose ends and branch points are
/// returned.
pub fn seam_junctions(mesh: &TriMesh) -> Vec<Point3<f64>> {
    let mut border = extract_border(mesh);
    border.remove_duplicate_edges();
    border.clear_selected();
    border.select_non_manifold_vertices();
    selected_positions(&border)
}

/// Set the visited flag on every vertex within `tolerance` of a point.
///
/// Returns the number of vertices flagged.
pub fn mark_visited_near(mesh: &mut TriMesh, points: &[Point3<f64>], tolerance: f64) -> usize {
    if points.is_empty() {
        return 0;
    }
    let index = PointIndex::new(points.to_vec());
    let mut marked = 0;
    for v in mesh.vertex_ids().collect::<Vec<_>>() {
        if index.any_within(mesh.position(v), tolerance) {
            mesh.flags_mut(v).visited = true;
            marked += 1;
        }
    }
    marked
}

/// Resample a boundary graph into fixed seed points spaced about `spacing`.
///
/// The graph is split at vertices of degree other than two and at visited
/// vertices. With a positive `crease_angle_rad` it is split again wherever
/// the boundary turns by more than that angle. Each resulting arc is sampled
/// uniformly; the returned point mesh has no duplicates and every vertex
/// selected.
pub fn resample_border(mut border: EdgeMesh, crease_angle_rad: f64, spacing: f64) -> TriMesh {
    border.clear_selected();
    border.select_non_manifold_vertices();
    border.select_visited();
    let split = border.split_selected_vertices();

    let mut corners = 0;
    if crease_angle_rad > 0.0 {
        border.clear_selected();
        corners = border.select_crease_vertices(crease_angle_rad);
        border.split_selected_vertices();
    }

    let samples = border.uniform_samples(spacing);
    let mut points = build_from_points(&samples);
    remove_duplicate_vertices(&mut points);
    points.select_all();
    log::debug!(
        "border resampling: {} junction splits, {} corners, {} samples",
        split,
        corners,
        points.num_vertices()
    );
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::crease::crease_cut;
    use crate::algo::fixtures::{create_cube_mesh, create_disk_mesh, create_grid_mesh};
    use crate::mesh::build_from_triangles;

    fn has_point(mesh: &TriMesh, p: Point3<f64>) -> bool {
        mesh.positions().any(|q| (q - p).norm() < 1e-12)
    }

    #[test]
    fn test_extract_border_of_grid() {
        let mesh = create_grid_mesh(2, 1.0);
        let border = extract_border(&mesh);
        assert_eq!(border.num_vertices(), 8);
        assert_eq!(border.num_edges(), 8);
        assert!(border.degrees().iter().all(|&d| d == 2));
        let arcs = border.arcs();
        assert_eq!(arcs.len(), 1);
        assert!(arcs[0].closed);
    }

    #[test]
    fn test_closed_mesh_has_no_border() {
        let mesh = create_cube_mesh(2);
        assert_eq!(extract_border(&mesh).num_edges(), 0);
        assert!(boundary_junctions(&mesh).is_empty());
        assert!(seam_junctions(&mesh).is_empty());
    }

    #[test]
    fn test_resample_square_splits_at_corners() {
        let mesh = create_grid_mesh(2, 1.0);
        let points = resample_border(extract_border(&mesh), 80f64.to_radians(), 0.3);
        // Four sides of length 1, four intervals each, corners shared.
        assert_eq!(points.num_vertices(), 16);
        assert_eq!(points.num_faces(), 0);
        assert_eq!(points.count_vertices_where(|f| f.selected), 16);
        for corner in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            assert!(has_point(&points, Point3::new(corner.0, corner.1, 0.0)));
        }
    }

    #[test]
    fn test_resample_loop_without_corners() {
        let mesh = create_grid_mesh(2, 1.0);
        let points = resample_border(extract_border(&mesh), 0.0, 0.3);
        // Perimeter 4 at spacing 0.3 gives 14 intervals on a single loop.
        assert_eq!(points.num_vertices(), 14);
    }

    #[test]
    fn test_resample_splits_at_visited_vertices() {
        let mut mesh = create_disk_mesh(3, 1.0, Point3::origin());
        let start = mesh
            .vertex_ids()
            .find(|&v| mesh.flags(v).border)
            .unwrap();
        let p = *mesh.position(start);
        assert_eq!(mark_visited_near(&mut mesh, &[p], 1e-9), 1);

        let points = resample_border(extract_border(&mesh), 0.0, 0.25);
        assert!(has_point(&points, p));
    }

    #[test]
    fn test_bowtie_vertex_is_a_junction() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
        ];
        let mesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 3, 4]]).unwrap();
        let junctions = boundary_junctions(&mesh);
        assert_eq!(junctions, vec![Point3::new(0.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_seam_junctions_at_cube_corners() {
        let mut mesh = create_cube_mesh(2);
        crease_cut(&mut mesh, 80f64.to_radians());
        mesh.update_topology();
        mesh.update_border_flags();

        let junctions = seam_junctions(&mesh);
        assert_eq!(junctions.len(), 8);
        for p in &junctions {
            for c in [p.x, p.y, p.z] {
                assert!(c == 0.0 || c == 1.0);
            }
        }
        // Every piece touching a corner gets flagged.
        assert_eq!(mark_visited_near(&mut mesh, &junctions, 1e-6), 24);
    }
}
