//! Container lifecycle through the mesh surface: adds, tombstones,
//! compaction, and the bookkeeping invariants that must hold at every
//! observation point.

use mesh_arena::DebugInvariants;
use mesh_arena::prelude::*;

fn mesh_with_vertices(n: usize) -> Mesh {
    let mut mesh = Mesh::new();
    for i in 0..n {
        mesh.add_vertex_at(Point3::new(i as f64, 0.0, 0.0));
    }
    mesh
}

#[test]
fn slot_indices_track_through_mutations() {
    let mut mesh = mesh_with_vertices(6);
    mesh.delete_vertex(VertexHandle::new(2));
    mesh.delete_vertex(VertexHandle::new(4));

    // every physical slot caches its own index, tombstones included
    for (slot, v) in mesh.vertices().iter_with_deleted().enumerate() {
        assert_eq!(v.index(), slot);
    }

    mesh.compact_vertices();
    for (slot, v) in mesh.vertices().iter_with_deleted().enumerate() {
        assert_eq!(v.index(), slot);
        assert_eq!(v.handle(), VertexHandle::new(slot));
    }
    assert!(mesh.validate_invariants().is_ok());
}

#[test]
fn counts_reconcile_at_every_step() {
    let mut mesh = mesh_with_vertices(5);
    let check = |mesh: &Mesh| {
        let c = mesh.vertices();
        assert_eq!(c.len(), c.total_len() - c.deleted_len());
        assert_eq!(c.len(), mesh.vertex_count());
    };

    check(&mesh);
    mesh.delete_vertex(VertexHandle::new(0));
    check(&mesh);
    mesh.delete_vertex(VertexHandle::new(3));
    check(&mesh);
    assert_eq!(mesh.vertices().deleted_len(), 2);
    mesh.add_vertex();
    check(&mesh);
    mesh.compact_vertices();
    check(&mesh);
    assert_eq!(mesh.vertices().deleted_len(), 0);
    mesh.clear();
    check(&mesh);
}

#[test]
fn identity_compaction_changes_nothing_but_the_version() {
    let mut mesh = mesh_with_vertices(4);
    let before: Vec<f64> = mesh.vertices().iter().map(|v| v.position.x).collect();
    let version = mesh.vertices().version();

    let remap = mesh.compact_vertices();
    assert!(remap.is_identity());
    assert_eq!(remap.live_len(), 4);

    let after: Vec<f64> = mesh.vertices().iter().map(|v| v.position.x).collect();
    assert_eq!(before, after);
    // still a structural mutation
    assert_ne!(mesh.vertices().version(), version);
}

#[test]
fn live_iteration_skips_tombstones_and_knows_its_length() {
    let mut mesh = mesh_with_vertices(5);
    mesh.delete_vertex(VertexHandle::new(1));
    mesh.delete_vertex(VertexHandle::new(2));

    let iter = mesh.vertices().iter();
    assert_eq!(iter.len(), 3);
    let xs: Vec<f64> = iter.map(|v| v.position.x).collect();
    assert_eq!(xs, [0.0, 3.0, 4.0]);

    assert_eq!(mesh.vertices().iter_with_deleted().count(), 5);
    let handles: Vec<VertexHandle> = mesh.vertices().handles().collect();
    assert_eq!(
        handles,
        [VertexHandle::new(0), VertexHandle::new(3), VertexHandle::new(4)]
    );
}

#[test]
fn deleted_slots_keep_their_data_until_compaction() {
    let mut mesh = mesh_with_vertices(3);
    let h = VertexHandle::new(1);
    mesh.delete_vertex(h);

    assert!(!mesh.vertices().is_live(h.index()));
    // the panicking resolver still reaches the tombstone's data
    assert_eq!(mesh.vertex(h).position.x, 1.0);
    assert!(mesh.vertex(h).is_deleted());
    // the checked resolver reports it
    assert!(matches!(
        mesh.try_vertex(h),
        Err(MeshArenaError::DeletedElement { .. })
    ));

    mesh.compact_vertices();
    assert_eq!(mesh.vertices().total_len(), 2);
}

#[test]
#[should_panic(expected = "deleted twice")]
fn double_delete_is_a_precondition_violation() {
    let mut mesh = mesh_with_vertices(2);
    mesh.delete_vertex(VertexHandle::new(0));
    mesh.delete_vertex(VertexHandle::new(0));
}

#[test]
fn out_of_range_resolution_errors() {
    let mesh = mesh_with_vertices(2);
    assert!(matches!(
        mesh.try_vertex(VertexHandle::new(7)),
        Err(MeshArenaError::InvalidHandle { index: 7, len: 2, .. })
    ));
}

#[test]
fn version_counter_detects_staleness() {
    let mut mesh = mesh_with_vertices(1);
    let cached = mesh.vertices().version();
    assert_eq!(mesh.vertices().version(), cached);

    mesh.add_vertex();
    assert_ne!(mesh.vertices().version(), cached);

    let cached = mesh.vertices().version();
    mesh.enable_vertex_colors();
    assert_ne!(
        mesh.vertices().version(),
        cached,
        "attribute toggling must bump the version"
    );

    // other containers are independent
    let face_version = mesh.faces().version();
    mesh.add_vertex();
    assert_eq!(mesh.faces().version(), face_version);
}

#[test]
fn index_if_compact_agrees_with_compaction() {
    let mut mesh = mesh_with_vertices(6);
    for i in [1usize, 2, 5] {
        mesh.delete_vertex(VertexHandle::new(i));
    }

    let predicted: Vec<Option<usize>> = (0..6)
        .map(|i| mesh.vertices().index_if_compact(i))
        .collect();
    let remap = mesh.compact_vertices();
    let actual: Vec<Option<usize>> = (0..6).map(|i| remap.target(i)).collect();
    assert_eq!(predicted, actual);
}

#[test]
fn bulk_add_matches_incremental_add() {
    let mut bulk = Mesh::new();
    let first = bulk.add_vertices(4);
    assert_eq!(first, VertexHandle::new(0));
    assert_eq!(bulk.vertex_count(), 4);

    let next = bulk.add_vertices(0);
    assert_eq!(next, VertexHandle::new(4));
    assert_eq!(bulk.vertex_count(), 4);

    let incremental = mesh_with_vertices(4);
    assert_eq!(bulk.vertex_count(), incremental.vertex_count());
    for (slot, v) in bulk.vertices().iter_with_deleted().enumerate() {
        assert_eq!(v.index(), slot);
    }
}

#[test]
fn reserve_changes_no_observable_state() {
    let mut mesh = mesh_with_vertices(3);
    let version = mesh.vertices().version();
    mesh.reserve_vertices(10_000);
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.vertices().version(), version);
    assert_eq!(mesh.vertex(VertexHandle::new(2)).position.x, 2.0);
    assert!(mesh.validate_invariants().is_ok());
}
