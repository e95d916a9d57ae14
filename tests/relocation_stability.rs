//! Handles survive storage relocation, clone, move, and swap with no fixup
//! of any kind: they are indices, not addresses.

use mesh_arena::DebugInvariants;
use mesh_arena::prelude::*;

#[test]
fn reserve_relocates_storage_but_not_handles() {
    let mut mesh = Mesh::new();
    for i in 0..10 {
        mesh.add_vertex_at(Point3::new(i as f64, 0.0, 0.0));
    }
    let f = mesh.add_face_with(
        VertexHandle::new(0),
        VertexHandle::new(1),
        VertexHandle::new(2),
    );
    let stored = mesh.face(f).vertex(0).unwrap();
    let base_before = mesh.vertices().as_slice().as_ptr();

    // a second allocation keeps the vertex block from growing in place
    let _wedge = vec![0u8; 4096];
    mesh.reserve_vertices(100_000);

    let base_after = mesh.vertices().as_slice().as_ptr();
    assert_ne!(base_before, base_after, "reserve was expected to relocate");

    // the same stored handle resolves to the same element, untouched
    assert_eq!(stored, mesh.face(f).vertex(0).unwrap());
    assert_eq!(mesh.vertex(stored).position.x, 0.0);
    assert_eq!(mesh.vertex(VertexHandle::new(9)).position.x, 9.0);
    assert!(mesh.validate_invariants().is_ok());
}

#[test]
fn incremental_growth_never_invalidates_handles() {
    let mut mesh = Mesh::new();
    let v0 = mesh.add_vertex_at(Point3::new(-1.0, 0.0, 0.0));
    let mut bases = vec![mesh.vertices().as_slice().as_ptr()];

    for i in 0..1000 {
        mesh.add_vertex_at(Point3::new(i as f64, 0.0, 0.0));
        let base = mesh.vertices().as_slice().as_ptr();
        if *bases.last().unwrap() != base {
            bases.push(base);
            // every relocation leaves the old handle resolving unchanged
            assert_eq!(mesh.vertex(v0).position.x, -1.0);
        }
    }
    assert!(bases.len() > 1, "1000 pushes should relocate at least once");
    assert_eq!(mesh.vertex(v0).position.x, -1.0);
}

#[test]
fn delete_of_other_elements_leaves_handles_alone() {
    let mut mesh = Mesh::new();
    for i in 0..5 {
        mesh.add_vertex_at(Point3::new(i as f64, 0.0, 0.0));
    }
    let target = VertexHandle::new(2);

    mesh.delete_vertex(VertexHandle::new(0));
    mesh.delete_vertex(VertexHandle::new(4));
    // no compaction yet: the handle still names physical slot 2
    assert_eq!(mesh.vertex(target).position.x, 2.0);
    assert!(mesh.try_vertex(target).is_ok());
}

#[test]
fn cloned_mesh_resolves_identically_and_is_independent() {
    let mut mesh = Mesh::new();
    for i in 0..4 {
        mesh.add_vertex_at(Point3::new(i as f64, 0.0, 0.0));
    }
    let f = mesh.add_face_with(
        VertexHandle::new(1),
        VertexHandle::new(2),
        VertexHandle::new(3),
    );
    mesh.enable_vertex_quality();
    mesh.set_vertex_quality(VertexHandle::new(3), 7.5);
    mesh.register_vertex_attribute::<u32>("id").unwrap();
    mesh.vertex_attribute_mut::<u32>("id").unwrap()[1] = 11;

    let copy = mesh.clone();

    // same resolution, no rebasing of anything
    for i in 0..4 {
        let h = VertexHandle::new(i);
        assert_eq!(mesh.vertex(h).position, copy.vertex(h).position);
    }
    assert_eq!(mesh.face(f).vertices, copy.face(f).vertices);
    assert_eq!(copy.vertex_quality(VertexHandle::new(3)), 7.5);
    assert_eq!(copy.vertex_attribute::<u32>("id").unwrap()[1], 11);
    assert!(copy.validate_invariants().is_ok());

    // deep: mutating one never shows in the other
    let mut copy = copy;
    copy.vertex_mut(VertexHandle::new(0)).position.x = 100.0;
    copy.vertex_attribute_mut::<u32>("id").unwrap()[1] = 99;
    assert_eq!(mesh.vertex(VertexHandle::new(0)).position.x, 0.0);
    assert_eq!(mesh.vertex_attribute::<u32>("id").unwrap()[1], 11);
}

#[test]
fn moved_and_swapped_meshes_stay_consistent() {
    let mut a = Mesh::new();
    a.add_vertex_at(Point3::new(1.0, 0.0, 0.0));
    let mut b = Mesh::new();
    for i in 0..3 {
        b.add_vertex_at(Point3::new(10.0 + i as f64, 0.0, 0.0));
    }
    b.add_face_with(
        VertexHandle::new(0),
        VertexHandle::new(1),
        VertexHandle::new(2),
    );

    std::mem::swap(&mut a, &mut b);
    assert_eq!(a.vertex_count(), 3);
    assert_eq!(a.face_count(), 1);
    assert_eq!(b.vertex_count(), 1);
    assert_eq!(
        a.face(FaceHandle::new(0)).vertex(2),
        Some(VertexHandle::new(2))
    );
    assert!(a.validate_invariants().is_ok());
    assert!(b.validate_invariants().is_ok());

    // moving by value is just as uneventful
    let moved = a;
    assert_eq!(moved.vertex(VertexHandle::new(0)).position.x, 10.0);
    assert!(moved.validate_invariants().is_ok());
}
