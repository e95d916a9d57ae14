//! Vertex-facing surface of [`Mesh`]: lifecycle, resolution, and the
//! per-vertex optional attributes (normal, color, quality, adjacency
//! lists, custom columns).

use crate::element::{AdjacencyRow, EdgeHandle, ElementKind, FaceHandle, Vertex, VertexHandle};
use crate::geometry::{Color, Point3, Vector3};
use crate::mesh::Mesh;
use crate::mesh_error::MeshArenaError;

impl Mesh {
    /// Number of live vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Adds a default vertex (position at the origin) and returns its
    /// handle. Storage may relocate; existing handles are unaffected.
    ///
    /// # Panics
    ///
    /// Panics if the new index is not representable in a handle
    /// (`u32::MAX` elements).
    pub fn add_vertex(&mut self) -> VertexHandle {
        VertexHandle::new(self.vertices.add())
    }

    /// Adds a vertex at `position`.
    pub fn add_vertex_at(&mut self, position: Point3<f64>) -> VertexHandle {
        let h = self.add_vertex();
        self.vertices.get_mut(h.index()).position = position;
        h
    }

    /// Adds `n` default vertices in one go and returns the handle of the
    /// first. With `n == 0` nothing is added and the returned handle names
    /// the slot the next add will fill.
    pub fn add_vertices(&mut self, n: usize) -> VertexHandle {
        VertexHandle::new(self.vertices.add_n(n))
    }

    /// Pre-allocates capacity for `additional` more vertices in the
    /// container and every enabled column. Purely an allocation-count
    /// optimization: handles and indices are unaffected either way.
    pub fn reserve_vertices(&mut self, additional: usize) {
        self.vertices.reserve(additional);
    }

    /// Tombstones the vertex. Its slot (and attribute rows) are retained
    /// until [`compact_vertices`](Self::compact_vertices); references to it
    /// elsewhere in the mesh are left in place and become null at that
    /// compaction.
    ///
    /// # Panics
    ///
    /// Panics if `h` is out of range or already deleted.
    pub fn delete_vertex(&mut self, h: VertexHandle) {
        self.vertices.delete(h.index());
    }

    /// Resolves `h`, tombstoned or not.
    ///
    /// # Panics
    ///
    /// Panics if `h` is out of range.
    #[must_use]
    pub fn vertex(&self, h: VertexHandle) -> &Vertex {
        self.vertices.get(h.index())
    }

    /// Resolves `h`, reporting an out-of-range handle or a tombstoned
    /// target as an error.
    pub fn try_vertex(&self, h: VertexHandle) -> Result<&Vertex, MeshArenaError> {
        self.vertices.try_get(h.index())
    }

    /// Mutable access to the vertex at `h`.
    ///
    /// The `DELETED` flag is container bookkeeping; toggle the other flag
    /// bits freely but leave that one to [`delete_vertex`](Self::delete_vertex).
    ///
    /// # Panics
    ///
    /// Panics if `h` is out of range.
    pub fn vertex_mut(&mut self, h: VertexHandle) -> &mut Vertex {
        self.vertices.get_mut(h.index())
    }

    pub fn try_vertex_mut(&mut self, h: VertexHandle) -> Result<&mut Vertex, MeshArenaError> {
        self.vertices.try_get_mut(h.index())
    }

    // Normals.

    /// Enables per-vertex normals, value-initializing the whole column
    /// (also when already enabled).
    pub fn enable_vertex_normals(&mut self) {
        self.vertices.toggle_attributes(|a, len| a.normal.enable(len));
    }

    /// Disables per-vertex normals, dropping the column's storage.
    pub fn disable_vertex_normals(&mut self) {
        self.vertices.toggle_attributes(|a, _| a.normal.disable());
    }

    #[must_use]
    pub fn has_vertex_normals(&self) -> bool {
        self.vertices.attributes().normal.is_enabled()
    }

    /// The normal of `h`.
    ///
    /// # Panics
    ///
    /// Panics if normals are disabled or `h` is out of range.
    #[must_use]
    pub fn vertex_normal(&self, h: VertexHandle) -> Vector3<f64> {
        *self
            .vertices
            .attributes()
            .normal
            .get(h.index())
            .expect("vertex normals are disabled")
    }

    pub fn try_vertex_normal(&self, h: VertexHandle) -> Result<Vector3<f64>, MeshArenaError> {
        self.vertices.try_get(h.index())?;
        self.vertices
            .attributes()
            .normal
            .get(h.index())
            .copied()
            .ok_or(disabled(ElementKind::Vertex, "normal"))
    }

    /// # Panics
    ///
    /// Panics if normals are disabled or `h` is out of range.
    pub fn set_vertex_normal(&mut self, h: VertexHandle, normal: Vector3<f64>) {
        *self
            .vertices
            .attributes_mut()
            .normal
            .get_mut(h.index())
            .expect("vertex normals are disabled") = normal;
    }

    pub fn try_set_vertex_normal(
        &mut self,
        h: VertexHandle,
        normal: Vector3<f64>,
    ) -> Result<(), MeshArenaError> {
        self.vertices.try_get(h.index())?;
        *self
            .vertices
            .attributes_mut()
            .normal
            .get_mut(h.index())
            .ok_or(disabled(ElementKind::Vertex, "normal"))? = normal;
        Ok(())
    }

    // Colors.

    pub fn enable_vertex_colors(&mut self) {
        self.vertices.toggle_attributes(|a, len| a.color.enable(len));
    }

    pub fn disable_vertex_colors(&mut self) {
        self.vertices.toggle_attributes(|a, _| a.color.disable());
    }

    #[must_use]
    pub fn has_vertex_colors(&self) -> bool {
        self.vertices.attributes().color.is_enabled()
    }

    /// # Panics
    ///
    /// Panics if colors are disabled or `h` is out of range.
    #[must_use]
    pub fn vertex_color(&self, h: VertexHandle) -> Color {
        *self
            .vertices
            .attributes()
            .color
            .get(h.index())
            .expect("vertex colors are disabled")
    }

    pub fn try_vertex_color(&self, h: VertexHandle) -> Result<Color, MeshArenaError> {
        self.vertices.try_get(h.index())?;
        self.vertices
            .attributes()
            .color
            .get(h.index())
            .copied()
            .ok_or(disabled(ElementKind::Vertex, "color"))
    }

    /// # Panics
    ///
    /// Panics if colors are disabled or `h` is out of range.
    pub fn set_vertex_color(&mut self, h: VertexHandle, color: Color) {
        *self
            .vertices
            .attributes_mut()
            .color
            .get_mut(h.index())
            .expect("vertex colors are disabled") = color;
    }

    pub fn try_set_vertex_color(
        &mut self,
        h: VertexHandle,
        color: Color,
    ) -> Result<(), MeshArenaError> {
        self.vertices.try_get(h.index())?;
        *self
            .vertices
            .attributes_mut()
            .color
            .get_mut(h.index())
            .ok_or(disabled(ElementKind::Vertex, "color"))? = color;
        Ok(())
    }

    // Quality scalars.

    pub fn enable_vertex_quality(&mut self) {
        self.vertices.toggle_attributes(|a, len| a.quality.enable(len));
    }

    pub fn disable_vertex_quality(&mut self) {
        self.vertices.toggle_attributes(|a, _| a.quality.disable());
    }

    #[must_use]
    pub fn has_vertex_quality(&self) -> bool {
        self.vertices.attributes().quality.is_enabled()
    }

    /// # Panics
    ///
    /// Panics if quality is disabled or `h` is out of range.
    #[must_use]
    pub fn vertex_quality(&self, h: VertexHandle) -> f64 {
        *self
            .vertices
            .attributes()
            .quality
            .get(h.index())
            .expect("vertex quality is disabled")
    }

    pub fn try_vertex_quality(&self, h: VertexHandle) -> Result<f64, MeshArenaError> {
        self.vertices.try_get(h.index())?;
        self.vertices
            .attributes()
            .quality
            .get(h.index())
            .copied()
            .ok_or(disabled(ElementKind::Vertex, "quality"))
    }

    /// # Panics
    ///
    /// Panics if quality is disabled or `h` is out of range.
    pub fn set_vertex_quality(&mut self, h: VertexHandle, quality: f64) {
        *self
            .vertices
            .attributes_mut()
            .quality
            .get_mut(h.index())
            .expect("vertex quality is disabled") = quality;
    }

    pub fn try_set_vertex_quality(
        &mut self,
        h: VertexHandle,
        quality: f64,
    ) -> Result<(), MeshArenaError> {
        self.vertices.try_get(h.index())?;
        *self
            .vertices
            .attributes_mut()
            .quality
            .get_mut(h.index())
            .ok_or(disabled(ElementKind::Vertex, "quality"))? = quality;
        Ok(())
    }

    // Adjacency lists. Rows hold handles; compaction fixup rewrites them
    // like any other stored reference, appends offset them.

    pub fn enable_vertex_adjacent_faces(&mut self) {
        self.vertices
            .toggle_attributes(|a, len| a.adjacent_faces.enable(len));
    }

    pub fn disable_vertex_adjacent_faces(&mut self) {
        self.vertices.toggle_attributes(|a, _| a.adjacent_faces.disable());
    }

    #[must_use]
    pub fn has_vertex_adjacent_faces(&self) -> bool {
        self.vertices.attributes().adjacent_faces.is_enabled()
    }

    /// The faces recorded as adjacent to `h`.
    ///
    /// # Panics
    ///
    /// Panics if adjacent-face lists are disabled or `h` is out of range.
    #[must_use]
    pub fn vertex_adjacent_faces(&self, h: VertexHandle) -> &AdjacencyRow<FaceHandle> {
        self.vertices
            .attributes()
            .adjacent_faces
            .get(h.index())
            .expect("vertex adjacent-face lists are disabled")
    }

    /// # Panics
    ///
    /// Panics if adjacent-face lists are disabled or `h` is out of range.
    pub fn vertex_adjacent_faces_mut(&mut self, h: VertexHandle) -> &mut AdjacencyRow<FaceHandle> {
        self.vertices
            .attributes_mut()
            .adjacent_faces
            .get_mut(h.index())
            .expect("vertex adjacent-face lists are disabled")
    }

    pub fn try_vertex_adjacent_faces(
        &self,
        h: VertexHandle,
    ) -> Result<&AdjacencyRow<FaceHandle>, MeshArenaError> {
        self.vertices.try_get(h.index())?;
        self.vertices
            .attributes()
            .adjacent_faces
            .get(h.index())
            .ok_or(disabled(ElementKind::Vertex, "adjacent_faces"))
    }

    pub fn try_vertex_adjacent_faces_mut(
        &mut self,
        h: VertexHandle,
    ) -> Result<&mut AdjacencyRow<FaceHandle>, MeshArenaError> {
        self.vertices.try_get(h.index())?;
        self.vertices
            .attributes_mut()
            .adjacent_faces
            .get_mut(h.index())
            .ok_or(disabled(ElementKind::Vertex, "adjacent_faces"))
    }

    pub fn enable_vertex_adjacent_vertices(&mut self) {
        self.vertices
            .toggle_attributes(|a, len| a.adjacent_vertices.enable(len));
    }

    pub fn disable_vertex_adjacent_vertices(&mut self) {
        self.vertices
            .toggle_attributes(|a, _| a.adjacent_vertices.disable());
    }

    #[must_use]
    pub fn has_vertex_adjacent_vertices(&self) -> bool {
        self.vertices.attributes().adjacent_vertices.is_enabled()
    }

    /// # Panics
    ///
    /// Panics if adjacent-vertex lists are disabled or `h` is out of range.
    #[must_use]
    pub fn vertex_adjacent_vertices(&self, h: VertexHandle) -> &AdjacencyRow<VertexHandle> {
        self.vertices
            .attributes()
            .adjacent_vertices
            .get(h.index())
            .expect("vertex adjacent-vertex lists are disabled")
    }

    /// # Panics
    ///
    /// Panics if adjacent-vertex lists are disabled or `h` is out of range.
    pub fn vertex_adjacent_vertices_mut(
        &mut self,
        h: VertexHandle,
    ) -> &mut AdjacencyRow<VertexHandle> {
        self.vertices
            .attributes_mut()
            .adjacent_vertices
            .get_mut(h.index())
            .expect("vertex adjacent-vertex lists are disabled")
    }

    pub fn try_vertex_adjacent_vertices(
        &self,
        h: VertexHandle,
    ) -> Result<&AdjacencyRow<VertexHandle>, MeshArenaError> {
        self.vertices.try_get(h.index())?;
        self.vertices
            .attributes()
            .adjacent_vertices
            .get(h.index())
            .ok_or(disabled(ElementKind::Vertex, "adjacent_vertices"))
    }

    pub fn try_vertex_adjacent_vertices_mut(
        &mut self,
        h: VertexHandle,
    ) -> Result<&mut AdjacencyRow<VertexHandle>, MeshArenaError> {
        self.vertices.try_get(h.index())?;
        self.vertices
            .attributes_mut()
            .adjacent_vertices
            .get_mut(h.index())
            .ok_or(disabled(ElementKind::Vertex, "adjacent_vertices"))
    }

    pub fn enable_vertex_adjacent_edges(&mut self) {
        self.vertices
            .toggle_attributes(|a, len| a.adjacent_edges.enable(len));
    }

    pub fn disable_vertex_adjacent_edges(&mut self) {
        self.vertices.toggle_attributes(|a, _| a.adjacent_edges.disable());
    }

    #[must_use]
    pub fn has_vertex_adjacent_edges(&self) -> bool {
        self.vertices.attributes().adjacent_edges.is_enabled()
    }

    /// # Panics
    ///
    /// Panics if adjacent-edge lists are disabled or `h` is out of range.
    #[must_use]
    pub fn vertex_adjacent_edges(&self, h: VertexHandle) -> &AdjacencyRow<EdgeHandle> {
        self.vertices
            .attributes()
            .adjacent_edges
            .get(h.index())
            .expect("vertex adjacent-edge lists are disabled")
    }

    /// # Panics
    ///
    /// Panics if adjacent-edge lists are disabled or `h` is out of range.
    pub fn vertex_adjacent_edges_mut(&mut self, h: VertexHandle) -> &mut AdjacencyRow<EdgeHandle> {
        self.vertices
            .attributes_mut()
            .adjacent_edges
            .get_mut(h.index())
            .expect("vertex adjacent-edge lists are disabled")
    }

    pub fn try_vertex_adjacent_edges(
        &self,
        h: VertexHandle,
    ) -> Result<&AdjacencyRow<EdgeHandle>, MeshArenaError> {
        self.vertices.try_get(h.index())?;
        self.vertices
            .attributes()
            .adjacent_edges
            .get(h.index())
            .ok_or(disabled(ElementKind::Vertex, "adjacent_edges"))
    }

    pub fn try_vertex_adjacent_edges_mut(
        &mut self,
        h: VertexHandle,
    ) -> Result<&mut AdjacencyRow<EdgeHandle>, MeshArenaError> {
        self.vertices.try_get(h.index())?;
        self.vertices
            .attributes_mut()
            .adjacent_edges
            .get_mut(h.index())
            .ok_or(disabled(ElementKind::Vertex, "adjacent_edges"))
    }

    // Custom attributes.

    /// Registers a custom per-vertex column under `name`, default-filled
    /// to the current slot count. Errors if the name is taken.
    pub fn register_vertex_attribute<T>(&mut self, name: &str) -> Result<(), MeshArenaError>
    where
        T: Clone + Default + Send + Sync + 'static,
    {
        self.vertices.toggle_attributes(|a, _| a.custom.register::<T>(name))
    }

    /// Removes the custom per-vertex column under `name`.
    pub fn remove_vertex_attribute(&mut self, name: &str) -> Result<(), MeshArenaError> {
        self.vertices.toggle_attributes(|a, _| a.custom.remove(name))
    }

    #[must_use]
    pub fn has_vertex_attribute(&self, name: &str) -> bool {
        self.vertices.attributes().custom.contains(name)
    }

    /// The custom column under `name`, index-aligned with the vertex
    /// slots (tombstones included). Errors on a missing name or a type
    /// mismatch.
    pub fn vertex_attribute<T: 'static>(&self, name: &str) -> Result<&[T], MeshArenaError> {
        self.vertices.attributes().custom.column::<T>(name)
    }

    pub fn vertex_attribute_mut<T: 'static>(
        &mut self,
        name: &str,
    ) -> Result<&mut [T], MeshArenaError> {
        self.vertices.attributes_mut().custom.column_mut::<T>(name)
    }

    /// Registered custom per-vertex attribute names, sorted.
    #[must_use]
    pub fn vertex_attribute_names(&self) -> Vec<String> {
        self.vertices.attributes().custom.names()
    }
}

pub(super) fn disabled(kind: ElementKind, attribute: &'static str) -> MeshArenaError {
    MeshArenaError::AttributeDisabled { kind, attribute }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_attribute_surface() {
        let mut mesh = Mesh::new();
        let v = mesh.add_vertex_at(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.vertex(v).position, Point3::new(1.0, 2.0, 3.0));

        assert!(!mesh.has_vertex_normals());
        assert!(matches!(
            mesh.try_vertex_normal(v),
            Err(MeshArenaError::AttributeDisabled {
                kind: ElementKind::Vertex,
                attribute: "normal",
            })
        ));

        mesh.enable_vertex_normals();
        assert_eq!(mesh.vertex_normal(v), Vector3::zeros());
        mesh.set_vertex_normal(v, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(mesh.try_vertex_normal(v).unwrap(), Vector3::new(0.0, 0.0, 1.0));

        mesh.enable_vertex_quality();
        mesh.try_set_vertex_quality(v, 0.5).unwrap();
        assert_eq!(mesh.vertex_quality(v), 0.5);

        mesh.disable_vertex_normals();
        assert!(mesh.try_vertex_normal(v).is_err());
    }

    #[test]
    #[should_panic(expected = "vertex colors are disabled")]
    fn disabled_panicking_getter() {
        let mut mesh = Mesh::new();
        let v = mesh.add_vertex();
        let _ = mesh.vertex_color(v);
    }

    #[test]
    fn checked_access_reports_tombstones() {
        let mut mesh = Mesh::new();
        mesh.enable_vertex_quality();
        let v = mesh.add_vertex();
        mesh.delete_vertex(v);
        // tombstone data stays reachable through the panicking surface
        assert_eq!(mesh.vertex_quality(v), 0.0);
        assert!(matches!(
            mesh.try_vertex_quality(v),
            Err(MeshArenaError::DeletedElement { .. })
        ));
    }

    #[test]
    fn adjacency_rows_grow_in_place() {
        let mut mesh = Mesh::new();
        let v = mesh.add_vertex();
        let w = mesh.add_vertex();
        mesh.enable_vertex_adjacent_vertices();
        mesh.vertex_adjacent_vertices_mut(v).push(Some(w));
        mesh.vertex_adjacent_vertices_mut(v).push(None);
        assert_eq!(mesh.vertex_adjacent_vertices(v).as_slice(), [Some(w), None]);
        assert!(mesh.vertex_adjacent_vertices(w).is_empty());
    }

    #[test]
    fn custom_attributes_through_the_mesh() {
        let mut mesh = Mesh::new();
        mesh.add_vertices(3);
        mesh.register_vertex_attribute::<u32>("area_id").unwrap();
        mesh.vertex_attribute_mut::<u32>("area_id").unwrap()[2] = 7;
        assert_eq!(mesh.vertex_attribute::<u32>("area_id").unwrap(), &[0, 0, 7]);
        assert!(mesh.vertex_attribute::<i8>("area_id").is_err());
        assert_eq!(mesh.vertex_attribute_names(), ["area_id"]);
        mesh.remove_vertex_attribute("area_id").unwrap();
        assert!(!mesh.has_vertex_attribute("area_id"));
    }
}
