//! Face-facing surface of [`Mesh`].

use crate::element::{ElementKind, Face, FaceHandle, VertexHandle};
use crate::geometry::{Color, Vector3};
use crate::mesh::Mesh;
use crate::mesh::vertices::disabled;
use crate::mesh_error::MeshArenaError;

impl Mesh {
    /// Number of live faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Adds a face with all three corner references null.
    ///
    /// # Panics
    ///
    /// Panics if the new index is not representable in a handle.
    pub fn add_face(&mut self) -> FaceHandle {
        FaceHandle::new(self.faces.add())
    }

    /// Adds a face referencing the three given vertices.
    ///
    /// The handles are stored as-is; range validity is the caller's
    /// contract (checked by invariant validation, not here).
    pub fn add_face_with(
        &mut self,
        v0: VertexHandle,
        v1: VertexHandle,
        v2: VertexHandle,
    ) -> FaceHandle {
        let h = self.add_face();
        self.faces.get_mut(h.index()).set_vertices(v0, v1, v2);
        h
    }

    /// Adds `n` default faces and returns the handle of the first. With
    /// `n == 0` nothing is added and the returned handle names the slot
    /// the next add will fill.
    pub fn add_faces(&mut self, n: usize) -> FaceHandle {
        FaceHandle::new(self.faces.add_n(n))
    }

    pub fn reserve_faces(&mut self, additional: usize) {
        self.faces.reserve(additional);
    }

    /// Tombstones the face; vertices it references are unaffected.
    ///
    /// # Panics
    ///
    /// Panics if `h` is out of range or already deleted.
    pub fn delete_face(&mut self, h: FaceHandle) {
        self.faces.delete(h.index());
    }

    /// Resolves `h`, tombstoned or not.
    ///
    /// # Panics
    ///
    /// Panics if `h` is out of range.
    #[must_use]
    pub fn face(&self, h: FaceHandle) -> &Face {
        self.faces.get(h.index())
    }

    pub fn try_face(&self, h: FaceHandle) -> Result<&Face, MeshArenaError> {
        self.faces.try_get(h.index())
    }

    /// # Panics
    ///
    /// Panics if `h` is out of range.
    pub fn face_mut(&mut self, h: FaceHandle) -> &mut Face {
        self.faces.get_mut(h.index())
    }

    pub fn try_face_mut(&mut self, h: FaceHandle) -> Result<&mut Face, MeshArenaError> {
        self.faces.try_get_mut(h.index())
    }

    // Normals.

    pub fn enable_face_normals(&mut self) {
        self.faces.toggle_attributes(|a, len| a.normal.enable(len));
    }

    pub fn disable_face_normals(&mut self) {
        self.faces.toggle_attributes(|a, _| a.normal.disable());
    }

    #[must_use]
    pub fn has_face_normals(&self) -> bool {
        self.faces.attributes().normal.is_enabled()
    }

    /// # Panics
    ///
    /// Panics if face normals are disabled or `h` is out of range.
    #[must_use]
    pub fn face_normal(&self, h: FaceHandle) -> Vector3<f64> {
        *self
            .faces
            .attributes()
            .normal
            .get(h.index())
            .expect("face normals are disabled")
    }

    pub fn try_face_normal(&self, h: FaceHandle) -> Result<Vector3<f64>, MeshArenaError> {
        self.faces.try_get(h.index())?;
        self.faces
            .attributes()
            .normal
            .get(h.index())
            .copied()
            .ok_or(disabled(ElementKind::Face, "normal"))
    }

    /// # Panics
    ///
    /// Panics if face normals are disabled or `h` is out of range.
    pub fn set_face_normal(&mut self, h: FaceHandle, normal: Vector3<f64>) {
        *self
            .faces
            .attributes_mut()
            .normal
            .get_mut(h.index())
            .expect("face normals are disabled") = normal;
    }

    pub fn try_set_face_normal(
        &mut self,
        h: FaceHandle,
        normal: Vector3<f64>,
    ) -> Result<(), MeshArenaError> {
        self.faces.try_get(h.index())?;
        *self
            .faces
            .attributes_mut()
            .normal
            .get_mut(h.index())
            .ok_or(disabled(ElementKind::Face, "normal"))? = normal;
        Ok(())
    }

    // Colors.

    pub fn enable_face_colors(&mut self) {
        self.faces.toggle_attributes(|a, len| a.color.enable(len));
    }

    pub fn disable_face_colors(&mut self) {
        self.faces.toggle_attributes(|a, _| a.color.disable());
    }

    #[must_use]
    pub fn has_face_colors(&self) -> bool {
        self.faces.attributes().color.is_enabled()
    }

    /// # Panics
    ///
    /// Panics if face colors are disabled or `h` is out of range.
    #[must_use]
    pub fn face_color(&self, h: FaceHandle) -> Color {
        *self
            .faces
            .attributes()
            .color
            .get(h.index())
            .expect("face colors are disabled")
    }

    pub fn try_face_color(&self, h: FaceHandle) -> Result<Color, MeshArenaError> {
        self.faces.try_get(h.index())?;
        self.faces
            .attributes()
            .color
            .get(h.index())
            .copied()
            .ok_or(disabled(ElementKind::Face, "color"))
    }

    /// # Panics
    ///
    /// Panics if face colors are disabled or `h` is out of range.
    pub fn set_face_color(&mut self, h: FaceHandle, color: Color) {
        *self
            .faces
            .attributes_mut()
            .color
            .get_mut(h.index())
            .expect("face colors are disabled") = color;
    }

    pub fn try_set_face_color(&mut self, h: FaceHandle, color: Color) -> Result<(), MeshArenaError> {
        self.faces.try_get(h.index())?;
        *self
            .faces
            .attributes_mut()
            .color
            .get_mut(h.index())
            .ok_or(disabled(ElementKind::Face, "color"))? = color;
        Ok(())
    }

    // Quality scalars.

    pub fn enable_face_quality(&mut self) {
        self.faces.toggle_attributes(|a, len| a.quality.enable(len));
    }

    pub fn disable_face_quality(&mut self) {
        self.faces.toggle_attributes(|a, _| a.quality.disable());
    }

    #[must_use]
    pub fn has_face_quality(&self) -> bool {
        self.faces.attributes().quality.is_enabled()
    }

    /// # Panics
    ///
    /// Panics if face quality is disabled or `h` is out of range.
    #[must_use]
    pub fn face_quality(&self, h: FaceHandle) -> f64 {
        *self
            .faces
            .attributes()
            .quality
            .get(h.index())
            .expect("face quality is disabled")
    }

    pub fn try_face_quality(&self, h: FaceHandle) -> Result<f64, MeshArenaError> {
        self.faces.try_get(h.index())?;
        self.faces
            .attributes()
            .quality
            .get(h.index())
            .copied()
            .ok_or(disabled(ElementKind::Face, "quality"))
    }

    /// # Panics
    ///
    /// Panics if face quality is disabled or `h` is out of range.
    pub fn set_face_quality(&mut self, h: FaceHandle, quality: f64) {
        *self
            .faces
            .attributes_mut()
            .quality
            .get_mut(h.index())
            .expect("face quality is disabled") = quality;
    }

    pub fn try_set_face_quality(
        &mut self,
        h: FaceHandle,
        quality: f64,
    ) -> Result<(), MeshArenaError> {
        self.faces.try_get(h.index())?;
        *self
            .faces
            .attributes_mut()
            .quality
            .get_mut(h.index())
            .ok_or(disabled(ElementKind::Face, "quality"))? = quality;
        Ok(())
    }

    // Face-to-face adjacency: one slot per edge of the triangle.

    pub fn enable_face_adjacent_faces(&mut self) {
        self.faces
            .toggle_attributes(|a, len| a.adjacent_faces.enable(len));
    }

    pub fn disable_face_adjacent_faces(&mut self) {
        self.faces.toggle_attributes(|a, _| a.adjacent_faces.disable());
    }

    #[must_use]
    pub fn has_face_adjacent_faces(&self) -> bool {
        self.faces.attributes().adjacent_faces.is_enabled()
    }

    /// The faces across this face's three edges, `None` where there is no
    /// neighbor (border) or it was compacted away.
    ///
    /// # Panics
    ///
    /// Panics if adjacent-face slots are disabled or `h` is out of range.
    #[must_use]
    pub fn face_adjacent_faces(&self, h: FaceHandle) -> &[Option<FaceHandle>; 3] {
        self.faces
            .attributes()
            .adjacent_faces
            .get(h.index())
            .expect("face adjacent-face slots are disabled")
    }

    /// # Panics
    ///
    /// Panics if adjacent-face slots are disabled or `h` is out of range.
    pub fn face_adjacent_faces_mut(&mut self, h: FaceHandle) -> &mut [Option<FaceHandle>; 3] {
        self.faces
            .attributes_mut()
            .adjacent_faces
            .get_mut(h.index())
            .expect("face adjacent-face slots are disabled")
    }

    pub fn try_face_adjacent_faces(
        &self,
        h: FaceHandle,
    ) -> Result<&[Option<FaceHandle>; 3], MeshArenaError> {
        self.faces.try_get(h.index())?;
        self.faces
            .attributes()
            .adjacent_faces
            .get(h.index())
            .ok_or(disabled(ElementKind::Face, "adjacent_faces"))
    }

    pub fn try_face_adjacent_faces_mut(
        &mut self,
        h: FaceHandle,
    ) -> Result<&mut [Option<FaceHandle>; 3], MeshArenaError> {
        self.faces.try_get(h.index())?;
        self.faces
            .attributes_mut()
            .adjacent_faces
            .get_mut(h.index())
            .ok_or(disabled(ElementKind::Face, "adjacent_faces"))
    }

    // Custom attributes.

    /// Registers a custom per-face column under `name`, default-filled to
    /// the current slot count. Errors if the name is taken.
    pub fn register_face_attribute<T>(&mut self, name: &str) -> Result<(), MeshArenaError>
    where
        T: Clone + Default + Send + Sync + 'static,
    {
        self.faces.toggle_attributes(|a, _| a.custom.register::<T>(name))
    }

    pub fn remove_face_attribute(&mut self, name: &str) -> Result<(), MeshArenaError> {
        self.faces.toggle_attributes(|a, _| a.custom.remove(name))
    }

    #[must_use]
    pub fn has_face_attribute(&self, name: &str) -> bool {
        self.faces.attributes().custom.contains(name)
    }

    pub fn face_attribute<T: 'static>(&self, name: &str) -> Result<&[T], MeshArenaError> {
        self.faces.attributes().custom.column::<T>(name)
    }

    pub fn face_attribute_mut<T: 'static>(
        &mut self,
        name: &str,
    ) -> Result<&mut [T], MeshArenaError> {
        self.faces.attributes_mut().custom.column_mut::<T>(name)
    }

    /// Registered custom per-face attribute names, sorted.
    #[must_use]
    pub fn face_attribute_names(&self) -> Vec<String> {
        self.faces.attributes().custom.names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;

    #[test]
    fn corners_store_what_was_given() {
        let mut mesh = Mesh::new();
        let v0 = mesh.add_vertex_at(Point3::new(0.0, 0.0, 0.0));
        let v1 = mesh.add_vertex_at(Point3::new(1.0, 0.0, 0.0));
        let v2 = mesh.add_vertex_at(Point3::new(0.0, 1.0, 0.0));
        let f = mesh.add_face_with(v0, v1, v2);
        assert_eq!(mesh.face(f).vertex(0), Some(v0));
        assert_eq!(mesh.face(f).vertex(2), Some(v2));
        assert_eq!(mesh.face_count(), 1);

        let empty = mesh.add_face();
        assert_eq!(mesh.face(empty).vertices, [None; 3]);
    }

    #[test]
    fn adjacency_slots_follow_compaction() {
        let mut mesh = Mesh::new();
        let v = mesh.add_vertices(3);
        let f0 = mesh.add_face_with(v, VertexHandle::new(1), VertexHandle::new(2));
        let f1 = mesh.add_face_with(v, VertexHandle::new(2), VertexHandle::new(1));
        let f2 = mesh.add_face_with(v, v, v);
        mesh.enable_face_adjacent_faces();
        mesh.face_adjacent_faces_mut(f0)[0] = Some(f2);
        mesh.face_adjacent_faces_mut(f2)[1] = Some(f0);

        mesh.delete_face(f1);
        mesh.compact_faces();
        // f2 moved down to slot 1; the slot in f0 follows it
        assert_eq!(mesh.face_adjacent_faces(f0)[0], Some(FaceHandle::new(1)));
        assert_eq!(
            mesh.face_adjacent_faces(FaceHandle::new(1))[1],
            Some(f0)
        );
    }

    #[test]
    fn face_quality_checked_surface() {
        let mut mesh = Mesh::new();
        let f = mesh.add_face();
        assert!(mesh.try_face_quality(f).is_err());
        mesh.enable_face_quality();
        mesh.try_set_face_quality(f, 2.5).unwrap();
        assert_eq!(mesh.face_quality(f), 2.5);
        assert!(mesh.try_set_face_quality(FaceHandle::new(9), 1.0).is_err());
    }

    #[test]
    fn face_custom_attributes() {
        let mut mesh = Mesh::new();
        mesh.add_faces(2);
        mesh.register_face_attribute::<bool>("keep").unwrap();
        mesh.face_attribute_mut::<bool>("keep").unwrap()[1] = true;
        assert_eq!(mesh.face_attribute::<bool>("keep").unwrap(), &[false, true]);
        assert_eq!(mesh.face_attribute_names(), ["keep"]);
    }
}
