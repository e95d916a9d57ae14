//! Edge-facing surface of [`Mesh`].

use crate::element::{Edge, EdgeHandle, ElementKind, VertexHandle};
use crate::geometry::Color;
use crate::mesh::Mesh;
use crate::mesh::vertices::disabled;
use crate::mesh_error::MeshArenaError;

impl Mesh {
    /// Number of live edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Adds an edge with both endpoint references null.
    ///
    /// # Panics
    ///
    /// Panics if the new index is not representable in a handle.
    pub fn add_edge(&mut self) -> EdgeHandle {
        EdgeHandle::new(self.edges.add())
    }

    /// Adds an edge between the two given vertices.
    pub fn add_edge_with(&mut self, v0: VertexHandle, v1: VertexHandle) -> EdgeHandle {
        let h = self.add_edge();
        self.edges.get_mut(h.index()).set_vertices(v0, v1);
        h
    }

    /// Adds `n` default edges and returns the handle of the first. With
    /// `n == 0` nothing is added and the returned handle names the slot
    /// the next add will fill.
    pub fn add_edges(&mut self, n: usize) -> EdgeHandle {
        EdgeHandle::new(self.edges.add_n(n))
    }

    pub fn reserve_edges(&mut self, additional: usize) {
        self.edges.reserve(additional);
    }

    /// Tombstones the edge; vertices it references are unaffected.
    ///
    /// # Panics
    ///
    /// Panics if `h` is out of range or already deleted.
    pub fn delete_edge(&mut self, h: EdgeHandle) {
        self.edges.delete(h.index());
    }

    /// Resolves `h`, tombstoned or not.
    ///
    /// # Panics
    ///
    /// Panics if `h` is out of range.
    #[must_use]
    pub fn edge(&self, h: EdgeHandle) -> &Edge {
        self.edges.get(h.index())
    }

    pub fn try_edge(&self, h: EdgeHandle) -> Result<&Edge, MeshArenaError> {
        self.edges.try_get(h.index())
    }

    /// # Panics
    ///
    /// Panics if `h` is out of range.
    pub fn edge_mut(&mut self, h: EdgeHandle) -> &mut Edge {
        self.edges.get_mut(h.index())
    }

    pub fn try_edge_mut(&mut self, h: EdgeHandle) -> Result<&mut Edge, MeshArenaError> {
        self.edges.try_get_mut(h.index())
    }

    // Colors.

    pub fn enable_edge_colors(&mut self) {
        self.edges.toggle_attributes(|a, len| a.color.enable(len));
    }

    pub fn disable_edge_colors(&mut self) {
        self.edges.toggle_attributes(|a, _| a.color.disable());
    }

    #[must_use]
    pub fn has_edge_colors(&self) -> bool {
        self.edges.attributes().color.is_enabled()
    }

    /// # Panics
    ///
    /// Panics if edge colors are disabled or `h` is out of range.
    #[must_use]
    pub fn edge_color(&self, h: EdgeHandle) -> Color {
        *self
            .edges
            .attributes()
            .color
            .get(h.index())
            .expect("edge colors are disabled")
    }

    pub fn try_edge_color(&self, h: EdgeHandle) -> Result<Color, MeshArenaError> {
        self.edges.try_get(h.index())?;
        self.edges
            .attributes()
            .color
            .get(h.index())
            .copied()
            .ok_or(disabled(ElementKind::Edge, "color"))
    }

    /// # Panics
    ///
    /// Panics if edge colors are disabled or `h` is out of range.
    pub fn set_edge_color(&mut self, h: EdgeHandle, color: Color) {
        *self
            .edges
            .attributes_mut()
            .color
            .get_mut(h.index())
            .expect("edge colors are disabled") = color;
    }

    pub fn try_set_edge_color(&mut self, h: EdgeHandle, color: Color) -> Result<(), MeshArenaError> {
        self.edges.try_get(h.index())?;
        *self
            .edges
            .attributes_mut()
            .color
            .get_mut(h.index())
            .ok_or(disabled(ElementKind::Edge, "color"))? = color;
        Ok(())
    }

    // Quality scalars.

    pub fn enable_edge_quality(&mut self) {
        self.edges.toggle_attributes(|a, len| a.quality.enable(len));
    }

    pub fn disable_edge_quality(&mut self) {
        self.edges.toggle_attributes(|a, _| a.quality.disable());
    }

    #[must_use]
    pub fn has_edge_quality(&self) -> bool {
        self.edges.attributes().quality.is_enabled()
    }

    /// # Panics
    ///
    /// Panics if edge quality is disabled or `h` is out of range.
    #[must_use]
    pub fn edge_quality(&self, h: EdgeHandle) -> f64 {
        *self
            .edges
            .attributes()
            .quality
            .get(h.index())
            .expect("edge quality is disabled")
    }

    pub fn try_edge_quality(&self, h: EdgeHandle) -> Result<f64, MeshArenaError> {
        self.edges.try_get(h.index())?;
        self.edges
            .attributes()
            .quality
            .get(h.index())
            .copied()
            .ok_or(disabled(ElementKind::Edge, "quality"))
    }

    /// # Panics
    ///
    /// Panics if edge quality is disabled or `h` is out of range.
    pub fn set_edge_quality(&mut self, h: EdgeHandle, quality: f64) {
        *self
            .edges
            .attributes_mut()
            .quality
            .get_mut(h.index())
            .expect("edge quality is disabled") = quality;
    }

    pub fn try_set_edge_quality(
        &mut self,
        h: EdgeHandle,
        quality: f64,
    ) -> Result<(), MeshArenaError> {
        self.edges.try_get(h.index())?;
        *self
            .edges
            .attributes_mut()
            .quality
            .get_mut(h.index())
            .ok_or(disabled(ElementKind::Edge, "quality"))? = quality;
        Ok(())
    }

    // Custom attributes.

    /// Registers a custom per-edge column under `name`, default-filled to
    /// the current slot count. Errors if the name is taken.
    pub fn register_edge_attribute<T>(&mut self, name: &str) -> Result<(), MeshArenaError>
    where
        T: Clone + Default + Send + Sync + 'static,
    {
        self.edges.toggle_attributes(|a, _| a.custom.register::<T>(name))
    }

    pub fn remove_edge_attribute(&mut self, name: &str) -> Result<(), MeshArenaError> {
        self.edges.toggle_attributes(|a, _| a.custom.remove(name))
    }

    #[must_use]
    pub fn has_edge_attribute(&self, name: &str) -> bool {
        self.edges.attributes().custom.contains(name)
    }

    pub fn edge_attribute<T: 'static>(&self, name: &str) -> Result<&[T], MeshArenaError> {
        self.edges.attributes().custom.column::<T>(name)
    }

    pub fn edge_attribute_mut<T: 'static>(
        &mut self,
        name: &str,
    ) -> Result<&mut [T], MeshArenaError> {
        self.edges.attributes_mut().custom.column_mut::<T>(name)
    }

    /// Registered custom per-edge attribute names, sorted.
    #[must_use]
    pub fn edge_attribute_names(&self) -> Vec<String> {
        self.edges.attributes().custom.names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_counts() {
        let mut mesh = Mesh::new();
        let v0 = mesh.add_vertex();
        let v1 = mesh.add_vertex();
        let e = mesh.add_edge_with(v0, v1);
        assert_eq!(mesh.edge(e).vertex(0), Some(v0));
        assert_eq!(mesh.edge(e).vertex(1), Some(v1));
        assert_eq!(mesh.edge_count(), 1);

        mesh.delete_edge(e);
        assert_eq!(mesh.edge_count(), 0);
        assert!(mesh.try_edge(e).is_err());
    }

    #[test]
    fn vertex_compaction_rewrites_edge_endpoints() {
        let mut mesh = Mesh::new();
        let v0 = mesh.add_vertex();
        let v1 = mesh.add_vertex();
        let v2 = mesh.add_vertex();
        let e = mesh.add_edge_with(v0, v2);
        mesh.delete_vertex(v1);
        mesh.compact_vertices();
        assert_eq!(mesh.edge(e).vertex(0), Some(VertexHandle::new(0)));
        assert_eq!(mesh.edge(e).vertex(1), Some(VertexHandle::new(1)));
    }

    #[test]
    fn edge_color_surface() {
        let mut mesh = Mesh::new();
        let e = mesh.add_edge();
        mesh.enable_edge_colors();
        assert_eq!(mesh.edge_color(e), Color::WHITE);
        mesh.set_edge_color(e, Color::RED);
        assert_eq!(mesh.try_edge_color(e).unwrap(), Color::RED);
        mesh.disable_edge_colors();
        assert!(!mesh.has_edge_colors());
    }

    #[test]
    fn edge_custom_attributes() {
        let mut mesh = Mesh::new();
        mesh.add_edges(2);
        mesh.register_edge_attribute::<f32>("crease").unwrap();
        mesh.edge_attribute_mut::<f32>("crease").unwrap()[0] = 1.5;
        assert_eq!(mesh.edge_attribute::<f32>("crease").unwrap(), &[1.5, 0.0]);
        mesh.remove_edge_attribute("crease").unwrap();
        assert!(mesh.edge_attribute::<f32>("crease").is_err());
    }
}
