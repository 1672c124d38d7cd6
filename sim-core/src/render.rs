//! The boundary between the simulation and whatever draws it.
//!
//! [`Renderer`] is the small turtle-like surface a drawing backend has to
//! provide. [`Scene`] owns the marker handles and translates store rows into
//! renderer calls; the simulation never talks to a backend directly.

use glam::Vec2;
use tracing::debug;

use crate::{
    error::StoreError,
    store::VariableStore,
    types::Field,
    updater::ColorRange,
};

/// Opaque handle for one drawable marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarkerId(pub usize);

/// 8-bit color triple.
pub type Rgb = [u8; 3];

/// A drawing backend. Mutators are batched and only become visible on
/// [`Renderer::present_frame`].
pub trait Renderer {
    /// Draws a square outline of side `size`, once.
    fn create_boundary_outline(&mut self, size: f32);
    /// Creates a marker at `position` (renderer units).
    fn create_marker(&mut self, position: Vec2) -> MarkerId;
    fn move_marker(&mut self, marker: MarkerId, position: Vec2);
    fn recolor_marker(&mut self, marker: MarkerId, color: Rgb);
    fn resize_marker(&mut self, marker: MarkerId, scale: f32);
    /// Publishes every pending change.
    fn present_frame(&mut self);
}

/// Maps store rows onto a renderer's markers, one marker per object.
#[derive(Clone, Debug)]
pub struct Scene {
    drawing_size: f32,
    color_range: ColorRange,
    markers: Vec<MarkerId>,
}

impl Scene {
    pub fn new(drawing_size: f32, color_range: ColorRange) -> Self {
        Self {
            drawing_size,
            color_range,
            markers: Vec::new(),
        }
    }

    /// Draws the boundary and creates one marker per object at its scaled
    /// position. Any previously created handles are forgotten.
    pub fn attach(
        &mut self,
        renderer: &mut impl Renderer,
        store: &VariableStore,
    ) -> Result<(), StoreError> {
        let position = store.get_dynamic(Field::Position)?;
        renderer.create_boundary_outline(self.drawing_size);
        self.markers = (0..position.rows())
            .map(|i| renderer.create_marker(position.vec2(i) * self.drawing_size))
            .collect();
        debug!(markers = self.markers.len(), "scene attached");
        Ok(())
    }

    /// Pushes the current position, color and size of every object to its
    /// marker. Does not present.
    pub fn refresh(
        &self,
        renderer: &mut impl Renderer,
        store: &VariableStore,
    ) -> Result<(), StoreError> {
        let rows = store.row_iter(&[Field::Position, Field::Size, Field::Color])?;
        for (row, &marker) in rows.zip(&self.markers) {
            if let Some(p) = row.get(Field::Position) {
                renderer.move_marker(marker, Vec2::new(p[0], p[1]) * self.drawing_size);
            }
            if let Some(c) = row.get(Field::Color) {
                renderer.recolor_marker(marker, self.color_range.to_rgb(c));
            }
            if let Some(&[s, ..]) = row.get(Field::Size) {
                renderer.resize_marker(marker, s);
            }
        }
        Ok(())
    }

    pub fn markers(&self) -> &[MarkerId] {
        &self.markers
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::field::FieldArray;

    /// Records every call, for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingRenderer {
        pub outlines: Vec<f32>,
        pub created: Vec<Vec2>,
        pub moves: Vec<(MarkerId, Vec2)>,
        pub colors: Vec<(MarkerId, Rgb)>,
        pub sizes: Vec<(MarkerId, f32)>,
        pub frames: usize,
    }

    impl Renderer for RecordingRenderer {
        fn create_boundary_outline(&mut self, size: f32) {
            self.outlines.push(size);
        }
        fn create_marker(&mut self, position: Vec2) -> MarkerId {
            self.created.push(position);
            MarkerId(self.created.len() - 1)
        }
        fn move_marker(&mut self, marker: MarkerId, position: Vec2) {
            self.moves.push((marker, position));
        }
        fn recolor_marker(&mut self, marker: MarkerId, color: Rgb) {
            self.colors.push((marker, color));
        }
        fn resize_marker(&mut self, marker: MarkerId, scale: f32) {
            self.sizes.push((marker, scale));
        }
        fn present_frame(&mut self) {
            self.frames += 1;
        }
    }

    fn store() -> VariableStore {
        let mut store = VariableStore::new(2).unwrap();
        store
            .set_dynamic(
                Field::Position,
                FieldArray::from_rows(&[[0.25, 0.5], [1.0, 0.0]]).unwrap(),
            )
            .unwrap();
        store
            .set_dynamic(Field::Size, FieldArray::from_rows(&[[1.5], [-0.5]]).unwrap())
            .unwrap();
        store
            .set_dynamic(
                Field::Color,
                FieldArray::from_rows(&[[0.0, 0.5, 1.0], [1.0, 1.0, 1.0]]).unwrap(),
            )
            .unwrap();
        store
    }

    #[test]
    fn attach_draws_outline_and_one_marker_per_object() {
        let mut renderer = RecordingRenderer::default();
        let mut scene = Scene::new(400.0, ColorRange::Unit);

        scene.attach(&mut renderer, &store()).unwrap();

        assert_eq!(renderer.outlines, vec![400.0]);
        assert_eq!(
            renderer.created,
            vec![Vec2::new(100.0, 200.0), Vec2::new(400.0, 0.0)]
        );
        assert_eq!(scene.markers(), &[MarkerId(0), MarkerId(1)]);
        assert_eq!(renderer.frames, 0);
    }

    #[test]
    fn refresh_maps_rows_to_markers() {
        let mut renderer = RecordingRenderer::default();
        let mut scene = Scene::new(10.0, ColorRange::Unit);
        let store = store();
        scene.attach(&mut renderer, &store).unwrap();

        scene.refresh(&mut renderer, &store).unwrap();

        assert_eq!(
            renderer.moves,
            vec![
                (MarkerId(0), Vec2::new(2.5, 5.0)),
                (MarkerId(1), Vec2::new(10.0, 0.0))
            ]
        );
        assert_eq!(
            renderer.colors,
            vec![(MarkerId(0), [0, 127, 255]), (MarkerId(1), [255, 255, 255])]
        );
        assert_eq!(renderer.sizes, vec![(MarkerId(0), 1.5), (MarkerId(1), -0.5)]);
        assert_eq!(renderer.frames, 0, "refresh must not present");
    }

    #[test]
    fn refresh_needs_all_three_fields() {
        let mut renderer = RecordingRenderer::default();
        let mut store = VariableStore::new(1).unwrap();
        store
            .set_dynamic(Field::Position, FieldArray::zeros(1, 2))
            .unwrap();
        let mut scene = Scene::new(1.0, ColorRange::Byte);
        scene.attach(&mut renderer, &store).unwrap();

        assert!(scene.refresh(&mut renderer, &store).is_err());
        assert!(renderer.moves.is_empty());
    }
}
