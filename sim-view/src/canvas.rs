//! Batched drawing surface backing the viewer.
//!
//! [`Canvas`] implements [`Renderer`] the way a turtle screen with tracing
//! turned off behaves: every mutator edits a pending copy of the scene and
//! nothing becomes visible until [`Renderer::present_frame`] is called.
//! The egui painter only ever reads the presented copy.

use glam::Vec2;
use sim_core::render::{MarkerId, Renderer, Rgb};

/// One drawable circle, in canvas units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub position: Vec2,
    pub color: Rgb,
    /// Shape scale; `1.0` is the default marker size. Sign is ignored when drawn.
    pub scale: f32,
}

/// Everything that is drawn in one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Side length of the boundary square, if one was drawn.
    pub outline: Option<f32>,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Default)]
pub struct Canvas {
    pending: Frame,
    visible: Frame,
    presented: usize,
}

impl Canvas {
    /// The last presented frame.
    pub fn visible(&self) -> &Frame {
        &self.visible
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> usize {
        self.presented
    }

    fn marker_mut(&mut self, marker: MarkerId) -> Option<&mut Marker> {
        self.pending.markers.get_mut(marker.0)
    }
}

impl Renderer for Canvas {
    fn create_boundary_outline(&mut self, size: f32) {
        self.pending.outline = Some(size);
    }

    fn create_marker(&mut self, position: Vec2) -> MarkerId {
        self.pending.markers.push(Marker {
            position,
            color: [0, 0, 0],
            scale: 1.0,
        });
        MarkerId(self.pending.markers.len() - 1)
    }

    fn move_marker(&mut self, marker: MarkerId, position: Vec2) {
        if let Some(m) = self.marker_mut(marker) {
            m.position = position;
        }
    }

    fn recolor_marker(&mut self, marker: MarkerId, color: Rgb) {
        if let Some(m) = self.marker_mut(marker) {
            m.color = color;
        }
    }

    fn resize_marker(&mut self, marker: MarkerId, scale: f32) {
        if let Some(m) = self.marker_mut(marker) {
            m.scale = scale;
        }
    }

    fn present_frame(&mut self) {
        self.visible.clone_from(&self.pending);
        self.presented += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutations_stay_hidden_until_present() {
        let mut canvas = Canvas::default();
        canvas.create_boundary_outline(400.0);
        let id = canvas.create_marker(Vec2::new(10.0, 20.0));

        assert_eq!(canvas.visible(), &Frame::default());

        canvas.present_frame();
        assert_eq!(canvas.visible().outline, Some(400.0));
        assert_eq!(canvas.visible().markers.len(), 1);

        canvas.move_marker(id, Vec2::new(5.0, 5.0));
        canvas.recolor_marker(id, [1, 2, 3]);
        canvas.resize_marker(id, -0.5);
        assert_eq!(canvas.visible().markers[0].position, Vec2::new(10.0, 20.0));

        canvas.present_frame();
        assert_eq!(
            canvas.visible().markers[0],
            Marker {
                position: Vec2::new(5.0, 5.0),
                color: [1, 2, 3],
                scale: -0.5,
            }
        );
        assert_eq!(canvas.presented(), 2);
    }

    #[test]
    fn unknown_marker_is_ignored() {
        let mut canvas = Canvas::default();
        canvas.move_marker(MarkerId(3), Vec2::ONE);
        canvas.present_frame();
        assert!(canvas.visible().markers.is_empty());
    }
}
