//! Per-quad, per-model-type render container with per-role draw stamps.

use crate::camera::CameraRole;
use crate::objects::{DrawStateKey, ObjectKey};
use super::render_container::{ObjectBin, RenderContainer};

/// One grid cell's objects of one model type.
///
/// `last_draw_frame[role]` is stamped by the quad walker; the quad counts
/// as visible to a role while that stamp is at least the current frame.
/// Stamps start at 0 and frames at 1, so a fresh quad is never visible.
#[derive(Debug, Clone, Default)]
pub struct QuadProxy {
    container: RenderContainer,
    last_draw_frame: [u32; CameraRole::COUNT],
}

impl QuadProxy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: ObjectKey, draw_state: DrawStateKey) -> bool {
        self.container.add_object(object, draw_state)
    }

    pub fn del_object(&mut self, object: ObjectKey) -> bool {
        self.container.del_object(object)
    }

    pub fn has_objects(&self) -> bool {
        self.container.has_objects()
    }

    pub fn container(&self) -> &RenderContainer {
        &self.container
    }

    pub fn bins(&self) -> &[ObjectBin] {
        self.container.bins()
    }

    pub fn is_visible(&self, role: CameraRole, frame: u32) -> bool {
        self.last_draw_frame[role.index()] >= frame
    }

    pub fn last_draw_frame(&self, role: CameraRole) -> u32 {
        self.last_draw_frame[role.index()]
    }

    /// Stamps never move backwards.
    pub(crate) fn mark_drawn(&mut self, role: CameraRole, frame: u32) {
        let stamp = &mut self.last_draw_frame[role.index()];
        *stamp = (*stamp).max(frame);
    }
}

#[cfg(test)]
#[path = "quad_proxy_tests.rs"]
mod tests;
