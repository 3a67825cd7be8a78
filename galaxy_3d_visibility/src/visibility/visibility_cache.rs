//! Per-camera-role list of visible quads, recomputed at most once per frame.

use crate::camera::CameraRole;

#[derive(Debug, Clone, Default)]
struct RoleVisibility {
    quads: Vec<u32>,
    last_computed_frame: u32,
}

#[derive(Debug, Clone, Default)]
pub struct VisibilityCache {
    roles: [RoleVisibility; CameraRole::COUNT],
}

impl VisibilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quads found by the last walk for `role`
    pub fn quads(&self, role: CameraRole) -> &[u32] {
        &self.roles[role.index()].quads
    }

    pub fn last_computed_frame(&self, role: CameraRole) -> u32 {
        self.roles[role.index()].last_computed_frame
    }

    /// `true` if the list for `role` already covers `frame`
    pub fn is_current(&self, role: CameraRole, frame: u32) -> bool {
        self.roles[role.index()].last_computed_frame >= frame
    }

    /// Hand out the role's buffer, emptied, for a new walk
    pub(crate) fn take_buffer(&mut self, role: CameraRole) -> Vec<u32> {
        let mut quads = std::mem::take(&mut self.roles[role.index()].quads);
        quads.clear();
        quads
    }

    /// Replace the role's list wholesale and mark it computed for `frame`
    pub(crate) fn store(&mut self, role: CameraRole, frame: u32, quads: Vec<u32>) {
        let entry = &mut self.roles[role.index()];
        entry.quads = quads;
        entry.last_computed_frame = frame;
    }

    /// Force the next request for `role` to walk again
    pub fn invalidate(&mut self, role: CameraRole) {
        self.roles[role.index()].last_computed_frame = 0;
    }
}

#[cfg(test)]
#[path = "visibility_cache_tests.rs"]
mod tests;
