//! Per-frame model render data.
//!
//! `ModelRenderData` owns the grid, the object tracker, the per-role
//! visibility cache and the shadow fitter, and sequences them for one
//! frame:
//!
//! 1. `begin_frame` advances the draw frame and takes the frame configuration
//! 2. object positions are pulled and quads updated
//! 3. "always update" objects are refreshed
//! 4. the player camera's quads are walked and its objects refreshed
//! 5. the shadow volume is fitted to the player camera, then walked
//! 6. any other camera (reflection, environment map) follows
//!
//! Nothing is walked or refreshed before the first `begin_frame`.

use glam::{Mat4, Vec2, Vec3};
use crate::camera::{Camera, CameraRole};
use crate::config::{FrameConfig, GridConfig};
use crate::error::{Error, Result};
use crate::grid::{DrawGrid, ObjectBin};
use crate::objects::{DrawStateKey, ModelType, ObjectDesc, ObjectKey, ObjectProvider, ObjectTracker};
use crate::shadow::{ShadowFit, ShadowFitter, WorldBounds};
use crate::transform::{TransformUpdateStats, TransformUpdater};
use crate::visibility::{QuadWalkParams, QuadWalker, VisibilityCache, VisibleBin};
use crate::{engine_bail, engine_debug, engine_trace};

/// Counters of one `run_frame` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u32,
    /// Objects that changed quad
    pub moved_objects: usize,
    /// Visible quads per camera role (0 for roles not walked this frame)
    pub visible_quads: [usize; CameraRole::COUNT],
    pub always: TransformUpdateStats,
    pub player: TransformUpdateStats,
    pub shadow: TransformUpdateStats,
    /// Summed over every extra camera
    pub other: TransformUpdateStats,
}

pub struct ModelRenderData {
    map_size: Vec2,
    tracker: ObjectTracker,
    visibility: VisibilityCache,
    walker: QuadWalker,
    updater: TransformUpdater,
    shadow: ShadowFitter,
    config: FrameConfig,
    draw_frame: u32,
}

impl ModelRenderData {
    /// Build the grid and empty quad containers for `config.map_size`.
    pub fn new(config: GridConfig) -> Result<Self> {
        let grid = DrawGrid::new(config.map_size, config.cell_size)
            .map_err(|err| Error::InitializationFailed(format!("draw grid: {}", err)))?;

        Ok(Self {
            map_size: config.map_size,
            tracker: ObjectTracker::new(grid),
            visibility: VisibilityCache::new(),
            walker: QuadWalker::new(),
            updater: TransformUpdater::new(),
            shadow: ShadowFitter::new(),
            config: FrameConfig::default(),
            draw_frame: 0,
        })
    }

    // ===== FRAME =====

    /// Advance the draw frame and apply `config` (sanitized).
    ///
    /// Returns the new frame number; the first frame is 1.
    pub fn begin_frame(&mut self, config: FrameConfig) -> u32 {
        let config = config.sanitized();
        if config != self.config {
            engine_debug!("galaxy3d::ModelRenderData",
                "Frame config changed: draw distance {}, padding {}/{}, terrain [{}, {}], light {:?}",
                config.model_draw_distance, config.extra_padding_xz, config.extra_padding_height,
                config.terrain_min_height, config.terrain_max_height, config.light_direction);
            self.config = config;
        }
        self.draw_frame = self.draw_frame.saturating_add(1);
        self.draw_frame
    }

    pub fn draw_frame(&self) -> u32 {
        self.draw_frame
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    pub fn grid(&self) -> &DrawGrid {
        self.tracker.grid()
    }

    // ===== OBJECTS =====

    /// Register an object at `position` and place it in its quad.
    ///
    /// With `track_matrices` the object also gets an arena slot of
    /// `piece_count + 1` matrices.
    pub fn create_object(&mut self, desc: ObjectDesc, position: Vec3, track_matrices: bool) -> Result<ObjectKey> {
        if !desc.radius.is_finite() || desc.radius < 0.0 {
            engine_bail!(InvalidObject, "galaxy3d::ModelRenderData",
                "radius must be finite and non-negative, got {}", desc.radius);
        }
        if !position.is_finite() {
            engine_bail!(InvalidObject, "galaxy3d::ModelRenderData",
                "position must be finite, got {:?}", position);
        }

        let key = self.tracker.insert(desc, position);
        self.tracker.add_object(key, track_matrices);
        Ok(key)
    }

    /// Remove an object from its quad and free its matrices.
    pub fn destroy_object(&mut self, key: ObjectKey) -> bool {
        self.tracker.remove(key).is_some()
    }

    pub fn update_object_quad(&mut self, key: ObjectKey, position: Vec3) -> bool {
        self.tracker.update_object_quad(key, position)
    }

    /// Re-insert an object into its quad; `init` starts matrix tracking if missing.
    pub fn refresh_object(&mut self, key: ObjectKey, init: bool) -> bool {
        self.tracker.update_object(key, init)
    }

    pub fn set_object_draw_state(&mut self, key: ObjectKey, draw_state: DrawStateKey) -> bool {
        self.tracker.set_draw_state(key, draw_state)
    }

    /// Swap an object's model type and piece count, keeping its handle.
    pub fn set_object_model(&mut self, key: ObjectKey, model_type: ModelType, piece_count: u32) -> bool {
        self.tracker.set_model(key, model_type, piece_count)
    }

    /// Pull every object's position from `provider`; returns how many changed quad.
    pub fn update_object_positions<P: ObjectProvider + ?Sized>(&mut self, provider: &P) -> usize {
        self.tracker.update_positions(provider)
    }

    pub fn object_matrices(&self, key: ObjectKey) -> Option<&[Mat4]> {
        self.tracker.matrices(key)
    }

    pub fn tracker(&self) -> &ObjectTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ObjectTracker {
        &mut self.tracker
    }

    // ===== VISIBILITY =====

    /// Walk the grid for `camera` unless its role is already current this
    /// frame, then stamp the found quads for the role.
    ///
    /// Returns `true` if a walk happened.
    pub fn update_visible_quads(
        &mut self,
        camera: &Camera,
        max_distance: f32,
        extra_padding_xz: u32,
        extra_padding_height: f32,
    ) -> bool {
        let role = camera.role();
        let frame = self.draw_frame;
        if self.visibility.is_current(role, frame) {
            return false;
        }

        let params = QuadWalkParams {
            max_distance,
            extra_padding_xz,
            extra_padding_height,
            terrain_min_height: self.config.terrain_min_height,
            terrain_max_height: self.config.terrain_max_height,
        };
        let mut quads = self.visibility.take_buffer(role);
        self.walker.walk(self.tracker.grid(), camera, &params, |quad| quads.push(quad));
        for &quad in &quads {
            self.tracker.mark_quad_drawn(quad, role, frame);
        }

        engine_trace!("galaxy3d::ModelRenderData",
            "Frame {}: {} visible quads for {:?}", frame, quads.len(), role);
        self.visibility.store(role, frame, quads);
        true
    }

    /// Quads found by the last walk of `role` (possibly from an earlier frame)
    pub fn visible_quads(&self, role: CameraRole) -> &[u32] {
        self.visibility.quads(role)
    }

    pub fn visibility(&self) -> &VisibilityCache {
        &self.visibility
    }

    /// Non-empty bins of every quad visible for `role` in the current frame.
    pub fn visible_objects(&self, role: CameraRole) -> impl Iterator<Item = VisibleBin<'_>> + '_ {
        let frame = self.draw_frame;
        let tracker = &self.tracker;
        self.visibility.quads(role).iter().copied().flat_map(move |quad| {
            ModelType::ALL.into_iter().flat_map(move |model_type| {
                let proxy = tracker.quad(model_type, quad);
                let bins: &[ObjectBin] = if proxy.is_visible(role, frame) { proxy.bins() } else { &[] };
                bins.iter().filter(|bin| !bin.is_empty()).map(move |bin| VisibleBin {
                    quad,
                    model_type,
                    draw_state: bin.key(),
                    objects: bin.objects(),
                })
            })
        })
    }

    // ===== TRANSFORMS =====

    /// Refresh matrices of the objects visible to `camera` that pass
    /// `should_update`, walking the grid first if needed.
    pub fn update_transforms<P, F>(&mut self, camera: &Camera, provider: &P, should_update: F) -> TransformUpdateStats
    where
        P: ObjectProvider + ?Sized,
        F: Fn(&Camera, ObjectKey) -> bool,
    {
        let FrameConfig { model_draw_distance, extra_padding_xz, extra_padding_height, .. } = self.config;
        self.update_visible_quads(camera, model_draw_distance, extra_padding_xz, extra_padding_height);

        self.updater.update_transforms(
            &mut self.tracker,
            self.visibility.quads(camera.role()),
            camera,
            self.draw_frame,
            provider,
            should_update,
            self.config.multi_threaded,
        )
    }

    /// Refresh every `ALWAYS_UPDATE` object once for the current frame.
    pub fn update_always_transforms<P: ObjectProvider + ?Sized>(&mut self, provider: &P) -> TransformUpdateStats {
        self.updater.update_always_transforms(&mut self.tracker, self.draw_frame, provider, self.config.multi_threaded)
    }

    // ===== SHADOWS =====

    /// Map extent × terrain range of the current frame, plus drawable objects
    pub fn world_bounds(&self) -> WorldBounds {
        WorldBounds {
            map_extent: self.map_size,
            terrain_min_height: self.config.terrain_min_height,
            terrain_max_height: self.config.terrain_max_height,
            drawable_bounds: self.tracker.drawable_bounds(),
        }
    }

    /// Fit the shadow volume to `player` for the current frame.
    pub fn update_shadow(&mut self, player: &Camera) -> &ShadowFit {
        let world = self.world_bounds().aabb();
        self.shadow.fit(player, &world, self.config.light_direction, self.config.clip_zero_to_one)
    }

    pub fn shadow_fit(&self) -> &ShadowFit {
        self.shadow.current()
    }

    /// (view, projection) of the last shadow fit
    pub fn shadow_view_projection(&self) -> (Mat4, Mat4) {
        let fit = self.shadow.current();
        (fit.view, fit.projection)
    }

    pub fn shadow_camera(&self) -> Camera {
        self.shadow.current().shadow_camera()
    }

    // ===== FULL FRAME =====

    /// Run one whole frame: positions, always-update objects, the player
    /// camera, the fitted shadow camera, then every camera of `others`.
    pub fn run_frame<P, F>(
        &mut self,
        config: FrameConfig,
        player: &Camera,
        others: &[Camera],
        provider: &P,
        should_update: F,
    ) -> FrameStats
    where
        P: ObjectProvider + ?Sized,
        F: Fn(&Camera, ObjectKey) -> bool,
    {
        let frame = self.begin_frame(config);
        let moved_objects = self.update_object_positions(provider);
        let always = self.update_always_transforms(provider);
        let player_stats = self.update_transforms(player, provider, &should_update);

        self.update_shadow(player);
        let shadow_camera = self.shadow_camera();
        let shadow = self.update_transforms(&shadow_camera, provider, &should_update);

        let mut other = TransformUpdateStats::default();
        for camera in others {
            other += self.update_transforms(camera, provider, &should_update);
        }

        let visible_quads = CameraRole::ALL.map(|role| {
            if self.visibility.is_current(role, frame) { self.visibility.quads(role).len() } else { 0 }
        });

        engine_trace!("galaxy3d::ModelRenderData",
            "Frame {}: {} moved, {} player / {} shadow / {} other updates",
            frame, moved_objects, player_stats.updated, shadow.updated, other.updated);

        FrameStats {
            frame,
            moved_objects,
            visible_quads,
            always,
            player: player_stats,
            shadow,
            other,
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
