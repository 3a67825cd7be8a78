use glam::{Vec2, Vec3};
use crate::grid::DrawGrid;
use super::*;
use crate::objects::ObjectFlags;

fn tracker_4x4() -> ObjectTracker {
    ObjectTracker::new(DrawGrid::new(Vec2::new(400.0, 400.0), 100.0).unwrap())
}

fn unit(pieces: u32) -> ObjectDesc {
    ObjectDesc::model(ModelType::S3o, 1, pieces, 10.0)
}

fn containing_quads(tracker: &ObjectTracker, key: ObjectKey) -> Vec<u32> {
    let mut found = Vec::new();
    for model_type in ModelType::ALL {
        for (index, proxy) in tracker.quads(model_type).iter().enumerate() {
            if proxy.container().contains(key) {
                found.push(index as u32);
            }
        }
    }
    found
}

// ============================================================================
// Add / delete
// ============================================================================

#[test]
fn test_add_object_places_into_quad_and_arena() {
    let mut tracker = tracker_4x4();
    let key = tracker.insert(unit(3), Vec3::new(250.0, 0.0, 150.0));

    assert!(tracker.add_object(key, true));

    let object = tracker.object(key).unwrap();
    assert_eq!(tracker.grid().coords(object.quad()), (2, 1));
    assert_eq!(containing_quads(&tracker, key), vec![object.quad()]);
    assert_eq!(tracker.unsorted_objects(), &[key]);
    assert_eq!(tracker.matrices(key).unwrap().len(), 4);
}

#[test]
fn test_insert_alone_joins_nothing() {
    let mut tracker = tracker_4x4();
    let key = tracker.insert(unit(1), Vec3::ZERO);

    assert!(containing_quads(&tracker, key).is_empty());
    assert!(tracker.unsorted_objects().is_empty());
    assert!(tracker.matrices(key).is_none());
}

#[test]
fn test_object_without_model_is_tracked_but_not_in_container() {
    let mut tracker = tracker_4x4();
    let desc = unit(0).with_flags(ObjectFlags::empty());
    let key = tracker.insert(desc, Vec3::new(10.0, 0.0, 10.0));

    tracker.add_object(key, true);

    assert!(containing_quads(&tracker, key).is_empty());
    assert_eq!(tracker.matrices(key).unwrap().len(), 1);
}

#[test]
fn test_add_twice_does_not_duplicate() {
    let mut tracker = tracker_4x4();
    let key = tracker.insert(unit(2), Vec3::ZERO);

    tracker.add_object(key, true);
    tracker.add_object(key, true);

    assert_eq!(tracker.unsorted_objects().len(), 1);
    assert_eq!(tracker.arena().slot_count(), 1);
    assert_eq!(containing_quads(&tracker, key).len(), 1);
}

#[test]
fn test_del_without_untrack_keeps_matrices() {
    let mut tracker = tracker_4x4();
    let key = tracker.insert(unit(2), Vec3::ZERO);
    tracker.add_object(key, true);

    assert!(tracker.del_object(key, false));

    assert!(containing_quads(&tracker, key).is_empty());
    assert_eq!(tracker.unsorted_objects(), &[key]);
    assert!(tracker.matrices(key).is_some());
}

#[test]
fn test_remove_fixes_unsorted_positions() {
    let mut tracker = tracker_4x4();
    let keys: Vec<_> = (0..3)
        .map(|i| {
            let key = tracker.insert(unit(1), Vec3::new(i as f32 * 100.0, 0.0, 0.0));
            tracker.add_object(key, true);
            key
        })
        .collect();

    assert!(tracker.remove(keys[0]).is_some());
    assert_eq!(tracker.unsorted_objects(), &[keys[2], keys[1]]);

    // keys[2] moved into index 0; removing it must still work
    assert!(tracker.remove(keys[2]).is_some());
    assert_eq!(tracker.unsorted_objects(), &[keys[1]]);
    assert_eq!(tracker.arena().slot_count(), 1);
    assert_eq!(tracker.len(), 1);
}

#[test]
fn test_unknown_handles_are_rejected() {
    let mut tracker = tracker_4x4();
    let key = tracker.insert(unit(1), Vec3::ZERO);
    tracker.remove(key);

    assert!(!tracker.add_object(key, true));
    assert!(!tracker.del_object(key, true));
    assert!(!tracker.update_object_quad(key, Vec3::ONE));
    assert!(tracker.remove(key).is_none());
}

// ============================================================================
// Movement
// ============================================================================

#[test]
fn test_move_between_quads() {
    let mut tracker = tracker_4x4();
    let key = tracker.insert(unit(1), Vec3::new(250.0, 0.0, 150.0));
    tracker.add_object(key, true);
    let old_quad = tracker.grid().index(2, 1);

    assert!(tracker.update_object_quad(key, Vec3::new(50.0, 5.0, 50.0)));

    assert_eq!(containing_quads(&tracker, key), vec![0]);
    assert!(!tracker.quad(ModelType::S3o, old_quad).has_objects());
    assert_eq!(tracker.unsorted_objects(), &[key]);
}

#[test]
fn test_move_within_quad_is_noop() {
    let mut tracker = tracker_4x4();
    let key = tracker.insert(unit(1), Vec3::new(10.0, 0.0, 10.0));
    tracker.add_object(key, false);

    assert!(!tracker.update_object_quad(key, Vec3::new(90.0, 0.0, 90.0)));
    assert_eq!(tracker.object(key).unwrap().position(), Vec3::new(90.0, 0.0, 90.0));
    assert_eq!(containing_quads(&tracker, key), vec![0]);
}

#[test]
fn test_move_outside_map_clamps() {
    let mut tracker = tracker_4x4();
    let key = tracker.insert(unit(1), Vec3::new(10.0, 0.0, 10.0));
    tracker.add_object(key, false);

    tracker.update_object_quad(key, Vec3::new(5000.0, 0.0, -5000.0));

    assert_eq!(containing_quads(&tracker, key), vec![tracker.grid().index(3, 0)]);
}

#[test]
fn test_move_while_out_of_container_only_records_quad() {
    let mut tracker = tracker_4x4();
    let key = tracker.insert(unit(1), Vec3::new(10.0, 0.0, 10.0));

    tracker.update_object_quad(key, Vec3::new(350.0, 0.0, 350.0));
    assert!(containing_quads(&tracker, key).is_empty());

    tracker.add_object(key, false);
    assert_eq!(containing_quads(&tracker, key), vec![15]);
}

// ============================================================================
// Refresh
// ============================================================================

#[test]
fn test_set_draw_state_moves_bin() {
    let mut tracker = tracker_4x4();
    let key = tracker.insert(unit(1), Vec3::ZERO);
    tracker.add_object(key, true);
    let slot = tracker.object(key).unwrap().matrix_slot();

    assert!(tracker.set_draw_state(key, 42));

    let container = tracker.quad(ModelType::S3o, 0).container();
    assert_eq!(container.draw_state_of(key), Some(42));
    assert!(container.bin(1).unwrap().is_empty());
    assert_eq!(tracker.object(key).unwrap().matrix_slot(), slot);
}

#[test]
fn test_update_object_with_init_starts_tracking() {
    let mut tracker = tracker_4x4();
    let key = tracker.insert(unit(2), Vec3::ZERO);
    tracker.add_object(key, false);
    assert!(tracker.matrices(key).is_none());

    assert!(tracker.update_object(key, true));

    assert_eq!(tracker.matrices(key).unwrap().len(), 3);
    assert_eq!(containing_quads(&tracker, key), vec![0]);
}

#[test]
fn test_set_model_moves_container_and_resizes_slot() {
    let mut tracker = tracker_4x4();
    let key = tracker.insert(unit(1), Vec3::new(250.0, 0.0, 150.0));
    tracker.add_object(key, true);
    let quad = tracker.grid().index(2, 1);

    assert!(tracker.set_model(key, ModelType::Assimp, 4));

    assert!(!tracker.quad(ModelType::S3o, quad).has_objects());
    let container = tracker.quad(ModelType::Assimp, quad).container();
    assert_eq!(container.draw_state_of(key), Some(1));
    assert_eq!(tracker.matrices(key).unwrap().len(), 5);
    assert!(tracker.matrices(key).unwrap().iter().all(|m| *m == Mat4::IDENTITY));
    assert_eq!(tracker.object(key).unwrap().desc().model_type, ModelType::Assimp);
    assert_eq!(tracker.unsorted_objects(), &[key]);
    assert_eq!(tracker.arena().slot_count(), 1);
    assert_eq!(tracker.arena().allocated(), 5);
}

#[test]
fn test_set_model_with_same_pieces_keeps_slot() {
    let mut tracker = tracker_4x4();
    let key = tracker.insert(unit(2), Vec3::ZERO);
    tracker.add_object(key, true);
    let slot = tracker.object(key).unwrap().matrix_slot();

    assert!(tracker.set_model(key, ModelType::ThreeDo, 2));

    assert_eq!(tracker.object(key).unwrap().matrix_slot(), slot);
    assert_eq!(containing_quads(&tracker, key), vec![0]);
    assert!(tracker.quad(ModelType::ThreeDo, 0).has_objects());
}

#[test]
fn test_set_model_on_unknown_handle_fails() {
    let mut tracker = tracker_4x4();
    assert!(!tracker.set_model(ObjectKey::default(), ModelType::Assimp, 1));
}

// ============================================================================
// Bounds and stats
// ============================================================================

#[test]
fn test_drawable_bounds() {
    let mut tracker = tracker_4x4();
    assert!(tracker.drawable_bounds().is_none());

    let a = tracker.insert(unit(0), Vec3::new(100.0, 20.0, 100.0));
    let b = tracker.insert(unit(0), Vec3::new(300.0, 50.0, 200.0));
    let hidden = tracker.insert(unit(0).with_flags(ObjectFlags::empty()), Vec3::splat(-1000.0));
    for key in [a, b, hidden] {
        tracker.add_object(key, false);
    }

    let bounds = tracker.drawable_bounds().unwrap();
    assert_eq!(bounds.min, Vec3::new(90.0, 10.0, 90.0));
    assert_eq!(bounds.max, Vec3::new(310.0, 60.0, 210.0));
}

#[test]
fn test_quad_object_count_spans_model_types() {
    let mut tracker = tracker_4x4();
    let a = tracker.insert(ObjectDesc::model(ModelType::ThreeDo, 0, 1, 1.0), Vec3::ZERO);
    let b = tracker.insert(ObjectDesc::model(ModelType::Assimp, 0, 1, 1.0), Vec3::ONE);
    tracker.add_object(a, false);
    tracker.add_object(b, false);

    assert_eq!(tracker.quad_object_count(0), 2);
    assert_eq!(tracker.quad_object_count(1), 0);
}
