use super::*;
use nalgebra::vector;

/// Spine of three bones with two arms of two bones each.
fn stick_figure() -> Skeleton {
    let mut b = SkeletonBuilder::new();
    b.make_joint("hips", vector![0.5, 0.3, 0.5], None).unwrap();
    b.make_joint("spine", vector![0.5, 0.5, 0.5], Some("hips")).unwrap();
    b.make_joint("chest", vector![0.5, 0.7, 0.5], Some("spine")).unwrap();
    b.make_joint("head", vector![0.5, 0.8, 0.5], Some("chest")).unwrap();
    b.make_joint("lelbow", vector![0.3, 0.7, 0.5], Some("chest")).unwrap();
    b.make_joint("lhand", vector![0.1, 0.7, 0.5], Some("lelbow")).unwrap();
    b.make_joint("relbow", vector![0.7, 0.7, 0.5], Some("chest")).unwrap();
    b.make_joint("rhand", vector![0.9, 0.7, 0.5], Some("relbow")).unwrap();
    b.make_symmetric("lhand", "rhand").unwrap();
    b.make_symmetric("relbow", "lelbow").unwrap();
    b.set_fat("chest").unwrap();
    b.set_foot("hips").unwrap();
    b.build().unwrap()
}

#[test]
fn compression_drops_degree_two_joints() {
    let s = stick_figure();
    assert_eq!(s.full_len(), 8);
    // spine, lelbow, relbow are chain joints.
    assert_eq!(s.cf_map(), &[0, 2, 3, 5, 7]);
    assert_eq!(s.compressed_len(), 5);
    assert_eq!(s.fc_map()[1], None);
    assert_eq!(s.fc_map()[5], Some(3));
    assert_eq!(s.c_prev(), &[None, Some(0), Some(1), Some(1), Some(1)]);
    assert!(s.c_graph().is_symmetric());
    assert_eq!(s.c_graph().edges[1].len(), 4);
}

#[test]
fn bone_lengths_and_fractions() {
    let s = stick_figure();
    let c_chest = s.fc_map()[2].unwrap();
    assert!((s.c_length()[c_chest] - 0.4).abs() < 1e-12);
    assert!((s.fc_fraction()[1] - 0.5).abs() < 1e-12);
    assert!((s.fc_fraction()[2] - 0.5).abs() < 1e-12);
    // Head hangs directly off the chest.
    assert!((s.fc_fraction()[3] - 1.0).abs() < 1e-12);
    assert!((s.c_length()[s.fc_map()[3].unwrap()] - 0.1).abs() < 1e-12);
    // Fractions along every compressed bone sum to one.
    for c in 1..s.compressed_len() {
        let chain = s.bone_chain(c);
        let sum: f64 = chain[1..].iter().map(|&f| s.fc_fraction()[f]).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }
    assert_eq!(s.bone_chain(3), vec![2, 4, 5]);
    assert_eq!(s.bone_chain(0), vec![0]);
}

#[test]
fn flags_and_symmetry_map_to_compressed_indices() {
    let s = stick_figure();
    assert_eq!(s.c_fat(), &[false, true, false, false, false]);
    assert_eq!(s.c_feet(), &[true, false, false, false, false]);
    // rhand mirrors lhand (the earlier of the pair).
    assert_eq!(s.c_sym()[4], Some(3));
    assert_eq!(s.c_sym()[3], None);
    assert_eq!(s.f_sym()[6], Some(4));
    assert_eq!(s.joint_for_name("rhand"), Some(7));
    assert_eq!(s.joint_name(3), "head");
}

#[test]
fn scale_multiplies_positions_and_lengths() {
    let mut s = stick_figure();
    let before = s.c_length().to_vec();
    s.scale(2.0);
    assert_eq!(s.full_pos(3), vector![1.0, 1.6, 1.0]);
    for (a, b) in before.iter().zip(s.c_length()) {
        assert!((2.0 * a - b).abs() < 1e-12);
    }
    // Fractions are scale free.
    assert!((s.fc_fraction()[1] - 0.5).abs() < 1e-12);
}

#[test]
fn builder_rejects_bad_descriptions() {
    assert_eq!(SkeletonBuilder::new().build().unwrap_err(), SkeletonError::Empty);

    let mut b = SkeletonBuilder::new();
    assert_eq!(
        b.make_joint("a", vector![0.0, 0.0, 0.0], Some("missing")).unwrap_err(),
        SkeletonError::UnknownJoint("missing".into())
    );
    b.make_joint("root", vector![0.0, 0.0, 0.0], None).unwrap();
    assert_eq!(
        b.make_joint("root", vector![1.0, 0.0, 0.0], None).unwrap_err(),
        SkeletonError::DuplicateJoint("root".into())
    );
    assert_eq!(
        b.make_joint("other", vector![1.0, 0.0, 0.0], None).unwrap_err(),
        SkeletonError::MultipleRoots("other".into())
    );
    b.make_joint("mid", vector![0.0, 1.0, 0.0], Some("root")).unwrap();
    b.make_joint("tip", vector![0.0, 2.0, 0.0], Some("mid")).unwrap();
    assert_eq!(
        b.make_symmetric("tip", "tip").unwrap_err(),
        SkeletonError::SelfSymmetric("tip".into())
    );
    b.set_fat("mid").unwrap();
    assert_eq!(
        b.build().unwrap_err(),
        SkeletonError::NotCompressed("mid".into())
    );
}

#[test]
fn degree_two_root_is_kept() {
    let mut b = SkeletonBuilder::new();
    b.make_joint("pelvis", vector![0.5, 0.5, 0.5], None).unwrap();
    b.make_joint("l", vector![0.3, 0.5, 0.5], Some("pelvis")).unwrap();
    b.make_joint("r", vector![0.7, 0.5, 0.5], Some("pelvis")).unwrap();
    let s = b.build().unwrap();
    assert_eq!(s.cf_map(), &[0, 1, 2]);
    assert_eq!(s.c_prev(), &[None, Some(0), Some(0)]);
}
