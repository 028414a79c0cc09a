//! End-to-end tests for the full rig repair pipeline.

use approx::assert_relative_eq;
use rig_naming::BoneTable;
use rig_repair::{normalize_rig, rename_and_reparent, RepairOptions};
use rig_types::{Bone, Point3, Rig, SkinnedMesh, Skeleton};

fn bone_at(name: &str, z: f64, parent: Option<u32>) -> Bone {
    let mut bone = Bone::with_positions(
        name,
        Point3::new(0.0, 0.0, z),
        Point3::new(0.0, 0.0, z + 0.15),
    );
    bone.parent = parent;
    bone
}

/// The classic MMD torso: LowerBody/UpperBody/UpperBody2 plus an `_End`
/// marker carrying real weight.
fn mmd_torso_rig() -> Rig {
    let mut skeleton = Skeleton::new("Imported Model");
    let hips = skeleton.add_bone(bone_at("LowerBody", 1.0, None)).unwrap();
    let spine = skeleton
        .add_bone(bone_at("UpperBody", 1.15, Some(hips)))
        .unwrap();
    let chest = skeleton
        .add_bone(bone_at("UpperBody2", 1.3, Some(spine)))
        .unwrap();
    skeleton
        .add_bone(bone_at("Head_End", 1.45, Some(chest)))
        .unwrap();

    let mut mesh = SkinnedMesh::new("Cloth");
    mesh.vertices = vec![Point3::new(0.0, 0.0, 1.0), Point3::new(0.0, 0.0, 1.4)];
    mesh.ensure_group("LowerBody").set_weight(0, 0.5);
    mesh.ensure_group("UpperBody2").set_weight(1, 0.5);
    mesh.ensure_group("Head_End").set_weight(1, 0.5);

    Rig::new(skeleton).with_mesh(mesh)
}

#[test]
fn mmd_torso_becomes_canonical() {
    let mut rig = mmd_torso_rig();
    let table = BoneTable::builtin();

    let report = normalize_rig(&mut rig, &table, &RepairOptions::new()).unwrap();

    assert_eq!(rig.skeleton.name, "Armature");
    assert!(rig.skeleton.contains("Hips"));
    assert!(rig.skeleton.contains("Spine"));
    assert!(rig.skeleton.contains("Chest"));
    // The end marker is junk and must be gone.
    assert!(!rig.skeleton.contains("Head_End"));
    assert_eq!(report.junk_removed, 1);

    let spine = rig.skeleton.get("Spine").unwrap();
    assert_eq!(spine.parent, rig.skeleton.index_of("Hips"));
    let chest = rig.skeleton.get("Chest").unwrap();
    assert_eq!(chest.parent, rig.skeleton.index_of("Spine"));

    // The marker's weight was folded into the chest, not dropped.
    let mesh = &rig.meshes[0];
    assert!(mesh.group("Head_End").is_none());
    assert_relative_eq!(mesh.group("Chest").unwrap().weight(1), 1.0);
    assert_relative_eq!(mesh.group("Hips").unwrap().weight(0), 0.5);

    // Neck, head, arms and legs never existed; the check reports them.
    assert!(!report.is_canonical());
    assert!(!report.hierarchy.issues.is_empty());
}

fn biped_rig() -> Rig {
    let mut skeleton = Skeleton::new("Model.fbx");
    let pelvis = skeleton.add_bone(bone_at("Bip01_Pelvis", 1.0, None)).unwrap();
    let spine = skeleton
        .add_bone(bone_at("Bip01_Spine", 1.1, Some(pelvis)))
        .unwrap();
    let spine1 = skeleton
        .add_bone(bone_at("Bip01_Spine1", 1.25, Some(spine)))
        .unwrap();
    let neck = skeleton
        .add_bone(bone_at("Bip01_Neck", 1.5, Some(spine1)))
        .unwrap();
    skeleton.add_bone(bone_at("Bip01_Head", 1.6, Some(neck))).unwrap();
    for letter in ["L", "R"] {
        let clavicle = skeleton
            .add_bone(bone_at(&format!("Bip01_{letter}_Clavicle"), 1.45, Some(spine1)))
            .unwrap();
        let upper = skeleton
            .add_bone(bone_at(&format!("Bip01_{letter}_UpperArm"), 1.4, Some(clavicle)))
            .unwrap();
        let fore = skeleton
            .add_bone(bone_at(&format!("Bip01_{letter}_Forearm"), 1.2, Some(upper)))
            .unwrap();
        skeleton
            .add_bone(bone_at(&format!("Bip01_{letter}_Hand"), 1.0, Some(fore)))
            .unwrap();
        let thigh = skeleton
            .add_bone(bone_at(&format!("Bip01_{letter}_Thigh"), 0.9, Some(pelvis)))
            .unwrap();
        let calf = skeleton
            .add_bone(bone_at(&format!("Bip01_{letter}_Calf"), 0.5, Some(thigh)))
            .unwrap();
        skeleton
            .add_bone(bone_at(&format!("Bip01_{letter}_Foot"), 0.1, Some(calf)))
            .unwrap();
    }
    Rig::new(skeleton)
}

#[test]
fn complete_biped_rig_passes_the_hierarchy_check() {
    let mut rig = biped_rig();
    let table = BoneTable::builtin();

    let report = normalize_rig(&mut rig, &table, &RepairOptions::new()).unwrap();

    assert!(report.is_canonical(), "issues: {}", report.hierarchy);
    for name in [
        "Hips",
        "Spine",
        "Chest",
        "Neck",
        "Head",
        "Left shoulder",
        "Left arm",
        "Left elbow",
        "Left wrist",
        "Right leg",
        "Right knee",
        "Right ankle",
    ] {
        assert!(rig.skeleton.contains(name), "missing {name}");
    }
}

#[test]
fn second_pass_changes_nothing() {
    let mut rig = biped_rig();
    let table = BoneTable::builtin();
    let options = RepairOptions::new();

    normalize_rig(&mut rig, &table, &options).unwrap();
    let names_after_first = rig.skeleton.names();

    let report = normalize_rig(&mut rig, &table, &options).unwrap();
    assert_eq!(rig.skeleton.names(), names_after_first);
    assert_eq!(report.junk_removed, 0);
    assert_eq!(report.zero_weight_removed, 0);
    assert!(report.is_canonical());
}

#[test]
fn rename_and_reparent_rewires_canonical_pairs() {
    let mut skeleton = Skeleton::new("Armature");
    // Deliberately wrong topology: everything hangs off the pelvis.
    let pelvis = skeleton.add_bone(bone_at("Pelvis", 1.0, None)).unwrap();
    skeleton.add_bone(bone_at("Bip01_Neck", 1.5, Some(pelvis))).unwrap();
    skeleton.add_bone(bone_at("Bip01_Head", 1.6, Some(pelvis))).unwrap();

    let mut rig = Rig::new(skeleton);
    let table = BoneTable::builtin();
    let report = rename_and_reparent(&mut rig, &table, &RepairOptions::new()).unwrap();

    // Neck keeps its wrong parent (Chest is absent), Head moves to Neck.
    assert_eq!(
        rig.skeleton.get("Head").unwrap().parent,
        rig.skeleton.index_of("Neck")
    );
    assert_eq!(
        rig.skeleton.get("Neck").unwrap().parent,
        rig.skeleton.index_of("Hips")
    );
    assert_eq!(report.reparented, 1);
    assert!(!report.is_canonical());
}

#[test]
fn normalize_conserves_total_weight_per_vertex() {
    let mut rig = mmd_torso_rig();
    let totals_before: Vec<f64> = (0..rig.meshes[0].vertices.len() as u32)
        .map(|v| rig.meshes[0].groups.iter().map(|g| g.weight(v)).sum())
        .collect();

    normalize_rig(&mut rig, &BoneTable::builtin(), &RepairOptions::new()).unwrap();

    for (vertex, before) in totals_before.iter().enumerate() {
        let after: f64 = rig.meshes[0]
            .groups
            .iter()
            .map(|g| g.weight(vertex as u32))
            .sum();
        assert_relative_eq!(after, *before, epsilon = 1e-12);
    }
}
