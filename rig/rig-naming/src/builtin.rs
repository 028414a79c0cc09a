//! The built-in humanoid bone table.
//!
//! Covers the naming conventions of MMD, Mixamo, 3ds Max Biped, Source,
//! and a number of common auto-rig exports. Slot order is load-bearing:
//! matching is first-match-wins, and the torso chain slot deliberately
//! claims every spine and chest variant so the repair pass can distribute
//! them over `Spine`/`Chest`/`Upper Chest` by hierarchy depth.

use crate::{AliasSlot, BoneTable, ReweightRule};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
        .collect()
}

fn slot(canonical: &str, aliases: &[&str]) -> AliasSlot {
    AliasSlot::new(canonical, strings(aliases))
}

fn rule(target: &str, sources: &[&str]) -> ReweightRule {
    ReweightRule {
        target: target.to_string(),
        sources: strings(sources),
    }
}

impl BoneTable {
    /// Builds the built-in humanoid table.
    ///
    /// The returned table always passes [`validate`](Self::validate).
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn builtin() -> Self {
        Self {
            slots: builtin_slots(),
            junk: strings(&[
                "ControlNode",
                "ParentNode",
                "Center",
                "CenterTip",
                "Groove",
                "Waist",
                "Eyes",
                "EyesTip",
                "LowerBodyTip",
                "UpperBody2Tip",
                "GrooveTip",
                "NeckTip",
            ]),
            junk_prefixes: strings(&[
                "_Shadow_",
                "_Dummy_",
                "Dummy_",
                "WaistCancel",
                "LegIKParent",
                "LegIK",
                "LegIKTip",
                "ToeTipIK",
                "ToeTipIKTip",
                "ShoulderP_",
                "EyeTip_",
                "ThumbTip_",
                "IndexFingerTip_",
                "MiddleFingerTip_",
                "RingFingerTip_",
                "LittleFingerTip_",
                "HandDummy_",
                "HandTip_",
                "ShoulderC_",
                "SleeveShoulderIK_",
            ]),
            // Standardization uppercases after underscores, so `_end`
            // arrives here as `_End`.
            junk_suffixes: strings(&["Tip", "_End"]),
            parenting: builtin_parenting(),
            keep: strings(&[
                "Hips",
                "Spine",
                "Chest",
                "Upper Chest",
                "Neck",
                "Head",
                "Left leg",
                "Left leg 2",
                "Left knee",
                "Left ankle",
                "Left toe",
                "Right leg",
                "Right leg 2",
                "Right knee",
                "Right ankle",
                "Right toe",
                "Left shoulder",
                "Left arm",
                "Left elbow",
                "Left wrist",
                "Right shoulder",
                "Right arm",
                "Right elbow",
                "Right wrist",
                "OldRightEye",
                "OldLeftEye",
                "LeftEye",
                "RightEye",
                "Eye_L",
                "Eye_R",
                "Thumb0_L",
                "Thumb1_L",
                "Thumb2_L",
                "IndexFinger1_L",
                "IndexFinger2_L",
                "IndexFinger3_L",
                "MiddleFinger1_L",
                "MiddleFinger2_L",
                "MiddleFinger3_L",
                "RingFinger1_L",
                "RingFinger2_L",
                "RingFinger3_L",
                "LittleFinger1_L",
                "LittleFinger2_L",
                "LittleFinger3_L",
                "Thumb0_R",
                "Thumb1_R",
                "Thumb2_R",
                "IndexFinger1_R",
                "IndexFinger2_R",
                "IndexFinger3_R",
                "MiddleFinger1_R",
                "MiddleFinger2_R",
                "MiddleFinger3_R",
                "RingFinger1_R",
                "RingFinger2_R",
                "RingFinger3_R",
                "LittleFinger1_R",
                "LittleFinger2_R",
                "LittleFinger3_R",
                "Breast_L",
                "Breast_R",
            ]),
            main_bones: strings(&[
                "Hips",
                "Spine",
                "Chest",
                "Upper Chest",
                "Neck",
                "Head",
                "Left leg",
                "Left leg 2",
                "Left knee",
                "Left ankle",
                "Left toe",
                "Right leg",
                "Right leg 2",
                "Right knee",
                "Right ankle",
                "Right toe",
                "Left shoulder",
                "Left arm",
                "Left elbow",
                "Left wrist",
                "Right shoulder",
                "Right arm",
                "Right elbow",
                "Right wrist",
                "LeftEye",
                "RightEye",
                "Eye_L",
                "Eye_R",
                "Thumb0_L",
                "Thumb1_L",
                "Thumb2_L",
                "IndexFinger1_L",
                "IndexFinger2_L",
                "IndexFinger3_L",
                "MiddleFinger1_L",
                "MiddleFinger2_L",
                "MiddleFinger3_L",
                "RingFinger1_L",
                "RingFinger2_L",
                "RingFinger3_L",
                "LittleFinger1_L",
                "LittleFinger2_L",
                "LittleFinger3_L",
                "Thumb0_R",
                "Thumb1_R",
                "Thumb2_R",
                "IndexFinger1_R",
                "IndexFinger2_R",
                "IndexFinger3_R",
                "MiddleFinger1_R",
                "MiddleFinger2_R",
                "MiddleFinger3_R",
                "RingFinger1_R",
                "RingFinger2_R",
                "RingFinger3_R",
                "LittleFinger1_R",
                "LittleFinger2_R",
                "LittleFinger3_R",
            ]),
            reweight: builtin_reweight(),
            unknown_side: pairs(&[("Shoulder", "shoulder"), ("Shoulder_001", "shoulder")]),
        }
    }
}

#[allow(clippy::too_many_lines)]
fn builtin_slots() -> Vec<AliasSlot> {
    let mut slots = vec![
        slot(
            "Hips",
            &[
                "LowerBody",
                "Lowerbody",
                "Lower Body",
                "Mixamorig:Hips",
                "Pelvis",
                "Bip001 Pelvis",
                "Bip01_Pelvis",
                "Root",
                "Root Hips",
                "Root_Rot",
                "Hip",
            ],
        ),
        // Every spine and chest bone lands here; the repair pass sorts the
        // matches by hierarchy depth and renames them Spine/Chest/Upper Chest.
        AliasSlot {
            canonical: "Spine".to_string(),
            aliases: strings(&[
                "Spine",
                // MMD
                "UpperBody",
                "Upperbody",
                "Upper Body",
                "Upper Waist",
                "UpperBody2",
                "Upperbody2",
                "Upper Body 2",
                "Upper Waist 2",
                "Waist Upper 2",
                "UpperBody3",
                "Upperbody3",
                "Upper Body 3",
                "Upper Waist 3",
                "Waist Upper 3",
                // Mixamo
                "Mixamorig:Spine",
                "Mixamorig:Spine0",
                "Mixamorig:Spine1",
                "Mixamorig:Spine2",
                "Mixamorig:Spine3",
                "Mixamorig:Spine4",
                // Biped
                "Bip001 Spine",
                "Bip001 Spine0",
                "Bip001 Spine1",
                "Bip001 Spine2",
                "Bip001 Spine3",
                "Bip001 Spine4",
                "Bip001 Spine5",
                "Bip01_Spine",
                "Bip01_Spine1",
                "Bip01_Spine2",
                "Bip01_Spine3",
                "Bip01_Spine4",
                "Bip01_Spine5",
                // B C rigs
                "B C Spine",
                "B C Spine0",
                "B C Spine1",
                "B C Spine2",
                "B C Spine3",
                "B C Spine4",
                "B C Spine5",
                "B C Chest",
                // misc exports
                "Spine Lower",
                "Spine Upper",
                "Abdomen",
                "Spine0",
                "Spine1",
                "Spine2",
                "Spine3",
                "Spine4",
                "Spine5",
                "Spine 0",
                "Spine 1",
                "Spine 2",
                "Spine 3",
                "Spine 4",
                "Spine 5",
                "Spine_01",
                "Spine_02",
                "Spine_03",
                "Spine_04",
                "Spine_05",
                "Chest1",
                "Chest2",
                "Chest3",
                "Chest",
            ]),
            chain: true,
        },
        slot(
            "Neck",
            &[
                "Mixamorig:Neck",
                "Head Neck Lower",
                "Bip001 Neck",
                "Bip01_Neck",
                "B C Neck1",
            ],
        ),
        slot(
            "Head",
            &[
                "Mixamorig:Head",
                "Head Neck Upper",
                "Bip001 Head",
                "Bip01_Head",
                "B C Head",
            ],
        ),
        slot(
            r"\Left shoulder",
            &[
                r"\Left Shoulder",
                r"\LeftShoulder",
                r"Shoulder_\L",
                r"\LShoulder",
                r"\L_Shoulder",
                r"Mixamorig:\LeftShoulder",
                r"Arm \Left Shoulder 1",
                r"Bip001 \L Clavicle",
                r"Bip01_\L_Clavicle",
                r"B \L Shoulder",
                r"Shoulder \L",
                r"\LCollar",
                r"\L_Clavicle",
                r"\Left Clavicle",
                r"\Left_Clavicle",
                r"\LeftCollar",
                r"\Left Collar",
            ],
        ),
        slot(
            r"\Left arm",
            &[
                r"\Left Arm",
                r"\LeftArm",
                r"Arm_\L",
                r"\LArm",
                r"\LArmA",
                r"ArmTC_\L",
                r"+ \Left Elbow Support",
                r"Mixamorig:\LeftArm",
                r"Arm \Left Shoulder 2",
                r"Bip001 \L UpperArm",
                r"Bip01_\L_UpperArm",
                r"B \L Arm1",
                r"Upper Arm \L",
                r"\Left Upper Arm",
                r"\LShldr",
                r"Upper_Arm_\L",
                r"\L_Upperarm",
                r"\LeftUpArm",
                r"Uparm_\L",
                r"\L_Arm_01",
            ],
        ),
        // A handful of MMD accessories name the arm with no side at all.
        slot("Left arm", &["+ Leisure Elder Supplement"]),
        slot(
            r"\Left elbow",
            &[
                r"\Left Elbow",
                r"\LeftElbow",
                r"Elbow_\L",
                r"Mixamorig:\LeftForeArm",
                r"Arm \Left Elbow",
                r"Bip001 \L Forearm",
                r"Bip01_\L_Forearm",
                r"B \L Arm2",
                r"Forearm \L",
                r"\LForeArm",
                r"Forearm_\L",
                r"\L_Forearm",
                r"\LeftLowArm",
                r"\Left Forearm",
                r"Loarm_\L",
                r"\L_Arm_02",
            ],
        ),
        slot(
            r"\Left wrist",
            &[
                r"\Left Wrist",
                r"\LeftWrist",
                r"Wrist_\L",
                r"HandAux2_\L",
                r"Mixamorig:\LeftHand",
                r"Arm \Left Wrist",
                r"Bip001 \L Hand",
                r"Bip01_\L_Hand",
                r"B \L Hand",
                r"Hand \L",
                r"\LHand",
                r"Hand_\L",
                r"\L_Hand",
                r"\LeftHand",
                r"\Left Hand",
                r"Finger3_1_\L",
            ],
        ),
        slot(
            r"\Left leg",
            &[
                r"\Left Leg",
                r"\Left foot",
                r"\LeftLeg",
                r"Leg_\L",
                r"LegWAux_\L",
                r"Leg00003333_\L",
                r"Leg00004444_\L",
                r"Mixamorig:\LeftUpLeg",
                r"Leg \Left Thigh",
                r"Bip001 \L Thigh",
                r"Bip01_\L_Thigh",
                r"B \L Leg1",
                r"Upper Leg \L",
                r"\LThigh",
                r"Thigh_\L",
                r"\L_Thigh",
                r"\LeftUpLeg",
                r"\LeftHip",
                r"\Left Thigh",
                r"Upleg_\L",
                r"\L_Leg_01",
            ],
        ),
        slot(
            r"\Left knee",
            &[
                r"\Left Knee",
                r"\LeftKnee",
                r"Knee_\L",
                r"Mixamorig:\LeftLeg",
                r"Leg \Left Knee",
                r"Bip001 \L Calf",
                r"Bip01_\L_Calf",
                r"B \L Leg2",
                r"Lower Leg \L",
                r"\LLeg",
                r"\LShin",
                r"Shin_\L",
                r"\L_Calf",
                r"\LeftLowLeg",
                r"\Left Shin",
                r"Loleg_\L",
                r"\L_Leg_02",
            ],
        ),
        slot(
            r"\Left ankle",
            &[
                r"\Left Ankle",
                r"\LeftAnkle",
                r"Ankle_\L",
                r"Mixamorig:\LeftFoot",
                r"Leg \Left Ankle",
                r"Bip001 \L Foot",
                r"Bip01_\L_Foot",
                r"B \L Foot",
                r"Lower",
                r"\LFoot",
                r"Foot_\L",
                r"\L_Foot",
                r"\LeftFoot",
                r"\Left Foot",
                r"Leg \Left Foot",
                r"\L_Foot_01",
            ],
        ),
        slot(
            r"\Left toe",
            &[
                r"\Left Toe",
                r"\LeftToe",
                r"LegTip_\L",
                r"LegTipEX_\L",
                r"ClawTipEX_\L",
                r"Mixamorig:\LeftToeBase",
                r"Leg \Left Toes",
                r"Bip001 \L Toe0",
                r"Bip01_\L_Toe0",
                r"B \L Toe",
                r"\LToe",
                r"Toe_\L",
                r"\L_Toe",
                r"\LeftToeBase",
                r"Toe1_1_\L",
                r"Leg \Left Foot Toes",
            ],
        ),
        slot(
            r"Eye_\L",
            &[
                r"\Left Eye",
                r"Mixamorig:\LeftEye",
                r"Head Eyeball \Left",
                r"FEye\L",
                r"Eye\L",
                r"\L_Eye",
            ],
        ),
    ];
    slots.extend(builtin_finger_slots());
    slots
}

fn builtin_finger_slots() -> Vec<AliasSlot> {
    vec![
        slot(
            r"Thumb0_\L",
            &[
                r"Arm \Left Finger 1a",
                r"\LThumb1",
                r"Thumb_01_\L",
                r"\L_Thumb0",
                r"\L_Thumb_01",
                r"\LeftHandThumb1",
                r"\LeftFinger0",
                r"Finger1_2_\L",
            ],
        ),
        slot(
            r"Thumb1_\L",
            &[
                r"Arm \Left Finger 1b",
                r"\LThumb2",
                r"Thumb_02_\L",
                r"\L_Thumb1",
                r"\L_Thumb_02",
                r"\LeftHandThumb2",
                r"\LeftFinger01",
                r"Finger1_3_\L",
            ],
        ),
        slot(
            r"Thumb2_\L",
            &[
                r"Arm \Left Finger 1c",
                r"\LThumb3",
                r"Thumb_03_\L",
                r"\L_Thumb2",
                r"\L_Thumb_03",
                r"\LeftHandThumb3",
                r"\LeftFinger02",
                r"Finger1_4_\L",
            ],
        ),
        slot(
            r"IndexFinger1_\L",
            &[
                r"Fore1_\L",
                r"Arm \Left Finger 2a",
                r"\LIndex1",
                r"F_Index_01_\L",
                r"\L_Index0",
                r"\L_Index_01",
                r"\LeftHandIndex1",
                r"\LeftFinger1",
                r"Finger2_2_\L",
            ],
        ),
        slot(
            r"IndexFinger2_\L",
            &[
                r"Fore2_\L",
                r"Arm \Left Finger 2b",
                r"\LIndex2",
                r"F_Index_02_\L",
                r"\L_Index1",
                r"\L_Index_02",
                r"\LeftHandIndex2",
                r"\LeftFinger11",
                r"Finger2_3_\L",
            ],
        ),
        slot(
            r"IndexFinger3_\L",
            &[
                r"Fore3_\L",
                r"Arm \Left Finger 2c",
                r"\LIndex3",
                r"F_Index_03_\L",
                r"\L_Index2",
                r"\L_Index_03",
                r"\LeftHandIndex3",
                r"\LeftFinger12",
                r"Finger2_4_\L",
            ],
        ),
        slot(
            r"MiddleFinger1_\L",
            &[
                r"Middle1_\L",
                r"Arm \Left Finger 3a",
                r"\LMid1",
                r"F_Middle_01_\L",
                r"\L_Mid0",
                r"\L_Middle_01",
                r"\LeftHandMiddle1",
                r"\LeftFinger2",
                r"Finger3_2_\L",
            ],
        ),
        slot(
            r"MiddleFinger2_\L",
            &[
                r"Middle2_\L",
                r"Arm \Left Finger 3b",
                r"\LMid2",
                r"F_Middle_02_\L",
                r"\L_Mid1",
                r"\L_Middle_02",
                r"\LeftHandMiddle2",
                r"\LeftFinger21",
                r"Finger3_3_\L",
            ],
        ),
        slot(
            r"MiddleFinger3_\L",
            &[
                r"Middle3_\L",
                r"Arm \Left Finger 3c",
                r"\LMid3",
                r"F_Middle_03_\L",
                r"\L_Mid2",
                r"\L_Middle_03",
                r"\LeftHandMiddle3",
                r"\LeftFinger22",
                r"Finger3_4_\L",
            ],
        ),
        slot(
            r"RingFinger1_\L",
            &[
                r"Third1_\L",
                r"Arm \Left Finger 4a",
                r"\LRing1",
                r"F_Ring_01_\L",
                r"\L_Ring0",
                r"\L_Ring_01",
                r"\LeftHandRing1",
                r"\LeftFinger3",
                r"Finger4_2_\L",
            ],
        ),
        slot(
            r"RingFinger2_\L",
            &[
                r"Third2_\L",
                r"Arm \Left Finger 4b",
                r"\LRing2",
                r"F_Ring_02_\L",
                r"\L_Ring1",
                r"\L_Ring_02",
                r"\LeftHandRing2",
                r"\LeftFinger31",
                r"Finger4_3_\L",
            ],
        ),
        slot(
            r"RingFinger3_\L",
            &[
                r"Third3_\L",
                r"Arm \Left Finger 4c",
                r"\LRing3",
                r"F_Ring_03_\L",
                r"\L_Ring2",
                r"\L_Ring_03",
                r"\LeftHandRing3",
                r"\LeftFinger32",
                r"Finger4_4_\L",
            ],
        ),
        slot(
            r"LittleFinger1_\L",
            &[
                r"Little1_\L",
                r"Arm \Left Finger 5a",
                r"\LPinky1",
                r"F_Pinky_01_\L",
                r"\L_Pinky0",
                r"\L_Pinkey_01",
                r"\LeftHandPinky1",
                r"\LeftFinger4",
                r"Finger5_2_\L",
            ],
        ),
        slot(
            r"LittleFinger2_\L",
            &[
                r"Little2_\L",
                r"Arm \Left Finger 5b",
                r"\LPinky2",
                r"F_Pinky_02_\L",
                r"\L_Pinky1",
                r"\L_Pinkey_02",
                r"\LeftHandPinky2",
                r"\LeftFinger41",
                r"Finger5_3_\L",
            ],
        ),
        slot(
            r"LittleFinger3_\L",
            &[
                r"Little3_\L",
                r"Arm \Left Finger 5c",
                r"\LPinky3",
                r"F_Pinky_03_\L",
                r"\L_Pinky2",
                r"\L_Pinkey_03",
                r"\LeftHandPinky3",
                r"\LeftFinger42",
                r"Finger5_4_\L",
            ],
        ),
    ]
}

fn builtin_parenting() -> Vec<(String, String)> {
    pairs(&[
        ("Spine", "Hips"),
        ("Chest", "Spine"),
        ("Neck", "Chest"),
        ("Head", "Neck"),
        ("Left shoulder", "Chest"),
        ("Right shoulder", "Chest"),
        ("Left arm", "Left shoulder"),
        ("Right arm", "Right shoulder"),
        ("Left elbow", "Left arm"),
        ("Right elbow", "Right arm"),
        ("Left wrist", "Left elbow"),
        ("Right wrist", "Right elbow"),
        ("Left leg", "Hips"),
        ("Right leg", "Hips"),
        ("Left knee", "Left leg"),
        ("Right knee", "Right leg"),
        ("Left ankle", "Left knee"),
        ("Right ankle", "Right knee"),
        ("Left toe", "Left ankle"),
        ("Right toe", "Right ankle"),
        ("Thumb0_L", "Left wrist"),
        ("IndexFinger1_L", "Left wrist"),
        ("MiddleFinger1_L", "Left wrist"),
        ("RingFinger1_L", "Left wrist"),
        ("LittleFinger1_L", "Left wrist"),
        ("Thumb1_L", "Thumb0_L"),
        ("IndexFinger2_L", "IndexFinger1_L"),
        ("MiddleFinger2_L", "MiddleFinger1_L"),
        ("RingFinger2_L", "RingFinger1_L"),
        ("LittleFinger2_L", "LittleFinger1_L"),
        ("Thumb2_L", "Thumb1_L"),
        ("IndexFinger3_L", "IndexFinger2_L"),
        ("MiddleFinger3_L", "MiddleFinger2_L"),
        ("RingFinger3_L", "RingFinger2_L"),
        ("LittleFinger3_L", "LittleFinger2_L"),
        ("Thumb0_R", "Right wrist"),
        ("IndexFinger1_R", "Right wrist"),
        ("MiddleFinger1_R", "Right wrist"),
        ("RingFinger1_R", "Right wrist"),
        ("LittleFinger1_R", "Right wrist"),
        ("Thumb1_R", "Thumb0_R"),
        ("IndexFinger2_R", "IndexFinger1_R"),
        ("MiddleFinger2_R", "MiddleFinger1_R"),
        ("RingFinger2_R", "RingFinger1_R"),
        ("LittleFinger2_R", "LittleFinger1_R"),
        ("Thumb2_R", "Thumb1_R"),
        ("IndexFinger3_R", "IndexFinger2_R"),
        ("MiddleFinger3_R", "MiddleFinger2_R"),
        ("RingFinger3_R", "RingFinger2_R"),
        ("LittleFinger3_R", "LittleFinger2_R"),
        ("M_head_copy", "Head"),
    ])
}

#[allow(clippy::too_many_lines)]
fn builtin_reweight() -> Vec<ReweightRule> {
    vec![
        rule("Hips", &["LowerBody1", "Lowerbody2", "Pelvis Adj", "Waist"]),
        rule(
            "Spine",
            &["UpperBodyx", "Spine Lower Adj", "Spine Middle Adj"],
        ),
        rule("Chest", &["UpperBodyx2", "Spine Upper Adj"]),
        rule("Neck", &["Neckx", "NeckW", "NeckW2"]),
        rule("Head", &["Neckx2"]),
        rule(
            r"\Left shoulder",
            &[
                r"ShoulderC_\L",
                r"ShoulderP_\L",
                r"Shoulder2_\L",
                r"ShoulderSleeve_\L",
                r"SleeveShoulderIK_\L",
                r"\Left Shoulder Weight",
                r"ShoulderS_\L",
                r"ShoulderW_\L",
                r"Arm \Left Shoulder Adj 1",
                r"B \L ArmorParts",
            ],
        ),
        rule(
            r"\Left arm",
            &[
                r"Arm01_\L",
                r"Arm02_\L",
                r"Arm03_\L",
                r"Arm04_\L",
                r"Arm05_\L",
                r"ArmTwist_\L",
                r"ArmTwist0_\L",
                r"ArmTwist1_\L",
                r"ArmTwist2_\L",
                r"ArmTwist3_\L",
                r"ArmTwist4_\L",
                r"\Left Arm Twist",
                r"\Left Arm Torsion",
                r"\Left Arm Torsion 1",
                r"\Left Arm Tight",
                r"\Left Arm Tight 1",
                r"\Left Arm Tight 2",
                r"\Left Arm Tight 3",
                r"\Left Upper Arm Twist",
                r"\Left Upper Arm Twist B",
                r"ElbowAux_\L",
                r"ElbowAux+_\L",
                r"+ElbowAux_\L",
                r"ArmSleeve_\L",
                r"ShoulderTwist_\L",
                r"ArmW_\L",
                r"ArmW2_\L",
                r"Sleeve1_\L",
                r"SleeveArm_\L",
                r"SleeveElbowAux_\L",
                r"ArmxcIa_\L",
                r"ArmRotation_\L",
                r"ArmTwistReturn_\L",
                r"DEF_Upper_Arm_02_\L",
                r"DEF_Upper_Arm_Twist_25_\L",
                r"DEF_Upper_Arm_Twist_50_\L",
                r"DEF_Upper_Arm_Twist_75_\L",
                r"Arm \Left Shoulder Adj 2",
                r"Arm \Left Shoulder Adj 3",
                r"Arm \Left Shoulder Adj 4",
                r"Arm \Left Bicep",
                r"\LArmB",
                r"\L_Sub_Shoulder",
            ],
        ),
        rule("Left arm", &["エプロンArm"]),
        rule(
            r"\Left elbow",
            &[
                r"Elbow1_\L",
                r"Elbow2_\L",
                r"Elbow3_\L",
                r"Elbow01_\L",
                r"Elbow02_\L",
                r"Elbow03_\L",
                r"Elbow04_\L",
                r"Elbow05_\L",
                r"HandTwist_\L",
                r"HandTwist1_\L",
                r"HandTwist2_\L",
                r"HandTwist3_\L",
                r"HandTwist4_\L",
                r"\Left Hand 1",
                r"\Left Hand 2",
                r"\Left Hand 3",
                r"\Left Hand Twist",
                r"\Left Hand Twist 1",
                r"\Left Hand Twist 2",
                r"\Left Hand Thread 3",
                r"ElbowSleeve_\L",
                r"WristAux_\L",
                r"ElbowTwist_\L",
                r"ElbowTwist2_\L",
                r"ElbowW_\L",
                r"ElbowW2_\L",
                r"Sleeve2_\L",
                r"SleeveElbow_\L",
                r"SleeveMouth_\L",
                r"ElbowRotation_\L",
                r"HandTwistRotation1_\L",
                r"HandTwistRotation2_\L",
                r"DEF_Upper_Arm_Elbow_\L",
                r"DEF_Forearm_Twist_25_\L",
                r"DEF_Forearm_Twist_50_\L",
                r"DEF_Forearm_Twist_75_\L",
                r"+Elbow_\L",
                r"Elbowa_\L",
                r"Arm \Left Wrist Adj",
                r"Arm \Left Elbow Adj 2",
                r"Arm \Left Elbow Adj 1",
                r"Arm \Left Forearm",
                r"\Left Forearm Twist",
                r"\LHandEX",
                r"\L_Sub_Elbow",
            ],
        ),
        rule(
            r"\Left wrist",
            &[
                r"Sleeve3_\L",
                r"WristSleeve_\L",
                r"WristW_\L",
                r"WristS_\L",
                r"HandTwist5_\L",
                r"IndexFinger0_\L",
                r"MiddleFinger0_\L",
                r"RingFinger0_\L",
                r"LittleFinger0_\L",
                r"DEF_Hand_\L",
                r"DEF_Halm_01_\L",
                r"DEF_Halm_02_\L",
                r"DEF_Halm_03_\L",
                r"DEF_Halm_04_\L",
                r"Arm \Left Hand",
            ],
        ),
        rule(
            r"\Left leg",
            &[
                r"LegD_\L",
                r"+LegD_\L",
                r"\Left Foot D",
                r"\Left Foot Complement",
                r"\Left Foot Supplement",
                r"LegcntEven_\L",
                r"\LLegTwist1",
                r"\LLegTwist2",
                r"\LLegTwist3",
                r"\Left Leg Twist",
                r"LegW_\L",
                r"LegW2_\L",
                r"LowerKnee_\L",
                r"UpperKnee_\L",
                r"LegX1_\L",
                r"LegX2_\L",
                r"LegX3_\L",
                r"\Left Knee EX",
                r"\Left Foot EX",
                r"KneeEX_\L",
                r"LegEX_\L",
                r"Thigh_\L",
                r"Leg+_\L",
                r"Leg++_\L",
                r"Leg+++_\L",
                r"Leg++++_\L",
                r"Knee++_\L",
                r"Peaches_\L",
                r"Pants_Stuff_000_\L",
                r"Pants_Stuff_001_\L",
                r"DEF_Thigh_Sub_\L",
                r"DEF_Thigh_01_\L",
                r"DEF_Thigh_02_\L",
                r"DEF_Thigh_Twist_25_\L",
                r"DEF_Thigh_Twist_50_\L",
                r"DEF_Thigh_Twist_75_\L",
                r"Leg \Left Thigh Adj 1",
                r"Leg \Left Thigh Adj 2",
                r"Leg \Left Thigh Adj 3",
            ],
        ),
        rule(
            r"\Left knee",
            &[
                r"KneeD_\L",
                r"\Left Knee D",
                r"KneecntEven_\L",
                r"\LTibiaTwist1",
                r"\LTibiaTwist2",
                r"\LTibiaTwist3",
                r"KneeW1_\L",
                r"KneeW2_\L",
                r"Knee+_\L",
                r"Knee+++_\L",
                r"Knee++++_\L",
                r"Ankle++_\L",
                r"KneeArmor2_\L",
                r"KneeX1_\L",
                r"KneeX2_\L",
                r"KneeX3_\L",
                r"Leg \Left Acc",
                r"\Left Knee Twist",
                r"\Left Ankle EX",
                r"AnkleEX_\L",
                r"KneeAux_\L",
                r"Shin_\L",
                r"DEF_Knee_\L",
                r"DEF_Knee_02_\L",
                r"DEF_Shin_01_\L",
                r"DEF_Shin_02_\L",
                r"DEF_Shin_Twist_25_\L",
                r"DEF_Shin_Twist_50_\L",
                r"DEF_Shin_Twist_75_\L",
                r"Leg \Left Ankle Adj",
                r"Leg \Left Knee Adj 1",
                r"Leg \Left Knee Adj 2",
            ],
        ),
        rule(
            r"\Left ankle",
            &[
                r"AnkleD_\L",
                r"\Left Ankle D",
                r"AnkleEven_\L",
                r"AnkleW1_\L",
                r"AnkleW2_\L",
                r"ToeTipMovable_\L",
                r"AnkleArmor_\L",
                r"LowerUseless_\L",
                r"Ankle+_\L",
                r"Ankle+++_\L",
                r"Ankle++++_\L",
                r"DEF_Foot_\L",
            ],
        ),
        rule(
            r"\Left toe",
            &[
                r"\Left Toes",
                r"ClawTipEX_\L",
                r"ClawTipEX2_\L",
                r"ClawTipThumbEX_\L",
                r"ClawTipThumbEX2_\L",
                r"\Left Toe EX",
                r"\Left Foot Tip EX",
                r"LegTip2_\L",
                r"DEF_Toe_\L",
            ],
        ),
        rule(
            r"Eye_\L",
            &[
                r"EyeW_\L",
                r"EyeLight_\L",
                r"EyeReturn_\L",
                r"Pupil_\L",
                r"\Left Pupil",
                r"\Left Eye Glint",
                r"Highlight_\L",
                r"F_EyeTip_\L",
                r"F_EyeLight1_\L",
                r"F_EyeLight2_\L",
                r"F_EyeLight3_\L",
                r"DEF_Eye_\L",
                r"EyeLight+_\L",
                r"EyeRotationErase_\L",
            ],
        ),
        rule(r"Breast_\L", &[r"DEF_Bust_01_\L", r"DEF_Bust_02_\L"]),
        rule("Zipper", &["DEF_Zipper"]),
        rule(r"Thumb0_\L", &[r"DEF_Thumb_01_\L_01", r"DEF_Thumb_01_\L_02"]),
        rule(r"Thumb1_\L", &[r"DEF_Thumb_02_\L"]),
        rule(r"Thumb2_\L", &[r"DEF_Thumb_03_\L"]),
        rule(
            r"IndexFinger1_\L",
            &[r"DEF_F_Index_01_\L_01", r"DEF_F_Index_01_\L_02"],
        ),
        rule(r"IndexFinger2_\L", &[r"DEF_F_Index_02_\L"]),
        rule(r"IndexFinger3_\L", &[r"DEF_F_Index_03_\L"]),
        rule(
            r"MiddleFinger1_\L",
            &[r"DEF_F_Middle_01_\L_01", r"DEF_F_Middle_01_\L_02"],
        ),
        rule(r"MiddleFinger2_\L", &[r"DEF_F_Middle_02_\L"]),
        rule(r"MiddleFinger3_\L", &[r"DEF_F_Middle_03_\L"]),
        rule(
            r"RingFinger1_\L",
            &[r"DEF_F_Ring_01_\L_01", r"DEF_F_Ring_01_\L_02"],
        ),
        rule(r"RingFinger2_\L", &[r"DEF_F_Ring_02_\L"]),
        rule(r"RingFinger3_\L", &[r"DEF_F_Ring_03_\L"]),
        rule(
            r"LittleFinger1_\L",
            &[r"DEF_F_Pinky_01_\L_01", r"DEF_F_Pinky_01_\L_02"],
        ),
        rule(r"LittleFinger2_\L", &[r"DEF_F_Pinky_02_\L"]),
        rule(r"LittleFinger3_\L", &[r"DEF_F_Pinky_03_\L"]),
    ]
}
