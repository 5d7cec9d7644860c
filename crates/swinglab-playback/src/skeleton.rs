//! Skeleton connectivity and role colors.

use image::Rgba;
use swinglab_models::Landmark;

/// Joint connectivity over the 33-landmark vocabulary
/// (pairs of landmarks that form the drawn skeleton).
pub const SKELETON_EDGES: [(Landmark, Landmark); 24] = [
    // Face
    (Landmark::LeftEar, Landmark::LeftEye),
    (Landmark::LeftEye, Landmark::Nose),
    (Landmark::Nose, Landmark::RightEye),
    (Landmark::RightEye, Landmark::RightEar),
    // Shoulders and arms
    (Landmark::LeftShoulder, Landmark::RightShoulder),
    (Landmark::LeftShoulder, Landmark::LeftElbow),
    (Landmark::LeftElbow, Landmark::LeftWrist),
    (Landmark::RightShoulder, Landmark::RightElbow),
    (Landmark::RightElbow, Landmark::RightWrist),
    // Hands (wrist to fingertip)
    (Landmark::LeftWrist, Landmark::LeftIndex),
    (Landmark::LeftWrist, Landmark::LeftPinky),
    (Landmark::RightWrist, Landmark::RightIndex),
    (Landmark::RightWrist, Landmark::RightPinky),
    // Torso
    (Landmark::LeftShoulder, Landmark::LeftHip),
    (Landmark::RightShoulder, Landmark::RightHip),
    (Landmark::LeftHip, Landmark::RightHip),
    // Legs
    (Landmark::LeftHip, Landmark::LeftKnee),
    (Landmark::LeftKnee, Landmark::LeftAnkle),
    (Landmark::RightHip, Landmark::RightKnee),
    (Landmark::RightKnee, Landmark::RightAnkle),
    // Feet
    (Landmark::LeftAnkle, Landmark::LeftHeel),
    (Landmark::LeftHeel, Landmark::LeftFootIndex),
    (Landmark::RightAnkle, Landmark::RightHeel),
    (Landmark::RightHeel, Landmark::RightFootIndex),
];

/// Model (reference) skeleton color.
pub const MODEL_COLOR: Rgba<u8> = Rgba([0, 180, 255, 255]); // #00b4ff

/// Subject (player) skeleton color.
pub const SUBJECT_COLOR: Rgba<u8> = Rgba([255, 68, 79, 255]); // #ff444f

/// Impact-frame marker color.
pub const IMPACT_COLOR: Rgba<u8> = Rgba([204, 237, 0, 255]); // #cced00

/// Split-view divider color.
pub const DIVIDER_COLOR: Rgba<u8> = Rgba([243, 243, 243, 255]); // #f3f3f3
