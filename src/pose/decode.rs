use anyhow::Result;

use super::landmark::{Landmark, LandmarkIndex, Pose};

/// BlazePose ランドマークモデルの入力サイズ（正方形）
pub const BLAZEPOSE_INPUT_SIZE: usize = 256;

/// 1ランドマークあたりの値 (x, y, z, visibility, presence)
const LANDMARK_STRIDE: usize = 5;

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// モデル出力 [1, 195] を Pose に変換
///
/// x, y は入力画像のピクセル座標なので入力サイズで正規化する。
/// visibility はロジットなので sigmoid をかける。
/// 末尾の補助ランドマーク（33番以降）は使わない。
/// 座標に NaN / inf が含まれる出力はエラーにする。
pub fn decode_landmarks(raw: &[f32]) -> Result<Pose> {
    let needed = LandmarkIndex::COUNT * LANDMARK_STRIDE;
    if raw.len() < needed {
        anyhow::bail!("Landmark output too short: {} < {}", raw.len(), needed);
    }

    let scale = BLAZEPOSE_INPUT_SIZE as f32;
    let mut landmarks = [Landmark::default(); LandmarkIndex::COUNT];
    for (i, chunk) in raw.chunks_exact(LANDMARK_STRIDE).take(LandmarkIndex::COUNT).enumerate() {
        if !chunk[0].is_finite() || !chunk[1].is_finite() {
            anyhow::bail!("Non-finite landmark {}: ({}, {})", i, chunk[0], chunk[1]);
        }
        landmarks[i] = Landmark::new(chunk[0] / scale, chunk[1] / scale, sigmoid(chunk[3]));
    }

    Ok(Pose::new(landmarks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_decode_landmarks() {
        let mut raw = vec![0.0f32; 39 * LANDMARK_STRIDE];
        let wrist = LandmarkIndex::LeftWrist as usize * LANDMARK_STRIDE;
        raw[wrist] = 128.0;
        raw[wrist + 1] = 64.0;
        raw[wrist + 2] = -3.0;
        raw[wrist + 3] = 0.0;

        let pose = decode_landmarks(&raw).unwrap();
        let lm = pose.get(LandmarkIndex::LeftWrist);
        assert!((lm.x - 0.5).abs() < 1e-6);
        assert!((lm.y - 0.25).abs() < 1e-6);
        assert!((lm.confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_decode_ignores_auxiliary_landmarks() {
        let mut raw = vec![0.0f32; 39 * LANDMARK_STRIDE];
        raw[33 * LANDMARK_STRIDE] = 200.0;
        let pose = decode_landmarks(&raw).unwrap();
        assert!(pose.landmarks.iter().all(|l| l.x == 0.0));
    }

    #[test]
    fn test_decode_short_output() {
        assert!(decode_landmarks(&[0.0; 10]).is_err());
    }

    #[test]
    fn test_decode_rejects_non_finite() {
        let mut raw = vec![0.0f32; 39 * LANDMARK_STRIDE];
        raw[LandmarkIndex::LeftThumb as usize * LANDMARK_STRIDE] = f32::NAN;
        assert!(decode_landmarks(&raw).is_err());

        let mut raw = vec![0.0f32; 39 * LANDMARK_STRIDE];
        raw[LandmarkIndex::RightShoulder as usize * LANDMARK_STRIDE + 1] = f32::INFINITY;
        assert!(decode_landmarks(&raw).is_err());

        let all_nan = vec![f32::NAN; 39 * LANDMARK_STRIDE];
        assert!(decode_landmarks(&all_nan).is_err());
    }

    #[test]
    fn test_decode_allows_non_finite_auxiliary_landmarks() {
        let mut raw = vec![0.0f32; 39 * LANDMARK_STRIDE];
        raw[34 * LANDMARK_STRIDE] = f32::NAN;
        assert!(decode_landmarks(&raw).is_ok());
    }
}
