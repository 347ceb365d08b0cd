//! Account Context - 播放偏好

use serde::{Deserialize, Serialize};

use super::AccountError;

/// 用户播放偏好
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPreferences {
    /// 双耳节拍基频（Hz）
    pub binaural_base_freq: i64,
    /// 双耳节拍差频（Hz）
    pub binaural_beat_freq: i64,
    pub binaural_volume: f64,
    pub voice_volume: f64,
    /// 两条肯定语之间的间隔（秒）
    pub gap_between_sec: i64,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            binaural_base_freq: 200,
            binaural_beat_freq: 10,
            binaural_volume: 0.5,
            voice_volume: 0.8,
            gap_between_sec: 2,
        }
    }
}

impl UserPreferences {
    /// 应用部分更新（先校验）
    pub fn apply(&mut self, patch: &UserPreferencesPatch) -> Result<(), AccountError> {
        patch.validate()?;

        if let Some(v) = patch.binaural_base_freq {
            self.binaural_base_freq = v;
        }
        if let Some(v) = patch.binaural_beat_freq {
            self.binaural_beat_freq = v;
        }
        if let Some(v) = patch.binaural_volume {
            self.binaural_volume = v;
        }
        if let Some(v) = patch.voice_volume {
            self.voice_volume = v;
        }
        if let Some(v) = patch.gap_between_sec {
            self.gap_between_sec = v;
        }
        Ok(())
    }
}

/// 播放偏好部分更新
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPreferencesPatch {
    pub binaural_base_freq: Option<i64>,
    pub binaural_beat_freq: Option<i64>,
    pub binaural_volume: Option<f64>,
    pub voice_volume: Option<f64>,
    pub gap_between_sec: Option<i64>,
}

impl UserPreferencesPatch {
    pub fn validate(&self) -> Result<(), AccountError> {
        check_int("binaural_base_freq", self.binaural_base_freq, 100, 500)?;
        check_int("binaural_beat_freq", self.binaural_beat_freq, 1, 30)?;
        check_float("binaural_volume", self.binaural_volume, 0.0, 1.0)?;
        check_float("voice_volume", self.voice_volume, 0.0, 1.0)?;
        check_int("gap_between_sec", self.gap_between_sec, 0, 10)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.binaural_base_freq.is_none()
            && self.binaural_beat_freq.is_none()
            && self.binaural_volume.is_none()
            && self.voice_volume.is_none()
            && self.gap_between_sec.is_none()
    }
}

fn check_int(field: &'static str, value: Option<i64>, min: i64, max: i64) -> Result<(), AccountError> {
    match value {
        Some(v) if v < min || v > max => Err(AccountError::OutOfRange {
            field,
            min: min as f64,
            max: max as f64,
        }),
        _ => Ok(()),
    }
}

fn check_float(field: &'static str, value: Option<f64>, min: f64, max: f64) -> Result<(), AccountError> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(AccountError::OutOfRange { field, min, max }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_partial_patch() {
        let mut prefs = UserPreferences::default();
        let patch = UserPreferencesPatch {
            voice_volume: Some(0.3),
            gap_between_sec: Some(5),
            ..Default::default()
        };
        prefs.apply(&patch).unwrap();

        assert_eq!(prefs.voice_volume, 0.3);
        assert_eq!(prefs.gap_between_sec, 5);
        assert_eq!(prefs.binaural_base_freq, 200);
    }

    #[test]
    fn test_out_of_range_is_rejected_without_changes() {
        let mut prefs = UserPreferences::default();
        let patch = UserPreferencesPatch {
            voice_volume: Some(0.1),
            binaural_base_freq: Some(99),
            ..Default::default()
        };

        assert!(prefs.apply(&patch).is_err());
        assert_eq!(prefs, UserPreferences::default());
    }

    #[test]
    fn test_float_bounds_are_inclusive() {
        let patch = UserPreferencesPatch {
            binaural_volume: Some(1.0),
            voice_volume: Some(0.0),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());

        let patch = UserPreferencesPatch {
            voice_volume: Some(f64::NAN),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
