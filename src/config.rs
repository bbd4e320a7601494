use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HandfontError, HandfontResult};

/// How the box merger treats chains of fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// One forward sweep; a box that only becomes mergeable after an earlier
    /// merge in the same sweep stays separate.
    #[default]
    SinglePass,
    /// Repeat the sweep until it no longer reduces the box count.
    FixedPoint,
}

/// Tunables for the segmentation stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Boxes merge when their IoU is strictly above this.
    pub iou_threshold: f64,
    /// Boxes merge when both top-left coordinates differ by less than this.
    pub proximity: u32,
    /// Minimum bounding-box area (px²) kept by the filter.
    pub min_area: u64,
    /// Pixels added on each side of a letter crop.
    pub padding: u32,
    /// Radius of the square structuring element (1 = 3x3).
    pub kernel_radius: u8,
    pub merge_policy: MergePolicy,
    /// Accepted input extensions, lowercase without the dot.
    pub allowed_extensions: Vec<String>,
    /// Extension (and encoder) used for letter crops.
    pub output_format: String,
}

impl SegmenterConfig {
    pub const DEFAULT_IOU_THRESHOLD: f64 = 0.2;
    pub const DEFAULT_PROXIMITY: u32 = 20;
    pub const DEFAULT_MIN_AREA: u64 = 60;
    pub const DEFAULT_PADDING: u32 = 10;

    /// Load from a JSON file; missing fields keep their defaults.
    pub fn load(path: &Path) -> HandfontResult<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| HandfontError::io("reading config", path, e))?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| HandfontError::config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HandfontResult<()> {
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(HandfontError::config(format!(
                "iou_threshold must be within [0, 1], got {}",
                self.iou_threshold
            )));
        }
        if self.allowed_extensions.is_empty() {
            return Err(HandfontError::config("allowed_extensions must not be empty"));
        }
        if image::ImageFormat::from_extension(&self.output_format).is_none() {
            return Err(HandfontError::config(format!(
                "unsupported output_format {:?}",
                self.output_format
            )));
        }
        Ok(())
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub(crate) fn accepts_extension(&self, ext: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            iou_threshold: Self::DEFAULT_IOU_THRESHOLD,
            proximity: Self::DEFAULT_PROXIMITY,
            min_area: Self::DEFAULT_MIN_AREA,
            padding: Self::DEFAULT_PADDING,
            kernel_radius: 1,
            merge_policy: MergePolicy::SinglePass,
            allowed_extensions: vec!["png".into(), "jpg".into(), "jpeg".into()],
            output_format: "png".into(),
        }
    }
}

/// Metrics handed to the font compiler, in font units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontMetrics {
    pub family_name: String,
    pub font_name: String,
    pub full_name: String,
    pub em: u32,
    pub ascent: u32,
    pub descent: u32,
    pub side_bearing: i32,
    /// Added to the outline width to get the advance width.
    pub advance_padding: i32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            family_name: "Hebrew Font".into(),
            font_name: "HebrewFont".into(),
            full_name: "Hebrew Font".into(),
            em: 1000,
            ascent: 800,
            descent: 200,
            side_bearing: 27,
            advance_padding: 80,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = SegmenterConfig::default();
        assert_eq!(config.iou_threshold, 0.2);
        assert_eq!(config.proximity, 20);
        assert_eq!(config.min_area, 60);
        assert_eq!(config.padding, 10);
        assert_eq!(config.kernel_radius, 1);
        assert_eq!(config.merge_policy, MergePolicy::SinglePass);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SegmenterConfig =
            serde_json::from_str(r#"{ "min_area": 100, "merge_policy": "fixed_point" }"#).unwrap();
        assert_eq!(config.min_area, 100);
        assert_eq!(config.merge_policy, MergePolicy::FixedPoint);
        assert_eq!(config.padding, 10);
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let config = SegmenterConfig::default();
        assert!(config.accepts_extension("PNG"));
        assert!(config.accepts_extension("jpeg"));
        assert!(!config.accepts_extension("gif"));
    }

    #[test]
    fn rejects_unknown_output_format() {
        let config = SegmenterConfig {
            output_format: "xyz".into(),
            ..SegmenterConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "padding": 4 }"#).unwrap();
        let config = SegmenterConfig::load(&path).unwrap();
        assert_eq!(config.padding, 4);
    }
}
