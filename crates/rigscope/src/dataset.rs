//! Dataset model and sources.
//!
//! A dataset is a JSON document with a `cameras` array. Each entry is parsed
//! on its own so one malformed camera does not spoil the rest.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use glam::DVec3;
use rigscope_core::{resolve, Color, Intrinsics, Result, RigError, ScaleFactors, ViewerOptions};
use rigscope_structures::{CameraSpec, ImageInfo};
use serde::Deserialize;

/// Where dataset text comes from.
pub trait DatasetSource {
    /// Human-readable location used in errors and logs.
    fn location(&self) -> String;

    /// Fetches the dataset text.
    fn fetch(&self) -> impl Future<Output = std::io::Result<String>>;
}

/// A dataset file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> impl Future<Output = std::io::Result<String>> {
        let path = self.path.clone();
        async move { std::fs::read_to_string(path) }
    }
}

/// Dataset text held in memory.
#[derive(Debug, Clone)]
pub struct InlineSource {
    name: String,
    text: String,
}

impl InlineSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl DatasetSource for InlineSource {
    fn location(&self) -> String {
        self.name.clone()
    }

    fn fetch(&self) -> impl Future<Output = std::io::Result<String>> {
        std::future::ready(Ok(self.text.clone()))
    }
}

/// The top level of a dataset. Cameras stay raw until validated one by one.
#[derive(Debug, Deserialize)]
pub struct RawDataset {
    pub cameras: Vec<serde_json::Value>,
}

/// Parses dataset text.
pub fn parse_dataset(text: &str, location: &str) -> Result<RawDataset> {
    serde_json::from_str(text).map_err(|cause| RigError::DatasetParse {
        location: location.to_string(),
        cause,
    })
}

/// A camera id written as a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CameraId {
    Text(String),
    Number(i64),
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A color written as CSS-like text or an `[r, g, b]` array of 0-255 values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Text(String),
    Rgb([f64; 3]),
}

impl ColorSpec {
    pub fn to_color(&self) -> Option<Color> {
        match self {
            Self::Text(s) => Color::parse(s),
            Self::Rgb(rgb) => Color::from_rgb255(*rgb),
        }
    }
}

/// Image dimensions and optional texture path.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRecord {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub path: Option<String>,
}

/// One camera entry as written in the dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct CameraRecord {
    pub cam_id: CameraId,
    #[serde(default)]
    pub cam_label: Option<String>,
    pub intrinsics: Vec<f64>,
    pub extrinsics: Vec<Vec<f64>>,
    #[serde(default)]
    pub color: Option<ColorSpec>,
    pub image: ImageRecord,
    #[serde(default)]
    pub points: Vec<[f64; 3]>,
    #[serde(default)]
    pub trans_scale: Option<f64>,
    #[serde(default)]
    pub points_scale: Option<f64>,
    #[serde(default)]
    pub focal_scale: Option<f64>,
    #[serde(default)]
    pub model: Option<String>,
}

/// A validated camera ready to be built.
#[derive(Debug, Clone)]
pub struct ParsedCamera {
    pub spec: CameraSpec,
    /// Set when the extrinsics failed the rigidity check.
    pub warning: Option<String>,
}

impl CameraRecord {
    /// Validates the record and resolves its pose.
    pub fn into_parsed(self, options: &ViewerOptions) -> Result<ParsedCamera> {
        let cam_id = self.cam_id.to_string();

        let intrinsics = Intrinsics::from_slice(&self.intrinsics).ok_or_else(|| {
            RigError::record(&cam_id, "intrinsics must be 4 finite numbers [fx, fy, cx, cy]")
        })?;
        let rows = extrinsics_rows(&self.extrinsics)
            .ok_or_else(|| {
                RigError::record(&cam_id, "extrinsics must be 4 rows of 4 finite numbers")
            })?;

        let color = match &self.color {
            Some(spec) => spec
                .to_color()
                .ok_or_else(|| RigError::record(&cam_id, format!("unrecognized color {spec:?}")))?,
            None => Color::default(),
        };

        if self.image.width == 0 || self.image.height == 0 {
            return Err(RigError::record(&cam_id, "image dimensions must be non-zero"));
        }

        let points_local: Vec<DVec3> = self.points.iter().map(|p| DVec3::from_array(*p)).collect();
        if !points_local.iter().all(|p| p.is_finite()) {
            return Err(RigError::record(&cam_id, "keypoints must be finite"));
        }

        let defaults = options.default_scale;
        let scale = ScaleFactors {
            trans_scale: self.trans_scale.unwrap_or(defaults.trans_scale),
            points_scale: self.points_scale.unwrap_or(defaults.points_scale),
            focal_scale: self.focal_scale.unwrap_or(defaults.focal_scale),
        };
        if ![scale.trans_scale, scale.points_scale, scale.focal_scale]
            .iter()
            .all(|s| s.is_finite())
        {
            return Err(RigError::record(&cam_id, "scale factors must be finite"));
        }

        let resolution = resolve(&rows, options.convention, &scale, options.rigid_tolerance);
        let warning = if resolution.is_rigid {
            None
        } else {
            let msg = format!(
                "camera '{cam_id}': extrinsics are not rigid (max error {:.2e})",
                resolution.rigidity.max_error()
            );
            log::warn!("{msg}");
            Some(msg)
        };

        let spec = CameraSpec {
            label: self.cam_label.unwrap_or_else(|| format!("Cam {cam_id}")),
            cam_id,
            color,
            intrinsics,
            pose: resolution.pose,
            points_local,
            image: ImageInfo {
                width: self.image.width,
                height: self.image.height,
                path: self.image.path,
            },
            scale,
            model_path: self.model.or_else(|| options.model_path.clone()),
        };
        Ok(ParsedCamera { spec, warning })
    }
}

fn extrinsics_rows(rows: &[Vec<f64>]) -> Option<[[f64; 4]; 4]> {
    if rows.len() != 4 {
        return None;
    }
    let mut out = [[0.0; 4]; 4];
    for (dst, src) in out.iter_mut().zip(rows) {
        if src.len() != 4 || !src.iter().all(|v| v.is_finite()) {
            return None;
        }
        dst.copy_from_slice(src);
    }
    Some(out)
}

/// Best-effort id of a raw entry, for error messages.
fn raw_cam_id(value: &serde_json::Value, index: usize) -> String {
    match value.get("cam_id") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => format!("#{index}"),
    }
}

/// Validates every camera entry.
///
/// Returns one result per entry, in order. A repeated `cam_id` is an error
/// for every entry after the first.
pub fn parse_cameras(
    raw: RawDataset,
    options: &ViewerOptions,
) -> Vec<(String, Result<ParsedCamera>)> {
    let mut seen = HashSet::new();
    raw.cameras
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let id = raw_cam_id(&value, index);
            let parsed = serde_json::from_value::<CameraRecord>(value)
                .map_err(|e| RigError::record(&id, e.to_string()))
                .and_then(|record| record.into_parsed(options))
                .and_then(|parsed| {
                    if seen.insert(parsed.spec.cam_id.clone()) {
                        Ok(parsed)
                    } else {
                        Err(RigError::DuplicateCamera(parsed.spec.cam_id))
                    }
                });
            (id, parsed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMERA: &str = r#"{
        "cam_id": 1,
        "intrinsics": [600, 600, 320, 240],
        "extrinsics": [[1,0,0,1000],[0,1,0,2000],[0,0,1,3000],[0,0,0,1]],
        "color": "rgb(255, 0, 0)",
        "image": { "width": 640, "height": 480 },
        "points": [[0, 0, 500]],
        "trans_scale": 0.001,
        "extra_field": true
    }"#;

    fn record(text: &str) -> CameraRecord {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_record_parses_and_resolves() {
        let parsed = record(CAMERA).into_parsed(&ViewerOptions::default()).unwrap();
        let spec = parsed.spec;
        assert_eq!(spec.cam_id, "1");
        assert_eq!(spec.label, "Cam 1");
        assert_eq!(spec.color, Color::new(1.0, 0.0, 0.0));
        assert!((spec.pose.translation - DVec3::new(1.0, 2.0, 3.0)).length() < 1e-12);
        assert_eq!(spec.scale.points_scale, 1.0);
        assert_eq!(spec.model_path.as_deref(), Some("assets/camera.obj"));
        assert!(parsed.warning.is_none());
    }

    #[test]
    fn test_string_and_numeric_ids() {
        assert_eq!(CameraId::Number(3).to_string(), "3");
        let id: CameraId = serde_json::from_str(r#""left""#).unwrap();
        assert_eq!(id.to_string(), "left");
    }

    #[test]
    fn test_bad_shapes_are_record_errors() {
        let opts = ViewerOptions::default();
        let bad_k = CAMERA.replace("[600, 600, 320, 240]", "[600, 600, 320]");
        assert!(matches!(
            record(&bad_k).into_parsed(&opts),
            Err(RigError::CameraRecord { .. })
        ));

        let bad_e = CAMERA.replace(",[0,0,0,1]]", "]");
        assert!(record(&bad_e).into_parsed(&opts).is_err());

        let bad_color = CAMERA.replace("rgb(255, 0, 0)", "blurple");
        assert!(record(&bad_color).into_parsed(&opts).is_err());
    }

    #[test]
    fn test_color_array() {
        let text = CAMERA.replace(r#""rgb(255, 0, 0)""#, "[0, 255, 0]");
        let parsed = record(&text).into_parsed(&ViewerOptions::default()).unwrap();
        assert_eq!(parsed.spec.color, Color::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_non_rigid_is_a_warning() {
        let text = CAMERA.replace("[1,0,0,1000]", "[2,0,0,1000]");
        let parsed = record(&text).into_parsed(&ViewerOptions::default()).unwrap();
        assert!(parsed.warning.is_some());
    }

    #[test]
    fn test_parse_cameras_flags_duplicates_and_garbage() {
        let text = format!(r#"{{ "cameras": [{CAMERA}, {CAMERA}, {{ "cam_id": "x" }}, 5] }}"#);
        let raw = parse_dataset(&text, "inline").unwrap();
        let results = parse_cameras(raw, &ViewerOptions::default());
        assert_eq!(results.len(), 4);
        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(RigError::DuplicateCamera(_))));
        assert_eq!(results[2].0, "x");
        assert!(matches!(results[2].1, Err(RigError::CameraRecord { .. })));
        assert_eq!(results[3].0, "#3");
    }

    #[test]
    fn test_missing_camera_list_is_parse_error() {
        assert!(matches!(
            parse_dataset(r#"{ "frames": [] }"#, "inline"),
            Err(RigError::DatasetParse { .. })
        ));
    }

    #[test]
    fn test_inline_source() {
        let source = InlineSource::new("mem", "{}");
        assert_eq!(source.location(), "mem");
        assert_eq!(pollster::block_on(source.fetch()).unwrap(), "{}");
    }
}
