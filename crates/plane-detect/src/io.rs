//! JSON configuration and report helpers for plane detection.

use crate::{PlaneDetectError, PlaneDetection, PlaneDetector, PlaneDetectorParams};
use nalgebra::Point3;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum PlaneIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A point cloud frame stored as `{"points": [[x, y, z], ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloudFile {
    pub points: Vec<Point3<f64>>,
}

impl PointCloudFile {
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    /// Load a cloud from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PlaneIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this cloud to disk as JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PlaneIoError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Configuration for a one-shot detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaneDetectConfig {
    /// Path of the [`PointCloudFile`] to process.
    pub cloud_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Seed of the sampling sequence; `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub params: PlaneDetectorParams,
}

impl PlaneDetectConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PlaneIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PlaneIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve `cloud_path` relative to the directory of the config file.
    pub fn resolve_cloud_path(&self, config_path: &Path) -> PathBuf {
        let cloud = PathBuf::from(&self.cloud_path);
        if cloud.is_absolute() {
            return cloud;
        }
        config_path
            .parent()
            .map(|dir| dir.join(&cloud))
            .unwrap_or(cloud)
    }

    /// Build a detector from this config.
    pub fn build_detector(&self) -> PlaneDetector<ChaCha8Rng> {
        let params = self.params.clone();
        match self.seed {
            Some(seed) => PlaneDetector::seeded(params, seed),
            None => PlaneDetector::from_entropy(params),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaneDetectReport {
    pub cloud_path: String,
    pub config_path: String,
    pub num_points: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub detection: Option<PlaneDetection>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PlaneDetectReport {
    /// Build a base report for a config and the loaded cloud.
    pub fn new(cfg: &PlaneDetectConfig, config_path: &Path, num_points: usize) -> Self {
        Self {
            cloud_path: cfg.cloud_path.clone(),
            config_path: config_path.to_string_lossy().into_owned(),
            num_points,
            seed: cfg.seed,
            detection: None,
            error: None,
        }
    }

    pub fn set_detection(&mut self, detection: PlaneDetection) {
        self.detection = Some(detection);
        self.error = None;
    }

    pub fn set_error(&mut self, err: PlaneDetectError) {
        self.detection = None;
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PlaneIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, PlaneIoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PlaneIoError> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}
