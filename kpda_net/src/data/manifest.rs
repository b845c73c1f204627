//! JSON sample manifests and the dataset built on them.
//!
//! A manifest lists images with their annotated keypoints:
//!
//! ```json
//! { "samples": [ { "image": "img/0001.jpg", "keypoints": [[12, 40, 1], [0, 0, -1]] } ] }
//! ```
//!
//! Image paths are resolved relative to the manifest file.

use std::fs;
use std::path::{Path, PathBuf};

use burn::prelude::*;
use kpda_core::{flip_keypoints, ConjugatePermutation, Keypoint, TargetEncoder, Visibility};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::preprocess::{load_rgb, mirror, preprocess};
use super::{BatchSource, KeypointBatch};
use crate::config::{KpdaConfig, TrainingConfig};
use crate::error::{KpdaNetError, Result};

/// One annotated image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSample {
    /// Image path, relative to the manifest or absolute.
    pub image: PathBuf,
    /// `[x, y, visibility flag]` per keypoint.
    pub keypoints: Vec<[f32; 3]>,
}

impl ManifestSample {
    /// Annotated keypoints.
    pub fn keypoints(&self) -> Vec<Keypoint> {
        self.keypoints
            .iter()
            .map(|&[x, y, v]| Keypoint::new(x, y, Visibility::from_flag(v as i8)))
            .collect()
    }
}

/// A list of annotated images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Samples in file order.
    pub samples: Vec<ManifestSample>,
    #[serde(skip)]
    root: PathBuf,
}

impl Manifest {
    /// Manifest whose relative image paths resolve against `root`.
    pub fn new(samples: Vec<ManifestSample>, root: impl Into<PathBuf>) -> Self {
        Self {
            samples,
            root: root.into(),
        }
    }

    /// Read a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let manifest_error = |message: String| KpdaNetError::Manifest {
            path: path.to_path_buf(),
            message,
        };
        let text = fs::read_to_string(path).map_err(|e| manifest_error(e.to_string()))?;
        let mut manifest: Manifest =
            serde_json::from_str(&text).map_err(|e| manifest_error(e.to_string()))?;
        manifest.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        log::debug!("Loaded {} samples from {:?}", manifest.samples.len(), path);
        Ok(manifest)
    }

    /// Write the manifest as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let manifest_error = |message: String| KpdaNetError::Manifest {
            path: path.to_path_buf(),
            message,
        };
        let text = serde_json::to_string_pretty(self).map_err(|e| manifest_error(e.to_string()))?;
        fs::write(path, text).map_err(|e| manifest_error(e.to_string()))
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the manifest has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Resolved path of a sample's image.
    pub fn image_path(&self, sample: &ManifestSample) -> PathBuf {
        self.root.join(&sample.image)
    }
}

fn sample_seed(seed: u64, epoch: usize, index: usize) -> u64 {
    seed.wrapping_add((epoch as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add(index as u64)
}

/// Batches of preprocessed images and Gaussian targets read from a manifest.
#[derive(Debug, Clone)]
pub struct ManifestDataset {
    manifest: Manifest,
    kpda: KpdaConfig,
    encoder: TargetEncoder,
    permutation: ConjugatePermutation,
    batch_size: usize,
    flip_probability: f64,
    shuffle: bool,
    seed: u64,
    epoch: usize,
    order: Vec<usize>,
}

impl ManifestDataset {
    fn new(
        manifest: Manifest,
        kpda: &KpdaConfig,
        training: &TrainingConfig,
        shuffle: bool,
        flip_probability: f64,
    ) -> Result<Self> {
        let order = (0..manifest.len()).collect();
        Ok(Self {
            encoder: kpda.target_encoder()?,
            permutation: kpda.clothes.conjugate_permutation()?,
            kpda: kpda.clone(),
            manifest,
            batch_size: training.batch_size.max(1),
            flip_probability: flip_probability.clamp(0.0, 1.0),
            shuffle,
            seed: training.seed,
            epoch: 0,
            order,
        })
    }

    /// Shuffled, flip-augmented training split.
    pub fn train(manifest: Manifest, kpda: &KpdaConfig, training: &TrainingConfig) -> Result<Self> {
        Self::new(manifest, kpda, training, true, training.flip_probability)
    }

    /// Validation split in file order without augmentation.
    pub fn validation(
        manifest: Manifest,
        kpda: &KpdaConfig,
        training: &TrainingConfig,
    ) -> Result<Self> {
        Self::new(manifest, kpda, training, false, 0.0)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.manifest.len()
    }

    /// Whether the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.manifest.is_empty()
    }

    /// Sample indices in the current epoch's order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    fn load_sample(&self, index: usize) -> Result<(Vec<f32>, Vec<f32>, Vec<f32>)> {
        let sample = &self.manifest.samples[index];
        let expected = self.kpda.num_keypoints();
        if sample.keypoints.len() != expected {
            return Err(KpdaNetError::KeypointCount {
                index,
                expected,
                got: sample.keypoints.len(),
            });
        }

        let mut image = load_rgb(&self.manifest.image_path(sample))?;
        let mut keypoints = sample.keypoints();

        let mut rng = StdRng::seed_from_u64(sample_seed(self.seed, self.epoch, index));
        if self.flip_probability > 0.0 && rng.gen_bool(self.flip_probability) {
            keypoints = flip_keypoints(&keypoints, image.width(), &self.permutation)?;
            image = mirror(&image);
        }

        let prepared = preprocess(&image, &self.kpda)?;
        let targets = self.encoder.encode(&keypoints, prepared.plan.scale)?;
        Ok((prepared.data, targets.heatmaps.into_vec(), targets.weights))
    }
}

impl BatchSource for ManifestDataset {
    fn num_batches(&self) -> usize {
        self.len().div_ceil(self.batch_size)
    }

    fn on_epoch_start(&mut self, epoch: usize) {
        self.epoch = epoch;
        self.order = (0..self.manifest.len()).collect();
        if self.shuffle {
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(epoch as u64));
            self.order.shuffle(&mut rng);
        }
    }

    fn batch<B: Backend>(&self, index: usize, device: &B::Device) -> Result<KeypointBatch<B>> {
        let len = self.num_batches();
        if index >= len {
            return Err(KpdaNetError::BatchOutOfRange { index, len });
        }
        let start = index * self.batch_size;
        let end = (start + self.batch_size).min(self.order.len());
        let indices = &self.order[start..end];

        let canvas = self.kpda.img_max_size as usize;
        let side = self.kpda.heatmap_size();
        let k = self.kpda.num_keypoints();
        let n = indices.len();

        let mut images = Vec::with_capacity(n * 3 * canvas * canvas);
        let mut heatmaps = Vec::with_capacity(n * k * side * side);
        let mut weights = Vec::with_capacity(n * k);
        for &i in indices {
            let (image, heatmap, weight) = self.load_sample(i)?;
            images.extend(image);
            heatmaps.extend(heatmap);
            weights.extend(weight);
        }

        Ok(KeypointBatch::new(
            Tensor::from_data(TensorData::new(images, [n, 3, canvas, canvas]), device),
            Tensor::from_data(TensorData::new(heatmaps, [n, k, side, side]), device),
            Tensor::from_data(TensorData::new(weights, [n, k]), device),
        ))
    }
}
