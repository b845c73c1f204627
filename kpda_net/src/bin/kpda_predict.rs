//! Predict keypoints for the images of a manifest.
//!
//! ```text
//! kpda-predict --clothes blouse --model checkpoints/kpt_blouse_042.ckpt \
//!     --manifest val.json --output predictions [--vis] [--gpu 0]
//! ```
//!
//! When the manifest carries annotations, the mean normalized error is
//! reported.

use std::path::PathBuf;

use anyhow::Context;
use burn::config::Config;
use clap::Parser;
use kpda_core::{normalized_error, ErrorAccumulator, Keypoint};

use kpda_net::backend::{self, InferenceBackend};
use kpda_net::data::{load_rgb, render_keypoints, save_rendering, Manifest, ManifestSample};
use kpda_net::training::load_training_checkpoint;
use kpda_net::{
    BaselineNet, ClothingType, ExperimentConfig, KpdaConfig, KpdaNetError, Predictor,
};

#[derive(Parser, Debug)]
#[command(name = "kpda-predict", about = "Predict clothing keypoints with flip-fusion")]
struct Args {
    /// Clothing category of the model.
    #[arg(long)]
    clothes: ClothingType,

    /// GPU index (requires the `wgpu` feature).
    #[arg(long)]
    gpu: Option<usize>,

    /// Checkpoint to load.
    #[arg(long)]
    model: PathBuf,

    /// Write keypoint overlays into the output directory.
    #[arg(long)]
    vis: bool,

    /// Images to predict (JSON manifest).
    #[arg(long)]
    manifest: PathBuf,

    /// Experiment configuration (JSON); defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for predictions and overlays.
    #[arg(long, default_value = "predictions")]
    output: PathBuf,
}

fn to_triples(keypoints: &[Keypoint]) -> Vec<[f32; 3]> {
    keypoints
        .iter()
        .map(|kp| [kp.x, kp.y, kp.visibility.flag() as f32])
        .collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ExperimentConfig::load(path)
            .map_err(KpdaNetError::from)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ExperimentConfig::new(KpdaConfig::new(args.clothes)),
    };
    config.kpda.clothes = args.clothes;
    config.validate()?;

    let clothes = args.clothes;
    let device = backend::device(args.gpu);
    let model = BaselineNet::<InferenceBackend>::new(
        &config.network,
        config.kpda.num_keypoints(),
        &device,
    );
    let (model, state) = load_training_checkpoint(model, &args.model, clothes, &device)
        .with_context(|| format!("loading model {}", args.model.display()))?;
    log::info!("Using {} model from epoch {}", clothes, state.epoch);

    let predictor = Predictor::new(model, config.kpda.clone(), device)?;

    let manifest = Manifest::load(&args.manifest)
        .with_context(|| format!("loading {}", args.manifest.display()))?;
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let reference = clothes.reference_pair();
    let mut errors = ErrorAccumulator::new();
    let mut predictions = Vec::with_capacity(manifest.len());

    for (index, sample) in manifest.samples.iter().enumerate() {
        let path = manifest.image_path(sample);
        let image = match load_rgb(&path) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("Skipping sample {}: {}", index, err);
                continue;
            }
        };

        let keypoints = predictor.predict(&image)?;

        if sample.keypoints.len() == keypoints.len() {
            errors.push(normalized_error(&keypoints, &sample.keypoints(), reference)?);
        }

        if args.vis {
            let radius = (image.width().max(image.height()) / 150).max(2);
            let overlay = render_keypoints(&image, &keypoints, radius);
            save_rendering(&overlay, &args.output, clothes, index)?;
        }

        predictions.push(ManifestSample {
            image: path,
            keypoints: to_triples(&keypoints),
        });
        if (index + 1) % 100 == 0 {
            log::info!("Predicted {}/{} images", index + 1, manifest.len());
        }
    }

    let out_path = args.output.join(format!("{clothes}_predictions.json"));
    Manifest::new(predictions, &args.output).save(&out_path)?;
    log::info!("Wrote {}", out_path.display());

    match errors.mean() {
        Some(ne) => log::info!(
            "{}: mean normalized error {:.2}% over {} images ({} without reference)",
            clothes,
            ne * 100.0,
            errors.count(),
            errors.skipped()
        ),
        None => log::info!("{}: no annotated images to score", clothes),
    }
    Ok(())
}
