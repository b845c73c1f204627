//! Train a keypoint model for one clothing category.
//!
//! ```text
//! kpda-train --clothes blouse --train-manifest train.json --val-manifest val.json \
//!     --save-dir checkpoints [--config experiment.json] \
//!     [--resume checkpoints/kpt_blouse_020.ckpt | --resume-latest]
//! ```

use std::path::PathBuf;

use anyhow::Context;
use burn::config::Config;
use clap::Parser;

use kpda_net::backend::{self, TrainingBackend};
use kpda_net::data::{Manifest, ManifestDataset};
use kpda_net::training::{load_training_checkpoint, Trainer};
use kpda_net::{BaselineNet, ClothingType, ExperimentConfig, KpdaConfig, KpdaNetError};

#[derive(Parser, Debug)]
#[command(name = "kpda-train", about = "Train a clothing keypoint model")]
struct Args {
    /// Clothing category to train.
    #[arg(long)]
    clothes: ClothingType,

    /// Checkpoint to continue training from.
    #[arg(short, long, value_name = "CHECKPOINT", conflicts_with = "resume_latest")]
    resume: Option<PathBuf>,

    /// Continue from the highest-epoch checkpoint in the save directory.
    #[arg(long)]
    resume_latest: bool,

    /// Training manifest (JSON).
    #[arg(long)]
    train_manifest: PathBuf,

    /// Validation manifest (JSON).
    #[arg(long)]
    val_manifest: PathBuf,

    /// Experiment configuration (JSON); defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for checkpoints and the training log.
    #[arg(long, default_value = "checkpoints")]
    save_dir: PathBuf,

    /// GPU index (requires the `wgpu` feature).
    #[arg(long)]
    gpu: Option<usize>,
}

impl Args {
    /// Checkpoint selected by `--resume` or `--resume-latest`.
    fn resume_checkpoint(&self) -> anyhow::Result<Option<PathBuf>> {
        if let Some(path) = &self.resume {
            return Ok(Some(path.clone()));
        }
        if !self.resume_latest {
            return Ok(None);
        }
        let latest = kpda_io::find_latest_checkpoint(&self.save_dir, self.clothes.as_str())
            .with_context(|| format!("listing {}", self.save_dir.display()))?;
        if latest.is_none() {
            log::warn!(
                "No {} checkpoint in {}; starting a fresh run",
                self.clothes,
                self.save_dir.display()
            );
        }
        Ok(latest)
    }
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
    let mut model = BaselineNet::<TrainingBackend>::new(
        &config.network,
        config.kpda.num_keypoints(),
        &device,
    );

    let mut resume = None;
    if let Some(path) = args.resume_checkpoint()? {
        let (loaded, state) = load_training_checkpoint(model, &path, clothes, &device)
            .with_context(|| format!("resuming from {}", path.display()))?;
        model = loaded;
        resume = Some(state);
    }

    let train_manifest = Manifest::load(&args.train_manifest)
        .with_context(|| format!("loading {}", args.train_manifest.display()))?;
    let val_manifest = Manifest::load(&args.val_manifest)
        .with_context(|| format!("loading {}", args.val_manifest.display()))?;
    log::info!(
        "{}: {} training and {} validation samples",
        clothes,
        train_manifest.len(),
        val_manifest.len()
    );
    let mut train = ManifestDataset::train(train_manifest, &config.kpda, &config.training)?;
    let mut valid = ManifestDataset::validation(val_manifest, &config.kpda, &config.training)?;

    std::fs::create_dir_all(&args.save_dir)
        .with_context(|| format!("creating {}", args.save_dir.display()))?;
    config
        .save(args.save_dir.join(format!("kpt_{clothes}_config.json")))
        .context("writing the run configuration")?;

    let trainer = Trainer::with_default_loss(config.training.clone(), clothes, &args.save_dir);
    let report = trainer.fit::<TrainingBackend, _, _, _>(
        model,
        &mut train,
        &mut valid,
        resume,
        &device,
    )?;

    log::info!(
        "Finished at epoch {} with best validation loss {:.4}{}",
        report.last_epoch,
        report.best_loss,
        if report.early_stopped { " (early stop)" } else { "" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 7] = [
        "kpda-train",
        "--clothes",
        "skirt",
        "--train-manifest",
        "train.json",
        "--val-manifest",
        "val.json",
    ];

    fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(REQUIRED.iter().chain(extra))
    }

    #[test]
    fn test_resume_takes_a_checkpoint_path() {
        let args = parse(&["--resume", "runs/kpt_skirt_004.ckpt"]).unwrap();
        assert_eq!(args.resume, Some(PathBuf::from("runs/kpt_skirt_004.ckpt")));
        assert_eq!(
            args.resume_checkpoint().unwrap(),
            Some(PathBuf::from("runs/kpt_skirt_004.ckpt"))
        );

        let args = parse(&["-r", "best.ckpt"]).unwrap();
        assert_eq!(args.resume, Some(PathBuf::from("best.ckpt")));
    }

    #[test]
    fn test_explicit_checkpoint_wins_over_later_epochs() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        for epoch in [4, 10] {
            let path = kpda_io::checkpoint_path(temp_dir.path(), "skirt", epoch);
            std::fs::write(path, b"").unwrap();
        }
        let save_dir = temp_dir.path().to_str().unwrap();
        let chosen = kpda_io::checkpoint_path(temp_dir.path(), "skirt", 4);

        let args = parse(&["--save-dir", save_dir, "--resume", chosen.to_str().unwrap()]).unwrap();
        assert_eq!(args.resume_checkpoint().unwrap(), Some(chosen));

        let args = parse(&["--save-dir", save_dir, "--resume-latest"]).unwrap();
        assert_eq!(
            args.resume_checkpoint().unwrap(),
            Some(kpda_io::checkpoint_path(temp_dir.path(), "skirt", 10))
        );
    }

    #[test]
    fn test_resume_flags() {
        assert!(parse(&[]).unwrap().resume_checkpoint().unwrap().is_none());
        assert!(parse(&["--resume"]).is_err());
        assert!(parse(&["--resume", "a.ckpt", "--resume-latest"]).is_err());
    }
}
