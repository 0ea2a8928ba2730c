//! mask-refine CLI
//!
//! Refines a coarse label image against its source image and writes the
//! result as a grayscale PNG.
//!
//! # Usage
//!
//! ```bash
//! mask-refine --image photo.png --labels coarse.png --output refined.png
//! mask-refine --image photo.png --labels coarse.png --output refined.png --iterations 5 --gt-prob 0.8
//! ```

use clap::Parser;
use mask_refine::core::BoxError;
use mask_refine::utils::{MaskEncoding, labels_from_gray, labels_to_gray};
use mask_refine::{LabelGrid, MaskRefiner, ParallelPolicy, RefineConfig};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "mask-refine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Refine a coarse segmentation mask with a dense CRF", long_about = None)]
struct Cli {
    /// Source image
    #[arg(long)]
    image: PathBuf,

    /// Coarse label image (0 = background; any other gray level is
    /// foreground, or its own label with --raw)
    #[arg(long)]
    labels: PathBuf,

    /// Where to write the refined mask
    #[arg(long)]
    output: PathBuf,

    /// Return the coarse labels without refinement
    #[arg(long)]
    no_crf: bool,

    /// Number of mean-field iterations
    #[arg(long, default_value_t = 3)]
    iterations: usize,

    /// Confidence assigned to the coarse labels, in (0, 1)
    #[arg(long, default_value_t = 0.7)]
    gt_prob: f32,

    /// Read and write gray levels as label values instead of 0/255 masks
    #[arg(long)]
    raw: bool,

    /// Maximum number of worker threads
    #[arg(long, env = "MASK_REFINE_THREADS")]
    threads: Option<usize>,
}

impl Cli {
    fn encoding(&self) -> MaskEncoding {
        if self.raw {
            MaskEncoding::Raw
        } else {
            MaskEncoding::Binary
        }
    }
}

fn read_labels(path: &Path, encoding: MaskEncoding) -> Result<LabelGrid, BoxError> {
    Ok(labels_from_gray(&image::open(path)?.to_luma8(), encoding))
}

fn write_labels(labels: &LabelGrid, path: &Path, encoding: MaskEncoding) -> Result<(), BoxError> {
    labels_to_gray(labels, encoding)?.save(path)?;
    Ok(())
}

fn main() -> Result<(), BoxError> {
    mask_refine::utils::init_tracing();

    let cli = Cli::parse();

    let policy = ParallelPolicy::new().with_max_threads(cli.threads);
    if policy.install_global_thread_pool()? {
        info!("Using {} worker threads", cli.threads.unwrap_or_default());
    }

    let config = RefineConfig::new()
        .with_crf(!cli.no_crf)
        .with_num_iter(cli.iterations)
        .with_gt_prob(cli.gt_prob);
    let refiner = MaskRefiner::new(config)?;

    let image = image::open(&cli.image)?;
    let coarse = read_labels(&cli.labels, cli.encoding())?;
    info!(
        "Loaded {} ({}x{}) and {}",
        cli.image.display(),
        image.width(),
        image.height(),
        cli.labels.display()
    );

    let start = Instant::now();
    let refined = refiner.refine(&image, coarse.view())?;
    info!("Refinement finished in {:?}", start.elapsed());

    write_labels(&refined, &cli.output, cli.encoding())?;
    info!("Wrote {}", cli.output.display());

    Ok(())
}
