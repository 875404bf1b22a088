use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

use mars_archive::{
    ArchiveConfig, CaptionSet, DirAssetSource, GenerationOutcome, Studio, decode_image, save_png,
};

#[derive(Parser, Debug)]
#[command(name = "mars-archive", version)]
struct Cli {
    /// Photo to frame.
    #[arg(long)]
    photo: PathBuf,

    /// Root directory for sprites and fonts.
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Style and catalog overrides (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Caption groups (JSON); the built-in set is used if missing or invalid.
    #[arg(long)]
    captions: Option<PathBuf>,

    /// Directory the PNGs are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Seed for reproducible layouts.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of postcards to render from the same photo.
    #[arg(long, default_value_t = 1)]
    count: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ArchiveConfig::from_path(path)?,
        None => ArchiveConfig::default(),
    };
    let captions = match &cli.captions {
        Some(path) => CaptionSet::load_or_default(path),
        None => CaptionSet::fallback(),
    };

    let bytes = std::fs::read(&cli.photo)
        .with_context(|| format!("read photo '{}'", cli.photo.display()))?;
    let photo = decode_image(&bytes)
        .with_context(|| format!("decode photo '{}'", cli.photo.display()))?;

    let source = Arc::new(DirAssetSource::new(cli.assets.clone()));
    let mut studio = Studio::new(config, captions, source)?;
    studio.load_fonts(&cli.assets);
    studio.set_photo(photo);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    for i in 0..cli.count {
        match studio.generate(&mut rng) {
            GenerationOutcome::Rendered => {}
            other => anyhow::bail!("postcard {i} was not rendered: {other:?}"),
        }
        let frame = studio
            .frame()
            .context("rendered postcard has no exportable frame")?;
        let path = save_png(&frame, &cli.out_dir, chrono::Local::now().naive_local())?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
