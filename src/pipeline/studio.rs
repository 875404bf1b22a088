use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use rand::Rng;
use rayon::prelude::*;

use crate::{
    assets::catalog::SpriteKind,
    assets::decode::PreparedImage,
    assets::source::{AssetSource, load_optional},
    assets::text::{FontBook, TextLayoutEngine},
    config::{ArchiveConfig, CaptionSet},
    effects::grain::apply_grain,
    foundation::error::ArchiveResult,
    random::{pick_one, range_count},
    render::canvas::{Canvas, FrameRGBA},
    render::caption::draw_caption,
    render::decor::{draw_bed, draw_flowers, draw_tree},
    render::frame::draw_frame,
    render::photo::draw_photo,
    render::stamp::{draw_date, draw_stamp},
};

/// Where the studio is in its current (or last) pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    LoadingAssets,
    Compositing,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// No photo was set; nothing changed.
    Skipped,
    Rendered,
    /// A drawing step failed; export stays disabled.
    Failed,
    /// A newer pass was planned before this one finished; its result was dropped.
    Superseded,
}

/// Random choices made up front for one pass, before any sprite is loaded.
#[derive(Clone, Debug)]
pub struct PassPlan {
    token: u64,
    pub photo: Arc<PreparedImage>,
    pub tree: Option<String>,
    pub flowers: Vec<String>,
    pub bed: Option<String>,
    pub caption: Vec<String>,
}

impl PassPlan {
    pub fn token(&self) -> u64 {
        self.token
    }
}

/// A [`PassPlan`] with its sprites loaded; absent entries failed to load.
#[derive(Clone, Debug)]
pub struct LoadedPass {
    token: u64,
    pub photo: Arc<PreparedImage>,
    pub tree: Option<PreparedImage>,
    pub flowers: Vec<Option<PreparedImage>>,
    pub bed: Option<PreparedImage>,
    pub caption: Vec<String>,
}

impl LoadedPass {
    pub fn token(&self) -> u64 {
        self.token
    }
}

/// Load every sprite of `plan` in parallel.
///
/// Failures are logged and leave the corresponding slot empty.
#[tracing::instrument(skip_all, fields(token = plan.token, flowers = plan.flowers.len()))]
pub fn load_pass(plan: PassPlan, source: &dyn AssetSource) -> LoadedPass {
    let load = |kind: SpriteKind, path: Option<&str>| path.and_then(|p| load_optional(source, kind, p));

    let (tree, (bed, flowers)) = rayon::join(
        || load(SpriteKind::Tree, plan.tree.as_deref()),
        || {
            rayon::join(
                || load(SpriteKind::FlowerBed, plan.bed.as_deref()),
                || {
                    plan.flowers
                        .par_iter()
                        .map(|p| load(SpriteKind::Flower, Some(p)))
                        .collect::<Vec<_>>()
                },
            )
        },
    );

    tracing::debug!(
        tree = tree.is_some(),
        bed = bed.is_some(),
        flowers = flowers.iter().flatten().count(),
        "sprites loaded"
    );
    LoadedPass {
        token: plan.token,
        photo: plan.photo,
        tree,
        flowers,
        bed,
        caption: plan.caption,
    }
}

/// Owns the canvas and everything needed to compose postcards onto it.
pub struct Studio {
    config: ArchiveConfig,
    captions: CaptionSet,
    fonts: FontBook,
    text: TextLayoutEngine,
    source: Arc<dyn AssetSource>,
    photo: Option<Arc<PreparedImage>>,
    canvas: Canvas,
    date: Option<NaiveDate>,
    state: GenerationState,
    busy: bool,
    export_enabled: bool,
    next_token: u64,
    pending: Option<u64>,
}

impl Studio {
    pub fn new(
        config: ArchiveConfig,
        captions: CaptionSet,
        source: Arc<dyn AssetSource>,
    ) -> ArchiveResult<Self> {
        config.style.validate()?;
        let canvas = Canvas::new(config.style.canvas_size()?)?;
        Ok(Self {
            config,
            captions,
            fonts: FontBook::default(),
            text: TextLayoutEngine::new(),
            source,
            photo: None,
            canvas,
            date: None,
            state: GenerationState::Idle,
            busy: false,
            export_enabled: false,
            next_token: 0,
            pending: None,
        })
    }

    /// Register the configured fonts, resolving their paths under `root`.
    pub fn load_fonts(&mut self, root: &Path) {
        self.fonts = FontBook::load(&mut self.text, &self.config.style.fonts, root);
    }

    /// Pin the stamped date instead of reading the local clock.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Replace the source photo; it stays set across passes.
    pub fn set_photo(&mut self, photo: PreparedImage) {
        tracing::debug!(w = photo.width, h = photo.height, "photo set");
        self.photo = Some(Arc::new(photo));
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn export_enabled(&self) -> bool {
        self.export_enabled
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The finished postcard, if the last pass rendered successfully.
    pub fn frame(&self) -> Option<FrameRGBA> {
        self.export_enabled.then(|| self.canvas.to_frame())
    }

    /// Plan, load and composite one pass.
    #[tracing::instrument(skip_all)]
    pub fn generate<R>(&mut self, rng: &mut R) -> GenerationOutcome
    where
        R: Rng + ?Sized,
    {
        let Some(plan) = self.plan_pass(rng) else {
            return GenerationOutcome::Skipped;
        };
        let loaded = load_pass(plan, self.source.as_ref());
        self.finish_pass(loaded, rng)
    }

    /// Start a pass: make every up-front random choice and issue a fresh token.
    ///
    /// Returns `None` without touching any state when no photo is set. The studio stays busy
    /// until the plan is passed to [`Studio::finish_pass`] or given up with
    /// [`Studio::cancel_pass`].
    pub fn plan_pass<R>(&mut self, rng: &mut R) -> Option<PassPlan>
    where
        R: Rng + ?Sized,
    {
        let Some(photo) = self.photo.clone() else {
            tracing::debug!("no photo set, generation skipped");
            return None;
        };

        self.busy = true;
        self.export_enabled = false;
        self.state = GenerationState::LoadingAssets;
        let token = self.next_token;
        self.next_token += 1;
        self.pending = Some(token);

        let catalog = &self.config.assets;
        let flowers_style = &self.config.style.decor.flowers;
        let count = range_count(rng, flowers_style.count_min, flowers_style.count_max);
        let flowers = (0..count)
            .filter_map(|_| pick_sprite(rng, catalog.candidates(SpriteKind::Flower), SpriteKind::Flower))
            .collect();
        let tree = pick_sprite(rng, catalog.candidates(SpriteKind::Tree), SpriteKind::Tree);
        let bed = pick_sprite(rng, catalog.candidates(SpriteKind::FlowerBed), SpriteKind::FlowerBed);
        let caption = match self.captions.pick(rng) {
            Ok(group) => group.to_vec(),
            Err(err) => {
                tracing::warn!(error = %err, "no caption group available");
                Vec::new()
            }
        };

        tracing::debug!(token, flowers = count, "pass planned");
        Some(PassPlan {
            token,
            photo,
            tree,
            flowers,
            bed,
            caption,
        })
    }

    /// Composite a loaded pass onto the canvas, unless a newer pass has been planned since.
    #[tracing::instrument(skip_all, fields(token = loaded.token))]
    pub fn finish_pass<R>(&mut self, loaded: LoadedPass, rng: &mut R) -> GenerationOutcome
    where
        R: Rng + ?Sized,
    {
        if self.pending != Some(loaded.token) {
            tracing::debug!(pending = ?self.pending, "stale pass discarded");
            if self.pending.is_none() && self.busy {
                self.busy = false;
                self.state = GenerationState::Idle;
            }
            return GenerationOutcome::Superseded;
        }
        self.pending = None;
        self.state = GenerationState::Compositing;

        let outcome = match self.composite(&loaded, rng) {
            Ok(()) => {
                self.export_enabled = true;
                tracing::info!("postcard rendered");
                GenerationOutcome::Rendered
            }
            Err(err) => {
                tracing::error!(error = %err, "postcard generation failed");
                GenerationOutcome::Failed
            }
        };
        self.busy = false;
        self.state = GenerationState::Done;
        outcome
    }

    /// Give up on a planned pass that will never be finished.
    ///
    /// Only the pending pass is affected; cancelling a stale token does nothing. Export stays
    /// disabled until the next pass renders.
    pub fn cancel_pass(&mut self, token: u64) {
        if self.pending != Some(token) {
            return;
        }
        tracing::debug!(token, "pass cancelled");
        self.pending = None;
        self.busy = false;
        self.state = GenerationState::Idle;
    }

    fn composite<R>(&mut self, loaded: &LoadedPass, rng: &mut R) -> ArchiveResult<()>
    where
        R: Rng + ?Sized,
    {
        let style = &self.config.style;
        self.canvas.reset(style.canvas_size()?)?;

        draw_frame(&mut self.canvas, style)?;
        let target = style.photo_rect();
        draw_photo(&mut self.canvas, &loaded.photo, target, &style.photo)?;

        if let Some(tree) = &loaded.tree {
            draw_tree(&mut self.canvas, tree, &style.decor.tree)?;
        }
        draw_flowers(&mut self.canvas, &loaded.flowers, target, &style.decor.flowers, rng)?;

        draw_caption(
            &mut self.canvas,
            &mut self.text,
            &self.fonts,
            style,
            &loaded.caption,
            rng,
        )?;

        let date = self
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        draw_date(&mut self.canvas, &mut self.text, &self.fonts, style, date)?;
        draw_stamp(&mut self.canvas, &mut self.text, &self.fonts, style, rng)?;

        if let Some(bed) = &loaded.bed {
            draw_bed(&mut self.canvas, bed, &style.decor.bed)?;
        }

        apply_grain(self.canvas.data_mut(), style.grain.amount, rng)
    }
}

fn pick_sprite<R>(rng: &mut R, candidates: &[String], kind: SpriteKind) -> Option<String>
where
    R: Rng + ?Sized,
{
    match pick_one(rng, candidates, kind.label()) {
        Ok(path) => Some(path.clone()),
        Err(err) => {
            tracing::debug!(error = %err, "no sprite candidates");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/studio.rs"]
mod tests;
