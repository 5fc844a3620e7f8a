//! Editing session around a working image.
//!
//! A [`GlitchSession`] owns the image being glitched together with an undo
//! buffer and an optional snapshot. Every mutating operation first copies
//! the image into the undo buffer, so one step can always be reverted.
//! Engines that cache per-size state are built lazily and rebuilt when the
//! image or the configuration no longer matches them.

use glitch_engine::effects::{self, ShiftDirection};
use glitch_engine::{
    BandAnalysis, OctreeQuantizer, PixelBuffer, Quantized, RowScheduler, RowStepReport,
    SortEngine, SpectralBandEngine, SpectralError, SpectralReport, ZigzagReport, ZigzagSorter,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use crate::error::SessionError;
use crate::models::GlitchConfig;

pub struct GlitchSession {
    image: PixelBuffer,
    backup: Option<PixelBuffer>,
    snapshot: Option<PixelBuffer>,
    config: GlitchConfig,
    rng: StdRng,
    spectral: Option<SpectralBandEngine>,
    rows: Option<RowScheduler>,
}

impl GlitchSession {
    /// Start a session on `image`.
    ///
    /// The random source is seeded from `config.seed` when set, otherwise
    /// from system entropy.
    pub fn new(image: PixelBuffer, config: GlitchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(
            width = image.width(),
            height = image.height(),
            seed = ?config.seed,
            "Started glitch session"
        );
        Self {
            image,
            backup: None,
            snapshot: None,
            config,
            rng,
            spectral: None,
            rows: None,
        }
    }

    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    pub fn into_image(self) -> PixelBuffer {
        self.image
    }

    pub fn backup(&self) -> Option<&PixelBuffer> {
        self.backup.as_ref()
    }

    pub fn snapshot(&self) -> Option<&PixelBuffer> {
        self.snapshot.as_ref()
    }

    pub fn config(&self) -> &GlitchConfig {
        &self.config
    }

    /// Mutable access to the presets. Engines pick up changes on their
    /// next use.
    pub fn config_mut(&mut self) -> &mut GlitchConfig {
        &mut self.config
    }

    pub fn set_backup(&mut self, backup: PixelBuffer) {
        self.backup = Some(backup);
    }

    pub fn set_snapshot(&mut self, snapshot: PixelBuffer) {
        self.snapshot = Some(snapshot);
    }

    /// Remember the current image as the snapshot used by [`munge`](Self::munge).
    pub fn take_snapshot(&mut self) {
        self.snapshot = Some(self.image.clone());
        debug!("Snapshot taken");
    }

    /// Swap the image with the undo buffer. Undoing twice redoes.
    pub fn undo(&mut self) -> Result<(), SessionError> {
        let backup = self.backup.as_mut().ok_or(SessionError::NothingToUndo)?;
        std::mem::swap(&mut self.image, backup);
        if self.rows.as_ref().is_some_and(|r| r.height() != self.image.height()) {
            self.rows = None;
        }
        debug!("Undo");
        Ok(())
    }

    fn checkpoint(&mut self) {
        self.backup = Some(self.image.clone());
    }

    fn sort_engine(&self) -> SortEngine {
        SortEngine::new(self.config.sort.to_sort_config())
    }

    /// Run `passes` row sort passes (at least one).
    pub fn sort(&mut self, passes: usize) -> RowStepReport {
        self.checkpoint();
        let engine = self.sort_engine();
        let sort = &self.config.sort;
        let scheduler = row_scheduler(
            &mut self.rows,
            self.image.height(),
            sort.glitch_steps,
            sort.cycle,
            &mut self.rng,
        );

        let mut total = RowStepReport::default();
        for _ in 0..passes.max(1) {
            let step = scheduler.step(&mut self.image, &engine, &mut self.rng);
            total.rows_sorted += step.rows_sorted;
            total.new_cycle |= step.new_cycle;
            total.stats += step.stats;
        }
        info!(
            rows = total.rows_sorted,
            algorithm = %engine.config().algorithm,
            breaks = total.stats.breaks,
            "Sorted rows"
        );
        total
    }

    /// Sort zigzag blocks of edge `edge`, or of a random edge from the
    /// configured range.
    pub fn zigzag(&mut self, edge: Option<u32>) -> ZigzagReport {
        self.checkpoint();
        let engine = self.sort_engine();
        let sorter = ZigzagSorter::new(self.config.zigzag.to_options());
        let report = match edge {
            Some(edge) => sorter.sort_blocks(&mut self.image, edge, &engine, &mut self.rng),
            None => sorter.sort_random(&mut self.image, &engine, &mut self.rng),
        };
        info!(
            edge = report.edge,
            sorted = report.blocks_sorted,
            skipped = report.blocks_skipped,
            "Zigzag sorted"
        );
        report
    }

    /// Equalizer FFT glitch. `levels` override the configured equalizer
    /// levels; missing bands stay at unity gain.
    pub fn equalize(&mut self, levels: Option<&[f32]>) -> Result<SpectralReport, SessionError> {
        let fft = &self.config.fft;
        let engine = spectral_engine(&mut self.spectral, fft.block_size)?;
        let gains = fft.gains(levels.unwrap_or(&fft.eq_levels), engine.band_count());
        let channels = fft.channels.clone();

        self.backup = Some(self.image.clone());
        let report = engine.equalize_image(&mut self.image, &channels, &gains)?;
        info!(blocks = report.blocks, channels = report.channels, "Equalized image");
        Ok(report)
    }

    /// Statistical FFT glitch with the configured bounds.
    pub fn statistical(&mut self) -> Result<SpectralReport, SessionError> {
        let fft = &self.config.fft;
        let engine = spectral_engine(&mut self.spectral, fft.block_size)?;
        let params = fft.stat_params();
        let channels = fft.channels.clone();

        self.backup = Some(self.image.clone());
        let report = engine.statistical_image(&mut self.image, &channels, &params)?;
        info!(blocks = report.blocks, channels = report.channels, "Statistical glitch applied");
        Ok(report)
    }

    /// Per-band brightness amplitudes of the current image. Leaves the
    /// image untouched.
    pub fn analyze(&mut self) -> Result<BandAnalysis, SessionError> {
        let engine = spectral_engine(&mut self.spectral, self.config.fft.block_size)?;
        Ok(engine.analyze_bands(&self.image)?)
    }

    /// Reduce the image to the configured palette size. The returned
    /// palette and indices describe the new image.
    pub fn quantize(&mut self) -> Quantized {
        self.checkpoint();
        let quantized = OctreeQuantizer::new(self.config.quantize.colors).quantize(&self.image);
        info!(colors = quantized.colormap.len(), "Quantized image");
        self.image = quantized.buffer.clone();
        quantized
    }

    pub fn denoise(&mut self) {
        self.checkpoint();
        effects::denoise(&mut self.image);
    }

    /// Rotate the configured channel one pixel in `direction`.
    pub fn shift(&mut self, direction: ShiftDirection) {
        self.checkpoint();
        effects::shift_channel(&mut self.image, self.config.shift.channel, direction);
    }

    /// Replace pixels that changed since the undo buffer with snapshot
    /// pixels. The undo buffer is kept, so munge can be repeated with other
    /// thresholds.
    pub fn munge(&mut self) -> Result<usize, SessionError> {
        let backup = self.backup.as_ref().ok_or(SessionError::MissingBackup)?;
        let snapshot = self.snapshot.as_ref().ok_or(SessionError::MissingSnapshot)?;
        let replaced = effects::munge(
            &mut self.image,
            backup,
            snapshot,
            self.config.munge.to_options(),
        )?;
        info!(replaced, "Munged image");
        Ok(replaced)
    }

    /// Quarter-turn the image and the undo buffer. The snapshot keeps its
    /// orientation.
    pub fn rotate(&mut self, clockwise: bool) {
        let turn = if clockwise {
            effects::rotate_right
        } else {
            effects::rotate_left
        };
        self.image = turn(&self.image);
        if let Some(backup) = self.backup.as_mut() {
            *backup = turn(backup);
        }
        self.rows = None;
        debug!(clockwise, "Rotated image");
    }
}

fn spectral_engine(
    slot: &mut Option<SpectralBandEngine>,
    edge: u32,
) -> Result<&mut SpectralBandEngine, SpectralError> {
    let engine = match slot.take() {
        Some(engine) if engine.edge() == edge => engine,
        _ => {
            debug!(edge, "Building spectral engine");
            SpectralBandEngine::new(edge)?
        }
    };
    Ok(slot.insert(engine))
}

fn row_scheduler<'a>(
    slot: &'a mut Option<RowScheduler>,
    height: u32,
    steps: usize,
    cycle: bool,
    rng: &mut dyn RngCore,
) -> &'a mut RowScheduler {
    let scheduler = match slot.take() {
        Some(mut scheduler) if scheduler.height() == height && scheduler.steps() == steps.max(1) => {
            scheduler.set_cycle(cycle);
            scheduler
        }
        _ => {
            debug!(height, steps, cycle, "Building row scheduler");
            RowScheduler::new(height, steps, cycle, rng)
        }
    };
    slot.insert(scheduler)
}
