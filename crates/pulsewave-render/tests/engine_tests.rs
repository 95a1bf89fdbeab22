use proptest::prelude::*;
use pulsewave_render::{
    BandWeights, DrawCommand, EffectKind, Paint, PixmapSurface, RecordingSurface, SpectrumSource,
    StaticSpectrum, TickOutcome, VisualizerConfig, VisualizerEngine, BACKGROUND, TRAIL_FADE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;

fn create_engine(bins: Vec<u8>) -> VisualizerEngine<StaticSpectrum, RecordingSurface> {
    VisualizerEngine::with_rng(
        StaticSpectrum::new(bins),
        WIDTH,
        HEIGHT,
        StdRng::seed_from_u64(99),
    )
}

/// Bass-heavy spectrum: bins 0..8 at 200, everything else silent
fn bass_hit() -> Vec<u8> {
    let mut bins = vec![0u8; 1024];
    bins[..8].fill(200);
    bins
}

/// Source that counts how often the engine pulls from it
struct CountingSource {
    inner: StaticSpectrum,
    reads: usize,
}

impl SpectrumSource for CountingSource {
    fn bin_count(&self) -> usize {
        self.inner.bin_count()
    }

    fn read_frequency_data(&mut self, out: &mut [u8]) {
        self.reads += 1;
        self.inner.read_frequency_data(out);
    }
}

/// Source whose spectrum shifts by one bin on every read
struct DriftingSource {
    offset: usize,
}

impl SpectrumSource for DriftingSource {
    fn bin_count(&self) -> usize {
        1024
    }

    fn read_frequency_data(&mut self, out: &mut [u8]) {
        for (i, bin) in out.iter_mut().enumerate() {
            *bin = ((i + self.offset) % 200 + 40) as u8;
        }
        self.offset += 1;
    }
}

#[test]
fn test_bass_hit_end_to_end() {
    let mut engine = create_engine(bass_hit());
    let config = VisualizerConfig::default();
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);

    assert_eq!(
        engine.tick(0.0, &config, Some(&mut surface)),
        TickOutcome::Rendered
    );

    let beat = engine.beat_state();
    assert!((beat.current_intensity - 400.0).abs() < 1e-3);
    assert_eq!(beat.color_phase_offset, 60.0);

    let bands = engine.band_energies();
    assert!((bands.bass - 200.0 / 255.0).abs() < 1e-4);
    assert_eq!(bands.mid, 0.0);
    assert_eq!(bands.high, 0.0);

    // Holding the same input does not re-trigger the phase
    engine.tick(20.0, &config, Some(&mut surface));
    assert_eq!(engine.beat_state().color_phase_offset, 60.0);
}

#[test]
fn test_skipped_ticks_do_not_pull_the_stream() {
    let source = CountingSource {
        inner: StaticSpectrum::uniform(1024, 10),
        reads: 0,
    };
    let mut engine: VisualizerEngine<_, RecordingSurface> =
        VisualizerEngine::with_rng(source, WIDTH, HEIGHT, StdRng::seed_from_u64(1));
    let config = VisualizerConfig::default();
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);

    // 240 Hz host over 100 ms
    let outcomes: Vec<_> = (0..24)
        .map(|i| engine.tick(i as f64 * 4.2, &config, Some(&mut surface)))
        .collect();
    let rendered = outcomes
        .iter()
        .filter(|o| **o == TickOutcome::Rendered)
        .count();

    assert_eq!(engine.source_mut().reads, rendered);
    assert!(rendered < outcomes.len());
    assert_eq!(engine.scheduler().stats().rendered as usize, rendered);
}

#[test]
fn test_trail_fade_on_every_rendered_tick() {
    let mut engine = create_engine(vec![90; 1024]);
    let mut config = VisualizerConfig::default();
    config.select_effect(EffectKind::FrequencyBased);
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);

    for frame in 0..5 {
        engine.tick(frame as f64 * 20.0, &config, Some(&mut surface));
        let commands = surface.take_commands();
        let fade_at = if frame == 0 {
            assert_eq!(commands[0].solid_color(), Some(BACKGROUND));
            1
        } else {
            0
        };
        let DrawCommand::FillRect { rect, paint } = &commands[fade_at] else {
            panic!("frame {} did not start with a fade", frame);
        };
        assert_eq!(rect.size.x, WIDTH);
        assert_eq!(*paint, Paint::Solid(TRAIL_FADE));
    }
}

#[test]
fn test_zero_weights_silence_every_band() {
    let mut engine = create_engine(vec![255; 1024]);
    let mut config = VisualizerConfig::default();
    config.weights = BandWeights::new(0.0, 0.0, 0.0);
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);

    engine.tick(0.0, &config, Some(&mut surface));
    let bands = engine.band_energies();
    assert_eq!((bands.bass, bands.mid, bands.high), (0.0, 0.0, 0.0));
    assert_eq!(engine.beat_state().current_intensity, 0.0);
}

#[test]
fn test_cache_stays_bounded_and_sweeps() {
    let source = DriftingSource { offset: 0 };
    let mut engine: VisualizerEngine<_, RecordingSurface> =
        VisualizerEngine::with_rng(source, WIDTH, HEIGHT, StdRng::seed_from_u64(3));
    let mut config = VisualizerConfig::default();
    config.select_effect(EffectKind::FrequencyWaterfall);
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);

    let mut timestamp = 0.0;
    for _ in 0..400 {
        engine.tick(timestamp, &config, Some(&mut surface));
        surface.take_commands();
        assert!(engine.cache().len() <= 100);
        timestamp += 17.0;
    }
    assert!(engine.scheduler().stats().sweeps >= 1);
    assert!(engine.cache().stats().evictions > 0);
}

#[test]
fn test_resize_resets_particles_and_cache() {
    let mut engine = create_engine(vec![150; 1024]);
    let mut config = VisualizerConfig::default();
    config.select_effect(EffectKind::AmbientFlow);
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    engine.tick(0.0, &config, Some(&mut surface));
    assert!(!engine.cache().is_empty());

    surface.resize(400.0, 300.0);
    engine.reset(400.0, 300.0);
    assert!(engine.cache().is_empty());

    for i in 1..50 {
        engine.tick(i as f64 * 20.0, &config, Some(&mut surface));
    }
    for particle in engine.particles().particles() {
        assert!((0.0..400.0).contains(&particle.position.x));
        assert!((0.0..300.0).contains(&particle.position.y));
    }
}

#[test]
fn test_switching_effects_keeps_phase() {
    let mut engine = create_engine(bass_hit());
    let mut config = VisualizerConfig::default();
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);

    engine.tick(0.0, &config, Some(&mut surface));
    let phase = engine.beat_state().color_phase_offset;

    config.select_effect(EffectKind::SmoothWaves);
    engine.tick(20.0, &config, Some(&mut surface));
    assert_eq!(engine.beat_state().color_phase_offset, phase);
}

#[test]
fn test_clock_restart_refreshes_bands() {
    let mut engine = create_engine(vec![255; 1024]);
    let mut config = VisualizerConfig::default();
    config.select_effect(EffectKind::FrequencyBased);
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);

    engine.tick(50_000.0, &config, Some(&mut surface));
    assert!(engine.band_energies().bass > 0.9);

    engine.source_mut().set_bins(vec![0; 1024]);
    assert_eq!(
        engine.tick(10.0, &config, Some(&mut surface)),
        TickOutcome::Rendered
    );
    assert_eq!(engine.band_energies().bass, 0.0);

    // Reacts again within one analysis interval on the new clock
    engine.source_mut().set_bins(vec![255; 1024]);
    engine.tick(30.0, &config, Some(&mut surface));
    engine.tick(50.0, &config, Some(&mut surface));
    assert!(engine.band_energies().bass > 0.9);
}

#[test]
fn test_clock_restart_lets_old_entries_expire() {
    let mut engine = create_engine(vec![255; 1024]);
    let mut config = VisualizerConfig::default();
    config.select_effect(EffectKind::FrequencyBased);
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);

    engine.tick(50_000.0, &config, Some(&mut surface));
    assert!(!engine.cache().is_empty());

    // Silence draws nothing, so nothing touches the old entries again
    engine.source_mut().set_bins(vec![0; 1024]);
    let mut timestamp = 10.0;
    while timestamp <= 10_510.0 {
        engine.tick(timestamp, &config, Some(&mut surface));
        surface.take_commands();
        timestamp += 20.0;
    }
    assert!(engine.cache().is_empty());
    assert!(engine.cache().stats().expired > 0);
}

#[test]
fn test_non_finite_timestamp_keeps_pacing() {
    let mut engine = create_engine(vec![120; 1024]);
    let config = VisualizerConfig::default();
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);

    engine.tick(100.0, &config, Some(&mut surface));
    assert_eq!(
        engine.tick(f64::NAN, &config, Some(&mut surface)),
        TickOutcome::Skipped
    );
    assert_eq!(
        engine.tick(105.0, &config, Some(&mut surface)),
        TickOutcome::Skipped
    );
    assert_eq!(
        engine.tick(120.0, &config, Some(&mut surface)),
        TickOutcome::Rendered
    );
}

#[test]
fn test_effect_names_parse() {
    let kind: EffectKind = "frequencyBased".parse().unwrap();
    assert_eq!(kind, EffectKind::FrequencyBased);
    assert!("sparkles".parse::<EffectKind>().is_err());
}

#[test]
fn test_every_effect_rasterizes() {
    for kind in EffectKind::ALL {
        let mut engine: VisualizerEngine<StaticSpectrum, PixmapSurface> =
            VisualizerEngine::with_rng(
                StaticSpectrum::uniform(1024, 220),
                320.0,
                240.0,
                StdRng::seed_from_u64(5),
            );
        let mut config = VisualizerConfig::default();
        config.select_effect(kind);
        let mut surface = PixmapSurface::new(320, 240).unwrap();

        for i in 0..10 {
            engine.tick(i as f64 * 20.0, &config, Some(&mut surface));
        }

        let lit = surface
            .pixmap()
            .pixels()
            .iter()
            .filter(|p| p.red() > 40 || p.green() > 40 || p.blue() > 40)
            .count();
        assert!(lit > 0, "{} left the pixmap dark", kind);
    }
}

proptest! {
    #[test]
    fn prop_any_spectrum_renders_without_panicking(
        bins in proptest::collection::vec(any::<u8>(), 0..1100),
        effect in 0usize..6,
        bass in 0.0f32..=1.0,
        sensitivity in 0.0f32..=1.0,
    ) {
        let mut engine = create_engine(bins);
        let mut config = VisualizerConfig::default();
        config.select_effect(EffectKind::ALL[effect]);
        config.set_bass(bass);
        config.set_sensitivity(sensitivity);
        let mut surface = RecordingSurface::new(WIDTH, HEIGHT);

        for i in 0..3 {
            let outcome = engine.tick(i as f64 * 20.0, &config, Some(&mut surface));
            prop_assert_eq!(outcome, TickOutcome::Rendered);
        }
        prop_assert!((1.0..=5.0).contains(&engine.sensitivity()));
        prop_assert!(engine.cache().len() <= 100);
    }
}
