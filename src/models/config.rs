use glitch_engine::effects::MungeOptions;
use glitch_engine::{
    gain_from_level, Channel, ComponentOrder, RgbChannel, SortAlgorithm, SortConfig,
    StatGlitchParams, SwapRule, ZigzagOptions, ZigzagStyle,
};
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

/// Glitch presets loaded from a YAML file.
///
/// Every field is optional; missing values take the defaults below.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GlitchConfig {
    pub sort: SortSection,
    pub zigzag: ZigzagSection,
    pub fft: FftSection,
    pub quantize: QuantizeSection,
    pub munge: MungeSection,
    pub shift: ShiftSection,

    /// Seed for the random source. Unset means a fresh seed every run.
    pub seed: Option<u64>,
}

/// Row and block sorting settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SortSection {
    #[serde(deserialize_with = "parsed")]
    pub algorithm: SortAlgorithm,

    #[serde(deserialize_with = "parsed")]
    pub order: ComponentOrder,

    pub ascending: bool,

    pub random_break: bool,

    /// Break threshold in `[0, 1000]`; the algorithm default when absent
    pub break_point: Option<f32>,

    pub swap_channels: bool,

    #[serde(deserialize_with = "parsed")]
    pub swap: SwapRule,

    pub shell_ratio: usize,

    pub shell_divisor: usize,

    /// Number of passes needed to visit every row
    pub glitch_steps: usize,

    /// Visit rows in disjoint batches instead of random samples
    pub cycle: bool,
}

impl Default for SortSection {
    fn default() -> Self {
        Self {
            algorithm: SortAlgorithm::Quick,
            order: ComponentOrder::Rgb,
            ascending: true,
            random_break: true,
            break_point: None,
            swap_channels: false,
            swap: SwapRule::Bb,
            shell_ratio: 3,
            shell_divisor: 9,
            glitch_steps: 1,
            cycle: false,
        }
    }
}

impl SortSection {
    pub fn to_sort_config(&self) -> SortConfig {
        let mut config = SortConfig::new()
            .algorithm(self.algorithm)
            .order(self.order)
            .ascending(self.ascending)
            .random_break(self.random_break)
            .swap(self.swap)
            .swap_channels(self.swap_channels)
            .shell(self.shell_ratio, self.shell_divisor);
        if let Some(break_point) = self.break_point {
            config = config.break_point(break_point);
        }
        config
    }
}

/// Zigzag block sort settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ZigzagSection {
    /// Smallest random block edge
    pub floor: u32,

    /// Largest random block edge
    pub ceiling: u32,

    #[serde(deserialize_with = "parsed")]
    pub style: ZigzagStyle,

    /// Share of blocks to sort, in percent
    pub percent: f32,
}

impl Default for ZigzagSection {
    fn default() -> Self {
        Self {
            floor: 8,
            ceiling: 64,
            style: ZigzagStyle::Random,
            percent: 100.0,
        }
    }
}

impl ZigzagSection {
    pub fn to_options(&self) -> ZigzagOptions {
        ZigzagOptions::new()
            .style(self.style)
            .percent(self.percent)
            .edge_range(self.floor, self.ceiling)
    }
}

/// Spectral glitch settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FftSection {
    /// Edge of the square FFT blocks, a power of two
    pub block_size: u32,

    /// Channels to process, in any order
    #[serde(deserialize_with = "parsed_seq")]
    pub channels: Vec<Channel>,

    pub left_bound: f32,

    pub right_bound: f32,

    pub boost: f32,

    pub cut: f32,

    pub low_frequency_cut: bool,

    /// Gain added at equalizer level 1
    pub eq_scale: f32,

    /// Equalizer levels in `[-1, 1]`, one per band from low to high
    pub eq_levels: Vec<f32>,
}

impl Default for FftSection {
    fn default() -> Self {
        let params = StatGlitchParams::default();
        Self {
            block_size: 64,
            channels: vec![Channel::Lightness],
            left_bound: params.left_bound,
            right_bound: params.right_bound,
            boost: params.boost,
            cut: params.cut,
            low_frequency_cut: params.low_frequency_cut,
            eq_scale: 1.0,
            eq_levels: Vec::new(),
        }
    }
}

impl FftSection {
    pub fn stat_params(&self) -> StatGlitchParams {
        StatGlitchParams {
            left_bound: self.left_bound,
            right_bound: self.right_bound,
            boost: self.boost,
            cut: self.cut,
            low_frequency_cut: self.low_frequency_cut,
        }
    }

    /// Per-band gains for `band_count` bands.
    ///
    /// Bands without a configured level get level 0 (unity gain).
    pub fn gains(&self, levels: &[f32], band_count: usize) -> Vec<f32> {
        (0..band_count)
            .map(|i| gain_from_level(levels.get(i).copied().unwrap_or(0.0), self.eq_scale))
            .collect()
    }
}

/// Color quantization settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct QuantizeSection {
    /// Target palette size, 2 to 255
    pub colors: usize,
}

impl Default for QuantizeSection {
    fn default() -> Self {
        Self { colors: 32 }
    }
}

/// Munge settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MungeSection {
    pub threshold: u8,
    pub inverted: bool,
}

impl Default for MungeSection {
    fn default() -> Self {
        let options = MungeOptions::default();
        Self {
            threshold: options.threshold,
            inverted: options.inverted,
        }
    }
}

impl MungeSection {
    pub fn to_options(&self) -> MungeOptions {
        MungeOptions {
            threshold: self.threshold,
            inverted: self.inverted,
        }
    }
}

/// Channel shift settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ShiftSection {
    #[serde(deserialize_with = "parsed")]
    pub channel: RgbChannel,
}

impl Default for ShiftSection {
    fn default() -> Self {
        Self {
            channel: RgbChannel::Red,
        }
    }
}

fn parsed<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

fn parsed_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|s| s.parse().map_err(serde::de::Error::custom))
        .collect()
}

impl GlitchConfig {
    /// Load presets from `path`, falling back to defaults if the file
    /// cannot be read or parsed.
    pub fn load(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Loaded configuration");
                config
            }
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty document is valid and means "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = GlitchConfig::default();

        assert_eq!(config.sort.algorithm, SortAlgorithm::Quick);
        assert_eq!(config.sort.order, ComponentOrder::Rgb);
        assert!(config.sort.ascending);
        assert!(config.sort.random_break);
        assert_eq!(config.sort.break_point, None);
        assert_eq!(config.sort.swap, SwapRule::Bb);
        assert_eq!((config.sort.shell_ratio, config.sort.shell_divisor), (3, 9));
        assert_eq!(config.zigzag.floor, 8);
        assert_eq!(config.zigzag.ceiling, 64);
        assert_eq!(config.fft.block_size, 64);
        assert_eq!(config.fft.channels, vec![Channel::Lightness]);
        assert_eq!(config.fft.left_bound, -0.25);
        assert_eq!(config.fft.right_bound, 5.0);
        assert_eq!(config.quantize.colors, 32);
        assert_eq!(config.munge.threshold, 16);
        assert_eq!(config.shift.channel, RgbChannel::Red);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
sort:
  algorithm: shell
  order: bsh
  ascending: false
  break_point: 500
fft:
  block_size: 32
  channels: [red, hue]
  eq_levels: [0.5, -1.0]
seed: 42
"#;
        let config = GlitchConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.sort.algorithm, SortAlgorithm::Shell);
        assert_eq!(config.sort.order, ComponentOrder::Bsh);
        assert!(!config.sort.ascending);
        assert_eq!(config.sort.break_point, Some(500.0));
        // untouched fields keep their defaults
        assert!(config.sort.random_break);
        assert_eq!(config.sort.glitch_steps, 1);
        assert_eq!(config.fft.block_size, 32);
        assert_eq!(config.fft.channels, vec![Channel::Red, Channel::Hue]);
        assert_eq!(config.fft.eq_levels, vec![0.5, -1.0]);
        assert_eq!(config.zigzag.percent, 100.0);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_unknown_enum_value_is_an_error() {
        let err = GlitchConfig::from_yaml_str("sort:\n  algorithm: heap\n").unwrap_err();
        assert!(err.to_string().contains("heap"));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = GlitchConfig::from_yaml_str("").unwrap();
        assert_eq!(config.quantize.colors, 32);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = GlitchConfig::load(Path::new("/nonexistent/glitchsort.yaml"));
        assert_eq!(config.sort.algorithm, SortAlgorithm::Quick);
    }

    #[test]
    fn test_sort_config_conversion() {
        let section = SortSection {
            algorithm: SortAlgorithm::Bubble,
            break_point: Some(900.0),
            swap_channels: true,
            ..Default::default()
        };
        let config = section.to_sort_config();
        assert_eq!(config.algorithm, SortAlgorithm::Bubble);
        assert_eq!(config.break_point, Some(900.0));
        assert!(config.swap_channels);
        assert_eq!(config.effective_break_point(), 900.0);

        let config = SortSection::default().to_sort_config();
        assert_eq!(config.effective_break_point(), 144.0);
    }

    #[test]
    fn test_gains_pad_with_unity() {
        let fft = FftSection {
            eq_scale: 2.0,
            ..Default::default()
        };
        assert_eq!(fft.gains(&[1.0, -0.5], 4), vec![3.0, 0.5, 1.0, 1.0]);
    }
}
