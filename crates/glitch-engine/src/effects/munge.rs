use tracing::debug;

use crate::buffer::{BufferError, PixelBuffer};
use crate::color::{max_color_diff, with_opaque_alpha};

/// Tunables for [`munge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MungeOptions {
    /// Largest per-channel difference treated as "unchanged". Default: `16`
    pub threshold: u8,
    /// Replace unchanged pixels instead of changed ones. Default: `false`
    pub inverted: bool,
}

impl Default for MungeOptions {
    fn default() -> Self {
        Self {
            threshold: 16,
            inverted: false,
        }
    }
}

/// Replace the pixels of `current` that differ from `backup` with the
/// matching pixels of `snapshot`.
///
/// A pixel differs when the largest per-channel difference exceeds the
/// threshold; with `inverted` set, pixels below the threshold are replaced
/// instead. Replaced pixels are made opaque. Returns the number of pixels
/// replaced.
///
/// # Errors
///
/// Returns [`BufferError::SizeMismatch`] if `backup` or `snapshot` is not
/// the size of `current`.
pub fn munge(
    current: &mut PixelBuffer,
    backup: &PixelBuffer,
    snapshot: &PixelBuffer,
    options: MungeOptions,
) -> Result<usize, BufferError> {
    for other in [backup, snapshot] {
        if !current.same_size(other) {
            return Err(BufferError::SizeMismatch {
                expected_width: current.width(),
                expected_height: current.height(),
                width: other.width(),
                height: other.height(),
            });
        }
    }

    let mut replaced = 0;
    let sources = backup.pixels().iter().zip(snapshot.pixels());
    for (pixel, (&before, &snap)) in current.pixels_mut().iter_mut().zip(sources) {
        let diff = max_color_diff(*pixel, before);
        let hit = if options.inverted {
            diff < options.threshold
        } else {
            diff > options.threshold
        };
        if hit {
            *pixel = with_opaque_alpha(snap);
            replaced += 1;
        }
    }
    debug!(replaced, threshold = options.threshold, inverted = options.inverted, "Munged image");
    Ok(replaced)
}
