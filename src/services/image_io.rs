//! PNG decoding and encoding for [`PixelBuffer`].
//!
//! Any 8- or 16-bit PNG is accepted on input; palettes are expanded and
//! 16-bit samples stripped to 8 bits. Output is always 8-bit RGBA, or an
//! indexed PNG for quantized images.

use std::io::Cursor;
use std::path::Path;

use glitch_engine::{PixelBuffer, Quantized};

use crate::error::ImageError;

/// Decode PNG bytes into an ARGB buffer.
///
/// Images without an alpha channel come back fully opaque.
pub fn decode_png(data: &[u8]) -> Result<PixelBuffer, ImageError> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;
    buf.truncate(frame.buffer_size());

    if frame.bit_depth != png::BitDepth::Eight {
        return Err(ImageError::UnsupportedLayout {
            color_type: format!("{:?}", frame.color_type),
            bit_depth: frame.bit_depth as u8,
        });
    }

    let rgba: Vec<u8> = match frame.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        other => {
            return Err(ImageError::UnsupportedLayout {
                color_type: format!("{other:?}"),
                bit_depth: frame.bit_depth as u8,
            })
        }
    };

    Ok(PixelBuffer::from_rgba_bytes(frame.width, frame.height, &rgba)?)
}

/// Read and decode a PNG file.
pub fn load_png(path: &Path) -> Result<PixelBuffer, ImageError> {
    let data = std::fs::read(path)?;
    let buffer = decode_png(&data)?;
    tracing::debug!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        "Loaded image"
    );
    Ok(buffer)
}

/// Encode a buffer as an 8-bit RGBA PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, ImageError> {
    write_png(
        buffer.width(),
        buffer.height(),
        png::ColorType::Rgba,
        None,
        &buffer.to_rgba_bytes(),
    )
}

/// Encode a quantized image as an 8-bit indexed PNG.
///
/// The palette is the quantizer's colormap; alpha is dropped since the
/// quantizer always produces opaque colors.
pub fn encode_indexed_png(quantized: &Quantized) -> Result<Vec<u8>, ImageError> {
    let plte: Vec<u8> = quantized
        .colormap
        .iter()
        .flat_map(|&c| [(c >> 16) as u8, (c >> 8) as u8, c as u8])
        .collect();
    write_png(
        quantized.buffer.width(),
        quantized.buffer.height(),
        png::ColorType::Indexed,
        Some(&plte),
        &quantized.indices,
    )
}

/// Write encoded PNG bytes to `path`.
pub fn save_png(path: &Path, data: &[u8]) -> Result<(), ImageError> {
    std::fs::write(path, data)?;
    tracing::info!(path = %path.display(), bytes = data.len(), "Saved image");
    Ok(())
}

fn write_png(
    width: u32,
    height: u32,
    color_type: png::ColorType,
    plte: Option<&[u8]>,
    data: &[u8],
) -> Result<Vec<u8>, ImageError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(data)
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glitch_engine::OctreeQuantizer;

    fn encode_raw(width: u32, height: u32, color_type: png::ColorType, data: &[u8]) -> Vec<u8> {
        write_png(width, height, color_type, None, data).unwrap()
    }

    #[test]
    fn test_decode_rgb_is_opaque() {
        let png = encode_raw(2, 1, png::ColorType::Rgb, &[10, 20, 30, 40, 50, 60]);
        let buffer = decode_png(&png).unwrap();
        assert_eq!(buffer.pixels(), &[0xFF0A_141E, 0xFF28_323C]);
    }

    #[test]
    fn test_decode_grayscale_alpha() {
        let png = encode_raw(1, 1, png::ColorType::GrayscaleAlpha, &[0x80, 0x40]);
        let buffer = decode_png(&png).unwrap();
        assert_eq!(buffer.get(0, 0), 0x4080_8080);
    }

    #[test]
    fn test_encode_then_decode_keeps_alpha() {
        let buffer = PixelBuffer::from_pixels(2, 2, vec![0x0011_2233, 0x8044_5566, 0xFF77_8899, 0xFFAA_BBCC]).unwrap();
        let decoded = decode_png(&encode_png(&buffer).unwrap()).unwrap();
        assert_eq!(decoded, buffer);
    }

    #[test]
    fn test_indexed_png_decodes_to_quantized_colors() {
        let buffer = PixelBuffer::from_pixels(3, 1, vec![0xFFFF_0000, 0xFF00_FF00, 0xFFFF_0000]).unwrap();
        let quantized = OctreeQuantizer::new(4).quantize(&buffer);
        let decoded = decode_png(&encode_indexed_png(&quantized).unwrap()).unwrap();
        assert_eq!(decoded, quantized.buffer);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_png(b"not a png").unwrap_err();
        assert!(matches!(err, ImageError::PngDecode(_)));
    }
}
