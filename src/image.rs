use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use png::{BitDepth, ColorType, Decoder, Transformations};

/// RGBA8 image, rows ordered bottom to top like GL expects.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    pub fn load_png<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let file = File::open(path).map_err(ImageError::InputError)?;

        Self::decode_png(BufReader::new(file))
    }

    pub fn decode_png<R: Read>(src: R) -> Result<Self, ImageError> {
        let mut decoder = Decoder::new(src);
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

        let mut reader = decoder.read_info().map_err(ImageError::DecodeError)?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut buf)
            .map_err(ImageError::DecodeError)?;
        buf.truncate(info.buffer_size());

        if info.bit_depth != BitDepth::Eight {
            return Err(ImageError::UnsupportedFormat(format!(
                "bit depth {:?}",
                info.bit_depth
            )));
        }

        let rgba = to_rgba8(info.color_type, &buf)?;

        let mut image = Self {
            width: info.width,
            height: info.height,
            pixels: rgba,
        };
        image.flip_vertically();

        Ok(image)
    }

    ///
    /// Procedural stand-in for a texture file.
    ///
    pub fn checkerboard(size: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let cell = (size / cells.max(1)).max(1);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                let color = if (x / cell + y / cell) % 2 == 0 { a } else { b };
                pixels.extend_from_slice(&color);
            }
        }

        Self {
            width: size,
            height: size,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn flip_vertically(&mut self) {
        let stride = self.width as usize * 4;
        let height = self.height as usize;

        for row in 0..height / 2 {
            let (top, bottom) = self.pixels.split_at_mut((height - row - 1) * stride);
            top[row * stride..(row + 1) * stride].swap_with_slice(&mut bottom[..stride]);
        }
    }
}

fn to_rgba8(color_type: ColorType, data: &[u8]) -> Result<Vec<u8>, ImageError> {
    let rgba = match color_type {
        ColorType::Rgba => data.to_vec(),
        ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        ColorType::Grayscale => data.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        ColorType::Indexed => {
            return Err(ImageError::UnsupportedFormat(
                "indexed color was not expanded".into(),
            ))
        }
    };

    Ok(rgba)
}

#[derive(Debug)]
pub enum ImageError {
    InputError(std::io::Error),
    DecodeError(png::DecodingError),
    UnsupportedFormat(String),
}

impl Display for ImageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputError(e) => f.write_fmt(format_args!("could not open image: {e}")),
            Self::DecodeError(e) => f.write_fmt(format_args!("could not decode image: {e}")),
            Self::UnsupportedFormat(e) => f.write_fmt(format_args!("unsupported image: {e}")),
        }
    }
}

impl Error for ImageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InputError(e) => Some(e),
            Self::DecodeError(e) => Some(e),
            Self::UnsupportedFormat(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(width: u32, height: u32, color: ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn rgb_rows_are_flipped() {
        #[rustfmt::skip]
        let data = [
            255, 0, 0,   0, 255, 0,
            0, 0, 255,   255, 255, 255,
        ];
        let png = encode(2, 2, ColorType::Rgb, &data);

        let image = Image::decode_png(png.as_slice()).unwrap();

        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        #[rustfmt::skip]
        assert_eq!(
            image.pixels(),
            &[
                0, 0, 255, 255,   255, 255, 255, 255,
                255, 0, 0, 255,   0, 255, 0, 255,
            ]
        );
    }

    #[test]
    fn grayscale_alpha_is_expanded() {
        let png = encode(1, 3, ColorType::GrayscaleAlpha, &[10, 1, 20, 2, 30, 3]);

        let image = Image::decode_png(png.as_slice()).unwrap();

        #[rustfmt::skip]
        assert_eq!(
            image.pixels(),
            &[
                30, 30, 30, 3,
                20, 20, 20, 2,
                10, 10, 10, 1,
            ]
        );
    }

    #[test]
    fn garbage_fails_to_decode() {
        let res = Image::decode_png(&b"definitely not a png"[..]);

        assert!(matches!(res, Err(ImageError::DecodeError(_))));
    }

    #[test]
    fn missing_file() {
        let res = Image::load_png("/nonexistent/learngl/container.png");

        assert!(matches!(res, Err(ImageError::InputError(_))));
    }

    #[test]
    fn checkerboard_cells() {
        let a = [255, 255, 255, 255];
        let b = [0, 0, 0, 255];
        let image = Image::checkerboard(4, 2, a, b);

        assert_eq!(image.pixels().len(), 4 * 4 * 4);

        let at = |x: usize, y: usize| &image.pixels()[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4];
        assert_eq!(at(0, 0), &a);
        assert_eq!(at(1, 1), &a);
        assert_eq!(at(2, 0), &b);
        assert_eq!(at(0, 2), &b);
        assert_eq!(at(3, 3), &a);
    }
}
