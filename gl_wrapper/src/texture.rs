use std::ffi::c_void;
use thiserror::Error;

pub struct Texture2D {
    id: u32,
}

impl Texture2D {
    pub fn new(
        width: u32,
        height: u32,
        data: &[u8],
        format: TextureFormats,
        filter: TextureFilter,
    ) -> Result<Self, TextureError> {
        check_len(width, height, data, format)?;

        let mut id = 0;

        unsafe {
            gl::GenTextures(1, &mut id);
            gl::BindTexture(gl::TEXTURE_2D, id);

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, filter.min_filter() as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, filter.mag_filter() as i32);

            // rows of RGB data are not 4 byte aligned
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format.internal_format() as i32,
                width as i32,
                height as i32,
                0,
                format.pixel_format(),
                gl::UNSIGNED_BYTE,
                data.as_ptr() as *const c_void,
            );
            gl::GenerateMipmap(gl::TEXTURE_2D);
        }

        log::debug!("Uploaded {width}x{height} texture {id}");

        Ok(Self { id })
    }

    pub fn bind(&self, unit: u8) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit as u32);
            gl::BindTexture(gl::TEXTURE_2D, self.id)
        }
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.id);
        }
    }
}

fn check_len(
    width: u32,
    height: u32,
    data: &[u8],
    format: TextureFormats,
) -> Result<(), TextureError> {
    let expected = width as usize * height as usize * format.channels() as usize;

    if expected != data.len() {
        return Err(TextureError::InvalidSrcLength(expected, data.len()));
    }

    Ok(())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("Invalid source data length, expected {0} bytes, got {1}")]
    InvalidSrcLength(usize, usize),
}

#[derive(Debug, Copy, Clone)]
pub enum TextureFormats {
    Rgb8,
    Rgba8,
}

impl TextureFormats {
    pub fn channels(&self) -> u8 {
        match self {
            TextureFormats::Rgb8 => 3,
            TextureFormats::Rgba8 => 4,
        }
    }

    fn internal_format(&self) -> u32 {
        match self {
            TextureFormats::Rgb8 => gl::RGB8,
            TextureFormats::Rgba8 => gl::RGBA8,
        }
    }

    fn pixel_format(&self) -> u32 {
        match self {
            TextureFormats::Rgb8 => gl::RGB,
            TextureFormats::Rgba8 => gl::RGBA,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

impl TextureFilter {
    fn min_filter(&self) -> u32 {
        match self {
            TextureFilter::Nearest => gl::NEAREST_MIPMAP_NEAREST,
            TextureFilter::Linear => gl::LINEAR_MIPMAP_LINEAR,
        }
    }

    fn mag_filter(&self) -> u32 {
        match self {
            TextureFilter::Nearest => gl::NEAREST,
            TextureFilter::Linear => gl::LINEAR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_matches_format() {
        assert_eq!(check_len(2, 2, &[0; 16], TextureFormats::Rgba8), Ok(()));
        assert_eq!(check_len(2, 2, &[0; 12], TextureFormats::Rgb8), Ok(()));
    }

    #[test]
    fn length_mismatch() {
        assert_eq!(
            check_len(2, 2, &[0; 12], TextureFormats::Rgba8),
            Err(TextureError::InvalidSrcLength(16, 12))
        );
    }
}
