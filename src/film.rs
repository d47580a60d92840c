use assert2::assert;
use rgb::{ComponentBytes as _, RGBA8};

use crate::geometry::{Color, ScreenSize};
use crate::screen_block::ScreenBlock;

/// Maps a linear color to an output pixel, clamping each channel into range.
pub fn color_to_rgba(color: &Color) -> RGBA8 {
    RGBA8::new(
        (color.x * 255.0).round().clamp(0.0, 255.0) as u8,
        (color.y * 255.0).round().clamp(0.0, 255.0) as u8,
        (color.z * 255.0).round().clamp(0.0, 255.0) as u8,
        u8::MAX,
    )
}

/// Image buffer that render sweeps write into, one block at a time.
#[derive(Clone, Debug)]
pub struct Film {
    resolution: ScreenSize,
    pixels: Vec<RGBA8>,
}

impl Film {
    pub fn new(resolution: ScreenSize) -> Film {
        assert!(resolution.x > 0);
        assert!(resolution.y > 0);

        Film {
            resolution,
            pixels: vec![RGBA8::new(0, 0, 0, u8::MAX); (resolution.x * resolution.y) as usize],
        }
    }

    pub fn resolution(&self) -> ScreenSize {
        self.resolution
    }

    pub fn pixels(&self) -> &[RGBA8] {
        &self.pixels
    }

    /// Raw RGBA bytes in row-major order, e.g. for uploading as a texture.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    /// Copies a rendered block into the film.
    /// The source holds the block's pixels in row-major order, no padding.
    pub fn write_block(&mut self, block: ScreenBlock, pixels: &[RGBA8]) {
        assert!(block.max.x <= self.resolution.x);
        assert!(block.max.y <= self.resolution.y);
        assert!(pixels.len() >= block.area() as usize);

        let block_width = block.width() as usize;
        for row in 0..block.height() as usize {
            let source = &pixels[row * block_width..(row + 1) * block_width];
            let start =
                (block.min.y as usize + row) * self.resolution.x as usize + block.min.x as usize;
            self.pixels[start..start + block_width].copy_from_slice(source);
        }
    }

    /// Converts the film into an image crate buffer, e.g. for saving to a file.
    pub fn into_image(self) -> image::RgbaImage {
        image::RgbaImage::from_raw(
            self.resolution.x,
            self.resolution.y,
            bytemuck::cast_vec(self.pixels),
        )
        .expect("The pixel buffer always matches the resolution")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;

    use crate::geometry::ScreenPoint;

    #[test]
    fn color_conversion_rounds_and_clamps() {
        assert!(color_to_rgba(&Color::new(0.5, 1.5, -0.2)) == RGBA8::new(128, 255, 0, 255));
    }

    #[test]
    fn new_film_starts_black_and_opaque() {
        let film = Film::new(ScreenSize::new(4, 3));
        assert!(film.pixels().len() == 12);
        assert!(film.pixels().iter().all(|p| *p == RGBA8::new(0, 0, 0, 255)));
        assert!(film.as_bytes().len() == 48);
    }

    #[test]
    fn write_block_lands_at_the_block_position() {
        let mut film = Film::new(ScreenSize::new(4, 4));
        let block = ScreenBlock::new(ScreenPoint::new(1, 2), ScreenPoint::new(3, 4));
        let red = RGBA8::new(255, 0, 0, 255);

        film.write_block(block, &vec![red; block.area() as usize]);

        for point in ScreenBlock::from_size(film.resolution()).internal_points() {
            let expected = if block.contains(point) {
                red
            } else {
                RGBA8::new(0, 0, 0, 255)
            };
            let index = (point.y * 4 + point.x) as usize;
            assert!(film.pixels()[index] == expected);
        }
    }

    #[test]
    #[should_panic]
    fn write_block_rejects_blocks_outside_the_film() {
        let mut film = Film::new(ScreenSize::new(4, 4));
        let block = ScreenBlock::new(ScreenPoint::new(2, 2), ScreenPoint::new(5, 4));
        film.write_block(block, &[RGBA8::new(0, 0, 0, 255); 6]);
    }

    #[test]
    fn into_image_keeps_the_resolution() {
        let image = Film::new(ScreenSize::new(5, 3)).into_image();
        assert!(image.dimensions() == (5, 3));
    }
}
