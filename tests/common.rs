#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// Saves a deterministic gradient so encoders have real content to work on.
pub fn write_image(path: &Path, width: u32, height: u32) -> PathBuf {
    let format = ImageFormat::from_path(path).unwrap();
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 3 % 256) as u8, (y * 7 % 256) as u8, ((x ^ y) % 256) as u8])
    });
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    img.save_with_format(path, format).unwrap();
    path.to_path_buf()
}

pub fn write_rgba_png(path: &Path, width: u32, height: u32) -> PathBuf {
    let img = RgbaImage::from_fn(width, height, |x, _| Rgba([200, 40, 40, (x * 4 % 256) as u8]));
    img.save_with_format(path, ImageFormat::Png).unwrap();
    path.to_path_buf()
}

/// A file with an image extension whose content cannot be decoded.
pub fn write_corrupt(path: &Path) -> PathBuf {
    fs::write(path, b"definitely not a jpeg").unwrap();
    path.to_path_buf()
}

/// Three valid images of different formats plus one corrupt JPEG, along
/// with a text file and a GIF that must be ignored.
pub fn create_mixed_batch(dir: &Path) -> Vec<PathBuf> {
    let files = vec![
        write_image(&dir.join("a.png"), 120, 80),
        write_image(&dir.join("b.jpg"), 90, 60),
        write_image(&dir.join("c.bmp"), 64, 64),
        write_corrupt(&dir.join("d.jpg")),
    ];
    fs::write(dir.join("notes.txt"), b"not an image").unwrap();
    fs::write(dir.join("anim.gif"), b"GIF89a").unwrap();
    files
}

pub fn create_nested_directory_structure(dir: &Path) -> PathBuf {
    write_image(&dir.join("top.png"), 40, 40);
    let subdir = dir.join("sub").join("deeper");
    write_image(&subdir.join("nested.jpg"), 40, 30);
    subdir
}
