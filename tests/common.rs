#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, RgbImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    encode(&DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&DynamicImage::new_rgb8(width, height), ImageFormat::Jpeg)
}

pub fn create_test_image_files(temp_dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let png_file = temp_dir.join("input.png");
    let jpg_file = temp_dir.join("input.jpg");
    let txt_file = temp_dir.join("notes.txt");

    fs::write(&png_file, png_bytes(64, 48)).unwrap();
    fs::write(&jpg_file, jpeg_bytes(32, 32)).unwrap();
    fs::write(&txt_file, b"not an image").unwrap();

    (png_file, jpg_file, txt_file)
}

/// Writes an executable shell script standing in for pngquant/jpegoptim.
#[cfg(unix)]
pub fn create_fake_tool(temp_dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = temp_dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
