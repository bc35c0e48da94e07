use crate::constants::INFO_PREFIX;
use crate::image_source::ImageSource;

/// Key/value rows describing an image, in display order
pub fn image_info_rows(image: &ImageSource) -> Vec<(&'static str, String)> {
    vec![
        ("Format", image.format().to_string()),
        ("Content type", image.content_type().to_string()),
        ("Extension", image.ext().to_string()),
        ("Dimensions", format!("{}x{} pixels", image.width(), image.height())),
        ("Color mode", image.mode().to_string()),
        (
            "File size",
            format!("{} ({} bytes)", image.file_size(), image.byte_len()),
        ),
    ]
}

pub fn print_image_info(label: &str, image: &ImageSource) {
    println!("{} {}:", INFO_PREFIX, label);
    for (key, value) in image_info_rows(image) {
        println!("  {:<13} {}", format!("{}:", key), value);
    }
}
