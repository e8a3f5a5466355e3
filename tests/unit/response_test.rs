//! Unit tests for response encoding

use ::base64::{engine::general_purpose::STANDARD, Engine};
use gen_card_gallery::backend::PixelBuffer;
use gen_card_gallery::response::{base64, ResponseEncoder};

fn decode_png_url(data_url: &str) -> Vec<u8> {
    let payload = data_url.strip_prefix("data:image/png;base64,").unwrap();
    STANDARD.decode(payload).unwrap()
}

fn gradient(width: u32, height: u32) -> PixelBuffer {
    let plane = (width * height) as usize;
    let data = (0..3 * plane)
        .map(|i| (i % plane) as f32 / plane as f32 * 2.0 - 1.0)
        .collect();
    PixelBuffer::new(width, height, data).unwrap()
}

#[test]
fn test_base64_encode() {
    assert_eq!(base64::encode(b"Hello, World!"), "SGVsbG8sIFdvcmxkIQ==");
    assert_eq!(base64::encode(b""), "");
}

#[test]
fn test_create_data_url() {
    let data = b"test data";
    let data_url = base64::create_data_url(data, "png");

    assert!(data_url.starts_with("data:image/png;base64,"));
    assert_eq!(decode_png_url(&data_url), data.to_vec());
}

#[test]
fn test_encoder_produces_decodable_png() {
    let encoder = ResponseEncoder::new();
    let data_url = encoder.to_data_url(&gradient(64, 96)).unwrap();

    assert!(data_url.starts_with("data:image/png;base64,"));
    let png = decode_png_url(&data_url);
    let img = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
        .unwrap()
        .to_rgb8();
    assert_eq!(img.dimensions(), (64, 96));
}

#[test]
fn test_encoder_rescales_model_range() {
    let encoder = ResponseEncoder::new();
    let pixels = PixelBuffer::new(1, 1, vec![-1.0, 0.0, 1.0]).unwrap();

    let png = encoder.to_png(&pixels).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgb8();
    assert_eq!(img.get_pixel(0, 0).0, [0, 127, 255]);
}

#[test]
fn test_encoder_rejects_malformed_buffer() {
    let encoder = ResponseEncoder::new();
    let pixels = PixelBuffer {
        width: 4,
        height: 4,
        data: vec![0.0; 10],
    };
    assert!(encoder.to_png(&pixels).is_err());
}

#[test]
fn test_shared_payload_is_wrapped_verbatim() {
    let encoder = ResponseEncoder::new();
    assert_eq!(
        encoder.wrap_shared("not-even-base64"),
        "data:image/png;base64,not-even-base64"
    );
}
