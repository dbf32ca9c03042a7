use image::{DynamicImage, ImageBuffer, Rgb, Rgba, RgbaImage};
use recolorify_core::pipeline::{encode_png, recolor_bytes, recolor_file};
use recolorify_core::{
    recolor_image, recolor_rgba, recolor_with_workers, Color, Palette, RecolorParams,
};

fn primaries() -> Palette {
    Palette::parse_hex_list(["#FF0000", "#00FF00", "#0000FF"]).expect("valid palette")
}

fn uniform_image() -> RgbaImage {
    RgbaImage::from_pixel(4, 4, Rgba([100, 150, 200, 255]))
}

fn gradient_image(width: u32, height: u32) -> RgbaImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        let a = if (x + y) % 11 == 0 { 0 } else { 255 };
        Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) * 5 % 256) as u8, a])
    })
}

#[test]
fn uniform_image_is_blended_toward_palette() {
    let src = uniform_image();
    let params = RecolorParams::default().with_nearest(2).with_power(2.0);
    let out = recolor_rgba(&src, &primaries(), &params);

    assert_eq!(out.dimensions(), src.dimensions());
    for (p_out, p_in) in out.pixels().zip(src.pixels()) {
        assert_eq!(p_out[3], 255);
        assert_ne!(p_out, p_in);
        // blue and green are the two nearest, weighted by inverse squared distance
        assert_eq!(p_out.0, [0, 94, 161, 255]);
    }
}

#[test]
fn luminosity_changes_the_result() {
    let src = uniform_image();
    let params = RecolorParams::default().with_nearest(2).with_power(2.0);
    let bright = recolor_rgba(&src, &primaries(), &params);
    let dark = recolor_rgba(&src, &primaries(), &params.with_luminosity(0.5));
    assert_eq!(dark.dimensions(), src.dimensions());
    assert_ne!(bright, dark);
}

#[test]
fn pixels_beyond_max_distance_pass_through() {
    let src = uniform_image();
    let params = RecolorParams::default()
        .with_nearest(2)
        .with_power(2.0)
        .with_max_distance(10.0);
    let out = recolor_rgba(&src, &primaries(), &params);
    assert_eq!(out, src);
}

#[test]
fn generous_max_distance_still_recolors() {
    let src = uniform_image();
    let params = RecolorParams::default()
        .with_nearest(2)
        .with_power(2.0)
        .with_max_distance(1000.0);
    let out = recolor_rgba(&src, &primaries(), &params);
    assert!(out.pixels().all(|p| p.0 == [0, 94, 161, 255]));
}

#[test]
fn transparent_pixels_stay_transparent() {
    let mut src = RgbaImage::new(2, 2);
    src.put_pixel(0, 0, Rgba([100, 100, 100, 255]));
    src.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
    src.put_pixel(0, 1, Rgba([150, 150, 150, 255]));
    src.put_pixel(1, 1, Rgba([90, 20, 240, 0]));

    let params = RecolorParams::default().with_nearest(2).with_power(2.0).with_luminosity(2.0);
    let out = recolor_rgba(&src, &primaries(), &params);
    assert_eq!(out.get_pixel(1, 0).0, [0, 0, 0, 0]);
    assert_eq!(out.get_pixel(1, 1).0, [0, 0, 0, 0]);
    assert_eq!(out.get_pixel(0, 0)[3], 255);
    assert_eq!(out.get_pixel(0, 1)[3], 255);
}

#[test]
fn semi_transparent_pixel_keeps_alpha_when_passed_through() {
    let src = RgbaImage::from_pixel(3, 2, Rgba([100, 150, 200, 128]));
    let params = RecolorParams::default()
        .with_nearest(2)
        .with_power(2.0)
        .with_max_distance(10.0);
    let out = recolor_rgba(&src, &primaries(), &params);
    assert!(out.pixels().all(|p| p.0 == [100, 150, 200, 128]));
}

#[test]
fn semi_transparent_pixel_is_blended_opaque() {
    let mut src = RgbaImage::from_pixel(3, 2, Rgba([100, 150, 200, 128]));
    src.put_pixel(2, 1, Rgba([100, 150, 200, 1]));
    let params = RecolorParams::default().with_nearest(2).with_power(2.0);
    let out = recolor_rgba(&src, &primaries(), &params);
    assert!(out.pixels().all(|p| p.0 == [0, 94, 161, 255]));
}

#[test]
fn palette_members_map_to_themselves() {
    let palette = Palette::parse_hex_list(["#720546", "#00D2BE", "#FFC832"]).unwrap();
    let src = ImageBuffer::from_fn(3, 1, |x, _| {
        let c = palette.colors()[x as usize];
        Rgba::from(c)
    });
    let out = recolor_rgba(&src, &palette, &RecolorParams::default());
    assert_eq!(out, src);
}

#[test]
fn worker_count_does_not_change_output() {
    let src = gradient_image(23, 37);
    let palette = Palette::parse_hex_list([
        "#580437", "#720546", "#00D2BE", "#FFC832", "#FFFFFF", "#000000",
    ])
    .unwrap();
    let params = RecolorParams::default().with_nearest(3).with_power(2.5).with_max_distance(120.0);

    let reference = recolor_with_workers(&src, &palette, &params, 1);
    for workers in [2, 3, 4, 7, 36, 37, 64] {
        let out = recolor_with_workers(&src, &palette, &params, workers);
        assert_eq!(out.as_raw(), reference.as_raw(), "{workers} workers");
    }
    assert_eq!(recolor_rgba(&src, &palette, &params), reference);
}

#[test]
fn single_row_image() {
    let src = gradient_image(50, 1);
    let out = recolor_with_workers(&src, &primaries(), &RecolorParams::strict(), 8);
    assert_eq!(out.dimensions(), (50, 1));
    for (p_out, p_in) in out.pixels().zip(src.pixels()) {
        if p_in[3] == 0 {
            assert_eq!(p_out.0, [0, 0, 0, 0]);
        } else {
            assert!(primaries().colors().contains(&Color::from(*p_out)));
        }
    }
}

#[test]
fn non_rgba_input_is_normalized() {
    let rgb = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(3, 2, Rgb([100, 150, 200])));
    let params = RecolorParams::default().with_nearest(2).with_power(2.0);
    let out = recolor_image(&rgb, &primaries(), &params);
    assert_eq!(out.dimensions(), (3, 2));
    assert!(out.pixels().all(|p| p.0 == [0, 94, 161, 255]));
}

#[test]
fn png_bytes_round_trip() {
    let src = gradient_image(9, 6);
    let params = RecolorParams::soft();
    let encoded = encode_png(&src).unwrap();

    let out_bytes = recolor_bytes(&encoded, &primaries(), &params).unwrap();
    let decoded = image::load_from_memory(&out_bytes).unwrap().to_rgba8();
    assert_eq!(decoded, recolor_rgba(&src, &primaries(), &params));
}

#[test]
fn file_round_trip() {
    let dir = std::env::temp_dir().join(format!("recolorify-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("input.png");
    let output = dir.join("output.png");
    uniform_image().save(&input).unwrap();

    let params = RecolorParams::default().with_nearest(2).with_power(2.0);
    recolor_file(&input, &output, &primaries(), &params).unwrap();
    let written = image::open(&output).unwrap().to_rgba8();
    assert!(written.pixels().all(|p| p.0 == [0, 94, 161, 255]));

    std::fs::remove_dir_all(&dir).ok();
}
