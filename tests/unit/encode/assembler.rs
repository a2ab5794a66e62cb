use super::*;

use crate::foundation::error::LoopcutError;
use crate::palette::table::pack;
use crate::pipeline::decode::decode_frames;

const RED_PX: [u8; 4] = [255, 0, 0, 255];
const BLUE_PX: [u8; 4] = [0, 0, 255, 255];

fn two_color_palette() -> PaletteTable {
    PaletteTable::from_colors(vec![pack(255, 0, 0), pack(0, 0, 255)])
}

fn solid_frame(index: usize, delay_cs: u16, color: [u8; 4], global: bool) -> CompositedFrame {
    CompositedFrame {
        index,
        delay_cs,
        bitmap: color.repeat(4),
        palette_is_global: global,
        palette: two_color_palette(),
        transparent: None,
    }
}

fn metadata(frame_count: usize, loop_count: u16) -> ImageMetadata {
    ImageMetadata::new(2, 2, frame_count, loop_count).unwrap()
}

#[test]
fn assembles_a_decodable_container() {
    let meta = metadata(2, 0);
    let palette = two_color_palette();
    let mut assembler = EncodeAssembler::begin(&meta, Some(&palette)).unwrap();

    let f0 = solid_frame(0, 10, RED_PX, true);
    let f1 = solid_frame(1, 20, BLUE_PX, true);
    assembler.add_frame(&f0, 10).unwrap();
    assert!(!assembler.is_complete());
    assembler.add_frame(&f1, 20).unwrap();
    assert!(assembler.is_complete());

    let bytes = assembler.finalize().unwrap();
    let (meta_back, frames_back) = decode_frames(&bytes).unwrap();
    assert_eq!(meta_back, meta);
    assert_eq!(frames_back.len(), 2);
    assert_eq!(frames_back[0].delay_cs, 10);
    assert_eq!(frames_back[1].delay_cs, 20);
    assert_eq!(frames_back[0].bitmap, f0.bitmap);
    assert_eq!(frames_back[1].bitmap, f1.bitmap);
}

#[test]
fn local_palette_frames_round_trip_with_finite_loop_count() {
    let meta = metadata(1, 3);
    let mut assembler = EncodeAssembler::begin(&meta, None).unwrap();
    assembler
        .add_frame(&solid_frame(0, 5, RED_PX, false), 5)
        .unwrap();
    let bytes = assembler.finalize().unwrap();

    let parsed = crate::decode::reader::parse_gif(&bytes).unwrap();
    assert_eq!(parsed.metadata.loop_count, 3);
    assert!(parsed.frames[0].descriptor.has_local_palette);
    let (_, frames_back) = decode_frames(&bytes).unwrap();
    assert_eq!(frames_back[0].bitmap, RED_PX.repeat(4));
}

#[test]
fn color_not_in_palette_aborts_the_frame() {
    let meta = metadata(1, 0);
    let palette = two_color_palette();
    let mut assembler = EncodeAssembler::begin(&meta, Some(&palette)).unwrap();

    let mut frame = solid_frame(0, 5, RED_PX, true);
    frame.bitmap[0..4].copy_from_slice(&[7, 7, 7, 255]);
    match assembler.add_frame(&frame, 5) {
        Err(LoopcutError::ColorNotInPalette { r: 7, g: 7, b: 7 }) => {}
        other => panic!("expected ColorNotInPalette, got {other:?}"),
    }
    assert!(!assembler.is_complete());
}

#[test]
fn transparent_canvas_pixels_use_the_transparent_index() {
    let meta = metadata(1, 0);
    let palette = two_color_palette();
    let mut assembler = EncodeAssembler::begin(&meta, Some(&palette)).unwrap();

    let mut frame = solid_frame(0, 5, RED_PX, true);
    frame.transparent = Some(1);
    frame.bitmap[0..4].copy_from_slice(&[0, 0, 0, 0]);
    assembler.add_frame(&frame, 5).unwrap();
    let bytes = assembler.finalize().unwrap();

    let (_, frames_back) = decode_frames(&bytes).unwrap();
    // The transparent pixel stays unpainted on a fresh canvas.
    assert_eq!(&frames_back[0].bitmap[0..4], &[0, 0, 0, 0]);
    assert_eq!(&frames_back[0].bitmap[4..8], &RED_PX);
}

#[test]
fn unpainted_pixels_get_a_transparent_slot_when_none_is_declared() {
    let meta = metadata(1, 0);
    let palette = PaletteTable::from_colors(vec![pack(0, 0, 0), pack(255, 0, 0)]);
    let mut assembler = EncodeAssembler::begin(&meta, Some(&palette)).unwrap();

    // One painted red pixel, three unpainted, no transparent index declared.
    let frame = CompositedFrame {
        index: 0,
        delay_cs: 5,
        bitmap: vec![
            255, 0, 0, 255, //
            0, 0, 0, 0, //
            0, 0, 0, 0, //
            0, 0, 0, 0,
        ],
        palette_is_global: true,
        palette,
        transparent: None,
    };
    assembler.add_frame(&frame, 5).unwrap();
    let bytes = assembler.finalize().unwrap();

    let (_, frames_back) = decode_frames(&bytes).unwrap();
    assert_eq!(frames_back[0].bitmap, frame.bitmap);
}

#[test]
fn unpainted_pixels_with_a_full_palette_fail_to_encode() {
    let meta = metadata(1, 0);
    let colors: Vec<u32> = (0u32..256).map(|i| pack(i as u8, 0, 0)).collect();
    let palette = PaletteTable::from_colors(colors);
    let mut assembler = EncodeAssembler::begin(&meta, Some(&palette)).unwrap();

    let mut frame = solid_frame(0, 5, RED_PX, true);
    frame.palette = palette;
    frame.transparent = None;
    frame.bitmap[0..4].copy_from_slice(&[0, 0, 0, 0]);
    match assembler.add_frame(&frame, 5) {
        Err(LoopcutError::ColorNotInPalette { .. }) => {}
        other => panic!("expected ColorNotInPalette, got {other:?}"),
    }
}

#[test]
#[should_panic(expected = "declared frame count")]
fn add_frame_after_completion_is_a_programming_error() {
    let meta = metadata(1, 0);
    let palette = two_color_palette();
    let mut assembler = EncodeAssembler::begin(&meta, Some(&palette)).unwrap();
    let frame = solid_frame(0, 5, RED_PX, true);
    assembler.add_frame(&frame, 5).unwrap();
    let _ = assembler.add_frame(&frame, 5);
}

#[test]
#[should_panic(expected = "finalize called")]
fn finalize_before_completion_is_a_programming_error() {
    let meta = metadata(2, 0);
    let palette = two_color_palette();
    let assembler = EncodeAssembler::begin(&meta, Some(&palette)).unwrap();
    let _ = assembler.finalize();
}
