use super::*;

#[test]
fn pack_is_red_most_significant() {
    assert_eq!(pack(0x01, 0x02, 0x03), 0x010203);
    assert_eq!(unpack(0x010203), (0x01, 0x02, 0x03));
}

#[test]
fn pack_unpack_round_trips() {
    for &(r, g, b) in &[(0, 0, 0), (255, 255, 255), (17, 0, 200), (1, 254, 3)] {
        assert_eq!(unpack(pack(r, g, b)), (r, g, b));
    }
}

#[test]
fn from_raw_ignores_trailing_partial_triple() {
    let table = PaletteTable::from_raw(&[10, 20, 30, 40, 50, 60, 70, 80]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.color(0), Some(pack(10, 20, 30)));
    assert_eq!(table.color(1), Some(pack(40, 50, 60)));
}

#[test]
fn to_raw_is_the_inverse_of_from_raw() {
    let raw = vec![1, 2, 3, 200, 100, 50];
    assert_eq!(PaletteTable::from_raw(&raw).to_raw(), raw);
}

#[test]
fn index_of_first_occurrence_wins() {
    let red = pack(255, 0, 0);
    let table = PaletteTable::from_colors(vec![red, pack(0, 255, 0), red]);
    assert_eq!(table.index_of(red), Some(0));
    assert_eq!(table.index_of(pack(0, 0, 255)), None);
}

#[test]
fn to_index_stream_maps_exact_colors() {
    let table = PaletteTable::from_colors(vec![pack(255, 0, 0), pack(0, 0, 255)]);
    let bitmap = [255, 0, 0, 255, 0, 0, 255, 255, 255, 0, 0, 255];
    assert_eq!(table.to_index_stream(&bitmap).unwrap(), vec![0, 1, 0]);
}

#[test]
fn to_index_stream_fails_on_unknown_color() {
    let table = PaletteTable::from_colors(vec![pack(255, 0, 0)]);
    let bitmap = [1, 2, 3, 255];
    match table.to_index_stream(&bitmap) {
        Err(crate::foundation::error::LoopcutError::ColorNotInPalette { r, g, b }) => {
            assert_eq!((r, g, b), (1, 2, 3));
        }
        other => panic!("expected ColorNotInPalette, got {other:?}"),
    }
}

#[test]
fn transparent_pixels_map_to_the_transparent_index() {
    let table = PaletteTable::from_colors(vec![pack(9, 9, 9), pack(255, 0, 0)]);
    // One transparent pixel, one opaque red.
    let bitmap = [0, 0, 0, 0, 255, 0, 0, 255];
    let indices = table
        .to_index_stream_with_transparency(&bitmap, Some(0))
        .unwrap();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn transparent_pixels_without_a_slot_are_unrepresentable() {
    // Black occupies an opaque slot; an alpha-0 pixel must not fall through
    // to an opaque match on its RGB.
    let table = PaletteTable::from_colors(vec![pack(0, 0, 0), pack(255, 0, 0)]);
    let bitmap = [0, 0, 0, 0];
    match table.to_index_stream_with_transparency(&bitmap, None) {
        Err(crate::foundation::error::LoopcutError::ColorNotInPalette { .. }) => {}
        other => panic!("expected ColorNotInPalette, got {other:?}"),
    }
}

#[test]
fn opaque_pixels_never_match_the_transparent_slot() {
    let red = pack(255, 0, 0);
    // Red sits in the transparent slot and also in slot 1.
    let table = PaletteTable::from_colors(vec![red, red]);
    let bitmap = [255, 0, 0, 255];
    let indices = table
        .to_index_stream_with_transparency(&bitmap, Some(0))
        .unwrap();
    assert_eq!(indices, vec![1]);

    // With red only in the transparent slot, an opaque red is a miss.
    let table = PaletteTable::from_colors(vec![red, pack(0, 255, 0)]);
    assert!(
        table
            .to_index_stream_with_transparency(&bitmap, Some(0))
            .is_err()
    );
}
