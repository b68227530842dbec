//! Whole-symbol known answers. The expected grids come from an independent encoder,
//! one row per string, `#` for dark.

use qrforge::{Mask, QrCode, QrCodeEcc, QrSegment, Version};

fn encode_bytes(text: &str, ver: u8, ecl: QrCodeEcc, mask: u8) -> QrCode {
    let segs = [QrSegment::make_bytes(text.as_bytes()).unwrap()];
    let ver = Version::new(ver).unwrap();
    let mask = Mask::new(mask).unwrap();
    QrCode::encode_segments_advanced(&segs, ecl, ver, ver, Some(mask), false).unwrap()
}

fn assert_grid(qr: &QrCode, expected: &[&str]) {
    assert_eq!(qr.size() as usize, expected.len());
    for (y, row) in expected.iter().enumerate() {
        let actual: String = (0..qr.size())
            .map(|x| if qr.get_module(x, y as i32) { '#' } else { '.' })
            .collect();
        assert_eq!(&actual, row, "row {y} differs");
    }
}

#[test]
fn hello_world_1q_matches_reference_grid() {
    let qr = encode_bytes("HELLO WORLD", 1, QrCodeEcc::Quartile, 3);
    assert_eq!(qr.error_correction_level(), QrCodeEcc::Quartile);
    assert_grid(&qr, &HELLO_WORLD_1Q_MASK3);
}

#[test]
fn version_7_matches_reference_grid() {
    // Four interleaved blocks, version info blocks and six alignment patterns to step around
    let text = "Placement covers version info and alignment patterns: 0123456789 abcdefghijklmnopqrstuvwxyz!";
    let qr = encode_bytes(text, 7, QrCodeEcc::Medium, 5);
    assert_eq!(qr.version().value(), 7);
    assert_grid(&qr, &VERSION7_M_MASK5);
}

#[rustfmt::skip]
const HELLO_WORLD_1Q_MASK3: [&str; 21] = [
    "#######..###..#######",
    "#.....#.#.#...#.....#",
    "#.###.#.#...#.#.###.#",
    "#.###.#...#.#.#.###.#",
    "#.###.#..###..#.###.#",
    "#.....#...##..#.....#",
    "#######.#.#.#.#######",
    ".........#.##........",
    ".###.##...........##.",
    "#####..#.#.#####.##..",
    "#...###..#...#.#...##",
    "#......##..##..#.#.#.",
    ".##...#..#.#.#....#.#",
    "........#.#.#.##..#.#",
    "#######..#..#####....",
    "#.....#.###..#.#.####",
    "#.###.#..#.#..#..#...",
    "#.###.#.##....#..###.",
    "#.###.#.##..#..#..#..",
    "#.....#.##.#.####...#",
    "#######...##.#.#.....",
];

#[rustfmt::skip]
const VERSION7_M_MASK5: [&str; 45] = [
    "#######......#.#...#####..###.#.#...#.#######",
    "#.....#.#...#.##........###..#.#...#..#.....#",
    "#.###.#.##.#..##.###.#.....##.##...#..#.###.#",
    "#.###.#.#.#.#.#####..#.#.####.#.##.##.#.###.#",
    "#.###.#...####...#.######..#####.####.#.###.#",
    "#.....#.....#.#..#..#...##............#.....#",
    "#######.#.#.#.#.#.#.#.#.#.#.#.#.#.#.#.#######",
    "........##.#..#.....#...#..##...##.#.........",
    "#.....#.##..##.#.#.######.#..#.#.#...##..###.",
    ".####....#.#..#.#.#############...########...",
    "##...##.#.##.#.#.#.#....###.....#####.#....#.",
    "#.###..#.#.#.##..#...#.####..#.########..##..",
    ".#.##.#.##.#..#..##.#..###...#..#.##.##..#.##",
    ".#.##..#..##.#.......###.#..##...#.###..#....",
    "..#.#.#..##.###.###########.#.#..##...#.#.###",
    "....##.##...##..######..#.##..#..###..#...#..",
    "..#...#.#.......#.#..#.###.....#.###..#..#.##",
    "#..##..#...##.#.##..#..#.#.####.##.###.#..###",
    "###..####.#.####.#...####.......##.#.#.##.###",
    "#.#.#..######........#..#####.#....#....#.###",
    "#..######..#...##.#######.#..####..#########.",
    "###.#...#.##....#..##...##.####...#.#...##...",
    ".#.##.#.###.##.#..#.#.#.#....#.##...#.#.#.##.",
    "#.#.#...##.###..###.#...#...##..#...#...####.",
    "#.#.######.#.############...###.###.######.##",
    "#.##.....#......#####.#.##..####.#..##.#.###.",
    "#.....####.#...####..#....#.....###.#.....##.",
    "#.#..#.##....###..##.####.###.#..###.##.#.#.#",
    "##.#..#...#.##.##.##.#.#.###.##.....#####..##",
    "..##.#.#..##..#.##..####...#..#..#...#.#.....",
    ".##...##..###..#..#.#.###..##.#.##.##.#...###",
    "...#.#.#.#####.###.##.##....#.####.#..#...##.",
    "#####.##...#..#...###.....#..#.#..#...#......",
    "#...#..#####.#..####.#.#.##...##.###.##.##.#.",
    "....#.##.###...#.##.##.#.##.#..####.##.......",
    ".####..#.##.#.###..###.##...####.###..#..#..#",
    "#..##.###..###..#.#######.#.######.########.#",
    "........#.#..#.....##...#....###.####...#.#.#",
    "#######..##.#.###.###.#.##...#...#..#.#.####.",
    "#.....#.....####..#.#...#..#.#....###...###.#",
    "#.###.#..#####.#....######...###..#.#####....",
    "#.###.#...##..#..#..#..#.#...##..#..#...#.##.",
    "#.###.#...##..###..##.####.###.#.#......###.#",
    "#.....#..########...#.#...#..#.####..#...##..",
    "#######.###.###.#.##....#.#.#..#.###..##...#.",
];
