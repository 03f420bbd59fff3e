#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

fn hash(px: [u8; 4]) -> usize {
    (px[0] as usize * 3 + px[1] as usize * 5 + px[2] as usize * 7 + px[3] as usize * 11) % 64
}

/// Reference QOI encoder, following the format description at qoiformat.org
pub fn encode_qoi(width: u32, height: u32, channels: u8, pixels: &[[u8; 4]]) -> Vec<u8> {
    let mut out = b"qoif".to_vec();
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    out.push(channels);
    out.push(0);

    let mut index = [[0u8; 4]; 64];
    let mut prev = [0u8, 0, 0, 255];
    let mut run = 0u8;
    let last = pixels.len().saturating_sub(1);

    for (i, &px) in pixels.iter().enumerate() {
        if px == prev {
            run += 1;
            if run == 62 || i == last {
                out.push(0xc0 | (run - 1));
                run = 0;
            }
            continue;
        }

        if run > 0 {
            out.push(0xc0 | (run - 1));
            run = 0;
        }

        let slot = hash(px);
        if index[slot] == px {
            out.push(slot as u8);
        } else {
            index[slot] = px;
            if px[3] == prev[3] {
                let vr = px[0].wrapping_sub(prev[0]) as i8;
                let vg = px[1].wrapping_sub(prev[1]) as i8;
                let vb = px[2].wrapping_sub(prev[2]) as i8;
                let vg_r = vr.wrapping_sub(vg);
                let vg_b = vb.wrapping_sub(vg);

                if (-2..=1).contains(&vr) && (-2..=1).contains(&vg) && (-2..=1).contains(&vb) {
                    out.push(
                        0x40 | ((vr + 2) as u8) << 4 | ((vg + 2) as u8) << 2 | (vb + 2) as u8,
                    );
                } else if (-8..=7).contains(&vg_r)
                    && (-32..=31).contains(&vg)
                    && (-8..=7).contains(&vg_b)
                {
                    out.push(0x80 | (vg + 32) as u8);
                    out.push(((vg_r + 8) as u8) << 4 | (vg_b + 8) as u8);
                } else {
                    out.extend_from_slice(&[0xfe, px[0], px[1], px[2]]);
                }
            } else {
                out.extend_from_slice(&[0xff, px[0], px[1], px[2], px[3]]);
            }
        }
        prev = px;
    }

    out.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
    out
}

/// Solid-colour test image
pub fn solid(width: u32, height: u32, colour: [u8; 4]) -> Vec<[u8; 4]> {
    vec![colour; (width * height) as usize]
}

/// Horizontal gradient test image
pub fn gradient(width: u32, height: u32) -> Vec<[u8; 4]> {
    (0..height)
        .flat_map(|y| (0..width).map(move |x| [(x * 20) as u8, (y * 30) as u8, 90, 255]))
        .collect()
}

/// Wrap a binary payload the way slicers embed it: base64 in `; ` comment lines
pub fn comment_block(begin: &str, end: &str, payload: &[u8]) -> String {
    let encoded = STANDARD.encode(payload);
    let mut block = format!("; {} {}\n", begin, encoded.len());
    for chunk in encoded.as_bytes().chunks(78) {
        block.push_str("; ");
        block.push_str(std::str::from_utf8(chunk).unwrap());
        block.push('\n');
    }
    block.push_str(&format!("; {}\n", end));
    block
}

/// A `thumbnail_QOI` block for the given image
pub fn qoi_block(width: u32, height: u32, pixels: &[[u8; 4]]) -> String {
    let qoi = encode_qoi(width, height, 3, pixels);
    comment_block(
        &format!("thumbnail_QOI begin {}x{}", width, height),
        "thumbnail_QOI end",
        &qoi,
    )
}
