//! Display rotation of decoded frames

use ffmpeg_next::util::frame::video::Video as VideoFrame;

use crate::domain::model::Rotation;

/// Clockwise rotation encoded in a libav display matrix (nine native-endian
/// `i32`s, 16.16 fixed point), or `None` when the matrix is malformed
pub fn rotation_from_display_matrix(matrix: &[u8]) -> Option<Rotation> {
    if matrix.len() < 36 {
        return None;
    }
    let entry = |i: usize| {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&matrix[i * 4..i * 4 + 4]);
        i32::from_ne_bytes(raw) as f64 / 65536.0
    };

    let scale_x = entry(0).hypot(entry(3));
    let scale_y = entry(1).hypot(entry(4));
    if scale_x == 0.0 || scale_y == 0.0 {
        return None;
    }
    let degrees = (entry(1) / scale_y).atan2(entry(0) / scale_x).to_degrees();
    Some(Rotation::from_degrees(degrees))
}

/// Rotate every plane of a planar frame whose planes share one size
pub fn rotate_planes(frame: &VideoFrame, rotation: Rotation) -> VideoFrame {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let (out_width, out_height) = rotation.display_size(frame.width(), frame.height());

    let mut rotated = VideoFrame::new(frame.format(), out_width, out_height);
    for plane in 0..frame.planes() {
        let src_stride = frame.stride(plane);
        let dst_stride = rotated.stride(plane);
        let src = frame.data(plane);
        let dst = rotated.data_mut(plane);

        for row in 0..out_height as usize {
            for col in 0..out_width as usize {
                let (src_row, src_col) = match rotation {
                    Rotation::None => (row, col),
                    Rotation::Clockwise90 => (height - 1 - col, row),
                    Rotation::Half => (height - 1 - row, width - 1 - col),
                    Rotation::CounterClockwise90 => (col, width - 1 - row),
                };
                dst[row * dst_stride + col] = src[src_row * src_stride + src_col];
            }
        }
    }
    rotated
}
