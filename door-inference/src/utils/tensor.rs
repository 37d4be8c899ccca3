use door_media::Strip;
use ndarray::Array4;
use serde::{Deserialize, Serialize};

/// Memory layout the classifier expects for its single image input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// `[1, height, width, 3]`, the Keras default.
    #[default]
    Nhwc,
    /// `[1, 3, height, width]`.
    Nchw,
}

/// Resizes a strip to `(width, height)` with bilinear sampling and scales channels to `[0, 1]`.
///
/// Sampling is pixel-centre aligned (the same mapping as OpenCV's `INTER_LINEAR`), so a
/// uniform strip stays uniform at any output size. Channel order is kept as captured (BGR).
pub fn strip_to_tensor(strip: &Strip<'_>, size: (usize, usize), layout: TensorLayout) -> Array4<f32> {
    let (new_width, new_height) = size;
    let (old_width, old_height) = (strip.get_width() as usize, strip.get_height() as usize);

    let shape = match layout {
        TensorLayout::Nhwc => (1, new_height, new_width, 3),
        TensorLayout::Nchw => (1, 3, new_height, new_width),
    };
    let mut output = Array4::<f32>::zeros(shape);

    let scale_x = old_width as f32 / new_width as f32;
    let scale_y = old_height as f32 / new_height as f32;

    for i in 0..new_height {
        let (y0, y1, dy) = source_taps(i, scale_y, old_height);
        for j in 0..new_width {
            let (x0, x1, dx) = source_taps(j, scale_x, old_width);

            let p00 = strip.pixel(x0 as u32, y0 as u32);
            let p01 = strip.pixel(x1 as u32, y0 as u32);
            let p10 = strip.pixel(x0 as u32, y1 as u32);
            let p11 = strip.pixel(x1 as u32, y1 as u32);

            let channels = [
                (p00.0, p01.0, p10.0, p11.0),
                (p00.1, p01.1, p10.1, p11.1),
                (p00.2, p01.2, p10.2, p11.2),
            ];
            for (c, (a, b, d, e)) in channels.into_iter().enumerate() {
                let value = a as f32 * (1.0 - dx) * (1.0 - dy)
                    + b as f32 * dx * (1.0 - dy)
                    + d as f32 * (1.0 - dx) * dy
                    + e as f32 * dx * dy;
                let value = value / 255.0;

                match layout {
                    TensorLayout::Nhwc => output[[0, i, j, c]] = value,
                    TensorLayout::Nchw => output[[0, c, i, j]] = value,
                }
            }
        }
    }

    output
}

/// Maps output index `dst` to its two neighbouring source indices and the weight of the second.
fn source_taps(dst: usize, scale: f32, len: usize) -> (usize, usize, f32) {
    let src = ((dst as f32 + 0.5) * scale - 0.5).max(0.0);
    let last = len.saturating_sub(1);
    let lower = (src.floor() as usize).min(last);
    let upper = (lower + 1).min(last);
    let weight = if upper == lower { 0.0 } else { src - lower as f32 };

    (lower, upper, weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use door_media::{Frame, FrameSize, SegmentFrame, BGR};

    #[test]
    fn uniform_strip_stays_uniform() -> anyhow::Result<()> {
        let frame = Frame::filled(FrameSize::new(640, 480), BGR(51, 102, 255))?;
        let strips = frame.segment();
        let tensor = strip_to_tensor(&strips[1], (28, 28), TensorLayout::Nhwc);

        assert_eq!(tensor.shape(), &[1, 28, 28, 3]);
        for row in 0..28 {
            for col in 0..28 {
                assert_relative_eq!(tensor[[0, row, col, 0]], 0.2, epsilon = 1e-6);
                assert_relative_eq!(tensor[[0, row, col, 1]], 0.4, epsilon = 1e-6);
                assert_relative_eq!(tensor[[0, row, col, 2]], 1.0, epsilon = 1e-6);
            }
        }
        Ok(())
    }

    #[test]
    fn nchw_puts_channels_first() -> anyhow::Result<()> {
        let frame = Frame::filled(FrameSize::new(40, 10), BGR(255, 0, 0))?;
        let strips = frame.segment();
        let tensor = strip_to_tensor(&strips[0], (28, 28), TensorLayout::Nchw);

        assert_eq!(tensor.shape(), &[1, 3, 28, 28]);
        assert_relative_eq!(tensor[[0, 0, 5, 5]], 1.0, epsilon = 1e-6);
        assert_relative_eq!(tensor[[0, 2, 5, 5]], 0.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn only_samples_inside_the_strip() -> anyhow::Result<()> {
        let mut frame = Frame::filled(FrameSize::new(64, 16), BGR(0, 0, 0))?;
        frame.fill_columns(16, 32, BGR(255, 255, 255));

        let strips = frame.segment();
        let lit = strip_to_tensor(&strips[1], (28, 28), TensorLayout::Nhwc);
        let dark = strip_to_tensor(&strips[0], (28, 28), TensorLayout::Nhwc);

        assert!(lit.iter().all(|&v| (v - 1.0).abs() < 1e-6));
        assert!(dark.iter().all(|&v| v.abs() < 1e-6));
        Ok(())
    }

    #[test]
    fn taps_clamp_at_edges() {
        assert_eq!(source_taps(0, 4.0, 8), (1, 2, 0.5));
        let (lower, upper, weight) = source_taps(1, 4.0, 8);
        assert_eq!((lower, upper), (5, 6));
        assert_relative_eq!(weight, 0.5, epsilon = 1e-6);
        assert_eq!(source_taps(0, 0.5, 1), (0, 0, 0.0));
    }
}
