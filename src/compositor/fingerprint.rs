use crate::compositor::frame::{CompositeFrame, CompositeOp, SourceRef};
use crate::foundation::math::Fnv1a64;

const FRAME_SEED: u64 = Fnv1a64::OFFSET_BASIS ^ 0x5c3e_c0de_f7a3_e001;

/// Stable hash of a composite frame, used to skip redraws of identical frames.
pub(crate) fn fingerprint_frame(frame: &CompositeFrame) -> u64 {
    let mut h = Fnv1a64::new(FRAME_SEED);
    h.write_str(&frame.scene_id);
    h.write_u64(frame.ops.len() as u64);
    for op in &frame.ops {
        match op {
            CompositeOp::Source { source } => {
                h.write_u8(0);
                match source {
                    SourceRef::Image(url) => {
                        h.write_u8(0);
                        h.write_str(url);
                    }
                    SourceRef::Video(url) => {
                        h.write_u8(1);
                        h.write_str(url);
                    }
                }
            }
            CompositeOp::Opacity { alpha } => {
                h.write_u8(1);
                h.write_f64(*alpha);
            }
            CompositeOp::Transform { transform, .. } => {
                // The affine is derived from these parameters.
                h.write_u8(2);
                h.write_f64(transform.scale);
                h.write_f64(transform.rotation_deg);
                h.write_f64(transform.translate.x);
                h.write_f64(transform.translate.y);
            }
            CompositeOp::Blend { mode } => {
                h.write_u8(3);
                h.write_str(mode.name());
            }
            CompositeOp::Crop { inset } => {
                h.write_u8(4);
                for v in [inset.top, inset.right, inset.bottom, inset.left] {
                    h.write_f64(v);
                }
            }
        }
    }
    match &frame.caption {
        Some(caption) => {
            h.write_u8(1);
            h.write_str(caption);
        }
        None => h.write_u8(0),
    }
    h.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/fingerprint.rs"]
mod tests;
