//! Shared fixtures for unit tests and benches.

use crate::config::EncoderConfig;
use crate::emitter::TelemetryEncoder;
use crate::transport::CaptureTransport;
use crate::types::ValueSource;
use crate::vision::{CornerPoint, VisionDetection, VisionKind};

/// Encoder with `field_count` registered uint16 counters, capturing
/// frames in memory.
pub fn populated_encoder(field_count: usize) -> TelemetryEncoder<CaptureTransport> {
    let config = EncoderConfig { max_fields: field_count.max(1), ..Default::default() };
    let mut encoder = TelemetryEncoder::new(config, CaptureTransport::new())
        .unwrap_or_else(|e| panic!("fixture config invalid: {e}"));
    for i in 0..field_count {
        let base = i as u16;
        encoder
            .register(format!("field{i}"), ValueSource::uint16(move || base.wrapping_mul(3)))
            .unwrap_or_else(|e| panic!("fixture registration failed: {e}"));
    }
    encoder
}

/// A plausible sensor snapshot: alternating blobs and fiducial tags.
pub fn sample_detections(count: usize) -> Vec<VisionDetection> {
    (0..count)
        .map(|i| {
            let fiducial = i % 2 == 1;
            VisionDetection {
                exists: true,
                kind: if fiducial { VisionKind::FiducialTag } else { VisionKind::ColorBlob },
                id: (i % 0x40) as u8,
                origin_x: (10 + i * 7 % 300) as u16,
                origin_y: (5 + i * 11 % 220) as u16,
                center_x: 160,
                center_y: 120,
                width: 40,
                height: 30,
                score: 90,
                angle: (i as f32 * 13.5) % 360.0,
                corners: fiducial.then(|| {
                    [
                        CornerPoint { x: 100, y: 100 },
                        CornerPoint { x: 140, y: 100 },
                        CornerPoint { x: 140, y: 140 },
                        CornerPoint { x: 100, y: 140 },
                    ]
                }),
            }
        })
        .collect()
}
