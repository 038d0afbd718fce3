// ============================================================
// Layer 4 — Archive Codec
// ============================================================
// Binary container for a labelled EEG dataset.
//
// Layout (all little-endian, no footer, no checksum):
//
//   offset 0   i32 count
//   offset 4   i32 channel_dim
//   offset 8   i32 time_dim
//   offset 12  i32 labels_present (0 or 1)
//   offset 16  count * channel_dim * time_dim f32
//              (sample-major, each sample channel-major)
//   then       count i32 labels, only if labels_present == 1
//
// The total length is fixed by the header; short buffers and
// trailing bytes are both rejected.

use crate::domain::error::{DataError, DataResult};
use crate::domain::sample::Matrix;

/// Size of the fixed header in bytes
pub const HEADER_LEN: usize = 16;

const F32_LEN: usize = 4;
const I32_LEN: usize = 4;

/// Decoded header fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub count:          usize,
    pub channel_dim:    usize,
    pub time_dim:       usize,
    pub labels_present: bool,
}

impl ArchiveHeader {
    /// Parse and range-check the 16-byte header.
    pub fn parse(bytes: &[u8]) -> DataResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(DataError::TruncatedHeader { got: bytes.len() });
        }
        let field = |i: usize| {
            i32::from_le_bytes([bytes[i * 4], bytes[i * 4 + 1], bytes[i * 4 + 2], bytes[i * 4 + 3]])
        };
        let (count, channel_dim, time_dim, labels_flag) = (field(0), field(1), field(2), field(3));

        if count < 0 {
            return Err(invalid(format!("count must be >= 0, got {count}")));
        }
        if channel_dim <= 0 || time_dim <= 0 {
            return Err(invalid(format!(
                "dimensions must be > 0, got {channel_dim}x{time_dim}"
            )));
        }
        let labels_present = match labels_flag {
            0 => false,
            1 => true,
            other => return Err(invalid(format!("labels_present must be 0 or 1, got {other}"))),
        };

        Ok(Self {
            count:       count as usize,
            channel_dim: channel_dim as usize,
            time_dim:    time_dim as usize,
            labels_present,
        })
    }

    pub fn sample_len(&self) -> usize {
        self.channel_dim * self.time_dim
    }

    /// Byte length of the sample payload, or None on overflow
    pub fn sample_bytes(&self) -> Option<usize> {
        self.count
            .checked_mul(self.channel_dim)?
            .checked_mul(self.time_dim)?
            .checked_mul(F32_LEN)
    }

    pub fn label_bytes(&self) -> usize {
        if self.labels_present { self.count * I32_LEN } else { 0 }
    }
}

fn invalid(reason: String) -> DataError {
    DataError::InvalidHeader { reason }
}

/// A decoded archive: equal-shape samples plus optional labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Archive {
    pub channel_dim: usize,
    pub time_dim:    usize,
    pub samples:     Vec<Matrix>,
    /// None when the file carried no labels
    pub labels:      Option<Vec<i32>>,
}

impl Archive {
    /// Build an archive, checking shapes and label count.
    pub fn new(samples: Vec<Matrix>, labels: Option<Vec<i32>>) -> DataResult<Self> {
        let (channel_dim, time_dim) = check_shapes(&samples, labels.as_deref())?;
        Ok(Self { channel_dim, time_dim, samples, labels })
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn encode(&self) -> DataResult<Vec<u8>> {
        encode(&self.samples, self.labels.as_deref())
    }
}

/// Returns the shared (channel_dim, time_dim).
fn check_shapes(samples: &[Matrix], labels: Option<&[i32]>) -> DataResult<(usize, usize)> {
    let first = samples.first().ok_or(DataError::EmptyArchive)?;
    let shape = first.shape();

    if shape.0 == 0 || shape.1 == 0 {
        return Err(DataError::ShapeMismatch {
            reason: format!("sample shape {}x{} has a zero dimension", shape.0, shape.1),
        });
    }
    for (idx, m) in samples.iter().enumerate() {
        if m.shape() != shape || m.values.len() != shape.0 * shape.1 {
            return Err(DataError::ShapeMismatch {
                reason: format!(
                    "sample {idx} has shape {}x{}, expected {}x{}",
                    m.channel_dim, m.time_dim, shape.0, shape.1
                ),
            });
        }
    }
    if let Some(labels) = labels {
        if labels.len() != samples.len() {
            return Err(DataError::ShapeMismatch {
                reason: format!("{} samples but {} labels", samples.len(), labels.len()),
            });
        }
    }
    if samples.len() > i32::MAX as usize || shape.0 > i32::MAX as usize || shape.1 > i32::MAX as usize {
        return Err(DataError::ShapeMismatch {
            reason: "archive dimensions exceed i32 range".to_string(),
        });
    }
    Ok(shape)
}

/// Serialise samples (and optional labels) into archive bytes.
pub fn encode(samples: &[Matrix], labels: Option<&[i32]>) -> DataResult<Vec<u8>> {
    let (channel_dim, time_dim) = check_shapes(samples, labels)?;

    let payload = samples.len() * channel_dim * time_dim * F32_LEN;
    let label_bytes = labels.map_or(0, |l| l.len() * I32_LEN);
    let mut out = Vec::with_capacity(HEADER_LEN + payload + label_bytes);

    for field in [
        samples.len() as i32,
        channel_dim as i32,
        time_dim as i32,
        i32::from(labels.is_some()),
    ] {
        out.extend_from_slice(&field.to_le_bytes());
    }
    for m in samples {
        for v in &m.values {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }
    if let Some(labels) = labels {
        for l in labels {
            out.extend_from_slice(&l.to_le_bytes());
        }
    }

    tracing::debug!(
        "Encoded {} samples of {}x{} ({} bytes)",
        samples.len(), channel_dim, time_dim, out.len()
    );
    Ok(out)
}

/// Parse archive bytes. Performs no check against any expected
/// shape; consumers that need one validate after decoding.
pub fn decode(bytes: &[u8]) -> DataResult<Archive> {
    let header = ArchiveHeader::parse(bytes)?;

    let body = &bytes[HEADER_LEN..];
    // a length past usize::MAX can never be present in memory
    let sample_bytes = header.sample_bytes().ok_or(DataError::TruncatedPayload {
        section: "sample",
        got:     body.len(),
        need:    usize::MAX,
    })?;
    if body.len() < sample_bytes {
        return Err(DataError::TruncatedPayload {
            section: "sample",
            got:     body.len(),
            need:    sample_bytes,
        });
    }

    let label_bytes = header.label_bytes();
    let rest = &body[sample_bytes..];
    if rest.len() < label_bytes {
        return Err(DataError::TruncatedPayload {
            section: "label",
            got:     rest.len(),
            need:    label_bytes,
        });
    }
    if rest.len() > label_bytes {
        return Err(DataError::TrailingBytes { extra: rest.len() - label_bytes });
    }

    let sample_len = header.sample_len();
    let samples: Vec<Matrix> = if sample_len == 0 {
        Vec::new()
    } else {
        body[..sample_bytes]
            .chunks_exact(sample_len * F32_LEN)
            .map(|chunk| {
                let values = chunk
                    .chunks_exact(F32_LEN)
                    .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                    .collect();
                Matrix::new(header.channel_dim, header.time_dim, values).ok_or_else(|| {
                    DataError::ShapeMismatch { reason: "sample chunk length".to_string() }
                })
            })
            .collect::<DataResult<_>>()?
    };

    let labels = header.labels_present.then(|| {
        rest.chunks_exact(I32_LEN)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect::<Vec<i32>>()
    });

    Ok(Archive {
        channel_dim: header.channel_dim,
        time_dim:    header.time_dim,
        samples,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(seed: f32) -> Matrix {
        Matrix::new(2, 2, vec![seed, seed + 0.5, -seed, f32::MIN_POSITIVE]).unwrap()
    }

    fn three_sample_bytes() -> Vec<u8> {
        encode(&[matrix(1.0), matrix(2.0), matrix(3.0)], Some(&[0, 1, 0])).unwrap()
    }

    #[test]
    fn test_three_sample_archive_is_76_bytes() {
        let bytes = three_sample_bytes();
        assert_eq!(bytes.len(), 16 + 3 * 2 * 2 * 4 + 3 * 4);
        assert_eq!(&bytes[..4], &3i32.to_le_bytes());
        assert_eq!(&bytes[12..16], &1i32.to_le_bytes());

        let archive = decode(&bytes).unwrap();
        assert_eq!(archive.samples, vec![matrix(1.0), matrix(2.0), matrix(3.0)]);
        assert_eq!(archive.labels, Some(vec![0, 1, 0]));
    }

    #[test]
    fn test_floats_survive_bit_exact() {
        let m = Matrix::new(1, 3, vec![f32::NAN, -0.0, 1.0e-38]).unwrap();
        let archive = decode(&encode(&[m.clone()], None).unwrap()).unwrap();
        let got: Vec<u32> = archive.samples[0].values.iter().map(|v| v.to_bits()).collect();
        let want: Vec<u32> = m.values.iter().map(|v| v.to_bits()).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn test_unlabelled_archive_reads_sentinel() {
        let bytes = encode(&[matrix(1.0), matrix(2.0)], None).unwrap();
        assert_eq!(bytes.len(), 16 + 2 * 16);
        let archive = decode(&bytes).unwrap();
        assert!(archive.labels.is_none());
        assert_eq!(archive.count(), 2);
    }

    #[test]
    fn test_short_header() {
        for len in 0..16 {
            let err = decode(&vec![0u8; len]).unwrap_err();
            assert_eq!(err, DataError::TruncatedHeader { got: len });
        }
    }

    #[test]
    fn test_payload_short_by_one_byte() {
        let bytes = three_sample_bytes();
        // drop the labels and one more byte of floats
        let cut = &bytes[..16 + 48 - 1];
        assert!(matches!(
            decode(cut),
            Err(DataError::TruncatedPayload { section: "sample", .. })
        ));
        // labels short by one byte
        let cut = &bytes[..bytes.len() - 1];
        assert!(matches!(
            decode(cut),
            Err(DataError::TruncatedPayload { section: "label", got: 11, need: 12 })
        ));
    }

    #[test]
    fn test_oversized_header_reports_truncated_payload() {
        let mut bytes = Vec::new();
        for f in [i32::MAX, i32::MAX, i32::MAX, 0] {
            bytes.extend_from_slice(&f.to_le_bytes());
        }
        assert!(matches!(
            decode(&bytes),
            Err(DataError::TruncatedPayload { section: "sample", got: 0, .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = three_sample_bytes();
        bytes.push(0);
        assert_eq!(decode(&bytes), Err(DataError::TrailingBytes { extra: 1 }));
    }

    #[test]
    fn test_invalid_header_values() {
        let mut bytes = three_sample_bytes();
        bytes[12..16].copy_from_slice(&7i32.to_le_bytes());
        assert!(matches!(decode(&bytes), Err(DataError::InvalidHeader { .. })));

        let mut bytes = three_sample_bytes();
        bytes[0..4].copy_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(decode(&bytes), Err(DataError::InvalidHeader { .. })));

        let mut bytes = three_sample_bytes();
        bytes[4..8].copy_from_slice(&0i32.to_le_bytes());
        assert!(matches!(decode(&bytes), Err(DataError::InvalidHeader { .. })));
    }

    #[test]
    fn test_zero_count_archive() {
        let mut bytes = Vec::new();
        for f in [0i32, 18, 1024, 1] {
            bytes.extend_from_slice(&f.to_le_bytes());
        }
        let archive = decode(&bytes).unwrap();
        assert_eq!(archive.count(), 0);
        assert_eq!(archive.labels, Some(vec![]));
    }

    #[test]
    fn test_encode_shape_mismatch() {
        let odd = Matrix::new(2, 3, vec![0.0; 6]).unwrap();
        assert!(matches!(
            encode(&[matrix(1.0), odd], None),
            Err(DataError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            encode(&[matrix(1.0)], Some(&[0, 1])),
            Err(DataError::ShapeMismatch { .. })
        ));
        assert_eq!(encode(&[], None), Err(DataError::EmptyArchive));
    }
}
