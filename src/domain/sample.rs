// ============================================================
// Layer 3 — Sample Domain Types
// ============================================================
// A sample is one fixed-shape EEG epoch: a channel × time
// matrix of f32 plus an integer class label.
//
// Orientation (used by every layer):
//   row c holds the `time_dim` consecutive readings of channel c,
//   so value (c, t) lives at index c * time_dim + t.
// This is the [channels, time] layout the classifier consumes.

use serde::{Deserialize, Serialize};

/// Label value used when an archive carries no labels
pub const UNLABELED: i32 = -1;

/// Label of the positive (seizure) class
pub const POSITIVE_LABEL: i32 = 1;

/// A dense row-major f32 matrix of shape `channel_dim × time_dim`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub channel_dim: usize,
    pub time_dim:    usize,
    pub values:      Vec<f32>,
}

impl Matrix {
    /// Build a matrix from its row-major values.
    /// Returns None if `values.len() != channel_dim * time_dim`.
    pub fn new(channel_dim: usize, time_dim: usize, values: Vec<f32>) -> Option<Self> {
        (values.len() == channel_dim * time_dim).then_some(Self {
            channel_dim,
            time_dim,
            values,
        })
    }

    /// An all-zero matrix
    #[cfg(test)]
    pub fn zeros(channel_dim: usize, time_dim: usize) -> Self {
        Self { channel_dim, time_dim, values: vec![0.0; channel_dim * time_dim] }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.channel_dim, self.time_dim)
    }
}

/// Slice out time position `t` from a channel-major value buffer.
pub fn column_of(values: &[f32], channel_dim: usize, time_dim: usize, t: usize) -> Vec<f32> {
    (0..channel_dim).map(|c| values[c * time_dim + t]).collect()
}

/// Borrowed view of one stored sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRef<'a> {
    pub values:      &'a [f32],
    pub label:       i32,
    pub channel_dim: usize,
    pub time_dim:    usize,
}

impl<'a> SampleRef<'a> {
    pub fn to_matrix(&self) -> Matrix {
        Matrix {
            channel_dim: self.channel_dim,
            time_dim:    self.time_dim,
            values:      self.values.to_vec(),
        }
    }

    pub fn column(&self, t: usize) -> Vec<f32> {
        column_of(self.values, self.channel_dim, self.time_dim, t)
    }
}

/// One row of the firmware table: all channel readings at a
/// single time position plus the label of the owning sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSample {
    pub channels: Vec<f32>,
    pub label:    i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(Matrix::new(2, 3, vec![0.0; 5]).is_none());
        assert!(Matrix::new(2, 3, vec![0.0; 6]).is_some());
    }

    #[test]
    fn test_column_reads_channel_major_layout() {
        // channel 0: 1 2 3, channel 1: 4 5 6
        let m = Matrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(column_of(&m.values, 2, 3, 0), vec![1.0, 4.0]);
        assert_eq!(column_of(&m.values, 2, 3, 2), vec![3.0, 6.0]);
        // channel 1, t = 1
        assert_eq!(m.values[4], 5.0);
    }
}
