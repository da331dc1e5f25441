use serde::{Deserialize, Serialize};

/// Bytes handed to the transport so far, out of the file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadProgress {
    pub bytes_sent: u64,
    pub bytes_total: u64,
}

impl UploadProgress {
    /// `bytes_sent` is clamped to `bytes_total`.
    pub fn new(bytes_sent: u64, bytes_total: u64) -> Self {
        Self {
            bytes_sent: bytes_sent.min(bytes_total),
            bytes_total,
        }
    }

    /// Fraction in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.bytes_total == 0 {
            return 0.0;
        }
        self.bytes_sent as f64 / self.bytes_total as f64
    }

    pub fn percent(&self) -> f64 {
        self.ratio() * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.bytes_total > 0 && self.bytes_sent == self.bytes_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_and_percent() {
        let progress = UploadProgress::new(25, 100);
        assert_eq!(progress.ratio(), 0.25);
        assert_eq!(progress.percent(), 25.0);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_new_clamps_to_total() {
        let progress = UploadProgress::new(150, 100);
        assert_eq!(progress.bytes_sent, 100);
        assert!(progress.is_complete());
        assert_eq!(progress.ratio(), 1.0);
    }
}
