//! Checkpoint header definition.

/// Magic bytes for checkpoint files.
pub const CHECKPOINT_MAGIC: [u8; 4] = *b"KPCK";

/// Current format version.
pub const CHECKPOINT_VERSION: u16 = 1;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 32;

/// Flag bit: the learning-rate field is meaningful.
pub const FLAG_HAS_LR: u16 = 1 << 0;

/// Checkpoint file header.
///
/// Layout (32 bytes total):
/// - Bytes 0-3: Magic "KPCK"
/// - Bytes 4-5: version (u16 LE)
/// - Bytes 6-7: flags (u16 LE)
/// - Bytes 8-11: epoch (u32 LE)
/// - Bytes 12-15: reserved
/// - Bytes 16-23: learning rate (f64 LE, 0 when absent)
/// - Bytes 24-31: best validation loss (f64 LE)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckpointHeader {
    /// Magic bytes "KPCK".
    pub magic: [u8; 4],
    /// Format version.
    pub version: u16,
    /// Flag bits.
    pub flags: u16,
    /// Epoch the checkpoint was taken after.
    pub epoch: u32,
    /// Reserved bytes.
    pub reserved: [u8; 4],
    /// Learning rate for the next epoch.
    pub lr: f64,
    /// Best validation loss seen so far.
    pub best_loss: f64,
}

impl CheckpointHeader {
    /// Create a header for the current format version.
    pub fn new(epoch: u32, lr: Option<f64>, best_loss: f64) -> Self {
        Self {
            magic: CHECKPOINT_MAGIC,
            version: CHECKPOINT_VERSION,
            flags: if lr.is_some() { FLAG_HAS_LR } else { 0 },
            epoch,
            reserved: [0; 4],
            lr: lr.unwrap_or(0.0),
            best_loss,
        }
    }

    /// Validate the header magic bytes.
    pub fn is_valid(&self) -> bool {
        self.magic == CHECKPOINT_MAGIC
    }

    /// Learning rate, if the header carries one.
    pub fn learning_rate(&self) -> Option<f64> {
        if self.flags & FLAG_HAS_LR != 0 {
            Some(self.lr)
        } else {
            None
        }
    }

    /// Serialize the header to a byte array.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.flags.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.epoch.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.reserved);
        bytes[16..24].copy_from_slice(&self.lr.to_le_bytes());
        bytes[24..32].copy_from_slice(&self.best_loss.to_le_bytes());

        bytes
    }

    /// Deserialize a header from a byte array.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        let mut reserved = [0u8; 4];
        reserved.copy_from_slice(&bytes[12..16]);
        let mut lr = [0u8; 8];
        lr.copy_from_slice(&bytes[16..24]);
        let mut best = [0u8; 8];
        best.copy_from_slice(&bytes[24..32]);

        Self {
            magic,
            version: u16::from_le_bytes([bytes[4], bytes[5]]),
            flags: u16::from_le_bytes([bytes[6], bytes[7]]),
            epoch: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            reserved,
            lr: f64::from_le_bytes(lr),
            best_loss: f64::from_le_bytes(best),
        }
    }
}
