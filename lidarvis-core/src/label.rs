//! Semantic label decoding

/// A per-point label as stored in SemanticKITTI `.label` files.
///
/// The lower 16 bits hold the semantic class, the upper 16 bits the
/// instance id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemanticLabel {
    pub class: u32,
    pub instance: u32,
}

impl SemanticLabel {
    pub fn from_raw(raw: u32) -> Self {
        Self {
            class: raw & 0xFFFF,
            instance: raw >> 16,
        }
    }

    pub fn to_raw(self) -> u32 {
        (self.instance << 16) | (self.class & 0xFFFF)
    }
}
