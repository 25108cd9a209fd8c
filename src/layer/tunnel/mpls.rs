//! MPLS label stack entries (RFC 3032).
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                Label                  | TC  |S|       TTL     |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! A stack is a run of entries ending with the one whose S bit is set. MPLS
//! carries no next-protocol field; the payload's IP version nibble says what
//! follows.

use crate::engine::constants::MPLS_ENTRY_LEN;

const LABEL_BITS: u32 = 20;
const TRAFFIC_CLASS_BITS: u32 = 3;
const TTL_BITS: u32 = 8;

const LABEL_SHIFT: u32 = 12;
const TRAFFIC_CLASS_SHIFT: u32 = 9;
const STACK_BOTTOM_BIT: u32 = 1 << 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MplsFieldError {
    #[error("MPLS label out of range for 20 bits")]
    Label,
    #[error("MPLS traffic_class out of range for 3 bits")]
    TrafficClass,
    #[error("MPLS ttl out of range for 8 bits")]
    Ttl,
}

/// One 4-byte label stack entry, stored as its host-order wire word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MplsEntry(u32);

impl MplsEntry {
    /// Packs the fields, rejecting any value wider than its bit field.
    pub fn encode(
        label: i64,
        traffic_class: i64,
        is_stack_bottom: bool,
        ttl: i64,
    ) -> Result<Self, MplsFieldError> {
        let label = field_value(label, LABEL_BITS).ok_or(MplsFieldError::Label)?;
        let traffic_class =
            field_value(traffic_class, TRAFFIC_CLASS_BITS).ok_or(MplsFieldError::TrafficClass)?;
        let ttl = field_value(ttl, TTL_BITS).ok_or(MplsFieldError::Ttl)?;

        let mut word = (label << LABEL_SHIFT) | (traffic_class << TRAFFIC_CLASS_SHIFT) | ttl;
        if is_stack_bottom {
            word |= STACK_BOTTOM_BIT;
        }
        Ok(Self(word))
    }

    pub fn from_wire(word: u32) -> Self {
        Self(word)
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let word: [u8; MPLS_ENTRY_LEN] = bytes.get(..MPLS_ENTRY_LEN)?.try_into().ok()?;
        Some(Self(u32::from_be_bytes(word)))
    }

    pub fn to_bytes(self) -> [u8; MPLS_ENTRY_LEN] {
        self.0.to_be_bytes()
    }

    pub fn wire(self) -> u32 {
        self.0
    }

    pub fn label(self) -> u32 {
        self.0 >> LABEL_SHIFT
    }

    pub fn traffic_class(self) -> u8 {
        ((self.0 >> TRAFFIC_CLASS_SHIFT) & 0x07) as u8
    }

    pub fn is_stack_bottom(self) -> bool {
        self.0 & STACK_BOTTOM_BIT != 0
    }

    pub fn ttl(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// `(label, traffic_class, is_stack_bottom, ttl)`
    pub fn decode(self) -> (u32, u8, bool, u8) {
        (
            self.label(),
            self.traffic_class(),
            self.is_stack_bottom(),
            self.ttl(),
        )
    }
}

fn field_value(value: i64, bits: u32) -> Option<u32> {
    if value < 0 || value >= (1i64 << bits) {
        return None;
    }
    u32::try_from(value).ok()
}

/// Label stack entries in wire order, as handed to the composer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MplsStack {
    entries: Vec<MplsEntry>,
}

impl MplsStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: MplsEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[MplsEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn byte_len(&self) -> usize {
        self.entries.len() * MPLS_ENTRY_LEN
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.entries
            .iter()
            .flat_map(|entry| entry.to_bytes())
            .collect()
    }
}

impl FromIterator<MplsEntry> for MplsStack {
    fn from_iter<I: IntoIterator<Item = MplsEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_known_wire_value() {
        let entry = MplsEntry::encode(16, 0, true, 64).expect("fields in range");
        assert_eq!(entry.to_bytes(), [0x00, 0x01, 0x01, 0x40]);
        assert_eq!(entry.decode(), (16, 0, true, 64));
    }

    #[test]
    fn rejects_one_past_each_field_width() {
        assert_eq!(MplsEntry::encode(1 << 20, 0, false, 0), Err(MplsFieldError::Label));
        assert_eq!(MplsEntry::encode(0, 8, false, 0), Err(MplsFieldError::TrafficClass));
        assert_eq!(MplsEntry::encode(0, 0, false, 256), Err(MplsFieldError::Ttl));
    }

    #[test]
    fn rejects_negative_values() {
        assert_eq!(MplsEntry::encode(-1, 0, false, 0), Err(MplsFieldError::Label));
        assert_eq!(MplsEntry::encode(0, -1, false, 0), Err(MplsFieldError::TrafficClass));
        assert_eq!(MplsEntry::encode(0, 0, false, -1), Err(MplsFieldError::Ttl));
    }

    #[test]
    fn accepts_maximum_values() {
        let entry = MplsEntry::encode((1 << 20) - 1, 7, true, 255).expect("fields in range");
        assert_eq!(entry.wire(), 0xffff_ffff);
    }

    #[test]
    fn error_messages_name_the_field() {
        assert_eq!(
            MplsFieldError::TrafficClass.to_string(),
            "MPLS traffic_class out of range for 3 bits"
        );
    }

    #[test]
    fn stack_serializes_entries_in_order() {
        let stack: MplsStack = [
            MplsEntry::encode(100, 1, false, 64).expect("in range"),
            MplsEntry::encode(200, 2, true, 63).expect("in range"),
        ]
        .into_iter()
        .collect();
        let bytes = stack.to_bytes();
        assert_eq!(stack.byte_len(), 8);
        assert_eq!(bytes.len(), 8);
        assert_eq!(MplsEntry::from_bytes(&bytes).map(MplsEntry::label), Some(100));
        assert_eq!(
            MplsEntry::from_bytes(&bytes[4..]).map(MplsEntry::is_stack_bottom),
            Some(true)
        );
        assert!(MplsEntry::from_bytes(&bytes[5..]).is_none());
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(
            label in 0i64..(1 << 20),
            tc in 0i64..8,
            bottom in any::<bool>(),
            ttl in 0i64..256,
        ) {
            let entry = MplsEntry::encode(label, tc, bottom, ttl).expect("fields in range");
            let (l, t, b, h) = MplsEntry::from_bytes(&entry.to_bytes())
                .expect("four bytes")
                .decode();
            prop_assert_eq!(i64::from(l), label);
            prop_assert_eq!(i64::from(t), tc);
            prop_assert_eq!(b, bottom);
            prop_assert_eq!(i64::from(h), ttl);
        }

        #[test]
        fn wire_words_round_trip(word in any::<u32>()) {
            let (label, tc, bottom, ttl) = MplsEntry::from_wire(word).decode();
            let entry = MplsEntry::encode(label.into(), tc.into(), bottom, ttl.into())
                .expect("decoded fields are in range");
            prop_assert_eq!(entry.wire(), word);
        }
    }
}
