/// Read position into a packet buffer, bounded by `end` rather than the
/// slice length so a parser can be confined to part of the buffer.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            end: data.len(),
        }
    }

    pub fn with_bounds(data: &'a [u8], pos: usize, end: usize) -> Option<Self> {
        if end > data.len() || pos > end {
            return None;
        }
        Some(Self { data, pos, end })
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.pos)
    }

    pub fn advance(&mut self, bytes: usize) -> bool {
        if bytes > self.remaining() {
            return false;
        }
        self.pos += bytes;
        true
    }

    pub fn read_exact(&mut self, len: usize) -> Option<&'a [u8]> {
        let out = self.peek(len)?;
        self.pos += len;
        Some(out)
    }

    /// Bytes `[pos, pos + len)` without moving, or `None` past `end`.
    pub fn peek(&self, len: usize) -> Option<&'a [u8]> {
        let stop = self.pos.checked_add(len)?;
        if stop > self.end {
            return None;
        }
        self.data.get(self.pos..stop)
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;

    #[test]
    fn reads_stop_at_end_bound() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let mut cursor = Cursor::with_bounds(&data, 1, 4).expect("bounds are valid");
        assert_eq!(cursor.remaining(), 3);
        assert_eq!(cursor.read_exact(2), Some(&data[1..3]));
        assert_eq!(cursor.peek(2), None);
        assert_eq!(cursor.read_exact(1), Some(&data[3..4]));
        assert_eq!(cursor.read_exact(1), None);
        assert!(!cursor.advance(1));
    }

    #[test]
    fn rejects_bounds_outside_slice() {
        let data = [0u8; 4];
        assert!(Cursor::with_bounds(&data, 0, 5).is_none());
        assert!(Cursor::with_bounds(&data, 3, 2).is_none());
    }
}
