use super::constants::DEFAULT_MAX_HEADERS;
use super::error::DecodeError;
use crate::packet::{HeaderKind, HeaderStack, Packet, PrimaryHeaders};

/// Where in the buffer decoding starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartLayer {
    #[default]
    Ethernet,
    Ip,
}

/// Result of a decode that did not reject the packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    Ok,
    /// An EtherType or IP protocol with no parser; everything outside it
    /// was decoded and registered.
    UnknownUpperLayer,
}

#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Most headers one decode may register, capped by the packet's own
    /// header-stack capacity.
    pub max_depth: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_HEADERS,
        }
    }
}

/// State threaded through one recursive decode.
#[derive(Debug)]
pub struct DecodeContext {
    pub headers: HeaderStack,
    pub remaining_depth: usize,
    pub l2_header_bytes: usize,
    pub ip_bytes: Option<usize>,
    pub primary: PrimaryHeaders,
}

impl DecodeContext {
    pub fn new(headers: HeaderStack, max_depth: usize) -> Self {
        let remaining_depth = max_depth.min(headers.remaining());
        Self {
            headers,
            remaining_depth,
            l2_header_bytes: 0,
            ip_bytes: None,
            primary: PrimaryHeaders::default(),
        }
    }

    /// Appends one header and spends one unit of depth. Every level of
    /// recursion registers exactly one header, so this bounds tunnel nesting.
    pub fn register(
        &mut self,
        kind: HeaderKind,
        header_bytes: usize,
        total_bytes: usize,
    ) -> Result<usize, DecodeError> {
        if self.remaining_depth == 0 {
            return Err(DecodeError::TooManyHeaders(kind));
        }
        let index = self
            .headers
            .append(kind, header_bytes)
            .map_err(|_| DecodeError::TooManyHeaders(kind))?;
        if let Some(record) = self.headers.get_mut(index) {
            record.total_bytes = total_bytes;
        }
        self.remaining_depth -= 1;
        Ok(index)
    }

    pub fn innermost_kind(&self) -> Option<HeaderKind> {
        self.headers.innermost().map(|record| record.kind)
    }

    pub(crate) fn store(self, packet: &mut Packet) {
        packet.headers = self.headers;
        packet.l2_header_bytes = self.l2_header_bytes;
        packet.ip_bytes = self.ip_bytes;
        packet.primary = self.primary;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_budget_fails_before_stack_capacity() {
        let mut context = DecodeContext::new(HeaderStack::with_capacity(6), 2);
        context.register(HeaderKind::Ipv4, 20, 60).expect("depth left");
        context.register(HeaderKind::Gre, 4, 40).expect("depth left");
        assert_eq!(
            context.register(HeaderKind::Ipv4, 20, 36),
            Err(DecodeError::TooManyHeaders(HeaderKind::Ipv4))
        );
        assert_eq!(context.headers.len(), 2);
    }

    #[test]
    fn register_records_total_bytes() {
        let mut context = DecodeContext::new(HeaderStack::with_capacity(2), 8);
        assert_eq!(context.remaining_depth, 2);
        let index = context.register(HeaderKind::Udp, 8, 30).expect("depth left");
        let record = context.headers.get(index).expect("registered");
        assert_eq!(record.total_bytes, 30);
        assert_eq!(context.innermost_kind(), Some(HeaderKind::Udp));
    }
}
