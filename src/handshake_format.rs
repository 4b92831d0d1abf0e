//! Hand-packed handshake frames for poking at a running study server.
//!
//! The wire format is fixed-width and big-endian: a 2-byte command code,
//! optionally followed by a 4-byte length-prefixed byte string, optionally
//! followed by further 32-bit integer fields. [`FrameBuilder`] assembles a
//! frame field by field; the free functions below build the three frames
//! the manual probes actually send.

/// Command code announcing a headset client.
pub const CMD_IDENT_HEADSET: u16 = 0;

/// Command code announcing a tablet client, with the address of the
/// headset it pairs with as payload.
pub const CMD_IDENT_TABLET: u16 = 1;

/// Command code asking the server to open a dataset by name.
pub const CMD_OPEN_DATASET: u16 = 3;

/// Assembles one handshake frame in wire order.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    buf: Vec<u8>,
}

impl FrameBuilder {
    /// Start a frame with its 2-byte command code.
    pub fn new(code: u16) -> Self {
        Self {
            buf: code.to_be_bytes().to_vec(),
        }
    }

    /// Append a length-prefixed byte string: a 4-byte length then the
    /// bytes themselves.
    pub fn push_bytes(mut self, payload: &[u8]) -> Self {
        self.buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        self.buf.extend_from_slice(payload);
        self
    }

    /// Append one fixed-width 32-bit integer field.
    pub fn push_u32(mut self, value: u32) -> Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// The finished frame.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// The frame a headset sends on connecting: just its command code.
pub fn headset_ident() -> Vec<u8> {
    FrameBuilder::new(CMD_IDENT_HEADSET).into_bytes()
}

/// The frame a tablet sends on connecting, naming the headset it pairs
/// with by address.
pub fn tablet_ident(headset_addr: &str) -> Vec<u8> {
    FrameBuilder::new(CMD_IDENT_TABLET)
        .push_bytes(headset_addr.as_bytes())
        .into_bytes()
}

/// The frame asking the server to open a dataset: the dataset name, then
/// the trailing integer fields the open message carries.
pub fn open_dataset(name: &str, fields: &[u32]) -> Vec<u8> {
    let mut builder = FrameBuilder::new(CMD_OPEN_DATASET).push_bytes(name.as_bytes());
    for &field in fields {
        builder = builder.push_u32(field);
    }
    builder.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headset_ident_is_just_the_code() {
        assert_eq!(headset_ident(), vec![0x00, 0x00]);
    }

    #[test]
    fn tablet_ident_length_prefixes_the_address() {
        let frame = tablet_ident("127.0.0.1");
        let mut expected = vec![0x00, 0x01, 0x00, 0x00, 0x00, 0x09];
        expected.extend_from_slice(b"127.0.0.1");
        assert_eq!(frame, expected);
    }

    #[test]
    fn open_dataset_appends_the_integer_fields() {
        let frame = open_dataset("a.vtk", &[1, 1, 0]);

        assert_eq!(frame.len(), 2 + 4 + 5 + 3 * 4);
        assert_eq!(&frame[0..2], &[0x00, 0x03]);
        assert_eq!(&frame[2..6], &5u32.to_be_bytes());
        assert_eq!(&frame[6..11], b"a.vtk");
        assert_eq!(&frame[11..15], &1u32.to_be_bytes());
        assert_eq!(&frame[15..19], &1u32.to_be_bytes());
        assert_eq!(&frame[19..23], &0u32.to_be_bytes());
    }
}
