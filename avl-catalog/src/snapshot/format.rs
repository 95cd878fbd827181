use crate::common::{SNAPSHOT_HEADER_SIZE, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
use crate::errors::{CatalogError, CatalogResult, ErrorKind};

/// Fixed 16-byte header at the start of every snapshot.
///
/// All multi-byte integers are little-endian.
///
/// ```text
/// [0..4]   magic       b"AVLC"
/// [4]      version     u8 = 1
/// [5..8]   reserved    [u8; 3], zero
/// [8..12]  node_count  u32 le
/// [12..16] checksum    u32 le  (CRC32 of the payload)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SnapshotHeader {
    pub(crate) node_count: u32,
    pub(crate) checksum: u32,
}

impl SnapshotHeader {
    pub(crate) const SIZE: usize = SNAPSHOT_HEADER_SIZE;

    pub(crate) fn for_payload(node_count: u32, payload: &[u8]) -> Self {
        SnapshotHeader {
            node_count,
            checksum: crc32fast::hash(payload),
        }
    }

    pub(crate) fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(SNAPSHOT_MAGIC);
        buf[4] = SNAPSHOT_VERSION;
        buf[8..12].copy_from_slice(&self.node_count.to_le_bytes());
        buf[12..16].copy_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    /// Splits `bytes` into its header and payload.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::CorruptSnapshot`] when the blob is shorter than a header,
    /// the magic is wrong, the version is not one this build reads, or the
    /// reserved bytes are not zero.
    pub(crate) fn split(bytes: &[u8]) -> CatalogResult<(Self, &[u8])> {
        if bytes.len() < Self::SIZE {
            return Err(corrupt(&format!(
                "Snapshot is {} bytes, shorter than its {} byte header",
                bytes.len(),
                Self::SIZE
            )));
        }
        let (head, payload) = bytes.split_at(Self::SIZE);

        if head.get(0..4) != Some(SNAPSHOT_MAGIC.as_ref()) {
            return Err(corrupt("Snapshot magic bytes do not match"));
        }
        match head.get(4).copied() {
            Some(SNAPSHOT_VERSION) => {}
            Some(other) => {
                return Err(corrupt(&format!(
                    "Unsupported snapshot version {}, expected {}",
                    other, SNAPSHOT_VERSION
                )))
            }
            None => return Err(corrupt("Snapshot header has no version byte")),
        }
        if head.get(5..8) != Some([0u8; 3].as_ref()) {
            return Err(corrupt("Snapshot header reserved bytes are not zero"));
        }

        let header = SnapshotHeader {
            node_count: read_u32(head, 8)?,
            checksum: read_u32(head, 12)?,
        };
        Ok((header, payload))
    }

    pub(crate) fn verify(&self, payload: &[u8]) -> CatalogResult<()> {
        let actual = crc32fast::hash(payload);
        if actual != self.checksum {
            return Err(corrupt(&format!(
                "Snapshot checksum mismatch: header says {:#010x}, payload hashes to {:#010x}",
                self.checksum, actual
            )));
        }
        Ok(())
    }
}

fn read_u32(buf: &[u8], offset: usize) -> CatalogResult<u32> {
    buf.get(offset..offset + 4)
        .and_then(|slice| slice.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| corrupt("Snapshot header is truncated"))
}

pub(crate) fn corrupt(message: &str) -> CatalogError {
    CatalogError::new(message, ErrorKind::CorruptSnapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout() {
        let header = SnapshotHeader {
            node_count: 3,
            checksum: 0xDEADBEEF,
        };
        let buf = header.encode();
        assert_eq!(&buf[0..4], b"AVLC");
        assert_eq!(buf[4], 1);
        assert_eq!(&buf[5..8], &[0, 0, 0]);
        assert_eq!(&buf[8..12], &3u32.to_le_bytes());
        assert_eq!(&buf[12..16], &0xDEADBEEFu32.to_le_bytes());
    }

    #[test]
    fn split_returns_header_and_payload() {
        let payload = [7u8, 8, 9];
        let mut blob = SnapshotHeader::for_payload(1, &payload).encode().to_vec();
        blob.extend_from_slice(&payload);

        let (header, rest) = SnapshotHeader::split(&blob).unwrap();
        assert_eq!(header.node_count, 1);
        assert_eq!(rest, &payload);
        header.verify(rest).unwrap();
    }

    #[test]
    fn short_blob_is_corrupt() {
        let err = SnapshotHeader::split(b"AVLC").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::CorruptSnapshot);
    }

    #[test]
    fn bad_magic_is_corrupt() {
        let mut blob = SnapshotHeader::for_payload(0, &[]).encode();
        blob[0] = b'X';
        let err = SnapshotHeader::split(&blob).unwrap_err();
        assert!(err.message().contains("magic"));
    }

    #[test]
    fn nonzero_reserved_byte_is_corrupt() {
        for offset in 5..8 {
            let mut blob = SnapshotHeader::for_payload(0, &[]).encode();
            blob[offset] = 0xAB;
            let err = SnapshotHeader::split(&blob).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CorruptSnapshot);
            assert!(err.message().contains("reserved"));
        }
    }

    #[test]
    fn unknown_version_is_corrupt() {
        let mut blob = SnapshotHeader::for_payload(0, &[]).encode();
        blob[4] = 9;
        let err = SnapshotHeader::split(&blob).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::CorruptSnapshot);
        assert!(err.message().contains("version 9"));
    }

    #[test]
    fn checksum_mismatch_is_corrupt() {
        let header = SnapshotHeader::for_payload(0, b"abc");
        let err = header.verify(b"abd").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::CorruptSnapshot);
    }
}
