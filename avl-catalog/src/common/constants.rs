// snapshot constants
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"AVLC";
pub const SNAPSHOT_VERSION: u8 = 1;
pub const SNAPSHOT_HEADER_SIZE: usize = 16;

// config defaults
pub const DEFAULT_MAX_SNAPSHOT_BYTES: usize = 64 * 1024 * 1024;

// Compile-time assertion that the header fits magic, version, reserved, count and checksum
const _: () = {
    const LAYOUT: usize = 4 + 1 + 3 + 4 + 4;
    const _: [(); 1] = [(); (LAYOUT == SNAPSHOT_HEADER_SIZE) as usize];
};

pub const CATALOG_VERSION: &str = env!("CARGO_PKG_VERSION");
