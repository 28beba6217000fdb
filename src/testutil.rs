//! Builders for synthetic volume images used by the unit tests.

use crate::signature::FVE_SIGNATURE;

/// `4967D63B-2E29-4AD8-8399-F6A339E3D001` in on-disk byte order.
pub(crate) const FVE_GUID_BYTES: [u8; 16] = [
    0x3B, 0xD6, 0x67, 0x49, 0x29, 0x2E, 0xD8, 0x4A, 0x83, 0x99, 0xF6, 0xA3, 0x39, 0xE3, 0xD0, 0x01,
];

pub(crate) const TOTAL_SECTORS: u64 = 0x10_0000;
pub(crate) const EOW_OFFSETS: [u64; 2] = [0x2_0000, 0x3_0000];
pub(crate) const VOLUME_SIZE: u64 = TOTAL_SECTORS * 512;

/// One sector holding a volume header.
pub(crate) fn volume_header(sector_size: u16, metadata_offsets: [u64; 3]) -> Vec<u8> {
    let mut sector = vec![0u8; usize::from(sector_size).max(512)];
    sector[0..3].copy_from_slice(&[0xEB, 0x58, 0x90]);
    sector[3..11].copy_from_slice(&FVE_SIGNATURE);
    sector[11..13].copy_from_slice(&sector_size.to_le_bytes());
    sector[13] = 8;
    sector[0x28..0x30].copy_from_slice(&TOTAL_SECTORS.to_le_bytes());
    sector[0xA0..0xB0].copy_from_slice(&FVE_GUID_BYTES);
    for (i, offset) in metadata_offsets.iter().enumerate() {
        let at = 0xB0 + i * 8;
        sector[at..at + 8].copy_from_slice(&offset.to_le_bytes());
    }
    for (i, offset) in EOW_OFFSETS.iter().enumerate() {
        let at = 0xC8 + i * 8;
        sector[at..at + 8].copy_from_slice(&offset.to_le_bytes());
    }
    sector
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct BlockSpec {
    pub version: u16,
    pub raw_size: u16,
    pub offsets: [u64; 3],
    pub extra_size: u16,
}

impl BlockSpec {
    pub fn v1(raw_size: u16) -> Self {
        Self {
            version: 1,
            raw_size,
            offsets: [0x4000, 0x40000, 0x80000],
            extra_size: 0,
        }
    }

    fn payload_len(&self) -> usize {
        match self.version {
            2 => usize::from(self.raw_size) * 16,
            _ => usize::from(self.raw_size),
        }
    }
}

/// Payload followed by a validation footer with a correct CRC-32.
pub(crate) fn metadata_block(spec: &BlockSpec) -> Vec<u8> {
    let len = spec.payload_len().max(64);
    let mut payload: Vec<u8> = (0..len).map(|i| (i * 7 + 3) as u8).collect();
    payload[0..8].copy_from_slice(&FVE_SIGNATURE);
    payload[8..10].copy_from_slice(&spec.raw_size.to_le_bytes());
    payload[10..12].copy_from_slice(&spec.version.to_le_bytes());
    payload[12..16].fill(0);
    payload[16..24].copy_from_slice(&VOLUME_SIZE.to_le_bytes());
    payload[24..28].copy_from_slice(&0u32.to_le_bytes());
    payload[28..32].copy_from_slice(&16u32.to_le_bytes());
    for (i, offset) in spec.offsets.iter().enumerate() {
        let at = 32 + i * 8;
        payload[at..at + 8].copy_from_slice(&offset.to_le_bytes());
    }
    payload[56..64].copy_from_slice(&0x1_0000u64.to_le_bytes());

    let crc = crc32fast::hash(&payload);
    payload.extend_from_slice(&spec.extra_size.to_le_bytes());
    payload.extend_from_slice(&spec.version.to_le_bytes());
    payload.extend_from_slice(&crc.to_le_bytes());
    payload
}

/// Copies `bytes` into `image` at `at`, growing it as needed.
pub(crate) fn put(image: &mut Vec<u8>, at: u64, bytes: &[u8]) {
    let at = at as usize;
    if image.len() < at + bytes.len() {
        image.resize(at + bytes.len(), 0);
    }
    image[at..at + bytes.len()].copy_from_slice(bytes);
}
