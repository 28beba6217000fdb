//! Synthetic FVE volume images written to temporary files.

#![allow(dead_code)]

use std::io::{Seek, SeekFrom, Write};

use tempfile::NamedTempFile;

pub const FVE_GUID_BYTES: [u8; 16] = [
    0x3B, 0xD6, 0x67, 0x49, 0x29, 0x2E, 0xD8, 0x4A, 0x83, 0x99, 0xF6, 0xA3, 0x39, 0xE3, 0xD0, 0x01,
];

pub const OFFSETS: [u64; 3] = [0x4000, 0x40000, 0x80000];

pub fn volume_header(sector_size: u16, offsets: [u64; 3]) -> Vec<u8> {
    let mut sector = vec![0u8; usize::from(sector_size).max(512)];
    sector[3..11].copy_from_slice(b"-FVE-FS-");
    sector[11..13].copy_from_slice(&sector_size.to_le_bytes());
    sector[0xA0..0xB0].copy_from_slice(&FVE_GUID_BYTES);
    for (i, offset) in offsets.iter().enumerate() {
        let at = 0xB0 + i * 8;
        sector[at..at + 8].copy_from_slice(&offset.to_le_bytes());
    }
    sector
}

/// A version 1 block of `size` bytes plus its footer.
pub fn metadata_block(size: u16, offsets: [u64; 3], extra_size: u16) -> Vec<u8> {
    let mut block: Vec<u8> = (0..usize::from(size)).map(|i| (i % 251) as u8).collect();
    block[0..8].copy_from_slice(b"-FVE-FS-");
    block[8..10].copy_from_slice(&size.to_le_bytes());
    block[10..12].copy_from_slice(&1u16.to_le_bytes());
    for (i, offset) in offsets.iter().enumerate() {
        let at = 32 + i * 8;
        block[at..at + 8].copy_from_slice(&offset.to_le_bytes());
    }
    let crc = crc32fast::hash(&block);
    block.extend_from_slice(&extra_size.to_le_bytes());
    block.extend_from_slice(&1u16.to_le_bytes());
    block.extend_from_slice(&crc.to_le_bytes());
    block
}

/// Flips the stored checksum so the block no longer validates.
pub fn break_checksum(block: &mut [u8]) {
    let at = block.len() - 4;
    block[at] ^= 0xFF;
}

pub struct Image {
    pub file: NamedTempFile,
    pub len: u64,
}

impl Image {
    pub fn new(len: u64) -> Self {
        let file = NamedTempFile::new().expect("Failed to create temp file");
        file.as_file().set_len(len).expect("Failed to size temp file");
        Self { file, len }
    }

    pub fn put(&mut self, at: u64, bytes: &[u8]) {
        let f = self.file.as_file_mut();
        f.seek(SeekFrom::Start(at)).unwrap();
        f.write_all(bytes).unwrap();
    }

    pub fn contents(&self) -> Vec<u8> {
        std::fs::read(self.file.path()).unwrap()
    }
}
