use bytemuck::{Pod, Zeroable};
use positioned_io2::ReadAt;

use crate::signature::{format_guid, is_supported_guid, verify_signature};
use crate::util::ReadAtExt;
use crate::{Error, Result};

/// Volume boot sector as stored on disk. All multi-byte fields are
/// little-endian byte arrays so the layout has no padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawVolumeHeader {
    pub jump: [u8; 3],
    pub signature: [u8; 8],
    pub sector_size: [u8; 2],
    pub sectors_per_cluster: u8,
    pub reserved_clusters: [u8; 2],
    pub reserved0: [u8; 24], // legacy BPB fields, unused here
    pub total_sectors: [u8; 8],
    pub mft_start_cluster: [u8; 8],
    pub metadata_lcn: [u8; 8],
    pub reserved1: [u8; 96], // boot code area, unused here
    pub guid: [u8; 16],
    pub metadata_offsets: [[u8; 8]; 3],
    pub eow_offsets: [[u8; 8]; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeHeader {
    pub jump: [u8; 3],
    pub signature: [u8; 8],
    pub sector_size: u16,
    pub sectors_per_cluster: u8,
    pub reserved_clusters: u16,
    pub total_sectors: u64,
    pub mft_start_cluster: u64,
    pub metadata_lcn: u64,
    pub guid: [u8; 16],
    /// Metadata block offsets, relative to the start of the volume
    pub metadata_offsets: [u64; 3],
    /// Erase-on-write log offsets
    pub eow_offsets: [u64; 2],
}

impl VolumeHeader {
    pub const SIZE: usize = std::mem::size_of::<RawVolumeHeader>();
    pub const MIN_SECTOR_SIZE: u16 = 512;

    /// Decodes and validates the header at position 0 of `reader`.
    pub fn read<R: ReadAt + ?Sized>(reader: &R) -> Result<Self> {
        let header = Self::from(reader.read_pod_at::<RawVolumeHeader>(0)?);
        header.validate()?;
        Ok(header)
    }

    pub fn validate(&self) -> Result<()> {
        if !verify_signature(&self.signature) {
            return Err(Error::BadSignature(self.signature));
        }

        if self.sector_size < Self::MIN_SECTOR_SIZE || !self.sector_size.is_power_of_two() {
            return Err(Error::InvalidSectorSize(self.sector_size));
        }

        if !is_supported_guid(&self.guid) {
            return Err(Error::UnsupportedGuid(self.guid_string()));
        }

        Ok(())
    }

    pub fn guid_string(&self) -> String {
        format_guid(&self.guid)
    }
}

impl From<RawVolumeHeader> for VolumeHeader {
    fn from(raw: RawVolumeHeader) -> Self {
        Self {
            jump: raw.jump,
            signature: raw.signature,
            sector_size: u16::from_le_bytes(raw.sector_size),
            sectors_per_cluster: raw.sectors_per_cluster,
            reserved_clusters: u16::from_le_bytes(raw.reserved_clusters),
            total_sectors: u64::from_le_bytes(raw.total_sectors),
            mft_start_cluster: u64::from_le_bytes(raw.mft_start_cluster),
            metadata_lcn: u64::from_le_bytes(raw.metadata_lcn),
            guid: raw.guid,
            metadata_offsets: raw.metadata_offsets.map(u64::from_le_bytes),
            eow_offsets: raw.eow_offsets.map(u64::from_le_bytes),
        }
    }
}
