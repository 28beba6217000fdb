use bytemuck::{Pod, Zeroable};
use positioned_io2::ReadAt;

use crate::signature::verify_signature;
use crate::util::ReadAtExt;
use crate::{Error, Result};

/// Smallest payload that can hold a complete [`RawMetadataBlock`].
pub const MIN_BLOCK_SIZE: u64 = std::mem::size_of::<RawMetadataBlock>() as u64;

/// Largest payload a 16-bit size field can describe under any known version.
pub const MAX_BLOCK_SIZE: u64 = u16::MAX as u64 * 16;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawBlockHeader {
    pub signature: [u8; 8],
    pub size: [u8; 2],
    pub version: [u8; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawValidationFooter {
    pub extra_size: [u8; 2],
    pub version: [u8; 2],
    pub crc32: [u8; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawMetadataBlock {
    pub header: RawBlockHeader,
    pub reserved: [u8; 4],
    pub volume_size: [u8; 8],
    pub convert_size: [u8; 4],
    pub header_sectors: [u8; 4],
    pub metadata_offsets: [[u8; 8]; 3],
    pub header_sectors_offset: [u8; 8],
}

/// Interpretation of the block header's size field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockVersion {
    /// Size is in bytes
    V1,
    /// Size is in 16-byte units
    V2,
}

impl BlockVersion {
    const fn size_unit(self) -> u64 {
        match self {
            BlockVersion::V1 => 1,
            BlockVersion::V2 => 16,
        }
    }

    pub fn byte_size(self, raw_size: u16) -> u64 {
        raw_size as u64 * self.size_unit()
    }
}

impl TryFrom<u16> for BlockVersion {
    type Error = Error;

    fn try_from(version: u16) -> Result<Self> {
        match version {
            1 => Ok(BlockVersion::V1),
            2 => Ok(BlockVersion::V2),
            v => Err(Error::UnsupportedVersion(v)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataBlockHeader {
    pub signature: [u8; 8],
    pub size: u16,
    pub version: u16,
}

impl MetadataBlockHeader {
    /// Payload size in bytes, header included.
    pub fn byte_size(&self) -> Result<u64> {
        Ok(BlockVersion::try_from(self.version)?.byte_size(self.size))
    }
}

impl From<RawBlockHeader> for MetadataBlockHeader {
    fn from(raw: RawBlockHeader) -> Self {
        Self {
            signature: raw.signature,
            size: u16::from_le_bytes(raw.size),
            version: u16::from_le_bytes(raw.version),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationFooter {
    pub extra_size: u16,
    pub version: u16,
    pub checksum: u32,
}

impl From<RawValidationFooter> for ValidationFooter {
    fn from(raw: RawValidationFooter) -> Self {
        Self {
            extra_size: u16::from_le_bytes(raw.extra_size),
            version: u16::from_le_bytes(raw.version),
            checksum: u32::from_le_bytes(raw.crc32),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataBlock {
    pub header: MetadataBlockHeader,
    pub volume_size: u64,
    pub convert_size: u32,
    pub header_sectors: u32,
    /// This copy's view of where all three metadata blocks live
    pub metadata_offsets: [u64; 3],
    pub header_sectors_offset: u64,
}

impl From<RawMetadataBlock> for MetadataBlock {
    fn from(raw: RawMetadataBlock) -> Self {
        Self {
            header: raw.header.into(),
            volume_size: u64::from_le_bytes(raw.volume_size),
            convert_size: u32::from_le_bytes(raw.convert_size),
            header_sectors: u32::from_le_bytes(raw.header_sectors),
            metadata_offsets: raw.metadata_offsets.map(u64::from_le_bytes),
            header_sectors_offset: u64::from_le_bytes(raw.header_sectors_offset),
        }
    }
}

/// A metadata block whose checksum has been verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedBlock {
    pub block: MetadataBlock,
    pub footer: ValidationFooter,
    /// Payload size plus the footer's extra size
    pub encoded_size: u64,
    pub checksum: u32,
}

impl MetadataBlock {
    /// Decodes the block at `offset` and verifies its CRC-32 before
    /// interpreting any field past the 12-byte header.
    pub fn read<R: ReadAt + ?Sized>(reader: &R, offset: u64) -> Result<ValidatedBlock> {
        let header = MetadataBlockHeader::from(reader.read_pod_at::<RawBlockHeader>(offset)?);
        if !verify_signature(&header.signature) {
            return Err(Error::BadSignature(header.signature));
        }

        let size = header.byte_size()?;
        if size < MIN_BLOCK_SIZE {
            return Err(Error::SizeTooSmall(size));
        }
        debug_assert!(size <= MAX_BLOCK_SIZE);

        // the size field counts the header, so the payload starts at `offset` again
        let payload = reader.read_vec_at(offset, size as usize)?;
        let footer_offset = offset.checked_add(size).ok_or(Error::ShortRead)?;
        let footer =
            ValidationFooter::from(reader.read_pod_at::<RawValidationFooter>(footer_offset)?);

        let computed = crc32fast::hash(&payload);
        if computed != footer.checksum {
            return Err(Error::ChecksumMismatch {
                stored: footer.checksum,
                computed,
            });
        }

        let raw: RawMetadataBlock =
            bytemuck::pod_read_unaligned(&payload[..std::mem::size_of::<RawMetadataBlock>()]);

        Ok(ValidatedBlock {
            block: raw.into(),
            footer,
            encoded_size: size + footer.extra_size as u64,
            checksum: computed,
        })
    }
}
