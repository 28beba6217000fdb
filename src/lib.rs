use positioned_io2::{ReadAt, WriteAt};
use rand::RngCore;
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::{info, warn};

pub use crate::config::Options;
pub use crate::header::VolumeHeader;
pub use crate::metadata::{MetadataBlock, ValidatedBlock};
pub use crate::plan::{EraseRegion, plan_erase, round_up_to_sector};
pub use crate::signature::{FVE_INFO_GUID, FVE_SIGNATURE, format_guid, verify_signature};
pub use crate::slice::VolumeSlice;
pub use crate::wipe::{WipeReport, wipe_regions};

pub mod config;
pub mod header;
pub mod metadata;
pub mod plan;
pub mod signature;
pub mod slice;
#[cfg(test)]
mod testutil;
mod util;
pub mod wipe;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid signature \"{}\"", .0.escape_ascii())]
    BadSignature([u8; 8]),
    #[error("unknown version {0:#x}")]
    UnsupportedVersion(u16),
    #[error("size too small ({0} bytes)")]
    SizeTooSmall(u64),
    #[error("short read")]
    ShortRead,
    #[error("validation checksum mismatch: stored {stored:08x}, computed {computed:08x}")]
    ChecksumMismatch { stored: u32, computed: u32 },
    #[error("weird sector size: {0}")]
    InvalidSectorSize(u16),
    #[error("unsupported GUID {0}")]
    UnsupportedGuid(String),
    #[error("invalid or no metadata blocks found")]
    NoValidMetadata,
    #[error("unable to generate random bytes: {0}")]
    Entropy(#[from] rand::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of decoding one metadata block candidate.
#[derive(Debug)]
pub struct BlockProbe {
    pub index: usize,
    pub offset: u64,
    pub outcome: Result<ValidatedBlock>,
}

#[derive(Debug)]
pub struct Report {
    pub header: VolumeHeader,
    pub blocks: Vec<BlockProbe>,
    /// Empty unless a wipe was requested
    pub plan: Vec<EraseRegion>,
    pub wipe: Option<WipeReport>,
}

impl Report {
    pub fn last_valid(&self) -> Option<&ValidatedBlock> {
        last_valid(&self.blocks)
    }
}

fn last_valid(blocks: &[BlockProbe]) -> Option<&ValidatedBlock> {
    blocks.iter().rev().find_map(|probe| probe.outcome.as_ref().ok())
}

/// Validates the volume at `options.offset` and, if requested, wipes its key
/// material using the operating system's random source.
pub fn run<D>(device: &mut D, options: &Options) -> Result<Report>
where
    D: ReadAt + WriteAt + ?Sized,
{
    run_with_rng(device, options, &mut OsRng)
}

pub fn run_with_rng<D, R>(device: &mut D, options: &Options, rng: &mut R) -> Result<Report>
where
    D: ReadAt + WriteAt + ?Sized,
    R: RngCore + ?Sized,
{
    let mut volume = VolumeSlice::new(device, options.offset);

    let header = VolumeHeader::read(&volume)?;
    for (i, offset) in header.metadata_offsets.iter().enumerate() {
        info!("metadata offset {i}: {offset:#010x}");
    }
    if options.verbose {
        info!("volume header:\n{header:#x?}");
    }

    let sector_size = u64::from(header.sector_size);
    let mut blocks = Vec::with_capacity(header.metadata_offsets.len());
    for (index, &offset) in header.metadata_offsets.iter().enumerate() {
        let outcome = MetadataBlock::read(&volume, offset);
        match &outcome {
            Ok(valid) => {
                let size = round_up_to_sector(valid.encoded_size, sector_size);
                if options.verbose {
                    info!("metadata block {index} (size {size}):\n{:#x?}", valid.block);
                } else {
                    info!("metadata block {index} (size {size}): parsed OK");
                }
            }
            Err(err) => warn!("can't parse metadata block {index}: {err}"),
        }
        blocks.push(BlockProbe {
            index,
            offset,
            outcome,
        });
    }

    let last = last_valid(&blocks).ok_or(Error::NoValidMetadata)?;
    if !options.wipe {
        return Ok(Report {
            header,
            blocks,
            plan: Vec::new(),
            wipe: None,
        });
    }

    let plan = plan_erase(&header, last);
    let wipe = wipe_regions(&mut volume, &plan, rng)?;

    Ok(Report {
        header,
        blocks,
        plan,
        wipe: Some(wipe),
    })
}
