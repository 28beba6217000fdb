use crate::header::VolumeHeader;
use crate::metadata::ValidatedBlock;

/// A byte range, relative to the start of the volume, that will be overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraseRegion {
    pub label: String,
    pub offset: u64,
    pub len: u64,
}

/// Rounds `size` up to the next multiple of `sector_size`, which must be a
/// power of two.
pub fn round_up_to_sector(size: u64, sector_size: u64) -> u64 {
    debug_assert!(sector_size.is_power_of_two());
    (size + sector_size - 1) & !(sector_size - 1)
}

/// Lists the regions holding key material: the volume header sector, then the
/// three metadata block copies.
///
/// Offsets come from the last validated block, and every copy is erased with
/// that block's sector-rounded size. The copies are not cross-checked against
/// each other.
pub fn plan_erase(header: &VolumeHeader, last_valid: &ValidatedBlock) -> Vec<EraseRegion> {
    let sector_size = u64::from(header.sector_size);
    let block_len = round_up_to_sector(last_valid.encoded_size, sector_size);

    let mut regions = Vec::with_capacity(1 + last_valid.block.metadata_offsets.len());
    regions.push(EraseRegion {
        label: "volume header".to_string(),
        offset: 0,
        len: sector_size,
    });
    regions.extend(
        last_valid
            .block
            .metadata_offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| EraseRegion {
                label: format!("metadata block {i}"),
                offset,
                len: block_len,
            }),
    );
    regions
}
