use positioned_io2::WriteAt;
use rand::RngCore;
use tracing::{error, info};

use crate::Result;
use crate::plan::EraseRegion;

#[derive(Debug, Default)]
pub struct WipeReport {
    pub overwritten: Vec<EraseRegion>,
    pub failed: Vec<(EraseRegion, std::io::Error)>,
    pub flush_error: Option<std::io::Error>,
}

impl WipeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.flush_error.is_none()
    }
}

/// Overwrites each region in order with fresh random bytes.
///
/// A failed write is recorded and the next region is still attempted. A
/// failing random source aborts the whole wipe with [`crate::Error::Entropy`].
pub fn wipe_regions<W, R>(device: &mut W, regions: &[EraseRegion], rng: &mut R) -> Result<WipeReport>
where
    W: WriteAt + ?Sized,
    R: RngCore + ?Sized,
{
    let mut report = WipeReport::default();

    for region in regions {
        let len = match usize::try_from(region.len) {
            Ok(len) => len,
            Err(_) => {
                let err = std::io::Error::other("region does not fit in memory");
                error!("unable to write {}: {err}", region.label);
                report.failed.push((region.clone(), err));
                continue;
            }
        };

        let mut buf = vec![0u8; len];
        rng.try_fill_bytes(&mut buf)?;

        info!(
            "overwriting {} at offset {:#x} size {}...",
            region.label, region.offset, region.len
        );

        match device.write_all_at(region.offset, &buf) {
            Ok(()) => report.overwritten.push(region.clone()),
            Err(err) => {
                error!("unable to write {}: {err}", region.label);
                report.failed.push((region.clone(), err));
            }
        }
    }

    if let Err(err) = device.flush() {
        error!("unable to flush device: {err}");
        report.flush_error = Some(err);
    }

    Ok(report)
}
