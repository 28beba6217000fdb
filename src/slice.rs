use positioned_io2::{ReadAt, WriteAt};

/// Positional view of a device that starts `base` bytes into it.
///
/// Every structure offset recorded on disk is relative to the start of the
/// volume, so all decoding and wiping goes through this window.
pub struct VolumeSlice<'a, D: ?Sized> {
    inner: &'a mut D,
    base: u64,
}

impl<'a, D: ?Sized> VolumeSlice<'a, D> {
    pub fn new(inner: &'a mut D, base: u64) -> Self {
        Self { inner, base }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    fn absolute(&self, pos: u64) -> std::io::Result<u64> {
        self.base.checked_add(pos).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "position overflows the device",
            )
        })
    }
}

impl<D: ReadAt + ?Sized> ReadAt for VolumeSlice<'_, D> {
    fn read_at(&self, pos: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        let pos = self.absolute(pos)?;
        self.inner.read_at(pos, buf)
    }
}

impl<D: WriteAt + ?Sized> WriteAt for VolumeSlice<'_, D> {
    fn write_at(&mut self, pos: u64, buf: &[u8]) -> std::io::Result<usize> {
        let pos = self.absolute(pos)?;
        self.inner.write_at(pos, buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
