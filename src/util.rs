use positioned_io2::ReadAt;

use crate::{Error, Result};

pub trait ReadAtExt {
    fn read_pod_at<T: bytemuck::Pod>(&self, offset: u64) -> Result<T>;
    fn read_vec_at(&self, offset: u64, len: usize) -> Result<Vec<u8>>;
}

impl<R: ReadAt + ?Sized> ReadAtExt for R {
    fn read_pod_at<T: bytemuck::Pod>(&self, offset: u64) -> Result<T> {
        let mut value = T::zeroed();
        self.read_exact_at(offset, bytemuck::bytes_of_mut(&mut value))
            .map_err(eof_as_short_read)?;
        Ok(value)
    }

    fn read_vec_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_exact_at(offset, &mut buf)
            .map_err(eof_as_short_read)?;
        Ok(buf)
    }
}

fn eof_as_short_read(err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::ShortRead
    } else {
        Error::Io(err)
    }
}
