use crate::hyperspectral::common::error::Result;
use crate::hyperspectral::raw::types::RawImageData;

pub trait RawImageReader {
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData>;
}
