/// Run settings, built once by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Byte offset of the volume inside the device
    pub offset: u64,
    /// Dump decoded structures
    pub verbose: bool,
    /// Overwrite key material after validation
    pub wipe: bool,
}
