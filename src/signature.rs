use uuid::Uuid;

/// Magic shared by the volume header and every metadata block.
pub const FVE_SIGNATURE: [u8; 8] = *b"-FVE-FS-";

/// Format identifier of the only supported metadata layout.
pub const FVE_INFO_GUID: &str = "4967D63B-2E29-4AD8-8399-F6A339E3D001";

pub fn verify_signature(signature: &[u8; 8]) -> bool {
    *signature == FVE_SIGNATURE
}

/// Renders an on-disk GUID in its canonical upper-case form.
///
/// The first three fields are stored little-endian, the trailing eight bytes
/// are printed in storage order.
pub fn format_guid(raw: &[u8; 16]) -> String {
    format!("{:X}", Uuid::from_bytes_le(*raw).hyphenated())
}

pub fn is_supported_guid(raw: &[u8; 16]) -> bool {
    format_guid(raw).eq_ignore_ascii_case(FVE_INFO_GUID)
}
