pub const MAX_INPUT_SIZE: usize = 64 * 1024;

/// Caps fuzzer input to keep pathological buffers from dominating a run.
#[inline]
pub fn truncate(data: &[u8]) -> &[u8] {
    &data[..data.len().min(MAX_INPUT_SIZE)]
}
