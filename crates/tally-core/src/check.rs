//! The single assertion primitive

/// Panic with "assertion failed" unless `ok` is true
///
/// The executor turns the panic into a recorded failure.
#[track_caller]
pub fn check(ok: bool) {
    if !ok {
        panic!("assertion failed");
    }
}
