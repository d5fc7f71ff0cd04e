//! Target API levels and the thresholds that gate language features.

/// Lowest SDK level the compiler accepts at all.
pub const MINIMUM_TARGET_API: u32 = 11;

/// First SDK level whose runtime can marshal kernel signatures with gaps in
/// the role order. Below this level a signature may only truncate the role
/// list from the end.
pub const FLEXIBLE_SIGNATURE_API: u32 = 14;

/// First SDK level that can launch compute kernels other than `root`.
pub const NAMED_KERNEL_API: u32 = 16;

/// The SDK level a module declares it is compiled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetApi(pub u32);

impl TargetApi {
    /// Whether kernel signatures may omit a role while providing a later
    /// one (see [`FLEXIBLE_SIGNATURE_API`]).
    pub fn allows_role_skipping(self) -> bool {
        self.0 >= FLEXIBLE_SIGNATURE_API
    }

    /// Whether compute kernels may have names other than `root` (see
    /// [`NAMED_KERNEL_API`]).
    pub fn allows_named_kernels(self) -> bool {
        self.0 >= NAMED_KERNEL_API
    }
}
