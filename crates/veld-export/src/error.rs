use thiserror::Error;

/// Everything the kernel export pass can find wrong with a declaration.
///
/// Variants carry the names their rendered message needs. The pass records
/// every violation it encounters rather than stopping at the first one, so
/// a single declaration can accumulate several of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// The kernel consumes nothing and produces nothing.
    #[error("compute kernel {kernel}() must have at least one input or output buffer parameter")]
    MissingRequiredBuffer { kernel: String },

    /// A parameter past the pointer roles is not an unsigned scalar.
    #[error("unexpected compute kernel {kernel}() parameter '{param}' of type '{type_name}'")]
    UnsupportedParameterType {
        kernel: String,
        param: String,
        type_name: String,
    },

    /// A coordinate slot was claimed twice, or `x` was named after `y` had
    /// already locked it out.
    #[error("duplicate parameter entry (by position or name): '{param}'")]
    DuplicateOrMisorderedParameter { param: String },

    /// More scalar parameters than there are coordinate slots.
    #[error("too many parameters for compute kernel {kernel}(): no role left for '{param}'")]
    UnexpectedExtraParameter { kernel: String, param: String },

    /// The signature mask leaves a gap in the role order, which the target
    /// SDK range cannot marshal.
    #[error("compute kernel {kernel}() targeting SDK levels {min}-{max} may not skip parameters")]
    SkipNotAllowed { kernel: String, min: u32, max: u32 },

    /// The target SDK range only launches kernels named `root`.
    #[error("non-root compute kernel {kernel}() is not supported in SDK levels {min}-{max}")]
    UnsupportedKernelForm { kernel: String, min: u32, max: u32 },

    #[error("{function}(void) is required to have no parameters")]
    ArityMismatch { function: String },

    #[error("{function}() is required to return {expected}")]
    ReturnTypeMismatch {
        function: String,
        expected: &'static str,
    },

    #[error("invalid parameter type for legacy graphics root() function: '{type_name}'")]
    InvalidParameterType { type_name: String },

    /// The user-data payload cannot be reflected; the function is dropped.
    #[error("cannot export user data for kernel {kernel}(): the payload type is not supported by reflection")]
    UserDataExportFailure { kernel: String },
}
