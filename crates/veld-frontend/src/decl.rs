//! Immutable declaration values extracted from the front-end AST.

/// Byte range of a declaration in its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// Opaque handle to a front-end type.
///
/// Handles are minted by the type checker and resolved by the reflection
/// stage; nothing downstream of extraction dereferences them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHandle(pub u32);

/// What a `const` pointer points at, as far as reflection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointeeKind {
    /// `const void *`: an opaque payload that reflection cannot name.
    Void,
    /// Any non-void pointee.
    Data,
}

/// Canonical shape of a declared type — only as much of it as function
/// classification needs. The full type lives behind [`TypeHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Void,
    Int,
    UnsignedInt,
    ConstPtr { pointee: PointeeKind },
    MutPtr,
    /// Anything else (floats, vectors, records, ...).
    Other,
}

impl TypeShape {
    pub fn is_pointer(self) -> bool {
        matches!(self, TypeShape::ConstPtr { .. } | TypeShape::MutPtr)
    }
}

/// A single declared parameter, copied out of the AST at extraction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub shape: TypeShape,
    /// Pretty-printed declared type, used verbatim in diagnostics.
    pub type_name: String,
    pub handle: TypeHandle,
    pub span: Span,
}

/// An exported function declaration, reduced to classification shape.
///
/// Parameter order is significant: role binding walks `params` left to
/// right exactly as the user wrote them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub return_shape: TypeShape,
    pub span: Span,
}
