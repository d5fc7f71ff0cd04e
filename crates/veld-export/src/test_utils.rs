//! Builders for declaration values and stub exporters in tests.
//!
//! Only available when compiling this crate's own tests, or when the
//! `test-utils` feature is enabled. Not part of the stable API.

use veld_frontend::decl::{FunctionDecl, ParamDecl, PointeeKind, Span, TypeHandle, TypeShape};

use crate::export::{DescriptorClass, TypeDescriptor, TypeExporter};

/// Builds a parameter with an explicit type handle.
pub fn param(name: &str, shape: TypeShape, type_name: &str, handle: u32) -> ParamDecl {
    ParamDecl {
        name: name.to_owned(),
        shape,
        type_name: type_name.to_owned(),
        handle: TypeHandle(handle),
        span: Span::default(),
    }
}

/// `const T *name` with a non-void pointee.
pub fn const_ptr(name: &str, type_name: &str) -> ParamDecl {
    param(
        name,
        TypeShape::ConstPtr {
            pointee: PointeeKind::Data,
        },
        type_name,
        0,
    )
}

/// `const void *name`.
pub fn const_void_ptr(name: &str) -> ParamDecl {
    param(
        name,
        TypeShape::ConstPtr {
            pointee: PointeeKind::Void,
        },
        "const void *",
        0,
    )
}

/// `T *name`.
pub fn mut_ptr(name: &str, type_name: &str) -> ParamDecl {
    param(name, TypeShape::MutPtr, type_name, 0)
}

/// `uint name`.
pub fn uint(name: &str) -> ParamDecl {
    param(name, TypeShape::UnsignedInt, "uint", 0)
}

/// `int name`.
pub fn int(name: &str) -> ParamDecl {
    param(name, TypeShape::Int, "int", 0)
}

/// Builds a function declaration from already-built parameters.
pub fn function(name: &str, return_shape: TypeShape, params: Vec<ParamDecl>) -> FunctionDecl {
    FunctionDecl {
        name: name.to_owned(),
        params,
        return_shape,
        span: Span::default(),
    }
}

/// Exporter that reflects every handle as a record and logs the handles it
/// was asked for.
#[derive(Debug, Default)]
pub struct RecordExporter {
    pub exported: Vec<TypeHandle>,
}

impl TypeExporter for RecordExporter {
    fn export_type(&mut self, handle: TypeHandle) -> Option<TypeDescriptor> {
        self.exported.push(handle);
        Some(TypeDescriptor {
            name: format!("record_{}", handle.0),
            class: DescriptorClass::Record,
        })
    }
}

/// Exporter that refuses every handle.
#[derive(Debug, Default)]
pub struct FailingExporter;

impl TypeExporter for FailingExporter {
    fn export_type(&mut self, _handle: TypeHandle) -> Option<TypeDescriptor> {
        None
    }
}
