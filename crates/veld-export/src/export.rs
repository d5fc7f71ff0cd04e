//! Reflection seams: the type exporter collaborator and its descriptors.

use veld_frontend::decl::TypeHandle;

/// The closed set of classes a reflected type descriptor can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorClass {
    Primitive,
    Vector,
    Pointer,
    Record,
}

/// A reflected description of a front-end type, consumed by the reflection
/// and code generation stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: String,
    pub class: DescriptorClass,
}

/// Converts front-end types into reflectable descriptors.
///
/// For a kernel's user-data parameter the exporter packs the pointee into a
/// synthetic record, so a successful user-data export always yields a
/// [`DescriptorClass::Record`] descriptor. `None` means the type contains
/// something reflection cannot express; the classifier treats that as fatal
/// only for user-data payloads.
pub trait TypeExporter {
    fn export_type(&mut self, handle: TypeHandle) -> Option<TypeDescriptor>;
}
