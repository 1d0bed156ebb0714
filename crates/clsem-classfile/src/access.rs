//! JVM access flags and their translation to symbol flags.

use clsem_binder::Flags;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_VARARGS: u16 = 0x0080;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;

#[inline]
fn has(access: u16, flag: u16) -> bool {
    access & flag != 0
}

pub fn is_interface(access: u16) -> bool {
    has(access, ACC_INTERFACE)
}

pub fn is_static(access: u16) -> bool {
    has(access, ACC_STATIC)
}

pub fn is_synthetic(access: u16) -> bool {
    has(access, ACC_SYNTHETIC)
}

/// Synthetic members and bridge methods.
pub fn is_compiler_generated(access: u16) -> bool {
    has(access, ACC_SYNTHETIC | ACC_BRIDGE)
}

fn common_flags(access: u16) -> Flags {
    let mut flags = Flags::JAVA_DEFINED;
    if has(access, ACC_PRIVATE) {
        flags |= Flags::PRIVATE;
    }
    if has(access, ACC_PROTECTED) {
        flags |= Flags::PROTECTED;
    }
    if has(access, ACC_SYNTHETIC) {
        flags |= Flags::SYNTHETIC;
    }
    if has(access, ACC_ENUM) {
        flags |= Flags::ENUM;
    }
    flags
}

pub fn class_flags(access: u16) -> Flags {
    let mut flags = common_flags(access);
    if has(access, ACC_INTERFACE) {
        flags |= Flags::TRAIT | Flags::ABSTRACT;
    }
    if has(access, ACC_ABSTRACT) {
        flags |= Flags::ABSTRACT;
    }
    if has(access, ACC_FINAL) {
        flags |= Flags::FINAL;
    }
    if has(access, ACC_ANNOTATION) {
        flags |= Flags::ANNOTATION;
    }
    flags
}

/// Fields are mutable unless `final`.
pub fn field_flags(access: u16) -> Flags {
    let mut flags = common_flags(access);
    if has(access, ACC_STATIC) {
        flags |= Flags::STATIC;
    }
    if has(access, ACC_FINAL) {
        flags |= Flags::FINAL | Flags::STABLE;
    } else {
        flags |= Flags::MUTABLE;
    }
    flags
}

pub fn method_flags(access: u16) -> Flags {
    let mut flags = common_flags(access) | Flags::METHOD;
    if has(access, ACC_STATIC) {
        flags |= Flags::STATIC;
    }
    if has(access, ACC_FINAL) {
        flags |= Flags::FINAL;
    }
    if has(access, ACC_ABSTRACT) {
        flags |= Flags::ABSTRACT;
    }
    if has(access, ACC_VARARGS) {
        flags |= Flags::JAVA_VARARGS;
    }
    flags
}

#[cfg(test)]
#[path = "tests/access_tests.rs"]
mod tests;
