//! The constant pool.

use crate::error::ClassfileError;
use crate::reader::ClassReader;

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(u32),
    Long(i64),
    Double(u64),
    Class { name_index: u16 },
    String { string_index: u16 },
    FieldRef { class_index: u16, name_and_type_index: u16 },
    MethodRef { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodRef { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    Dynamic { bootstrap_index: u16, name_and_type_index: u16 },
    InvokeDynamic { bootstrap_index: u16, name_and_type_index: u16 },
    Module { name_index: u16 },
    Package { name_index: u16 },
    /// Index 0 and the slot after a long or double.
    Unusable,
}

#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub fn parse(reader: &mut ClassReader<'_>) -> Result<Self, ClassfileError> {
        let count = reader.read_u2()?;
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(Constant::Unusable);

        let mut index: u16 = 1;
        while index < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                1 => {
                    let length = reader.read_u2()? as usize;
                    let bytes = reader.read_slice(length)?;
                    Constant::Utf8(
                        decode_modified_utf8(bytes).ok_or(ClassfileError::InvalidUtf8 { index })?,
                    )
                }
                3 => Constant::Integer(reader.read_u4()? as i32),
                4 => Constant::Float(reader.read_u4()?),
                5 | 6 => {
                    let bits = reader.read_u8()?;
                    let entry = if tag == 5 {
                        Constant::Long(bits as i64)
                    } else {
                        Constant::Double(bits)
                    };
                    entries.push(entry);
                    index += 1;
                    Constant::Unusable
                }
                7 => Constant::Class {
                    name_index: reader.read_u2()?,
                },
                8 => Constant::String {
                    string_index: reader.read_u2()?,
                },
                9..=11 => {
                    let class_index = reader.read_u2()?;
                    let name_and_type_index = reader.read_u2()?;
                    match tag {
                        9 => Constant::FieldRef {
                            class_index,
                            name_and_type_index,
                        },
                        10 => Constant::MethodRef {
                            class_index,
                            name_and_type_index,
                        },
                        _ => Constant::InterfaceMethodRef {
                            class_index,
                            name_and_type_index,
                        },
                    }
                }
                12 => Constant::NameAndType {
                    name_index: reader.read_u2()?,
                    descriptor_index: reader.read_u2()?,
                },
                15 => Constant::MethodHandle {
                    kind: reader.read_u1()?,
                    reference_index: reader.read_u2()?,
                },
                16 => Constant::MethodType {
                    descriptor_index: reader.read_u2()?,
                },
                17 | 18 => {
                    let bootstrap_index = reader.read_u2()?;
                    let name_and_type_index = reader.read_u2()?;
                    if tag == 17 {
                        Constant::Dynamic {
                            bootstrap_index,
                            name_and_type_index,
                        }
                    } else {
                        Constant::InvokeDynamic {
                            bootstrap_index,
                            name_and_type_index,
                        }
                    }
                }
                19 => Constant::Module {
                    name_index: reader.read_u2()?,
                },
                20 => Constant::Package {
                    name_index: reader.read_u2()?,
                },
                other => return Err(ClassfileError::UnsupportedConstant { tag: other, index }),
            };
            entries.push(entry);
            index += 1;
        }

        Ok(ConstantPool { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    pub fn get(&self, index: u16) -> Result<&Constant, ClassfileError> {
        match self.entries.get(index as usize) {
            Some(Constant::Unusable) | None => Err(ClassfileError::InvalidConstantIndex { index }),
            Some(entry) => Ok(entry),
        }
    }

    pub fn utf8(&self, index: u16) -> Result<&str, ClassfileError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value),
            _ => Err(ClassfileError::WrongConstantKind {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// The binary name (`a/b/C`) of a `Class` entry.
    pub fn class_name(&self, index: u16) -> Result<&str, ClassfileError> {
        match self.get(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            _ => Err(ClassfileError::WrongConstantKind {
                index,
                expected: "Class",
            }),
        }
    }
}

/// Decode the JVM's modified UTF-8: `NUL` is `C0 80`, and supplementary
/// characters are encoded as two 3-byte surrogates.
pub fn decode_modified_utf8(bytes: &[u8]) -> Option<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i] as u16;
        match bytes[i] {
            0x01..=0x7F => {
                units.push(b0);
                i += 1;
            }
            0xC0..=0xDF => {
                let b1 = *bytes.get(i + 1)? as u16;
                if b1 & 0xC0 != 0x80 {
                    return None;
                }
                units.push(((b0 & 0x1F) << 6) | (b1 & 0x3F));
                i += 2;
            }
            0xE0..=0xEF => {
                let b1 = *bytes.get(i + 1)? as u16;
                let b2 = *bytes.get(i + 2)? as u16;
                if b1 & 0xC0 != 0x80 || b2 & 0xC0 != 0x80 {
                    return None;
                }
                units.push(((b0 & 0x0F) << 12) | ((b1 & 0x3F) << 6) | (b2 & 0x3F));
                i += 3;
            }
            _ => return None,
        }
    }
    String::from_utf16(&units).ok()
}

#[cfg(test)]
#[path = "tests/constant_pool_tests.rs"]
mod tests;
