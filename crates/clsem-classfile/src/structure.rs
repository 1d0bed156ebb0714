//! Header scan: one linear pass that records where each section starts.
//!
//! Nothing past the constant pool, the access flags and the class's own name
//! is decoded here. Interfaces, fields, methods and attributes are skipped
//! and remembered as `Fork`s, to be opened by whoever needs them.

use crate::constant_pool::ConstantPool;
use crate::error::ClassfileError;
use crate::reader::{ClassReader, Fork};

pub const CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// One field or method entry, with its attributes still undecoded.
#[derive(Clone, Debug)]
pub struct MemberInfo<'a> {
    pub access_flags: u16,
    pub name: &'a str,
    pub descriptor: &'a str,
    pub attributes: Vec<AttributeInfo<'a>>,
}

#[derive(Clone, Copy, Debug)]
pub struct AttributeInfo<'a> {
    pub name: &'a str,
    pub data: &'a [u8],
}

impl<'a> MemberInfo<'a> {
    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo<'a>> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

/// A scanned class file.
pub struct ClassStructure<'a> {
    data: &'a [u8],
    pub minor_version: u16,
    pub major_version: u16,
    pub pool: ConstantPool,
    pub access_flags: u16,
    /// Binary name, e.g. `java/util/Map$Entry`.
    pub this_class: String,
    supers: Fork,
    fields: Fork,
    methods: Fork,
    attributes: Fork,
}

impl<'a> ClassStructure<'a> {
    pub fn scan(data: &'a [u8]) -> Result<Self, ClassfileError> {
        let mut reader = ClassReader::new(data);
        let magic = reader.read_u4()?;
        if magic != CLASS_MAGIC {
            return Err(ClassfileError::InvalidMagic { found: magic });
        }
        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        let pool = ConstantPool::parse(&mut reader)?;
        let access_flags = reader.read_u2()?;
        let this_class = pool.class_name(reader.read_u2()?)?.to_owned();

        let supers_start = reader.position();
        reader.skip(2)?;
        let interface_count = reader.read_u2()? as usize;
        reader.skip(interface_count * 2)?;
        let supers = Fork::new(supers_start, reader.position());

        let fields = skip_members(&mut reader)?;
        let methods = skip_members(&mut reader)?;
        let attributes_start = reader.position();
        skip_attributes(&mut reader)?;
        let attributes = Fork::new(attributes_start, reader.position());

        Ok(ClassStructure {
            data,
            minor_version,
            major_version,
            pool,
            access_flags,
            this_class,
            supers,
            fields,
            methods,
            attributes,
        })
    }

    /// Binary name of the super class; `None` for `java/lang/Object` and
    /// `module-info`.
    pub fn super_class(&self) -> Result<Option<&str>, ClassfileError> {
        let mut reader = self.supers.open(self.data)?;
        match reader.read_u2()? {
            0 => Ok(None),
            index => self.pool.class_name(index).map(Some),
        }
    }

    pub fn interfaces(&self) -> Result<Vec<&str>, ClassfileError> {
        let mut reader = self.supers.open(self.data)?;
        reader.skip(2)?;
        let count = reader.read_u2()?;
        (0..count)
            .map(|_| self.pool.class_name(reader.read_u2()?))
            .collect()
    }

    pub fn fields(&self) -> Result<Vec<MemberInfo<'_>>, ClassfileError> {
        self.members(self.fields)
    }

    pub fn methods(&self) -> Result<Vec<MemberInfo<'_>>, ClassfileError> {
        self.members(self.methods)
    }

    /// The class-level attributes, in file order.
    pub fn attributes(&self) -> Result<Vec<AttributeInfo<'_>>, ClassfileError> {
        let mut reader = self.attributes.open(self.data)?;
        self.read_attributes(&mut reader)
    }

    fn members(&self, fork: Fork) -> Result<Vec<MemberInfo<'_>>, ClassfileError> {
        let mut reader = fork.open(self.data)?;
        let count = reader.read_u2()?;
        let mut members = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let access_flags = reader.read_u2()?;
            let name = self.pool.utf8(reader.read_u2()?)?;
            let descriptor = self.pool.utf8(reader.read_u2()?)?;
            let attributes = self.read_attributes(&mut reader)?;
            members.push(MemberInfo {
                access_flags,
                name,
                descriptor,
                attributes,
            });
        }
        Ok(members)
    }

    fn read_attributes<'r>(
        &'r self,
        reader: &mut ClassReader<'a>,
    ) -> Result<Vec<AttributeInfo<'r>>, ClassfileError> {
        let count = reader.read_u2()?;
        let mut attributes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let name = self.pool.utf8(reader.read_u2()?)?;
            let length = reader.read_u4()? as usize;
            let data = reader.read_slice(length)?;
            attributes.push(AttributeInfo { name, data });
        }
        Ok(attributes)
    }

    /// The string of a `Signature` attribute.
    pub fn signature_of(&self, attribute: &AttributeInfo<'_>) -> Result<&str, ClassfileError> {
        let mut reader = ClassReader::new(attribute.data);
        let index = reader.read_u2().map_err(|_| ClassfileError::MalformedAttribute {
            attribute: "Signature",
            reason: "missing signature index".to_owned(),
        })?;
        self.pool.utf8(index)
    }

    /// Parameter names from a `MethodParameters` attribute; unnamed entries
    /// are `None`.
    pub fn parameter_names(
        &self,
        attribute: &AttributeInfo<'_>,
    ) -> Result<Vec<Option<&str>>, ClassfileError> {
        let malformed = |_| ClassfileError::MalformedAttribute {
            attribute: "MethodParameters",
            reason: "truncated parameter table".to_owned(),
        };
        let mut reader = ClassReader::new(attribute.data);
        let count = reader.read_u1().map_err(malformed)?;
        let mut names = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let index = reader.read_u2().map_err(malformed)?;
            reader.skip(2).map_err(malformed)?;
            names.push(match index {
                0 => None,
                index => Some(self.pool.utf8(index)?),
            });
        }
        Ok(names)
    }
}

fn skip_members(reader: &mut ClassReader<'_>) -> Result<Fork, ClassfileError> {
    let start = reader.position();
    let count = reader.read_u2()?;
    for _ in 0..count {
        reader.skip(6)?;
        skip_attributes(reader)?;
    }
    Ok(Fork::new(start, reader.position()))
}

fn skip_attributes(reader: &mut ClassReader<'_>) -> Result<(), ClassfileError> {
    let count = reader.read_u2()?;
    for _ in 0..count {
        reader.skip(2)?;
        let length = reader.read_u4()? as usize;
        reader.skip(length)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/structure_tests.rs"]
mod tests;
