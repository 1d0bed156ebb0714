//! A small class-file assembler for tests.
#![allow(dead_code)]

use std::collections::HashMap;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_SYNTHETIC: u16 = 0x1000;

/// An attribute, encoded against the class's constant pool at build time.
#[derive(Clone, Debug)]
pub enum Attr {
    /// An attribute with the given name and an opaque body, e.g. `ScalaSig`.
    Raw(String, Vec<u8>),
    Signature(String),
    MethodParameters(Vec<Option<String>>),
    /// `RuntimeVisibleAnnotations` holding an unrelated annotation followed
    /// by `@ScalaSignature(bytes = ...)`.
    ScalaSignature(String),
    /// `RuntimeVisibleAnnotations` holding `@ScalaLongSignature(bytes = [...])`.
    ScalaLongSignature(Vec<String>),
}

impl Attr {
    pub fn marker(name: &str) -> Attr {
        Attr::Raw(name.to_owned(), Vec::new())
    }
}

#[derive(Clone, Debug)]
struct Member {
    access: u16,
    name: String,
    descriptor: String,
    attributes: Vec<Attr>,
}

#[derive(Default)]
struct Pool {
    bytes: Vec<u8>,
    count: u16,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl Pool {
    fn push(&mut self, entry: &[u8]) -> u16 {
        self.count += 1;
        self.bytes.extend_from_slice(entry);
        self.count
    }

    fn utf8(&mut self, s: &str) -> u16 {
        if let Some(&index) = self.utf8.get(s) {
            return index;
        }
        let encoded = modified_utf8(s);
        let mut entry = vec![1];
        entry.extend_from_slice(&(encoded.len() as u16).to_be_bytes());
        entry.extend_from_slice(&encoded);
        let index = self.push(&entry);
        self.utf8.insert(s.to_owned(), index);
        index
    }

    fn class(&mut self, binary_name: &str) -> u16 {
        if let Some(&index) = self.classes.get(binary_name) {
            return index;
        }
        let name = self.utf8(binary_name);
        let mut entry = vec![7];
        entry.extend_from_slice(&name.to_be_bytes());
        let index = self.push(&entry);
        self.classes.insert(binary_name.to_owned(), index);
        index
    }

    fn integer(&mut self, value: i32) -> u16 {
        let mut entry = vec![3];
        entry.extend_from_slice(&value.to_be_bytes());
        self.push(&entry)
    }
}

fn modified_utf8(s: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for unit in s.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}

/// Pack raw pickle bytes the way scalac stores them in `ScalaSignature`.
pub fn encode_scala_signature(bytes: &[u8]) -> String {
    fn emit(value: u32, out: &mut String) {
        let ch = if value == 0x7F { 0 } else { value + 1 };
        out.push(char::from_u32(ch).unwrap_or('\0'));
    }

    let mut out = String::new();
    let mut acc: u32 = 0;
    let mut bits = 0;
    for &byte in bytes {
        acc |= (byte as u32) << bits;
        bits += 8;
        while bits >= 7 {
            emit(acc & 0x7F, &mut out);
            acc >>= 7;
            bits -= 7;
        }
    }
    if bits > 0 {
        emit(acc & 0x7F, &mut out);
    }
    out
}

pub struct ClassFileBuilder {
    access: u16,
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<Member>,
    methods: Vec<Member>,
    attributes: Vec<Attr>,
}

impl ClassFileBuilder {
    /// A public class extending `java/lang/Object`.
    pub fn new(this_class: &str) -> Self {
        ClassFileBuilder {
            access: ACC_PUBLIC | ACC_SUPER,
            this_class: this_class.to_owned(),
            super_class: Some("java/lang/Object".to_owned()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn interface(this_class: &str) -> Self {
        Self::new(this_class).access(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT)
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub fn extends(mut self, super_class: Option<&str>) -> Self {
        self.super_class = super_class.map(str::to_owned);
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_owned());
        self
    }

    pub fn signature(self, signature: &str) -> Self {
        self.attribute(Attr::Signature(signature.to_owned()))
    }

    pub fn attribute(mut self, attribute: Attr) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn field(self, access: u16, name: &str, descriptor: &str) -> Self {
        self.field_with(access, name, descriptor, Vec::new())
    }

    pub fn field_with(
        mut self,
        access: u16,
        name: &str,
        descriptor: &str,
        attributes: Vec<Attr>,
    ) -> Self {
        self.fields.push(Member {
            access,
            name: name.to_owned(),
            descriptor: descriptor.to_owned(),
            attributes,
        });
        self
    }

    pub fn method(self, access: u16, name: &str, descriptor: &str) -> Self {
        self.method_with(access, name, descriptor, Vec::new())
    }

    pub fn method_with(
        mut self,
        access: u16,
        name: &str,
        descriptor: &str,
        attributes: Vec<Attr>,
    ) -> Self {
        self.methods.push(Member {
            access,
            name: name.to_owned(),
            descriptor: descriptor.to_owned(),
            attributes,
        });
        self
    }

    /// A public no-argument constructor.
    pub fn default_constructor(self) -> Self {
        self.method(ACC_PUBLIC, "<init>", "()V")
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = Pool::default();
        let mut body = Vec::new();
        body.extend_from_slice(&self.access.to_be_bytes());
        body.extend_from_slice(&pool.class(&self.this_class).to_be_bytes());
        let super_index = self.super_class.as_deref().map_or(0, |s| pool.class(s));
        body.extend_from_slice(&super_index.to_be_bytes());
        body.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for interface in &self.interfaces {
            body.extend_from_slice(&pool.class(interface).to_be_bytes());
        }
        for members in [&self.fields, &self.methods] {
            body.extend_from_slice(&(members.len() as u16).to_be_bytes());
            for member in members {
                body.extend_from_slice(&member.access.to_be_bytes());
                body.extend_from_slice(&pool.utf8(&member.name).to_be_bytes());
                body.extend_from_slice(&pool.utf8(&member.descriptor).to_be_bytes());
                write_attributes(&mut body, &mut pool, &member.attributes);
            }
        }
        write_attributes(&mut body, &mut pool, &self.attributes);

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&52u16.to_be_bytes());
        out.extend_from_slice(&(pool.count + 1).to_be_bytes());
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&body);
        out
    }
}

fn write_attributes(out: &mut Vec<u8>, pool: &mut Pool, attributes: &[Attr]) {
    out.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
    for attribute in attributes {
        let (name, data) = encode_attribute(pool, attribute);
        out.extend_from_slice(&pool.utf8(&name).to_be_bytes());
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(&data);
    }
}

fn encode_attribute(pool: &mut Pool, attribute: &Attr) -> (String, Vec<u8>) {
    let mut data = Vec::new();
    let name = match attribute {
        Attr::Raw(name, bytes) => {
            data.extend_from_slice(bytes);
            name.as_str()
        }
        Attr::Signature(signature) => {
            data.extend_from_slice(&pool.utf8(signature).to_be_bytes());
            "Signature"
        }
        Attr::MethodParameters(names) => {
            data.push(names.len() as u8);
            for name in names {
                let index = name.as_deref().map_or(0, |n| pool.utf8(n));
                data.extend_from_slice(&index.to_be_bytes());
                data.extend_from_slice(&0u16.to_be_bytes());
            }
            "MethodParameters"
        }
        Attr::ScalaSignature(encoded) => {
            data.extend_from_slice(&2u16.to_be_bytes());
            write_unrelated_annotation(&mut data, pool);
            data.extend_from_slice(&pool.utf8("Lscala/reflect/ScalaSignature;").to_be_bytes());
            data.extend_from_slice(&1u16.to_be_bytes());
            data.extend_from_slice(&pool.utf8("bytes").to_be_bytes());
            data.push(b's');
            data.extend_from_slice(&pool.utf8(encoded).to_be_bytes());
            "RuntimeVisibleAnnotations"
        }
        Attr::ScalaLongSignature(parts) => {
            data.extend_from_slice(&1u16.to_be_bytes());
            data.extend_from_slice(&pool.utf8("Lscala/reflect/ScalaLongSignature;").to_be_bytes());
            data.extend_from_slice(&1u16.to_be_bytes());
            data.extend_from_slice(&pool.utf8("bytes").to_be_bytes());
            data.push(b'[');
            data.extend_from_slice(&(parts.len() as u16).to_be_bytes());
            for part in parts {
                data.push(b's');
                data.extend_from_slice(&pool.utf8(part).to_be_bytes());
            }
            "RuntimeVisibleAnnotations"
        }
    };
    (name.to_owned(), data)
}

/// `@Deprecated(since = "1", level = 3, tags = {E.A, E.B}, nested = @N)`
fn write_unrelated_annotation(data: &mut Vec<u8>, pool: &mut Pool) {
    data.extend_from_slice(&pool.utf8("Ljava/lang/Deprecated;").to_be_bytes());
    data.extend_from_slice(&4u16.to_be_bytes());

    data.extend_from_slice(&pool.utf8("since").to_be_bytes());
    data.push(b's');
    data.extend_from_slice(&pool.utf8("1").to_be_bytes());

    data.extend_from_slice(&pool.utf8("level").to_be_bytes());
    data.push(b'I');
    data.extend_from_slice(&pool.integer(3).to_be_bytes());

    data.extend_from_slice(&pool.utf8("tags").to_be_bytes());
    data.push(b'[');
    data.extend_from_slice(&2u16.to_be_bytes());
    for constant in ["A", "B"] {
        data.push(b'e');
        data.extend_from_slice(&pool.utf8("Lp/E;").to_be_bytes());
        data.extend_from_slice(&pool.utf8(constant).to_be_bytes());
    }

    data.extend_from_slice(&pool.utf8("nested").to_be_bytes());
    data.push(b'@');
    data.extend_from_slice(&pool.utf8("Lp/N;").to_be_bytes());
    data.extend_from_slice(&0u16.to_be_bytes());
}
