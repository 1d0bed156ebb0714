//! Descriptor and generic-signature grammar.
//!
//! One cursor serves both grammars. Descriptors are the erased subset
//! (`I`, `Ljava/lang/String;`, `[I`, `(I)V`); signatures add type variables,
//! type arguments, inner-class suffixes and type-parameter sections. The
//! parser produces a small syntax tree which `descriptors` lowers to types.

use crate::error::DecodeErrorKind;
use clsem_common::limits::{MAX_ARRAY_DIMENSIONS, MAX_SIGNATURE_NESTING};

/// A parse failure at a byte offset of the raw string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub position: usize,
    pub kind: DecodeErrorKind,
}

type ParseResult<T> = Result<T, SyntaxError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    Void,
}

impl BaseType {
    pub fn from_code(code: u8) -> Option<BaseType> {
        Some(match code {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            b'V' => BaseType::Void,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SigType {
    Base(BaseType),
    Class(ClassTypeSig),
    TypeVar { name: String, position: usize },
    Array(Box<SigType>),
}

/// `Lp/Outer<..>.Inner<..>;`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassTypeSig {
    /// Binary name with inner classes joined by `$`.
    pub binary_name: String,
    /// Arguments of the innermost class; outer arguments are dropped.
    pub args: Vec<TypeArg>,
    pub position: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeArg {
    /// `*`
    Star,
    Exact(SigType),
    /// `+T`
    Extends(SigType),
    /// `-T`
    Super(SigType),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamSig {
    pub name: String,
    /// Class bound followed by interface bounds; empty when only interfaces
    /// were given without a class bound and none followed.
    pub bounds: Vec<SigType>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassSig {
    pub type_params: Vec<TypeParamSig>,
    pub superclass: ClassTypeSig,
    pub interfaces: Vec<ClassTypeSig>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSig {
    pub type_params: Vec<TypeParamSig>,
    pub params: Vec<SigType>,
    pub result: SigType,
    pub throws: Vec<SigType>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grammar {
    Descriptor,
    Signature,
}

pub struct SigCursor<'s> {
    input: &'s [u8],
    raw: &'s str,
    pos: usize,
    grammar: Grammar,
    nesting: usize,
}

impl<'s> SigCursor<'s> {
    pub fn new(raw: &'s str, grammar: Grammar) -> Self {
        SigCursor {
            input: raw.as_bytes(),
            raw,
            pos: 0,
            grammar,
            nesting: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn error(&self, kind: DecodeErrorKind) -> SyntaxError {
        SyntaxError {
            position: self.pos,
            kind,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn next(&mut self) -> ParseResult<u8> {
        let byte = self
            .peek()
            .ok_or_else(|| self.error(DecodeErrorKind::UnexpectedEnd))?;
        self.pos += 1;
        Ok(byte)
    }

    fn expect(&mut self, expected: u8) -> ParseResult<()> {
        match self.peek() {
            Some(byte) if byte == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.error(DecodeErrorKind::Expected(expected as char))),
            None => Err(self.error(DecodeErrorKind::UnexpectedEnd)),
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn finish(&self) -> ParseResult<()> {
        if self.pos < self.input.len() {
            Err(self.error(DecodeErrorKind::TrailingInput))
        } else {
            Ok(())
        }
    }

    fn is_generic(&self) -> bool {
        self.grammar == Grammar::Signature
    }

    /// An identifier, up to the next delimiter of the active grammar.
    fn identifier(&mut self, delimiters: &[u8]) -> ParseResult<&'s str> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if delimiters.contains(&byte) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(match self.peek() {
                Some(byte) => self.error(DecodeErrorKind::UnknownCode(byte as char)),
                None => self.error(DecodeErrorKind::UnexpectedEnd),
            });
        }
        let raw = self.raw;
        Ok(&raw[start..self.pos])
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// A field type; `V` only where `allow_void` says so.
    pub fn parse_type(&mut self, allow_void: bool) -> ParseResult<SigType> {
        let start = self.pos;
        let code = self.next()?;
        match code {
            b'L' => {
                self.pos = start;
                self.parse_class_type().map(SigType::Class)
            }
            b'[' => {
                let mut dims = 1;
                while self.eat(b'[') {
                    dims += 1;
                }
                if dims > MAX_ARRAY_DIMENSIONS {
                    self.pos = start;
                    return Err(self.error(DecodeErrorKind::TooManyDimensions));
                }
                let mut tp = self.parse_type(false)?;
                for _ in 0..dims {
                    tp = SigType::Array(Box::new(tp));
                }
                Ok(tp)
            }
            b'T' if self.is_generic() => {
                let name = self.identifier(b";")?.to_owned();
                self.expect(b';')?;
                Ok(SigType::TypeVar {
                    name,
                    position: start,
                })
            }
            _ => match BaseType::from_code(code) {
                Some(BaseType::Void) if !allow_void => {
                    self.pos = start;
                    Err(self.error(DecodeErrorKind::UnknownCode('V')))
                }
                Some(base) => Ok(SigType::Base(base)),
                None => {
                    self.pos = start;
                    Err(self.error(DecodeErrorKind::UnknownCode(code as char)))
                }
            },
        }
    }

    pub fn parse_class_type(&mut self) -> ParseResult<ClassTypeSig> {
        let position = self.pos;
        self.expect(b'L')?;
        if !self.is_generic() {
            let binary_name = self.identifier(b";")?.to_owned();
            self.expect(b';')?;
            return Ok(ClassTypeSig {
                binary_name,
                args: Vec::new(),
                position,
            });
        }

        let mut binary_name = self.identifier(b";<.")?.to_owned();
        let mut args = self.parse_type_args()?;
        while self.eat(b'.') {
            let inner = self.identifier(b";<.")?;
            binary_name.push('$');
            binary_name.push_str(inner);
            args = self.parse_type_args()?;
        }
        self.expect(b';')?;
        Ok(ClassTypeSig {
            binary_name,
            args,
            position,
        })
    }

    fn parse_type_args(&mut self) -> ParseResult<Vec<TypeArg>> {
        if self.peek() != Some(b'<') {
            return Ok(Vec::new());
        }
        if self.nesting >= MAX_SIGNATURE_NESTING {
            return Err(self.error(DecodeErrorKind::NestingTooDeep));
        }
        self.pos += 1;
        self.nesting += 1;
        let args = self.parse_type_arg_list();
        self.nesting -= 1;
        args
    }

    fn parse_type_arg_list(&mut self) -> ParseResult<Vec<TypeArg>> {
        let mut args = Vec::new();
        loop {
            let arg = match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    TypeArg::Star
                }
                Some(b'+') => {
                    self.pos += 1;
                    TypeArg::Extends(self.parse_type(false)?)
                }
                Some(b'-') => {
                    self.pos += 1;
                    TypeArg::Super(self.parse_type(false)?)
                }
                Some(b'>') if !args.is_empty() => {
                    self.pos += 1;
                    return Ok(args);
                }
                _ => TypeArg::Exact(self.parse_type(false)?),
            };
            args.push(arg);
        }
    }

    fn parse_type_params(&mut self) -> ParseResult<Vec<TypeParamSig>> {
        if !self.eat(b'<') {
            return Ok(Vec::new());
        }
        let mut params = Vec::new();
        loop {
            let name = self.identifier(b":>")?.to_owned();
            self.expect(b':')?;
            let mut bounds = Vec::new();
            // The class bound may be empty (`T::Ljava/lang/Comparable;`).
            if !matches!(self.peek(), Some(b':') | Some(b'>')) {
                bounds.push(self.parse_type(false)?);
            }
            while self.eat(b':') {
                bounds.push(self.parse_type(false)?);
            }
            params.push(TypeParamSig { name, bounds });
            if self.eat(b'>') {
                return Ok(params);
            }
        }
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    pub fn parse_field(mut self) -> ParseResult<SigType> {
        let tp = self.parse_type(false)?;
        self.finish()?;
        Ok(tp)
    }

    pub fn parse_method(mut self) -> ParseResult<MethodSig> {
        let type_params = if self.is_generic() {
            self.parse_type_params()?
        } else {
            Vec::new()
        };
        self.expect(b'(')?;
        let mut params = Vec::new();
        while !self.eat(b')') {
            params.push(self.parse_type(false)?);
        }
        let result = self.parse_type(true)?;
        let mut throws = Vec::new();
        while self.is_generic() && self.eat(b'^') {
            throws.push(self.parse_type(false)?);
        }
        self.finish()?;
        Ok(MethodSig {
            type_params,
            params,
            result,
            throws,
        })
    }

    pub fn parse_class(mut self) -> ParseResult<ClassSig> {
        let type_params = self.parse_type_params()?;
        let superclass = self.parse_class_type()?;
        let mut interfaces = Vec::new();
        while self.peek().is_some() {
            interfaces.push(self.parse_class_type()?);
        }
        Ok(ClassSig {
            type_params,
            superclass,
            interfaces,
        })
    }
}

#[cfg(test)]
#[path = "tests/signatures_tests.rs"]
mod tests;
