//! Classifying a class file by the payload it carries.

use crate::access;
use crate::error::{ClassfileError, LoadError};
use crate::options::LoaderOptions;
use crate::pickle::decode_scala_signature_bytes;
use crate::reader::ClassReader;
use crate::structure::{AttributeInfo, ClassStructure};
use tracing::{instrument, trace};

const SCALA_SIG: &str = "ScalaSig";
const SCALA: &str = "Scala";
const TASTY: &str = "TASTY";
const SIGNATURE: &str = "Signature";
const RUNTIME_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";
const SCALA_SIGNATURE_ANNOTATION: &str = "Lscala/reflect/ScalaSignature;";
const SCALA_LONG_SIGNATURE_ANNOTATION: &str = "Lscala/reflect/ScalaLongSignature;";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassKind {
    /// A Scala 2 class; the payload is the unpacked pickle.
    ScalaPickle { payload: Vec<u8> },
    /// A plain JVM class, with its generic class signature if any.
    Java { signature: Option<String> },
    /// The class is described by a pickle in a sibling file.
    PickleNative,
    /// Nothing semantically useful, e.g. a module class or a lambda holder.
    Artifact,
}

impl ClassKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ClassKind::ScalaPickle { .. } => "scala-pickle",
            ClassKind::Java { .. } => "java",
            ClassKind::PickleNative => "pickle-native",
            ClassKind::Artifact => "artifact",
        }
    }
}

#[derive(Default)]
struct AttributeScan {
    saw_pickle_marker: bool,
    payload: Option<Vec<u8>>,
    saw_native_pickle: bool,
    saw_scala: bool,
    signature: Option<String>,
}

impl AttributeScan {
    fn has_marker(&self) -> bool {
        self.saw_pickle_marker || self.saw_native_pickle || self.payload.is_some()
    }

    /// A payload together with either marker decides the outcome.
    fn is_settled(&self) -> bool {
        self.payload.is_some() && (self.saw_pickle_marker || self.saw_native_pickle)
    }
}

/// Decide what kind of class `structure` is.
///
/// Attributes are visited once, in file order, stopping as soon as the
/// outcome can no longer change.
#[instrument(level = "debug", skip_all, fields(class = %structure.this_class))]
pub fn classify(
    structure: &ClassStructure<'_>,
    options: &LoaderOptions,
) -> Result<ClassKind, LoadError> {
    let mut scan = AttributeScan::default();
    for attribute in structure.attributes()? {
        match attribute.name {
            SCALA_SIG => scan.saw_pickle_marker = true,
            TASTY => scan.saw_native_pickle = true,
            SCALA => scan.saw_scala = true,
            SIGNATURE if !scan.has_marker() && scan.signature.is_none() => {
                scan.signature = Some(structure.signature_of(&attribute)?.to_owned());
            }
            RUNTIME_VISIBLE_ANNOTATIONS => {
                if let Some(encoded) = scala_signature(structure, &attribute)? {
                    let payload = decode_scala_signature_bytes(&encoded).map_err(|e| {
                        LoadError::MalformedArtifact {
                            class: dotted(&structure.this_class),
                            reason: e.to_string(),
                        }
                    })?;
                    scan.payload = Some(payload);
                }
            }
            _ => {}
        }
        if scan.is_settled() {
            trace!(attribute = attribute.name, "classification settled");
            break;
        }
    }

    let malformed = |reason: &str| LoadError::MalformedArtifact {
        class: dotted(&structure.this_class),
        reason: reason.to_owned(),
    };
    let kind = match scan {
        AttributeScan {
            saw_native_pickle: true,
            payload: Some(_),
            ..
        } => return Err(malformed("declares both a native pickle and a Scala signature")),
        AttributeScan {
            saw_native_pickle: true,
            ..
        } => ClassKind::PickleNative,
        AttributeScan {
            saw_pickle_marker: true,
            payload: None,
            ..
        } => return Err(malformed("declares pickle but has no payload")),
        AttributeScan {
            payload: Some(payload),
            ..
        } => ClassKind::ScalaPickle { payload },
        AttributeScan { saw_scala: true, .. } => ClassKind::Artifact,
        _ if options.synthetic_classes_are_artifacts
            && access::is_synthetic(structure.access_flags) =>
        {
            ClassKind::Artifact
        }
        AttributeScan { signature, .. } => ClassKind::Java { signature },
    };
    trace!(kind = kind.describe(), "classified");
    Ok(kind)
}

pub(crate) fn dotted(binary_name: &str) -> String {
    binary_name.replace('/', ".")
}

/// The encoded pickle string of a `ScalaSignature` or `ScalaLongSignature`
/// annotation, if `attribute` holds one.
fn scala_signature(
    structure: &ClassStructure<'_>,
    attribute: &AttributeInfo<'_>,
) -> Result<Option<String>, ClassfileError> {
    let mut reader = ClassReader::new(attribute.data);
    let count = reader.read_u2().map_err(truncated)?;
    for _ in 0..count {
        let type_name = structure.pool.utf8(reader.read_u2().map_err(truncated)?)?;
        let is_signature = type_name == SCALA_SIGNATURE_ANNOTATION
            || type_name == SCALA_LONG_SIGNATURE_ANNOTATION;
        let pairs = reader.read_u2().map_err(truncated)?;
        for _ in 0..pairs {
            let element = structure.pool.utf8(reader.read_u2().map_err(truncated)?)?;
            if is_signature && element == "bytes" {
                return signature_strings(structure, &mut reader).map(Some);
            }
            skip_element_value(&mut reader)?;
        }
    }
    Ok(None)
}

/// A `bytes` element: one string, or an array of strings to concatenate.
fn signature_strings(
    structure: &ClassStructure<'_>,
    reader: &mut ClassReader<'_>,
) -> Result<String, ClassfileError> {
    match reader.read_u1().map_err(truncated)? {
        b's' => Ok(structure
            .pool
            .utf8(reader.read_u2().map_err(truncated)?)?
            .to_owned()),
        b'[' => {
            let count = reader.read_u2().map_err(truncated)?;
            let mut out = String::new();
            for _ in 0..count {
                if reader.read_u1().map_err(truncated)? != b's' {
                    return Err(not_a_string());
                }
                out.push_str(structure.pool.utf8(reader.read_u2().map_err(truncated)?)?);
            }
            Ok(out)
        }
        _ => Err(not_a_string()),
    }
}

fn skip_element_value(reader: &mut ClassReader<'_>) -> Result<(), ClassfileError> {
    match reader.read_u1().map_err(truncated)? {
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' | b'c' => {
            reader.skip(2).map_err(truncated)
        }
        b'e' => reader.skip(4).map_err(truncated),
        b'@' => {
            reader.skip(2).map_err(truncated)?;
            let pairs = reader.read_u2().map_err(truncated)?;
            for _ in 0..pairs {
                reader.skip(2).map_err(truncated)?;
                skip_element_value(reader)?;
            }
            Ok(())
        }
        b'[' => {
            let count = reader.read_u2().map_err(truncated)?;
            for _ in 0..count {
                skip_element_value(reader)?;
            }
            Ok(())
        }
        tag => Err(ClassfileError::MalformedAttribute {
            attribute: "RuntimeVisibleAnnotations",
            reason: format!("unknown element value tag '{}'", tag as char),
        }),
    }
}

fn truncated(_: ClassfileError) -> ClassfileError {
    ClassfileError::MalformedAttribute {
        attribute: "RuntimeVisibleAnnotations",
        reason: "truncated annotation".to_owned(),
    }
}

fn not_a_string() -> ClassfileError {
    ClassfileError::MalformedAttribute {
        attribute: "RuntimeVisibleAnnotations",
        reason: "Scala signature bytes are not a string".to_owned(),
    }
}

#[cfg(test)]
#[path = "tests/classify_tests.rs"]
mod tests;
