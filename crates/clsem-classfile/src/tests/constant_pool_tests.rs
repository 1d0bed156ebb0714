use super::*;

fn pool(bytes: &[u8]) -> Result<ConstantPool, ClassfileError> {
    ConstantPool::parse(&mut ClassReader::new(bytes))
}

#[test]
fn utf8_and_class_entries() {
    // count = 3: #1 Utf8 "a/B", #2 Class #1
    let bytes = [0x00, 0x03, 1, 0x00, 0x03, b'a', b'/', b'B', 7, 0x00, 0x01];
    let pool = pool(&bytes).unwrap();
    assert_eq!(pool.utf8(1), Ok("a/B"));
    assert_eq!(pool.class_name(2), Ok("a/B"));
    assert_eq!(
        pool.utf8(2),
        Err(ClassfileError::WrongConstantKind {
            index: 2,
            expected: "Utf8"
        })
    );
    assert_eq!(pool.get(0), Err(ClassfileError::InvalidConstantIndex { index: 0 }));
}

#[test]
fn long_entries_take_two_slots() {
    // count = 4: #1 Long, #2 unusable, #3 Integer
    let bytes = [
        0x00, 0x04, 5, 0, 0, 0, 1, 0, 0, 0, 2, 3, 0xFF, 0xFF, 0xFF, 0xFF,
    ];
    let pool = pool(&bytes).unwrap();
    assert_eq!(pool.get(1), Ok(&Constant::Long(0x0000_0001_0000_0002)));
    assert!(pool.get(2).is_err());
    assert_eq!(pool.get(3), Ok(&Constant::Integer(-1)));
}

#[test]
fn unknown_tags_are_rejected() {
    let bytes = [0x00, 0x02, 2, 0x00];
    assert_eq!(
        pool(&bytes).err(),
        Some(ClassfileError::UnsupportedConstant { tag: 2, index: 1 })
    );
}

#[test]
fn modified_utf8() {
    assert_eq!(decode_modified_utf8(b"abc").as_deref(), Some("abc"));
    assert_eq!(decode_modified_utf8(&[0xC0, 0x80]).as_deref(), Some("\0"));
    assert_eq!(decode_modified_utf8(&[0xC3, 0xA9]).as_deref(), Some("é"));
    // U+1F600 as a surrogate pair
    let smile = [0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80];
    assert_eq!(decode_modified_utf8(&smile).as_deref(), Some("\u{1F600}"));
    assert_eq!(decode_modified_utf8(&[0x00]), None);
    assert_eq!(decode_modified_utf8(&[0xC3]), None);
}
