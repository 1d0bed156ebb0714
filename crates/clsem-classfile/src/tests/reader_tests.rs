use super::*;

#[test]
fn reads_big_endian() {
    let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
    let mut reader = ClassReader::new(&data);
    assert_eq!(reader.read_u1(), Ok(0x01));
    assert_eq!(reader.read_u2(), Ok(0x0203));
    assert_eq!(reader.read_u4(), Ok(0x0405_0607));
    assert!(reader.at_end());
    assert_eq!(
        reader.read_u1(),
        Err(ClassfileError::UnexpectedEof { offset: 8 })
    );
}

#[test]
fn forks_do_not_consume_the_parent() {
    let data = [0xAA, 0xBB, 0xCC, 0xDD];
    let mut reader = ClassReader::new(&data);
    reader.read_u1().unwrap();
    let fork = reader.fork();
    assert_eq!(reader.read_u1(), Ok(0xBB));

    let mut first = fork.open(&data).unwrap();
    assert_eq!(first.read_u2(), Ok(0xBBCC));
    let mut again = fork.open(&data).unwrap();
    assert_eq!(again.position(), 1);
    assert_eq!(again.read_u1(), Ok(0xBB));
    assert_eq!(reader.read_u1(), Ok(0xCC));
}

#[test]
fn bounded_forks_stop_at_their_end() {
    let data = [0, 1, 2, 3, 4, 5];
    let fork = Fork::new(2, 4);
    assert_eq!(fork.len(), 2);
    let mut reader = fork.open(&data).unwrap();
    assert_eq!(reader.read_u2(), Ok(0x0203));
    assert_eq!(
        reader.read_u1(),
        Err(ClassfileError::UnexpectedEof { offset: 5 })
    );
    assert!(Fork::new(4, 10).open(&data).is_err());
}
