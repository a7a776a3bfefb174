use std::io::{Seek, SeekFrom, Write};

use crate::{Error, Text};

fn temp_file(content: &[u8]) -> std::fs::File {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(content).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    file
}

#[test]
fn read_whole_file() {
    let text = Text::read(temp_file(b"data_x\n_a 1\n")).unwrap();

    assert!(!text.is_mapped());
    assert_eq!(&*text, "data_x\n_a 1\n");
}

#[test]
fn map_whole_file() {
    let file = temp_file("data_\u{e9}\n".as_bytes());
    let text = Text::map(&file).unwrap();

    assert!(text.is_mapped());
    assert_eq!(text.as_str(), "data_\u{e9}\n");
}

#[test]
fn map_empty_file() {
    let text = Text::map(&temp_file(b"")).unwrap();

    assert!(!text.is_mapped());
    assert!(text.is_empty());
}

#[test]
fn invalid_utf8() {
    assert!(matches!(
        Text::read(temp_file(&[0xC3, 0x28])),
        Err(Error::Utf8(_))
    ));
    assert!(matches!(
        Text::map(&temp_file(&[0xC3, 0x28])),
        Err(Error::Utf8(_))
    ));
}

#[test]
fn from_str() {
    let text = Text::from("loop_");

    assert_eq!(AsRef::<str>::as_ref(&text), "loop_");
}
