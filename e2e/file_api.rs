//! File-to-file decompression of multi-frame archives.

#[path = "../tests/support/frames.rs"]
mod frames;

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use zstd::io::{decompress_filename, decompress_multiple_filenames, Prefs, NUL_MARK};
use zstd::xxhash::content_checksum;

use frames::{block_header, skippable, FrameBuilder, DICT_PAYLOAD, RESERVED};

fn archive<P: AsRef<[u8]>>(parts: &[P]) -> (Vec<u8>, Vec<u8>) {
    let mut data = Vec::new();
    let mut content = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        let part = part.as_ref();
        let mut builder = FrameBuilder::windowed(0x50).checksummed();
        let blocks: Vec<&[u8]> = part.chunks(100 * 1024).collect();
        for (j, block) in blocks.iter().enumerate() {
            builder = builder.raw(j + 1 == blocks.len(), block);
        }
        data.extend(builder.checksum(content_checksum(part)).build());
        if i == 0 {
            data.extend(skippable(0, b"metadata"));
        }
        content.extend_from_slice(part);
    }
    (data, content)
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn multi_frame_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let a: Vec<u8> = (0..250_000u32).map(|i| (i % 251) as u8).collect();
    let b = vec![b'q'; 70_000];
    let (data, content) = archive(&[a.as_slice(), b.as_slice(), &b"tail"[..]]);

    let src = dir.path().join("big.bin.zst");
    let dst = dir.path().join("big.bin");
    fs::write(&src, data).unwrap();

    let stats = decompress_filename(path_str(&src), path_str(&dst), &Prefs::default()).unwrap();
    assert_eq!(stats.decompressed_bytes, content.len() as u64);
    assert_eq!(fs::read(&dst).unwrap(), content);
    assert!(src.exists());
}

#[test]
fn failure_in_later_frame_removes_partial_output() {
    let dir = TempDir::new().unwrap();
    let (mut data, _) = archive(&[&[1u8; 5000]]);
    data.extend(
        FrameBuilder::windowed(0x00)
            .raw(false, b"partial")
            .bytes(&block_header(true, RESERVED, 0))
            .build(),
    );
    let src = dir.path().join("broken.zst");
    let dst = dir.path().join("broken");
    fs::write(&src, data).unwrap();

    assert!(decompress_filename(path_str(&src), path_str(&dst), &Prefs::default()).is_err());
    assert!(!dst.exists());
    assert!(src.exists());
}

#[test]
fn remove_source_after_success() {
    let dir = TempDir::new().unwrap();
    let (data, content) = archive(&[b"short lived"]);
    let src = dir.path().join("gone.zst");
    fs::write(&src, data).unwrap();

    let mut prefs = Prefs::default();
    prefs.set_remove_src_file(true);
    decompress_multiple_filenames(&[path_str(&src)], ".zst", &prefs).unwrap();
    assert!(!src.exists());
    assert_eq!(fs::read(dir.path().join("gone")).unwrap(), content);
}

#[test]
fn unmatched_suffix_is_skipped() {
    let dir = TempDir::new().unwrap();
    let (data, _) = archive(&[b"x"]);
    let good = dir.path().join("good.zst");
    let odd = dir.path().join("odd.bin");
    fs::write(&good, &data).unwrap();
    fs::write(&odd, &data).unwrap();

    let err = decompress_multiple_filenames(&[path_str(&odd), path_str(&good)], ".zst", &Prefs::default())
        .unwrap_err();
    assert!(err.to_string().contains("1 file(s) skipped"), "{err}");
    assert_eq!(fs::read(dir.path().join("good")).unwrap(), b"x");
}

#[test]
fn dictionary_id_must_match() {
    let dir = TempDir::new().unwrap();
    let dict = dir.path().join("dict");
    fs::write(&dict, b"hello").unwrap();
    let frame = FrameBuilder::with_dictionary_id(0x00, 9).compressed(true, &DICT_PAYLOAD).build();
    let src = dir.path().join("greeting.zst");
    fs::write(&src, frame).unwrap();

    let mut prefs = Prefs::default();
    prefs.set_dictionary_filename(Some(path_str(&dict)));
    prefs.set_dictionary_id(10);
    let dst = dir.path().join("greeting");
    assert!(decompress_filename(path_str(&src), path_str(&dst), &prefs).is_err());
    assert!(!dst.exists());

    prefs.set_dictionary_id(9);
    decompress_filename(path_str(&src), path_str(&dst), &prefs).unwrap();
    assert_eq!(fs::read(&dst).unwrap(), b"hello");
}

#[test]
fn test_mode_over_many_files() {
    let dir = TempDir::new().unwrap();
    let mut names = Vec::new();
    for i in 0..5u8 {
        let (data, _) = archive(&[&vec![i; 1000 + usize::from(i)]]);
        let p = dir.path().join(format!("f{i}.zst"));
        fs::write(&p, data).unwrap();
        names.push(p);
    }
    let srcs: Vec<&str> = names.iter().map(|p| path_str(p)).collect();
    let mut prefs = Prefs::default();
    prefs.set_test_mode(true);
    decompress_multiple_filenames(&srcs, NUL_MARK, &prefs).unwrap();
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 5);
}
