//! Integration tests covering every supported location shape
//!
//! Fixtures are built at runtime in a temp directory: a small CIF file in
//! the clear, gzip/bzip2/xz compressed variants, directory trees, and
//! zip/tar archives with matching and non-matching members.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use biosource::{open_location, BiosourceError, Resolver};
use tempfile::TempDir;

const CIF: &[u8] = b"data_2RPV\n_entry.id   2RPV\n";
const NOISE: &[u8] = b"not the droids you are looking for\n";

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

fn gzip_bytes(content: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(content).expect("gzip fixture");
    encoder.finish().expect("gzip fixture")
}

fn bzip2_bytes(content: &[u8]) -> Vec<u8> {
    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    encoder.write_all(content).expect("bzip2 fixture");
    encoder.finish().expect("bzip2 fixture")
}

fn xz_bytes(content: &[u8]) -> Vec<u8> {
    let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    encoder.write_all(content).expect("xz fixture");
    encoder.finish().expect("xz fixture")
}

fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::FileOptions::default();
    for (name, content) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(name.trim_end_matches('/'), options)
                .expect("zip fixture");
        } else {
            writer.start_file(*name, options).expect("zip fixture");
            writer.write_all(content).expect("zip fixture");
        }
    }
    writer.finish().expect("zip fixture").into_inner()
}

fn tar_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        if name.ends_with('/') {
            header.set_entry_type(tar::EntryType::dir());
            header.set_size(0);
            header.set_mode(0o755);
            header.set_cksum();
            builder
                .append_data(&mut header, *name, &[][..])
                .expect("tar fixture");
        } else {
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, *name, *content)
                .expect("tar fixture");
        }
    }
    builder.into_inner().expect("tar fixture")
}

/// Drain a dispatch into (source, content) pairs, panicking on any error.
fn read_all(location: &str, types: &[(&str, &str)]) -> Vec<(String, String)> {
    open_location(location, types)
        .map(|handle| {
            let mut handle = handle.expect("content handle");
            let mut content = String::new();
            handle.read_to_string(&mut content).expect("read handle");
            (handle.source().to_string(), content)
        })
        .collect()
}

#[test]
fn single_cif_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "2rpv.cif", CIF);

    let results = read_all(path.to_str().unwrap(), &[("cif", "text/cif")]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.as_bytes(), CIF);
    assert!(results[0].1.starts_with("data_2RPV"));
}

#[test]
fn single_text_file_outside_accepted_set_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "notes.txt", NOISE);

    let results = read_all(path.to_str().unwrap(), &[("cif", "text/cif")]);
    assert!(results.is_empty());
}

#[test]
fn extensionless_file_is_yielded_unconditionally() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "2rpv", CIF);

    // No mimetype was inferred, so no filter applies.
    let results = read_all(path.to_str().unwrap(), &[("cif", "text/cif")]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.as_bytes(), CIF);
}

#[test]
fn gzip_compressed_single_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "2rpv.cif.gz", &gzip_bytes(CIF));

    let results = read_all(path.to_str().unwrap(), &[("cif", "text/cif")]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.as_bytes(), CIF);
}

#[test]
fn bzip2_compressed_single_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "2rpv.cif.bz2", &bzip2_bytes(CIF));

    let results = read_all(path.to_str().unwrap(), &[("cif", "text/cif")]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.as_bytes(), CIF);
}

#[test]
fn xz_compressed_single_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "2rpv.cif.xz", &xz_bytes(CIF));

    let results = read_all(path.to_str().unwrap(), &[("cif", "text/cif")]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.as_bytes(), CIF);
}

#[test]
fn compressed_file_outside_accepted_set_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "notes.txt.gz", &gzip_bytes(NOISE));

    // The gzip encoding selects the opener, but text/plain is not
    // accepted: a designed skip, not an error.
    let results = read_all(path.to_str().unwrap(), &[("cif", "text/cif")]);
    assert!(results.is_empty());
}

#[test]
fn directory_yields_only_accepted_mimetypes() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "2rpv.cif", CIF);
    write_file(dir.path(), "notes.txt", NOISE);
    fs::create_dir(dir.path().join("nested")).unwrap();
    write_file(&dir.path().join("nested"), "1abc.cif", CIF);

    let mut results = read_all(dir.path().to_str().unwrap(), &[("cif", "text/cif")]);
    results.sort();
    assert_eq!(results.len(), 2);
    assert!(results[0].0.ends_with("2rpv.cif"));
    assert!(results[1].0.ends_with("nested/1abc.cif"));
    for (_, content) in &results {
        assert_eq!(content.as_bytes(), CIF);
    }
}

#[test]
fn empty_directory_yields_empty_sequence() {
    let dir = TempDir::new().unwrap();
    let results = read_all(dir.path().to_str().unwrap(), &[("cif", "text/cif")]);
    assert!(results.is_empty());
}

#[test]
fn missing_path_surfaces_not_found() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no_such_path");

    let mut handles = open_location(missing.to_str().unwrap(), &[("cif", "text/cif")]);
    let err = handles.next().expect("an error item").unwrap_err();
    match err {
        BiosourceError::Io(err) => assert_eq!(err.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected Io(NotFound), got {other}"),
    }
    // The traversal is aborted, not resumed.
    assert!(handles.next().is_none());
}

#[test]
fn zip_archive_filters_and_skips_directory_entries() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "archive.zip",
        &zip_bytes(&[
            ("2rpv.cif", CIF),
            ("notes.dat", NOISE),
            ("nested/", b""),
            ("nested/ignored.txt", NOISE),
        ]),
    );

    let results = read_all(path.to_str().unwrap(), &[("cif", "text/cif")]);
    assert_eq!(results.len(), 1);
    assert!(results[0].0.ends_with("archive.zip/2rpv.cif"));
    assert!(results[0].1.starts_with("data_2RPV"));
}

#[test]
fn plain_tar_archive() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "archive.tar",
        &tar_bytes(&[("2rpv.cif", CIF), ("notes.dat", NOISE), ("nested/", b"")]),
    );

    let results = read_all(path.to_str().unwrap(), &[("cif", "text/cif")]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.as_bytes(), CIF);
}

#[test]
fn gzip_compressed_tar_archive() {
    let dir = TempDir::new().unwrap();
    let tar = tar_bytes(&[("2rpv.cif", CIF), ("notes.dat", NOISE)]);
    let path = write_file(dir.path(), "archive.tar.gz", &gzip_bytes(&tar));

    let results = read_all(path.to_str().unwrap(), &[("cif", "text/cif")]);
    assert_eq!(results.len(), 1);
    assert!(results[0].0.ends_with("archive.tar.gz/2rpv.cif"));
    assert_eq!(results[0].1.as_bytes(), CIF);
}

#[test]
fn bzip2_compressed_tar_archive() {
    let dir = TempDir::new().unwrap();
    let tar = tar_bytes(&[("2rpv.cif", CIF), ("notes.dat", NOISE)]);
    let path = write_file(dir.path(), "archive.tar.bz2", &bzip2_bytes(&tar));

    let results = read_all(path.to_str().unwrap(), &[("cif", "text/cif")]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.as_bytes(), CIF);
}

#[test]
fn tgz_alias_is_a_compressed_tar_archive() {
    let dir = TempDir::new().unwrap();
    let tar = tar_bytes(&[("2rpv.cif", CIF)]);
    let path = write_file(dir.path(), "backup.tgz", &gzip_bytes(&tar));

    let results = read_all(path.to_str().unwrap(), &[("cif", "text/cif")]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.as_bytes(), CIF);
}

#[test]
fn directory_wins_over_zip_named_location() {
    // A directory whose name looks like a zip archive: registration order
    // makes Directory the first positive test, and no second strategy is
    // consulted.
    let dir = TempDir::new().unwrap();
    let zipish = dir.path().join("stuff.zip");
    fs::create_dir(&zipish).unwrap();
    write_file(&zipish, "2rpv.cif", CIF);

    let results = read_all(zipish.to_str().unwrap(), &[("cif", "text/cif")]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.as_bytes(), CIF);
}

#[test]
fn malformed_zip_surfaces_archive_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "bogus.zip", NOISE);

    let mut handles = open_location(path.to_str().unwrap(), &[("cif", "text/cif")]);
    let err = handles.next().expect("an error item").unwrap_err();
    match err {
        BiosourceError::MalformedArchive { kind, .. } => assert_eq!(kind, "zip"),
        other => panic!("expected MalformedArchive, got {other}"),
    }
    assert!(handles.next().is_none());
}

#[test]
fn malformed_tar_surfaces_archive_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "bogus.tar", NOISE);

    let mut handles = open_location(path.to_str().unwrap(), &[("cif", "text/cif")]);
    let err = handles.next().expect("an error item").unwrap_err();
    match err {
        BiosourceError::MalformedArchive { kind, .. } => assert_eq!(kind, "tar"),
        other => panic!("expected MalformedArchive, got {other}"),
    }
}

#[test]
fn abandoning_iteration_after_first_handle_is_clean() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "archive.zip",
        &zip_bytes(&[("2rpv.cif", CIF), ("1abc.cif", CIF)]),
    );

    let mut handles = open_location(path.to_str().unwrap(), &[("cif", "text/cif")]);
    let mut first = handles.next().expect("first handle").expect("first handle");
    let mut content = String::new();
    first.read_to_string(&mut content).unwrap();
    assert_eq!(content.as_bytes(), CIF);
    // Drop the iterator with the second entry unvisited; the handle and
    // the archive reader both close on drop.
    drop(handles);
    drop(first);
}

#[test]
fn double_registration_is_idempotent() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "2rpv.cif", CIF);
    write_file(dir.path(), "notes.txt", NOISE);

    let mut resolver = Resolver::new();
    resolver
        .register_type("cif", "text/cif")
        .register_type("cif", "text/cif");

    let results: Vec<_> = resolver
        .open(dir.path().to_str().unwrap())
        .collect::<biosource::Result<Vec<_>>>()
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn resolver_registrations_persist_across_calls() {
    let dir = TempDir::new().unwrap();
    let cif = write_file(dir.path(), "2rpv.cif", CIF);

    let mut resolver = Resolver::new();
    resolver.register_type("cif", "text/cif");

    assert_eq!(resolver.open(cif.to_str().unwrap()).count(), 1);
    // Same resolver, second dispatch: the registration is still merged.
    assert_eq!(resolver.open(cif.to_str().unwrap()).count(), 1);
}
