use std::fs;
use subenum::core::merger::{MERGED_FILE_NAME, ResultMerger};
use subenum::SubenumError;
use tempfile::TempDir;

fn merge(dir: &TempDir) -> Vec<String> {
    ResultMerger::new()
        .unwrap()
        .merge_and_write(dir.path())
        .unwrap()
        .to_sorted_vec()
}

fn merged_file(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join(MERGED_FILE_NAME)).unwrap()
}

#[test]
fn test_graph_edges_and_bare_domains_across_files() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("a.txt"),
        "foo.example.com (FQDN)\nBAR.EXAMPLE.COM\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("b.txt"),
        "foo.example.com (FQDN) --> cname --> baz.example.com (FQDN)\n",
    )
    .unwrap();

    let result = merge(&dir);

    assert_eq!(
        result,
        vec!["bar.example.com", "baz.example.com", "foo.example.com"]
    );
    assert_eq!(
        merged_file(&dir),
        "bar.example.com\nbaz.example.com\nfoo.example.com\n"
    );
}

#[test]
fn test_fqdn_inside_graph_noise_is_extracted_lowercase() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("amass.txt"),
        "93.184.216.0/24 (Netblock) --> contains --> Example.Sub.Domain.com (FQDN)\n\
         example.sub.domain.com (FQDN) --> a_record --> 93.184.216.34 (IPAddress)\n",
    )
    .unwrap();

    assert_eq!(merge(&dir), vec!["example.sub.domain.com"]);
}

#[test]
fn test_case_variants_across_files_collapse() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("subfinder.txt"), "Sub.Example.COM\n").unwrap();
    fs::write(dir.path().join("sublist3r.txt"), "sub.example.com\nSUB.EXAMPLE.COM\n").unwrap();
    fs::write(dir.path().join("amass.txt"), "sub.Example.com (FQDN)\n").unwrap();

    assert_eq!(merge(&dir), vec!["sub.example.com"]);
    assert_eq!(merged_file(&dir), "sub.example.com\n");
}

#[test]
fn test_noise_lines_contribute_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("findomain.txt"),
        "not a domain at all\n\n   \n[*] Searching in Crtsh\n{\"subdomain\": \"x.example.com\"}\nreal.example.com\n",
    )
    .unwrap();

    assert_eq!(merge(&dir), vec!["real.example.com"]);
}

#[test]
fn test_empty_directory_yields_empty_file() {
    let dir = TempDir::new().unwrap();

    let result = merge(&dir);

    assert!(result.is_empty());
    assert_eq!(merged_file(&dir), "");
}

#[test]
fn test_only_txt_files_are_scanned() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("dnsrecon.xml"), "xml.example.com\n").unwrap();
    fs::write(dir.path().join("notes.md"), "md.example.com\n").unwrap();
    fs::create_dir(dir.path().join("screens.txt")).unwrap();
    fs::write(dir.path().join("kept.txt"), "txt.example.com\n").unwrap();

    assert_eq!(merge(&dir), vec!["txt.example.com"]);
}

#[test]
fn test_rerun_does_not_feed_back_previous_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "one.example.com\n").unwrap();
    let first = merge(&dir);

    fs::remove_file(dir.path().join("a.txt")).unwrap();
    let second = merge(&dir);

    assert_eq!(first, vec!["one.example.com"]);
    assert!(second.is_empty());
}

#[test]
fn test_invalid_bytes_are_tolerated() {
    let dir = TempDir::new().unwrap();
    let mut bytes = b"good.example.com\n".to_vec();
    bytes.extend_from_slice(b"\xff\xfe\x00garbage\x80\n");
    bytes.extend_from_slice(b"spl\xc0it.example.com (FQDN)\n");
    fs::write(dir.path().join("binary.txt"), bytes).unwrap();

    assert_eq!(merge(&dir), vec!["good.example.com", "split.example.com"]);
}

#[test]
fn test_output_is_sorted_without_duplicates() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("mixed.txt"),
        "zeta.example.com\nalpha.example.com\nmid.example.com\nalpha.example.com\n",
    )
    .unwrap();

    let content = merged_file_after_merge(&dir);
    let lines: Vec<&str> = content.lines().collect();
    let mut sorted = lines.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(lines, sorted);
    assert_eq!(lines.len(), 3);
    assert!(content.ends_with(".com\n"));
}

fn merged_file_after_merge(dir: &TempDir) -> String {
    merge(dir);
    merged_file(dir)
}

#[test]
fn test_merge_directory_does_not_write() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "a.example.com\n").unwrap();

    let merged = ResultMerger::new().unwrap().merge_directory(dir.path()).unwrap();

    assert_eq!(merged.len(), 1);
    assert_eq!(merged.scanned_files, 1);
    assert!(!dir.path().join(MERGED_FILE_NAME).exists());
}

#[test]
fn test_missing_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let err = ResultMerger::new().unwrap().merge_and_write(&missing).unwrap_err();

    assert!(matches!(err, SubenumError::WorkspaceMissing { .. }));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    std::os::unix::fs::symlink(dir.path().join("vanished"), dir.path().join("ghost.txt")).unwrap();
    fs::write(dir.path().join("open.txt"), "visible.example.com\n").unwrap();

    let merged = ResultMerger::new().unwrap().merge_and_write(dir.path()).unwrap();

    assert_eq!(merged.scanned_files, 1);
    assert_eq!(merged.skipped_files, 1);
    assert_eq!(merged.to_sorted_vec(), vec!["visible.example.com"]);
    assert_eq!(merged_file(&dir), "visible.example.com\n");
}

#[cfg(unix)]
#[test]
fn test_non_utf8_file_name_is_merged() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    let name = OsStr::from_bytes(b"amass\xff.txt");
    fs::write(dir.path().join(name), "hidden.example.com (FQDN)\n").unwrap();
    let skipped = OsStr::from_bytes(b"notes\xff.md");
    fs::write(dir.path().join(skipped), "other.example.com\n").unwrap();

    let merged = ResultMerger::new().unwrap().merge_and_write(dir.path()).unwrap();

    assert_eq!(merged.scanned_files, 1);
    assert_eq!(merged.to_sorted_vec(), vec!["hidden.example.com"]);
}
