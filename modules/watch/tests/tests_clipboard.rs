// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use watch::clipboard::{Clipboard, FileClipboard};

#[test_log::test]
fn writes_report_into_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports").join("report.txt");
    let mut clipboard = FileClipboard::new(&path);

    clipboard.copy("Position:\n\ttimestamp: 1;\n");

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Position:\n\ttimestamp: 1;\n"
    );
}

#[test_log::test]
fn later_copy_replaces_earlier_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");
    let mut clipboard = FileClipboard::new(&path);

    clipboard.copy("first");
    clipboard.copy("second");

    assert_eq!(std::fs::read_to_string(clipboard.path()).unwrap(), "second");
}

#[test_log::test]
fn unwritable_target_falls_back_without_panic() {
    let dir = tempfile::tempdir().unwrap();
    // The target is an existing directory, writing a file there fails.
    let mut clipboard = FileClipboard::new(dir.path());

    clipboard.copy("fallback text");

    assert!(dir.path().is_dir());
}
