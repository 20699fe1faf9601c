use super::*;
use tempfile::TempDir;

fn set(files: Vec<RepoFile>, ignored: Vec<RepoFile>, setup: Option<&str>) -> FilteredFileSet {
    FilteredFileSet {
        files,
        ignored,
        setup_instructions: setup.map(str::to_string),
    }
}

// === bundle ===

#[test]
fn test_bundle_has_one_action_per_file() {
    let files = vec![
        RepoFile::at("index.html", "<html></html>"),
        RepoFile::at("src/main.ts", "console.log(1)"),
    ];
    let result =
        ImportMessageBuilder::new().build("starter-a", &set(files, vec![], None), Some("Shop"));

    assert!(result
        .bundle
        .starts_with("<artifact id=\"imported-files\" title=\"Shop\" type=\"bundled\">"));
    assert_eq!(result.bundle.matches("<action type=\"file\"").count(), 2);
    assert!(result
        .bundle
        .contains("<action type=\"file\" filePath=\"src/main.ts\">\nconsole.log(1)\n</action>"));
    assert!(result.bundle.ends_with("</artifact>"));
}

#[test]
fn test_bundle_default_title() {
    let result =
        ImportMessageBuilder::new().build("starter-a", &FilteredFileSet::default(), Some("  "));
    assert!(result
        .bundle
        .contains(&format!("title=\"{}\"", DEFAULT_BUNDLE_TITLE)));
}

#[test]
fn test_bundle_escapes_title_attribute() {
    let result = ImportMessageBuilder::new().build(
        "starter-a",
        &FilteredFileSet::default(),
        Some("A \"B\""),
    );
    assert!(result.bundle.contains("title=\"A &quot;B&quot;\""));
}

// === instructions ===

#[test]
fn test_empty_set_has_only_closing_directive() {
    let result = ImportResult::empty(None);

    assert_eq!(result.bundle.matches("<action").count(), 0);
    assert_eq!(result.instructions, CLOSING_DIRECTIVE);
}

#[test]
fn test_instructions_order() {
    let files = vec![
        RepoFile::at("secrets/key.txt", "k"),
        RepoFile::at("readme.md", "r"),
    ];
    let ignored = vec![RepoFile::at("secrets/key.txt", "k")];
    let result = ImportMessageBuilder::new().build(
        "starter-a",
        &set(files, ignored, Some("Run npm install")),
        None,
    );

    let setup = result.instructions.find("Run npm install").unwrap();
    let rules = result.instructions.find("STRICT FILE ACCESS RULES").unwrap();
    assert!(setup < rules);
    assert!(result.instructions.ends_with(CLOSING_DIRECTIVE));
}

#[test]
fn test_access_rules_list_ignored_paths_and_actions() {
    let ignored = vec![RepoFile::at("secrets/key.txt", "k")];
    let result = ImportMessageBuilder::new().build(
        "starter-a",
        &set(ignored.clone(), ignored, None),
        None,
    );

    assert!(result.instructions.contains("- secrets/key.txt\n"));
    assert!(!result.instructions.contains("- readme.md"));
    for action in PERMITTED_ACTIONS.iter().chain(FORBIDDEN_ACTIONS) {
        assert!(result.instructions.contains(action), "missing {}", action);
    }
}

#[test]
fn test_blank_setup_instructions_are_omitted() {
    let result = ImportMessageBuilder::new().build(
        "starter-a",
        &set(vec![], vec![], Some("  \n")),
        None,
    );
    assert_eq!(result.instructions, CLOSING_DIRECTIVE);
}

// === error_artifact ===

#[test]
fn test_error_artifact() {
    let result = ImportMessageBuilder::new().error_artifact("github API error (404): Not Found");

    assert!(result.bundle.contains("type=\"error\""));
    assert!(result.bundle.contains("Not Found"));
    assert!(result.instructions.starts_with("Sorry"));
    assert!(result.instructions.contains("original request"));
}

// === write_files ===

#[test]
fn test_write_files_creates_parents() {
    let temp = TempDir::new().unwrap();
    let files = vec![
        RepoFile::at("src/app/main.ts", "main"),
        RepoFile::at("README.md", "readme"),
    ];

    let written = write_files(temp.path(), &files).unwrap();

    assert_eq!(written.len(), 2);
    let main = std::fs::read_to_string(temp.path().join("src/app/main.ts")).unwrap();
    assert_eq!(main, "main");
}

#[test]
fn test_write_files_rejects_parent_components() {
    let temp = TempDir::new().unwrap();
    let files = vec![RepoFile::at("../escape.txt", "x")];

    let result = write_files(temp.path(), &files);

    assert!(matches!(result, Err(TimError::Validation(_))));
    assert!(!temp.path().parent().unwrap().join("escape.txt").exists());
}

#[test]
fn test_write_files_rejects_absolute_paths() {
    let temp = TempDir::new().unwrap();
    let files = vec![RepoFile::new("passwd", "/etc/passwd", "x")];

    let result = write_files(temp.path(), &files);

    assert!(matches!(result, Err(TimError::Validation(_))));
}
