use super::*;
use proptest::prelude::*;

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,7}(\\.[a-z]{1,3})?".prop_map(|s| s)
}

/// 通常ファイル・VCS・ロックファイル・メタデータを混ぜたパス
fn path_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::collection::vec(segment_strategy(), 1..4).prop_map(|s| s.join("/")),
        1 => segment_strategy().prop_map(|s| format!(".git/{}", s)),
        1 => prop::sample::select(LOCK_FILES.to_vec()).prop_map(str::to_string),
        1 => (segment_strategy(), prop::sample::select(LOCK_FILES.to_vec()))
            .prop_map(|(dir, lock)| format!("{}/{}", dir, lock)),
        1 => segment_strategy().prop_map(|s| format!(".bolt/{}", s)),
    ]
}

fn rules_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("*.ts".to_string()),
            Just("src/".to_string()),
            Just("*/*".to_string()),
            Just("**/*.md".to_string()),
            segment_strategy(),
        ],
        0..4,
    )
    .prop_map(|lines| lines.join("\n"))
}

fn files_strategy() -> impl Strategy<Value = Vec<RepoFile>> {
    (prop::collection::vec(path_strategy(), 0..20), rules_strategy()).prop_map(|(paths, rules)| {
        let mut files: Vec<RepoFile> = paths.iter().map(|p| RepoFile::at(p, "x")).collect();
        files.push(RepoFile::at(".bolt/ignore", &rules));
        files
    })
}

proptest! {
    /// ignored は常に files の部分集合
    #[test]
    fn prop_ignored_is_subset_of_files(files in files_strategy()) {
        let result = FileSetFilter::default().filter(files);
        for ignored in &result.ignored {
            prop_assert!(result.files.contains(ignored));
        }
    }

    /// ignore ルールは files の件数を変えない
    #[test]
    fn prop_ignore_rules_never_shrink_files(files in files_strategy()) {
        let filter = FileSetFilter::default();
        let with_rules = filter.filter(files.clone());

        let without_rules: Vec<RepoFile> = files
            .into_iter()
            .filter(|f| f.path != filter.ignore_path())
            .collect();
        let baseline = filter.filter(without_rules);

        prop_assert_eq!(with_rules.files, baseline.files);
    }

    /// VCS・ロックファイル・メタデータはどちらの集合にも現れない
    #[test]
    fn prop_fixed_exclusions_are_absent(files in files_strategy()) {
        let result = FileSetFilter::default().filter(files);
        for file in result.files.iter().chain(result.ignored.iter()) {
            prop_assert!(!file.path.starts_with(VCS_PREFIX));
            prop_assert!(!LOCK_FILES.contains(&file.name.as_str()));
            prop_assert!(!file.path.starts_with(".bolt"));
        }
    }
}
