use super::*;
use proptest::prelude::*;

/// owner/repo に使える文字列（英数字、ハイフン、アンダースコア）
fn valid_name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_-]{0,19}".prop_map(|s| s)
}

/// git ref に使える文字列
fn valid_ref_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9_-]{0,19}".prop_map(|s| s)
}

proptest! {
    /// どの形式でも同じ owner/repo が得られる
    #[test]
    fn prop_all_formats_produce_same_repo(
        owner in valid_name_strategy(),
        name in valid_name_strategy()
    ) {
        let short = from_url(&format!("{}/{}", owner, name)).unwrap();
        let https = from_url(&format!("https://github.com/{}/{}", owner, name)).unwrap();
        let scp = from_url(&format!("git@github.com:{}/{}", owner, name)).unwrap();

        prop_assert_eq!(&short, &https);
        prop_assert_eq!(&short, &scp);
    }

    /// ref は分離され、owner/name に混入しない
    #[test]
    fn prop_ref_is_split(
        owner in valid_name_strategy(),
        name in valid_name_strategy(),
        git_ref in valid_ref_strategy()
    ) {
        let repo = from_url(&format!("{}/{}@{}", owner, name, git_ref)).unwrap();
        prop_assert_eq!(repo.owner(), owner.as_str());
        prop_assert_eq!(repo.name(), name.as_str());
        prop_assert_eq!(repo.git_ref(), Some(git_ref.as_str()));
    }
}
