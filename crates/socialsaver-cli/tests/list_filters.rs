mod common;
use common::TestEnv;
use predicates::prelude::*;

#[test]
fn list_defaults_to_newest_first() {
    let t = TestEnv::new();
    assert_eq!(t.list_ids(&[]), vec![4, 1, 2, 3]);
    assert_eq!(t.list_ids(&["--sort", "oldest"]), vec![3, 2, 1, 4]);
    // missing title sorts as the empty string
    assert_eq!(t.list_ids(&["--sort", "alpha"]), vec![4, 3, 2, 1]);
}

#[test]
fn search_is_case_insensitive_across_fields() {
    let t = TestEnv::new();
    // hashtag only
    assert_eq!(t.list_ids(&["--search", "DINNER"]), vec![1]);
    // summary
    assert_eq!(t.list_ids(&["--search", "push day"]), vec![2]);
    // category
    assert_eq!(t.list_ids(&["--search", "coding"]), vec![3]);
    assert!(t.list_ids(&["--search", "nothing-like-this"]).is_empty());
}

#[test]
fn category_and_platform_filters() {
    let t = TestEnv::new();
    assert_eq!(t.list_ids(&["--category", "Fitness"]), vec![2]);
    assert_eq!(t.list_ids(&["--category", "All"]).len(), 4);
    assert!(t.list_ids(&["--category", "fitness"]).is_empty());
    assert_eq!(t.list_ids(&["--platform", "twitter"]), vec![4]);
    assert_eq!(t.list_ids(&["--platform", "x"]), vec![4]);
    assert_eq!(
        t.list_ids(&["--platform", "youtube", "--category", "Food"]),
        vec![1]
    );
}

#[test]
fn time_ranges_are_relative_to_now() {
    let t = TestEnv::new();
    assert_eq!(t.list_ids(&["--range", "today"]), vec![4]);
    assert_eq!(t.list_ids(&["--range", "week"]), vec![4, 1]);
    assert_eq!(t.list_ids(&["--range", "month"]), vec![4, 1, 2]);
    assert_eq!(t.list_ids(&["--range", "all"]).len(), 4);
}

#[test]
fn limit_applies_after_sort() {
    let t = TestEnv::new();
    assert_eq!(t.list_ids(&["--limit", "2"]), vec![4, 1]);
}

#[test]
fn plain_list_uses_display_fallbacks() {
    let t = TestEnv::new();
    t.bin()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Untitled Save"))
        .stdout(predicate::str::contains("General"))
        .stdout(predicate::str::contains("2 days ago"))
        .stdout(predicate::str::is_match(r"(?m)^3\t \tblog\tCoding").unwrap())
        .stdout(predicate::str::is_match(r"(?m)^1\t\*\tyoutube\tFood").unwrap());
}

#[test]
fn unknown_range_is_rejected() {
    let t = TestEnv::new();
    t.bin()
        .args(["list", "--range", "decade"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown time range"));
}

#[test]
fn settings_default_sort_is_used() {
    let t = TestEnv::new();
    t.write_settings("[view]\ndefault_sort = \"oldest\"\n");
    assert_eq!(t.list_ids(&[]), vec![3, 2, 1, 4]);
    // flags still win
    assert_eq!(t.list_ids(&["--sort", "newest"]), vec![4, 1, 2, 3]);
}
