//! Unit tests for pull request URL extraction.

use pr_approve_bot::extract::PrUrlExtractor;
use pr_approve_bot::models::review::ReviewRequestRef;

fn extractor() -> PrUrlExtractor {
    PrUrlExtractor::new("github.com").expect("extractor builds")
}

#[test]
fn duplicates_collapse_in_first_occurrence_order() {
    let text = "https://github.com/a/b/pull/3 and again https://github.com/a/b/pull/3 \
                then https://github.com/c/d/pull/10";

    let refs = extractor().extract(text);

    assert_eq!(
        refs,
        vec![
            ReviewRequestRef::new("a", "b", 3),
            ReviewRequestRef::new("c", "d", 10),
        ]
    );
}

#[test]
fn text_without_urls_yields_nothing() {
    assert!(extractor().extract("lgtm, ship it").is_empty());
    assert!(extractor().extract("").is_empty());
}

#[test]
fn url_embedded_in_slack_markup_is_found() {
    let refs = extractor().extract("please review <https://github.com/acme/widgets/pull/42>");
    assert_eq!(refs, vec![ReviewRequestRef::new("acme", "widgets", 42)]);
}

#[test]
fn http_scheme_is_accepted() {
    let refs = extractor().extract("http://github.com/acme/widgets/pull/7");
    assert_eq!(refs, vec![ReviewRequestRef::new("acme", "widgets", 7)]);
}

#[test]
fn uppercase_scheme_is_not_matched() {
    assert!(extractor()
        .extract("HTTPS://github.com/acme/widgets/pull/7")
        .is_empty());
}

#[test]
fn different_url_text_for_same_pull_request_yields_two_entries() {
    let refs = extractor()
        .extract("http://github.com/acme/widgets/pull/7 https://github.com/acme/widgets/pull/7");
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0], refs[1]);
}

#[test]
fn issue_and_tree_urls_are_ignored() {
    let text = "https://github.com/acme/widgets/issues/4 https://github.com/acme/widgets/tree/main";
    assert!(extractor().extract(text).is_empty());
}

#[test]
fn other_hosts_are_discarded() {
    let refs = extractor().extract(
        "https://gitlab.com/acme/widgets/pull/1 https://github.com/acme/widgets/pull/2",
    );
    assert_eq!(refs, vec![ReviewRequestRef::new("acme", "widgets", 2)]);
}

#[test]
fn host_comparison_ignores_case() {
    let refs = extractor().extract("https://GitHub.com/acme/widgets/pull/2");
    assert_eq!(refs, vec![ReviewRequestRef::new("acme", "widgets", 2)]);
}

#[test]
fn zero_and_overflowing_numbers_are_discarded() {
    let text = "https://github.com/acme/widgets/pull/0 \
                https://github.com/acme/widgets/pull/99999999999999999999999";
    assert!(extractor().extract(text).is_empty());
}

#[test]
fn trailing_path_after_number_is_ignored() {
    let refs = extractor().extract("https://github.com/acme/widgets/pull/42/files#diff-1");
    assert_eq!(refs, vec![ReviewRequestRef::new("acme", "widgets", 42)]);
}

#[test]
fn parse_accepts_single_url() {
    let parsed = extractor().parse("https://github.com/rust-lang/rust/pull/12345");
    assert_eq!(parsed, Some(ReviewRequestRef::new("rust-lang", "rust", 12345)));
}

#[test]
fn parse_rejects_surrounding_text() {
    assert!(extractor()
        .parse("see https://github.com/rust-lang/rust/pull/12345")
        .is_none());
}

#[test]
fn custom_enterprise_host() {
    let extractor = PrUrlExtractor::new("git.example.com").expect("extractor builds");
    let refs = extractor.extract(
        "https://git.example.com/team/app/pull/5 https://github.com/team/app/pull/6",
    );
    assert_eq!(refs, vec![ReviewRequestRef::new("team", "app", 5)]);
}

#[test]
fn reference_displays_as_owner_repo_number() {
    assert_eq!(
        ReviewRequestRef::new("acme", "widgets", 42).to_string(),
        "acme/widgets#42"
    );
}
