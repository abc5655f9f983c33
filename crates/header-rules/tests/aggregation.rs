//! End-to-end evaluation of the default rule set.

use std::collections::{BTreeSet, HashMap};

use header_rules::{
    HeaderRule, HeaderRulesValidator, HeadersValidationError, RuleSet, ViolationKind,
};
use rstest::{fixture, rstest};

#[fixture]
fn defaults() -> HeaderRulesValidator {
    HeaderRulesValidator::new(RuleSet::defaults())
}

#[fixture]
fn complete_headers() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("X-FeatureName", "payments"),
        ("X-ServiceCode", "PAY-01"),
        ("X-ServiceName", "payments"),
        ("X-MinorServiceVersion", "v1.12"),
        ("X-ChannelCategory", "digital"),
        ("X-ChannelCode", "WEB"),
        ("X-ChannelName", "web"),
    ])
}

fn summary(aggregate: &HeadersValidationError) -> Vec<(String, ViolationKind)> {
    aggregate
        .iter()
        .map(|violation| (violation.header_name().to_owned(), violation.kind()))
        .collect()
}

#[rstest]
fn empty_request_misses_exactly_the_required_defaults(defaults: HeaderRulesValidator) {
    let aggregate = defaults.collect(|_| None::<&str>);

    let missing: BTreeSet<_> = aggregate.iter().map(|v| v.header_name()).collect();
    let expected = BTreeSet::from([
        "X-FeatureName",
        "X-ServiceName",
        "X-ServiceCode",
        "X-MinorServiceVersion",
        "X-ChannelCode",
        "X-ChannelName",
        "X-ChannelCategory",
    ]);
    assert_eq!(missing, expected);
    assert_eq!(aggregate.len(), expected.len());
    assert!(
        aggregate
            .iter()
            .all(|v| v.kind() == ViolationKind::MissingHeader)
    );
}

#[rstest]
fn complete_request_passes(
    defaults: HeaderRulesValidator,
    complete_headers: HashMap<&'static str, &'static str>,
) {
    assert!(defaults.check(|name| complete_headers.get(name).copied()).is_ok());
}

#[rstest]
#[case("X-MinorServiceVersion", "1.123.3-alpha01")]
#[case("X-MinorServiceVersion", "v1.")]
#[case("X-TimeStamp", "1nvalid")]
#[case("X-CallBackURL", "ftp://example.com")]
#[case("X-ChannelCode", "   ")]
fn one_bad_value_yields_one_invalid_entry(
    defaults: HeaderRulesValidator,
    mut complete_headers: HashMap<&'static str, &'static str>,
    #[case] header: &'static str,
    #[case] value: &'static str,
) {
    complete_headers.insert(header, value);
    let aggregate = defaults.collect(|name| complete_headers.get(name).copied());
    assert_eq!(
        summary(&aggregate),
        [(header.to_owned(), ViolationKind::InvalidHeaderValue)]
    );
}

#[rstest]
fn missing_and_invalid_are_reported_together(
    defaults: HeaderRulesValidator,
    mut complete_headers: HashMap<&'static str, &'static str>,
) {
    complete_headers.remove("X-ChannelName");
    complete_headers.insert("X-TimeStamp", "yesterday");

    let mut reported = summary(&defaults.collect(|name| complete_headers.get(name).copied()));
    reported.sort();
    assert_eq!(
        reported,
        [
            ("X-ChannelName".to_owned(), ViolationKind::MissingHeader),
            ("X-TimeStamp".to_owned(), ViolationKind::InvalidHeaderValue),
        ]
    );
}

#[rstest]
fn evaluation_is_idempotent(complete_headers: HashMap<&'static str, &'static str>) {
    let validator = HeaderRulesValidator::new(RuleSet::new([
        HeaderRule::new("X-Tenant"),
        HeaderRule::new("X-Region").optional(),
    ]));
    let lookup = |name: &str| complete_headers.get(name).copied();

    let first = summary(&validator.collect(lookup));
    let second = summary(&validator.collect(lookup));
    assert_eq!(first, second);
    assert_eq!(first, [("X-Tenant".to_owned(), ViolationKind::MissingHeader)]);
}

#[rstest]
fn configured_override_relaxes_a_default(
    mut complete_headers: HashMap<&'static str, &'static str>,
) {
    let validator = HeaderRulesValidator::new(RuleSet::new([
        HeaderRule::new("x-channelname").optional()
    ]));
    complete_headers.remove("X-ChannelName");
    let aggregate = validator.collect(|name| complete_headers.get(name).copied());
    assert!(aggregate.is_empty(), "{aggregate:?}");
}
