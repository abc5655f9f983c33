//! Built-in header rules merged into every [`RuleSet`](crate::RuleSet).

use std::sync::{Arc, LazyLock};

use tracing::error;

use crate::elapsed::TIMESTAMP_HEADER;
use crate::rule::HeaderRule;
use crate::validators::{
    DefaultValidator, EpochTimestampValidator, SharedValidator, regex_or_default,
};

/// Pattern enforced on `X-MinorServiceVersion`, matched without regard to case.
pub const MINOR_SERVICE_VERSION_PATTERN: &str = r"v?\d+(\.\d+){0,2}";

/// Pattern enforced on `X-CallBackURL`.
pub const CALLBACK_URL_PATTERN: &str = r"^https?://.+\..+";

static DEFAULT_RULES: LazyLock<Vec<HeaderRule>> = LazyLock::new(|| {
    let plain: SharedValidator = Arc::new(DefaultValidator);
    let epoch: SharedValidator = Arc::new(EpochTimestampValidator);
    let minor_version =
        regex_or_default("X-MinorServiceVersion", MINOR_SERVICE_VERSION_PATTERN, true);
    let callback_url = regex_or_default("X-CallBackURL", CALLBACK_URL_PATTERN, false);
    let table: [(&str, bool, &SharedValidator); 14] = [
        ("X-FeatureCode", false, &plain),
        ("X-FeatureName", true, &plain),
        ("X-ServiceCode", true, &plain),
        ("X-ServiceName", true, &plain),
        ("X-ServiceSubCategory", false, &plain),
        ("X-MinorServiceVersion", true, &minor_version),
        ("X-ChannelCategory", true, &plain),
        ("X-ChannelCode", true, &plain),
        ("X-ChannelName", true, &plain),
        ("X-RouteCode", false, &plain),
        (TIMESTAMP_HEADER, false, &epoch),
        ("X-ServiceMode", false, &plain),
        ("X-SubscriberEvents", false, &plain),
        ("X-CallBackURL", false, &callback_url),
    ];
    table
        .into_iter()
        .filter_map(|(name, required, validator)| builtin(name, required, validator))
        .collect()
});

/// Build one table entry, logging and skipping it when the name is unusable.
fn builtin(name: &str, required: bool, validator: &SharedValidator) -> Option<HeaderRule> {
    HeaderRule::try_new(name)
        .inspect_err(|error| error!(header = name, %error, "skipping built-in header rule"))
        .ok()
        .map(|rule| {
            rule.with_required(required)
                .with_shared_validator(Arc::clone(validator))
        })
}

/// The fixed rules every rule set contains unless a configured rule with the
/// same name replaces them.
#[must_use]
pub fn default_rules() -> &'static [HeaderRule] {
    DEFAULT_RULES.as_slice()
}
