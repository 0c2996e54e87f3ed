//! Style rule implementations.
//!
//! Each rule lives in its own file and implements [`StyleCheck`]. [`build`]
//! turns a rule identifier plus its configured options into a check.

mod class_name_pattern;
mod commented_out_code_block;
mod max_selector_depth;
mod no_id_selector;
mod no_tag_qualified_id_or_class;
mod prefer_shorthand;
mod restrict_nesting_purpose;
mod zero_needs_no_unit;

pub use class_name_pattern::{ClassNamePatternOptions, ClassNamePatternRuleImpl};
pub use commented_out_code_block::CommentedOutCodeBlockRuleImpl;
pub use max_selector_depth::{MaxSelectorDepthOptions, MaxSelectorDepthRuleImpl};
pub use no_id_selector::NoIdSelectorRuleImpl;
pub use no_tag_qualified_id_or_class::NoTagQualifiedIdOrClassRuleImpl;
pub use prefer_shorthand::PreferShorthandRuleImpl;
pub use restrict_nesting_purpose::{RestrictNestingPurposeOptions, RestrictNestingPurposeRuleImpl};
pub use zero_needs_no_unit::ZeroNeedsNoUnitRuleImpl;

use crate::registry::RuleId;
use crate::traits::StyleCheck;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Build the check for `id` from its options. The error is a message for
/// `ConfigError::InvalidOption`.
pub(crate) fn build(
    id: RuleId,
    options: Option<&serde_json::Value>,
) -> Result<Box<dyn StyleCheck>, String> {
    let check: Box<dyn StyleCheck> = match id {
        RuleId::MaxSelectorDepth => Box::new(MaxSelectorDepthRuleImpl::new(parse_options(options)?)),
        RuleId::NoIdSelector => {
            no_options(options)?;
            Box::new(NoIdSelectorRuleImpl)
        }
        RuleId::NoTagQualifiedIdOrClass => {
            no_options(options)?;
            Box::new(NoTagQualifiedIdOrClassRuleImpl)
        }
        RuleId::ZeroNeedsNoUnit => {
            no_options(options)?;
            Box::new(ZeroNeedsNoUnitRuleImpl)
        }
        RuleId::PreferShorthand => {
            no_options(options)?;
            Box::new(PreferShorthandRuleImpl)
        }
        RuleId::RestrictNestingPurpose => Box::new(RestrictNestingPurposeRuleImpl::new(
            parse_options(options)?,
        )?),
        RuleId::CommentedOutCodeBlock => {
            no_options(options)?;
            Box::new(CommentedOutCodeBlockRuleImpl)
        }
        RuleId::ClassNamePattern => {
            Box::new(ClassNamePatternRuleImpl::new(parse_options(options)?)?)
        }
    };
    Ok(check)
}

fn parse_options<T: DeserializeOwned + Default>(
    options: Option<&serde_json::Value>,
) -> Result<T, String> {
    match options {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| e.to_string()),
    }
}

/// Options object accepted by rules without options: only `{}`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoOptions {}

fn no_options(options: Option<&serde_json::Value>) -> Result<(), String> {
    parse_options::<NoOptions>(options).map(|_| ())
}
