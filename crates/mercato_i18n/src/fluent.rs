use std::collections::HashMap;

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use unic_langid::LanguageIdentifier;

use crate::label::{ArgValue, Message};
use crate::language::Language;

fn parse_ftl(language: Language, ftl: &str) -> Result<FluentBundle<FluentResource>, String> {
    let langid: LanguageIdentifier = language
        .code()
        .parse()
        .map_err(|e| format!("invalid language `{language}`: {e}"))?;

    let res = FluentResource::try_new(ftl.to_string())
        .map_err(|(_res, errs)| format!("ftl parse error: {errs:?}"))?;

    let mut bundle = FluentBundle::new_concurrent(vec![langid]);
    // Placeholders land inside plain UI strings; no bidi isolation marks.
    bundle.set_use_isolating(false);
    bundle
        .add_resource(res)
        .map_err(|errs| format!("ftl add_resource error: {errs:?}"))?;
    Ok(bundle)
}

/// Fluent bundles keyed by language.
#[derive(Default)]
pub(crate) struct FluentStore {
    bundles: HashMap<Language, FluentBundle<FluentResource>>,
}

impl FluentStore {
    pub fn load_from_str(&mut self, language: Language, ftl: &str) -> Result<(), String> {
        let bundle = parse_ftl(language, ftl)?;
        self.bundles.insert(language, bundle);
        Ok(())
    }

    pub fn contains(&self, language: Language, id: &str) -> bool {
        self.bundles
            .get(&language)
            .and_then(|b| b.get_message(id))
            .is_some_and(|m| m.value().is_some())
    }

    pub fn format_message(&self, language: Language, msg: &Message) -> Option<String> {
        let bundle = self.bundles.get(&language)?;
        let pattern = bundle.get_message(&msg.id)?.value()?;

        let mut args = FluentArgs::new();
        for (k, v) in &msg.args {
            match v {
                ArgValue::Str(s) => args.set(k.as_ref(), FluentValue::from(s.as_str())),
                ArgValue::Int(i) => args.set(k.as_ref(), FluentValue::from(*i)),
                ArgValue::Float(f) => args.set(k.as_ref(), FluentValue::from(*f)),
            }
        }

        let mut errs = Vec::new();
        let s = bundle
            .format_pattern(pattern, Some(&args), &mut errs)
            .to_string();
        if !errs.is_empty() {
            tracing::warn!(
                language = %language,
                message_id = %msg.id,
                errors = ?errs,
                "Fluent formatting errors"
            );
        }
        Some(s)
    }
}
