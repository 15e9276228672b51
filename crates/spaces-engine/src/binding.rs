//! Parameter binding
//!
//! Turns the caller's raw parameters into the bound, schema-ordered set a
//! command body reads. Scripted invocations never prompt: a missing
//! required parameter fails immediately.

use crate::collaborators::Prompter;
use spaces_registry::{Descriptor, ParamError, Params};

/// Bind supplied parameters against a command's schema
///
/// # Errors
/// Returns [`ParamError`] for unknown names, coercion failures, missing
/// required values in non-interactive mode and dismissed prompts.
pub fn bind(
    descriptor: &Descriptor,
    supplied: &Params,
    interactive: bool,
    prompter: &mut dyn Prompter,
) -> Result<Params, ParamError> {
    if let Some((name, _)) = supplied.iter().find(|(name, _)| descriptor.param(name).is_none()) {
        return Err(ParamError::Unknown {
            command: descriptor.name.to_string(),
            name: name.to_string(),
        });
    }

    let mut bound = Params::new();
    for spec in descriptor.params {
        let value = match supplied.get(spec.name) {
            Some(value) => spec.coerce(value.clone())?,
            None if !spec.required => match spec.default {
                Some(default) => default.to_value(),
                None => continue,
            },
            None if interactive => {
                let value = prompter.request_parameter(descriptor, spec).ok_or_else(|| {
                    ParamError::Cancelled {
                        command: descriptor.name.to_string(),
                        name: spec.name.to_string(),
                    }
                })?;
                spec.coerce(value)?
            }
            None => {
                return Err(ParamError::Missing {
                    command: descriptor.name.to_string(),
                    name: spec.name.to_string(),
                })
            }
        };
        bound.insert(spec.name, value);
    }
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{ConflictChoice, NoPrompter};
    use crate::validator::Conflict;
    use spaces_registry::{CommandKind, ParamSpec, ParamValue};

    struct Answer(ParamValue);

    impl Prompter for Answer {
        fn request_parameter(&mut self, _: &Descriptor, _: &ParamSpec) -> Option<ParamValue> {
            Some(self.0.clone())
        }

        fn resolve_conflict(&mut self, _: &Conflict) -> ConflictChoice {
            ConflictChoice::Ignore
        }
    }

    #[test]
    fn scripted_missing_parameter_fails() {
        let err = bind(CommandKind::Rotate.descriptor(), &Params::new(), false, &mut NoPrompter)
            .unwrap_err();
        assert_eq!(
            err,
            ParamError::Missing {
                command: "Rotate".into(),
                name: "degrees".into()
            }
        );
    }

    #[test]
    fn interactive_missing_parameter_is_requested() {
        let bound = bind(
            CommandKind::Rotate.descriptor(),
            &Params::new(),
            true,
            &mut Answer(ParamValue::Integer(30)),
        )
        .unwrap();
        assert_eq!(bound.float("degrees"), Ok(30.0));
    }

    #[test]
    fn dismissed_prompt_cancels() {
        let err = bind(CommandKind::Rotate.descriptor(), &Params::new(), true, &mut NoPrompter)
            .unwrap_err();
        assert!(matches!(err, ParamError::Cancelled { .. }));
    }

    #[test]
    fn defaults_fill_optional_parameters_in_schema_order() {
        let supplied = Params::new().with("file", "s.txt");
        let bound = bind(CommandKind::Similarities.descriptor(), &supplied, false, &mut NoPrompter)
            .unwrap();
        assert_eq!(bound.to_string(), r#"file="s.txt" value_type="similarities""#);
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let supplied = Params::new().with("degrees", 10.0).with("speed", 2.0);
        let err = bind(CommandKind::Rotate.descriptor(), &supplied, true, &mut NoPrompter)
            .unwrap_err();
        assert!(matches!(err, ParamError::Unknown { ref name, .. } if name == "speed"));
    }
}
