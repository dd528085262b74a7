// Shared prompt fragments used by every generation prompt.
// Domain-specific templates live next to the code that fills them.

/// Common instruction appended to all generation prompts.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Base every statement on the project details provided. \
    Where a detail is marked 'Not specified', do NOT invent a value: \
    state a reasonable assumption and label it explicitly as an assumption.";

/// Fills `{name}` placeholders in a single pass.
///
/// Substituted values are never rescanned, so user-supplied text containing
/// braces cannot inject other placeholders. Unknown placeholders are left as-is.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let value = after.find('}').and_then(|end| {
            let key = &after[..end];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, end))
        });

        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
