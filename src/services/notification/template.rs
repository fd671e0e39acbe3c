//! Message template formatting.
//!
//! Resolves `${variable}` placeholders in notification titles and bodies
//! against the variables captured from a confirmed submission.

use std::collections::HashMap;

/// Formats a message template by substituting variables
///
/// Placeholders without a matching variable are left in place so a
/// misconfigured template stays visible in the delivered message.
///
/// # Arguments
/// * `template` - The message template with variables like ${...}
/// * `variables` - The map of variables to substitute into the template
///
/// # Returns
/// * `String` - Formatted message with variables replaced
pub fn format_template(template: &str, variables: &HashMap<String, String>) -> String {
	let mut message = template.to_string();

	for (key, value) in variables {
		message = message.replace(&format!("${{{}}}", key), value);
	}

	message
}
