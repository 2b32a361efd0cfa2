//! Welcome-email template rendering with Handlebars.
//!
//! The template is a UTF-8 HTML document with two substitution points,
//! `{{first_name}}` and `{{year}}`. It is loaded once at startup; a missing
//! file is fatal then.

use crate::prelude::*;
use handlebars::Handlebars;
use std::path::Path;

pub struct TemplateEngine {
	handlebars: Handlebars<'static>,
	source: String,
}

impl TemplateEngine {
	/// Load the template from disk. Errors here are fatal at startup.
	pub fn load(path: &Path) -> Result<Self> {
		let source = std::fs::read_to_string(path).map_err(|e| {
			Error::Template(format!("failed to load template '{}': {}", path.display(), e))
		})?;
		debug!("Loaded welcome email template from {}", path.display());
		Ok(Self::from_source(source))
	}

	pub fn from_source(source: String) -> Self {
		let mut handlebars = Handlebars::new();

		// Strict mode to catch undefined variables
		handlebars.set_strict_mode(true);

		Self { handlebars, source }
	}

	/// Render the template with the candidate's first name and the current year.
	pub fn render(&self, first_name: &str, year: i32) -> Result<String> {
		let vars = serde_json::json!({
			"first_name": first_name,
			"year": year,
		});

		self.handlebars
			.render_template(&self.source, &vars)
			.map_err(|e| Error::Template(format!("failed to render welcome template: {}", e)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const TEMPLATE: &str =
		"<html><body><h1>Hello {{first_name}}</h1><p>&copy; {{year}}</p></body></html>";

	#[test]
	fn test_render_substitutes_both_placeholders() {
		let engine = TemplateEngine::from_source(TEMPLATE.to_string());
		let html = engine.render("Ada", 2024).unwrap();

		assert!(html.contains("Ada"));
		assert!(html.contains("2024"));
		assert!(!html.contains("{{"));
		assert!(!html.contains("}}"));
	}

	#[test]
	fn test_render_escapes_html_in_names() {
		let engine = TemplateEngine::from_source(TEMPLATE.to_string());
		let html = engine.render("<script>alert('x')</script>", 2024).unwrap();

		assert!(html.contains("&lt;script&gt;"));
		assert!(!html.contains("<script>alert"));
	}

	#[test]
	fn test_missing_file_is_template_error() {
		let err = TemplateEngine::load(Path::new("templates/no_such_template.html.hbs"))
			.err()
			.unwrap();
		assert!(matches!(err, Error::Template(_)));
	}

	#[test]
	fn test_shipped_template_renders() {
		let engine = TemplateEngine::load(Path::new("templates/welcome_email.html.hbs")).unwrap();
		let html = engine.render("Ada", 2024).unwrap();

		assert!(html.contains("Ada"));
		assert!(html.contains("2024"));
		assert!(!html.contains("{{"));
	}
}

// vim: ts=4
