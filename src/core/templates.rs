//! Page templates.
//!
//! All templates end in `.html`, so minijinja escapes every `{{ ... }}` expression by default.
//! The vulnerable pages opt out with the `safe` filter.

use minijinja::Environment;
use serde::Serialize;

const TEMPLATES: [(&str, &str); 8] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("vuln_reflected.html", include_str!("../../templates/vuln_reflected.html")),
    ("safe_reflected.html", include_str!("../../templates/safe_reflected.html")),
    ("stored_vuln.html", include_str!("../../templates/stored_vuln.html")),
    ("stored_safe.html", include_str!("../../templates/stored_safe.html")),
    ("sql_vuln.html", include_str!("../../templates/sql_vuln.html")),
    ("sql_safe.html", include_str!("../../templates/sql_safe.html")),
];

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Loads and parses every embedded template.
    pub fn new() -> Result<Templates, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Templates { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}
