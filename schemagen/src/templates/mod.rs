//! Template registry for the generated package
//!
//! Templates are embedded at compile time and rendered with minijinja.
//! Auto-escaping is off since the output is Rust source, not HTML.

pub mod files;

pub use files::*;

use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use crate::Result;

/// Every template, by registry name
const TEMPLATES: &[(&str, &str)] = &[
    ("crud", CRUD_RS),
    ("mod", MOD_RS),
    ("dao", DAO_RS),
    ("bo", BO_RS),
    ("tests", TESTS_RS),
    ("examples", EXAMPLES_RS),
    ("models", MODELS_RS),
    ("connection", CONNECTION_RS),
    ("date", DATE_RS),
    ("utils", UTILS_RS),
];

/// Compiled templates
pub struct TemplateRegistry {
    env: Environment<'static>,
}

impl TemplateRegistry {
    /// Compile every embedded template
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Template`] if a template fails to parse.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        Ok(Self { env })
    }

    /// Render the named template
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Template`] if the template is unknown or
    /// rendering fails.
    pub fn render<S: Serialize>(&self, name: &str, context: &S) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(context)?)
    }

    /// Names of all registered templates
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        TEMPLATES.iter().map(|(name, _)| *name)
    }
}
