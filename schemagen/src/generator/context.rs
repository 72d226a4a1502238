//! Per-run generation state

use std::collections::{HashMap, HashSet};

use crate::naming::Naming;
use crate::schema::SchemaSource;
use crate::synth::ExampleValues;
use crate::{Error, Result};

/// State owned by one orchestrator run
///
/// Holds the schema source for the run, the tables already processed, the
/// module directory claimed by each table and the example values gathered
/// for each table. Dropped when the run ends.
pub struct GenerationContext<'s> {
    source: &'s dyn SchemaSource,
    processed: HashSet<String>,
    modules: HashMap<String, String>,
    examples: HashMap<String, ExampleValues>,
    shared_emitted: bool,
}

impl<'s> GenerationContext<'s> {
    /// Start a run against `source`
    #[must_use]
    pub fn new(source: &'s dyn SchemaSource) -> Self {
        Self {
            source,
            processed: HashSet::new(),
            modules: HashMap::new(),
            examples: HashMap::new(),
            shared_emitted: false,
        }
    }

    /// Schema source for this run
    #[must_use]
    pub fn source(&self) -> &'s dyn SchemaSource {
        self.source
    }

    /// Whether `table` has already been processed
    #[must_use]
    pub fn is_processed(&self, table: &str) -> bool {
        self.processed.contains(table)
    }

    /// Record `table` as processed
    ///
    /// Returns `false` if it already was.
    pub fn mark_processed(&mut self, table: &str) -> bool {
        self.processed.insert(table.to_string())
    }

    /// Claim the module directory `table` generates into
    ///
    /// Returns the module name. Claiming again for the same table is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if another table already maps to the same
    /// module, as `UserLogs` and `user_logs` do.
    pub fn claim_module(&mut self, table: &str) -> Result<String> {
        let module = Naming::module_name(table);
        if let Some(owner) = self.modules.get(&module) {
            if owner != table {
                return Err(Error::Config(format!(
                    "tables '{owner}' and '{table}' both map to module '{module}'"
                )));
            }
        } else {
            self.modules.insert(module.clone(), table.to_string());
        }
        Ok(module)
    }

    /// Number of tables processed so far
    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Cache the example values derived for `table`
    pub fn record_examples(&mut self, table: &str, values: ExampleValues) {
        self.examples.insert(table.to_string(), values);
    }

    /// Example values cached for `table`
    #[must_use]
    pub fn examples(&self, table: &str) -> Option<&ExampleValues> {
        self.examples.get(table)
    }

    pub(super) const fn shared_emitted(&self) -> bool {
        self.shared_emitted
    }

    pub(super) fn set_shared_emitted(&mut self) {
        self.shared_emitted = true;
    }
}
