//! FILENAME: core/engine/src/spreadsheet.rs
//! PURPOSE: The cell store plus the recalculation driver.
//! CONTEXT: `Spreadsheet` owns every cell, the dependency graph between them,
//! and the naming rules. A content update is all-or-nothing: the new contents
//! are parsed, the graph is re-linked and ordered, and only when that succeeds
//! are cells written and re-evaluated. On failure nothing is left changed.

use crate::cell::{Cell, CellContents, CellValue};
use crate::dependency_graph::DependencyGraph;
use crate::error::{SpreadsheetError, SpreadsheetResult};
use crate::evaluator::evaluate;
use crate::recalc::cells_to_recalculate;
use log::{debug, trace, warn};
use parser::{is_valid_name, Formula, FormulaRules};
use std::collections::{BTreeMap, HashSet};

/// Version tag used when none is given.
pub const DEFAULT_VERSION: &str = "default";

static EMPTY_CONTENTS: CellContents = CellContents::Text(String::new());
static EMPTY_VALUE: CellValue = CellValue::Text(String::new());

#[derive(Debug, Clone)]
pub struct Spreadsheet {
    /// Cells by normalized name. Sorted so enumeration is deterministic.
    cells: BTreeMap<String, Cell>,
    graph: DependencyGraph,
    rules: FormulaRules,
    version: String,
    changed: bool,
}

impl Spreadsheet {
    /// An empty spreadsheet with identity normalization, every well-formed
    /// name valid, and the default version tag.
    pub fn new() -> Self {
        Spreadsheet::with_rules(FormulaRules::default(), DEFAULT_VERSION)
    }

    pub fn with_rules(rules: FormulaRules, version: impl Into<String>) -> Self {
        Spreadsheet {
            cells: BTreeMap::new(),
            graph: DependencyGraph::new(),
            rules,
            version: version.into(),
            changed: false,
        }
    }

    pub fn rules(&self) -> &FormulaRules {
        &self.rules
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// True if the spreadsheet was modified since it was created, loaded or saved.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Clears the changed flag. Called by persistence after a successful write.
    pub fn mark_saved(&mut self) {
        self.changed = false;
    }

    /// Every cell whose contents are not empty, in name order.
    pub fn nonempty_cells(&self) -> impl Iterator<Item = (&str, &Cell)> + '_ {
        self.cells
            .iter()
            .filter(|(_, cell)| !cell.contents.is_empty())
            .map(|(name, cell)| (name.as_str(), cell))
    }

    /// Names of every cell whose contents are not empty, in name order.
    pub fn nonempty_cell_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.nonempty_cells().map(|(name, _)| name)
    }

    /// The contents of `name`; empty text if the cell was never written.
    pub fn get_cell_contents(&self, name: &str) -> SpreadsheetResult<&CellContents> {
        let name = self.normalize_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map_or(&EMPTY_CONTENTS, |cell| &cell.contents))
    }

    /// The cached value of `name`; empty text if the cell was never written.
    pub fn get_cell_value(&self, name: &str) -> SpreadsheetResult<&CellValue> {
        let name = self.normalize_name(name)?;
        Ok(self.cells.get(&name).map_or(&EMPTY_VALUE, |cell| &cell.value))
    }

    /// Cells whose formulas reference `name` directly.
    pub fn get_direct_dependents(&self, name: &str) -> SpreadsheetResult<HashSet<String>> {
        let name = self.normalize_name(name)?;
        Ok(self.graph.get_dependents(&name))
    }

    /// Sets the contents of `name` from user text and recalculates.
    ///
    /// Text starting with `=` is a formula, text that parses as a finite number
    /// is a number, anything else is literal text (`""` empties the cell).
    ///
    /// # Returns
    /// - `Ok(names)` - The updated cell followed by every cell that depends
    ///   on it directly or indirectly, in the order they were recalculated.
    /// - `Err(..)` - Invalid name, malformed formula, or a circular reference.
    ///   The spreadsheet is unchanged.
    pub fn set_contents_of_cell(&mut self, name: &str, content: &str) -> SpreadsheetResult<Vec<String>> {
        let name = self.normalize_name(name)?;
        let contents = self.parse_contents(content)?;
        debug!("set {} = {:?}", name, content);
        self.set_cell_contents(name, contents)
    }

    fn parse_contents(&self, content: &str) -> SpreadsheetResult<CellContents> {
        if let Some(formula) = content.strip_prefix('=') {
            let formula = Formula::with_rules(formula, self.rules.clone())?;
            return Ok(CellContents::Formula(formula));
        }

        match content.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(CellContents::Number(n)),
            _ => Ok(CellContents::Text(content.to_string())),
        }
    }

    fn set_cell_contents(&mut self, name: String, contents: CellContents) -> SpreadsheetResult<Vec<String>> {
        let new_dependees = match &contents {
            CellContents::Formula(formula) => formula.variables(),
            _ => HashSet::new(),
        };

        let old_dependees = self.graph.get_dependees(&name);
        self.graph.replace_dependees(&name, &new_dependees);

        let order = match cells_to_recalculate(&self.graph, &name) {
            Ok(order) => order,
            Err(cycle) => {
                warn!("rejected update of {}: {}", name, cycle);
                self.graph.replace_dependees(&name, &old_dependees);
                return Err(cycle.into());
            }
        };

        self.cells.insert(name, Cell::new(contents));
        self.changed = true;
        self.recalculate(&order);

        debug!("recalculated {} cell(s): {:?}", order.len(), order);
        Ok(order)
    }

    /// Re-evaluates `order` left to right, writing each result back before the
    /// next cell reads it.
    fn recalculate(&mut self, order: &[String]) {
        for name in order {
            let Some(cell) = self.cells.get(name) else {
                continue;
            };

            let value = match &cell.contents {
                CellContents::Text(text) => CellValue::Text(text.clone()),
                CellContents::Number(n) => CellValue::Number(*n),
                CellContents::Formula(formula) => {
                    let lookup = |var: &str| self.cells.get(var).and_then(|c| c.value.as_number());
                    match evaluate(formula, &lookup) {
                        Ok(n) => CellValue::Number(n),
                        Err(e) => CellValue::Error(e),
                    }
                }
            };
            trace!("{} -> {:?}", name, value);

            if let Some(cell) = self.cells.get_mut(name) {
                cell.value = value;
            }
        }
    }

    /// Applies the normalizer and checks the result is an acceptable cell name.
    fn normalize_name(&self, name: &str) -> SpreadsheetResult<String> {
        let normalized = self.rules.normalize(name);
        if is_valid_name(&normalized) && self.rules.is_valid(&normalized) {
            Ok(normalized)
        } else {
            Err(SpreadsheetError::InvalidName(name.to_string()))
        }
    }
}

impl Default for Spreadsheet {
    fn default() -> Self {
        Self::new()
    }
}
