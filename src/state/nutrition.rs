//! Nutrition estimate for the recipe form.
//!
//! DESIGN
//! ======
//! Each ingredient row looks up per-gram nutrient vectors and keeps the
//! candidate the author picked plus a gram amount. The estimate is the sum
//! of `per_gram × grams` over matched rows, divided by servings. Rows carry
//! a stable key so a slow lookup can never land on a different row.

#[cfg(test)]
#[path = "nutrition_test.rs"]
mod nutrition_test;

use serde::Serialize;

use crate::error::ApiError;
use crate::net::types::NutritionMatch;

/// Number of tracked nutrients.
pub const NUTRIENT_COUNT: usize = 15;

/// Nutrient names, in vector order.
pub const NUTRIENT_NAMES: [&str; NUTRIENT_COUNT] = [
    "Calories",
    "Protein",
    "Total Fat",
    "Carbohydrates",
    "Sugars",
    "Fiber",
    "Calcium",
    "Iron",
    "Potassium",
    "Sodium",
    "Vitamin A",
    "Vitamin C",
    "Cholesterol",
    "Trans Fat",
    "Saturated Fat",
];

/// Display unit suffix per nutrient.
pub const NUTRIENT_UNITS: [&str; NUTRIENT_COUNT] = [
    "", " g", " g", " g", " g", " g", " mg", " mg", " mg", " mg", " µg", " mg", " mg", " g", " g",
];

pub const LOOKUP_PENDING_MESSAGE: &str = "Calculating USDA ingredient match...";
pub const LOOKUP_FAILED_MESSAGE: &str = "Unable to find suitable data";
/// Name recorded for rows without a selected match.
pub const NO_MATCH_NAME: &str = "No match";

pub type NutrientVector = [f64; NUTRIENT_COUNT];

/// Pad or truncate a server vector to [`NUTRIENT_COUNT`] entries.
#[must_use]
pub fn to_vector(values: &[f64]) -> NutrientVector {
    let mut out = [0.0; NUTRIENT_COUNT];
    for (slot, value) in out.iter_mut().zip(values) {
        if value.is_finite() {
            *slot = *value;
        }
    }
    out
}

/// Lookup progress for one row.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup {
    Pending,
    Failed,
    Ready {
        candidates: Vec<NutritionMatch>,
        /// Index into `candidates`; `None` is the explicit "None" choice.
        selected: Option<usize>,
        grams: f64,
    },
}

/// One ingredient line of the form.
#[derive(Clone, Debug, PartialEq)]
pub struct IngredientRow {
    pub key: u32,
    pub text: String,
    pub lookup: Lookup,
}

impl IngredientRow {
    /// The chosen candidate and gram amount, if any.
    #[must_use]
    pub fn selection(&self) -> Option<(&NutritionMatch, f64)> {
        match &self.lookup {
            Lookup::Ready {
                candidates,
                selected: Some(index),
                grams,
            } => candidates.get(*index).map(|m| (m, *grams)),
            _ => None,
        }
    }

    fn contribution(&self) -> Option<NutrientVector> {
        let (matched, grams) = self.selection()?;
        let mut out = to_vector(&matched.nutrition);
        for value in &mut out {
            *value *= grams;
        }
        Some(out)
    }
}

/// Per-ingredient entry of the submitted `nutrients` field.
#[derive(Clone, Debug, PartialEq, Serialize)]
struct IngredientNutrients {
    name: String,
    amount: f64,
    nutrients: NutrientVector,
}

/// Leading entry of the submitted `nutrients` field.
#[derive(Clone, Debug, PartialEq, Serialize)]
struct TotalNutrients {
    total: NutrientVector,
}

#[derive(Serialize)]
#[serde(untagged)]
enum NutrientEntry {
    Total(TotalNutrients),
    Ingredient(IngredientNutrients),
}

/// Parse a servings field the way a number input reports it: leading
/// integer digits, anything after ignored.
#[must_use]
pub fn parse_servings(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Parse a gram amount. Blank or invalid input counts as zero.
#[must_use]
pub fn parse_grams(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|g| g.is_finite() && *g >= 0.0)
        .unwrap_or(0.0)
}

/// The ingredient list and servings field of one recipe form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NutritionState {
    rows: Vec<IngredientRow>,
    next_key: u32,
    servings: String,
}

impl NutritionState {
    #[must_use]
    pub fn new(servings: &str) -> Self {
        Self {
            rows: Vec::new(),
            next_key: 1,
            servings: servings.to_owned(),
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[IngredientRow] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, key: u32) -> Option<&IngredientRow> {
        self.rows.iter().find(|r| r.key == key)
    }

    fn row_mut(&mut self, key: u32) -> Option<&mut IngredientRow> {
        self.rows.iter_mut().find(|r| r.key == key)
    }

    /// Append a row awaiting lookup. Blank text adds nothing.
    pub fn add_row(&mut self, text: &str) -> Option<u32> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let key = self.next_key.max(1);
        self.next_key = key + 1;
        self.rows.push(IngredientRow {
            key,
            text: text.to_owned(),
            lookup: Lookup::Pending,
        });
        Some(key)
    }

    /// Record a lookup result. The first candidate is preselected with its
    /// suggested amount. Results for removed rows are dropped.
    pub fn resolve(&mut self, key: u32, result: Result<Vec<NutritionMatch>, ApiError>) {
        let Some(row) = self.row_mut(key) else {
            return;
        };
        row.lookup = match result {
            Ok(candidates) if !candidates.is_empty() => {
                let grams = candidates[0].amount.max(0.0);
                Lookup::Ready {
                    candidates,
                    selected: Some(0),
                    grams,
                }
            }
            Ok(_) => Lookup::Failed,
            Err(e) => {
                leptos::logging::warn!("nutrition lookup for {:?} failed: {e}", row.text);
                Lookup::Failed
            }
        };
    }

    /// Pick a candidate (`None` for the "None" option).
    pub fn select(&mut self, key: u32, choice: Option<usize>) {
        if let Some(Lookup::Ready {
            candidates,
            selected,
            ..
        }) = self.row_mut(key).map(|r| &mut r.lookup)
        {
            *selected = choice.filter(|i| *i < candidates.len());
        }
    }

    pub fn set_grams(&mut self, key: u32, raw: &str) {
        if let Some(Lookup::Ready { grams, .. }) = self.row_mut(key).map(|r| &mut r.lookup) {
            *grams = parse_grams(raw);
        }
    }

    pub fn remove(&mut self, key: u32) {
        self.rows.retain(|r| r.key != key);
    }

    pub fn set_servings(&mut self, raw: &str) {
        raw.clone_into(&mut self.servings);
    }

    /// Servings shown on the label, if the field holds a positive integer.
    #[must_use]
    pub fn servings(&self) -> Option<u32> {
        parse_servings(&self.servings)
            .filter(|n| *n >= 1)
            .and_then(|n| u32::try_from(n).ok())
    }

    /// Per-serving estimate across all matched rows.
    #[must_use]
    pub fn totals(&self) -> NutrientVector {
        let divisor = f64::from(self.servings().unwrap_or(1));
        let mut total = [0.0; NUTRIENT_COUNT];
        for contribution in self.rows.iter().filter_map(IngredientRow::contribution) {
            for (sum, value) in total.iter_mut().zip(contribution) {
                *sum += value;
            }
        }
        for value in &mut total {
            *value /= divisor;
        }
        total
    }

    /// Label lines: two decimals plus unit.
    #[must_use]
    pub fn display_values(&self) -> Vec<String> {
        self.totals()
            .iter()
            .zip(NUTRIENT_UNITS)
            .map(|(value, unit)| format!("{value:.2}{unit}"))
            .collect()
    }

    #[must_use]
    pub fn servings_display(&self) -> String {
        match self.servings() {
            Some(n) => format!("Total Servings: {n}"),
            None => "Total Servings: --".to_owned(),
        }
    }

    /// Raw ingredient lines, one form value each.
    #[must_use]
    pub fn ingredient_texts(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.text.clone()).collect()
    }

    /// JSON for the form's `nutrients` field: the per-serving total first,
    /// then one entry per row (unmatched rows as zeroed `No match`).
    #[must_use]
    pub fn form_payload(&self) -> String {
        let mut entries = vec![NutrientEntry::Total(TotalNutrients {
            total: self.totals().map(round2),
        })];
        for row in &self.rows {
            let entry = match row.selection() {
                Some((matched, grams)) => IngredientNutrients {
                    name: matched.name.trim().to_owned(),
                    amount: grams,
                    nutrients: to_vector(&matched.nutrition),
                },
                None => IngredientNutrients {
                    name: NO_MATCH_NAME.to_owned(),
                    amount: 0.0,
                    nutrients: [0.0; NUTRIENT_COUNT],
                },
            };
            entries.push(NutrientEntry::Ingredient(entry));
        }
        serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_owned())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
