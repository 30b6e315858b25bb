//! Recipe authoring form: steps, tags and the fields added on submit.
//!
//! SYSTEM CONTEXT
//! ==============
//! `#recipe-form` is server rendered. The step list and the tag picker are
//! mounted inside it and render named inputs (`steps`, `tags`), so a
//! `FormData` built from the form already carries them. What the form cannot
//! express by itself (the draft flag, the autofilled link and the existing
//! image URL) is computed here by [`submit_fields`].

#[cfg(test)]
#[path = "recipe_form_test.rs"]
mod recipe_form_test;

/// Id of the submit button that saves a draft instead of publishing.
pub const DRAFT_BUTTON_ID: &str = "draft-button";
/// Where "Clear all" and a finished delete without redirect land.
pub const HOME_PATH: &str = "/";
pub const SUBMIT_FAILED_MESSAGE: &str = "Could not save recipe.";
pub const DELETE_RECIPE_CONFIRM_MESSAGE: &str = "Delete this recipe? This cannot be undone.";
pub const DELETE_RECIPE_FAILED_MESSAGE: &str = "Could not delete recipe.";
/// Class marking a selected tag.
pub const TAG_SELECTED_CLASS: &str = "tag-select";

// =============================================================
// Steps
// =============================================================

/// One instruction step, keyed for stable list rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub key: u32,
    pub text: String,
}

/// Ordered instruction steps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepList {
    steps: Vec<Step>,
    next_key: u32,
}

impl StepList {
    /// Start from the steps already stored for the recipe. Blank entries
    /// are dropped.
    #[must_use]
    pub fn new(initial: Vec<String>) -> Self {
        let mut list = Self::default();
        for text in initial {
            list.add(&text);
        }
        list
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn keys(&self) -> Vec<u32> {
        self.steps.iter().map(|s| s.key).collect()
    }

    #[must_use]
    pub fn text(&self, key: u32) -> Option<&str> {
        self.steps
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.text.as_str())
    }

    /// Append a step. Returns its key, or `None` for blank text.
    pub fn add(&mut self, text: &str) -> Option<u32> {
        if text.trim().is_empty() {
            return None;
        }
        let key = self.next_key;
        self.next_key += 1;
        self.steps.push(Step {
            key,
            text: text.to_owned(),
        });
        Some(key)
    }

    /// Replace the text of an existing step.
    pub fn edit(&mut self, key: u32, text: &str) -> bool {
        match self.steps.iter_mut().find(|s| s.key == key) {
            Some(step) => {
                text.clone_into(&mut step.text);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: u32) -> bool {
        let before = self.steps.len();
        self.steps.retain(|s| s.key != key);
        self.steps.len() != before
    }

    /// Values submitted as repeated `steps` fields, in order. Steps edited
    /// down to nothing are left out.
    #[must_use]
    pub fn form_values(&self) -> Vec<String> {
        self.steps
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

// =============================================================
// Tags
// =============================================================

/// A selectable tag as rendered by the server into `#tag-container`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagOption {
    /// Tag name; also the submitted value.
    pub id: String,
    pub label: String,
    pub selected: bool,
}

impl TagOption {
    /// Build from a server-rendered tag element. Elements without an id
    /// are not tags.
    #[must_use]
    pub fn from_markup(id: &str, text: Option<&str>, class: Option<&str>) -> Option<Self> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        let label = text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(id)
            .to_owned();
        let selected = class.is_some_and(|c| c.split_whitespace().any(|c| c == TAG_SELECTED_CLASS));
        Some(Self {
            id: id.to_owned(),
            label,
            selected,
        })
    }
}

/// Tag picker state, in page order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSelection {
    tags: Vec<TagOption>,
}

impl TagSelection {
    /// Duplicate ids keep their first occurrence.
    #[must_use]
    pub fn new(tags: Vec<TagOption>) -> Self {
        let mut unique: Vec<TagOption> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique.iter().any(|t| t.id == tag.id) {
                unique.push(tag);
            }
        }
        Self { tags: unique }
    }

    #[must_use]
    pub fn tags(&self) -> &[TagOption] {
        &self.tags
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.tags.iter().any(|t| t.id == id && t.selected)
    }

    /// Flip one tag. Returns the new selection, `None` for unknown ids.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let tag = self.tags.iter_mut().find(|t| t.id == id)?;
        tag.selected = !tag.selected;
        Some(tag.selected)
    }

    /// Values submitted as repeated `tags` fields, in page order.
    #[must_use]
    pub fn form_values(&self) -> Vec<String> {
        self.tags
            .iter()
            .filter(|t| t.selected)
            .map(|t| t.id.clone())
            .collect()
    }
}

// =============================================================
// Submission
// =============================================================

/// Which submit button was used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitKind {
    #[default]
    Publish,
    Draft,
}

impl SubmitKind {
    #[must_use]
    pub fn from_submitter(id: Option<&str>) -> Self {
        if id == Some(DRAFT_BUTTON_ID) { Self::Draft } else { Self::Publish }
    }
}

/// Image URL to resubmit when no new file was chosen.
///
/// Local previews (`blob:`/`data:`) and empty sources are never sent.
#[must_use]
pub fn image_link_fallback(has_image_file: bool, image_src: Option<&str>) -> Option<String> {
    if has_image_file {
        return None;
    }
    let src = image_src.map(str::trim).filter(|s| !s.is_empty())?;
    if src.starts_with("blob:") || src.starts_with("data:") {
        return None;
    }
    Some(src.to_owned())
}

/// Fields set on the form data before posting, beyond the form's own inputs.
///
/// - `link`: the recipe link box, autofilled or typed.
/// - `imageLink`: the current image URL when no new file is attached.
/// - `draft`: `true` when the draft button submitted the form.
#[must_use]
pub fn submit_fields(
    kind: SubmitKind,
    link: Option<&str>,
    has_image_file: bool,
    image_src: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut fields = Vec::new();
    if let Some(link) = link {
        fields.push(("link", link.trim().to_owned()));
    }
    if let Some(src) = image_link_fallback(has_image_file, image_src) {
        fields.push(("imageLink", src));
    }
    if kind == SubmitKind::Draft {
        fields.push(("draft", "true".to_owned()));
    }
    fields
}
