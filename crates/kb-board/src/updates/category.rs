//! Category patch and builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Default)]
pub struct CategoryUpdateBuilder(CategoryUpdate);

impl CategoryUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(CategoryUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.0.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn build(self) -> CategoryUpdate {
        self.0
    }
}
