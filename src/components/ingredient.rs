//! Ingredient kinds and instances.
//!
//! A kind is a base food plus a processing category, so "chicken sliced" is
//! `{ Sliced, "chicken" }` and "sandwich" is `{ Dish, "sandwich" }`. The
//! space-separated tag form is only used at the edges (config, telemetry,
//! order names).

use crate::core::types::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Raw,
    Cooked,
    Fried,
    Sliced,
    /// A finished plate collapsed from a recipe.
    Dish,
}

impl Category {
    fn suffix(self) -> Option<&'static str> {
        match self {
            Category::Cooked => Some("cooked"),
            Category::Fried => Some("fried"),
            Category::Sliced => Some("sliced"),
            Category::Raw | Category::Dish => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IngredientKind {
    pub category: Category,
    pub base: String,
}

impl IngredientKind {
    pub fn new(category: Category, base: impl Into<String>) -> Self {
        Self {
            category,
            base: base.into(),
        }
    }

    pub fn raw(base: impl Into<String>) -> Self {
        Self::new(Category::Raw, base)
    }

    pub fn fried(base: impl Into<String>) -> Self {
        Self::new(Category::Fried, base)
    }

    pub fn sliced(base: impl Into<String>) -> Self {
        Self::new(Category::Sliced, base)
    }

    pub fn dish(name: impl Into<String>) -> Self {
        Self::new(Category::Dish, name)
    }

    /// Parses a space-separated tag. The last word selects the category when
    /// it is a processing suffix; anything else is a raw kind.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        if let Some((base, suffix)) = tag.rsplit_once(' ') {
            let category = match suffix {
                "cooked" => Some(Category::Cooked),
                "fried" => Some(Category::Fried),
                "sliced" => Some(Category::Sliced),
                _ => None,
            };
            if let Some(category) = category {
                return Self::new(category, base);
            }
        }
        Self::raw(tag)
    }

    pub fn tag(&self) -> String {
        match self.category.suffix() {
            Some(suffix) => format!("{} {}", self.base, suffix),
            None => self.base.clone(),
        }
    }

    /// Cooked, fried or sliced: something a station hands back.
    pub fn is_processed(&self) -> bool {
        matches!(
            self.category,
            Category::Cooked | Category::Fried | Category::Sliced
        )
    }

    pub fn is_raw(&self) -> bool {
        self.category == Category::Raw
    }
}

impl std::fmt::Display for IngredientKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl From<&str> for IngredientKind {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

/// One concrete ingredient in the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    kind: IngredientKind,
    position: Position,
}

impl Ingredient {
    pub fn new(kind: IngredientKind, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn from_tag(tag: &str, position: Position) -> Self {
        Self::new(IngredientKind::from_tag(tag), position)
    }

    pub fn kind(&self) -> &IngredientKind {
        &self.kind
    }

    pub fn tag(&self) -> String {
        self.kind.tag()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// New instance of `kind` at this instance's position.
    pub fn transformed_into(&self, kind: IngredientKind) -> Ingredient {
        Ingredient::new(kind, self.position)
    }
}
