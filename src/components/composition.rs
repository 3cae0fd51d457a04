use crate::components::ingredient::{Ingredient, IngredientKind};
use crate::core::types::Position;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A required set of kinds that collapses into one finished dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub required: Vec<IngredientKind>,
    pub output: IngredientKind,
}

impl Recipe {
    pub fn new(required: Vec<IngredientKind>, output: &str) -> Self {
        Self {
            required,
            output: IngredientKind::dish(output),
        }
    }

    pub fn sandwich() -> Self {
        Self::new(
            vec![
                IngredientKind::sliced("bread"),
                IngredientKind::sliced("cheese"),
                IngredientKind::sliced("lettuce"),
                IngredientKind::sliced("tomato"),
            ],
            "sandwich",
        )
    }

    pub fn is_satisfied_by(&self, present: &HashSet<&IngredientKind>) -> bool {
        self.required.iter().all(|kind| present.contains(kind))
    }
}

/// A plate: a bounded sequence of ingredients being assembled into a dish.
#[derive(Debug, Clone)]
pub struct Composition {
    position: Position,
    capacity: usize,
    recipes: Vec<Recipe>,
    ingredients: Vec<Ingredient>,
}

impl Composition {
    pub fn new(position: Position, capacity: usize, recipes: Vec<Recipe>) -> Self {
        Self {
            position,
            capacity,
            recipes,
            ingredients: Vec::new(),
        }
    }

    /// Appends an ingredient, collapsing the plate into a dish when a recipe
    /// is complete. Returns false when the plate is already full.
    pub fn add(&mut self, ingredient: Ingredient) -> bool {
        if self.ingredients.len() >= self.capacity {
            debug!(
                "[Composition {}] full, rejecting {}",
                self.position,
                ingredient.tag()
            );
            return false;
        }
        self.ingredients.push(ingredient);
        self.collapse_if_complete();
        true
    }

    /// First recipe, in table order, whose required kinds are all present.
    pub fn completed_recipe(&self) -> Option<&Recipe> {
        let present: HashSet<&IngredientKind> =
            self.ingredients.iter().map(|i| i.kind()).collect();
        self.recipes.iter().find(|recipe| recipe.is_satisfied_by(&present))
    }

    fn collapse_if_complete(&mut self) {
        let Some(output) = self.completed_recipe().map(|r| r.output.clone()) else {
            return;
        };
        info!(
            "[Composition {}] {} ingredients became {}",
            self.position,
            self.ingredients.len(),
            output
        );
        self.ingredients.clear();
        self.ingredients.push(Ingredient::new(output, self.position));
    }

    /// Moves the contents onto a new plate for the holder, leaving this one empty.
    pub fn pick_up(&mut self) -> Option<Composition> {
        if self.ingredients.is_empty() {
            return None;
        }
        let mut held = Composition::new(self.position, self.capacity, self.recipes.clone());
        held.ingredients = std::mem::take(&mut self.ingredients);
        Some(held)
    }

    pub fn remove_last(&mut self) -> Option<Ingredient> {
        self.ingredients.pop()
    }

    pub fn clear(&mut self) {
        self.ingredients.clear();
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn tags(&self) -> Vec<String> {
        self.ingredients.iter().map(|i| i.tag()).collect()
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ingredients.len() >= self.capacity
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plate() -> Composition {
        Composition::new(Position::new(500, 300), 5, vec![Recipe::sandwich()])
    }

    fn item(tag: &str) -> Ingredient {
        Ingredient::from_tag(tag, Position::new(0, 0))
    }

    #[test]
    fn test_sixth_add_is_rejected() {
        let mut plate = plate();
        let tags = ["egg fried", "lamb fried", "leek", "fish fried", "bread sliced"];
        for tag in tags {
            assert!(plate.add(item(tag)));
        }
        assert!(plate.is_full());
        assert!(!plate.add(item("pork fried")));
        assert_eq!(plate.tags(), tags.iter().map(|t| t.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_sandwich_collapses_in_any_order() {
        let orders = [
            ["bread sliced", "cheese sliced", "lettuce sliced", "tomato sliced"],
            ["tomato sliced", "lettuce sliced", "cheese sliced", "bread sliced"],
            ["cheese sliced", "bread sliced", "tomato sliced", "lettuce sliced"],
        ];
        for order in orders {
            let mut plate = plate();
            for (n, tag) in order.iter().enumerate() {
                assert!(plate.add(item(tag)));
                if n < 3 {
                    assert_eq!(plate.len(), n + 1);
                }
            }
            assert_eq!(plate.tags(), vec!["sandwich".to_string()]);
            assert_eq!(plate.ingredients()[0].position(), Position::new(500, 300));
        }
    }

    #[test]
    fn test_extra_items_are_consumed_by_collapse() {
        let mut plate = plate();
        plate.add(item("egg fried"));
        for tag in ["bread sliced", "cheese sliced", "lettuce sliced", "tomato sliced"] {
            plate.add(item(tag));
        }
        assert_eq!(plate.tags(), vec!["sandwich".to_string()]);
    }

    #[test]
    fn test_first_recipe_in_table_wins() {
        let toast = Recipe::new(vec![IngredientKind::sliced("bread")], "toast");
        let butty = Recipe::new(
            vec![IngredientKind::sliced("bread"), IngredientKind::fried("egg")],
            "egg butty",
        );
        let mut plate = Composition::new(Position::new(0, 0), 5, vec![butty, toast]);
        plate.add(item("egg fried"));
        assert_eq!(plate.tags(), vec!["egg fried".to_string()]);
        plate.add(item("bread sliced"));
        assert_eq!(plate.tags(), vec!["egg butty".to_string()]);
    }

    #[test]
    fn test_pick_up_moves_contents() {
        let mut plate = plate();
        assert!(plate.pick_up().is_none());

        plate.add(item("fish fried"));
        let held = plate.pick_up().unwrap();
        assert!(plate.is_empty());
        assert_eq!(held.tags(), vec!["fish fried".to_string()]);
        assert_eq!(held.position(), plate.position());
    }

    #[test]
    fn test_remove_last() {
        let mut plate = plate();
        plate.add(item("leek"));
        plate.add(item("egg fried"));
        assert_eq!(plate.remove_last().map(|i| i.tag()), Some("egg fried".to_string()));
        assert_eq!(plate.len(), 1);
    }
}
