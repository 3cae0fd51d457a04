use crate::components::ingredient::{Ingredient, IngredientKind};
use crate::core::context::TickContext;
use crate::core::types::{Bounds, ComponentId, Millis, Position};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Footprint of a station on screen, in pixels.
const STATION_SIZE: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationKind {
    Pan,
    CuttingBoard,
}

/// `input` held for at least `threshold_ms` becomes `output`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRule {
    pub input: IngredientKind,
    pub threshold_ms: Millis,
    pub output: IngredientKind,
}

impl TransformRule {
    pub fn new(input: &str, threshold_ms: Millis, output: &str) -> Self {
        Self {
            input: IngredientKind::from_tag(input),
            threshold_ms,
            output: IngredientKind::from_tag(output),
        }
    }

    pub fn pan_defaults() -> Vec<TransformRule> {
        vec![
            TransformRule::new("egg", 0, "egg fried"),
            TransformRule::new("lamb", 8_000, "lamb fried"),
            TransformRule::new("chicken", 8_000, "chicken fried"),
            TransformRule::new("chicken sliced", 8_000, "chicken drumstick fried"),
            TransformRule::new("fish", 8_000, "fish fried"),
            TransformRule::new("pork", 8_000, "pork fried"),
        ]
    }

    pub fn cutting_board_defaults() -> Vec<TransformRule> {
        vec![
            TransformRule::new("tomato", 0, "tomato sliced"),
            TransformRule::new("lettuce", 0, "lettuce sliced"),
            TransformRule::new("cheese", 0, "cheese sliced"),
            TransformRule::new("chicken", 0, "chicken sliced"),
            TransformRule::new("bread", 0, "bread sliced"),
            TransformRule::new("chicken to slice", 0, "chicken sliced"),
        ]
    }
}

/// One occupied position on a station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSlot {
    pub ingredient: Ingredient,
    pub entered_at: Millis,
    pub transformed: bool,
}

/// A pan or cutting board that ages whatever sits on it.
///
/// Slots are kept in insertion order. Progress is never stored: every query
/// compares the game clock against `entered_at`.
#[derive(Debug)]
pub struct Station {
    component_id: ComponentId,
    kind: StationKind,
    position: Position,
    rules: Vec<TransformRule>,
    slots: Vec<StationSlot>,
    max_slots: Option<usize>,
}

impl Station {
    pub fn new(
        component_id: ComponentId,
        kind: StationKind,
        position: Position,
        rules: Vec<TransformRule>,
    ) -> Self {
        Self {
            component_id,
            kind,
            position,
            rules,
            slots: Vec::new(),
            max_slots: None,
        }
    }

    pub fn pan(component_id: ComponentId, position: Position) -> Self {
        Self::new(component_id, StationKind::Pan, position, TransformRule::pan_defaults())
    }

    pub fn cutting_board(component_id: ComponentId, position: Position) -> Self {
        Self::new(
            component_id,
            StationKind::CuttingBoard,
            position,
            TransformRule::cutting_board_defaults(),
        )
    }

    pub fn with_max_slots(mut self, max_slots: Option<usize>) -> Self {
        self.max_slots = max_slots;
        self
    }

    fn rule_for(&self, kind: &IngredientKind) -> Option<&TransformRule> {
        self.rules.iter().find(|rule| &rule.input == kind)
    }

    /// Still waiting on a rule that needs time to elapse.
    fn is_in_progress(&self, slot: &StationSlot) -> bool {
        !slot.transformed
            && self
                .rule_for(slot.ingredient.kind())
                .is_some_and(|rule| rule.threshold_ms > 0)
    }

    /// Puts an ingredient on the station, starting its timer at `now`.
    /// Only refused (handing the ingredient back) when a slot cap is set and reached.
    pub fn place(&mut self, ingredient: Ingredient, now: Millis) -> Result<(), Ingredient> {
        if let Some(max) = self.max_slots {
            if self.slots.len() >= max {
                warn!(
                    "[Station {}] full ({} slots), refusing {}",
                    self.component_id,
                    max,
                    ingredient.tag()
                );
                return Err(ingredient);
            }
        }

        debug!(
            "[Station {}] placed {} at {}ms",
            self.component_id,
            ingredient.tag(),
            now
        );
        self.slots.push(StationSlot {
            ingredient,
            entered_at: now,
            transformed: false,
        });
        Ok(())
    }

    /// Replaces every slot whose rule threshold has elapsed. Returns how many
    /// slots changed.
    pub fn tick(&mut self, ctx: &TickContext<'_>) -> usize {
        let now = ctx.now;
        let mut changed = 0;

        for index in 0..self.slots.len() {
            let slot = &self.slots[index];
            if slot.transformed {
                continue;
            }
            let Some(rule) = self.rule_for(slot.ingredient.kind()) else {
                continue;
            };
            let elapsed = now.saturating_sub(slot.entered_at);
            if elapsed < rule.threshold_ms {
                continue;
            }

            let output = rule.output.clone();
            let slot = &mut self.slots[index];
            info!(
                "[Station {}] {} became {} after {}ms",
                self.component_id,
                slot.ingredient.tag(),
                output,
                elapsed
            );
            slot.ingredient = slot.ingredient.transformed_into(output);
            slot.transformed = true;
            changed += 1;
        }

        changed
    }

    /// Removes and returns the first cooked, fried or sliced item, if any.
    pub fn take_ready(&mut self) -> Option<Ingredient> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.ingredient.kind().is_processed())?;
        let slot = self.slots.remove(index);
        debug!(
            "[Station {}] handed out {} ({} left)",
            self.component_id,
            slot.ingredient.tag(),
            self.slots.len()
        );
        Some(slot.ingredient)
    }

    /// True when nothing on the station still needs time. Kinds the station
    /// has no rule for, and instant rules, do not hold it up.
    pub fn is_ready_to_pick(&self) -> bool {
        !self.slots.iter().any(|slot| self.is_in_progress(slot))
    }

    pub fn is_cooking(&self) -> bool {
        !self.is_ready_to_pick()
    }

    /// Completion fraction per slot in `[0, 1]`, `None` for slots no rule applies to.
    pub fn slot_progress(&self, now: Millis) -> Vec<Option<f32>> {
        self.slots
            .iter()
            .map(|slot| {
                if slot.transformed {
                    return Some(1.0);
                }
                let rule = self.rule_for(slot.ingredient.kind())?;
                if rule.threshold_ms == 0 {
                    return Some(1.0);
                }
                let elapsed = now.saturating_sub(slot.entered_at) as f32;
                Some((elapsed / rule.threshold_ms as f32).clamp(0.0, 1.0))
            })
            .collect()
    }

    pub fn clear(&mut self) {
        if !self.slots.is_empty() {
            debug!("[Station {}] cleared {} slots", self.component_id, self.slots.len());
        }
        self.slots.clear();
    }

    pub fn component_id(&self) -> &ComponentId {
        &self.component_id
    }

    pub fn kind(&self) -> StationKind {
        self.kind
    }

    pub fn slots(&self) -> &[StationSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, STATION_SIZE, STATION_SIZE)
    }
}
