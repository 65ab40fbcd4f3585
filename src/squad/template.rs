//! Unit templates and the registry that holds them
//!
//! The registry is an ordinary value handed to whoever places units, so
//! tests and simulations can each work with their own template set.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TacticsError};
use crate::core::types::GridCell;
use crate::squad::constants::{GRID_SIZE, MAX_FOOTPRINT_SIDE};
use crate::squad::unit::{Attributes, CoverProfile, Targeting, UnitRole};

fn default_side() -> usize {
    1
}

/// Everything needed to seat a unit, minus its position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTemplate {
    pub name: String,
    pub attributes: Attributes,
    #[serde(default = "default_side")]
    pub width: usize,
    #[serde(default = "default_side")]
    pub height: usize,
    #[serde(default)]
    pub role: UnitRole,
    #[serde(default)]
    pub targeting: Option<Targeting>,
    #[serde(default)]
    pub cover: Option<CoverProfile>,
    #[serde(default)]
    pub attack_range: Option<u32>,
    #[serde(default)]
    pub movement_speed: Option<u32>,
}

impl UnitTemplate {
    pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes,
            width: 1,
            height: 1,
            role: UnitRole::default(),
            targeting: None,
            cover: None,
            attack_range: None,
            movement_speed: None,
        }
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_role(mut self, role: UnitRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_targeting(mut self, targeting: Targeting) -> Self {
        self.targeting = Some(targeting);
        self
    }

    pub fn with_cover(mut self, cover: CoverProfile) -> Self {
        self.cover = Some(cover);
        self
    }

    pub fn with_range(mut self, attack_range: u32) -> Self {
        self.attack_range = Some(attack_range);
        self
    }

    pub fn with_speed(mut self, movement_speed: u32) -> Self {
        self.movement_speed = Some(movement_speed);
        self
    }

    /// Reject dimensions and values no grid placement could honor
    pub fn validate(&self) -> Result<()> {
        let side_ok = |side: usize| (1..=MAX_FOOTPRINT_SIDE).contains(&side);
        if !side_ok(self.width) || !side_ok(self.height) {
            return Err(TacticsError::InvalidFootprint {
                width: self.width,
                height: self.height,
            });
        }

        let attrs = &self.attributes;
        let stats = [
            ("strength", attrs.strength),
            ("dexterity", attrs.dexterity),
            ("magic", attrs.magic),
            ("leadership", attrs.leadership),
            ("armor", attrs.armor),
            ("weapon", attrs.weapon),
        ];
        if let Some((stat, value)) = stats.into_iter().find(|(_, value)| *value < 0) {
            return Err(TacticsError::InvalidTemplate {
                name: self.name.clone(),
                reason: format!("{stat} is negative ({value})"),
            });
        }

        if let Some(cover) = &self.cover {
            if !(0.0..=1.0).contains(&cover.value) {
                return Err(TacticsError::InvalidTemplate {
                    name: self.name.clone(),
                    reason: format!("cover value {} outside [0, 1]", cover.value),
                });
            }
        }

        if let Some(Targeting::Cell { cells } | Targeting::Magic { cells }) = &self.targeting {
            if let Some(bad) = cells.iter().find(|c| c.row >= GRID_SIZE || c.col >= GRID_SIZE) {
                return Err(TacticsError::InvalidTemplate {
                    name: self.name.clone(),
                    reason: format!("target cell ({}, {}) is off the grid", bad.row, bad.col),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: AHashMap<String, UnitTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template after validating it
    pub fn insert(&mut self, template: UnitTemplate) -> Result<()> {
        template.validate()?;
        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&UnitTemplate> {
        self.templates.get(name)
    }

    /// Lookup that reports a missing template as an error
    pub fn require(&self, name: &str) -> Result<&UnitTemplate> {
        self.get(name)
            .ok_or_else(|| TacticsError::UnknownTemplate(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Parse a JSON array of templates
    pub fn from_json_str(content: &str) -> Result<Self> {
        let templates: Vec<UnitTemplate> = serde_json::from_str(content)?;
        let mut registry = Self::new();
        for template in templates {
            registry.insert(template)?;
        }
        Ok(registry)
    }

    /// Demo roster used by the skirmish binary and the tests
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for template in default_templates() {
            registry
                .templates
                .insert(template.name.clone(), template);
        }
        registry
    }
}

fn default_templates() -> Vec<UnitTemplate> {
    vec![
        UnitTemplate::new("swordsman", Attributes::new(6, 8, 0, 0, 1, 2))
            .with_role(UnitRole::Dps)
            .with_targeting(Targeting::front_row())
            .with_range(1)
            .with_speed(3),
        UnitTemplate::new("knight", Attributes::new(8, 6, 0, 6, 3, 1))
            .with_role(UnitRole::Tank)
            .with_targeting(Targeting::front_row())
            .with_cover(CoverProfile::new(0.20, 1))
            .with_range(1)
            .with_speed(2),
        UnitTemplate::new("shieldbearer", Attributes::new(5, 4, 0, 0, 2, 0))
            .with_role(UnitRole::Tank)
            .with_targeting(Targeting::front_row())
            .with_cover(CoverProfile::new(0.15, 2))
            .with_range(1)
            .with_speed(2),
        UnitTemplate::new("spearman", Attributes::new(6, 8, 0, 0, 1, 2))
            .with_role(UnitRole::Dps)
            .with_targeting(Targeting::Column)
            .with_range(1)
            .with_speed(3),
        UnitTemplate::new("archer", Attributes::new(4, 14, 0, 0, 0, 2))
            .with_role(UnitRole::Dps)
            .with_targeting(Targeting::Ranged)
            .with_range(3)
            .with_speed(3),
        UnitTemplate::new("crossbowman", Attributes::new(5, 10, 0, 0, 1, 2))
            .with_role(UnitRole::Dps)
            .with_targeting(Targeting::Cell {
                cells: vec![GridCell::new(0, 1)],
            })
            .with_range(3)
            .with_speed(2),
        UnitTemplate::new("mage", Attributes::new(2, 6, 10, 0, 0, 0))
            .with_role(UnitRole::Dps)
            .with_targeting(Targeting::Magic {
                cells: vec![GridCell::new(0, 0), GridCell::new(0, 1), GridCell::new(0, 2)],
            })
            .with_range(4)
            .with_speed(2),
        UnitTemplate::new("captain", Attributes::new(6, 10, 0, 9, 2, 2))
            .with_role(UnitRole::Support)
            .with_targeting(Targeting::front_row())
            .with_range(1)
            .with_speed(3),
        UnitTemplate::new("ogre", Attributes::new(12, 2, 0, 0, 2, 2))
            .with_size(2, 2)
            .with_role(UnitRole::Tank)
            .with_targeting(Targeting::Row {
                rows: vec![0],
                multi_target: true,
                max_targets: 2,
            })
            .with_cover(CoverProfile::new(0.25, 1))
            .with_range(1)
            .with_speed(1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let registry = TemplateRegistry::with_defaults();
        assert!(!registry.is_empty());
        for name in registry.names() {
            assert!(registry.get(name).unwrap().validate().is_ok(), "{name} invalid");
        }
    }

    #[test]
    fn test_registries_are_isolated() {
        let mut a = TemplateRegistry::new();
        let b = TemplateRegistry::new();
        a.insert(UnitTemplate::new("scout", Attributes::new(2, 12, 0, 0, 0, 1)))
            .unwrap();
        assert!(a.get("scout").is_some());
        assert!(b.get("scout").is_none());
    }

    #[test]
    fn test_invalid_footprint_rejected() {
        let template = UnitTemplate::new("giant", Attributes::new(20, 0, 0, 0, 0, 0)).with_size(4, 1);
        let err = template.validate().unwrap_err();
        assert!(matches!(err, TacticsError::InvalidFootprint { width: 4, height: 1 }));

        let flat = UnitTemplate::new("flat", Attributes::new(1, 0, 0, 0, 0, 0)).with_size(1, 0);
        assert!(flat.validate().is_err());
    }

    #[test]
    fn test_negative_stats_rejected() {
        let frail = UnitTemplate::new("frail", Attributes::new(-15, 0, 0, 0, 0, 0));
        match frail.validate() {
            Err(TacticsError::InvalidTemplate { name, reason }) => {
                assert_eq!(name, "frail");
                assert!(reason.contains("strength"));
            }
            other => panic!("expected InvalidTemplate, got {other:?}"),
        }

        let bare = UnitTemplate::new("bare", Attributes::new(4, 0, 0, 0, -1, 0));
        assert!(bare.validate().is_err());
        let blunt = UnitTemplate::new("blunt", Attributes::new(4, 0, 0, 0, 0, -2));
        assert!(blunt.validate().is_err());
    }

    #[test]
    fn test_invalid_cover_rejected() {
        let template = UnitTemplate::new("wall", Attributes::new(5, 0, 0, 0, 5, 0))
            .with_cover(CoverProfile::new(1.5, 1));
        assert!(matches!(
            template.validate(),
            Err(TacticsError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_require_unknown_template() {
        let registry = TemplateRegistry::with_defaults();
        assert!(matches!(
            registry.require("dragon"),
            Err(TacticsError::UnknownTemplate(name)) if name == "dragon"
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {
                "name": "militia",
                "attributes": {"strength": 4, "dexterity": 4, "magic": 0, "leadership": 0, "armor": 0, "weapon": 1},
                "targeting": {"mode": "row", "rows": [0]},
                "cover": {"value": 0.1, "range": 1},
                "attack_range": 1
            }
        ]"#;
        let registry = TemplateRegistry::from_json_str(json).unwrap();
        let militia = registry.get("militia").unwrap();
        assert_eq!(militia.width, 1);
        assert_eq!(militia.height, 1);
        assert_eq!(militia.attack_range, Some(1));
        assert!(militia.cover.unwrap().requires_active);
        assert!(militia.attributes.can_act);
    }
}
